use serde_json::json;
use std::collections::BTreeMap;
use strake::{EdgeLabel, GraphLabel, LabelPos, NodeLabel, RankDir, canonicalize_attrs};

fn attrs(pairs: &[(&str, serde_json::Value)]) -> BTreeMap<String, serde_json::Value> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

#[test]
fn canonicalize_lowercases_names_but_not_values() {
    let out = canonicalize_attrs(&attrs(&[("RankDir", json!("LR")), ("NODESEP", json!(10))]));
    assert_eq!(out.get("rankdir"), Some(&json!("LR")));
    assert_eq!(out.get("nodesep"), Some(&json!(10)));
    assert!(!out.contains_key("RankDir"));
}

#[test]
fn graph_label_reads_whitelisted_attributes_case_insensitively() {
    let label = GraphLabel::from_attrs(&attrs(&[
        ("RANKSEP", json!(80)),
        ("NodeSep", json!("25")),
        ("rankdir", json!("lr")),
        ("Ranker", json!("tight-tree")),
    ]));

    assert_eq!(label.ranksep, 80.0);
    assert_eq!(label.nodesep, 25.0);
    assert_eq!(label.rankdir, RankDir::LR);
    assert_eq!(label.ranker.as_deref(), Some("tight-tree"));
    // Unset attributes keep their defaults.
    assert_eq!(label.edgesep, 20.0);
    assert_eq!(label.marginx, 0.0);
}

#[test]
fn node_label_coerces_numeric_strings_and_keeps_extras() {
    let label = NodeLabel::from_attrs(&attrs(&[
        ("Width", json!("42.5")),
        ("height", json!(7)),
        ("shape", json!("diamond")),
    ]));

    assert_eq!(label.width, 42.5);
    assert_eq!(label.height, 7.0);
    assert_eq!(label.extras.get("shape"), Some(&json!("diamond")));
    assert!(!label.extras.contains_key("width"));
}

#[test]
fn edge_label_applies_defaults_and_whitelists() {
    let label = EdgeLabel::from_attrs(&attrs(&[
        ("MINLEN", json!(2)),
        ("labelpos", json!("L")),
        ("arrowhead", json!("vee")),
    ]));

    assert_eq!(label.minlen, 2);
    assert_eq!(label.labelpos, LabelPos::L);
    assert_eq!(label.weight, 1.0);
    assert_eq!(label.labeloffset, 10.0);
    assert_eq!(label.extras.get("arrowhead"), Some(&json!("vee")));
}

#[test]
fn edge_label_ignores_a_non_positive_minlen_attr() {
    let label = EdgeLabel::from_attrs(&attrs(&[("minlen", json!(0))]));
    assert_eq!(label.minlen, 1);
}

#[test]
fn defaults_match_the_documented_contract() {
    let g = GraphLabel::default();
    assert_eq!(g.rankdir, RankDir::TB);
    assert_eq!((g.nodesep, g.edgesep, g.ranksep), (50.0, 20.0, 50.0));

    let n = NodeLabel::default();
    assert_eq!((n.width, n.height), (0.0, 0.0));

    let e = EdgeLabel::default();
    assert_eq!(e.minlen, 1);
    assert_eq!(e.weight, 1.0);
    assert_eq!(e.labeloffset, 10.0);
    assert_eq!(e.labelpos, LabelPos::R);
}
