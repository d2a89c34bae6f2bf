use strake::graph::{Graph, GraphOptions};
use strake::order::{SortEntry, WeightLabel, barycenter, resolve_conflicts, sort};
use strake::NodeLabel;

fn new_layer_graph() -> Graph<NodeLabel, WeightLabel, ()> {
    let mut g: Graph<NodeLabel, WeightLabel, ()> = Graph::new(GraphOptions {
        multigraph: true,
        ..Default::default()
    });
    g.set_default_edge_label(|| WeightLabel { weight: 1.0 });
    g
}

fn ordered_node(order: usize) -> NodeLabel {
    NodeLabel {
        order: Some(order),
        ..Default::default()
    }
}

fn entry(vs: &[&str], i: usize, barycenter: Option<f64>, weight: Option<f64>) -> SortEntry {
    SortEntry {
        vs: vs.iter().map(|v| v.to_string()).collect(),
        i,
        barycenter,
        weight,
    }
}

#[test]
fn barycenter_is_none_without_neighbours() {
    let mut g = new_layer_graph();
    g.set_node("x", NodeLabel::default());

    let entries = barycenter(&g, &["x".to_string()]);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].barycenter, None);
    assert_eq!(entries[0].weight, None);
}

#[test]
fn barycenter_averages_neighbour_orders_by_weight() {
    let mut g = new_layer_graph();
    g.set_node("u1", ordered_node(0));
    g.set_node("u2", ordered_node(4));
    g.set_edge_with("u1", "x", WeightLabel { weight: 1.0 });
    g.set_edge_with("u2", "x", WeightLabel { weight: 3.0 });

    let entries = barycenter(&g, &["x".to_string()]);
    assert_eq!(entries[0].barycenter, Some(3.0));
    assert_eq!(entries[0].weight, Some(4.0));
}

#[test]
fn sort_orders_by_barycenter() {
    let entries = vec![
        entry(&["a"], 0, Some(2.0), Some(1.0)),
        entry(&["b"], 1, Some(1.0), Some(1.0)),
        entry(&["c"], 2, Some(3.0), Some(1.0)),
    ];
    let result = sort(&entries, false);
    assert_eq!(result.vs, vec!["b", "a", "c"]);
    assert_eq!(result.barycenter, Some(2.0));
    assert_eq!(result.weight, Some(3.0));
}

#[test]
fn sort_keeps_unsortable_entries_at_their_index() {
    let entries = vec![
        entry(&["a"], 0, None, None),
        entry(&["b"], 1, Some(2.0), Some(1.0)),
        entry(&["c"], 2, Some(1.0), Some(1.0)),
    ];
    let result = sort(&entries, false);
    assert_eq!(result.vs, vec!["a", "c", "b"]);
}

#[test]
fn sort_bias_right_flips_ties() {
    let entries = vec![
        entry(&["a"], 0, Some(1.0), Some(1.0)),
        entry(&["b"], 1, Some(1.0), Some(1.0)),
    ];
    assert_eq!(sort(&entries, false).vs, vec!["a", "b"]);
    assert_eq!(sort(&entries, true).vs, vec!["b", "a"]);
}

#[test]
fn resolve_conflicts_passes_unconstrained_entries_through() {
    let cg: Graph<(), (), ()> = Graph::new(GraphOptions::default());
    let entries = vec![
        strake::order::BarycenterEntry {
            v: "a".to_string(),
            barycenter: Some(1.0),
            weight: Some(1.0),
        },
        strake::order::BarycenterEntry {
            v: "b".to_string(),
            barycenter: Some(2.0),
            weight: Some(1.0),
        },
    ];

    let mut result = resolve_conflicts(&entries, &cg);
    result.sort_by_key(|e| e.i);
    assert_eq!(result.len(), 2);
    assert_eq!(result[0].vs, vec!["a"]);
    assert_eq!(result[1].vs, vec!["b"]);
}

#[test]
fn resolve_conflicts_merges_entries_that_violate_a_constraint() {
    // The constraint a -> b conflicts with b's smaller barycenter, so the
    // two collapse into one entry keeping a before b.
    let mut cg: Graph<(), (), ()> = Graph::new(GraphOptions::default());
    cg.set_edge("a", "b");
    let entries = vec![
        strake::order::BarycenterEntry {
            v: "a".to_string(),
            barycenter: Some(3.0),
            weight: Some(2.0),
        },
        strake::order::BarycenterEntry {
            v: "b".to_string(),
            barycenter: Some(1.0),
            weight: Some(2.0),
        },
    ];

    let result = resolve_conflicts(&entries, &cg);
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].vs, vec!["a", "b"]);
    assert_eq!(result[0].barycenter, Some(2.0));
    assert_eq!(result[0].weight, Some(4.0));
}

#[test]
fn resolve_conflicts_keeps_satisfied_constraints_apart() {
    let mut cg: Graph<(), (), ()> = Graph::new(GraphOptions::default());
    cg.set_edge("a", "b");
    let entries = vec![
        strake::order::BarycenterEntry {
            v: "a".to_string(),
            barycenter: Some(1.0),
            weight: Some(1.0),
        },
        strake::order::BarycenterEntry {
            v: "b".to_string(),
            barycenter: Some(2.0),
            weight: Some(1.0),
        },
    ];

    let mut result = resolve_conflicts(&entries, &cg);
    result.sort_by_key(|e| e.i);
    assert_eq!(result.len(), 2);
    assert_eq!(result[0].vs, vec!["a"]);
    assert_eq!(result[1].vs, vec!["b"]);
}
