//! Nesting graph construction for compound inputs.
//!
//! Adds a synthetic root plus top/bottom border dummies around every compound
//! subtree, and weighted nesting edges that force each cluster's children to
//! cluster between its borders during ranking. `cleanup` strips the
//! synthetics once ranks are assigned. A side effect the ranker depends on:
//! the pass leaves the graph connected.

use crate::graph::alg;
use crate::util::DummyIds;
use crate::{DummyKind, EdgeLabel, LayoutGraph, NodeLabel};
use std::collections::BTreeMap;

pub fn run(g: &mut LayoutGraph) {
    let mut ids = DummyIds::default();
    let root = ids.add(g, DummyKind::Root, NodeLabel::default(), "_root");

    let depths = tree_depths(g);
    let height = depths.values().copied().max().unwrap_or(1).saturating_sub(1);
    let node_sep = 2 * height + 1;

    g.graph_mut().nesting_root = Some(root.clone());

    // Rank gaps scale by the tree height so border ranks fit in between.
    for e in g.edge_ids() {
        if let Some(label) = g.edge_mut_by_id(&e) {
            label.minlen *= node_sep.max(1);
        }
    }

    let weight = sum_weights(g) + 1.0;

    let top_level: Vec<String> = g.root_children().into_iter().map(str::to_string).collect();
    for child in top_level {
        if child == root {
            continue;
        }
        dfs(g, &root, node_sep, weight, height, &depths, &mut ids, &child);
    }

    g.graph_mut().node_rank_factor = Some(node_sep);

    connect_components(g, &root, node_sep);
}

pub fn cleanup(g: &mut LayoutGraph) {
    if let Some(root) = g.graph_mut().nesting_root.take() {
        g.remove_node(&root);
    }
    for e in g.edge_ids() {
        let is_nesting = g.edge_by_id(&e).map(|l| l.nesting_edge).unwrap_or(false);
        if is_nesting {
            g.remove_edge_id(&e);
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn dfs(
    g: &mut LayoutGraph,
    root: &str,
    node_sep: usize,
    weight: f64,
    height: usize,
    depths: &BTreeMap<String, usize>,
    ids: &mut DummyIds,
    v: &str,
) {
    let children: Vec<String> = g.children(v).into_iter().map(str::to_string).collect();
    if children.is_empty() {
        if v != root {
            g.set_edge_with(
                root,
                v,
                EdgeLabel {
                    weight: 0.0,
                    minlen: node_sep,
                    ..Default::default()
                },
            );
        }
        return;
    }

    let top = ids.add(g, DummyKind::Border, NodeLabel::default(), "_bt");
    let bottom = ids.add(g, DummyKind::Border, NodeLabel::default(), "_bb");

    g.set_parent(top.clone(), v);
    if let Some(label) = g.node_mut(v) {
        label.border_top = Some(top.clone());
    }
    g.set_parent(bottom.clone(), v);
    if let Some(label) = g.node_mut(v) {
        label.border_bottom = Some(bottom.clone());
    }

    for child in children {
        dfs(g, root, node_sep, weight, height, depths, ids, &child);

        let child_node = g.node(&child).cloned().unwrap_or_default();
        let child_top = child_node
            .border_top
            .clone()
            .unwrap_or_else(|| child.clone());
        let child_bottom = child_node
            .border_bottom
            .clone()
            .unwrap_or_else(|| child.clone());
        let this_weight = if child_node.border_top.is_some() {
            weight
        } else {
            2.0 * weight
        };
        let minlen = if child_top != child_bottom {
            1
        } else {
            let depth = depths.get(v).copied().unwrap_or(1);
            height.saturating_sub(depth).saturating_add(1)
        };

        g.set_edge_with(
            top.clone(),
            child_top,
            EdgeLabel {
                weight: this_weight,
                minlen,
                nesting_edge: true,
                ..Default::default()
            },
        );
        g.set_edge_with(
            child_bottom,
            bottom.clone(),
            EdgeLabel {
                weight: this_weight,
                minlen,
                nesting_edge: true,
                ..Default::default()
            },
        );
    }

    if g.parent(v).is_none() {
        let depth = depths.get(v).copied().unwrap_or(1);
        g.set_edge_with(
            root,
            top,
            EdgeLabel {
                weight: 0.0,
                minlen: height + depth,
                nesting_edge: true,
                ..Default::default()
            },
        );
    }
}

fn tree_depths(g: &LayoutGraph) -> BTreeMap<String, usize> {
    fn walk(g: &LayoutGraph, v: &str, depth: usize, out: &mut BTreeMap<String, usize>) {
        for child in g.children(v) {
            walk(g, child, depth + 1, out);
        }
        out.insert(v.to_string(), depth);
    }

    let mut out = BTreeMap::new();
    for v in g.root_children() {
        walk(g, v, 1, &mut out);
    }
    out
}

fn sum_weights(g: &LayoutGraph) -> f64 {
    g.edges()
        .filter_map(|e| g.edge_by_id(e))
        .map(|l| l.weight)
        .sum()
}

/// The ranker requires a connected graph. Inputs whose components are not
/// already linked by nesting edges get tied to the root here.
fn connect_components(g: &mut LayoutGraph, root: &str, node_sep: usize) {
    let components = alg::components(g);
    if components.len() <= 1 {
        return;
    }
    for component in components {
        if component.iter().any(|v| v == root) {
            continue;
        }
        let Some(v) = component.first() else {
            continue;
        };
        if g.edge(root, v, None).is_some() {
            continue;
        }
        g.set_edge_with(
            root.to_string(),
            v.clone(),
            EdgeLabel {
                weight: 0.0,
                minlen: node_sep.max(1),
                nesting_edge: true,
                ..Default::default()
            },
        );
    }
}
