//! Network-simplex ranker.
//!
//! Starts from longest-path ranks tightened into a spanning tree, then
//! repeatedly exchanges a tree edge with negative cut value for the non-tree
//! edge of minimum slack across the corresponding cut, until no negative cut
//! value remains. Minimizes the sum of `weight * length` over all edges.

use super::feasible_tree::{TightTree, feasible_tree};
use super::longest_path;
use crate::graph::{EdgeId, alg};
use crate::{LayoutGraph, util};
use rustc_hash::{FxHashMap, FxHashSet};

pub fn network_simplex(g: &mut LayoutGraph) {
    let mut simplified = util::simplify(g);
    longest_path(&mut simplified);
    let mut t = feasible_tree(&mut simplified);
    init_low_lim_values(&mut t, None);
    init_cut_values(&mut t, &simplified);

    while let Some(e) = leave_edge(&t) {
        let f = enter_edge(&t, &simplified, &e);
        exchange_edges(&mut t, &mut simplified, &e, &f);
    }

    for v in g.node_ids() {
        if let Some(rank) = simplified.node(&v).and_then(|n| n.rank) {
            if let Some(label) = g.node_mut(&v) {
                label.rank = Some(rank);
            }
        }
    }
}

/// Assigns postorder limits (`lim`) and subtree minima (`low`) so subtree
/// membership reduces to a range check on `lim`.
pub fn init_low_lim_values(t: &mut TightTree, root: Option<&str>) {
    let Some(root) = root
        .map(str::to_string)
        .or_else(|| t.nodes().next().map(str::to_string))
    else {
        return;
    };
    let mut visited: FxHashSet<String> = FxHashSet::default();
    dfs_low_lim(t, &mut visited, 1, &root, None);
}

fn dfs_low_lim(
    t: &mut TightTree,
    visited: &mut FxHashSet<String>,
    next_lim: i32,
    v: &str,
    parent: Option<&str>,
) -> i32 {
    let low = next_lim;
    visited.insert(v.to_string());

    let neighbors: Vec<String> = t.neighbors(v).into_iter().map(str::to_string).collect();
    let mut next_lim = next_lim;
    for w in neighbors {
        if !visited.contains(&w) {
            next_lim = dfs_low_lim(t, visited, next_lim, &w, Some(v));
        }
    }

    if let Some(label) = t.node_mut(v) {
        label.low = low;
        label.lim = next_lim;
        label.parent = parent.map(str::to_string);
    }
    next_lim + 1
}

pub fn init_cut_values(t: &mut TightTree, g: &LayoutGraph) {
    let mut vs = {
        let roots: Vec<&str> = t.nodes().collect();
        alg::postorder(t, &roots)
    };
    // The last postorder entry is the tree root, which has no parent edge.
    vs.pop();
    for v in vs {
        assign_cut_value(t, g, &v);
    }
}

fn assign_cut_value(t: &mut TightTree, g: &LayoutGraph, child: &str) {
    let Some(parent) = t.node(child).and_then(|l| l.parent.clone()) else {
        return;
    };
    let cutvalue = calc_cut_value(t, g, child);
    if let Some(edge) = t.edge_mut(child, &parent, None) {
        edge.cutvalue = cutvalue;
    }
}

/// Cut value of the tree edge between `child` and its parent: the net weight
/// of graph edges crossing the cut in the tail-to-head direction, folding in
/// the already-computed cut values of `child`'s other tree edges.
pub fn calc_cut_value(t: &TightTree, g: &LayoutGraph, child: &str) -> f64 {
    let Some(parent) = t.node(child).and_then(|l| l.parent.clone()) else {
        return 0.0;
    };

    // True if the graph edge between child and parent points child -> parent.
    let mut child_is_tail = true;
    let mut graph_edge = g.edge(child, &parent, None);
    if graph_edge.is_none() {
        child_is_tail = false;
        graph_edge = g.edge(&parent, child, None);
    }
    let Some(graph_edge) = graph_edge else {
        return 0.0;
    };

    let mut cut_value = graph_edge.weight;

    for e in g.node_edges(child) {
        let is_out = e.tail == child;
        let other = if is_out {
            e.head.as_str()
        } else {
            e.tail.as_str()
        };
        if other == parent {
            continue;
        }

        let Some(label) = g.edge_by_id(&e) else {
            continue;
        };
        let points_to_head = is_out == child_is_tail;
        cut_value += if points_to_head {
            label.weight
        } else {
            -label.weight
        };

        if t.has_edge(child, other, None) {
            let other_cut_value = t
                .edge(child, other, None)
                .map(|l| l.cutvalue)
                .unwrap_or(0.0);
            cut_value += if points_to_head {
                -other_cut_value
            } else {
                other_cut_value
            };
        }
    }

    cut_value
}

pub fn leave_edge(t: &TightTree) -> Option<EdgeId> {
    t.edges()
        .find(|e| t.edge_by_id(e).map(|l| l.cutvalue < 0.0).unwrap_or(false))
        .cloned()
}

pub fn enter_edge(t: &TightTree, g: &LayoutGraph, edge: &EdgeId) -> EdgeId {
    // Orient the leaving edge the way the underlying graph edge points.
    let (tail, head) = if g.has_edge(&edge.tail, &edge.head, None) {
        (edge.tail.as_str(), edge.head.as_str())
    } else {
        (edge.head.as_str(), edge.tail.as_str())
    };

    let mut spans: FxHashMap<&str, (i32, i32)> = FxHashMap::default();
    for id in t.nodes() {
        if let Some(label) = t.node(id) {
            spans.insert(id, (label.low, label.lim));
        }
    }

    let Some(&(tail_low, tail_lim)) = spans.get(tail) else {
        return edge.clone();
    };
    let Some(&(head_low, head_lim)) = spans.get(head) else {
        return edge.clone();
    };

    // The candidate set is every edge crossing the cut in the opposite
    // direction of the leaving edge. `flip` marks which endpoint roots the
    // smaller subtree.
    let ((tree_low, tree_lim), flip) = if tail_lim > head_lim {
        ((head_low, head_lim), true)
    } else {
        ((tail_low, tail_lim), false)
    };

    let mut best: Option<(i32, EdgeId)> = None;
    for e in g.edges() {
        let Some(&(_, e_tail_lim)) = spans.get(e.tail.as_str()) else {
            continue;
        };
        let Some(&(_, e_head_lim)) = spans.get(e.head.as_str()) else {
            continue;
        };
        let tail_in_subtree = tree_low <= e_tail_lim && e_tail_lim <= tree_lim;
        let head_in_subtree = tree_low <= e_head_lim && e_head_lim <= tree_lim;

        if flip == tail_in_subtree && flip != head_in_subtree {
            let s = super::slack(g, e);
            match &best {
                Some((best_slack, _)) if s >= *best_slack => {}
                _ => best = Some((s, e.clone())),
            }
        }
    }

    best.map(|(_, e)| e).unwrap_or_else(|| edge.clone())
}

pub fn exchange_edges(t: &mut TightTree, g: &mut LayoutGraph, e: &EdgeId, f: &EdgeId) {
    t.remove_edge(&e.tail, &e.head, None);
    t.set_edge(f.tail.clone(), f.head.clone());
    init_low_lim_values(t, None);
    init_cut_values(t, g);
    update_ranks(t, g);
}

fn update_ranks(t: &TightTree, g: &mut LayoutGraph) {
    let Some(root) = t
        .nodes()
        .find(|v| t.node(v).map(|l| l.parent.is_none()).unwrap_or(false))
        .or_else(|| t.nodes().next())
    else {
        return;
    };

    let vs = alg::preorder(t, &[root]);
    for v in vs.into_iter().skip(1) {
        let Some(parent) = t.node(&v).and_then(|l| l.parent.clone()) else {
            continue;
        };

        let (minlen, flipped) = match g.edge(&v, &parent, None) {
            Some(e) => (e.minlen as i32, false),
            None => {
                let Some(e) = g.edge(&parent, &v, None) else {
                    continue;
                };
                (e.minlen as i32, true)
            }
        };

        let Some(parent_rank) = g.node(&parent).and_then(|n| n.rank) else {
            continue;
        };
        let rank = if flipped {
            parent_rank + minlen
        } else {
            parent_rank - minlen
        };
        if let Some(node) = g.node_mut(&v) {
            node.rank = Some(rank);
        }
    }
}
