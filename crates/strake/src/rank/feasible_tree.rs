//! Tight spanning tree construction.
//!
//! Grows a tree of tight edges (slack zero), repeatedly shifting the ranks of
//! the tree side by the minimum slack of any edge crossing the cut until the
//! tree spans the graph. The resulting undirected tree initializes the
//! network simplex.

use super::tree::{TreeEdgeLabel, TreeNodeLabel};
use super::slack;
use crate::graph::{EdgeId, Graph, GraphOptions};
use crate::LayoutGraph;

pub type TightTree = Graph<TreeNodeLabel, TreeEdgeLabel, ()>;

pub fn feasible_tree(g: &mut LayoutGraph) -> TightTree {
    let mut t: TightTree = Graph::new(GraphOptions {
        directed: false,
        ..Default::default()
    });

    let Some(start) = g.nodes().next().map(str::to_string) else {
        return t;
    };
    let size = g.node_count();
    t.set_node(start, TreeNodeLabel::default());

    while tight_tree(&mut t, g) < size {
        match find_min_slack_edge(g, &t) {
            Some(e) => {
                let delta = if t.has_node(&e.tail) {
                    slack(g, &e)
                } else {
                    -slack(g, &e)
                };
                shift_ranks(&t, g, delta);
            }
            None => {
                // No edge crosses the cut: the graph is disconnected. Seed a
                // new component root and keep going, producing a forest.
                let Some(next) = g.nodes().find(|v| !t.has_node(v)).map(str::to_string) else {
                    break;
                };
                t.set_node(next, TreeNodeLabel::default());
            }
        }
    }

    t
}

/// Pulls every node reachable over tight edges into the tree; returns the
/// tree size.
fn tight_tree(t: &mut TightTree, g: &LayoutGraph) -> usize {
    let roots: Vec<String> = t.node_ids();
    for root in roots {
        let mut stack: Vec<String> = vec![root];
        while let Some(v) = stack.pop() {
            for e in g.node_edges(&v) {
                let other = if v == e.tail {
                    e.head.as_str()
                } else {
                    e.tail.as_str()
                };
                if !t.has_node(other) && slack(g, &e) == 0 {
                    let other = other.to_string();
                    t.set_node(other.clone(), TreeNodeLabel::default());
                    t.set_edge(v.clone(), other.clone());
                    stack.push(other);
                }
            }
        }
    }
    t.node_count()
}

fn find_min_slack_edge(g: &LayoutGraph, t: &TightTree) -> Option<EdgeId> {
    let mut best: Option<(i32, EdgeId)> = None;
    for e in g.edges() {
        if t.has_node(&e.tail) == t.has_node(&e.head) {
            continue;
        }
        let s = slack(g, e);
        match &best {
            Some((best_slack, _)) if s >= *best_slack => {}
            _ => best = Some((s, e.clone())),
        }
    }
    best.map(|(_, e)| e)
}

fn shift_ranks(t: &TightTree, g: &mut LayoutGraph, delta: i32) {
    for v in t.node_ids() {
        if let Some(label) = g.node_mut(&v) {
            if let Some(rank) = label.rank {
                label.rank = Some(rank + delta);
            }
        }
    }
}
