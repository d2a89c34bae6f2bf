//! Cycle breaking: reverse a feedback arc set so ranking sees a DAG.
//!
//! The default strategy collects back edges from a DFS; `acyclicer = greedy`
//! selects the weighted greedy strategy instead. Reversed edges keep their
//! original multi-edge identity through `forward_name` and are flipped back
//! by [`undo`] at the end of the pipeline.

use crate::graph::EdgeId;
use crate::{LayoutGraph, greedy_fas};
use rustc_hash::FxHashSet;

pub fn run(g: &mut LayoutGraph) {
    let fas = match g.graph().acyclicer.as_deref() {
        Some("greedy") => greedy_fas::greedy_fas_weighted(g, |label| {
            if label.weight.is_finite() {
                label.weight.round() as i64
            } else {
                0
            }
        }),
        _ => dfs_fas(g),
    };

    for e in fas.into_iter().filter(|e| e.tail != e.head) {
        let Some(mut label) = g.edge_by_id(&e).cloned() else {
            continue;
        };
        g.remove_edge_id(&e);

        label.forward_name = e.name.clone();
        label.reversed = true;

        let name = unique_reverse_name(g, &e.head, &e.tail);
        g.set_edge_named(e.head, e.tail, Some(name), Some(label));
    }
}

pub fn undo(g: &mut LayoutGraph) {
    for e in g.edge_ids() {
        let Some(label) = g.edge_by_id(&e).cloned() else {
            continue;
        };
        if !label.reversed {
            continue;
        }
        g.remove_edge_id(&e);

        let mut label = label;
        let forward_name = label.forward_name.take();
        label.reversed = false;
        g.set_edge_named(e.head, e.tail, forward_name, Some(label));
    }
}

fn unique_reverse_name(g: &LayoutGraph, tail: &str, head: &str) -> String {
    for i in 1usize.. {
        let candidate = format!("rev{i}");
        if !g.has_edge(tail, head, Some(&candidate)) {
            return candidate;
        }
    }
    unreachable!()
}

fn dfs_fas(g: &LayoutGraph) -> Vec<EdgeId> {
    let mut fas: Vec<EdgeId> = Vec::new();
    let mut visited: FxHashSet<String> = FxHashSet::default();
    let mut stack: FxHashSet<String> = FxHashSet::default();

    fn dfs(
        g: &LayoutGraph,
        v: &str,
        visited: &mut FxHashSet<String>,
        stack: &mut FxHashSet<String>,
        fas: &mut Vec<EdgeId>,
    ) {
        if !visited.insert(v.to_string()) {
            return;
        }
        stack.insert(v.to_string());
        for e in g.out_edges(v, None) {
            if e.tail == e.head {
                continue;
            }
            if stack.contains(&e.head) {
                fas.push(e);
            } else {
                dfs(g, &e.head, visited, stack, fas);
            }
        }
        stack.remove(v);
    }

    for v in g.node_ids() {
        dfs(g, &v, &mut visited, &mut stack, &mut fas);
    }
    fas
}
