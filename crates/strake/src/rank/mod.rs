//! Rank assignment.
//!
//! Every node gets an integer layer such that each edge spans at least its
//! `minlen`. Three algorithms are selectable through the graph label:
//! `longest-path` (cheap, wide), `tight-tree` (longest-path seed plus a tight
//! spanning tree), and `network-simplex` (the default, minimizing total
//! weighted edge length). Unknown ranker names are rejected at the driver
//! boundary before this module runs.

pub mod feasible_tree;
pub mod network_simplex;

use crate::graph::EdgeId;
use crate::LayoutGraph;
use rustc_hash::FxHashMap;

pub fn rank(g: &mut LayoutGraph) {
    match g.graph().ranker.as_deref() {
        Some("longest-path") => longest_path(g),
        Some("tight-tree") => {
            longest_path(g);
            let _ = feasible_tree::feasible_tree(g);
        }
        _ => network_simplex::network_simplex(g),
    }
}

/// Seeds ranks by the longest downstream path: a node's rank is the minimum
/// over its out-edges of `rank(head) - minlen`, sinks at zero. Produces
/// negative ranks; callers normalize afterwards.
pub fn longest_path(g: &mut LayoutGraph) {
    fn dfs(v: &str, g: &mut LayoutGraph, visited: &mut FxHashMap<String, i32>) -> i32 {
        if let Some(&rank) = visited.get(v) {
            return rank;
        }

        let mut rank: Option<i32> = None;
        for e in g.out_edges(v, None) {
            let minlen = g.edge_by_id(&e).map(|l| l.minlen as i32).unwrap_or(1);
            let candidate = dfs(&e.head, g, visited) - minlen;
            rank = Some(match rank {
                Some(current) => current.min(candidate),
                None => candidate,
            });
        }

        let rank = rank.unwrap_or(0);
        if let Some(label) = g.node_mut(v) {
            label.rank = Some(rank);
        }
        visited.insert(v.to_string(), rank);
        rank
    }

    let sources: Vec<String> = g.sources().into_iter().map(str::to_string).collect();
    let mut visited: FxHashMap<String, i32> = FxHashMap::default();
    for v in sources {
        dfs(&v, g, &mut visited);
    }
}

/// Rank headroom of an edge: how much longer it is than it has to be.
pub fn slack(g: &LayoutGraph, e: &EdgeId) -> i32 {
    let head_rank = g.node(&e.head).and_then(|n| n.rank).unwrap_or(0);
    let tail_rank = g.node(&e.tail).and_then(|n| n.rank).unwrap_or(0);
    let minlen = g.edge_by_id(e).map(|l| l.minlen as i32).unwrap_or(1);
    head_rank - tail_rank - minlen
}

/// Labels of the spanning tree the network simplex maintains.
pub mod tree {
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct TreeNodeLabel {
        pub low: i32,
        pub lim: i32,
        pub parent: Option<String>,
    }

    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct TreeEdgeLabel {
        pub cutvalue: f64,
    }
}
