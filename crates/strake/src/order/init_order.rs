//! Initial per-rank ordering.
//!
//! Leaf nodes are visited in rank order (ties broken by insertion order) and
//! each DFS appends the nodes it reaches to their rank's layer, so connected
//! nodes start out near each other.

use crate::graph::Graph;
use crate::NodeLabel;
use rustc_hash::FxHashMap;

pub fn init_order<E, G>(g: &Graph<NodeLabel, E, G>) -> Vec<Vec<String>>
where
    E: Default,
    G: Default,
{
    let leaves: Vec<String> = g
        .nodes()
        .filter(|v| g.children(v).is_empty())
        .map(str::to_string)
        .collect();

    let mut max_rank = i32::MIN;
    for v in &leaves {
        if let Some(rank) = g.node(v).and_then(|n| n.rank) {
            max_rank = max_rank.max(rank);
        }
    }
    if max_rank == i32::MIN {
        return Vec::new();
    }

    let mut layers: Vec<Vec<String>> = vec![Vec::new(); (max_rank + 1).max(0) as usize];
    let mut visited: FxHashMap<String, bool> = FxHashMap::default();

    fn dfs<E, G>(
        g: &Graph<NodeLabel, E, G>,
        v: &str,
        visited: &mut FxHashMap<String, bool>,
        layers: &mut [Vec<String>],
    ) where
        E: Default,
        G: Default,
    {
        if visited.get(v).copied().unwrap_or(false) {
            return;
        }
        visited.insert(v.to_string(), true);

        let Some(rank) = g.node(v).and_then(|n| n.rank) else {
            return;
        };
        if let Some(layer) = layers.get_mut(rank.max(0) as usize) {
            layer.push(v.to_string());
        }

        for w in g.successors(v) {
            dfs(g, w, visited, layers);
        }
    }

    // Stable rank sort: insertion order is the tie-break, so symmetric
    // graphs do not mirror between runs.
    let mut insertion_idx: FxHashMap<&str, usize> = FxHashMap::default();
    for (idx, v) in leaves.iter().enumerate() {
        insertion_idx.insert(v.as_str(), idx);
    }
    let mut ordered = leaves.clone();
    ordered.sort_by_key(|v| {
        let rank = g.node(v).and_then(|n| n.rank).unwrap_or(i32::MAX);
        let idx = insertion_idx.get(v.as_str()).copied().unwrap_or(usize::MAX);
        (rank, idx)
    });

    for v in ordered {
        dfs(g, &v, &mut visited, &mut layers);
    }

    layers
}
