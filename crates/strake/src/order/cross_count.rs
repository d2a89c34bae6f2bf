//! Weighted bilayer crossing count.
//!
//! For each pair of adjacent ranks, edge endpoints are walked in north order
//! and their south positions fed into an accumulator tree; each insertion
//! adds the weight already accumulated to its right, which is exactly the
//! weighted inversion count.

use super::EdgeWeight;
use crate::graph::Graph;
use crate::NodeLabel;
use rustc_hash::FxHashMap;

pub fn cross_count<E, G>(g: &Graph<NodeLabel, E, G>, layering: &[Vec<String>]) -> f64
where
    E: Default + EdgeWeight,
    G: Default,
{
    let mut cc = 0.0;
    for i in 1..layering.len() {
        cc += two_layer_cross_count(g, &layering[i - 1], &layering[i]);
    }
    cc
}

fn two_layer_cross_count<E, G>(g: &Graph<NodeLabel, E, G>, north: &[String], south: &[String]) -> f64
where
    E: Default + EdgeWeight,
    G: Default,
{
    if south.is_empty() {
        return 0.0;
    }

    let mut south_pos: FxHashMap<&str, usize> = FxHashMap::default();
    for (i, v) in south.iter().enumerate() {
        south_pos.insert(v.as_str(), i);
    }

    struct SouthEntry {
        pos: usize,
        weight: f64,
    }

    let mut south_entries: Vec<SouthEntry> = Vec::new();
    for v in north {
        let mut entries: Vec<SouthEntry> = g
            .out_edges(v, None)
            .into_iter()
            .filter_map(|e| {
                let pos = *south_pos.get(e.head.as_str())?;
                let weight = g.edge_by_id(&e).map(|l| l.weight()).unwrap_or(0.0);
                Some(SouthEntry { pos, weight })
            })
            .collect();
        entries.sort_by_key(|e| e.pos);
        south_entries.extend(entries);
    }

    let mut first_index: usize = 1;
    while first_index < south.len() {
        first_index <<= 1;
    }
    let tree_size = 2 * first_index - 1;
    first_index -= 1;
    let mut tree: Vec<f64> = vec![0.0; tree_size];

    let mut cc = 0.0;
    for entry in south_entries {
        let mut index = entry.pos + first_index;
        tree[index] += entry.weight;
        let mut weight_sum = 0.0;
        while index > 0 {
            if index % 2 == 1 {
                weight_sum += tree[index + 1];
            }
            index = (index - 1) >> 1;
            tree[index] += entry.weight;
        }
        cc += entry.weight * weight_sum;
    }

    cc
}
