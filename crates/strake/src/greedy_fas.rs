//! Greedy feedback arc set selection.
//!
//! Nodes live in buckets keyed by out-weight minus in-weight; sinks and
//! sources drain first, then the node with the largest delta is removed and
//! its surviving in-edges join the arc set. Parallel edges are aggregated up
//! front and expanded back to concrete edge ids at the end.

use crate::graph::{EdgeId, Graph};
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;

pub fn greedy_fas<N, E, G>(g: &Graph<N, E, G>) -> Vec<EdgeId>
where
    N: Default,
    E: Default,
    G: Default,
{
    greedy_fas_weighted(g, |_| 1)
}

pub fn greedy_fas_weighted<N, E, G>(
    g: &Graph<N, E, G>,
    weight_fn: impl Fn(&E) -> i64,
) -> Vec<EdgeId>
where
    N: Default,
    E: Default,
    G: Default,
{
    if g.node_count() <= 1 {
        return Vec::new();
    }

    let node_ids = g.node_ids();
    let mut in_weight: FxHashMap<String, i64> = FxHashMap::default();
    let mut out_weight: FxHashMap<String, i64> = FxHashMap::default();
    for v in &node_ids {
        in_weight.insert(v.clone(), 0);
        out_weight.insert(v.clone(), 0);
    }

    // Aggregate parallel edges; adjacency keeps first-occurrence order so the
    // bucket queues behave identically from run to run.
    let mut edge_weight: FxHashMap<(String, String), i64> = FxHashMap::default();
    let mut edge_order: Vec<(String, String)> = Vec::new();
    let mut max_in: i64 = 0;
    let mut max_out: i64 = 0;

    for e in g.edges() {
        let w = g.edge_by_id(e).map(&weight_fn).unwrap_or(1);
        let key = (e.tail.clone(), e.head.clone());
        match edge_weight.entry(key.clone()) {
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(w);
                edge_order.push(key.clone());
            }
            std::collections::hash_map::Entry::Occupied(mut slot) => {
                *slot.get_mut() += w;
            }
        }
        let out = out_weight.entry(key.0).or_insert(0);
        *out += w;
        max_out = max_out.max(*out);
        let inw = in_weight.entry(key.1).or_insert(0);
        *inw += w;
        max_in = max_in.max(*inw);
    }

    let bucket_len = (max_out + max_in + 3).max(3) as usize;
    let zero_idx = max_in + 1;
    let mut buckets: Vec<VecDeque<String>> = (0..bucket_len).map(|_| VecDeque::new()).collect();
    let mut bucket_of: FxHashMap<String, usize> = FxHashMap::default();

    for v in &node_ids {
        assign_bucket(v, &in_weight, &out_weight, &mut buckets, zero_idx, &mut bucket_of);
    }

    let mut in_edges: FxHashMap<String, Vec<(String, i64)>> = FxHashMap::default();
    let mut out_edges: FxHashMap<String, Vec<(String, i64)>> = FxHashMap::default();
    for (tail, head) in &edge_order {
        let w = edge_weight
            .get(&(tail.clone(), head.clone()))
            .copied()
            .unwrap_or(0);
        out_edges
            .entry(tail.clone())
            .or_default()
            .push((head.clone(), w));
        in_edges
            .entry(head.clone())
            .or_default()
            .push((tail.clone(), w));
    }

    let mut alive: FxHashSet<String> = node_ids.iter().cloned().collect();
    let mut selected: Vec<(String, String)> = Vec::new();

    while !alive.is_empty() {
        // Sinks first.
        while let Some(v) = pop_bucket(&mut buckets[0], &alive) {
            remove_node(
                &v, &mut alive, &mut buckets, zero_idx, &mut bucket_of, &mut in_weight,
                &mut out_weight, &in_edges, &out_edges, None,
            );
        }

        // Then sources.
        let last = buckets.len() - 1;
        while let Some(v) = pop_bucket(&mut buckets[last], &alive) {
            remove_node(
                &v, &mut alive, &mut buckets, zero_idx, &mut bucket_of, &mut in_weight,
                &mut out_weight, &in_edges, &out_edges, None,
            );
        }

        if alive.is_empty() {
            break;
        }

        let mut picked: Option<String> = None;
        for i in (1..last).rev() {
            if let Some(v) = pop_bucket(&mut buckets[i], &alive) {
                picked = Some(v);
                break;
            }
        }

        let Some(v) = picked else {
            // Every live node sits in an extreme bucket already drained this
            // round; fall back to insertion order so the loop always makes
            // progress.
            let Some(v) = node_ids.iter().find(|id| alive.contains(*id)).cloned() else {
                break;
            };
            remove_node(
                &v, &mut alive, &mut buckets, zero_idx, &mut bucket_of, &mut in_weight,
                &mut out_weight, &in_edges, &out_edges, None,
            );
            continue;
        };

        let mut preds: Vec<(String, String)> = Vec::new();
        remove_node(
            &v, &mut alive, &mut buckets, zero_idx, &mut bucket_of, &mut in_weight,
            &mut out_weight, &in_edges, &out_edges, Some(&mut preds),
        );
        selected.extend(preds);
    }

    // Expand aggregated pairs back to the concrete multi-edges.
    let mut out: Vec<EdgeId> = Vec::new();
    for (tail, head) in selected {
        out.extend(g.out_edges(&tail, Some(&head)));
    }
    out
}

fn pop_bucket(bucket: &mut VecDeque<String>, alive: &FxHashSet<String>) -> Option<String> {
    while let Some(v) = bucket.pop_back() {
        if alive.contains(&v) {
            return Some(v);
        }
    }
    None
}

fn assign_bucket(
    v: &str,
    in_weight: &FxHashMap<String, i64>,
    out_weight: &FxHashMap<String, i64>,
    buckets: &mut [VecDeque<String>],
    zero_idx: i64,
    bucket_of: &mut FxHashMap<String, usize>,
) {
    if let Some(prev) = bucket_of.get(v).copied() {
        if let Some(pos) = buckets[prev].iter().position(|x| x == v) {
            buckets[prev].remove(pos);
        }
    }

    let in_v = in_weight.get(v).copied().unwrap_or(0);
    let out_v = out_weight.get(v).copied().unwrap_or(0);
    let idx = if out_v == 0 {
        0
    } else if in_v == 0 {
        buckets.len() - 1
    } else {
        (out_v - in_v + zero_idx).clamp(0, (buckets.len() - 1) as i64) as usize
    };

    buckets[idx].push_front(v.to_string());
    bucket_of.insert(v.to_string(), idx);
}

#[allow(clippy::too_many_arguments)]
fn remove_node(
    v: &str,
    alive: &mut FxHashSet<String>,
    buckets: &mut [VecDeque<String>],
    zero_idx: i64,
    bucket_of: &mut FxHashMap<String, usize>,
    in_weight: &mut FxHashMap<String, i64>,
    out_weight: &mut FxHashMap<String, i64>,
    in_edges: &FxHashMap<String, Vec<(String, i64)>>,
    out_edges: &FxHashMap<String, Vec<(String, i64)>>,
    collect_predecessors: Option<&mut Vec<(String, String)>>,
) {
    if !alive.remove(v) {
        return;
    }

    if let Some(preds) = collect_predecessors {
        if let Some(ins) = in_edges.get(v) {
            for (u, _) in ins {
                if alive.contains(u) {
                    preds.push((u.clone(), v.to_string()));
                }
            }
        }
    }

    if let Some(ins) = in_edges.get(v) {
        for (u, w) in ins {
            if !alive.contains(u) {
                continue;
            }
            if let Some(out) = out_weight.get_mut(u) {
                *out -= *w;
            }
            assign_bucket(u, in_weight, out_weight, buckets, zero_idx, bucket_of);
        }
    }
    if let Some(outs) = out_edges.get(v) {
        for (u, w) in outs {
            if !alive.contains(u) {
                continue;
            }
            if let Some(inw) = in_weight.get_mut(u) {
                *inw -= *w;
            }
            assign_bucket(u, in_weight, out_weight, buckets, zero_idx, bucket_of);
        }
    }

    in_weight.remove(v);
    out_weight.remove(v);
    bucket_of.remove(v);
}
