//! Barycenter computation and constraint-conflict resolution.

use super::EdgeWeight;
use crate::graph::Graph;
use crate::NodeLabel;
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct BarycenterEntry {
    pub v: String,
    pub barycenter: Option<f64>,
    pub weight: Option<f64>,
}

/// Weighted mean position of each movable node's fixed-rank neighbours.
/// Nodes without neighbours get no barycenter and keep their position
/// during sorting.
pub fn barycenter<E, G>(g: &Graph<NodeLabel, E, G>, movable: &[String]) -> Vec<BarycenterEntry>
where
    E: Default + EdgeWeight,
    G: Default,
{
    movable
        .iter()
        .map(|v| {
            let in_edges = g.in_edges(v, None);
            if in_edges.is_empty() {
                return BarycenterEntry {
                    v: v.clone(),
                    barycenter: None,
                    weight: None,
                };
            }

            let mut sum = 0.0;
            let mut weight = 0.0;
            for e in in_edges {
                let edge_weight = g.edge_by_id(&e).map(|l| l.weight()).unwrap_or(0.0);
                let u_order = g
                    .node(&e.tail)
                    .and_then(|n| n.order)
                    .map(|o| o as f64)
                    .unwrap_or(0.0);
                sum += edge_weight * u_order;
                weight += edge_weight;
            }

            BarycenterEntry {
                v: v.clone(),
                barycenter: Some(sum / weight),
                weight: Some(weight),
            }
        })
        .collect()
}

#[derive(Debug, Clone)]
struct ConflictEntry {
    indegree: usize,
    ins: Vec<usize>,
    outs: Vec<usize>,
    vs: Vec<String>,
    i: usize,
    barycenter: Option<f64>,
    weight: Option<f64>,
    merged: bool,
}

/// Merges entries that a constraint edge would otherwise force out of
/// barycenter order. Entries are processed as a topological walk over the
/// constraint graph; a constrained pair whose barycenters disagree with the
/// constraint collapses into one entry with the combined weight.
pub fn resolve_conflicts<CN, CE, CG>(
    entries: &[BarycenterEntry],
    cg: &Graph<CN, CE, CG>,
) -> Vec<super::SortEntry>
where
    CN: Default,
    CE: Default,
    CG: Default,
{
    let mut mapped: Vec<ConflictEntry> = Vec::with_capacity(entries.len());
    let mut index_of: FxHashMap<&str, usize> = FxHashMap::default();
    for (i, entry) in entries.iter().enumerate() {
        index_of.insert(entry.v.as_str(), i);
        mapped.push(ConflictEntry {
            indegree: 0,
            ins: Vec::new(),
            outs: Vec::new(),
            vs: vec![entry.v.clone()],
            i,
            barycenter: entry.barycenter,
            weight: entry.weight,
            merged: false,
        });
    }

    for e in cg.edges() {
        let (Some(&tail), Some(&head)) = (
            index_of.get(e.tail.as_str()),
            index_of.get(e.head.as_str()),
        ) else {
            continue;
        };
        mapped[head].indegree += 1;
        mapped[tail].outs.push(head);
    }

    let mut source_set: Vec<usize> = (0..mapped.len())
        .filter(|&i| mapped[i].indegree == 0)
        .collect();

    let mut processed: Vec<usize> = Vec::new();
    while let Some(v) = source_set.pop() {
        processed.push(v);

        let ins = mapped[v].ins.clone();
        for u in ins.into_iter().rev() {
            if mapped[u].merged {
                continue;
            }
            let should_merge = match (mapped[u].barycenter, mapped[v].barycenter) {
                (None, _) | (_, None) => true,
                (Some(ub), Some(vb)) => ub >= vb,
            };
            if should_merge {
                merge_entries(&mut mapped, v, u);
            }
        }

        let outs = mapped[v].outs.clone();
        for w in outs {
            mapped[w].ins.push(v);
            mapped[w].indegree -= 1;
            if mapped[w].indegree == 0 {
                source_set.push(w);
            }
        }
    }

    processed
        .into_iter()
        .filter(|&i| !mapped[i].merged)
        .map(|i| {
            let entry = &mapped[i];
            super::SortEntry {
                vs: entry.vs.clone(),
                i: entry.i,
                barycenter: entry.barycenter,
                weight: entry.weight,
            }
        })
        .collect()
}

fn merge_entries(mapped: &mut [ConflictEntry], target: usize, source: usize) {
    let mut sum = 0.0;
    let mut weight = 0.0;
    if let (Some(b), Some(w)) = (mapped[target].barycenter, mapped[target].weight) {
        if w != 0.0 {
            sum += b * w;
            weight += w;
        }
    }
    if let (Some(b), Some(w)) = (mapped[source].barycenter, mapped[source].weight) {
        if w != 0.0 {
            sum += b * w;
            weight += w;
        }
    }

    let source_vs = mapped[source].vs.clone();
    let source_i = mapped[source].i;

    let target_entry = &mut mapped[target];
    target_entry.vs = source_vs
        .into_iter()
        .chain(target_entry.vs.drain(..))
        .collect();
    if weight != 0.0 {
        target_entry.barycenter = Some(sum / weight);
        target_entry.weight = Some(weight);
    }
    target_entry.i = target_entry.i.min(source_i);

    mapped[source].merged = true;
}
