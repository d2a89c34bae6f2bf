//! Barycenter sorting, including recursive compound-subgraph sorting.

use super::{BarycenterEntry, EdgeWeight, barycenter, resolve_conflicts};
use crate::graph::Graph;
use crate::NodeLabel;
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct SortEntry {
    pub vs: Vec<String>,
    pub i: usize,
    pub barycenter: Option<f64>,
    pub weight: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SortResult {
    pub vs: Vec<String>,
    pub barycenter: Option<f64>,
    pub weight: Option<f64>,
}

/// Orders entries by barycenter (ties by original index, inverted when
/// `bias_right`). Entries without a barycenter keep their original index,
/// interleaved between the sorted ones.
pub fn sort(entries: &[SortEntry], bias_right: bool) -> SortResult {
    let mut sortable: Vec<SortEntry> = Vec::new();
    let mut unsortable: Vec<SortEntry> = Vec::new();
    for entry in entries {
        if entry.barycenter.is_some() {
            sortable.push(entry.clone());
        } else {
            unsortable.push(entry.clone());
        }
    }

    unsortable.sort_by(|a, b| b.i.cmp(&a.i));

    sortable.sort_by(|a, b| {
        let a_bc = a.barycenter.unwrap_or(0.0);
        let b_bc = b.barycenter.unwrap_or(0.0);
        if a_bc < b_bc {
            std::cmp::Ordering::Less
        } else if a_bc > b_bc {
            std::cmp::Ordering::Greater
        } else if bias_right {
            b.i.cmp(&a.i)
        } else {
            a.i.cmp(&b.i)
        }
    });

    let mut parts: Vec<Vec<String>> = Vec::new();
    let mut sum = 0.0;
    let mut weight = 0.0;
    let mut index = 0usize;

    fn consume_unsortable(
        parts: &mut Vec<Vec<String>>,
        unsortable: &mut Vec<SortEntry>,
        mut index: usize,
    ) -> usize {
        while let Some(last) = unsortable.last() {
            if last.i > index {
                break;
            }
            let Some(last) = unsortable.pop() else {
                break;
            };
            parts.push(last.vs);
            index += 1;
        }
        index
    }

    index = consume_unsortable(&mut parts, &mut unsortable, index);

    for entry in sortable {
        index += entry.vs.len();
        parts.push(entry.vs.clone());
        if let (Some(bc), Some(w)) = (entry.barycenter, entry.weight) {
            sum += bc * w;
            weight += w;
        }
        index = consume_unsortable(&mut parts, &mut unsortable, index);
    }

    let vs: Vec<String> = parts.into_iter().flatten().collect();
    if weight != 0.0 {
        SortResult {
            vs,
            barycenter: Some(sum / weight),
            weight: Some(weight),
        }
    } else {
        SortResult {
            vs,
            barycenter: None,
            weight: None,
        }
    }
}

/// Sorts the children of `v` in a layer graph, recursing into compound
/// children, and keeps `v`'s border segments at the outside.
pub fn sort_subgraph<E, G, CN, CE, CG>(
    g: &Graph<NodeLabel, E, G>,
    v: &str,
    cg: &Graph<CN, CE, CG>,
    bias_right: bool,
) -> SortResult
where
    E: Default + EdgeWeight,
    G: Default,
    CN: Default,
    CE: Default,
    CG: Default,
{
    let mut movable: Vec<String> = g.children(v).into_iter().map(str::to_string).collect();

    let (border_left, border_right) = g.node(v).map_or((None, None), |node| {
        (
            node.border_left.first().cloned().flatten(),
            node.border_right.first().cloned().flatten(),
        )
    });

    if let (Some(bl), Some(br)) = (border_left.as_deref(), border_right.as_deref()) {
        movable.retain(|w| w != bl && w != br);
    }

    let mut subgraphs: FxHashMap<String, SortResult> = FxHashMap::default();

    let mut barycenters = barycenter(g, &movable);
    for entry in &mut barycenters {
        if !g.children(&entry.v).is_empty() {
            let subgraph_result = sort_subgraph(g, &entry.v, cg, bias_right);
            if subgraph_result.barycenter.is_some() {
                merge_barycenters(entry, &subgraph_result);
            }
            subgraphs.insert(entry.v.clone(), subgraph_result);
        }
    }

    let mut entries = resolve_conflicts(&barycenters, cg);
    expand_subgraphs(&mut entries, &subgraphs);

    let mut result = sort(&entries, bias_right);

    if let (Some(bl), Some(br)) = (border_left, border_right) {
        let mut vs: Vec<String> = Vec::with_capacity(result.vs.len() + 2);
        vs.push(bl.clone());
        vs.append(&mut result.vs);
        vs.push(br.clone());
        result.vs = vs;

        // Pull the subgraph toward its border predecessors on the fixed rank.
        if let Some(bl_pred) = g.predecessors(&bl).first().map(|s| s.to_string()) {
            let Some(br_pred) = g.predecessors(&br).first().map(|s| s.to_string()) else {
                return result;
            };
            let bl_order = g.node(&bl_pred).and_then(|n| n.order).unwrap_or(0) as f64;
            let br_order = g.node(&br_pred).and_then(|n| n.order).unwrap_or(0) as f64;

            let bc = result.barycenter.unwrap_or(0.0);
            let w = result.weight.unwrap_or(0.0);
            result.barycenter = Some((bc * w + bl_order + br_order) / (w + 2.0));
            result.weight = Some(w + 2.0);
        }
    }

    result
}

fn expand_subgraphs(entries: &mut [SortEntry], subgraphs: &FxHashMap<String, SortResult>) {
    for entry in entries {
        let mut vs: Vec<String> = Vec::new();
        for v in &entry.vs {
            match subgraphs.get(v) {
                Some(sg) => vs.extend(sg.vs.iter().cloned()),
                None => vs.push(v.clone()),
            }
        }
        entry.vs = vs;
    }
}

fn merge_barycenters(target: &mut BarycenterEntry, other: &SortResult) {
    let Some(other_bc) = other.barycenter else {
        return;
    };
    let other_w = other.weight.unwrap_or(0.0);

    if let (Some(bc), Some(w)) = (target.barycenter, target.weight) {
        target.barycenter = Some((bc * w + other_bc * other_w) / (w + other_w));
        target.weight = Some(w + other_w);
    } else {
        target.barycenter = Some(other_bc);
        target.weight = Some(other_w);
    }
}
