//! Brandes–Köpf x-coordinate assignment.
//!
//! Four passes (up/down × left/right) each align nodes into vertical blocks
//! that keep long-edge chains straight, then compact the blocks subject to
//! the separation constraints. The four candidate assignments are aligned to
//! the narrowest one and balanced per node; `graph.align` can bias the
//! result toward a single pass instead.

use crate::graph::{Graph, GraphOptions};
use crate::{BorderSide, LabelPos, LayoutGraph, util};
use rustc_hash::FxHashMap;
use std::collections::{BTreeMap, BTreeSet};

/// Pairs of nodes whose alignment is forbidden, keyed with the
/// lexicographically smaller id first.
pub type Conflicts = BTreeMap<String, BTreeSet<String>>;

pub fn add_conflict(conflicts: &mut Conflicts, v: &str, w: &str) {
    let (v, w) = if v <= w { (v, w) } else { (w, v) };
    conflicts
        .entry(v.to_string())
        .or_default()
        .insert(w.to_string());
}

pub fn has_conflict(conflicts: &Conflicts, v: &str, w: &str) -> bool {
    let (v, w) = if v <= w { (v, w) } else { (w, v) };
    conflicts.get(v).map(|s| s.contains(w)).unwrap_or(false)
}

/// Type-1 conflicts: a non-inner segment crossing an inner segment (an edge
/// between two dummies). Inner segments win alignment, so the crossing
/// segment is marked.
pub fn find_type1_conflicts(g: &LayoutGraph, layering: &[Vec<String>]) -> Conflicts {
    let mut conflicts = Conflicts::new();

    for i in 1..layering.len() {
        let prev_layer = &layering[i - 1];
        let layer = &layering[i];

        let mut k0 = 0usize;
        let mut scan_pos = 0usize;
        let prev_layer_len = prev_layer.len();
        let last_node = layer.last().map(String::as_str);

        for (idx, v) in layer.iter().enumerate() {
            let w = find_other_inner_segment_node(g, v);
            let k1 = w
                .as_deref()
                .and_then(|w| g.node(w))
                .and_then(|n| n.order)
                .unwrap_or(prev_layer_len);

            if w.is_some() || last_node == Some(v.as_str()) {
                for scan_node in layer.iter().skip(scan_pos).take(idx + 1 - scan_pos) {
                    for u in g.predecessors(scan_node) {
                        let Some(u_node) = g.node(u) else {
                            continue;
                        };
                        let u_pos = u_node.order.unwrap_or(0);
                        let scan_dummy = g
                            .node(scan_node)
                            .map(|n| n.is_dummy())
                            .unwrap_or(false);
                        if (u_pos < k0 || k1 < u_pos) && !(u_node.is_dummy() && scan_dummy) {
                            add_conflict(&mut conflicts, u, scan_node);
                        }
                    }
                }
                scan_pos = idx + 1;
                k0 = k1;
            }
        }
    }

    conflicts
}

/// Type-2 conflicts: a dummy-to-dummy segment crossing a cluster border.
pub fn find_type2_conflicts(g: &LayoutGraph, layering: &[Vec<String>]) -> Conflicts {
    let mut conflicts = Conflicts::new();

    fn scan(
        g: &LayoutGraph,
        conflicts: &mut Conflicts,
        south: &[String],
        south_pos: usize,
        south_end: usize,
        prev_north_border: isize,
        next_north_border: isize,
    ) {
        for v in south.iter().take(south_end).skip(south_pos) {
            let v_is_dummy = g.node(v).map(|n| n.is_dummy()).unwrap_or(false);
            if !v_is_dummy {
                continue;
            }
            for u in g.predecessors(v) {
                let Some(u_node) = g.node(u) else {
                    continue;
                };
                if u_node.is_dummy() {
                    let u_order = u_node.order.unwrap_or(0) as isize;
                    if u_order < prev_north_border || u_order > next_north_border {
                        add_conflict(conflicts, u, v);
                    }
                }
            }
        }
    }

    for i in 1..layering.len() {
        let north = &layering[i - 1];
        let south = &layering[i];

        let mut prev_north_pos: isize = -1;
        let mut next_north_pos: Option<isize> = None;
        let mut south_pos = 0usize;

        for (south_lookahead, v) in south.iter().enumerate() {
            let is_border = g
                .node(v)
                .map(|n| n.dummy == Some(crate::DummyKind::Border))
                .unwrap_or(false);
            if is_border {
                if let Some(u) = g.predecessors(v).first() {
                    next_north_pos = g.node(u).and_then(|n| n.order).map(|o| o as isize);
                    scan(
                        g,
                        &mut conflicts,
                        south,
                        south_pos,
                        south_lookahead,
                        prev_north_pos,
                        next_north_pos.unwrap_or(-1),
                    );
                    south_pos = south_lookahead;
                    prev_north_pos = next_north_pos.unwrap_or(prev_north_pos);
                }
            }

            scan(
                g,
                &mut conflicts,
                south,
                south_pos,
                south.len(),
                next_north_pos.unwrap_or(-1),
                north.len() as isize,
            );
        }
    }

    conflicts
}

fn find_other_inner_segment_node(g: &LayoutGraph, v: &str) -> Option<String> {
    if g.node(v).map(|n| n.is_dummy()).unwrap_or(false) {
        return g
            .predecessors(v)
            .into_iter()
            .find(|u| g.node(u).map(|n| n.is_dummy()).unwrap_or(false))
            .map(str::to_string);
    }
    None
}

#[derive(Debug, Clone, PartialEq)]
pub struct Alignment {
    pub root: FxHashMap<String, String>,
    pub align: FxHashMap<String, String>,
}

/// Greedily chains each node to the median of its fixed-rank neighbours,
/// skipping marked conflicts, producing the block forest for compaction.
pub fn vertical_alignment<F>(
    layering: &[Vec<String>],
    conflicts: &Conflicts,
    neighbor_fn: F,
) -> Alignment
where
    F: Fn(&str) -> Vec<String>,
{
    let mut root: FxHashMap<String, String> = FxHashMap::default();
    let mut align: FxHashMap<String, String> = FxHashMap::default();
    let mut pos: FxHashMap<String, usize> = FxHashMap::default();

    for layer in layering {
        for (order, v) in layer.iter().enumerate() {
            root.insert(v.clone(), v.clone());
            align.insert(v.clone(), v.clone());
            pos.insert(v.clone(), order);
        }
    }

    for layer in layering {
        let mut prev_idx: isize = -1;
        for v in layer {
            let mut ws = neighbor_fn(v);
            if ws.is_empty() {
                continue;
            }
            ws.sort_by_key(|w| pos.get(w).copied().unwrap_or(usize::MAX));

            let mp = (ws.len() - 1) as f64 / 2.0;
            let lo = mp.floor() as usize;
            let hi = mp.ceil() as usize;

            for w in ws.iter().take(hi + 1).skip(lo) {
                let v_align = align.get(v).cloned().unwrap_or_else(|| v.clone());
                let w_pos = pos.get(w).copied().unwrap_or(usize::MAX) as isize;
                if v_align == *v && prev_idx < w_pos && !has_conflict(conflicts, v, w) {
                    align.insert(w.clone(), v.clone());
                    let w_root = root.get(w).cloned().unwrap_or_else(|| w.clone());
                    align.insert(v.clone(), w_root.clone());
                    root.insert(v.clone(), w_root);
                    prev_idx = w_pos;
                }
            }
        }
    }

    Alignment { root, align }
}

/// Longest-path placement over the block graph: a forward pass pushes every
/// block as far left as its predecessors allow, a backward pass pulls
/// non-border blocks right toward their successors.
pub fn horizontal_compaction(
    g: &LayoutGraph,
    layering: &[Vec<String>],
    root: &FxHashMap<String, String>,
    align: &FxHashMap<String, String>,
    reverse_sep: bool,
) -> FxHashMap<String, f64> {
    let mut xs: FxHashMap<String, f64> = FxHashMap::default();
    let block_g = build_block_graph(g, layering, root, reverse_sep);
    let border_side = if reverse_sep {
        BorderSide::Left
    } else {
        BorderSide::Right
    };

    fn iterate<F, N>(block_g: &Graph<(), f64, ()>, mut set_xs: F, mut next_nodes: N)
    where
        F: FnMut(&str),
        N: FnMut(&str) -> Vec<String>,
    {
        let mut stack: Vec<String> = block_g.node_ids();
        let mut visited: FxHashMap<String, bool> = FxHashMap::default();

        while let Some(elem) = stack.pop() {
            if visited.get(&elem).copied().unwrap_or(false) {
                set_xs(&elem);
                continue;
            }
            visited.insert(elem.clone(), true);
            stack.push(elem.clone());
            stack.extend(next_nodes(&elem));
        }
    }

    // Smallest coordinates first.
    {
        let mut set = |elem: &str| {
            let mut best = 0.0_f64;
            for e in block_g.in_edges(elem, None) {
                let sep = block_g.edge_by_id(&e).copied().unwrap_or(0.0);
                let x = xs.get(&e.tail).copied().unwrap_or(0.0);
                best = best.max(x + sep);
            }
            xs.insert(elem.to_string(), best);
        };
        let next = |elem: &str| {
            block_g
                .predecessors(elem)
                .into_iter()
                .map(str::to_string)
                .collect()
        };
        iterate(&block_g, &mut set, next);
    }

    // Then greatest coordinates.
    {
        let mut set = |elem: &str| {
            let mut min = f64::INFINITY;
            for e in block_g.out_edges(elem, None) {
                let sep = block_g.edge_by_id(&e).copied().unwrap_or(0.0);
                let x = xs.get(&e.head).copied().unwrap_or(0.0);
                min = min.min(x - sep);
            }

            let Some(node) = g.node(elem) else {
                return;
            };
            if min.is_finite() && node.border != Some(border_side) {
                let cur = xs.get(elem).copied().unwrap_or(0.0);
                xs.insert(elem.to_string(), cur.max(min));
            }
        };
        let next = |elem: &str| {
            block_g
                .successors(elem)
                .into_iter()
                .map(str::to_string)
                .collect()
        };
        iterate(&block_g, &mut set, next);
    }

    // Every node takes its block root's coordinate.
    let mut out: FxHashMap<String, f64> = FxHashMap::default();
    for v in align.keys() {
        let block_root = root.get(v).cloned().unwrap_or_else(|| v.clone());
        let x = xs.get(&block_root).copied().unwrap_or(0.0);
        out.insert(v.clone(), x);
    }
    out
}

fn build_block_graph(
    g: &LayoutGraph,
    layering: &[Vec<String>],
    root: &FxHashMap<String, String>,
    reverse_sep: bool,
) -> Graph<(), f64, ()> {
    let mut block_g: Graph<(), f64, ()> = Graph::new(GraphOptions::default());
    for layer in layering {
        let mut u: Option<&str> = None;
        for v in layer {
            let v_root = root.get(v).cloned().unwrap_or_else(|| v.clone());
            block_g.ensure_node(v_root.clone());

            if let Some(u) = u {
                let u_root = root.get(u).cloned().unwrap_or_else(|| u.to_string());
                let prev_max = block_g.edge(&u_root, &v_root, None).copied().unwrap_or(0.0);
                let sep = sep(g, v, u, reverse_sep);
                block_g.set_edge_with(u_root, v_root, sep.max(prev_max));
            }
            u = Some(v);
        }
    }
    block_g
}

pub fn find_smallest_width_alignment(
    g: &LayoutGraph,
    xss: &FxHashMap<String, FxHashMap<String, f64>>,
) -> FxHashMap<String, f64> {
    let mut best_width = f64::INFINITY;
    let mut best: FxHashMap<String, f64> = FxHashMap::default();

    // Fixed iteration order so width ties resolve the same way every run.
    for key in ["ul", "ur", "dl", "dr"] {
        let Some(xs) = xss.get(key) else {
            continue;
        };
        let mut max = f64::NEG_INFINITY;
        let mut min = f64::INFINITY;
        for (v, x) in xs {
            let half_width = node_width(g, v) / 2.0;
            max = max.max(x + half_width);
            min = min.min(x - half_width);
        }
        let width = max - min;
        if width < best_width {
            best_width = width;
            best = xs.clone();
        }
    }

    best
}

pub fn align_coordinates(
    xss: &mut FxHashMap<String, FxHashMap<String, f64>>,
    align_to: &FxHashMap<String, f64>,
) {
    let align_min = align_to.values().copied().fold(f64::INFINITY, f64::min);
    let align_max = align_to.values().copied().fold(f64::NEG_INFINITY, f64::max);

    for vert in ["u", "d"] {
        for horiz in ["l", "r"] {
            let key = format!("{vert}{horiz}");
            let Some(xs) = xss.get(&key).cloned() else {
                continue;
            };

            let xs_min = xs.values().copied().fold(f64::INFINITY, f64::min);
            let xs_max = xs.values().copied().fold(f64::NEG_INFINITY, f64::max);

            let delta = if horiz == "l" {
                align_min - xs_min
            } else {
                align_max - xs_max
            };

            if delta != 0.0 {
                xss.insert(key, xs.into_iter().map(|(v, x)| (v, x + delta)).collect());
            }
        }
    }
}

/// Per node, the median of the four aligned assignments; or the single
/// assignment named by `align`.
pub fn balance(
    xss: &FxHashMap<String, FxHashMap<String, f64>>,
    align: Option<&str>,
) -> FxHashMap<String, f64> {
    let Some(xs_ul) = xss.get("ul") else {
        return FxHashMap::default();
    };

    let align_key = align.map(str::to_ascii_lowercase);

    let mut out: FxHashMap<String, f64> = FxHashMap::default();
    for v in xs_ul.keys() {
        if let Some(key) = align_key.as_deref() {
            let x = xss
                .get(key)
                .and_then(|xs| xs.get(v))
                .copied()
                .unwrap_or(0.0);
            out.insert(v.clone(), x);
            continue;
        }

        let mut vals: Vec<f64> = xss.values().filter_map(|xs| xs.get(v).copied()).collect();
        vals.sort_by(|a, b| a.total_cmp(b));
        if vals.len() >= 4 {
            out.insert(v.clone(), (vals[1] + vals[2]) / 2.0);
        }
    }
    out
}

pub fn position_x(g: &LayoutGraph) -> FxHashMap<String, f64> {
    let layering = util::build_layer_matrix(g);

    let mut conflicts = find_type1_conflicts(g, &layering);
    for (v, ws) in find_type2_conflicts(g, &layering) {
        for w in ws {
            add_conflict(&mut conflicts, &v, &w);
        }
    }

    let mut xss: FxHashMap<String, FxHashMap<String, f64>> = FxHashMap::default();

    for vert in ["u", "d"] {
        let mut adjusted: Vec<Vec<String>> = if vert == "u" {
            layering.clone()
        } else {
            layering.iter().cloned().rev().collect()
        };

        for horiz in ["l", "r"] {
            if horiz == "r" {
                adjusted = adjusted
                    .iter()
                    .map(|layer| layer.iter().cloned().rev().collect())
                    .collect();
            }

            let neighbor_fn = |v: &str| {
                if vert == "u" {
                    g.predecessors(v).into_iter().map(str::to_string).collect()
                } else {
                    g.successors(v).into_iter().map(str::to_string).collect()
                }
            };

            let alignment = vertical_alignment(&adjusted, &conflicts, neighbor_fn);
            let mut xs =
                horizontal_compaction(g, &adjusted, &alignment.root, &alignment.align, horiz == "r");
            if horiz == "r" {
                for x in xs.values_mut() {
                    *x = -*x;
                }
            }

            xss.insert(format!("{vert}{horiz}"), xs);
        }
    }

    let smallest = find_smallest_width_alignment(g, &xss);
    align_coordinates(&mut xss, &smallest);
    balance(&xss, g.graph().align.as_deref())
}

/// Minimum separation between the centers of `v` and its left neighbour `w`
/// on the same rank, accounting for label placement and the tighter spacing
/// dummies are allowed.
fn sep(g: &LayoutGraph, v: &str, w: &str, reverse_sep: bool) -> f64 {
    let v_label = g.node(v).cloned().unwrap_or_default();
    let w_label = g.node(w).cloned().unwrap_or_default();

    let node_sep = g.graph().nodesep;
    let edge_sep = g.graph().edgesep;

    let mut sum = 0.0;

    sum += v_label.width / 2.0;
    if let Some(labelpos) = v_label.labelpos {
        let delta = match labelpos {
            LabelPos::L => -v_label.width / 2.0,
            LabelPos::R => v_label.width / 2.0,
            LabelPos::C => 0.0,
        };
        if delta != 0.0 {
            sum += if reverse_sep { delta } else { -delta };
        }
    }

    sum += if v_label.is_dummy() { edge_sep } else { node_sep } / 2.0;
    sum += if w_label.is_dummy() { edge_sep } else { node_sep } / 2.0;

    sum += w_label.width / 2.0;
    if let Some(labelpos) = w_label.labelpos {
        let delta = match labelpos {
            LabelPos::L => w_label.width / 2.0,
            LabelPos::R => -w_label.width / 2.0,
            LabelPos::C => 0.0,
        };
        if delta != 0.0 {
            sum += if reverse_sep { delta } else { -delta };
        }
    }

    sum
}

fn node_width(g: &LayoutGraph, v: &str) -> f64 {
    g.node(v).map(|n| n.width).unwrap_or(0.0)
}
