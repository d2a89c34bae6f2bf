//! Shared helpers: layer matrices, rank normalization, dummy-node ids,
//! rectangle intersection, graph projections, and stage timing.

use crate::graph::{Graph, GraphOptions};
use crate::{DummyKind, EdgeLabel, LayoutGraph, NodeLabel, Point};
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use std::io::Write;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Clips the segment from the rectangle's center to `point` against the
/// rectangle boundary and returns the boundary point.
pub fn intersect_rect(rect: Rect, point: Point) -> Point {
    let dx = point.x - rect.x;
    let dy = point.y - rect.y;
    let mut w = rect.width / 2.0;
    let mut h = rect.height / 2.0;

    // A degenerate edge can aim at the rectangle center; pick the right edge
    // so the caller still gets a boundary point.
    if dx == 0.0 && dy == 0.0 {
        return Point {
            x: rect.x + w,
            y: rect.y,
        };
    }

    let (sx, sy) = if dy.abs() * w > dx.abs() * h {
        if dy < 0.0 {
            h = -h;
        }
        (h * dx / dy, h)
    } else {
        if dx < 0.0 {
            w = -w;
        }
        (w, w * dy / dx)
    };

    Point {
        x: rect.x + sx,
        y: rect.y + sy,
    }
}

/// Groups ranked nodes into layers, each layer sorted by `order`.
pub fn build_layer_matrix<E, G>(g: &Graph<NodeLabel, E, G>) -> Vec<Vec<String>>
where
    E: Default,
    G: Default,
{
    let mut min_rank = i32::MAX;
    let mut max_rank = i32::MIN;
    let mut entries: Vec<(i32, usize, String)> = Vec::new();

    for id in g.nodes() {
        let Some(node) = g.node(id) else {
            continue;
        };
        let Some(rank) = node.rank else {
            continue;
        };
        min_rank = min_rank.min(rank);
        max_rank = max_rank.max(rank);
        entries.push((rank, node.order.unwrap_or(0), id.to_string()));
    }

    if entries.is_empty() {
        return Vec::new();
    }

    let shift = if min_rank < 0 { -min_rank } else { 0 };
    let mut layers: Vec<Vec<(usize, String)>> = vec![Vec::new(); (max_rank + shift + 1) as usize];
    for (rank, order, id) in entries {
        layers[(rank + shift) as usize].push((order, id));
    }

    layers
        .into_iter()
        .map(|mut layer| {
            layer.sort_by_key(|(order, _)| *order);
            layer.into_iter().map(|(_, id)| id).collect()
        })
        .collect()
}

pub fn max_rank<E, G>(g: &Graph<NodeLabel, E, G>) -> Option<i32>
where
    E: Default,
    G: Default,
{
    let mut out: Option<i32> = None;
    for id in g.nodes() {
        if let Some(rank) = g.node(id).and_then(|n| n.rank) {
            out = Some(out.map_or(rank, |m: i32| m.max(rank)));
        }
    }
    out
}

/// Shifts all ranks so the smallest becomes zero.
pub fn normalize_ranks<E, G>(g: &mut Graph<NodeLabel, E, G>)
where
    E: Default,
    G: Default,
{
    let mut min_rank = i32::MAX;
    for id in g.nodes() {
        if let Some(rank) = g.node(id).and_then(|n| n.rank) {
            min_rank = min_rank.min(rank);
        }
    }
    if min_rank == i32::MAX {
        return;
    }
    for id in g.node_ids() {
        if let Some(node) = g.node_mut(&id) {
            if let Some(rank) = node.rank {
                node.rank = Some(rank - min_rank);
            }
        }
    }
}

/// Compacts empty ranks, but only those that are not multiples of the
/// nesting factor: ranks the edge-label doubling reserved must keep their
/// alignment.
pub fn remove_empty_ranks(g: &mut LayoutGraph) {
    let Some(factor) = g.graph().node_rank_factor.filter(|&f| f > 0) else {
        return;
    };

    let mut offset = i32::MAX;
    for id in g.nodes() {
        if let Some(rank) = g.node(id).and_then(|n| n.rank) {
            offset = offset.min(rank);
        }
    }
    if offset == i32::MAX {
        return;
    }

    let mut max_idx: usize = 0;
    let mut layers: BTreeMap<usize, Vec<String>> = BTreeMap::new();
    for id in g.node_ids() {
        let Some(rank) = g.node(&id).and_then(|n| n.rank) else {
            continue;
        };
        let idx = (rank - offset) as usize;
        max_idx = max_idx.max(idx);
        layers.entry(idx).or_default().push(id);
    }

    let mut delta: i32 = 0;
    for i in 0..=max_idx {
        match layers.get(&i) {
            None if i % factor != 0 => delta -= 1,
            Some(vs) if delta != 0 => {
                for v in vs {
                    if let Some(node) = g.node_mut(v) {
                        if let Some(rank) = node.rank {
                            node.rank = Some(rank + delta);
                        }
                    }
                }
            }
            _ => {}
        }
    }
}

/// A copy of the graph without the compound hierarchy: leaf nodes only, all
/// edges kept. Edges incident on a compound parent re-create that endpoint
/// with a default label; the driver never copies ranks back to parents, so
/// those stand-ins are harmless.
pub fn as_non_compound_graph<N, E, G>(g: &Graph<N, E, G>) -> Graph<N, E, G>
where
    N: Default + Clone,
    E: Default + Clone,
    G: Default + Clone,
{
    let mut flat: Graph<N, E, G> = Graph::new(GraphOptions {
        multigraph: g.options().multigraph,
        compound: false,
        ..Default::default()
    });
    flat.set_graph(g.graph().clone());

    for v in g.node_ids() {
        if g.children(&v).is_empty() {
            if let Some(label) = g.node(&v) {
                flat.set_node(v, label.clone());
            }
        }
    }
    for e in g.edges() {
        if let Some(label) = g.edge_by_id(e) {
            flat.set_edge_named(
                e.tail.clone(),
                e.head.clone(),
                e.name.clone(),
                Some(label.clone()),
            );
        }
    }

    flat
}

/// Collapses parallel edges into single edges with summed weight and the
/// largest minlen, dropping names and compound structure. The ranker only
/// cares about these two fields.
pub fn simplify<N, G>(g: &Graph<N, EdgeLabel, G>) -> Graph<N, EdgeLabel, G>
where
    N: Default + Clone,
    G: Default + Clone,
{
    let mut simplified: Graph<N, EdgeLabel, G> = Graph::new(GraphOptions::default());
    simplified.set_graph(g.graph().clone());

    for v in g.node_ids() {
        if let Some(label) = g.node(&v) {
            simplified.set_node(v, label.clone());
        }
    }

    let mut merged: BTreeMap<(String, String), (f64, usize)> = BTreeMap::new();
    for e in g.edges() {
        let label = g.edge_by_id(e).cloned().unwrap_or_default();
        let entry = merged
            .entry((e.tail.clone(), e.head.clone()))
            .or_insert((0.0, 1));
        entry.0 += label.weight;
        entry.1 = entry.1.max(label.minlen.max(1));
    }
    for ((tail, head), (weight, minlen)) in merged {
        simplified.set_edge_with(
            tail,
            head,
            EdgeLabel {
                weight,
                minlen,
                ..Default::default()
            },
        );
    }

    simplified
}

/// Returns an id not present in the graph, scanning `prefix`, `prefix1`,
/// `prefix2`, ... Scan-based generation keeps dummy ids reproducible across
/// runs; the engine has no process-global counters.
pub fn fresh_id<N, E, G>(g: &Graph<N, E, G>, prefix: &str) -> String
where
    N: Default,
    E: Default,
    G: Default,
{
    if !g.has_node(prefix) {
        return prefix.to_string();
    }
    for i in 1usize.. {
        let id = format!("{prefix}{i}");
        if !g.has_node(&id) {
            return id;
        }
    }
    unreachable!()
}

/// Dummy-node factory with per-prefix counters so repeated insertion stays
/// linear while keeping the `prefix`, `prefix1`, `prefix2`, ... scheme.
#[derive(Default)]
pub struct DummyIds {
    next: FxHashMap<&'static str, usize>,
}

impl DummyIds {
    pub fn add(
        &mut self,
        g: &mut LayoutGraph,
        kind: DummyKind,
        mut label: NodeLabel,
        prefix: &'static str,
    ) -> String {
        label.dummy = Some(kind);

        let start = match self.next.get(prefix) {
            Some(&n) => n,
            None => {
                if !g.has_node(prefix) {
                    self.next.insert(prefix, 1);
                    g.set_node(prefix, label);
                    return prefix.to_string();
                }
                1
            }
        };

        let mut i = start.max(1);
        loop {
            let id = format!("{prefix}{i}");
            if !g.has_node(&id) {
                self.next.insert(prefix, i + 1);
                g.set_node(id.clone(), label);
                return id;
            }
            i += 1;
        }
    }
}

/// Runs `f`, writing its wall-clock duration to `writer`. Timing output is
/// advisory and never feeds back into layout.
pub fn time_to_writer<T>(name: &str, writer: &mut dyn Write, f: impl FnOnce() -> T) -> T {
    let start = Instant::now();
    let out = f();
    let ms = start.elapsed().as_millis();
    let _ = writeln!(writer, "{name} time: {ms}ms");
    let _ = writer.flush();
    out
}
