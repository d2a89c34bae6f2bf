//! The layout driver.
//!
//! `layout` copies the input graph into a private working graph, runs the
//! full pipeline over it, and copies the computed attributes back. Only a
//! whitelisted set of attributes ever crosses either boundary, so unknown
//! input attributes cannot influence layout and temporary pipeline state
//! never leaks out.

use crate::graph::{Graph, GraphOptions};
use crate::util::{DummyIds, Rect};
use crate::{
    DummyKind, EdgeLabel, GraphLabel, LabelPos, LayoutError, LayoutGraph, NodeLabel, Point, Result,
    acyclic, border_segments, coordinate_system, nesting_graph, normalize, order,
    parent_dummy_chains, position, rank, self_edges, util,
};
use std::io::Write;

/// Options for [`layout_with`]. `debug_timing` receives one line per
/// pipeline stage with its wall-clock duration; it never affects the layout
/// itself.
#[derive(Default)]
pub struct LayoutOptions<'a> {
    pub debug_timing: Option<&'a mut dyn Write>,
}

pub fn layout(g: &mut LayoutGraph) -> Result<()> {
    layout_with(g, LayoutOptions::default())
}

pub fn layout_with(g: &mut LayoutGraph, opts: LayoutOptions<'_>) -> Result<()> {
    let mut timer = StageTimer {
        sink: opts.debug_timing,
    };
    let mut working = timer.run("buildLayoutGraph", || build_layout_graph(g))?;
    run_layout(&mut working, &mut timer)?;
    timer.run("updateInputGraph", || update_input_graph(g, &working));
    Ok(())
}

struct StageTimer<'a> {
    sink: Option<&'a mut dyn Write>,
}

impl StageTimer<'_> {
    fn run<T>(&mut self, name: &str, f: impl FnOnce() -> T) -> T {
        match self.sink.as_mut() {
            Some(w) => util::time_to_writer(name, &mut **w, f),
            None => f(),
        }
    }
}

fn run_layout(g: &mut LayoutGraph, timer: &mut StageTimer<'_>) -> Result<()> {
    timer.run("makeSpaceForEdgeLabels", || make_space_for_edge_labels(g));
    timer.run("removeSelfEdges", || self_edges::remove_self_edges(g));
    timer.run("acyclic", || acyclic::run(g));
    timer.run("nestingGraph.run", || nesting_graph::run(g));
    timer.run("rank", || rank_leaves(g));
    timer.run("injectEdgeLabelProxies", || inject_edge_label_proxies(g));
    timer.run("removeEmptyRanks", || util::remove_empty_ranks(g));
    timer.run("nestingGraph.cleanup", || nesting_graph::cleanup(g));
    timer.run("normalizeRanks", || util::normalize_ranks(g));
    timer.run("assignRankMinMax", || assign_rank_min_max(g));
    timer.run("removeEdgeLabelProxies", || remove_edge_label_proxies(g));
    timer.run("normalize.run", || normalize::run(g));
    timer.run("parentDummyChains", || {
        parent_dummy_chains::parent_dummy_chains(g)
    });
    timer.run("addBorderSegments", || {
        border_segments::add_border_segments(g)
    });
    timer.run("order", || order::order(g));
    timer.run("insertSelfEdges", || self_edges::insert_self_edges(g));
    timer.run("adjustCoordinateSystem", || coordinate_system::adjust(g));
    timer.run("position", || position::position(g));
    timer.run("positionSelfEdges", || self_edges::position_self_edges(g));
    timer.run("removeBorderNodes", || remove_border_nodes(g));
    timer.run("normalize.undo", || normalize::undo(g));
    timer.run("fixupEdgeLabelCoords", || fixup_edge_label_coords(g));
    timer.run("undoCoordinateSystem", || coordinate_system::undo(g));
    timer.run("translateGraph", || translate_graph(g))?;
    timer.run("assignNodeIntersects", || assign_node_intersects(g));
    timer.run("reversePoints", || reverse_points_for_reversed_edges(g));
    timer.run("acyclic.undo", || acyclic::undo(g));
    Ok(())
}

/// Copies the whitelisted attributes of the input graph into a fresh
/// compound multigraph, applying defaults and validating every numeric
/// input. Everything else stays behind.
fn build_layout_graph(input: &LayoutGraph) -> Result<LayoutGraph> {
    let mut g: LayoutGraph = Graph::new(GraphOptions {
        directed: true,
        multigraph: true,
        compound: true,
    });

    let src = input.graph();
    match src.ranker.as_deref() {
        None | Some("network-simplex") | Some("tight-tree") | Some("longest-path") => {}
        Some(other) => return Err(LayoutError::UnknownRanker(other.to_string())),
    }
    match src.acyclicer.as_deref() {
        None | Some("greedy") | Some("none") => {}
        Some(other) => return Err(LayoutError::UnknownAcyclicer(other.to_string())),
    }
    for (name, value) in [
        ("nodesep", src.nodesep),
        ("edgesep", src.edgesep),
        ("ranksep", src.ranksep),
        ("marginx", src.marginx),
        ("marginy", src.marginy),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(LayoutError::InvariantViolation(format!(
                "graph attribute {name} must be a non-negative number, got {value}"
            )));
        }
    }

    g.set_graph(GraphLabel {
        rankdir: src.rankdir,
        nodesep: src.nodesep,
        edgesep: src.edgesep,
        ranksep: src.ranksep,
        marginx: src.marginx,
        marginy: src.marginy,
        ranker: src.ranker.clone(),
        acyclicer: src.acyclicer.clone(),
        align: src.align.clone(),
        ..Default::default()
    });

    for v in input.node_ids() {
        let Some(node) = input.node(&v) else {
            continue;
        };
        for (name, value) in [("width", node.width), ("height", node.height)] {
            if !value.is_finite() || value < 0.0 {
                return Err(LayoutError::InvariantViolation(format!(
                    "node {v:?} {name} must be a non-negative number, got {value}"
                )));
            }
        }
        g.set_node(
            v.clone(),
            NodeLabel {
                width: node.width,
                height: node.height,
                ..Default::default()
            },
        );
    }
    for v in input.node_ids() {
        if let Some(parent) = input.parent(&v) {
            g.set_parent(v, parent.to_string());
        }
    }

    for e in input.edge_ids() {
        let Some(edge) = input.edge_by_id(&e) else {
            continue;
        };
        if edge.minlen < 1 {
            return Err(LayoutError::InvariantViolation(format!(
                "edge ({:?} -> {:?}) minlen must be at least 1",
                e.tail, e.head
            )));
        }
        if !edge.weight.is_finite() || edge.weight <= 0.0 {
            return Err(LayoutError::InvariantViolation(format!(
                "edge ({:?} -> {:?}) weight must be a positive number, got {}",
                e.tail, e.head, edge.weight
            )));
        }
        for (name, value) in [
            ("width", edge.width),
            ("height", edge.height),
            ("labeloffset", edge.labeloffset),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(LayoutError::InvariantViolation(format!(
                    "edge ({:?} -> {:?}) {name} must be a non-negative number, got {value}",
                    e.tail, e.head
                )));
            }
        }
        g.set_edge_named(
            e.tail.clone(),
            e.head.clone(),
            e.name.clone(),
            Some(EdgeLabel {
                minlen: edge.minlen,
                weight: edge.weight,
                width: edge.width,
                height: edge.height,
                labeloffset: edge.labeloffset,
                labelpos: edge.labelpos,
                ..Default::default()
            }),
        );
    }

    Ok(g)
}

/// Copies the computed attributes back onto the input graph: node
/// coordinates and ranks (plus dimensions for compound parents, which are
/// outputs), edge polylines and label positions, and the overall drawing
/// size. Nothing else on the input is touched.
fn update_input_graph(input: &mut LayoutGraph, layout: &LayoutGraph) {
    for v in input.node_ids() {
        let Some(computed) = layout.node(&v) else {
            continue;
        };
        let computed = computed.clone();
        let is_parent = !layout.children(&v).is_empty();
        if let Some(node) = input.node_mut(&v) {
            node.x = computed.x;
            node.y = computed.y;
            // Ranks are reported in input units; the doubling that opened
            // room for edge labels is internal.
            node.rank = computed.rank.map(|r| r / 2);
            if is_parent {
                node.width = computed.width;
                node.height = computed.height;
            }
        }
    }

    for e in input.edge_ids() {
        let Some(computed) = layout.edge_by_id(&e) else {
            continue;
        };
        let points = computed.points.clone();
        let label_pos = computed.x.map(|x| (x, computed.y));
        if let Some(edge) = input.edge_mut_by_id(&e) {
            edge.points = points;
            if let Some((x, y)) = label_pos {
                edge.x = Some(x);
                edge.y = y;
            }
        }
    }

    let (width, height, max_rank) = {
        let label = layout.graph();
        (label.width, label.height, label.max_rank)
    };
    let label = input.graph_mut();
    label.width = width;
    label.height = height;
    label.max_rank = max_rank.map(|r| r / 2);
}

/// Halves `ranksep` and doubles every `minlen`, opening an in-between rank
/// per edge where a label dummy can sit without stretching the drawing.
/// Non-centered labels additionally pad the edge box on the cross axis.
fn make_space_for_edge_labels(g: &mut LayoutGraph) {
    g.graph_mut().ranksep /= 2.0;
    let horizontal = g.graph().rankdir.is_horizontal();
    for e in g.edge_ids() {
        if let Some(edge) = g.edge_mut_by_id(&e) {
            edge.minlen *= 2;
            if edge.labelpos != LabelPos::C {
                if horizontal {
                    edge.height += edge.labeloffset;
                } else {
                    edge.width += edge.labeloffset;
                }
            }
        }
    }
}

/// Ranking runs on the non-compound projection; compound parents never get
/// a rank of their own. The projection owns copies of the labels, so ranks
/// are copied back to leaf nodes explicitly.
fn rank_leaves(g: &mut LayoutGraph) {
    let mut projection = util::as_non_compound_graph(g);
    rank::rank(&mut projection);
    for v in g.node_ids() {
        if !g.children(&v).is_empty() {
            continue;
        }
        let Some(rank) = projection.node(&v).and_then(|n| n.rank) else {
            continue;
        };
        if let Some(node) = g.node_mut(&v) {
            node.rank = Some(rank);
        }
    }
}

/// Plants a proxy dummy at the midpoint rank of every labeled edge so
/// `remove_empty_ranks` cannot collapse the rank its label needs.
fn inject_edge_label_proxies(g: &mut LayoutGraph) {
    let mut ids = DummyIds::default();
    for e in g.edge_ids() {
        let Some(edge) = g.edge_by_id(&e) else {
            continue;
        };
        if edge.width <= 0.0 || edge.height <= 0.0 {
            continue;
        }
        let Some(tail_rank) = g.node(&e.tail).and_then(|n| n.rank) else {
            continue;
        };
        let Some(head_rank) = g.node(&e.head).and_then(|n| n.rank) else {
            continue;
        };
        let rank = (head_rank - tail_rank) / 2 + tail_rank;
        ids.add(
            g,
            DummyKind::EdgeProxy,
            NodeLabel {
                rank: Some(rank),
                edge_id: Some(e.clone()),
                ..Default::default()
            },
            "_ep",
        );
    }
}

/// Records each compound parent's rank span from its nesting border nodes,
/// and the global maximum rank on the graph label.
fn assign_rank_min_max(g: &mut LayoutGraph) {
    let mut max_rank = 0i32;
    for v in g.node_ids() {
        let Some(node) = g.node(&v) else {
            continue;
        };
        if let Some(rank) = node.rank {
            max_rank = max_rank.max(rank);
        }
        let (Some(top), Some(bottom)) = (node.border_top.clone(), node.border_bottom.clone())
        else {
            continue;
        };
        let (Some(min), Some(max)) = (
            g.node(&top).and_then(|n| n.rank),
            g.node(&bottom).and_then(|n| n.rank),
        ) else {
            continue;
        };
        if let Some(node) = g.node_mut(&v) {
            node.min_rank = Some(min);
            node.max_rank = Some(max);
        }
        max_rank = max_rank.max(max);
    }
    g.graph_mut().max_rank = Some(max_rank);
}

fn remove_edge_label_proxies(g: &mut LayoutGraph) {
    for v in g.node_ids() {
        let Some(node) = g.node(&v) else {
            continue;
        };
        if node.dummy != Some(DummyKind::EdgeProxy) {
            continue;
        }
        let rank = node.rank;
        if let Some(edge_id) = node.edge_id.clone() {
            if let Some(edge) = g.edge_mut_by_id(&edge_id) {
                edge.label_rank = rank;
            }
        }
        g.remove_node(&v);
    }
}

/// Derives each compound parent's rectangle from its outermost border
/// dummies, then deletes every border dummy.
fn remove_border_nodes(g: &mut LayoutGraph) {
    for v in g.node_ids() {
        if g.children(&v).is_empty() {
            continue;
        }
        let Some(node) = g.node(&v).cloned() else {
            continue;
        };
        let (Some(top), Some(bottom)) = (node.border_top, node.border_bottom) else {
            continue;
        };
        let left = node.border_left.last().cloned().flatten();
        let right = node.border_right.last().cloned().flatten();
        let (Some(left), Some(right)) = (left, right) else {
            continue;
        };

        let (Some(top_y), Some(bottom_y)) = (
            g.node(&top).and_then(|n| n.y),
            g.node(&bottom).and_then(|n| n.y),
        ) else {
            continue;
        };
        let (Some(left_x), Some(right_x)) = (
            g.node(&left).and_then(|n| n.x),
            g.node(&right).and_then(|n| n.x),
        ) else {
            continue;
        };

        let width = (right_x - left_x).abs();
        let height = (bottom_y - top_y).abs();
        if let Some(node) = g.node_mut(&v) {
            node.width = width;
            node.height = height;
            node.x = Some(left_x + width / 2.0);
            node.y = Some(top_y + height / 2.0);
        }
    }

    for v in g.node_ids() {
        if g.node(&v).map(|n| n.dummy) == Some(Some(DummyKind::Border)) {
            g.remove_node(&v);
        }
    }
}

/// Undoes the label padding from `make_space_for_edge_labels` and shifts
/// side-positioned labels off the edge centerline. Centered labels are left
/// alone on both counts.
fn fixup_edge_label_coords(g: &mut LayoutGraph) {
    for e in g.edge_ids() {
        let Some(edge) = g.edge_mut_by_id(&e) else {
            continue;
        };
        let Some(x) = edge.x else {
            continue;
        };
        if matches!(edge.labelpos, LabelPos::L | LabelPos::R) {
            edge.width -= edge.labeloffset;
        }
        match edge.labelpos {
            LabelPos::L => edge.x = Some(x - edge.width / 2.0 - edge.labeloffset),
            LabelPos::R => edge.x = Some(x + edge.width / 2.0 + edge.labeloffset),
            LabelPos::C => {}
        }
    }
}

/// Shifts the whole drawing into the positive quadrant with the requested
/// margins and records the drawing size on the graph label.
fn translate_graph(g: &mut LayoutGraph) -> Result<()> {
    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;

    for v in g.node_ids() {
        let Some(node) = g.node(&v) else {
            continue;
        };
        let (Some(x), Some(y)) = (node.x, node.y) else {
            continue;
        };
        // NaN slips through min/max unnoticed, so positions are checked
        // directly before they enter the bounding box.
        if !(x.is_finite() && y.is_finite()) {
            return Err(LayoutError::CoordinateOverflow);
        }
        min_x = min_x.min(x - node.width / 2.0);
        max_x = max_x.max(x + node.width / 2.0);
        min_y = min_y.min(y - node.height / 2.0);
        max_y = max_y.max(y + node.height / 2.0);
    }
    // Label boxes count toward the extent; interior polyline points do not.
    for e in g.edge_ids() {
        let Some(edge) = g.edge_by_id(&e) else {
            continue;
        };
        if let (Some(x), Some(y)) = (edge.x, edge.y) {
            min_x = min_x.min(x - edge.width / 2.0);
            max_x = max_x.max(x + edge.width / 2.0);
            min_y = min_y.min(y - edge.height / 2.0);
            max_y = max_y.max(y + edge.height / 2.0);
        }
    }

    if !min_x.is_finite() {
        // Nothing was positioned; pin the box to the origin so an empty
        // drawing still gets its margins.
        min_x = 0.0;
        max_x = 0.0;
        min_y = 0.0;
        max_y = 0.0;
    }

    let (marginx, marginy) = (g.graph().marginx, g.graph().marginy);
    min_x -= marginx;
    min_y -= marginy;
    let dx = -min_x;
    let dy = -min_y;

    let width = max_x - min_x + marginx;
    let height = max_y - min_y + marginy;
    if !(width.is_finite() && height.is_finite()) {
        return Err(LayoutError::CoordinateOverflow);
    }

    for v in g.node_ids() {
        if let Some(node) = g.node_mut(&v) {
            if let Some(x) = node.x {
                node.x = Some(x + dx);
            }
            if let Some(y) = node.y {
                node.y = Some(y + dy);
            }
        }
    }
    for e in g.edge_ids() {
        if let Some(edge) = g.edge_mut_by_id(&e) {
            for p in &mut edge.points {
                p.x += dx;
                p.y += dy;
            }
            if let Some(x) = edge.x {
                edge.x = Some(x + dx);
            }
            if let Some(y) = edge.y {
                edge.y = Some(y + dy);
            }
        }
    }

    let label = g.graph_mut();
    label.width = width;
    label.height = height;
    Ok(())
}

/// Extends every polyline to the boundary of its endpoint rectangles. A
/// degenerate edge with no interior points aims each endpoint at the other.
fn assign_node_intersects(g: &mut LayoutGraph) {
    for e in g.edge_ids() {
        let Some(tail) = g.node(&e.tail) else {
            continue;
        };
        let Some(head) = g.node(&e.head) else {
            continue;
        };
        let tail_rect = Rect {
            x: tail.x.unwrap_or(0.0),
            y: tail.y.unwrap_or(0.0),
            width: tail.width,
            height: tail.height,
        };
        let head_rect = Rect {
            x: head.x.unwrap_or(0.0),
            y: head.y.unwrap_or(0.0),
            width: head.width,
            height: head.height,
        };

        let Some(edge) = g.edge_mut_by_id(&e) else {
            continue;
        };
        let (p1, p2) = if edge.points.is_empty() {
            (
                Point {
                    x: head_rect.x,
                    y: head_rect.y,
                },
                Point {
                    x: tail_rect.x,
                    y: tail_rect.y,
                },
            )
        } else {
            (edge.points[0], edge.points[edge.points.len() - 1])
        };

        let mut points = Vec::with_capacity(edge.points.len() + 2);
        points.push(util::intersect_rect(tail_rect, p1));
        points.append(&mut edge.points);
        points.push(util::intersect_rect(head_rect, p2));
        edge.points = points;
    }
}

/// Reversed edges were routed head-to-tail; flip their polylines so they
/// read in the original direction before the reversal itself is undone.
fn reverse_points_for_reversed_edges(g: &mut LayoutGraph) {
    for e in g.edge_ids() {
        if let Some(edge) = g.edge_mut_by_id(&e) {
            if edge.reversed {
                edge.points.reverse();
            }
        }
    }
}
