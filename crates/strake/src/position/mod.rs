//! Coordinate assignment.
//!
//! y comes straight from the ranks: each rank row is as tall as its tallest
//! node, rows are separated by `ranksep`, and every node sits on its row's
//! centerline. x is delegated to the Brandes–Köpf pass in [`bk`].
//!
//! Positioning runs on the non-compound projection; compound parents get
//! their geometry later from their border nodes.

pub mod bk;

use crate::{LayoutGraph, util};

pub fn position(g: &mut LayoutGraph) {
    let flat = util::as_non_compound_graph(g);

    let ys = position_y(&flat);
    for (v, y) in ys {
        if let Some(node) = g.node_mut(&v) {
            node.y = Some(y);
        }
    }

    let xs = bk::position_x(&flat);
    for (v, x) in xs {
        if let Some(node) = g.node_mut(&v) {
            node.x = Some(x);
        }
    }
}

fn position_y(g: &LayoutGraph) -> Vec<(String, f64)> {
    let layering = util::build_layer_matrix(g);
    let rank_sep = g.graph().ranksep;

    let mut out: Vec<(String, f64)> = Vec::new();
    let mut prev_y = 0.0;
    for layer in &layering {
        let max_height = layer
            .iter()
            .filter_map(|v| g.node(v).map(|n| n.height))
            .fold(0.0_f64, f64::max);
        let y = prev_y + max_height / 2.0;
        for v in layer {
            out.push((v.clone(), y));
        }
        prev_y += max_height + rank_sep;
    }
    out
}
