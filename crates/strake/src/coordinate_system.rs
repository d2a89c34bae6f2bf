//! Rankdir handling.
//!
//! Positioning only solves the top-to-bottom case. For LR/RL layouts the
//! node and edge-label boxes are transposed before positioning; afterwards
//! the coordinates are mapped back into the requested direction.

use crate::{LayoutGraph, RankDir};

pub fn adjust(g: &mut LayoutGraph) {
    if g.graph().rankdir.is_horizontal() {
        swap_width_height(g);
    }
}

pub fn undo(g: &mut LayoutGraph) {
    let rankdir = g.graph().rankdir;
    if matches!(rankdir, RankDir::BT | RankDir::RL) {
        reverse_y(g);
    }
    if rankdir.is_horizontal() {
        swap_xy(g);
        swap_width_height(g);
    }
}

fn swap_width_height(g: &mut LayoutGraph) {
    for v in g.node_ids() {
        if let Some(node) = g.node_mut(&v) {
            std::mem::swap(&mut node.width, &mut node.height);
        }
    }
    for e in g.edge_ids() {
        if let Some(edge) = g.edge_mut_by_id(&e) {
            std::mem::swap(&mut edge.width, &mut edge.height);
        }
    }
}

fn reverse_y(g: &mut LayoutGraph) {
    for v in g.node_ids() {
        if let Some(node) = g.node_mut(&v) {
            if let Some(y) = node.y {
                node.y = Some(-y);
            }
        }
    }
    for e in g.edge_ids() {
        if let Some(edge) = g.edge_mut_by_id(&e) {
            for p in &mut edge.points {
                p.y = -p.y;
            }
            if let Some(y) = edge.y {
                edge.y = Some(-y);
            }
        }
    }
}

fn swap_xy(g: &mut LayoutGraph) {
    for v in g.node_ids() {
        if let Some(node) = g.node_mut(&v) {
            if let (Some(x), Some(y)) = (node.x, node.y) {
                node.x = Some(y);
                node.y = Some(x);
            }
        }
    }
    for e in g.edge_ids() {
        if let Some(edge) = g.edge_mut_by_id(&e) {
            for p in &mut edge.points {
                std::mem::swap(&mut p.x, &mut p.y);
            }
            if let (Some(x), Some(y)) = (edge.x, edge.y) {
                edge.x = Some(y);
                edge.y = Some(x);
            }
        }
    }
}
