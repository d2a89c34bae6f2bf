//! Self-loop handling.
//!
//! Self-loops would wreck the ranking constraints, so they are pulled off
//! the graph before cycle breaking and stashed on their node. After ordering
//! each stashed loop gets a placeholder dummy immediately to the right of
//! its node, reserving horizontal room; after positioning the placeholder is
//! traded back for the original edge with a hand-built loop polyline.

use crate::util::DummyIds;
use crate::{DummyKind, LayoutGraph, NodeLabel, Point, SelfEdge};

pub fn remove_self_edges(g: &mut LayoutGraph) {
    for e in g.edge_ids() {
        if e.tail != e.head {
            continue;
        }
        let Some(label) = g.edge_by_id(&e).cloned() else {
            continue;
        };
        if let Some(node) = g.node_mut(&e.tail) {
            node.self_edges.push(SelfEdge {
                id: e.clone(),
                label,
            });
        }
        g.remove_edge_id(&e);
    }
}

pub fn insert_self_edges(g: &mut LayoutGraph) {
    let layering = crate::util::build_layer_matrix(g);
    let mut ids = DummyIds::default();

    for layer in layering {
        let mut order_shift = 0usize;
        for (idx, v) in layer.iter().enumerate() {
            let Some(rank) = g.node(v).and_then(|n| n.rank) else {
                continue;
            };

            if let Some(node) = g.node_mut(v) {
                node.order = Some(idx + order_shift);
            }

            let self_edges = g
                .node_mut(v)
                .map(|n| std::mem::take(&mut n.self_edges))
                .unwrap_or_default();

            for se in self_edges {
                order_shift += 1;
                ids.add(
                    g,
                    DummyKind::SelfEdge,
                    NodeLabel {
                        width: se.label.width,
                        height: se.label.height,
                        rank: Some(rank),
                        order: Some(idx + order_shift),
                        edge_label: Some(se.label.clone()),
                        edge_id: Some(se.id.clone()),
                        ..Default::default()
                    },
                    "_se",
                );
            }
        }
    }
}

pub fn position_self_edges(g: &mut LayoutGraph) {
    for v in g.node_ids() {
        let Some(node) = g.node(&v).cloned() else {
            continue;
        };
        if node.dummy != Some(DummyKind::SelfEdge) {
            continue;
        }
        let (Some(x), Some(y)) = (node.x, node.y) else {
            continue;
        };
        let Some(edge_id) = node.edge_id.clone() else {
            continue;
        };
        let Some(mut label) = node.edge_label.clone() else {
            continue;
        };
        let Some(owner) = g.node(&edge_id.tail) else {
            continue;
        };
        let (Some(ox), Some(oy)) = (owner.x, owner.y) else {
            continue;
        };

        // The loop leaves the owner's right edge, bulges out to the
        // placeholder's x, and returns; the fractions are fixed.
        let base_x = ox + owner.width / 2.0;
        let dx = x - base_x;
        let dy = owner.height / 2.0;

        label.points = vec![
            Point {
                x: base_x + 2.0 * dx / 3.0,
                y: oy - dy,
            },
            Point {
                x: base_x + 5.0 * dx / 6.0,
                y: oy - dy,
            },
            Point {
                x: base_x + dx,
                y: oy,
            },
            Point {
                x: base_x + 5.0 * dx / 6.0,
                y: oy + dy,
            },
            Point {
                x: base_x + 2.0 * dx / 3.0,
                y: oy + dy,
            },
        ];
        label.x = Some(x);
        label.y = Some(y);

        g.set_edge_named(
            edge_id.tail.clone(),
            edge_id.head.clone(),
            edge_id.name.clone(),
            Some(label),
        );
        g.remove_node(&v);
    }
}
