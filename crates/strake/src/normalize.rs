//! Long-edge normalization.
//!
//! After ranking, every edge spanning more than one rank is replaced by a
//! chain of dummy nodes so the ordering and positioning stages only ever see
//! unit-length edges. The chain dummy sitting at the edge's `label_rank`
//! adopts the label's box so positioning reserves room for it. `undo`
//! collapses each chain back into its original edge, harvesting the dummy
//! coordinates as the edge's polyline.

use crate::graph::EdgeId;
use crate::util::DummyIds;
use crate::{DummyKind, EdgeLabel, LayoutGraph, NodeLabel, Point};

pub fn run(g: &mut LayoutGraph) {
    g.graph_mut().dummy_chains.clear();
    let mut ids = DummyIds::default();
    for e in g.edge_ids() {
        split_edge(g, e, &mut ids);
    }
}

fn split_edge(g: &mut LayoutGraph, e: EdgeId, ids: &mut DummyIds) {
    let tail_rank = g.node(&e.tail).and_then(|n| n.rank).unwrap_or(0);
    let head_rank = g.node(&e.head).and_then(|n| n.rank).unwrap_or(0);
    if head_rank == tail_rank + 1 {
        return;
    }

    let Some(mut edge_label) = g.edge_by_id(&e).cloned() else {
        return;
    };
    let label_rank = edge_label.label_rank;

    g.remove_edge_id(&e);
    edge_label.points.clear();

    let mut prev = e.tail.clone();
    let mut first_dummy = true;

    for rank in (tail_rank + 1)..head_rank {
        let dummy = ids.add(
            g,
            DummyKind::Edge,
            NodeLabel {
                width: 0.0,
                height: 0.0,
                rank: Some(rank),
                edge_label: Some(edge_label.clone()),
                edge_id: Some(e.clone()),
                ..Default::default()
            },
            "_d",
        );

        if first_dummy {
            first_dummy = false;
            g.graph_mut().dummy_chains.push(dummy.clone());
        }

        if label_rank == Some(rank) {
            if let Some(node) = g.node_mut(&dummy) {
                node.width = edge_label.width;
                node.height = edge_label.height;
                node.dummy = Some(DummyKind::EdgeLabel);
                node.labelpos = Some(edge_label.labelpos);
            }
        }

        g.set_edge_named(
            prev,
            dummy.clone(),
            e.name.clone(),
            Some(EdgeLabel {
                weight: edge_label.weight,
                ..Default::default()
            }),
        );
        prev = dummy;
    }

    g.set_edge_named(
        prev,
        e.head.clone(),
        e.name.clone(),
        Some(EdgeLabel {
            weight: edge_label.weight,
            ..Default::default()
        }),
    );
}

pub fn undo(g: &mut LayoutGraph) {
    let chains = g.graph().dummy_chains.clone();
    for start in chains {
        let Some(start_node) = g.node(&start) else {
            continue;
        };
        let Some(mut original) = start_node.edge_label.clone() else {
            continue;
        };
        let Some(edge_id) = start_node.edge_id.clone() else {
            continue;
        };

        let mut v = start;
        while let Some(node) = g.node(&v) {
            if node.dummy.is_none() {
                break;
            }

            if let (Some(x), Some(y)) = (node.x, node.y) {
                original.points.push(Point { x, y });
                if node.dummy == Some(DummyKind::EdgeLabel) {
                    original.x = Some(x);
                    original.y = Some(y);
                    original.width = node.width;
                    original.height = node.height;
                }
            }

            let next = g.successors(&v).first().map(|s| s.to_string());
            g.remove_node(&v);
            match next {
                Some(next) => v = next,
                None => break,
            }
        }

        g.set_edge_id(edge_id, original);
    }
}
