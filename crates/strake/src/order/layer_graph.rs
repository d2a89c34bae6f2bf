//! Single-rank layer graphs for the ordering sweeps.
//!
//! A layer graph holds the movable nodes of one rank (compound parents
//! appear through their border segments at that rank), the fixed-rank
//! neighbours they connect to, and aggregated edge weights. Edges always
//! point fixed → movable so the barycenter pass can read in-edges
//! regardless of sweep direction.

use super::{LayerGraphLabel, Relationship, WeightLabel};
use crate::graph::{Graph, GraphOptions};
use crate::{LayoutGraph, NodeLabel};

pub fn build_layer_graph(
    g: &LayoutGraph,
    rank: i32,
    relationship: Relationship,
    root: &str,
) -> Graph<NodeLabel, WeightLabel, LayerGraphLabel> {
    let mut result: Graph<NodeLabel, WeightLabel, LayerGraphLabel> = Graph::new(GraphOptions {
        compound: true,
        ..Default::default()
    });
    result.set_graph(LayerGraphLabel {
        root: root.to_string(),
    });
    result.set_node(root.to_string(), NodeLabel::default());

    for v in g.nodes() {
        let Some(node) = g.node(v) else {
            continue;
        };

        let in_rank = node.rank == Some(rank)
            || match (node.min_rank, node.max_rank) {
                (Some(min), Some(max)) => min <= rank && rank <= max,
                _ => false,
            };
        if !in_rank {
            continue;
        }

        result.set_node(v.to_string(), node.clone());
        let parent = g
            .parent(v)
            .map(str::to_string)
            .unwrap_or_else(|| root.to_string());
        result.set_parent(v.to_string(), parent);

        // Pull in the fixed-rank endpoints, accumulating parallel weights.
        let edges = match relationship {
            Relationship::InEdges => g.in_edges(v, None),
            Relationship::OutEdges => g.out_edges(v, None),
        };
        for e in edges {
            let u = if e.tail == v {
                e.head.as_str()
            } else {
                e.tail.as_str()
            };
            if !result.has_node(u) {
                let label = g.node(u).cloned().unwrap_or_default();
                result.set_node(u.to_string(), label);
            }
            let weight = g.edge_by_id(&e).map(|l| l.weight).unwrap_or(0.0);
            let existing = result.edge(u, v, None).map(|l| l.weight).unwrap_or(0.0);
            result.set_edge_with(
                u.to_string(),
                v.to_string(),
                WeightLabel {
                    weight: weight + existing,
                },
            );
        }

        // A compound parent contributes only its border pair at this rank.
        if node.min_rank.is_some() {
            result.set_node(v.to_string(), node.layer_view(rank));
        }
    }

    result
}
