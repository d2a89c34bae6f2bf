//! Crossing minimization.
//!
//! Seeds a per-rank ordering by DFS, then sweeps down and up the ranks,
//! re-sorting each rank by weighted barycenters of the fixed neighbouring
//! rank (recursively per compound subgraph, with a constraint graph keeping
//! sibling clusters apart). The best ordering seen, measured by the bilayer
//! crossing count, wins. Sweeps stop after four consecutive iterations
//! without improvement.

mod barycenter;
mod constraints;
mod cross_count;
mod init_order;
mod layer_graph;
mod sort;

pub use barycenter::{BarycenterEntry, barycenter, resolve_conflicts};
pub use constraints::add_subgraph_constraints;
pub use cross_count::cross_count;
pub use init_order::init_order;
pub use layer_graph::build_layer_graph;
pub use sort::{SortEntry, SortResult, sort, sort_subgraph};

use crate::graph::{Graph, GraphOptions};
use crate::{LayoutGraph, util};

/// Which adjacent rank an ordering pass measures against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relationship {
    InEdges,
    OutEdges,
}

/// Graph label of a single-rank layer graph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerGraphLabel {
    pub root: String,
}

/// Edge label of a layer graph: parallel edges collapse to a summed weight.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WeightLabel {
    pub weight: f64,
}

/// Read access to an edge's weight, implemented for both the engine's edge
/// label and the layer-graph weight label so the crossing counter works on
/// either graph.
pub trait EdgeWeight {
    fn weight(&self) -> f64;
}

impl EdgeWeight for WeightLabel {
    fn weight(&self) -> f64 {
        self.weight
    }
}

impl EdgeWeight for crate::EdgeLabel {
    fn weight(&self) -> f64 {
        self.weight
    }
}

pub fn order(g: &mut LayoutGraph) {
    let Some(max_rank) = util::max_rank(g) else {
        return;
    };

    let layering = init_order(g);
    assign_order(g, &layering);

    let root = util::fresh_id(g, "_root");

    let ranks_down: Vec<i32> = (1..=max_rank).collect();
    let ranks_up: Vec<i32> = (0..max_rank).rev().collect();

    let mut best_cc = f64::INFINITY;
    let mut best_layering: Option<Vec<Vec<String>>> = None;

    let mut i = 0usize;
    let mut last_best = 0usize;
    while last_best < 4 {
        let bias_right = i % 4 >= 2;
        if i % 2 == 1 {
            sweep(g, &ranks_down, Relationship::InEdges, bias_right, &root);
        } else {
            sweep(g, &ranks_up, Relationship::OutEdges, bias_right, &root);
        }

        let layering = util::build_layer_matrix(g);
        let cc = cross_count(g, &layering);
        if cc < best_cc {
            last_best = 0;
            best_cc = cc;
            best_layering = Some(layering);
        }

        i += 1;
        last_best += 1;
    }

    if let Some(best) = best_layering {
        assign_order(g, &best);
    }
}

fn assign_order(g: &mut LayoutGraph, layering: &[Vec<String>]) {
    for layer in layering {
        for (i, v) in layer.iter().enumerate() {
            if let Some(node) = g.node_mut(v) {
                node.order = Some(i);
            }
        }
    }
}

fn sweep(
    g: &mut LayoutGraph,
    ranks: &[i32],
    relationship: Relationship,
    bias_right: bool,
    root: &str,
) {
    let mut cg: Graph<(), (), ()> = Graph::new(GraphOptions::default());

    for &rank in ranks {
        let lg = build_layer_graph(g, rank, relationship, root);
        let sorted = sort_subgraph(&lg, root, &cg, bias_right);
        for (i, v) in sorted.vs.iter().enumerate() {
            if let Some(node) = g.node_mut(v) {
                node.order = Some(i);
            }
        }
        add_subgraph_constraints(&lg, &mut cg, &sorted.vs);
    }
}
