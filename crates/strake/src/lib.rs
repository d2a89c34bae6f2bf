#![forbid(unsafe_code)]

//! Layered directed-graph layout.
//!
//! Given a directed graph with node sizes and edge weights — possibly
//! cyclic, with parallel edges, self-loops, and nested subgraphs — assigns
//! coordinates to every node and routes every edge so the drawing flows by
//! rank with few crossings. The entry point is [`layout`]; the input graph
//! is mutated in place with `x`/`y`/`rank` on nodes, `points` (and label
//! positions) on edges, and the drawing size on the graph label.
//!
//! ```
//! use strake::graph::{Graph, GraphOptions};
//! use strake::{EdgeLabel, GraphLabel, NodeLabel};
//!
//! let mut g: Graph<NodeLabel, EdgeLabel, GraphLabel> = Graph::new(GraphOptions {
//!     multigraph: true,
//!     compound: true,
//!     ..Default::default()
//! });
//! g.set_graph(GraphLabel::default());
//! g.set_default_edge_label(EdgeLabel::default);
//! g.set_node("a", NodeLabel { width: 50.0, height: 100.0, ..Default::default() });
//! g.set_node("b", NodeLabel { width: 75.0, height: 200.0, ..Default::default() });
//! g.set_edge("a", "b");
//!
//! strake::layout(&mut g).unwrap();
//! assert!(g.node("a").unwrap().x.is_some());
//! ```

pub use strake_graph as graph;

mod error;
mod layout;
mod model;

pub mod acyclic;
pub mod border_segments;
pub mod coordinate_system;
pub mod greedy_fas;
pub mod nesting_graph;
pub mod normalize;
pub mod order;
pub mod parent_dummy_chains;
pub mod position;
pub mod rank;
pub mod self_edges;
pub mod util;

pub use error::{LayoutError, Result};
pub use layout::{LayoutOptions, layout, layout_with};
pub use model::{
    BorderSide, DummyKind, EdgeLabel, GraphLabel, LabelPos, NodeLabel, Point, RankDir, SelfEdge,
    canonicalize_attrs,
};

/// The graph shape the engine works on: string node ids with the engine's
/// label types.
pub type LayoutGraph = graph::Graph<NodeLabel, EdgeLabel, GraphLabel>;
