#![forbid(unsafe_code)]

//! A directed multigraph container with compound (nested) node support.
//!
//! Nodes are identified by strings, edges by `(tail, head, name)` triples so
//! parallel edges can coexist. Node, edge, and graph labels are generic.
//! Iteration over nodes and edges always follows insertion order, which the
//! layout engine relies on for deterministic output.

mod graph;

pub mod alg;

pub use graph::{EdgeId, Graph, GraphOptions};
