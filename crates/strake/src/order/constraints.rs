//! Subgraph ordering constraints.
//!
//! After a rank is sorted, sibling clusters that appeared in a given order
//! must keep that order on later ranks; this records a constraint edge
//! between each adjacent pair of ancestors.

use crate::graph::Graph;
use rustc_hash::FxHashMap;

pub fn add_subgraph_constraints<N, E, G, CN, CE, CG>(
    g: &Graph<N, E, G>,
    cg: &mut Graph<CN, CE, CG>,
    vs: &[String],
) where
    N: Default,
    E: Default,
    G: Default,
    CN: Default,
    CE: Default,
    CG: Default,
{
    let mut prev: FxHashMap<&str, &str> = FxHashMap::default();
    let mut root_prev: Option<&str> = None;

    for v in vs {
        let mut child = g.parent(v.as_str());
        while let Some(c) = child {
            let parent = g.parent(c);

            let prev_child = match parent {
                Some(p) => prev.insert(p, c),
                None => root_prev.replace(c),
            };

            if let Some(prev_child) = prev_child {
                if prev_child != c {
                    cg.set_edge(prev_child, c);
                    break;
                }
            }

            child = parent;
        }
    }
}
