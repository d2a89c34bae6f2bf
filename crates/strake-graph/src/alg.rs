//! Traversal helpers over [`Graph`].
//!
//! `preorder` / `postorder` walk successors (neighbors in an undirected
//! graph); `components` finds weakly connected components. All three visit
//! nodes in insertion order so results are deterministic.

use crate::Graph;
use rustc_hash::FxHashSet;
use std::collections::VecDeque;

pub fn preorder<N, E, G>(g: &Graph<N, E, G>, roots: &[&str]) -> Vec<String>
where
    N: Default,
    E: Default,
    G: Default,
{
    let mut visited: FxHashSet<String> = FxHashSet::default();
    let mut out: Vec<String> = Vec::new();
    for root in roots {
        preorder_dfs(g, root, &mut visited, &mut out);
    }
    out
}

fn preorder_dfs<N, E, G>(
    g: &Graph<N, E, G>,
    v: &str,
    visited: &mut FxHashSet<String>,
    out: &mut Vec<String>,
) where
    N: Default,
    E: Default,
    G: Default,
{
    if !visited.insert(v.to_string()) {
        return;
    }
    out.push(v.to_string());
    for w in g.successors(v) {
        preorder_dfs(g, w, visited, out);
    }
}

pub fn postorder<N, E, G>(g: &Graph<N, E, G>, roots: &[&str]) -> Vec<String>
where
    N: Default,
    E: Default,
    G: Default,
{
    let mut visited: FxHashSet<String> = FxHashSet::default();
    let mut out: Vec<String> = Vec::new();
    for root in roots {
        postorder_dfs(g, root, &mut visited, &mut out);
    }
    out
}

fn postorder_dfs<N, E, G>(
    g: &Graph<N, E, G>,
    v: &str,
    visited: &mut FxHashSet<String>,
    out: &mut Vec<String>,
) where
    N: Default,
    E: Default,
    G: Default,
{
    if !visited.insert(v.to_string()) {
        return;
    }
    for w in g.successors(v) {
        postorder_dfs(g, w, visited, out);
    }
    out.push(v.to_string());
}

pub fn components<N, E, G>(g: &Graph<N, E, G>) -> Vec<Vec<String>>
where
    N: Default,
    E: Default,
    G: Default,
{
    let mut seen: FxHashSet<String> = FxHashSet::default();
    let mut out: Vec<Vec<String>> = Vec::new();

    for start in g.node_ids() {
        if !seen.insert(start.clone()) {
            continue;
        }
        let mut component: Vec<String> = Vec::new();
        let mut queue: VecDeque<String> = VecDeque::new();
        queue.push_back(start);
        while let Some(v) = queue.pop_front() {
            component.push(v.clone());
            for w in g.successors(&v).into_iter().chain(g.predecessors(&v)) {
                if seen.insert(w.to_string()) {
                    queue.push_back(w.to_string());
                }
            }
        }
        out.push(component);
    }

    out
}
