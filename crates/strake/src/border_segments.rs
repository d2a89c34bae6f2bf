//! Border segments for compound parents.
//!
//! Every compound parent gets a left and a right border dummy on each rank it
//! spans, chained vertically with weight-1 edges. Ordering keeps children
//! between the borders, and positioning later derives the parent rectangle
//! from the extreme border coordinates.

use crate::util::DummyIds;
use crate::{BorderSide, DummyKind, EdgeLabel, LayoutGraph, NodeLabel};

pub fn add_border_segments(g: &mut LayoutGraph) {
    if !g.options().compound {
        return;
    }

    let roots: Vec<String> = g.root_children().into_iter().map(str::to_string).collect();
    let mut ids = DummyIds::default();
    for v in roots {
        dfs(g, &v, &mut ids);
    }
}

fn dfs(g: &mut LayoutGraph, v: &str, ids: &mut DummyIds) {
    let children: Vec<String> = g.children(v).into_iter().map(str::to_string).collect();
    for child in children {
        dfs(g, &child, ids);
    }

    let Some((min_rank, max_rank)) = g.node(v).and_then(|n| Some((n.min_rank?, n.max_rank?)))
    else {
        return;
    };

    let len = max_rank.max(0) as usize + 1;
    if let Some(node) = g.node_mut(v) {
        node.border_left = vec![None; len];
        node.border_right = vec![None; len];
    }

    let mut prev_left: Option<String> = None;
    let mut prev_right: Option<String> = None;

    for rank in min_rank..=max_rank {
        let left = add_border_node(g, ids, BorderSide::Left, "_bl", v, rank);
        if let Some(prev) = prev_left {
            g.set_edge_with(
                prev,
                left.clone(),
                EdgeLabel {
                    weight: 1.0,
                    ..Default::default()
                },
            );
        }
        prev_left = Some(left);

        let right = add_border_node(g, ids, BorderSide::Right, "_br", v, rank);
        if let Some(prev) = prev_right {
            g.set_edge_with(
                prev,
                right.clone(),
                EdgeLabel {
                    weight: 1.0,
                    ..Default::default()
                },
            );
        }
        prev_right = Some(right);
    }
}

fn add_border_node(
    g: &mut LayoutGraph,
    ids: &mut DummyIds,
    side: BorderSide,
    prefix: &'static str,
    parent: &str,
    rank: i32,
) -> String {
    let id = ids.add(
        g,
        DummyKind::Border,
        NodeLabel {
            width: 0.0,
            height: 0.0,
            rank: Some(rank),
            border: Some(side),
            ..Default::default()
        },
        prefix,
    );

    if let Some(node) = g.node_mut(parent) {
        let idx = rank.max(0) as usize;
        match side {
            BorderSide::Left => node.border_left[idx] = Some(id.clone()),
            BorderSide::Right => node.border_right[idx] = Some(id.clone()),
        }
    }

    g.set_parent(id.clone(), parent);
    id
}
