//! Reattach normalized dummy chains to compound parents.
//!
//! A long edge between nodes in different clusters threads through several
//! cluster boundaries. Each chain dummy is assigned the cluster whose rank
//! span covers the dummy's rank, walking the parent path from the edge's
//! tail up to the lowest common ancestor and back down to the head.

use crate::LayoutGraph;
use std::collections::BTreeMap;

struct SubtreeSpan {
    low: usize,
    lim: usize,
}

pub fn parent_dummy_chains(g: &mut LayoutGraph) {
    let spans = postorder_spans(g);

    for start in g.graph().dummy_chains.clone() {
        let Some(edge_id) = g.node(&start).and_then(|n| n.edge_id.clone()) else {
            continue;
        };

        let (path, lca) = find_path(g, &spans, &edge_id.tail, &edge_id.head);

        let mut path_idx = 0usize;
        let mut path_v = path.first().cloned().unwrap_or(None);
        let mut ascending = true;
        let mut v = start;

        while v != edge_id.head {
            let rank = g.node(&v).and_then(|n| n.rank).unwrap_or(0);

            if ascending {
                while path_v != lca
                    && path_v
                        .as_deref()
                        .and_then(|p| g.node(p))
                        .and_then(|n| n.max_rank)
                        .unwrap_or(i32::MAX / 2)
                        < rank
                {
                    path_idx += 1;
                    path_v = path.get(path_idx).cloned().unwrap_or(None);
                }
                if path_v == lca {
                    ascending = false;
                }
            }

            if !ascending {
                while path_idx + 1 < path.len()
                    && path
                        .get(path_idx + 1)
                        .and_then(|p| p.as_deref())
                        .and_then(|p| g.node(p))
                        .and_then(|n| n.min_rank)
                        .unwrap_or(i32::MIN / 2)
                        <= rank
                {
                    path_idx += 1;
                }
                path_v = path.get(path_idx).cloned().unwrap_or(None);
            }

            match &path_v {
                Some(parent) => {
                    g.set_parent(v.clone(), parent.clone());
                }
                None => {
                    g.remove_parent(&v);
                }
            }

            let Some(next) = g.successors(&v).first().map(|s| s.to_string()) else {
                break;
            };
            v = next;
        }
    }
}

/// Parent path from `tail` up to the LCA and down to `head`, plus the LCA
/// itself (`None` when the endpoints only meet at the root level).
fn find_path(
    g: &LayoutGraph,
    spans: &BTreeMap<String, SubtreeSpan>,
    tail: &str,
    head: &str,
) -> (Vec<Option<String>>, Option<String>) {
    let (Some(tail_span), Some(head_span)) = (spans.get(tail), spans.get(head)) else {
        return (Vec::new(), None);
    };
    let low = tail_span.low.min(head_span.low);
    let lim = tail_span.lim.max(head_span.lim);

    let mut up_path: Vec<Option<String>> = Vec::new();
    let mut parent = Some(tail.to_string());
    let lca: Option<String>;
    loop {
        parent = parent
            .as_deref()
            .and_then(|p| g.parent(p))
            .map(str::to_string);
        up_path.push(parent.clone());
        let Some(p) = parent.clone() else {
            lca = None;
            break;
        };
        let Some(span) = spans.get(&p) else {
            lca = None;
            break;
        };
        if span.low <= low && lim <= span.lim {
            lca = Some(p);
            break;
        }
    }

    let mut down_path: Vec<Option<String>> = Vec::new();
    let mut cur = head.to_string();
    loop {
        let p = g.parent(&cur).map(str::to_string);
        if p == lca || p.is_none() {
            break;
        }
        down_path.push(p.clone());
        match p {
            Some(p) => cur = p,
            None => break,
        }
    }

    let mut path = up_path;
    down_path.reverse();
    path.extend(down_path);
    (path, lca)
}

fn postorder_spans(g: &LayoutGraph) -> BTreeMap<String, SubtreeSpan> {
    fn dfs(g: &LayoutGraph, v: &str, lim: &mut usize, out: &mut BTreeMap<String, SubtreeSpan>) {
        let low = *lim;
        for child in g.children(v) {
            dfs(g, child, lim, out);
        }
        out.insert(v.to_string(), SubtreeSpan { low, lim: *lim });
        *lim += 1;
    }

    let mut out = BTreeMap::new();
    let mut lim = 0usize;
    for v in g.root_children() {
        dfs(g, v, &mut lim, &mut out);
    }
    out
}
