use strake::graph::{Graph, GraphOptions};
use strake::greedy_fas::{greedy_fas, greedy_fas_weighted};

fn new_graph() -> Graph<(), f64, ()> {
    let mut g = Graph::new(GraphOptions {
        multigraph: true,
        ..Default::default()
    });
    g.set_default_edge_label(|| 1.0);
    g
}

#[test]
fn returns_nothing_for_an_empty_graph() {
    let g = new_graph();
    assert!(greedy_fas(&g).is_empty());
}

#[test]
fn returns_nothing_for_a_single_node() {
    let mut g = new_graph();
    g.set_node("a", ());
    assert!(greedy_fas(&g).is_empty());
}

#[test]
fn returns_nothing_for_a_dag() {
    let mut g = new_graph();
    g.set_path(&["a", "b", "c"]);
    g.set_edge("a", "c");
    assert!(greedy_fas(&g).is_empty());
}

#[test]
fn breaks_a_two_cycle_with_one_edge() {
    let mut g = new_graph();
    g.set_edge("a", "b");
    g.set_edge("b", "a");

    let fas = greedy_fas(&g);
    assert_eq!(fas.len(), 1);
}

#[test]
fn breaks_all_simple_cycles() {
    let mut g = new_graph();
    g.set_path(&["a", "b", "c", "a"]);
    g.set_path(&["d", "e", "d"]);

    let mut fas = greedy_fas(&g);
    // Removing the selected edges must leave a DAG.
    for e in fas.drain(..) {
        g.remove_edge_id(&e);
    }
    assert!(topological_sort_exists(&g));
}

#[test]
fn weighted_selection_sacrifices_the_lighter_direction() {
    let mut g: Graph<(), f64, ()> = new_graph();
    g.set_edge_with("a", "b", 5.0);
    g.set_edge_with("b", "a", 2.0);

    let fas = greedy_fas_weighted(&g, |w| *w as i64);
    assert_eq!(fas.len(), 1);
    assert_eq!(fas[0].tail, "b");
    assert_eq!(fas[0].head, "a");
}

#[test]
fn expands_aggregated_pairs_back_to_multi_edges() {
    let mut g = new_graph();
    g.set_edge_with("a", "b", 5.0);
    g.set_edge_named("b", "a", Some("x"), Some(1.0));
    g.set_edge_named("b", "a", Some("y"), Some(1.0));

    let fas = greedy_fas_weighted(&g, |w| *w as i64);
    // Both parallel back edges are selected together.
    assert_eq!(fas.len(), 2);
    assert!(fas.iter().all(|e| e.tail == "b" && e.head == "a"));
}

fn topological_sort_exists(g: &Graph<(), f64, ()>) -> bool {
    let mut indegree: std::collections::HashMap<String, usize> = g
        .node_ids()
        .into_iter()
        .map(|v| {
            let d = g.in_edges(&v, None).len();
            (v, d)
        })
        .collect();
    let mut queue: Vec<String> = indegree
        .iter()
        .filter(|(_, &d)| d == 0)
        .map(|(v, _)| v.clone())
        .collect();
    let mut seen = 0usize;
    while let Some(v) = queue.pop() {
        seen += 1;
        for e in g.out_edges(&v, None) {
            let d = indegree.get_mut(&e.head).unwrap();
            *d -= 1;
            if *d == 0 {
                queue.push(e.head.clone());
            }
        }
    }
    seen == g.node_count()
}
