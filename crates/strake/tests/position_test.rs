use strake::graph::{Graph, GraphOptions};
use strake::position::position;
use strake::{EdgeLabel, GraphLabel, LayoutGraph, NodeLabel};

fn new_graph() -> LayoutGraph {
    let mut g: LayoutGraph = Graph::new(GraphOptions {
        multigraph: true,
        compound: true,
        ..Default::default()
    });
    g.set_graph(GraphLabel::default());
    g.set_default_node_label(NodeLabel::default);
    g.set_default_edge_label(EdgeLabel::default);
    g
}

fn set_node(g: &mut LayoutGraph, v: &str, width: f64, height: f64, rank: i32, order: usize) {
    g.set_node(
        v,
        NodeLabel {
            width,
            height,
            rank: Some(rank),
            order: Some(order),
            ..Default::default()
        },
    );
}

#[test]
fn y_centers_each_node_on_its_rank_row() {
    let mut g = new_graph();
    g.graph_mut().ranksep = 40.0;
    set_node(&mut g, "a", 50.0, 100.0, 0, 0);
    set_node(&mut g, "b", 50.0, 60.0, 1, 0);

    position(&mut g);

    assert_eq!(g.node("a").unwrap().y, Some(50.0));
    // Row 0 is 100 tall, then 40 of ranksep, then half of b's 60.
    assert_eq!(g.node("b").unwrap().y, Some(170.0));
}

#[test]
fn y_uses_the_tallest_node_of_the_row() {
    let mut g = new_graph();
    g.graph_mut().ranksep = 10.0;
    set_node(&mut g, "a", 50.0, 100.0, 0, 0);
    set_node(&mut g, "tall", 50.0, 200.0, 0, 1);
    set_node(&mut g, "b", 50.0, 50.0, 1, 0);

    position(&mut g);

    assert_eq!(g.node("a").unwrap().y, Some(100.0));
    assert_eq!(g.node("tall").unwrap().y, Some(100.0));
    assert_eq!(g.node("b").unwrap().y, Some(235.0));
}

#[test]
fn x_separates_same_rank_nodes_by_at_least_nodesep() {
    let mut g = new_graph();
    g.graph_mut().nodesep = 70.0;
    set_node(&mut g, "a", 100.0, 10.0, 0, 0);
    set_node(&mut g, "b", 40.0, 10.0, 0, 1);

    position(&mut g);

    let ax = g.node("a").unwrap().x.unwrap();
    let bx = g.node("b").unwrap().x.unwrap();
    assert!(bx - ax >= 100.0 / 2.0 + 70.0 + 40.0 / 2.0);
}

#[test]
fn x_straightens_a_chain_of_single_successors() {
    let mut g = new_graph();
    set_node(&mut g, "a", 50.0, 10.0, 0, 0);
    set_node(&mut g, "b", 50.0, 10.0, 1, 0);
    set_node(&mut g, "c", 50.0, 10.0, 2, 0);
    g.set_edge("a", "b");
    g.set_edge("b", "c");

    position(&mut g);

    let ax = g.node("a").unwrap().x.unwrap();
    let bx = g.node("b").unwrap().x.unwrap();
    let cx = g.node("c").unwrap().x.unwrap();
    assert_eq!(ax, bx);
    assert_eq!(bx, cx);
}

#[test]
fn x_centers_a_parent_over_balanced_children() {
    let mut g = new_graph();
    set_node(&mut g, "a", 50.0, 10.0, 0, 0);
    set_node(&mut g, "left", 50.0, 10.0, 1, 0);
    set_node(&mut g, "right", 50.0, 10.0, 1, 1);
    g.set_edge("a", "left");
    g.set_edge("a", "right");

    position(&mut g);

    let ax = g.node("a").unwrap().x.unwrap();
    let lx = g.node("left").unwrap().x.unwrap();
    let rx = g.node("right").unwrap().x.unwrap();
    assert!(lx < rx);
    assert!(lx <= ax && ax <= rx);
}

#[test]
fn dummy_nodes_use_edgesep_spacing() {
    let mut g = new_graph();
    g.graph_mut().nodesep = 100.0;
    g.graph_mut().edgesep = 20.0;
    set_node(&mut g, "a", 50.0, 10.0, 0, 0);
    g.set_node(
        "dummy",
        NodeLabel {
            rank: Some(0),
            order: Some(1),
            dummy: Some(strake::DummyKind::Edge),
            ..Default::default()
        },
    );

    position(&mut g);

    let ax = g.node("a").unwrap().x.unwrap();
    let dx = g.node("dummy").unwrap().x.unwrap();
    // Half of each box plus the mixed separation: 25 + (100 + 20) / 2.
    assert_eq!(dx - ax, 25.0 + 60.0);
}
