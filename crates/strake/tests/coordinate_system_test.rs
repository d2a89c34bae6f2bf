use strake::graph::{Graph, GraphOptions};
use strake::{EdgeLabel, GraphLabel, LayoutGraph, NodeLabel, Point, RankDir, coordinate_system};

fn new_graph(rankdir: RankDir) -> LayoutGraph {
    let mut g: LayoutGraph = Graph::new(GraphOptions {
        multigraph: true,
        compound: true,
        ..Default::default()
    });
    g.set_graph(GraphLabel {
        rankdir,
        ..Default::default()
    });
    g.set_default_node_label(NodeLabel::default);
    g.set_default_edge_label(EdgeLabel::default);
    g
}

fn sized_node(width: f64, height: f64) -> NodeLabel {
    NodeLabel {
        width,
        height,
        ..Default::default()
    }
}

#[test]
fn adjust_is_a_no_op_for_vertical_layouts() {
    for rankdir in [RankDir::TB, RankDir::BT] {
        let mut g = new_graph(rankdir);
        g.set_node("a", sized_node(100.0, 200.0));

        coordinate_system::adjust(&mut g);

        assert_eq!(g.node("a").unwrap().width, 100.0);
        assert_eq!(g.node("a").unwrap().height, 200.0);
    }
}

#[test]
fn adjust_transposes_boxes_for_horizontal_layouts() {
    for rankdir in [RankDir::LR, RankDir::RL] {
        let mut g = new_graph(rankdir);
        g.set_node("a", sized_node(100.0, 200.0));
        g.set_edge_with(
            "a",
            "b",
            EdgeLabel {
                width: 30.0,
                height: 40.0,
                ..Default::default()
            },
        );

        coordinate_system::adjust(&mut g);

        assert_eq!(g.node("a").unwrap().width, 200.0);
        assert_eq!(g.node("a").unwrap().height, 100.0);
        let edge = g.edge("a", "b", None).unwrap();
        assert_eq!(edge.width, 40.0);
        assert_eq!(edge.height, 30.0);
    }
}

#[test]
fn undo_reverses_y_for_bottom_to_top() {
    let mut g = new_graph(RankDir::BT);
    let mut node = sized_node(10.0, 10.0);
    node.x = Some(5.0);
    node.y = Some(100.0);
    g.set_node("a", node);

    coordinate_system::undo(&mut g);

    assert_eq!(g.node("a").unwrap().x, Some(5.0));
    assert_eq!(g.node("a").unwrap().y, Some(-100.0));
}

#[test]
fn undo_swaps_axes_for_left_to_right() {
    let mut g = new_graph(RankDir::LR);
    let mut node = sized_node(10.0, 20.0);
    node.x = Some(5.0);
    node.y = Some(100.0);
    g.set_node("a", node);
    g.set_edge_with(
        "a",
        "b",
        EdgeLabel {
            points: vec![Point { x: 1.0, y: 2.0 }],
            x: Some(3.0),
            y: Some(4.0),
            ..Default::default()
        },
    );

    coordinate_system::undo(&mut g);

    let a = g.node("a").unwrap();
    assert_eq!(a.x, Some(100.0));
    assert_eq!(a.y, Some(5.0));
    assert_eq!((a.width, a.height), (20.0, 10.0));

    let edge = g.edge("a", "b", None).unwrap();
    assert_eq!(edge.points, vec![Point { x: 2.0, y: 1.0 }]);
    assert_eq!((edge.x, edge.y), (Some(4.0), Some(3.0)));
}

#[test]
fn adjust_then_undo_restores_tb_coordinates_unchanged() {
    let mut g = new_graph(RankDir::TB);
    let mut node = sized_node(10.0, 20.0);
    node.x = Some(1.0);
    node.y = Some(2.0);
    g.set_node("a", node.clone());

    coordinate_system::adjust(&mut g);
    coordinate_system::undo(&mut g);

    assert_eq!(g.node("a").unwrap(), &node);
}
