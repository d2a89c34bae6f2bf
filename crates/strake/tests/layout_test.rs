use strake::graph::{Graph, GraphOptions};
use strake::{
    EdgeLabel, GraphLabel, LabelPos, LayoutError, LayoutGraph, NodeLabel, RankDir, layout,
    layout_with,
};

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

fn sized(width: f64, height: f64) -> NodeLabel {
    NodeLabel {
        width,
        height,
        ..Default::default()
    }
}

fn coords(g: &LayoutGraph) -> std::collections::BTreeMap<String, (f64, f64)> {
    g.node_ids()
        .into_iter()
        .map(|v| {
            let n = g.node(&v).unwrap();
            (v, (n.x.unwrap(), n.y.unwrap()))
        })
        .collect()
}

#[test]
fn lays_out_an_empty_graph() {
    let mut g = new_graph();
    g.graph_mut().marginx = 20.0;
    g.graph_mut().marginy = 30.0;

    layout(&mut g).unwrap();

    assert_eq!(g.graph().width, 40.0);
    assert_eq!(g.graph().height, 60.0);
}

#[test]
fn lays_out_a_single_node() {
    let mut g = new_graph();
    g.set_node("a", sized(50.0, 100.0));

    layout(&mut g).unwrap();

    assert_eq!(coords(&g), [("a".to_string(), (25.0, 50.0))].into());
    assert_eq!(g.node("a").unwrap().rank, Some(0));
    assert_eq!(g.graph().width, 50.0);
    assert_eq!(g.graph().height, 100.0);
}

#[test]
fn margins_shift_a_single_node() {
    let mut g = new_graph();
    g.graph_mut().marginx = 10.0;
    g.graph_mut().marginy = 5.0;
    g.set_node("a", sized(50.0, 100.0));

    layout(&mut g).unwrap();

    assert_eq!(coords(&g), [("a".to_string(), (35.0, 55.0))].into());
    assert_eq!(g.graph().width, 70.0);
    assert_eq!(g.graph().height, 110.0);
}

#[test]
fn lays_out_two_nodes_on_the_same_rank() {
    let mut g = new_graph();
    g.graph_mut().nodesep = 200.0;
    g.set_node("a", sized(50.0, 100.0));
    g.set_node("b", sized(75.0, 200.0));

    layout(&mut g).unwrap();

    assert_eq!(
        coords(&g),
        [
            ("a".to_string(), (25.0, 100.0)),
            ("b".to_string(), (50.0 + 200.0 + 75.0 / 2.0, 100.0)),
        ]
        .into()
    );
}

#[test]
fn lays_out_two_nodes_connected_by_an_edge() {
    let mut g = new_graph();
    g.set_node("a", sized(50.0, 100.0));
    g.set_node("b", sized(75.0, 200.0));
    g.set_edge("a", "b");

    layout(&mut g).unwrap();

    assert_eq!(
        coords(&g),
        [
            ("a".to_string(), (37.5, 50.0)),
            ("b".to_string(), (37.5, 250.0)),
        ]
        .into()
    );
    assert_eq!(g.node("a").unwrap().rank, Some(0));
    assert_eq!(g.node("b").unwrap().rank, Some(1));
    assert_eq!(g.graph().max_rank, Some(1));

    // The rank gap is half the node heights plus the configured ranksep.
    let a = g.node("a").unwrap();
    let b = g.node("b").unwrap();
    assert_eq!(
        b.y.unwrap() - a.y.unwrap(),
        (a.height + b.height) / 2.0 + 50.0
    );

    // Boundary point, label midpoint, boundary point.
    let points = &g.edge("a", "b", None).unwrap().points;
    assert_eq!(points.len(), 3);
    assert_eq!((points[0].x, points[0].y), (37.5, 100.0));
    assert_eq!((points[1].x, points[1].y), (37.5, 125.0));
    assert_eq!((points[2].x, points[2].y), (37.5, 150.0));
}

#[test]
fn routes_a_self_loop_to_the_right_of_its_node() {
    let mut g = new_graph();
    g.set_node("a", sized(100.0, 100.0));
    g.set_edge("a", "a");

    layout(&mut g).unwrap();

    let a = g.node("a").unwrap().clone();
    let edge = g.edge("a", "a", None).unwrap();

    assert_eq!(edge.points.len(), 7);
    for p in &edge.points {
        assert!(p.x > a.x.unwrap(), "loop point {p:?} is not right of the node");
    }
    // The loop starts and ends on the node's right boundary.
    let right = a.x.unwrap() + a.width / 2.0;
    assert_eq!(edge.points[0].x, right);
    assert_eq!(edge.points[6].x, right);

    // The node keeps its size; the drawing grows by the loop's reach.
    assert_eq!(a.width, 100.0);
    assert!(g.graph().width > 100.0);
}

#[test]
fn routes_a_long_edge_through_every_intermediate_rank() {
    let mut g = new_graph();
    g.set_node("a", sized(10.0, 10.0));
    g.set_node("b", sized(10.0, 10.0));
    g.set_edge_with(
        "a",
        "b",
        EdgeLabel {
            minlen: 3,
            ..Default::default()
        },
    );

    layout(&mut g).unwrap();

    assert_eq!(g.node("b").unwrap().rank, Some(3));

    let points = &g.edge("a", "b", None).unwrap().points;
    assert_eq!(points.len(), 7);
    for pair in points.windows(2) {
        assert!(pair[0].y < pair[1].y, "polyline is not monotone in y");
    }
    let a = g.node("a").unwrap();
    let b = g.node("b").unwrap();
    assert_eq!(points[0].y, a.y.unwrap() + a.height / 2.0);
    assert_eq!(points[6].y, b.y.unwrap() - b.height / 2.0);
}

#[test]
fn reverses_cycle_edges_and_restores_them() {
    let mut g = new_graph();
    g.set_node("a", sized(10.0, 10.0));
    g.set_node("b", sized(10.0, 10.0));
    g.set_edge("a", "b");
    g.set_edge("b", "a");

    layout(&mut g).unwrap();

    // Both original edges are back, each with a routed polyline.
    assert!(g.has_edge("a", "b", None));
    assert!(g.has_edge("b", "a", None));

    let forward = g.edge("a", "b", None).unwrap();
    let backward = g.edge("b", "a", None).unwrap();
    assert!(forward.points.len() >= 2);
    assert!(backward.points.len() >= 2);

    // The reversed edge's polyline reads from its own tail to its head.
    let a = g.node("a").unwrap();
    let b = g.node("b").unwrap();
    let first = backward.points.first().unwrap();
    let last = backward.points.last().unwrap();
    assert!((first.y - b.y.unwrap()).abs() < (first.y - a.y.unwrap()).abs());
    assert!((last.y - a.y.unwrap()).abs() < (last.y - b.y.unwrap()).abs());
}

#[test]
fn rankdir_controls_the_flow_axis() {
    let run = |rankdir: RankDir| {
        let mut g = new_graph();
        g.graph_mut().rankdir = rankdir;
        g.set_node("a", sized(50.0, 100.0));
        g.set_node("b", sized(75.0, 200.0));
        g.set_edge("a", "b");
        layout(&mut g).unwrap();
        let a = g.node("a").unwrap().clone();
        let b = g.node("b").unwrap().clone();
        (a, b)
    };

    let (a, b) = run(RankDir::TB);
    assert!(b.y.unwrap() > a.y.unwrap());
    assert_eq!(a.x, b.x);

    let (a, b) = run(RankDir::BT);
    assert!(b.y.unwrap() < a.y.unwrap());
    assert_eq!(a.x, b.x);

    let (a, b) = run(RankDir::LR);
    assert!(b.x.unwrap() > a.x.unwrap());
    assert_eq!(a.y, b.y);

    let (a, b) = run(RankDir::RL);
    assert!(b.x.unwrap() < a.x.unwrap());
    assert_eq!(a.y, b.y);
}

#[test]
fn all_coordinates_land_in_the_positive_quadrant() {
    let mut g = new_graph();
    for v in ["a", "b", "c", "d", "e"] {
        g.set_node(v, sized(60.0, 30.0));
    }
    g.set_path(&["a", "b", "c"]);
    g.set_path(&["a", "d", "c"]);
    g.set_edge("c", "e");
    g.set_edge("e", "a");

    layout(&mut g).unwrap();

    for v in g.node_ids() {
        let n = g.node(&v).unwrap();
        assert!(n.x.unwrap() - n.width / 2.0 >= 0.0);
        assert!(n.y.unwrap() - n.height / 2.0 >= 0.0);
        assert!(n.x.unwrap() + n.width / 2.0 <= g.graph().width);
        assert!(n.y.unwrap() + n.height / 2.0 <= g.graph().height);
    }
}

#[test]
fn parallel_edges_get_separate_routes() {
    let mut g = new_graph();
    g.set_node("a", sized(40.0, 40.0));
    g.set_node("b", sized(40.0, 40.0));
    g.set_edge("a", "b");
    g.set_edge_named("a", "b", Some("second"), None);

    layout(&mut g).unwrap();

    let first = &g.edge("a", "b", None).unwrap().points;
    let second = &g.edge("a", "b", Some("second")).unwrap().points;
    assert_eq!(first.len(), 3);
    assert_eq!(second.len(), 3);
    // The midpoints sit at different horizontal offsets.
    assert_ne!(first[1].x, second[1].x);
}

#[test]
fn places_a_centered_edge_label_on_the_chain() {
    let mut g = new_graph();
    g.set_node("a", sized(50.0, 100.0));
    g.set_node("b", sized(75.0, 200.0));
    g.set_edge_with(
        "a",
        "b",
        EdgeLabel {
            width: 30.0,
            height: 40.0,
            labelpos: LabelPos::C,
            ..Default::default()
        },
    );

    layout(&mut g).unwrap();

    let a = g.node("a").unwrap();
    let b = g.node("b").unwrap();
    let edge = g.edge("a", "b", None).unwrap();
    assert_eq!(edge.x, a.x);
    let y = edge.y.unwrap();
    assert!(a.y.unwrap() < y && y < b.y.unwrap());
}

#[test]
fn shifts_a_right_positioned_edge_label_off_the_centerline() {
    let mut g = new_graph();
    g.set_node("a", sized(50.0, 100.0));
    g.set_node("b", sized(75.0, 200.0));
    g.set_edge_with(
        "a",
        "b",
        EdgeLabel {
            width: 30.0,
            height: 40.0,
            labelpos: LabelPos::R,
            labeloffset: 10.0,
            ..Default::default()
        },
    );

    layout(&mut g).unwrap();

    let a = g.node("a").unwrap();
    let edge = g.edge("a", "b", None).unwrap();
    assert_eq!(edge.x.unwrap(), a.x.unwrap() + 30.0 / 2.0 + 10.0);
}

#[test]
fn lays_out_a_compound_parent_around_its_children() {
    let mut g = new_graph();
    g.set_node("a", sized(30.0, 30.0));
    g.set_node("b", sized(30.0, 30.0));
    g.set_parent("a", "p");
    g.set_parent("b", "p");
    g.set_edge("a", "b");

    layout(&mut g).unwrap();

    let p = g.node("p").unwrap();
    let a = g.node("a").unwrap();
    let b = g.node("b").unwrap();

    assert!(a.rank.unwrap() < b.rank.unwrap());
    assert!(p.width > 0.0 && p.height > 0.0);

    let (px, py) = (p.x.unwrap(), p.y.unwrap());
    for child in [a, b] {
        let (cx, cy) = (child.x.unwrap(), child.y.unwrap());
        assert!(px - p.width / 2.0 <= cx - child.width / 2.0);
        assert!(px + p.width / 2.0 >= cx + child.width / 2.0);
        assert!(py - p.height / 2.0 <= cy - child.height / 2.0);
        assert!(py + p.height / 2.0 >= cy + child.height / 2.0);
    }
}

#[test]
fn layout_is_deterministic() {
    let build = || {
        let mut g = new_graph();
        for v in ["a", "b", "c", "d", "e", "f"] {
            g.set_node(v, sized(40.0, 20.0));
        }
        g.set_path(&["a", "b", "c", "f"]);
        g.set_path(&["a", "d", "e", "f"]);
        g.set_edge("b", "e");
        g.set_edge("f", "a");
        g.set_edge("c", "c");
        g
    };

    let mut g1 = build();
    let mut g2 = build();
    layout(&mut g1).unwrap();
    layout(&mut g2).unwrap();

    assert_eq!(coords(&g1), coords(&g2));
    for e in g1.edge_ids() {
        assert_eq!(
            g1.edge_by_id(&e).unwrap().points,
            g2.edge_by_id(&e).unwrap().points
        );
    }
}

#[test]
fn unrecognized_attributes_survive_layout_untouched() {
    let mut g = new_graph();
    let mut label = sized(20.0, 20.0);
    label
        .extras
        .insert("color".to_string(), serde_json::json!("tomato"));
    g.set_node("a", label);

    let mut edge = EdgeLabel::default();
    edge.extras
        .insert("style".to_string(), serde_json::json!("dashed"));
    g.set_node("b", sized(20.0, 20.0));
    g.set_edge_with("a", "b", edge);

    layout(&mut g).unwrap();

    assert_eq!(
        g.node("a").unwrap().extras.get("color"),
        Some(&serde_json::json!("tomato"))
    );
    assert_eq!(
        g.edge("a", "b", None).unwrap().extras.get("style"),
        Some(&serde_json::json!("dashed"))
    );
}

#[test]
fn rejects_an_unknown_ranker() {
    let mut g = new_graph();
    g.graph_mut().ranker = Some("steepest-descent".to_string());
    g.set_node("a", sized(10.0, 10.0));

    let err = layout(&mut g).unwrap_err();
    assert!(matches!(err, LayoutError::UnknownRanker(name) if name == "steepest-descent"));
}

#[test]
fn rejects_an_unknown_acyclicer() {
    let mut g = new_graph();
    g.graph_mut().acyclicer = Some("lazy".to_string());
    g.set_node("a", sized(10.0, 10.0));

    let err = layout(&mut g).unwrap_err();
    assert!(matches!(err, LayoutError::UnknownAcyclicer(name) if name == "lazy"));
}

#[test]
fn rejects_non_finite_node_dimensions() {
    let mut g = new_graph();
    g.set_node("a", sized(f64::NAN, 10.0));

    assert!(matches!(
        layout(&mut g),
        Err(LayoutError::InvariantViolation(_))
    ));
}

#[test]
fn rejects_a_zero_minlen() {
    let mut g = new_graph();
    g.set_node("a", sized(10.0, 10.0));
    g.set_node("b", sized(10.0, 10.0));
    g.set_edge_with(
        "a",
        "b",
        EdgeLabel {
            minlen: 0,
            ..Default::default()
        },
    );

    assert!(matches!(
        layout(&mut g),
        Err(LayoutError::InvariantViolation(_))
    ));
}

#[test]
fn rejects_dimensions_that_overflow_the_coordinate_space() {
    let mut g = new_graph();
    g.set_node("a", sized(f64::MAX, 10.0));
    g.set_node("b", sized(f64::MAX, 10.0));

    assert!(matches!(
        layout(&mut g),
        Err(LayoutError::CoordinateOverflow)
    ));
}

#[test]
fn failed_validation_leaves_the_input_untouched() {
    let mut g = new_graph();
    g.set_node("a", sized(10.0, 10.0));
    g.graph_mut().ranker = Some("bogus".to_string());

    let _ = layout(&mut g);
    assert_eq!(g.node("a").unwrap().x, None);
    assert_eq!(g.graph().width, 0.0);
}

#[test]
fn debug_timing_writes_stage_lines_without_changing_output() {
    let mut timed = new_graph();
    timed.set_node("a", sized(50.0, 100.0));
    timed.set_node("b", sized(75.0, 200.0));
    timed.set_edge("a", "b");

    let mut silent = new_graph();
    silent.set_node("a", sized(50.0, 100.0));
    silent.set_node("b", sized(75.0, 200.0));
    silent.set_edge("a", "b");

    let mut sink: Vec<u8> = Vec::new();
    layout_with(
        &mut timed,
        strake::LayoutOptions {
            debug_timing: Some(&mut sink),
        },
    )
    .unwrap();
    layout(&mut silent).unwrap();

    let log = String::from_utf8(sink).unwrap();
    for stage in ["rank", "order", "position", "translateGraph"] {
        assert!(log.contains(stage), "missing stage {stage} in timing log");
    }
    assert_eq!(coords(&timed), coords(&silent));
}
