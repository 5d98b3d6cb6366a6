use selkie_lgraph::{
    BreakingPoint, BreakingPointState, GraphLabel, LGraph, NodeId, NodeKind, Point, PortSide,
};

fn new_graph(layers: usize) -> LGraph {
    let mut g = LGraph::new(GraphLabel::default());
    for _ in 0..layers {
        g.add_layer();
    }
    g
}

fn add_node(g: &mut LGraph, layer: usize) -> NodeId {
    let n = g.add_node(NodeKind::Normal);
    let l = g.layer_at(layer).unwrap();
    g.set_layer(n, Some(l));
    n
}

#[test]
fn insert_layer_reindexes_following_layers() {
    let mut g = new_graph(3);
    let old = g.layers().to_vec();
    let inserted = g.insert_layer(1);

    assert_eq!(g.layers(), &[old[0], inserted, old[1], old[2]]);
    for (i, l) in g.layers().iter().enumerate() {
        assert_eq!(g.layer_index(*l), Some(i));
    }
    assert!(g.check_layer_indices());
}

#[test]
fn insert_layer_past_the_end_appends() {
    let mut g = new_graph(2);
    let l = g.insert_layer(99);
    assert_eq!(g.layer_at(2), Some(l));
}

#[test]
fn remove_empty_layers_keeps_order_and_forgets_removed_indices() {
    let mut g = new_graph(4);
    let a = add_node(&mut g, 0);
    let b = add_node(&mut g, 2);
    let removed_layers = [g.layer_at(1).unwrap(), g.layer_at(3).unwrap()];

    assert_eq!(g.remove_empty_layers(), 2);
    assert_eq!(g.layer_count(), 2);
    assert_eq!(g.node_layer(a), g.layer_at(0));
    assert_eq!(g.node_layer(b), g.layer_at(1));
    for l in removed_layers {
        assert_eq!(g.layer_index(l), None);
    }
    assert!(g.check_layer_indices());
}

#[test]
fn set_layer_at_and_detach_keep_node_indices() {
    let mut g = new_graph(2);
    let a = add_node(&mut g, 0);
    let b = add_node(&mut g, 0);
    let c = g.add_node(NodeKind::Normal);
    let l0 = g.layer_at(0).unwrap();

    g.set_layer_at(c, l0, 1);
    assert_eq!(g.layer_nodes(l0), &[a, c, b]);
    assert_eq!(g.node_index(b), Some(2));

    g.set_layer(a, g.layer_at(1));
    assert_eq!(g.layer_nodes(l0), &[c, b]);
    assert_eq!(g.node_index(c), Some(0));
    assert_eq!(g.node_index(a), Some(0));
    assert!(g.check_layer_indices());

    g.set_layer(a, None);
    assert_eq!(g.node_index(a), None);
    assert!(g.check_layer_indices());
}

#[test]
fn replace_node_in_layer_takes_over_the_slot() {
    let mut g = new_graph(2);
    let a = add_node(&mut g, 0);
    let b = add_node(&mut g, 0);
    let c = add_node(&mut g, 0);
    let d = add_node(&mut g, 1);
    let l0 = g.layer_at(0).unwrap();

    assert!(g.replace_node_in_layer(b, d));
    assert_eq!(g.layer_nodes(l0), &[a, d, c]);
    assert_eq!(g.node_layer(b), None);
    assert!(g.layer_nodes(g.layer_at(1).unwrap()).is_empty());
    assert!(g.check_layer_indices());

    // Moving a node within its own layer.
    assert!(g.replace_node_in_layer(c, a));
    assert_eq!(g.layer_nodes(l0), &[d, a]);
    assert!(g.check_layer_indices());

    assert!(!g.replace_node_in_layer(b, c));
}

#[test]
fn connect_uses_east_and_west_ports() {
    let mut g = new_graph(2);
    let a = add_node(&mut g, 0);
    let b = add_node(&mut g, 1);
    let e = g.connect(a, b);

    let src = g.source(e).unwrap();
    let tgt = g.target(e).unwrap();
    assert_eq!(g.port(src).side, PortSide::East);
    assert_eq!(g.port(tgt).side, PortSide::West);
    assert_eq!(g.source_node(e), Some(a));
    assert_eq!(g.target_node(e), Some(b));
    assert_eq!(g.outgoing_edges(a), vec![e]);
    assert_eq!(g.incoming_edges(b), vec![e]);
    assert_eq!(g.other_node(e, a), Some(b));
    assert_eq!(g.other_node(e, b), Some(a));
}

#[test]
fn reverse_edge_swaps_endpoints_and_bends() {
    let mut g = new_graph(2);
    let a = add_node(&mut g, 0);
    let b = add_node(&mut g, 1);
    let e = g.connect(a, b);
    g.edge_mut(e).bend_points = vec![Point::new(1.0, 0.0), Point::new(2.0, 0.0)];

    assert!(!g.is_cyclic());
    let mark = g.reverse_edge(e);
    assert_eq!(mark.edge(), e);
    g.mark_cyclic(mark);

    assert!(g.is_cyclic());
    assert!(g.edge(e).is_reversed());
    assert_eq!(g.source_node(e), Some(b));
    assert_eq!(g.target_node(e), Some(a));
    assert_eq!(
        g.edge(e).bend_points,
        vec![Point::new(2.0, 0.0), Point::new(1.0, 0.0)]
    );
    assert_eq!(g.incoming_edges(a), vec![e]);
    assert!(g.incoming_edges(b).is_empty());

    let mark = g.reverse_edge(e);
    g.mark_cyclic(mark);
    assert!(!g.edge(e).is_reversed());
}

#[test]
fn restore_edge_only_touches_reversed_edges() {
    let mut g = new_graph(2);
    let a = add_node(&mut g, 0);
    let b = add_node(&mut g, 1);
    let e = g.connect(a, b);
    g.edge_mut(e).bend_points = vec![Point::new(1.0, 0.0), Point::new(2.0, 0.0)];

    assert!(!g.restore_edge(e));
    assert_eq!(g.source_node(e), Some(a));

    let mark = g.reverse_edge(e);
    g.mark_cyclic(mark);
    assert!(g.restore_edge(e));
    assert!(!g.edge(e).is_reversed());
    assert_eq!(g.source_node(e), Some(a));
    assert_eq!(g.target_node(e), Some(b));
    assert_eq!(
        g.edge(e).bend_points,
        vec![Point::new(1.0, 0.0), Point::new(2.0, 0.0)]
    );
    assert!(g.is_cyclic());
}

#[test]
fn remove_node_detaches_and_drops_edges() {
    let mut g = new_graph(3);
    let a = add_node(&mut g, 0);
    let b = add_node(&mut g, 1);
    let c = add_node(&mut g, 2);
    let ab = g.connect(a, b);
    let bc = g.connect(b, c);

    g.remove_node(b);
    assert_eq!(g.node_layer(b), None);
    assert_eq!(g.source(ab), None);
    assert_eq!(g.target(ab), None);
    assert_eq!(g.source(bc), None);
    assert!(g.outgoing_edges(a).is_empty());
    assert!(g.incoming_edges(c).is_empty());
    assert_eq!(g.edges().count(), 0);
    assert!(g.check_layer_indices());
}

#[test]
fn connected_edges_lists_self_loops_once() {
    let mut g = new_graph(1);
    let a = add_node(&mut g, 0);
    let e = g.connect(a, a);
    assert!(g.is_self_loop(e));
    assert_eq!(g.connected_edges(a), vec![e]);
}

#[test]
fn breaking_point_queries_follow_the_record_state() {
    let mut g = new_graph(3);
    let a = add_node(&mut g, 0);
    let start = add_node(&mut g, 1);
    let end = add_node(&mut g, 2);
    let ns = g.connect(a, start);
    let se = g.connect(start, end);
    let orig = g.connect(end, a);

    let id = g.add_breaking_point(BreakingPoint::new(start, end, ns, se, orig));
    g.node_mut(start).kind = NodeKind::BreakingPoint(id);
    g.node_mut(end).kind = NodeKind::BreakingPoint(id);

    assert!(g.is_breaking_point_start(start));
    assert!(!g.is_breaking_point_start(end));
    assert!(g.is_breaking_point_end(end));
    assert_eq!(g.breaking_point_of(start), Some(id));
    assert_eq!(g.breaking_point(id).in_layer(), None);
    assert_eq!(g.breaking_points().count(), 1);

    g.breaking_point_mut(id).state = BreakingPointState::Superseded;
    assert!(!g.is_breaking_point_start(start));
    assert!(!g.is_breaking_point_end(end));
}

#[test]
fn ids_display_with_their_prefix() {
    let mut g = new_graph(1);
    let n = add_node(&mut g, 0);
    let e = g.connect(n, n);
    assert_eq!(n.to_string(), "n0");
    assert_eq!(e.to_string(), "e0");
    assert_eq!(g.layer_at(0).unwrap().to_string(), "l0");
}

#[test]
fn graph_label_deserializes_from_camel_case() {
    let label: GraphLabel = serde_json::from_str(
        r#"{"direction":"DOWN","aspectRatio":2.0,"spacing":{"nodeNode":5.0},"edgeRouting":"SPLINES"}"#,
    )
    .unwrap();
    assert!(!label.direction.is_horizontal());
    assert_eq!(label.aspect_ratio, 2.0);
    assert_eq!(label.spacing.node_node, 5.0);
    assert_eq!(label.spacing.node_node_between_layers, 20.0);
    assert_eq!(label.edge_routing, selkie_lgraph::EdgeRouting::Splines);
}
