use selkie::lgraph::{GraphLabel, LGraph, NodeId, NodeKind, Point};
use selkie::dummy_chain::insert_dummies;
use selkie::long_edge::{join_at, join_long_edges, split_long_edges};
use selkie::Error;

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
fn split_creates_one_dummy_per_intermediate_layer() {
    let mut g = new_graph(4);
    let a = add_node(&mut g, 0);
    let b = add_node(&mut g, 3);
    let c = add_node(&mut g, 1);
    let long = g.connect(a, b);
    let short = g.connect(a, c);

    assert_eq!(split_long_edges(&mut g).unwrap(), 2);

    let d1 = g.target_node(long).unwrap();
    assert!(g.node(d1).kind.is_long_edge());
    assert_eq!(g.node_layer(d1), g.layer_at(1));
    let next = g.outgoing_edges(d1);
    assert_eq!(next.len(), 1);
    let d2 = g.target_node(next[0]).unwrap();
    assert_eq!(g.node_layer(d2), g.layer_at(2));
    assert_eq!(g.target_node(g.outgoing_edges(d2)[0]), Some(b));

    assert_eq!(g.target_node(short), Some(c));
    assert!(g.check_layer_indices());
}

#[test]
fn join_restores_the_edge_with_collected_bends() {
    let mut g = new_graph(4);
    let a = add_node(&mut g, 0);
    let b = add_node(&mut g, 3);
    let e = g.connect(a, b);
    split_long_edges(&mut g).unwrap();

    let d1 = g.target_node(e).unwrap();
    let mid = g.outgoing_edges(d1)[0];
    let d2 = g.target_node(mid).unwrap();
    let last = g.outgoing_edges(d2)[0];
    g.node_mut(d1).position = Point::new(10.0, 0.0);
    g.node_mut(d2).position = Point::new(20.0, 0.0);
    g.edge_mut(e).bend_points = vec![Point::new(5.0, 0.0)];
    g.edge_mut(mid).junction_points = Some(vec![Point::new(15.0, 0.0)]);
    g.edge_mut(last).bend_points = vec![Point::new(25.0, 0.0)];

    assert_eq!(join_long_edges(&mut g, true).unwrap(), 2);

    assert_eq!(g.source_node(e), Some(a));
    assert_eq!(g.target_node(e), Some(b));
    assert_eq!(
        g.edge(e).bend_points,
        vec![
            Point::new(5.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(20.0, 0.0),
            Point::new(25.0, 0.0),
        ]
    );
    assert_eq!(g.edge(e).junction_points, Some(vec![Point::new(15.0, 0.0)]));
    assert_eq!(g.node_layer(d1), None);
    assert_eq!(g.node_layer(d2), None);
    assert_eq!(g.edges().collect::<Vec<_>>(), vec![e]);
    assert!(g.check_layer_indices());
}

#[test]
fn join_without_unnecessary_bend_points_skips_dummy_positions() {
    let mut g = new_graph(3);
    let a = add_node(&mut g, 0);
    let b = add_node(&mut g, 2);
    let e = g.connect(a, b);
    split_long_edges(&mut g).unwrap();
    let dummy = g.target_node(e).unwrap();
    g.node_mut(dummy).position = Point::new(10.0, 0.0);

    join_at(&mut g, dummy, false).unwrap();
    assert!(g.edge(e).bend_points.is_empty());
    assert_eq!(g.target_node(e), Some(b));
    // The dummy keeps its layer until the caller removes it.
    assert_eq!(g.node_layer(dummy), g.layer_at(1));
    assert!(g.connected_edges(dummy).is_empty());
}

#[test]
fn join_keeps_the_origin_when_it_is_the_last_segment() {
    // `a` sits right of `b`, so the edge is reversed, expanded and restored again. That leaves
    // the original edge as the last segment of the chain a -> d1 -> d0 -> b.
    let mut g = new_graph(2);
    let b = add_node(&mut g, 0);
    let a = add_node(&mut g, 1);
    let e = g.connect(a, b);
    let mark = g.reverse_edge(e);
    g.mark_cyclic(mark);
    let created = insert_dummies(&mut g, e, 1, 0.0).unwrap();
    for edge in g.edges().collect::<Vec<_>>() {
        assert!(g.restore_edge(edge));
    }
    g.edge_mut(created[1]).bend_points = vec![Point::new(1.0, 0.0)];
    g.edge_mut(created[0]).bend_points = vec![Point::new(2.0, 0.0)];
    g.edge_mut(e).bend_points = vec![Point::new(3.0, 0.0)];
    g.edge_mut(e).junction_points = Some(vec![Point::new(4.0, 0.0)]);

    assert_eq!(join_long_edges(&mut g, false).unwrap(), 2);
    assert_eq!(g.edges().collect::<Vec<_>>(), vec![e]);
    assert_eq!(g.source_node(e), Some(a));
    assert_eq!(g.target_node(e), Some(b));
    assert_eq!(
        g.edge(e).bend_points,
        vec![
            Point::new(1.0, 0.0),
            Point::new(2.0, 0.0),
            Point::new(3.0, 0.0),
        ]
    );
    assert_eq!(g.edge(e).junction_points, Some(vec![Point::new(4.0, 0.0)]));
}

#[test]
fn join_rejects_dummies_between_reversed_and_forward_segments() {
    let mut g = new_graph(3);
    let a = add_node(&mut g, 0);
    let b = add_node(&mut g, 2);
    let e = g.connect(a, b);
    split_long_edges(&mut g).unwrap();
    let dummy = g.target_node(e).unwrap();
    let mark = g.reverse_edge(e);
    g.mark_cyclic(mark);

    assert!(matches!(
        join_at(&mut g, dummy, false),
        Err(Error::MalformedDummy { incoming: 0, outgoing: 2, .. })
    ));
}

#[test]
fn join_rejects_other_node_kinds() {
    let mut g = new_graph(1);
    let a = add_node(&mut g, 0);
    assert!(matches!(
        join_at(&mut g, a, false),
        Err(Error::UnexpectedNodeKind { node, expected: "long-edge", found: "normal" }) if node == a
    ));
}

#[test]
fn join_rejects_unbalanced_dummies() {
    let mut g = new_graph(3);
    let a = add_node(&mut g, 0);
    let b = add_node(&mut g, 2);
    let e = g.connect(a, b);
    split_long_edges(&mut g).unwrap();
    let dummy = g.target_node(e).unwrap();
    let extra = add_node(&mut g, 0);
    g.connect(extra, dummy);

    assert!(matches!(
        join_at(&mut g, dummy, false),
        Err(Error::MalformedDummy { incoming: 2, outgoing: 1, .. })
    ));
}
