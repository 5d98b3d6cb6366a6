use selkie::breaking_point::{insert, process};
use selkie::lgraph::{BreakingPointState, EdgeId, GraphLabel, LGraph, NodeId, NodeKind};
use selkie::long_edge::split_long_edges;
use selkie::progress::ProgressMonitor;
use selkie::{Error, NullMonitor, WrappingOptions, WrappingStrategy};

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

fn path_graph(layers: usize) -> (LGraph, Vec<NodeId>) {
    let mut g = new_graph(layers);
    let nodes: Vec<NodeId> = (0..layers).map(|i| add_node(&mut g, i)).collect();
    for w in nodes.windows(2) {
        g.connect(w[0], w[1]);
    }
    (g, nodes)
}

fn options(cuts: Vec<usize>, improve_wrapped_edges: bool) -> WrappingOptions {
    WrappingOptions {
        improve_cuts: false,
        improve_wrapped_edges,
        ..WrappingOptions::default()
            .with_strategy(WrappingStrategy::MultiEdge)
            .with_manual_cuts(cuts)
    }
}

fn wrap(g: &mut LGraph, options: &WrappingOptions) {
    insert::run(g, options, &mut NullMonitor).unwrap();
    split_long_edges(g).unwrap();
    process::run(g, options, &mut NullMonitor).unwrap();
}

fn layer_of(g: &LGraph, n: NodeId) -> usize {
    g.layer_index(g.node_layer(n).unwrap()).unwrap()
}

#[test]
fn wrapping_a_path_moves_the_second_row_to_the_front() {
    let (mut g, n) = path_graph(6);
    let options = options(vec![3], true);
    wrap(&mut g, &options);

    assert!(g.is_cyclic());
    assert!(g.check_layer_indices());
    assert!(g.layers().iter().all(|l| !g.layer_nodes(*l).is_empty()));
    assert_eq!(g.layer_count(), 5);

    let (_, bp) = g.breaking_points().next().unwrap();
    let Some(in_layer) = bp.in_layer().copied() else {
        panic!("record was not wrapped: {:?}", bp.state);
    };

    // Layer 0 holds the end dummy and its connector, the rows share layers 1..=3 and the
    // start dummy sits in the last layer next to the connector's other end.
    assert_eq!(
        g.layer_nodes(g.layer_at(0).unwrap()),
        &[in_layer.end_dummy, bp.end]
    );
    for (row_one, row_two) in [(0, 3), (1, 4), (2, 5)] {
        assert_eq!(layer_of(&g, n[row_one]), row_one + 1);
        assert_eq!(layer_of(&g, n[row_two]), row_one + 1);
    }
    assert_eq!(
        g.layer_nodes(g.layer_at(4).unwrap()),
        &[bp.start, in_layer.start_dummy]
    );

    // The start-to-end edge now runs backwards through one dummy per layer.
    assert!(g.edge(bp.start_end_edge).is_reversed());
    assert_eq!(g.source_node(bp.start_end_edge), Some(bp.end));
    assert_eq!(g.target_node(bp.start_end_edge), Some(in_layer.end_dummy));
    assert_eq!(in_layer.end_edge, bp.start_end_edge);
    assert_eq!(g.source_node(in_layer.start_edge), Some(in_layer.start_dummy));
    assert_eq!(g.target_node(in_layer.start_edge), Some(bp.start));
    let mut hops = 0;
    let mut current = in_layer.end_dummy;
    while current != in_layer.start_dummy {
        assert!(g.node(current).kind.is_long_edge());
        let out = g.outgoing_edges(current);
        assert_eq!(out.len(), 1);
        current = g.target_node(out[0]).unwrap();
        hops += 1;
    }
    assert_eq!(hops, 4);
}

#[test]
fn wrapped_connectors_get_extra_spacing() {
    let (mut g, _) = path_graph(6);
    let mut options = options(vec![3], false);
    options.additional_edge_spacing = 7.0;
    wrap(&mut g, &options);

    let (_, bp) = g.breaking_points().next().unwrap();
    let dummy = bp.in_layer().unwrap().start_dummy;
    let spacing = g.node(dummy).spacing_override.unwrap();
    assert_eq!(spacing.edge_edge, g.label().spacing.edge_edge + 7.0);
}

/// A path of six nodes without the edge between the third and the fourth, plus an edge from
/// the first to the last node. Cutting at 3 splits the long edge only.
fn gapped_path_with_long_edge() -> (LGraph, Vec<NodeId>, EdgeId) {
    let mut g = new_graph(6);
    let n: Vec<NodeId> = (0..6).map(|i| add_node(&mut g, i)).collect();
    for (i, w) in n.windows(2).enumerate() {
        if i != 2 {
            g.connect(w[0], w[1]);
        }
    }
    let long = g.connect(n[0], n[5]);
    (g, n, long)
}

#[test]
fn start_dummies_are_pulled_towards_their_source() {
    let (mut g, n, long) = gapped_path_with_long_edge();
    wrap(&mut g, &options(vec![3], true));
    assert!(g.check_layer_indices());
    assert!(g.layers().iter().all(|l| !g.layer_nodes(*l).is_empty()));
    // The start dummy's layer was emptied and dropped.
    assert_eq!(g.layer_count(), 4);

    let (_, bp) = g.breaking_points().next().unwrap();
    assert_eq!(bp.original_edge, long);
    assert_eq!(layer_of(&g, bp.start), layer_of(&g, n[0]) + 1);
    assert_eq!(g.source_node(bp.node_start_edge), Some(n[0]));
    assert_eq!(g.target_node(bp.node_start_edge), Some(bp.start));

    let in_layer = bp.in_layer().unwrap();
    assert_eq!(g.node_layer(in_layer.start_dummy), g.node_layer(bp.start));
    assert_eq!(
        g.node_index(in_layer.start_dummy),
        g.node_index(bp.start).map(|i| i + 1)
    );
    assert_eq!(g.target_node(in_layer.start_edge), Some(bp.start));
}

#[test]
fn without_improvement_the_dummies_stay_in_place() {
    let (mut g, _, _) = gapped_path_with_long_edge();
    wrap(&mut g, &options(vec![3], false));

    assert_eq!(g.layer_count(), 5);
    let (_, bp) = g.breaking_points().next().unwrap();
    assert_eq!(layer_of(&g, bp.start), 4);
    assert_eq!(layer_of(&g, bp.end), 0);
}

#[test]
fn chained_records_are_merged() {
    let mut g = new_graph(6);
    let a = add_node(&mut g, 0);
    let b = add_node(&mut g, 5);
    let e = g.connect(a, b);
    // Keep every layer populated so the rows stay apart.
    let path: Vec<NodeId> = (0..6).map(|i| add_node(&mut g, i)).collect();
    for w in path.windows(2) {
        g.connect(w[0], w[1]);
    }

    wrap(&mut g, &options(vec![2, 4], true));
    assert!(g.check_layer_indices());

    let live: Vec<_> = g
        .breaking_points()
        .filter(|(_, bp)| bp.original_edge == e && bp.is_live())
        .map(|(_, bp)| bp.clone())
        .collect();
    let superseded = g
        .breaking_points()
        .filter(|(_, bp)| bp.state == BreakingPointState::Superseded)
        .count();
    assert_eq!(live.len(), 1);
    assert_eq!(superseded, 2);

    let merged = &live[0];
    assert_eq!(merged.prev, None);
    assert_eq!(merged.next, None);
    assert!(g.is_breaking_point_start(merged.start));
    assert!(g.is_breaking_point_end(merged.end));
    assert_eq!(g.source_node(e), Some(merged.end));
}

struct Canceled;

impl ProgressMonitor for Canceled {
    fn is_canceled(&self) -> bool {
        true
    }
}

#[test]
fn canceled_processing_leaves_the_graph_alone() {
    let (mut g, _) = path_graph(6);
    let options = options(vec![3], true);
    insert::run(&mut g, &options, &mut NullMonitor).unwrap();
    let layers = g.layer_count();

    let err = process::run(&mut g, &options, &mut Canceled).unwrap_err();
    assert!(matches!(err, Error::Canceled { .. }));
    assert_eq!(g.layer_count(), layers);
    assert!(!g.is_cyclic());
}
