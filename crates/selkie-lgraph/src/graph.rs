//! The layered graph container.
//!
//! Layers, nodes, ports, edges and breaking-point records live in arenas owned by [`LGraph`] and
//! are addressed by small `Copy` ids. Elements are never freed: removing a node detaches it from
//! its layer and drops its edges, removing an edge clears both endpoints. Ids therefore stay
//! valid for the lifetime of the graph, which is what the wrapping phases rely on when they keep
//! records across phase boundaries.
//!
//! Every node assigned to a layer caches its position inside that layer. All routines that
//! change a layer's node sequence reindex it from the first touched slot, so the cache always
//! matches the real position. [`LGraph::check_layer_indices`] verifies this.

use crate::breaking_point::BreakingPoint;
use crate::model::{
    GraphLabel, IndividualSpacing, Margin, Point, PortConstraints, PortSide, Size,
};
use rustc_hash::FxBuildHasher;
use std::fmt;

type HashSet<T> = hashbrown::HashSet<T, FxBuildHasher>;

macro_rules! arena_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(usize);

        impl $name {
            pub const fn index(self) -> usize {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

arena_id!(LayerId, "l");
arena_id!(NodeId, "n");
arena_id!(PortId, "p");
arena_id!(EdgeId, "e");
arena_id!(
    /// Handle of a [`BreakingPoint`] record.
    BreakingPointId,
    "bp"
);

/// What a node stands for. Dummy kinds carry the data the layout phases need about them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeKind {
    #[default]
    Normal,
    /// One hop of an edge spanning several layers.
    LongEdge {
        origin: EdgeId,
        /// Port the long edge starts at.
        source: PortId,
        /// Port the long edge ends at.
        target: PortId,
    },
    BreakingPoint(BreakingPointId),
    NorthSouthPort {
        origin: NodeId,
    },
    ExternalPort,
    Label,
}

impl NodeKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::LongEdge { .. } => "long-edge",
            Self::BreakingPoint(_) => "breaking-point",
            Self::NorthSouthPort { .. } => "north-south-port",
            Self::ExternalPort => "external-port",
            Self::Label => "label",
        }
    }

    pub fn is_long_edge(&self) -> bool {
        matches!(self, Self::LongEdge { .. })
    }

    pub fn is_breaking_point(&self) -> bool {
        matches!(self, Self::BreakingPoint(_))
    }

    pub fn breaking_point(&self) -> Option<BreakingPointId> {
        match self {
            Self::BreakingPoint(id) => Some(*id),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Node {
    pub kind: NodeKind,
    pub name: Option<String>,
    pub size: Size,
    pub margin: Margin,
    /// Top-left corner, set by coordinate assignment.
    pub position: Point,
    pub port_constraints: PortConstraints,
    pub spacing_override: Option<IndividualSpacing>,
    layer: Option<LayerId>,
    index: usize,
    ports: Vec<PortId>,
}

impl Node {
    pub fn layer(&self) -> Option<LayerId> {
        self.layer
    }

    pub fn ports(&self) -> &[PortId] {
        &self.ports
    }
}

#[derive(Debug, Clone)]
pub struct Port {
    pub side: PortSide,
    /// Offset relative to the owning node's position.
    pub position: Point,
    node: NodeId,
    incoming: Vec<EdgeId>,
    outgoing: Vec<EdgeId>,
}

impl Port {
    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn incoming(&self) -> &[EdgeId] {
        &self.incoming
    }

    pub fn outgoing(&self) -> &[EdgeId] {
        &self.outgoing
    }
}

#[derive(Debug, Clone, Default)]
pub struct Edge {
    pub bend_points: Vec<Point>,
    pub junction_points: Option<Vec<Point>>,
    pub thickness: f64,
    reversed: bool,
    source: Option<PortId>,
    target: Option<PortId>,
}

impl Edge {
    pub fn source(&self) -> Option<PortId> {
        self.source
    }

    pub fn target(&self) -> Option<PortId> {
        self.target
    }

    /// Whether the edge currently points against its original direction.
    pub fn is_reversed(&self) -> bool {
        self.reversed
    }

    /// A detached edge carrying this edge's properties, without endpoints, bend points or
    /// junction points.
    pub fn copy_properties(&self) -> Self {
        Self {
            thickness: self.thickness,
            reversed: self.reversed,
            ..Self::default()
        }
    }
}

/// Proof that an edge was reversed.
///
/// Reversing an edge against the layering means the graph is no longer acyclic from the point
/// of view of later phases. The mark has to be handed to [`LGraph::mark_cyclic`].
#[must_use = "hand the mark to `LGraph::mark_cyclic`"]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CyclicMark {
    edge: EdgeId,
}

impl CyclicMark {
    pub fn edge(self) -> EdgeId {
        self.edge
    }
}

#[derive(Debug, Clone, Default)]
struct LayerData {
    nodes: Vec<NodeId>,
    /// `None` once the layer has been removed from the graph.
    index: Option<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct LGraph {
    label: GraphLabel,
    layer_order: Vec<LayerId>,
    layers: Vec<LayerData>,
    nodes: Vec<Node>,
    ports: Vec<Port>,
    edges: Vec<Edge>,
    breaking_points: Vec<BreakingPoint>,
    cyclic: bool,
}

impl LGraph {
    pub fn new(label: GraphLabel) -> Self {
        Self {
            label,
            ..Self::default()
        }
    }

    pub fn label(&self) -> &GraphLabel {
        &self.label
    }

    pub fn label_mut(&mut self) -> &mut GraphLabel {
        &mut self.label
    }

    pub fn is_cyclic(&self) -> bool {
        self.cyclic
    }

    pub fn mark_cyclic(&mut self, _mark: CyclicMark) {
        self.cyclic = true;
    }

    // ---------------------------------------------------------------------------------------
    // Layers
    // ---------------------------------------------------------------------------------------

    pub fn layers(&self) -> &[LayerId] {
        &self.layer_order
    }

    pub fn layer_count(&self) -> usize {
        self.layer_order.len()
    }

    pub fn layer_at(&self, index: usize) -> Option<LayerId> {
        self.layer_order.get(index).copied()
    }

    pub fn layer_index(&self, layer: LayerId) -> Option<usize> {
        self.layers[layer.0].index
    }

    pub fn layer_nodes(&self, layer: LayerId) -> &[NodeId] {
        &self.layers[layer.0].nodes
    }

    pub fn add_layer(&mut self) -> LayerId {
        self.insert_layer(self.layer_order.len())
    }

    /// Inserts an empty layer at `index` (clamped to the layer count).
    pub fn insert_layer(&mut self, index: usize) -> LayerId {
        let index = index.min(self.layer_order.len());
        let id = LayerId(self.layers.len());
        self.layers.push(LayerData::default());
        self.layer_order.insert(index, id);
        self.reindex_layers_from(index);
        id
    }

    /// Drops every layer without nodes and returns how many were dropped.
    pub fn remove_empty_layers(&mut self) -> usize {
        let before = self.layer_order.len();
        let layers = &mut self.layers;
        self.layer_order.retain(|l| {
            let data = &mut layers[l.0];
            if data.nodes.is_empty() {
                data.index = None;
                false
            } else {
                true
            }
        });
        self.reindex_layers_from(0);
        before - self.layer_order.len()
    }

    fn reindex_layers_from(&mut self, from: usize) {
        for (i, l) in self.layer_order.iter().enumerate().skip(from) {
            self.layers[l.0].index = Some(i);
        }
    }

    // ---------------------------------------------------------------------------------------
    // Nodes
    // ---------------------------------------------------------------------------------------

    pub fn add_node(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            ..Node::default()
        });
        id
    }

    pub fn node(&self, node: NodeId) -> &Node {
        &self.nodes[node.0]
    }

    pub fn node_mut(&mut self, node: NodeId) -> &mut Node {
        &mut self.nodes[node.0]
    }

    /// Nodes currently assigned to a layer, in layer order.
    pub fn layered_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.layer_order
            .iter()
            .flat_map(|l| self.layers[l.0].nodes.iter().copied())
    }

    pub fn node_layer(&self, node: NodeId) -> Option<LayerId> {
        self.nodes[node.0].layer
    }

    /// Position of `node` within its layer.
    pub fn node_index(&self, node: NodeId) -> Option<usize> {
        let n = &self.nodes[node.0];
        n.layer.map(|_| n.index)
    }

    /// Moves `node` to the end of `layer`, or detaches it for `None`.
    pub fn set_layer(&mut self, node: NodeId, layer: Option<LayerId>) {
        self.detach(node);
        if let Some(layer) = layer {
            let index = self.layers[layer.0].nodes.len();
            self.layers[layer.0].nodes.push(node);
            let n = &mut self.nodes[node.0];
            n.layer = Some(layer);
            n.index = index;
        }
    }

    /// Moves `node` into `layer` at `index` (clamped to the layer's length after detaching).
    pub fn set_layer_at(&mut self, node: NodeId, layer: LayerId, index: usize) {
        self.detach(node);
        let index = index.min(self.layers[layer.0].nodes.len());
        self.layers[layer.0].nodes.insert(index, node);
        self.nodes[node.0].layer = Some(layer);
        self.reindex_layer_from(layer, index);
    }

    /// Puts `new` into the slot `old` occupies and detaches `old`.
    ///
    /// Returns `false` if `old` is not assigned to a layer.
    pub fn replace_node_in_layer(&mut self, old: NodeId, new: NodeId) -> bool {
        if old == new {
            return self.nodes[old.0].layer.is_some();
        }
        self.detach(new);
        let Some(layer) = self.nodes[old.0].layer.take() else {
            return false;
        };
        let index = self.nodes[old.0].index;
        self.layers[layer.0].nodes[index] = new;
        let n = &mut self.nodes[new.0];
        n.layer = Some(layer);
        n.index = index;
        true
    }

    /// Detaches `node` from its layer and removes every edge connected to it.
    pub fn remove_node(&mut self, node: NodeId) {
        self.detach(node);
        for edge in self.connected_edges(node) {
            self.remove_edge(edge);
        }
    }

    fn detach(&mut self, node: NodeId) {
        let Some(layer) = self.nodes[node.0].layer.take() else {
            return;
        };
        let index = self.nodes[node.0].index;
        debug_assert_eq!(self.layers[layer.0].nodes.get(index), Some(&node));
        self.layers[layer.0].nodes.remove(index);
        self.reindex_layer_from(layer, index);
    }

    fn reindex_layer_from(&mut self, layer: LayerId, from: usize) {
        let Self { layers, nodes, .. } = self;
        for (i, n) in layers[layer.0].nodes.iter().enumerate().skip(from) {
            nodes[n.0].index = i;
        }
    }

    /// Checks that every layer knows its position and every layered node knows its layer and
    /// its position within it.
    pub fn check_layer_indices(&self) -> bool {
        self.layer_order.iter().enumerate().all(|(i, l)| {
            let data = &self.layers[l.0];
            data.index == Some(i)
                && data.nodes.iter().enumerate().all(|(j, n)| {
                    let node = &self.nodes[n.0];
                    node.layer == Some(*l) && node.index == j
                })
        })
    }

    // ---------------------------------------------------------------------------------------
    // Ports
    // ---------------------------------------------------------------------------------------

    pub fn add_port(&mut self, node: NodeId, side: PortSide) -> PortId {
        let id = PortId(self.ports.len());
        self.ports.push(Port {
            side,
            position: Point::default(),
            node,
            incoming: Vec::new(),
            outgoing: Vec::new(),
        });
        self.nodes[node.0].ports.push(id);
        id
    }

    pub fn port(&self, port: PortId) -> &Port {
        &self.ports[port.0]
    }

    pub fn port_mut(&mut self, port: PortId) -> &mut Port {
        &mut self.ports[port.0]
    }

    pub fn port_node(&self, port: PortId) -> NodeId {
        self.ports[port.0].node
    }

    // ---------------------------------------------------------------------------------------
    // Edges
    // ---------------------------------------------------------------------------------------

    pub fn add_edge(&mut self, source: PortId, target: PortId) -> EdgeId {
        self.add_edge_with(source, target, Edge::default())
    }

    /// Adds `edge` between the two ports. Endpoints stored in `edge` are ignored.
    pub fn add_edge_with(&mut self, source: PortId, target: PortId, edge: Edge) -> EdgeId {
        let id = EdgeId(self.edges.len());
        self.edges.push(Edge {
            source: None,
            target: None,
            ..edge
        });
        self.set_source(id, Some(source));
        self.set_target(id, Some(target));
        id
    }

    /// Adds an edge from a new east port on `source` to a new west port on `target`.
    pub fn connect(&mut self, source: NodeId, target: NodeId) -> EdgeId {
        let out = self.add_port(source, PortSide::East);
        let inp = self.add_port(target, PortSide::West);
        self.add_edge(out, inp)
    }

    pub fn edge(&self, edge: EdgeId) -> &Edge {
        &self.edges[edge.0]
    }

    pub fn edge_mut(&mut self, edge: EdgeId) -> &mut Edge {
        &mut self.edges[edge.0]
    }

    /// Edges that are attached at both ends.
    pub fn edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges
            .iter()
            .enumerate()
            .filter(|(_, e)| e.source.is_some() && e.target.is_some())
            .map(|(i, _)| EdgeId(i))
    }

    pub fn source(&self, edge: EdgeId) -> Option<PortId> {
        self.edges[edge.0].source
    }

    pub fn target(&self, edge: EdgeId) -> Option<PortId> {
        self.edges[edge.0].target
    }

    pub fn source_node(&self, edge: EdgeId) -> Option<NodeId> {
        self.edges[edge.0].source.map(|p| self.ports[p.0].node)
    }

    pub fn target_node(&self, edge: EdgeId) -> Option<NodeId> {
        self.edges[edge.0].target.map(|p| self.ports[p.0].node)
    }

    /// The endpoint node of `edge` that is not `node`.
    pub fn other_node(&self, edge: EdgeId, node: NodeId) -> Option<NodeId> {
        let source = self.source_node(edge);
        let target = self.target_node(edge);
        if source == Some(node) {
            target
        } else if target == Some(node) {
            source
        } else {
            None
        }
    }

    pub fn set_source(&mut self, edge: EdgeId, port: Option<PortId>) {
        if let Some(old) = self.edges[edge.0].source.take() {
            self.ports[old.0].outgoing.retain(|e| *e != edge);
        }
        if let Some(port) = port {
            self.ports[port.0].outgoing.push(edge);
        }
        self.edges[edge.0].source = port;
    }

    pub fn set_target(&mut self, edge: EdgeId, port: Option<PortId>) {
        if let Some(old) = self.edges[edge.0].target.take() {
            self.ports[old.0].incoming.retain(|e| *e != edge);
        }
        if let Some(port) = port {
            self.ports[port.0].incoming.push(edge);
        }
        self.edges[edge.0].target = port;
    }

    /// Clears both endpoints of `edge`.
    pub fn remove_edge(&mut self, edge: EdgeId) {
        self.set_source(edge, None);
        self.set_target(edge, None);
    }

    pub fn is_self_loop(&self, edge: EdgeId) -> bool {
        let source = self.source_node(edge);
        source.is_some() && source == self.target_node(edge)
    }

    pub fn incoming_edges(&self, node: NodeId) -> Vec<EdgeId> {
        self.nodes[node.0]
            .ports
            .iter()
            .flat_map(|p| self.ports[p.0].incoming.iter().copied())
            .collect()
    }

    pub fn outgoing_edges(&self, node: NodeId) -> Vec<EdgeId> {
        self.nodes[node.0]
            .ports
            .iter()
            .flat_map(|p| self.ports[p.0].outgoing.iter().copied())
            .collect()
    }

    /// Incoming then outgoing edges of `node`; self loops are listed once.
    pub fn connected_edges(&self, node: NodeId) -> Vec<EdgeId> {
        let mut seen: HashSet<EdgeId> = HashSet::default();
        self.incoming_edges(node)
            .into_iter()
            .chain(self.outgoing_edges(node))
            .filter(|e| seen.insert(*e))
            .collect()
    }

    /// Swaps the endpoints of `edge`, reverses its bend points and toggles its reversed flag.
    pub fn reverse_edge(&mut self, edge: EdgeId) -> CyclicMark {
        self.flip(edge);
        CyclicMark { edge }
    }

    /// Turns a reversed edge back into its original direction. Returns `false` and leaves the
    /// edge alone if it is not reversed.
    pub fn restore_edge(&mut self, edge: EdgeId) -> bool {
        if !self.edges[edge.0].reversed {
            return false;
        }
        self.flip(edge);
        true
    }

    fn flip(&mut self, edge: EdgeId) {
        let source = self.edges[edge.0].source;
        let target = self.edges[edge.0].target;
        self.set_source(edge, None);
        self.set_target(edge, None);
        self.set_source(edge, target);
        self.set_target(edge, source);

        let e = &mut self.edges[edge.0];
        e.reversed = !e.reversed;
        e.bend_points.reverse();
    }

    // ---------------------------------------------------------------------------------------
    // Breaking points
    // ---------------------------------------------------------------------------------------

    pub fn add_breaking_point(&mut self, record: BreakingPoint) -> BreakingPointId {
        let id = BreakingPointId(self.breaking_points.len());
        self.breaking_points.push(record);
        id
    }

    pub fn breaking_point(&self, id: BreakingPointId) -> &BreakingPoint {
        &self.breaking_points[id.0]
    }

    pub fn breaking_point_mut(&mut self, id: BreakingPointId) -> &mut BreakingPoint {
        &mut self.breaking_points[id.0]
    }

    pub fn breaking_points(&self) -> impl Iterator<Item = (BreakingPointId, &BreakingPoint)> {
        self.breaking_points
            .iter()
            .enumerate()
            .map(|(i, bp)| (BreakingPointId(i), bp))
    }

    pub fn breaking_point_of(&self, node: NodeId) -> Option<BreakingPointId> {
        self.nodes[node.0].kind.breaking_point()
    }

    /// Whether `node` is the start dummy of a live breaking-point record.
    pub fn is_breaking_point_start(&self, node: NodeId) -> bool {
        self.breaking_point_of(node).is_some_and(|id| {
            let bp = &self.breaking_points[id.0];
            bp.is_live() && bp.start == node
        })
    }

    /// Whether `node` is the end dummy of a live breaking-point record.
    pub fn is_breaking_point_end(&self, node: NodeId) -> bool {
        self.breaking_point_of(node).is_some_and(|id| {
            let bp = &self.breaking_points[id.0];
            bp.is_live() && bp.end == node
        })
    }
}
