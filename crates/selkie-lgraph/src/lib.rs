//! Layered graph model shared by the `selkie` wrapping phases.
//!
//! A graph is an ordered sequence of layers, each an ordered sequence of nodes. Nodes own ports,
//! edges connect ports. See [`graph`] for the ownership rules.

#![forbid(unsafe_code)]

pub mod breaking_point;
pub mod graph;
pub mod model;

pub use breaking_point::{BreakingPoint, BreakingPointState, InLayerDummies};
pub use graph::{
    BreakingPointId, CyclicMark, Edge, EdgeId, LGraph, LayerId, Node, NodeId, NodeKind, Port,
    PortId,
};
pub use model::{
    Direction, EdgeRouting, GraphLabel, IndividualSpacing, Margin, Point, PortConstraints,
    PortSide, Size, Spacing,
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
