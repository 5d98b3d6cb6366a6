//! Label types and geometry primitives attached to the layered graph.
//!
//! Everything here is plain data. The graph container in [`crate::graph`] owns the structure;
//! these types only describe geometry and the handful of layout options the wrapping phases read.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margin {
    pub const fn uniform(v: f64) -> Self {
        Self {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }

    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }
}

/// Overall layout direction.
///
/// Layering always runs left to right internally; the direction only matters for interpreting
/// the requested aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    #[default]
    Undefined,
    Right,
    Left,
    Down,
    Up,
}

impl Direction {
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::Undefined | Self::Right | Self::Left)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EdgeRouting {
    #[default]
    Orthogonal,
    Polyline,
    Splines,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Spacing {
    /// Vertical distance between nodes of the same layer.
    pub node_node: f64,
    /// Horizontal distance between adjacent layers.
    pub node_node_between_layers: f64,
    pub edge_node: f64,
    pub edge_edge: f64,
}

impl Default for Spacing {
    fn default() -> Self {
        Self {
            node_node: 20.0,
            node_node_between_layers: 20.0,
            edge_node: 10.0,
            edge_edge: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GraphLabel {
    pub direction: Direction,
    /// Desired width / height ratio of the final drawing.
    pub aspect_ratio: f64,
    pub spacing: Spacing,
    pub edge_routing: EdgeRouting,
}

impl Default for GraphLabel {
    fn default() -> Self {
        Self {
            direction: Direction::Undefined,
            aspect_ratio: 1.6,
            spacing: Spacing::default(),
            edge_routing: EdgeRouting::Orthogonal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PortSide {
    #[default]
    Undefined,
    North,
    East,
    South,
    West,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PortConstraints {
    #[default]
    Undefined,
    Free,
    FixedSide,
    FixedOrder,
    FixedPos,
}

/// Per-node spacing that takes precedence over the graph-wide [`Spacing`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct IndividualSpacing {
    pub edge_node: f64,
    pub edge_edge: f64,
}
