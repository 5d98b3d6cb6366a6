#![forbid(unsafe_code)]

//! Graph wrapping for layered layouts.
//!
//! A layered drawing of a long graph is very wide. `selkie` cuts the layer sequence into rows
//! and stacks them, so the drawing approaches a desired aspect ratio:
//!
//! * [`cuts`] decides where to cut,
//! * [`path_like`] wraps graphs where each cut is crossed by a single connection,
//! * [`breaking_point`] wraps arbitrary layered graphs with breaking-point dummies,
//! * [`pipeline`] dispatches the phases for a layout run.
//!
//! The graph model lives in the `selkie-lgraph` crate, re-exported as [`lgraph`].

pub use selkie_lgraph as lgraph;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod breaking_point;
pub mod cuts;
pub mod dummy_chain;
pub mod error;
pub mod long_edge;
pub mod options;
pub mod path_like;
pub mod pipeline;
pub mod progress;
pub mod stats;

pub use error::{Error, Result};
pub use options::{CuttingStrategy, ValidifyStrategy, WrappingOptions, WrappingStrategy};
pub use progress::{NullMonitor, ProgressMonitor};
pub use stats::GraphStats;
