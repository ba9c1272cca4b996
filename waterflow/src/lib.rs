//! A headless water-flow (masonry) layout engine.
//!
//! For adapter-level utilities (tween scrolling, anchors), see the `waterflow-adapter` crate.
//!
//! The engine lays out an unbounded, lazily materialized collection of tiles that may span
//! several lines and tracks:
//! - items are ranked greedily into a sparse placement matrix, trimming spans that do not fit
//! - only the lines around the viewport are kept resident
//! - off-screen lines are prepared between frames under a time budget
//! - directional focus walks the matrix
//!
//! It is UI-agnostic. A host is expected to provide:
//! - viewport size and scroll deltas
//! - item creation/release and span lookup through [`FlowHost`]
//! - frame timestamps for [`WaterFlow::predict_layout`]
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod error;
mod focus;
mod host;
mod key;
mod lifecycle;
mod matrix;
mod metrics;
mod options;
mod packer;
mod predict;
mod span_cache;
mod state;
mod types;
mod viewport;
mod water_flow;


pub use error::{LayoutError, LayoutResult, SpanError};
pub use focus::FocusNavigator;
pub use host::{FlowHost, HasSpan};
pub use lifecycle::{ItemLifecycleManager, Supply};
pub use matrix::PlacementMatrix;
pub use metrics::ScrollMetricsEstimator;
pub use options::WaterFlowOptions;
pub use packer::PackOutcome;
pub use predict::{IncrementalLoader, Predict};
pub use span_cache::SpanCache;
pub use state::{ScrollMetrics, ViewportState};
pub use types::{
    Axis, FlowChild, FlowDirection, ItemRect, KeyDirection, Placement, ScrollEdge, Size, Span,
};
pub use viewport::ViewportController;
pub use water_flow::WaterFlow;
