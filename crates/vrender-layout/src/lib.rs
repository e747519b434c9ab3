#![forbid(unsafe_code)]

//! Visible-window layout for vrender.
//!
//! This crate turns a scroll position, a cached viewport size and document
//! row metrics into a [`LayerConfig`](vrender_core::LayerConfig), and maps
//! between pixels and document positions against the result.
//!
//! - [`DocumentMetrics`]: the document collaborator's row-metric queries.
//! - [`ViewState`]: the owned state record layout reads and replaces.
//! - [`LayoutEngine`]: the window computation.
//! - [`CoordinateMapper`]: pixel ↔ document conversions.
//! - [`ScrollbarModel`]: per-axis scrollbar state for host widgets.
//!
//! Enable the `test-helpers` feature for `testing::GridDocument`.

pub mod engine;
pub mod mapper;
pub mod metrics;
pub mod scrollbar;
pub mod state;
#[cfg(any(test, feature = "test-helpers"))]
pub mod testing;

pub use engine::{LayoutEngine, LayoutOutcome};
pub use mapper::CoordinateMapper;
pub use metrics::DocumentMetrics;
pub use scrollbar::{Axis, ScrollbarModel};
pub use state::{ScrollState, ScrollbarVisibility, SizeUpdate, ViewState};
