#![forbid(unsafe_code)]

//! Runtime for vrender: change scheduling, layer dispatch, and scrolling.
//!
//! # Role in vrender
//! `vrender-runtime` owns everything that happens between "something
//! changed" and "the paint layers were told". It wraps the pure layout of
//! `vrender-layout` in a [`Renderer`] that coalesces change reports, runs
//! one apply pass per frame, and drives scroll animation.
//!
//! # Primary responsibilities
//! - **RenderScheduler**: pending/deferred change bits and the freeze flag.
//! - **Renderer**: the apply pass, resize handling, option setters, and the
//!   public scroll and coordinate API.
//! - **ScrollController**: clamped scroll edits and reveal logic.
//! - **ScrollAnimator**: the single-flight eased scroll state machine.
//! - **PaintLayer**: the capability concrete drawing targets implement.
//!
//! # How it fits in the system
//! Hosts create a [`Renderer`], attach a [`DocumentMetrics`] implementation,
//! install [`PaintLayer`]s, and call [`Renderer::tick`] from their frame
//! loop and [`Renderer::advance_animation`] from their timer.
//!
//! [`DocumentMetrics`]: vrender_layout::DocumentMetrics

pub mod animation;
pub mod dirty_rows;
pub mod observer;
pub mod paint;
pub mod renderer;
pub mod scheduler;
pub mod scroll;

pub use animation::{
    AnimationClock, AnimationStep, ScrollAnimator, ScrollCallback, StartOutcome, WallClock,
};
pub use dirty_rows::{DirtyRows, LinesPlan, RowRange};
pub use observer::{ObserverId, RenderObserver};
pub use paint::{LayerKind, LayerSet, NullLayer, PaintLayer};
pub use renderer::{ApplyOutcome, Renderer};
pub use scheduler::RenderScheduler;
pub use scroll::ScrollController;
