#![forbid(unsafe_code)]

//! Core: change sets, layer geometry, configuration, and notifications.
//!
//! # Role in vrender
//! `vrender-core` holds the plain value types every other crate speaks in.
//! It has no behavior beyond small constructors and merge rules, so it can
//! be shared by the layout engine, the runtime, and host code without
//! pulling in any scheduling machinery.
//!
//! # Primary responsibilities
//! - **Changes**: named dirty flags with commutative OR-merge.
//! - **LayerConfig**: the wholesale-replaced visible-window snapshot that
//!   paint layers consume.
//! - **CachedSize / ScrollMargin / CharacterSize**: viewport geometry inputs.
//! - **RendererConfig**: the explicit option set (padding, margins,
//!   scrollbars, autosize, animation).
//! - **RenderEvent**: notifications emitted to host observers.
//!
//! # How it fits in the system
//! `vrender-layout` turns these values plus document row metrics into a new
//! `LayerConfig`; `vrender-runtime` coalesces `Changes` between frames and
//! dispatches the minimal set of layer updates.

pub mod change;
pub mod config;
pub mod error;
pub mod event;
pub mod geometry;

pub use change::Changes;
pub use config::RendererConfig;
pub use error::ConfigError;
pub use event::RenderEvent;
pub use geometry::{
    CachedSize, CharacterSize, DocumentPosition, LayerConfig, PixelPoint, PixelRect,
    ScreenCoordinates, ScreenPosition, ScrollMargin, Side,
};
