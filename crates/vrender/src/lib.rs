#![forbid(unsafe_code)]

//! vrender public facade crate.
//!
//! Re-exports the types hosts need from the internal crates and offers a
//! prelude. A typical host:
//!
//! 1. creates a [`Renderer`] from a [`RendererConfig`] and the measured
//!    [`CharacterSize`];
//! 2. installs its [`PaintLayer`]s and attaches a [`DocumentMetrics`]
//!    implementation;
//! 3. reports resizes, edits and scroll requests as they happen;
//! 4. calls [`Renderer::tick`] once per frame and
//!    [`Renderer::advance_animation`] from its timer.

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use vrender_core::{
    CachedSize, CharacterSize, Changes, ConfigError, DocumentPosition, LayerConfig, PixelPoint,
    PixelRect, RenderEvent, RendererConfig, ScreenCoordinates, ScreenPosition, ScrollMargin, Side,
};

// --- Layout re-exports -----------------------------------------------------

pub use vrender_layout::{
    Axis, CoordinateMapper, DocumentMetrics, LayoutEngine, LayoutOutcome, ScrollbarModel,
    ViewState,
};

// --- Runtime re-exports ----------------------------------------------------

pub use vrender_runtime::{
    AnimationClock, ApplyOutcome, LayerKind, LayerSet, NullLayer, ObserverId, PaintLayer,
    RenderObserver, Renderer, ScrollCallback, WallClock,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for vrender hosts.
#[derive(Debug)]
pub enum Error {
    /// Invalid or unreadable renderer configuration.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

/// Standard result type for vrender APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Changes, CharacterSize, DocumentMetrics, DocumentPosition, Error, LayerConfig, LayerKind,
        LayerSet, PaintLayer, RenderEvent, Renderer, RendererConfig, Result, ScrollMargin,
    };

    pub use crate::{core, layout, runtime};
}

pub use vrender_core as core;
pub use vrender_layout as layout;
pub use vrender_runtime as runtime;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn config_errors_convert() {
        let err: Error = ConfigError::InvalidPadding { value: f64::INFINITY }.into();
        assert!(err.to_string().contains("padding"));
        assert!(err.source().is_some());
    }

    #[test]
    fn question_mark_propagates_padding_errors() {
        fn build(padding: f64) -> Result<RendererConfig> {
            Ok(RendererConfig::default().with_padding(padding)?)
        }
        assert!(build(6.0).is_ok());
        assert!(matches!(
            build(f64::NAN),
            Err(Error::Config(ConfigError::InvalidPadding { .. }))
        ));
    }
}
