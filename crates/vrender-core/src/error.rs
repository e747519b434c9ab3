#![forbid(unsafe_code)]

//! Configuration errors.
//!
//! Padding is the one input validated at the boundary; every other numeric
//! input is clamped rather than rejected.

use std::fmt;

/// Errors raised while building or loading a [`RendererConfig`](crate::RendererConfig).
#[derive(Debug)]
pub enum ConfigError {
    /// Padding was not a finite number.
    InvalidPadding { value: f64 },
    /// Animation needs at least one interpolation step.
    InvalidAnimationSteps { steps: usize },
    /// Reading a configuration file failed.
    Io(std::io::Error),
    /// A TOML document could not be parsed into a configuration.
    #[cfg(feature = "serde")]
    Toml(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPadding { value } => {
                write!(f, "padding must be a finite number of pixels, got {value}")
            }
            Self::InvalidAnimationSteps { steps } => {
                write!(f, "animation needs at least one step, got {steps}")
            }
            Self::Io(err) => write!(f, "failed to read configuration: {err}"),
            #[cfg(feature = "serde")]
            Self::Toml(err) => write!(f, "invalid configuration: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            #[cfg(feature = "serde")]
            Self::Toml(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}
