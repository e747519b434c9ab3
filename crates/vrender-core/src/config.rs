#![forbid(unsafe_code)]

//! Renderer options as plain data.
//!
//! [`RendererConfig`] gathers every tunable the layout engine and the
//! runtime read. Hosts usually build it in code; with the `serde` feature it
//! can also be loaded from TOML:
//!
//! ```toml
//! padding = 6
//! animated_scroll = true
//! scroll_past_end = 0.5
//!
//! [scroll_margin]
//! top = 8
//! ```
//!
//! # Defaults
//!
//! `RendererConfig::default()` matches a plain code editor: 4px padding, a
//! visible gutter, no animation, no overscroll, and 8-step animations ticked
//! every 10ms when animation is enabled.

#[cfg(feature = "serde")]
use std::path::Path;
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::geometry::ScrollMargin;

/// Default number of eased samples per scroll animation.
pub const DEFAULT_ANIMATION_STEPS: usize = 8;
/// Default animation tick period in milliseconds.
pub const DEFAULT_ANIMATION_TICK_MS: u64 = 10;

/// Explicit option set for the renderer.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RendererConfig {
    /// Horizontal padding inside the content area, in pixels.
    pub padding: f64,
    /// Overscroll slack beyond the content bounds.
    pub scroll_margin: ScrollMargin,
    /// Animate `scroll_to_line` and friends.
    pub animated_scroll: bool,
    /// Number of eased samples per animation.
    pub animation_steps: usize,
    /// Animation tick period in milliseconds.
    pub animation_tick_ms: u64,
    pub show_gutter: bool,
    /// Keep the active-line highlight in the gutter in sync with the cursor.
    pub highlight_gutter_line: bool,
    pub h_scrollbar_always_visible: bool,
    pub v_scrollbar_always_visible: bool,
    /// Fraction of one viewport the content may scroll past its last row.
    pub scroll_past_end: f64,
    /// Autosize: grow the viewport with content up to this many rows.
    pub max_lines: Option<usize>,
    /// Autosize: never shrink below this many rows.
    pub min_lines: usize,
    /// Extra pixels reserved below the content (status bars, etc.).
    pub extra_height: f64,
    /// Invisible characters add one column to the longest line when wrapping is off.
    pub show_invisibles: bool,
    /// Keep the input-capture element positioned over the cursor.
    pub keep_input_at_cursor: bool,
    /// Thickness of the vertical scrollbar when visible.
    pub v_scrollbar_width: f64,
    /// Thickness of the horizontal scrollbar when visible.
    pub h_scrollbar_height: f64,
    /// Print margin forwarded to wrap-limit adjustment.
    pub print_margin_column: Option<usize>,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            padding: 4.0,
            scroll_margin: ScrollMargin::default(),
            animated_scroll: false,
            animation_steps: DEFAULT_ANIMATION_STEPS,
            animation_tick_ms: DEFAULT_ANIMATION_TICK_MS,
            show_gutter: true,
            highlight_gutter_line: false,
            h_scrollbar_always_visible: false,
            v_scrollbar_always_visible: false,
            scroll_past_end: 0.0,
            max_lines: None,
            min_lines: 1,
            extra_height: 0.0,
            show_invisibles: false,
            keep_input_at_cursor: true,
            v_scrollbar_width: 0.0,
            h_scrollbar_height: 0.0,
            print_margin_column: Some(80),
        }
    }
}

impl RendererConfig {
    /// Load from a TOML string.
    #[cfg(feature = "serde")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s).map_err(ConfigError::Toml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "serde")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Check the fields that are rejected rather than clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_padding(self.padding)?;
        if self.animation_steps == 0 {
            return Err(ConfigError::InvalidAnimationSteps {
                steps: self.animation_steps,
            });
        }
        Ok(())
    }

    /// Animation tick period.
    #[must_use]
    pub fn animation_tick(&self) -> Duration {
        Duration::from_millis(self.animation_tick_ms.max(1))
    }

    /// Whether the viewport height follows the content (autosize mode).
    #[inline]
    #[must_use]
    pub fn autosizes(&self) -> bool {
        self.max_lines.is_some_and(|lines| lines > 0)
    }

    /// Builder-style padding setter that validates eagerly.
    pub fn with_padding(mut self, padding: f64) -> Result<Self, ConfigError> {
        validate_padding(padding)?;
        self.padding = padding;
        Ok(self)
    }

    #[must_use]
    pub fn with_scroll_margin(mut self, margin: ScrollMargin) -> Self {
        self.scroll_margin = margin;
        self
    }

    #[must_use]
    pub fn with_animated_scroll(mut self, animated: bool) -> Self {
        self.animated_scroll = animated;
        self
    }

    #[must_use]
    pub fn with_scroll_past_end(mut self, fraction: f64) -> Self {
        self.scroll_past_end = sanitize_fraction(fraction);
        self
    }

    #[must_use]
    pub fn with_max_lines(mut self, max_lines: Option<usize>) -> Self {
        self.max_lines = max_lines;
        self
    }

    #[must_use]
    pub fn with_scrollbar_thickness(mut self, v_width: f64, h_height: f64) -> Self {
        self.v_scrollbar_width = v_width.max(0.0);
        self.h_scrollbar_height = h_height.max(0.0);
        self
    }

    #[must_use]
    pub fn with_show_gutter(mut self, show: bool) -> Self {
        self.show_gutter = show;
        self
    }
}

/// Reject padding values that are not finite.
pub fn validate_padding(padding: f64) -> Result<(), ConfigError> {
    if padding.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::InvalidPadding { value: padding })
    }
}

/// Non-finite or negative fractions collapse to zero.
#[must_use]
pub fn sanitize_fraction(value: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let config = RendererConfig::default();
        assert!(config.validate().is_ok());
        assert!(!config.autosizes());
        assert_eq!(config.animation_tick(), Duration::from_millis(10));
    }

    #[test]
    fn non_finite_padding_is_rejected() {
        assert!(matches!(
            RendererConfig::default().with_padding(f64::NAN),
            Err(ConfigError::InvalidPadding { .. })
        ));
        assert!(RendererConfig::default().with_padding(f64::INFINITY).is_err());
        assert!(RendererConfig::default().with_padding(6.0).is_ok());
    }

    #[test]
    fn zero_steps_rejected() {
        let config = RendererConfig {
            animation_steps: 0,
            ..RendererConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidAnimationSteps { steps: 0 })
        ));
    }

    #[test]
    fn scroll_past_end_is_sanitized() {
        assert_eq!(RendererConfig::default().with_scroll_past_end(-1.0).scroll_past_end, 0.0);
        assert_eq!(RendererConfig::default().with_scroll_past_end(f64::NAN).scroll_past_end, 0.0);
        assert_eq!(RendererConfig::default().with_scroll_past_end(0.5).scroll_past_end, 0.5);
    }

    #[test]
    fn autosize_requires_positive_max_lines() {
        assert!(!RendererConfig::default().with_max_lines(Some(0)).autosizes());
        assert!(RendererConfig::default().with_max_lines(Some(10)).autosizes());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn toml_round_trip_partial() {
        let config = RendererConfig::from_toml_str(
            "padding = 6.0\nanimated_scroll = true\n[scroll_margin]\ntop = 8.0\n",
        )
        .expect("valid toml");
        assert_eq!(config.padding, 6.0);
        assert!(config.animated_scroll);
        assert_eq!(config.scroll_margin.top, 8.0);
        assert!(config.show_gutter);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn toml_rejects_string_padding() {
        assert!(matches!(
            RendererConfig::from_toml_str("padding = \"wide\"\n"),
            Err(ConfigError::Toml(_))
        ));
    }
}
