#![forbid(unsafe_code)]

//! The owned view-state record.
//!
//! Everything layout reads or writes between passes lives in [`ViewState`]:
//! cached viewport geometry, the current [`LayerConfig`], scroll position,
//! sticky scrollbar visibility, and the measured cell size. Layout and the
//! runtime borrow it mutably; nothing else holds view geometry.
//!
//! # Invariants
//!
//! - `layer` is only ever replaced as a whole value.
//! - `size.scroller_width >= 0`.
//! - `scroll.top`/`scroll.left` differ from `session_top`/`session_left`
//!   only while a scroll animation is in flight.

use vrender_core::{CachedSize, CharacterSize, Changes, LayerConfig, RendererConfig};

use crate::metrics::DocumentMetrics;

/// Rendered and logical scroll position.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollState {
    /// Scroll top used by layout (what is on screen).
    pub top: f64,
    /// Scroll left used by layout.
    pub left: f64,
    /// Logical scroll top; the animation target while animating.
    pub session_top: f64,
    /// Logical scroll left.
    pub session_left: f64,
}

impl ScrollState {
    /// Set both rendered and logical top.
    #[inline]
    pub fn set_top(&mut self, top: f64) {
        self.top = top;
        self.session_top = top;
    }

    /// Set both rendered and logical left.
    #[inline]
    pub fn set_left(&mut self, left: f64) {
        self.left = left;
        self.session_left = left;
    }
}

/// Sticky scrollbar visibility, recomputed on every layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollbarVisibility {
    pub horizontal: bool,
    pub vertical: bool,
}

/// Result of [`ViewState::update_cached_size`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeUpdate {
    /// Bits the new geometry implies for the current or next pass.
    pub changes: Changes,
    /// Previous geometry, present when anything changed.
    pub old: Option<CachedSize>,
}

impl SizeUpdate {
    const UNCHANGED: Self = Self {
        changes: Changes::empty(),
        old: None,
    };
}

/// Owned state record for one renderer instance.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub size: CachedSize,
    pub layer: LayerConfig,
    pub scroll: ScrollState,
    pub scrollbars: ScrollbarVisibility,
    /// Last gutter width reported by the host.
    pub gutter_width: f64,
    pub char_size: CharacterSize,
    /// Height chosen by the last autosize run.
    pub desired_height: f64,
    /// Layout passes run since creation.
    pub layout_runs: u64,
}

impl ViewState {
    /// Fresh state with degenerate geometry; the first resize fills it in.
    #[must_use]
    pub fn new(char_size: CharacterSize) -> Self {
        Self {
            size: CachedSize::default(),
            layer: LayerConfig::default(),
            scroll: ScrollState::default(),
            scrollbars: ScrollbarVisibility::default(),
            gutter_width: 0.0,
            char_size,
            desired_height: 0.0,
            layout_runs: 0,
        }
    }

    /// Gutter width that actually takes space: zero when the gutter is hidden.
    #[inline]
    #[must_use]
    pub fn effective_gutter_width(&self, config: &RendererConfig) -> f64 {
        if config.show_gutter {
            self.gutter_width
        } else {
            0.0
        }
    }

    /// Whether the cell size is usable for layout.
    #[inline]
    #[must_use]
    pub fn is_measured(&self) -> bool {
        self.char_size.line_height > 0.0
            && self.char_size.line_height.is_finite()
            && self.char_size.width > 0.0
            && self.char_size.width.is_finite()
    }

    /// Fold a new outer size into the cached geometry.
    ///
    /// Zero (or non-positive) dimensions leave the matching fields alone and
    /// mark the size dirty. With `force`, both dimensions are reapplied even
    /// if unchanged, which also forces a full redraw.
    pub fn update_cached_size<D: DocumentMetrics + ?Sized>(
        &mut self,
        force: bool,
        gutter_width: Option<f64>,
        width: f64,
        height: f64,
        config: &RendererConfig,
        doc: &mut D,
    ) -> SizeUpdate {
        let height = height - config.extra_height;
        let old = self.size;
        let mut changes = Changes::empty();

        if height > 0.0 && (force || self.size.height != height) {
            self.size.height = height;
            self.size.scroller_height = height;
            if self.scrollbars.horizontal {
                self.size.scroller_height -= config.h_scrollbar_height;
            }
            changes |= Changes::SIZE | Changes::SCROLL;
        }

        if width > 0.0 && (force || self.size.width != width) {
            changes |= Changes::SIZE;
            self.size.width = width;
            if let Some(gutter_width) = gutter_width {
                self.gutter_width = gutter_width;
            }
            let v_bar = if self.scrollbars.vertical {
                config.v_scrollbar_width
            } else {
                0.0
            };
            self.size.scroller_width =
                (width - self.effective_gutter_width(config) - v_bar).max(0.0);

            let rewrapped = doc.uses_wrap_mode() && self.adjust_wrap_limit(config, doc);
            if rewrapped || force {
                changes |= Changes::FULL;
            }
        }

        self.size.dirty = !(width > 0.0 && height > 0.0);

        if changes.is_empty() {
            return SizeUpdate::UNCHANGED;
        }
        SizeUpdate {
            changes,
            old: Some(old),
        }
    }

    /// Offer the document a wrap limit matching the current content width.
    pub fn adjust_wrap_limit<D: DocumentMetrics + ?Sized>(
        &self,
        config: &RendererConfig,
        doc: &mut D,
    ) -> bool {
        if !self.is_measured() {
            return false;
        }
        let available = self.size.scroller_width - config.padding * 2.0;
        let limit = (available / self.char_size.width).floor();
        let limit = if limit > 0.0 { limit as usize } else { 0 };
        doc.adjust_wrap_limit(limit, config.print_margin_column)
    }

    /// Longest visible line in pixels, never narrower than the content area.
    #[must_use]
    pub fn longest_line<D: DocumentMetrics + ?Sized>(
        &self,
        config: &RendererConfig,
        doc: &D,
    ) -> f64 {
        let mut chars = doc.screen_width();
        if config.show_invisibles && !doc.uses_wrap_mode() {
            chars += 1;
        }
        let text = (chars as f64 * self.char_size.width).round();
        (self.size.scroller_width - 2.0 * config.padding).max(text)
    }
}
