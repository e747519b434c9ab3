#![forbid(unsafe_code)]

//! Visible-window layout.
//!
//! [`LayoutEngine::compute`] turns the scroll position, cached viewport size
//! and document row metrics in a [`ViewState`] into a fresh [`LayerConfig`].
//!
//! # Algorithm
//!
//! 1. Autosize first when `max_lines` is configured.
//! 2. Scrollbars hide entirely when the viewport is at most two rows tall.
//! 3. Content height is `screen_length * line_height`, plus the
//!    scroll-past-end slack when not autosizing.
//! 4. Scrollbar visibility is recomputed (sticky: stored in the state).
//! 5. Scroll is clamped into `[-margin, content - viewport + margin]`.
//! 6. The screen window is derived from the clamped scroll top.
//! 7. Window bounds are mapped to document rows; the first row snaps to
//!    its fold start.
//! 8. `first_row_screen` and `offset` are recomputed from the snapped row.
//! 9. `min_height` covers the viewport plus the first and last rows.
//! 10. A changed longest-line width adds [`Changes::H_SCROLL`].
//! 11. A visibility flip refreshes cached geometry, emits
//!     [`RenderEvent::ScrollbarVisibilityChanged`] and runs the window
//!     computation one more time. A second flip within the same compute
//!     refreshes geometry only; there is no convergence loop.
//!
//! # Invariants
//!
//! - `first_row <= last_row`.
//! - `first_row` is never inside a folded run.
//! - With zero scroll margins, `0 <= offset < line_height` except when
//!   autosize rounding leaves the content shorter than the viewport.

use vrender_core::{Changes, LayerConfig, RenderEvent, RendererConfig};

use crate::metrics::DocumentMetrics;
use crate::state::ViewState;

/// Result of one [`LayoutEngine::compute`] call.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayoutOutcome {
    /// Extra bits to merge into the current apply pass.
    pub changes: Changes,
    /// Notifications produced while laying out, in emission order.
    pub events: Vec<RenderEvent>,
    /// Window computations run (1, or 2 after a visibility flip).
    pub passes: usize,
    /// Outer height autosize applied to the container, extra height
    /// included. Hosts must remember it as the container's height.
    pub autosized_height: Option<f64>,
}

/// Stateless layout computation over a borrowed config.
#[derive(Debug, Clone, Copy)]
pub struct LayoutEngine<'a> {
    config: &'a RendererConfig,
}

impl<'a> LayoutEngine<'a> {
    #[must_use]
    pub const fn new(config: &'a RendererConfig) -> Self {
        Self { config }
    }

    /// Recompute the visible window and install it into `state.layer`.
    ///
    /// Does nothing when the cell size is unmeasured.
    pub fn compute<D: DocumentMetrics + ?Sized>(
        &self,
        state: &mut ViewState,
        doc: &mut D,
    ) -> LayoutOutcome {
        let mut outcome = LayoutOutcome::default();
        if !state.is_measured() {
            return outcome;
        }

        if self.config.autosizes() && state.char_size.line_height > 1.0 {
            self.autosize(state, doc, &mut outcome);
        }

        let flipped = self.window_pass(state, doc, &mut outcome);
        if flipped {
            self.window_pass(state, doc, &mut outcome);
        }

        tracing::trace!(
            target: "vrender.layout",
            first_row = state.layer.first_row,
            last_row = state.layer.last_row,
            first_row_screen = state.layer.first_row_screen,
            offset = state.layer.offset,
            passes = outcome.passes,
            changes = %outcome.changes,
            "layout computed"
        );
        outcome
    }

    /// Grow or shrink the viewport with the content, within
    /// `[min_lines, max_lines]` rows.
    pub fn autosize<D: DocumentMetrics + ?Sized>(
        &self,
        state: &mut ViewState,
        doc: &mut D,
        outcome: &mut LayoutOutcome,
    ) {
        let Some(max_lines) = self.config.max_lines else {
            return;
        };
        let lh = state.char_size.line_height;
        let content = doc.screen_length() as f64 * lh;
        let max_height = max_lines as f64 * lh;
        let min_height = self.config.min_lines.max(1) as f64 * lh;
        let desired = min_height.max(content.min(max_height))
            + self.config.scroll_margin.v()
            + self.config.extra_height;
        let v_scroll = content > max_height;
        let settled_height = desired - self.config.extra_height;

        if desired == state.desired_height
            && state.size.height == settled_height
            && v_scroll == state.scrollbars.vertical
        {
            return;
        }

        state.scrollbars.vertical = v_scroll;
        let width = state.size.width;
        let update = state.update_cached_size(true, None, width, desired, self.config, doc);
        outcome.changes |= update.changes;
        if let Some(old) = update.old {
            outcome.events.push(RenderEvent::Resize { old });
        }
        state.desired_height = desired;
        outcome.autosized_height = Some(desired);
        tracing::trace!(
            target: "vrender.layout",
            desired_height = desired,
            v_scroll,
            "autosized"
        );
    }

    /// One window computation. Returns whether scrollbar visibility flipped.
    fn window_pass<D: DocumentMetrics + ?Sized>(
        &self,
        state: &mut ViewState,
        doc: &mut D,
        outcome: &mut LayoutOutcome,
    ) -> bool {
        let config = self.config;
        let lh = state.char_size.line_height;
        let margin = config.scroll_margin;
        state.layout_runs += 1;
        outcome.passes += 1;

        let hide_scrollbars = state.size.height <= 2.0 * lh;
        let mut max_height = doc.screen_length() as f64 * lh;
        let mut longest_line = state.longest_line(config, doc);

        let horizontal = !hide_scrollbars
            && (config.h_scrollbar_always_visible
                || state.size.scroller_width - longest_line - 2.0 * config.padding < 0.0);
        let h_changed = horizontal != state.scrollbars.horizontal;
        state.scrollbars.horizontal = horizontal;

        if !config.autosizes() && config.scroll_past_end > 0.0 {
            max_height += (state.size.scroller_height - lh) * config.scroll_past_end;
        }

        let vertical = !hide_scrollbars
            && (config.v_scrollbar_always_visible
                || state.size.scroller_height - max_height < 0.0);
        let v_changed = vertical != state.scrollbars.vertical;
        state.scrollbars.vertical = vertical;

        let top = clamp_scroll(
            state.scroll.top,
            -margin.top,
            max_height - state.size.scroller_height + margin.bottom,
        );
        if top != state.scroll.top {
            state.scroll.set_top(top);
        }
        let left = clamp_scroll(
            state.scroll.left,
            -margin.left,
            longest_line + 2.0 * config.padding - state.size.scroller_width + margin.right,
        );
        if left != state.scroll.left {
            state.scroll.set_left(left);
        }

        let offset = top % lh;
        let row_count = row_span(state.size.scroller_height + lh, lh).saturating_sub(1);
        let first_screen = screen_index((top - offset) / lh);
        let last_screen = first_screen + row_count;

        let mut first_row = doc.screen_to_document_row(first_screen);
        if let Some(start) = doc.fold_start(first_row) {
            first_row = start;
        }
        let first_row_screen = doc.document_to_screen_row(first_row);
        let first_row_height = doc.row_length(first_row) as f64 * lh;

        let last_doc_row = doc.line_count().saturating_sub(1);
        let last_row = doc
            .screen_to_document_row(last_screen)
            .min(last_doc_row)
            .max(first_row);
        let min_height =
            state.size.scroller_height + doc.row_length(last_row) as f64 * lh + first_row_height;
        let offset = top - first_row_screen as f64 * lh;

        if state.layer.width != longest_line {
            outcome.changes |= Changes::H_SCROLL;
        }

        let flipped = h_changed || v_changed;
        if flipped {
            // cached height already excludes the reserved extra height
            let width = state.size.width;
            let height = state.size.height + config.extra_height;
            let update = state.update_cached_size(true, None, width, height, config, doc);
            outcome.changes |= update.changes;
            if let Some(old) = update.old {
                outcome.events.push(RenderEvent::Resize { old });
            }
            outcome.events.push(RenderEvent::ScrollbarVisibilityChanged {
                horizontal,
                vertical,
            });
            if v_changed {
                longest_line = state.longest_line(config, doc);
            }
        }

        let gutter_offset = row_span(offset + state.size.height - state.size.scroller_height, lh);

        state.layer = LayerConfig {
            width: longest_line,
            padding: config.padding,
            first_row,
            last_row,
            first_row_screen,
            line_height: lh,
            character_width: state.char_size.width,
            min_height,
            max_height,
            offset,
            height: state.size.scroller_height,
            gutter_offset,
        };

        flipped && outcome.passes == 1
    }
}

/// `max(low, min(value, high))`: the lower bound wins when the range is empty.
#[inline]
fn clamp_scroll(value: f64, low: f64, high: f64) -> f64 {
    value.min(high).max(low)
}

/// Nearest non-negative screen row index.
#[inline]
fn screen_index(rows: f64) -> usize {
    let rows = rows.round();
    if rows.is_finite() && rows > 0.0 {
        rows as usize
    } else {
        0
    }
}

/// `ceil(extent / line_height)`, saturating at zero.
#[inline]
fn row_span(extent: f64, line_height: f64) -> usize {
    let rows = (extent / line_height).ceil();
    if rows.is_finite() && rows > 0.0 {
        rows as usize
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::GridDocument;
    use tracing_test::traced_test;
    use vrender_core::{CharacterSize, ScrollMargin};

    fn sized_state(
        width: f64,
        height: f64,
        config: &RendererConfig,
        doc: &mut GridDocument,
    ) -> ViewState {
        let mut state = ViewState::new(CharacterSize::new(10.0, 10.0));
        state.update_cached_size(false, Some(0.0), width, height, config, doc);
        state
    }

    #[test]
    fn window_from_fractional_scroll() {
        let config = RendererConfig::default();
        let mut doc = GridDocument::uniform(100, 10);
        let mut state = sized_state(400.0, 100.0, &config, &mut doc);
        state.scroll.set_top(15.0);

        LayoutEngine::new(&config).compute(&mut state, &mut doc);

        let layer = state.layer;
        assert_eq!(layer.offset, 5.0);
        assert_eq!(layer.first_row, 1);
        assert_eq!(layer.first_row_screen, 1);
        // ceil((100 + 10) / 10) - 1 = 10 rows past the first
        assert_eq!(layer.last_row, 11);
        assert_eq!(layer.height, 100.0);
        assert_eq!(layer.max_height, 1000.0);
        assert_eq!(layer.min_height, 120.0);
    }

    #[test]
    fn scroll_clamps_to_content() {
        let config = RendererConfig::default();
        let mut doc = GridDocument::uniform(20, 10);
        let mut state = sized_state(400.0, 100.0, &config, &mut doc);
        state.scroll.set_top(10_000.0);
        state.scroll.set_left(-50.0);

        LayoutEngine::new(&config).compute(&mut state, &mut doc);

        assert_eq!(state.scroll.top, 100.0);
        assert_eq!(state.scroll.session_top, 100.0);
        assert_eq!(state.scroll.left, 0.0);
        assert_eq!(state.layer.first_row, 10);
        assert_eq!(state.layer.last_row, 19);
    }

    #[test]
    fn scroll_margin_allows_overscroll() {
        let config = RendererConfig::default()
            .with_scroll_margin(ScrollMargin::new(20.0, 30.0, 0.0, 0.0));
        let mut doc = GridDocument::uniform(20, 10);
        let mut state = sized_state(400.0, 100.0, &config, &mut doc);
        state.scroll.set_top(-100.0);
        LayoutEngine::new(&config).compute(&mut state, &mut doc);
        assert_eq!(state.scroll.top, -20.0);
        assert_eq!(state.layer.first_row, 0);
        assert_eq!(state.layer.offset, -20.0);

        state.scroll.set_top(10_000.0);
        LayoutEngine::new(&config).compute(&mut state, &mut doc);
        assert_eq!(state.scroll.top, 130.0);
    }

    #[test]
    fn short_document_fills_window() {
        let config = RendererConfig::default();
        let mut doc = GridDocument::uniform(3, 10);
        let mut state = sized_state(400.0, 100.0, &config, &mut doc);
        LayoutEngine::new(&config).compute(&mut state, &mut doc);
        assert_eq!(state.layer.first_row, 0);
        assert_eq!(state.layer.last_row, 2);
        assert!(!state.scrollbars.vertical);
    }

    #[test]
    fn first_row_snaps_to_fold_start() {
        let config = RendererConfig::default();
        let mut doc = GridDocument::uniform(100, 10);
        doc.fold(5, 9);
        let mut state = sized_state(400.0, 100.0, &config, &mut doc);
        // screen row 5 is the fold line starting at document row 5
        state.scroll.set_top(55.0);
        LayoutEngine::new(&config).compute(&mut state, &mut doc);
        assert_eq!(state.layer.first_row, 5);
        assert_eq!(state.layer.first_row_screen, 5);
        assert_eq!(state.layer.offset, 5.0);
        // screen row 6 maps past the hidden rows
        state.scroll.set_top(60.0);
        LayoutEngine::new(&config).compute(&mut state, &mut doc);
        assert_eq!(state.layer.first_row, 10);
        assert_eq!(state.layer.first_row_screen, 6);
    }

    #[test]
    fn wrapped_first_row_recomputes_offset() {
        let config = RendererConfig::default();
        let mut doc = GridDocument::uniform(50, 10).with_wrap(10);
        doc.set_line_len(2, 30);
        let mut state = sized_state(400.0, 100.0, &config, &mut doc);
        // settle scrollbar visibility, then pin the wrap limit the resize chose
        LayoutEngine::new(&config).compute(&mut state, &mut doc);
        doc.set_wrap_limit(10);
        // row 2 covers screen rows 2..=4; screen row 3 is mid-row
        state.scroll.set_top(30.0);
        let outcome = LayoutEngine::new(&config).compute(&mut state, &mut doc);
        assert_eq!(outcome.passes, 1);
        assert_eq!(state.layer.first_row, 2);
        assert_eq!(state.layer.first_row_screen, 2);
        assert_eq!(state.layer.offset, 10.0);
        assert_eq!(state.layer.min_height, 100.0 + 10.0 + 30.0);
    }

    #[test]
    fn vertical_flip_costs_one_extra_pass() {
        let config = RendererConfig::default().with_scrollbar_thickness(15.0, 15.0);
        let mut doc = GridDocument::uniform(100, 10);
        let mut state = sized_state(400.0, 100.0, &config, &mut doc);

        let outcome = LayoutEngine::new(&config).compute(&mut state, &mut doc);
        assert!(state.scrollbars.vertical);
        assert_eq!(outcome.passes, 2);
        assert_eq!(state.layout_runs, 2);
        assert!(outcome.events.contains(&RenderEvent::ScrollbarVisibilityChanged {
            horizontal: false,
            vertical: true,
        }));
        assert_eq!(state.size.scroller_width, 385.0);
        assert_eq!(state.layer.width, 385.0 - 8.0);

        // visibility now settled: a second compute is a single pass
        let again = LayoutEngine::new(&config).compute(&mut state, &mut doc);
        assert_eq!(again.passes, 1);
        assert_eq!(state.layout_runs, 3);
        assert!(again.events.is_empty());
    }

    #[test]
    fn flip_loop_is_bounded() {
        // Vertical bar steals exactly enough width to need a horizontal bar,
        // whose height then flips the vertical need again.
        let config = RendererConfig::default()
            .with_padding(0.0)
            .map(|c| c.with_scrollbar_thickness(10.0, 10.0))
            .expect("finite padding");
        let mut doc = GridDocument::uniform(10, 40);
        let mut state = sized_state(405.0, 100.0, &config, &mut doc);
        let outcome = LayoutEngine::new(&config).compute(&mut state, &mut doc);
        assert!(outcome.passes <= 2);
    }

    #[test]
    fn tiny_viewport_hides_scrollbars() {
        let config = RendererConfig {
            v_scrollbar_always_visible: true,
            h_scrollbar_always_visible: true,
            ..RendererConfig::default()
        };
        let mut doc = GridDocument::uniform(100, 500);
        let mut state = sized_state(400.0, 20.0, &config, &mut doc);
        LayoutEngine::new(&config).compute(&mut state, &mut doc);
        assert!(!state.scrollbars.vertical);
        assert!(!state.scrollbars.horizontal);
    }

    #[test]
    fn width_change_flags_horizontal_scroll() {
        let config = RendererConfig::default();
        let mut doc = GridDocument::uniform(5, 10);
        let mut state = sized_state(400.0, 100.0, &config, &mut doc);
        let first = LayoutEngine::new(&config).compute(&mut state, &mut doc);
        assert!(first.changes.contains(Changes::H_SCROLL));
        let steady = LayoutEngine::new(&config).compute(&mut state, &mut doc);
        assert!(!steady.changes.contains(Changes::H_SCROLL));
        doc.set_line_len(0, 100);
        let wider = LayoutEngine::new(&config).compute(&mut state, &mut doc);
        assert!(wider.changes.contains(Changes::H_SCROLL));
        assert_eq!(state.layer.width, 1000.0);
    }

    #[test]
    fn scroll_past_end_extends_content() {
        let config = RendererConfig::default().with_scroll_past_end(0.5);
        let mut doc = GridDocument::uniform(20, 10);
        let mut state = sized_state(400.0, 100.0, &config, &mut doc);
        state.scroll.set_top(10_000.0);
        LayoutEngine::new(&config).compute(&mut state, &mut doc);
        // 200 + (100 - 10) * 0.5 = 245
        assert_eq!(state.layer.max_height, 245.0);
        assert_eq!(state.scroll.top, 145.0);
    }

    #[test]
    fn autosize_tracks_content_height() {
        let config = RendererConfig::default().with_max_lines(Some(10));
        let mut doc = GridDocument::uniform(4, 10);
        let mut state = sized_state(400.0, 500.0, &config, &mut doc);
        let outcome = LayoutEngine::new(&config).compute(&mut state, &mut doc);
        assert_eq!(state.size.height, 40.0);
        assert_eq!(state.desired_height, 40.0);
        assert_eq!(outcome.autosized_height, Some(40.0));
        assert!(!state.scrollbars.vertical);
        assert!(outcome.events.iter().any(|e| matches!(e, RenderEvent::Resize { .. })));

        doc.insert_lines(0, 20, 10);
        LayoutEngine::new(&config).compute(&mut state, &mut doc);
        assert_eq!(state.size.height, 100.0);
        assert!(state.scrollbars.vertical);

        // settled: no further resize
        let quiet = LayoutEngine::new(&config).compute(&mut state, &mut doc);
        assert_eq!(quiet.autosized_height, None);
        assert!(!quiet.events.iter().any(|e| matches!(e, RenderEvent::Resize { .. })));
    }

    #[test]
    fn unmeasured_cells_skip_layout() {
        let config = RendererConfig::default();
        let mut doc = GridDocument::uniform(5, 10);
        let mut state = ViewState::new(CharacterSize::default());
        let outcome = LayoutEngine::new(&config).compute(&mut state, &mut doc);
        assert_eq!(outcome.passes, 0);
        assert_eq!(state.layer, LayerConfig::default());
    }

    #[test]
    fn empty_document_has_one_row() {
        let config = RendererConfig::default();
        let mut doc = GridDocument::uniform(0, 0);
        let mut state = sized_state(400.0, 100.0, &config, &mut doc);
        LayoutEngine::new(&config).compute(&mut state, &mut doc);
        assert_eq!(state.layer.first_row, 0);
        assert_eq!(state.layer.last_row, 0);
    }

    #[traced_test]
    #[test]
    fn layout_is_traced() {
        let config = RendererConfig::default();
        let mut doc = GridDocument::uniform(5, 10);
        let mut state = sized_state(400.0, 100.0, &config, &mut doc);
        LayoutEngine::new(&config).compute(&mut state, &mut doc);
        assert!(logs_contain("layout computed"));
    }
}
