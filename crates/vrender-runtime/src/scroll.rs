#![forbid(unsafe_code)]

//! Scroll position control.
//!
//! [`ScrollController`] edits the scroll fields of a [`ViewState`] and
//! reports which [`Changes`] the edit implies; the caller schedules them.
//! Animation is layered on top by the renderer.
//!
//! Requests compare against the logical (`session_*`) position. While an
//! animation is in flight the logical top already equals the animation
//! target, so a request for the target is a no-op rather than a jump.

use vrender_core::{Changes, DocumentPosition, PixelPoint, RendererConfig, ScrollMargin};
use vrender_layout::{Axis, CoordinateMapper, DocumentMetrics, ScrollbarModel, ViewState};

/// Scroll operations over one view state.
#[derive(Debug)]
pub struct ScrollController<'a> {
    state: &'a mut ViewState,
    config: &'a RendererConfig,
}

impl<'a> ScrollController<'a> {
    pub fn new(state: &'a mut ViewState, config: &'a RendererConfig) -> Self {
        Self { state, config }
    }

    fn cursor_pixel<D: DocumentMetrics + ?Sized>(&self, position: DocumentPosition, doc: &D) -> PixelPoint {
        CoordinateMapper::new(&*self.state, self.config.padding, PixelPoint::default())
            .cursor_pixel_position(position, false, doc)
    }

    fn set_top(&mut self, top: f64) -> Changes {
        if top.is_nan() || self.state.scroll.session_top == top {
            return Changes::empty();
        }
        let moved = self.state.scroll.top != top;
        self.state.scroll.set_top(top);
        if moved {
            Changes::SCROLL
        } else {
            Changes::empty()
        }
    }

    fn set_left(&mut self, left: f64) -> Changes {
        if left.is_nan() || self.state.scroll.session_left == left {
            return Changes::empty();
        }
        let moved = self.state.scroll.left != left;
        self.state.scroll.set_left(left);
        if moved {
            Changes::H_SCROLL
        } else {
            Changes::empty()
        }
    }

    pub fn scroll_to_y(&mut self, top: f64) -> Changes {
        self.set_top(top)
    }

    pub fn scroll_to_x(&mut self, left: f64) -> Changes {
        self.set_left(left)
    }

    pub fn scroll_to(&mut self, x: f64, y: f64) -> Changes {
        self.set_top(y) | self.set_left(x)
    }

    /// Scroll relative to the logical position.
    pub fn scroll_by(&mut self, dx: f64, dy: f64) -> Changes {
        let mut changes = Changes::empty();
        if dy != 0.0 {
            changes |= self.set_top(self.state.scroll.session_top + dy);
        }
        if dx != 0.0 {
            changes |= self.set_left(self.state.scroll.session_left + dx);
        }
        changes
    }

    /// Put screen row `row` at the top edge.
    pub fn scroll_to_row(&mut self, row: usize) -> Changes {
        self.set_top(row as f64 * self.state.char_size.line_height)
    }

    /// Put document line `line` at the top edge, or centered.
    pub fn scroll_to_line<D: DocumentMetrics + ?Sized>(
        &mut self,
        line: usize,
        center: bool,
        doc: &D,
    ) -> Changes {
        let mut offset = self.cursor_pixel(DocumentPosition::new(line, 0), doc).y;
        if center {
            offset -= self.state.size.scroller_height / 2.0;
        }
        self.set_top(offset)
    }

    /// Scroll so `position` sits `fraction` of the way down the viewport
    /// (0 = top, 1 = bottom). Returns the new scroll top.
    pub fn align_cursor<D: DocumentMetrics + ?Sized>(
        &mut self,
        position: DocumentPosition,
        fraction: f64,
        doc: &D,
    ) -> (f64, Changes) {
        let top = self.cursor_pixel(position, doc).y;
        let usable = self.state.size.scroller_height - self.state.char_size.line_height;
        let offset = top - usable * fraction;
        (offset, self.set_top(offset))
    }

    /// Reveal `position`.
    ///
    /// Vertically: scroll up or down just enough, keeping `view_margin`
    /// clear. A non-zero `overshoot` (a fraction of the viewport) reveals
    /// extra context past the target. Horizontally: the first columns near
    /// the padding snap back to the left scroll margin.
    pub fn scroll_position_into_view<D: DocumentMetrics + ?Sized>(
        &mut self,
        position: DocumentPosition,
        overshoot: f64,
        view_margin: ScrollMargin,
        animating: bool,
        doc: &D,
    ) -> Changes {
        let scroller_height = self.state.size.scroller_height;
        if scroller_height == 0.0 {
            return Changes::empty();
        }
        let pixel = self.cursor_pixel(position, doc);
        let lh = self.state.char_size.line_height;
        let cw = self.state.char_size.width;
        let (mut left, mut top) = (pixel.x, pixel.y);
        let scroll_top = if animating {
            self.state.scroll.session_top
        } else {
            self.state.scroll.top
        };

        let mut changes = Changes::empty();
        if scroll_top + view_margin.top > top {
            if overshoot != 0.0 {
                top -= overshoot * scroller_height;
            }
            if top == 0.0 {
                top = -self.config.scroll_margin.top;
            }
            changes |= self.set_top(top);
        } else if scroll_top + scroller_height - view_margin.bottom < top + lh {
            if overshoot != 0.0 {
                top += overshoot * scroller_height;
            }
            changes |= self.set_top(top + lh + view_margin.bottom - scroller_height);
        }

        let scroll_left = self.state.scroll.left;
        let scroller_width = self.state.size.scroller_width;
        if scroll_left > left {
            if left < self.config.padding + 2.0 * cw {
                left = -self.config.scroll_margin.left;
            }
            changes |= self.set_left(left);
        } else if scroll_left + scroller_width < left + cw {
            changes |= self.set_left((left + cw - scroller_width).round());
        } else if scroll_left <= self.config.padding && left - scroll_left < cw {
            changes |= self.set_left(0.0);
        }
        changes
    }

    /// Reveal both ends of a selection, anchor first.
    pub fn scroll_selection_into_view<D: DocumentMetrics + ?Sized>(
        &mut self,
        anchor: DocumentPosition,
        lead: DocumentPosition,
        overshoot: f64,
        animating: bool,
        doc: &D,
    ) -> Changes {
        let margin = ScrollMargin::default();
        self.scroll_position_into_view(anchor, overshoot, margin, animating, doc)
            | self.scroll_position_into_view(lead, overshoot, margin, animating, doc)
    }

    /// Whether scrolling by `(dx, dy)` would move anything.
    #[must_use]
    pub fn is_scrollable_by(&self, dx: f64, dy: f64) -> bool {
        is_scrollable_by(&*self.state, self.config, dx, dy)
    }

    /// A scrollbar was dragged to `value` (margins included). Ignored while
    /// an animation is in flight.
    pub fn on_scrollbar_scroll(&mut self, axis: Axis, value: f64, animating: bool) -> Changes {
        if animating {
            return Changes::empty();
        }
        match axis {
            Axis::Vertical => self.set_top(value - self.config.scroll_margin.top),
            Axis::Horizontal => self.set_left(value - self.config.scroll_margin.left),
        }
    }
}

/// Whether scrolling by `(dx, dy)` from the logical position would move
/// anything, margins included.
#[must_use]
pub fn is_scrollable_by(state: &ViewState, config: &RendererConfig, dx: f64, dy: f64) -> bool {
    let scroll = state.scroll;
    let margin = config.scroll_margin;
    let size = state.size;
    let layer = state.layer;
    (dy < 0.0 && scroll.session_top >= 1.0 - margin.top)
        || (dy > 0.0
            && scroll.session_top + size.scroller_height - layer.max_height < -1.0 + margin.bottom)
        || (dx < 0.0 && scroll.session_left >= 1.0 - margin.left)
        || (dx > 0.0
            && scroll.session_left + size.scroller_width - layer.width < -1.0 + margin.right)
}

/// Mirror vertical layout extents into the scrollbar model.
pub fn sync_vertical(state: &ViewState, config: &RendererConfig, bar: &mut ScrollbarModel) -> bool {
    let scroller_height = state.size.scroller_height;
    let mut extent = state.layer.max_height;
    if !config.autosizes() && config.scroll_past_end > 0.0 {
        extent -= (scroller_height - state.char_size.line_height) * config.scroll_past_end;
        if state.scroll.top > extent - scroller_height {
            extent = state.scroll.top + scroller_height;
        }
    }
    bar.visible = state.scrollbars.vertical;
    bar.thickness = config.v_scrollbar_width;
    bar.sync(
        extent + config.scroll_margin.v(),
        state.scroll.top + config.scroll_margin.top,
    )
}

/// Mirror horizontal layout extents into the scrollbar model.
pub fn sync_horizontal(state: &ViewState, config: &RendererConfig, bar: &mut ScrollbarModel) -> bool {
    bar.visible = state.scrollbars.horizontal;
    bar.thickness = config.h_scrollbar_height;
    bar.sync(
        state.layer.width + 2.0 * config.padding + config.scroll_margin.h(),
        state.scroll.left + config.scroll_margin.left,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use vrender_core::CharacterSize;
    use vrender_layout::LayoutEngine;
    use vrender_layout::testing::GridDocument;

    fn setup(lines: usize, len: usize) -> (ViewState, RendererConfig, GridDocument) {
        let config = RendererConfig::default();
        let mut doc = GridDocument::uniform(lines, len);
        let mut state = ViewState::new(CharacterSize::new(10.0, 10.0));
        state.update_cached_size(false, Some(0.0), 400.0, 100.0, &config, &mut doc);
        LayoutEngine::new(&config).compute(&mut state, &mut doc);
        (state, config, doc)
    }

    #[test]
    fn set_top_reports_scroll_once() {
        let (mut state, config, _) = setup(100, 10);
        let mut scroll = ScrollController::new(&mut state, &config);
        assert_eq!(scroll.scroll_to_y(50.0), Changes::SCROLL);
        assert!(scroll.scroll_to_y(50.0).is_empty());
        assert!(scroll.scroll_to_y(f64::NAN).is_empty());
        assert_eq!(scroll.scroll_to_x(7.0), Changes::H_SCROLL);
    }

    #[test]
    fn scroll_to_sets_both_axes() {
        let (mut state, config, _) = setup(100, 100);
        let changes = ScrollController::new(&mut state, &config).scroll_to(30.0, 60.0);
        assert_eq!(changes, Changes::SCROLL | Changes::H_SCROLL);
        assert_eq!(state.scroll.left, 30.0);
        assert_eq!(state.scroll.top, 60.0);
    }

    #[test]
    fn scroll_by_uses_logical_position() {
        let (mut state, config, _) = setup(100, 10);
        state.scroll.top = 5.0;
        state.scroll.session_top = 40.0;
        ScrollController::new(&mut state, &config).scroll_by(0.0, 10.0);
        assert_eq!(state.scroll.top, 50.0);
        assert_eq!(state.scroll.session_top, 50.0);
    }

    #[test]
    fn scroll_to_line_centers() {
        let (mut state, config, doc) = setup(100, 10);
        let mut scroll = ScrollController::new(&mut state, &config);
        scroll.scroll_to_line(30, false, &doc);
        assert_eq!(state.scroll.top, 300.0);
        ScrollController::new(&mut state, &config).scroll_to_line(30, true, &doc);
        assert_eq!(state.scroll.top, 250.0);
    }

    #[test]
    fn align_cursor_by_fraction() {
        let (mut state, config, doc) = setup(100, 10);
        let (top, _) = ScrollController::new(&mut state, &config).align_cursor(
            DocumentPosition::new(40, 0),
            0.5,
            &doc,
        );
        // 400 - (100 - 10) * 0.5
        assert_eq!(top, 355.0);
        assert_eq!(state.scroll.top, 355.0);
    }

    #[test]
    fn reveal_below_scrolls_down_minimally() {
        let (mut state, config, doc) = setup(100, 10);
        let changes = ScrollController::new(&mut state, &config).scroll_position_into_view(
            DocumentPosition::new(20, 0),
            0.0,
            ScrollMargin::default(),
            false,
            &doc,
        );
        assert!(changes.contains(Changes::SCROLL));
        // row 20 bottom (210) aligned with the viewport bottom
        assert_eq!(state.scroll.top, 110.0);
    }

    #[test]
    fn reveal_above_with_overshoot() {
        let (mut state, config, doc) = setup(100, 10);
        state.scroll.set_top(500.0);
        ScrollController::new(&mut state, &config).scroll_position_into_view(
            DocumentPosition::new(20, 0),
            0.5,
            ScrollMargin::default(),
            false,
            &doc,
        );
        assert_eq!(state.scroll.top, 150.0);
    }

    #[test]
    fn overshoot_applies_one_row_off_screen() {
        let (mut state, config, doc) = setup(100, 10);
        state.scroll.set_top(500.0);
        // row 49 sits just above the viewport: 490 - 0.5 * 100
        ScrollController::new(&mut state, &config).scroll_position_into_view(
            DocumentPosition::new(49, 0),
            0.5,
            ScrollMargin::default(),
            false,
            &doc,
        );
        assert_eq!(state.scroll.top, 440.0);

        // row 10 sits just below a viewport at 0: 100 + 50 + 10 - 100
        state.scroll.set_top(0.0);
        ScrollController::new(&mut state, &config).scroll_position_into_view(
            DocumentPosition::new(10, 0),
            0.5,
            ScrollMargin::default(),
            false,
            &doc,
        );
        assert_eq!(state.scroll.top, 60.0);
    }

    #[test]
    fn reveal_row_zero_keeps_top_margin() {
        let config = RendererConfig::default()
            .with_scroll_margin(ScrollMargin::new(12.0, 0.0, 0.0, 0.0));
        let mut doc = GridDocument::uniform(100, 10);
        let mut state = ViewState::new(CharacterSize::new(10.0, 10.0));
        state.update_cached_size(false, Some(0.0), 400.0, 100.0, &config, &mut doc);
        state.scroll.set_top(300.0);
        ScrollController::new(&mut state, &config).scroll_position_into_view(
            DocumentPosition::new(0, 0),
            0.0,
            ScrollMargin::default(),
            false,
            &doc,
        );
        assert_eq!(state.scroll.top, -12.0);
    }

    #[test]
    fn reveal_uses_animation_target() {
        let (mut state, config, doc) = setup(100, 10);
        state.scroll.top = 0.0;
        state.scroll.session_top = 300.0;
        // row 32 is visible from the target but not from the current sample
        let changes = ScrollController::new(&mut state, &config).scroll_position_into_view(
            DocumentPosition::new(32, 0),
            0.0,
            ScrollMargin::default(),
            true,
            &doc,
        );
        assert!(changes.is_empty());
    }

    #[test]
    fn horizontal_reveal_snaps_near_padding() {
        let (mut state, config, doc) = setup(10, 500);
        state.scroll.set_left(200.0);
        // column 1: left = 4 + 10 = 14 < padding + 2 * cw
        ScrollController::new(&mut state, &config).scroll_position_into_view(
            DocumentPosition::new(0, 1),
            0.0,
            ScrollMargin::default(),
            false,
            &doc,
        );
        assert_eq!(state.scroll.left, 0.0);

        // column 100: left = 1004, past the right edge
        ScrollController::new(&mut state, &config).scroll_position_into_view(
            DocumentPosition::new(0, 100),
            0.0,
            ScrollMargin::default(),
            false,
            &doc,
        );
        assert_eq!(state.scroll.left, 1004.0 + 10.0 - 400.0);
    }

    #[test]
    fn horizontal_snap_keeps_left_margin() {
        let config = RendererConfig::default()
            .with_scroll_margin(ScrollMargin::new(0.0, 0.0, 10.0, 0.0));
        let mut doc = GridDocument::uniform(10, 500);
        let mut state = ViewState::new(CharacterSize::new(10.0, 10.0));
        state.update_cached_size(false, Some(0.0), 400.0, 100.0, &config, &mut doc);
        LayoutEngine::new(&config).compute(&mut state, &mut doc);
        state.scroll.set_left(200.0);
        ScrollController::new(&mut state, &config).scroll_position_into_view(
            DocumentPosition::new(0, 1),
            0.0,
            ScrollMargin::default(),
            false,
            &doc,
        );
        assert_eq!(state.scroll.left, -10.0);
    }

    #[test]
    fn scrollable_by_checks_bounds() {
        let (mut state, config, _) = setup(100, 10);
        {
            let scroll = ScrollController::new(&mut state, &config);
            assert!(!scroll.is_scrollable_by(0.0, -10.0));
            assert!(scroll.is_scrollable_by(0.0, 10.0));
            assert!(!scroll.is_scrollable_by(10.0, 0.0));
        }
        state.scroll.set_top(900.0);
        let scroll = ScrollController::new(&mut state, &config);
        assert!(scroll.is_scrollable_by(0.0, -10.0));
        assert!(!scroll.is_scrollable_by(0.0, 10.0));
    }

    #[test]
    fn scrollbar_drag_ignored_while_animating() {
        let config = RendererConfig::default()
            .with_scroll_margin(ScrollMargin::new(10.0, 0.0, 0.0, 0.0));
        let mut state = ViewState::new(CharacterSize::new(10.0, 10.0));
        let mut scroll = ScrollController::new(&mut state, &config);
        assert!(scroll.on_scrollbar_scroll(Axis::Vertical, 110.0, true).is_empty());
        assert_eq!(scroll.on_scrollbar_scroll(Axis::Vertical, 110.0, false), Changes::SCROLL);
        assert_eq!(state.scroll.top, 100.0);
    }

    #[test]
    fn scrollbar_sync_includes_margins() {
        let config = RendererConfig::default()
            .with_scroll_margin(ScrollMargin::new(10.0, 20.0, 3.0, 4.0));
        let mut doc = GridDocument::uniform(100, 10);
        let mut state = ViewState::new(CharacterSize::new(10.0, 10.0));
        state.update_cached_size(false, Some(0.0), 400.0, 100.0, &config, &mut doc);
        state.scroll.set_top(50.0);
        LayoutEngine::new(&config).compute(&mut state, &mut doc);

        let mut v = ScrollbarModel::new(0.0);
        assert!(sync_vertical(&state, &config, &mut v));
        assert_eq!(v.extent, 1000.0 + 30.0);
        assert_eq!(v.position, 60.0);
        assert!(v.visible);

        let mut h = ScrollbarModel::new(0.0);
        sync_horizontal(&state, &config, &mut h);
        assert_eq!(h.extent, 392.0 + 8.0 + 7.0);
        assert_eq!(h.position, 3.0);
    }

    #[test]
    fn scrollbar_sync_removes_past_end_slack() {
        let config = RendererConfig::default().with_scroll_past_end(0.5);
        let mut doc = GridDocument::uniform(20, 10);
        let mut state = ViewState::new(CharacterSize::new(10.0, 10.0));
        state.update_cached_size(false, Some(0.0), 400.0, 100.0, &config, &mut doc);
        state.scroll.set_top(145.0);
        LayoutEngine::new(&config).compute(&mut state, &mut doc);
        let mut v = ScrollbarModel::new(0.0);
        sync_vertical(&state, &config, &mut v);
        // past-end slack removed, then stretched to keep the thumb in range
        assert_eq!(v.extent, 245.0);
    }
}
