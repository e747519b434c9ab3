#![forbid(unsafe_code)]

//! The renderer: change application and the public API.
//!
//! A [`Renderer`] owns the view state, the paint layers, the scheduler and
//! the scroll animator for one document view. Hosts report what changed
//! ([`schedule`](Renderer::schedule), [`update_lines`](Renderer::update_lines),
//! scroll requests, resizes) and drive [`tick`](Renderer::tick) once per
//! frame. Each tick runs at most the passes the pending bits require.
//!
//! # Apply pass
//!
//! ```text
//! guards ─► BeforeRender ─► layout (+ anchoring) ─► scrollbars
//!        ─► FULL │ SCROLL │ granular branches ─► AfterRender
//! ```
//!
//! - Guards: no document, zero container width, frozen, or nothing to do
//!   put the bits back into the deferred backlog. A dirty cached size defers
//!   the bits and runs a forced resize instead.
//! - Anchoring: when layout moves the first document row while the first
//!   screen row stays put (wrapped rows above the window changed height), the
//!   scroll top shifts by the row delta and layout reruns once.
//!
//! # Invariants
//!
//! 1. `BeforeRender` and `AfterRender` are emitted exactly once per pass that
//!    gets past the guards, in that order.
//! 2. Bits are never lost: anything an apply attempt cannot handle lands in
//!    the deferred backlog and is merged into the next pass.
//! 3. A forced apply also drains pending bits, so the next tick finds nothing.

use std::fmt;

use vrender_core::{
    CachedSize, CharacterSize, Changes, ConfigError, DocumentPosition, LayerConfig, PixelPoint,
    PixelRect, RenderEvent, RendererConfig, ScreenCoordinates, ScreenPosition, ScrollMargin,
};
use vrender_layout::{
    Axis, CoordinateMapper, DocumentMetrics, LayoutEngine, ScrollbarModel, ViewState,
};

use crate::animation::{AnimationClock, AnimationStep, ScrollAnimator, ScrollCallback, StartOutcome};
use crate::dirty_rows::{DirtyRows, LinesPlan, plan};
use crate::observer::{ObserverId, ObserverList, RenderObserver};
use crate::paint::{LayerKind, LayerSet, PaintLayer};
use crate::scheduler::RenderScheduler;
use crate::scroll::{ScrollController, is_scrollable_by, sync_horizontal, sync_vertical};

/// Nested forced resizes allowed before further requests are dropped.
const MAX_RESIZE_DEPTH: u8 = 2;

/// Result of one [`Renderer::apply`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// A pass ran.
    Applied,
    /// The bits were kept for a later pass.
    Deferred,
    /// Nothing to do.
    Idle,
}

/// Stand-in metrics used for resizes before a document is attached.
struct Detached;

impl DocumentMetrics for Detached {
    fn line_count(&self) -> usize {
        1
    }

    fn screen_length(&self) -> usize {
        1
    }

    fn screen_width(&self) -> usize {
        0
    }

    fn row_length(&self, _row: usize) -> usize {
        1
    }

    fn screen_to_document_row(&self, _screen_row: usize) -> usize {
        0
    }

    fn document_to_screen_row(&self, _row: usize) -> usize {
        0
    }

    fn fold_start(&self, _row: usize) -> Option<usize> {
        None
    }

    fn screen_to_document_position(&self, _screen: ScreenPosition) -> DocumentPosition {
        DocumentPosition::default()
    }

    fn document_to_screen_position(&self, _position: DocumentPosition) -> ScreenPosition {
        ScreenPosition::default()
    }
}

/// Render/layout core for one document view.
pub struct Renderer<D: DocumentMetrics> {
    config: RendererConfig,
    state: ViewState,
    document: Option<D>,
    layers: LayerSet,
    scheduler: RenderScheduler,
    dirty: DirtyRows,
    animator: ScrollAnimator,
    v_scrollbar: ScrollbarModel,
    h_scrollbar: ScrollbarModel,
    observers: ObserverList,
    cursor: DocumentPosition,
    container_width: f64,
    container_height: f64,
    origin: PixelPoint,
    resizing: u8,
    pass_count: u64,
    last_pass: Changes,
}

impl<D: DocumentMetrics> fmt::Debug for Renderer<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Renderer")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("has_document", &self.document.is_some())
            .field("scheduler", &self.scheduler)
            .field("dirty", &self.dirty)
            .field("animator", &self.animator)
            .field("observers", &self.observers)
            .field("cursor", &self.cursor)
            .field("pass_count", &self.pass_count)
            .finish_non_exhaustive()
    }
}

impl<D: DocumentMetrics> Renderer<D> {
    /// Create a headless renderer. Fails when `config` does not validate.
    pub fn new(config: RendererConfig, char_size: CharacterSize) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            state: ViewState::new(char_size),
            document: None,
            layers: LayerSet::headless(),
            scheduler: RenderScheduler::new(),
            dirty: DirtyRows::new(),
            animator: ScrollAnimator::new(config.animation_tick()),
            v_scrollbar: ScrollbarModel::new(config.v_scrollbar_width),
            h_scrollbar: ScrollbarModel::new(config.h_scrollbar_height),
            observers: ObserverList::new(),
            cursor: DocumentPosition::default(),
            container_width: 0.0,
            container_height: 0.0,
            origin: PixelPoint::default(),
            resizing: 0,
            pass_count: 0,
            last_pass: Changes::empty(),
            config,
        })
    }

    #[must_use]
    pub fn with_layers(mut self, layers: LayerSet) -> Self {
        self.layers = layers;
        self
    }

    /// Replace one paint layer, returning the previous one.
    pub fn set_layer(
        &mut self,
        kind: LayerKind,
        layer: impl PaintLayer + 'static,
    ) -> Box<dyn PaintLayer> {
        let previous = self.layers.set(kind, layer);
        self.scheduler.schedule(Changes::FULL);
        previous
    }

    // ── document ───────────────────────────────────────────────────────

    /// Attach a document, returning the previous one.
    ///
    /// Scroll resets to the top (or to `-scroll_margin.top`), any animation
    /// and dirty range are dropped, and a full redraw is scheduled.
    pub fn set_document(&mut self, document: D) -> Option<D> {
        let previous = self.document.replace(document);
        self.animator.cancel();
        self.dirty.clear();
        self.state.scroll = Default::default();
        if self.config.scroll_margin.top != 0.0 {
            self.state.scroll.set_top(-self.config.scroll_margin.top);
        }
        self.scheduler.schedule(Changes::FULL);
        previous
    }

    /// Detach the document. Passes defer until another one is attached.
    pub fn take_document(&mut self) -> Option<D> {
        self.animator.cancel();
        self.dirty.clear();
        self.document.take()
    }

    #[must_use]
    pub fn document(&self) -> Option<&D> {
        self.document.as_ref()
    }

    /// Mutable document access. Report what the mutation touched through
    /// [`update_lines`](Self::update_lines) or [`schedule`](Self::schedule).
    pub fn document_mut(&mut self) -> Option<&mut D> {
        self.document.as_mut()
    }

    pub fn set_cursor(&mut self, position: DocumentPosition) {
        self.cursor = position;
        self.scheduler.schedule(Changes::CURSOR);
    }

    #[must_use]
    pub fn cursor(&self) -> DocumentPosition {
        self.cursor
    }

    // ── observers ──────────────────────────────────────────────────────

    pub fn subscribe(&mut self, observer: impl RenderObserver + 'static) -> ObserverId {
        self.observers.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        self.observers.unsubscribe(id)
    }

    fn emit(&mut self, event: RenderEvent) {
        self.observers.emit(&event);
    }

    // ── scheduling ─────────────────────────────────────────────────────

    /// Merge bits into the pending set. No work happens until the next tick.
    pub fn schedule(&mut self, changes: Changes) {
        self.scheduler.schedule(changes);
    }

    /// Frame tick: apply pending bits, repeating while new bits appear.
    /// Returns the number of passes run.
    pub fn tick(&mut self) -> usize {
        let mut passes = 0;
        while self.scheduler.has_work() {
            let changes = self.scheduler.take_pending();
            match self.apply(changes, false) {
                ApplyOutcome::Applied => passes += 1,
                ApplyOutcome::Deferred | ApplyOutcome::Idle => break,
            }
        }
        passes
    }

    pub fn freeze(&mut self) {
        self.scheduler.freeze();
    }

    /// Resume passes. The backlog is applied by the next tick or forced call.
    pub fn unfreeze(&mut self) {
        self.scheduler.unfreeze();
    }

    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.scheduler.is_frozen()
    }

    #[must_use]
    pub fn scheduler(&self) -> &RenderScheduler {
        &self.scheduler
    }

    /// Full redraw, now when `force`, otherwise on the next tick.
    pub fn update_full(&mut self, force: bool) {
        if force {
            self.apply(Changes::FULL, true);
        } else {
            self.scheduler.schedule(Changes::FULL);
        }
    }

    pub fn update_text(&mut self) {
        self.scheduler.schedule(Changes::TEXT);
    }

    pub fn update_cursor(&mut self) {
        self.scheduler.schedule(Changes::CURSOR);
    }

    pub fn update_front_markers(&mut self) {
        self.scheduler.schedule(Changes::MARKER_FRONT);
    }

    pub fn update_back_markers(&mut self) {
        self.scheduler.schedule(Changes::MARKER_BACK);
    }

    pub fn update_gutter(&mut self) {
        self.scheduler.schedule(Changes::GUTTER);
    }

    /// Report document rows `first..=last` as changed (`None`: to the end).
    ///
    /// Rows entirely above the window only matter with `force`; rows below
    /// it never do.
    pub fn update_lines(&mut self, first: usize, last: Option<usize>, force: bool) {
        if self.dirty.report(first, last, &self.state.layer, force) {
            self.scheduler.schedule(Changes::LINES);
        }
    }

    // ── apply ──────────────────────────────────────────────────────────

    /// Run one apply pass over `changes` plus the deferred backlog.
    pub fn apply(&mut self, changes: Changes, force: bool) -> ApplyOutcome {
        let mut changes = changes | self.scheduler.take_deferred();
        if force {
            changes |= self.scheduler.take_pending();
        }

        if self.document.is_none() || self.container_width <= 0.0 || self.scheduler.is_frozen() {
            self.scheduler.defer(changes);
            return ApplyOutcome::Deferred;
        }
        if changes.is_empty() && !force {
            return ApplyOutcome::Idle;
        }
        if self.state.size.dirty {
            self.scheduler.defer(changes);
            let before = self.pass_count;
            self.on_resize(true, None, None, None);
            return if self.pass_count > before {
                ApplyOutcome::Applied
            } else {
                ApplyOutcome::Deferred
            };
        }

        let Some(mut document) = self.document.take() else {
            self.scheduler.defer(changes);
            return ApplyOutcome::Deferred;
        };
        self.render_pass(changes, force, &mut document);
        self.document = Some(document);
        ApplyOutcome::Applied
    }

    fn render_pass(&mut self, changes: Changes, force: bool, doc: &mut D) {
        let mut changes = changes;
        self.emit(RenderEvent::BeforeRender);

        if changes.needs_layout() {
            let before = self.state.layer;
            changes |= self.layout(doc);
            let after = self.state.layer;
            if before.first_row != after.first_row
                && before.first_row_screen == after.first_row_screen
            {
                let delta = before.first_row as f64 - after.first_row as f64;
                let top = self.state.scroll.top + delta * self.state.char_size.line_height;
                self.state.scroll.set_top(top);
                changes |= Changes::SCROLL;
                changes |= self.layout(doc);
                tracing::debug!(
                    target: "vrender.apply",
                    from_row = before.first_row,
                    to_row = after.first_row,
                    top,
                    "scroll anchored"
                );
            }
            sync_vertical(&self.state, &self.config, &mut self.v_scrollbar);
            if changes.contains(Changes::H_SCROLL) {
                sync_horizontal(&self.state, &self.config, &mut self.h_scrollbar);
            }
        }

        let config = self.state.layer;
        let show_gutter = self.config.show_gutter;

        if changes.contains(Changes::FULL) {
            self.layers.get_mut(LayerKind::Text).update(&config);
            self.dirty.clear();
            if show_gutter {
                self.layers.get_mut(LayerKind::Gutter).update(&config);
            }
            self.layers.get_mut(LayerKind::MarkerBack).update(&config);
            self.layers.get_mut(LayerKind::MarkerFront).update(&config);
            self.layers.get_mut(LayerKind::Cursor).update(&config);
            self.move_input_anchor(doc);
            if self.config.highlight_gutter_line {
                self.update_gutter_line_highlight(doc);
            }
            self.finish(changes, force);
            return;
        }

        if changes.contains(Changes::SCROLL) {
            if changes.intersects(Changes::TEXT | Changes::LINES) {
                self.layers.get_mut(LayerKind::Text).update(&config);
                self.dirty.clear();
            } else {
                self.layers.get_mut(LayerKind::Text).scroll_lines(&config);
            }
            if show_gutter {
                self.layers.get_mut(LayerKind::Gutter).update(&config);
            }
            self.layers.get_mut(LayerKind::MarkerBack).update(&config);
            self.layers.get_mut(LayerKind::MarkerFront).update(&config);
            self.layers.get_mut(LayerKind::Cursor).update(&config);
            if self.config.highlight_gutter_line {
                self.update_gutter_line_highlight(doc);
            }
            self.move_input_anchor(doc);
            self.finish(changes, force);
            return;
        }

        if changes.contains(Changes::TEXT) {
            self.layers.get_mut(LayerKind::Text).update(&config);
            self.dirty.clear();
            if show_gutter {
                self.layers.get_mut(LayerKind::Gutter).update(&config);
            }
        } else if changes.contains(Changes::LINES) {
            let touched = self.update_visible_lines(&config);
            if show_gutter && (touched || changes.contains(Changes::GUTTER)) {
                self.layers.get_mut(LayerKind::Gutter).update(&config);
            }
        } else if changes.contains(Changes::GUTTER) && show_gutter {
            self.layers.get_mut(LayerKind::Gutter).update(&config);
        }

        if changes.contains(Changes::CURSOR) {
            self.layers.get_mut(LayerKind::Cursor).update(&config);
            self.move_input_anchor(doc);
            if self.config.highlight_gutter_line {
                self.update_gutter_line_highlight(doc);
            }
        }
        if changes.touches_front_markers() {
            self.layers.get_mut(LayerKind::MarkerFront).update(&config);
        }
        if changes.touches_back_markers() {
            self.layers.get_mut(LayerKind::MarkerBack).update(&config);
        }
        self.finish(changes, force);
    }

    fn layout(&mut self, doc: &mut D) -> Changes {
        let outcome = LayoutEngine::new(&self.config).compute(&mut self.state, doc);
        if let Some(height) = outcome.autosized_height {
            self.container_height = height;
        }
        for event in outcome.events {
            self.emit(event);
        }
        outcome.changes
    }

    /// Repaint the dirty range. Returns whether gutter rows were touched.
    fn update_visible_lines(&mut self, config: &LayerConfig) -> bool {
        match plan(self.dirty.take(), config) {
            LinesPlan::FullText => {
                self.layers.get_mut(LayerKind::Text).update(config);
                false
            }
            LinesPlan::FullTextAndGutter => {
                if self.config.show_gutter {
                    self.layers.get_mut(LayerKind::Gutter).update(config);
                }
                self.layers.get_mut(LayerKind::Text).update(config);
                false
            }
            LinesPlan::Rows { first, last } => {
                self.layers
                    .get_mut(LayerKind::Text)
                    .update_lines(config, first, last);
                true
            }
        }
    }

    fn finish(&mut self, changes: Changes, force: bool) {
        self.emit(RenderEvent::AfterRender);
        self.pass_count += 1;
        self.last_pass = changes;
        tracing::debug!(
            target: "vrender.apply",
            changes = %changes,
            force,
            first_row = self.state.layer.first_row,
            last_row = self.state.layer.last_row,
            "apply pass"
        );
    }

    /// Place the input-capture box over the cursor when it is on screen.
    fn move_input_anchor(&mut self, doc: &D) {
        if !self.config.keep_input_at_cursor {
            return;
        }
        let layer = self.state.layer;
        let pixel = self.mapper().cursor_pixel_position(self.cursor, true, doc);
        let h = self.state.char_size.line_height;
        let w = self.state.char_size.width;
        let top = pixel.y - layer.offset;
        if top < 0.0 || top > layer.height - h {
            return;
        }
        let scroller_width = self.state.size.scroller_width;
        let mut left = (pixel.x - self.state.scroll.left).min(scroller_width - w);
        left -= self.v_scrollbar.occupied();
        let right = (scroller_width - left - w).max(0.0);
        let bottom = (self.state.size.height - top - h).max(0.0);
        let anchor = PixelRect::new(
            scroller_width - right - w,
            self.state.size.height - bottom - h,
            w,
            h,
        );
        self.emit(RenderEvent::InputAnchorMoved(anchor));
    }

    /// Cover the cursor's row in the gutter; wrapped rows cover every segment.
    fn update_gutter_line_highlight(&mut self, doc: &D) {
        let layer = self.state.layer;
        let (pixel, height) = if doc.uses_wrap_mode() {
            let start = DocumentPosition::new(self.cursor.row, 0);
            (
                self.mapper().cursor_pixel_position(start, true, doc),
                layer.line_height * doc.row_length(self.cursor.row) as f64,
            )
        } else {
            (
                self.mapper().cursor_pixel_position(self.cursor, true, doc),
                layer.line_height,
            )
        };
        let width = self.state.effective_gutter_width(&self.config);
        let highlight = PixelRect::new(0.0, pixel.y - layer.offset, width, height);
        self.emit(RenderEvent::GutterLineHighlight(highlight));
    }

    // ── geometry ───────────────────────────────────────────────────────

    /// The host container changed size. Missing or zero dimensions fall back
    /// to the last known container size.
    ///
    /// With `force`, geometry is reapplied even if unchanged and the pass
    /// runs immediately; otherwise the resulting bits are scheduled.
    pub fn on_resize(
        &mut self,
        force: bool,
        gutter_width: Option<f64>,
        width: Option<f64>,
        height: Option<f64>,
    ) {
        if self.resizing > MAX_RESIZE_DEPTH {
            tracing::warn!(
                target: "vrender.resize",
                depth = self.resizing,
                "resize request dropped"
            );
            return;
        } else if self.resizing > 0 {
            self.resizing += 1;
        } else {
            self.resizing = u8::from(force);
        }

        if let Some(width) = width.filter(|w| *w > 0.0) {
            self.container_width = width;
        }
        if let Some(height) = height.filter(|h| *h > 0.0) {
            self.container_height = height;
        }
        let (width, height) = (self.container_width, self.container_height);

        let changes = self.update_cached_size(force, gutter_width, width, height);
        if self.state.size.scroller_height == 0.0 || (width <= 0.0 && height <= 0.0) {
            self.resizing = 0;
            return;
        }

        let changes = changes | self.scheduler.take_deferred();
        if force {
            self.apply(changes, true);
        } else {
            self.scheduler.schedule(changes);
        }
        self.resizing = 0;
    }

    fn update_cached_size(
        &mut self,
        force: bool,
        gutter_width: Option<f64>,
        width: f64,
        height: f64,
    ) -> Changes {
        let update = match self.document.as_mut() {
            Some(doc) => {
                self.state
                    .update_cached_size(force, gutter_width, width, height, &self.config, doc)
            }
            None => self.state.update_cached_size(
                force,
                gutter_width,
                width,
                height,
                &self.config,
                &mut Detached,
            ),
        };
        if let Some(old) = update.old {
            self.emit(RenderEvent::Resize { old });
        }
        update.changes
    }

    /// The gutter measured a new width.
    pub fn on_gutter_resize(&mut self, gutter_width: f64) {
        if gutter_width != self.state.gutter_width {
            // stored here too: the cached-size update skips it while unsized
            self.state.gutter_width = gutter_width;
            let width = self.state.size.width;
            let height = self.state.size.height + self.config.extra_height;
            let changes = self.update_cached_size(true, Some(gutter_width), width, height);
            self.scheduler.defer(changes);
        }

        let Some(mut doc) = self.document.take() else {
            return;
        };
        let rewrapped = doc.uses_wrap_mode() && self.state.adjust_wrap_limit(&self.config, &mut doc);
        if rewrapped || self.state.size.dirty {
            self.scheduler.schedule(Changes::FULL);
        } else {
            let changes = self.layout(&mut doc);
            self.scheduler.schedule(changes | Changes::MARKER);
        }
        self.document = Some(doc);
    }

    /// The host measured a new glyph cell size.
    pub fn update_character_size(&mut self, size: CharacterSize) {
        if size == self.state.char_size {
            return;
        }
        self.state.char_size = size;
        self.emit(RenderEvent::CharacterSizeChanged(size));
        self.on_resize(true, None, None, None);
    }

    /// Page position of the content area's top-left corner.
    pub fn set_origin(&mut self, origin: PixelPoint) {
        self.origin = origin;
    }

    // ── options ────────────────────────────────────────────────────────

    #[must_use]
    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Fails for non-finite padding; the current padding is kept.
    pub fn set_padding(&mut self, padding: f64) -> Result<(), ConfigError> {
        vrender_core::config::validate_padding(padding)?;
        self.config.padding = padding;
        self.scheduler.schedule(Changes::FULL);
        Ok(())
    }

    pub fn set_scroll_margin(&mut self, margin: ScrollMargin) {
        self.config.scroll_margin = margin;
        if margin.top != 0.0 && self.state.scroll.top <= 0.0 && self.document.is_some() {
            self.state.scroll.set_top(-margin.top);
        }
        self.update_full(false);
    }

    pub fn set_animated_scroll(&mut self, animated: bool) {
        self.config.animated_scroll = animated;
    }

    pub fn set_show_gutter(&mut self, show: bool) {
        if self.config.show_gutter == show {
            return;
        }
        self.config.show_gutter = show;
        let width = self.state.size.width;
        let height = self.state.size.height + self.config.extra_height;
        let changes = self.update_cached_size(true, None, width, height);
        self.scheduler.defer(changes);
        self.scheduler.schedule(Changes::FULL);
    }

    pub fn set_highlight_gutter_line(&mut self, highlight: bool) {
        self.config.highlight_gutter_line = highlight;
        self.scheduler.schedule(Changes::CURSOR);
    }

    pub fn set_h_scrollbar_always_visible(&mut self, always: bool) {
        if self.config.h_scrollbar_always_visible != always {
            self.config.h_scrollbar_always_visible = always;
            self.scheduler.schedule(Changes::SCROLL);
        }
    }

    pub fn set_v_scrollbar_always_visible(&mut self, always: bool) {
        if self.config.v_scrollbar_always_visible != always {
            self.config.v_scrollbar_always_visible = always;
            self.scheduler.schedule(Changes::SCROLL);
        }
    }

    pub fn set_scroll_past_end(&mut self, fraction: f64) {
        let fraction = vrender_core::config::sanitize_fraction(fraction);
        if self.config.scroll_past_end != fraction {
            self.config.scroll_past_end = fraction;
            self.scheduler.schedule(Changes::SCROLL);
        }
    }

    pub fn set_max_lines(&mut self, max_lines: Option<usize>) {
        self.config.max_lines = max_lines;
        self.update_full(false);
    }

    pub fn set_min_lines(&mut self, min_lines: usize) {
        self.config.min_lines = min_lines;
        self.update_full(false);
    }

    pub fn set_show_invisibles(&mut self, show: bool) {
        if self.config.show_invisibles != show {
            self.config.show_invisibles = show;
            self.scheduler.schedule(Changes::TEXT);
        }
    }

    pub fn set_keep_input_at_cursor(&mut self, keep: bool) {
        self.config.keep_input_at_cursor = keep;
    }

    pub fn set_print_margin_column(&mut self, column: Option<usize>) {
        self.config.print_margin_column = column;
        let Some(doc) = self.document.as_mut() else {
            return;
        };
        if doc.uses_wrap_mode() && self.state.adjust_wrap_limit(&self.config, doc) {
            self.scheduler.schedule(Changes::FULL);
        }
    }

    pub fn set_scrollbar_thickness(&mut self, v_width: f64, h_height: f64) {
        self.config.v_scrollbar_width = v_width.max(0.0);
        self.config.h_scrollbar_height = h_height.max(0.0);
        self.v_scrollbar.thickness = self.config.v_scrollbar_width;
        self.h_scrollbar.thickness = self.config.h_scrollbar_height;
        self.on_resize(true, None, None, None);
    }

    /// Pixels reserved below the content; resizes immediately.
    pub fn set_extra_height(&mut self, extra: f64) {
        self.config.extra_height = if extra.is_finite() { extra } else { 0.0 };
        self.on_resize(true, None, None, None);
    }

    pub fn set_animation_steps(&mut self, steps: usize) {
        self.config.animation_steps = steps.max(1);
    }

    pub fn set_animation_tick_ms(&mut self, millis: u64) {
        self.config.animation_tick_ms = millis;
        self.animator.set_period(self.config.animation_tick());
    }

    // ── scrolling ──────────────────────────────────────────────────────

    fn controller(&mut self) -> ScrollController<'_> {
        ScrollController::new(&mut self.state, &self.config)
    }

    /// An explicit scroll replaces any in-flight animation.
    fn scroll_override(&mut self, changes: Changes) {
        if !changes.is_empty() {
            self.animator.cancel();
            self.scheduler.schedule(changes);
        }
    }

    pub fn scroll_to_y(&mut self, top: f64) {
        let changes = self.controller().scroll_to_y(top);
        self.scroll_override(changes);
    }

    pub fn scroll_to_x(&mut self, left: f64) {
        let changes = self.controller().scroll_to_x(left);
        self.scroll_override(changes);
    }

    pub fn scroll_to(&mut self, x: f64, y: f64) {
        let changes = self.controller().scroll_to(x, y);
        self.scroll_override(changes);
    }

    pub fn scroll_by(&mut self, dx: f64, dy: f64) {
        let changes = self.controller().scroll_by(dx, dy);
        self.scroll_override(changes);
    }

    pub fn scroll_to_row(&mut self, row: usize) {
        let changes = self.controller().scroll_to_row(row);
        self.scroll_override(changes);
    }

    /// Scroll document line `line` to the top (or center), animating when
    /// `animate` and animation is enabled. `callback` runs once the scroll
    /// has completed; immediately when nothing animates.
    pub fn scroll_to_line(
        &mut self,
        line: usize,
        center: bool,
        animate: bool,
        callback: Option<ScrollCallback>,
    ) {
        let initial = self.state.scroll.top;
        let Some(doc) = self.document.as_ref() else {
            run(callback);
            return;
        };
        let changes =
            ScrollController::new(&mut self.state, &self.config).scroll_to_line(line, center, doc);
        if animate {
            self.scheduler.schedule(changes);
            self.animate_scroll(initial, callback);
        } else {
            self.scroll_override(changes);
            run(callback);
        }
    }

    /// Animate the rendered scroll top from `from` to the current logical
    /// top. Without animation, or when already there, `callback` runs now,
    /// so callers can always rely on it firing exactly once.
    pub fn animate_scroll(&mut self, from: f64, callback: Option<ScrollCallback>) {
        if !self.config.animated_scroll {
            run(callback);
            return;
        }
        let to = self.state.scroll.session_top;
        match self
            .animator
            .start(from, to, self.config.animation_steps, callback)
        {
            StartOutcome::Started { first } => {
                self.state.scroll.top = first;
                self.state.scroll.session_top = to;
                self.scheduler.schedule(Changes::SCROLL);
            }
            StartOutcome::Unchanged(callback) => run(callback),
        }
    }

    /// Advance the scroll animation by one tick. Returns false when idle.
    pub fn tick_animation(&mut self) -> bool {
        match self.animator.tick() {
            AnimationStep::Idle => false,
            AnimationStep::Sample { top, target } => {
                self.state.scroll.top = top;
                self.state.scroll.session_top = target;
                self.scheduler.schedule(Changes::SCROLL);
                true
            }
            AnimationStep::Settle { target } => {
                self.state.scroll.set_top(target);
                self.scheduler.schedule(Changes::SCROLL);
                true
            }
            AnimationStep::Finished(callback) => {
                run(callback);
                true
            }
        }
    }

    /// Run every animation tick that has come due on `clock`.
    pub fn advance_animation(&mut self, clock: &impl AnimationClock) -> usize {
        let due = self.animator.due_ticks(clock.now());
        for _ in 0..due {
            self.tick_animation();
        }
        due
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.animator.is_animating()
    }

    /// Reveal `position`, keeping `view_margin` clear.
    pub fn scroll_position_into_view(
        &mut self,
        position: DocumentPosition,
        overshoot: f64,
        view_margin: ScrollMargin,
    ) {
        let animating = self.animator.is_animating();
        let Some(doc) = self.document.as_ref() else {
            return;
        };
        let changes = ScrollController::new(&mut self.state, &self.config)
            .scroll_position_into_view(position, overshoot, view_margin, animating, doc);
        self.scroll_override(changes);
    }

    pub fn scroll_cursor_into_view(&mut self, overshoot: f64) {
        self.scroll_position_into_view(self.cursor, overshoot, ScrollMargin::default());
    }

    pub fn scroll_selection_into_view(
        &mut self,
        anchor: DocumentPosition,
        lead: DocumentPosition,
        overshoot: f64,
    ) {
        let animating = self.animator.is_animating();
        let Some(doc) = self.document.as_ref() else {
            return;
        };
        let changes = ScrollController::new(&mut self.state, &self.config)
            .scroll_selection_into_view(anchor, lead, overshoot, animating, doc);
        self.scroll_override(changes);
    }

    /// Scroll so `position` sits `fraction` of the way down the viewport.
    /// Returns the requested scroll top.
    pub fn align_cursor(&mut self, position: DocumentPosition, fraction: f64) -> f64 {
        let Some(doc) = self.document.as_ref() else {
            return self.state.scroll.top;
        };
        let (top, changes) =
            ScrollController::new(&mut self.state, &self.config).align_cursor(position, fraction, doc);
        self.scroll_override(changes);
        top
    }

    /// A scrollbar widget reports a drag to `value` (margins included).
    pub fn on_scrollbar_scroll(&mut self, axis: Axis, value: f64) {
        let animating = self.animator.is_animating();
        let changes = self.controller().on_scrollbar_scroll(axis, value, animating);
        self.scheduler.schedule(changes);
    }

    #[must_use]
    pub fn is_scrollable_by(&self, dx: f64, dy: f64) -> bool {
        is_scrollable_by(&self.state, &self.config, dx, dy)
    }

    #[must_use]
    pub fn scroll_top(&self) -> f64 {
        self.state.scroll.top
    }

    #[must_use]
    pub fn scroll_left(&self) -> f64 {
        self.state.scroll.left
    }

    // ── coordinates ────────────────────────────────────────────────────

    fn mapper(&self) -> CoordinateMapper<'_> {
        CoordinateMapper::new(&self.state, self.config.padding, self.origin)
    }

    #[must_use]
    pub fn pixel_to_screen_coordinates(&self, x: f64, y: f64) -> ScreenCoordinates {
        self.mapper().pixel_to_screen_coordinates(x, y)
    }

    #[must_use]
    pub fn screen_to_document_position(&self, x: f64, y: f64) -> Option<DocumentPosition> {
        let doc = self.document.as_ref()?;
        Some(self.mapper().screen_to_document_position(x, y, doc))
    }

    #[must_use]
    pub fn document_to_screen_pixel(&self, position: DocumentPosition) -> Option<PixelPoint> {
        let doc = self.document.as_ref()?;
        Some(self.mapper().document_to_screen_pixel(position, doc))
    }

    #[must_use]
    pub fn first_visible_row(&self) -> usize {
        self.mapper().first_visible_row()
    }

    #[must_use]
    pub fn last_visible_row(&self) -> usize {
        self.mapper().last_visible_row()
    }

    #[must_use]
    pub fn first_fully_visible_row(&self) -> usize {
        self.mapper().first_fully_visible_row()
    }

    #[must_use]
    pub fn last_fully_visible_row(&self) -> usize {
        self.mapper().last_fully_visible_row()
    }

    #[must_use]
    pub fn scroll_top_row(&self) -> f64 {
        self.mapper().scroll_top_row()
    }

    #[must_use]
    pub fn scroll_bottom_row(&self) -> usize {
        self.mapper().scroll_bottom_row()
    }

    // ── introspection ──────────────────────────────────────────────────

    #[must_use]
    pub fn layer_config(&self) -> &LayerConfig {
        &self.state.layer
    }

    #[must_use]
    pub fn cached_size(&self) -> CachedSize {
        self.state.size
    }

    #[must_use]
    pub fn character_size(&self) -> CharacterSize {
        self.state.char_size
    }

    #[must_use]
    pub fn view_state(&self) -> &ViewState {
        &self.state
    }

    #[must_use]
    pub fn v_scrollbar(&self) -> &ScrollbarModel {
        &self.v_scrollbar
    }

    #[must_use]
    pub fn h_scrollbar(&self) -> &ScrollbarModel {
        &self.h_scrollbar
    }

    /// Apply passes run since creation.
    #[must_use]
    pub fn pass_count(&self) -> u64 {
        self.pass_count
    }

    /// Bits handled by the most recent pass, layout additions included.
    #[must_use]
    pub fn last_pass(&self) -> Changes {
        self.last_pass
    }
}

fn run(callback: Option<ScrollCallback>) {
    if let Some(callback) = callback {
        callback();
    }
}
