#![forbid(unsafe_code)]

//! Pixel ↔ document coordinate mapping.
//!
//! A [`CoordinateMapper`] is a read-only view over a [`ViewState`]: it never
//! mutates scroll or layout, so it can be built on demand for every query.
//! `origin` is the page position of the content area's top-left corner.

use vrender_core::{
    DocumentPosition, LayerConfig, PixelPoint, ScreenCoordinates, ScreenPosition, Side,
};

use crate::metrics::DocumentMetrics;
use crate::state::ViewState;

/// Coordinate conversions against one view state.
#[derive(Debug, Clone, Copy)]
pub struct CoordinateMapper<'a> {
    state: &'a ViewState,
    padding: f64,
    origin: PixelPoint,
}

impl<'a> CoordinateMapper<'a> {
    #[must_use]
    pub const fn new(state: &'a ViewState, padding: f64, origin: PixelPoint) -> Self {
        Self {
            state,
            padding,
            origin,
        }
    }

    #[inline]
    fn layer(&self) -> &LayerConfig {
        &self.state.layer
    }

    /// Raw screen cell under a page pixel, before fold/wrap resolution.
    #[must_use]
    pub fn pixel_to_screen_coordinates(&self, x: f64, y: f64) -> ScreenCoordinates {
        let scroll = self.state.scroll;
        let cell = self.state.char_size;
        let offset = (x + scroll.left - self.origin.x - self.padding) / cell.width;
        let row = ((y + scroll.top - self.origin.y) / cell.line_height).floor();
        let column = offset.round();
        ScreenCoordinates {
            row: to_i64(row),
            column: to_i64(column),
            side: if offset > column {
                Side::After
            } else {
                Side::Before
            },
        }
    }

    /// Document position under a page pixel. Negative rows and columns clamp
    /// to zero; the document clamps the rest.
    #[must_use]
    pub fn screen_to_document_position<D: DocumentMetrics + ?Sized>(
        &self,
        x: f64,
        y: f64,
        doc: &D,
    ) -> DocumentPosition {
        let hit = self.pixel_to_screen_coordinates(x, y);
        let screen = ScreenPosition::new(clamp_index(hit.row), clamp_index(hit.column));
        doc.screen_to_document_position(screen)
    }

    /// Page pixel of the top-left corner of a document position.
    #[must_use]
    pub fn document_to_screen_pixel<D: DocumentMetrics + ?Sized>(
        &self,
        position: DocumentPosition,
        doc: &D,
    ) -> PixelPoint {
        let screen = doc.document_to_screen_position(position);
        let scroll = self.state.scroll;
        let cell = self.state.char_size;
        let x = self.padding + (screen.column as f64 * cell.width).round();
        let y = screen.row as f64 * cell.line_height;
        PixelPoint::new(
            self.origin.x + x - scroll.left,
            self.origin.y + y - scroll.top,
        )
    }

    /// Cursor box origin relative to the layer. With `on_screen`, rows are
    /// measured from the first rendered screen row instead of the document top.
    #[must_use]
    pub fn cursor_pixel_position<D: DocumentMetrics + ?Sized>(
        &self,
        position: DocumentPosition,
        on_screen: bool,
        doc: &D,
    ) -> PixelPoint {
        let screen = doc.document_to_screen_position(position);
        let cell = self.state.char_size;
        let left = self.padding + (screen.column as f64 * cell.width).round();
        let base = if on_screen {
            self.layer().first_row_screen
        } else {
            0
        };
        let top = (screen.row as f64 - base as f64) * cell.line_height;
        PixelPoint::new(left, top)
    }

    #[inline]
    #[must_use]
    pub fn first_visible_row(&self) -> usize {
        self.layer().first_row
    }

    #[inline]
    #[must_use]
    pub fn last_visible_row(&self) -> usize {
        self.layer().last_row
    }

    #[inline]
    #[must_use]
    pub fn first_fully_visible_row(&self) -> usize {
        self.layer().first_fully_visible_row()
    }

    #[inline]
    #[must_use]
    pub fn last_fully_visible_row(&self) -> usize {
        self.layer().last_fully_visible_row()
    }

    /// Fractional screen row at the top edge.
    #[must_use]
    pub fn scroll_top_row(&self) -> f64 {
        self.state.scroll.top / self.state.char_size.line_height
    }

    /// Last screen row touching the bottom edge.
    #[must_use]
    pub fn scroll_bottom_row(&self) -> usize {
        let bottom = self.state.scroll.top + self.state.size.scroller_height;
        clamp_index(to_i64((bottom / self.state.char_size.line_height).floor()) - 1)
    }
}

#[inline]
fn to_i64(value: f64) -> i64 {
    if value.is_finite() { value as i64 } else { 0 }
}

#[inline]
fn clamp_index(value: i64) -> usize {
    usize::try_from(value).unwrap_or(0)
}
