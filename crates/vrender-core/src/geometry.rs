#![forbid(unsafe_code)]

//! Geometric values shared by layout, mapping, and painting.
//!
//! All pixel quantities are `f64`: scroll positions may be fractional
//! (smooth scrolling, eased animation samples) and may be negative when a
//! scroll margin allows overscroll above or left of the content.
//! Row and column indices are `usize`.

/// A point in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PixelRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PixelRect {
    #[inline]
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// A position in the underlying document (raw line index, column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct DocumentPosition {
    pub row: usize,
    pub column: usize,
}

impl DocumentPosition {
    #[inline]
    pub const fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

/// A position on screen after folds and wraps are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ScreenPosition {
    pub row: usize,
    pub column: usize,
}

impl ScreenPosition {
    #[inline]
    pub const fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

/// Which half of a character cell a pixel fell into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Left half: the caret belongs before the rounded column.
    Before,
    /// Right half: the caret belongs after the rounded column.
    After,
}

/// A raw screen hit produced from pixel coordinates.
///
/// Row and column may be negative when the pixel lies above or left of the
/// content origin; resolution against the document clamps them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenCoordinates {
    pub row: i64,
    pub column: i64,
    pub side: Side,
}

/// Measured glyph cell size supplied by the host's font metrics.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CharacterSize {
    pub width: f64,
    pub line_height: f64,
}

impl CharacterSize {
    #[inline]
    pub const fn new(width: f64, line_height: f64) -> Self {
        Self { width, line_height }
    }
}

/// Last-known viewport geometry.
///
/// `dirty` means a resize is owed before any layout computed from this
/// size can be trusted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CachedSize {
    /// Outer width, gutter included.
    pub width: f64,
    /// Outer height.
    pub height: f64,
    /// Height available to content (minus the horizontal scrollbar).
    pub scroller_height: f64,
    /// Width available to content (minus gutter and vertical scrollbar).
    pub scroller_width: f64,
    pub dirty: bool,
}

impl Default for CachedSize {
    fn default() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
            scroller_height: 0.0,
            scroller_width: 0.0,
            dirty: true,
        }
    }
}

/// Virtual overscroll slack beyond the real content bounds.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ScrollMargin {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

impl ScrollMargin {
    #[inline]
    pub const fn new(top: f64, bottom: f64, left: f64, right: f64) -> Self {
        Self {
            top,
            bottom,
            left,
            right,
        }
    }

    /// Total vertical slack (`top + bottom`).
    #[inline]
    pub fn v(&self) -> f64 {
        self.top + self.bottom
    }

    /// Total horizontal slack (`left + right`).
    #[inline]
    pub fn h(&self) -> f64 {
        self.left + self.right
    }
}

/// Snapshot of the visible window consumed by paint layers.
///
/// A `LayerConfig` is never edited in place once published: every layout
/// run builds a fresh value and swaps it in, so a reader always sees either
/// the previous snapshot or the next one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerConfig {
    /// Longest visible line in pixels (at least the content width).
    pub width: f64,
    pub padding: f64,
    /// First document row of the window (never inside a fold).
    pub first_row: usize,
    /// Last document row of the window.
    pub last_row: usize,
    /// Screen row at which `first_row` begins.
    pub first_row_screen: usize,
    pub line_height: f64,
    pub character_width: f64,
    /// Minimum content height so the area extends past `last_row`.
    pub min_height: f64,
    /// Total content height.
    pub max_height: f64,
    /// Sub-row pixel remainder: `scroll_top - first_row_screen * line_height`.
    pub offset: f64,
    /// Viewport height available to content.
    pub height: f64,
    /// Rows the gutter must draw beyond the content window.
    pub gutter_offset: usize,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            width: 1.0,
            padding: 0.0,
            first_row: 0,
            last_row: 0,
            first_row_screen: 0,
            line_height: 1.0,
            character_width: 1.0,
            min_height: 1.0,
            max_height: 1.0,
            offset: 0.0,
            height: 1.0,
            gutter_offset: 1,
        }
    }
}

impl LayerConfig {
    /// First row whose top and bottom are both on screen.
    #[inline]
    #[must_use]
    pub fn first_fully_visible_row(&self) -> usize {
        self.first_row + usize::from(self.offset != 0.0)
    }

    /// Last row whose top and bottom are both on screen.
    ///
    /// Saturates at zero for viewports shorter than one row.
    #[must_use]
    pub fn last_fully_visible_row(&self) -> usize {
        if self.line_height <= 0.0 {
            return self.first_row;
        }
        let fitting = ((self.height + self.offset) / self.line_height).floor();
        let fitting = if fitting.is_finite() && fitting > 0.0 {
            fitting as usize
        } else {
            0
        };
        (self.first_row + fitting).saturating_sub(1)
    }

    /// Whether `row` falls inside the window (inclusive on both ends).
    #[inline]
    #[must_use]
    pub fn contains_row(&self, row: usize) -> bool {
        row >= self.first_row && row <= self.last_row
    }
}
