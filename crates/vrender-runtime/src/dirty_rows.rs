#![forbid(unsafe_code)]

//! Partial visible-line updates.
//!
//! Edits report dirty document rows between frames. Reports coalesce into a
//! single range (running min of the first row, running max of the last).
//! When the pass runs, the range is clipped against the window: rows inside
//! are redrawn individually, anything ambiguous falls back to a full redraw.

use vrender_core::LayerConfig;

/// Inclusive document row range. `last == None` means "to the end".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowRange {
    pub first: usize,
    pub last: Option<usize>,
}

impl RowRange {
    #[must_use]
    pub const fn new(first: usize, last: Option<usize>) -> Self {
        Self { first, last }
    }

    /// Smallest range covering both.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self {
            first: self.first.min(other.first),
            last: match (self.last, other.last) {
                (Some(a), Some(b)) => Some(a.max(b)),
                _ => None,
            },
        }
    }

    fn ends_before(&self, row: usize) -> bool {
        self.last.is_some_and(|last| last < row)
    }
}

/// What the text layer should do with the dirty range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinesPlan {
    /// Redraw the whole text layer.
    FullText,
    /// Redraw the whole text layer and the gutter.
    FullTextAndGutter,
    /// Redraw only these window rows.
    Rows { first: usize, last: usize },
}

/// Coalesced dirty range awaiting the next pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirtyRows {
    range: Option<RowRange>,
}

impl DirtyRows {
    #[must_use]
    pub const fn new() -> Self {
        Self { range: None }
    }

    /// Merge a report. Returns whether a visible-lines pass is warranted.
    ///
    /// A range ending above the window matters only with `force` (wrapped
    /// rows above may push visible rows down); it is then stretched to the
    /// window's last row. A range starting below the window never matters.
    pub fn report(
        &mut self,
        first: usize,
        last: Option<usize>,
        window: &LayerConfig,
        force: bool,
    ) -> bool {
        let incoming = RowRange::new(first, last);
        let mut range = match self.range {
            Some(current) => current.union(incoming),
            None => incoming,
        };
        let mut admit = true;
        if range.ends_before(window.first_row) {
            if force {
                range.last = Some(window.last_row);
            } else {
                admit = false;
            }
        }
        if range.first > window.last_row {
            admit = false;
        }
        self.range = Some(range);
        admit
    }

    #[inline]
    #[must_use]
    pub fn range(&self) -> Option<RowRange> {
        self.range
    }

    #[inline]
    pub fn take(&mut self) -> Option<RowRange> {
        self.range.take()
    }

    /// Drop the range; a full text redraw covered it.
    #[inline]
    pub fn clear(&mut self) {
        self.range = None;
    }
}

/// Decide how to repaint a taken dirty range against the window.
#[must_use]
pub fn plan(range: Option<RowRange>, window: &LayerConfig) -> LinesPlan {
    let Some(range) = range else {
        return LinesPlan::FullText;
    };
    let Some(last) = range.last else {
        return LinesPlan::FullTextAndGutter;
    };
    if range.first > window.last_row || last < window.first_row || range.first > last {
        return LinesPlan::FullText;
    }
    LinesPlan::Rows {
        first: range.first.max(window.first_row),
        last: last.min(window.last_row),
    }
}
