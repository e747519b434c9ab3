#![forbid(unsafe_code)]

//! An in-memory document for tests and benchmarks.
//!
//! [`GridDocument`] stores only line lengths. It supports soft wrapping at a
//! fixed column limit and folds that collapse a run of rows into the run's
//! first row. Queries are linear in the line count, which is fine for tests.

use vrender_core::{DocumentPosition, ScreenPosition};

use crate::metrics::DocumentMetrics;

/// Line-length document with optional wrapping and folds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridDocument {
    lines: Vec<usize>,
    wrap: Option<usize>,
    lock_to_print_margin: bool,
    /// Inclusive `(start, end)` row ranges, sorted and disjoint.
    folds: Vec<(usize, usize)>,
}

impl GridDocument {
    /// `count` lines of `len` characters. An empty document still has one
    /// (empty) line.
    #[must_use]
    pub fn uniform(count: usize, len: usize) -> Self {
        Self::from_lengths(vec![len; count])
    }

    #[must_use]
    pub fn from_lengths(mut lines: Vec<usize>) -> Self {
        if lines.is_empty() {
            lines.push(0);
        }
        Self {
            lines,
            wrap: None,
            lock_to_print_margin: false,
            folds: Vec::new(),
        }
    }

    /// Enable soft wrapping at `limit` columns.
    #[must_use]
    pub fn with_wrap(mut self, limit: usize) -> Self {
        self.wrap = Some(limit.max(1));
        self
    }

    /// Wrap at the print margin instead of the available width.
    #[must_use]
    pub fn with_print_margin_wrap(mut self) -> Self {
        self.lock_to_print_margin = true;
        self
    }

    /// Current wrap limit, if wrapping.
    #[must_use]
    pub fn wrap_limit(&self) -> Option<usize> {
        self.wrap
    }

    /// Replace the wrap limit without going through
    /// [`DocumentMetrics::adjust_wrap_limit`].
    pub fn set_wrap_limit(&mut self, limit: usize) {
        self.wrap = Some(limit.max(1));
    }

    pub fn set_line_len(&mut self, row: usize, len: usize) {
        if let Some(line) = self.lines.get_mut(row) {
            *line = len;
        }
    }

    /// Insert `count` lines of `len` characters before `at`.
    pub fn insert_lines(&mut self, at: usize, count: usize, len: usize) {
        let at = at.min(self.lines.len());
        self.lines.splice(at..at, std::iter::repeat_n(len, count));
        for fold in &mut self.folds {
            if fold.0 >= at {
                fold.0 += count;
                fold.1 += count;
            }
        }
    }

    /// Remove up to `count` lines starting at `at`. Folds touching the removed
    /// range are dropped.
    pub fn remove_lines(&mut self, at: usize, count: usize) {
        if at >= self.lines.len() {
            return;
        }
        let end = (at + count).min(self.lines.len());
        self.lines.drain(at..end);
        if self.lines.is_empty() {
            self.lines.push(0);
        }
        let removed = end - at;
        self.folds.retain(|&(start, stop)| stop < at || start >= end);
        for fold in &mut self.folds {
            if fold.0 >= end {
                fold.0 -= removed;
                fold.1 -= removed;
            }
        }
    }

    /// Fold rows `start..=end` into `start`. Overlapping folds are replaced.
    pub fn fold(&mut self, start: usize, end: usize) {
        let last = self.lines.len() - 1;
        let end = end.min(last);
        if start >= end {
            return;
        }
        self.folds.retain(|&(s, e)| e < start || s > end);
        self.folds.push((start, end));
        self.folds.sort_unstable();
    }

    pub fn unfold_all(&mut self) {
        self.folds.clear();
    }

    fn hidden(&self, row: usize) -> bool {
        self.folds.iter().any(|&(s, e)| row > s && row <= e)
    }

    fn is_fold_start(&self, row: usize) -> bool {
        self.folds.iter().any(|&(s, _)| s == row)
    }

    /// Screen rows occupied by `row` (0 for rows hidden in a fold).
    fn rows_of(&self, row: usize) -> usize {
        if self.hidden(row) {
            return 0;
        }
        if self.is_fold_start(row) {
            return 1;
        }
        match self.wrap {
            Some(limit) => self.lines[row].div_ceil(limit).max(1),
            None => 1,
        }
    }

    fn clamp_row(&self, row: usize) -> usize {
        row.min(self.lines.len() - 1)
    }

    /// Fold-aware visible row containing `row`.
    fn visible_row(&self, row: usize) -> usize {
        self.fold_start(row).unwrap_or(row)
    }
}

impl DocumentMetrics for GridDocument {
    fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn screen_length(&self) -> usize {
        (0..self.lines.len()).map(|row| self.rows_of(row)).sum()
    }

    fn screen_width(&self) -> usize {
        (0..self.lines.len())
            .filter(|&row| !self.hidden(row))
            .map(|row| match self.wrap {
                Some(limit) => self.lines[row].min(limit),
                None => self.lines[row],
            })
            .max()
            .unwrap_or(0)
    }

    fn row_length(&self, row: usize) -> usize {
        self.rows_of(self.clamp_row(row)).max(1)
    }

    fn screen_to_document_row(&self, screen_row: usize) -> usize {
        let mut seen = 0;
        for row in 0..self.lines.len() {
            seen += self.rows_of(row);
            if screen_row < seen {
                return row;
            }
        }
        self.visible_row(self.lines.len() - 1)
    }

    fn document_to_screen_row(&self, row: usize) -> usize {
        let row = self.visible_row(self.clamp_row(row));
        (0..row).map(|r| self.rows_of(r)).sum()
    }

    fn fold_start(&self, row: usize) -> Option<usize> {
        self.folds
            .iter()
            .find(|&&(s, e)| row >= s && row <= e)
            .map(|&(s, _)| s)
    }

    fn screen_to_document_position(&self, screen: ScreenPosition) -> DocumentPosition {
        let row = self.screen_to_document_row(screen.row);
        let len = self.lines[row];
        let segment = screen.row.saturating_sub(self.document_to_screen_row(row));
        let column = match self.wrap {
            Some(limit) if !self.is_fold_start(row) => {
                let segment = segment.min(self.rows_of(row) - 1);
                segment * limit + screen.column.min(limit)
            }
            _ => screen.column,
        };
        DocumentPosition::new(row, column.min(len))
    }

    fn document_to_screen_position(&self, position: DocumentPosition) -> ScreenPosition {
        let row = self.clamp_row(position.row);
        let visible = self.visible_row(row);
        let base = self.document_to_screen_row(visible);
        if visible != row {
            return ScreenPosition::new(base, 0);
        }
        let column = position.column.min(self.lines[row]);
        match self.wrap {
            Some(limit) if !self.is_fold_start(row) => {
                let segment = (column / limit).min(self.rows_of(row) - 1);
                ScreenPosition::new(base + segment, column - segment * limit)
            }
            _ => ScreenPosition::new(base, column),
        }
    }

    fn uses_wrap_mode(&self) -> bool {
        self.wrap.is_some()
    }

    fn adjust_wrap_limit(&mut self, limit: usize, print_margin: Option<usize>) -> bool {
        let Some(current) = self.wrap else {
            return false;
        };
        let limit = if self.lock_to_print_margin {
            print_margin.unwrap_or(limit)
        } else {
            limit
        };
        if limit != current && limit > 1 {
            self.wrap = Some(limit);
            true
        } else {
            false
        }
    }
}
