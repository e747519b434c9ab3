#![forbid(unsafe_code)]

//! Row-metric queries against the document collaborator.
//!
//! The renderer never stores text. It asks the document how many screen
//! rows exist, how screen rows map to document rows, and where folds start.
//! Wrapping and folding decisions stay with the document; the layout engine
//! only consumes their results.

use vrender_core::{DocumentPosition, ScreenPosition};

/// Queries the layout engine and coordinate mapper issue against the
/// document/session model.
///
/// All row arguments are clamped by implementations: out-of-range rows map
/// to the nearest valid row rather than panicking.
pub trait DocumentMetrics {
    /// Number of document rows (raw lines).
    fn line_count(&self) -> usize;

    /// Number of screen rows after folds and wraps.
    fn screen_length(&self) -> usize;

    /// Width of the widest screen row, in character columns.
    fn screen_width(&self) -> usize;

    /// Number of screen rows the document row occupies (1 unless wrapped).
    fn row_length(&self, row: usize) -> usize;

    /// Document row displayed at the start of `screen_row`.
    fn screen_to_document_row(&self, screen_row: usize) -> usize;

    /// Screen row at which `row` begins.
    fn document_to_screen_row(&self, row: usize) -> usize;

    /// First row of the folded run containing `row`, if `row` is folded.
    fn fold_start(&self, row: usize) -> Option<usize>;

    /// Resolve a raw screen position to a document position.
    fn screen_to_document_position(&self, screen: ScreenPosition) -> DocumentPosition;

    /// Inverse of [`screen_to_document_position`](Self::screen_to_document_position).
    fn document_to_screen_position(&self, position: DocumentPosition) -> ScreenPosition;

    /// Whether soft wrapping is enabled.
    fn uses_wrap_mode(&self) -> bool {
        false
    }

    /// Offer a new wrap limit (in columns). Returns true when the document
    /// rewrapped and the whole view needs repainting.
    fn adjust_wrap_limit(&mut self, _limit: usize, _print_margin: Option<usize>) -> bool {
        false
    }
}

impl<D: DocumentMetrics + ?Sized> DocumentMetrics for Box<D> {
    fn line_count(&self) -> usize {
        (**self).line_count()
    }

    fn screen_length(&self) -> usize {
        (**self).screen_length()
    }

    fn screen_width(&self) -> usize {
        (**self).screen_width()
    }

    fn row_length(&self, row: usize) -> usize {
        (**self).row_length(row)
    }

    fn screen_to_document_row(&self, screen_row: usize) -> usize {
        (**self).screen_to_document_row(screen_row)
    }

    fn document_to_screen_row(&self, row: usize) -> usize {
        (**self).document_to_screen_row(row)
    }

    fn fold_start(&self, row: usize) -> Option<usize> {
        (**self).fold_start(row)
    }

    fn screen_to_document_position(&self, screen: ScreenPosition) -> DocumentPosition {
        (**self).screen_to_document_position(screen)
    }

    fn document_to_screen_position(&self, position: DocumentPosition) -> ScreenPosition {
        (**self).document_to_screen_position(position)
    }

    fn uses_wrap_mode(&self) -> bool {
        (**self).uses_wrap_mode()
    }

    fn adjust_wrap_limit(&mut self, limit: usize, print_margin: Option<usize>) -> bool {
        (**self).adjust_wrap_limit(limit, print_margin)
    }
}
