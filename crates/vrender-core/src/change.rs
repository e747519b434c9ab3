#![forbid(unsafe_code)]

//! Dirty flags describing what changed since the last paint.
//!
//! Every mutation source (edits, resizes, scrolling, option changes) reports
//! what it touched as a [`Changes`] set. Sets merge with bitwise OR, which is
//! commutative and idempotent, so any number of reports between two frames
//! collapse into one set that the apply pass consumes exactly once.
//!
//! # Invariants
//!
//! 1. `a | b == b | a` and `a | a == a`.
//! 2. [`Changes::needs_layout`] is true iff at least one flag that can move
//!    the visible window is present.

use std::fmt;

bitflags::bitflags! {
    /// Named dirty flags consumed by the apply pass.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Changes: u16 {
        /// The cursor moved or blinked state changed.
        const CURSOR       = 1;
        /// Both marker layers need repainting.
        const MARKER       = 1 << 1;
        /// Gutter decorations (annotations, breakpoints, numbers) changed.
        const GUTTER       = 1 << 2;
        /// Vertical scroll position changed.
        const SCROLL       = 1 << 3;
        /// A range of visible lines changed (see partial line updates).
        const LINES        = 1 << 4;
        /// Text content changed in a way that needs a full text repaint.
        const TEXT         = 1 << 5;
        /// The viewport was resized.
        const SIZE         = 1 << 6;
        /// Only the back marker layer needs repainting.
        const MARKER_BACK  = 1 << 7;
        /// Only the front marker layer needs repainting.
        const MARKER_FRONT = 1 << 8;
        /// Everything must be repainted.
        const FULL         = 1 << 9;
        /// Horizontal scroll position or content width changed.
        const H_SCROLL     = 1 << 10;
    }
}

impl Changes {
    /// Flags that can change the visible window and therefore force a
    /// layout recomputation.
    pub const LAYOUT: Self = Self::FULL
        .union(Self::SIZE)
        .union(Self::TEXT)
        .union(Self::LINES)
        .union(Self::SCROLL)
        .union(Self::H_SCROLL);

    /// Whether the visible window must be recomputed before painting.
    #[inline]
    #[must_use]
    pub const fn needs_layout(self) -> bool {
        self.intersects(Self::LAYOUT)
    }

    /// Whether the front marker layer is affected.
    #[inline]
    #[must_use]
    pub const fn touches_front_markers(self) -> bool {
        self.intersects(Self::MARKER.union(Self::MARKER_FRONT))
    }

    /// Whether the back marker layer is affected.
    #[inline]
    #[must_use]
    pub const fn touches_back_markers(self) -> bool {
        self.intersects(Self::MARKER.union(Self::MARKER_BACK))
    }
}

impl fmt::Display for Changes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("(none)");
        }
        bitflags::parser::to_writer(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_is_commutative_and_idempotent() {
        let a = Changes::CURSOR | Changes::TEXT;
        let b = Changes::SCROLL;
        assert_eq!(a | b, b | a);
        assert_eq!(a | a, a);
    }

    #[test]
    fn layout_flags() {
        assert!(Changes::SCROLL.needs_layout());
        assert!(Changes::H_SCROLL.needs_layout());
        assert!(Changes::FULL.needs_layout());
        assert!(!Changes::CURSOR.needs_layout());
        assert!(!(Changes::MARKER | Changes::GUTTER).needs_layout());
    }

    #[test]
    fn marker_routing() {
        assert!(Changes::MARKER.touches_front_markers());
        assert!(Changes::MARKER.touches_back_markers());
        assert!(Changes::MARKER_FRONT.touches_front_markers());
        assert!(!Changes::MARKER_FRONT.touches_back_markers());
        assert!(!Changes::MARKER_BACK.touches_front_markers());
    }

    #[test]
    fn display_names_flags() {
        assert_eq!(Changes::empty().to_string(), "(none)");
        assert_eq!((Changes::CURSOR | Changes::SCROLL).to_string(), "CURSOR | SCROLL");
    }
}
