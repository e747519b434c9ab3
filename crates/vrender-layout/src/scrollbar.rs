#![forbid(unsafe_code)]

//! Scrollbar models.
//!
//! The renderer does not draw scrollbars. It keeps one [`ScrollbarModel`]
//! per axis in sync with layout so a host widget can mirror it.

use std::fmt;

/// Scroll axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Horizontal => f.write_str("horizontal"),
            Self::Vertical => f.write_str("vertical"),
        }
    }
}

/// Observable state of one scrollbar.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollbarModel {
    pub visible: bool,
    /// Width (vertical) or height (horizontal) while visible.
    pub thickness: f64,
    /// Total scrollable extent, margins included.
    pub extent: f64,
    /// Thumb position along the extent, margins included.
    pub position: f64,
}

impl ScrollbarModel {
    #[must_use]
    pub const fn new(thickness: f64) -> Self {
        Self {
            visible: false,
            thickness,
            extent: 0.0,
            position: 0.0,
        }
    }

    /// Space the bar occupies next to the content.
    #[inline]
    #[must_use]
    pub fn occupied(&self) -> f64 {
        if self.visible { self.thickness } else { 0.0 }
    }

    /// Store a new extent and position. Returns true if either moved.
    pub fn sync(&mut self, extent: f64, position: f64) -> bool {
        let changed = self.extent != extent || self.position != position;
        self.extent = extent;
        self.position = position;
        changed
    }
}
