#![forbid(unsafe_code)]

//! Notifications emitted by the renderer to host observers.

use crate::geometry::{CachedSize, CharacterSize, PixelRect};

/// A notification about rendering progress or geometry changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RenderEvent {
    /// An apply pass is about to touch layers.
    BeforeRender,
    /// An apply pass finished dispatching layer updates.
    AfterRender,
    /// The cached viewport geometry changed; carries the previous value.
    Resize { old: CachedSize },
    /// Scrollbar visibility flipped during layout.
    ScrollbarVisibilityChanged { horizontal: bool, vertical: bool },
    /// Measured glyph cell size changed.
    CharacterSizeChanged(CharacterSize),
    /// The input-capture element should be placed over this box
    /// (viewport-relative, right/bottom anchored sizes already clamped).
    InputAnchorMoved(PixelRect),
    /// The active-line highlight in the gutter should cover this box.
    GutterLineHighlight(PixelRect),
}

impl RenderEvent {
    /// Short stable name, used as a tracing field.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::BeforeRender => "before_render",
            Self::AfterRender => "after_render",
            Self::Resize { .. } => "resize",
            Self::ScrollbarVisibilityChanged { .. } => "scrollbar_visibility_changed",
            Self::CharacterSizeChanged(_) => "character_size_changed",
            Self::InputAnchorMoved(_) => "input_anchor_moved",
            Self::GutterLineHighlight(_) => "gutter_line_highlight",
        }
    }
}
