#![forbid(unsafe_code)]

//! Change coalescing between frames.
//!
//! [`RenderScheduler`] holds two accumulators:
//!
//! - `pending`: bits scheduled since the last frame tick. The host's tick
//!   drains them into one apply pass.
//! - `deferred`: bits an apply pass could not handle (frozen, no document,
//!   zero-width viewport, dirty size). The next pass that runs picks them up.
//!
//! Scheduling never does work synchronously. Merging is a bitwise OR, so the
//! order and multiplicity of `schedule` calls between ticks is irrelevant.

use vrender_core::Changes;

/// Pending and deferred change bits plus the freeze flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderScheduler {
    pending: Changes,
    deferred: Changes,
    frozen: bool,
}

impl RenderScheduler {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pending: Changes::empty(),
            deferred: Changes::empty(),
            frozen: false,
        }
    }

    /// Merge bits into the pending set.
    #[inline]
    pub fn schedule(&mut self, changes: Changes) {
        self.pending |= changes;
    }

    /// Merge bits into the deferred backlog.
    #[inline]
    pub fn defer(&mut self, changes: Changes) {
        self.deferred |= changes;
    }

    /// Drain the pending set.
    #[inline]
    pub fn take_pending(&mut self) -> Changes {
        std::mem::take(&mut self.pending)
    }

    /// Drain the deferred backlog.
    #[inline]
    pub fn take_deferred(&mut self) -> Changes {
        std::mem::take(&mut self.deferred)
    }

    #[inline]
    #[must_use]
    pub fn pending(&self) -> Changes {
        self.pending
    }

    #[inline]
    #[must_use]
    pub fn deferred(&self) -> Changes {
        self.deferred
    }

    /// Whether a tick has anything to offer an apply pass.
    #[inline]
    #[must_use]
    pub fn has_work(&self) -> bool {
        !self.pending.is_empty() || !self.deferred.is_empty()
    }

    /// Suspend apply passes. Bits keep accumulating.
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    /// Resume apply passes. Does not itself trigger one.
    pub fn unfreeze(&mut self) {
        self.frozen = false;
    }

    #[inline]
    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }
}
