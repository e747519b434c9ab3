#![forbid(unsafe_code)]

//! Scroll animation as an explicit state machine.
//!
//! An animation is a queue of eased scroll-top samples followed by two
//! bookkeeping ticks:
//!
//! ```text
//! start ─► Sample … Sample ─► Settle ─► Finished ─► Idle
//! ```
//!
//! The first sample is consumed by [`ScrollAnimator::start`]. Each
//! [`tick`](ScrollAnimator::tick) yields one step; the host decides when to
//! tick, either directly or through an [`AnimationClock`].
//!
//! # Invariants
//!
//! 1. At most one animation is in flight. Starting another continues from the
//!    in-flight animation's next pending sample and drops its callback.
//! 2. `Settle` always carries the exact target.
//! 3. A completion callback fires at most once.

use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;

use web_time::Instant;

/// Source of "now" for animation ticking.
pub trait AnimationClock {
    fn now(&self) -> Instant;
}

/// The real clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct WallClock;

impl AnimationClock for WallClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Completion callback for an animated scroll.
pub type ScrollCallback = Box<dyn FnOnce()>;

/// `count` cubic ease-out samples from `from` towards `to`.
///
/// Sample `i` is `dx * ((i/count - 1)^3 + 1) + from`; the target itself is
/// never among them.
#[must_use]
pub fn ease_out_samples(from: f64, to: f64, count: usize) -> VecDeque<f64> {
    let dx = to - from;
    let n = count.max(1) as f64;
    (0..count.max(1))
        .map(|i| {
            let t = i as f64 / n;
            dx * ((t - 1.0).powi(3) + 1.0) + from
        })
        .collect()
}

/// One step of animation progress.
pub enum AnimationStep {
    /// Nothing is animating.
    Idle,
    /// Show `top`; the logical scroll position stays at `target`.
    Sample { top: f64, target: f64 },
    /// Show the exact target.
    Settle { target: f64 },
    /// Animation over; run the callback if any.
    Finished(Option<ScrollCallback>),
}

impl fmt::Debug for AnimationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("Idle"),
            Self::Sample { top, target } => f
                .debug_struct("Sample")
                .field("top", top)
                .field("target", target)
                .finish(),
            Self::Settle { target } => f.debug_struct("Settle").field("target", target).finish(),
            Self::Finished(callback) => f
                .debug_tuple("Finished")
                .field(&callback.is_some())
                .finish(),
        }
    }
}

/// Result of [`ScrollAnimator::start`].
pub enum StartOutcome {
    /// Animation running; show `first` now.
    Started { first: f64 },
    /// Nothing to animate. The callback comes back to the caller.
    Unchanged(Option<ScrollCallback>),
}

impl fmt::Debug for StartOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Started { first } => f.debug_struct("Started").field("first", first).finish(),
            Self::Unchanged(callback) => f
                .debug_tuple("Unchanged")
                .field(&callback.is_some())
                .finish(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Phase {
    Idle,
    Animating {
        samples: VecDeque<f64>,
        to: f64,
        settled: bool,
    },
}

/// Single-flight scroll animation driver.
pub struct ScrollAnimator {
    phase: Phase,
    callback: Option<ScrollCallback>,
    period: Duration,
    last_tick: Option<Instant>,
}

impl fmt::Debug for ScrollAnimator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollAnimator")
            .field("phase", &self.phase)
            .field("has_callback", &self.callback.is_some())
            .field("period", &self.period)
            .finish()
    }
}

impl ScrollAnimator {
    #[must_use]
    pub fn new(period: Duration) -> Self {
        Self {
            phase: Phase::Idle,
            callback: None,
            period: period.max(Duration::from_millis(1)),
            last_tick: None,
        }
    }

    pub fn set_period(&mut self, period: Duration) {
        self.period = period.max(Duration::from_millis(1));
    }

    #[inline]
    #[must_use]
    pub fn is_animating(&self) -> bool {
        matches!(self.phase, Phase::Animating { .. })
    }

    /// Target of the in-flight animation.
    #[must_use]
    pub fn target(&self) -> Option<f64> {
        match self.phase {
            Phase::Animating { to, .. } => Some(to),
            Phase::Idle => None,
        }
    }

    /// Ticks left until [`AnimationStep::Finished`], inclusive.
    #[must_use]
    pub fn remaining_ticks(&self) -> usize {
        match &self.phase {
            Phase::Idle => 0,
            Phase::Animating {
                samples, settled, ..
            } => samples.len() + usize::from(!settled) + 1,
        }
    }

    /// Begin animating from `from` to `to` with `steps` samples.
    ///
    /// While another animation is in flight, `from` is replaced by that
    /// animation's next pending sample.
    pub fn start(
        &mut self,
        from: f64,
        to: f64,
        steps: usize,
        callback: Option<ScrollCallback>,
    ) -> StartOutcome {
        let from = match &self.phase {
            Phase::Animating { samples, .. } => samples.front().copied().unwrap_or(from),
            Phase::Idle => from,
        };
        if from == to {
            return StartOutcome::Unchanged(callback);
        }

        let mut samples = ease_out_samples(from, to, steps);
        let first = samples.pop_front().unwrap_or(to);
        self.phase = Phase::Animating {
            samples,
            to,
            settled: false,
        };
        self.callback = callback;
        self.last_tick = None;
        tracing::debug!(
            target: "vrender.scroll",
            from,
            to,
            steps,
            "scroll animation started"
        );
        StartOutcome::Started { first }
    }

    /// Advance one step.
    pub fn tick(&mut self) -> AnimationStep {
        let Phase::Animating {
            samples,
            to,
            settled,
        } = &mut self.phase
        else {
            return AnimationStep::Idle;
        };
        let target = *to;
        if let Some(top) = samples.pop_front() {
            return AnimationStep::Sample { top, target };
        }
        if !*settled {
            *settled = true;
            return AnimationStep::Settle { target };
        }
        self.phase = Phase::Idle;
        self.last_tick = None;
        tracing::debug!(target: "vrender.scroll", to = target, "scroll animation finished");
        AnimationStep::Finished(self.callback.take())
    }

    /// Drop the in-flight animation and its callback.
    pub fn cancel(&mut self) {
        if self.is_animating() {
            tracing::debug!(target: "vrender.scroll", "scroll animation cancelled");
        }
        self.phase = Phase::Idle;
        self.callback = None;
        self.last_tick = None;
    }

    /// Number of ticks that have come due by `now`.
    ///
    /// The first call after [`start`](Self::start) anchors the timeline and
    /// returns 0. Never returns more than [`remaining_ticks`](Self::remaining_ticks).
    pub fn due_ticks(&mut self, now: Instant) -> usize {
        if !self.is_animating() {
            self.last_tick = None;
            return 0;
        }
        let Some(last) = self.last_tick else {
            self.last_tick = Some(now);
            return 0;
        };
        let elapsed = now.saturating_duration_since(last);
        let due = elapsed.as_nanos() / self.period.as_nanos();
        let remaining = self.remaining_ticks();
        match u32::try_from(due) {
            Ok(due) if (due as usize) < remaining => {
                self.last_tick = Some(last + self.period * due);
                due as usize
            }
            _ => {
                self.last_tick = Some(now);
                remaining
            }
        }
    }
}
