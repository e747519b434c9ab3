#![forbid(unsafe_code)]

//! Host observers for [`RenderEvent`]s.
//!
//! Observers are called synchronously, in subscription order, while the
//! renderer is mid-operation. They receive the event by reference and cannot
//! reach back into the renderer.

use std::fmt;

use vrender_core::RenderEvent;

/// Receives renderer notifications.
pub trait RenderObserver {
    fn on_event(&mut self, event: &RenderEvent);
}

impl<F: FnMut(&RenderEvent)> RenderObserver for F {
    fn on_event(&mut self, event: &RenderEvent) {
        self(event);
    }
}

/// Handle returned by [`ObserverList::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// Ordered observer registry.
#[derive(Default)]
pub struct ObserverList {
    entries: Vec<(ObserverId, Box<dyn RenderObserver>)>,
    next_id: u64,
}

impl ObserverList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, observer: impl RenderObserver + 'static) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, Box::new(observer)));
        id
    }

    /// Remove an observer. Returns whether it was registered.
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    pub fn emit(&mut self, event: &RenderEvent) {
        tracing::trace!(target: "vrender.event", event = event.name(), "emit");
        for (_, observer) in &mut self.entries {
            observer.on_event(event);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for ObserverList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverList")
            .field("observers", &self.entries.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}
