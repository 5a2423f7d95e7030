//! Subscription types for published views.

use crate::publisher::ViewSnapshot;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Configuration for a subscription.
#[derive(Clone, Debug)]
pub struct SubscriptionConfig {
    /// Max buffered events before dropping subscriber.
    /// Default: 1000
    pub buffer_size: usize,

    /// Send the current snapshot immediately on subscribe.
    pub replay_current: bool,

    /// Which changes to receive.
    pub filter: SubscriptionFilter,
}

impl Default for SubscriptionConfig {
    fn default() -> Self {
        Self {
            buffer_size: 1000,
            replay_current: true,
            filter: SubscriptionFilter::all(),
        }
    }
}

/// Selects which kinds of change a subscriber hears about.
#[derive(Clone, Debug, Default)]
pub struct SubscriptionFilter {
    /// New collections from the record source.
    pub include_source: bool,

    /// Filter changes and resets.
    pub include_criteria: bool,

    /// Page navigation and page-size changes.
    pub include_pages: bool,
}

impl SubscriptionFilter {
    /// Only source deliveries.
    pub fn source() -> Self {
        Self {
            include_source: true,
            ..Default::default()
        }
    }

    /// Only filter changes.
    pub fn criteria() -> Self {
        Self {
            include_criteria: true,
            ..Default::default()
        }
    }

    /// Only page movement.
    pub fn pages() -> Self {
        Self {
            include_pages: true,
            ..Default::default()
        }
    }

    /// Everything.
    pub fn all() -> Self {
        Self {
            include_source: true,
            include_criteria: true,
            include_pages: true,
        }
    }

    pub fn matches(&self, cause: ChangeCause) -> bool {
        match cause {
            ChangeCause::Initial => true,
            ChangeCause::SourceDelivered => self.include_source,
            ChangeCause::FilterChanged | ChangeCause::FiltersReset => self.include_criteria,
            ChangeCause::PageChanged | ChangeCause::PageSizeChanged => self.include_pages,
        }
    }
}

/// What triggered a recomputation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeCause {
    /// Publisher construction.
    Initial,
    SourceDelivered,
    FilterChanged,
    FiltersReset,
    PageChanged,
    PageSizeChanged,
}

/// Events emitted to subscribers.
#[derive(Clone, Debug)]
pub enum ViewEvent {
    /// The snapshot current at subscribe time.
    Current { snapshot: Arc<ViewSnapshot> },

    /// A new snapshot was published.
    Updated { snapshot: Arc<ViewSnapshot> },

    /// Subscription was dropped.
    Dropped { reason: DropReason },
}

impl ViewEvent {
    /// The carried snapshot, if any.
    pub fn snapshot(&self) -> Option<&Arc<ViewSnapshot>> {
        match self {
            ViewEvent::Current { snapshot } | ViewEvent::Updated { snapshot } => Some(snapshot),
            ViewEvent::Dropped { .. } => None,
        }
    }
}

/// Why a subscription was dropped.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// Send buffer overflowed (slow consumer).
    BufferOverflow,
    /// Receiver went away.
    Disconnected,
    /// Explicitly unsubscribed.
    Unsubscribed,
}

/// Unique identifier for a subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Handle to receive published views.
pub struct SubscriptionHandle {
    pub id: SubscriptionId,
    /// Channel to receive events.
    pub receiver: crossbeam_channel::Receiver<ViewEvent>,
}

impl SubscriptionHandle {
    /// Receive the next event (blocking).
    pub fn recv(&self) -> Result<ViewEvent, crossbeam_channel::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive an event (non-blocking).
    pub fn try_recv(&self) -> Result<ViewEvent, crossbeam_channel::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Receive with timeout.
    pub fn recv_timeout(
        &self,
        timeout: std::time::Duration,
    ) -> Result<ViewEvent, crossbeam_channel::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }

    /// Drain pending events and return the newest snapshot among them.
    pub fn latest(&self) -> Option<Arc<ViewSnapshot>> {
        let mut latest = None;
        while let Ok(event) = self.receiver.try_recv() {
            if let Some(snapshot) = event.snapshot() {
                latest = Some(Arc::clone(snapshot));
            }
        }
        latest
    }
}
