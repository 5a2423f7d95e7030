//! Subscription manager for broadcasting published views.

use crate::error::{Result, ViewError};
use crate::publisher::ViewSnapshot;
use crossbeam_channel::{bounded, Sender, TrySendError};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

use super::types::{
    DropReason, SubscriptionConfig, SubscriptionHandle, SubscriptionId, ViewEvent,
};

/// Internal subscription state.
struct Subscription {
    config: SubscriptionConfig,
    sender: Sender<ViewEvent>,
}

impl Subscription {
    /// Try to send an event. `Err` carries why the subscriber must go.
    fn try_send(&self, event: ViewEvent) -> std::result::Result<(), DropReason> {
        match self.sender.try_send(event) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Err(DropReason::BufferOverflow),
            Err(TrySendError::Disconnected(_)) => Err(DropReason::Disconnected),
        }
    }
}

/// Manages subscriptions and broadcasts snapshots.
pub struct SubscriptionManager {
    /// Active subscriptions by ID.
    subscriptions: RwLock<HashMap<SubscriptionId, Subscription>>,
    /// Counter for generating subscription IDs.
    next_id: AtomicU64,
}

impl SubscriptionManager {
    /// Create a new subscription manager.
    pub fn new() -> Self {
        Self {
            subscriptions: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Create a new subscription.
    ///
    /// Nothing is sent yet; use `replay` to hand over the current snapshot.
    pub fn subscribe(&self, config: SubscriptionConfig) -> SubscriptionHandle {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::SeqCst));
        // A zero-capacity channel would reject every try_send.
        let (sender, receiver) = bounded(config.buffer_size.max(1));

        self.subscriptions
            .write()
            .insert(id, Subscription { config, sender });

        SubscriptionHandle { id, receiver }
    }

    /// Unsubscribe and clean up.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        let mut subs = self.subscriptions.write();
        if let Some(sub) = subs.remove(&id) {
            // Send dropped event (best effort)
            let _ = sub.sender.try_send(ViewEvent::Dropped {
                reason: DropReason::Unsubscribed,
            });
        }
    }

    /// Send the current snapshot to one subscriber.
    pub fn replay(&self, id: SubscriptionId, snapshot: Arc<ViewSnapshot>) -> Result<()> {
        let mut subs = self.subscriptions.write();
        let sent = match subs.get(&id) {
            Some(sub) => sub.try_send(ViewEvent::Current { snapshot }).is_ok(),
            None => false,
        };
        if !sent {
            subs.remove(&id);
            return Err(ViewError::SubscriptionDropped);
        }
        Ok(())
    }

    /// Whether a subscriber asked for replay on subscribe.
    pub fn wants_replay(&self, id: SubscriptionId) -> bool {
        self.subscriptions
            .read()
            .get(&id)
            .is_some_and(|s| s.config.replay_current)
    }

    /// Get subscription count.
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.read().len()
    }

    /// Broadcast a snapshot to subscribers whose filter matches its cause.
    /// Drops subscribers that fail to receive.
    pub fn broadcast(&self, snapshot: Arc<ViewSnapshot>) {
        let cause = snapshot.cause;
        let mut to_remove = Vec::new();

        {
            let subs = self.subscriptions.read();
            for (id, sub) in subs.iter() {
                if !sub.config.filter.matches(cause) {
                    continue;
                }
                let event = ViewEvent::Updated {
                    snapshot: Arc::clone(&snapshot),
                };
                if let Err(reason) = sub.try_send(event) {
                    to_remove.push((*id, reason));
                }
            }
        }

        // Remove dropped subscriptions
        if !to_remove.is_empty() {
            let mut subs = self.subscriptions.write();
            for (id, reason) in to_remove {
                if let Some(sub) = subs.remove(&id) {
                    warn!(subscription = id.0, ?reason, "dropping subscriber");
                    // Might not fit either; the receiver sees a closed channel then.
                    let _ = sub.sender.try_send(ViewEvent::Dropped { reason });
                }
            }
        }

        debug!(
            generation = snapshot.generation,
            subscribers = self.subscription_count(),
            "broadcast snapshot"
        );
    }
}

impl Default for SubscriptionManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::Criteria;
    use crate::query::PageWindow;
    use crate::subscriptions::{ChangeCause, SubscriptionFilter};
    use std::time::Duration;

    fn snapshot(generation: u64, cause: ChangeCause) -> Arc<ViewSnapshot> {
        Arc::new(ViewSnapshot {
            generation,
            cause,
            loaded: false,
            criteria: Criteria::default(),
            filtered: Vec::new(),
            page: Vec::new(),
            window: PageWindow::compute(0, 1, 9),
        })
    }

    #[test]
    fn test_subscribe_unsubscribe() {
        let manager = SubscriptionManager::new();

        let handle = manager.subscribe(SubscriptionConfig::default());
        assert_eq!(manager.subscription_count(), 1);

        manager.unsubscribe(handle.id);
        assert_eq!(manager.subscription_count(), 0);

        let event = handle.recv_timeout(Duration::from_millis(100)).unwrap();
        assert!(matches!(
            event,
            ViewEvent::Dropped {
                reason: DropReason::Unsubscribed
            }
        ));
    }

    #[test]
    fn test_broadcast_respects_filter() {
        let manager = SubscriptionManager::new();
        let pages = manager.subscribe(SubscriptionConfig {
            filter: SubscriptionFilter::pages(),
            ..Default::default()
        });

        manager.broadcast(snapshot(1, ChangeCause::FilterChanged));
        assert!(pages.recv_timeout(Duration::from_millis(50)).is_err());

        manager.broadcast(snapshot(2, ChangeCause::PageChanged));
        let event = pages.recv_timeout(Duration::from_millis(100)).unwrap();
        assert_eq!(event.snapshot().unwrap().generation, 2);
    }

    #[test]
    fn test_replay_sends_current() {
        let manager = SubscriptionManager::new();
        let handle = manager.subscribe(SubscriptionConfig::default());
        assert!(manager.wants_replay(handle.id));

        manager
            .replay(handle.id, snapshot(7, ChangeCause::Initial))
            .unwrap();
        match handle.recv_timeout(Duration::from_millis(100)).unwrap() {
            ViewEvent::Current { snapshot } => assert_eq!(snapshot.generation, 7),
            other => panic!("Expected Current event, got {:?}", other),
        }
    }

    #[test]
    fn test_replay_unknown_subscription() {
        let manager = SubscriptionManager::new();
        let result = manager.replay(SubscriptionId(99), snapshot(1, ChangeCause::Initial));
        assert!(matches!(result, Err(ViewError::SubscriptionDropped)));
    }

    #[test]
    fn test_drop_slow_subscriber() {
        let manager = SubscriptionManager::new();
        let _handle = manager.subscribe(SubscriptionConfig {
            buffer_size: 2,
            ..Default::default()
        });

        for generation in 0..10 {
            manager.broadcast(snapshot(generation, ChangeCause::PageChanged));
        }

        assert_eq!(manager.subscription_count(), 0);
    }

    #[test]
    fn test_drop_disconnected_subscriber() {
        let manager = SubscriptionManager::new();
        let handle = manager.subscribe(SubscriptionConfig::default());
        drop(handle);

        manager.broadcast(snapshot(1, ChangeCause::SourceDelivered));
        assert_eq!(manager.subscription_count(), 0);
    }

    #[test]
    fn test_latest_skips_to_newest() {
        let manager = SubscriptionManager::new();
        let handle = manager.subscribe(SubscriptionConfig::default());
        for generation in 1..=3 {
            manager.broadcast(snapshot(generation, ChangeCause::PageChanged));
        }
        assert_eq!(handle.latest().unwrap().generation, 3);
        assert!(handle.latest().is_none());
    }
}
