//! Channel carrying whole-collection deliveries to the publisher.

use super::RecordSource;
use crate::error::{Result, ViewError};
use crate::types::Record;
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, warn};

/// Create a connected sender/feed pair.
pub fn record_feed() -> (FeedSender, RecordFeed) {
    let (sender, receiver) = unbounded();
    (FeedSender { sender }, RecordFeed { receiver })
}

/// Producer side. Cheap to clone; every clone feeds the same publisher.
#[derive(Clone, Debug)]
pub struct FeedSender {
    sender: Sender<Vec<Record>>,
}

impl FeedSender {
    /// Hand over a complete collection, replacing whatever came before.
    pub fn deliver(&self, records: Vec<Record>) -> Result<()> {
        self.sender
            .send(records)
            .map_err(|_| ViewError::FeedClosed)
    }

    /// Fetch from `source` on a background thread and deliver the result.
    ///
    /// Fetch failures are logged and produce no delivery; the publisher
    /// keeps whatever collection it already has.
    pub fn spawn_fetch<S: RecordSource>(&self, source: S) -> JoinHandle<()> {
        let sender = self.clone();
        thread::spawn(move || match source.fetch_records() {
            Ok(records) => {
                debug!(count = records.len(), "fetched records");
                if sender.deliver(records).is_err() {
                    warn!("record feed closed before delivery");
                }
            }
            Err(e) => warn!(error = %e, "record fetch failed"),
        })
    }
}

/// Consumer side, owned by the publisher.
#[derive(Debug)]
pub struct RecordFeed {
    receiver: Receiver<Vec<Record>>,
}

impl RecordFeed {
    /// A feed nobody can deliver to. Records then only arrive through
    /// `ViewPublisher::deliver`.
    pub fn detached() -> Self {
        let (_, feed) = record_feed();
        feed
    }

    /// Take every pending delivery, keeping only the newest.
    ///
    /// Returns the newest collection and how many deliveries were drained.
    pub fn drain_latest(&self) -> Option<(Vec<Record>, usize)> {
        let mut latest = None;
        let mut drained = 0;
        while let Ok(records) = self.receiver.try_recv() {
            latest = Some(records);
            drained += 1;
        }
        latest.map(|records| (records, drained))
    }

    /// Block until one delivery arrives or the timeout expires.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<Vec<Record>> {
        match self.receiver.recv_timeout(timeout) {
            Ok(records) => Some(records),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}
