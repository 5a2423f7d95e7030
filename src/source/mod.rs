//! Record sources and the delivery feed.
//!
//! Sources are external collaborators: they fetch a whole collection and
//! hand it over through a `FeedSender`, any number of times, from any
//! thread. The publisher drains the matching `RecordFeed` and recomputes
//! from the newest collection.
//!
//! # Example
//!
//! ```ignore
//! let (sender, feed) = record_feed();
//! sender.spawn_fetch(JsonFileSource::new("assets/orderLists.json"));
//!
//! let mut publisher = ViewPublisher::new(CriteriaStore::new(), feed);
//! publisher.wait_for_delivery(Duration::from_secs(1));
//! ```

mod feed;
mod json;

pub use feed::{record_feed, FeedSender, RecordFeed};
pub use json::{parse_records, JsonFileSource};

use crate::error::Result;
use crate::types::Record;

/// Anything that can produce the full record collection on demand.
pub trait RecordSource: Send + 'static {
    fn fetch_records(&self) -> Result<Vec<Record>>;
}

/// A fixed in-memory collection.
#[derive(Clone, Debug, Default)]
pub struct StaticSource {
    records: Vec<Record>,
}

impl StaticSource {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }
}

impl RecordSource for StaticSource {
    fn fetch_records(&self) -> Result<Vec<Record>> {
        Ok(self.records.clone())
    }
}
