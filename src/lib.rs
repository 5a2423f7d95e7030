//! # Order View
//!
//! A reactive query pipeline for order dashboards: it takes a record
//! collection that may arrive late and be replaced at any time, plus a set
//! of independently changing filter, sort and page settings, and publishes
//! a consistent filtered view and page view after every change.
//!
//! ## Core Concepts
//!
//! - **Records**: Orders with an id, type, status and date, plus opaque
//!   display fields
//! - **Criteria**: Immutable filter/sort settings held by a `CriteriaStore`
//! - **Query**: Pure filtering, date ordering and page windowing
//! - **Publisher**: Full recomputation and broadcast on every change
//!
//! ## Example
//!
//! ```ignore
//! use orderview::{record_feed, CriteriaStore, DateMode, JsonFileSource, ViewPublisher};
//!
//! let (sender, feed) = record_feed();
//! sender.spawn_fetch(JsonFileSource::new("assets/orderLists.json"));
//!
//! let mut publisher = ViewPublisher::new(CriteriaStore::new(), feed);
//! publisher.wait_for_delivery(std::time::Duration::from_secs(1));
//!
//! publisher.set_type("Book");
//! publisher.set_date_mode(DateMode::Newest);
//! println!("{}", publisher.window());
//! ```

pub mod criteria;
pub mod error;
pub mod publisher;
pub mod query;
pub mod source;
pub mod subscriptions;
pub mod types;

// Re-exports
pub use criteria::{Criteria, CriteriaStore, Pagination, DEFAULT_PAGE_SIZE};
pub use error::{Result, ViewError};
pub use publisher::{ViewConfig, ViewPublisher, ViewSnapshot};
pub use query::{distinct_types, paginate, run_query, Page, PageWindow};
pub use source::{
    parse_records, record_feed, FeedSender, JsonFileSource, RecordFeed, RecordSource,
    StaticSource,
};
pub use subscriptions::{
    ChangeCause, DropReason, SubscriptionConfig, SubscriptionFilter, SubscriptionHandle,
    SubscriptionId, SubscriptionManager, ViewEvent,
};
pub use types::*;
