//! Subscriptions to published views.
//!
//! Every recomputation produces one immutable `ViewSnapshot`, broadcast
//! to subscribers whose filter matches the change that caused it:
//! - Source deliveries
//! - Filter changes and resets
//! - Page navigation and page-size changes
//!
//! Buffers are bounded; a subscriber that falls behind is dropped with a
//! `Dropped { BufferOverflow }` notice rather than stalling the publisher.
//!
//! # Example
//!
//! ```ignore
//! let handle = publisher.subscribe(SubscriptionConfig::default())?;
//!
//! loop {
//!     match handle.recv() {
//!         Ok(ViewEvent::Current { snapshot }) | Ok(ViewEvent::Updated { snapshot }) => {
//!             println!("{}", snapshot.window);
//!         }
//!         Ok(ViewEvent::Dropped { .. }) | Err(_) => break,
//!     }
//! }
//! ```

mod manager;
mod types;

pub use manager::SubscriptionManager;
pub use types::{
    ChangeCause, DropReason, SubscriptionConfig, SubscriptionFilter, SubscriptionHandle,
    SubscriptionId, ViewEvent,
};
