//! Pure derivation of views from records and criteria.
//!
//! - `run_query`: records + criteria -> filtered, ordered sequence
//! - `paginate`: filtered sequence + page -> page window
//!
//! Neither function touches its input; both are cheap enough to rerun
//! in full on every change.

mod engine;
mod paginator;

pub use engine::{distinct_types, run_query};
pub use paginator::{paginate, Page, PageWindow};
