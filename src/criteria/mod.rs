//! Filter criteria and pagination state.
//!
//! `Criteria` is an immutable value: every change produces a new one.
//! `CriteriaStore` holds the latest criteria together with the page
//! position and owns the rule that any filter change returns to page 1.

mod store;

pub use store::{Criteria, CriteriaStore, Pagination, DEFAULT_PAGE_SIZE};
