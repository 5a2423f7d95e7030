//! Criteria values and the store that sequences their changes.

use crate::error::{Result, ViewError};
use crate::types::{DateMode, OrderStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Rows per page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 9;

/// The active combination of filter and sort settings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Criteria {
    /// Exact-match type filter (None = no constraint).
    pub record_type: Option<String>,

    /// Exact-match status filter (None = no constraint).
    pub status: Option<OrderStatus>,

    pub date_mode: DateMode,

    /// Lower range bound, only meaningful for `DateMode::Range`.
    pub range_from: Option<DateTime<Utc>>,

    /// Upper range bound, only meaningful for `DateMode::Range`.
    pub range_to: Option<DateTime<Utc>>,
}

impl Criteria {
    /// Type filter; an empty string clears it.
    pub fn with_type(&self, record_type: &str) -> Self {
        Self {
            record_type: (!record_type.is_empty()).then(|| record_type.to_string()),
            ..self.clone()
        }
    }

    pub fn with_status(&self, status: Option<OrderStatus>) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }

    pub fn with_date_mode(&self, date_mode: DateMode) -> Self {
        Self {
            date_mode,
            ..self.clone()
        }
    }

    pub fn with_range_from(&self, from: Option<DateTime<Utc>>) -> Self {
        Self {
            range_from: from,
            ..self.clone()
        }
    }

    pub fn with_range_to(&self, to: Option<DateTime<Utc>>) -> Self {
        Self {
            range_to: to,
            ..self.clone()
        }
    }

    /// Both bounds at once.
    pub fn with_range(&self, from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> Self {
        Self {
            range_from: from,
            range_to: to,
            ..self.clone()
        }
    }

    /// The type constraint, if any. An empty string constrains nothing.
    pub fn type_filter(&self) -> Option<&str> {
        self.record_type.as_deref().filter(|t| !t.is_empty())
    }

    /// The inclusive range, present only when both bounds are set.
    pub fn date_range(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        match (self.range_from, self.range_to) {
            (Some(from), Some(to)) => Some((from, to)),
            _ => None,
        }
    }

    /// True when no dimension constrains or reorders the collection.
    pub fn is_identity(&self) -> bool {
        self.type_filter().is_none()
            && self.status.is_none()
            && match self.date_mode {
                DateMode::None => true,
                DateMode::Range => self.date_range().is_none(),
                DateMode::Newest | DateMode::Oldest => false,
            }
    }
}

/// Page position and size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// 1-based.
    pub current_page: usize,
    pub page_size: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            current_page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Holds the current criteria and page state.
///
/// Filter setters always return to page 1. Page setters never touch
/// filters. Every mutation bumps `revision`.
#[derive(Clone, Debug, Default)]
pub struct CriteriaStore {
    criteria: Criteria,
    pagination: Pagination,
    revision: u64,
}

impl CriteriaStore {
    /// Create a store with default criteria and the default page size.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with a custom page size.
    pub fn with_page_size(page_size: usize) -> Result<Self> {
        if page_size == 0 {
            return Err(ViewError::InvalidPageSize(page_size));
        }
        Ok(Self {
            pagination: Pagination {
                current_page: 1,
                page_size,
            },
            ..Self::default()
        })
    }

    // --- Reads ---

    pub fn criteria(&self) -> &Criteria {
        &self.criteria
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    pub fn current_page(&self) -> usize {
        self.pagination.current_page
    }

    pub fn page_size(&self) -> usize {
        self.pagination.page_size
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    // --- Filter dimensions ---

    pub fn set_type(&mut self, record_type: &str) {
        let next = self.criteria.with_type(record_type);
        self.replace_criteria(next);
    }

    pub fn set_status(&mut self, status: Option<OrderStatus>) {
        let next = self.criteria.with_status(status);
        self.replace_criteria(next);
    }

    /// Set the status filter from its display label; `""` clears it.
    ///
    /// Unknown labels are rejected and leave the store untouched.
    pub fn set_status_label(&mut self, label: &str) -> Result<()> {
        let status = if label.is_empty() {
            None
        } else {
            Some(label.parse::<OrderStatus>()?)
        };
        self.set_status(status);
        Ok(())
    }

    pub fn set_date_mode(&mut self, date_mode: DateMode) {
        let next = self.criteria.with_date_mode(date_mode);
        self.replace_criteria(next);
    }

    pub fn set_range_from(&mut self, from: Option<DateTime<Utc>>) {
        let next = self.criteria.with_range_from(from);
        self.replace_criteria(next);
    }

    pub fn set_range_to(&mut self, to: Option<DateTime<Utc>>) {
        let next = self.criteria.with_range_to(to);
        self.replace_criteria(next);
    }

    /// Set both range bounds in one step.
    pub fn set_date_range(&mut self, from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) {
        let next = self.criteria.with_range(from, to);
        self.replace_criteria(next);
    }

    /// Restore every filter dimension to its default and return to page 1.
    pub fn reset_filters(&mut self) {
        self.replace_criteria(Criteria::default());
    }

    fn replace_criteria(&mut self, next: Criteria) {
        self.criteria = next;
        self.pagination.current_page = 1;
        self.revision += 1;
    }

    // --- Page navigation ---

    /// Advance one page. There is no upper bound; pages past the end are empty.
    pub fn next_page(&mut self) {
        self.set_page(self.pagination.current_page.saturating_add(1));
    }

    /// Go back one page, stopping at page 1.
    pub fn prev_page(&mut self) {
        self.set_page(self.pagination.current_page.saturating_sub(1));
    }

    /// Jump to a page; values below 1 are floored to 1.
    pub fn set_page(&mut self, page: usize) {
        self.pagination.current_page = page.max(1);
        self.revision += 1;
    }

    /// Change the page size and return to page 1.
    pub fn set_page_size(&mut self, page_size: usize) -> Result<()> {
        if page_size == 0 {
            return Err(ViewError::InvalidPageSize(page_size));
        }
        self.pagination = Pagination {
            current_page: 1,
            page_size,
        };
        self.revision += 1;
        Ok(())
    }
}
