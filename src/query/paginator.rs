//! Windowing of a filtered sequence into pages.

use crate::types::Record;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of one page within a filtered sequence.
///
/// `start_index..end_index` is always within `0..=total`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageWindow {
    pub current_page: usize,
    pub page_size: usize,
    pub start_index: usize,
    pub end_index: usize,
    /// Length of the filtered sequence.
    pub total: usize,
}

impl PageWindow {
    /// Compute the window for a page. Page 0 is treated as page 1.
    pub fn compute(total: usize, current_page: usize, page_size: usize) -> Self {
        let page = current_page.max(1);
        let start_index = (page - 1).saturating_mul(page_size).min(total);
        let end_index = start_index.saturating_add(page_size).min(total);
        Self {
            current_page: page,
            page_size,
            start_index,
            end_index,
            total,
        }
    }

    pub fn len(&self) -> usize {
        self.end_index - self.start_index
    }

    pub fn is_empty(&self) -> bool {
        self.start_index == self.end_index
    }

    /// Number of non-empty pages.
    pub fn page_count(&self) -> usize {
        if self.page_size == 0 {
            return 0;
        }
        self.total.div_ceil(self.page_size)
    }

    /// True when the current page lies past the last row.
    pub fn is_past_end(&self) -> bool {
        self.is_empty() && self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.end_index < self.total
    }

    pub fn has_prev(&self) -> bool {
        self.current_page > 1
    }
}

impl fmt::Display for PageWindow {
    /// "Showing X-Y of Z", with X 1-based.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "Showing 0-0 of {}", self.total)
        } else {
            write!(
                f,
                "Showing {}-{} of {}",
                self.start_index + 1,
                self.end_index,
                self.total
            )
        }
    }
}

/// A page of records and where it sits.
#[derive(Clone, Debug, PartialEq)]
pub struct Page {
    pub records: Vec<Record>,
    pub window: PageWindow,
}

/// Cut the `[start_index, end_index)` window for `current_page`.
///
/// Pages beyond the data produce an empty page.
pub fn paginate(filtered: &[Record], current_page: usize, page_size: usize) -> Page {
    let window = PageWindow::compute(filtered.len(), current_page, page_size);
    Page {
        records: filtered[window.start_index..window.end_index].to_vec(),
        window,
    }
}
