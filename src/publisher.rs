//! View publisher tying records, criteria and subscribers together.

use crate::criteria::{Criteria, CriteriaStore, Pagination, DEFAULT_PAGE_SIZE};
use crate::error::{Result, ViewError};
use crate::query::{distinct_types, paginate, run_query, PageWindow};
use crate::source::RecordFeed;
use crate::subscriptions::{
    ChangeCause, SubscriptionConfig, SubscriptionFilter, SubscriptionHandle, SubscriptionId,
    SubscriptionManager,
};
use crate::types::{self, DateMode, OrderStatus, Record};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};

/// Publisher configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewConfig {
    /// Rows per page.
    pub page_size: usize,

    /// Buffer size for subscriptions created through `subscribe_with`.
    pub subscription_buffer: usize,

    /// Whether new subscribers receive the current snapshot immediately.
    pub replay_on_subscribe: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            subscription_buffer: 1000,
            replay_on_subscribe: true,
        }
    }
}

impl ViewConfig {
    /// Parse and validate a JSON configuration. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(ViewError::InvalidConfig("page_size must be at least 1".into()));
        }
        if self.subscription_buffer == 0 {
            return Err(ViewError::InvalidConfig(
                "subscription_buffer must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Subscription settings derived from this config.
    pub fn subscription_config(&self, filter: SubscriptionFilter) -> SubscriptionConfig {
        SubscriptionConfig {
            buffer_size: self.subscription_buffer,
            replay_current: self.replay_on_subscribe,
            filter,
        }
    }
}

/// One consistent published state: the filtered view, the current page,
/// and the criteria they were derived from.
#[derive(Clone, Debug, Serialize)]
pub struct ViewSnapshot {
    /// Increases by one on every recomputation.
    pub generation: u64,

    pub cause: ChangeCause,

    /// False until the source has delivered at least once.
    pub loaded: bool,

    pub criteria: Criteria,

    pub filtered: Vec<Record>,

    pub page: Vec<Record>,

    pub window: PageWindow,
}

impl ViewSnapshot {
    /// Derive both views from scratch.
    pub fn derive(
        generation: u64,
        cause: ChangeCause,
        loaded: bool,
        records: &[Record],
        criteria: &Criteria,
        pagination: Pagination,
    ) -> Self {
        let filtered = run_query(records, criteria);
        let page = paginate(&filtered, pagination.current_page, pagination.page_size);
        Self {
            generation,
            cause,
            loaded,
            criteria: criteria.clone(),
            filtered,
            page: page.records,
            window: page.window,
        }
    }

    /// "Showing X-Y of Z".
    pub fn summary(&self) -> String {
        self.window.to_string()
    }
}

/// Recomputes and republishes the filtered and page views whenever the
/// record collection or any criterion changes.
///
/// Single-threaded: every mutation recomputes synchronously before
/// returning, so readers and subscribers only ever see complete
/// snapshots. Until the source delivers, the collection is empty.
pub struct ViewPublisher {
    config: ViewConfig,

    /// Filter and page state.
    criteria: CriteriaStore,

    /// Incoming collections.
    feed: RecordFeed,

    /// Latest delivered collection.
    records: Vec<Record>,

    /// Whether anything has been delivered yet.
    loaded: bool,

    /// Last published snapshot.
    current: Arc<ViewSnapshot>,

    subscriptions: SubscriptionManager,
}

impl ViewPublisher {
    /// Create a publisher over an explicit criteria store and feed.
    pub fn new(criteria: CriteriaStore, feed: RecordFeed) -> Self {
        let config = ViewConfig {
            page_size: criteria.page_size(),
            ..ViewConfig::default()
        };
        let current = Arc::new(ViewSnapshot::derive(
            0,
            ChangeCause::Initial,
            false,
            &[],
            criteria.criteria(),
            criteria.pagination(),
        ));

        Self {
            config,
            criteria,
            feed,
            records: Vec::new(),
            loaded: false,
            current,
            subscriptions: SubscriptionManager::new(),
        }
    }

    /// Create a publisher from a validated configuration.
    pub fn from_config(config: &ViewConfig, feed: RecordFeed) -> Result<Self> {
        config.validate()?;
        let criteria = CriteriaStore::with_page_size(config.page_size)?;
        let mut publisher = Self::new(criteria, feed);
        publisher.config = config.clone();
        Ok(publisher)
    }

    // --- Record source ---

    /// Replace the collection wholesale and recompute.
    pub fn deliver(&mut self, records: Vec<Record>) {
        let undated = records.iter().filter(|r| !r.date.is_valid()).count();
        if undated > 0 {
            debug!(undated, "records with unparseable dates will trail date sorts");
        }
        self.records = records;
        self.loaded = true;
        self.recompute(ChangeCause::SourceDelivered);
    }

    /// Apply pending feed deliveries. Only the newest collection is used.
    ///
    /// Returns true if anything was delivered.
    pub fn pump(&mut self) -> bool {
        match self.feed.drain_latest() {
            Some((records, drained)) => {
                trace!(drained, "pumped record feed");
                self.deliver(records);
                true
            }
            None => false,
        }
    }

    /// Block until the feed delivers or the timeout expires, then apply
    /// the newest pending collection.
    pub fn wait_for_delivery(&mut self, timeout: Duration) -> bool {
        match self.feed.recv_timeout(timeout) {
            Some(records) => {
                if !self.pump() {
                    self.deliver(records);
                }
                true
            }
            None => false,
        }
    }

    // --- Filters (each returns to page 1) ---

    pub fn set_type(&mut self, record_type: &str) {
        self.criteria.set_type(record_type);
        self.recompute(ChangeCause::FilterChanged);
    }

    pub fn set_status(&mut self, status: Option<OrderStatus>) {
        self.criteria.set_status(status);
        self.recompute(ChangeCause::FilterChanged);
    }

    /// Status filter from its label; unknown labels change nothing.
    pub fn set_status_label(&mut self, label: &str) -> Result<()> {
        self.criteria.set_status_label(label)?;
        self.recompute(ChangeCause::FilterChanged);
        Ok(())
    }

    pub fn set_date_mode(&mut self, date_mode: DateMode) {
        self.criteria.set_date_mode(date_mode);
        self.recompute(ChangeCause::FilterChanged);
    }

    /// Set both bounds before recomputing. A missing bound disables range
    /// filtering.
    pub fn set_date_range(&mut self, from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) {
        self.criteria.set_date_range(from, to);
        self.recompute(ChangeCause::FilterChanged);
    }

    pub fn set_range_from(&mut self, from: Option<DateTime<Utc>>) {
        self.criteria.set_range_from(from);
        self.recompute(ChangeCause::FilterChanged);
    }

    pub fn set_range_to(&mut self, to: Option<DateTime<Utc>>) {
        self.criteria.set_range_to(to);
        self.recompute(ChangeCause::FilterChanged);
    }

    /// Restore all filters and return to page 1, publishing once.
    pub fn reset_filters(&mut self) {
        self.criteria.reset_filters();
        self.recompute(ChangeCause::FiltersReset);
    }

    /// Apply several criteria changes and publish a single snapshot.
    pub fn update<F>(&mut self, f: F)
    where
        F: FnOnce(&mut CriteriaStore),
    {
        let before_criteria = self.criteria.criteria().clone();
        let before_pagination = self.criteria.pagination();
        f(&mut self.criteria);
        self.config.page_size = self.criteria.page_size();

        let cause = if self.criteria.criteria() != &before_criteria {
            if self.criteria.criteria() == &Criteria::default() {
                ChangeCause::FiltersReset
            } else {
                ChangeCause::FilterChanged
            }
        } else if self.criteria.page_size() != before_pagination.page_size {
            ChangeCause::PageSizeChanged
        } else {
            ChangeCause::PageChanged
        };
        self.recompute(cause);
    }

    // --- Page navigation (never touches filters) ---

    /// Advance one page, without an upper bound.
    pub fn next_page(&mut self) {
        self.criteria.next_page();
        self.recompute(ChangeCause::PageChanged);
    }

    /// Go back one page, floored at 1.
    pub fn prev_page(&mut self) {
        self.criteria.prev_page();
        self.recompute(ChangeCause::PageChanged);
    }

    pub fn set_page(&mut self, page: usize) {
        self.criteria.set_page(page);
        self.recompute(ChangeCause::PageChanged);
    }

    pub fn set_page_size(&mut self, page_size: usize) -> Result<()> {
        self.criteria.set_page_size(page_size)?;
        self.config.page_size = page_size;
        self.recompute(ChangeCause::PageSizeChanged);
        Ok(())
    }

    // --- Reads ---

    /// The last published snapshot.
    pub fn snapshot(&self) -> Arc<ViewSnapshot> {
        Arc::clone(&self.current)
    }

    pub fn filtered_view(&self) -> &[Record] {
        &self.current.filtered
    }

    pub fn page_view(&self) -> &[Record] {
        &self.current.page
    }

    pub fn window(&self) -> PageWindow {
        self.current.window
    }

    pub fn start_index(&self) -> usize {
        self.current.window.start_index
    }

    pub fn end_index(&self) -> usize {
        self.current.window.end_index
    }

    pub fn current_page(&self) -> usize {
        self.criteria.current_page()
    }

    pub fn page_size(&self) -> usize {
        self.criteria.page_size()
    }

    pub fn page_count(&self) -> usize {
        self.current.window.page_count()
    }

    pub fn criteria(&self) -> &Criteria {
        self.criteria.criteria()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    /// Type values present in the current collection, for the type dropdown.
    pub fn type_options(&self) -> Vec<String> {
        distinct_types(&self.records)
    }

    /// Badge identifier for a status; empty for no status.
    pub fn status_class(status: Option<OrderStatus>) -> String {
        types::status_class(status)
    }

    // --- Subscriptions ---

    /// Subscribe with explicit settings.
    pub fn subscribe(&self, config: SubscriptionConfig) -> Result<SubscriptionHandle> {
        let handle = self.subscriptions.subscribe(config);
        if self.subscriptions.wants_replay(handle.id) {
            self.subscriptions.replay(handle.id, self.snapshot())?;
        }
        Ok(handle)
    }

    /// Subscribe using the publisher's configured buffer and replay policy.
    pub fn subscribe_with(&self, filter: SubscriptionFilter) -> Result<SubscriptionHandle> {
        self.subscribe(self.config.subscription_config(filter))
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.subscriptions.unsubscribe(id);
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.subscription_count()
    }

    fn recompute(&mut self, cause: ChangeCause) {
        let snapshot = Arc::new(ViewSnapshot::derive(
            self.current.generation + 1,
            cause,
            self.loaded,
            &self.records,
            self.criteria.criteria(),
            self.criteria.pagination(),
        ));

        debug!(
            generation = snapshot.generation,
            ?cause,
            records = self.records.len(),
            filtered = snapshot.filtered.len(),
            page = snapshot.page.len(),
            current_page = snapshot.window.current_page,
            "recomputed views"
        );
        if snapshot.window.is_past_end() {
            trace!(
                current_page = snapshot.window.current_page,
                page_count = snapshot.window.page_count(),
                "current page is past the last row"
            );
        }

        self.current = Arc::clone(&snapshot);
        self.subscriptions.broadcast(snapshot);
    }
}
