//! Error types for the view pipeline.

use thiserror::Error;

/// Main error type for pipeline operations.
///
/// The query engine and paginator never fail; errors only come from
/// configuration, source adapters, and subscription plumbing.
#[derive(Debug, Error)]
pub enum ViewError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Invalid page size: {0} (must be at least 1)")]
    InvalidPageSize(usize),

    #[error("Unknown status label: {0:?}")]
    UnknownStatus(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Subscription was dropped")]
    SubscriptionDropped,

    #[error("Record feed is closed")]
    FeedClosed,
}

impl From<serde_json::Error> for ViewError {
    fn from(e: serde_json::Error) -> Self {
        ViewError::Deserialization(e.to_string())
    }
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, ViewError>;
