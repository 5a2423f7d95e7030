//! Core types for the view pipeline.

use crate::error::ViewError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};
use std::fmt;
use std::str::FromStr;

/// Unique identifier for a record.
///
/// Sources hand out either numeric or textual ids; both are accepted and
/// written back in the same shape. Any JSON number works, including
/// negative and fractional ones.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(Number),
    Text(String),
}

impl fmt::Debug for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecordId({})", self)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{}", n),
            RecordId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<u64> for RecordId {
    fn from(n: u64) -> Self {
        RecordId::Number(n.into())
    }
}

impl From<i64> for RecordId {
    fn from(n: i64) -> Self {
        RecordId::Number(n.into())
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        RecordId::Text(s.to_string())
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        RecordId::Text(s)
    }
}

/// Order status. Closed vocabulary; serde names match the display labels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    Completed,
    Processing,
    Rejected,
    #[serde(rename = "On Hold")]
    OnHold,
    #[serde(rename = "In Transit")]
    InTransit,
}

impl OrderStatus {
    /// Every status, in the order the dashboard lists them.
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Completed,
        OrderStatus::Processing,
        OrderStatus::Rejected,
        OrderStatus::OnHold,
        OrderStatus::InTransit,
    ];

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            OrderStatus::Completed => "Completed",
            OrderStatus::Processing => "Processing",
            OrderStatus::Rejected => "Rejected",
            OrderStatus::OnHold => "On Hold",
            OrderStatus::InTransit => "In Transit",
        }
    }

    /// Normalized identifier: lower-case label with spaces as hyphens.
    pub fn css_class(self) -> String {
        self.label().to_lowercase().replace(' ', "-")
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for OrderStatus {
    type Err = ViewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.label() == s)
            .ok_or_else(|| ViewError::UnknownStatus(s.to_string()))
    }
}

/// Badge identifier for a status; empty when there is no status.
pub fn status_class(status: Option<OrderStatus>) -> String {
    status.map(OrderStatus::css_class).unwrap_or_default()
}

/// Date-dimension behavior selector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateMode {
    #[default]
    None,
    Newest,
    Oldest,
    Range,
}

impl DateMode {
    /// Selectable modes, as offered in the date dropdown.
    pub const ALL_SORTS: [DateMode; 3] = [DateMode::Newest, DateMode::Oldest, DateMode::Range];

    pub fn label(self) -> &'static str {
        match self {
            DateMode::None => "None",
            DateMode::Newest => "Newest → Oldest",
            DateMode::Oldest => "Oldest → Newest",
            DateMode::Range => "Range",
        }
    }
}

/// Parse a point in time from the formats sources are known to produce.
///
/// Accepts RFC 3339, naive `YYYY-MM-DDTHH:MM:SS` (taken as UTC) and bare
/// `YYYY-MM-DD` (midnight UTC).
pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// A record's date as supplied, plus its parsed instant.
///
/// Unparseable values are kept verbatim so they round-trip, but carry no
/// instant; the engine orders them after every dated record.
///
/// Deserialization never fails. Numbers are read as epoch milliseconds,
/// `null` becomes an empty undated value and anything else is kept as its
/// JSON text without an instant.
#[derive(Clone, Serialize)]
#[serde(into = "String")]
pub struct RecordDate {
    raw: String,
    instant: Option<DateTime<Utc>>,
}

impl RecordDate {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let instant = parse_instant(&raw);
        Self { raw, instant }
    }

    fn from_json(value: Value) -> Self {
        match value {
            Value::String(raw) => RecordDate::new(raw),
            Value::Number(n) => Self {
                instant: n.as_i64().and_then(DateTime::<Utc>::from_timestamp_millis),
                raw: n.to_string(),
            },
            Value::Null => Self {
                raw: String::new(),
                instant: None,
            },
            other => Self {
                raw: other.to_string(),
                instant: None,
            },
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Parsed instant, `None` when the raw value is malformed.
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        self.instant
    }

    pub fn is_valid(&self) -> bool {
        self.instant.is_some()
    }
}

impl<'de> Deserialize<'de> for RecordDate {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(RecordDate::from_json)
    }
}

impl From<String> for RecordDate {
    fn from(raw: String) -> Self {
        RecordDate::new(raw)
    }
}

impl From<&str> for RecordDate {
    fn from(raw: &str) -> Self {
        RecordDate::new(raw)
    }
}

impl From<RecordDate> for String {
    fn from(date: RecordDate) -> Self {
        date.raw
    }
}

impl PartialEq for RecordDate {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for RecordDate {}

impl fmt::Debug for RecordDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecordDate({})", self.raw)
    }
}

/// A single order row.
///
/// Only `id`, `type`, `status` and `date` are inspected by the pipeline.
/// Everything else (name, address, ...) lives in `payload` and passes
/// through untouched.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,

    /// Category label (e.g. "Book", "Mobile").
    #[serde(rename = "type")]
    pub record_type: String,

    pub status: OrderStatus,

    pub date: RecordDate,

    /// Display-only fields.
    #[serde(flatten)]
    pub payload: serde_json::Map<String, serde_json::Value>,
}

impl Record {
    pub fn new(
        id: impl Into<RecordId>,
        record_type: impl Into<String>,
        status: OrderStatus,
        date: impl Into<RecordDate>,
    ) -> Self {
        Self {
            id: id.into(),
            record_type: record_type.into(),
            status,
            date: date.into(),
            payload: serde_json::Map::new(),
        }
    }

    /// Attach a pass-through display field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.payload.insert(key.into(), value.into());
        self
    }
}
