//! Filter and date-ordering of a record collection.

use crate::criteria::Criteria;
use crate::types::{DateMode, Record};
use chrono::{DateTime, Utc};
use std::cmp::Ordering;

/// Apply criteria to a collection, returning a new ordered sequence.
///
/// Order of application is fixed: type, then status, then the date
/// dimension. The source slice is never modified.
pub fn run_query(records: &[Record], criteria: &Criteria) -> Vec<Record> {
    let mut result: Vec<Record> = records
        .iter()
        .filter(|r| matches_type(r, criteria))
        .filter(|r| matches_status(r, criteria))
        .cloned()
        .collect();

    match criteria.date_mode {
        DateMode::None => {}
        DateMode::Newest => result.sort_by(|a, b| compare_dates(a, b, true)),
        DateMode::Oldest => result.sort_by(|a, b| compare_dates(a, b, false)),
        DateMode::Range => {
            if let Some((from, to)) = criteria.date_range() {
                result.retain(|r| within(r, from, to));
            }
        }
    }

    result
}

/// Distinct `type` values in source order.
pub fn distinct_types(records: &[Record]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for record in records {
        if !seen.iter().any(|t| *t == record.record_type) {
            seen.push(record.record_type.clone());
        }
    }
    seen
}

fn matches_type(record: &Record, criteria: &Criteria) -> bool {
    criteria
        .type_filter()
        .map_or(true, |t| record.record_type == t)
}

fn matches_status(record: &Record, criteria: &Criteria) -> bool {
    criteria.status.map_or(true, |s| record.status == s)
}

/// Comparator for date sorts. Undated records trail in both directions.
///
/// `slice::sort_by` is stable, so equal dates keep their source order.
fn compare_dates(a: &Record, b: &Record, descending: bool) -> Ordering {
    match (a.date.instant(), b.date.instant()) {
        (Some(x), Some(y)) if descending => y.cmp(&x),
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Inclusive on both ends. Undated records never match.
fn within(record: &Record, from: DateTime<Utc>, to: DateTime<Utc>) -> bool {
    record
        .date
        .instant()
        .is_some_and(|d| d >= from && d <= to)
}
