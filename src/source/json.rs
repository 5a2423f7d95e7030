//! JSON-backed record source.

use super::RecordSource;
use crate::error::{Result, ViewError};
use crate::types::Record;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Parse a collection from JSON.
///
/// Accepts a bare array of records or an object with an `orders` array.
/// `null`, or an object whose `orders` is missing or null, is an empty
/// collection.
pub fn parse_records(bytes: &[u8]) -> Result<Vec<Record>> {
    let value: Value = serde_json::from_slice(bytes)?;
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(_) => Ok(serde_json::from_value(value)?),
        Value::Object(mut map) => match map.remove("orders") {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(orders) => Ok(serde_json::from_value(orders)?),
        },
        other => Err(ViewError::Deserialization(format!(
            "expected an array or an object with `orders`, got {}",
            kind(&other)
        ))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Reads the whole collection from a JSON file on every fetch.
#[derive(Clone, Debug)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordSource for JsonFileSource {
    fn fetch_records(&self) -> Result<Vec<Record>> {
        let bytes = fs::read(&self.path)?;
        parse_records(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OrderStatus;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const ENVELOPE: &str = r#"{
        "orders": [
            {"id": "1", "name": "Order A", "address": "NY", "date": "2024-05-01", "type": "Book", "status": "Completed"},
            {"id": "2", "name": "Order B", "address": "LA", "date": "2024-01-01", "type": "Mobile", "status": "Processing"}
        ]
    }"#;

    #[test]
    fn test_envelope_and_bare_array() {
        let wrapped = parse_records(ENVELOPE.as_bytes()).unwrap();
        assert_eq!(wrapped.len(), 2);
        assert_eq!(wrapped[1].status, OrderStatus::Processing);

        let bare = r#"[{"id": 3, "date": "2024-03-01", "type": "Book", "status": "Rejected"}]"#;
        let records = parse_records(bare.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id.to_string(), "3");
    }

    #[test]
    fn test_missing_orders_is_empty() {
        assert!(parse_records(b"null").unwrap().is_empty());
        assert!(parse_records(b"{}").unwrap().is_empty());
        assert!(parse_records(br#"{"orders": null}"#).unwrap().is_empty());
    }

    #[test]
    fn test_odd_dates_and_ids_do_not_reject_collection() {
        let json = br#"[
            {"id": "1", "date": "2024-05-01", "type": "Book", "status": "Completed"},
            {"id": "2", "date": null, "type": "Book", "status": "Completed"},
            {"id": -3, "date": 1714521600000, "type": "Mobile", "status": "Rejected"},
            {"id": 4.5, "type": "Watch", "status": "On Hold", "date": {"when": "soon"}}
        ]"#;
        let records = parse_records(json).unwrap();
        assert_eq!(records.len(), 4);

        assert!(!records[1].date.is_valid());
        assert_eq!(records[2].id.to_string(), "-3");
        assert_eq!(records[2].date.instant(), records[0].date.instant());
        assert_eq!(records[3].id.to_string(), "4.5");
        assert!(!records[3].date.is_valid());
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(
            parse_records(b"42"),
            Err(ViewError::Deserialization(_))
        ));
        assert!(matches!(
            parse_records(br#"{"orders": [{"id": "1"}]}"#),
            Err(ViewError::Deserialization(_))
        ));
        assert!(parse_records(b"{not json").is_err());
    }

    #[test]
    fn test_file_source() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(ENVELOPE.as_bytes()).unwrap();

        let source = JsonFileSource::new(file.path());
        let records = source.fetch_records().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].payload["address"], "NY");
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let source = JsonFileSource::new(dir.path().join("nope.json"));
        assert!(matches!(source.fetch_records(), Err(ViewError::Io(_))));
    }
}
