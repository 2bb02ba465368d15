//! Typed field values and record writers.
//!
//! Dictionaries carry every value as text. Typed records (the host data
//! store's rows) want native types, so conversions to a record go through
//! [`FieldValue`] and a [`RecordWriter`].

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Fallback layout for timestamps read from stores that do not emit RFC 3339.
const PLAIN_TIMESTAMP: &str = "%Y-%m-%d %H:%M:%S";

/// Native value of a single record field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Integer(i32),
    Short(i16),
    Timestamp(DateTime<Utc>),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i32> {
        match self {
            FieldValue::Integer(v) => Some(*v),
            FieldValue::Short(v) => Some(i32::from(*v)),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            FieldValue::Timestamp(t) => Some(*t),
            _ => None,
        }
    }

    /// Text form, as it would appear in a dictionary.
    pub fn to_field_string(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Integer(v) => v.to_string(),
            FieldValue::Short(v) => v.to_string(),
            FieldValue::Timestamp(t) => format_timestamp(t),
        }
    }
}

/// Sink for typed field values (a row buffer, a feature, a test map).
pub trait RecordWriter {
    fn write(&mut self, name: &'static str, value: FieldValue);
}

/// An owned field map, the default [`RecordWriter`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecordFields {
    fields: BTreeMap<String, FieldValue>,
}

impl RecordFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Text view of every field, the shape a record store reads back.
    pub fn to_dictionary(&self) -> BTreeMap<String, String> {
        self.fields
            .iter()
            .map(|(k, v)| (k.clone(), v.to_field_string()))
            .collect()
    }
}

impl RecordWriter for RecordFields {
    fn write(&mut self, name: &'static str, value: FieldValue) {
        self.fields.insert(name.to_string(), value);
    }
}

/// Format a timestamp in the fixed textual representation used by
/// dictionaries: RFC 3339, UTC, with only as many fractional digits as needed.
pub fn format_timestamp(t: &DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Parse a timestamp written by [`format_timestamp`] or a plain
/// `YYYY-MM-DD HH:MM:SS` value (taken as UTC).
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Some(t.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, PLAIN_TIMESTAMP)
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn timestamp_text_round_trips_exactly() {
        let t = Utc.with_ymd_and_hms(2024, 3, 9, 14, 30, 5).unwrap()
            + chrono::Duration::nanoseconds(123_456_789);
        let text = format_timestamp(&t);
        assert_eq!(text, "2024-03-09T14:30:05.123456789Z");
        assert_eq!(parse_timestamp(&text), Some(t));
    }

    #[test]
    fn whole_seconds_have_no_fraction() {
        let t = Utc.with_ymd_and_hms(2024, 3, 9, 14, 30, 5).unwrap();
        assert_eq!(format_timestamp(&t), "2024-03-09T14:30:05Z");
    }

    #[test]
    fn plain_timestamps_are_utc() {
        let t = parse_timestamp("2024-03-09 14:30:05").unwrap();
        assert_eq!(t, Utc.with_ymd_and_hms(2024, 3, 9, 14, 30, 5).unwrap());
    }

    #[test]
    fn garbage_timestamp_is_none() {
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn record_fields_text_view() {
        let mut record = RecordFields::new();
        record.write("symbolset", FieldValue::Integer(1));
        record.write("speed", FieldValue::Short(-5));
        record.write("identity", FieldValue::Text("3".into()));

        let dict = record.to_dictionary();
        assert_eq!(dict["symbolset"], "1");
        assert_eq!(dict["speed"], "-5");
        assert_eq!(dict["identity"], "3");
        assert_eq!(record.get("speed").and_then(FieldValue::as_integer), Some(-5));
    }
}
