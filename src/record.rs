//! Inbound event records and batch parsing.
//!
//! Records arrive as newline-delimited JSON. A line is one of:
//!
//! | Shape | Example | Result |
//! |-------|---------|--------|
//! | Message mode | `["app.cpu", 1700000000, {"name": "cpu"}]` | one entry |
//! | Forward mode | `["app.cpu", [[1700000000, {..}], [1700000001, {..}]]]` | one entry per element |
//! | Bare record | `{"name": "cpu", "value": 1}` | one entry, default tag, current time |
//!
//! Forward mode may carry a trailing options object, which is ignored.

use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;

/// Key holding the metric name.
pub const NAME_KEY: &str = "name";
/// Key holding the metric value.
pub const VALUE_KEY: &str = "value";
/// Key holding the collection timestamp.
pub const TIMESTAMP_KEY: &str = "@timestamp";

static NULL: Value = Value::Null;

/// A single structured record.
///
/// Read-only once parsed. Accessors for the well-known keys return
/// `null` when the key is absent rather than failing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    /// Wraps a JSON object.
    #[must_use]
    pub const fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Returns the value at `key`, or `null` if it is absent.
    #[must_use]
    pub fn field(&self, key: &str) -> &Value {
        self.0.get(key).unwrap_or(&NULL)
    }

    /// The `name` field.
    #[must_use]
    pub fn name(&self) -> &Value {
        self.field(NAME_KEY)
    }

    /// The `value` field.
    #[must_use]
    pub fn value(&self) -> &Value {
        self.field(VALUE_KEY)
    }

    /// The `@timestamp` field.
    #[must_use]
    pub fn timestamp(&self) -> &Value {
        self.field(TIMESTAMP_KEY)
    }

    /// Number of fields in the record.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the record has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for Record {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// Time attached to an event by its producer, in seconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct EventTime(f64);

impl EventTime {
    /// Creates an event time from epoch seconds.
    #[must_use]
    pub const fn from_secs(secs: f64) -> Self {
        Self(secs)
    }

    /// Creates an event time from a wall clock reading.
    #[must_use]
    pub fn from_system_time(time: SystemTime) -> Self {
        Self(crate::time::epoch_secs(time))
    }

    /// Epoch seconds.
    #[must_use]
    pub const fn as_secs(self) -> f64 {
        self.0
    }
}

impl std::fmt::Display for EventTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One `(time, record)` pair of a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    /// Event time
    pub time: EventTime,
    /// Record payload
    pub record: Record,
}

/// A tagged group of entries received together.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    /// Routing tag shared by every entry
    pub tag: String,
    /// Entries in arrival order
    pub entries: Vec<Entry>,
}

impl Batch {
    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the batch carries no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Error for input lines that cannot be turned into a batch.
#[derive(Debug, Error)]
pub enum RecordError {
    /// The line is not valid JSON.
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Valid JSON that matches none of the accepted shapes.
    #[error("Unrecognized event shape: {0}")]
    Shape(String),
}

impl RecordError {
    fn shape(reason: impl Into<String>) -> Self {
        Self::Shape(reason.into())
    }
}

/// Parses one input line.
///
/// Returns `Ok(None)` for blank lines. Bare records get `default_tag` and
/// `now` as their event time.
///
/// # Errors
///
/// Returns [`RecordError`] if the line is not JSON or has an unknown shape.
pub fn parse_line(
    line: &str,
    default_tag: &str,
    now: SystemTime,
) -> Result<Option<Batch>, RecordError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    match serde_json::from_str::<Value>(line)? {
        Value::Object(fields) => Ok(Some(Batch {
            tag: default_tag.to_string(),
            entries: vec![Entry {
                time: EventTime::from_system_time(now),
                record: Record::new(fields),
            }],
        })),
        Value::Array(items) => parse_tagged(items).map(Some),
        other => Err(RecordError::shape(format!(
            "expected an object or array, got {}",
            type_name(&other)
        ))),
    }
}

fn parse_tagged(items: Vec<Value>) -> Result<Batch, RecordError> {
    let mut items = items.into_iter();

    let tag = match items.next() {
        Some(Value::String(tag)) => tag,
        Some(other) => {
            return Err(RecordError::shape(format!(
                "tag must be a string, got {}",
                type_name(&other)
            )));
        }
        None => return Err(RecordError::shape("empty array")),
    };

    let entries = match (items.next(), items.next(), items.next()) {
        // Message mode: [tag, time, record]
        (Some(time @ Value::Number(_)), Some(Value::Object(fields)), None) => {
            vec![Entry {
                time: parse_time(&time)?,
                record: Record::new(fields),
            }]
        }
        // Forward mode: [tag, [[time, record], ...], options?]
        (Some(Value::Array(pairs)), None | Some(Value::Object(_)), None) => pairs
            .into_iter()
            .map(parse_entry)
            .collect::<Result<Vec<_>, _>>()?,
        _ => {
            return Err(RecordError::shape(
                "expected [tag, time, record] or [tag, [[time, record], ...]]",
            ));
        }
    };

    Ok(Batch { tag, entries })
}

fn parse_entry(pair: Value) -> Result<Entry, RecordError> {
    let Value::Array(pair) = pair else {
        return Err(RecordError::shape("forward entry must be [time, record]"));
    };

    match <[Value; 2]>::try_from(pair) {
        Ok([time, Value::Object(fields)]) => Ok(Entry {
            time: parse_time(&time)?,
            record: Record::new(fields),
        }),
        _ => Err(RecordError::shape("forward entry must be [time, record]")),
    }
}

fn parse_time(value: &Value) -> Result<EventTime, RecordError> {
    value
        .as_f64()
        .map(EventTime::from_secs)
        .ok_or_else(|| RecordError::shape("event time must be a number"))
}

const fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
