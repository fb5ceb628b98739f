//! Provider payload construction.
//!
//! Maps a [`Record`] into the JSON document accepted by the StackDriver
//! custom metrics gateway:
//!
//! ```json
//! {"timestamp": 1700000000, "proto_version": 1,
//!  "data": {"collected_at": 1700000000, "name": "cpu_usage", "value": 42.5}}
//! ```

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::record::Record;

/// Gateway protocol version written into every payload.
pub const PROTO_VERSION: u32 = 1;

/// Cloud provider whose payload format is produced.
///
/// Only GCE is implemented. Unknown names are mapped to it by
/// [`CloudType::normalize`] at configuration time, never per record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CloudType {
    /// Google Compute Engine format
    #[default]
    Gce,
}

impl CloudType {
    /// Resolves a configured name, falling back to the default for unknown names.
    ///
    /// The second element is true when the fallback was taken.
    #[must_use]
    pub fn normalize(name: &str) -> (Self, bool) {
        name.parse::<Self>()
            .map_or_else(|_| (Self::default(), true), |cloud| (cloud, false))
    }

    /// Canonical lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Gce => "gce",
        }
    }
}

impl fmt::Display for CloudType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a cloud type name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown cloud type '{0}'")]
pub struct UnknownCloudType(pub String);

impl FromStr for CloudType {
    type Err = UnknownCloudType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gce" => Ok(Self::Gce),
            _ => Err(UnknownCloudType(s.to_string())),
        }
    }
}

/// The document sent as the request body.
///
/// Field order is the wire order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Payload {
    /// Record timestamp (`@timestamp`)
    pub timestamp: Value,
    /// Always [`PROTO_VERSION`]
    pub proto_version: u32,
    /// Metric sample
    pub data: PayloadData,
}

/// The nested `data` object of a [`Payload`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayloadData {
    /// Collection time, same as the payload timestamp
    pub collected_at: Value,
    /// Metric name
    pub name: Value,
    /// Metric value
    pub value: Value,
}

impl Payload {
    /// Serializes the payload as compact JSON.
    ///
    /// # Errors
    ///
    /// Returns an error only if a contained value cannot be represented as JSON.
    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

/// Builds payloads for a fixed cloud type.
#[derive(Debug, Clone, Copy, Default)]
pub struct PayloadBuilder {
    cloud_type: CloudType,
}

impl PayloadBuilder {
    /// Creates a builder for the given cloud type.
    #[must_use]
    pub const fn new(cloud_type: CloudType) -> Self {
        Self { cloud_type }
    }

    /// Maps a record to a payload.
    ///
    /// Missing `name`, `value` or `@timestamp` fields become `null`.
    #[must_use]
    pub fn build(&self, record: &Record) -> Payload {
        match self.cloud_type {
            CloudType::Gce => gce_payload(record),
        }
    }
}

fn gce_payload(record: &Record) -> Payload {
    let timestamp = record.timestamp().clone();
    Payload {
        data: PayloadData {
            collected_at: timestamp.clone(),
            name: record.name().clone(),
            value: record.value().clone(),
        },
        timestamp,
        proto_version: PROTO_VERSION,
    }
}
