#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Normalized flood alert records.
//!
//! The public feed is loosely typed: any field may be missing, `null`, or
//! of an unexpected JSON type, and coordinates sometimes arrive as numeric
//! strings. [`AlertRecord::from_value`] maps whatever it finds onto optional
//! fields and never fails.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Placeholder shown when a record carries no location.
pub const LOCATION_PLACEHOLDER: &str = "Location data pending";

/// Placeholder shown when a record carries no status.
pub const STATUS_PLACEHOLDER: &str = "Monitoring";

const LOCATION_FIELDS: &[&str] = &["location", "station", "name"];
const STATUS_FIELDS: &[&str] = &["status", "observation", "level"];
const LATITUDE_FIELDS: &[&str] = &["latitude", "lat"];
const LONGITUDE_FIELDS: &[&str] = &["longitude", "lng", "lon"];

/// One entry of the alert feed. Absent fields mean "unknown".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertRecord {
    pub location: Option<String>,
    pub status: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl AlertRecord {
    /// Builds a record from one raw feed entry.
    ///
    /// Each field is taken from the first candidate key holding a usable
    /// value. Non-object entries produce an all-`None` record.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        Self {
            location: first_string(value, LOCATION_FIELDS),
            status: first_string(value, STATUS_FIELDS),
            latitude: first_number(value, LATITUDE_FIELDS),
            longitude: first_number(value, LONGITUDE_FIELDS),
        }
    }

    /// Location text, or [`LOCATION_PLACEHOLDER`].
    #[must_use]
    pub fn location_or_placeholder(&self) -> &str {
        self.location.as_deref().unwrap_or(LOCATION_PLACEHOLDER)
    }

    /// Status text, or [`STATUS_PLACEHOLDER`].
    #[must_use]
    pub fn status_or_placeholder(&self) -> &str {
        self.status.as_deref().unwrap_or(STATUS_PLACEHOLDER)
    }

    /// Both coordinates, when the record has them.
    #[must_use]
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }
}

/// Extracts `result.records` from a datastore response envelope.
///
/// A missing `result` or `records`, or a `records` that isn't an array,
/// yields an empty list.
#[must_use]
pub fn records_from_envelope(body: &Value) -> Vec<AlertRecord> {
    body.get("result")
        .and_then(|r| r.get("records"))
        .and_then(Value::as_array)
        .map(|records| records.iter().map(AlertRecord::from_value).collect())
        .unwrap_or_default()
}

fn first_string(value: &Value, fields: &[&str]) -> Option<String> {
    fields.iter().find_map(|field| match value.get(field)? {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        _ => None,
    })
}

fn first_number(value: &Value, fields: &[&str]) -> Option<f64> {
    fields.iter().find_map(|field| {
        let n = match value.get(field)? {
            Value::Number(n) => n.as_f64()?,
            Value::String(s) => s.trim().parse::<f64>().ok()?,
            _ => return None,
        };
        n.is_finite().then_some(n)
    })
}
