//! The controller response envelope.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

fn default_message() -> String {
    "OK".to_string()
}

/// The wire envelope every controller endpoint answers with.
///
/// `DATA` arrives as a list for bulk endpoints and a lone object for
/// single-resource ones; [`records()`](Self::records) normalizes both to
/// a record list so callers never branch on the shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControllerResponse {
    #[serde(rename = "DATA", default)]
    pub data: Value,
    #[serde(rename = "MESSAGE", default = "default_message")]
    pub message: String,
    #[serde(rename = "METHOD")]
    pub method: String,
    #[serde(rename = "REQUEST_PATH")]
    pub request_path: String,
    #[serde(rename = "RETURN_CODE")]
    pub return_code: u16,
}

impl ControllerResponse {
    /// Whether the controller reported success (200 or 201).
    pub fn is_success(&self) -> bool {
        matches!(self.return_code, 200 | 201)
    }

    /// `DATA` as a list of records: a list passes through (objects
    /// only), a lone object wraps into a one-element list, anything else
    /// is empty.
    pub fn records(&self) -> Vec<Map<String, Value>> {
        match &self.data {
            Value::Array(items) => items
                .iter()
                .filter_map(|item| item.as_object().cloned())
                .collect(),
            Value::Object(record) => vec![record.clone()],
            _ => Vec::new(),
        }
    }

    /// Number of non-empty records in `DATA`.
    pub fn record_count(&self) -> usize {
        self.records().iter().filter(|r| !r.is_empty()).count()
    }

    /// Build a success envelope around a record list, e.g. for a query
    /// answered by local filtering of a bulk response.
    pub fn from_records(
        records: Vec<Map<String, Value>>,
        method: &str,
        request_path: &str,
    ) -> Self {
        Self {
            data: Value::Array(records.into_iter().map(Value::Object).collect()),
            message: default_message(),
            method: method.to_string(),
            request_path: request_path.to_string(),
            return_code: 200,
        }
    }

    /// Whether a raw JSON body already carries the envelope fields.
    pub(crate) fn has_envelope(value: &Value) -> bool {
        value.as_object().is_some_and(|obj| {
            ["MESSAGE", "METHOD", "REQUEST_PATH", "RETURN_CODE"]
                .iter()
                .all(|field| obj.contains_key(*field))
        })
    }
}
