//! The uniform result wrapper returned by every search.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Shown wherever an optional field is absent.
pub const UNKNOWN: &str = "Unknown";

/// Display helper for optional string fields.
pub fn display_or_unknown(value: &Option<String>) -> &str {
    value
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or(UNKNOWN)
}

/// `{ success, data, error }`, the only shape callers ever receive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchEnvelope<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> SearchEnvelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> SearchEnvelope<U> {
        SearchEnvelope {
            success: self.success,
            data: self.data.map(f),
            error: self.error,
        }
    }
}

/// How a response body declares its own success.
///
/// HTTP 2xx only means the host answered; the body decides whether the
/// lookup found anything.
pub trait ReportsSuccess {
    fn declared_success(body: &Value) -> bool {
        body.get("success").and_then(Value::as_bool).unwrap_or(false)
    }
}
