//! Reverse phone lookup payload.

use super::envelope::ReportsSuccess;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Line type reported for a number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineType {
    Mobile,
    Landline,
    TollFree,
    Voip,
    #[default]
    #[serde(other)]
    Unknown,
}

/// Response body of `GET /api/search/phone/{number}/`.
///
/// Every field is optional; the backend omits what it cannot determine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhoneInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatted_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carrier: Option<String>,
    pub line_type: LineType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area_code: Option<String>,
    /// `phonenumbers`, `cache`, `fallback`, ...
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub cached: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affiliate_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Set locally when the result is handed to a caller
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_timestamp: Option<String>,
}

impl PhoneInfo {
    pub fn is_fallback(&self) -> bool {
        self.source.as_deref() == Some("fallback")
    }
}

// The phone endpoint reports `valid` rather than `success`.
impl ReportsSuccess for PhoneInfo {
    fn declared_success(body: &Value) -> bool {
        body.get("success")
            .or_else(|| body.get("valid"))
            .and_then(Value::as_bool)
            .unwrap_or(true)
    }
}
