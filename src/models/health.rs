//! Lookup API health status.

use super::envelope::ReportsSuccess;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Response body of `GET /api/health/`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthStatus {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub supported_countries: Vec<String>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

impl ReportsSuccess for HealthStatus {
    fn declared_success(body: &Value) -> bool {
        body.get("status").and_then(Value::as_str) == Some("healthy")
    }
}
