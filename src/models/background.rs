//! Background check report.

use super::common::{string_or_number, PersonPhone, PostalAddress, QueryEcho};
use super::envelope::ReportsSuccess;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Response body of `GET /api/search/background/`.
///
/// Court and employment sections are passed through untyped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundReport {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<QueryEcho>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<Subject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub criminal_records: Option<CriminalSummary>,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub court_records: Value,
    pub phone_numbers: Vec<PersonPhone>,
    pub email_addresses: Vec<String>,
    pub relatives: Vec<String>,
    pub employment_history: Vec<Value>,
    pub education: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sex_offender_check: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub cached: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affiliate_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ReportsSuccess for BackgroundReport {}

impl BackgroundReport {
    pub fn is_demo(&self) -> bool {
        matches!(self.source.as_deref(), Some("demo") | Some("mock_data"))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Subject {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        deserialize_with = "string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub age: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_address: Option<PostalAddress>,
    pub aliases: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CriminalSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub records_found: u32,
    pub details: Vec<Value>,
}
