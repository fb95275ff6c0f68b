//! People search payload.

use super::common::{string_or_number, PersonPhone, PostalAddress, QueryEcho};
use super::envelope::ReportsSuccess;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Response body of `GET /api/search/people/`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeopleSearchResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<QueryEcho>,
    pub results: Vec<PersonRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_results: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub cached: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affiliate_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ReportsSuccess for PeopleSearchResponse {}

impl PeopleSearchResponse {
    pub fn result_count(&self) -> usize {
        self.total_results
            .map(|n| n as usize)
            .unwrap_or(self.results.len())
    }
}

/// One matched person.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Often an age range such as `35-40`
    #[serde(
        deserialize_with = "string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub age: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_address: Option<PostalAddress>,
    pub phone_numbers: Vec<PersonPhone>,
    pub relatives: Vec<String>,
    pub email_addresses: Vec<String>,
    pub past_addresses: Vec<PostalAddress>,
    /// Network name to profile URL
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub social_media: BTreeMap<String, String>,
}
