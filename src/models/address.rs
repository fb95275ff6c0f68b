//! Address (property) search payload.

use super::envelope::ReportsSuccess;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Free-form fact sheet (`"year_built": 1987`, `"school_rating": "8/10"`).
pub type FactSheet = BTreeMap<String, Value>;

/// Response body of `GET /api/search/address/`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddressSearchResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property: Option<PropertyRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub cached: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affiliate_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ReportsSuccess for AddressSearchResponse {}

/// Everything known about one property.
///
/// The fact sheets (`value`, `tax_info`, `details`, `neighborhood`) are
/// kept as key/value maps because the backend adds and drops keys freely.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<PropertyAddress>,
    pub value: FactSheet,
    pub tax_info: FactSheet,
    pub details: FactSheet,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<PropertyOwner>,
    pub residents: Vec<Resident>,
    pub sale_history: Vec<SaleEvent>,
    pub past_residents: Vec<Resident>,
    pub neighborhood: FactSheet,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyAddress {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub county: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatted: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyOwner {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ownership_years: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mailing_address: Option<String>,
}

impl PropertyOwner {
    /// Initials for the owner avatar, e.g. `JJD` for `John & Jane Doe`.
    pub fn initials(&self) -> String {
        self.name
            .as_deref()
            .unwrap_or_default()
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .filter(|c| c.is_alphabetic())
            .collect()
    }
}

/// Current or past resident.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Resident {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_range: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length_of_residence: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub years_lived: Option<String>,
    pub phone_numbers: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaleEvent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}
