//! Substitute payloads shown when the lookup API cannot answer.
//!
//! Both are clearly labelled through their `source` field so callers can
//! tell them apart from real data.

use crate::domain::{PeopleQuery, PhoneNormalizer};
use crate::models::background::{CriminalSummary, Subject};
use crate::models::{BackgroundReport, LineType, PersonPhone, PhoneInfo, PostalAddress, QueryEcho};
use chrono::{DateTime, Utc};
use serde_json::json;

pub const FALLBACK_SOURCE: &str = "fallback";
pub const DEMO_SOURCE: &str = "demo";

/// Minimal phone payload built from the input alone.
pub fn fallback_phone_info(
    normalizer: &PhoneNormalizer,
    input: &str,
    country: &str,
    now: DateTime<Utc>,
) -> PhoneInfo {
    let rule = normalizer.rules().get(country);

    PhoneInfo {
        number: Some(normalizer.format_for_wire_in(input, country)),
        formatted_number: Some(normalizer.format_national(input, country)),
        valid: Some(true),
        country_code: rule.map(|r| r.code.to_string()),
        country_name: Some(rule.map_or("Unknown", |r| r.name).to_string()),
        location: Some("API temporarily unavailable".to_string()),
        carrier: Some("Information not available".to_string()),
        line_type: LineType::Unknown,
        source: Some(FALLBACK_SOURCE.to_string()),
        cached: false,
        error: Some("Using fallback data - limited information available".to_string()),
        search_timestamp: Some(now.to_rfc3339()),
        ..PhoneInfo::default()
    }
}

/// Sample background report for `query`, dated `now`.
pub fn demo_background_report(query: &PeopleQuery, now: DateTime<Utc>) -> BackgroundReport {
    let first = query.first_name.to_lowercase();
    let last = query.last_name.to_lowercase();
    let city = non_empty_or(&query.city, "New York");
    let state = non_empty_or(&query.state, "NY");

    BackgroundReport {
        success: true,
        query: Some(QueryEcho {
            first_name: Some(query.first_name.clone()),
            last_name: Some(query.last_name.clone()),
            city: Some(query.city.clone()).filter(|c| !c.is_empty()),
            state: Some(query.state.clone()).filter(|s| !s.is_empty()),
            full_name: Some(query.full_name()),
        }),
        subject: Some(Subject {
            name: Some(query.full_name()),
            age: Some("35-40".to_string()),
            current_address: Some(PostalAddress {
                street: Some("123 Main Street".to_string()),
                city: Some(city.to_string()),
                state: Some(state.to_string()),
                ..PostalAddress::default()
            }),
            aliases: Vec::new(),
        }),
        criminal_records: Some(CriminalSummary {
            summary: Some("No serious criminal records found".to_string()),
            records_found: 0,
            details: Vec::new(),
        }),
        court_records: json!({
            "civil_cases": 1,
            "details": [{
                "type": "Civil Case",
                "case_number": "CV-2019-12345",
                "court": "County Superior Court",
                "status": "Closed"
            }]
        }),
        phone_numbers: vec![PersonPhone {
            number: "(555) 123-4567".to_string(),
            kind: Some("Mobile".to_string()),
            carrier: None,
        }],
        email_addresses: vec![format!("{}.{}@email.com", first, last)],
        relatives: Vec::new(),
        employment_history: vec![json!({
            "company": "Tech Corp Inc.",
            "position": "Senior Developer",
            "location": format!("{}, {}", city, state)
        })],
        education: Vec::new(),
        sex_offender_check: Some("Clear - Not on registry".to_string()),
        report_date: Some(now.date_naive().to_string()),
        source: Some(DEMO_SOURCE.to_string()),
        cached: false,
        affiliate_url: None,
        message: Some(
            "This is demo data. Connect a real background check API for production use."
                .to_string(),
        ),
    }
}

fn non_empty_or<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.trim().is_empty() {
        default
    } else {
        value
    }
}
