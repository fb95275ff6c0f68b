use async_trait::async_trait;
use people_lookup_mcp::client::AsyncSearchClient;
use people_lookup_mcp::domain::{AddressQuery, PeopleQuery};
use people_lookup_mcp::models::{
    AddressSearchResponse, BackgroundReport, HealthStatus, PeopleSearchResponse, PhoneInfo,
};
use people_lookup_mcp::SearchEnvelope;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Mock search client for testing.
///
/// Answers every search from configurable envelopes (failing by default)
/// and tracks method calls and the queries it received.
#[allow(dead_code)]
#[derive(Clone)]
pub struct MockSearchClient {
    phone: Arc<Mutex<SearchEnvelope<PhoneInfo>>>,
    people: Arc<Mutex<SearchEnvelope<PeopleSearchResponse>>>,
    address: Arc<Mutex<SearchEnvelope<AddressSearchResponse>>>,
    background: Arc<Mutex<SearchEnvelope<BackgroundReport>>>,
    call_counts: Arc<Mutex<HashMap<String, usize>>>,
    received: Arc<Mutex<Vec<String>>>,
}

#[allow(dead_code)]
impl MockSearchClient {
    /// Create a mock where every search reports an outage.
    pub fn new() -> Self {
        Self {
            phone: Arc::new(Mutex::new(SearchEnvelope::failed("Unable to fetch data"))),
            people: Arc::new(Mutex::new(SearchEnvelope::failed("No results found"))),
            address: Arc::new(Mutex::new(SearchEnvelope::failed("No results found"))),
            background: Arc::new(Mutex::new(SearchEnvelope::failed("No results found"))),
            call_counts: Arc::new(Mutex::new(HashMap::new())),
            received: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn set_phone(&self, envelope: SearchEnvelope<PhoneInfo>) {
        *self.phone.lock().unwrap() = envelope;
    }

    pub fn set_people(&self, envelope: SearchEnvelope<PeopleSearchResponse>) {
        *self.people.lock().unwrap() = envelope;
    }

    pub fn set_address(&self, envelope: SearchEnvelope<AddressSearchResponse>) {
        *self.address.lock().unwrap() = envelope;
    }

    pub fn set_background(&self, envelope: SearchEnvelope<BackgroundReport>) {
        *self.background.lock().unwrap() = envelope;
    }

    /// Get the number of times a method was called.
    pub fn get_call_count(&self, method: &str) -> usize {
        let counts = self.call_counts.lock().unwrap();
        *counts.get(method).unwrap_or(&0)
    }

    /// Queries received, wire numbers for phone lookups and query strings otherwise.
    pub fn received(&self) -> Vec<String> {
        self.received.lock().unwrap().clone()
    }

    fn record(&self, method: &str, query: String) {
        *self
            .call_counts
            .lock()
            .unwrap()
            .entry(method.to_string())
            .or_insert(0) += 1;
        self.received.lock().unwrap().push(query);
    }
}

impl Default for MockSearchClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AsyncSearchClient for MockSearchClient {
    async fn lookup_phone(&self, wire_number: &str) -> SearchEnvelope<PhoneInfo> {
        self.record("lookup_phone", wire_number.to_string());
        self.phone.lock().unwrap().clone()
    }

    async fn search_people(&self, query: &PeopleQuery) -> SearchEnvelope<PeopleSearchResponse> {
        self.record("search_people", query.to_query_params());
        self.people.lock().unwrap().clone()
    }

    async fn search_address(&self, query: &AddressQuery) -> SearchEnvelope<AddressSearchResponse> {
        self.record("search_address", query.to_query_params());
        self.address.lock().unwrap().clone()
    }

    async fn search_background(&self, query: &PeopleQuery) -> SearchEnvelope<BackgroundReport> {
        self.record("search_background", query.to_query_params());
        self.background.lock().unwrap().clone()
    }

    async fn health(&self) -> SearchEnvelope<HealthStatus> {
        self.record("health", String::new());
        SearchEnvelope::ok(HealthStatus {
            status: "healthy".to_string(),
            ..HealthStatus::default()
        })
    }
}
