//! Async wrapper around synchronous SearchClient.
//!
//! This module provides an async interface to the synchronous SearchClient by using
//! `tokio::task::spawn_blocking` to run HTTP operations on a dedicated thread pool,
//! preventing blocking of the async runtime.

use super::deadline::with_deadline;
use crate::client::SearchClient;
use crate::domain::{AddressQuery, PeopleQuery};
use crate::models::*;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Envelope error when the blocking task overran its budget or panicked.
pub const SEARCH_FAILED: &str = "Search failed";

/// Async wrapper trait for lookup operations.
///
/// Every method resolves to an envelope; nothing here returns `Err`.
#[async_trait]
pub trait AsyncSearchClient: Send + Sync {
    async fn lookup_phone(&self, wire_number: &str) -> SearchEnvelope<PhoneInfo>;
    async fn search_people(&self, query: &PeopleQuery) -> SearchEnvelope<PeopleSearchResponse>;
    async fn search_address(&self, query: &AddressQuery)
        -> SearchEnvelope<AddressSearchResponse>;
    async fn search_background(&self, query: &PeopleQuery) -> SearchEnvelope<BackgroundReport>;
    async fn health(&self) -> SearchEnvelope<HealthStatus>;
}

/// Async wrapper around synchronous SearchClient.
///
/// Uses `tokio::task::spawn_blocking` to run synchronous HTTP
/// operations on a dedicated thread pool. Each call is bounded by the
/// client's worst case budget for its endpoint.
#[derive(Clone)]
pub struct AsyncSearchClientImpl {
    client: Arc<SearchClient>,
}

impl AsyncSearchClientImpl {
    pub fn new(client: SearchClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    pub fn inner(&self) -> &SearchClient {
        &self.client
    }

    async fn run<T, F>(&self, budget: Duration, op: F) -> SearchEnvelope<T>
    where
        T: Send + 'static,
        F: FnOnce(&SearchClient) -> SearchEnvelope<T> + Send + 'static,
    {
        let client = self.client.clone();
        let task = tokio::task::spawn_blocking(move || op(&client));

        match with_deadline(budget, task).await {
            Ok(Ok(envelope)) => envelope,
            Ok(Err(e)) => {
                tracing::error!("Lookup task join error: {}", e);
                SearchEnvelope::failed(SEARCH_FAILED)
            }
            Err(e) => {
                tracing::warn!("Lookup abandoned: {}", e);
                SearchEnvelope::failed(SEARCH_FAILED)
            }
        }
    }
}

#[async_trait]
impl AsyncSearchClient for AsyncSearchClientImpl {
    async fn lookup_phone(&self, wire_number: &str) -> SearchEnvelope<PhoneInfo> {
        let wire_number = wire_number.to_string();
        let budget = self.client.budget(self.client.phone_timeout());

        self.run(budget, move |client| client.lookup_phone(&wire_number))
            .await
    }

    async fn search_people(&self, query: &PeopleQuery) -> SearchEnvelope<PeopleSearchResponse> {
        let query = query.clone();
        let budget = self.client.budget(self.client.page_timeout());

        self.run(budget, move |client| client.search_people(&query))
            .await
    }

    async fn search_address(
        &self,
        query: &AddressQuery,
    ) -> SearchEnvelope<AddressSearchResponse> {
        let query = query.clone();
        let budget = self.client.budget(self.client.page_timeout());

        self.run(budget, move |client| client.search_address(&query))
            .await
    }

    async fn search_background(&self, query: &PeopleQuery) -> SearchEnvelope<BackgroundReport> {
        let query = query.clone();
        let budget = self.client.budget(self.client.page_timeout());

        self.run(budget, move |client| client.search_background(&query))
            .await
    }

    async fn health(&self) -> SearchEnvelope<HealthStatus> {
        let budget = self.client.budget(self.client.phone_timeout());

        self.run(budget, |client| client.health()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Config;

    #[tokio::test]
    async fn test_async_client_creation() {
        let client = SearchClient::new(&Config::default());
        let async_client = AsyncSearchClientImpl::new(client);

        // Should be able to clone
        let cloned = async_client.clone();
        assert_eq!(cloned.inner().hosts().len(), 2);
    }

    #[tokio::test]
    async fn test_budget_overrun_degrades_to_failed() {
        let client = SearchClient::with_hosts(Vec::new());
        let async_client = AsyncSearchClientImpl::new(client);

        let envelope: SearchEnvelope<()> = async_client
            .run(Duration::from_millis(20), |_| {
                std::thread::sleep(Duration::from_millis(300));
                SearchEnvelope::ok(())
            })
            .await;

        assert!(!envelope.success);
        assert_eq!(envelope.error.as_deref(), Some(SEARCH_FAILED));
    }

    #[tokio::test]
    async fn test_panicking_task_degrades_to_failed() {
        let async_client = AsyncSearchClientImpl::new(SearchClient::with_hosts(Vec::new()));

        let envelope: SearchEnvelope<()> = async_client
            .run(Duration::from_secs(1), |_| panic!("boom"))
            .await;

        assert_eq!(envelope.error.as_deref(), Some(SEARCH_FAILED));
    }

    #[tokio::test]
    async fn test_no_hosts_phone_lookup() {
        let async_client = AsyncSearchClientImpl::new(SearchClient::with_hosts(Vec::new()));
        let envelope = async_client.lookup_phone("+14082345678").await;
        assert_eq!(envelope.error.as_deref(), Some("Unable to fetch data"));
    }
}
