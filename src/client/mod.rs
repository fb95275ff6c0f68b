//! HTTP client for the lookup API.
//!
//! This module provides a synchronous HTTP client that can be used from async contexts
//! via `tokio::task::spawn_blocking`. Every search runs against an ordered list
//! of hosts; the first host that answers with a 2xx JSON body wins and the
//! caller always receives a [`SearchEnvelope`], never a transport error.

mod async_wrapper;
mod deadline;
mod endpoint;
mod fallback;

pub use async_wrapper::{AsyncSearchClient, AsyncSearchClientImpl};
pub use deadline::{with_deadline, DeadlineExceeded};
pub use endpoint::EndpointTemplate;
pub use fallback::try_in_order;

use crate::config::Config;
use crate::domain::{AddressQuery, PeopleQuery};
use crate::error::{LookupError, LookupResult};
use crate::metrics::Metrics;
use crate::models::{
    AddressSearchResponse, BackgroundReport, HealthStatus, PeopleSearchResponse, PhoneInfo,
    ReportsSuccess, SearchEnvelope,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Envelope error when a body answers but reports no match.
pub const NO_RESULTS: &str = "No results found";

/// Envelope error when no host could serve a phone lookup.
pub const UNABLE_TO_FETCH: &str = "Unable to fetch data";

const PHONE_TIMEOUT: Duration = Duration::from_secs(5);
const PAGE_TIMEOUT: Duration = Duration::from_secs(10);

/// A host that answered 2xx with a JSON body.
struct Answer<T> {
    declared_success: bool,
    data: T,
}

/// HTTP client for the lookup API.
///
/// This client uses `ureq` for synchronous HTTP requests and can be called
/// from async contexts using `tokio::task::spawn_blocking`.
#[derive(Clone)]
pub struct SearchClient {
    /// Base URLs, tried in order
    hosts: Vec<String>,

    /// HTTP client agent
    agent: Arc<ureq::Agent>,

    /// Per-host timeout for phone lookups
    phone_timeout: Duration,

    /// Per-host timeout for people/address/background searches
    page_timeout: Duration,

    /// Metrics collector
    metrics: Metrics,
}

impl SearchClient {
    /// Create a new SearchClient from configuration.
    pub fn new(config: &Config) -> Self {
        Self::build(
            config.api_hosts.clone(),
            config.phone_timeout(),
            config.page_timeout(),
        )
    }

    /// Create a SearchClient with custom hosts (useful for testing).
    #[doc(hidden)]
    pub fn with_hosts(hosts: Vec<String>) -> Self {
        Self::build(hosts, PHONE_TIMEOUT, PAGE_TIMEOUT)
    }

    /// Override both per-host timeouts.
    pub fn with_timeouts(mut self, phone: Duration, page: Duration) -> Self {
        self.phone_timeout = phone;
        self.page_timeout = page;
        self
    }

    fn build(hosts: Vec<String>, phone_timeout: Duration, page_timeout: Duration) -> Self {
        // Per-request timeouts are set on each call; the agent only bounds connects.
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(page_timeout.max(phone_timeout))
            .build();

        Self {
            hosts,
            agent: Arc::new(agent),
            phone_timeout,
            page_timeout,
            metrics: Metrics::new(),
        }
    }

    pub fn hosts(&self) -> &[String] {
        &self.hosts
    }

    pub fn phone_timeout(&self) -> Duration {
        self.phone_timeout
    }

    pub fn page_timeout(&self) -> Duration {
        self.page_timeout
    }

    /// Get a reference to the metrics collector.
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Worst case wall time of one search with `timeout` per host.
    pub fn budget(&self, timeout: Duration) -> Duration {
        timeout * self.hosts.len().max(1) as u32 + Duration::from_secs(1)
    }

    /// Run one search over every host in order.
    ///
    /// Non-2xx statuses, transport errors, timeouts and bodies that fail to
    /// decode all count as "this host failed" and move on to the next host.
    /// The first host that answers decides the outcome: its body's declared
    /// success flag becomes the envelope's. When every host fails the
    /// envelope carries `exhausted_message`.
    pub fn search<T>(
        &self,
        query: &str,
        template: &EndpointTemplate,
        timeout: Duration,
        exhausted_message: &str,
    ) -> SearchEnvelope<T>
    where
        T: DeserializeOwned + ReportsSuccess,
    {
        let outcome = try_in_order(self.hosts.iter(), |index, host| {
            let url = template.url_for(host, query);
            let start = Instant::now();
            let result = self.fetch::<T>(&url, timeout);
            let duration = start.elapsed();

            match &result {
                Ok(_) => tracing::debug!("GET {} - host {} answered in {:?}", url, index, duration),
                Err(e) => tracing::debug!("GET {} - host {} failed: {}", url, index, e),
            }
            self.metrics.record_host_attempt(
                duration,
                result.is_err(),
                result.as_ref().err().is_some_and(LookupError::is_timeout),
            );

            result
        });

        match outcome {
            Ok((index, answer)) => {
                self.metrics
                    .record_search(answer.declared_success, Some(index));
                if answer.declared_success {
                    SearchEnvelope::ok(answer.data)
                } else {
                    SearchEnvelope::failed(NO_RESULTS)
                }
            }
            Err(failures) => {
                tracing::warn!(
                    "All {} lookup hosts failed for {}: {}",
                    failures.len(),
                    template.as_str(),
                    failures
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join("; ")
                );
                self.metrics.record_search(false, None);
                SearchEnvelope::failed(exhausted_message)
            }
        }
    }

    /// Reverse lookup for a wire-formatted number such as `+14082345678`.
    pub fn lookup_phone(&self, wire_number: &str) -> SearchEnvelope<PhoneInfo> {
        let encoded = urlencoding::encode(wire_number);
        self.search(
            &encoded,
            &EndpointTemplate::phone(),
            self.phone_timeout,
            UNABLE_TO_FETCH,
        )
    }

    pub fn search_people(&self, query: &PeopleQuery) -> SearchEnvelope<PeopleSearchResponse> {
        self.search(
            &query.to_query_params(),
            &EndpointTemplate::people(),
            self.page_timeout,
            NO_RESULTS,
        )
    }

    pub fn search_address(&self, query: &AddressQuery) -> SearchEnvelope<AddressSearchResponse> {
        self.search(
            &query.to_query_params(),
            &EndpointTemplate::address(),
            self.page_timeout,
            NO_RESULTS,
        )
    }

    pub fn search_background(&self, query: &PeopleQuery) -> SearchEnvelope<BackgroundReport> {
        self.search(
            &query.to_query_params(),
            &EndpointTemplate::background(),
            self.page_timeout,
            NO_RESULTS,
        )
    }

    /// Health of the first host that responds.
    pub fn health(&self) -> SearchEnvelope<HealthStatus> {
        self.search(
            "",
            &EndpointTemplate::health(),
            self.phone_timeout,
            UNABLE_TO_FETCH,
        )
    }

    /// GET one URL and decode the body as `T`.
    fn fetch<T>(&self, url: &str, timeout: Duration) -> LookupResult<Answer<T>>
    where
        T: DeserializeOwned + ReportsSuccess,
    {
        let response = self
            .agent
            .get(url)
            .set("Content-Type", "application/json")
            .set("Accept", "application/json")
            .timeout(timeout)
            .call()
            .map_err(|e| Self::map_error(e, url))?;

        let body = response.into_string().map_err(Self::map_io_error)?;
        let value: Value = serde_json::from_str(&body)?;
        let declared_success = T::declared_success(&value);
        let data = serde_json::from_value::<T>(value)?;

        Ok(Answer {
            declared_success,
            data,
        })
    }

    /// Map a ureq error to a LookupError.
    fn map_error(error: ureq::Error, url: &str) -> LookupError {
        match error {
            ureq::Error::Status(code, _) => LookupError::BadStatus {
                status: code,
                url: url.to_string(),
            },
            ureq::Error::Transport(transport) => {
                if transport.kind() == ureq::ErrorKind::ConnectionFailed {
                    LookupError::Network("Connection failed".to_string())
                } else if transport.kind() == ureq::ErrorKind::Io {
                    let io_kind = std::error::Error::source(&transport)
                        .and_then(|source| source.downcast_ref::<io::Error>())
                        .map(io::Error::kind);
                    match io_kind {
                        Some(kind) if !Self::is_timeout_kind(kind) => {
                            LookupError::Network(transport.to_string())
                        }
                        _ => LookupError::Timeout,
                    }
                } else {
                    LookupError::Network(transport.to_string())
                }
            }
        }
    }

    /// Reading the body can also hit the request deadline.
    fn map_io_error(error: io::Error) -> LookupError {
        if Self::is_timeout_kind(error.kind()) {
            LookupError::Timeout
        } else {
            LookupError::Network(error.to_string())
        }
    }

    fn is_timeout_kind(kind: io::ErrorKind) -> bool {
        matches!(kind, io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock)
    }
}

impl std::fmt::Debug for SearchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchClient")
            .field("hosts", &self.hosts)
            .field("phone_timeout", &self.phone_timeout)
            .field("page_timeout", &self.page_timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_from_config() {
        let client = SearchClient::new(&Config::default());
        assert_eq!(client.hosts().len(), 2);
        assert_eq!(client.phone_timeout(), Duration::from_secs(5));
        assert_eq!(client.page_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_budget_scales_with_hosts() {
        let client = SearchClient::with_hosts(vec![
            "http://a.invalid".to_string(),
            "http://b.invalid".to_string(),
        ]);
        assert_eq!(
            client.budget(Duration::from_secs(5)),
            Duration::from_secs(11)
        );

        let empty = SearchClient::with_hosts(Vec::new());
        assert_eq!(empty.budget(Duration::from_secs(5)), Duration::from_secs(6));
    }

    #[test]
    fn test_no_hosts_is_exhausted() {
        let client = SearchClient::with_hosts(Vec::new());
        let envelope = client.lookup_phone("+14082345678");
        assert!(!envelope.success);
        assert_eq!(envelope.error.as_deref(), Some(UNABLE_TO_FETCH));
        assert_eq!(client.metrics().searches_total(), 1);
        assert_eq!(client.metrics().host_attempts_total(), 0);
    }

    #[test]
    fn test_map_status_error() {
        let io_err = io::Error::new(io::ErrorKind::TimedOut, "read timed out");
        assert!(SearchClient::map_io_error(io_err).is_timeout());

        let io_err = io::Error::new(io::ErrorKind::ConnectionReset, "reset");
        assert!(matches!(
            SearchClient::map_io_error(io_err),
            LookupError::Network(_)
        ));
    }
}
