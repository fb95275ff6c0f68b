//! Lookup service layer.
//!
//! Validates input, consults the cache, runs the search and substitutes
//! labelled payloads when the API cannot answer.

use super::demo::{demo_background_report, fallback_phone_info};
use crate::cache::{CacheKey, LookupCache, LookupKind};
use crate::client::{AsyncSearchClient, NO_RESULTS};
use crate::domain::{AddressQuery, PeopleQuery, PhoneNormalizer};
use crate::error::InputError;
use crate::metrics::Metrics;
use crate::models::{
    AddressSearchResponse, BackgroundReport, HealthStatus, PeopleSearchResponse, PhoneInfo,
    SearchEnvelope,
};
use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Payloads that carry a `cached` flag.
pub trait Cacheable: Clone + Send + Sync {
    fn mark_cached(&mut self);
}

macro_rules! impl_cacheable {
    ($($ty:ty),*) => {
        $(impl Cacheable for $ty {
            fn mark_cached(&mut self) {
                self.cached = true;
            }
        })*
    };
}

impl_cacheable!(PhoneInfo, PeopleSearchResponse, AddressSearchResponse, BackgroundReport);

/// A search result plus how it was obtained.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LookupOutcome<T> {
    #[serde(flatten)]
    pub envelope: SearchEnvelope<T>,
    pub cache_hit: bool,
    /// `data` is a fallback or demo payload, not an API answer
    pub used_fallback: bool,
    /// The API's failure message when `used_fallback` is set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream_error: Option<String>,
}

impl<T> LookupOutcome<T> {
    fn answered(envelope: SearchEnvelope<T>) -> Self {
        Self {
            envelope,
            cache_hit: false,
            used_fallback: false,
            upstream_error: None,
        }
    }

    fn substituted(data: T, upstream_error: Option<String>) -> Self {
        Self {
            envelope: SearchEnvelope::ok(data),
            cache_hit: false,
            used_fallback: true,
            upstream_error,
        }
    }
}

/// Lookup service trait for business operations.
#[async_trait]
pub trait LookupService: Send + Sync {
    fn normalizer(&self) -> &PhoneNormalizer;

    /// Country assumed when a lookup names none.
    fn default_country(&self) -> &str;

    /// Validate, wire-format and look up a phone number.
    ///
    /// Invalid input is rejected without a request. When no host answers,
    /// a fallback payload is returned with `used_fallback` set.
    async fn lookup_phone(
        &self,
        input: &str,
        country: Option<&str>,
    ) -> Result<LookupOutcome<PhoneInfo>, InputError>;

    async fn search_people(&self, query: &PeopleQuery) -> LookupOutcome<PeopleSearchResponse>;

    async fn search_address(&self, query: &AddressQuery)
        -> LookupOutcome<AddressSearchResponse>;

    /// Background report; a demo report stands in when the API fails.
    async fn background_check(&self, query: &PeopleQuery) -> LookupOutcome<BackgroundReport>;

    async fn health(&self) -> SearchEnvelope<HealthStatus>;

    /// Drop expired cache entries, returning how many were removed.
    fn purge_expired(&self) -> usize;
}

/// Default implementation of LookupService.
pub struct LookupServiceImpl {
    client: Arc<dyn AsyncSearchClient>,
    normalizer: PhoneNormalizer,
    default_country: String,
    phone_cache: LookupCache<PhoneInfo>,
    people_cache: LookupCache<PeopleSearchResponse>,
    address_cache: LookupCache<AddressSearchResponse>,
    background_cache: LookupCache<BackgroundReport>,
    metrics: Metrics,
}

impl LookupServiceImpl {
    /// Create a new lookup service.
    pub fn new(
        client: Arc<dyn AsyncSearchClient>,
        normalizer: PhoneNormalizer,
        default_country: impl Into<String>,
        cache_ttl: Duration,
        metrics: Metrics,
    ) -> Self {
        Self {
            client,
            normalizer,
            default_country: default_country.into(),
            phone_cache: LookupCache::new(cache_ttl),
            people_cache: LookupCache::new(cache_ttl),
            address_cache: LookupCache::new(cache_ttl),
            background_cache: LookupCache::new(cache_ttl),
            metrics,
        }
    }

    /// Serve from `cache` or run `fetch`, storing successful answers.
    async fn cached<T, Fut>(
        &self,
        cache: &LookupCache<T>,
        key: CacheKey,
        fetch: Fut,
    ) -> LookupOutcome<T>
    where
        T: Cacheable,
        Fut: Future<Output = SearchEnvelope<T>> + Send,
    {
        if let Some(mut hit) = cache.get(&key) {
            self.metrics.record_cache_access(true);
            tracing::debug!("Cache hit for {:?}", key);
            hit.mark_cached();
            return LookupOutcome {
                cache_hit: true,
                ..LookupOutcome::answered(SearchEnvelope::ok(hit))
            };
        }
        self.metrics.record_cache_access(false);

        let envelope = fetch.await;
        if envelope.success {
            if let Some(data) = &envelope.data {
                cache.insert(key, data.clone());
            }
        }
        LookupOutcome::answered(envelope)
    }
}

#[async_trait]
impl LookupService for LookupServiceImpl {
    fn normalizer(&self) -> &PhoneNormalizer {
        &self.normalizer
    }

    fn default_country(&self) -> &str {
        &self.default_country
    }

    async fn lookup_phone(
        &self,
        input: &str,
        country: Option<&str>,
    ) -> Result<LookupOutcome<PhoneInfo>, InputError> {
        let country = country
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(&self.default_country);

        let validation = self.normalizer.validate(input, Some(country));
        if let (Some(kind), Some(message)) = (validation.kind, validation.error) {
            return Err(InputError::InvalidPhone { kind, message });
        }

        let wire = self.normalizer.format_for_wire_in(input, country);
        tracing::info!("Phone lookup for {} ({})", wire, country);

        let outcome = self
            .cached(
                &self.phone_cache,
                CacheKey::phone(&wire),
                self.client.lookup_phone(&wire),
            )
            .await;

        if outcome.envelope.success {
            let now = Utc::now().to_rfc3339();
            return Ok(LookupOutcome {
                envelope: outcome.envelope.map(|mut info| {
                    info.search_timestamp = Some(now);
                    info
                }),
                ..outcome
            });
        }

        // A host answered that the number is unknown; that is not an outage.
        if outcome.envelope.error.as_deref() == Some(NO_RESULTS) {
            return Ok(outcome);
        }

        tracing::warn!(
            "Phone lookup failed ({}), serving fallback data",
            outcome.envelope.error.as_deref().unwrap_or("unknown error")
        );
        let fallback = fallback_phone_info(&self.normalizer, input, country, Utc::now());
        Ok(LookupOutcome::substituted(fallback, outcome.envelope.error))
    }

    async fn search_people(&self, query: &PeopleQuery) -> LookupOutcome<PeopleSearchResponse> {
        tracing::info!("People search for {}", query.full_name());
        self.cached(
            &self.people_cache,
            CacheKey::new(LookupKind::People, query.to_path_segment()),
            self.client.search_people(query),
        )
        .await
    }

    async fn search_address(
        &self,
        query: &AddressQuery,
    ) -> LookupOutcome<AddressSearchResponse> {
        tracing::info!("Address search for {}", query.one_line());
        self.cached(
            &self.address_cache,
            CacheKey::new(LookupKind::Address, query.to_path_segment()),
            self.client.search_address(query),
        )
        .await
    }

    async fn background_check(&self, query: &PeopleQuery) -> LookupOutcome<BackgroundReport> {
        tracing::info!("Background check for {}", query.full_name());
        let outcome = self
            .cached(
                &self.background_cache,
                CacheKey::new(LookupKind::Background, query.to_path_segment()),
                self.client.search_background(query),
            )
            .await;

        if outcome.envelope.success {
            return outcome;
        }

        tracing::warn!("Background check unavailable, serving demo report");
        LookupOutcome::substituted(
            demo_background_report(query, Utc::now()),
            outcome.envelope.error,
        )
    }

    async fn health(&self) -> SearchEnvelope<HealthStatus> {
        self.client.health().await
    }

    fn purge_expired(&self) -> usize {
        let removed = self.phone_cache.purge_expired()
            + self.people_cache.purge_expired()
            + self.address_cache.purge_expired()
            + self.background_cache.purge_expired();
        tracing::debug!("Purged {} expired cache entries", removed);
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CountryRules, ValidationErrorKind};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Answers phone lookups from a fixed envelope and counts calls.
    struct FixedClient {
        phone: SearchEnvelope<PhoneInfo>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl AsyncSearchClient for FixedClient {
        async fn lookup_phone(&self, wire_number: &str) -> SearchEnvelope<PhoneInfo> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.phone.clone().map(|mut info| {
                info.number = Some(wire_number.to_string());
                info
            })
        }

        async fn search_people(&self, _: &PeopleQuery) -> SearchEnvelope<PeopleSearchResponse> {
            SearchEnvelope::failed(NO_RESULTS)
        }

        async fn search_address(&self, _: &AddressQuery) -> SearchEnvelope<AddressSearchResponse> {
            SearchEnvelope::failed(NO_RESULTS)
        }

        async fn search_background(&self, _: &PeopleQuery) -> SearchEnvelope<BackgroundReport> {
            SearchEnvelope::failed(NO_RESULTS)
        }

        async fn health(&self) -> SearchEnvelope<HealthStatus> {
            SearchEnvelope::failed("Unable to fetch data")
        }
    }

    fn service(phone: SearchEnvelope<PhoneInfo>) -> (LookupServiceImpl, Arc<FixedClient>) {
        let client = Arc::new(FixedClient {
            phone,
            calls: AtomicUsize::new(0),
        });
        let service = LookupServiceImpl::new(
            client.clone(),
            PhoneNormalizer::new(CountryRules::standard()),
            "US",
            Duration::from_secs(60),
            Metrics::new(),
        );
        (service, client)
    }

    #[tokio::test]
    async fn test_invalid_number_is_rejected_without_request() {
        let (service, client) = service(SearchEnvelope::ok(PhoneInfo::default()));

        let err = service.lookup_phone("123", None).await.unwrap_err();
        assert!(matches!(
            err,
            InputError::InvalidPhone {
                kind: ValidationErrorKind::TooShort,
                ..
            }
        ));
        assert_eq!(client.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_second_lookup_is_cached() {
        let (service, client) = service(SearchEnvelope::ok(PhoneInfo::default()));

        let first = service.lookup_phone("408-234-5678", None).await.unwrap();
        assert!(!first.cache_hit);
        assert!(first.envelope.data.as_ref().unwrap().search_timestamp.is_some());

        let second = service.lookup_phone("(408) 234-5678", Some("us")).await.unwrap();
        assert!(second.cache_hit);
        assert!(second.envelope.data.unwrap().cached);
        assert_eq!(client.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_outage_serves_fallback() {
        let (service, _) = service(SearchEnvelope::failed("Unable to fetch data"));

        let outcome = service.lookup_phone("4082345678", None).await.unwrap();
        assert!(outcome.envelope.success);
        assert!(outcome.used_fallback);
        assert_eq!(outcome.upstream_error.as_deref(), Some("Unable to fetch data"));
        assert!(outcome.envelope.data.unwrap().is_fallback());
        assert_eq!(service.purge_expired(), 0);
    }

    #[tokio::test]
    async fn test_not_found_is_not_an_outage() {
        let (service, _) = service(SearchEnvelope::failed(NO_RESULTS));

        let outcome = service.lookup_phone("4082345678", None).await.unwrap();
        assert!(!outcome.envelope.success);
        assert!(!outcome.used_fallback);
        assert_eq!(outcome.envelope.error.as_deref(), Some(NO_RESULTS));
    }

    #[tokio::test]
    async fn test_background_check_demo_substitute() {
        let (service, _) = service(SearchEnvelope::failed("Unable to fetch data"));
        let query = PeopleQuery::new("Jane", "Doe", None, Some("TX")).unwrap();

        let outcome = service.background_check(&query).await;
        assert!(outcome.used_fallback);
        assert_eq!(outcome.upstream_error.as_deref(), Some(NO_RESULTS));
        assert!(outcome.envelope.data.unwrap().is_demo());
    }
}
