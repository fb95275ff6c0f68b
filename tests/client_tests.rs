//! Integration tests for the SearchClient using mockito for HTTP mocking.

use mockito::{Matcher, Server};
use people_lookup_mcp::client::{AsyncSearchClient, AsyncSearchClientImpl, EndpointTemplate};
use people_lookup_mcp::domain::{AddressQuery, PeopleQuery};
use people_lookup_mcp::models::{HealthStatus, LineType, PhoneInfo};
use people_lookup_mcp::{SearchClient, SearchEnvelope};
use std::net::TcpListener;
use std::time::{Duration, Instant};

const PHONE_PATH: &str = r"^/api/search/phone/(%2B|\+)14082345678/$";

/// A bound port that accepts connections into the backlog but never answers.
fn silent_host() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    (listener, url)
}

/// A port nothing listens on.
fn closed_host() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);
    url
}

fn phone_body() -> &'static str {
    r#"{
        "number": "+14082345678",
        "formatted_number": "+1 408-234-5678",
        "valid": true,
        "country_code": "US",
        "country_name": "United States",
        "location": "San Jose, CA",
        "carrier": "Verizon Wireless",
        "line_type": "mobile",
        "source": "phonenumbers",
        "cached": false
    }"#
}

#[test]
fn test_primary_500_falls_back_to_secondary() {
    let mut primary = Server::new();
    let mut secondary = Server::new();

    let failing = primary
        .mock("GET", Matcher::Regex(PHONE_PATH.into()))
        .with_status(500)
        .with_body("Internal Server Error")
        .create();

    let answering = secondary
        .mock("GET", Matcher::Regex(PHONE_PATH.into()))
        .match_header("accept", "application/json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(phone_body())
        .create();

    let client = SearchClient::with_hosts(vec![primary.url(), secondary.url()]);
    let envelope = client.lookup_phone("+14082345678");

    failing.assert();
    answering.assert();
    assert!(envelope.success);
    assert_eq!(envelope.error, None);

    let info = envelope.data.unwrap();
    assert_eq!(info.location.as_deref(), Some("San Jose, CA"));
    assert_eq!(info.line_type, LineType::Mobile);

    let metrics = client.metrics().summary();
    assert_eq!(metrics.host_attempts_total, 2);
    assert_eq!(metrics.host_failures_total, 1);
    assert_eq!(metrics.fallback_hosts_used_total, 1);
}

#[test]
fn test_first_success_stops_the_loop() {
    let mut primary = Server::new();
    let mut secondary = Server::new();

    let answering = primary
        .mock("GET", Matcher::Regex(PHONE_PATH.into()))
        .with_status(200)
        .with_body(phone_body())
        .create();

    let untouched = secondary
        .mock("GET", Matcher::Any)
        .expect(0)
        .create();

    let client = SearchClient::with_hosts(vec![primary.url(), secondary.url()]);
    let envelope = client.lookup_phone("+14082345678");

    answering.assert();
    untouched.assert();
    assert!(envelope.success);
    assert_eq!(client.metrics().fallback_hosts_used_total(), 0);
}

#[test]
fn test_all_hosts_fail_phone() {
    let mut primary = Server::new();
    let mut secondary = Server::new();

    let m1 = primary
        .mock("GET", Matcher::Any)
        .with_status(503)
        .expect(1)
        .create();
    let m2 = secondary
        .mock("GET", Matcher::Any)
        .with_status(404)
        .expect(1)
        .create();

    let client = SearchClient::with_hosts(vec![primary.url(), secondary.url()]);
    let envelope = client.lookup_phone("+14082345678");

    m1.assert();
    m2.assert();
    assert_eq!(
        envelope,
        SearchEnvelope::failed("Unable to fetch data")
    );
}

#[test]
fn test_invalid_json_counts_as_host_failure() {
    let mut primary = Server::new();
    let mut secondary = Server::new();

    primary
        .mock("GET", Matcher::Any)
        .with_status(200)
        .with_body("<html>not json</html>")
        .create();
    secondary
        .mock("GET", Matcher::Any)
        .with_status(200)
        .with_body(r#"{"status": "healthy", "version": "1.0.0"}"#)
        .create();

    let client = SearchClient::with_hosts(vec![primary.url(), secondary.url()]);
    let envelope = client.health();

    assert!(envelope.success);
    assert_eq!(envelope.data.unwrap().version.as_deref(), Some("1.0.0"));
}

#[test]
fn test_body_declared_failure_is_no_results() {
    let mut primary = Server::new();
    let mut secondary = Server::new();

    let answering = primary
        .mock("GET", "/api/search/people/")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("first_name".into(), "Jane".into()),
            Matcher::UrlEncoded("last_name".into(), "Doe".into()),
            Matcher::UrlEncoded("city".into(), "Austin".into()),
            Matcher::UrlEncoded("state".into(), "TX".into()),
        ]))
        .match_header("content-type", "application/json")
        .with_status(200)
        .with_body(r#"{"success": false, "error": "No records"}"#)
        .create();

    // A 2xx answer is final even when it reports failure.
    let untouched = secondary.mock("GET", Matcher::Any).expect(0).create();

    let query = PeopleQuery::new("Jane", "Doe", Some("Austin"), Some("TX")).unwrap();
    let client = SearchClient::with_hosts(vec![primary.url(), secondary.url()]);
    let envelope = client.search_people(&query);

    answering.assert();
    untouched.assert();
    assert_eq!(envelope, SearchEnvelope::failed("No results found"));
}

#[test]
fn test_people_search_success() {
    let mut server = Server::new();

    let mock = server
        .mock("GET", "/api/search/people/")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("first_name".into(), "Mary Ann".into()),
            Matcher::UrlEncoded("last_name".into(), "Smith".into()),
        ]))
        .with_status(200)
        .with_body(
            r#"{
            "success": true,
            "query": {"full_name": "Mary Ann Smith"},
            "results": [{
                "name": "Mary Ann Smith",
                "age": 42,
                "current_address": {"street": "1 Main St", "city": "Austin", "state": "TX", "zip": "78701"},
                "phone_numbers": [{"number": "(512) 555-0101", "type": "Mobile"}],
                "relatives": ["John Smith"]
            }],
            "total_results": 1,
            "source": "mock_data"
        }"#,
        )
        .create();

    let query = PeopleQuery::new("Mary Ann", "Smith", None, None).unwrap();
    let client = SearchClient::with_hosts(vec![server.url()]);
    let envelope = client.search_people(&query);

    mock.assert();
    let response = envelope.data.expect("people data");
    assert_eq!(response.result_count(), 1);
    let person = &response.results[0];
    assert_eq!(person.age.as_deref(), Some("42"));
    assert_eq!(person.phone_numbers[0].kind.as_deref(), Some("Mobile"));
    assert_eq!(
        person.current_address.as_ref().unwrap().one_line(),
        "1 Main St, Austin, TX 78701"
    );
}

#[test]
fn test_address_search_all_hosts_fail_is_no_results() {
    let client = SearchClient::with_hosts(vec![closed_host(), closed_host()]);
    let query = AddressQuery::new("1 Main St", "Austin", "TX", None).unwrap();

    let envelope = client.search_address(&query);

    assert_eq!(envelope, SearchEnvelope::failed("No results found"));
    let metrics = client.metrics().summary();
    assert_eq!(metrics.host_failures_total, 2);
    assert_eq!(metrics.host_timeouts_total, 0);
}

#[test]
fn test_silent_primary_times_out_then_secondary_answers() {
    let (_listener, silent) = silent_host();
    let mut secondary = Server::new();

    secondary
        .mock("GET", Matcher::Regex(PHONE_PATH.into()))
        .with_status(200)
        .with_body(phone_body())
        .create();

    let client = SearchClient::with_hosts(vec![silent, secondary.url()])
        .with_timeouts(Duration::from_millis(300), Duration::from_millis(300));

    let start = Instant::now();
    let envelope = client.lookup_phone("+14082345678");
    let elapsed = start.elapsed();

    assert!(envelope.success);
    assert!(elapsed >= Duration::from_millis(300), "elapsed {:?}", elapsed);
    assert!(elapsed < Duration::from_secs(3), "elapsed {:?}", elapsed);
    assert_eq!(client.metrics().summary().host_timeouts_total, 1);
}

#[test]
fn test_both_hosts_time_out_within_budget() {
    let (_l1, first) = silent_host();
    let (_l2, second) = silent_host();

    let per_host = Duration::from_millis(250);
    let client = SearchClient::with_hosts(vec![first, second]).with_timeouts(per_host, per_host);

    let start = Instant::now();
    let envelope = client.lookup_phone("+14082345678");
    let elapsed = start.elapsed();

    assert_eq!(envelope, SearchEnvelope::failed("Unable to fetch data"));
    // Two sequential timeouts, never a hang.
    assert!(elapsed >= per_host * 2, "elapsed {:?}", elapsed);
    assert!(elapsed < client.budget(per_host) + Duration::from_secs(2));
    assert_eq!(client.metrics().summary().host_timeouts_total, 2);
}

#[test]
fn test_custom_template_search() {
    let mut server = Server::new();

    let mock = server
        .mock("GET", "/health-check/")
        .with_status(200)
        .with_body(r#"{"status": "degraded"}"#)
        .create();

    let client = SearchClient::with_hosts(vec![format!("{}/", server.url())]);
    let envelope: SearchEnvelope<HealthStatus> = client.search(
        "",
        &EndpointTemplate::new("/health-check/{query}"),
        Duration::from_secs(2),
        "Search failed",
    );

    mock.assert();
    assert_eq!(envelope, SearchEnvelope::failed("No results found"));
}

#[tokio::test]
async fn test_async_client_fallback() {
    let mut primary = Server::new_async().await;
    let mut secondary = Server::new_async().await;

    primary
        .mock("GET", Matcher::Any)
        .with_status(502)
        .create_async()
        .await;
    secondary
        .mock("GET", Matcher::Regex(PHONE_PATH.into()))
        .with_status(200)
        .with_body(r#"{"success": true, "location": "San Jose, CA"}"#)
        .create_async()
        .await;

    let client = AsyncSearchClientImpl::new(SearchClient::with_hosts(vec![
        primary.url(),
        secondary.url(),
    ]));
    let envelope = client.lookup_phone("+14082345678").await;

    let info: PhoneInfo = envelope.data.expect("phone data");
    assert_eq!(info.location.as_deref(), Some("San Jose, CA"));
    assert_eq!(info.success, Some(true));
}

#[tokio::test]
async fn test_async_background_search_exhausted() {
    let client = AsyncSearchClientImpl::new(SearchClient::with_hosts(vec![closed_host()]));
    let query = PeopleQuery::new("Jane", "Doe", None, None).unwrap();

    let envelope = client.search_background(&query).await;

    assert!(!envelope.success);
    assert_eq!(envelope.error.as_deref(), Some("No results found"));
}
