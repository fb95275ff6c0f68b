//! MCP tool handlers for the lookup server.
//!
//! This module implements all the MCP tools using the rmcp SDK's tool_router pattern.
//! Lookups always answer with an envelope serialized as JSON text; bad input
//! becomes a failed envelope rather than a protocol error.

use crate::domain::{self, AddressQuery, PeopleQuery};
use crate::error::InputError;
use crate::metrics::Metrics;
use crate::models::SearchEnvelope;
use crate::services::LookupService;
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::*;
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::borrow::Cow;
use std::sync::Arc;

/// The MCP server that exposes phone, people and address lookups.
#[derive(Clone)]
pub struct LookupMcpServer {
    service: Arc<dyn LookupService>,
    metrics: Metrics,
    tool_router: ToolRouter<Self>,
}

// Implement ServerHandler using the tool_handler macro
#[tool_handler]
impl ServerHandler for LookupMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities {
                tools: Some(Default::default()),
                ..Default::default()
            },
            server_info: Implementation {
                name: "people-lookup-mcp".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                icons: None,
                title: None,
                website_url: None,
            },
            instructions: Some("MCP server for reverse phone, people and address lookups - validates and formats phone numbers, then searches the lookup API with automatic host fallback.".into()),
        }
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
struct PhoneParams {
    /// Raw phone number as typed, e.g. "(408) 234-5678"
    phone_number: String,
    /// ISO-2 country code; the server default applies when omitted
    #[serde(default)]
    country: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct PeopleParams {
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: String,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    state: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct AddressParams {
    street: String,
    city: String,
    state: String,
    #[serde(default)]
    zip_code: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
enum SegmentKind {
    People,
    Address,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct DecodePathParams {
    kind: SegmentKind,
    /// URL path segment such as "Jane_Doe_Austin_TX"
    segment: String,
}

// Helper function to convert errors to MCP errors
fn to_mcp_error(e: impl std::fmt::Display) -> McpError {
    McpError {
        code: ErrorCode::INTERNAL_ERROR,
        message: Cow::from(e.to_string()),
        data: None,
    }
}

fn json_result(value: &impl Serialize) -> Result<CallToolResult, McpError> {
    Ok(CallToolResult::success(vec![Content::text(
        serde_json::to_string_pretty(value).map_err(to_mcp_error)?,
    )]))
}

fn failed_envelope(message: impl Into<String>) -> Value {
    json!(SearchEnvelope::<()>::failed(message))
}

/// Bad input answers with a failed envelope carrying the user-facing message.
fn rejected(e: InputError) -> Result<CallToolResult, McpError> {
    tracing::debug!("Rejected input: {}", e);
    json_result(&failed_envelope(e.to_string()))
}

fn people_query(params: &PeopleParams) -> Result<PeopleQuery, InputError> {
    Ok(PeopleQuery::new(
        &params.first_name,
        &params.last_name,
        params.city.as_deref(),
        params.state.as_deref(),
    )?)
}

fn address_query(params: &AddressParams) -> Result<AddressQuery, InputError> {
    Ok(AddressQuery::new(
        &params.street,
        &params.city,
        &params.state,
        params.zip_code.as_deref(),
    )?)
}

impl LookupMcpServer {
    fn country_or_default<'a>(&'a self, country: &'a Option<String>) -> &'a str {
        country
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| self.service.default_country())
    }

    fn validate_payload(&self, params: &PhoneParams) -> Value {
        let country = self.country_or_default(&params.country);
        let result = self
            .service
            .normalizer()
            .validate(&params.phone_number, Some(country));

        json!({
            "country": country,
            "is_valid": result.is_valid,
            "error": result.error,
            "kind": result.kind,
            "cleaned": result.cleaned,
            "formatted": domain::format(&params.phone_number),
        })
    }

    fn format_payload(&self, params: &PhoneParams) -> Value {
        let country = self.country_or_default(&params.country);
        let normalizer = self.service.normalizer();

        json!({
            "country": country,
            "display": domain::format(&params.phone_number),
            "national": normalizer.format_national(&params.phone_number, country),
            "wire": normalizer.format_for_wire_in(&params.phone_number, country),
            "detected_country": normalizer.country_for_number(&params.phone_number).code,
        })
    }

    fn decode_payload(params: &DecodePathParams) -> Value {
        let decoded = match params.kind {
            SegmentKind::People => PeopleQuery::from_path_segment(&params.segment)
                .map(|q| json!({ "query": q, "query_params": q.to_query_params() })),
            SegmentKind::Address => AddressQuery::from_path_segment(&params.segment)
                .map(|q| json!({ "query": q, "query_params": q.to_query_params() })),
        };

        match decoded {
            Ok(value) => json!(SearchEnvelope::ok(value)),
            Err(e) => failed_envelope(e.to_string()),
        }
    }

    fn countries_payload(&self) -> Value {
        let countries: Vec<Value> = self
            .service
            .normalizer()
            .rules()
            .iter()
            .map(|rule| {
                json!({
                    "code": rule.code,
                    "name": rule.name,
                    "dial_code": rule.dial_code,
                    "example": rule.example,
                    "min_digits": rule.length.min(),
                    "max_digits": rule.length.max(),
                })
            })
            .collect();

        json!({
            "default_country": self.service.default_country(),
            "countries": countries,
        })
    }
}

// Tool router implementation
#[tool_router]
impl LookupMcpServer {
    /// Create a new lookup MCP server.
    pub fn new(service: Arc<dyn LookupService>, metrics: Metrics) -> Self {
        Self {
            service,
            metrics,
            tool_router: Self::tool_router(),
        }
    }

    /// Validate a phone number against a country's rules.
    #[tool(
        description = "Validate a phone number for a country (default from server config). Returns is_valid, the error message and kind when invalid, the cleaned digits and a display format."
    )]
    async fn validate_phone_number(
        &self,
        params: Parameters<PhoneParams>,
    ) -> Result<CallToolResult, McpError> {
        json_result(&self.validate_payload(&params.0))
    }

    /// Format a phone number for display and for the lookup API.
    #[tool(
        description = "Format a phone number: display form, national form for the country, and the +dial wire form sent to the lookup API."
    )]
    async fn format_phone_number(
        &self,
        params: Parameters<PhoneParams>,
    ) -> Result<CallToolResult, McpError> {
        json_result(&self.format_payload(&params.0))
    }

    /// Reverse phone lookup.
    #[tool(
        description = "Reverse phone lookup: location, carrier and line type for a number. Invalid numbers are rejected before any request; if the lookup API is unreachable a clearly labelled fallback result is returned."
    )]
    async fn lookup_phone(
        &self,
        params: Parameters<PhoneParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        tracing::info!("MCP Handler: lookup_phone called");

        match self
            .service
            .lookup_phone(&params.phone_number, params.country.as_deref())
            .await
        {
            Ok(outcome) => json_result(&outcome),
            Err(e) => rejected(e),
        }
    }

    /// People search by name and optional location.
    #[tool(
        description = "Search people by first and/or last name, optionally narrowed by city and state. Returns matching person records with addresses, phone numbers and relatives."
    )]
    async fn search_people(
        &self,
        params: Parameters<PeopleParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!("MCP Handler: search_people called");
        match people_query(&params.0) {
            Ok(query) => json_result(&self.service.search_people(&query).await),
            Err(e) => rejected(e),
        }
    }

    /// Property search by street address.
    #[tool(
        description = "Search a property by street address, city and state (zip optional). Returns owner, estimated value, tax, sale history and residents."
    )]
    async fn search_address(
        &self,
        params: Parameters<AddressParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!("MCP Handler: search_address called");
        match address_query(&params.0) {
            Ok(query) => json_result(&self.service.search_address(&query).await),
            Err(e) => rejected(e),
        }
    }

    /// Background report for a person.
    #[tool(
        description = "Background check report for a person by name and optional location. When the API cannot answer, a report labelled source=demo is returned instead."
    )]
    async fn background_check(
        &self,
        params: Parameters<PeopleParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!("MCP Handler: background_check called");
        match people_query(&params.0) {
            Ok(query) => json_result(&self.service.background_check(&query).await),
            Err(e) => rejected(e),
        }
    }

    /// Decode a result-page URL segment back into a query.
    #[tool(
        description = "Decode a search results URL segment (underscore-separated fields, e.g. Jane_Doe_Austin_TX) into a people or address query."
    )]
    async fn decode_search_path(
        &self,
        params: Parameters<DecodePathParams>,
    ) -> Result<CallToolResult, McpError> {
        json_result(&Self::decode_payload(&params.0))
    }

    /// Supported countries and their number rules.
    #[tool(description = "List supported countries with dial codes, example numbers and digit limits")]
    async fn list_countries(&self) -> Result<CallToolResult, McpError> {
        json_result(&self.countries_payload())
    }

    /// Lookup API health plus client counters.
    #[tool(
        description = "Check lookup API health and report host fallback and cache statistics. Also purges expired cache entries."
    )]
    async fn api_health(&self) -> Result<CallToolResult, McpError> {
        let health = self.service.health().await;
        let purged = self.service.purge_expired();

        json_result(&json!({
            "health": health,
            "metrics": self.metrics.summary(),
            "purged_cache_entries": purged,
        }))
    }
}
