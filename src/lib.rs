//! People Lookup MCP Server - phone number normalization and multi-host
//! people/phone/address search exposed over the Model Context Protocol.
//!
//! # Architecture
//!
//! - **domain**: Phone normalizer, country rule table, search queries (pure logic)
//! - **models**: Typed lookup API payloads and the `SearchEnvelope` result wrapper
//! - **client**: Blocking HTTP client with ordered host fallback, plus an async wrapper
//! - **services**: Lookup workflow with caching and fallback payloads
//! - **cache**: TTL cache for successful lookups
//! - **metrics**: Host attempt and cache counters
//! - **server**: MCP tools
//! - **config** / **error**: Environment configuration and error types

pub mod cache;
pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod models;
pub mod server;
pub mod services;

// Re-export commonly used types
pub use client::SearchClient;
pub use config::Config;
pub use domain::{PhoneNormalizer, ValidationResult};
pub use error::{ConfigError, InputError, LookupError, QueryError};
pub use metrics::{Metrics, MetricsSummary};
pub use models::SearchEnvelope;
pub use server::LookupMcpServer;
