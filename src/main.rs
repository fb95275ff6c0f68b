//! People Lookup MCP Server - Main entry point
//!
//! Wires configuration, the search client and the lookup service into an
//! MCP server on stdio.

use anyhow::Result;
use people_lookup_mcp::client::{AsyncSearchClient, AsyncSearchClientImpl};
use people_lookup_mcp::domain::CountryRules;
use people_lookup_mcp::services::{LookupService, LookupServiceImpl};
use people_lookup_mcp::{Config, LookupMcpServer, PhoneNormalizer, SearchClient};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    // Initialize logging (stderr only to avoid polluting stdout/MCP communication)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!(
        "Starting People Lookup MCP Server with hosts: {}",
        config.api_hosts.join(", ")
    );

    let sync_client = SearchClient::new(&config);
    let metrics = sync_client.metrics().clone();
    let client = Arc::new(AsyncSearchClientImpl::new(sync_client)) as Arc<dyn AsyncSearchClient>;

    let cache_ttl = config.cache_ttl();
    let service = Arc::new(LookupServiceImpl::new(
        client,
        PhoneNormalizer::new(CountryRules::standard()),
        config.default_country.clone(),
        cache_ttl,
        metrics.clone(),
    )) as Arc<dyn LookupService>;

    let server = LookupMcpServer::new(service, metrics);

    info!(
        "Cache TTL: {} minutes, default country: {}",
        config.cache_ttl_minutes, config.default_country
    );

    // Run the server (this will block until the server exits)
    info!("Starting MCP server with stdio transport");
    if let Err(e) = people_lookup_mcp::server::run_server(server).await {
        error!("MCP server error: {}", e);
        return Err(e);
    }

    info!("People Lookup MCP Server shutdown complete");
    Ok(())
}
