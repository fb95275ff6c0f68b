//! MCP server implementation for people lookups.
//!
//! This module provides the MCP protocol server that exposes the phone
//! normalizer and lookup service to AI assistants through the Model Context Protocol.

pub mod handlers;

pub use handlers::LookupMcpServer;

use anyhow::Result;
use rmcp::transport::io::stdio;
use rmcp::ServiceExt;

/// Run the lookup MCP server with stdio transport.
///
/// Communicates via stdin/stdout using the MCP protocol and returns once
/// the client disconnects.
pub async fn run_server(server: LookupMcpServer) -> Result<()> {
    let service = server.serve(stdio()).await?;

    service.waiting().await?;

    Ok(())
}
