//! Application service layer.
//!
//! Services contain the lookup workflow and sit between the MCP handlers
//! and the search client.

pub mod demo;
mod lookup_service;

pub use lookup_service::{Cacheable, LookupOutcome, LookupService, LookupServiceImpl};
