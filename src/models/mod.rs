//! Data models for lookup API payloads.
//!
//! Response bodies are typed structs with optional fields instead of loose
//! JSON. Absent data deserializes to `None`/empty and is displayed with the
//! [`UNKNOWN`] sentinel.

pub mod address;
pub mod background;
pub mod common;
pub mod envelope;
pub mod health;
pub mod people;
pub mod phone;

pub use address::{AddressSearchResponse, PropertyRecord};
pub use background::BackgroundReport;
pub use common::{PersonPhone, PostalAddress, QueryEcho};
pub use envelope::{display_or_unknown, ReportsSuccess, SearchEnvelope, UNKNOWN};
pub use health::HealthStatus;
pub use people::{PeopleSearchResponse, PersonRecord};
pub use phone::{LineType, PhoneInfo};
