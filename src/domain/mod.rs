//! Domain value objects and pure logic.
//!
//! This module contains the phone number normalizer, the country rule
//! table it is configured with, and the people/address query types.
//! Nothing here performs I/O.

pub mod country;
pub mod errors;
pub mod normalizer;
pub mod query;

pub use country::{AreaCodeRule, CountryRule, CountryRules, LengthRule};
pub use errors::ValidationErrorKind;
pub use normalizer::{
    clean, format, format_for_wire, CleanedNumber, PhoneNormalizer, ValidationResult,
};
pub use query::{AddressQuery, PeopleQuery};
