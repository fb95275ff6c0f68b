//! Caching of lookup results.

pub mod lookup_cache;

pub use lookup_cache::{CacheKey, LookupCache, LookupKind};
