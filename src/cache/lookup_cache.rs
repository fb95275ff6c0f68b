//! In-memory cache of successful lookups.
//!
//! Entries expire after a fixed TTL. Expired entries are never returned and
//! are dropped on the next insert or [`LookupCache::purge_expired`].

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

/// Which search produced a cached value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupKind {
    Phone,
    People,
    Address,
    Background,
}

/// Cache key: the search kind plus its canonical query text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    kind: LookupKind,
    query: String,
}

impl CacheKey {
    pub fn new(kind: LookupKind, query: impl Into<String>) -> Self {
        Self {
            kind,
            query: query.into(),
        }
    }

    pub fn phone(wire_number: &str) -> Self {
        Self::new(LookupKind::Phone, wire_number)
    }

    pub fn kind(&self) -> LookupKind {
        self.kind
    }
}

#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    stored_at: Instant,
}

/// A thread-safe TTL cache shared across clones.
#[derive(Clone)]
pub struct LookupCache<V: Clone> {
    entries: Arc<RwLock<HashMap<CacheKey, Entry<V>>>>,
    ttl: Duration,
}

impl<V: Clone> LookupCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Store `value`, replacing any previous entry for `key`.
    ///
    /// Expired entries are swept first so the map only grows with live queries.
    pub fn insert(&self, key: CacheKey, value: V) {
        let ttl = self.ttl;
        if let Ok(mut entries) = self.entries.write() {
            entries.retain(|_, entry| entry.stored_at.elapsed() < ttl);
            entries.insert(
                key,
                Entry {
                    value,
                    stored_at: Instant::now(),
                },
            );
        }
    }

    /// The value for `key` if present and younger than the TTL.
    pub fn get(&self, key: &CacheKey) -> Option<V> {
        let entries = self.entries.read().ok()?;
        entries
            .get(key)
            .filter(|entry| entry.stored_at.elapsed() < self.ttl)
            .map(|entry| entry.value.clone())
    }

    /// Drop every expired entry and return how many were removed.
    pub fn purge_expired(&self) -> usize {
        let ttl = self.ttl;
        match self.entries.write() {
            Ok(mut entries) => {
                let before = entries.len();
                entries.retain(|_, entry| entry.stored_at.elapsed() < ttl);
                before - entries.len()
            }
            Err(_) => 0,
        }
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl<V: Clone> fmt::Debug for LookupCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LookupCache")
            .field("ttl", &self.ttl)
            .field("entries", &self.len())
            .finish()
    }
}
