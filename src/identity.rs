//! Identity token normalization.
//!
//! Host identity tokens arrive in several GUID spellings (`{ABC-...}`,
//! `abc...`, upper/lower case). Comparison goes through a canonical form:
//! braces and hyphens stripped, lowercased.
//!
//! Normalization runs once per person per render, so results are memoized in
//! a bounded cache. When the cache reaches capacity the older half of its
//! entries is dropped.

use std::collections::{HashMap, VecDeque};
use std::sync::{LazyLock, Mutex, MutexGuard};

use regex::Regex;

use crate::config::DEFAULT_IDENTITY_CACHE_CAPACITY;

/// Braced/parenthesised, hyphenated or compact 32-hex GUID.
static GUID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^[{(]?[0-9a-f]{8}-?[0-9a-f]{4}-?[0-9a-f]{4}-?[0-9a-f]{4}-?[0-9a-f]{12}[)}]?$",
    )
    .unwrap()
});

/// Canonical form without touching any cache.
pub fn canonicalize(token: &str) -> String {
    token
        .chars()
        .filter(|c| !matches!(c, '{' | '}' | '-'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Whether `token` looks like a GUID in any of the accepted spellings.
pub fn is_valid_guid(token: &str) -> bool {
    GUID_RE.is_match(token)
}

#[derive(Debug, Default)]
struct NormalizationCache {
    entries: HashMap<String, String>,
    /// Insertion order, oldest first.
    order: VecDeque<String>,
}

impl NormalizationCache {
    fn evict_older_half(&mut self) -> usize {
        let drop = self.order.len() / 2;
        for key in self.order.drain(..drop) {
            self.entries.remove(&key);
        }
        drop
    }
}

/// Memoizing normalizer, constructed once per process and shared by reference.
#[derive(Debug)]
pub struct IdentityNormalizer {
    capacity: usize,
    cache: Mutex<NormalizationCache>,
}

impl Default for IdentityNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_IDENTITY_CACHE_CAPACITY)
    }
}

impl IdentityNormalizer {
    /// `capacity` is clamped to at least 2 so eviction always frees space.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(2),
            cache: Mutex::new(NormalizationCache::default()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Canonical form of `token`, memoized.
    pub fn normalize(&self, token: &str) -> String {
        let mut cache = self.lock();
        if let Some(hit) = cache.entries.get(token) {
            return hit.clone();
        }

        let normalized = canonicalize(token);

        if cache.entries.len() >= self.capacity {
            let evicted = cache.evict_older_half();
            tracing::debug!(evicted, capacity = self.capacity, "identity cache evicted");
        }
        cache
            .entries
            .insert(token.to_string(), normalized.clone());
        cache.order.push_back(token.to_string());

        normalized
    }

    /// Exact match first, then canonical comparison.
    pub fn compare(&self, a: &str, b: &str) -> bool {
        a == b || self.normalize(a) == self.normalize(b)
    }

    /// Like [`compare`](Self::compare); an absent token never matches.
    pub fn matches(&self, a: Option<&str>, b: Option<&str>) -> bool {
        match (a, b) {
            (Some(a), Some(b)) => self.compare(a, b),
            _ => false,
        }
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        let mut cache = self.lock();
        cache.entries.clear();
        cache.order.clear();
    }

    fn lock(&self) -> MutexGuard<'_, NormalizationCache> {
        // Entries are immutable strings, so a poisoned cache is still consistent.
        self.cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
