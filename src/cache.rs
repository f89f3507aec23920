//! Token-count result cache
//!
//! Repeated counting of identical input text is common when the same
//! prompt is priced and then tracked. [`TokenCache`] memoizes counts per
//! (provider, model, text). It is constructed explicitly and injected by
//! whoever composes providers; there is no hidden global instance.
//!
//! Eviction is a crude cap: once the entry count exceeds the configured
//! threshold the whole cache is dropped. No TTL, no LRU.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::RwLock;

/// Texts at or below this length are used as cache keys verbatim
const VERBATIM_KEY_MAX_LEN: usize = 100;

/// Default entry cap
const DEFAULT_MAX_ENTRIES: usize = 10_000;

/// Cache for token counting results
#[derive(Debug)]
pub struct TokenCache {
    entries: RwLock<HashMap<String, u32>>,
    max_entries: usize,
}

impl Default for TokenCache {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES)
    }
}

impl TokenCache {
    /// Create a cache that drops everything once `max_entries` is exceeded
    #[must_use]
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            max_entries,
        }
    }

    /// Get a cached token count, if present
    #[must_use]
    pub fn get(&self, provider: &str, model: &str, text: &str) -> Option<u32> {
        let key = cache_key(provider, model, text);
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.get(&key).copied()
    }

    /// Insert a token count, evicting everything first if the cap is hit
    pub fn insert(&self, provider: &str, model: &str, text: &str, count: u32) {
        let key = cache_key(provider, model, text);
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        if entries.len() >= self.max_entries {
            tracing::debug!(
                entries = entries.len(),
                max = self.max_entries,
                "token cache cap reached, dropping all entries"
            );
            entries.clear();
        }
        entries.insert(key, count);
    }

    /// Number of cached entries
    #[must_use]
    pub fn len(&self) -> usize {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.len()
    }

    /// True if the cache holds no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop all entries
    pub fn clear(&self) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.clear();
    }

    /// Drop all entries if the count exceeds `max_size`
    pub fn purge_if_above(&self, max_size: usize) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        if entries.len() > max_size {
            entries.clear();
        }
    }
}

/// Build a cache key from the (provider, model, text) tuple
///
/// Short texts are keyed verbatim; longer texts are keyed by a sha256
/// digest so keys stay bounded.
fn cache_key(provider: &str, model: &str, text: &str) -> String {
    if text.len() <= VERBATIM_KEY_MAX_LEN {
        format!("{provider}:{model}:{text}")
    } else {
        let digest = Sha256::digest(text.as_bytes());
        format!("{provider}:{model}:{}", URL_SAFE_NO_PAD.encode(digest))
    }
}
