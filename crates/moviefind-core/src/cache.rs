//! Time-based cache of search results keyed by query.

use std::collections::HashMap;
use std::time::Duration;

use moviefind_api::tmdb::{SearchQuery, SearchResult};
use tokio::time::Instant;

/// Default freshness window.
pub const DEFAULT_STALE_AFTER: Duration = Duration::from_secs(5 * 60);

/// Default retention window for stale entries.
pub const DEFAULT_EVICT_AFTER: Duration = Duration::from_secs(10 * 60);

/// Cache timing settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheSettings {
    /// Age below which an entry is served without a new request.
    pub stale_after: Duration,
    /// Age at which an entry is dropped entirely.
    pub evict_after: Duration,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            stale_after: DEFAULT_STALE_AFTER,
            evict_after: DEFAULT_EVICT_AFTER,
        }
    }
}

/// A cached result and when it was fetched.
#[derive(Debug, Clone)]
struct Entry {
    result: SearchResult,
    fetched_at: Instant,
}

/// Lookup outcome for a key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lookup<'a> {
    /// Within the freshness window.
    Fresh(&'a SearchResult),
    /// Past the freshness window but still retained.
    Stale(&'a SearchResult),
    /// Never fetched or evicted.
    Missing,
}

/// Results keyed by [`SearchQuery`].
///
/// Expiry is checked lazily on access; there is no background timer.
#[derive(Debug, Default)]
#[allow(clippy::module_name_repetitions)]
pub struct ResultCache {
    settings: CacheSettings,
    entries: HashMap<SearchQuery, Entry>,
}

impl ResultCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new(settings: CacheSettings) -> Self {
        Self {
            settings,
            entries: HashMap::new(),
        }
    }

    /// Stores `result` under its source query, stamped now.
    pub fn insert(&mut self, result: SearchResult) {
        self.evict_expired();
        let key = result.source_query.clone();
        self.entries.insert(
            key,
            Entry {
                result,
                fetched_at: Instant::now(),
            },
        );
    }

    /// Looks up `key`, evicting expired entries first.
    pub fn lookup(&mut self, key: &SearchQuery) -> Lookup<'_> {
        self.evict_expired();
        let stale_after = self.settings.stale_after;
        match self.entries.get(key) {
            Some(entry) if entry.fetched_at.elapsed() < stale_after => {
                Lookup::Fresh(&entry.result)
            }
            Some(entry) => Lookup::Stale(&entry.result),
            None => Lookup::Missing,
        }
    }

    /// Number of retained entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops entries older than the retention window.
    fn evict_expired(&mut self) {
        let evict_after = self.settings.evict_after;
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| entry.fetched_at.elapsed() < evict_after);
        let evicted = before.saturating_sub(self.entries.len());
        if evicted > 0 {
            tracing::debug!(evicted, "evicted expired search results");
        }
    }
}
