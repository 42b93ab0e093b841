//! `AppConfig` struct and TOML read/write.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use moviefind_api::tmdb::{DEFAULT_BASE_URL, DEFAULT_LANGUAGE, DEFAULT_TIMEOUT};
use moviefind_core::CacheSettings;
use moviefind_core::cache::{DEFAULT_EVICT_AFTER, DEFAULT_STALE_AFTER};
use serde::{Deserialize, Serialize};
use url::Url;

/// Top-level application configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// TMDB endpoint settings.
    #[serde(default)]
    pub tmdb: TmdbConfig,
    /// Result cache timings.
    #[serde(default)]
    pub cache: CacheConfig,
}

/// TMDB endpoint configuration.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TmdbConfig {
    /// API base URL; `search/movie` is joined onto it.
    pub base_url: String,
    /// Response language.
    pub language: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            base_url: String::from(DEFAULT_BASE_URL),
            language: String::from(DEFAULT_LANGUAGE),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

impl TmdbConfig {
    /// Parses `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not a valid URL.
    pub fn base_url(&self) -> Result<Url> {
        Url::parse(&self.base_url).with_context(|| format!("invalid tmdb.base_url: {}", self.base_url))
    }

    /// Request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Result cache configuration.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CacheConfig {
    /// Seconds a result is served without refetching.
    pub stale_secs: u64,
    /// Seconds a result is kept at all.
    pub evict_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            stale_secs: DEFAULT_STALE_AFTER.as_secs(),
            evict_secs: DEFAULT_EVICT_AFTER.as_secs(),
        }
    }
}

impl CacheConfig {
    /// Converts to core cache settings.
    #[must_use]
    pub const fn settings(&self) -> CacheSettings {
        CacheSettings {
            stale_after: Duration::from_secs(self.stale_secs),
            evict_after: Duration::from_secs(self.evict_secs),
        }
    }
}

impl AppConfig {
    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Saves config to a TOML file, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation or file write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("failed to serialize config to TOML")?;
        std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
    }
}
