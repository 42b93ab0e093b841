//! Application configuration module.
//!
//! Manages the optional TOML config file holding the TMDB endpoint and
//! result cache timings.

#[allow(clippy::module_inception)]
mod config;
mod paths;

#[allow(clippy::module_name_repetitions)]
pub use config::AppConfig;
pub use paths::resolve_config_path;
