//! `MovieSearchApi` trait definition.
#![allow(clippy::future_not_send)]

use super::error::ErrorKind;
use super::types::SearchResult;

/// Movie search adapter trait.
///
/// Abstracts the outbound search call so the core can run against
/// a fake in tests. Uses `trait_variant::make` to generate a
/// `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(MovieSearchApi: Send)]
pub trait LocalMovieSearchApi {
    /// Searches for movies matching `term` at `page`.
    ///
    /// Performs exactly one outbound request; never retries.
    ///
    /// # Errors
    ///
    /// - `ConfigurationError` if no credential is configured.
    /// - `InvalidInput` if `term` is blank or `page` is 0.
    /// - Any other [`ErrorKind`] for HTTP and transport failures.
    async fn search(&self, term: &str, page: u32) -> Result<SearchResult, ErrorKind>;
}
