//! API client library for moviefind.
//!
//! Provides the movie search adapter for the TMDB API together with
//! the value types and error taxonomy shared with the core.

/// TMDB API client.
pub mod tmdb;
