//! TMDB API client module.
//!
//! Handles HTTP requests to the TMDB API v3 `search/movie` endpoint
//! and translates transport failures into [`ErrorKind`].

mod api;
mod client;
mod error;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalMovieSearchApi, MovieSearchApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{
    DEFAULT_BASE_URL, DEFAULT_LANGUAGE, DEFAULT_TIMEOUT, TmdbClient, TmdbClientBuilder,
};
pub use error::ErrorKind;
#[allow(clippy::module_name_repetitions)]
pub use types::{
    MAX_PAGE, Movie, MovieId, SearchMovieResponse, SearchQuery, SearchResult, TmdbErrorResponse,
};
