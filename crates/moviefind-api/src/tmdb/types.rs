//! Movie search value types and TMDB wire types.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Highest page number the TMDB search endpoint serves.
pub const MAX_PAGE: u32 = 500;

/// Base URL of the TMDB image CDN.
const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/";

/// TMDB movie identifier.
pub type MovieId = u64;

// --- Query ---

/// A search key: trimmed term plus 1-based page number.
///
/// Replaced wholesale on every submission; used as both the request
/// tag and the cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchQuery {
    term: String,
    page: u32,
}

impl SearchQuery {
    /// Creates a query for `term` (trimmed) at `page`.
    ///
    /// A page of 0 is raised to 1.
    pub fn new(term: impl AsRef<str>, page: u32) -> Self {
        Self {
            term: String::from(term.as_ref().trim()),
            page: page.max(1),
        }
    }

    /// Creates a query for the first page of `term`.
    pub fn first_page(term: impl AsRef<str>) -> Self {
        Self::new(term, 1)
    }

    /// Returns the same term at another page.
    #[must_use]
    pub fn with_page(&self, page: u32) -> Self {
        Self::new(&self.term, page)
    }

    /// Search term.
    #[must_use]
    pub fn term(&self) -> &str {
        &self.term
    }

    /// Page number (1-based).
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Whether the term is empty after trimming.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.term.is_empty()
    }
}

// --- Movie ---

/// A single movie record as returned by `search/movie`.
///
/// Only `id` is required; every other field is passed through as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    /// TMDB movie ID.
    pub id: MovieId,
    /// Localized title.
    #[serde(default)]
    pub title: String,
    /// Original title.
    #[serde(default)]
    pub original_title: String,
    /// Original language (ISO 639-1).
    #[serde(default)]
    pub original_language: String,
    /// Release date (YYYY-MM-DD, may be empty).
    #[serde(default)]
    pub release_date: Option<String>,
    /// Overview text.
    #[serde(default)]
    pub overview: Option<String>,
    /// Popularity score.
    #[serde(default)]
    pub popularity: f64,
    /// Vote average.
    #[serde(default)]
    pub vote_average: f64,
    /// Vote count.
    #[serde(default)]
    pub vote_count: u32,
    /// Genre IDs.
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    /// Adult flag.
    #[serde(default)]
    pub adult: bool,
    /// Poster image path.
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Backdrop image path.
    #[serde(default)]
    pub backdrop_path: Option<String>,
}

impl Movie {
    /// Release year parsed from `release_date`, if present and well-formed.
    #[must_use]
    pub fn release_year(&self) -> Option<i32> {
        let date = self.release_date.as_deref()?;
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .ok()
            .map(|d| d.year())
    }

    /// Full poster URL for the given image size (e.g. `w500`, `original`).
    #[must_use]
    pub fn poster_url(&self, size: &str) -> Option<String> {
        self.poster_path
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(|p| format!("{IMAGE_BASE_URL}{size}{p}"))
    }
}

// --- Result ---

/// A successful search outcome for one [`SearchQuery`].
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    /// Movies in upstream order.
    pub movies: Vec<Movie>,
    /// Total number of pages, never above [`MAX_PAGE`].
    pub total_pages: u32,
    /// Total number of results reported upstream.
    pub total_results: u32,
    /// The query that produced this result.
    pub source_query: SearchQuery,
}

impl SearchResult {
    /// Builds a result from a raw response, clamping `total_pages`.
    #[must_use]
    pub fn from_response(response: SearchMovieResponse, source_query: SearchQuery) -> Self {
        Self {
            movies: response.results,
            total_pages: response.total_pages.min(MAX_PAGE),
            total_results: response.total_results,
            source_query,
        }
    }

    /// Looks up a movie of this result by ID.
    #[must_use]
    pub fn movie(&self, id: MovieId) -> Option<&Movie> {
        self.movies.iter().find(|m| m.id == id)
    }

    /// Whether the result contains no movies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }
}

// --- Wire types ---

/// Response from `search/movie` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchMovieResponse {
    /// Current page number.
    #[serde(default)]
    pub page: u32,
    /// Search results.
    pub results: Vec<Movie>,
    /// Total number of pages.
    #[serde(default)]
    pub total_pages: u32,
    /// Total number of results.
    #[serde(default)]
    pub total_results: u32,
}

/// TMDB API error response body.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbErrorResponse {
    /// TMDB error code.
    pub status_code: u32,
    /// Error message.
    pub status_message: String,
    /// Success flag (always false for errors).
    #[serde(default)]
    pub success: bool,
}
