//! Movie search error taxonomy.

use reqwest::StatusCode;
use thiserror::Error;

/// Closed set of failure categories a search can end in.
///
/// The adapter is the only place that builds these from transport
/// failures; everything downstream stores the kind and drops the detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ErrorKind {
    /// No API token is configured.
    #[error("TMDB API token is not configured. Please set TMDB_API_TOKEN.")]
    ConfigurationError,
    /// Blank term or page out of range.
    #[error("Search query cannot be empty and page must be between 1 and 500.")]
    InvalidInput,
    /// Response body is not a movie search response.
    #[error("Invalid response format from TMDB API.")]
    MalformedResponse,
    /// HTTP 401.
    #[error("Invalid TMDB API token. Please check your bearer token.")]
    AuthError,
    /// HTTP 403.
    #[error("Access denied. Please check your TMDB API permissions.")]
    PermissionError,
    /// HTTP 404.
    #[error("TMDB API endpoint not found.")]
    NotFound,
    /// HTTP 429.
    #[error("Too many requests. Please wait a moment and try again.")]
    RateLimited,
    /// HTTP 5xx.
    #[error("TMDB server error. Please try again later.")]
    UpstreamUnavailable,
    /// Any other HTTP status at or above 400.
    #[error("Request failed with HTTP status {0}.")]
    RequestFailed(u16),
    /// The request exceeded its timeout.
    #[error("Request timeout. Please check your internet connection and try again.")]
    Timeout,
    /// The server could not be reached.
    #[error("Network error. Please check your internet connection.")]
    NetworkError,
    /// Any other transport failure.
    #[error("An unexpected error occurred while fetching movies.")]
    UnknownError,
}

impl ErrorKind {
    /// Maps an HTTP error status to its kind.
    ///
    /// Statuses below 400 have no error kind.
    #[must_use]
    pub fn from_status(status: StatusCode) -> Option<Self> {
        let kind = match status {
            StatusCode::UNAUTHORIZED => Self::AuthError,
            StatusCode::FORBIDDEN => Self::PermissionError,
            StatusCode::NOT_FOUND => Self::NotFound,
            StatusCode::TOO_MANY_REQUESTS => Self::RateLimited,
            s if s.is_server_error() => Self::UpstreamUnavailable,
            s if s.is_client_error() => Self::RequestFailed(s.as_u16()),
            _ => return None,
        };
        Some(kind)
    }

    /// Maps a `reqwest` transport failure to its kind.
    #[must_use]
    pub fn from_transport(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::NetworkError
        } else if err.is_decode() {
            Self::MalformedResponse
        } else if let Some(kind) = err.status().and_then(Self::from_status) {
            kind
        } else {
            Self::UnknownError
        }
    }
}
