//! `TmdbClient` - TMDB movie search client implementation.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use reqwest::header::ACCEPT;
use tracing::instrument;
use url::Url;

use super::api::MovieSearchApi;
use super::error::ErrorKind;
use super::types::{MAX_PAGE, SearchMovieResponse, SearchQuery, SearchResult, TmdbErrorResponse};

/// Default base URL for TMDB API v3.
pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3/";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default response language.
pub const DEFAULT_LANGUAGE: &str = "en-US";

/// Path of the movie search endpoint, relative to the base URL.
const SEARCH_MOVIE_PATH: &str = "search/movie";

/// TMDB movie search client.
///
/// The token is optional at construction time: a missing credential is
/// reported as [`ErrorKind::ConfigurationError`] by the first search.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClient {
    /// HTTP client.
    http_client: Client,
    /// Fully resolved `search/movie` URL.
    search_url: Url,
    /// Bearer API token.
    api_token: Option<String>,
    /// Response language.
    language: String,
}

/// Builder for `TmdbClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClientBuilder {
    base_url: Option<Url>,
    api_token: Option<String>,
    user_agent: Option<String>,
    timeout: Option<Duration>,
    language: Option<String>,
}

impl TmdbClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            api_token: None,
            user_agent: None,
            timeout: None,
            language: None,
        }
    }

    /// Overrides the base URL (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the API bearer token. Blank tokens count as missing.
    #[must_use]
    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the per-request timeout (default: 10s).
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the response language (default: "en-US").
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - `user_agent` is not set.
    /// - The base URL cannot be joined with the search path.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<TmdbClient> {
        let user_agent = self.user_agent.context("user_agent is required")?;

        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            let result = Url::parse(DEFAULT_BASE_URL);
            result.context("invalid default base URL")?
        };
        let search_url = base_url
            .join(SEARCH_MOVIE_PATH)
            .with_context(|| format!("failed to join URL path: {SEARCH_MOVIE_PATH}"))?;

        let api_token = self
            .api_token
            .map(|t| String::from(t.trim()))
            .filter(|t| !t.is_empty());

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
            .gzip(true)
            .build()
            .context("failed to build HTTP client")?;

        Ok(TmdbClient {
            http_client,
            search_url,
            api_token,
            language: self
                .language
                .unwrap_or_else(|| String::from(DEFAULT_LANGUAGE)),
        })
    }
}

impl TmdbClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> TmdbClientBuilder {
        TmdbClientBuilder::new()
    }

    /// Whether a bearer token is configured.
    #[must_use]
    pub const fn has_token(&self) -> bool {
        self.api_token.is_some()
    }

    /// Reads an error body for logging; the detail never leaves the adapter.
    async fn log_error_body(response: reqwest::Response, kind: ErrorKind) {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| String::from("<failed to read body>"));
        if let Ok(error_response) = serde_json::from_str::<TmdbErrorResponse>(&body) {
            tracing::warn!(
                %status,
                code = error_response.status_code,
                message = %error_response.status_message,
                ?kind,
                "TMDB API error"
            );
        } else {
            tracing::warn!(%status, %body, ?kind, "TMDB API error");
        }
    }
}

impl MovieSearchApi for TmdbClient {
    #[instrument(skip_all, fields(page = page))]
    async fn search(&self, term: &str, page: u32) -> Result<SearchResult, ErrorKind> {
        let Some(token) = self.api_token.as_deref() else {
            tracing::error!("TMDB API token is not configured");
            return Err(ErrorKind::ConfigurationError);
        };

        if page == 0 {
            return Err(ErrorKind::InvalidInput);
        }
        let query = SearchQuery::new(term, page.min(MAX_PAGE));
        if query.is_blank() {
            return Err(ErrorKind::InvalidInput);
        }

        let params = [
            ("query", String::from(query.term())),
            ("include_adult", String::from("false")),
            ("language", self.language.clone()),
            ("page", query.page().to_string()),
        ];
        let request = self
            .http_client
            .get(self.search_url.clone())
            .bearer_auth(token)
            .header(ACCEPT, "application/json")
            .query(&params)
            .build()
            .map_err(|e| {
                tracing::error!(error = %e, "failed to build request");
                ErrorKind::UnknownError
            })?;

        tracing::debug!(url = %request.url(), "TMDB API request");

        let response = self.http_client.execute(request).await.map_err(|e| {
            let kind = ErrorKind::from_transport(&e);
            tracing::warn!(error = %e, ?kind, "TMDB API request failed");
            kind
        })?;

        if let Some(kind) = ErrorKind::from_status(response.status()) {
            Self::log_error_body(response, kind).await;
            return Err(kind);
        }

        let body = response.text().await.map_err(|e| {
            let kind = ErrorKind::from_transport(&e);
            tracing::warn!(error = %e, ?kind, "failed to read response body");
            kind
        })?;
        let parsed: SearchMovieResponse = serde_json::from_str(&body).map_err(|e| {
            tracing::warn!(error = %e, "failed to decode search response");
            ErrorKind::MalformedResponse
        })?;

        let result = SearchResult::from_response(parsed, query);
        tracing::debug!(
            movies = result.movies.len(),
            total_pages = result.total_pages,
            "TMDB API response"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    /// Builds a client pointed at the mock server.
    fn client_for(server: &MockServer) -> TmdbClient {
        let base_url = format!("{}/3/", server.uri());
        TmdbClient::builder()
            .base_url(base_url.parse().unwrap())
            .api_token("test-token")
            .user_agent("test/0.0.0")
            .build()
            .unwrap()
    }

    /// Mounts a single `search/movie` response with the given status.
    async fn mount_status(server: &MockServer, status: u16) {
        Mock::given(method("GET"))
            .and(path("/3/search/movie"))
            .respond_with(ResponseTemplate::new(status).set_body_string(
                r#"{"status_code":7,"status_message":"Something went wrong.","success":false}"#,
            ))
            .mount(server)
            .await;
    }

    #[test]
    fn test_builder_requires_user_agent() {
        // Arrange & Act
        let result = TmdbClient::builder().api_token("test-token").build();

        // Assert
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("user_agent is required")
        );
    }

    #[test]
    fn test_builder_without_token_succeeds() {
        // Arrange & Act
        let client = TmdbClient::builder().user_agent("test/0.0.0").build().unwrap();

        // Assert
        assert!(!client.has_token());
    }

    #[test]
    fn test_builder_blank_token_counts_as_missing() {
        // Arrange & Act
        let client = TmdbClient::builder()
            .api_token("   ")
            .user_agent("test/0.0.0")
            .build()
            .unwrap();

        // Assert
        assert!(!client.has_token());
    }

    #[test]
    fn test_builder_with_custom_base_url() {
        // Arrange
        let custom_url = Url::parse("http://localhost:8080/3/").unwrap();

        // Act
        let client = TmdbClient::builder()
            .base_url(custom_url)
            .api_token("test-token")
            .user_agent("test/0.0.0")
            .build()
            .unwrap();

        // Assert
        assert_eq!(
            client.search_url.as_str(),
            "http://localhost:8080/3/search/movie"
        );
        assert_eq!(client.language, "en-US");
    }

    #[test]
    fn test_parse_search_movie_fixture() {
        // Arrange
        let json = include_str!("../../../../fixtures/tmdb/search_movie_batman.json");

        // Act
        let response: SearchMovieResponse = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(response.page, 1);
        assert_eq!(response.results.len(), 3);
        assert_eq!(response.results[0].id, 268);
        assert_eq!(response.results[0].title, "Batman");
    }

    #[tokio::test]
    async fn test_search_via_http() {
        // Arrange
        let server = MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/tmdb/search_movie_batman.json");

        Mock::given(method("GET"))
            .and(path("/3/search/movie"))
            .and(query_param("query", "batman"))
            .and(query_param("include_adult", "false"))
            .and(query_param("language", "en-US"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_string(json_body))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);

        // Act
        let result = client.search("  batman ", 1).await.unwrap();

        // Assert
        assert_eq!(result.movies.len(), 3);
        assert_eq!(result.total_pages, 1);
        assert_eq!(result.source_query, SearchQuery::first_page("batman"));
    }

    #[tokio::test]
    async fn test_bearer_token_is_sent() {
        // Arrange
        let server = MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/tmdb/search_movie_empty.json");

        Mock::given(method("GET"))
            .and(header("Authorization", "Bearer my-secret-token"))
            .respond_with(ResponseTemplate::new(200).set_body_string(json_body))
            .expect(1)
            .mount(&server)
            .await;

        let client = TmdbClient::builder()
            .base_url(format!("{}/3/", server.uri()).parse().unwrap())
            .api_token("my-secret-token")
            .user_agent("test/0.0.0")
            .build()
            .unwrap();

        // Act & Assert (mock expect(1) verifies Authorization header)
        let result = client.search("zzzznomovie", 1).await.unwrap();
        assert!(result.is_empty());
        assert_eq!(result.total_pages, 0);
    }

    #[tokio::test]
    async fn test_total_pages_clamped_to_max() {
        // Arrange
        let server = MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/tmdb/search_movie_many_pages.json");

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(json_body))
            .mount(&server)
            .await;

        let client = client_for(&server);

        // Act
        let result = client.search("love", 1).await.unwrap();

        // Assert
        assert_eq!(result.total_pages, MAX_PAGE);
    }

    #[tokio::test]
    async fn test_page_above_max_is_clamped() {
        // Arrange
        let server = MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/tmdb/search_movie_many_pages.json");

        Mock::given(method("GET"))
            .and(query_param("page", "500"))
            .respond_with(ResponseTemplate::new(200).set_body_string(json_body))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);

        // Act
        let result = client.search("love", 9000).await.unwrap();

        // Assert
        assert_eq!(result.source_query.page(), MAX_PAGE);
    }

    #[tokio::test]
    async fn test_missing_token_is_configuration_error() {
        // Arrange
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = TmdbClient::builder()
            .base_url(format!("{}/3/", server.uri()).parse().unwrap())
            .user_agent("test/0.0.0")
            .build()
            .unwrap();

        // Act
        let result = client.search("dune", 1).await;

        // Assert
        assert_eq!(result.unwrap_err(), ErrorKind::ConfigurationError);
    }

    #[tokio::test]
    async fn test_invalid_input_makes_no_request() {
        // Arrange
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server);

        // Act & Assert
        assert_eq!(
            client.search("   ", 1).await.unwrap_err(),
            ErrorKind::InvalidInput
        );
        assert_eq!(
            client.search("", 1).await.unwrap_err(),
            ErrorKind::InvalidInput
        );
        assert_eq!(
            client.search("dune", 0).await.unwrap_err(),
            ErrorKind::InvalidInput
        );
    }

    #[tokio::test]
    async fn test_http_status_mapping() {
        // Arrange
        let cases = [
            (401, ErrorKind::AuthError),
            (403, ErrorKind::PermissionError),
            (404, ErrorKind::NotFound),
            (429, ErrorKind::RateLimited),
            (500, ErrorKind::UpstreamUnavailable),
            (502, ErrorKind::UpstreamUnavailable),
            (503, ErrorKind::UpstreamUnavailable),
            (504, ErrorKind::UpstreamUnavailable),
            (418, ErrorKind::RequestFailed(418)),
            (422, ErrorKind::RequestFailed(422)),
        ];

        for (status, expected) in cases {
            let server = MockServer::start().await;
            mount_status(&server, status).await;
            let client = client_for(&server);

            // Act
            let result = client.search("dune", 1).await;

            // Assert
            assert_eq!(result.unwrap_err(), expected, "HTTP {status}");
        }
    }

    #[tokio::test]
    async fn test_http_429_is_not_retried() {
        // Arrange
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);

        // Act
        let result = client.search("dune", 1).await;

        // Assert
        assert_eq!(result.unwrap_err(), ErrorKind::RateLimited);
    }

    #[tokio::test]
    async fn test_malformed_body() {
        // Arrange
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("query", "notjson"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("query", "noresults"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(r#"{"page":1,"total_pages":1}"#),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);

        // Act & Assert
        assert_eq!(
            client.search("notjson", 1).await.unwrap_err(),
            ErrorKind::MalformedResponse
        );
        assert_eq!(
            client.search("noresults", 1).await.unwrap_err(),
            ErrorKind::MalformedResponse
        );
    }

    #[tokio::test]
    async fn test_slow_response_is_timeout() {
        // Arrange
        let server = MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/tmdb/search_movie_empty.json");
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(json_body)
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let client = TmdbClient::builder()
            .base_url(format!("{}/3/", server.uri()).parse().unwrap())
            .api_token("test-token")
            .user_agent("test/0.0.0")
            .timeout(Duration::from_millis(100))
            .build()
            .unwrap();

        // Act
        let result = client.search("dune", 1).await;

        // Assert
        assert_eq!(result.unwrap_err(), ErrorKind::Timeout);
    }

    #[tokio::test]
    async fn test_redirect_loop_is_unknown_error() {
        // Arrange: the endpoint keeps redirecting to itself
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/3/search/movie"))
            .respond_with(ResponseTemplate::new(302).insert_header("location", "/3/search/movie"))
            .mount(&server)
            .await;

        let client = client_for(&server);

        // Act
        let result = client.search("dune", 1).await;

        // Assert
        assert_eq!(result.unwrap_err(), ErrorKind::UnknownError);
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        // Arrange: nothing listens on port 1
        let client = TmdbClient::builder()
            .base_url(Url::parse("http://127.0.0.1:1/3/").unwrap())
            .api_token("test-token")
            .user_agent("test/0.0.0")
            .timeout(Duration::from_secs(2))
            .build()
            .unwrap();

        // Act
        let result = client.search("dune", 1).await;

        // Assert
        assert_eq!(result.unwrap_err(), ErrorKind::NetworkError);
    }
}
