//! Mock catalog server for testing import control and intro markers
//!
//! Provides a [`MockCatalogServer`] that simulates the catalog REST API
//! endpoints under `/api`.

use serde_json::{json, Value};
use wiremock::matchers::{body_json, header, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mock catalog server
///
/// Wraps a [`wiremock::MockServer`]. Every mock requires the bearer token
/// returned by [`MockCatalogServer::token`] unless stated otherwise.
///
/// # Example
///
/// ```rust,ignore
/// use marquee_test_utils::MockCatalogServer;
///
/// #[tokio::test]
/// async fn test_intro_marker() {
///     let server = MockCatalogServer::start().await;
///     server.mock_intro_marker("s01e01", Some((30.0, 90.0))).await;
///
///     // Configure your catalog client with server.url() and server.token()
/// }
/// ```
pub struct MockCatalogServer {
    server: MockServer,
    token: String,
}

impl MockCatalogServer {
    /// Start a new mock catalog server with the default token
    pub async fn start() -> Self {
        Self::start_with_token("test-token").await
    }

    /// Start a new mock catalog server with a custom token
    pub async fn start_with_token(token: &str) -> Self {
        let server = MockServer::start().await;
        Self {
            server,
            token: token.to_string(),
        }
    }

    /// Get the server URL
    pub fn url(&self) -> String {
        self.server.uri()
    }

    /// Get the bearer token
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Access the underlying server, e.g. to inspect received requests
    pub fn inner(&self) -> &MockServer {
        &self.server
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }

    /// Mount a mock that accepts any import start request
    pub async fn mock_start_accepted(&self) {
        Mock::given(method("POST"))
            .and(path("/api/import/start"))
            .and(header("Authorization", self.bearer().as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "message": "Import started"
            })))
            .mount(&self.server)
            .await;
    }

    /// Mount a mock accepting a start request for one category and size,
    /// expected to be hit exactly `times` times
    pub async fn mock_start_expected(&self, media_type: &str, size: u32, times: u64) {
        Mock::given(method("POST"))
            .and(path("/api/import/start"))
            .and(header("Authorization", self.bearer().as_str()))
            .and(body_json(json!({
                "mediaType": media_type,
                "sizeParameter": size
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true
            })))
            .expect(times)
            .mount(&self.server)
            .await;
    }

    /// Mount a mock rejecting import starts with a 400 and a reason
    pub async fn mock_start_rejected(&self, reason: &str) {
        Mock::given(method("POST"))
            .and(path("/api/import/start"))
            .and(header("Authorization", self.bearer().as_str()))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": reason
            })))
            .mount(&self.server)
            .await;
    }

    /// Mount a mock for the stop endpoint
    pub async fn mock_stop(&self) {
        Mock::given(method("POST"))
            .and(path("/api/import/stop"))
            .and(header("Authorization", self.bearer().as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true
            })))
            .mount(&self.server)
            .await;
    }

    /// Mount a status mock that always returns `status`
    pub async fn mock_status(&self, status: ImportStatusFixture) {
        Mock::given(method("GET"))
            .and(path("/api/import/status"))
            .and(header("Authorization", self.bearer().as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(status.to_json()))
            .mount(&self.server)
            .await;
    }

    /// Mount status mocks answered in order, one request each. The last
    /// status keeps answering once the others are used up.
    pub async fn mock_status_sequence(&self, statuses: Vec<ImportStatusFixture>) {
        let count = statuses.len();
        for (index, status) in statuses.into_iter().enumerate() {
            let mock = Mock::given(method("GET"))
                .and(path("/api/import/status"))
                .and(header("Authorization", self.bearer().as_str()))
                .respond_with(ResponseTemplate::new(200).set_body_json(status.to_json()));
            let mock = if index + 1 < count {
                mock.up_to_n_times(1)
            } else {
                mock
            };
            mock.mount(&self.server).await;
        }
    }

    /// Mount a status mock failing with a server error `times` times
    pub async fn mock_status_failures(&self, times: u64) {
        Mock::given(method("GET"))
            .and(path("/api/import/status"))
            .respond_with(ResponseTemplate::new(503).set_body_json(json!({
                "error": "Service unavailable"
            })))
            .up_to_n_times(times)
            .mount(&self.server)
            .await;
    }

    /// Mount a mock for catalog totals
    pub async fn mock_stats(&self, stats: ImportStatsFixture) {
        Mock::given(method("GET"))
            .and(path("/api/import/stats"))
            .and(header("Authorization", self.bearer().as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(stats.to_json()))
            .mount(&self.server)
            .await;
    }

    /// Mount a mock for an episode's intro marker (`None` answers `null`)
    pub async fn mock_intro_marker(&self, episode_id: &str, marker: Option<(f64, f64)>) {
        let body = match marker {
            Some((start, end)) => json!({ "start": start, "end": end }),
            None => Value::Null,
        };
        Mock::given(method("GET"))
            .and(path(format!("/api/episodes/{}/intro", episode_id)))
            .and(header("Authorization", self.bearer().as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Mount a mock accepting intro marker updates for any episode
    pub async fn mock_intro_marker_saved(&self) {
        Mock::given(method("PUT"))
            .and(path_regex(r"^/api/episodes/[A-Za-z0-9_-]+/intro$"))
            .and(header("Authorization", self.bearer().as_str()))
            .respond_with(ResponseTemplate::new(204))
            .mount(&self.server)
            .await;
    }

    /// Mount a mock rejecting requests made with `bad_token`
    ///
    /// Only requests carrying that token match, so mocks for the valid
    /// token keep working.
    pub async fn mock_auth_failure(&self, bad_token: &str) {
        Mock::given(path_regex("^/api/"))
            .and(header("Authorization", format!("Bearer {}", bad_token).as_str()))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": "Unauthorized"
            })))
            .mount(&self.server)
            .await;
    }
}

/// Fixture for import status responses
#[derive(Debug, Clone)]
pub struct ImportStatusFixture {
    pub running: bool,
    pub media_type: String,
    pub current_page: u32,
    pub total_pages: u32,
    pub current_category_label: Option<String>,
    pub current_title_label: Option<String>,
    pub imported_count: u32,
    pub skipped_count: u32,
    pub error_count: u32,
}

impl ImportStatusFixture {
    /// A job in progress on `page` of `total_pages`
    pub fn running(media_type: &str, page: u32, total_pages: u32) -> Self {
        Self {
            running: true,
            media_type: media_type.to_string(),
            current_page: page,
            total_pages,
            current_category_label: Some("Popular".to_string()),
            current_title_label: Some(format!("Title {}", page)),
            imported_count: page.saturating_sub(1) * 10,
            skipped_count: 0,
            error_count: 0,
        }
    }

    /// A job that stopped with the given counts
    pub fn finished(media_type: &str, imported: u32, skipped: u32, errors: u32) -> Self {
        Self {
            running: false,
            media_type: media_type.to_string(),
            current_page: 0,
            total_pages: 0,
            current_category_label: None,
            current_title_label: None,
            imported_count: imported,
            skipped_count: skipped,
            error_count: errors,
        }
    }

    /// No job has run yet
    pub fn idle() -> Self {
        Self::finished("movie", 0, 0, 0)
    }

    /// Convert to JSON value
    pub fn to_json(&self) -> Value {
        json!({
            "running": self.running,
            "mediaType": self.media_type,
            "currentPage": self.current_page,
            "totalPages": self.total_pages,
            "currentCategoryLabel": self.current_category_label,
            "currentTitleLabel": self.current_title_label,
            "importedCount": self.imported_count,
            "skippedCount": self.skipped_count,
            "errorCount": self.error_count
        })
    }
}

/// Fixture for catalog totals
#[derive(Debug, Clone, Default)]
pub struct ImportStatsFixture {
    pub movies: u64,
    pub series: u64,
    pub episodes: u64,
    pub books: u64,
    pub audiobooks: u64,
}

impl ImportStatsFixture {
    /// Convert to JSON value
    pub fn to_json(&self) -> Value {
        json!({
            "movies": self.movies,
            "series": self.series,
            "episodes": self.episodes,
            "books": self.books,
            "audiobooks": self.audiobooks
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_catalog_server_starts() {
        let server = MockCatalogServer::start().await;
        assert!(!server.url().is_empty());
        assert_eq!(server.token(), "test-token");
    }

    #[tokio::test]
    async fn test_status_sequence_replays_in_order() {
        let server = MockCatalogServer::start().await;
        server
            .mock_status_sequence(vec![
                ImportStatusFixture::running("movie", 1, 3),
                ImportStatusFixture::running("movie", 2, 3),
                ImportStatusFixture::finished("movie", 5, 0, 0),
            ])
            .await;

        let client = reqwest::Client::new();
        let mut pages = Vec::new();
        let mut running = Vec::new();
        for _ in 0..4 {
            let body: Value = client
                .get(format!("{}/api/import/status", server.url()))
                .header("Authorization", "Bearer test-token")
                .send()
                .await
                .unwrap()
                .json()
                .await
                .unwrap();
            pages.push(body["currentPage"].as_u64().unwrap());
            running.push(body["running"].as_bool().unwrap());
        }

        assert_eq!(pages, vec![1, 2, 0, 0]);
        assert_eq!(running, vec![true, true, false, false]);
    }

    #[tokio::test]
    async fn test_auth_failure_does_not_interfere_with_valid_token() {
        let server = MockCatalogServer::start().await;
        server.mock_auth_failure("wrong-token").await;
        server.mock_stats(ImportStatsFixture::default()).await;

        let client = reqwest::Client::new();
        let valid = client
            .get(format!("{}/api/import/stats", server.url()))
            .header("Authorization", "Bearer test-token")
            .send()
            .await
            .unwrap();
        assert!(valid.status().is_success());

        let invalid = client
            .get(format!("{}/api/import/stats", server.url()))
            .header("Authorization", "Bearer wrong-token")
            .send()
            .await
            .unwrap();
        assert_eq!(invalid.status().as_u16(), 401);
    }

    #[tokio::test]
    async fn test_intro_marker_null() {
        let server = MockCatalogServer::start().await;
        server.mock_intro_marker("s01e02", None).await;

        let body: Value = reqwest::Client::new()
            .get(format!("{}/api/episodes/s01e02/intro", server.url()))
            .header("Authorization", "Bearer test-token")
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert!(body.is_null());
    }

    #[test]
    fn test_status_fixture_to_json() {
        let json = ImportStatusFixture::running("series", 2, 5).to_json();
        assert_eq!(json["running"], true);
        assert_eq!(json["mediaType"], "series");
        assert_eq!(json["totalPages"], 5);
        assert_eq!(json["importedCount"], 10);
    }
}
