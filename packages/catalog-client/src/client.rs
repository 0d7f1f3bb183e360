//! Catalog API client implementation

use std::fmt;
use std::future::Future;
use std::time::Duration;

use marquee_shared_config::CatalogConfig;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use tracing::{debug, instrument, warn};

use crate::error::{CatalogError, CatalogResult};
use crate::models::{
    ErrorResponse, ImportJobStatus, ImportStats, IntroMarker, MediaType, StartImportRequest,
    StartImportResponse,
};

/// Default connection timeout in seconds
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Maximum episode identifier length
const MAX_EPISODE_ID_LENGTH: usize = 128;

/// Maximum error body size kept in error messages
const MAX_ERROR_BODY_SIZE: usize = 500;

/// Default number of retry attempts for transient failures
const DEFAULT_MAX_RETRIES: u32 = 3;

/// Base delay for exponential backoff (milliseconds)
const RETRY_BASE_DELAY_MS: u64 = 100;

/// Upper bound for a single backoff sleep (milliseconds)
const MAX_RETRY_DELAY_MS: u64 = 30_000;

/// Catalog and episode metadata API client
#[derive(Clone)]
pub struct CatalogClient {
    http_client: Client,
    config: CatalogConfig,
    max_retries: u32,
    retry_base_delay_ms: u64,
}

impl fmt::Debug for CatalogClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogClient")
            .field("config", &self.config)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

impl CatalogClient {
    /// Create a new catalog client from configuration
    pub fn new(config: &CatalogConfig) -> CatalogResult<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
            .pool_max_idle_per_host(5)
            .pool_idle_timeout(Duration::from_secs(90))
            .user_agent("Marquee/1.0")
            .build()?;

        Ok(Self::with_client(config, http_client))
    }

    /// Create a client with a custom HTTP client (for testing)
    pub fn with_client(config: &CatalogConfig, http_client: Client) -> Self {
        Self {
            http_client,
            config: config.clone(),
            max_retries: DEFAULT_MAX_RETRIES,
            retry_base_delay_ms: RETRY_BASE_DELAY_MS,
        }
    }

    /// Set retry configuration for idempotent reads
    pub fn with_retry_config(mut self, attempts: u32, base_delay_ms: u64) -> Self {
        self.max_retries = attempts;
        self.retry_base_delay_ms = base_delay_ms;
        self
    }

    /// Get the configuration
    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Validate an episode identifier before it is placed in a URL path
    fn validate_episode_id(episode_id: &str) -> CatalogResult<&str> {
        let trimmed = episode_id.trim();
        if trimmed.is_empty() {
            return Err(CatalogError::InvalidInput(
                "episode id cannot be empty".to_string(),
            ));
        }
        if trimmed.len() > MAX_EPISODE_ID_LENGTH {
            return Err(CatalogError::InvalidInput(format!(
                "episode id too long (max {} characters)",
                MAX_EPISODE_ID_LENGTH
            )));
        }
        if !trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(CatalogError::InvalidInput(format!(
                "episode id contains unsupported characters: {}",
                trimmed
            )));
        }
        Ok(trimmed)
    }

    /// Reject markers the server would refuse anyway
    fn validate_marker(marker: &IntroMarker) -> CatalogResult<()> {
        if !marker.is_valid() {
            return Err(CatalogError::InvalidInput(format!(
                "intro end ({:.1}s) must be after intro start ({:.1}s)",
                marker.end, marker.start
            )));
        }
        Ok(())
    }

    /// Exponential backoff for `attempt`, capped at [`MAX_RETRY_DELAY_MS`]
    fn retry_delay_ms(base_delay_ms: u64, attempt: u32) -> u64 {
        2u64.checked_pow(attempt)
            .and_then(|factor| base_delay_ms.checked_mul(factor))
            .map_or(MAX_RETRY_DELAY_MS, |delay| delay.min(MAX_RETRY_DELAY_MS))
    }

    /// Execute an operation with retry logic for transient failures
    async fn with_retry<T, F, Fut>(&self, operation: F) -> CatalogResult<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = CatalogResult<T>>,
    {
        let mut attempt = 0;
        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    attempt += 1;
                    let delay_ms = Self::retry_delay_ms(self.retry_base_delay_ms, attempt);
                    warn!(
                        attempt = attempt,
                        max_retries = self.max_retries,
                        delay_ms = delay_ms,
                        error = %e,
                        "Catalog request failed, retrying"
                    );
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Send a request, attaching credentials and mapping transport-level failures
    async fn send(&self, request: RequestBuilder) -> CatalogResult<Response> {
        let request = match &self.config.api_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                CatalogError::Timeout
            } else {
                CatalogError::Http(e)
            }
        })?;

        match response.status() {
            StatusCode::TOO_MANY_REQUESTS => {
                warn!("Catalog API rate limited");
                Err(CatalogError::RateLimited)
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(CatalogError::Unauthorized),
            _ => Ok(response),
        }
    }

    /// Turn a non-success response into an error carrying the server's reason
    async fn api_error(response: Response) -> CatalogError {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        let message = Self::extract_reason(&text).unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unexpected response")
                .to_string()
        });

        CatalogError::Api {
            status: status.as_u16(),
            message,
        }
    }

    /// Pull a human-readable reason out of an error body
    fn extract_reason(text: &str) -> Option<String> {
        if let Ok(body) = serde_json::from_str::<ErrorResponse>(text) {
            if let Some(reason) = body.into_reason() {
                return Some(reason);
            }
        }

        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(trimmed.chars().take(MAX_ERROR_BODY_SIZE).collect())
    }

    /// Fetch catalog totals
    ///
    /// # Errors
    /// - `CatalogError::Api` - If the server returns an error status
    /// - `CatalogError::Http` - If the HTTP request fails
    #[instrument(skip(self))]
    pub async fn import_stats(&self) -> CatalogResult<ImportStats> {
        let url = self.config.api_url("import/stats");

        self.with_retry(|| async {
            let response = self.send(self.http_client.get(&url)).await?;
            if !response.status().is_success() {
                return Err(Self::api_error(response).await);
            }
            let text = response.text().await?;
            Ok(serde_json::from_str::<ImportStats>(&text)?)
        })
        .await
    }

    /// Ask the job runner to begin importing `media_type`
    ///
    /// # Errors
    /// - `CatalogError::Rejected` - If the server refuses the job, with its reason
    /// - `CatalogError::Api` - If the server fails with a 5xx status
    /// - `CatalogError::Http` - If the HTTP request fails
    #[instrument(skip(self))]
    pub async fn start_import(&self, media_type: MediaType, size: u32) -> CatalogResult<()> {
        let url = self.config.api_url("import/start");
        let body = StartImportRequest {
            media_type,
            size_parameter: size,
        };

        debug!(media_type = %media_type, size, "Requesting import job start");

        let response = self.send(self.http_client.post(&url).json(&body)).await?;
        let status = response.status();

        if status.is_server_error() {
            return Err(Self::api_error(response).await);
        }

        let text = response.text().await?;

        if status.is_client_error() {
            let reason = Self::extract_reason(&text)
                .unwrap_or_else(|| format!("import rejected with status {}", status.as_u16()));
            return Err(CatalogError::Rejected(reason));
        }

        if text.trim().is_empty() {
            return Ok(());
        }

        let parsed: StartImportResponse = serde_json::from_str(&text)?;
        if parsed.success {
            Ok(())
        } else {
            Err(CatalogError::Rejected(
                parsed
                    .message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| "import rejected by server".to_string()),
            ))
        }
    }

    /// Ask the job runner to stop the current job
    ///
    /// The effect is only observable through a later status poll.
    #[instrument(skip(self))]
    pub async fn stop_import(&self) -> CatalogResult<()> {
        let url = self.config.api_url("import/stop");
        let response = self.send(self.http_client.post(&url)).await?;
        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }
        Ok(())
    }

    /// Fetch the current job status
    ///
    /// Not retried here: callers poll on their own cadence.
    #[instrument(skip(self))]
    pub async fn import_status(&self) -> CatalogResult<ImportJobStatus> {
        let url = self.config.api_url("import/status");
        let response = self.send(self.http_client.get(&url)).await?;
        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Fetch the intro marker of an episode
    ///
    /// Returns `None` when the episode has no marker (`null` body or 404).
    #[instrument(skip(self))]
    pub async fn intro_marker(&self, episode_id: &str) -> CatalogResult<Option<IntroMarker>> {
        let episode_id = Self::validate_episode_id(episode_id)?;
        let url = self
            .config
            .api_url(&format!("episodes/{}/intro", episode_id));

        let marker = self
            .with_retry(|| async {
                let response = self.send(self.http_client.get(&url)).await?;
                if response.status() == StatusCode::NOT_FOUND {
                    return Ok(None);
                }
                if !response.status().is_success() {
                    return Err(Self::api_error(response).await);
                }
                let text = response.text().await?;
                if text.trim().is_empty() {
                    return Ok(None);
                }
                Ok(serde_json::from_str::<Option<IntroMarker>>(&text)?)
            })
            .await?;

        debug!(episode = %episode_id, has_marker = marker.is_some(), "Fetched intro marker");
        Ok(marker)
    }

    /// Persist (or clear, with `None`) the intro marker of an episode
    ///
    /// # Errors
    /// - `CatalogError::InvalidInput` - If `end <= start`; no request is sent
    /// - `CatalogError::Rejected` - If the server refuses the marker
    #[instrument(skip(self))]
    pub async fn save_intro_marker(
        &self,
        episode_id: &str,
        marker: Option<IntroMarker>,
    ) -> CatalogResult<()> {
        let episode_id = Self::validate_episode_id(episode_id)?;
        if let Some(marker) = &marker {
            Self::validate_marker(marker)?;
        }

        let url = self
            .config
            .api_url(&format!("episodes/{}/intro", episode_id));
        let response = self.send(self.http_client.put(&url).json(&marker)).await?;
        let status = response.status();

        if status.is_client_error() {
            let text = response.text().await.unwrap_or_default();
            let reason = Self::extract_reason(&text)
                .unwrap_or_else(|| format!("marker rejected with status {}", status.as_u16()));
            return Err(CatalogError::Rejected(reason));
        }
        if !status.is_success() {
            return Err(Self::api_error(response).await);
        }

        debug!(episode = %episode_id, cleared = marker.is_none(), "Saved intro marker");
        Ok(())
    }
}
