//! Catalog API configuration types

use std::fmt;

use crate::{get_required_env, parse_env, ConfigError, ConfigResult};

/// Catalog/metadata REST API configuration
#[derive(Clone)]
pub struct CatalogConfig {
    /// Catalog server base URL
    pub url: String,

    /// Optional bearer token for the catalog API
    pub api_token: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl fmt::Debug for CatalogConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogConfig")
            .field("url", &self.url)
            .field(
                "api_token",
                &self.api_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl CatalogConfig {
    /// Load catalog configuration from environment variables
    ///
    /// `MARQUEE_API_URL` is required and must be an absolute http(s) URL.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_url(get_required_env("MARQUEE_API_URL")?)
    }

    /// Like [`CatalogConfig::from_env`] but with an explicit base URL, for
    /// callers that take the URL from the command line
    pub fn from_url(url: impl Into<String>) -> ConfigResult<Self> {
        let url = url.into();
        Self::validate_url(&url)?;

        let api_token = std::env::var("MARQUEE_API_TOKEN")
            .ok()
            .filter(|token| !token.trim().is_empty());

        Ok(Self {
            url,
            api_token,
            timeout_secs: parse_env("MARQUEE_API_TIMEOUT", 10)?,
        })
    }

    /// Create a configuration with a custom URL (useful for testing)
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_token: None,
            timeout_secs: 10,
        }
    }

    /// Attach a bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Get the full URL for an API endpoint
    pub fn api_url(&self, path: &str) -> String {
        let base = self.url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{}/api/{}", base, path)
    }

    fn validate_url(raw: &str) -> ConfigResult<()> {
        if raw.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "MARQUEE_API_URL".to_string(),
                "URL cannot be empty".to_string(),
            ));
        }

        let parsed = url::Url::parse(raw)
            .map_err(|e| ConfigError::InvalidUrl("MARQUEE_API_URL".to_string(), e.to_string()))?;

        match parsed.scheme() {
            "http" | "https" => Ok(()),
            other => Err(ConfigError::InvalidUrl(
                "MARQUEE_API_URL".to_string(),
                format!("unsupported scheme '{}'", other),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_config() {
        let config = CatalogConfig::new("http://catalog:8080");
        assert_eq!(config.url, "http://catalog:8080");
        assert!(config.api_token.is_none());
        assert_eq!(config.timeout_secs, 10);
    }

    #[test]
    fn test_api_url() {
        let config = CatalogConfig::new("http://catalog:8080");
        assert_eq!(
            config.api_url("import/status"),
            "http://catalog:8080/api/import/status"
        );
        assert_eq!(
            config.api_url("/episodes/42/intro"),
            "http://catalog:8080/api/episodes/42/intro"
        );
    }

    #[test]
    fn test_api_url_with_trailing_slash() {
        let config = CatalogConfig::new("http://catalog:8080/");
        assert_eq!(
            config.api_url("import/stats"),
            "http://catalog:8080/api/import/stats"
        );
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = CatalogConfig::new("http://catalog:8080").with_token("super-secret");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_validate_url() {
        assert!(CatalogConfig::validate_url("https://media.example.org").is_ok());
        assert!(matches!(
            CatalogConfig::validate_url(""),
            Err(ConfigError::InvalidValue(..))
        ));
        assert!(matches!(
            CatalogConfig::validate_url("ftp://media.example.org"),
            Err(ConfigError::InvalidUrl(..))
        ));
        assert!(matches!(
            CatalogConfig::validate_url("not a url"),
            Err(ConfigError::InvalidUrl(..))
        ));
    }
}
