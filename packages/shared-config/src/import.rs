//! Bulk import configuration types

use crate::{parse_env, ConfigError, ConfigResult};

/// Settings for the bulk import orchestrator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportConfig {
    /// Delay between job status polls in milliseconds
    pub poll_interval_ms: u64,

    /// Default size parameter sent with job start requests
    pub default_size: u32,

    /// Maximum number of activity log entries kept per session
    pub activity_log_capacity: usize,
}

impl ImportConfig {
    /// Load import configuration from environment variables
    pub fn from_env() -> ConfigResult<Self> {
        let config = Self {
            poll_interval_ms: parse_env("MARQUEE_IMPORT_POLL_INTERVAL_MS", 1000)?,
            default_size: parse_env("MARQUEE_IMPORT_SIZE", 50)?,
            activity_log_capacity: parse_env("MARQUEE_ACTIVITY_LOG_CAPACITY", 50)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would stall the poll loop or disable the log
    pub fn validate(&self) -> ConfigResult<()> {
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::ValidationError(
                "MARQUEE_IMPORT_POLL_INTERVAL_MS must be greater than zero".to_string(),
            ));
        }
        if self.activity_log_capacity == 0 {
            return Err(ConfigError::ValidationError(
                "MARQUEE_ACTIVITY_LOG_CAPACITY must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1000,
            default_size: 50,
            activity_log_capacity: 50,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ImportConfig::default();
        assert_eq!(config.poll_interval_ms, 1000);
        assert_eq!(config.default_size, 50);
        assert_eq!(config.activity_log_capacity, 50);
    }

    #[test]
    fn test_zero_poll_interval_is_rejected() {
        let config = ImportConfig {
            poll_interval_ms: 0,
            ..ImportConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_zero_log_capacity_is_rejected() {
        let config = ImportConfig {
            activity_log_capacity: 0,
            ..ImportConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
