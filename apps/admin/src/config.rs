//! Admin CLI configuration loaded from environment variables
//!
//! Everything shared with the other Marquee components comes from
//! [`CommonConfig`]; the admin binary only adds how hard it retries the
//! catalog and whether the activity log is printed on exit.

use std::env;

use anyhow::{ensure, Context, Result};
use marquee_core::ImportSettings;
use marquee_shared_config::{CatalogConfig, CommonConfig, Environment, ImportConfig};

/// Most retries allowed per catalog request
const MAX_RETRY_ATTEMPTS: u32 = 10;

/// Admin configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Common configuration shared with other components
    pub common: CommonConfig,

    /// Attempts per idempotent catalog request
    pub retry_attempts: u32,

    /// Base delay between catalog retries in milliseconds
    pub retry_delay_ms: u64,

    /// Print the activity log when the command finishes
    pub print_activity: bool,
}

impl Config {
    /// Load configuration, taking the catalog URL from `api_url` when given
    /// and from `MARQUEE_API_URL` otherwise
    pub fn load(api_url: Option<&str>) -> Result<Self> {
        let common = match api_url {
            Some(url) => CatalogConfig::from_url(url)
                .and_then(CommonConfig::with_catalog)
                .with_context(|| format!("Failed to load config for {}", url))?,
            None => CommonConfig::from_env().context("Failed to load config")?,
        };

        let retry_attempts: u32 = env::var("MARQUEE_ADMIN_RETRY_ATTEMPTS")
            .unwrap_or_else(|_| "3".to_string())
            .parse()
            .context("Invalid MARQUEE_ADMIN_RETRY_ATTEMPTS value")?;
        ensure!(
            retry_attempts <= MAX_RETRY_ATTEMPTS,
            "MARQUEE_ADMIN_RETRY_ATTEMPTS must be at most {}, got {}",
            MAX_RETRY_ATTEMPTS,
            retry_attempts
        );

        Ok(Self {
            common,
            retry_attempts,

            retry_delay_ms: env::var("MARQUEE_ADMIN_RETRY_DELAY_MS")
                .unwrap_or_else(|_| "500".to_string())
                .parse()
                .context("Invalid MARQUEE_ADMIN_RETRY_DELAY_MS value")?,

            print_activity: env::var("MARQUEE_ADMIN_PRINT_ACTIVITY")
                .unwrap_or_else(|_| "true".to_string())
                .parse()
                .context("Invalid MARQUEE_ADMIN_PRINT_ACTIVITY value")?,
        })
    }

    pub fn catalog(&self) -> &CatalogConfig {
        &self.common.catalog
    }

    pub fn import(&self) -> &ImportConfig {
        &self.common.import
    }

    /// Orchestrator settings derived from the import section
    pub fn import_settings(&self) -> ImportSettings {
        ImportSettings::from_config(&self.common.import)
    }

    pub fn environment(&self) -> Environment {
        self.common.environment
    }
}
