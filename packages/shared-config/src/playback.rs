//! Playback threshold configuration

use crate::{parse_env, ConfigError, ConfigResult};

/// Timing thresholds consumed by the playback controllers
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackConfig {
    /// Dwell time inside the intro window before the skip button shows
    pub intro_skip_delay_ms: u64,

    /// Countdown length before auto-advancing to the next episode
    pub autoplay_delay_secs: u32,

    /// Remaining seconds at which playback counts as "near end"
    pub near_end_secs: f64,

    /// Whether the next-up countdown is offered at all
    pub autoplay_enabled: bool,

    /// Cadence at which the host samples the playback clock
    pub tick_interval_ms: u64,
}

impl PlaybackConfig {
    /// Load playback configuration from environment variables
    pub fn from_env() -> ConfigResult<Self> {
        let config = Self {
            intro_skip_delay_ms: parse_env("MARQUEE_INTRO_SKIP_DELAY_MS", 1500)?,
            autoplay_delay_secs: parse_env("MARQUEE_AUTOPLAY_DELAY_SECS", 10)?,
            near_end_secs: parse_env("MARQUEE_NEAR_END_SECS", 30.0)?,
            autoplay_enabled: parse_env("MARQUEE_AUTOPLAY_ENABLED", true)?,
            tick_interval_ms: parse_env("MARQUEE_TICK_INTERVAL_MS", 250)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject values the controllers cannot work with
    pub fn validate(&self) -> ConfigResult<()> {
        if self.autoplay_delay_secs == 0 {
            return Err(ConfigError::ValidationError(
                "MARQUEE_AUTOPLAY_DELAY_SECS must be at least 1".to_string(),
            ));
        }
        if !self.near_end_secs.is_finite() || self.near_end_secs < 0.0 {
            return Err(ConfigError::ValidationError(
                "MARQUEE_NEAR_END_SECS must be a non-negative number".to_string(),
            ));
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ValidationError(
                "MARQUEE_TICK_INTERVAL_MS must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            intro_skip_delay_ms: 1500,
            autoplay_delay_secs: 10,
            near_end_secs: 30.0,
            autoplay_enabled: true,
            tick_interval_ms: 250,
        }
    }
}
