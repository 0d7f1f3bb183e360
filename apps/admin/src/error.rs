//! Error handling for the admin CLI
//!
//! Command failures are wrapped in [`AdminError`] so `main` can log them at
//! the right level and pick an exit code before `anyhow` reports them.

use marquee_core::{CoreError, ErrorSeverity};
use thiserror::Error;

/// Main admin error type
#[derive(Error, Debug)]
pub enum AdminError {
    // ========== Command Errors ==========
    /// Episode id missing or blank
    #[error("an episode id is required")]
    MissingEpisode,

    /// Intro window given on the command line is not usable
    #[error("invalid intro window: {0}")]
    InvalidWindow(String),

    /// The command was interrupted with Ctrl-C
    #[error("interrupted")]
    Interrupted,

    // ========== Core Errors ==========
    /// Playback or import core rejected the request
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl AdminError {
    /// Whether running the same command again later may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Core(e) => e.is_retryable(),
            _ => false,
        }
    }

    /// Get a severity level for logging
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::MissingEpisode | Self::InvalidWindow(_) | Self::Interrupted => {
                ErrorSeverity::Info
            }
            Self::Core(e) => e.severity(),
        }
    }

    /// Process exit code for this failure
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Interrupted => 130,
            Self::MissingEpisode | Self::InvalidWindow(_) => 2,
            Self::Core(_) => 1,
        }
    }

    /// Log the error with appropriate severity
    pub fn log(&self, command: &str) {
        match self.severity() {
            ErrorSeverity::Error => {
                tracing::error!(error = %self, command = command, "Admin command failed");
            }
            ErrorSeverity::Warning => {
                tracing::warn!(
                    error = %self,
                    command = command,
                    retryable = self.is_retryable(),
                    "Admin command failed"
                );
            }
            ErrorSeverity::Info => {
                tracing::info!(error = %self, command = command, "Admin command rejected");
            }
        }
    }
}

/// Result type alias for admin commands
pub type AdminResult<T> = Result<T, AdminError>;

#[cfg(test)]
mod tests {
    use super::*;
    use marquee_catalog_client::{CatalogError, MediaType};

    #[test]
    fn test_core_errors_pass_through() {
        let err: AdminError = CoreError::ImportRejected("TMDB key missing".to_string()).into();
        assert_eq!(err.to_string(), "import rejected: TMDB key missing");
        assert_eq!(err.severity(), ErrorSeverity::Error);
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_retryable_follows_core() {
        let err: AdminError = CoreError::Catalog(CatalogError::Timeout).into();
        assert!(err.is_retryable());

        let err: AdminError = CoreError::JobAlreadyRunning {
            media_type: MediaType::Series,
        }
        .into();
        assert!(!err.is_retryable());
        assert_eq!(err.severity(), ErrorSeverity::Info);
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(AdminError::Interrupted.exit_code(), 130);
        assert_eq!(AdminError::MissingEpisode.exit_code(), 2);
        assert_eq!(
            AdminError::InvalidWindow("start is negative".to_string()).exit_code(),
            2
        );
    }
}
