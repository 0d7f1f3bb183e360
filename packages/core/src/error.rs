//! Error types for the playback and import core
//!
//! Every variant belongs to one of four kinds, which decide how the caller
//! reacts: configuration errors are shown and never retried, transient errors
//! are logged and retried on the normal cadence, validation errors are
//! rejected before any network call, and state errors carry enough detail for
//! the caller to resume instead of failing.

use marquee_catalog_client::{CatalogError, MediaType};
use thiserror::Error;

use crate::playback::TrackType;

/// Main core error type
#[derive(Error, Debug)]
pub enum CoreError {
    // ========== Validation Errors ==========
    /// Seek target is not a number (or infinite with an unknown duration)
    #[error("invalid seek target: {0}")]
    InvalidSeekTarget(f64),

    /// Volume outside what the element accepts
    #[error("invalid volume: {0}")]
    InvalidVolume(f64),

    /// Playback rate must be a positive, finite number
    #[error("invalid playback rate: {0}")]
    InvalidPlaybackRate(f64),

    /// Track index does not exist in the current list
    #[error("no {kind} track at index {index} ({available} available)")]
    InvalidTrackIndex {
        kind: TrackType,
        index: usize,
        available: usize,
    },

    /// Audio has no "off" state once tracks exist
    #[error("an audio track must stay selected")]
    AudioTrackRequired,

    /// Intro marker whose end is not after its start
    #[error("intro end ({end:.1}s) must be after intro start ({start:.1}s)")]
    InvalidMarker { start: f64, end: f64 },

    /// Catch-all for input rejected locally by the catalog client
    #[error("invalid input: {0}")]
    InvalidInput(String),

    // ========== Configuration Errors ==========
    /// Server refused to start an import (e.g. provider credentials missing)
    #[error("import rejected: {0}")]
    ImportRejected(String),

    /// Catalog credentials missing or refused
    #[error("not authorized to use the catalog API")]
    Unauthorized,

    // ========== State Errors ==========
    /// A job is already running according to the last poll
    #[error("an import job is already running ({media_type})")]
    JobAlreadyRunning { media_type: MediaType },

    // ========== Catalog/Network Errors ==========
    /// Catalog request failed
    #[error("catalog request failed: {0}")]
    Catalog(CatalogError),
}

/// Broad category of a [`CoreError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Surfaced immediately, no retry
    Configuration,
    /// Logged and retried on a fixed interval
    Transient,
    /// Rejected locally before any network call
    Validation,
    /// Conflicts with known state (e.g. job already running)
    State,
}

/// Error severity levels for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Needs operator attention
    Error,
    /// Expected failures that resolve on their own
    Warning,
    /// User mistakes and conflicts
    Info,
}

impl CoreError {
    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidSeekTarget(_)
            | Self::InvalidVolume(_)
            | Self::InvalidPlaybackRate(_)
            | Self::InvalidTrackIndex { .. }
            | Self::AudioTrackRequired
            | Self::InvalidMarker { .. }
            | Self::InvalidInput(_) => ErrorKind::Validation,
            Self::ImportRejected(_) | Self::Unauthorized => ErrorKind::Configuration,
            Self::JobAlreadyRunning { .. } => ErrorKind::State,
            Self::Catalog(e) if e.is_retryable() => ErrorKind::Transient,
            // Non-retryable transport failures (bad payloads, unexpected 4xx)
            // will not fix themselves on retry either.
            Self::Catalog(_) => ErrorKind::Configuration,
        }
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Transient
    }

    /// Get a severity level for logging
    pub fn severity(&self) -> ErrorSeverity {
        match self.kind() {
            ErrorKind::Configuration => ErrorSeverity::Error,
            ErrorKind::Transient => ErrorSeverity::Warning,
            ErrorKind::Validation | ErrorKind::State => ErrorSeverity::Info,
        }
    }

    /// Log the error with appropriate severity
    pub fn log(&self, context: &'static str) {
        match self.severity() {
            ErrorSeverity::Error => {
                tracing::error!(error = %self, context = context, "Core error");
            }
            ErrorSeverity::Warning => {
                tracing::warn!(
                    error = %self,
                    context = context,
                    retryable = self.is_retryable(),
                    "Core warning"
                );
            }
            ErrorSeverity::Info => {
                tracing::info!(error = %self, context = context, "Request rejected");
            }
        }
    }
}

impl From<CatalogError> for CoreError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Rejected(reason) => Self::ImportRejected(reason),
            CatalogError::InvalidInput(message) => Self::InvalidInput(message),
            CatalogError::Unauthorized => Self::Unauthorized,
            other => Self::Catalog(other),
        }
    }
}

/// Result type alias for core operations
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(CoreError::InvalidSeekTarget(f64::NAN).kind(), ErrorKind::Validation);
        assert_eq!(
            CoreError::InvalidMarker {
                start: 90.0,
                end: 30.0
            }
            .kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            CoreError::ImportRejected("missing key".to_string()).kind(),
            ErrorKind::Configuration
        );
        assert_eq!(
            CoreError::JobAlreadyRunning {
                media_type: MediaType::Movie
            }
            .kind(),
            ErrorKind::State
        );
        assert_eq!(
            CoreError::Catalog(CatalogError::Timeout).kind(),
            ErrorKind::Transient
        );
    }

    #[test]
    fn test_retryable_errors() {
        assert!(CoreError::Catalog(CatalogError::RateLimited).is_retryable());
        assert!(!CoreError::ImportRejected("nope".to_string()).is_retryable());
        assert!(!CoreError::AudioTrackRequired.is_retryable());
    }

    #[test]
    fn test_from_catalog_error() {
        let err: CoreError = CatalogError::Rejected("TMDB key missing".to_string()).into();
        assert!(matches!(err, CoreError::ImportRejected(ref r) if r == "TMDB key missing"));

        let err: CoreError = CatalogError::Unauthorized.into();
        assert!(matches!(err, CoreError::Unauthorized));

        let err: CoreError = CatalogError::Timeout.into();
        assert!(matches!(err, CoreError::Catalog(CatalogError::Timeout)));
    }

    #[test]
    fn test_error_display() {
        let err = CoreError::InvalidMarker {
            start: 90.0,
            end: 30.0,
        };
        assert_eq!(
            err.to_string(),
            "intro end (30.0s) must be after intro start (90.0s)"
        );

        let err = CoreError::InvalidTrackIndex {
            kind: TrackType::Subtitle,
            index: 4,
            available: 2,
        };
        assert_eq!(err.to_string(), "no subtitle track at index 4 (2 available)");
    }

    #[test]
    fn test_severity_levels() {
        assert_eq!(
            CoreError::ImportRejected("x".to_string()).severity(),
            ErrorSeverity::Error
        );
        assert_eq!(
            CoreError::Catalog(CatalogError::Timeout).severity(),
            ErrorSeverity::Warning
        );
        assert_eq!(CoreError::AudioTrackRequired.severity(), ErrorSeverity::Info);
    }
}
