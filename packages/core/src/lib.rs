//! Playback and background-job orchestration for Marquee
//!
//! Two independent halves share one shape: a client-side state machine
//! reacting to an external clock.
//!
//! - [`playback`]: delayed skip-intro visibility, the end-of-episode
//!   countdown, track selection and the session driver that owns their
//!   timers.
//! - [`import`]: start/stop/poll/chain control of server-side catalog import
//!   jobs.
//!
//! Both report through the bounded [`ActivityLog`].
//!
//! # Example
//!
//! ```rust,no_run
//! use marquee_catalog_client::{CatalogClient, MediaType};
//! use marquee_core::{ActivityLog, BulkImportOrchestrator, ImportSettings};
//! use marquee_shared_config::CatalogConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = CatalogClient::new(&CatalogConfig::new("http://localhost:8080"))?;
//! let log = ActivityLog::default();
//! let orchestrator = BulkImportOrchestrator::new(client, log.clone(), ImportSettings::default());
//!
//! orchestrator.start_all(Some(50)).await?;
//! orchestrator.wait_idle().await;
//!
//! for entry in log.entries() {
//!     println!("{} {}", entry.display_time(), entry.message);
//! }
//! # Ok(())
//! # }
//! ```

pub mod activity_log;
pub mod error;
pub mod image_cache;
pub mod import;
pub mod playback;

pub use activity_log::{ActivityLog, ActivityLogEntry, Severity, DEFAULT_ACTIVITY_LOG_CAPACITY};
pub use error::{CoreError, CoreResult, ErrorKind, ErrorSeverity};
pub use image_cache::ImageLoadCache;
pub use import::{BulkImportOrchestrator, ImportChain, ImportEvent, ImportJobRunner, ImportSettings};
pub use playback::{
    CountdownState, EpisodeRef, IntroMarkerEditor, IntroSkipController, MarkerStore,
    MediaElement, NextUpController, PlaybackClock, PlaybackSession, PlaybackSnapshot,
    SessionEvent, SessionView, SkipVisibilityState, TrackDescriptor, TrackSelectionRegistry,
    TrackType,
};
