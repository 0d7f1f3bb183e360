//! Admin two-step intro marker editing
//!
//! The administrator plays the episode, presses "mark start" at the first
//! frame of the intro and "mark end" at the last; each press snapshots the
//! playhead. The marker is only saved once both ends exist and the window
//! is well-formed.

use async_trait::async_trait;
use marquee_catalog_client::{CatalogClient, CatalogResult, IntroMarker};
use tracing::{info, instrument};

use super::snapshot::PlaybackSnapshot;
use crate::error::{CoreError, CoreResult};

/// Persistence for intro markers
#[async_trait]
pub trait MarkerStore: Send + Sync {
    async fn intro_marker(&self, episode_id: &str) -> CatalogResult<Option<IntroMarker>>;
    async fn save_intro_marker(
        &self,
        episode_id: &str,
        marker: Option<IntroMarker>,
    ) -> CatalogResult<()>;
}

#[async_trait]
impl MarkerStore for CatalogClient {
    async fn intro_marker(&self, episode_id: &str) -> CatalogResult<Option<IntroMarker>> {
        CatalogClient::intro_marker(self, episode_id).await
    }

    async fn save_intro_marker(
        &self,
        episode_id: &str,
        marker: Option<IntroMarker>,
    ) -> CatalogResult<()> {
        CatalogClient::save_intro_marker(self, episode_id, marker).await
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntroMarkerEditor {
    start: Option<f64>,
    end: Option<f64>,
}

impl IntroMarkerEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start editing from an existing marker
    pub fn from_marker(marker: Option<IntroMarker>) -> Self {
        match marker {
            Some(marker) => Self {
                start: Some(marker.start),
                end: Some(marker.end),
            },
            None => Self::default(),
        }
    }

    pub fn mark_start(&mut self, snapshot: &PlaybackSnapshot) -> f64 {
        self.start = Some(snapshot.current_time);
        snapshot.current_time
    }

    pub fn mark_end(&mut self, snapshot: &PlaybackSnapshot) -> f64 {
        self.end = Some(snapshot.current_time);
        snapshot.current_time
    }

    pub fn clear_start(&mut self) {
        self.start = None;
    }

    pub fn clear_end(&mut self) {
        self.end = None;
    }

    pub fn clear(&mut self) {
        self.start = None;
        self.end = None;
    }

    pub fn start(&self) -> Option<f64> {
        self.start
    }

    pub fn end(&self) -> Option<f64> {
        self.end
    }

    /// The edited marker: `None` while either end is unset, an error when
    /// the end is not after the start
    pub fn marker(&self) -> CoreResult<Option<IntroMarker>> {
        let (Some(start), Some(end)) = (self.start, self.end) else {
            return Ok(None);
        };
        IntroMarker::new(start, end)
            .map(Some)
            .ok_or(CoreError::InvalidMarker { start, end })
    }

    /// Validate locally, then persist. An incomplete editor clears the
    /// stored marker.
    #[instrument(skip(self, store))]
    pub async fn save<S: MarkerStore + ?Sized>(
        &self,
        store: &S,
        episode_id: &str,
    ) -> CoreResult<Option<IntroMarker>> {
        let marker = self.marker()?;
        store.save_intro_marker(episode_id, marker).await?;

        match marker {
            Some(m) => info!(start = m.start, end = m.end, "Intro marker saved"),
            None => info!("Intro marker cleared"),
        }
        Ok(marker)
    }
}
