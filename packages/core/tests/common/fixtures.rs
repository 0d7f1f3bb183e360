//! Test fixtures for core integration tests

use std::time::Duration;

use marquee_catalog_client::{ImportJobStatus, MediaType};
use marquee_core::{ActivityLog, EpisodeRef, PlaybackSession, SessionView};
use marquee_shared_config::PlaybackConfig;

use super::mocks::FakeMediaElement;

/// Status of a job in progress
pub fn running(media_type: MediaType, page: u32) -> ImportJobStatus {
    ImportJobStatus {
        running: true,
        media_type,
        current_page: page,
        total_pages: 10,
        ..ImportJobStatus::default()
    }
}

/// Status of a job that stopped with `imported` new titles
pub fn finished(media_type: MediaType, imported: u32) -> ImportJobStatus {
    ImportJobStatus {
        running: false,
        media_type,
        imported_count: imported,
        skipped_count: 2,
        error_count: 0,
        ..ImportJobStatus::default()
    }
}

/// Playback settings used across session tests
pub fn playback_config() -> PlaybackConfig {
    PlaybackConfig {
        intro_skip_delay_ms: 1500,
        autoplay_delay_secs: 10,
        near_end_secs: 30.0,
        autoplay_enabled: true,
        tick_interval_ms: 100,
    }
}

pub fn pilot() -> EpisodeRef {
    EpisodeRef::new("s01e01", "Pilot").with_position(1, 1)
}

pub fn second_episode() -> EpisodeRef {
    EpisodeRef::new("s01e02", "The Return").with_position(1, 2)
}

/// Session on a 20-minute pilot
pub fn session() -> PlaybackSession<FakeMediaElement> {
    PlaybackSession::new(
        FakeMediaElement::new(1200.0),
        pilot(),
        &playback_config(),
        ActivityLog::default(),
    )
}

/// Put the playhead at `ms` of media time and tick at the same instant
pub fn tick_at(session: &mut PlaybackSession<FakeMediaElement>, ms: u64) -> SessionView {
    session.clock_mut().element_mut().time = ms as f64 / 1000.0;
    session.tick(Duration::from_millis(ms))
}

/// Tick with the playhead at `seconds` but session time at `now_ms`
pub fn tick_with(
    session: &mut PlaybackSession<FakeMediaElement>,
    now_ms: u64,
    seconds: f64,
) -> SessionView {
    session.clock_mut().element_mut().time = seconds;
    session.tick(Duration::from_millis(now_ms))
}
