//! Audio and subtitle track selection

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackType {
    Audio,
    Subtitle,
}

impl fmt::Display for TrackType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackType::Audio => f.write_str("audio"),
            TrackType::Subtitle => f.write_str("subtitle"),
        }
    }
}

/// One selectable track as reported by the media element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackDescriptor {
    /// BCP 47 tag when known, e.g. `en-US`
    pub language: Option<String>,
    pub label: String,
    /// Element-specific kind, e.g. `main`, `commentary`, `captions`
    pub kind: String,
}

impl TrackDescriptor {
    pub fn new(language: Option<&str>, label: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            language: language.map(str::to_string),
            label: label.into(),
            kind: kind.into(),
        }
    }
}

/// Available tracks and the active selection for one episode.
///
/// Exactly one audio track is active once audio tracks exist. Subtitles may
/// be off (`None`).
#[derive(Debug, Default, Clone)]
pub struct TrackSelectionRegistry {
    audio: Vec<TrackDescriptor>,
    subtitles: Vec<TrackDescriptor>,
    active_audio: Option<usize>,
    active_subtitle: Option<usize>,
}

impl TrackSelectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the track list for one kind. Audio falls back to the first
    /// track, subtitles to off.
    pub fn replace_tracks(&mut self, kind: TrackType, tracks: Vec<TrackDescriptor>) {
        match kind {
            TrackType::Audio => {
                self.active_audio = (!tracks.is_empty()).then_some(0);
                self.audio = tracks;
            }
            TrackType::Subtitle => {
                self.active_subtitle = None;
                self.subtitles = tracks;
            }
        }
    }

    pub fn tracks(&self, kind: TrackType) -> &[TrackDescriptor] {
        match kind {
            TrackType::Audio => &self.audio,
            TrackType::Subtitle => &self.subtitles,
        }
    }

    /// Select a track by index; `None` turns subtitles off and is rejected
    /// for audio
    pub fn select_track(&mut self, kind: TrackType, index: Option<usize>) -> CoreResult<()> {
        let available = self.tracks(kind).len();

        match (kind, index) {
            (TrackType::Audio, None) => Err(CoreError::AudioTrackRequired),
            (TrackType::Subtitle, None) => {
                self.active_subtitle = None;
                Ok(())
            }
            (_, Some(index)) if index >= available => Err(CoreError::InvalidTrackIndex {
                kind,
                index,
                available,
            }),
            (TrackType::Audio, Some(index)) => {
                self.active_audio = Some(index);
                Ok(())
            }
            (TrackType::Subtitle, Some(index)) => {
                self.active_subtitle = Some(index);
                Ok(())
            }
        }
    }

    pub fn disable_subtitles(&mut self) {
        self.active_subtitle = None;
    }

    pub fn active(&self, kind: TrackType) -> Option<usize> {
        match kind {
            TrackType::Audio => self.active_audio,
            TrackType::Subtitle => self.active_subtitle,
        }
    }

    pub fn active_descriptor(&self, kind: TrackType) -> Option<&TrackDescriptor> {
        self.active(kind).and_then(|index| self.tracks(kind).get(index))
    }

    /// First track whose language matches `language` (case-insensitive,
    /// `en` matches `en-US`). Selection is left to the caller.
    pub fn find_by_language(&self, kind: TrackType, language: &str) -> Option<usize> {
        let wanted = language.trim().to_ascii_lowercase();
        if wanted.is_empty() {
            return None;
        }
        self.tracks(kind).iter().position(|track| {
            track.language.as_deref().is_some_and(|lang| {
                let lang = lang.to_ascii_lowercase();
                lang == wanted || lang.starts_with(&format!("{}-", wanted))
            })
        })
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
