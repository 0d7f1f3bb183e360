//! Point-in-time view of the media element

use serde::Serialize;

/// One contiguous buffered span, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BufferedRange {
    pub start: f64,
    pub end: f64,
}

impl BufferedRange {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, seconds: f64) -> bool {
        seconds >= self.start && seconds <= self.end
    }
}

/// Sort ranges by start and merge overlapping or touching spans.
/// Non-finite and inverted ranges are dropped.
pub fn normalize_ranges(raw: &[(f64, f64)]) -> Vec<BufferedRange> {
    let mut ranges: Vec<BufferedRange> = raw
        .iter()
        .filter(|(start, end)| start.is_finite() && end.is_finite() && end >= start)
        .map(|&(start, end)| BufferedRange::new(start.max(0.0), end.max(0.0)))
        .collect();
    ranges.sort_by(|a, b| a.start.total_cmp(&b.start));

    let mut merged: Vec<BufferedRange> = Vec::with_capacity(ranges.len());
    for range in ranges {
        match merged.last_mut() {
            Some(last) if range.start <= last.end => last.end = last.end.max(range.end),
            _ => merged.push(range),
        }
    }
    merged
}

/// Normalized playback state sampled once per tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaybackSnapshot {
    /// Position in seconds, never negative
    pub current_time: f64,
    /// `None` until the element knows the media length
    pub duration: Option<f64>,
    pub is_playing: bool,
    pub buffered: Vec<BufferedRange>,
    pub volume: f64,
    pub is_muted: bool,
    pub playback_rate: f64,
}

impl Default for PlaybackSnapshot {
    fn default() -> Self {
        Self {
            current_time: 0.0,
            duration: None,
            is_playing: false,
            buffered: Vec::new(),
            volume: 1.0,
            is_muted: false,
            playback_rate: 1.0,
        }
    }
}

impl PlaybackSnapshot {
    /// Snapshot at `current_time` of media with a known `duration`
    pub fn at(current_time: f64, duration: f64) -> Self {
        Self {
            current_time,
            duration: Some(duration),
            ..Self::default()
        }
    }

    /// Seconds left before the end; `None` while the duration is unknown
    pub fn remaining_seconds(&self) -> Option<f64> {
        self.duration
            .map(|duration| (duration - self.current_time).max(0.0))
    }

    /// Position as a fraction of the duration, in [0, 1]
    pub fn progress_fraction(&self) -> f64 {
        match self.duration {
            Some(duration) if duration > 0.0 => (self.current_time / duration).clamp(0.0, 1.0),
            _ => 0.0,
        }
    }

    /// The buffered range containing the current position, if any
    pub fn buffered_range_at_current(&self) -> Option<BufferedRange> {
        self.buffered
            .iter()
            .copied()
            .find(|range| range.contains(self.current_time))
    }

    /// End of the buffered range around the playhead as a fraction of the
    /// duration; zero when the playhead sits outside every range
    pub fn buffered_fraction(&self) -> f64 {
        match (self.duration, self.buffered_range_at_current()) {
            (Some(duration), Some(range)) if duration > 0.0 => {
                (range.end / duration).clamp(0.0, 1.0)
            }
            _ => 0.0,
        }
    }
}
