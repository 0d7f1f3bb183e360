//! Adapter over the underlying media element
//!
//! [`MediaElement`] is the raw surface of a video element. Its readings may
//! be garbage while media is loading (NaN duration, position slightly past
//! the end). [`PlaybackClock`] normalizes every reading into a
//! [`PlaybackSnapshot`] and validates commands before they reach the element.

use tracing::debug;

use super::snapshot::{normalize_ranges, PlaybackSnapshot};
use crate::error::{CoreError, CoreResult};

/// Raw media element surface
pub trait MediaElement {
    fn current_time(&self) -> f64;
    /// NaN or infinite while the length is unknown
    fn duration(&self) -> f64;
    /// Buffered spans as reported by the element, unsorted
    fn buffered(&self) -> Vec<(f64, f64)>;
    fn paused(&self) -> bool;
    fn ended(&self) -> bool;
    fn volume(&self) -> f64;
    fn muted(&self) -> bool;
    fn playback_rate(&self) -> f64;

    fn play(&mut self);
    fn pause(&mut self);
    fn set_current_time(&mut self, seconds: f64);
    fn set_volume(&mut self, volume: f64);
    fn set_muted(&mut self, muted: bool);
    fn set_playback_rate(&mut self, rate: f64);
    /// Returns false when the platform refused the request
    fn request_fullscreen(&mut self) -> bool;
    fn exit_fullscreen(&mut self);
}

/// Normalizing wrapper around a [`MediaElement`]
#[derive(Debug)]
pub struct PlaybackClock<M> {
    element: M,
    fullscreen: bool,
}

impl<M: MediaElement> PlaybackClock<M> {
    pub fn new(element: M) -> Self {
        Self {
            element,
            fullscreen: false,
        }
    }

    fn known_duration(&self) -> Option<f64> {
        let duration = self.element.duration();
        (duration.is_finite() && duration > 0.0).then_some(duration)
    }

    /// Read the element once and normalize the readings
    pub fn sample(&self) -> PlaybackSnapshot {
        let duration = self.known_duration();

        let raw_time = self.element.current_time();
        let mut current_time = if raw_time.is_finite() {
            raw_time.max(0.0)
        } else {
            0.0
        };
        if let Some(duration) = duration {
            current_time = current_time.min(duration);
        }

        let volume = self.element.volume();
        let rate = self.element.playback_rate();

        PlaybackSnapshot {
            current_time,
            duration,
            is_playing: !self.element.paused() && !self.element.ended(),
            buffered: normalize_ranges(&self.element.buffered()),
            volume: if volume.is_finite() {
                volume.clamp(0.0, 1.0)
            } else {
                1.0
            },
            is_muted: self.element.muted(),
            playback_rate: if rate.is_finite() && rate > 0.0 {
                rate
            } else {
                1.0
            },
        }
    }

    /// Seek to `seconds`, clamped to the media bounds. Returns the position
    /// actually requested from the element.
    pub fn seek(&mut self, seconds: f64) -> CoreResult<f64> {
        if seconds.is_nan() {
            return Err(CoreError::InvalidSeekTarget(seconds));
        }

        let target = match self.known_duration() {
            Some(duration) => seconds.clamp(0.0, duration),
            None if seconds.is_infinite() => return Err(CoreError::InvalidSeekTarget(seconds)),
            None => seconds.max(0.0),
        };

        debug!(requested = seconds, target = target, "Seeking");
        self.element.set_current_time(target);
        Ok(target)
    }

    /// Seek relative to the current position
    pub fn skip_by(&mut self, delta: f64) -> CoreResult<f64> {
        let current = self.sample().current_time;
        self.seek(current + delta)
    }

    /// Set volume, clamped to [0, 1]
    pub fn set_volume(&mut self, volume: f64) -> CoreResult<f64> {
        if volume.is_nan() {
            return Err(CoreError::InvalidVolume(volume));
        }
        let volume = volume.clamp(0.0, 1.0);
        self.element.set_volume(volume);
        Ok(volume)
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.element.set_muted(muted);
    }

    pub fn set_playback_rate(&mut self, rate: f64) -> CoreResult<()> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(CoreError::InvalidPlaybackRate(rate));
        }
        self.element.set_playback_rate(rate);
        Ok(())
    }

    pub fn play(&mut self) {
        self.element.play();
    }

    pub fn pause(&mut self) {
        self.element.pause();
    }

    /// Toggle between playing and paused; returns whether playback is now
    /// running
    pub fn toggle_play(&mut self) -> bool {
        if self.element.paused() || self.element.ended() {
            self.element.play();
            true
        } else {
            self.element.pause();
            false
        }
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    /// Enter fullscreen unless already there; returns whether it is active
    pub fn request_fullscreen(&mut self) -> bool {
        if !self.fullscreen {
            self.fullscreen = self.element.request_fullscreen();
        }
        self.fullscreen
    }

    /// Leave fullscreen if active
    pub fn exit_fullscreen(&mut self) {
        if self.fullscreen {
            self.element.exit_fullscreen();
            self.fullscreen = false;
        }
    }

    /// Record a fullscreen change made outside the clock, e.g. the platform's
    /// own escape key
    pub fn fullscreen_changed(&mut self, active: bool) {
        self.fullscreen = active;
    }

    /// Enter or leave fullscreen; returns the resulting state
    pub fn toggle_fullscreen(&mut self) -> bool {
        if self.fullscreen {
            self.exit_fullscreen();
            false
        } else {
            self.request_fullscreen()
        }
    }

    pub fn element(&self) -> &M {
        &self.element
    }

    pub fn element_mut(&mut self) -> &mut M {
        &mut self.element
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::MediaElement;

    /// In-memory media element for controller tests
    #[derive(Debug, Clone)]
    pub struct FakeElement {
        pub time: f64,
        pub duration: f64,
        pub buffered: Vec<(f64, f64)>,
        pub paused: bool,
        pub ended: bool,
        pub volume: f64,
        pub muted: bool,
        pub rate: f64,
        pub allow_fullscreen: bool,
        pub fullscreen_requests: u32,
        pub fullscreen_exits: u32,
        pub seeks: Vec<f64>,
    }

    impl FakeElement {
        pub fn new(duration: f64) -> Self {
            Self {
                time: 0.0,
                duration,
                buffered: Vec::new(),
                paused: true,
                ended: false,
                volume: 1.0,
                muted: false,
                rate: 1.0,
                allow_fullscreen: true,
                fullscreen_requests: 0,
                fullscreen_exits: 0,
                seeks: Vec::new(),
            }
        }
    }

    impl MediaElement for FakeElement {
        fn current_time(&self) -> f64 {
            self.time
        }
        fn duration(&self) -> f64 {
            self.duration
        }
        fn buffered(&self) -> Vec<(f64, f64)> {
            self.buffered.clone()
        }
        fn paused(&self) -> bool {
            self.paused
        }
        fn ended(&self) -> bool {
            self.ended
        }
        fn volume(&self) -> f64 {
            self.volume
        }
        fn muted(&self) -> bool {
            self.muted
        }
        fn playback_rate(&self) -> f64 {
            self.rate
        }
        fn play(&mut self) {
            self.paused = false;
        }
        fn pause(&mut self) {
            self.paused = true;
        }
        fn set_current_time(&mut self, seconds: f64) {
            self.seeks.push(seconds);
            self.time = seconds;
        }
        fn set_volume(&mut self, volume: f64) {
            self.volume = volume;
        }
        fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
        }
        fn set_playback_rate(&mut self, rate: f64) {
            self.rate = rate;
        }
        fn request_fullscreen(&mut self) -> bool {
            self.fullscreen_requests += 1;
            self.allow_fullscreen
        }
        fn exit_fullscreen(&mut self) {
            self.fullscreen_exits += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::FakeElement;
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_sample_normalizes_unknown_duration() {
        let mut element = FakeElement::new(f64::NAN);
        element.time = -0.2;
        let clock = PlaybackClock::new(element);

        let snapshot = clock.sample();
        assert_eq!(snapshot.duration, None);
        assert_eq!(snapshot.current_time, 0.0);
    }

    #[test]
    fn test_sample_clamps_past_end() {
        let mut element = FakeElement::new(120.0);
        element.time = 120.4;
        element.paused = false;
        let snapshot = PlaybackClock::new(element).sample();
        assert_eq!(snapshot.current_time, 120.0);
        assert!(snapshot.is_playing);
    }

    #[test]
    fn test_seek_clamps_to_bounds() {
        let mut clock = PlaybackClock::new(FakeElement::new(100.0));
        assert_eq!(clock.seek(150.0).unwrap(), 100.0);
        assert_eq!(clock.seek(-5.0).unwrap(), 0.0);
        assert_eq!(clock.element().seeks, vec![100.0, 0.0]);
    }

    #[test]
    fn test_seek_rejects_nan() {
        let mut clock = PlaybackClock::new(FakeElement::new(100.0));
        assert_matches!(clock.seek(f64::NAN), Err(CoreError::InvalidSeekTarget(_)));
        assert!(clock.element().seeks.is_empty());
    }

    #[test]
    fn test_seek_to_infinity_needs_duration() {
        let mut clock = PlaybackClock::new(FakeElement::new(f64::NAN));
        assert_matches!(
            clock.seek(f64::INFINITY),
            Err(CoreError::InvalidSeekTarget(_))
        );
        assert_eq!(clock.seek(12.0).unwrap(), 12.0);
    }

    #[test]
    fn test_skip_by_is_relative() {
        let mut element = FakeElement::new(100.0);
        element.time = 40.0;
        let mut clock = PlaybackClock::new(element);
        assert_eq!(clock.skip_by(-10.0).unwrap(), 30.0);
        assert_eq!(clock.skip_by(500.0).unwrap(), 100.0);
    }

    #[test]
    fn test_volume_and_rate_validation() {
        let mut clock = PlaybackClock::new(FakeElement::new(100.0));
        assert_eq!(clock.set_volume(1.7).unwrap(), 1.0);
        assert_matches!(clock.set_volume(f64::NAN), Err(CoreError::InvalidVolume(_)));
        assert_matches!(
            clock.set_playback_rate(0.0),
            Err(CoreError::InvalidPlaybackRate(_))
        );
        clock.set_playback_rate(1.5).unwrap();
        assert_eq!(clock.sample().playback_rate, 1.5);
    }

    #[test]
    fn test_toggle_play_and_fullscreen() {
        let mut clock = PlaybackClock::new(FakeElement::new(100.0));
        assert!(clock.toggle_play());
        assert!(!clock.toggle_play());

        assert!(clock.toggle_fullscreen());
        assert!(!clock.toggle_fullscreen());

        clock.element_mut().allow_fullscreen = false;
        assert!(!clock.toggle_fullscreen());
        assert!(!clock.is_fullscreen());
    }

    #[test]
    fn test_request_fullscreen_is_idempotent() {
        let mut clock = PlaybackClock::new(FakeElement::new(100.0));
        assert!(clock.request_fullscreen());
        assert!(clock.request_fullscreen());
        assert!(clock.is_fullscreen());
        assert_eq!(clock.element().fullscreen_requests, 1);

        let mut refused = PlaybackClock::new(FakeElement::new(100.0));
        refused.element_mut().allow_fullscreen = false;
        assert!(!refused.request_fullscreen());
        assert!(!refused.request_fullscreen());
        assert_eq!(refused.element().fullscreen_requests, 2);
    }

    #[test]
    fn test_exit_fullscreen_is_idempotent() {
        let mut clock = PlaybackClock::new(FakeElement::new(100.0));
        clock.exit_fullscreen();
        assert_eq!(clock.element().fullscreen_exits, 0);

        clock.request_fullscreen();
        clock.exit_fullscreen();
        clock.exit_fullscreen();
        assert!(!clock.is_fullscreen());
        assert_eq!(clock.element().fullscreen_exits, 1);
    }

    #[test]
    fn test_external_fullscreen_exit_resyncs_toggle() {
        let mut clock = PlaybackClock::new(FakeElement::new(100.0));
        clock.request_fullscreen();

        // Left through the platform, not the clock
        clock.fullscreen_changed(false);
        assert!(clock.toggle_fullscreen());
        assert_eq!(clock.element().fullscreen_requests, 2);
        assert_eq!(clock.element().fullscreen_exits, 0);
    }
}
