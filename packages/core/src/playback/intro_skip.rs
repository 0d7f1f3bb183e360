//! Delayed skip-intro visibility
//!
//! The button is shown only after the playhead has stayed inside the intro
//! window for the configured dwell time, and disappears the moment it
//! leaves. Controllers never own timers: they ask for them through
//! [`Effect`]s and are told when they fire.

use std::time::Duration;

use marquee_catalog_client::IntroMarker;
use serde::Serialize;

use super::effect::{Effect, TimerSlot};
use super::snapshot::PlaybackSnapshot;

/// Skip button state exposed to the view
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SkipVisibilityState {
    pub in_window: bool,
    pub armed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Hidden,
    /// Hidden, waiting on the dwell timer
    Pending,
    Armed,
}

#[derive(Debug)]
pub struct IntroSkipController {
    delay: Duration,
    phase: Phase,
    in_window: bool,
    // Set by a skip; cleared once the playhead leaves the window
    suppressed: bool,
    marker: Option<IntroMarker>,
}

impl IntroSkipController {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            phase: Phase::Hidden,
            in_window: false,
            suppressed: false,
            marker: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Evaluate one snapshot against the episode's intro marker.
    /// A missing or malformed marker keeps the controller hidden.
    pub fn on_tick(
        &mut self,
        snapshot: &PlaybackSnapshot,
        marker: Option<&IntroMarker>,
    ) -> Vec<Effect> {
        self.marker = marker.copied().filter(IntroMarker::is_valid);
        self.in_window = self
            .marker
            .map_or(false, |m| m.contains(snapshot.current_time));

        let mut effects = Vec::new();

        if !self.in_window {
            if self.phase == Phase::Pending {
                effects.push(Effect::CancelTimer(TimerSlot::IntroSkipDelay));
            }
            self.phase = Phase::Hidden;
            self.suppressed = false;
            return effects;
        }

        if self.phase == Phase::Hidden && !self.suppressed {
            if self.delay.is_zero() {
                self.phase = Phase::Armed;
            } else {
                self.phase = Phase::Pending;
                effects.push(Effect::StartTimer {
                    slot: TimerSlot::IntroSkipDelay,
                    delay: self.delay,
                    repeating: false,
                });
            }
        }

        effects
    }

    /// The dwell timer fired. Returns true if the button became visible.
    pub fn on_delay_elapsed(&mut self) -> bool {
        if self.phase != Phase::Pending {
            return false;
        }
        if self.in_window {
            self.phase = Phase::Armed;
            true
        } else {
            self.phase = Phase::Hidden;
            false
        }
    }

    /// User pressed skip: jump to the end of the intro and hide
    pub fn skip(&mut self) -> Vec<Effect> {
        let Some(marker) = self.marker.filter(|_| self.in_window) else {
            return Vec::new();
        };

        let mut effects = Vec::new();
        if self.phase == Phase::Pending {
            effects.push(Effect::CancelTimer(TimerSlot::IntroSkipDelay));
        }
        self.phase = Phase::Hidden;
        self.suppressed = true;
        effects.push(Effect::Seek(marker.end));
        effects
    }

    /// Forget everything, e.g. on episode change
    pub fn reset(&mut self) -> Vec<Effect> {
        let effects = if self.phase == Phase::Pending {
            vec![Effect::CancelTimer(TimerSlot::IntroSkipDelay)]
        } else {
            Vec::new()
        };
        self.phase = Phase::Hidden;
        self.in_window = false;
        self.suppressed = false;
        self.marker = None;
        effects
    }

    pub fn state(&self) -> SkipVisibilityState {
        SkipVisibilityState {
            in_window: self.in_window,
            armed: self.phase == Phase::Armed,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.phase == Phase::Armed
    }

    pub fn is_pending(&self) -> bool {
        self.phase == Phase::Pending
    }
}
