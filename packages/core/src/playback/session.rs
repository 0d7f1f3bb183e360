//! Per-episode playback session driver
//!
//! A session owns the clock, both timed controllers, the track registry and
//! every timer they asked for. The host calls [`PlaybackSession::tick`] on a
//! fixed cadence with the elapsed session time; each tick first dispatches
//! timers that came due, then samples the element exactly once and feeds
//! that snapshot to the intro-skip and next-up controllers, in that order.
//!
//! Timers never outlive the state they were created for: changing episode,
//! tearing down or dropping the session cancels all of them.

use std::collections::HashMap;
use std::time::Duration;

use marquee_catalog_client::IntroMarker;
use marquee_shared_config::PlaybackConfig;
use serde::Serialize;
use tracing::{debug, instrument};

use super::clock::{MediaElement, PlaybackClock};
use super::effect::{Effect, TimerSlot};
use super::episode::EpisodeRef;
use super::intro_skip::{IntroSkipController, SkipVisibilityState};
use super::next_up::{CountdownState, NextUpController};
use super::snapshot::PlaybackSnapshot;
use super::timer::{TimerId, TimerQueue};
use super::tracks::TrackSelectionRegistry;
use crate::activity_log::ActivityLog;

/// Caller-provided "near end of media" predicate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearEndPolicy {
    /// Remaining seconds at or below which the episode counts as ending
    pub threshold_secs: f64,
    /// Autoplay switch; when off nothing is ever near the end
    pub enabled: bool,
}

impl NearEndPolicy {
    pub fn new(threshold_secs: f64) -> Self {
        Self {
            threshold_secs,
            enabled: true,
        }
    }

    pub fn from_config(config: &PlaybackConfig) -> Self {
        Self {
            threshold_secs: config.near_end_secs,
            enabled: config.autoplay_enabled,
        }
    }

    /// Unknown durations are never near the end
    pub fn is_near_end(&self, snapshot: &PlaybackSnapshot) -> bool {
        self.enabled
            && snapshot
                .remaining_seconds()
                .is_some_and(|remaining| remaining <= self.threshold_secs)
    }
}

/// Something the host has to act on
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Switch to this episode (auto-advance or "play now")
    PlayNext(EpisodeRef),
    /// The intro was skipped; the playhead was sent to `to`
    IntroSkipped { to: f64 },
}

/// Everything a view needs to render one tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionView {
    pub snapshot: PlaybackSnapshot,
    pub skip: SkipVisibilityState,
    pub countdown: Option<CountdownState>,
    pub buffered_fraction: f64,
    #[serde(skip)]
    pub events: Vec<SessionEvent>,
}

pub struct PlaybackSession<M: MediaElement> {
    clock: PlaybackClock<M>,
    intro: IntroSkipController,
    next_up: NextUpController,
    tracks: TrackSelectionRegistry,
    timers: TimerQueue,
    slots: HashMap<TimerSlot, TimerId>,
    episode: EpisodeRef,
    marker: Option<IntroMarker>,
    next_episode: Option<EpisodeRef>,
    near_end: NearEndPolicy,
    log: ActivityLog,
    now: Duration,
    torn_down: bool,
}

impl<M: MediaElement> PlaybackSession<M> {
    pub fn new(element: M, episode: EpisodeRef, config: &PlaybackConfig, log: ActivityLog) -> Self {
        Self {
            clock: PlaybackClock::new(element),
            intro: IntroSkipController::new(Duration::from_millis(config.intro_skip_delay_ms)),
            next_up: NextUpController::new(config.autoplay_delay_secs),
            tracks: TrackSelectionRegistry::new(),
            timers: TimerQueue::new(),
            slots: HashMap::new(),
            episode,
            marker: None,
            next_episode: None,
            near_end: NearEndPolicy::from_config(config),
            log,
            now: Duration::ZERO,
            torn_down: false,
        }
    }

    /// Advance the session to `now` (time since the session started)
    pub fn tick(&mut self, now: Duration) -> SessionView {
        let mut events = Vec::new();

        if self.torn_down {
            return self.view(self.clock.sample(), events);
        }
        self.now = self.now.max(now);

        for id in self.timers.due(self.now) {
            // Firings of a timer cancelled earlier in this batch are stale
            let Some(slot) = self.slot_of(id) else {
                continue;
            };
            match slot {
                TimerSlot::IntroSkipDelay => {
                    self.slots.remove(&slot);
                    if self.intro.on_delay_elapsed() {
                        debug!(episode = %self.episode.id, "Skip intro armed");
                    }
                }
                TimerSlot::NextUpTick => {
                    let effects = self.next_up.on_second();
                    self.apply(effects, &mut events);
                }
            }
        }

        let snapshot = self.clock.sample();

        let effects = self.intro.on_tick(&snapshot, self.marker.as_ref());
        self.apply(effects, &mut events);

        let near_end = self.near_end.is_near_end(&snapshot);
        let effects = self
            .next_up
            .on_tick(&self.episode.id, near_end, self.next_episode.as_ref());
        self.apply(effects, &mut events);

        self.view(snapshot, events)
    }

    fn view(&self, snapshot: PlaybackSnapshot, events: Vec<SessionEvent>) -> SessionView {
        SessionView {
            buffered_fraction: snapshot.buffered_fraction(),
            snapshot,
            skip: self.intro.state(),
            countdown: self.next_up.countdown().cloned(),
            events,
        }
    }

    fn slot_of(&self, id: TimerId) -> Option<TimerSlot> {
        self.slots
            .iter()
            .find_map(|(slot, timer)| (*timer == id).then_some(*slot))
    }

    fn cancel_slot(&mut self, slot: TimerSlot) {
        if let Some(id) = self.slots.remove(&slot) {
            self.timers.cancel(id);
        }
    }

    fn apply(&mut self, effects: Vec<Effect>, events: &mut Vec<SessionEvent>) {
        for effect in effects {
            match effect {
                Effect::StartTimer {
                    slot,
                    delay,
                    repeating,
                } => {
                    self.cancel_slot(slot);
                    let id = if repeating {
                        self.timers.schedule_repeating(self.now, delay)
                    } else {
                        self.timers.schedule_once(self.now, delay)
                    };
                    self.slots.insert(slot, id);
                }
                Effect::CancelTimer(slot) => self.cancel_slot(slot),
                Effect::Seek(to) => match self.clock.seek(to) {
                    Ok(position) => events.push(SessionEvent::IntroSkipped { to: position }),
                    Err(e) => {
                        e.log("seek");
                        self.log.error(format!("Seek failed: {}", e));
                    }
                },
                Effect::PlayNext(episode) => {
                    self.log.info(format!("Playing next: {}", episode.label()));
                    events.push(SessionEvent::PlayNext(episode));
                }
            }
        }
    }

    /// User pressed "skip intro"
    pub fn skip_intro(&mut self) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        let effects = self.intro.skip();
        self.apply(effects, &mut events);
        events
    }

    /// User dismissed the next-up prompt
    pub fn cancel_next_up(&mut self) {
        let effects = self.next_up.cancel_by_user();
        if !effects.is_empty() {
            self.log.info("Autoplay cancelled");
        }
        self.apply(effects, &mut Vec::new());
    }

    /// User pressed "play next" on the prompt
    pub fn play_next_now(&mut self) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        let effects = self.next_up.play_now_by_user();
        self.apply(effects, &mut events);
        events
    }

    /// Intro marker for the current episode (fetched asynchronously)
    pub fn set_intro_marker(&mut self, marker: Option<IntroMarker>) {
        self.marker = marker;
    }

    /// Next episode for the current one (resolved asynchronously)
    pub fn set_next_episode(&mut self, next: Option<EpisodeRef>) {
        self.next_episode = next;
    }

    fn cancel_everything(&mut self) {
        self.timers.cancel_all();
        self.slots.clear();
        // Timers are already gone; the cancel effects are redundant
        self.intro.reset();
        self.next_up.reset();
    }

    /// Switch to another episode. All timers are cancelled and per-episode
    /// state is dropped, including the track lists.
    #[instrument(skip(self, episode, marker, next), fields(episode = %episode.id))]
    pub fn change_episode(
        &mut self,
        episode: EpisodeRef,
        marker: Option<IntroMarker>,
        next: Option<EpisodeRef>,
    ) {
        self.cancel_everything();
        self.tracks.clear();
        self.log.info(format!("Now playing {}", episode.label()));
        self.episode = episode;
        self.marker = marker;
        self.next_episode = next;
        self.torn_down = false;
    }

    /// End the session. Later ticks only sample the clock.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.cancel_everything();
        self.torn_down = true;
        debug!(episode = %self.episode.id, "Playback session torn down");
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn episode(&self) -> &EpisodeRef {
        &self.episode
    }

    pub fn intro_marker(&self) -> Option<&IntroMarker> {
        self.marker.as_ref()
    }

    pub fn skip_state(&self) -> SkipVisibilityState {
        self.intro.state()
    }

    pub fn countdown(&self) -> Option<&CountdownState> {
        self.next_up.countdown()
    }

    pub fn clock(&self) -> &PlaybackClock<M> {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut PlaybackClock<M> {
        &mut self.clock
    }

    pub fn tracks(&self) -> &TrackSelectionRegistry {
        &self.tracks
    }

    pub fn tracks_mut(&mut self) -> &mut TrackSelectionRegistry {
        &mut self.tracks
    }
}

impl<M: MediaElement> Drop for PlaybackSession<M> {
    fn drop(&mut self) {
        self.teardown();
    }
}
