//! End-of-episode auto-advance countdown

use std::time::Duration;

use serde::Serialize;

use super::effect::{Effect, TimerSlot};
use super::episode::EpisodeRef;

const TICK: Duration = Duration::from_secs(1);

/// Countdown shown while the next episode is about to start
///
/// Dismissing the prompt drops the countdown, so a countdown handed to a
/// view is always live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountdownState {
    pub remaining_seconds: u32,
    pub cancelled: bool,
    pub target_episode: Option<EpisodeRef>,
}

#[derive(Debug)]
pub struct NextUpController {
    delay_secs: u32,
    episode_id: Option<String>,
    near_end: bool,
    // Rising edge seen but no target known yet
    pending_start: bool,
    // No new countdown for this episode (cancelled or already advanced)
    latched: bool,
    countdown: Option<CountdownState>,
    last_target: Option<EpisodeRef>,
}

impl NextUpController {
    /// `delay_secs` is clamped to at least one second
    pub fn new(delay_secs: u32) -> Self {
        Self {
            delay_secs: delay_secs.max(1),
            episode_id: None,
            near_end: false,
            pending_start: false,
            latched: false,
            countdown: None,
            last_target: None,
        }
    }

    pub fn delay_secs(&self) -> u32 {
        self.delay_secs
    }

    fn stop_timer(&self) -> Vec<Effect> {
        if self.countdown.is_some() {
            vec![Effect::CancelTimer(TimerSlot::NextUpTick)]
        } else {
            Vec::new()
        }
    }

    /// Feed the near-end signal for the episode being played
    pub fn on_tick(
        &mut self,
        episode_id: &str,
        near_end: bool,
        target: Option<&EpisodeRef>,
    ) -> Vec<Effect> {
        let mut effects = Vec::new();

        if self.episode_id.as_deref() != Some(episode_id) {
            effects.extend(self.reset());
            self.episode_id = Some(episode_id.to_string());
        }
        self.last_target = target.cloned();

        if near_end && !self.near_end {
            self.pending_start = true;
        } else if !near_end && self.near_end {
            self.pending_start = false;
            // Seeking back out of the window drops the prompt; it comes back
            // with the full delay on the next rising edge
            effects.extend(self.stop_timer());
            self.countdown = None;
        }
        self.near_end = near_end;

        if self.latched {
            self.pending_start = false;
        } else if self.pending_start {
            if let Some(target) = target {
                self.pending_start = false;
                self.countdown = Some(CountdownState {
                    remaining_seconds: self.delay_secs,
                    cancelled: false,
                    target_episode: Some(target.clone()),
                });
                effects.push(Effect::StartTimer {
                    slot: TimerSlot::NextUpTick,
                    delay: TICK,
                    repeating: true,
                });
            }
        }

        effects
    }

    /// One second of the countdown elapsed
    pub fn on_second(&mut self) -> Vec<Effect> {
        let Some(countdown) = self.countdown.as_mut() else {
            return Vec::new();
        };

        countdown.remaining_seconds = countdown.remaining_seconds.saturating_sub(1);
        if countdown.remaining_seconds > 0 {
            return Vec::new();
        }

        let target = countdown.target_episode.clone();
        self.countdown = None;
        self.latched = true;

        let mut effects = vec![Effect::CancelTimer(TimerSlot::NextUpTick)];
        if let Some(target) = target {
            effects.push(Effect::PlayNext(target));
        }
        effects
    }

    /// User dismissed the prompt
    pub fn cancel_by_user(&mut self) -> Vec<Effect> {
        if !self.is_counting() {
            return Vec::new();
        }
        self.dismiss()
    }

    /// Stop the timer and drop the countdown; nothing restarts it for this
    /// episode
    fn dismiss(&mut self) -> Vec<Effect> {
        let effects = self.stop_timer();
        self.countdown = None;
        self.latched = true;
        effects
    }

    /// User asked to start the next episode right away
    pub fn play_now_by_user(&mut self) -> Vec<Effect> {
        let target = self
            .countdown
            .as_ref()
            .and_then(|c| c.target_episode.clone())
            .or_else(|| self.last_target.clone());
        let Some(target) = target else {
            return Vec::new();
        };

        let mut effects = self.dismiss();
        effects.push(Effect::PlayNext(target));
        effects
    }

    /// Drop all per-episode state
    pub fn reset(&mut self) -> Vec<Effect> {
        let effects = self.stop_timer();
        self.episode_id = None;
        self.near_end = false;
        self.pending_start = false;
        self.latched = false;
        self.countdown = None;
        self.last_target = None;
        effects
    }

    pub fn countdown(&self) -> Option<&CountdownState> {
        self.countdown.as_ref()
    }

    pub fn is_counting(&self) -> bool {
        self.countdown.is_some()
    }

    /// The prompt was dismissed or already acted on for this episode
    pub fn is_latched(&self) -> bool {
        self.latched
    }
}
