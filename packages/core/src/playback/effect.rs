use std::time::Duration;

use super::EpisodeRef;

/// Named timer owned by a playback controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerSlot {
    /// One-shot delay before the skip-intro affordance becomes clickable
    IntroSkipDelay,
    /// One-second countdown tick of the next-up prompt
    NextUpTick,
}

/// Side effect requested by a controller, applied by the session driver
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// (Re)start the timer in `slot`, replacing any pending one
    StartTimer {
        slot: TimerSlot,
        delay: Duration,
        repeating: bool,
    },
    /// Drop the pending timer in `slot`, if any
    CancelTimer(TimerSlot),
    /// Move the playhead to the given position in seconds
    Seek(f64),
    /// Switch to the given episode
    PlayNext(EpisodeRef),
}
