//! Player-side state machines
//!
//! The controllers in this module never touch a clock or a timer directly.
//! They consume [`PlaybackSnapshot`]s and report [`Effect`]s, and
//! [`PlaybackSession`] drives them from a single cooperative tick.

mod clock;
mod effect;
mod episode;
mod intro_skip;
mod marker_editor;
mod next_up;
mod session;
mod snapshot;
mod timer;
mod tracks;

pub use clock::{MediaElement, PlaybackClock};
pub use effect::{Effect, TimerSlot};
pub use episode::EpisodeRef;
pub use intro_skip::{IntroSkipController, SkipVisibilityState};
pub use marker_editor::{IntroMarkerEditor, MarkerStore};
pub use next_up::{CountdownState, NextUpController};
pub use session::{NearEndPolicy, PlaybackSession, SessionEvent, SessionView};
pub use snapshot::{normalize_ranges, BufferedRange, PlaybackSnapshot};
pub use timer::{TimerId, TimerQueue};
pub use tracks::{TrackDescriptor, TrackSelectionRegistry, TrackType};
