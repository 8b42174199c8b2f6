//! Playback-time to lyric-line resolution.
//!
//! [`LyricCursor`] is the steady-state path: it is fed every playback tick
//! (media timeupdate or per-frame, so up to 60 times a second) and must stay
//! O(1) while the position remains inside the current line's window, falling
//! back to the O(log n) binary search only on a transition or a seek.

use crate::lyrics::LyricTrack;
use std::time::Duration;

/// Result of advancing the cursor by one tick.
///
/// `changed` is the edge trigger: it is true exactly once per line
/// transition, so callers re-render highlight/scroll state only when it is
/// set instead of on every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LyricTick {
    /// Active line index, `None` while no lyrics are loaded
    pub index: Option<usize>,
    pub changed: bool,
}

/// Tracks the active lyric line across playback ticks.
#[derive(Debug, Clone, Copy, Default)]
pub struct LyricCursor {
    active: Option<usize>,
}

impl LyricCursor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the active line; call when the lyric track is replaced.
    pub fn reset(&mut self) {
        self.active = None;
    }

    /// Currently active line index, if any.
    #[must_use]
    pub const fn active(&self) -> Option<usize> {
        self.active
    }

    /// Advance to the line active at `position`.
    ///
    /// If the prior index's window still contains `position` (for the last
    /// line, any position at or past its start), it is returned unchanged
    /// without searching. Otherwise the active line is re-resolved with
    /// [`LyricTrack::active_index`]. Either way the result is identical to a
    /// fresh lookup.
    pub fn advance(&mut self, track: &LyricTrack, position: Duration) -> LyricTick {
        if let Some(prev) = self.active {
            if Self::window_contains(track, prev, position) {
                return LyricTick {
                    index: Some(prev),
                    changed: false,
                };
            }
        }

        let index = track.active_index(position);
        let changed = index != self.active;
        self.active = index;
        LyricTick { index, changed }
    }

    fn window_contains(track: &LyricTrack, index: usize, position: Duration) -> bool {
        let Some(line) = track.lines.get(index) else {
            // Stale index from a previous (longer) track
            return false;
        };
        if position < line.time {
            return false;
        }
        match track.lines.get(index + 1) {
            Some(next) => position < next.time,
            None => true,
        }
    }
}
