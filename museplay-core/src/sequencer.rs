//! Track sequencing: which track plays next.
//!
//! The sequencer is a pure state machine over `{current, shuffle, repeat}`.
//! Transport events go in, a [`Transition`] comes out; executing the
//! transition (loading audio, halting the media element) is the caller's
//! job, so the machine stays testable without any playback backend.

use rand::Rng;

/// Repeat policy, cycled by the user: off -> all -> one -> off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RepeatMode {
    #[default]
    Off,
    /// Wrap around at either end of the track list
    All,
    /// Replay the current track when it ends
    One,
}

impl RepeatMode {
    /// Next mode in the off -> all -> one cycle.
    #[must_use]
    pub const fn cycle(self) -> Self {
        match self {
            Self::Off => Self::All,
            Self::All => Self::One,
            Self::One => Self::Off,
        }
    }
}

/// A discrete transport event from the UI or the media element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportEvent {
    Next,
    Prev,
    /// The current track finished playing on its own
    Ended,
    /// Direct selection from the playlist view (out-of-range is a no-op)
    Select(usize),
    ToggleShuffle,
    CycleRepeat,
}

/// What the caller should do after an event. `None` from
/// [`Sequencer::apply`] means nothing: keep playing whatever is playing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Load and play the track at this view index
    Load(usize),
    /// Restart the current track from position zero
    Replay,
    /// Halt playback; the current index is kept, not cleared
    Stop,
}

/// Sequencing state: current view index plus the shuffle/repeat flags.
///
/// `current` is `None` until a track is selected and whenever the list is
/// empty; it is otherwise always in `[0, track_count)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sequencer {
    current: Option<usize>,
    shuffle: bool,
    repeat: RepeatMode,
}

impl Sequencer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn current(&self) -> Option<usize> {
        self.current
    }

    #[must_use]
    pub const fn shuffle_enabled(&self) -> bool {
        self.shuffle
    }

    #[must_use]
    pub const fn repeat_mode(&self) -> RepeatMode {
        self.repeat
    }

    /// Apply a transport event against a list of `track_count` tracks.
    ///
    /// Sources of randomness are injected so tests can drive the shuffle
    /// path with a seeded generator; production callers pass
    /// `&mut rand::rng()` (see [`Sequencer::dispatch`]).
    pub fn apply<R: Rng + ?Sized>(
        &mut self,
        event: TransportEvent,
        track_count: usize,
        rng: &mut R,
    ) -> Option<Transition> {
        match event {
            TransportEvent::ToggleShuffle => {
                self.shuffle = !self.shuffle;
                None
            }
            TransportEvent::CycleRepeat => {
                self.repeat = self.repeat.cycle();
                None
            }
            TransportEvent::Select(index) => {
                if index >= track_count {
                    // Benign race with a concurrently refiltered list
                    return None;
                }
                self.current = Some(index);
                Some(Transition::Load(index))
            }
            TransportEvent::Next => self.step_forward(track_count, rng),
            TransportEvent::Prev => self.step_backward(track_count, rng),
            TransportEvent::Ended => {
                if self.repeat == RepeatMode::One && self.current.is_some() {
                    Some(Transition::Replay)
                } else {
                    self.step_forward(track_count, rng)
                }
            }
        }
    }

    /// [`Sequencer::apply`] with the thread-local generator.
    pub fn dispatch(&mut self, event: TransportEvent, track_count: usize) -> Option<Transition> {
        self.apply(event, track_count, &mut rand::rng())
    }

    /// Clamp state to a resized or refiltered track list.
    ///
    /// A shrunken view can leave `current` out of range; drop it rather
    /// than point at an arbitrary track.
    pub fn reconcile(&mut self, track_count: usize) {
        if let Some(current) = self.current {
            if current >= track_count {
                self.current = None;
            }
        }
    }

    fn step_forward<R: Rng + ?Sized>(
        &mut self,
        track_count: usize,
        rng: &mut R,
    ) -> Option<Transition> {
        if track_count == 0 {
            return None;
        }
        if self.shuffle {
            return self.pick_random(track_count, rng);
        }
        let next = self.current.map_or(0, |i| i + 1);
        if next >= track_count {
            if self.repeat == RepeatMode::All {
                self.current = Some(0);
                Some(Transition::Load(0))
            } else {
                // End of the list: signal a halt, keep the index
                Some(Transition::Stop)
            }
        } else {
            self.current = Some(next);
            Some(Transition::Load(next))
        }
    }

    fn step_backward<R: Rng + ?Sized>(
        &mut self,
        track_count: usize,
        rng: &mut R,
    ) -> Option<Transition> {
        if track_count == 0 {
            return None;
        }
        if self.shuffle {
            return self.pick_random(track_count, rng);
        }
        match self.current {
            Some(0) | None => {
                if self.repeat == RepeatMode::All {
                    let last = track_count - 1;
                    self.current = Some(last);
                    Some(Transition::Load(last))
                } else {
                    None
                }
            }
            Some(i) => {
                self.current = Some(i - 1);
                Some(Transition::Load(i - 1))
            }
        }
    }

    /// Uniform pick over all indices except the current one. Samples from
    /// the reduced space `[0, count-1)` and remaps past the excluded index,
    /// so no rejection loop is needed.
    fn pick_random<R: Rng + ?Sized>(
        &mut self,
        track_count: usize,
        rng: &mut R,
    ) -> Option<Transition> {
        if track_count <= 1 {
            return None;
        }
        let picked = match self.current {
            Some(current) => {
                let r = rng.random_range(0..track_count - 1);
                if r >= current { r + 1 } else { r }
            }
            None => rng.random_range(0..track_count),
        };
        self.current = Some(picked);
        Some(Transition::Load(picked))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    fn sequencer_at(index: usize) -> Sequencer {
        let mut seq = Sequencer::new();
        seq.apply(TransportEvent::Select(index), index + 1, &mut rng());
        seq
    }

    #[test]
    fn test_next_advances_in_order() {
        let mut seq = sequencer_at(0);
        let t = seq.apply(TransportEvent::Next, 5, &mut rng());
        assert_eq!(t, Some(Transition::Load(1)));
        assert_eq!(seq.current(), Some(1));
    }

    #[test]
    fn test_next_wraps_with_repeat_all() {
        let mut seq = sequencer_at(4);
        seq.apply(TransportEvent::CycleRepeat, 5, &mut rng()); // off -> all
        let t = seq.apply(TransportEvent::Next, 5, &mut rng());
        assert_eq!(t, Some(Transition::Load(0)));
        assert_eq!(seq.current(), Some(0));
    }

    #[test]
    fn test_next_at_end_stops_without_repeat() {
        let mut seq = sequencer_at(4);
        let t = seq.apply(TransportEvent::Next, 5, &mut rng());
        assert_eq!(t, Some(Transition::Stop));
        // Stop keeps the index so a later play resumes from the same track
        assert_eq!(seq.current(), Some(4));
    }

    #[test]
    fn test_prev_steps_back() {
        let mut seq = sequencer_at(3);
        let t = seq.apply(TransportEvent::Prev, 5, &mut rng());
        assert_eq!(t, Some(Transition::Load(2)));
    }

    #[test]
    fn test_prev_at_start_is_noop_without_repeat() {
        let mut seq = sequencer_at(0);
        let t = seq.apply(TransportEvent::Prev, 5, &mut rng());
        assert_eq!(t, None);
        assert_eq!(seq.current(), Some(0));
    }

    #[test]
    fn test_prev_at_start_wraps_with_repeat_all() {
        let mut seq = sequencer_at(0);
        seq.apply(TransportEvent::CycleRepeat, 5, &mut rng());
        let t = seq.apply(TransportEvent::Prev, 5, &mut rng());
        assert_eq!(t, Some(Transition::Load(4)));
    }

    #[test]
    fn test_ended_replays_with_repeat_one() {
        let mut seq = sequencer_at(2);
        seq.apply(TransportEvent::CycleRepeat, 5, &mut rng()); // all
        seq.apply(TransportEvent::CycleRepeat, 5, &mut rng()); // one
        let t = seq.apply(TransportEvent::Ended, 5, &mut rng());
        assert_eq!(t, Some(Transition::Replay));
        assert_eq!(seq.current(), Some(2));
    }

    #[test]
    fn test_ended_without_repeat_behaves_as_next() {
        let mut seq = sequencer_at(1);
        let t = seq.apply(TransportEvent::Ended, 5, &mut rng());
        assert_eq!(t, Some(Transition::Load(2)));
    }

    #[test]
    fn test_repeat_cycle_returns_to_start() {
        let mut seq = Sequencer::new();
        let start = seq.repeat_mode();
        for _ in 0..3 {
            seq.apply(TransportEvent::CycleRepeat, 5, &mut rng());
        }
        assert_eq!(seq.repeat_mode(), start);
    }

    #[test]
    fn test_select_out_of_range_is_noop() {
        let mut seq = sequencer_at(1);
        let t = seq.apply(TransportEvent::Select(7), 5, &mut rng());
        assert_eq!(t, None);
        assert_eq!(seq.current(), Some(1));
    }

    #[test]
    fn test_empty_list_never_emits() {
        let mut seq = Sequencer::new();
        let mut r = rng();
        for event in [
            TransportEvent::Next,
            TransportEvent::Prev,
            TransportEvent::Ended,
            TransportEvent::Select(0),
        ] {
            assert_eq!(seq.apply(event, 0, &mut r), None);
            assert_eq!(seq.current(), None);
        }
    }

    #[test]
    fn test_shuffle_single_track_is_noop() {
        let mut seq = sequencer_at(0);
        seq.apply(TransportEvent::ToggleShuffle, 1, &mut rng());
        let t = seq.apply(TransportEvent::Next, 1, &mut rng());
        assert_eq!(t, None);
        assert_eq!(seq.current(), Some(0));
    }

    #[test]
    fn test_shuffle_never_repeats_current() {
        let mut seq = sequencer_at(3);
        let mut r = rng();
        seq.apply(TransportEvent::ToggleShuffle, 8, &mut r);
        for _ in 0..500 {
            let before = seq.current();
            let t = seq.apply(TransportEvent::Next, 8, &mut r);
            let Some(Transition::Load(picked)) = t else {
                panic!("shuffle next must load a track, got {t:?}");
            };
            assert!(picked < 8);
            assert_ne!(Some(picked), before);
        }
    }

    #[test]
    fn test_shuffle_pick_covers_all_other_indices() {
        // Every index except the current one must be reachable
        let mut r = rng();
        let mut seen = [false; 5];
        for _ in 0..1000 {
            let mut seq = sequencer_at(2);
            seq.apply(TransportEvent::ToggleShuffle, 5, &mut r);
            if let Some(Transition::Load(i)) = seq.apply(TransportEvent::Next, 5, &mut r) {
                seen[i] = true;
            }
        }
        assert_eq!(seen, [true, true, false, true, true]);
    }

    #[test]
    fn test_shuffle_prev_uses_same_rule() {
        let mut seq = sequencer_at(0);
        let mut r = rng();
        seq.apply(TransportEvent::ToggleShuffle, 4, &mut r);
        for _ in 0..100 {
            let before = seq.current();
            let t = seq.apply(TransportEvent::Prev, 4, &mut r);
            assert!(matches!(t, Some(Transition::Load(i)) if Some(i) != before));
        }
    }

    #[test]
    fn test_toggle_shuffle_is_independent_of_repeat() {
        let mut seq = Sequencer::new();
        seq.apply(TransportEvent::CycleRepeat, 5, &mut rng());
        seq.apply(TransportEvent::ToggleShuffle, 5, &mut rng());
        assert!(seq.shuffle_enabled());
        assert_eq!(seq.repeat_mode(), RepeatMode::All);
        seq.apply(TransportEvent::ToggleShuffle, 5, &mut rng());
        assert!(!seq.shuffle_enabled());
        assert_eq!(seq.repeat_mode(), RepeatMode::All);
    }

    #[test]
    fn test_reconcile_drops_out_of_range_index() {
        let mut seq = sequencer_at(4);
        seq.reconcile(3);
        assert_eq!(seq.current(), None);

        let mut seq = sequencer_at(2);
        seq.reconcile(5);
        assert_eq!(seq.current(), Some(2));
    }

    #[test]
    fn test_next_with_no_selection_starts_at_zero() {
        let mut seq = Sequencer::new();
        let t = seq.apply(TransportEvent::Next, 5, &mut rng());
        assert_eq!(t, Some(Transition::Load(0)));
    }
}
