use std::time::{Duration, Instant};

/// Playback state as last reported by the host media element.
///
/// The host forwards timeupdate ticks; between ticks the position can be
/// interpolated from `updated_at` so the lyric cursor and progress bar stay
/// smooth even at coarse tick rates.
#[derive(Debug, Clone)]
pub struct PlaybackState {
    pub is_playing: bool,
    /// Position reported at `updated_at`
    pub position: Duration,
    /// Total track duration (zero until metadata is known)
    pub duration: Duration,
    pub updated_at: Instant,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            is_playing: false,
            position: Duration::ZERO,
            duration: Duration::ZERO,
            updated_at: Instant::now(),
        }
    }
}

impl PlaybackState {
    #[must_use]
    pub fn new(is_playing: bool, position: Duration, duration: Duration) -> Self {
        Self {
            is_playing,
            position,
            duration,
            updated_at: Instant::now(),
        }
    }

    /// Position extrapolated to now, clamped to the track duration.
    #[must_use]
    pub fn interpolated_position(&self) -> Duration {
        if !self.is_playing {
            return self.position;
        }
        let interpolated = self.position + self.updated_at.elapsed();
        if self.duration.is_zero() {
            interpolated
        } else {
            interpolated.min(self.duration)
        }
    }

    /// Fraction of the track elapsed, in `[0.0, 1.0]`; zero while duration
    /// is unknown. Drives the progress slider.
    #[must_use]
    pub fn progress_ratio(&self) -> f64 {
        if self.duration.is_zero() {
            return 0.0;
        }
        (self.position.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }

    /// Whether `next` represents a position jump beyond `threshold` relative
    /// to where playback should have advanced to on its own.
    #[must_use]
    pub fn seek_occurred(&self, next: &Self, threshold: Duration) -> bool {
        let expected = self.interpolated_position();
        let actual = next.position;
        if actual > expected {
            actual - expected > threshold
        } else {
            expected - actual > threshold
        }
    }
}
