//! Time and duration conversion utilities.
//!
//! Safe duration conversions with explicit saturation behavior, plus the
//! transport clock formatting shared by progress and duration readouts.

use std::time::Duration;

/// Extension trait for safe Duration conversions.
pub trait DurationExt {
    /// Convert duration to milliseconds as u64, saturating at `u64::MAX`.
    ///
    /// Lyric offsets and host-reported positions are exchanged as integral
    /// milliseconds; saturation is never hit in practice because `u64::MAX`
    /// milliseconds would represent ~584 million years.
    fn as_millis_u64(&self) -> u64;
}

impl DurationExt for Duration {
    fn as_millis_u64(&self) -> u64 {
        u64::try_from(self.as_millis()).unwrap_or(u64::MAX)
    }
}

/// Format a playback position as `m:ss` for the transport clock.
///
/// Minutes are not zero-padded, seconds always are, matching the usual
/// media-player readout (`0:07`, `3:45`, `61:02`).
#[must_use]
pub fn format_clock(position: Duration) -> String {
    let total_secs = position.as_secs();
    let minutes = total_secs / 60;
    let seconds = total_secs % 60;
    format!("{minutes}:{seconds:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_millis_u64() {
        assert_eq!(Duration::from_millis(1234).as_millis_u64(), 1234);
        assert_eq!(Duration::ZERO.as_millis_u64(), 0);
    }

    #[test]
    fn test_format_clock_zero() {
        assert_eq!(format_clock(Duration::ZERO), "0:00");
    }

    #[test]
    fn test_format_clock_pads_seconds() {
        assert_eq!(format_clock(Duration::from_secs(7)), "0:07");
        assert_eq!(format_clock(Duration::from_secs(225)), "3:45");
    }

    #[test]
    fn test_format_clock_minutes_unpadded() {
        // Over an hour still renders as minutes
        assert_eq!(format_clock(Duration::from_secs(61 * 60 + 2)), "61:02");
    }

    #[test]
    fn test_format_clock_truncates_sub_second() {
        assert_eq!(format_clock(Duration::from_millis(6999)), "0:06");
    }
}
