use crate::error::{CoreError, Result};
use serde::{Deserialize, Deserializer};
use std::time::Duration;
use tracing::warn;

/// Lyric file format, classified by the asset layer from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LyricFormat {
    /// Plain-text `[mm:ss.fff]`-tagged lines
    Lrc,
    /// `{"lines": [{"timeMs": ..., "text": ...}]}` document
    Json,
}

impl LyricFormat {
    /// Classify a lyric asset reference by its extension (`.json` is JSON,
    /// anything else is treated as LRC).
    #[must_use]
    pub fn from_ref(asset_ref: &str) -> Self {
        if asset_ref.to_lowercase().ends_with(".json") {
            Self::Json
        } else {
            Self::Lrc
        }
    }
}

/// A single timed lyric line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LyricLine {
    /// Offset from the start of the track at which this line becomes active
    pub time: Duration,
    pub text: String,
}

/// A time-ordered sequence of lyric lines for one track.
///
/// Lines are sorted ascending by time before any lookup; the sort is stable,
/// so lines sharing a timestamp keep their encounter order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LyricTrack {
    pub lines: Vec<LyricLine>,
}

/// Raw lyric text together with its classified format.
#[derive(Debug, Clone)]
pub struct RawLyrics {
    pub text: String,
    pub format: LyricFormat,
}

#[derive(Debug, Deserialize)]
struct JsonLyrics {
    #[serde(default)]
    lines: Vec<JsonLyricLine>,
}

#[derive(Debug, Deserialize)]
struct JsonLyricLine {
    #[serde(default, rename = "timeMs", deserialize_with = "de_time_ms")]
    time_ms: u64,
    #[serde(default)]
    text: String,
}

/// Accept `timeMs` as a non-negative integer or a numeric string; anything
/// else (missing, negative, fractional garbage) defaults to 0.
fn de_time_ms<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n.as_u64().unwrap_or(0),
        serde_json::Value::String(s) => s.trim().parse::<u64>().unwrap_or(0),
        _ => 0,
    })
}

impl LyricTrack {
    /// Parse raw lyric text in the given format.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON input is not a valid lyrics document. LRC
    /// input never fails: untagged lines simply contribute no entries.
    pub fn parse(input: &str, format: LyricFormat) -> Result<Self> {
        let mut lines = match format {
            LyricFormat::Lrc => parse_lrc(input),
            LyricFormat::Json => {
                let doc: JsonLyrics =
                    serde_json::from_str(input).map_err(|e| CoreError::LyricsParseError {
                        reason: e.to_string(),
                    })?;
                doc.lines
                    .into_iter()
                    .map(|l| LyricLine {
                        time: Duration::from_millis(l.time_ms),
                        text: l.text,
                    })
                    .collect()
            }
        };

        // Stable sort: equal timestamps keep encounter order
        lines.sort_by_key(|l: &LyricLine| l.time);

        Ok(Self { lines })
    }

    /// Parse lyric text, degrading any failure to an empty track.
    ///
    /// Missing or malformed lyrics must never interrupt playback; the lyric
    /// panel just stays empty.
    #[must_use]
    pub fn parse_or_empty(input: &str, format: LyricFormat) -> Self {
        match Self::parse(input, format) {
            Ok(track) => track,
            Err(e) => {
                warn!("Discarding malformed lyrics: {e}");
                Self::default()
            }
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Index of the line active at `position`: the greatest `i` with
    /// `lines[i].time <= position`. Positions before the first line resolve
    /// to 0 (the first line is shown as upcoming rather than no line at
    /// all). `None` only when the track has no lines.
    ///
    /// Binary search, so O(log n) per call.
    #[must_use]
    pub fn active_index(&self, position: Duration) -> Option<usize> {
        if self.lines.is_empty() {
            return None;
        }
        let started = self.lines.partition_point(|l| l.time <= position);
        Some(started.saturating_sub(1))
    }

    /// Lines around the active one, for the lyric panel.
    #[must_use]
    pub fn visible_window(&self, position: Duration, before: usize, after: usize) -> &[LyricLine] {
        let Some(current) = self.active_index(position) else {
            return &[];
        };
        let start = current.saturating_sub(before);
        let end = (current + after + 1).min(self.lines.len());
        &self.lines[start..end]
    }
}

/// Parse LRC text: each input line may carry any number of `[mm:ss]` /
/// `[mm:ss.fff]` tags (1-3 fractional digits, right-padded to milliseconds);
/// the display text is the line with every tag stripped and trimmed, and a
/// line with k tags yields k entries sharing that text (the multi-timestamp
/// repeated-chorus idiom). Lines with no tags yield nothing, which also
/// skips `[ti:...]`-style metadata tags.
fn parse_lrc(input: &str) -> Vec<LyricLine> {
    let mut out = Vec::new();

    for raw_line in input.lines() {
        let mut times = Vec::new();
        let mut text = String::with_capacity(raw_line.len());
        let mut rest = raw_line;

        while let Some(open) = rest.find('[') {
            text.push_str(&rest[..open]);
            let after_open = &rest[open + 1..];
            match after_open.find(']') {
                Some(close) => {
                    if let Some(time) = parse_timestamp(&after_open[..close]) {
                        times.push(time);
                    } else {
                        // Not a timestamp tag ([ti:..], stray bracket): keep it verbatim
                        text.push('[');
                        text.push_str(&after_open[..close]);
                        text.push(']');
                    }
                    rest = &after_open[close + 1..];
                }
                None => {
                    // Unterminated bracket, keep the remainder as text
                    text.push('[');
                    rest = after_open;
                    break;
                }
            }
        }
        text.push_str(rest);

        let text = text.trim();
        for time in times {
            out.push(LyricLine {
                time,
                text: text.to_string(),
            });
        }
    }

    out
}

/// Parse a tag body of the form `mm:ss` or `mm:ss.fff` (1-2 digit minute and
/// second fields, 1-3 fractional digits).
fn parse_timestamp(s: &str) -> Option<Duration> {
    let (minutes, seconds) = s.split_once(':')?;
    let (seconds, fraction) = match seconds.split_once('.') {
        Some((whole, frac)) => (whole, Some(frac)),
        None => (seconds, None),
    };

    let minutes = parse_digits(minutes, 2)?;
    let seconds = parse_digits(seconds, 2)?;
    let millis = match fraction {
        Some(frac) => {
            if frac.is_empty() || frac.len() > 3 {
                return None;
            }
            // "5" means 500ms, "50" means 500ms, "055" means 55ms
            parse_digits(frac, 3)? * 10_u64.pow(u32::try_from(3 - frac.len()).unwrap_or(0))
        }
        None => 0,
    };

    Some(Duration::from_millis(
        (minutes * 60 + seconds) * 1000 + millis,
    ))
}

/// Parse a 1..=`max_len` digit field.
fn parse_digits(s: &str, max_len: usize) -> Option<u64> {
    if s.is_empty() || s.len() > max_len || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
