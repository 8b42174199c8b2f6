//! Asset source seam.
//!
//! Everything the core consumes from the outside world (playlist manifest,
//! lyric files) comes through [`AssetSource`]. The HTTP implementation lives
//! in the `museplay-assets` crate; tests use in-memory stubs.

use crate::error::Result;
use crate::lyrics::RawLyrics;
use crate::playlist::{Playlist, Track};
use async_trait::async_trait;

/// Supplies the widget's static assets.
#[async_trait]
pub trait AssetSource: Send + Sync {
    /// Human-readable source name for logs.
    fn name(&self) -> &'static str;

    /// Fetch and parse the playlist manifest.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest cannot be fetched or parsed; callers
    /// typically fall back to [`Playlist::fallback`].
    async fn fetch_manifest(&self) -> Result<Playlist>;

    /// Fetch the raw lyric text for a track, classified by format.
    ///
    /// `Ok(None)` means the track has no lyric asset (no reference in the
    /// manifest, or the asset does not exist); that is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error only for transport-level failures.
    async fn fetch_lyrics(&self, track: &Track) -> Result<Option<RawLyrics>>;
}
