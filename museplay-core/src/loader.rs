//! Background lyric loading.
//!
//! Listens for track changes on the engine and fetches the new track's
//! lyric asset through an [`AssetSource`]. Results are installed through
//! the engine's generation token, so a fetch that loses a race with a
//! newer track change is discarded instead of clobbering fresh lyrics.

use crate::engine::{LyricsRequest, PlayerEngine, PlayerEvent};
use crate::lyrics::LyricTrack;
use crate::source::AssetSource;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

pub struct LyricsLoader {
    engine: Arc<PlayerEngine>,
    source: Arc<dyn AssetSource>,
    cancel_token: CancellationToken,
}

impl LyricsLoader {
    pub fn new(
        engine: Arc<PlayerEngine>,
        source: Arc<dyn AssetSource>,
        cancel_token: Option<CancellationToken>,
    ) -> Self {
        Self {
            engine,
            source,
            cancel_token: cancel_token.unwrap_or_default(),
        }
    }

    /// Get a clone of the cancellation token.
    #[must_use]
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    /// Start the loader in a background task.
    #[must_use]
    pub fn start(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            self.run().await;
        })
    }

    /// Run the lyric loading loop.
    pub async fn run(&self) {
        info!("Starting lyrics loader (source: {})", self.source.name());

        let mut rx = self.engine.subscribe();

        // A track may already be current when the loader starts
        if let Some(request) = self.engine.lyrics_request().await {
            if self.engine.lyrics().await.is_empty() {
                self.load(request).await;
            }
        }

        loop {
            tokio::select! {
                () = self.cancel_token.cancelled() => {
                    info!("Lyrics loader shutting down");
                    break;
                }
                event = rx.recv() => {
                    match event {
                        Ok(PlayerEvent::TrackChanged { .. }) => {
                            if let Some(request) = self.engine.lyrics_request().await {
                                self.load(request).await;
                            }
                        }
                        Err(tokio::sync::broadcast::error::RecvError::Closed) => {
                            break;
                        }
                        _ => {
                            // Lagged or an event we don't act on
                        }
                    }
                }
            }
        }
    }

    async fn load(&self, request: LyricsRequest) {
        let track = &request.track;

        let lyrics = match self.source.fetch_lyrics(track).await {
            Ok(Some(raw)) => {
                let parsed = LyricTrack::parse_or_empty(&raw.text, raw.format);
                info!(
                    "Loaded lyrics for {} - {} ({} lines, {:?})",
                    track.artist,
                    track.title,
                    parsed.len(),
                    raw.format
                );
                parsed
            }
            Ok(None) => {
                info!("No lyrics found for {} - {}", track.artist, track.title);
                LyricTrack::default()
            }
            Err(e) => {
                // Missing lyrics never interrupt playback
                warn!("Lyrics fetch failed for {}: {e}", track.id);
                LyricTrack::default()
            }
        };

        if !self.engine.install_lyrics(request.generation, lyrics).await {
            debug!(
                "Discarding stale lyrics for {} (generation {})",
                track.id, request.generation
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::lyrics::{LyricFormat, RawLyrics};
    use crate::playlist::{Playlist, Track};
    use crate::sequencer::TransportEvent;

    struct StaticSource {
        lyrics: &'static str,
    }

    #[async_trait::async_trait]
    impl AssetSource for StaticSource {
        fn name(&self) -> &'static str {
            "static"
        }

        async fn fetch_manifest(&self) -> Result<Playlist> {
            Ok(Playlist::fallback())
        }

        async fn fetch_lyrics(&self, _track: &Track) -> Result<Option<RawLyrics>> {
            if self.lyrics.is_empty() {
                return Ok(None);
            }
            Ok(Some(RawLyrics {
                text: self.lyrics.to_string(),
                format: LyricFormat::Lrc,
            }))
        }
    }

    async fn engine_with_selection() -> Arc<PlayerEngine> {
        let engine = PlayerEngine::new();
        engine.set_playlist(Playlist::fallback()).await;
        engine.transport(TransportEvent::Select(0)).await;
        engine
    }

    #[tokio::test]
    async fn test_load_installs_parsed_lyrics() {
        let engine = engine_with_selection().await;
        let loader = LyricsLoader::new(
            engine.clone(),
            Arc::new(StaticSource { lyrics: "[00:01]hello\n[00:02]world" }),
            None,
        );

        let request = engine.lyrics_request().await.unwrap();
        loader.load(request).await;
        assert_eq!(engine.lyrics().await.len(), 2);
    }

    #[tokio::test]
    async fn test_missing_lyrics_install_empty() {
        let engine = engine_with_selection().await;
        let loader = LyricsLoader::new(
            engine.clone(),
            Arc::new(StaticSource { lyrics: "" }),
            None,
        );

        let request = engine.lyrics_request().await.unwrap();
        loader.load(request).await;
        assert!(engine.lyrics().await.is_empty());
    }

    #[tokio::test]
    async fn test_stale_request_does_not_install() {
        let engine = engine_with_selection().await;
        let loader = LyricsLoader::new(
            engine.clone(),
            Arc::new(StaticSource { lyrics: "[00:01]old track" }),
            None,
        );

        let stale = engine.lyrics_request().await.unwrap();
        engine.transport(TransportEvent::Select(1)).await;
        loader.load(stale).await;
        assert!(engine.lyrics().await.is_empty());
    }

    #[tokio::test]
    async fn test_run_reacts_to_track_changes_and_cancels() {
        let engine = engine_with_selection().await;
        let loader = Arc::new(LyricsLoader::new(
            engine.clone(),
            Arc::new(StaticSource { lyrics: "[00:01]line" }),
            None,
        ));
        let cancel = loader.cancel_token();
        let handle = loader.start();

        // Give the startup pass a chance to install lyrics
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert_eq!(engine.lyrics().await.len(), 1);

        engine.transport(TransportEvent::Select(1)).await;
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert_eq!(engine.lyrics().await.len(), 1);

        cancel.cancel();
        handle.await.unwrap();
    }
}
