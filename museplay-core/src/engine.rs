//! The player engine: owned state plus an event stream for the host UI.
//!
//! The engine is the single owner of all mutable widget state (playlist
//! view, sequencing, playback position, current lyrics). Host code forwards
//! raw inputs (transport events, playback ticks) and renders from the
//! emitted [`PlayerEvent`]s; effect execution against the media element
//! stays on the host side of the boundary.

use crate::lyrics::LyricTrack;
use crate::playback::PlaybackState;
use crate::playlist::{Playlist, Track};
use crate::sequencer::{Sequencer, Transition, TransportEvent};
use crate::sync::LyricCursor;
use crate::time::DurationExt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, RwLock};

/// Events emitted by the player engine.
#[derive(Debug, Clone)]
pub enum PlayerEvent {
    /// The playlist view changed (initial load or a search refilter)
    PlaylistViewChanged { track_count: usize },
    /// A different track became current and should be loaded by the host
    TrackChanged { index: usize, track: Track },
    /// Restart the current track from position zero
    TrackRestarted,
    /// End of the list was reached with repeat off; halt playback
    PlaybackStopped,
    PlaybackPaused { position: Duration },
    PlaybackResumed { position: Duration },
    /// Regular tick with no lyric transition
    PositionSync { position: Duration },
    /// The active lyric line changed; update highlight/scroll exactly once
    LyricLineChanged { index: usize },
    /// Lyrics for the current track finished loading
    LyricsLoaded { line_count: usize },
    /// The current track has no usable lyrics
    LyricsCleared,
}

/// A pending lyric load: the track to fetch for and the generation token
/// that must still be current when the result is installed.
#[derive(Debug, Clone)]
pub struct LyricsRequest {
    pub generation: u64,
    pub track: Track,
}

struct EngineInner {
    playlist: Playlist,
    sequencer: Sequencer,
    playback: PlaybackState,
    lyrics: LyricTrack,
    cursor: LyricCursor,
    /// Monotonically increasing token, bumped on every track change so
    /// stale lyric fetches can be discarded
    lyrics_generation: u64,
}

/// Central state hub for the player widget.
pub struct PlayerEngine {
    inner: RwLock<EngineInner>,
    event_tx: broadcast::Sender<PlayerEvent>,
}

impl Default for PlayerEngine {
    fn default() -> Self {
        let (event_tx, _) = broadcast::channel(64);
        Self {
            inner: RwLock::new(EngineInner {
                playlist: Playlist::default(),
                sequencer: Sequencer::new(),
                playback: PlaybackState::default(),
                lyrics: LyricTrack::default(),
                cursor: LyricCursor::new(),
                lyrics_generation: 0,
            }),
            event_tx,
        }
    }
}

impl PlayerEngine {
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Subscribe to player events.
    pub fn subscribe(&self) -> broadcast::Receiver<PlayerEvent> {
        self.event_tx.subscribe()
    }

    /// Install a playlist, replacing the previous one.
    pub async fn set_playlist(&self, playlist: Playlist) {
        let mut inner = self.inner.write().await;
        inner.sequencer.reconcile(playlist.len());
        inner.playlist = playlist;
        let _ = self.event_tx.send(PlayerEvent::PlaylistViewChanged {
            track_count: inner.playlist.len(),
        });
    }

    /// Refilter the playlist view by a search query.
    pub async fn search(&self, query: &str) {
        let mut inner = self.inner.write().await;
        inner.playlist.search(query);
        let count = inner.playlist.len();
        inner.sequencer.reconcile(count);
        let _ = self
            .event_tx
            .send(PlayerEvent::PlaylistViewChanged { track_count: count });
    }

    /// Apply a transport event and return the resulting transition, if any.
    ///
    /// The caller executes the transition against the media element; the
    /// engine has already updated its own state and emitted events by the
    /// time this returns.
    pub async fn transport(&self, event: TransportEvent) -> Option<Transition> {
        let mut inner = self.inner.write().await;
        let count = inner.playlist.len();
        let transition = inner.sequencer.dispatch(event, count);

        match transition {
            Some(Transition::Load(index)) => {
                let Some(track) = inner.playlist.get(index).cloned() else {
                    // Sequencer guarantees in-range indices; an absent track
                    // here means the view mutated mid-call, so skip quietly
                    return None;
                };
                inner.lyrics_generation += 1;
                inner.lyrics = LyricTrack::default();
                inner.cursor.reset();
                inner.playback = PlaybackState::new(true, Duration::ZERO, Duration::ZERO);
                let _ = self
                    .event_tx
                    .send(PlayerEvent::TrackChanged { index, track });
            }
            Some(Transition::Replay) => {
                inner.playback = PlaybackState::new(true, Duration::ZERO, inner.playback.duration);
                inner.cursor.reset();
                let _ = self.event_tx.send(PlayerEvent::TrackRestarted);
            }
            Some(Transition::Stop) => {
                inner.playback.is_playing = false;
                let _ = self.event_tx.send(PlayerEvent::PlaybackStopped);
            }
            None => {}
        }

        transition
    }

    /// Record a playback tick and resolve the active lyric line.
    ///
    /// Emits [`PlayerEvent::LyricLineChanged`] only when the resolved line
    /// differs from the previous tick's, otherwise a plain position sync.
    pub async fn tick(&self, position: Duration) {
        let mut guard = self.inner.write().await;
        let inner = &mut *guard;
        inner.playback = PlaybackState::new(
            inner.playback.is_playing,
            position,
            inner.playback.duration,
        );

        let tick = inner.cursor.advance(&inner.lyrics, position);
        if tick.changed {
            if let Some(index) = tick.index {
                let _ = self.event_tx.send(PlayerEvent::LyricLineChanged { index });
                return;
            }
        }
        let _ = self.event_tx.send(PlayerEvent::PositionSync { position });
    }

    /// Record a play/pause state change from the host media element.
    pub async fn set_playing(&self, playing: bool) {
        let mut inner = self.inner.write().await;
        if inner.playback.is_playing == playing {
            return;
        }
        inner.playback.is_playing = playing;
        let position = inner.playback.position;
        let event = if playing {
            PlayerEvent::PlaybackResumed { position }
        } else {
            PlayerEvent::PlaybackPaused { position }
        };
        let _ = self.event_tx.send(event);
    }

    /// Record the track duration once the host knows it.
    pub async fn set_duration(&self, duration: Duration) {
        self.inner.write().await.playback.duration = duration;
    }

    /// The pending lyric load for the current track, if one is selected.
    pub async fn lyrics_request(&self) -> Option<LyricsRequest> {
        let inner = self.inner.read().await;
        let index = inner.sequencer.current()?;
        let track = inner.playlist.get(index)?.clone();
        Some(LyricsRequest {
            generation: inner.lyrics_generation,
            track,
        })
    }

    /// Install fetched lyrics if `generation` is still current.
    ///
    /// Returns false (and discards the lyrics) when a newer track change
    /// has superseded the load.
    pub async fn install_lyrics(&self, generation: u64, lyrics: LyricTrack) -> bool {
        let mut inner = self.inner.write().await;
        if generation != inner.lyrics_generation {
            return false;
        }
        let event = if lyrics.is_empty() {
            PlayerEvent::LyricsCleared
        } else {
            PlayerEvent::LyricsLoaded {
                line_count: lyrics.len(),
            }
        };
        inner.lyrics = lyrics;
        inner.cursor.reset();
        let _ = self.event_tx.send(event);
        true
    }

    /// Current track with its view index, if any.
    pub async fn current_track(&self) -> Option<(usize, Track)> {
        let inner = self.inner.read().await;
        let index = inner.sequencer.current()?;
        let track = inner.playlist.get(index)?.clone();
        Some((index, track))
    }

    /// Snapshot of the current lyrics.
    pub async fn lyrics(&self) -> LyricTrack {
        self.inner.read().await.lyrics.clone()
    }

    /// Snapshot of the playback state.
    pub async fn playback(&self) -> PlaybackState {
        self.inner.read().await.playback.clone()
    }

    /// Playback position interpolated to now, as integral milliseconds —
    /// the unit hosts report ticks in and lyric offsets are stored in.
    pub async fn position_millis(&self) -> u64 {
        self.inner
            .read()
            .await
            .playback
            .interpolated_position()
            .as_millis_u64()
    }

    /// Number of tracks in the visible playlist view.
    pub async fn track_count(&self) -> usize {
        self.inner.read().await.playlist.len()
    }
}
