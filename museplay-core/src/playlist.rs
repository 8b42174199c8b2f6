//! Track catalog and the searchable playlist view.
//!
//! The widget sequences over a *view*: a filtered projection of the master
//! track list. Sequencer indices always refer to the view, so rebuilding the
//! filter is the only operation that can move a track's index.

use crate::error::Result;
use serde::Deserialize;

/// A single playable track from the manifest. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Track {
    pub id: String,
    pub title: String,
    pub artist: String,
    /// Cover art asset reference (URL or path relative to the asset base)
    #[serde(rename = "cover")]
    pub cover_url: String,
    /// Audio asset reference
    #[serde(rename = "src")]
    pub audio_url: String,
    /// Lyric file reference; tracks without lyrics simply show an empty panel
    #[serde(rename = "lyrics", default)]
    pub lyrics_url: Option<String>,
}

/// Playlist manifest document: `{"songs": [...]}`
#[derive(Debug, Deserialize)]
struct Manifest {
    songs: Vec<Track>,
}

/// Master track list plus the currently visible (filtered) projection.
#[derive(Debug, Clone, Default)]
pub struct Playlist {
    tracks: Vec<Track>,
    /// Indices into `tracks`, in display order
    visible: Vec<usize>,
}

impl Playlist {
    /// Create a playlist with all tracks visible.
    #[must_use]
    pub fn new(tracks: Vec<Track>) -> Self {
        let visible = (0..tracks.len()).collect();
        Self { tracks, visible }
    }

    /// Parse a playlist from the manifest JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid manifest JSON.
    pub fn from_manifest_json(input: &str) -> Result<Self> {
        let manifest: Manifest = serde_json::from_str(input)?;
        Ok(Self::new(manifest.songs))
    }

    /// Built-in sample tracks used when the manifest cannot be loaded.
    #[must_use]
    pub fn fallback() -> Self {
        Self::new(vec![
            Track {
                id: "song1".to_string(),
                title: "Sample Song 1".to_string(),
                artist: "Sample Artist".to_string(),
                cover_url: "/images/song1.jpg".to_string(),
                audio_url: "/music/song1.mp3".to_string(),
                lyrics_url: Some("/lyrics/song1.lrc".to_string()),
            },
            Track {
                id: "song2".to_string(),
                title: "Sample Song 2".to_string(),
                artist: "Another Artist".to_string(),
                cover_url: "/images/song2.jpg".to_string(),
                audio_url: "/music/song2.mp3".to_string(),
                lyrics_url: Some("/lyrics/song2.lrc".to_string()),
            },
        ])
    }

    /// Number of tracks in the visible view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.visible.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    /// Track at a view index, or `None` when out of range.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Track> {
        self.visible.get(index).and_then(|&i| self.tracks.get(i))
    }

    /// Rebuild the visible view as a case-insensitive title/artist substring
    /// match. An empty or whitespace-only query restores the full list.
    pub fn search(&mut self, query: &str) {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            self.visible = (0..self.tracks.len()).collect();
            return;
        }
        self.visible = self
            .tracks
            .iter()
            .enumerate()
            .filter(|(_, t)| {
                t.title.to_lowercase().contains(&query)
                    || t.artist.to_lowercase().contains(&query)
            })
            .map(|(i, _)| i)
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(id: &str, title: &str, artist: &str) -> Track {
        Track {
            id: id.to_string(),
            title: title.to_string(),
            artist: artist.to_string(),
            cover_url: format!("/images/{id}.jpg"),
            audio_url: format!("/music/{id}.mp3"),
            lyrics_url: Some(format!("/lyrics/{id}.lrc")),
        }
    }

    #[test]
    fn test_parse_manifest() {
        let json = r#"{
            "songs": [
                {
                    "id": "song1",
                    "title": "First",
                    "artist": "Someone",
                    "cover": "/images/song1.jpg",
                    "src": "/music/song1.mp3",
                    "lyrics": "/lyrics/song1.lrc"
                }
            ]
        }"#;
        let playlist = Playlist::from_manifest_json(json).unwrap();
        assert_eq!(playlist.len(), 1);
        let t = playlist.get(0).unwrap();
        assert_eq!(t.title, "First");
        assert_eq!(t.audio_url, "/music/song1.mp3");
        assert_eq!(t.lyrics_url.as_deref(), Some("/lyrics/song1.lrc"));
    }

    #[test]
    fn test_parse_manifest_missing_lyrics_field() {
        let json = r#"{
            "songs": [
                {
                    "id": "song1",
                    "title": "First",
                    "artist": "Someone",
                    "cover": "/images/song1.jpg",
                    "src": "/music/song1.mp3"
                }
            ]
        }"#;
        let playlist = Playlist::from_manifest_json(json).unwrap();
        assert_eq!(playlist.get(0).unwrap().lyrics_url, None);
    }

    #[test]
    fn test_parse_manifest_invalid() {
        assert!(Playlist::from_manifest_json("not json").is_err());
        assert!(Playlist::from_manifest_json(r#"{"tracks": []}"#).is_err());
    }

    #[test]
    fn test_search_filters_by_title_and_artist() {
        let mut playlist = Playlist::new(vec![
            track("a", "Blue Moon", "Alice"),
            track("b", "Red Sun", "Bob"),
            track("c", "Moonlight", "Carol"),
        ]);

        playlist.search("moon");
        assert_eq!(playlist.len(), 2);
        assert_eq!(playlist.get(0).unwrap().id, "a");
        assert_eq!(playlist.get(1).unwrap().id, "c");

        playlist.search("BOB");
        assert_eq!(playlist.len(), 1);
        assert_eq!(playlist.get(0).unwrap().id, "b");
    }

    #[test]
    fn test_search_empty_query_restores_all() {
        let mut playlist = Playlist::new(vec![
            track("a", "Blue Moon", "Alice"),
            track("b", "Red Sun", "Bob"),
        ]);
        playlist.search("moon");
        assert_eq!(playlist.len(), 1);
        playlist.search("   ");
        assert_eq!(playlist.len(), 2);
    }

    #[test]
    fn test_get_out_of_range() {
        let playlist = Playlist::new(vec![track("a", "Blue Moon", "Alice")]);
        assert!(playlist.get(1).is_none());
    }

    #[test]
    fn test_fallback_nonempty() {
        let playlist = Playlist::fallback();
        assert!(!playlist.is_empty());
        assert!(playlist.get(0).is_some());
    }
}
