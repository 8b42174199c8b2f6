//! HTTP asset source for MusePlay.
//!
//! Fetches the playlist manifest and per-track lyric files from static
//! hosting, classifying lyric format by file extension. Implements the
//! core's [`AssetSource`] seam.

use async_trait::async_trait;
use museplay_core::{
    AssetConfig, AssetSource, CoreError, LyricFormat, Playlist, RawLyrics, Track,
};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default timeout for HTTP requests (10 seconds)
const DEFAULT_TIMEOUT_SECS: u64 = 10;
/// Default number of retry attempts
const DEFAULT_MAX_RETRIES: u32 = 3;

/// Asset source backed by static HTTP hosting.
pub struct HttpAssetSource {
    client: ClientWithMiddleware,
    config: AssetConfig,
}

impl HttpAssetSource {
    /// Create a new HTTP asset source with default timeout and retries.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: AssetConfig) -> Result<Self, CoreError> {
        // Base client with timeout
        let base_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(5))
            .user_agent("MusePlay/1.0 (https://github.com/museplay)")
            .build()?;

        // Wrap with retry middleware (exponential backoff)
        let retry_policy =
            ExponentialBackoff::builder().build_with_max_retries(DEFAULT_MAX_RETRIES);
        let client = ClientBuilder::new(base_client)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self { client, config })
    }

    /// Resolve an asset reference against the configured base URL.
    /// Absolute references pass through untouched.
    fn resolve(&self, asset_ref: &str) -> String {
        resolve_ref(&self.config.base_url, asset_ref)
    }

    /// Lyric asset reference for a track: the manifest's explicit reference,
    /// or the conventional `<lyrics_dir>/<id>.lrc` location.
    fn lyrics_ref(&self, track: &Track) -> String {
        track.lyrics_url.clone().unwrap_or_else(|| {
            format!(
                "{}/{}.lrc",
                self.config.lyrics_dir.trim_end_matches('/'),
                urlencoding::encode(&track.id)
            )
        })
    }

    async fn get_text(&self, url: &str) -> Result<reqwest::Response, CoreError> {
        self.client
            .get(url)
            .send()
            .await
            .map_err(|e| CoreError::AssetSourceFailed {
                source_name: "http".to_string(),
                reason: e.to_string(),
            })
    }
}

#[async_trait]
impl AssetSource for HttpAssetSource {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn fetch_manifest(&self) -> Result<Playlist, CoreError> {
        let url = self.resolve(&self.config.manifest_path);
        info!("Fetching playlist manifest: {url}");

        let response = self.get_text(&url).await?;
        if !response.status().is_success() {
            return Err(CoreError::ManifestUnavailable {
                reason: format!("manifest returned status {}", response.status()),
            });
        }

        let body = response.text().await?;
        let playlist = Playlist::from_manifest_json(&body)?;
        info!("Loaded playlist manifest ({} tracks)", playlist.len());
        Ok(playlist)
    }

    async fn fetch_lyrics(&self, track: &Track) -> Result<Option<RawLyrics>, CoreError> {
        let asset_ref = self.lyrics_ref(track);
        let format = LyricFormat::from_ref(&asset_ref);
        let url = self.resolve(&asset_ref);
        debug!("Fetching lyrics for {}: {url}", track.id);

        let response = self.get_text(&url).await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            debug!("No lyric asset at {url}");
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(CoreError::AssetSourceFailed {
                source_name: "http".to_string(),
                reason: format!("lyrics request returned status {}", response.status()),
            });
        }

        let text = response.text().await?;
        Ok(Some(RawLyrics { text, format }))
    }
}

/// Join a base URL and an asset reference. References that already carry a
/// scheme are returned as-is.
fn resolve_ref(base_url: &str, asset_ref: &str) -> String {
    if asset_ref.starts_with("http://") || asset_ref.starts_with("https://") {
        return asset_ref.to_string();
    }
    let base = base_url.trim_end_matches('/');
    let path = asset_ref.trim_start_matches('/');
    format!("{base}/{path}")
}

/// Fetch the playlist, falling back to the built-in sample tracks when the
/// manifest is unavailable. Playback should come up even when the data
/// endpoint is down.
pub async fn load_playlist_or_fallback(source: &dyn AssetSource) -> Playlist {
    match source.fetch_manifest().await {
        Ok(playlist) => playlist,
        Err(e) => {
            warn!("Failed to load playlist manifest, using fallback: {e}");
            Playlist::fallback()
        }
    }
}
