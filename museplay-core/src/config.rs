use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Widget configuration, loaded from TOML by the host.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WidgetConfig {
    #[serde(default)]
    pub assets: AssetConfig,
    #[serde(default)]
    pub behavior: BehaviorConfig,
}

/// Where the widget's static assets live. Paths are resolved relative to
/// `base_url` unless a track reference is already absolute.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_manifest_path")]
    pub manifest_path: String,
    #[serde(default = "default_lyrics_dir")]
    pub lyrics_dir: String,
    #[serde(default = "default_music_dir")]
    pub music_dir: String,
    #[serde(default = "default_images_dir")]
    pub images_dir: String,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            manifest_path: default_manifest_path(),
            lyrics_dir: default_lyrics_dir(),
            music_dir: default_music_dir(),
            images_dir: default_images_dir(),
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:8080".to_string()
}

fn default_manifest_path() -> String {
    "/data/songs.json".to_string()
}

fn default_lyrics_dir() -> String {
    "/lyrics".to_string()
}

fn default_music_dir() -> String {
    "/music".to_string()
}

fn default_images_dir() -> String {
    "/images".to_string()
}

/// Transport behavior knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BehaviorConfig {
    /// Seek step for arrow-key seeking, in seconds
    #[serde(default = "default_seek_step")]
    pub seek_step_secs: u64,
    /// Volume step for arrow-key volume changes, in percent
    #[serde(default = "default_volume_step")]
    pub volume_step_percent: u8,
    /// How often the host should report playback ticks, in milliseconds
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            seek_step_secs: default_seek_step(),
            volume_step_percent: default_volume_step(),
            tick_interval_ms: default_tick_interval(),
        }
    }
}

const fn default_seek_step() -> u64 {
    5
}

const fn default_volume_step() -> u8 {
    5
}

const fn default_tick_interval() -> u64 {
    250
}

impl WidgetConfig {
    /// Parse a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML for this schema.
    pub fn from_toml(input: &str) -> Result<Self> {
        Ok(toml::from_str(input)?)
    }
}
