use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    // Configuration errors
    #[error("Invalid config: {message}")]
    ConfigInvalid { message: String },

    #[error("Failed to parse config file: {0}")]
    ConfigParseError(#[from] toml::de::Error),

    // Playlist errors
    #[error("Failed to parse playlist manifest: {0}")]
    ManifestParseError(#[from] serde_json::Error),

    #[error("Playlist manifest unavailable: {reason}")]
    ManifestUnavailable { reason: String },

    // Lyrics errors
    #[error("Failed to parse lyrics: {reason}")]
    LyricsParseError { reason: String },

    #[error("Asset source {source_name} failed: {reason}")]
    AssetSourceFailed { source_name: String, reason: String },

    // Network errors
    #[error("Network request failed: {0}")]
    NetworkError(#[from] reqwest::Error),

    // IO errors
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
