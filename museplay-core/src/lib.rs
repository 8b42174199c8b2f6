pub mod config;
pub mod engine;
pub mod error;
pub mod loader;
pub mod lyrics;
pub mod playback;
pub mod playlist;
pub mod sequencer;
pub mod source;
pub mod sync;
pub mod time;

pub use config::{AssetConfig, BehaviorConfig, WidgetConfig};
pub use engine::{LyricsRequest, PlayerEngine, PlayerEvent};
pub use error::CoreError;
pub use loader::LyricsLoader;
pub use lyrics::{LyricFormat, LyricLine, LyricTrack, RawLyrics};
pub use playback::PlaybackState;
pub use playlist::{Playlist, Track};
pub use sequencer::{RepeatMode, Sequencer, Transition, TransportEvent};
pub use source::AssetSource;
pub use sync::{LyricCursor, LyricTick};
pub use time::{format_clock, DurationExt};
