mod backend_rodio;
mod backend_silent;
mod core;
mod handle;

pub use backend_rodio::RodioBackend;
pub use backend_silent::SilentBackend;
pub use handle::PlayerHandle;

use anyhow::Result;
use std::{sync::Arc, time::Duration};

/// The media element the player thread drives.
pub trait PlaybackBackend {
    /// Replace the current track with `payload`, paused at the start
    fn load(&mut self, payload: Arc<[u8]>) -> Result<()>;
    fn play(&mut self);
    fn pause(&mut self);
    fn stop(&mut self);
    fn seek(&mut self, position: Duration) -> Result<()>;
    fn position(&self) -> Duration;
    fn duration(&self) -> Option<Duration>;
    fn is_paused(&self) -> bool;
    fn track_ended(&self) -> bool;
}

/// Identifies one `Load` request. Track events carry the token of the load
/// they belong to, so events from a replaced track can be told apart.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub struct LoadToken(pub(crate) u64);

pub enum PlayerCommand {
    Load {
        token: LoadToken,
        payload: Arc<[u8]>,
        autoplay: bool,
    },
    Play,
    Pause,
    Stop,
    Seek(Duration),
    Shutdown,
}

#[derive(Debug, PartialEq)]
pub enum PlayerEvent {
    Loaded {
        token: LoadToken,
        duration: Option<Duration>,
    },
    Position {
        token: LoadToken,
        position: Duration,
        duration: Option<Duration>,
    },
    TrackEnded(LoadToken),
    /// The payload could not be decoded; nothing is playing
    LoadFailed {
        token: LoadToken,
        reason: String,
    },
    Error(String),
}

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum PlaybackState {
    Playing,
    Paused,
    Stopped,
}
