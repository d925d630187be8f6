mod app;
mod select;

pub use app::Cassette;

use crate::{library::AudioLocator, library::FileSelection, player::PlaybackState};
use std::time::Duration;

/// Requests from the UI side.
pub enum AppCommand {
    Import(FileSelection),
    Reload,
    TogglePlayback,
    Next,
    Prev,
    Select(usize),
    SeekPercent(f32),
    Quit,
}

/// Notifications for whatever renders the player.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    TrackReady {
        index: usize,
        title: String,
        artist: String,
        img: String,
        src: AudioLocator,
    },
    PlaylistReady {
        entries: Vec<String>,
        active: usize,
    },
    ActiveChanged(usize),
    PlaybackStateChanged(PlaybackState),
    Progress {
        position: Duration,
        duration: Option<Duration>,
        percent: Option<f32>,
    },
    StoreUnavailable(String),
    SeedFailed(String),
    ImportFailed(String),
    PlayerError(String),
}

#[cfg(test)]
mod tests;
