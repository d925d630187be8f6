use anyhow::{Result, anyhow};
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

pub mod app_core;
pub mod config;
pub mod database;
pub mod domain;
pub mod library;
pub mod playback;
pub mod player;

pub use app_core::{AppCommand, AppEvent, Cassette};
pub use config::Settings;
pub use database::{Database, DbWorker};
pub use library::Library;
pub use player::PlayerHandle;

// ~30fps
pub const REFRESH_RATE: Duration = Duration::from_millis(33);

/// `m:ss` rendering used for progress lines
pub fn format_duration(duration: Duration) -> String {
    let mut secs = duration.as_secs();
    let mins = secs / 60;
    secs %= 60;

    format!("{mins}:{secs:02}")
}

pub fn expand_tilde<P: AsRef<Path>>(path: P) -> Result<PathBuf> {
    let path = path.as_ref();
    let path_str = path.to_string_lossy();

    if !path_str.starts_with('~') {
        return Ok(path.to_path_buf());
    }

    let home = dirs::home_dir().ok_or_else(|| anyhow!("Could not determine home directory!"))?;
    match path_str.as_ref() {
        "~" => Ok(home),
        s if s.starts_with("~/") || s.starts_with("~\\") => Ok(home.join(&s[2..])),
        _ => Err(anyhow!("Error reading path with tilde (~): {path_str}")),
    }
}
