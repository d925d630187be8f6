use super::{AppCommand, AppEvent};
use crate::{
    Settings,
    database::DbWorker,
    domain::SongInfo,
    library::{AssetFetcher, FileSelection, Library, import_files, seed_if_empty},
    playback::PlaybackCoordinator,
    player::{LoadToken, PlaybackState, PlayerEvent, PlayerHandle},
};
use anyhow::{Result, anyhow};
use crossbeam_channel::Sender;
use std::{path::Path, time::Duration};

/// Application state: the store handle, the loaded library, the cursor and
/// the player, owned in one place.
pub struct Cassette {
    settings: Settings,
    store: Option<DbWorker>,
    library: Library,
    playback: PlaybackCoordinator,
    pub(super) player: PlayerHandle,
    /// Load whose player events are still meaningful
    now_playing: Option<LoadToken>,
    fetcher: Box<dyn AssetFetcher>,
    events: Sender<AppEvent>,

    booted: bool,
    pub(super) quit: bool,
}

impl Cassette {
    pub fn new(
        settings: Settings,
        fetcher: Box<dyn AssetFetcher>,
        player: PlayerHandle,
        events: Sender<AppEvent>,
    ) -> Self {
        Cassette {
            settings,
            store: None,
            library: Library::new(),
            playback: PlaybackCoordinator::new(),
            player,
            now_playing: None,
            fetcher,
            events,
            booted: false,
            quit: false,
        }
    }

    /// Open the store, seed it on first run and load the library.
    ///
    /// Only the first call does anything. A store that fails to open leaves
    /// the session without persistence and with an empty library.
    pub fn boot(&mut self) {
        if self.booted {
            return;
        }
        self.booted = true;

        let opened = self
            .settings
            .database_path()
            .and_then(|path| Ok(DbWorker::open(path).wait()?));

        match opened {
            Ok(store) => self.store = Some(store),
            Err(e) => {
                log::error!("Song store failed to open: {e}");
                self.emit(AppEvent::StoreUnavailable(e.to_string()));
                self.reload();
                return;
            }
        }

        self.seed();
        self.reload();
    }

    fn seed(&mut self) {
        let Some(store) = &self.store else {
            return;
        };

        match seed_if_empty(store, &self.settings.catalog, self.fetcher.as_ref()) {
            Ok(outcome) => log::debug!("Seed check finished: {outcome:?}"),
            Err(e) => {
                log::error!("Seeding failed, nothing was written: {e}");
                self.emit(AppEvent::SeedFailed(e.to_string()));
            }
        }
    }

    /// Rebuild the library from the store and point the cursor at its first song
    pub fn reload(&mut self) {
        if let Err(e) = self.player.stop() {
            log::warn!("Could not stop player before reload: {e}");
        }
        self.now_playing = None;

        match &self.store {
            Some(store) => {
                if let Err(e) = self.library.reload(store) {
                    log::error!("Library load failed: {e}");
                }
            }
            None => self.library.clear(),
        }

        if self.playback.reset(self.library.len()).is_some() {
            if let Err(e) = self.load_current(false) {
                log::error!("Could not load first song: {e}");
            }
            self.emit(AppEvent::PlaylistReady {
                entries: self.library.playlist_lines(),
                active: self.playback.cursor().unwrap_or(0),
            });
        }
    }

    /// Write the selection to the store. Returns whether anything was added.
    pub fn import(&mut self, selection: &mut FileSelection) -> bool {
        let Some(store) = &self.store else {
            selection.take();
            self.emit(AppEvent::ImportFailed("song store is unavailable".into()));
            return false;
        };

        let artist = &self.settings.import_artist;
        let img = &self.settings.default_image;

        match import_files(store, selection, artist, img) {
            Ok(ids) => !ids.is_empty(),
            Err(e) => {
                log::error!("Import failed, batch rolled back: {e}");
                self.emit(AppEvent::ImportFailed(e.to_string()));
                false
            }
        }
    }

    /// Apply a batch of queued commands in order.
    ///
    /// Consecutive imports and reload requests share a single reload, run
    /// before the next transport command or at the end of the batch.
    pub fn handle_batch(&mut self, batch: impl IntoIterator<Item = AppCommand>) {
        let mut reload_due = false;

        for cmd in batch {
            match cmd {
                AppCommand::Import(mut selection) => reload_due |= self.import(&mut selection),
                AppCommand::Reload => reload_due = true,
                AppCommand::Quit => self.quit = true,
                transport => {
                    if std::mem::take(&mut reload_due) {
                        self.reload();
                    }
                    if let Err(e) = self.handle_transport(transport) {
                        log::warn!("Transport command failed: {e}");
                    }
                }
            }
        }

        if reload_due {
            self.reload();
        }
    }

    #[rustfmt::skip]
    fn handle_transport(&mut self, cmd: AppCommand) -> Result<()> {
        match cmd {
            AppCommand::TogglePlayback  => self.toggle_playback()?,
            AppCommand::Next            => self.play_next()?,
            AppCommand::Prev            => self.play_prev()?,
            AppCommand::Select(idx)     => self.play_index(idx)?,
            AppCommand::SeekPercent(p)  => self.seek_percent(p)?,
            _ => (),
        }
        Ok(())
    }

    pub fn shutdown(&mut self) {
        if let Err(e) = self.player.stop() {
            log::warn!("Could not stop player: {e}");
        }
        self.now_playing = None;
        self.library.clear();
        self.playback.reset(0);
        self.store = None;
        log::info!("Cassette shut down");
    }
}

// =============
//   TRANSPORT
// =============
impl Cassette {
    pub fn play_next(&mut self) -> Result<()> {
        if self.playback.next().is_some() {
            self.load_current(true)?;
        }
        Ok(())
    }

    pub fn play_prev(&mut self) -> Result<()> {
        if self.playback.prev().is_some() {
            self.load_current(true)?;
        }
        Ok(())
    }

    pub fn play_index(&mut self, index: usize) -> Result<()> {
        if self.playback.select(index).is_some() {
            self.load_current(true)?;
        }
        Ok(())
    }

    pub fn toggle_playback(&mut self) -> Result<()> {
        if self.playback.is_empty() {
            return Ok(());
        }

        match self.playback.state() {
            PlaybackState::Playing => {
                self.player.pause()?;
                self.set_state(PlaybackState::Paused);
            }
            PlaybackState::Paused => {
                self.player.play()?;
                self.set_state(PlaybackState::Playing);
            }
            PlaybackState::Stopped => self.load_current(true)?,
        }
        Ok(())
    }

    pub fn seek_percent(&mut self, percent: f32) -> Result<()> {
        if let Some(target) = self.playback.seek_target(percent) {
            self.player.seek(target)?;
            self.playback.update_position(target, None);
        }
        Ok(())
    }

    /// Hand the song under the cursor to the player and announce it
    fn load_current(&mut self, autoplay: bool) -> Result<()> {
        let Some(index) = self.playback.cursor() else {
            return Ok(());
        };
        let Some(song) = self.library.get(index).cloned() else {
            return Ok(());
        };

        let payload = self
            .library
            .resolve(song.src())
            .ok_or_else(|| anyhow!("Locator {} is no longer valid", song.src()))?;

        self.now_playing = Some(self.player.load(payload, autoplay)?);

        self.emit(AppEvent::TrackReady {
            index,
            title: song.get_title().to_string(),
            artist: song.get_artist().to_string(),
            img: resolve_image(
                song.get_img(),
                &self.settings.assets_root,
                &self.settings.default_image,
            ),
            src: song.src().clone(),
        });
        self.emit(AppEvent::ActiveChanged(index));

        self.set_state(match autoplay {
            true => PlaybackState::Playing,
            false => PlaybackState::Paused,
        });

        Ok(())
    }

    fn set_state(&mut self, state: PlaybackState) {
        if self.playback.state() != state {
            self.playback.set_state(state);
            self.emit(AppEvent::PlaybackStateChanged(state));
        }
    }
}

// =================
//   PLAYER EVENTS
// =================
impl Cassette {
    pub fn handle_player_event(&mut self, event: PlayerEvent) {
        if !self.is_current(&event) {
            log::trace!("Dropping event for a replaced track: {event:?}");
            return;
        }

        match event {
            PlayerEvent::Loaded { duration, .. } => {
                self.playback.update_position(Duration::ZERO, duration);
            }
            PlayerEvent::Position {
                position, duration, ..
            } => {
                self.playback.update_position(position, duration);
                self.emit(AppEvent::Progress {
                    position,
                    duration: self.playback.duration(),
                    percent: self.playback.progress_percent(),
                });
            }
            PlayerEvent::TrackEnded(_) => {
                self.now_playing = None;
                self.set_state(PlaybackState::Stopped);
                if let Err(e) = self.play_next() {
                    log::warn!("Auto-advance failed: {e}");
                }
            }
            PlayerEvent::LoadFailed { reason, .. } => {
                log::warn!("Could not play track: {reason}");
                self.now_playing = None;
                self.set_state(PlaybackState::Stopped);
                self.emit(AppEvent::PlayerError(reason));
            }
            PlayerEvent::Error(msg) => {
                log::warn!("Player error: {msg}");
                self.emit(AppEvent::PlayerError(msg));
            }
        }
    }

    fn is_current(&self, event: &PlayerEvent) -> bool {
        let token = match event {
            PlayerEvent::Loaded { token, .. }
            | PlayerEvent::Position { token, .. }
            | PlayerEvent::LoadFailed { token, .. }
            | PlayerEvent::TrackEnded(token) => *token,
            PlayerEvent::Error(_) => return true,
        };
        self.now_playing == Some(token)
    }
}

// ===============
//    ACCESSORS
// ===============
impl Cassette {
    pub fn library(&self) -> &Library {
        &self.library
    }

    pub fn playback(&self) -> &PlaybackCoordinator {
        &self.playback
    }

    pub fn store(&self) -> Option<&DbWorker> {
        self.store.as_ref()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Token of the load the player is currently working on
    pub fn now_playing(&self) -> Option<LoadToken> {
        self.now_playing
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    fn emit(&self, event: AppEvent) {
        let _ = self.events.send(event);
    }
}

/// Image to show for a song, falling back to the default when a local path
/// does not exist under the assets root. URIs are passed through.
pub(crate) fn resolve_image(img: &str, assets_root: &Path, default_image: &str) -> String {
    let is_uri = img.contains("://") || img.starts_with("data:");
    if is_uri || (!img.is_empty() && assets_root.join(img).is_file()) {
        return img.to_string();
    }

    log::debug!("Image `{img}` not found, using {default_image}");
    default_image.to_string()
}
