use super::{app::resolve_image, *};
use crate::{
    Settings,
    domain::CatalogEntry,
    library::{AssetFetcher, FileSelection},
    player::{PlaybackBackend, PlayerEvent, PlayerHandle, SilentBackend},
};
use crossbeam_channel::Receiver;
use std::{collections::HashMap, io, path::Path, sync::Arc};

struct MapFetcher(HashMap<String, Vec<u8>>);

impl AssetFetcher for MapFetcher {
    fn fetch(&self, src: &str) -> io::Result<Vec<u8>> {
        self.0
            .get(src)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, src.to_string()))
    }
}

fn settings_in(dir: &Path) -> Settings {
    Settings {
        database: Some(dir.join("db").join("cassette.db")),
        assets_root: dir.to_path_buf(),
        ..Settings::default()
    }
}

fn full_fetcher(settings: &Settings) -> Box<MapFetcher> {
    Box::new(MapFetcher(
        settings
            .catalog
            .iter()
            .map(|e| (e.src.clone(), e.title.as_bytes().to_vec()))
            .collect(),
    ))
}

fn app_with(settings: Settings, fetcher: Box<dyn AssetFetcher>) -> (Cassette, Receiver<AppEvent>) {
    let (tx, rx) = crossbeam_channel::unbounded();
    let app = Cassette::new(settings, fetcher, PlayerHandle::silent().unwrap(), tx);
    (app, rx)
}

fn booted(dir: &Path) -> (Cassette, Receiver<AppEvent>) {
    let settings = settings_in(dir);
    let fetcher = full_fetcher(&settings);
    let (mut app, rx) = app_with(settings, fetcher);
    app.boot();
    (app, rx)
}

fn drain(rx: &Receiver<AppEvent>) -> Vec<AppEvent> {
    rx.try_iter().collect()
}

fn selection(files: &[(&str, &[u8])]) -> FileSelection {
    let mut selection = FileSelection::new();
    for (name, bytes) in files {
        selection.push(*name, bytes.to_vec());
    }
    selection
}

#[test]
fn first_boot_seeds_and_announces_first_track() {
    let dir = tempfile::tempdir().unwrap();
    let (app, rx) = booted(dir.path());

    assert_eq!(app.store().unwrap().count().wait().unwrap(), 2);
    assert_eq!(app.library().len(), 2);
    assert_eq!(app.playback().cursor(), Some(0));
    assert_eq!(app.playback().state(), PlaybackState::Paused);

    let events = drain(&rx);
    let track = events
        .iter()
        .find_map(|e| match e {
            AppEvent::TrackReady { index, title, artist, .. } => Some((*index, title, artist)),
            _ => None,
        })
        .unwrap();
    assert_eq!(track, (0, &"Supernova".to_string(), &"AESPA".to_string()));

    assert!(events.contains(&AppEvent::PlaylistReady {
        entries: vec!["Supernova - AESPA".into(), "Hot Mess - AESPA".into()],
        active: 0,
    }));
}

#[test]
fn second_session_does_not_reseed() {
    let dir = tempfile::tempdir().unwrap();
    {
        let (mut app, _rx) = booted(dir.path());
        app.shutdown();
    }

    let (mut app, _rx) = booted(dir.path());
    // Booting twice in one session is also a no-op
    app.boot();
    assert_eq!(app.store().unwrap().count().wait().unwrap(), 2);
    assert_eq!(app.library().len(), 2);
}

#[test]
fn unavailable_store_leaves_inert_player() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, b"file").unwrap();

    let settings = Settings {
        database: Some(blocker.join("cassette.db")),
        ..Settings::default()
    };
    let fetcher = full_fetcher(&settings);
    let (mut app, rx) = app_with(settings, fetcher);
    app.boot();

    assert!(app.store().is_none());
    assert!(app.library().is_empty());
    assert!(
        drain(&rx)
            .iter()
            .any(|e| matches!(e, AppEvent::StoreUnavailable(_)))
    );

    app.handle_batch([
        AppCommand::Next,
        AppCommand::Prev,
        AppCommand::TogglePlayback,
        AppCommand::Select(0),
        AppCommand::SeekPercent(50.0),
    ]);
    assert_eq!(app.playback().cursor(), None);
    assert_eq!(app.playback().state(), PlaybackState::Stopped);

    app.handle_batch([AppCommand::Import(selection(&[("a.mp3", b"a")]))]);
    assert!(
        drain(&rx)
            .iter()
            .any(|e| matches!(e, AppEvent::ImportFailed(_)))
    );
}

#[test]
fn failed_seed_is_surfaced_and_store_stays_empty() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings_in(dir.path());
    let (mut app, rx) = app_with(settings, Box::new(MapFetcher(HashMap::new())));
    app.boot();

    assert_eq!(app.store().unwrap().count().wait().unwrap(), 0);
    assert!(app.library().is_empty());

    let events = drain(&rx);
    assert!(events.iter().any(|e| matches!(e, AppEvent::SeedFailed(_))));
    assert!(
        !events
            .iter()
            .any(|e| matches!(e, AppEvent::PlaylistReady { .. }))
    );
}

#[test]
fn next_and_prev_wrap_around() {
    let dir = tempfile::tempdir().unwrap();
    let (mut app, _rx) = booted(dir.path());
    app.handle_batch([AppCommand::Import(selection(&[("third.mp3", b"3")]))]);
    assert_eq!(app.library().len(), 3);

    app.handle_batch([AppCommand::Select(2)]);
    assert_eq!(app.playback().cursor(), Some(2));

    app.handle_batch([AppCommand::Next]);
    assert_eq!(app.playback().cursor(), Some(0));
    assert_eq!(app.playback().state(), PlaybackState::Playing);

    app.handle_batch([AppCommand::Prev]);
    assert_eq!(app.playback().cursor(), Some(2));
}

#[test]
fn queued_imports_share_one_reload() {
    let dir = tempfile::tempdir().unwrap();
    let (mut app, rx) = booted(dir.path());
    drain(&rx);

    app.handle_batch([
        AppCommand::Import(selection(&[("one.mp3", b"1")])),
        AppCommand::Reload,
        AppCommand::Import(selection(&[("two.flac", b"2"), ("three.ogg", b"3")])),
    ]);

    assert_eq!(app.library().len(), 5);
    let reloads = drain(&rx)
        .iter()
        .filter(|e| matches!(e, AppEvent::PlaylistReady { .. }))
        .count();
    assert_eq!(reloads, 1);
}

#[test]
fn transport_after_import_sees_new_songs() {
    let dir = tempfile::tempdir().unwrap();
    let (mut app, _rx) = booted(dir.path());

    app.handle_batch([
        AppCommand::Import(selection(&[("new.mp3", b"n")])),
        AppCommand::Select(2),
    ]);

    assert_eq!(app.playback().cursor(), Some(2));
    assert_eq!(
        crate::domain::SongInfo::get_title(&**app.library().get(2).unwrap()),
        "new"
    );
}

#[test]
fn empty_import_does_not_reload() {
    let dir = tempfile::tempdir().unwrap();
    let (mut app, rx) = booted(dir.path());
    drain(&rx);

    app.handle_batch([AppCommand::Import(FileSelection::new())]);
    assert!(drain(&rx).is_empty());
}

#[test]
fn reload_invalidates_announced_locators() {
    let dir = tempfile::tempdir().unwrap();
    let (mut app, rx) = booted(dir.path());

    let first_src = drain(&rx)
        .into_iter()
        .find_map(|e| match e {
            AppEvent::TrackReady { src, .. } => Some(src),
            _ => None,
        })
        .unwrap();
    assert!(app.library().resolve(&first_src).is_some());

    app.handle_batch([AppCommand::Reload]);
    assert!(app.library().resolve(&first_src).is_none());
    assert_eq!(app.playback().cursor(), Some(0));
}

#[test]
fn track_end_auto_advances_once_and_wraps() {
    let dir = tempfile::tempdir().unwrap();
    let (mut app, _rx) = booted(dir.path());

    let first = app.now_playing().unwrap();
    app.handle_player_event(PlayerEvent::TrackEnded(first));
    assert_eq!(app.playback().cursor(), Some(1));
    assert_eq!(app.playback().state(), PlaybackState::Playing);

    // The same end arriving twice advances only once
    app.handle_player_event(PlayerEvent::TrackEnded(first));
    assert_eq!(app.playback().cursor(), Some(1));

    let second = app.now_playing().unwrap();
    app.handle_player_event(PlayerEvent::TrackEnded(second));
    assert_eq!(app.playback().cursor(), Some(0));
}

#[test]
fn late_events_from_a_replaced_track_are_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let (mut app, rx) = booted(dir.path());

    app.handle_batch([AppCommand::Select(1)]);
    let replaced = app.now_playing().unwrap();
    app.handle_batch([AppCommand::Reload]);
    assert_eq!(app.playback().cursor(), Some(0));
    drain(&rx);

    app.handle_player_event(PlayerEvent::Position {
        token: replaced,
        position: Duration::from_secs(3),
        duration: Some(Duration::from_secs(10)),
    });
    app.handle_player_event(PlayerEvent::TrackEnded(replaced));

    assert_eq!(app.playback().cursor(), Some(0));
    assert_eq!(app.playback().state(), PlaybackState::Paused);
    assert_eq!(app.playback().position(), Duration::ZERO);
    assert!(drain(&rx).is_empty());
}

/// Silent playback that refuses one particular payload
struct RejectingBackend {
    inner: SilentBackend,
    reject: &'static [u8],
}

impl PlaybackBackend for RejectingBackend {
    fn load(&mut self, payload: Arc<[u8]>) -> anyhow::Result<()> {
        if &*payload == self.reject {
            self.inner.stop();
            return Err(anyhow::anyhow!("unsupported format"));
        }
        self.inner.load(payload)
    }

    fn play(&mut self) {
        self.inner.play()
    }

    fn pause(&mut self) {
        self.inner.pause()
    }

    fn stop(&mut self) {
        self.inner.stop()
    }

    fn seek(&mut self, position: Duration) -> anyhow::Result<()> {
        self.inner.seek(position)
    }

    fn position(&self) -> Duration {
        self.inner.position()
    }

    fn duration(&self) -> Option<Duration> {
        self.inner.duration()
    }

    fn is_paused(&self) -> bool {
        self.inner.is_paused()
    }

    fn track_ended(&self) -> bool {
        self.inner.track_ended()
    }
}

#[test]
fn undecodable_track_leaves_playback_stopped() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings_in(dir.path());
    let fetcher = full_fetcher(&settings);
    let player = PlayerHandle::spawn(|| {
        Ok(Box::new(RejectingBackend {
            inner: SilentBackend::new(),
            reject: b"Hot Mess",
        }) as Box<dyn PlaybackBackend>)
    })
    .unwrap();

    let (tx, rx) = crossbeam_channel::unbounded();
    let mut app = Cassette::new(settings, fetcher, player, tx);
    app.boot();

    app.handle_batch([AppCommand::Next]);
    assert_eq!(app.playback().state(), PlaybackState::Playing);
    let failing = app.now_playing().unwrap();

    let wait = Duration::from_secs(2);
    loop {
        let event = app.player.events().recv_timeout(wait).unwrap();
        let failed = matches!(&event, PlayerEvent::LoadFailed { token, .. } if *token == failing);
        app.handle_player_event(event);
        if failed {
            break;
        }
    }

    assert_eq!(app.playback().cursor(), Some(1));
    assert_eq!(app.playback().state(), PlaybackState::Stopped);
    assert_eq!(app.now_playing(), None);
    assert!(
        drain(&rx)
            .iter()
            .any(|e| matches!(e, AppEvent::PlayerError(msg) if msg.contains("unsupported")))
    );
}

#[test]
fn toggle_switches_between_playing_and_paused() {
    let dir = tempfile::tempdir().unwrap();
    let (mut app, rx) = booted(dir.path());
    drain(&rx);

    app.handle_batch([AppCommand::TogglePlayback]);
    assert_eq!(app.playback().state(), PlaybackState::Playing);

    app.handle_batch([AppCommand::TogglePlayback]);
    assert_eq!(app.playback().state(), PlaybackState::Paused);

    assert_eq!(
        drain(&rx),
        [
            AppEvent::PlaybackStateChanged(PlaybackState::Playing),
            AppEvent::PlaybackStateChanged(PlaybackState::Paused),
        ]
    );
}

#[test]
fn position_reports_become_progress() {
    let dir = tempfile::tempdir().unwrap();
    let (mut app, rx) = booted(dir.path());
    drain(&rx);

    app.handle_player_event(PlayerEvent::Position {
        token: app.now_playing().unwrap(),
        position: Duration::from_secs(15),
        duration: Some(Duration::from_secs(60)),
    });
    assert_eq!(
        drain(&rx),
        [AppEvent::Progress {
            position: Duration::from_secs(15),
            duration: Some(Duration::from_secs(60)),
            percent: Some(25.0),
        }]
    );

    app.handle_batch([AppCommand::SeekPercent(50.0)]);
    assert_eq!(app.playback().position(), Duration::from_secs(30));
}

#[test]
fn missing_images_fall_back_to_default() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("img")).unwrap();
    std::fs::write(dir.path().join("img/cover.png"), b"png").unwrap();

    let root = dir.path();
    let default = "assets/images/default.jpeg";
    assert_eq!(resolve_image("img/cover.png", root, default), "img/cover.png");
    assert_eq!(resolve_image("img/missing.png", root, default), default);
    assert_eq!(resolve_image("", root, default), default);
    assert_eq!(
        resolve_image("https://example.org/a.png", root, default),
        "https://example.org/a.png"
    );
}

#[test]
fn track_ready_uses_default_for_unresolved_catalog_image() {
    let dir = tempfile::tempdir().unwrap();
    let mut settings = settings_in(dir.path());
    settings.catalog = vec![CatalogEntry::new("Solo", "Band", "solo.mp3", "gone.png")];
    let fetcher = full_fetcher(&settings);
    let (mut app, rx) = app_with(settings, fetcher);
    app.boot();

    let img = drain(&rx)
        .into_iter()
        .find_map(|e| match e {
            AppEvent::TrackReady { img, .. } => Some(img),
            _ => None,
        })
        .unwrap();
    assert_eq!(img, app.settings().default_image);
}

#[test]
fn run_serves_commands_until_quit() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings_in(dir.path());
    let fetcher = full_fetcher(&settings);
    let (mut app, _rx) = app_with(settings, fetcher);

    let (cmd_tx, cmd_rx) = crossbeam_channel::unbounded();
    cmd_tx.send(AppCommand::Next).unwrap();
    cmd_tx.send(AppCommand::Quit).unwrap();

    app.run(&cmd_rx).unwrap();
    assert!(app.should_quit());
    // Shutdown releases the library
    assert!(app.library().is_empty());
    assert!(app.store().is_none());
}
