use anyhow::Context;
use cassette::{
    AppCommand, AppEvent, Cassette, PlayerHandle, Settings, format_duration,
    library::{FileSelection, FsFetcher},
    player::{PlaybackBackend, RodioBackend},
};
use crossbeam_channel::{Receiver, Sender};
use std::{io::BufRead, thread};

fn main() -> anyhow::Result<()> {
    unsafe { std::env::set_var("RUST_BACKTRACE", "1") };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = Settings::load().context("Failed to load settings")?;
    let fetcher = Box::new(FsFetcher::new(&settings.assets_root));
    let player = PlayerHandle::spawn(|| {
        Ok(Box::new(RodioBackend::new()?) as Box<dyn PlaybackBackend>)
    })?;

    let (cmd_tx, cmd_rx) = crossbeam_channel::unbounded();
    let (evt_tx, evt_rx) = crossbeam_channel::unbounded();

    let paths: Vec<String> = std::env::args().skip(1).collect();
    if !paths.is_empty() {
        let selection = FileSelection::from_paths(&paths)?;
        cmd_tx.send(AppCommand::Import(selection))?;
    }

    thread::Builder::new()
        .name("cassette-events".into())
        .spawn(move || print_events(evt_rx))?;
    thread::Builder::new()
        .name("cassette-input".into())
        .spawn(move || read_commands(cmd_tx))?;

    let mut app = Cassette::new(settings, fetcher, player, evt_tx);
    app.run(&cmd_rx)
}

fn print_events(events: Receiver<AppEvent>) {
    for event in events {
        match event {
            AppEvent::TrackReady { index, title, artist, img, .. } => {
                println!("[{index}] {title} - {artist} ({img})")
            }
            AppEvent::PlaylistReady { entries, active } => {
                for (idx, line) in entries.iter().enumerate() {
                    let marker = if idx == active { '>' } else { ' ' };
                    println!("{marker} {idx:>3}  {line}");
                }
            }
            AppEvent::PlaybackStateChanged(state) => println!("{state:?}"),
            AppEvent::Progress { position, duration, percent } => {
                let total = duration.map_or_else(|| "-:--".to_string(), format_duration);
                let percent = percent.unwrap_or(0.0);
                println!("{} / {total} ({percent:.0}%)", format_duration(position));
            }
            AppEvent::ActiveChanged(_) => (),
            AppEvent::StoreUnavailable(e) => eprintln!("Song store unavailable: {e}"),
            AppEvent::SeedFailed(e) => eprintln!("Could not seed default songs: {e}"),
            AppEvent::ImportFailed(e) => eprintln!("Import failed: {e}"),
            AppEvent::PlayerError(e) => eprintln!("Player error: {e}"),
        }
    }
}

/// Line commands: `n`, `p`, `t`, `s <percent>`, `<index>`, `r`, `a <path>`, `q`
fn read_commands(commands: Sender<AppCommand>) {
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let Ok(line) = line else { break };
        let line = line.trim();

        let cmd = match line.split_once(' ') {
            Some(("s", pct)) => match pct.trim().parse() {
                Ok(pct) => AppCommand::SeekPercent(pct),
                Err(_) => continue,
            },
            Some(("a", path)) => match FileSelection::from_paths(&[path.trim()]) {
                Ok(selection) => AppCommand::Import(selection),
                Err(e) => {
                    eprintln!("{e:#}");
                    continue;
                }
            },
            _ => match line {
                "n" => AppCommand::Next,
                "p" => AppCommand::Prev,
                "t" | "" => AppCommand::TogglePlayback,
                "r" => AppCommand::Reload,
                "q" => AppCommand::Quit,
                idx => match idx.parse() {
                    Ok(idx) => AppCommand::Select(idx),
                    Err(_) => continue,
                },
            },
        };

        let quit = matches!(cmd, AppCommand::Quit);
        if commands.send(cmd).is_err() || quit {
            break;
        }
    }
}
