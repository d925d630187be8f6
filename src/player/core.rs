use super::{LoadToken, PlaybackBackend, PlayerCommand, PlayerEvent};
use crate::REFRESH_RATE;
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use std::{
    sync::Arc,
    thread::{self, JoinHandle},
    time::Duration,
};

// Position reports are throttled to this granularity
const REPORT_STEP_MS: u128 = 250;

pub(super) struct PlayerCore {
    backend: Box<dyn PlaybackBackend>,
    commands: Receiver<PlayerCommand>,
    events: Sender<PlayerEvent>,

    current: Option<LoadToken>,
    last_report: Option<u128>,
}

impl PlayerCore {
    pub(super) fn spawn<F>(
        make_backend: F,
        commands: Receiver<PlayerCommand>,
        events: Sender<PlayerEvent>,
    ) -> std::io::Result<JoinHandle<()>>
    where
        F: FnOnce() -> anyhow::Result<Box<dyn PlaybackBackend>> + Send + 'static,
    {
        thread::Builder::new()
            .name("cassette-player".into())
            .spawn(move || {
                // Audio output handles are created on the thread that uses them
                let backend: Box<dyn PlaybackBackend> = match make_backend() {
                    Ok(backend) => backend,
                    Err(e) => {
                        log::warn!("Audio output unavailable, continuing silently: {e}");
                        let _ = events.send(PlayerEvent::Error(e.to_string()));
                        Box::new(super::SilentBackend::new())
                    }
                };

                let mut core = PlayerCore {
                    backend,
                    commands,
                    events,
                    current: None,
                    last_report: None,
                };

                core.run();
            })
    }

    fn run(&mut self) {
        loop {
            match self.commands.recv_timeout(REFRESH_RATE) {
                Ok(cmd) => {
                    if !self.handle(cmd) {
                        break;
                    }
                    while let Ok(cmd) = self.commands.try_recv() {
                        if !self.handle(cmd) {
                            return;
                        }
                    }
                }
                Err(RecvTimeoutError::Timeout) => (),
                Err(RecvTimeoutError::Disconnected) => break,
            }

            self.check_track_end();
            self.report_position();
        }
    }

    /// Returns false once the player should shut down
    fn handle(&mut self, cmd: PlayerCommand) -> bool {
        match cmd {
            PlayerCommand::Load {
                token,
                payload,
                autoplay,
            } => self.load(token, payload, autoplay),
            PlayerCommand::Play => {
                if self.current.is_some() {
                    self.backend.play()
                }
            }
            PlayerCommand::Pause => self.backend.pause(),
            PlayerCommand::Stop => self.stop(),
            PlayerCommand::Seek(position) => self.seek(position),
            PlayerCommand::Shutdown => {
                self.stop();
                return false;
            }
        }
        true
    }

    fn load(&mut self, token: LoadToken, payload: Arc<[u8]>, autoplay: bool) {
        if let Err(e) = self.backend.load(payload) {
            // The previous track must not keep playing under the new one
            self.stop();
            self.emit(PlayerEvent::LoadFailed {
                token,
                reason: e.to_string(),
            });
            return;
        }

        self.current = Some(token);
        self.last_report = None;
        self.emit(PlayerEvent::Loaded {
            token,
            duration: self.backend.duration(),
        });

        if autoplay {
            self.backend.play();
        }
    }

    fn stop(&mut self) {
        self.backend.stop();
        self.current = None;
        self.last_report = None;
    }

    fn seek(&mut self, position: Duration) {
        if self.current.is_none() {
            return;
        }
        if let Err(e) = self.backend.seek(position) {
            self.emit(PlayerEvent::Error(e.to_string()));
        }
    }

    fn check_track_end(&mut self) {
        // Stopping clears `current`, so the end is reported once
        let Some(token) = self.current else {
            return;
        };
        if self.backend.track_ended() {
            self.stop();
            self.emit(PlayerEvent::TrackEnded(token));
        }
    }

    fn report_position(&mut self) {
        let Some(token) = self.current else {
            return;
        };
        if self.backend.is_paused() {
            return;
        }

        let position = self.backend.position();
        let step = position.as_millis() / REPORT_STEP_MS;
        if self.last_report != Some(step) {
            self.last_report = Some(step);
            self.emit(PlayerEvent::Position {
                token,
                position,
                duration: self.backend.duration(),
            });
        }
    }

    fn emit(&self, event: PlayerEvent) {
        let _ = self.events.send(event);
    }
}
