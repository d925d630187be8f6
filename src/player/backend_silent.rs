use super::PlaybackBackend;
use anyhow::Result;
use std::{
    sync::Arc,
    time::{Duration, Instant},
};

/// Backend without an output device.
///
/// Keeps a wall clock for the loaded track so transport and progress behave
/// as usual. Track length is unknown, so tracks never end on their own.
pub struct SilentBackend {
    loaded: bool,
    offset: Duration,
    started: Option<Instant>,
}

impl SilentBackend {
    pub fn new() -> Self {
        SilentBackend {
            loaded: false,
            offset: Duration::ZERO,
            started: None,
        }
    }
}

impl Default for SilentBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaybackBackend for SilentBackend {
    fn load(&mut self, _payload: Arc<[u8]>) -> Result<()> {
        self.loaded = true;
        self.offset = Duration::ZERO;
        self.started = None;
        Ok(())
    }

    fn play(&mut self) {
        if self.loaded && self.started.is_none() {
            self.started = Some(Instant::now());
        }
    }

    fn pause(&mut self) {
        self.offset = self.position();
        self.started = None;
    }

    fn stop(&mut self) {
        self.loaded = false;
        self.offset = Duration::ZERO;
        self.started = None;
    }

    fn seek(&mut self, position: Duration) -> Result<()> {
        self.offset = position;
        if self.started.is_some() {
            self.started = Some(Instant::now());
        }
        Ok(())
    }

    fn position(&self) -> Duration {
        match self.started {
            Some(started) => self.offset + started.elapsed(),
            None => self.offset,
        }
    }

    fn duration(&self) -> Option<Duration> {
        None
    }

    fn is_paused(&self) -> bool {
        self.started.is_none()
    }

    fn track_ended(&self) -> bool {
        false
    }
}
