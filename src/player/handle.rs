use super::{
    LoadToken, PlaybackBackend, PlayerCommand, PlayerEvent, SilentBackend, core::PlayerCore,
};
use anyhow::Result;
use crossbeam_channel::{Receiver, Sender};
use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    thread::JoinHandle,
    time::Duration,
};

pub struct PlayerHandle {
    commands: Sender<PlayerCommand>,
    events: Receiver<PlayerEvent>,
    thread: Option<JoinHandle<()>>,
    next_token: AtomicU64,
}

impl PlayerHandle {
    /// Start the player thread. The backend is built on that thread; if it
    /// fails the player falls back to a silent backend.
    pub fn spawn<F>(make_backend: F) -> Result<Self>
    where
        F: FnOnce() -> Result<Box<dyn PlaybackBackend>> + Send + 'static,
    {
        let (cmd_tx, cmd_rx) = crossbeam_channel::unbounded();
        let (evt_tx, evt_rx) = crossbeam_channel::unbounded();

        let thread = PlayerCore::spawn(make_backend, cmd_rx, evt_tx)?;

        Ok(PlayerHandle {
            commands: cmd_tx,
            events: evt_rx,
            thread: Some(thread),
            next_token: AtomicU64::new(0),
        })
    }

    pub fn silent() -> Result<Self> {
        Self::spawn(|| Ok(Box::new(SilentBackend::new()) as Box<dyn PlaybackBackend>))
    }

    pub fn events(&self) -> &Receiver<PlayerEvent> {
        &self.events
    }

    pub fn poll_events(&self) -> Vec<PlayerEvent> {
        self.events.try_iter().collect()
    }
}

// =====================
//    COMMAND HANDLER
// =====================
impl PlayerHandle {
    /// Queue a track. Events about it carry the returned token.
    pub fn load(&self, payload: Arc<[u8]>, autoplay: bool) -> Result<LoadToken> {
        let token = LoadToken(self.next_token.fetch_add(1, Ordering::Relaxed));
        self.commands.send(PlayerCommand::Load {
            token,
            payload,
            autoplay,
        })?;
        Ok(token)
    }

    pub fn play(&self) -> Result<()> {
        self.commands.send(PlayerCommand::Play)?;
        Ok(())
    }

    pub fn pause(&self) -> Result<()> {
        self.commands.send(PlayerCommand::Pause)?;
        Ok(())
    }

    pub fn stop(&self) -> Result<()> {
        self.commands.send(PlayerCommand::Stop)?;
        Ok(())
    }

    pub fn seek(&self, position: Duration) -> Result<()> {
        self.commands.send(PlayerCommand::Seek(position))?;
        Ok(())
    }
}

impl Drop for PlayerHandle {
    fn drop(&mut self) {
        let _ = self.commands.send(PlayerCommand::Shutdown);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}
