use super::{AppCommand, Cassette};
use crossbeam_channel::{Receiver, select};
use std::iter;

impl Cassette {
    /// Boot, then serve commands and player events until `Quit` or until
    /// every command sender is gone.
    pub fn run(&mut self, commands: &Receiver<AppCommand>) -> anyhow::Result<()> {
        self.boot();
        let player_events = self.player.events().clone();
        let idle = crossbeam_channel::never();
        let mut player_alive = true;

        while !self.quit {
            select! {
                recv(commands) -> cmd => match cmd {
                    Ok(cmd) => {
                        // Drain whatever queued up so reloads can be coalesced
                        let batch: Vec<AppCommand> =
                            iter::once(cmd).chain(commands.try_iter()).collect();
                        self.handle_batch(batch);
                    }
                    Err(_) => self.quit = true,
                },

                recv(if player_alive { &player_events } else { &idle }) -> event => match event {
                    Ok(event) => self.handle_player_event(event),
                    // Player thread is gone, stop polling it
                    Err(_) => player_alive = false,
                },
            }
        }

        self.shutdown();
        Ok(())
    }
}
