use crate::player::PlaybackState;
use std::time::Duration;

/// Cursor and transport state over the current library list.
///
/// Every transport operation is a no-op while the list is empty.
pub struct PlaybackCoordinator {
    cursor: Option<usize>,
    len: usize,
    state: PlaybackState,
    position: Duration,
    duration: Option<Duration>,
}

impl PlaybackCoordinator {
    pub fn new() -> Self {
        PlaybackCoordinator {
            cursor: None,
            len: 0,
            state: PlaybackState::Stopped,
            position: Duration::ZERO,
            duration: None,
        }
    }

    /// Point the cursor at the first song of a freshly loaded list
    pub fn reset(&mut self, len: usize) -> Option<usize> {
        self.len = len;
        self.cursor = (len > 0).then_some(0);
        self.state = PlaybackState::Stopped;
        self.clear_progress();
        self.cursor
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn next(&mut self) -> Option<usize> {
        let current = self.cursor.filter(|_| self.len > 0)?;
        self.move_to((current + 1) % self.len)
    }

    pub fn prev(&mut self) -> Option<usize> {
        let current = self.cursor.filter(|_| self.len > 0)?;
        self.move_to((current + self.len - 1) % self.len)
    }

    pub fn select(&mut self, index: usize) -> Option<usize> {
        match index < self.len {
            true => self.move_to(index),
            false => None,
        }
    }

    fn move_to(&mut self, index: usize) -> Option<usize> {
        self.cursor = Some(index);
        self.clear_progress();
        self.cursor
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn set_state(&mut self, state: PlaybackState) {
        self.state = state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn update_position(&mut self, position: Duration, duration: Option<Duration>) {
        self.position = position;
        if duration.is_some() {
            self.duration = duration;
        }
    }

    pub fn position(&self) -> Duration {
        self.position
    }

    pub fn duration(&self) -> Option<Duration> {
        self.duration
    }

    pub fn progress_percent(&self) -> Option<f32> {
        progress_percent(self.position, self.duration)
    }

    pub fn seek_target(&self, percent: f32) -> Option<Duration> {
        seek_target(percent, self.duration)
    }

    fn clear_progress(&mut self) {
        self.position = Duration::ZERO;
        self.duration = None;
    }
}

impl Default for PlaybackCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

/// Position as a percentage of the track length
pub fn progress_percent(position: Duration, duration: Option<Duration>) -> Option<f32> {
    let duration = duration.filter(|d| !d.is_zero())?;
    let percent = position.as_secs_f32() / duration.as_secs_f32() * 100.0;
    Some(percent.min(100.0))
}

pub fn seek_target(percent: f32, duration: Option<Duration>) -> Option<Duration> {
    if !percent.is_finite() {
        return None;
    }
    let duration = duration?;
    Some(duration.mul_f32(percent.clamp(0.0, 100.0) / 100.0))
}
