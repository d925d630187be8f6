use super::PlaybackBackend;
use anyhow::Result;
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};
use std::{io::Cursor, sync::Arc, time::Duration};

pub struct RodioBackend {
    sink: Sink,
    duration: Option<Duration>,
    loaded: bool,
    _stream: OutputStream,
}

impl RodioBackend {
    pub fn new() -> Result<Self> {
        let mut stream = OutputStreamBuilder::open_default_stream()?;
        stream.log_on_drop(false);
        let sink = Sink::connect_new(stream.mixer());

        Ok(Self {
            sink,
            duration: None,
            loaded: false,
            _stream: stream,
        })
    }
}

impl PlaybackBackend for RodioBackend {
    fn load(&mut self, payload: Arc<[u8]>) -> Result<()> {
        // Clearing first leaves nothing queued if decoding fails
        self.sink.clear();
        self.loaded = false;
        self.duration = None;

        let source = Decoder::new(Cursor::new(payload))?;
        self.duration = source.total_duration();
        self.sink.append(source);
        self.sink.pause();
        self.loaded = true;

        Ok(())
    }

    fn play(&mut self) {
        self.sink.play();
    }

    fn pause(&mut self) {
        self.sink.pause();
    }

    fn stop(&mut self) {
        self.sink.clear();
        self.loaded = false;
        self.duration = None;
    }

    fn seek(&mut self, position: Duration) -> Result<()> {
        // SeekError is not Sync, so it can't convert into anyhow::Error via `?`
        self.sink
            .try_seek(position)
            .map_err(|e| anyhow::anyhow!("{e}"))?;
        Ok(())
    }

    fn position(&self) -> Duration {
        self.sink.get_pos()
    }

    fn duration(&self) -> Option<Duration> {
        self.duration
    }

    fn is_paused(&self) -> bool {
        self.sink.is_paused()
    }

    fn track_ended(&self) -> bool {
        self.loaded && self.sink.empty()
    }
}
