use super::SongInfo;
use crate::library::AudioLocator;

/// In-memory song descriptor built by the library loader.
///
/// `src` is only valid for the load that produced it.
#[derive(Debug, Clone)]
pub struct PlayableSong {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) artist: String,
    pub(crate) img: String,
    pub(crate) src: AudioLocator,
}

impl PlayableSong {
    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn src(&self) -> &AudioLocator {
        &self.src
    }
}

impl SongInfo for PlayableSong {
    fn get_title(&self) -> &str {
        &self.title
    }

    fn get_artist(&self) -> &str {
        &self.artist
    }

    fn get_img(&self) -> &str {
        &self.img
    }
}
