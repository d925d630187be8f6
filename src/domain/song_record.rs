use super::SongInfo;

/// A song as it lives in the store.
///
/// Records are written once by seeding or import and never updated in place.
pub struct SongRecord {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) artist: String,
    pub(crate) audio: Vec<u8>,
    pub(crate) img: String,
}

impl SongRecord {
    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn audio(&self) -> &[u8] {
        &self.audio
    }
}

impl SongInfo for SongRecord {
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

/// Record input. The store assigns the id.
#[derive(Clone)]
pub struct NewSong {
    pub title: String,
    pub artist: String,
    pub audio: Vec<u8>,
    pub img: String,
}

impl std::fmt::Debug for NewSong {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewSong")
            .field("title", &self.title)
            .field("artist", &self.artist)
            .field("audio_len", &self.audio.len())
            .field("img", &self.img)
            .finish()
    }
}
