mod catalog;
mod playable_song;
mod song_record;

pub(crate) use catalog::DEFAULT_IMAGE;
pub use catalog::{CatalogEntry, default_catalog};
pub use playable_song::PlayableSong;
pub use song_record::{NewSong, SongRecord};

pub trait SongInfo {
    fn get_title(&self) -> &str;
    fn get_artist(&self) -> &str;
    fn get_img(&self) -> &str;

    /// Line shown for this song in a playlist view
    fn display_line(&self) -> String {
        format!("{} - {}", self.get_title(), self.get_artist())
    }
}
