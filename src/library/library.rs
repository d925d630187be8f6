use super::{AudioLocator, BlobRegistry};
use crate::{
    database::{DbWorker, Result},
    domain::{PlayableSong, SongInfo, SongRecord},
};
use indexmap::IndexMap;
use std::sync::Arc;

/// The in-memory playlist, in store key order.
///
/// Every rebuild replaces the whole list and revokes the locators handed out
/// by the previous one.
pub struct Library {
    songs: IndexMap<i64, Arc<PlayableSong>>,
    blobs: BlobRegistry,
}

impl Library {
    pub fn new() -> Self {
        Library {
            songs: IndexMap::new(),
            blobs: BlobRegistry::new(),
        }
    }

    /// Rebuild the library from a full scan of the store.
    pub fn reload(&mut self, store: &DbWorker) -> Result<usize> {
        self.rebuild(store.scan())
    }

    pub fn rebuild<I>(&mut self, records: I) -> Result<usize>
    where
        I: IntoIterator<Item = Result<SongRecord>>,
    {
        self.clear();

        for record in records {
            let record = match record {
                Ok(record) => record,
                Err(e) => {
                    self.clear();
                    return Err(e);
                }
            };

            let SongRecord {
                id,
                title,
                artist,
                audio,
                img,
            } = record;

            let src = self.blobs.register(id, audio);
            let song = PlayableSong {
                id,
                title,
                artist,
                img,
                src,
            };

            self.songs.insert(id, Arc::new(song));
        }

        log::info!("Loaded {} songs into the library", self.songs.len());
        Ok(self.songs.len())
    }

    pub fn clear(&mut self) {
        self.songs.clear();
        self.blobs.revoke_all();
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Arc<PlayableSong>> {
        self.songs.get_index(index).map(|(_, song)| song)
    }

    pub fn get_song_by_id(&self, id: i64) -> Option<&Arc<PlayableSong>> {
        self.songs.get(&id)
    }

    pub fn get_all_songs(&self) -> Vec<Arc<PlayableSong>> {
        self.songs.values().cloned().collect()
    }

    /// Payload behind a locator, if it belongs to the current load
    pub fn resolve(&self, locator: &AudioLocator) -> Option<Arc<[u8]>> {
        self.blobs.resolve(locator)
    }

    pub fn playlist_lines(&self) -> Vec<String> {
        self.songs.values().map(|s| s.display_line()).collect()
    }
}

impl Default for Library {
    fn default() -> Self {
        Self::new()
    }
}
