use crate::{
    database::{DbWorker, SeedWrite, StoreError},
    domain::{CatalogEntry, NewSong},
};
use std::{fs, io, path::PathBuf};
use thiserror::Error;

/// Source of the bundled catalog audio.
pub trait AssetFetcher: Send {
    fn fetch(&self, src: &str) -> io::Result<Vec<u8>>;
}

/// Reads catalog assets relative to a root directory.
pub struct FsFetcher {
    root: PathBuf,
}

impl FsFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FsFetcher { root: root.into() }
    }
}

impl AssetFetcher for FsFetcher {
    fn fetch(&self, src: &str) -> io::Result<Vec<u8>> {
        fs::read(self.root.join(src))
    }
}

#[derive(Error, Debug)]
pub enum SeedError {
    #[error("could not fetch `{title}` from {src}: {source}")]
    Fetch {
        title: String,
        src: String,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, PartialEq, Eq)]
pub enum SeedOutcome {
    Seeded(usize),
    AlreadySeeded(u64),
}

/// Populate an empty store with the catalog.
///
/// Every entry is fetched before anything is written. A single failed fetch
/// aborts the seed and leaves the store empty, so the next open tries again.
pub fn seed_if_empty(
    store: &DbWorker,
    catalog: &[CatalogEntry],
    fetcher: &dyn AssetFetcher,
) -> Result<SeedOutcome, SeedError> {
    let count = store.count().wait()?;
    if count > 0 {
        log::debug!("Store holds {count} songs, skipping seed");
        return Ok(SeedOutcome::AlreadySeeded(count));
    }

    let batch = fetch_catalog(catalog, fetcher)?;

    match store.add_if_empty(batch).wait()? {
        SeedWrite::Written(ids) => {
            log::info!("Seeded store with {} catalog songs", ids.len());
            Ok(SeedOutcome::Seeded(ids.len()))
        }
        SeedWrite::NotEmpty(count) => Ok(SeedOutcome::AlreadySeeded(count)),
    }
}

fn fetch_catalog(
    catalog: &[CatalogEntry],
    fetcher: &dyn AssetFetcher,
) -> Result<Vec<NewSong>, SeedError> {
    catalog
        .iter()
        .map(|entry| {
            let audio = fetcher.fetch(&entry.src).map_err(|source| SeedError::Fetch {
                title: entry.title.clone(),
                src: entry.src.clone(),
                source,
            })?;

            Ok(NewSong {
                title: entry.title.clone(),
                artist: entry.artist.clone(),
                audio,
                img: entry.img.clone(),
            })
        })
        .collect()
}
