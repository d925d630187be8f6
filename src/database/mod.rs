use queries::*;
use rusqlite::{Connection, Transaction, TransactionBehavior, params};
use std::{
    fs,
    path::{Path, PathBuf},
};

mod cursor;
mod error;
pub mod queries;
mod tables;
mod worker;

pub use cursor::SongCursor;
pub use error::{Result, StoreError};
pub use worker::{DbWorker, Pending, ScanStream};

use crate::domain::NewSong;

const DATA_DIRECTORY: &str = "Cassette";
const DATABASE_FILENAME: &str = "cassette.db";

pub(crate) const SCHEMA_VERSION: i64 = 1;

/// Result of the seeding write.
#[derive(Debug, PartialEq, Eq)]
pub enum SeedWrite {
    /// The collection was empty and the batch was written with these ids
    Written(Vec<i64>),
    /// The collection already held this many records, nothing was written
    NotEmpty(u64),
}

pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join(DATA_DIRECTORY).join(DATABASE_FILENAME))
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let unavailable = |reason: String| StoreError::Unavailable {
            path: path.to_path_buf(),
            reason,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| unavailable(e.to_string()))?;
        }

        let conn = Connection::open(path).map_err(|e| unavailable(e.to_string()))?;
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |_| Ok(()))?;

        let mut db = Database { conn };
        db.create_tables()?;

        Ok(db)
    }

    fn create_tables(&mut self) -> Result<()> {
        let version: i64 = self
            .conn
            .pragma_query_value(None, "user_version", |row| row.get(0))?;

        match version {
            0 => {
                let tx = self.conn.transaction()?;
                tx.execute_batch(tables::CREATE_TABLES)?;
                tx.pragma_update(None, "user_version", SCHEMA_VERSION)?;
                tx.commit()?;
                log::info!("Created song store (schema v{SCHEMA_VERSION})");
            }
            SCHEMA_VERSION => (),
            found => {
                return Err(StoreError::UnsupportedSchema {
                    found,
                    supported: SCHEMA_VERSION,
                });
            }
        }

        Ok(())
    }

    // ===================
    //   SONG OPERATIONS
    // ===================

    pub fn count(&self) -> Result<u64> {
        let count: i64 = self.conn.query_row(COUNT_SONGS, [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Append every song in one transaction. Nothing is written if any insert fails.
    pub fn insert_songs(&mut self, songs: &[NewSong]) -> Result<Vec<i64>> {
        let tx = self.conn.transaction()?;
        let ids = insert_all(&tx, songs)?;
        tx.commit()?;

        Ok(ids)
    }

    /// Append the batch only if the collection is still empty.
    ///
    /// The emptiness check and the writes share one immediate transaction, so
    /// two openers racing on a fresh store cannot both seed it.
    pub fn insert_if_empty(&mut self, songs: &[NewSong]) -> Result<SeedWrite> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let count: i64 = tx.query_row(COUNT_SONGS, [], |row| row.get(0))?;
        if count > 0 {
            return Ok(SeedWrite::NotEmpty(count as u64));
        }

        let ids = insert_all(&tx, songs)?;
        tx.commit()?;

        Ok(SeedWrite::Written(ids))
    }

    pub fn scan(&self) -> SongCursor<'_> {
        SongCursor::new(&self.conn)
    }
}

fn insert_all(tx: &Transaction<'_>, songs: &[NewSong]) -> Result<Vec<i64>> {
    let mut stmt = tx.prepare_cached(INSERT_SONG)?;
    let mut ids = Vec::with_capacity(songs.len());

    for song in songs {
        stmt.execute(params![&song.title, &song.artist, &song.audio, &song.img])?;
        ids.push(tx.last_insert_rowid());
    }

    Ok(ids)
}
