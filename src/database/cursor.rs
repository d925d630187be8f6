use super::{Result, queries::SCAN_NEXT};
use crate::domain::SongRecord;
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::iter::FusedIterator;

/// Walks the `songs` collection in key order, one record per step.
///
/// The cursor is consumed as it advances and cannot be rewound. After the
/// last record (or the first error) it keeps returning `None`.
pub struct SongCursor<'a> {
    conn: &'a Connection,
    last_id: i64,
    done: bool,
}

impl<'a> SongCursor<'a> {
    pub(super) fn new(conn: &'a Connection) -> Self {
        SongCursor {
            conn,
            last_id: i64::MIN,
            done: false,
        }
    }

    fn step(&self) -> Result<Option<SongRecord>> {
        let mut stmt = self.conn.prepare_cached(SCAN_NEXT)?;
        let record = stmt
            .query_row(params![self.last_id], row_to_record)
            .optional()?;

        Ok(record)
    }
}

impl Iterator for SongCursor<'_> {
    type Item = Result<SongRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.step() {
            Ok(Some(record)) => {
                self.last_id = record.id;
                Some(Ok(record))
            }
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl FusedIterator for SongCursor<'_> {}

fn row_to_record(row: &Row<'_>) -> rusqlite::Result<SongRecord> {
    Ok(SongRecord {
        id: row.get("id")?,
        title: row.get("title")?,
        artist: row.get("artist")?,
        audio: row.get("audio")?,
        img: row.get("img")?,
    })
}
