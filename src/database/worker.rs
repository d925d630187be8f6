use super::{Database, Result, SeedWrite, StoreError};
use crate::domain::{NewSong, SongRecord};
use crossbeam_channel::{Receiver, Sender, TryRecvError};
use std::{iter::FusedIterator, path::PathBuf, thread};

enum DbRequest {
    Count(Sender<Result<u64>>),
    AddBatch(Vec<NewSong>, Sender<Result<Vec<i64>>>),
    AddIfEmpty(Vec<NewSong>, Sender<Result<SeedWrite>>),
    Scan(Sender<Option<Result<SongRecord>>>),
}

/// Reply to a request issued to the store worker.
///
/// Dependent operations are sequenced by waiting on one `Pending` before
/// issuing the next request.
#[must_use = "a store request does nothing observable until its reply is taken"]
pub struct Pending<T> {
    reply: Receiver<Result<T>>,
}

impl<T> Pending<T> {
    fn channel() -> (Sender<Result<T>>, Self) {
        let (tx, rx) = crossbeam_channel::bounded(1);
        (tx, Pending { reply: rx })
    }

    /// Block until the worker answers
    pub fn wait(self) -> Result<T> {
        self.reply
            .recv()
            .unwrap_or_else(|_| Err(StoreError::WorkerGone))
    }

    /// Take the reply if it has already arrived
    pub fn try_take(&self) -> Option<Result<T>> {
        match self.reply.try_recv() {
            Ok(reply) => Some(reply),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(StoreError::WorkerGone)),
        }
    }
}

/// Handle to the thread that owns the store connection.
///
/// Requests are served one at a time in the order they were sent. The worker
/// exits once every handle has been dropped.
#[derive(Clone)]
pub struct DbWorker {
    requests: Sender<DbRequest>,
}

impl DbWorker {
    pub fn open(path: impl Into<PathBuf>) -> Pending<DbWorker> {
        let path = path.into();
        let (reply, pending) = Pending::channel();

        let spawned = thread::Builder::new()
            .name("cassette-store".into())
            .spawn(move || {
                let mut db = match Database::open(&path) {
                    Ok(db) => db,
                    Err(e) => {
                        let _ = reply.send(Err(e));
                        return;
                    }
                };

                let (tx, rx) = crossbeam_channel::unbounded();
                if reply.send(Ok(DbWorker { requests: tx })).is_err() {
                    return;
                }

                log::debug!("Store worker serving {}", path.display());
                serve(&mut db, rx);
                log::debug!("Store worker for {} shut down", path.display());
            });

        // The reply sender went down with the closure, so `wait` reports WorkerGone
        if let Err(e) = spawned {
            log::error!("Could not spawn store worker: {e}");
        }

        pending
    }

    pub fn count(&self) -> Pending<u64> {
        self.request(DbRequest::Count)
    }

    /// Append all songs atomically
    pub fn add_batch(&self, songs: Vec<NewSong>) -> Pending<Vec<i64>> {
        self.request(|reply| DbRequest::AddBatch(songs, reply))
    }

    pub fn add(&self, song: NewSong) -> Pending<Vec<i64>> {
        self.add_batch(vec![song])
    }

    pub fn add_if_empty(&self, songs: Vec<NewSong>) -> Pending<SeedWrite> {
        self.request(|reply| DbRequest::AddIfEmpty(songs, reply))
    }

    /// Stream every record in key order.
    ///
    /// The worker hands over one record at a time and serves nothing else until
    /// the stream is exhausted or dropped.
    pub fn scan(&self) -> ScanStream {
        let (tx, rx) = crossbeam_channel::bounded(0);
        let _ = self.requests.send(DbRequest::Scan(tx));

        ScanStream {
            records: rx,
            done: false,
        }
    }

    fn request<T>(&self, make: impl FnOnce(Sender<Result<T>>) -> DbRequest) -> Pending<T> {
        let (reply, pending) = Pending::channel();
        // On failure the request (and its reply sender) is dropped here
        let _ = self.requests.send(make(reply));
        pending
    }
}

fn serve(db: &mut Database, requests: Receiver<DbRequest>) {
    for request in requests.iter() {
        match request {
            DbRequest::Count(reply) => {
                let _ = reply.send(db.count());
            }
            DbRequest::AddBatch(songs, reply) => {
                let _ = reply.send(db.insert_songs(&songs));
            }
            DbRequest::AddIfEmpty(songs, reply) => {
                let _ = reply.send(db.insert_if_empty(&songs));
            }
            DbRequest::Scan(sink) => stream_scan(db, &sink),
        }
    }
}

fn stream_scan(db: &Database, sink: &Sender<Option<Result<SongRecord>>>) {
    for item in db.scan() {
        let failed = item.is_err();

        // Receiver dropped mid-scan
        if sink.send(Some(item)).is_err() || failed {
            return;
        }
    }

    let _ = sink.send(None);
}

/// One-shot, in-order stream of store records.
pub struct ScanStream {
    records: Receiver<Option<Result<SongRecord>>>,
    done: bool,
}

impl Iterator for ScanStream {
    type Item = Result<SongRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.records.recv() {
            Ok(Some(Ok(record))) => Some(Ok(record)),
            Ok(Some(Err(e))) => {
                self.done = true;
                Some(Err(e))
            }
            Ok(None) => {
                self.done = true;
                None
            }
            Err(_) => {
                self.done = true;
                Some(Err(StoreError::WorkerGone))
            }
        }
    }
}

impl FusedIterator for ScanStream {}
