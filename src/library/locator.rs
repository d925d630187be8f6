use std::{collections::HashMap, fmt, sync::Arc};

/// Session-scoped handle to a stored audio payload.
///
/// A locator only resolves against the registry generation that issued it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AudioLocator {
    session: u32,
    generation: u64,
    key: i64,
}

impl AudioLocator {
    pub fn key(&self) -> i64 {
        self.key
    }
}

impl fmt::Display for AudioLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "blob:cassette/{:08x}/{}/{}",
            self.session, self.generation, self.key
        )
    }
}

/// Payloads handed out to the player, keyed by record id.
pub struct BlobRegistry {
    session: u32,
    generation: u64,
    blobs: HashMap<i64, Arc<[u8]>>,
}

impl BlobRegistry {
    pub fn new() -> Self {
        BlobRegistry {
            session: rand::random(),
            generation: 0,
            blobs: HashMap::new(),
        }
    }

    pub fn register(&mut self, key: i64, payload: Vec<u8>) -> AudioLocator {
        self.blobs.insert(key, Arc::from(payload));

        AudioLocator {
            session: self.session,
            generation: self.generation,
            key,
        }
    }

    pub fn resolve(&self, locator: &AudioLocator) -> Option<Arc<[u8]>> {
        if locator.session != self.session || locator.generation != self.generation {
            return None;
        }
        self.blobs.get(&locator.key).cloned()
    }

    /// Release every payload and invalidate all locators issued so far
    pub fn revoke_all(&mut self) {
        if !self.blobs.is_empty() {
            log::debug!(
                "Revoking {} locators of generation {}",
                self.blobs.len(),
                self.generation
            );
        }
        self.blobs.clear();
        self.generation += 1;
    }

    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }
}

impl Default for BlobRegistry {
    fn default() -> Self {
        Self::new()
    }
}
