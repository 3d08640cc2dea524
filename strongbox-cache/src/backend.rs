//! Single-slot persistence substrate.

use crate::error::CacheResult;
use std::sync::{Arc, Mutex, PoisonError};

/// Storage for exactly one opaque blob.
///
/// Implementations never interpret the bytes; encryption happens in
/// [`SecretCache`](crate::SecretCache).
pub trait CacheBackend: Send {
    /// Returns the stored blob, or `None` when the slot is empty.
    fn read(&mut self) -> CacheResult<Option<Vec<u8>>>;

    /// Overwrites the slot.
    fn replace(&mut self, entry: &[u8]) -> CacheResult<()>;

    /// Empties the slot. Succeeds when already empty.
    fn clear(&mut self) -> CacheResult<()>;

    /// Releases any underlying handle.
    fn close(&mut self) -> CacheResult<()> {
        Ok(())
    }
}

/// In-process slot. Clones share the same storage, which lets tests drop a
/// cache and reopen "the same disk".
#[derive(Clone, Debug, Default)]
pub struct MemoryBackend {
    slot: Arc<Mutex<Option<Vec<u8>>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw bytes currently stored.
    pub fn snapshot(&self) -> Option<Vec<u8>> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Overwrites the stored bytes directly, bypassing encryption.
    pub fn put_raw(&self, entry: Vec<u8>) {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(entry);
    }
}

impl CacheBackend for MemoryBackend {
    fn read(&mut self) -> CacheResult<Option<Vec<u8>>> {
        Ok(self.snapshot())
    }

    fn replace(&mut self, entry: &[u8]) -> CacheResult<()> {
        self.put_raw(entry.to_vec());
        Ok(())
    }

    fn clear(&mut self) -> CacheResult<()> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}
