//! The secret cache: decrypted bundle in memory, encrypted slot on disk.

use crate::backend::CacheBackend;
use crate::error::{CacheError, CacheResult};
use crate::sqlite::SqliteBackend;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use strongbox_crypto::{CryptoError, CryptoKey, decrypt, encrypt};
use strongbox_types::SecretBundle;
use tracing::{debug, info, warn};

#[derive(Default)]
struct CacheState {
    bundle: Option<Arc<SecretBundle>>,
    /// Set when `load` found an entry the current key could not open.
    wrong_key: bool,
}

/// Thread-safe, single-slot, encrypted cache of all the user's secrets.
///
/// Readers share the state lock; `load`, `set`, `reset` and `close` take it
/// exclusively and do their persistence I/O while holding it. Lock order is
/// always state, then backend.
pub struct SecretCache {
    key: CryptoKey,
    state: RwLock<CacheState>,
    backend: Mutex<Option<Box<dyn CacheBackend>>>,
}

impl SecretCache {
    /// Wraps a backend without touching it. Call [`load`](Self::load) to
    /// restore a previously persisted bundle.
    pub fn new(key: CryptoKey, backend: impl CacheBackend + 'static) -> Self {
        Self {
            key,
            state: RwLock::new(CacheState::default()),
            backend: Mutex::new(Some(Box::new(backend))),
        }
    }

    /// Opens a SQLite-backed cache at `path` and loads it.
    pub fn open(path: &Path, key: CryptoKey) -> CacheResult<Self> {
        let cache = Self::new(key, SqliteBackend::open(path)?);
        cache.load()?;
        Ok(cache)
    }

    /// Restores the persisted bundle into memory.
    ///
    /// A missing entry, a corrupt entry and an entry sealed with another key
    /// all leave the cache empty and return `Ok`. The last case also raises
    /// the wrong-key flag. Only backend failures are errors.
    ///
    /// Only a failed tag check counts as a wrong key. An entry shorter than a
    /// nonce cannot have been written by any key, so it is treated as corrupt
    /// and the flag stays clear, even though both are decrypt failures.
    pub fn load(&self) -> CacheResult<()> {
        let mut state = self.write_state();
        let mut backend = self.lock_backend();
        let backend = backend.as_mut().ok_or(CacheError::Closed)?;

        state.bundle = None;
        let Some(entry) = backend.read()? else {
            debug!("no cached secrets on disk");
            return Ok(());
        };

        match decrypt(&self.key, &entry) {
            Ok(plaintext) => match serde_json::from_slice::<SecretBundle>(&plaintext) {
                Ok(bundle) => {
                    info!("restored {} cached secrets", bundle.len());
                    state.bundle = Some(Arc::new(bundle));
                }
                Err(e) => warn!("cached secrets are malformed, ignoring: {e}"),
            },
            Err(CryptoError::AuthenticationFailed) => {
                warn!("cached secrets cannot be opened with the current key");
                state.wrong_key = true;
            }
            Err(e) => warn!("cache entry is corrupt, ignoring: {e}"),
        }
        Ok(())
    }

    /// Returns the in-memory bundle without touching persistence.
    pub fn get(&self) -> Option<Arc<SecretBundle>> {
        self.read_state().bundle.clone()
    }

    /// Replaces the bundle and persists it under a fresh nonce.
    ///
    /// The in-memory value is updated before persisting. On error it stays
    /// updated, but may not survive a restart.
    pub fn set(&self, bundle: impl Into<Arc<SecretBundle>>) -> CacheResult<()> {
        let mut state = self.write_state();
        let bundle = bundle.into();
        state.bundle = Some(Arc::clone(&bundle));

        let json = serde_json::to_vec(bundle.as_ref())?;
        let entry = encrypt(&self.key, &json)?;

        let mut backend = self.lock_backend();
        backend
            .as_mut()
            .ok_or(CacheError::Closed)?
            .replace(&entry)
            .inspect_err(|e| warn!("failed to persist cached secrets: {e}"))
    }

    /// Drops the bundle from memory and from persistence. Idempotent.
    pub fn reset(&self) -> CacheResult<()> {
        let mut state = self.write_state();
        state.bundle = None;

        let mut backend = self.lock_backend();
        backend
            .as_mut()
            .ok_or(CacheError::Closed)?
            .clear()
            .inspect_err(|e| warn!("failed to clear persisted cache: {e}"))?;
        debug!("cache reset");
        Ok(())
    }

    /// Whether the last `load` found data sealed with a different key.
    ///
    /// Sticky for the lifetime of this instance.
    pub fn is_wrong_key(&self) -> bool {
        self.read_state().wrong_key
    }

    /// Releases the backend. Safe to call more than once.
    pub fn close(&self) -> CacheResult<()> {
        let _state = self.write_state();
        match self.lock_backend().take() {
            Some(mut backend) => backend.close(),
            None => Ok(()),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.lock_backend().is_none()
    }

    fn read_state(&self) -> RwLockReadGuard<'_, CacheState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, CacheState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_backend(&self) -> MutexGuard<'_, Option<Box<dyn CacheBackend>>> {
        self.backend.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for SecretCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.read_state();
        f.debug_struct("SecretCache")
            .field("loaded", &state.bundle.is_some())
            .field("wrong_key", &state.wrong_key)
            .finish_non_exhaustive()
    }
}
