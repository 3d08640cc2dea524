//! Encrypted local cache for Strongbox.
//!
//! Holds one [`SecretBundle`](strongbox_types::SecretBundle) per installation
//! so reads can be served without the server. The bundle is kept decrypted in
//! memory and persisted as `nonce || AES-256-GCM(JSON)`.
//!
//! # Architecture
//!
//! - [`SecretCache`] owns the in-memory bundle and the wrong-key flag
//! - [`CacheBackend`] abstracts the single-slot persistence substrate
//! - [`SqliteBackend`] stores the slot as row `1` of a `cache` table
//! - [`FileBackend`] stores the slot as a whole file
//! - [`MemoryBackend`] keeps the slot in process memory (tests, ephemeral use)
//!
//! Invalidation is all-or-nothing: [`SecretCache::reset`] drops the bundle and
//! the persisted entry together.

mod backend;
mod cache;
mod error;
mod file;
mod sqlite;

pub use backend::{CacheBackend, MemoryBackend};
pub use cache::SecretCache;
pub use error::{CacheError, CacheResult};
pub use file::FileBackend;
pub use sqlite::SqliteBackend;
