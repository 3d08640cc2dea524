//! Server client and secret orchestrator for Strongbox.
//!
//! Provides:
//! - [`SecretService`], the contract for talking to the secret server
//! - [`SecretApiClient`], the HTTP implementation with encrypted bodies
//! - [`SecretKeeper`], which decides per operation whether to answer from the
//!   local [`SecretCache`](strongbox_cache::SecretCache) or go to the server,
//!   and invalidates the cache after every successful write

pub mod api_client;
pub mod config;
pub mod error;
pub mod keeper;
pub mod service;

pub use api_client::SecretApiClient;
pub use config::{ClientConfig, ReadPolicy};
pub use error::{ClientError, ClientResult};
pub use keeper::SecretKeeper;
pub use service::SecretService;
