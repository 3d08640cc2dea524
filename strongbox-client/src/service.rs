//! The remote secret service contract.

use crate::error::ClientResult;
use async_trait::async_trait;
use strongbox_types::{Credentials, SecretBundle, SecretRecord, SecretRef};

/// Operations the secret server offers.
///
/// Every call may fail with a network error or a server-reported error.
/// Authenticated calls take the session token explicitly; implementations
/// hold no session state.
#[async_trait]
pub trait SecretService: Send + Sync {
    /// Creates an account. Does not log in.
    async fn register(&self, credentials: &Credentials) -> ClientResult<()>;

    /// Authenticates and returns a session token.
    async fn login(&self, credentials: &Credentials) -> ClientResult<String>;

    /// Fetches every secret the user owns.
    async fn get_all_secrets(&self, token: &str) -> ClientResult<SecretBundle>;

    /// Creates one secret of any kind.
    async fn post_secret(&self, token: &str, record: &SecretRecord) -> ClientResult<()>;

    /// Deletes one secret by kind and natural key.
    async fn delete_secret(&self, token: &str, secret: &SecretRef) -> ClientResult<()>;
}
