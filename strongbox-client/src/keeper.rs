//! Secret orchestrator: reconciles the local cache with the server.
//!
//! Reads follow the configured [`ReadPolicy`]. Writes always go to the server
//! first; on success the whole cache is invalidated so the next read fetches a
//! fresh bundle. Nothing here retries, times out or runs in the background.

use crate::config::{ClientConfig, ReadPolicy};
use crate::error::{ClientError, ClientResult};
use crate::service::SecretService;
use std::sync::Arc;
use strongbox_cache::SecretCache;
use strongbox_types::{
    BinarySecret, CardSecret, Credentials, LoginPassword, SecretBundle, SecretKind, SecretRecord,
    SecretRef, TextSecret,
};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Entry point for the UI layer.
///
/// Owns the session token. The cache is shared by `Arc` and never locked
/// across a server call.
pub struct SecretKeeper {
    service: Arc<dyn SecretService>,
    cache: Arc<SecretCache>,
    token: RwLock<Option<String>>,
    policy: ReadPolicy,
}

impl SecretKeeper {
    pub fn new(service: Arc<dyn SecretService>, cache: Arc<SecretCache>) -> Self {
        Self {
            service,
            cache,
            token: RwLock::new(None),
            policy: ReadPolicy::default(),
        }
    }

    /// Applies the orchestration settings from `config`.
    pub fn with_config(self, config: &ClientConfig) -> Self {
        self.with_read_policy(config.read_policy)
    }

    pub fn with_read_policy(mut self, policy: ReadPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn read_policy(&self) -> ReadPolicy {
        self.policy
    }

    pub fn cache(&self) -> &Arc<SecretCache> {
        &self.cache
    }

    // ── Session ──

    /// Replaces the session token.
    pub async fn set_token(&self, token: impl Into<String>) {
        *self.token.write().await = Some(token.into());
    }

    pub async fn token(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    /// Logs in and makes the returned token the current session.
    pub async fn login(&self, login: &str, password: &str) -> ClientResult<String> {
        let token = self.service.login(&Credentials::new(login, password)).await?;
        self.set_token(token.clone()).await;
        info!("session established");
        Ok(token)
    }

    /// Registers a new account, then logs in with the same credentials.
    pub async fn register(&self, login: &str, password: &str) -> ClientResult<String> {
        self.service
            .register(&Credentials::new(login, password))
            .await?;
        self.login(login, password).await
    }

    async fn require_token(&self) -> ClientResult<String> {
        self.token().await.ok_or(ClientError::AuthRequired)
    }

    // ── Reads ──

    /// Returns every secret, from the cache or the server per the read policy.
    pub async fn get_all_secrets(&self) -> ClientResult<Arc<SecretBundle>> {
        match self.policy {
            ReadPolicy::CacheFirst => {
                if let Some(cached) = self.cache.get() {
                    debug!("serving secrets from cache");
                    return Ok(cached);
                }
                debug!("cache miss, fetching secrets from server");
                self.fetch_and_cache().await
            }
            ReadPolicy::ServerFirst => match self.fetch_and_cache().await {
                Ok(bundle) => Ok(bundle),
                Err(err) => match self.cache.get() {
                    Some(cached) => {
                        warn!("server unavailable ({err}), serving cached secrets");
                        Ok(cached)
                    }
                    None => Err(err),
                },
            },
        }
    }

    async fn fetch_and_cache(&self) -> ClientResult<Arc<SecretBundle>> {
        let token = self.require_token().await?;
        let bundle = Arc::new(self.service.get_all_secrets(&token).await?);

        if let Err(e) = self.cache.set(Arc::clone(&bundle)) {
            warn!("fetched secrets cached in memory only: {e}");
        }
        Ok(bundle)
    }

    // ── Writes ──

    /// Creates a secret of any kind and invalidates the cache.
    pub async fn add_secret(&self, record: impl Into<SecretRecord>) -> ClientResult<()> {
        let record = record.into();
        let token = self.require_token().await?;
        self.service.post_secret(&token, &record).await?;
        debug!("created {}", record.kind());
        self.invalidate();
        Ok(())
    }

    /// Deletes a secret by kind and natural key and invalidates the cache.
    pub async fn delete_secret(&self, secret: SecretRef) -> ClientResult<()> {
        let token = self.require_token().await?;
        self.service.delete_secret(&token, &secret).await?;
        debug!("deleted {}", secret.kind);
        self.invalidate();
        Ok(())
    }

    pub async fn add_login_password(&self, record: LoginPassword) -> ClientResult<()> {
        self.add_secret(record).await
    }

    pub async fn add_text_secret(&self, record: TextSecret) -> ClientResult<()> {
        self.add_secret(record).await
    }

    pub async fn add_binary_secret(&self, record: BinarySecret) -> ClientResult<()> {
        self.add_secret(record).await
    }

    pub async fn add_card_secret(&self, record: CardSecret) -> ClientResult<()> {
        self.add_secret(record).await
    }

    pub async fn delete_login_password(&self, login: &str) -> ClientResult<()> {
        self.delete_secret(SecretRef::new(SecretKind::LoginPassword, login))
            .await
    }

    pub async fn delete_text_secret(&self, title: &str) -> ClientResult<()> {
        self.delete_secret(SecretRef::new(SecretKind::Text, title))
            .await
    }

    pub async fn delete_binary_secret(&self, filename: &str) -> ClientResult<()> {
        self.delete_secret(SecretRef::new(SecretKind::Binary, filename))
            .await
    }

    pub async fn delete_card_secret(&self, cardholder: &str) -> ClientResult<()> {
        self.delete_secret(SecretRef::new(SecretKind::Card, cardholder))
            .await
    }

    /// The server already accepted the write, so a failure to clear the
    /// persisted entry is logged rather than returned. Memory is cleared
    /// either way.
    fn invalidate(&self) {
        if let Err(e) = self.cache.reset() {
            warn!("cache invalidated in memory only: {e}");
        }
    }

    // ── Cache control ──

    /// Drops the cached bundle so the next read goes to the server.
    pub fn reset_cache(&self) -> ClientResult<()> {
        Ok(self.cache.reset()?)
    }

    /// Whether the cache on disk was written with a different passphrase.
    pub fn is_wrong_key(&self) -> bool {
        self.cache.is_wrong_key()
    }
}
