//! Client error types.

use thiserror::Error;

/// Result type for client and orchestrator operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors surfaced by the server client and the orchestrator.
///
/// Network failures (`Http`) and server-reported failures (`Server`) are kept
/// apart for display, but the orchestrator treats them the same way.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned {status}: {message}")]
    Server { status: u16, message: String },

    #[error("authentication required")]
    AuthRequired,

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("crypto error: {0}")]
    Crypto(#[from] strongbox_crypto::CryptoError),

    #[error("cache error: {0}")]
    Cache(#[from] strongbox_cache::CacheError),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ClientError {
    /// HTTP status reported by the server, if this is a server error.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Server { status, .. } => Some(*status),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether the server rejected the session token or credentials.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::AuthRequired) || self.status() == Some(401)
    }
}
