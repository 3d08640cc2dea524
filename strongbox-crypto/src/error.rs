//! Crypto error types.

use thiserror::Error;

/// Result type for crypto operations.
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Errors that can occur in encryption and decryption.
///
/// `AuthenticationFailed` covers a wrong key, tampered data and truncated
/// data alike. The AEAD tag cannot tell them apart.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CryptoError {
    #[error("invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    #[error("secure random source unavailable: {0}")]
    RandomSource(String),

    #[error("encryption failed: {0}")]
    Encryption(String),

    #[error("ciphertext too short: {actual} bytes, need at least {minimum}")]
    CiphertextTooShort { minimum: usize, actual: usize },

    #[error("authentication failed (wrong key or tampered data)")]
    AuthenticationFailed,

    #[error("invalid encoding: {0}")]
    InvalidEncoding(String),
}
