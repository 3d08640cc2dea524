//! Encryption layer for Strongbox.
//!
//! Provides symmetric encryption using:
//! - SHA-256 for deterministic key derivation from a passphrase
//! - AES-256-GCM for authenticated encryption
//! - Key zeroization on drop
//!
//! # Wire format
//!
//! Every ciphertext is `nonce (12 bytes) || sealed`, where `sealed` is the
//! AES-256-GCM output including its 16-byte tag. The same key and format
//! protect both the local cache file and HTTP bodies exchanged with the
//! server, so each call draws a fresh random nonce.
//!
//! The `*_string` variants wrap the binary form in standard base64 so it can
//! travel inside JSON string fields.

mod cipher;
mod error;
mod key;

pub use cipher::{NONCE_SIZE, TAG_SIZE, decrypt, decrypt_string, encrypt, encrypt_string};
pub use error::{CryptoError, CryptoResult};
pub use key::{CryptoKey, KEY_SIZE, derive_key, generate_random_key};
