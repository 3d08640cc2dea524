//! AES-256-GCM sealing with a random nonce prefix.

use crate::error::{CryptoError, CryptoResult};
use crate::key::CryptoKey;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use rand::TryRngCore;
use rand::rngs::OsRng;

/// Size of the nonce prefix in bytes.
pub const NONCE_SIZE: usize = 12;

/// Size of the GCM authentication tag in bytes.
pub const TAG_SIZE: usize = 16;

fn cipher_for(key: &CryptoKey) -> Aes256Gcm {
    Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()))
}

/// Encrypts `plaintext`, returning `nonce || ciphertext || tag`.
pub fn encrypt(key: &CryptoKey, plaintext: &[u8]) -> CryptoResult<Vec<u8>> {
    let mut nonce = [0u8; NONCE_SIZE];
    OsRng
        .try_fill_bytes(&mut nonce)
        .map_err(|e| CryptoError::RandomSource(e.to_string()))?;

    let sealed = cipher_for(key)
        .encrypt(Nonce::from_slice(&nonce), plaintext)
        .map_err(|e| CryptoError::Encryption(e.to_string()))?;

    let mut out = Vec::with_capacity(NONCE_SIZE + sealed.len());
    out.extend_from_slice(&nonce);
    out.extend_from_slice(&sealed);
    Ok(out)
}

/// Reverses [`encrypt`].
///
/// Inputs shorter than the nonce are rejected before any tag check.
pub fn decrypt(key: &CryptoKey, ciphertext: &[u8]) -> CryptoResult<Vec<u8>> {
    if ciphertext.len() < NONCE_SIZE {
        return Err(CryptoError::CiphertextTooShort {
            minimum: NONCE_SIZE,
            actual: ciphertext.len(),
        });
    }

    let (nonce, sealed) = ciphertext.split_at(NONCE_SIZE);
    cipher_for(key)
        .decrypt(Nonce::from_slice(nonce), sealed)
        .map_err(|_| CryptoError::AuthenticationFailed)
}

/// Encrypts a UTF-8 string and returns the result as base64 text.
pub fn encrypt_string(key: &CryptoKey, plaintext: &str) -> CryptoResult<String> {
    let encrypted = encrypt(key, plaintext.as_bytes())?;
    Ok(STANDARD.encode(encrypted))
}

/// Inverse of [`encrypt_string`]: base64-decode, then decrypt.
pub fn decrypt_string(key: &CryptoKey, ciphertext: &str) -> CryptoResult<String> {
    let data = STANDARD
        .decode(ciphertext)
        .map_err(|e| CryptoError::InvalidEncoding(format!("base64: {e}")))?;
    let plaintext = decrypt(key, &data)?;
    String::from_utf8(plaintext).map_err(|e| CryptoError::InvalidEncoding(format!("utf-8: {e}")))
}
