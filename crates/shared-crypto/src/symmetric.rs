//! # Symmetric Encryption
//!
//! XChaCha20-Poly1305 sealing for command envelopes.
//!
//! ## Security Properties
//!
//! - **XChaCha20-Poly1305**: 192-bit nonce, constant-time ARX design
//! - **Authenticated**: any tampering with nonce or ciphertext fails `open`

use crate::CryptoError;
use chacha20poly1305::{
    aead::{Aead, KeyInit},
    XChaCha20Poly1305, XNonce,
};
use sha2::{Digest, Sha256};
use std::fmt;
use zeroize::Zeroize;

/// Key length in bytes.
pub const KEY_LEN: usize = 32;

/// Nonce length in bytes (XChaCha20).
pub const NONCE_LEN: usize = 24;

/// Secret key (256-bit).
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct SecretKey([u8; KEY_LEN]);

impl SecretKey {
    /// Create from bytes.
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Create from a slice that must be exactly 32 bytes.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::InvalidKeyLength` on any other length.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        let array: [u8; KEY_LEN] = bytes.try_into().map_err(|_| CryptoError::InvalidKeyLength {
            expected: KEY_LEN,
            actual: bytes.len(),
        })?;
        Ok(Self(array))
    }

    /// Decode a 64-character hex string.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::InvalidKeyEncoding` for non-hex input and
    /// `CryptoError::InvalidKeyLength` when the decoded key is not 32 bytes.
    pub fn from_hex(encoded: &str) -> Result<Self, CryptoError> {
        let mut bytes = hex::decode(encoded.trim())
            .map_err(|e| CryptoError::InvalidKeyEncoding(e.to_string()))?;
        let key = Self::from_slice(&bytes);
        bytes.zeroize();
        key
    }

    /// Derive a key from a shared passphrase with SHA-256.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::EmptyPassphrase` for an empty passphrase.
    pub fn derive_from_passphrase(passphrase: &[u8]) -> Result<Self, CryptoError> {
        if passphrase.is_empty() {
            return Err(CryptoError::EmptyPassphrase);
        }
        let digest = Sha256::digest(passphrase);
        let mut bytes = [0u8; KEY_LEN];
        bytes.copy_from_slice(&digest);
        Ok(Self(bytes))
    }

    /// Generate random key.
    pub fn generate() -> Self {
        let mut bytes = [0u8; KEY_LEN];
        rand::RngCore::fill_bytes(&mut rand::thread_rng(), &mut bytes);
        Self(bytes)
    }

    /// Get inner bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(<redacted>)")
    }
}

/// Nonce for encryption.
#[derive(Clone)]
pub struct Nonce([u8; NONCE_LEN]);

impl Nonce {
    /// Create from bytes.
    pub fn from_bytes(bytes: [u8; NONCE_LEN]) -> Self {
        Self(bytes)
    }

    /// Generate random nonce (safe with XChaCha20's 192-bit nonce).
    pub fn generate() -> Self {
        let mut bytes = [0u8; NONCE_LEN];
        rand::RngCore::fill_bytes(&mut rand::thread_rng(), &mut bytes);
        Self(bytes)
    }

    /// Get inner bytes.
    pub fn as_bytes(&self) -> &[u8; NONCE_LEN] {
        &self.0
    }
}

/// Encrypt plaintext with XChaCha20-Poly1305.
///
/// Returns (ciphertext, nonce).
///
/// # Errors
///
/// Returns `CryptoError::EncryptionFailed` if encryption fails.
pub fn encrypt(key: &SecretKey, plaintext: &[u8]) -> Result<(Vec<u8>, Nonce), CryptoError> {
    let cipher = XChaCha20Poly1305::new(key.as_bytes().into());
    let nonce = Nonce::generate();

    let ciphertext = cipher
        .encrypt(XNonce::from_slice(nonce.as_bytes()), plaintext)
        .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;

    Ok((ciphertext, nonce))
}

/// Decrypt ciphertext with XChaCha20-Poly1305.
///
/// # Errors
///
/// Returns `CryptoError::DecryptionFailed` if decryption fails.
pub fn decrypt(key: &SecretKey, ciphertext: &[u8], nonce: &Nonce) -> Result<Vec<u8>, CryptoError> {
    let cipher = XChaCha20Poly1305::new(key.as_bytes().into());

    cipher
        .decrypt(XNonce::from_slice(nonce.as_bytes()), ciphertext)
        .map_err(|e| CryptoError::DecryptionFailed(e.to_string()))
}

/// Encrypt and frame as `nonce ‖ ciphertext`.
///
/// # Errors
///
/// Returns `CryptoError::EncryptionFailed` if encryption fails.
pub fn seal(key: &SecretKey, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let (ciphertext, nonce) = encrypt(key, plaintext)?;

    let mut envelope = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    envelope.extend_from_slice(nonce.as_bytes());
    envelope.extend_from_slice(&ciphertext);
    Ok(envelope)
}

/// Split a `nonce ‖ ciphertext` envelope and decrypt it.
///
/// # Errors
///
/// Returns `CryptoError::TruncatedEnvelope` when the input cannot hold a nonce
/// and `CryptoError::DecryptionFailed` on authentication failure.
pub fn open(key: &SecretKey, envelope: &[u8]) -> Result<Vec<u8>, CryptoError> {
    if envelope.len() < NONCE_LEN {
        return Err(CryptoError::TruncatedEnvelope {
            minimum: NONCE_LEN,
            actual: envelope.len(),
        });
    }

    let (nonce_bytes, ciphertext) = envelope.split_at(NONCE_LEN);
    let mut nonce = [0u8; NONCE_LEN];
    nonce.copy_from_slice(nonce_bytes);

    decrypt(key, ciphertext, &Nonce::from_bytes(nonce))
}
