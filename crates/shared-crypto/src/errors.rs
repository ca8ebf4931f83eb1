//! Crypto error types.

use thiserror::Error;

/// Cryptographic operation errors.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Encryption failed
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    /// Decryption failed
    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),

    /// Invalid key length
    #[error("Invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength {
        /// Expected key length in bytes
        expected: usize,
        /// Actual key length in bytes
        actual: usize,
    },

    /// Sealed envelope too short to hold a nonce
    #[error("Envelope truncated: need at least {minimum} bytes, got {actual}")]
    TruncatedEnvelope {
        /// Minimum envelope length in bytes
        minimum: usize,
        /// Actual envelope length in bytes
        actual: usize,
    },

    /// Key material could not be decoded
    #[error("Invalid key encoding: {0}")]
    InvalidKeyEncoding(String),

    /// Passphrase was empty
    #[error("Empty passphrase")]
    EmptyPassphrase,
}
