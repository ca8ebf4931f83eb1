//! # Shared Crypto - Envelope Encryption
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `symmetric` | XChaCha20-Poly1305 | Command envelope sealing |
//!
//! ## Envelope Layout
//!
//! ```text
//! ┌──────────────┬───────────────────────────────────┐
//! │ nonce (24 B) │ ciphertext ‖ Poly1305 tag (16 B)  │
//! └──────────────┴───────────────────────────────────┘
//! ```
//!
//! The nonce is random per envelope, which XChaCha20's 192-bit nonce makes
//! safe without a counter.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod errors;
pub mod symmetric;

// Re-exports
pub use errors::CryptoError;
pub use symmetric::{decrypt, encrypt, open, seal, Nonce, SecretKey, NONCE_LEN};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    #[test]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
    }
}
