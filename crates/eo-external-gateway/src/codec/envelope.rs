//! Envelope codec.
//!
//! The codec knows nothing about commands. It opens an envelope into a JSON
//! object and seals a JSON object into an envelope. The cipher slot is filled
//! exactly once; until then every call reports `KeyNotReady`.

use serde::Serialize;
use serde_json::{Map, Value};
use shared_crypto::{CryptoError, SecretKey};
use std::sync::{Arc, OnceLock};

/// Decrypted command or response body.
pub type CommandMap = Map<String, Value>;

/// Symmetric cipher behind the codec.
pub trait EnvelopeCipher: Send + Sync {
    fn open(&self, envelope: &[u8]) -> Result<Vec<u8>, CryptoError>;
    fn seal(&self, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError>;
}

/// XChaCha20-Poly1305 with a random nonce prefixed to every envelope.
pub struct XChaChaCipher {
    key: SecretKey,
}

impl XChaChaCipher {
    pub fn new(key: SecretKey) -> Self {
        Self { key }
    }
}

impl EnvelopeCipher for XChaChaCipher {
    fn open(&self, envelope: &[u8]) -> Result<Vec<u8>, CryptoError> {
        shared_crypto::open(&self.key, envelope)
    }

    fn seal(&self, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        shared_crypto::seal(&self.key, plaintext)
    }
}

/// Codec errors
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("envelope key is not ready")]
    KeyNotReady,
    #[error("envelope key is already set")]
    KeyAlreadySet,
    #[error(transparent)]
    Crypto(#[from] CryptoError),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("JSON body is not an object")]
    NotAnObject,
}

/// Set-once cipher slot plus JSON framing.
#[derive(Default)]
pub struct EnvelopeCodec {
    cipher: OnceLock<Arc<dyn EnvelopeCipher>>,
}

impl EnvelopeCodec {
    /// Codec without a key; `is_ready` is false until `install` succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cipher(cipher: Arc<dyn EnvelopeCipher>) -> Self {
        let codec = Self::new();
        // A fresh OnceLock cannot already be set.
        let _ = codec.cipher.set(cipher);
        codec
    }

    /// Install the cipher. Only the first call succeeds.
    pub fn install(&self, cipher: Arc<dyn EnvelopeCipher>) -> Result<(), CodecError> {
        self.cipher.set(cipher).map_err(|_| CodecError::KeyAlreadySet)
    }

    /// Install an XChaCha20-Poly1305 cipher for `key`.
    pub fn install_key(&self, key: SecretKey) -> Result<(), CodecError> {
        self.install(Arc::new(XChaChaCipher::new(key)))
    }

    pub fn is_ready(&self) -> bool {
        self.cipher.get().is_some()
    }

    /// Open an envelope into a JSON object.
    pub fn decrypt(&self, envelope: &[u8]) -> Result<CommandMap, CodecError> {
        let cipher = self.cipher.get().ok_or(CodecError::KeyNotReady)?;
        let plaintext = cipher.open(envelope)?;

        match serde_json::from_slice::<Value>(&plaintext)? {
            Value::Object(map) => Ok(map),
            _ => Err(CodecError::NotAnObject),
        }
    }

    /// Seal a JSON object into an envelope.
    pub fn encrypt(&self, body: &CommandMap) -> Result<Vec<u8>, CodecError> {
        let cipher = self.cipher.get().ok_or(CodecError::KeyNotReady)?;
        let plaintext = serde_json::to_vec(body)?;
        Ok(cipher.seal(&plaintext)?)
    }

    /// Serialize `body` to a JSON object and seal it.
    pub fn encrypt_value<T: Serialize>(&self, body: &T) -> Result<Vec<u8>, CodecError> {
        match serde_json::to_value(body)? {
            Value::Object(map) => self.encrypt(&map),
            _ => Err(CodecError::NotAnObject),
        }
    }
}
