//! Envelope codec: encrypted bytes to and from loosely typed JSON objects.

pub mod envelope;

pub use envelope::{CodecError, CommandMap, EnvelopeCipher, EnvelopeCodec, XChaChaCipher};
