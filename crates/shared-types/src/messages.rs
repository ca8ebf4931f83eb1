//! Result message constants carried in the `Message` field of responses.

/// The command was accepted and handled.
pub const ERROR_NONE: &str = "ERROR_NONE";

/// The decrypted payload failed structural validation.
pub const INVALID_PARAMETER: &str = "INVALID_PARAMETER";
