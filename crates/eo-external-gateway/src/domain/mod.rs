//! Domain types for the External Gateway.
//!
//! Configuration, the error taxonomy, and caller origin classification.

pub mod config;
pub mod error;
pub mod origin;

// Re-exports for convenience
pub use config::{CipherConfig, ConfigError, GatewayConfig, LimitsConfig, LoggingConfig};
pub use error::{Capability, GatewayError, RequestFault};
pub use origin::{Origin, OriginAuthorizer};
