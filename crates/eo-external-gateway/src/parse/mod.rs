//! Validating decode from decrypted JSON objects to typed commands.
//!
//! Each parser returns either the complete command or a rejection. A
//! rejection carries whatever identity had been established when parsing
//! stopped, which the handler echoes back to the caller.

mod fields;
pub mod securemgr;
pub mod service;

pub use fields::FieldError;
pub use securemgr::{parse_secure_command, SecureRejection};
pub use service::{parse_service_request, ServiceRejection};
