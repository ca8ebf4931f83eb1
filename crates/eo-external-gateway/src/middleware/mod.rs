//! Middleware stack for the External Gateway.
//!
//! Layer order: Request → Tracing → Timeout → Handler
//!
//! Origin authorization is not a layer. It runs inside the handler, after
//! the capability and key checks.

pub mod tracing;

pub use self::tracing::{TracingLayer, TracingService, REQUEST_ID_HEADER};
