//! # Shared Types Crate
//!
//! Typed commands and results that cross the boundary between the external
//! gateway and the capabilities it dispatches to.
//!
//! ## Design Principles
//!
//! - **Commands are fully validated**: a `ServiceRequest` or `SecureCommand`
//!   only exists once every required field parsed. Partially populated
//!   commands are never constructed.
//! - **Wire names are PascalCase**: serde renames keep the JSON shape that
//!   service applications already speak.

pub mod messages;
pub mod securemgr;
pub mod service;

pub use messages::{ERROR_NONE, INVALID_PARAMETER};
pub use securemgr::{ContainerDescriptor, SecureCommand, SecureResponse};
pub use service::{ExecutionDescriptor, ServiceRequest, ServiceResponse, TargetInfo};
