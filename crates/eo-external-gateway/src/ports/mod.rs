//! Ports for the External Gateway.
//!
//! Everything the gateway consumes but does not implement.

pub mod outbound;

pub use outbound::{
    NetworkError, NetworkInfo, OrchestrationApi, ResolveError, SecureMgrApi, SenderResolver,
};
