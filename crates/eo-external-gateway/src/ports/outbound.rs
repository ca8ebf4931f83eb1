//! Outbound ports for the External Gateway.

use async_trait::async_trait;
use shared_types::{SecureCommand, SecureResponse, ServiceRequest, ServiceResponse};
use std::net::IpAddr;

/// Service placement capability.
#[async_trait]
pub trait OrchestrationApi: Send + Sync {
    /// Place a validated service request and report where it went.
    async fn request_service(&self, request: ServiceRequest) -> ServiceResponse;
}

/// Secure manager capability.
#[async_trait]
pub trait SecureMgrApi: Send + Sync {
    /// Apply a validated secure-manager command.
    async fn request_secure_mgr(&self, command: SecureCommand) -> SecureResponse;
}

/// Source of this node's own interface addresses.
///
/// Queried on every request; implementations must not cache across calls
/// if interfaces can change underneath them.
pub trait NetworkInfo: Send + Sync {
    fn own_addresses(&self) -> Result<Vec<IpAddr>, NetworkError>;
}

/// Maps a local TCP port to the name of the process bound to it.
pub trait SenderResolver: Send + Sync {
    fn name_by_port(&self, port: u16) -> Result<String, ResolveError>;
}

/// Network information errors
#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    #[error("interface enumeration failed: {0}")]
    Enumeration(String),
}

/// Requester resolution errors
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("no process owns port {0}")]
    NotFound(u16),
    #[error("process table unreadable: {0}")]
    Io(#[from] std::io::Error),
}
