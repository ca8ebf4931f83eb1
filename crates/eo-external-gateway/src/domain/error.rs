//! External Gateway error types.
//!
//! `RequestFault` covers every infrastructure outcome that ends a request
//! before an encrypted response exists. Faults leave with an empty body so an
//! unauthenticated caller learns nothing beyond the status code. Validation
//! failures are not faults: they travel inside the encrypted response.

use crate::codec::CodecError;
use crate::ports::NetworkError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

/// Capabilities the gateway dispatches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Orchestration,
    SecureMgr,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::Orchestration => f.write_str("orchestration"),
            Capability::SecureMgr => f.write_str("securemgr"),
        }
    }
}

/// Request-terminating infrastructure failure.
#[derive(Debug, thiserror::Error)]
pub enum RequestFault {
    /// Capability was never wired
    #[error("{0} capability is not set")]
    CapabilityUnset(Capability),

    /// Envelope key was never installed
    #[error("envelope key is not set")]
    KeyUnset,

    /// Own-address lookup failed
    #[error("address provider failed: {0}")]
    AddressProvider(#[from] NetworkError),

    /// Caller is neither loopback nor one of this node's addresses
    #[error("origin {0} is not allowed")]
    OriginForbidden(String),

    /// Request body could not be read
    #[error("request body unreadable: {0}")]
    BodyRead(String),

    /// Envelope could not be opened
    #[error("cannot decrypt request: {0}")]
    Decrypt(#[source] CodecError),

    /// Response could not be sealed
    #[error("cannot encrypt response: {0}")]
    Encrypt(#[source] CodecError),
}

impl RequestFault {
    /// HTTP status written for this fault.
    pub fn status(&self) -> StatusCode {
        match self {
            RequestFault::OriginForbidden(_) => StatusCode::NOT_ACCEPTABLE,
            RequestFault::CapabilityUnset(_)
            | RequestFault::KeyUnset
            | RequestFault::AddressProvider(_)
            | RequestFault::BodyRead(_)
            | RequestFault::Decrypt(_)
            | RequestFault::Encrypt(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for RequestFault {
    fn into_response(self) -> Response {
        self.status().into_response()
    }
}

/// Gateway-level errors (wiring and server lifecycle)
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Server socket bind error
    #[error("server bind error: {0}")]
    Bind(String),

    /// Server stopped with an error
    #[error("server error: {0}")]
    Serve(String),

    /// A set-once dependency was set twice
    #[error("{0} is already set")]
    AlreadySet(&'static str),

    /// A dependency is missing from a complete build
    #[error("{0} is not set")]
    Incomplete(&'static str),

    /// Log subscriber could not be built
    #[error("telemetry error: {0}")]
    Telemetry(String),
}

impl From<crate::domain::config::ConfigError> for GatewayError {
    fn from(e: crate::domain::config::ConfigError) -> Self {
        GatewayError::Config(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fault_statuses() {
        assert_eq!(
            RequestFault::CapabilityUnset(Capability::Orchestration).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(RequestFault::KeyUnset.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            RequestFault::AddressProvider(NetworkError::Enumeration("down".into())).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            RequestFault::OriginForbidden("10.1.1.1".into()).status(),
            StatusCode::NOT_ACCEPTABLE
        );
        assert_eq!(
            RequestFault::Decrypt(CodecError::NotAnObject).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            RequestFault::Encrypt(CodecError::KeyNotReady).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[tokio::test]
    async fn test_fault_response_has_empty_body() {
        let response = RequestFault::OriginForbidden("10.1.1.1".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_ACCEPTABLE);

        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert!(body.is_empty());
    }

    #[test]
    fn test_capability_display() {
        assert_eq!(
            RequestFault::CapabilityUnset(Capability::SecureMgr).to_string(),
            "securemgr capability is not set"
        );
    }
}
