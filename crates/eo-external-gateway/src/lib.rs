//! External Gateway - encrypted command intake for an edge-orchestration node.
//!
//! Local service applications ask the orchestrator to place services, and the
//! secure-configuration application edits the secure manager's container
//! hash list. Both talk to this gateway with encrypted JSON envelopes.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        EXTERNAL GATEWAY                                  │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │   POST /api/v1/orchestration/services   POST /api/v1/orchestration/securemgr
//! │                 │                                  │                     │
//! │  ┌──────────────┴──────────────────────────────────┴──────────────┐     │
//! │  │       Tracing → Timeout (tower layers)                          │     │
//! │  └──────────────────────────────┬──────────────────────────────────┘     │
//! │                                 │                                        │
//! │  ┌──────────────────────────────┴──────────────────────────────────┐    │
//! │  │ ExternalHandler                                                  │    │
//! │  │  capability? → key? → origin → decrypt → parse → dispatch → seal │    │
//! │  └───────┬───────────────────────┬──────────────────────┬──────────┘    │
//! └──────────┼───────────────────────┼──────────────────────┼───────────────┘
//!            ▼                       ▼                      ▼
//!     NetworkInfo /            OrchestrationApi        SecureMgrApi
//!     SenderResolver
//! ```
//!
//! # Status Codes
//!
//! - `503` capability or key not set, address lookup failed, envelope could
//!   not be opened or sealed
//! - `406` caller is neither loopback nor one of this node's addresses
//! - `200` encrypted response, including `INVALID_PARAMETER` rejections
//!
//! # Usage
//!
//! ```ignore
//! use eo_external_gateway::{ExternalGatewayService, ExternalHandler, GatewayConfig};
//!
//! let handler = ExternalHandler::builder(network, resolver)
//!     .orchestration(orchestrator)
//!     .securemgr(secure_manager)
//!     .key(key)
//!     .build_complete()?;
//! let service = ExternalGatewayService::new(GatewayConfig::from_env()?, Arc::new(handler))?;
//! let running = service.start().await?;
//! ```

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod adapters;
pub mod codec;
pub mod domain;
pub mod handler;
pub mod middleware;
pub mod parse;
pub mod ports;
pub mod router;
pub mod service;
pub mod telemetry;

// Re-exports for public API
pub use codec::{CodecError, CommandMap, EnvelopeCipher, EnvelopeCodec, XChaChaCipher};
pub use domain::config::GatewayConfig;
pub use domain::error::{Capability, GatewayError, RequestFault};
pub use domain::origin::{Origin, OriginAuthorizer};
pub use handler::{ExternalHandler, ExternalHandlerBuilder};
pub use ports::{NetworkError, NetworkInfo, OrchestrationApi, ResolveError, SecureMgrApi, SenderResolver};
pub use router::{build_router, routes, Route};
pub use service::{ExternalGatewayService, RunningGateway};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
