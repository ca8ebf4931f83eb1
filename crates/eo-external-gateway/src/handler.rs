//! External command handlers.
//!
//! Both routes run the same checkpoints in the same order:
//!
//! 1. capability wired
//! 2. envelope key installed
//! 3. origin authorized
//! 4. body read
//! 5. envelope opened
//! 6. command parsed, then dispatched or rejected
//! 7. response sealed
//!
//! Checkpoints 1-5 and 7 end the request with an empty-body [`RequestFault`].
//! A parse rejection is an application outcome and is sealed like any other
//! response.

use crate::codec::{CommandMap, EnvelopeCipher, EnvelopeCodec, XChaChaCipher};
use crate::domain::error::{Capability, GatewayError, RequestFault};
use crate::domain::origin::{Origin, OriginAuthorizer};
use crate::parse::{parse_secure_command, parse_service_request};
use crate::ports::{NetworkInfo, OrchestrationApi, SecureMgrApi, SenderResolver};
use axum::body::Body;
use serde::Serialize;
use shared_crypto::SecretKey;
use shared_types::{SecureResponse, ServiceResponse};
use std::sync::{Arc, OnceLock};
use tracing::{debug, info, warn};

/// Gateway request pipeline.
///
/// Capabilities and the envelope key live in set-once cells. They may be
/// filled at build time or later; until then requests are answered with 503.
pub struct ExternalHandler {
    orchestration: OnceLock<Arc<dyn OrchestrationApi>>,
    securemgr: OnceLock<Arc<dyn SecureMgrApi>>,
    codec: EnvelopeCodec,
    authorizer: OriginAuthorizer,
    resolver: Arc<dyn SenderResolver>,
}

impl ExternalHandler {
    /// Start building a handler around the two host-facing ports.
    pub fn builder(
        network: Arc<dyn NetworkInfo>,
        resolver: Arc<dyn SenderResolver>,
    ) -> ExternalHandlerBuilder {
        ExternalHandlerBuilder {
            network,
            resolver,
            orchestration: None,
            securemgr: None,
            cipher: None,
        }
    }

    /// Wire the orchestrator. Only the first call succeeds.
    pub fn set_orchestration_api(
        &self,
        api: Arc<dyn OrchestrationApi>,
    ) -> Result<(), GatewayError> {
        self.orchestration
            .set(api)
            .map_err(|_| GatewayError::AlreadySet("orchestration capability"))
    }

    /// Wire the secure manager. Only the first call succeeds.
    pub fn set_securemgr_api(&self, api: Arc<dyn SecureMgrApi>) -> Result<(), GatewayError> {
        self.securemgr
            .set(api)
            .map_err(|_| GatewayError::AlreadySet("securemgr capability"))
    }

    /// Install the envelope key. Only the first call succeeds.
    pub fn install_key(&self, key: SecretKey) -> Result<(), GatewayError> {
        self.codec
            .install_key(key)
            .map_err(|_| GatewayError::AlreadySet("envelope key"))
    }

    pub fn is_ready(&self) -> bool {
        self.orchestration.get().is_some() && self.securemgr.get().is_some() && self.codec.is_ready()
    }

    /// Handle an encrypted service placement request.
    ///
    /// A body longer than `body_limit` bytes fails at the body-read checkpoint.
    pub async fn request_service(
        &self,
        origin: Origin,
        body: Body,
        body_limit: usize,
    ) -> Result<Vec<u8>, RequestFault> {
        let orchestration = self
            .orchestration
            .get()
            .ok_or(RequestFault::CapabilityUnset(Capability::Orchestration))?;

        let command = self.open(&origin, body, body_limit).await?;
        let resolved = self.resolve_requester(&origin).await;

        let response = match parse_service_request(&command, resolved) {
            Ok(request) => {
                info!(
                    service = %request.service_name,
                    requester = %request.service_requester,
                    candidates = request.service_info.len(),
                    "Dispatching service request"
                );
                orchestration.request_service(request).await
            }
            Err(rejection) => {
                debug!(
                    service = %rejection.service_name,
                    cause = %rejection.cause,
                    "Rejected service request"
                );
                ServiceResponse::invalid_parameter(rejection.service_name)
            }
        };

        self.seal(&response)
    }

    /// Handle an encrypted secure-manager command.
    pub async fn request_secure_mgr(
        &self,
        origin: Origin,
        body: Body,
        body_limit: usize,
    ) -> Result<Vec<u8>, RequestFault> {
        let securemgr = self
            .securemgr
            .get()
            .ok_or(RequestFault::CapabilityUnset(Capability::SecureMgr))?;

        let command = self.open(&origin, body, body_limit).await?;

        let response = match parse_secure_command(&command) {
            Ok(command) => {
                info!(
                    secure_mgr = %command.secure_ins_name,
                    cmd_type = %command.cmd_type,
                    entries = command.desc.len(),
                    "Dispatching securemgr command"
                );
                securemgr.request_secure_mgr(command).await
            }
            Err(rejection) => {
                debug!(cause = %rejection.cause, "Rejected securemgr command");
                SecureResponse::invalid_parameter()
            }
        };

        self.seal(&response)
    }

    /// Key check, origin check, body read and decrypt.
    async fn open(
        &self,
        origin: &Origin,
        body: Body,
        body_limit: usize,
    ) -> Result<CommandMap, RequestFault> {
        if !self.codec.is_ready() {
            warn!("Envelope key not installed");
            return Err(RequestFault::KeyUnset);
        }

        self.authorizer.authorize(origin).inspect_err(|fault| {
            warn!(origin = %origin, error = %fault, "Origin check failed");
        })?;

        let envelope = axum::body::to_bytes(body, body_limit)
            .await
            .map_err(|e| {
                warn!(error = %e, "Cannot read request body");
                RequestFault::BodyRead(e.to_string())
            })?;

        self.codec.decrypt(&envelope).map_err(|e| {
            warn!(origin = %origin, error = %e, size = envelope.len(), "Cannot open envelope");
            RequestFault::Decrypt(e)
        })
    }

    fn seal<T: Serialize>(&self, response: &T) -> Result<Vec<u8>, RequestFault> {
        self.codec.encrypt_value(response).map_err(|e| {
            warn!(error = %e, "Cannot seal response");
            RequestFault::Encrypt(e)
        })
    }

    /// Name of the process owning the caller's source port, if any.
    async fn resolve_requester(&self, origin: &Origin) -> Option<String> {
        let port = origin.port()?;
        let resolver = Arc::clone(&self.resolver);

        match tokio::task::spawn_blocking(move || resolver.name_by_port(port)).await {
            Ok(Ok(name)) => {
                debug!(port, requester = %name, "Resolved requester from source port");
                Some(name)
            }
            Ok(Err(e)) => {
                debug!(port, error = %e, "Requester not resolved, using declared field");
                None
            }
            Err(e) => {
                warn!(port, error = %e, "Requester lookup task failed");
                None
            }
        }
    }
}

/// Builder for [`ExternalHandler`].
pub struct ExternalHandlerBuilder {
    network: Arc<dyn NetworkInfo>,
    resolver: Arc<dyn SenderResolver>,
    orchestration: Option<Arc<dyn OrchestrationApi>>,
    securemgr: Option<Arc<dyn SecureMgrApi>>,
    cipher: Option<Arc<dyn EnvelopeCipher>>,
}

impl ExternalHandlerBuilder {
    pub fn orchestration(mut self, api: Arc<dyn OrchestrationApi>) -> Self {
        self.orchestration = Some(api);
        self
    }

    pub fn securemgr(mut self, api: Arc<dyn SecureMgrApi>) -> Self {
        self.securemgr = Some(api);
        self
    }

    /// Use XChaCha20-Poly1305 envelopes under `key`.
    pub fn key(self, key: SecretKey) -> Self {
        self.cipher(Arc::new(XChaChaCipher::new(key)))
    }

    pub fn cipher(mut self, cipher: Arc<dyn EnvelopeCipher>) -> Self {
        self.cipher = Some(cipher);
        self
    }

    /// Build with whatever is wired so far. Missing pieces can be set later
    /// through the handler's setters.
    pub fn build(self) -> ExternalHandler {
        let codec = match self.cipher {
            Some(cipher) => EnvelopeCodec::with_cipher(cipher),
            None => EnvelopeCodec::new(),
        };

        ExternalHandler {
            orchestration: filled(self.orchestration),
            securemgr: filled(self.securemgr),
            codec,
            authorizer: OriginAuthorizer::new(self.network),
            resolver: self.resolver,
        }
    }

    /// Build, failing if a capability or the key is missing.
    pub fn build_complete(self) -> Result<ExternalHandler, GatewayError> {
        if self.orchestration.is_none() {
            return Err(GatewayError::Incomplete("orchestration capability"));
        }
        if self.securemgr.is_none() {
            return Err(GatewayError::Incomplete("securemgr capability"));
        }
        if self.cipher.is_none() {
            return Err(GatewayError::Incomplete("envelope key"));
        }
        Ok(self.build())
    }
}

fn filled<T>(value: Option<T>) -> OnceLock<T> {
    value.map(OnceLock::from).unwrap_or_default()
}
