//! External Gateway service - server lifecycle.

use crate::domain::config::GatewayConfig;
use crate::domain::error::GatewayError;
use crate::handler::ExternalHandler;
use crate::router::build_router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// External Gateway service
pub struct ExternalGatewayService {
    config: GatewayConfig,
    handler: Arc<ExternalHandler>,
}

impl ExternalGatewayService {
    /// Create a new service; the configuration is validated here.
    pub fn new(config: GatewayConfig, handler: Arc<ExternalHandler>) -> Result<Self, GatewayError> {
        config.validate()?;
        Ok(Self { config, handler })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn handler(&self) -> Arc<ExternalHandler> {
        Arc::clone(&self.handler)
    }

    /// Bind the listener and serve in the background.
    pub async fn start(&self) -> Result<RunningGateway, GatewayError> {
        let addr = self.config.http_addr();
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| GatewayError::Bind(format!("{addr}: {e}")))?;
        let local_addr = listener
            .local_addr()
            .map_err(|e| GatewayError::Bind(e.to_string()))?;

        if !self.handler.is_ready() {
            // Late wiring is allowed; requests get 503 until it happens.
            info!("Starting before every capability and the key are set");
        }

        let router = build_router(Arc::clone(&self.handler), &self.config);
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        info!(addr = %local_addr, "Starting External Gateway");
        let task = tokio::spawn(async move {
            let result = axum::serve(
                listener,
                router.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await;

            if let Err(e) = &result {
                error!(error = %e, "External Gateway server error");
            }
            result.map_err(|e| GatewayError::Serve(e.to_string()))
        });

        Ok(RunningGateway {
            local_addr,
            shutdown_tx: Some(shutdown_tx),
            task,
        })
    }
}

/// Handle to a serving gateway.
pub struct RunningGateway {
    local_addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<Result<(), GatewayError>>,
}

impl RunningGateway {
    /// Address the listener is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop accepting connections and wait for in-flight requests.
    pub async fn shutdown(mut self) -> Result<(), GatewayError> {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }

        let result = match (&mut self.task).await {
            Ok(result) => result,
            Err(e) => Err(GatewayError::Serve(e.to_string())),
        };
        info!(addr = %self.local_addr, "External Gateway stopped");
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::PortTable;
    use crate::ports::{NetworkError, NetworkInfo};
    use std::net::IpAddr;

    struct NoAddresses;

    impl NetworkInfo for NoAddresses {
        fn own_addresses(&self) -> Result<Vec<IpAddr>, NetworkError> {
            Ok(Vec::new())
        }
    }

    fn handler() -> Arc<ExternalHandler> {
        Arc::new(ExternalHandler::builder(Arc::new(NoAddresses), Arc::new(PortTable::new())).build())
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = GatewayConfig::default();
        config.limits.max_request_size = 0;

        assert!(matches!(
            ExternalGatewayService::new(config, handler()),
            Err(GatewayError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_bind_conflict() {
        let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();

        let mut config = GatewayConfig::default();
        config.http.host = "127.0.0.1".parse().unwrap();
        config.http.port = taken.local_addr().unwrap().port();

        let service = ExternalGatewayService::new(config, handler()).unwrap();
        assert!(matches!(service.start().await, Err(GatewayError::Bind(_))));
    }
}
