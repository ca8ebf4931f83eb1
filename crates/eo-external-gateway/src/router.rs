//! HTTP routes of the External Gateway.

use crate::domain::config::GatewayConfig;
use crate::domain::error::RequestFault;
use crate::domain::origin::Origin;
use crate::handler::ExternalHandler;
use crate::middleware::TracingLayer;
use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::timeout::TimeoutLayer;

pub const SERVICES_PATH: &str = "/api/v1/orchestration/services";
pub const SECUREMGR_PATH: &str = "/api/v1/orchestration/securemgr";

const ENVELOPE_CONTENT_TYPE: &str = "application/octet-stream";

/// A named route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub name: &'static str,
    pub method: Method,
    pub pattern: &'static str,
}

/// Every route the gateway serves.
pub fn routes() -> Vec<Route> {
    vec![
        Route {
            name: "APIV1RequestServicePost",
            method: Method::POST,
            pattern: SERVICES_PATH,
        },
        Route {
            name: "APIV1RequestSecuremgrPost",
            method: Method::POST,
            pattern: SECUREMGR_PATH,
        },
    ]
}

/// Name of the route matching `method` and `path`.
pub fn route_name(method: &Method, path: &str) -> Option<&'static str> {
    routes()
        .into_iter()
        .find(|route| &route.method == method && route.pattern == path)
        .map(|route| route.name)
}

/// Application state shared across handlers
#[derive(Clone)]
struct AppState {
    handler: Arc<ExternalHandler>,
    /// `limits.max_request_size`, enforced when the handler reads the body
    body_limit: usize,
}

/// Build the gateway router.
///
/// The router needs `ConnectInfo<SocketAddr>`; serve it with
/// `into_make_service_with_connect_info::<SocketAddr>()`.
///
/// `limits.max_request_size` is applied by the handler at the body-read
/// checkpoint, after the capability, key and origin checks.
pub fn build_router(handler: Arc<ExternalHandler>, config: &GatewayConfig) -> Router {
    let state = AppState {
        handler,
        body_limit: config.limits.max_request_size,
    };

    Router::new()
        .route(SERVICES_PATH, post(request_service))
        .route(SECUREMGR_PATH, post(request_secure_mgr))
        .layer(TimeoutLayer::new(config.timeouts.request))
        .layer(TracingLayer::new())
        .with_state(state)
}

async fn request_service(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    request: Request,
) -> Response {
    let result = state
        .handler
        .request_service(Origin::from(peer), request.into_body(), state.body_limit)
        .await;
    envelope_response(result)
}

async fn request_secure_mgr(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    request: Request,
) -> Response {
    let result = state
        .handler
        .request_secure_mgr(Origin::from(peer), request.into_body(), state.body_limit)
        .await;
    envelope_response(result)
}

fn envelope_response(result: Result<Vec<u8>, RequestFault>) -> Response {
    match result {
        Ok(envelope) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, ENVELOPE_CONTENT_TYPE)],
            envelope,
        )
            .into_response(),
        Err(fault) => fault.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_names() {
        assert_eq!(
            route_name(&Method::POST, SERVICES_PATH),
            Some("APIV1RequestServicePost")
        );
        assert_eq!(
            route_name(&Method::POST, SECUREMGR_PATH),
            Some("APIV1RequestSecuremgrPost")
        );
        assert_eq!(route_name(&Method::GET, SERVICES_PATH), None);
        assert_eq!(route_name(&Method::POST, "/api/v1/orchestration"), None);
    }

    #[test]
    fn test_routes_are_unique() {
        let routes = routes();
        assert_eq!(routes.len(), 2);
        assert_ne!(routes[0].name, routes[1].name);
        assert_ne!(routes[0].pattern, routes[1].pattern);
    }

    #[tokio::test]
    async fn test_fault_has_empty_body() {
        let response = envelope_response(Err(RequestFault::KeyUnset));
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(body.is_empty());
    }

    #[test]
    fn test_envelope_content_type() {
        let response = envelope_response(Ok(vec![1, 2, 3]));
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            ENVELOPE_CONTENT_TYPE
        );
    }
}
