//! Request tracing middleware.
//!
//! Wraps every request in an `external_request` span and tags the response
//! with a time-ordered request id.

use crate::router::route_name;
use axum::{
    body::Body,
    http::{HeaderValue, Request},
    response::Response,
};
use std::task::{Context, Poll};
use tower::{Layer, Service};
use tracing::{info_span, Instrument, Span};
use uuid::Uuid;

/// Response header carrying the request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Tracing layer that creates spans for each request
#[derive(Clone, Default)]
pub struct TracingLayer;

impl TracingLayer {
    pub fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for TracingLayer {
    type Service = TracingService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        TracingService { inner }
    }
}

/// Tracing service
#[derive(Clone)]
pub struct TracingService<S> {
    inner: S,
}

impl<S> Service<Request<Body>> for TracingService<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let mut inner = self.inner.clone();

        let request_id = Uuid::now_v7();
        let span = info_span!(
            "external_request",
            http.method = %req.method(),
            http.target = %req.uri().path(),
            route.name = route_name(req.method(), req.uri().path()).unwrap_or("unmatched"),
            request.id = %request_id,
            otel.kind = "server",
            otel.status_code = tracing::field::Empty,
        );

        Box::pin(
            async move {
                let result = inner.call(req).await;

                match result {
                    Ok(mut response) => {
                        let status = response.status();
                        Span::current().record(
                            "otel.status_code",
                            if status.is_success() { "OK" } else { "ERROR" },
                        );
                        tracing::debug!(status = status.as_u16(), "Request finished");

                        if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
                            response.headers_mut().insert(REQUEST_ID_HEADER, value);
                        }
                        Ok(response)
                    }
                    Err(e) => {
                        Span::current().record("otel.status_code", "ERROR");
                        Err(e)
                    }
                }
            }
            .instrument(span),
        )
    }
}
