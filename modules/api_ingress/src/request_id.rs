use std::time::Duration;

use axum::http::{HeaderName, Request};
use axum::{body::Body, middleware::Next, response::Response};
use tower_http::request_id::{MakeRequestId, RequestId};
use tracing::field::Empty;
use tracing::Span;

pub use modkit::XRequestId;

pub fn header() -> HeaderName {
    HeaderName::from_static("x-request-id")
}

#[derive(Clone, Default)]
pub struct MakeReqId;

impl MakeRequestId for MakeReqId {
    fn make_request_id<B>(&mut self, _req: &Request<B>) -> Option<RequestId> {
        let id = nanoid::nanoid!();
        Some(RequestId::new(id.parse().ok()?))
    }
}

/// Middleware that stores request_id in Request.extensions and records it in the current span
pub async fn push_req_id_to_extensions(mut req: Request<Body>, next: Next) -> Response {
    let rid = req
        .headers()
        .get(header())
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
        .unwrap_or_else(|| "n/a".to_string());

    req.extensions_mut().insert(XRequestId(rid.clone()));
    Span::current().record("request_id", tracing::field::display(&rid));

    next.run(req).await
}

pub fn make_span(req: &Request<Body>) -> Span {
    let rid = req
        .headers()
        .get(header())
        .and_then(|v| v.to_str().ok())
        .unwrap_or("n/a");
    tracing::info_span!(
        "http_request",
        method = %req.method(),
        uri = %req.uri().path(),
        version = ?req.version(),
        module = "api_ingress",
        request_id = %rid,
        status = Empty,
        latency_ms = Empty
    )
}

pub fn record_response(res: &Response, latency: Duration, span: &Span) {
    span.record("status", res.status().as_u16());
    span.record("latency_ms", latency.as_millis() as u64);
    tracing::debug!(parent: span, status = res.status().as_u16(), "response sent");
}
