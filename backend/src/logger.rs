//! Request logging middleware
//!
//! Two layers: a request-id span with timing for tracing, and the
//! fixed-format outcome line (`[GET] /api/bookings - 200`) written for every
//! request.

use axum::{
    extract::Request,
    http::{Method, StatusCode},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

/// Target used for outcome lines so they can be filtered separately
pub const REQUEST_LOG_TARGET: &str = "requests";

/// Render the outcome line for one request
pub fn format_request_line(method: &Method, path: &str, status: StatusCode) -> String {
    format!("[{}] {} - {}", method, path, status.as_u16())
}

/// Write the outcome line once the response status is known
pub async fn request_logger(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;

    info!(
        target: REQUEST_LOG_TARGET,
        "{}",
        format_request_line(&method, &path, response.status())
    );
    response
}

/// Request ID middleware - adds unique ID to each request for tracing
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let span = info_span!(
        "request",
        request_id = %request_id,
        method = %method,
        uri = %uri,
    );

    let response = next.run(request).instrument(span).await;

    let duration = start.elapsed();
    info!(
        request_id = %request_id,
        method = %method,
        uri = %uri,
        status = %response.status().as_u16(),
        duration_ms = duration.as_millis(),
        "Request completed"
    );

    response
}
