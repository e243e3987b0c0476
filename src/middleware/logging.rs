//! Request logging middleware
//!
//! Logs method, path, status and duration of every HTTP request. Slow requests
//! are logged at warn level.

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use std::time::Instant;

/// Requests slower than this are logged as warnings
pub const SLOW_REQUEST_MS: u128 = 500;

pub async fn request_logging(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status().as_u16();

    if duration.as_millis() > SLOW_REQUEST_MS {
        tracing::warn!(
            method = %method,
            path = %path,
            status = status,
            duration_ms = duration.as_millis(),
            "Slow request"
        );
    } else if response.status().is_server_error() {
        tracing::error!(
            method = %method,
            path = %path,
            status = status,
            duration_ms = duration.as_millis(),
            "Request failed"
        );
    } else {
        tracing::info!(
            method = %method,
            path = %path,
            status = status,
            duration_ms = duration.as_millis(),
            "Request completed"
        );
    }

    response
}
