//! Request logging middleware
//!
//! Logs every request and its outcome. Purely a side channel: it never
//! changes the request or the response.

use axum::{extract::Request, http::header, middleware::Next, response::Response};
use std::time::Instant;
use tracing::{debug, info, warn};

pub async fn log_requests(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let uri = request.uri().clone();
    let user_agent = request
        .headers()
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("-")
        .to_string();

    debug!(%method, %uri, user_agent = %user_agent, "Incoming request");

    let response = next.run(request).await;

    let status = response.status();
    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
    if status.is_client_error() || status.is_server_error() {
        warn!(%method, %uri, status = status.as_u16(), elapsed_ms, "Request failed");
    } else {
        info!(%method, %uri, status = status.as_u16(), elapsed_ms, "Request completed");
    }

    response
}
