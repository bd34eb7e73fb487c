//! Per-request tracing.

use std::time::Instant;

use tracing::{Span, error, info, info_span};

/// Span wrapping everything done for one request.
pub fn span(method: &http::Method, path: &str) -> Span {
    info_span!("request", method = %method, path = %path)
}

/// Emits the completion event. Server errors log at `ERROR`.
pub fn completed(status: u16, started: Instant) {
    let latency_ms = started.elapsed().as_secs_f64() * 1_000.0;
    if status >= 500 {
        error!(status, latency_ms, "request failed");
    } else {
        info!(status, latency_ms, "request completed");
    }
}
