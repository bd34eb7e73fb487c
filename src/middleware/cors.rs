//! Permissive CORS.
//!
//! The calculator API is meant to be called from other origins, so every
//! response allows any origin and preflights are answered without reaching
//! a handler.

use crate::response::Response;
use crate::status::Status;

pub const ALLOW_ORIGIN: &str = "access-control-allow-origin";
pub const ALLOW_METHODS: &str = "access-control-allow-methods";
pub const ALLOW_HEADERS: &str = "access-control-allow-headers";
pub const MAX_AGE: &str = "access-control-max-age";

const DEFAULT_ALLOW_HEADERS: &str = "content-type";
const PREFLIGHT_MAX_AGE_SECS: &str = "86400";

/// Marks `response` as readable from any origin.
pub fn apply(response: &mut Response) {
    response.set_header(ALLOW_ORIGIN, "*");
}

/// `204` answer to an `OPTIONS` preflight for a path served by `allow`.
///
/// Requested headers are echoed back; without any, only `content-type` is
/// allowed.
pub fn preflight(allow: &str, requested_headers: Option<&str>) -> Response {
    Response::builder()
        .status(Status::NoContent)
        .header("allow", allow)
        .header(ALLOW_METHODS, allow)
        .header(ALLOW_HEADERS, requested_headers.unwrap_or(DEFAULT_ALLOW_HEADERS))
        .header(MAX_AGE, PREFLIGHT_MAX_AGE_SECS)
        .no_body()
}
