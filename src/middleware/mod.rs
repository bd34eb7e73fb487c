//! Cross-cutting request handling applied by the [`Router`](crate::Router)
//! around every handler.
//!
//! - [`cors`]: permissive CORS headers and `OPTIONS` preflight replies.
//! - [`trace`]: one span per request and a completion event carrying
//!   method, path, status and latency.

pub mod cors;
pub mod trace;
