//! # dashagpt
//!
//! A Vedic astrology web service: a landing page, a birth-chart calculator
//! and a JSON API in front of a pure chart engine.
//!
//! - [`chart`]: the engine. Birth data in, sidereal chart out, with
//!   nakshatras, divisional charts and Vimshottari dashas. No I/O.
//! - [`app`]: the route table, wiring [`pages`], [`api`] and [`health`]
//!   into a [`Router`].
//! - The HTTP layer: radix-tree routing via [`matchit`], hyper connections,
//!   graceful shutdown, request body limits, CORS and per-request tracing.
//!
//! TLS, rate limiting and response compression belong to the reverse
//! proxy in front of the service.
//!
//! ## Driving the router in-process
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use bytes::Bytes;
//! use dashagpt::{app, chart::ChartEngine, config::Config};
//! use http_body_util::Full;
//!
//! # #[tokio::main] async fn main() {
//! let router = app::router(&Config::default(), Arc::new(ChartEngine::default()));
//! let req = http::Request::post("/api/calculate")
//!     .body(Full::new(Bytes::from_static(b"{}")))
//!     .unwrap();
//! let res = router.handle(req).await;
//! assert_eq!(res.status(), 200);
//! # }
//! ```

mod error;
mod handler;
mod method;
mod request;
mod response;
mod router;
mod server;
mod status;

pub mod api;
pub mod app;
pub mod chart;
pub mod config;
pub mod health;
pub mod middleware;
pub mod pages;
pub mod telemetry;

pub use error::Error;
pub use handler::Handler;
pub use method::Method;
pub use request::Request;
pub use response::{ContentType, IntoResponse, Json, Response, ResponseBuilder};
pub use router::{DEFAULT_MAX_BODY_BYTES, ErrorRenderer, Router};
pub use server::Server;
pub use status::Status;
