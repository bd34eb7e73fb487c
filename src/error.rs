//! Infrastructure error type.

use std::net::AddrParseError;

use thiserror::Error;

/// Failures that stop the server itself: a bad listen address, or a socket
/// that cannot be bound.
///
/// Request-level failures (404, 413, 422, ...) are HTTP responses, not
/// `Error`s. Chart failures are [`ChartError`](crate::chart::ChartError).
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid listen address `{addr}`: {source}")]
    Address {
        addr: String,
        #[source]
        source: AddrParseError,
    },

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}
