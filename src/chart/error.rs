use thiserror::Error;

/// Errors produced while building a chart.
///
/// `InvalidInput` means the caller sent something that can never yield a
/// chart. `Computation` means the input was well-formed but the astronomy
/// could not be carried out for it: a series that did not converge, a house
/// system that is undefined at the birth latitude, or an instant outside the
/// ephemeris range.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChartError {
    #[error("invalid {field}: {message}")]
    InvalidInput { field: &'static str, message: String },

    #[error("chart computation failed: {0}")]
    Computation(String),
}

impl ChartError {
    pub(crate) fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidInput { field, message: message.into() }
    }

    pub(crate) fn computation(message: impl Into<String>) -> Self {
        Self::Computation(message.into())
    }
}
