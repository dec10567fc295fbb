//! Error types for the market data crate.

use thiserror::Error;

/// Errors that can occur while talking to fund data upstreams.
///
/// Callers that need a never-throw boundary (the core crate's quote
/// adapter) collapse every variant to an absent quote; the variants exist
/// so that logs and tests can tell the failure modes apart.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The upstream does not know the instrument code.
    #[error("Instrument not found: {0}")]
    SymbolNotFound(String),

    /// The request to the upstream timed out.
    #[error("Timeout: {provider}")]
    Timeout {
        /// The provider that timed out
        provider: String,
    },

    /// The upstream rate limited the request (HTTP 429).
    #[error("Rate limited: {provider}")]
    RateLimited {
        /// The provider that rate limited the request
        provider: String,
    },

    /// The upstream answered, but not with anything usable.
    #[error("Malformed payload from {provider}: {message}")]
    MalformedPayload {
        /// The provider that returned the payload
        provider: String,
        /// What was wrong with it
        message: String,
    },

    /// A provider-specific error occurred (non-success status, upstream
    /// error body, ...).
    #[error("Provider error: {provider} - {message}")]
    ProviderError {
        /// The provider that returned the error
        provider: String,
        /// The error message from the provider
        message: String,
    },

    /// The upstream answered cleanly but had no data for the instrument.
    #[error("No data available")]
    NoDataAvailable,

    /// The operation is not supported by this provider.
    #[error("Operation '{operation}' not supported by {provider}")]
    NotSupported {
        /// The unsupported operation
        operation: String,
        /// The provider it was requested from
        provider: String,
    },

    /// A network error occurred while communicating with an upstream.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl MarketDataError {
    /// Whether a retry on the next refresh cycle has a realistic chance
    /// of succeeding. Terminal errors (unknown symbol, unsupported
    /// operation) stay terminal until the instrument itself changes.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::SymbolNotFound(_) | Self::NotSupported { .. } => false,
            Self::Timeout { .. }
            | Self::RateLimited { .. }
            | Self::MalformedPayload { .. }
            | Self::ProviderError { .. }
            | Self::NoDataAvailable
            | Self::Network(_) => true,
        }
    }
}
