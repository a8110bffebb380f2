//! Provider abstraction for quote sources.
//!
//! This module defines the [`QuoteSource`] trait, the single seam the ingestion
//! pipeline uses to pull candles from an upstream vendor. [`oanda_rest`] is the
//! production implementation; tests plug in in-memory fakes.
//!
//! The trait is designed for async usage and supports dynamic dispatch
//! (`dyn QuoteSource`) so callers can choose the source at runtime.
//!
//! # Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use quote_source::models::{candle::RawCandle, request_params::CandleRequest};
//! use quote_source::providers::{QuoteSource, SourceError};
//!
//! struct Empty;
//!
//! #[async_trait]
//! impl QuoteSource for Empty {
//!     async fn fetch_candles(
//!         &self,
//!         _request: &CandleRequest,
//!     ) -> Result<Vec<RawCandle>, SourceError> {
//!         Ok(vec![])
//!     }
//! }
//! ```

pub mod oanda_rest;

use async_trait::async_trait;
use snafu::{Backtrace, Snafu};

use crate::models::{candle::RawCandle, request_params::CandleRequest};

/// Fetches raw candles from a quote provider.
///
/// One call issues one upstream request. Implementations never retry and never
/// substitute cached data; a failure is returned to the caller as is.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Returns the candles for `request` in the order the provider sent them.
    async fn fetch_candles(&self, request: &CandleRequest) -> Result<Vec<RawCandle>, SourceError>;
}

/// Errors that can occur during the creation of a provider instance
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderInitError {
    /// failed to init reqwest client
    #[snafu(display("Failed to build HTTP client: {source}"))]
    ClientBuild {
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// API key contains invalid characters.
    #[snafu(display("Invalid API key format: {source}"))]
    InvalidApiKey {
        source: reqwest::header::InvalidHeaderValue,
        backtrace: Backtrace,
    },
}

/// Errors that can occur within a [`QuoteSource`] implementation.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum SourceError {
    /// Network failure before a response arrived.
    #[snafu(display("Request to {url} failed: {source}"))]
    Transport {
        url: String,
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// No response within the configured timeout.
    #[snafu(display("Request to {url} timed out: {source}"))]
    Timeout {
        url: String,
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// The provider answered with a non-success status.
    #[snafu(display("{url} answered HTTP {status}: {message}"))]
    Status {
        url: String,
        status: u16,
        message: String,
        backtrace: Backtrace,
    },

    /// The body arrived but is not a candle envelope.
    #[snafu(display("Candle payload could not be decoded: {source}"))]
    Decode {
        source: serde_json::Error,
        backtrace: Backtrace,
    },
}

impl SourceError {
    /// `true` when the provider answered but the payload itself is unusable.
    pub fn is_payload_error(&self) -> bool {
        matches!(self, SourceError::Decode { .. })
    }

    pub(crate) fn from_reqwest(url: &str, source: reqwest::Error) -> Self {
        use snafu::IntoError;

        if source.is_timeout() {
            TimeoutSnafu { url }.into_error(source)
        } else {
            TransportSnafu { url }.into_error(source)
        }
    }
}
