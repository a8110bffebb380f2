//! Error taxonomy for the pipeline.
//!
//! Every failure of a cycle surfaces as one [`IngestError`]; [`ErrorKind`] is its
//! coarse class, which the event handler and the CLI report alongside the message.

use quote_source::{
    models::pair::CurrencyPair, normalize::NormalizeError, providers::SourceError,
};
use serde::Serialize;
use shared_utils::config::ConfigError;
use thiserror::Error;

/// Storage-layer failures.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The database could not be reached or the URL was rejected.
    #[error("could not connect to the store: {0}")]
    Connection(#[from] diesel::ConnectionError),

    /// A statement failed, including constraint violations and rollbacks.
    #[error("store query failed: {0}")]
    Query(#[from] diesel::result::Error),

    /// The URL names a backend this build does not include.
    #[error("{0} support is not compiled in")]
    UnsupportedBackend(&'static str),
}

impl StoreError {
    /// True when the statement lost a race on a unique constraint.
    pub fn is_unique_violation(&self) -> bool {
        use diesel::result::{DatabaseErrorKind, Error};
        matches!(
            self,
            StoreError::Query(Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _))
        )
    }
}

/// Coarse class of an [`IngestError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Network failure, timeout or non-success status from the provider.
    SourceUnavailable,
    /// A record (or the whole payload) could not be parsed.
    MalformedRecord,
    /// The store rejected the batch; nothing was written.
    PersistenceFailure,
    /// Startup configuration is missing or invalid.
    Configuration,
}

/// Failure of one ingestion cycle.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The provider could not be reached or answered with an error.
    #[error("quote source unavailable for {pair}: {source}")]
    SourceUnavailable {
        /// Pair being fetched.
        pair: CurrencyPair,
        /// Provider error.
        source: SourceError,
    },

    /// The provider's body was not a candle payload.
    #[error("malformed candle payload for {pair}: {source}")]
    MalformedPayload {
        /// Pair being fetched.
        pair: CurrencyPair,
        /// Decode error.
        source: SourceError,
    },

    /// One candle could not be normalized; the whole batch is rejected.
    #[error("malformed record #{index} for {pair}: {source}")]
    MalformedRecord {
        /// Pair being ingested.
        pair: CurrencyPair,
        /// Position of the record in the provider's response.
        index: usize,
        /// Why the record was rejected.
        source: NormalizeError,
    },

    /// The store failed; the transaction was rolled back.
    #[error("persistence failure: {0}")]
    PersistenceFailure(#[from] StoreError),

    /// Configuration was missing or invalid.
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),
}

impl IngestError {
    /// Coarse class of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            IngestError::SourceUnavailable { .. } => ErrorKind::SourceUnavailable,
            IngestError::MalformedPayload { .. } | IngestError::MalformedRecord { .. } => {
                ErrorKind::MalformedRecord
            }
            IngestError::PersistenceFailure(_) => ErrorKind::PersistenceFailure,
            IngestError::Configuration(_) => ErrorKind::Configuration,
        }
    }

    /// Classify a provider error for `pair`.
    pub fn from_source(pair: &CurrencyPair, source: SourceError) -> Self {
        if source.is_payload_error() {
            IngestError::MalformedPayload { pair: pair.clone(), source }
        } else {
            IngestError::SourceUnavailable { pair: pair.clone(), source }
        }
    }
}

impl From<diesel::result::Error> for IngestError {
    fn from(e: diesel::result::Error) -> Self {
        IngestError::PersistenceFailure(StoreError::Query(e))
    }
}

impl From<diesel::ConnectionError> for IngestError {
    fn from(e: diesel::ConnectionError) -> Self {
        IngestError::PersistenceFailure(StoreError::Connection(e))
    }
}
