//! Canonical in-memory representation of a daily currency bar (OHLCV).

use chrono::{DateTime, Utc};

use crate::models::pair::CurrencyPair;

/// One OHLCV observation for a pair.
///
/// `(currency_pair, timestamp)` identifies a bar; two bars with the same key are the
/// same observation.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrencyBar {
    pub currency_pair: CurrencyPair,

    /// Candle open time (UTC), truncated to microseconds.
    pub timestamp: DateTime<Utc>,

    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,

    /// Tick volume reported by the provider.
    pub volume: u64,
}
