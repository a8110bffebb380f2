use chrono::{DateTime, Utc};

use crate::models::{granularity::Granularity, pair::CurrencyPair};

/// Provider default when no explicit count is configured.
pub const DEFAULT_COUNT: u32 = 100;

/// Parameters for one candle request.
#[derive(Debug, Clone, PartialEq)]
pub struct CandleRequest {
    pub pair: CurrencyPair,

    pub granularity: Granularity,

    /// Start of the window. `None` asks for the most recent `count` candles.
    ///
    /// Providers align this to the start of its bucket before sending it.
    pub from: Option<DateTime<Utc>>,

    /// Maximum number of candles to return.
    pub count: u32,
}

impl CandleRequest {
    /// A bootstrap request: the provider's most recent `count` candles.
    pub fn latest(pair: CurrencyPair, granularity: Granularity, count: u32) -> Self {
        Self {
            pair,
            granularity,
            from: None,
            count,
        }
    }

    /// An incremental request starting at `from`.
    pub fn since(mut self, from: DateTime<Utc>) -> Self {
        self.from = Some(from);
        self
    }
}
