//! Raw candle records as the quote provider sends them.
//!
//! Prices arrive as decimal strings and timestamps as RFC-3339 strings with a
//! variable-precision fraction; [`crate::normalize`] validates and converts them.

use serde::{Deserialize, Serialize};

/// Mid-price OHLC block of a candle, as decimal strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMid {
    pub o: String,
    pub h: String,
    pub l: String,
    pub c: String,
}

/// One candle exactly as received.
///
/// The record carries no pair field; the pair comes from the request that fetched it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCandle {
    /// Candle open time, e.g. `2023-12-28T22:00:00.000000000Z`.
    pub time: String,
    /// Tick volume.
    pub volume: u64,
    pub mid: RawMid,
    /// `false` while the candle is still forming. Absent means complete.
    #[serde(default = "default_complete")]
    pub complete: bool,
}

fn default_complete() -> bool {
    true
}
