//! Raw candle -> [`CurrencyBar`] conversion.
//!
//! The provider emits timestamps such as `2023-12-28T22:00:00.000000000Z`: the
//! fractional part may carry 6 or 9 digits, or be absent. Only UTC (`Z`) anchored
//! values are accepted, and the result is truncated to microseconds so the same
//! upstream candle always maps to the same dedup key.

use chrono::{DateTime, SubsecRound, Utc};
use snafu::{ResultExt, Snafu, ensure};

use crate::models::{bar::CurrencyBar, candle::RawCandle, pair::CurrencyPair};

/// Why a raw record could not be turned into a bar.
#[derive(Debug, Snafu)]
pub enum NormalizeError {
    #[snafu(display("timestamp {value:?} is not anchored to UTC with a trailing 'Z'"))]
    MissingUtcDesignator { value: String },

    #[snafu(display("timestamp {value:?} could not be parsed: {source}"))]
    BadTimestamp {
        value: String,
        source: chrono::ParseError,
    },

    #[snafu(display("field `{field}` is not numeric: {value:?}"))]
    NotNumeric {
        field: &'static str,
        value: String,
        source: std::num::ParseFloatError,
    },

    #[snafu(display("field `{field}` must be finite and non-negative, got {value}"))]
    OutOfRange { field: &'static str, value: f64 },

    #[snafu(display("volume {value} exceeds the storable range"))]
    VolumeOverflow { value: u64 },
}

/// Converts one raw candle into a canonical bar for `pair`.
pub fn normalize(raw: &RawCandle, pair: &CurrencyPair) -> Result<CurrencyBar, NormalizeError> {
    ensure!(
        i64::try_from(raw.volume).is_ok(),
        VolumeOverflowSnafu { value: raw.volume }
    );

    Ok(CurrencyBar {
        currency_pair: pair.clone(),
        timestamp: parse_candle_time(&raw.time)?,
        open: parse_price("o", &raw.mid.o)?,
        high: parse_price("h", &raw.mid.h)?,
        low: parse_price("l", &raw.mid.l)?,
        close: parse_price("c", &raw.mid.c)?,
        volume: raw.volume,
    })
}

/// Parses a `Z`-suffixed RFC-3339 timestamp with any fractional precision.
pub fn parse_candle_time(value: &str) -> Result<DateTime<Utc>, NormalizeError> {
    let trimmed = value.trim();
    ensure!(
        trimmed.ends_with('Z'),
        MissingUtcDesignatorSnafu { value }
    );
    let parsed = DateTime::parse_from_rfc3339(trimmed).context(BadTimestampSnafu { value })?;
    Ok(parsed.with_timezone(&Utc).trunc_subsecs(6))
}

fn parse_price(field: &'static str, value: &str) -> Result<f64, NormalizeError> {
    let parsed: f64 = value
        .trim()
        .parse()
        .context(NotNumericSnafu { field, value })?;
    ensure!(
        parsed.is_finite() && parsed >= 0.0,
        OutOfRangeSnafu {
            field,
            value: parsed
        }
    );
    Ok(parsed)
}
