//! Candle sampling interval.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unsupported granularity: {0:?}")]
pub struct GranularityError(pub String);

/// Sampling interval of the bars we ingest.
///
/// Only daily candles are ingested; the cursor and the `from` alignment both assume
/// midnight-aligned days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Granularity {
    #[default]
    Daily,
}

impl Granularity {
    /// Provider wire code.
    pub fn code(self) -> &'static str {
        match self {
            Granularity::Daily => "D",
        }
    }

    /// Distance between two consecutive bars.
    pub fn step(self) -> Duration {
        match self {
            Granularity::Daily => Duration::days(1),
        }
    }

    /// Floors `ts` to the start of its bucket (UTC midnight for daily bars).
    pub fn align(self, ts: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            Granularity::Daily => ts
                .date_naive()
                .and_hms_opt(0, 0, 0)
                .map(|naive| naive.and_utc())
                .unwrap_or(ts),
        }
    }
}

impl FromStr for Granularity {
    type Err = GranularityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "D" | "d" | "day" | "daily" => Ok(Granularity::Daily),
            other => Err(GranularityError(other.to_string())),
        }
    }
}

impl TryFrom<String> for Granularity {
    type Error = GranularityError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Granularity> for String {
    fn from(g: Granularity) -> Self {
        g.code().to_string()
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
