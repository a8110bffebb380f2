//! Duplicate detection ahead of insertion.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use diesel::QueryResult;
use quote_source::models::{bar::CurrencyBar, pair::CurrencyPair};
use tracing::debug;

use crate::store::BarStore;

/// A batch split into bars to insert and bars already known.
#[derive(Debug, Default)]
pub struct Partition {
    /// Bars with no stored counterpart, in input order.
    pub fresh: Vec<CurrencyBar>,
    /// Bars already stored, or repeated earlier in the same batch.
    pub skipped: Vec<CurrencyBar>,
}

/// Whether `(pair, timestamp)` is already stored.
pub fn exists<C: BarStore>(
    conn: &mut C,
    pair: &CurrencyPair,
    timestamp: DateTime<Utc>,
) -> QueryResult<bool> {
    conn.bar_exists(&pair.to_string(), timestamp.naive_utc())
}

/// Split `bars` into fresh and skipped.
///
/// Within the batch, the first occurrence of a key wins.
pub fn partition<C: BarStore>(conn: &mut C, bars: Vec<CurrencyBar>) -> QueryResult<Partition> {
    let mut seen = HashSet::new();
    let mut out = Partition::default();
    for bar in bars {
        let key = (bar.currency_pair.clone(), bar.timestamp);
        if !seen.insert(key) || exists(conn, &bar.currency_pair, bar.timestamp)? {
            debug!(pair = %bar.currency_pair, timestamp = %bar.timestamp, "duplicate bar skipped");
            out.skipped.push(bar);
        } else {
            out.fresh.push(bar);
        }
    }
    Ok(out)
}
