//! Incremental fetch cursor.
//!
//! The cursor is derived from the store on every cycle; nothing else is persisted.

use chrono::{DateTime, Utc};
use diesel::QueryResult;
use quote_source::models::{granularity::Granularity, pair::CurrencyPair};

use crate::store::BarStore;

/// Greatest stored timestamp for `pair`, or `None` when nothing is stored.
pub fn latest_timestamp<C: BarStore>(
    conn: &mut C,
    pair: &CurrencyPair,
) -> QueryResult<Option<DateTime<Utc>>> {
    Ok(conn
        .latest_timestamp(&pair.to_string())?
        .map(|ts| ts.and_utc()))
}

/// Start of the next fetch window: one step after `latest`.
///
/// `None` means bootstrap (ask for the most recent candles). The provider aligns the
/// result to the start of its bucket before sending it.
pub fn next_window_start(
    latest: Option<DateTime<Utc>>,
    granularity: Granularity,
) -> Option<DateTime<Utc>> {
    latest.map(|ts| ts + granularity.step())
}
