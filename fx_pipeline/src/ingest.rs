//! Normalize, deduplicate and persist one batch of raw candles.
//!
//! A batch is all-or-nothing: one malformed record rejects it before any write, and a
//! store failure after the first write rolls the whole transaction back. Moving averages
//! for the new bars are written in the same transaction, so the store never holds a bar
//! without its eligible averages.

use std::collections::HashSet;

use chrono::NaiveDateTime;
use quote_source::{
    models::{bar::CurrencyBar, candle::RawCandle, pair::CurrencyPair},
    normalize::normalize,
};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::{
    errors::{IngestError, StoreError},
    gate,
    models::{NewCurrencyBar, NewMovingAverage},
    moving_average::{WindowSet, derive_from_closes},
    store::BarStore,
};

/// Outcome of one batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    /// Bars written.
    pub inserted_count: usize,
    /// Bars already stored or repeated within the batch.
    pub skipped_count: usize,
    /// Still-forming candles that were dropped.
    pub incomplete_count: usize,
    /// Moving-average rows written.
    pub moving_average_count: usize,
}

/// Writes batches of candles for one configured set of windows.
#[derive(Debug, Clone)]
pub struct Ingestor<'a> {
    windows: &'a WindowSet,
}

impl<'a> Ingestor<'a> {
    /// An ingestor computing `windows` for every new bar.
    pub fn new(windows: &'a WindowSet) -> Self {
        Self { windows }
    }

    /// Persist `raw` for `pair` in a single write transaction.
    pub fn ingest<C: BarStore>(
        &self,
        conn: &mut C,
        pair: &CurrencyPair,
        raw: &[RawCandle],
    ) -> Result<IngestReport, IngestError> {
        let (bars, incomplete_count) = normalize_batch(pair, raw)?;
        let pair_key = pair.to_string();

        let report = conn
            .write_transaction(|conn| -> Result<IngestReport, IngestError> {
                let split = gate::partition(conn, bars)?;
                let mut report = IngestReport {
                    skipped_count: split.skipped.len(),
                    incomplete_count,
                    ..IngestReport::default()
                };
                if split.fresh.is_empty() {
                    return Ok(report);
                }

                let rows: Vec<NewCurrencyBar<'_>> = split
                    .fresh
                    .iter()
                    .map(|bar| NewCurrencyBar::from_bar(&pair_key, bar))
                    .collect();
                report.inserted_count = conn.insert_bars(&rows)?;

                let averages = self.averages_for(conn, &pair_key, &split.fresh)?;
                report.moving_average_count = conn.insert_moving_averages(&averages)?;
                Ok(report)
            })
            .inspect_err(|e| {
                if let IngestError::PersistenceFailure(store) = e {
                    error!(
                        pair = %pair,
                        unique_violation = store.is_unique_violation(),
                        error = %store,
                        "batch rolled back"
                    );
                }
            })?;

        info!(
            pair = %pair,
            inserted = report.inserted_count,
            skipped = report.skipped_count,
            incomplete = report.incomplete_count,
            moving_averages = report.moving_average_count,
            "batch ingested"
        );
        Ok(report)
    }

    /// Averages owned by `fresh` bars, seeded with enough stored history that each
    /// window applies as soon as the combined series is long enough.
    fn averages_for<C: BarStore>(
        &self,
        conn: &mut C,
        pair: &str,
        fresh: &[CurrencyBar],
    ) -> Result<Vec<NewMovingAverage>, StoreError> {
        let Some(first) = fresh.iter().map(|b| b.timestamp).min() else {
            return Ok(Vec::new());
        };
        let first = first.naive_utc();
        let history = i64::try_from(self.windows.max() - 1).unwrap_or(i64::MAX);

        let mut series = conn.closes_before(pair, first, history)?;
        series.extend(conn.closes_since(pair, first)?);
        debug!(pair, series_len = series.len(), "moving-average series loaded");

        let owned: HashSet<NaiveDateTime> =
            fresh.iter().map(|b| b.timestamp.naive_utc()).collect();
        let closes: Vec<f64> = series.iter().map(|p| p.close).collect();

        Ok(derive_from_closes(&closes, self.windows)
            .into_iter()
            .filter_map(|m| {
                let point = &series[m.index];
                owned.contains(&point.timestamp).then(|| NewMovingAverage {
                    currency_data_id: point.id,
                    timestamp: point.timestamp,
                    window_size: i32::try_from(m.window_size).unwrap_or(i32::MAX),
                    average: m.value,
                })
            })
            .collect())
    }
}

/// Drop incomplete candles, normalize the rest and sort chronologically.
///
/// Fails on the first record that does not normalize, reporting its position in `raw`.
pub fn normalize_batch(
    pair: &CurrencyPair,
    raw: &[RawCandle],
) -> Result<(Vec<CurrencyBar>, usize), IngestError> {
    let mut incomplete = 0;
    let mut bars = Vec::with_capacity(raw.len());
    for (index, candle) in raw.iter().enumerate() {
        if !candle.complete {
            warn!(pair = %pair, time = %candle.time, "dropping incomplete candle");
            incomplete += 1;
            continue;
        }
        let bar = normalize(candle, pair).map_err(|source| {
            error!(pair = %pair, index, error = %source, "malformed candle");
            IngestError::MalformedRecord {
                pair: pair.clone(),
                index,
                source,
            }
        })?;
        bars.push(bar);
    }
    bars.sort_by_key(|b| b.timestamp);
    Ok((bars, incomplete))
}
