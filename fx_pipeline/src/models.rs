//! Diesel models mapping to the database schema.
//!
//! These types mirror the tables defined in the embedded migrations and in
//! [`crate::schema`]:
//! - [`crate::schema::currency_data`] holds one OHLCV bar per pair and timestamp
//! - [`crate::schema::moving_average`] holds derived means keyed by bar and window
//! - [`crate::schema::prediction`] holds forecaster output for evaluation runs
//!
//! Timestamps are stored as naive UTC instants; the `UNIQUE (currency_pair, timestamp)`
//! constraint on `currency_data` is what makes ingestion idempotent.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use quote_source::models::bar::CurrencyBar;

use crate::schema::*;

/// A row in [`crate::schema::currency_data`].
#[derive(Debug, Clone, PartialEq, Queryable, Identifiable, Selectable)]
#[diesel(table_name = currency_data)]
pub struct CurrencyBarRow {
    /// Database primary key.
    pub id: i32,
    /// Canonical pair label, e.g. "EUR/USD".
    pub currency_pair: String,
    /// Bar open instant (UTC).
    pub timestamp: NaiveDateTime,
    /// Opening mid price.
    pub open: f64,
    /// High mid price.
    pub high: f64,
    /// Low mid price.
    pub low: f64,
    /// Closing mid price.
    pub close: f64,
    /// Tick volume.
    pub volume: i64,
}

/// Insertable form of [`CurrencyBarRow`].
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = currency_data)]
pub struct NewCurrencyBar<'a> {
    /// Canonical pair label.
    pub currency_pair: &'a str,
    /// Bar open instant (UTC).
    pub timestamp: NaiveDateTime,
    /// Opening mid price.
    pub open: f64,
    /// High mid price.
    pub high: f64,
    /// Low mid price.
    pub low: f64,
    /// Closing mid price.
    pub close: f64,
    /// Tick volume.
    pub volume: i64,
}

impl<'a> NewCurrencyBar<'a> {
    /// Borrow a normalized bar as an insertable row under `pair`.
    pub fn from_bar(pair: &'a str, bar: &CurrencyBar) -> Self {
        Self {
            currency_pair: pair,
            timestamp: bar.timestamp.naive_utc(),
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            // the normalizer rejects volumes above i64::MAX
            volume: i64::try_from(bar.volume).unwrap_or(i64::MAX),
        }
    }
}

/// A row in [`crate::schema::moving_average`].
#[derive(Debug, Clone, PartialEq, Queryable, Identifiable, Associations, Selectable)]
#[diesel(table_name = moving_average)]
#[diesel(belongs_to(CurrencyBarRow, foreign_key = currency_data_id))]
pub struct MovingAverageRow {
    /// Database primary key.
    pub id: i32,
    /// FK to [`CurrencyBarRow::id`].
    pub currency_data_id: i32,
    /// Timestamp of the owning bar.
    pub timestamp: NaiveDateTime,
    /// Number of closes averaged.
    pub window_size: i32,
    /// Arithmetic mean of the window's closes.
    pub average: f64,
}

/// Insertable form of [`MovingAverageRow`].
#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = moving_average)]
pub struct NewMovingAverage {
    /// FK to the owning bar.
    pub currency_data_id: i32,
    /// Timestamp of the owning bar.
    pub timestamp: NaiveDateTime,
    /// Number of closes averaged.
    pub window_size: i32,
    /// Arithmetic mean of the window's closes.
    pub average: f64,
}

/// A row in [`crate::schema::prediction`].
#[derive(Debug, Clone, PartialEq, Queryable, Identifiable, Associations, Selectable)]
#[diesel(table_name = prediction)]
#[diesel(belongs_to(CurrencyBarRow, foreign_key = currency_data_id))]
pub struct PredictionRow {
    /// Database primary key.
    pub id: i32,
    /// FK to the bar whose close was predicted.
    pub currency_data_id: i32,
    /// Timestamp of that bar.
    pub timestamp: NaiveDateTime,
    /// Forecaster that produced the value.
    pub model_name: String,
    /// Predicted close, in price units.
    pub predicted_close: f64,
}

/// Insertable form of [`PredictionRow`].
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = prediction)]
pub struct NewPrediction<'a> {
    /// FK to the bar whose close was predicted.
    pub currency_data_id: i32,
    /// Timestamp of that bar.
    pub timestamp: NaiveDateTime,
    /// Forecaster that produced the value.
    pub model_name: &'a str,
    /// Predicted close, in price units.
    pub predicted_close: f64,
}

/// `(id, timestamp, close)` projection of a stored bar, used for window math.
#[derive(Debug, Clone, Copy, PartialEq, Queryable)]
pub struct ClosePoint {
    /// Bar primary key.
    pub id: i32,
    /// Bar open instant (UTC).
    pub timestamp: NaiveDateTime,
    /// Closing mid price.
    pub close: f64,
}
