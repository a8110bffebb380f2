//! Forecast evaluation over stored close series.
//!
//! The path is: load closes, scale to `[0, 1]`, cut into look-back sequences, split
//! chronologically, fit a [`model::Forecaster`], score it on the held-out tail and
//! optionally store its predictions.

pub mod dataset;
pub mod evaluate;
pub mod metrics;
pub mod model;
pub mod scaler;

use thiserror::Error;

use crate::errors::StoreError;

/// Look-back used when none is given.
pub const DEFAULT_LOOK_BACK: usize = 30;
/// Share of samples held out for testing when none is given.
pub const DEFAULT_TEST_RATIO: f64 = 0.2;

/// Why an evaluation could not run.
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Too few bars to build both a training and a test sample.
    #[error("need at least {needed} bars for this evaluation, found {available}")]
    NotEnoughData {
        /// Bars required.
        needed: usize,
        /// Bars stored.
        available: usize,
    },

    /// Options out of range.
    #[error("invalid evaluation option `{option}`: {reason}")]
    InvalidOption {
        /// Option name.
        option: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// Reading the series or writing predictions failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<diesel::result::Error> for ForecastError {
    fn from(e: diesel::result::Error) -> Self {
        ForecastError::Store(StoreError::Query(e))
    }
}
