//! Walk-forward scoring of one forecaster against one pair's stored closes.

use quote_source::models::pair::CurrencyPair;
use serde::Serialize;
use tracing::info;

use super::{
    DEFAULT_LOOK_BACK, DEFAULT_TEST_RATIO, ForecastError,
    dataset::{make_sequences, min_split_samples},
    metrics::Metrics,
    model::Forecaster,
    scaler::MinMaxScaler,
};
use crate::{models::NewPrediction, store::BarStore};

/// How an evaluation run is set up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvaluationOptions {
    /// Closes per input window.
    pub look_back: usize,
    /// Share of samples held out, in `(0, 1)`.
    pub test_ratio: f64,
    /// Store test-set predictions in the `prediction` table.
    pub persist: bool,
}

impl Default for EvaluationOptions {
    fn default() -> Self {
        Self {
            look_back: DEFAULT_LOOK_BACK,
            test_ratio: DEFAULT_TEST_RATIO,
            persist: false,
        }
    }
}

/// Outcome of one evaluation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    /// Pair in `BASE/QUOTE` form.
    pub currency_pair: String,
    /// [`Forecaster::name`] of the scored model.
    pub model: String,
    /// Samples the forecaster was fitted on.
    pub train_samples: usize,
    /// Samples it was scored on.
    pub test_samples: usize,
    /// Error on the held-out samples, in price units.
    pub metrics: Metrics,
    /// Predictions written, zero unless persistence was requested.
    pub persisted: usize,
}

/// Score `forecaster` on the stored closes of `pair`.
pub fn evaluate_pair<C: BarStore>(
    conn: &mut C,
    pair: &CurrencyPair,
    forecaster: &mut dyn Forecaster,
    options: &EvaluationOptions,
) -> Result<Evaluation, ForecastError> {
    if options.look_back == 0 {
        return Err(ForecastError::InvalidOption {
            option: "look_back",
            reason: "must be positive".to_string(),
        });
    }
    let min_samples =
        min_split_samples(options.test_ratio).ok_or_else(|| ForecastError::InvalidOption {
            option: "test_ratio",
            reason: format!("{} is outside (0, 1)", options.test_ratio),
        })?;

    let pair_key = pair.to_string();
    let series = conn.close_series(&pair_key)?;
    let closes: Vec<f64> = series.iter().map(|p| p.close).collect();
    let not_enough = || ForecastError::NotEnoughData {
        needed: options.look_back + min_samples,
        available: closes.len(),
    };

    let scaler = MinMaxScaler::fit(&closes).ok_or_else(not_enough)?;
    let (train, test) = make_sequences(&scaler.transform_all(&closes), options.look_back)
        .split(options.test_ratio);
    if train.is_empty() || test.is_empty() {
        return Err(not_enough());
    }

    forecaster.fit(&train);
    let predicted: Vec<f64> = test
        .inputs
        .iter()
        .map(|window| scaler.inverse_transform(forecaster.predict(window)))
        .collect();
    let actual: Vec<f64> = test.target_index.iter().map(|&i| closes[i]).collect();
    let metrics = Metrics::compute(&actual, &predicted);

    let mut persisted = 0;
    if options.persist {
        let rows: Vec<NewPrediction<'_>> = test
            .target_index
            .iter()
            .zip(&predicted)
            .map(|(&i, &predicted_close)| NewPrediction {
                currency_data_id: series[i].id,
                timestamp: series[i].timestamp,
                model_name: forecaster.name(),
                predicted_close,
            })
            .collect();
        persisted = conn.write_transaction(|c| c.insert_predictions(&rows))?;
    }

    info!(
        pair = %pair,
        model = forecaster.name(),
        rmse = metrics.rmse,
        mae = metrics.mae,
        persisted,
        "forecast evaluated"
    );
    Ok(Evaluation {
        currency_pair: pair_key,
        model: forecaster.name().to_string(),
        train_samples: train.len(),
        test_samples: test.len(),
        metrics,
        persisted,
    })
}
