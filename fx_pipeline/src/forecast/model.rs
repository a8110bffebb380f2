//! Baseline forecasters.

use super::dataset::SupervisedSet;

/// Predicts the value following a look-back window.
pub trait Forecaster {
    /// Name stored with persisted predictions.
    fn name(&self) -> &str;

    /// Learn from the training samples. Baselines have nothing to learn.
    fn fit(&mut self, _train: &SupervisedSet) {}

    /// Predict the next value after `window`.
    fn predict(&self, window: &[f64]) -> f64;
}

/// Tomorrow equals today.
#[derive(Debug, Clone, Copy, Default)]
pub struct LastValue;

impl Forecaster for LastValue {
    fn name(&self) -> &str {
        "last_value"
    }

    fn predict(&self, window: &[f64]) -> f64 {
        window.last().copied().unwrap_or_default()
    }
}

/// Mean of the most recent `span` values of the window.
#[derive(Debug, Clone)]
pub struct WindowMean {
    span: usize,
    name: String,
}

impl WindowMean {
    /// Averages the last `span` values; a zero span is treated as one.
    pub fn new(span: usize) -> Self {
        let span = span.max(1);
        Self {
            span,
            name: format!("window_mean_{span}"),
        }
    }
}

impl Forecaster for WindowMean {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict(&self, window: &[f64]) -> f64 {
        let tail = &window[window.len().saturating_sub(self.span)..];
        if tail.is_empty() {
            return 0.0;
        }
        tail.iter().sum::<f64>() / tail.len() as f64
    }
}
