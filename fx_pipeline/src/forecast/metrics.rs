//! Error metrics on price-scale values.

use serde::Serialize;

/// Root-mean-square and mean absolute error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Metrics {
    /// Root-mean-square error.
    pub rmse: f64,
    /// Mean absolute error.
    pub mae: f64,
}

impl Metrics {
    /// Compare `predicted` against `actual`, pairwise. Empty input scores zero.
    pub fn compute(actual: &[f64], predicted: &[f64]) -> Self {
        let n = actual.len().min(predicted.len());
        if n == 0 {
            return Self { rmse: 0.0, mae: 0.0 };
        }
        let (sq, abs) = actual
            .iter()
            .zip(predicted)
            .fold((0.0, 0.0), |(sq, abs), (a, p)| {
                let d = a - p;
                (sq + d * d, abs + d.abs())
            });
        Self {
            rmse: (sq / n as f64).sqrt(),
            mae: abs / n as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfect_forecast_scores_zero() {
        assert_eq!(
            Metrics::compute(&[1.0, 2.0], &[1.0, 2.0]),
            Metrics { rmse: 0.0, mae: 0.0 }
        );
    }

    #[test]
    fn rmse_weights_large_errors() {
        let m = Metrics::compute(&[0.0, 0.0], &[1.0, 3.0]);
        assert_eq!(m.mae, 2.0);
        assert!((m.rmse - 5.0f64.sqrt()).abs() < 1e-12);
    }
}
