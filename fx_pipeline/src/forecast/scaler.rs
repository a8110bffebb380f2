//! Min-max scaling to `[0, 1]`.

/// Scaler fitted on one series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinMaxScaler {
    min: f64,
    range: f64,
}

impl MinMaxScaler {
    /// Fit on `values`; `None` when empty.
    pub fn fit(values: &[f64]) -> Option<Self> {
        let (min, max) = values.iter().fold(None, |acc: Option<(f64, f64)>, &v| {
            Some(match acc {
                Some((lo, hi)) => (lo.min(v), hi.max(v)),
                None => (v, v),
            })
        })?;
        Some(Self { min, range: max - min })
    }

    /// Scale one value. A constant series maps to 0.
    pub fn transform(&self, value: f64) -> f64 {
        if self.range == 0.0 {
            0.0
        } else {
            (value - self.min) / self.range
        }
    }

    /// Undo [`transform`](Self::transform).
    pub fn inverse_transform(&self, scaled: f64) -> f64 {
        scaled * self.range + self.min
    }

    /// [`transform`](Self::transform) every value.
    pub fn transform_all(&self, values: &[f64]) -> Vec<f64> {
        values.iter().map(|&v| self.transform(v)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_extremes_to_unit_interval() {
        let s = MinMaxScaler::fit(&[2.0, 4.0, 6.0]).unwrap();
        assert_eq!(s.transform_all(&[2.0, 4.0, 6.0]), vec![0.0, 0.5, 1.0]);
        assert_eq!(s.inverse_transform(0.5), 4.0);
    }

    #[test]
    fn constant_series_maps_to_zero() {
        let s = MinMaxScaler::fit(&[1.1, 1.1]).unwrap();
        assert_eq!(s.transform(1.1), 0.0);
        assert_eq!(s.inverse_transform(0.0), 1.1);
    }

    #[test]
    fn empty_series_cannot_be_fitted() {
        assert!(MinMaxScaler::fit(&[]).is_none());
    }
}
