//! Trailing simple moving averages over a chronologically sorted close series.
//!
//! A window of size `w` yields a value for every position `i >= w - 1`: the mean of
//! closes `i-w+1 ..= i`. Positions with too little history get nothing, not a partial
//! mean.

use std::{fmt, num::NonZeroUsize};

use quote_source::models::bar::CurrencyBar;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Windows computed when none are configured.
pub const DEFAULT_WINDOWS: [usize; 2] = [5, 50];

/// Why a list of window sizes was rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WindowSetError {
    /// No sizes were given.
    #[error("at least one moving-average window is required")]
    Empty,
    /// A size of zero was given.
    #[error("moving-average windows must be positive")]
    Zero,
}

/// Distinct, ascending window sizes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct WindowSet(Vec<NonZeroUsize>);

impl WindowSet {
    /// Sorts and deduplicates `sizes`; rejects an empty list or a zero size.
    pub fn new(sizes: impl IntoIterator<Item = usize>) -> Result<Self, WindowSetError> {
        let mut windows = sizes
            .into_iter()
            .map(|w| NonZeroUsize::new(w).ok_or(WindowSetError::Zero))
            .collect::<Result<Vec<_>, _>>()?;
        if windows.is_empty() {
            return Err(WindowSetError::Empty);
        }
        windows.sort_unstable();
        windows.dedup();
        Ok(Self(windows))
    }

    /// Window sizes, ascending.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().map(|w| w.get())
    }

    /// Largest window; also the history a new bar needs for every window to apply.
    pub fn max(&self) -> usize {
        self.0.last().map_or(1, |w| w.get())
    }
}

impl Default for WindowSet {
    fn default() -> Self {
        Self(
            DEFAULT_WINDOWS
                .iter()
                .filter_map(|&w| NonZeroUsize::new(w))
                .collect(),
        )
    }
}

impl TryFrom<Vec<usize>> for WindowSet {
    type Error = WindowSetError;

    fn try_from(sizes: Vec<usize>) -> Result<Self, Self::Error> {
        Self::new(sizes)
    }
}

impl From<WindowSet> for Vec<usize> {
    fn from(set: WindowSet) -> Self {
        set.iter().collect()
    }
}

impl fmt::Display for WindowSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.iter().map(|w| w.to_string()).collect();
        write!(f, "[{}]", parts.join(", "))
    }
}

/// One derived value: the mean ending at `index` over `window_size` closes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowedMean {
    /// Position of the last close in the window.
    pub index: usize,
    /// Number of closes averaged.
    pub window_size: usize,
    /// The mean itself.
    pub value: f64,
}

/// Means for every window and every eligible position of `closes`.
///
/// Output is grouped by window (ascending), then by position.
pub fn derive_from_closes(closes: &[f64], windows: &WindowSet) -> Vec<WindowedMean> {
    let mut out = Vec::new();
    for window_size in windows.iter() {
        if closes.len() < window_size {
            continue;
        }
        for index in (window_size - 1)..closes.len() {
            let span = &closes[index + 1 - window_size..=index];
            out.push(WindowedMean {
                index,
                window_size,
                value: span.iter().sum::<f64>() / window_size as f64,
            });
        }
    }
    out
}

/// [`derive_from_closes`] over the closes of `bars`, which must be sorted by timestamp.
pub fn derive(bars: &[CurrencyBar], windows: &WindowSet) -> Vec<WindowedMean> {
    debug_assert!(bars.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    derive_from_closes(&closes, windows)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn windows(sizes: &[usize]) -> WindowSet {
        WindowSet::new(sizes.iter().copied()).unwrap()
    }

    #[test]
    fn short_series_yields_nothing() {
        let closes = [1.0, 2.0, 3.0, 4.0];
        assert!(derive_from_closes(&closes, &windows(&[5])).is_empty());
    }

    #[test]
    fn first_full_window_is_the_plain_mean() {
        let closes = [1.0, 2.0, 3.0, 4.0, 5.0];
        let out = derive_from_closes(&closes, &windows(&[5]));
        assert_eq!(
            out,
            vec![WindowedMean { index: 4, window_size: 5, value: 3.0 }]
        );
    }

    #[test]
    fn window_slides_one_bar_at_a_time() {
        let closes = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let values: Vec<f64> = derive_from_closes(&closes, &windows(&[5]))
            .iter()
            .map(|m| m.value)
            .collect();
        assert_eq!(values, vec![3.0, 4.0]);
    }

    #[test]
    fn windows_are_sorted_and_deduplicated() {
        let set = WindowSet::new([50, 5, 5]).unwrap();
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![5, 50]);
        assert_eq!(set.max(), 50);
        assert_eq!(set.to_string(), "[5, 50]");
    }

    #[test]
    fn invalid_window_sets_are_rejected() {
        assert_eq!(WindowSet::new([]), Err(WindowSetError::Empty));
        assert_eq!(WindowSet::new([5, 0]), Err(WindowSetError::Zero));
    }

    #[test]
    fn default_is_five_and_fifty() {
        assert_eq!(WindowSet::default(), windows(&[5, 50]));
    }

    #[test]
    fn derive_reads_closes_from_bars() {
        use chrono::{Duration, TimeZone, Utc};
        use quote_source::models::pair::CurrencyPair;

        let pair: CurrencyPair = "EUR/USD".parse().unwrap();
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 22, 0, 0).unwrap();
        let bars: Vec<CurrencyBar> = (0..5)
            .map(|i| CurrencyBar {
                currency_pair: pair.clone(),
                timestamp: start + Duration::days(i),
                open: 1.0,
                high: 1.0,
                low: 1.0,
                close: (i + 1) as f64,
                volume: 1,
            })
            .collect();

        assert!(derive(&bars[..4], &windows(&[5])).is_empty());
        let out = derive(&bars, &windows(&[5]));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].index, 4);
        assert_eq!(out[0].value, 3.0);
    }

    proptest! {
        #[test]
        fn output_count_matches_eligible_positions(
            closes in proptest::collection::vec(0.5f64..2.0, 0..80),
            w in 1usize..20,
        ) {
            let out = derive_from_closes(&closes, &windows(&[w]));
            prop_assert_eq!(out.len(), closes.len().saturating_sub(w - 1));
        }

        #[test]
        fn mean_is_bounded_by_window_extremes(
            closes in proptest::collection::vec(0.5f64..2.0, 1..60),
            w in 1usize..10,
        ) {
            for m in derive_from_closes(&closes, &windows(&[w])) {
                let span = &closes[m.index + 1 - w..=m.index];
                let lo = span.iter().cloned().fold(f64::INFINITY, f64::min);
                let hi = span.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
                prop_assert!(m.value >= lo - 1e-12 && m.value <= hi + 1e-12);
            }
        }
    }
}
