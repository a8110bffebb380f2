//! Supervised samples cut from a series.

/// Inputs of `look_back` consecutive values, each paired with the value after them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SupervisedSet {
    /// One window per sample.
    pub inputs: Vec<Vec<f64>>,
    /// Value following each window.
    pub targets: Vec<f64>,
    /// Position of each target in the source series.
    pub target_index: Vec<usize>,
}

impl SupervisedSet {
    /// Number of samples.
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// True when no window fit in the series.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Chronological split: the first `floor(len * (1 - test_ratio))` samples train.
    pub fn split(mut self, test_ratio: f64) -> (SupervisedSet, SupervisedSet) {
        let cut = train_len(self.len(), test_ratio);
        let test = SupervisedSet {
            inputs: self.inputs.split_off(cut),
            targets: self.targets.split_off(cut),
            target_index: self.target_index.split_off(cut),
        };
        (self, test)
    }
}

fn train_len(len: usize, test_ratio: f64) -> usize {
    let cut = ((len as f64) * (1.0 - test_ratio)).floor() as usize;
    cut.min(len)
}

/// Fewest samples for which [`SupervisedSet::split`] leaves both halves non-empty.
///
/// `None` when no sample count can: `test_ratio` outside `(0, 1)`, or so small that
/// `1 - test_ratio` rounds to one.
pub fn min_split_samples(test_ratio: f64) -> Option<usize> {
    let keep = 1.0 - test_ratio;
    if !(keep > 0.0 && keep < 1.0) {
        return None;
    }
    // 1 / keep is the exact bound; the loop absorbs rounding in the floor
    let estimate = (1.0 / keep).ceil() as usize;
    let mut len = estimate.saturating_sub(1).max(2);
    while train_len(len, test_ratio) == 0 {
        len += 1;
    }
    Some(len)
}

/// Every window of `look_back` values in `values` with the value that follows it.
pub fn make_sequences(values: &[f64], look_back: usize) -> SupervisedSet {
    let mut set = SupervisedSet::default();
    if look_back == 0 {
        return set;
    }
    for i in look_back..values.len() {
        set.inputs.push(values[i - look_back..i].to_vec());
        set.targets.push(values[i]);
        set.target_index.push(i);
    }
    set
}
