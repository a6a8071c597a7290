// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use config::ConfigError;
use rand::{rngs::StdRng, seq::index, SeedableRng};

/// Split records into a train and a test set.
///
/// `floor(train_fraction * len)` records are sampled without replacement
/// for training, the rest is held out. Both halves keep the input
/// relative order, and the same seed always yields the same split.
pub fn train_test_split<T: Clone>(
    records: &[T],
    train_fraction: f64,
    seed: u64,
) -> Result<(Vec<T>, Vec<T>), ConfigError> {
    if !(train_fraction > 0.0 && train_fraction < 1.0) {
        return Err(ConfigError::InvalidTrainFraction(train_fraction));
    }

    let amount = (train_fraction * records.len() as f64) as usize;
    let mut rng = StdRng::seed_from_u64(seed);

    let mut in_train = vec![false; records.len()];
    for picked in index::sample(&mut rng, records.len(), amount).iter() {
        in_train[picked] = true;
    }

    let mut train = Vec::with_capacity(amount);
    let mut test = Vec::with_capacity(records.len() - amount);
    for (record, is_train) in records.iter().zip(in_train) {
        if is_train {
            train.push(record.clone());
        } else {
            test.push(record.clone());
        }
    }

    Ok((train, test))
}
