// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use controller::{MAX_SCORE, MIN_SCORE};
use std::{
    collections::{hash_map, HashMap},
    hash::Hash,
};

/// Walk the keys present in both `a` and `b`.
///
/// The smaller map drives the walk and keys are looked up in the larger one.
/// Values are always yielded as `(a's value, b's value)`.
pub fn common_keys<'a, K, V>(a: &'a HashMap<K, V>, b: &'a HashMap<K, V>) -> CommonKeys<'a, K, V>
where
    K: Hash + Eq,
{
    let swapped = a.len() > b.len();
    let (driver, lookup) = if swapped { (b, a) } else { (a, b) };

    CommonKeys {
        driver: driver.iter(),
        lookup,
        swapped,
    }
}

#[derive(Debug)]
pub struct CommonKeys<'a, K, V>
where
    K: Hash + Eq,
{
    driver: hash_map::Iter<'a, K, V>,
    lookup: &'a HashMap<K, V>,
    swapped: bool,
}

impl<'a, K, V> Iterator for CommonKeys<'a, K, V>
where
    K: Hash + Eq,
{
    type Item = (&'a K, (&'a V, &'a V));

    fn next(&mut self) -> Option<Self::Item> {
        for (key, driven) in &mut self.driver {
            if let Some(found) = self.lookup.get(key) {
                let values = if self.swapped {
                    (found, driven)
                } else {
                    (driven, found)
                };

                return Some((key, values));
            }
        }

        None
    }
}

/// Force a score into the valid rating range, NaN ends up at the minimum
pub fn clamp_score(score: f64) -> f64 {
    score.max(MIN_SCORE).min(MAX_SCORE)
}
