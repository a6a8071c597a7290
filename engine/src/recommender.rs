// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use crate::predictor::Predictor;
use rayon::prelude::*;
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation<I> {
    pub item: I,
    pub score: f64,
}

/// Rank the items `user` hasn't rated yet by predicted score.
///
/// Unknown users get an empty list. Items with the same score keep the
/// order they have in the interaction matrix, and at most `n` items are
/// returned.
pub fn recommend<P>(predictor: &P, user: &P::UserId, n: usize) -> Vec<Recommendation<P::ItemId>>
where
    P: Predictor + Sync,
{
    let matrix = predictor.matrix();
    let user_idx = match matrix.user_index(user) {
        Some(user_idx) => user_idx,
        None => return Vec::new(),
    };

    if n == 0 {
        return Vec::new();
    }

    let unrated: Vec<&P::ItemId> = matrix
        .unrated_in_row(user_idx)
        .map(|item_idx| &matrix.items()[item_idx])
        .collect();

    let predict = |item: &&P::ItemId| Recommendation {
        item: (*item).clone(),
        score: predictor.predict(user, item),
    };

    let mut recommendations: Vec<_> = if predictor.parallel() {
        unrated.par_iter().map(predict).collect()
    } else {
        unrated.iter().map(predict).collect()
    };

    // sort_by is stable, ties keep the matrix order
    recommendations.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    recommendations.truncate(n);

    log::debug!(
        "Ranked {} unrated items for {:?}, kept {}",
        unrated.len(),
        user,
        recommendations.len()
    );

    recommendations
}
