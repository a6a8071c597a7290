// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

pub mod items;
pub mod users;

pub use items::ItemBased;
pub use users::UserBased;

use crate::{knn::Neighbor, recommender::Recommendation};
use controller::{InteractionMatrix, Key};

/// Shared capability of both neighborhood strategies.
///
/// `predict` never fails: cold-start cases resolve to a fallback score, and
/// the result always lies in the valid score range.
pub trait Predictor {
    type UserId: Key;
    type ItemId: Key;

    /// Estimate the rating `user` would give to `item`
    fn predict(&self, user: &Self::UserId, item: &Self::ItemId) -> f64;

    /// The matrix this predictor was fitted on
    fn matrix(&self) -> &InteractionMatrix<Self::UserId, Self::ItemId>;

    /// Whether bulk callers should spread predictions over the rayon pool
    fn parallel(&self) -> bool {
        false
    }

    /// Top `n` unrated items for `user`, best first
    fn recommend(&self, user: &Self::UserId, n: usize) -> Vec<Recommendation<Self::ItemId>>
    where
        Self: Sized + Sync,
    {
        crate::recommender::recommend(self, user, n)
    }
}

/// Similarity-weighted average of `value(neighbor)`.
///
/// Returns `None` when there's nothing to aggregate: no neighbors, a
/// selection whose similarities add up to zero, or no neighbor with a
/// strictly positive similarity. Only positive similarities contribute.
pub(crate) fn weighted_average<F>(neighbors: &[Neighbor], value: F) -> Option<f64>
where
    F: Fn(&Neighbor) -> f64,
{
    if neighbors.is_empty() {
        return None;
    }

    let total: f64 = neighbors.iter().map(|n| n.similarity).sum();
    if total == 0.0 {
        return None;
    }

    let mut numerator = 0.0;
    let mut denominator = 0.0;

    for neighbor in neighbors.iter().filter(|n| n.similarity > 0.0) {
        numerator += neighbor.similarity * value(neighbor);
        denominator += neighbor.similarity.abs();
    }

    if denominator == 0.0 {
        None
    } else {
        Some(numerator / denominator)
    }
}
