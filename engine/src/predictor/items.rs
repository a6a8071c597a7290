// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use super::{weighted_average, Predictor};
use crate::{
    knn::top_k,
    similarity_matrix::{Axis, SimilarityMatrix},
    utils::clamp_score,
};
use anyhow::Error;
use config::EngineConfig;
use controller::{compute_mean, InteractionMatrix, Key, NEUTRAL_SCORE};

/// Item-based neighborhood model.
///
/// A prediction for (u, i) is the similarity-weighted average of the
/// ratings `u` gave to the items most similar to `i`. There's no
/// mean-centering here.
#[derive(Debug, Clone)]
pub struct ItemBased<'a, U, I>
where
    U: Key,
    I: Key,
{
    matrix: &'a InteractionMatrix<U, I>,
    similarity: SimilarityMatrix,
    user_means: Vec<Option<f64>>,
    global_mean: f64,
    neighbor_count: usize,
    parallel: bool,
}

impl<'a, U, I> ItemBased<'a, U, I>
where
    U: Key,
    I: Key,
{
    /// Fit the item similarity matrix
    pub fn fit(matrix: &'a InteractionMatrix<U, I>, config: &EngineConfig) -> Result<Self, Error> {
        config.validate()?;
        log::info!("Training Item-Based Collaborative Filtering...");

        let user_means = (0..matrix.n_users())
            .map(|user_idx| {
                compute_mean(matrix.observed_in_row(user_idx).map(|(_, rating)| rating))
            })
            .collect();

        let global_mean =
            compute_mean(matrix.observed().map(|(_, _, rating)| rating)).unwrap_or(NEUTRAL_SCORE);

        let similarity = SimilarityMatrix::fit(matrix, Axis::Items, config.parallel);
        log::info!("Item-Based CF model trained successfully!");

        Ok(Self {
            matrix,
            similarity,
            user_means,
            global_mean,
            neighbor_count: config.neighbor_count,
            parallel: config.parallel,
        })
    }

    pub fn similarity(&self) -> &SimilarityMatrix {
        &self.similarity
    }

    /// Mean over every observed rating, returned for unknown users
    pub fn global_mean(&self) -> f64 {
        self.global_mean
    }

    /// Score used when the neighborhood can't say anything about a user
    fn fallback_at(&self, user_idx: usize) -> f64 {
        self.user_means[user_idx].unwrap_or(NEUTRAL_SCORE)
    }

    fn neighborhood_estimate(&self, user_idx: usize, item_idx: usize) -> Option<f64> {
        let row = self.similarity.row(item_idx)?;

        let rated = self
            .matrix
            .observed_in_row(user_idx)
            .filter(|(other, _)| *other != item_idx)
            .filter_map(|(other, rating)| Some((other, row.get(other)?, rating)));

        let neighbors = top_k(self.neighbor_count, rated);
        weighted_average(&neighbors, |n| n.rating)
    }
}

impl<U, I> Predictor for ItemBased<'_, U, I>
where
    U: Key,
    I: Key,
{
    type UserId = U;
    type ItemId = I;

    fn predict(&self, user: &U, item: &I) -> f64 {
        let user_idx = match self.matrix.user_index(user) {
            Some(user_idx) => user_idx,
            None => return clamp_score(self.global_mean),
        };

        let estimate = self
            .matrix
            .item_index(item)
            .and_then(|item_idx| self.neighborhood_estimate(user_idx, item_idx));

        clamp_score(estimate.unwrap_or_else(|| self.fallback_at(user_idx)))
    }

    fn matrix(&self) -> &InteractionMatrix<U, I> {
        self.matrix
    }

    fn parallel(&self) -> bool {
        self.parallel
    }
}
