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
use controller::{compute_mean, users_means, InteractionMatrix, Key, Means, NEUTRAL_SCORE};

/// User-based neighborhood model with mean-centering.
///
/// A prediction for (u, i) looks at the users most similar to `u` that
/// rated `i` and averages how far each of them rated `i` from their own
/// mean, weighted by similarity.
#[derive(Debug, Clone)]
pub struct UserBased<'a, U, I>
where
    U: Key,
    I: Key,
{
    matrix: &'a InteractionMatrix<U, I>,
    similarity: SimilarityMatrix,
    means: Vec<f64>,
    global_mean: f64,
    neighbor_count: usize,
    parallel: bool,
}

impl<'a, U, I> UserBased<'a, U, I>
where
    U: Key,
    I: Key,
{
    /// Fit the user similarity matrix.
    ///
    /// When `means` is given it is used as is, users it doesn't cover get
    /// their mean computed from the matrix.
    pub fn fit(
        matrix: &'a InteractionMatrix<U, I>,
        means: Option<Means<U>>,
        config: &EngineConfig,
    ) -> Result<Self, Error> {
        config.validate()?;
        log::info!("Training User-Based Collaborative Filtering...");

        let computed = users_means(matrix);
        let (means, extra): (Vec<f64>, Vec<f64>) = match means {
            Some(supplied) => {
                let missing = matrix
                    .users()
                    .iter()
                    .filter(|user| !supplied.contains_key(*user))
                    .count();

                if missing > 0 {
                    log::warn!("{} users have no precomputed mean, computing them", missing);
                }

                let means = matrix
                    .users()
                    .iter()
                    .map(|user| supplied.get(user).or_else(|| computed.get(user)).copied())
                    .map(|mean| mean.unwrap_or(0.0))
                    .collect();

                // supplied users outside the matrix still count for the global mean
                let extra = supplied
                    .iter()
                    .filter(|(user, _)| !matrix.contains_user(user))
                    .map(|(_, mean)| *mean)
                    .collect();

                (means, extra)
            }
            None => {
                let means = matrix
                    .users()
                    .iter()
                    .map(|user| computed.get(user).copied().unwrap_or(0.0))
                    .collect();

                (means, Vec::new())
            }
        };

        let global_mean =
            compute_mean(means.iter().copied().chain(extra)).unwrap_or(NEUTRAL_SCORE);

        let similarity = SimilarityMatrix::fit(matrix, Axis::Users, config.parallel);
        log::info!("User-Based CF model trained successfully!");

        Ok(Self {
            matrix,
            similarity,
            means,
            global_mean,
            neighbor_count: config.neighbor_count,
            parallel: config.parallel,
        })
    }

    pub fn similarity(&self) -> &SimilarityMatrix {
        &self.similarity
    }

    /// Mean rating of `user` as used by the model
    pub fn user_mean(&self, user: &U) -> Option<f64> {
        self.matrix
            .user_index(user)
            .map(|user_idx| self.means[user_idx])
    }

    /// Mean of every known users mean, returned for unknown users
    pub fn global_mean(&self) -> f64 {
        self.global_mean
    }

    fn neighborhood_estimate(&self, user_idx: usize, item_idx: usize) -> Option<f64> {
        let row = self.similarity.row(user_idx)?;

        let raters = self
            .matrix
            .observed_in_column(item_idx)
            .filter(|(other, _)| *other != user_idx)
            .filter_map(|(other, rating)| Some((other, row.get(other)?, rating)));

        let neighbors = top_k(self.neighbor_count, raters);
        let deviation = weighted_average(&neighbors, |n| n.rating - self.means[n.index])?;

        Some(self.means[user_idx] + deviation)
    }
}

impl<U, I> Predictor for UserBased<'_, U, I>
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

        let mean = self.means[user_idx];
        let estimate = self
            .matrix
            .item_index(item)
            .and_then(|item_idx| self.neighborhood_estimate(user_idx, item_idx));

        clamp_score(estimate.unwrap_or(mean))
    }

    fn matrix(&self) -> &InteractionMatrix<U, I> {
        self.matrix
    }

    fn parallel(&self) -> bool {
        self.parallel
    }
}
