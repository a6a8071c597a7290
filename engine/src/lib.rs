// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

pub mod distances;
pub mod error;
pub mod evaluator;
pub mod knn;
pub mod predictor;
pub mod recommender;
pub mod similarity_matrix;
pub mod utils;

pub use evaluator::{evaluate, Evaluation};
pub use predictor::{ItemBased, Predictor, UserBased};
pub use recommender::{recommend, Recommendation};
pub use similarity_matrix::{Axis, SimilarityMatrix};

use anyhow::Error;
use config::{EngineConfig, Strategy};
use controller::{InteractionMatrix, Key, Means, Triple};

/// A fitted model of either strategy
#[derive(Debug, Clone)]
pub enum Model<'a, U, I>
where
    U: Key,
    I: Key,
{
    UserBased(UserBased<'a, U, I>),
    ItemBased(ItemBased<'a, U, I>),
}

impl<U, I> Model<'_, U, I>
where
    U: Key,
    I: Key,
{
    pub fn strategy(&self) -> Strategy {
        match self {
            Model::UserBased(_) => Strategy::UserBased,
            Model::ItemBased(_) => Strategy::ItemBased,
        }
    }

    pub fn similarity(&self) -> &SimilarityMatrix {
        match self {
            Model::UserBased(model) => model.similarity(),
            Model::ItemBased(model) => model.similarity(),
        }
    }
}

impl<U, I> Predictor for Model<'_, U, I>
where
    U: Key,
    I: Key,
{
    type UserId = U;
    type ItemId = I;

    fn predict(&self, user: &U, item: &I) -> f64 {
        match self {
            Model::UserBased(model) => model.predict(user, item),
            Model::ItemBased(model) => model.predict(user, item),
        }
    }

    fn matrix(&self) -> &InteractionMatrix<U, I> {
        match self {
            Model::UserBased(model) => model.matrix(),
            Model::ItemBased(model) => model.matrix(),
        }
    }

    fn parallel(&self) -> bool {
        match self {
            Model::UserBased(model) => model.parallel(),
            Model::ItemBased(model) => model.parallel(),
        }
    }
}

/// Entry point of the crate: fits the configured strategy over a borrowed
/// interaction matrix and answers predictions, recommendations and
/// evaluations against it.
#[derive(Debug, Clone)]
pub struct Engine<'a, U, I>
where
    U: Key,
    I: Key,
{
    model: Model<'a, U, I>,
    recommendation_count: usize,
}

impl<'a, U, I> Engine<'a, U, I>
where
    U: Key,
    I: Key,
{
    /// Fit the strategy named in `config`.
    ///
    /// Precomputed `means` are only used by the user-based strategy.
    pub fn fit(
        matrix: &'a InteractionMatrix<U, I>,
        means: Option<Means<U>>,
        config: &EngineConfig,
    ) -> Result<Self, Error> {
        log::debug!(
            "Fitting {} over {} users and {} items (K = {})",
            config.strategy,
            matrix.n_users(),
            matrix.n_items(),
            config.neighbor_count
        );

        let model = match config.strategy {
            Strategy::UserBased => Model::UserBased(UserBased::fit(matrix, means, config)?),
            Strategy::ItemBased => {
                if means.is_some() {
                    log::debug!("Item-based model ignores the precomputed means");
                }

                Model::ItemBased(ItemBased::fit(matrix, config)?)
            }
        };

        Ok(Self {
            model,
            recommendation_count: config.recommendation_count,
        })
    }

    pub fn model(&self) -> &Model<'a, U, I> {
        &self.model
    }

    pub fn strategy(&self) -> Strategy {
        self.model.strategy()
    }

    pub fn predict(&self, user: &U, item: &I) -> f64 {
        self.model.predict(user, item)
    }

    /// Top `recommendation_count` unrated items for `user`
    pub fn recommend(&self, user: &U) -> Vec<Recommendation<I>> {
        self.recommend_n(user, self.recommendation_count)
    }

    pub fn recommend_n(&self, user: &U, n: usize) -> Vec<Recommendation<I>> {
        recommender::recommend(&self.model, user, n)
    }

    pub fn evaluate(&self, triples: &[Triple<U, I>]) -> Result<Evaluation, Error> {
        evaluator::evaluate(&self.model, triples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Error;
    use assert_approx_eq::assert_approx_eq;
    use common_macros::hash_map;

    fn matrix() -> Result<InteractionMatrix<u32, &'static str>, Error> {
        let matrix = InteractionMatrix::from_triples(
            vec![1, 2, 3],
            vec!["heat", "ronin", "thief", "collateral"],
            &[
                Triple::new(1, "heat", 5.0),
                Triple::new(1, "ronin", 4.0),
                Triple::new(2, "heat", 4.0),
                Triple::new(2, "ronin", 5.0),
                Triple::new(2, "thief", 3.0),
                Triple::new(3, "thief", 2.0),
                Triple::new(3, "collateral", 4.0),
            ],
        )?;

        Ok(matrix)
    }

    fn config(strategy: Strategy) -> EngineConfig {
        EngineConfig {
            neighbor_count: 10,
            strategy,
            recommendation_count: 1,
            parallel: false,
        }
    }

    #[test]
    fn fits_the_configured_strategy() -> Result<(), Error> {
        let matrix = matrix()?;

        let engine = Engine::fit(&matrix, None, &config(Strategy::UserBased))?;
        assert_eq!(engine.strategy(), Strategy::UserBased);
        assert_eq!(engine.model().similarity().axis(), Axis::Users);

        let engine = Engine::fit(&matrix, None, &config(Strategy::ItemBased))?;
        assert_eq!(engine.strategy(), Strategy::ItemBased);
        assert_eq!(engine.model().similarity().axis(), Axis::Items);

        Ok(())
    }

    #[test]
    fn invalid_config_fails_at_fit() -> Result<(), Error> {
        let matrix = matrix()?;
        let mut config = config(Strategy::ItemBased);
        config.neighbor_count = 0;

        assert!(Engine::fit(&matrix, None, &config).is_err());

        Ok(())
    }

    #[test]
    fn delegates_to_the_model() -> Result<(), Error> {
        let matrix = matrix()?;
        let config = config(Strategy::UserBased);

        let engine = Engine::fit(&matrix, None, &config)?;
        let model = UserBased::fit(&matrix, None, &config)?;

        for user in &[1, 2, 3, 4] {
            for item in matrix.items() {
                assert_approx_eq!(engine.predict(user, item), model.predict(user, item));
            }
        }

        Ok(())
    }

    #[test]
    fn recommends_configured_count() -> Result<(), Error> {
        let matrix = matrix()?;
        let engine = Engine::fit(&matrix, None, &config(Strategy::ItemBased))?;

        assert_eq!(engine.recommend(&1).len(), 1);
        assert_eq!(engine.recommend_n(&1, 10).len(), 2);
        assert!(engine.recommend_n(&1, 0).is_empty());
        assert!(engine.recommend(&42).is_empty());

        Ok(())
    }

    #[test]
    fn means_are_forwarded_to_user_based() -> Result<(), Error> {
        let matrix = matrix()?;
        let means = hash_map! { 1 => 2.0, 2 => 4.0, 3 => 3.0 };

        let engine = Engine::fit(&matrix, Some(means), &config(Strategy::UserBased))?;

        // unknown item, so the prediction is the supplied mean
        assert_approx_eq!(engine.predict(&1, &"manhunter"), 2.0);

        Ok(())
    }

    #[test]
    fn evaluates_both_strategies() -> Result<(), Error> {
        let matrix = matrix()?;
        let triples = vec![
            Triple::new(1, "thief", 3.0),
            Triple::new(3, "heat", 2.0),
            Triple::new(9, "heat", 4.0),
        ];

        for strategy in &[Strategy::UserBased, Strategy::ItemBased] {
            let engine = Engine::fit(&matrix, None, &config(*strategy))?;
            let evaluation = engine.evaluate(&triples)?;

            assert_eq!(evaluation.count, 3);
            assert!(evaluation.rmse + 1e-9 >= evaluation.mae);
            assert!(evaluation.mae <= 4.0);
        }

        assert!(Engine::fit(&matrix, None, &config(Strategy::UserBased))?
            .evaluate(&[])
            .is_err());

        Ok(())
    }

    #[test]
    fn huge_neighbor_count_predicts() -> Result<(), Error> {
        let matrix = matrix()?;

        for strategy in &[Strategy::UserBased, Strategy::ItemBased] {
            let config = EngineConfig {
                neighbor_count: usize::MAX,
                ..config(*strategy)
            };

            let engine = Engine::fit(&matrix, None, &config)?;
            for item in matrix.items() {
                let predicted = engine.predict(&1, item);
                assert!((1.0..=5.0).contains(&predicted));
            }
            assert_eq!(engine.recommend_n(&3, 10).len(), 2);
        }

        Ok(())
    }
}
