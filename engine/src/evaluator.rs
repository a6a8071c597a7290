// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use crate::{error::ErrorKind, predictor::Predictor};
use anyhow::Error;
use controller::Triple;
use rayon::prelude::*;

/// Accuracy of a model over a held-out set
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub rmse: f64,
    pub mae: f64,
    pub count: usize,
}

impl Evaluation {
    /// Aggregate `(predicted, actual)` pairs, `None` if there are none
    pub fn from_pairs(pairs: impl IntoIterator<Item = (f64, f64)>) -> Option<Self> {
        let mut squared = 0.0;
        let mut absolute = 0.0;
        let mut count = 0;

        for (predicted, actual) in pairs {
            let error = predicted - actual;
            squared += error * error;
            absolute += error.abs();
            count += 1;
        }

        if count == 0 {
            return None;
        }

        Some(Self {
            rmse: (squared / count as f64).sqrt(),
            mae: absolute / count as f64,
            count,
        })
    }
}

/// Predict every triple and measure the error against its actual rating.
///
/// No triple is skipped: predictions that came from a cold-start fallback
/// count as much as any other.
pub fn evaluate<P>(model: &P, triples: &[Triple<P::UserId, P::ItemId>]) -> Result<Evaluation, Error>
where
    P: Predictor + Sync,
{
    log::info!("Evaluating model performance on {} ratings...", triples.len());

    let predict = |triple: &Triple<P::UserId, P::ItemId>| model.predict(&triple.user, &triple.item);
    let predictions: Vec<f64> = if model.parallel() {
        triples.par_iter().map(predict).collect()
    } else {
        triples.iter().map(predict).collect()
    };

    let pairs = predictions
        .into_iter()
        .zip(triples.iter().map(|triple| triple.rating));
    let evaluation = Evaluation::from_pairs(pairs).ok_or(ErrorKind::EmptyTestSet)?;

    log::info!("RMSE: {:.4}", evaluation.rmse);
    log::info!("MAE: {:.4}", evaluation.mae);

    Ok(evaluation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predictor::ItemBased;
    use anyhow::Error;
    use assert_approx_eq::assert_approx_eq;
    use config::EngineConfig;
    use controller::InteractionMatrix;

    struct ConstantPredictor {
        matrix: InteractionMatrix<&'static str, &'static str>,
        score: f64,
        parallel: bool,
    }

    impl Predictor for ConstantPredictor {
        type UserId = &'static str;
        type ItemId = &'static str;

        fn predict(&self, _user: &&'static str, _item: &&'static str) -> f64 {
            self.score
        }

        fn matrix(&self) -> &InteractionMatrix<&'static str, &'static str> {
            &self.matrix
        }

        fn parallel(&self) -> bool {
            self.parallel
        }
    }

    fn constant(score: f64, parallel: bool) -> Result<ConstantPredictor, Error> {
        Ok(ConstantPredictor {
            matrix: InteractionMatrix::with_keys(vec!["u1"], vec!["i1", "i2"])?,
            score,
            parallel,
        })
    }

    #[test]
    fn constant_predictor_errors() -> Result<(), Error> {
        let triples = vec![Triple::new("u1", "i1", 4.0), Triple::new("u1", "i2", 2.0)];

        let evaluation = evaluate(&constant(3.0, false)?, &triples)?;
        assert_approx_eq!(evaluation.rmse, 1.0);
        assert_approx_eq!(evaluation.mae, 1.0);
        assert_eq!(evaluation.count, 2);

        Ok(())
    }

    #[test]
    fn rmse_weighs_large_errors() -> Result<(), Error> {
        let triples = vec![
            Triple::new("u1", "i1", 5.0),
            Triple::new("u1", "i2", 2.0),
            Triple::new("u1", "i2", 2.0),
            Triple::new("u1", "i2", 2.0),
        ];

        // errors are -3, 0, 0, 0
        let evaluation = evaluate(&constant(2.0, false)?, &triples)?;
        assert_approx_eq!(evaluation.mae, 0.75);
        assert_approx_eq!(evaluation.rmse, 1.5);

        Ok(())
    }

    #[test]
    fn unknown_pairs_still_count() -> Result<(), Error> {
        let triples = vec![
            Triple::new("u1", "i1", 4.0),
            Triple::new("ghost", "nowhere", 1.0),
        ];

        let evaluation = evaluate(&constant(4.0, false)?, &triples)?;
        assert_eq!(evaluation.count, 2);
        assert_approx_eq!(evaluation.mae, 1.5);

        Ok(())
    }

    #[test]
    fn empty_test_set() -> Result<(), Error> {
        let result = evaluate(&constant(3.0, false)?, &[]);
        assert!(result.is_err());
        assert!(Evaluation::from_pairs(Vec::<(f64, f64)>::new()).is_none());

        Ok(())
    }

    #[test]
    fn parallel_matches_sequential() -> Result<(), Error> {
        let matrix = InteractionMatrix::from_triples(
            vec!["a", "b", "c"],
            vec!["x", "y", "z"],
            &[
                Triple::new("a", "x", 5.0),
                Triple::new("a", "y", 3.0),
                Triple::new("b", "x", 4.0),
                Triple::new("b", "z", 2.0),
                Triple::new("c", "y", 1.0),
                Triple::new("c", "z", 4.0),
            ],
        )?;

        let triples = vec![
            Triple::new("a", "z", 3.0),
            Triple::new("b", "y", 4.0),
            Triple::new("c", "x", 2.0),
            Triple::new("d", "x", 5.0),
        ];

        let mut config = EngineConfig {
            neighbor_count: 2,
            parallel: false,
            ..Default::default()
        };
        let sequential = evaluate(&ItemBased::fit(&matrix, &config)?, &triples)?;

        config.parallel = true;
        let parallel = evaluate(&ItemBased::fit(&matrix, &config)?, &triples)?;

        assert_eq!(sequential, parallel);

        Ok(())
    }
}
