// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use crate::{InteractionMatrix, Key, Means};

/// Arithmetic mean, `None` for an empty input
pub fn compute_mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let mut mean = None;
    let mut n = 0;

    for value in values {
        *mean.get_or_insert(0.0) += value;
        n += 1;
    }

    mean.map(|total| total / n as f64)
}

/// Mean of every user's observed ratings, users without ratings get 0.0
pub fn users_means<U, I>(matrix: &InteractionMatrix<U, I>) -> Means<U>
where
    U: Key,
    I: Key,
{
    matrix
        .users()
        .iter()
        .enumerate()
        .map(|(user_idx, user)| {
            let ratings = matrix.observed_in_row(user_idx).map(|(_, rating)| rating);
            (user.clone(), compute_mean(ratings).unwrap_or(0.0))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Triple;
    use anyhow::Error;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn mean_of_nothing_is_none() {
        assert!(compute_mean(Vec::<f64>::new()).is_none());
        assert_approx_eq!(compute_mean(vec![1.0, 2.0, 4.5]).unwrap(), 2.5);
    }

    #[test]
    fn users_without_ratings_get_zero() -> Result<(), Error> {
        let matrix = InteractionMatrix::from_triples(
            vec![1, 2],
            vec![10, 20],
            &[Triple::new(1, 10, 4.0), Triple::new(1, 20, 5.0)],
        )?;

        let means = users_means(&matrix);
        assert_approx_eq!(means[&1], 4.5);
        assert_approx_eq!(means[&2], 0.0);

        Ok(())
    }
}
