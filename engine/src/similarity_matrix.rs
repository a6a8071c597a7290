// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use crate::distances::cosine_similarity;
use controller::{InteractionMatrix, Key, Ratings};
use rayon::prelude::*;
use std::time::Instant;

/// Which side of the interaction matrix is compared
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Axis {
    Users,
    Items,
}

/// Symmetric cosine similarity matrix over the active entities of an axis.
///
/// Entities are addressed by their position on the interaction matrix axis.
/// An entity is active when it has at least one observed rating, inactive
/// ones are not part of the matrix at all.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    axis: Axis,
    active: Vec<usize>,
    slots: Vec<Option<usize>>,
    values: Vec<f64>,
}

/// Read-only view over one row of a `SimilarityMatrix`
#[derive(Debug, Clone, Copy)]
pub struct SimilarityRow<'a> {
    slots: &'a [Option<usize>],
    values: &'a [f64],
}

impl SimilarityRow<'_> {
    /// Similarity with the entity at `other`, `None` if it isn't active
    pub fn get(&self, other: usize) -> Option<f64> {
        let slot = (*self.slots.get(other)?)?;
        Some(self.values[slot])
    }
}

fn axis_vectors<U, I>(matrix: &InteractionMatrix<U, I>, axis: Axis) -> Vec<Ratings<usize>>
where
    U: Key,
    I: Key,
{
    match axis {
        Axis::Users => (0..matrix.n_users())
            .map(|user_idx| matrix.observed_in_row(user_idx).collect())
            .collect(),
        Axis::Items => (0..matrix.n_items())
            .map(|item_idx| matrix.observed_in_column(item_idx).collect())
            .collect(),
    }
}

impl SimilarityMatrix {
    /// Compute the similarity between every pair of active entities on `axis`.
    ///
    /// Unobserved cells count as zeros in each vector. Only the upper
    /// triangle is computed, then mirrored, so the result is exactly
    /// symmetric; the diagonal is 1. This is O(k^2 * d) for k active
    /// entities of dimension d, and rows are spread over the rayon pool
    /// when `parallel` is set.
    pub fn fit<U, I>(matrix: &InteractionMatrix<U, I>, axis: Axis, parallel: bool) -> Self
    where
        U: Key,
        I: Key,
    {
        let now = Instant::now();

        let vectors = axis_vectors(matrix, axis);
        let mut slots = vec![None; vectors.len()];
        let mut active = Vec::new();

        for (idx, vector) in vectors.iter().enumerate() {
            if !vector.is_empty() {
                slots[idx] = Some(active.len());
                active.push(idx);
            }
        }

        log::info!(
            "Calculating similarity for {} active {:?} out of {}",
            active.len(),
            axis,
            vectors.len()
        );

        let k = active.len();
        let upper_row = |a: usize| -> Vec<f64> {
            let vec_a = &vectors[active[a]];
            (a + 1..k)
                .map(|b| cosine_similarity(vec_a, &vectors[active[b]]).unwrap_or(0.0))
                .collect()
        };

        let upper: Vec<Vec<f64>> = if parallel {
            (0..k).into_par_iter().map(upper_row).collect()
        } else {
            (0..k).map(upper_row).collect()
        };

        let mut values = vec![0.0; k * k];
        for (a, row) in upper.into_iter().enumerate() {
            values[a * k + a] = 1.0;
            for (offset, similarity) in row.into_iter().enumerate() {
                let b = a + 1 + offset;
                values[a * k + b] = similarity;
                values[b * k + a] = similarity;
            }
        }

        log::debug!(
            "Similarity matrix ({}x{}) took {:.3}s",
            k,
            k,
            now.elapsed().as_secs_f64()
        );

        Self {
            axis,
            active,
            slots,
            values,
        }
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Number of active entities
    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Axis positions of the active entities, in axis order
    pub fn active(&self) -> &[usize] {
        &self.active
    }

    pub fn contains(&self, idx: usize) -> bool {
        self.slot(idx).is_some()
    }

    fn slot(&self, idx: usize) -> Option<usize> {
        *self.slots.get(idx)?
    }

    /// Similarity row of the entity at `idx`, `None` if it isn't active
    pub fn row(&self, idx: usize) -> Option<SimilarityRow<'_>> {
        let k = self.active.len();
        let slot = self.slot(idx)?;

        Some(SimilarityRow {
            slots: &self.slots,
            values: &self.values[slot * k..(slot + 1) * k],
        })
    }

    pub fn get(&self, a: usize, b: usize) -> Option<f64> {
        self.row(a)?.get(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Error;
    use assert_approx_eq::assert_approx_eq;
    use controller::Triple;

    // u3 has no ratings, item "d" has no raters
    fn matrix() -> Result<InteractionMatrix<&'static str, &'static str>, Error> {
        let matrix = InteractionMatrix::from_triples(
            vec!["u1", "u2", "u3", "u4"],
            vec!["a", "b", "c", "d"],
            &[
                Triple::new("u1", "a", 5.0),
                Triple::new("u1", "b", 3.0),
                Triple::new("u2", "a", 4.0),
                Triple::new("u2", "c", 1.0),
                Triple::new("u4", "b", 2.0),
                Triple::new("u4", "c", 5.0),
            ],
        )?;

        Ok(matrix)
    }

    #[test]
    fn inactive_entities_are_excluded() -> Result<(), Error> {
        let matrix = matrix()?;

        let users = SimilarityMatrix::fit(&matrix, Axis::Users, false);
        assert_eq!(users.active(), &[0, 1, 3]);
        assert!(!users.contains(2));
        assert!(users.row(2).is_none());
        assert!(users.get(0, 2).is_none());

        let items = SimilarityMatrix::fit(&matrix, Axis::Items, false);
        assert_eq!(items.len(), 3);
        assert!(!items.contains(3));

        Ok(())
    }

    #[test]
    fn symmetric_with_unit_diagonal() -> Result<(), Error> {
        let matrix = matrix()?;

        for &axis in &[Axis::Users, Axis::Items] {
            let sim = SimilarityMatrix::fit(&matrix, axis, false);
            for &a in sim.active() {
                assert_eq!(sim.get(a, a), Some(1.0));
                for &b in sim.active() {
                    assert_eq!(sim.get(a, b), sim.get(b, a));
                }
            }
        }

        Ok(())
    }

    #[test]
    fn cosine_values() -> Result<(), Error> {
        let matrix = matrix()?;
        let sim = SimilarityMatrix::fit(&matrix, Axis::Users, false);

        // u1 = [5, 3, 0, 0], u2 = [4, 0, 1, 0]
        let expected = 20.0 / (34f64.sqrt() * 17f64.sqrt());
        assert_approx_eq!(sim.get(0, 1).unwrap(), expected);

        // u2 = [4, 0, 1, 0], u4 = [0, 2, 5, 0]
        let expected = 5.0 / (17f64.sqrt() * 29f64.sqrt());
        assert_approx_eq!(sim.get(1, 3).unwrap(), expected);

        Ok(())
    }

    #[test]
    fn parallel_matches_sequential() -> Result<(), Error> {
        let matrix = matrix()?;

        assert_eq!(
            SimilarityMatrix::fit(&matrix, Axis::Users, true),
            SimilarityMatrix::fit(&matrix, Axis::Users, false)
        );
        assert_eq!(
            SimilarityMatrix::fit(&matrix, Axis::Items, true),
            SimilarityMatrix::fit(&matrix, Axis::Items, false)
        );

        Ok(())
    }

    #[test]
    fn empty_matrix() -> Result<(), Error> {
        let matrix = InteractionMatrix::<u32, u32>::with_keys(vec![1, 2], vec![1])?;
        let sim = SimilarityMatrix::fit(&matrix, Axis::Items, false);

        assert!(sim.is_empty());
        assert!(sim.row(0).is_none());

        Ok(())
    }
}
