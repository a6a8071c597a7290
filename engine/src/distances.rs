#![allow(clippy::implicit_hasher)]

use crate::utils::common_keys;
use controller::Ratings;
use num_traits::float::Float;
use std::{hash::Hash, ops::AddAssign};

/// Euclidean norm of the observed values
pub fn norm<K, V>(a: &Ratings<K, V>) -> Option<V>
where
    K: Hash + Eq,
    V: Float + AddAssign,
{
    let mut norm = None;
    for x in a.values() {
        *norm.get_or_insert_with(V::zero) += x.powi(2);
    }

    norm.map(V::sqrt)
}

/// Cosine similarity between two sparse vectors.
///
/// Missing keys count as zeros: the dot product only runs over common keys
/// but each norm runs over every value of its own vector. Returns `None`
/// if any of the vectors is empty or has a zero norm.
pub fn cosine_similarity<K, V>(a: &Ratings<K, V>, b: &Ratings<K, V>) -> Option<V>
where
    K: Hash + Eq,
    V: Float + AddAssign,
{
    let a_norm = norm(a)?;
    let b_norm = norm(b)?;

    let mut dot = V::zero();
    for (_, (x, y)) in common_keys(a, b) {
        dot += *x * *y;
    }

    let similarity = dot / (a_norm * b_norm);
    Some(similarity).filter(|s| s.is_finite())
}
