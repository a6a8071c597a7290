// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

pub mod error;
pub mod matrix;
pub mod means;
pub mod split;

use anyhow::Error;
use std::{collections::HashMap, fmt::Debug, hash::Hash};

pub use matrix::InteractionMatrix;
pub use means::{compute_mean, users_means};
pub use split::train_test_split;

pub type Result<T> = std::result::Result<T, Error>;
pub type Means<K, Value = f64> = HashMap<K, Value>;
pub type Ratings<I, Value = f64> = HashMap<I, Value>;

/// Lowest valid score
pub const MIN_SCORE: f64 = 1.0;

/// Highest valid score
pub const MAX_SCORE: f64 = 5.0;

/// Midpoint of the score range, used when nothing is known about a user
pub const NEUTRAL_SCORE: f64 = (MIN_SCORE + MAX_SCORE) / 2.0;

/// Anything usable as a user or item identifier
pub trait Key: Hash + Eq + Clone + Debug + Send + Sync {}

impl<T> Key for T where T: Hash + Eq + Clone + Debug + Send + Sync {}

/// A single observed (user, item, rating) record
#[derive(Debug, Clone, PartialEq)]
pub struct Triple<U, I> {
    pub user: U,
    pub item: I,
    pub rating: f64,
}

impl<U, I> Triple<U, I> {
    pub fn new(user: U, item: I, rating: f64) -> Self {
        Self { user, item, rating }
    }
}

/// A data source that feeds the engine.
///
/// Implementors own acquisition, cleaning and pivoting; the engine only
/// ever sees the in-memory structures returned here.
pub trait Controller {
    type UserId: Key;
    type ItemId: Key;

    /// Get the full interaction matrix, every known user and item included
    fn interaction_matrix(&self) -> Result<InteractionMatrix<Self::UserId, Self::ItemId>>;

    /// Get the precomputed means for users, if the source provides them
    fn users_means(&self) -> Result<Option<Means<Self::UserId>>> {
        Ok(None)
    }

    /// Get every observed rating as a flat list of triples
    fn ratings(&self) -> Result<Vec<Triple<Self::UserId, Self::ItemId>>>;
}
