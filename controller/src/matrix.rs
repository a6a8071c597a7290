// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use crate::{error::ErrorKind, Key, Ratings, Triple, MAX_SCORE, MIN_SCORE};
use std::collections::HashMap;

/// Dense users x items table of ratings.
///
/// Rows and columns keep the order in which their keys were given, an
/// unobserved cell is `None`. Every stored rating lies in
/// `[MIN_SCORE, MAX_SCORE]`.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionMatrix<U, I>
where
    U: Key,
    I: Key,
{
    users: Vec<U>,
    items: Vec<I>,
    user_index: HashMap<U, usize>,
    item_index: HashMap<I, usize>,
    cells: Vec<Option<f64>>,
}

fn index_keys<K: Key>(keys: &[K]) -> Result<HashMap<K, usize>, ErrorKind> {
    let mut index = HashMap::with_capacity(keys.len());
    for (pos, key) in keys.iter().enumerate() {
        if index.insert(key.clone(), pos).is_some() {
            return Err(ErrorKind::DuplicatedKey(format!("{:?}", key)));
        }
    }

    Ok(index)
}

impl<U, I> InteractionMatrix<U, I>
where
    U: Key,
    I: Key,
{
    /// Create an empty (fully unobserved) matrix with the given row and column keys
    pub fn with_keys(users: Vec<U>, items: Vec<I>) -> Result<Self, ErrorKind> {
        let user_index = index_keys(&users)?;
        let item_index = index_keys(&items)?;
        let cells = vec![None; users.len() * items.len()];

        Ok(Self {
            users,
            items,
            user_index,
            item_index,
            cells,
        })
    }

    /// Pivot flat triples onto a fixed set of row and column keys.
    ///
    /// Keys without any triple stay in the matrix as fully unobserved rows
    /// or columns, a later triple for the same cell overwrites an earlier one.
    pub fn from_triples(
        users: Vec<U>,
        items: Vec<I>,
        triples: &[Triple<U, I>],
    ) -> Result<Self, ErrorKind> {
        let mut matrix = Self::with_keys(users, items)?;
        for triple in triples {
            matrix.insert(&triple.user, &triple.item, triple.rating)?;
        }

        Ok(matrix)
    }

    /// Store a rating, returns the rating previously held by the cell
    pub fn insert(&mut self, user: &U, item: &I, rating: f64) -> Result<Option<f64>, ErrorKind> {
        if !(MIN_SCORE..=MAX_SCORE).contains(&rating) {
            return Err(ErrorKind::RatingOutOfRange(rating, MIN_SCORE, MAX_SCORE));
        }

        let user_idx = self
            .user_index(user)
            .ok_or_else(|| ErrorKind::UnknownUser(format!("{:?}", user)))?;
        let item_idx = self
            .item_index(item)
            .ok_or_else(|| ErrorKind::UnknownItem(format!("{:?}", item)))?;

        let cell = self.cell_mut(user_idx, item_idx);
        Ok(cell.replace(rating))
    }

    fn cell_mut(&mut self, user_idx: usize, item_idx: usize) -> &mut Option<f64> {
        let n_items = self.items.len();
        &mut self.cells[user_idx * n_items + item_idx]
    }

    pub fn users(&self) -> &[U] {
        &self.users
    }

    pub fn items(&self) -> &[I] {
        &self.items
    }

    pub fn n_users(&self) -> usize {
        self.users.len()
    }

    pub fn n_items(&self) -> usize {
        self.items.len()
    }

    pub fn user_index(&self, user: &U) -> Option<usize> {
        self.user_index.get(user).copied()
    }

    pub fn item_index(&self, item: &I) -> Option<usize> {
        self.item_index.get(item).copied()
    }

    pub fn contains_user(&self, user: &U) -> bool {
        self.user_index.contains_key(user)
    }

    pub fn contains_item(&self, item: &I) -> bool {
        self.item_index.contains_key(item)
    }

    /// Rating of user for item, `None` if unobserved or if any key is unknown
    pub fn rating(&self, user: &U, item: &I) -> Option<f64> {
        self.rating_at(self.user_index(user)?, self.item_index(item)?)
    }

    /// Same as `rating` but by position, panics if out of bounds
    pub fn rating_at(&self, user_idx: usize, item_idx: usize) -> Option<f64> {
        self.row(user_idx)[item_idx]
    }

    /// All the cells of a user, in item order
    pub fn row(&self, user_idx: usize) -> &[Option<f64>] {
        let n_items = self.items.len();
        &self.cells[user_idx * n_items..(user_idx + 1) * n_items]
    }

    /// Observed `(item_idx, rating)` pairs of a user
    pub fn observed_in_row(&self, user_idx: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.row(user_idx)
            .iter()
            .enumerate()
            .filter_map(|(item_idx, cell)| cell.map(|rating| (item_idx, rating)))
    }

    /// Observed `(user_idx, rating)` pairs of an item
    pub fn observed_in_column(&self, item_idx: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        (0..self.users.len()).filter_map(move |user_idx| {
            self.rating_at(user_idx, item_idx)
                .map(|rating| (user_idx, rating))
        })
    }

    /// Positions of the items the user hasn't rated, in item order
    pub fn unrated_in_row(&self, user_idx: usize) -> impl Iterator<Item = usize> + '_ {
        self.row(user_idx)
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_none())
            .map(|(item_idx, _)| item_idx)
    }

    /// Every observed `(user_idx, item_idx, rating)`, row by row
    pub fn observed(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        (0..self.users.len()).flat_map(move |user_idx| {
            self.observed_in_row(user_idx)
                .map(move |(item_idx, rating)| (user_idx, item_idx, rating))
        })
    }

    pub fn n_observed(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// Fraction of unobserved cells, 1.0 for an empty matrix
    pub fn sparsity(&self) -> f64 {
        if self.cells.is_empty() {
            return 1.0;
        }

        1.0 - self.n_observed() as f64 / self.cells.len() as f64
    }

    /// Ratings of a user keyed by item
    pub fn user_ratings(&self, user: &U) -> Option<Ratings<I>> {
        let user_idx = self.user_index(user)?;
        let ratings = self
            .observed_in_row(user_idx)
            .map(|(item_idx, rating)| (self.items[item_idx].clone(), rating))
            .collect();

        Some(ratings)
    }
}
