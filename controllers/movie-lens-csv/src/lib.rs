// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use anyhow::Error;
use config::DataConfig;
use controller::{error::ErrorKind, Controller, InteractionMatrix, Means, Triple};
use serde::Deserialize;
use std::{
    io::Read,
    path::{Path, PathBuf},
};

pub type UserId = String;
pub type ItemId = String;

#[derive(Debug, Clone, Deserialize)]
struct RatingRow {
    user_id: UserId,
    item_id: ItemId,
    rating: f64,
}

#[derive(Debug, Clone, Deserialize)]
struct MeanRow {
    user_id: UserId,
    mean_rating: f64,
}

/// Reads the preprocessed MovieLens exports.
///
/// Nothing is cached, every call goes back to disk.
#[derive(Debug, Clone)]
pub struct MovieLensCsvController {
    matrix_path: PathBuf,
    ratings_path: PathBuf,
    means_path: Option<PathBuf>,
}

impl MovieLensCsvController {
    pub fn new(
        matrix_path: impl Into<PathBuf>,
        ratings_path: impl Into<PathBuf>,
        means_path: Option<PathBuf>,
    ) -> Self {
        Self {
            matrix_path: matrix_path.into(),
            ratings_path: ratings_path.into(),
            means_path,
        }
    }

    pub fn from_config(config: &DataConfig) -> Self {
        Self::new(&config.matrix, &config.ratings, config.means.clone())
    }
}

impl Controller for MovieLensCsvController {
    type UserId = UserId;
    type ItemId = ItemId;

    fn interaction_matrix(&self) -> Result<InteractionMatrix<UserId, ItemId>, Error> {
        log::info!("Loading interaction matrix from {}", self.matrix_path.display());
        let reader = csv::Reader::from_path(&self.matrix_path)?;
        read_matrix(reader)
    }

    fn users_means(&self) -> Result<Option<Means<UserId>>, Error> {
        let path = match &self.means_path {
            Some(path) => path,
            None => return Ok(None),
        };

        if !path.exists() {
            log::warn!("Means file {} not found, they will be computed", path.display());
            return Ok(None);
        }

        log::info!("Loading users means from {}", path.display());
        let reader = csv::Reader::from_path(path)?;
        read_means(reader).map(Some)
    }

    fn ratings(&self) -> Result<Vec<Triple<UserId, ItemId>>, Error> {
        log::info!("Loading ratings from {}", self.ratings_path.display());
        let reader = csv::Reader::from_path(&self.ratings_path)?;
        read_ratings(reader)
    }
}

/// Parse a wide user-item matrix.
///
/// The first column holds the user id and the header holds the item ids,
/// a 0 cell means the user never rated that item.
pub fn read_matrix<R: Read>(
    mut reader: csv::Reader<R>,
) -> Result<InteractionMatrix<UserId, ItemId>, Error> {
    let items: Vec<ItemId> = reader.headers()?.iter().skip(1).map(String::from).collect();

    let mut users = Vec::new();
    let mut rows = Vec::new();

    for record in reader.records() {
        let record = record?;
        let mut fields = record.iter();

        let user = fields
            .next()
            .ok_or_else(|| ErrorKind::ValueConvert("empty matrix row".into()))?;

        let values = fields
            .map(|field| {
                field.trim().parse::<f64>().map_err(|_| {
                    ErrorKind::ValueConvert(format!("rating '{}' of user {}", field, user))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        users.push(user.to_string());
        rows.push(values);
    }

    let mut matrix = InteractionMatrix::with_keys(users, items)?;
    for (user_idx, values) in rows.into_iter().enumerate() {
        for (item_idx, rating) in values.into_iter().enumerate() {
            if rating == 0.0 {
                continue;
            }

            let user = matrix.users()[user_idx].clone();
            let item = matrix.items()[item_idx].clone();
            matrix.insert(&user, &item, rating)?;
        }
    }

    log::debug!(
        "Matrix has {} users, {} items and {} ratings (sparsity {:.4})",
        matrix.n_users(),
        matrix.n_items(),
        matrix.n_observed(),
        matrix.sparsity()
    );

    Ok(matrix)
}

/// Parse `user_id,item_id,rating` rows, any other column is ignored
pub fn read_ratings<R: Read>(
    mut reader: csv::Reader<R>,
) -> Result<Vec<Triple<UserId, ItemId>>, Error> {
    let mut triples = Vec::new();
    for row in reader.deserialize() {
        let row: RatingRow = row?;
        triples.push(Triple::new(row.user_id, row.item_id, row.rating));
    }

    log::debug!("Read {} ratings", triples.len());
    Ok(triples)
}

/// Parse `user_id,mean_rating` rows
pub fn read_means<R: Read>(mut reader: csv::Reader<R>) -> Result<Means<UserId>, Error> {
    let mut means = Means::new();
    for row in reader.deserialize() {
        let row: MeanRow = row?;
        means.insert(row.user_id, row.mean_rating);
    }

    Ok(means)
}

/// Write `means` the way `read_means` expects them, users in `order`
pub fn write_means<'a>(
    path: impl AsRef<Path>,
    means: &Means<UserId>,
    order: impl IntoIterator<Item = &'a UserId>,
) -> Result<(), Error> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(&["user_id", "mean_rating"])?;

    for user in order {
        if let Some(mean) = means.get(user) {
            let mean = mean.to_string();
            writer.write_record(&[user.as_str(), mean.as_str()])?;
        }
    }

    writer.flush()?;
    Ok(())
}
