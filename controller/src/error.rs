// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use thiserror::Error as DError;

#[derive(Debug, Clone, DError, PartialEq)]
pub enum ErrorKind {
    #[error("Couldn't found user with id({0})")]
    UnknownUser(String),

    #[error("Couldn't found item with id({0})")]
    UnknownItem(String),

    #[error("Key({0}) appears more than once")]
    DuplicatedKey(String),

    #[error("Rating {0} is outside the score range [{1}, {2}]")]
    RatingOutOfRange(f64, f64, f64),

    #[error("Failed to cast to some value ({0})")]
    ValueConvert(String),
}
