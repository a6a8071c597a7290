use thiserror::Error as DError;

#[derive(Debug, Clone, DError, PartialEq)]
pub enum ErrorKind {
    #[error("Cannot evaluate a model over an empty test set")]
    EmptyTestSet,
}
