use crate::preprocessing::ScalingTag;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum KnnError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("k = {k} exceeds the {available} available training examples")]
    InsufficientData { k: usize, available: usize },

    #[error("feature column {column} has zero variance")]
    DegenerateFeature { column: usize },

    #[error("train and test partitions were scaled inconsistently (train: {train:?}, test: {test:?})")]
    ScalingMismatch {
        train: Option<ScalingTag>,
        test: Option<ScalingTag>,
    },

    #[error("classifier has not been fitted")]
    NotFitted,
}

impl KnnError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        KnnError::InvalidArgument(msg.into())
    }
}
