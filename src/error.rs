//! Error types for dataset loading and filter validation.
//!
//! Loading failures are fatal to a session. Validation failures are
//! recoverable: the caller keeps whatever view it last produced.

use chrono::NaiveDate;

use crate::dataset::Dimension;

#[derive(thiserror::Error, Debug)]
pub enum DataLoadError {
    #[error("failed reading dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed fetching dataset from '{url}': {source}")]
    Fetch {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("failed parsing dataset CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("dataset is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("row {row}: invalid value '{value}' in column '{column}'")]
    InvalidValue {
        row: usize,
        column: &'static str,
        value: String,
    },
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("date range needs both a start and an end date")]
    IncompleteDateRange,
    #[error("date range end {end} is before start {start}")]
    InvertedDateRange { start: NaiveDate, end: NaiveDate },
    #[error("selection for {dimension} mixes \"All\" with specific values")]
    MixedSentinel { dimension: Dimension },
    #[error("dataset has already been initialized")]
    AlreadyInitialized,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RecomputeError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("recompute worker has stopped")]
    WorkerStopped,
}
