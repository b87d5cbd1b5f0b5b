//! On-demand calorie estimation with supporting evidence.
//!
//! Every request loads the historical dataset, trains a fresh random forest,
//! predicts the query, and explains the prediction against the same dataset.
//! Nothing is cached between requests.
//!
//! # Architecture
//!
//! ```text
//! DatasetPaths ─→ JoinedRecord[] ─→ engineer ─→ split ─→ train ─→ TrainedModel
//!                      │                                              │
//!                      │        QueryInput ─→ engineer_query ─→ QueryRow ─→ predict
//!                      │                                                      │
//!                      └──────────────────────→ explain ←──────── Prediction ─┘
//! ```
//!
//! - [`query`]: validated user input and the untyped query row
//! - [`trainer`]: fixed forest hyperparameters and model fitting
//! - [`predictor`]: schema alignment and scoring
//! - [`explain`]: similar records and percentile standings
//! - [`pipeline`]: the request entry points tying everything together
//!
//! # Errors
//!
//! All failures surface as [`EstimateError`]; [`EstimateError::kind`] maps them
//! onto the five [`ErrorKind`]s a caller needs to branch on. No failure is
//! retried and no partial result is returned.

use burnfit_data::DataError;
use burnfit_forest::ForestError;
use serde::Serialize;

pub use self::{
    explain::{Explanation, ExplanationPolicy},
    pipeline::{Estimate, PipelineConfig, RequestContext},
    predictor::{Prediction, TrainedModel},
    query::{QueryError, QueryInput, QueryRow},
};

pub mod explain;
pub mod pipeline;
pub mod predictor;
pub mod query;
pub mod trainer;

/// Failure categories reported to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, Serialize)]
pub enum ErrorKind {
    /// A source table could not be opened or read.
    DataUnavailable,
    /// A required column is missing or holds a value outside the schema.
    SchemaMismatch,
    /// Too few rows to train, hold out, or compare against.
    InsufficientSamples,
    /// Missing or non-numeric values reached the regressor.
    TrainingFailure,
    /// A query field is outside its documented range.
    QueryValidationFailure,
}

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum EstimateError {
    #[display("dataset error")]
    Data(#[error(source)] DataError),
    #[display("model training failed")]
    Training(#[error(source)] ForestError),
    #[display("invalid query")]
    Query(#[error(source)] QueryError),
    #[display("{purpose} needs at least one row")]
    #[from(ignore)]
    EmptyDataset { purpose: &'static str },
}

impl EstimateError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Data(err) => match err {
                DataError::Open { .. } | DataError::Read { .. } => ErrorKind::DataUnavailable,
                DataError::MissingColumn { .. } | DataError::UnknownCategory { .. } => {
                    ErrorKind::SchemaMismatch
                }
                DataError::InsufficientSamples { .. } | DataError::InvalidHoldoutRatio { .. } => {
                    ErrorKind::InsufficientSamples
                }
            },
            Self::Training(_) => ErrorKind::TrainingFailure,
            Self::Query(_) => ErrorKind::QueryValidationFailure,
            Self::EmptyDataset { .. } => ErrorKind::InsufficientSamples,
        }
    }
}
