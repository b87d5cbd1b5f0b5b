//! Historical workout data for the burnfit calorie estimator.
//!
//! This crate turns the two persisted tables into model-ready data:
//!
//! 1. **Load** ([`loader`]): read the exercise and calorie tables and inner-join
//!    them on `User_ID` into [`JoinedRecord`]s
//! 2. **Engineer** ([`features`]): derive BMI, select the canonical columns, and
//!    one-hot encode gender into fixed-schema [`FeatureVector`]s with targets
//! 3. **Split** ([`split`]): partition the engineered rows into a training set
//!    and a holdout set with a seeded shuffle
//!
//! [`summary`] describes the joined dataset column by column.
//!
//! ```text
//! exercise.csv ─┐
//!               ├─ join ─→ JoinedRecord[] ─→ engineer ─→ LabeledFeatures ─→ split ─→ (train, test)
//! calories.csv ─┘
//! ```
//!
//! # Example
//!
//! ```
//! use burnfit_data::{features, loader};
//!
//! let exercise = "\
//! User_ID,Gender,Age,Height,Weight,Duration,Heart_Rate,Body_Temp
//! 1,male,68,190,94,29,105,40.8
//! 2,female,20,166,60,14,94,40.3
//! ";
//! let calories = "User_ID,Calories\n1,231\n2,66\n";
//!
//! let records = loader::load_from_readers(exercise.as_bytes(), calories.as_bytes()).unwrap();
//! let data = features::engineer(&records).unwrap();
//! assert_eq!(data.len(), 2);
//! assert_eq!(data.targets(), &[231.0, 66.0]);
//! ```

use std::{io, path::PathBuf};

pub use self::{
    features::{FeatureColumn, FeatureVector, LabeledFeatures, Schema},
    loader::DatasetPaths,
    record::{CalorieRecord, ExerciseRecord, Gender, JoinedRecord},
    split::HoldoutSplit,
};

pub mod features;
pub mod loader;
pub mod record;
pub mod split;
pub mod summary;

/// One of the two persisted source tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum Table {
    #[display("exercise")]
    Exercise,
    #[display("calories")]
    Calories,
}

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::IsVariant)]
pub enum DataError {
    #[display("failed to open {table} table: {}", path.display())]
    Open {
        table: Table,
        path: PathBuf,
        source: io::Error,
    },
    #[display("failed to read {table} table")]
    Read { table: Table, source: csv::Error },
    #[display("{table} table is missing required column {column}")]
    MissingColumn { table: Table, column: &'static str },
    #[display("{table} table row {row}: unknown {column} value {value:?}")]
    UnknownCategory {
        table: Table,
        column: &'static str,
        row: usize,
        value: String,
    },
    #[display("at least {required} samples required, found {found}")]
    InsufficientSamples { required: usize, found: usize },
    #[display("holdout ratio must lie strictly between 0 and 1, got {ratio}")]
    InvalidHoldoutRatio { ratio: f64 },
}
