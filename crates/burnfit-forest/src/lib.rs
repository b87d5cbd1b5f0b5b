//! Random-forest regression.
//!
//! This crate fits an ensemble of CART regression trees on numeric feature
//! rows and predicts by averaging the trees.
//!
//! # How Fitting Works
//!
//! 1. **Validate** - Rows must be non-empty, rectangular, finite, and paired
//!    with one target each
//! 2. **Seed** - A master PCG generator seeded from [`ForestParams::seed`]
//!    draws one seed per tree
//! 3. **Bootstrap** - Each tree samples `n` rows with replacement
//! 4. **Grow** - Each node evaluates a fresh random subset of
//!    [`ForestParams::max_features`] columns and takes the split that most
//!    reduces squared error, until [`ForestParams::max_depth`]
//! 5. **Average** - The forest prediction is the mean of all tree predictions
//!
//! Trees are grown in parallel on scoped threads. Because every tree seed is
//! drawn before any thread starts, the fitted forest does not depend on the
//! number of workers.
//!
//! # Example
//!
//! ```
//! use burnfit_forest::{ForestParams, RandomForest};
//!
//! let rows: Vec<[f64; 2]> = (0..40).map(|i| [f64::from(i), 1.0]).collect();
//! let targets: Vec<f64> = (0..40).map(|i| if i < 20 { 0.0 } else { 10.0 }).collect();
//!
//! let params = ForestParams {
//!     n_trees: 20,
//!     max_features: 2,
//!     max_depth: 3,
//!     ..ForestParams::default()
//! };
//! let forest = RandomForest::fit(&rows, &targets, &params).unwrap();
//! assert!(forest.predict(&[2.0, 1.0]) < 5.0);
//! assert!(forest.predict(&[38.0, 1.0]) > 5.0);
//! ```

pub use self::{
    forest::{ForestParams, RandomForest},
    tree::RegressionTree,
};

pub mod forest;
pub mod tree;

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::IsVariant)]
pub enum ForestError {
    #[display("training set is empty")]
    EmptyTrainingSet,
    #[display("{rows} rows but {targets} targets")]
    LengthMismatch { rows: usize, targets: usize },
    #[display("row {row} has {found} features, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[display("row {row} has a missing or non-finite value in column {column}")]
    NonFiniteFeature { row: usize, column: usize },
    #[display("target {row} is missing or non-finite")]
    NonFiniteTarget { row: usize },
    #[display("invalid forest parameters: {reason}")]
    InvalidParams { reason: &'static str },
}
