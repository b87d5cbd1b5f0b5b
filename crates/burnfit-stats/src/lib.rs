//! Statistical utilities for the burnfit calorie estimator.
//!
//! This crate provides the small set of numerical tools the estimator needs:
//!
//! - **Descriptive statistics**: mean, median, variance, standard deviation, etc.
//! - **Percentiles**: quantile values of a dataset and the percentile standing
//!   of a single value within a reference population
//! - **Rounding**: fixed-decimal rounding used for display values
//! - **Regression metrics**: error measures comparing predictions with targets
//!
//! # Modules
//!
//! - [`descriptive`]: Descriptive statistics for summarizing datasets
//! - [`percentiles`]: Percentile computation and percentile standings
//! - [`rounding`]: Decimal rounding helpers
//! - [`regression`]: Holdout error metrics for regression models
//!
//! # Examples
//!
//! ## Computing descriptive statistics
//!
//! ```
//! use burnfit_stats::descriptive::DescriptiveStats;
//!
//! let values = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let stats = DescriptiveStats::new(values).unwrap();
//! assert_eq!(stats.mean, 3.0);
//! ```
//!
//! ## Computing a percentile standing
//!
//! ```
//! use burnfit_stats::percentiles::fraction_below;
//!
//! let ages = [20.0, 30.0, 40.0, 50.0];
//! assert_eq!(fraction_below(&ages, 35.0), Some(0.5));
//! ```
//!
//! ## Scoring predictions
//!
//! ```
//! use burnfit_stats::regression::RegressionMetrics;
//!
//! let actual = [100.0, 200.0];
//! let predicted = [110.0, 190.0];
//! let metrics = RegressionMetrics::new(&actual, &predicted).unwrap();
//! assert_eq!(metrics.mae, 10.0);
//! ```

pub mod descriptive;
pub mod percentiles;
pub mod regression;
pub mod rounding;
