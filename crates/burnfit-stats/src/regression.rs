//! Error metrics for regression models.
//!
//! Used to score a trained model against its holdout subset.

use std::iter;

use serde::Serialize;

use crate::descriptive::DescriptiveStats;

/// Error measures comparing predictions with observed targets.
#[derive(Debug, Clone, Serialize)]
pub struct RegressionMetrics {
    /// Number of scored samples.
    pub count: usize,
    /// Mean absolute error.
    pub mae: f64,
    /// Root mean squared error.
    pub rmse: f64,
    /// Coefficient of determination.
    ///
    /// `1.0` is a perfect fit; `0.0` matches always predicting the mean.
    /// Defined as `0.0` when the targets have no variance and the fit is exact,
    /// and `-inf` when they have no variance and the fit is not.
    pub r2: f64,
    /// Distribution of absolute errors.
    pub abs_error: DescriptiveStats,
}

impl RegressionMetrics {
    /// Scores `predicted` against `actual`.
    ///
    /// # Arguments
    ///
    /// * `actual` - observed targets
    /// * `predicted` - model outputs, paired with `actual` by position
    ///
    /// # Returns
    ///
    /// `None` if the slices are empty or differ in length.
    ///
    /// # Examples
    ///
    /// ```
    /// use burnfit_stats::regression::RegressionMetrics;
    ///
    /// let actual = [10.0, 20.0, 30.0, 40.0];
    /// let predicted = [11.0, 19.0, 31.0, 39.0];
    /// let metrics = RegressionMetrics::new(&actual, &predicted).unwrap();
    /// assert_eq!(metrics.mae, 1.0);
    /// assert_eq!(metrics.rmse, 1.0);
    /// assert!((metrics.r2 - 0.992).abs() < 1e-12);
    /// assert!(RegressionMetrics::new(&actual, &predicted[..2]).is_none());
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn new(actual: &[f64], predicted: &[f64]) -> Option<Self> {
        if actual.is_empty() || actual.len() != predicted.len() {
            return None;
        }
        let n = actual.len() as f64;
        let abs_errors = iter::zip(actual, predicted)
            .map(|(a, p)| (a - p).abs())
            .collect::<Vec<_>>();
        let sse = abs_errors.iter().map(|e| e * e).sum::<f64>();
        let mean = actual.iter().sum::<f64>() / n;
        let sst = actual.iter().map(|a| (a - mean).powi(2)).sum::<f64>();
        let r2 = if sst > 0.0 {
            1.0 - sse / sst
        } else if sse == 0.0 {
            0.0
        } else {
            f64::NEG_INFINITY
        };
        let abs_error = DescriptiveStats::new(abs_errors.iter().copied())?;

        Some(Self {
            count: actual.len(),
            mae: abs_error.mean,
            rmse: (sse / n).sqrt(),
            r2,
            abs_error,
        })
    }
}
