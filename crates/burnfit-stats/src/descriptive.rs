//! Location and spread of a single column.

use serde::Serialize;

/// Summary of one numeric column.
///
/// Variance and standard deviation are population measures (divided by `n`).
#[derive(Debug, Clone, Serialize)]
pub struct DescriptiveStats {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Middle value; the midpoint of the two middle values for even counts.
    pub median: f64,
    pub variance: f64,
    pub std_dev: f64,
}

impl DescriptiveStats {
    /// Summarizes `values` in any order.
    ///
    /// # Arguments
    ///
    /// * `values` - the column; `NaN` cells should be filtered out first
    ///
    /// # Returns
    ///
    /// `None` for no values.
    ///
    /// # Examples
    ///
    /// ```
    /// use burnfit_stats::descriptive::DescriptiveStats;
    ///
    /// let durations = [29.0, 14.0, 5.0, 25.0, 11.0];
    /// let stats = DescriptiveStats::new(durations).unwrap();
    /// assert_eq!((stats.min, stats.max), (5.0, 29.0));
    /// assert_eq!(stats.median, 14.0);
    /// assert_eq!(stats.mean, 16.8);
    /// ```
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut sorted = values.into_iter().collect::<Vec<_>>();
        sorted.sort_by(f64::total_cmp);
        Self::from_sorted(&sorted)
    }

    /// Summarizes values already in ascending order.
    ///
    /// # Arguments
    ///
    /// * `sorted` - the column in ascending order
    ///
    /// # Returns
    ///
    /// `None` if `sorted` is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use burnfit_stats::descriptive::DescriptiveStats;
    ///
    /// let heart_rates = [88.0, 94.0, 100.0, 106.0];
    /// let stats = DescriptiveStats::from_sorted(&heart_rates).unwrap();
    /// assert_eq!(stats.median, 97.0);
    /// assert_eq!(stats.variance, 45.0);
    /// assert!(DescriptiveStats::from_sorted(&[]).is_none());
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `sorted` is not ascending.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_sorted(sorted: &[f64]) -> Option<Self> {
        assert!(
            sorted.is_sorted_by(|a, b| a <= b),
            "column values must be ascending"
        );
        let (&min, &max) = (sorted.first()?, sorted.last()?);
        let count = sorted.len();
        let n = count as f64;
        let mean = sorted.iter().sum::<f64>() / n;
        let half = count / 2;
        let median = if count % 2 == 0 {
            f64::midpoint(sorted[half - 1], sorted[half])
        } else {
            sorted[half]
        };
        let variance = sorted.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
        Some(Self {
            count,
            min,
            max,
            mean,
            median,
            variance,
            std_dev: variance.sqrt(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_values() {
        assert!(DescriptiveStats::new([]).is_none());
    }

    #[test]
    fn test_even_count_median_is_midpoint() {
        let stats = DescriptiveStats::new([4.0, 1.0, 3.0, 2.0]).unwrap();
        assert_eq!(stats.count, 4);
        assert!((stats.median - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_variance_and_std_dev() {
        let stats = DescriptiveStats::new([2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert!((stats.mean - 5.0).abs() < 1e-12);
        assert!((stats.variance - 4.0).abs() < 1e-12);
        assert!((stats.std_dev - 2.0).abs() < 1e-12);
    }
}
