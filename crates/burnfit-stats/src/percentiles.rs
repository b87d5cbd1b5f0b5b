//! Quantiles of a column and the standing of one value within a population.

use serde::Serialize;

/// One requested percentile and the value found at it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PercentilePoint {
    /// Percentile in `0.0..=100.0`.
    pub percentile: f64,
    pub value: f64,
}

/// Values of a column at a fixed list of percentiles.
///
/// # Examples
///
/// ```
/// use burnfit_stats::percentiles::Percentiles;
///
/// let heart_rates = [94.0, 105.0, 88.0, 100.0, 81.0, 96.0, 107.0, 92.0];
/// let quartiles = Percentiles::new(&heart_rates, &[25.0, 50.0, 75.0]);
/// assert_eq!(quartiles.get(25.0), Some(92.0));
/// assert_eq!(quartiles.get(50.0), Some(96.0));
/// assert_eq!(quartiles.get(90.0), None);
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct Percentiles {
    points: Vec<PercentilePoint>,
}

impl Percentiles {
    /// Looks up `percentiles` in an ascending column.
    ///
    /// # Arguments
    ///
    /// * `sorted` - column values in ascending order
    /// * `percentiles` - points to look up, each in `0.0..=100.0`
    ///
    /// # Returns
    ///
    /// One [`PercentilePoint`] per requested percentile, in request order.
    /// Every value is `NaN` when `sorted` is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use burnfit_stats::percentiles::Percentiles;
    ///
    /// let ages = [20.0, 23.0, 36.0, 41.0, 68.0];
    /// let deciles = Percentiles::from_sorted(&ages, &[10.0, 90.0]);
    /// assert_eq!(deciles.get(10.0), Some(20.0));
    /// assert_eq!(deciles.get(90.0), Some(68.0));
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `sorted` is not ascending.
    #[must_use]
    pub fn from_sorted(sorted: &[f64], percentiles: &[f64]) -> Self {
        assert!(
            sorted.is_sorted_by(|a, b| a <= b),
            "column values must be ascending"
        );
        let points = percentiles
            .iter()
            .map(|&percentile| PercentilePoint {
                percentile,
                value: compute_percentile(sorted, percentile),
            })
            .collect();
        Self { points }
    }

    /// Sorts a copy of `values` and looks up `percentiles` in it.
    ///
    /// # Arguments
    ///
    /// * `values` - column values in any order
    /// * `percentiles` - points to look up, each in `0.0..=100.0`
    ///
    /// # Returns
    ///
    /// The same points as [`Percentiles::from_sorted`] on the sorted copy.
    #[must_use]
    pub fn new(values: &[f64], percentiles: &[f64]) -> Self {
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        Self::from_sorted(&sorted, percentiles)
    }

    /// Value at `percentile`, if it was one of the requested points.
    ///
    /// # Arguments
    ///
    /// * `percentile` - a point passed when the percentiles were computed
    ///
    /// # Returns
    ///
    /// `None` if `percentile` was not requested.
    #[must_use]
    pub fn get(&self, percentile: f64) -> Option<f64> {
        self.points
            .iter()
            .find(|point| (point.percentile - percentile).abs() < f64::EPSILON)
            .map(|point| point.value)
    }

    /// Iterates the points in request order.
    ///
    /// # Examples
    ///
    /// ```
    /// use burnfit_stats::percentiles::Percentiles;
    ///
    /// let quartiles = Percentiles::new(&[3.0, 1.0, 2.0, 4.0], &[25.0, 50.0, 75.0]);
    /// let values = quartiles.iter().map(|point| point.value).collect::<Vec<_>>();
    /// assert_eq!(values, [2.0, 3.0, 4.0]);
    /// ```
    pub fn iter(&self) -> impl Iterator<Item = PercentilePoint> + '_ {
        self.points.iter().copied()
    }
}

/// Nearest-rank percentile of an ascending column.
///
/// For `n` values the `k`-th percentile is the value at index
/// `floor(n * k / 100)`, capped at the last index. An empty column gives
/// `NaN`.
///
/// # Arguments
///
/// * `sorted` - column values in ascending order
/// * `percentile` - the point to look up, in `0.0..=100.0`
///
/// # Returns
///
/// An element of `sorted`, or `NaN` when it is empty.
///
/// # Examples
///
/// ```
/// use burnfit_stats::percentiles::compute_percentile;
///
/// let ages = [20.0, 30.0, 40.0, 50.0, 60.0];
/// assert_eq!(compute_percentile(&ages, 50.0), 40.0);
/// assert_eq!(compute_percentile(&ages, 100.0), 60.0);
/// ```
#[expect(
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss
)]
#[must_use]
pub fn compute_percentile(sorted: &[f64], percentile: f64) -> f64 {
    let Some(last) = sorted.len().checked_sub(1) else {
        return f64::NAN;
    };
    let rank = (sorted.len() as f64 * percentile / 100.0) as usize;
    sorted[rank.min(last)]
}

/// Computes the percentile standing of `value` within a population.
///
/// The standing is the fraction of `population` strictly less than `value`,
/// so it always lies in `[0, 1]`. Values equal to `value` do not count.
///
/// # Arguments
///
/// * `population` - values to compare against, in any order
/// * `value` - the value whose standing is wanted
///
/// # Returns
///
/// The standing in `[0, 1]`, or `None` if the population is empty.
///
/// # Examples
///
/// ```
/// use burnfit_stats::percentiles::fraction_below;
///
/// let population = [1.0, 2.0, 2.0, 3.0];
/// assert_eq!(fraction_below(&population, 2.0), Some(0.25));
/// assert_eq!(fraction_below(&population, 10.0), Some(1.0));
/// assert_eq!(fraction_below(&[], 1.0), None);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn fraction_below(population: &[f64], value: f64) -> Option<f64> {
    if population.is_empty() {
        return None;
    }
    let below = population.iter().filter(|&&v| v < value).count();
    Some(below as f64 / population.len() as f64)
}
