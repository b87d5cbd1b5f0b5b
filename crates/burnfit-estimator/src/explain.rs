//! Evidence supporting an estimate.
//!
//! An [`Explanation`] places the query against the full historical dataset:
//! a handful of workouts whose recorded calories fall near the estimate, and
//! the share of the population below the query on four measurements.

use burnfit_data::{FeatureColumn, FeatureVector, JoinedRecord};
use burnfit_stats::{percentiles::fraction_below, rounding::round_to};
use rand::{SeedableRng as _, seq::index};
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::{EstimateError, Prediction};

/// Half-width of the calorie window around the estimate, in kcal.
pub const SIMILAR_WINDOW_KCAL: f64 = 10.0;
/// Maximum number of similar records returned.
pub const SIMILAR_SAMPLE_SIZE: usize = 5;
pub const SAMPLE_SEED: u64 = 1;

const STANDING_DECIMALS: i32 = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct ExplanationPolicy {
    /// Records within `estimate ± window` kcal qualify as similar.
    pub window: f64,
    pub sample_size: usize,
    /// Seed of the generator choosing which similar records are shown.
    pub seed: u64,
}

impl Default for ExplanationPolicy {
    fn default() -> Self {
        Self {
            window: SIMILAR_WINDOW_KCAL,
            sample_size: SIMILAR_SAMPLE_SIZE,
            seed: SAMPLE_SEED,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Explanation {
    /// Sampled similar records in dataset order.
    pub similar_records: Vec<JoinedRecord>,
    /// Number of records that qualified before sampling.
    pub similar_count: usize,
    pub percentile_age: f64,
    pub percentile_duration: f64,
    pub percentile_heart_rate: f64,
    pub percentile_body_temp: f64,
}

/// Explains `prediction` for `query` against `records`.
///
/// `records` should be the full joined dataset, not a training split. The
/// unrounded estimate defines the similarity window. Fewer qualifying records
/// than the sample size is not an error; all of them are returned.
pub fn explain(
    records: &[JoinedRecord],
    query: &FeatureVector,
    prediction: Prediction,
    policy: &ExplanationPolicy,
) -> Result<Explanation, EstimateError> {
    if records.is_empty() {
        return Err(EstimateError::EmptyDataset {
            purpose: "explanation",
        });
    }

    let (similar_records, similar_count) = similar_records(records, prediction.raw(), policy);
    let standing = |value: fn(&JoinedRecord) -> f64, column: FeatureColumn| {
        let population = records.iter().map(value).collect::<Vec<_>>();
        percentile_standing(&population, query[column])
    };

    Ok(Explanation {
        similar_records,
        similar_count,
        percentile_age: standing(|r| r.age, FeatureColumn::Age)?,
        percentile_duration: standing(|r| r.duration_min, FeatureColumn::Duration)?,
        percentile_heart_rate: standing(|r| r.heart_rate, FeatureColumn::HeartRate)?,
        percentile_body_temp: standing(|r| r.body_temp_c, FeatureColumn::BodyTemp)?,
    })
}

/// Samples records whose calories lie within the policy window of `estimate`.
///
/// Returns the sample in dataset order and the number of qualifying records.
pub fn similar_records(
    records: &[JoinedRecord],
    estimate: f64,
    policy: &ExplanationPolicy,
) -> (Vec<JoinedRecord>, usize) {
    let window = (estimate - policy.window)..=(estimate + policy.window);
    let qualifying = records
        .iter()
        .filter(|r| window.contains(&r.calories))
        .collect::<Vec<_>>();
    let count = qualifying.len();
    if count <= policy.sample_size {
        return (qualifying.into_iter().cloned().collect(), count);
    }

    let mut rng = Pcg32::seed_from_u64(policy.seed);
    let mut picked = index::sample(&mut rng, count, policy.sample_size).into_vec();
    picked.sort_unstable();
    let sample = picked.into_iter().map(|i| qualifying[i].clone()).collect();
    (sample, count)
}

/// Fraction of `population` strictly below `value`, rounded to two decimals.
pub fn percentile_standing(population: &[f64], value: f64) -> Result<f64, EstimateError> {
    let fraction = fraction_below(population, value).ok_or(EstimateError::EmptyDataset {
        purpose: "percentile standing",
    })?;
    Ok(round_to(fraction, STANDING_DECIMALS).clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use burnfit_data::Gender;

    use super::*;
    use crate::test_support::synthetic_records;

    fn with_calories(calories: &[f64]) -> Vec<JoinedRecord> {
        let template = synthetic_records().swap_remove(0);
        calories
            .iter()
            .map(|&calories| JoinedRecord {
                calories,
                ..template.clone()
            })
            .collect()
    }

    fn query(age: f64) -> FeatureVector {
        FeatureVector::new(age, 22.0, 15.0, 95.0, 39.5, Gender::Male)
    }

    #[test]
    fn test_window_is_inclusive() {
        let records = with_calories(&[211.0, 190.0, 205.0, 189.9, 210.0, 199.5]);
        let (similar, count) = similar_records(&records, 200.0, &ExplanationPolicy::default());
        assert_eq!(count, 4);
        let calories = similar.iter().map(|r| r.calories).collect::<Vec<_>>();
        assert_eq!(calories, [190.0, 205.0, 210.0, 199.5]);
    }

    #[test]
    fn test_sample_is_capped_and_ordered() {
        let records = with_calories(&(0..12).map(|i| 200.0 + f64::from(i)).collect::<Vec<_>>());
        let policy = ExplanationPolicy::default();
        let (similar, count) = similar_records(&records, 205.0, &policy);
        assert_eq!(count, 12);
        assert_eq!(similar.len(), SIMILAR_SAMPLE_SIZE);
        assert!(similar.windows(2).all(|w| w[0].calories < w[1].calories));

        let (again, _) = similar_records(&records, 205.0, &policy);
        assert_eq!(similar, again);
    }

    #[test]
    fn test_no_similar_records_is_not_an_error() {
        let records = synthetic_records();
        let explanation = explain(
            &records,
            &query(30.0),
            Prediction::new(10_000.0),
            &ExplanationPolicy::default(),
        )
        .unwrap();
        assert!(explanation.similar_records.is_empty());
        assert_eq!(explanation.similar_count, 0);
    }

    #[test]
    fn test_percentile_age_counts_rows_strictly_below() {
        let records = synthetic_records();
        let explanation = explain(
            &records,
            &query(40.0),
            Prediction::new(100.0),
            &ExplanationPolicy::default(),
        )
        .unwrap();
        // Ages 20, 22, ..., 38 are below 40.
        assert_eq!(explanation.percentile_age, 0.5);
        assert_eq!(explanation.similar_count, 3);
    }

    #[test]
    fn test_percentile_age_is_monotonic() {
        let records = synthetic_records();
        let mut previous = 0.0;
        for age in 10..=100 {
            let explanation = explain(
                &records,
                &query(f64::from(age)),
                Prediction::new(100.0),
                &ExplanationPolicy::default(),
            )
            .unwrap();
            assert!(explanation.percentile_age >= previous);
            assert!((0.0..=1.0).contains(&explanation.percentile_age));
            previous = explanation.percentile_age;
        }
        assert_eq!(previous, 1.0);
    }

    #[test]
    fn test_standing_is_rounded() {
        let population = [1.0, 2.0, 3.0];
        assert_eq!(percentile_standing(&population, 2.5).unwrap(), 0.67);
        assert_eq!(percentile_standing(&population, 0.0).unwrap(), 0.0);
    }

    #[test]
    fn test_standing_halves_round_to_even() {
        let population: Vec<f64> = (1..=8).map(f64::from).collect();
        // 1/8 and 3/8 sit exactly halfway between two hundredths.
        assert_eq!(percentile_standing(&population, 1.5).unwrap(), 0.12);
        assert_eq!(percentile_standing(&population, 3.5).unwrap(), 0.38);
        assert_eq!(percentile_standing(&population, 5.5).unwrap(), 0.62);
    }

    #[test]
    fn test_empty_dataset_fails() {
        let err = explain(
            &[],
            &query(40.0),
            Prediction::new(100.0),
            &ExplanationPolicy::default(),
        )
        .unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::InsufficientSamples);
        assert!(percentile_standing(&[], 1.0).is_err());
    }
}
