//! Holdout partitioning of engineered rows.
//!
//! The split is a seeded shuffle, so repeated requests against the same data
//! train on the same rows.

use rand::{SeedableRng as _, seq::SliceRandom as _};
use rand_pcg::Pcg32;

use crate::{DataError, LabeledFeatures, features::MIN_SAMPLES};

/// Fraction of rows held out for evaluation.
pub const DEFAULT_HOLDOUT_RATIO: f64 = 0.2;
/// Seed of the holdout shuffle.
pub const DEFAULT_SPLIT_SEED: u64 = 1;

/// Disjoint training and holdout partitions of one dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct HoldoutSplit {
    pub train: LabeledFeatures,
    pub test: LabeledFeatures,
}

/// Partitions `data` into training and holdout rows.
///
/// The holdout receives `ceil(ratio * n)` rows drawn uniformly without
/// replacement; the rest are used for training. The shuffle is driven by a
/// PCG generator seeded with `seed`, so the same data and seed always give
/// the same partition.
///
/// # Examples
///
/// ```
/// use burnfit_data::{FeatureVector, Gender, LabeledFeatures, split};
///
/// let vectors = (0..10)
///     .map(|i| FeatureVector::new(f64::from(20 + i), 22.0, 10.0, 90.0, 39.0, Gender::Male))
///     .collect();
/// let data = LabeledFeatures::new(vectors, (0..10).map(f64::from).collect());
///
/// let split = split::split(&data, 0.2, 1).unwrap();
/// assert_eq!(split.train.len(), 8);
/// assert_eq!(split.test.len(), 2);
/// ```
#[expect(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn split(data: &LabeledFeatures, ratio: f64, seed: u64) -> Result<HoldoutSplit, DataError> {
    if ratio.is_nan() || ratio <= 0.0 || ratio >= 1.0 {
        return Err(DataError::InvalidHoldoutRatio { ratio });
    }
    let n = data.len();
    let test_len = (n as f64 * ratio).ceil() as usize;
    if n < MIN_SAMPLES || test_len >= n {
        return Err(DataError::InsufficientSamples {
            required: MIN_SAMPLES.max(test_len + 1),
            found: n,
        });
    }

    let mut indices = (0..n).collect::<Vec<_>>();
    let mut rng = Pcg32::seed_from_u64(seed);
    indices.shuffle(&mut rng);
    let (test, train) = indices.split_at(test_len);

    Ok(HoldoutSplit {
        train: data.select(train),
        test: data.select(test),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::{FeatureColumn, FeatureVector, Gender};

    fn dataset(n: u32) -> LabeledFeatures {
        let vectors = (0..n)
            .map(|i| FeatureVector::new(f64::from(i), 20.0, 10.0, 90.0, 39.0, Gender::Female))
            .collect();
        let targets = (0..n).map(|i| f64::from(i) * 10.0).collect();
        LabeledFeatures::new(vectors, targets)
    }

    #[test]
    fn test_split_is_deterministic() {
        let data = dataset(50);
        let first = split(&data, DEFAULT_HOLDOUT_RATIO, DEFAULT_SPLIT_SEED).unwrap();
        let second = split(&data, DEFAULT_HOLDOUT_RATIO, DEFAULT_SPLIT_SEED).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_split_is_disjoint_partition() {
        let data = dataset(37);
        let split = split(&data, 0.2, 7).unwrap();
        assert_eq!(split.test.len(), 8);
        assert_eq!(split.train.len(), 29);

        #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let ids = |part: &LabeledFeatures| {
            part.vectors()
                .iter()
                .map(|v| v[FeatureColumn::Age] as u32)
                .collect::<BTreeSet<_>>()
        };
        let train = ids(&split.train);
        let test = ids(&split.test);
        assert!(train.is_disjoint(&test));
        assert_eq!(train.len() + test.len(), 37);
    }

    #[test]
    fn test_split_keeps_targets_aligned() {
        let data = dataset(20);
        let split = split(&data, 0.2, 3).unwrap();
        for part in [&split.train, &split.test] {
            for (vector, target) in part.vectors().iter().zip(part.targets()) {
                assert_eq!(vector[FeatureColumn::Age] * 10.0, *target);
            }
        }
    }

    #[test]
    fn test_different_seed_changes_partition() {
        let data = dataset(50);
        let a = split(&data, 0.2, 1).unwrap();
        let b = split(&data, 0.2, 2).unwrap();
        assert_ne!(a.test, b.test);
    }

    #[test]
    fn test_two_rows_split_one_each() {
        let split = split(&dataset(2), 0.2, 1).unwrap();
        assert_eq!(split.train.len(), 1);
        assert_eq!(split.test.len(), 1);
    }

    #[test]
    fn test_rejects_degenerate_inputs() {
        assert!(split(&dataset(1), 0.2, 1).unwrap_err().is_insufficient_samples());
        assert!(split(&dataset(10), 0.0, 1).unwrap_err().is_invalid_holdout_ratio());
        assert!(split(&dataset(10), 1.0, 1).unwrap_err().is_invalid_holdout_ratio());
        assert!(
            split(&dataset(10), f64::NAN, 1)
                .unwrap_err()
                .is_invalid_holdout_ratio()
        );
        assert!(split(&dataset(3), 0.9, 1).unwrap_err().is_insufficient_samples());
    }
}
