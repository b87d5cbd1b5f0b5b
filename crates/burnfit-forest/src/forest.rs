use std::{iter, num::NonZeroUsize, panic, thread};

use rand::{Rng, SeedableRng as _};
use rand_pcg::Pcg32;

use crate::{ForestError, RegressionTree};

/// Hyperparameters of a random forest.
///
/// The defaults grow 100 unbounded trees that consider every feature at each
/// split; callers normally override the fields they care about with struct
/// update syntax.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForestParams {
    /// Number of trees in the ensemble.
    pub n_trees: usize,
    /// Number of randomly chosen non-constant features evaluated at each split.
    /// Values above the feature count mean "all features".
    pub max_features: usize,
    /// Maximum number of split levels in a tree.
    pub max_depth: usize,
    /// Nodes with fewer samples become leaves.
    pub min_samples_split: usize,
    /// Splits leaving fewer samples on either side are rejected.
    pub min_samples_leaf: usize,
    /// Whether each tree is grown on a bootstrap sample instead of all rows.
    pub bootstrap: bool,
    /// Seed of the master generator that seeds every tree.
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_features: usize::MAX,
            max_depth: usize::MAX,
            min_samples_split: 2,
            min_samples_leaf: 1,
            bootstrap: true,
            seed: 0,
        }
    }
}

impl ForestParams {
    fn validate(&self) -> Result<(), ForestError> {
        let reason = if self.n_trees == 0 {
            "n_trees must be positive"
        } else if self.max_features == 0 {
            "max_features must be positive"
        } else if self.min_samples_split < 2 {
            "min_samples_split must be at least 2"
        } else if self.min_samples_leaf == 0 {
            "min_samples_leaf must be positive"
        } else {
            return Ok(());
        };
        Err(ForestError::InvalidParams { reason })
    }
}

/// An ensemble of regression trees averaged at prediction time.
#[derive(Debug, Clone, PartialEq)]
pub struct RandomForest {
    n_features: usize,
    trees: Vec<RegressionTree>,
}

impl RandomForest {
    /// Fits a forest on `rows` and `targets`.
    ///
    /// Returns an error if the parameters are degenerate, the training set is
    /// empty, rows and targets differ in count, rows differ in width, or any
    /// value is `NaN` or infinite.
    pub fn fit<X>(rows: &[X], targets: &[f64], params: &ForestParams) -> Result<Self, ForestError>
    where
        X: AsRef<[f64]> + Sync,
    {
        params.validate()?;
        let n_features = validate_training_set(rows, targets)?;

        let mut master = Pcg32::seed_from_u64(params.seed);
        let seeds = (0..params.n_trees)
            .map(|_| master.random::<u64>())
            .collect::<Vec<_>>();

        let workers = thread::available_parallelism().map_or(1, NonZeroUsize::get);
        let chunk_size = seeds.len().div_ceil(workers);
        let trees = thread::scope(|s| {
            let handles = seeds
                .chunks(chunk_size)
                .map(|chunk| {
                    s.spawn(move || {
                        chunk
                            .iter()
                            .map(|&seed| grow_tree(rows, targets, params, seed))
                            .collect::<Vec<_>>()
                    })
                })
                .collect::<Vec<_>>();
            handles
                .into_iter()
                .flat_map(|handle| {
                    handle
                        .join()
                        .unwrap_or_else(|payload| panic::resume_unwind(payload))
                })
                .collect::<Vec<_>>()
        });

        Ok(Self { n_features, trees })
    }

    /// Number of features every input row must have.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    #[must_use]
    pub fn trees(&self) -> &[RegressionTree] {
        &self.trees
    }

    /// Predicts the target for one row as the mean over all trees.
    ///
    /// # Panics
    ///
    /// Panics if `row` does not have [`Self::n_features`] values.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn predict(&self, row: &[f64]) -> f64 {
        assert_eq!(
            row.len(),
            self.n_features,
            "row width must match the training data"
        );
        let sum = self.trees.iter().map(|tree| tree.predict(row)).sum::<f64>();
        sum / self.trees.len() as f64
    }

    /// Predicts every row in `rows`.
    #[must_use]
    pub fn predict_rows<X>(&self, rows: &[X]) -> Vec<f64>
    where
        X: AsRef<[f64]>,
    {
        rows.iter().map(|row| self.predict(row.as_ref())).collect()
    }
}

fn grow_tree<X>(rows: &[X], targets: &[f64], params: &ForestParams, seed: u64) -> RegressionTree
where
    X: AsRef<[f64]>,
{
    let mut rng = Pcg32::seed_from_u64(seed);
    let n = rows.len();
    let samples = if params.bootstrap {
        (0..n).map(|_| rng.random_range(0..n)).collect()
    } else {
        (0..n).collect()
    };
    RegressionTree::fit(rows, targets, samples, params, &mut rng)
}

/// Checks the training set and returns its feature count.
fn validate_training_set<X>(rows: &[X], targets: &[f64]) -> Result<usize, ForestError>
where
    X: AsRef<[f64]>,
{
    let Some(first) = rows.first() else {
        return Err(ForestError::EmptyTrainingSet);
    };
    if rows.len() != targets.len() {
        return Err(ForestError::LengthMismatch {
            rows: rows.len(),
            targets: targets.len(),
        });
    }
    let expected = first.as_ref().len();
    for (row, (values, target)) in iter::zip(rows, targets).enumerate() {
        let values = values.as_ref();
        if values.len() != expected {
            return Err(ForestError::RaggedRow {
                row,
                expected,
                found: values.len(),
            });
        }
        if let Some(column) = values.iter().position(|v| !v.is_finite()) {
            return Err(ForestError::NonFiniteFeature { row, column });
        }
        if !target.is_finite() {
            return Err(ForestError::NonFiniteTarget { row });
        }
    }
    Ok(expected)
}
