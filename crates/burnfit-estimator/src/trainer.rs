//! Forest hyperparameters and model fitting.

use burnfit_data::{LabeledFeatures, Schema};
use burnfit_forest::{ForestError, ForestParams, RandomForest};

use crate::TrainedModel;

pub const TREE_COUNT: usize = 1000;
pub const MAX_FEATURES_PER_SPLIT: usize = 3;
pub const MAX_TREE_DEPTH: usize = 6;
/// Seed of the master generator; fixed so repeated requests agree.
pub const FOREST_SEED: u64 = 0;

/// The ensemble used for every calorie estimate.
pub const CALORIE_FOREST: ForestParams = ForestParams {
    n_trees: TREE_COUNT,
    max_features: MAX_FEATURES_PER_SPLIT,
    max_depth: MAX_TREE_DEPTH,
    min_samples_split: 2,
    min_samples_leaf: 1,
    bootstrap: true,
    seed: FOREST_SEED,
};

/// Fits a forest on the training rows against the canonical schema.
///
/// Missing or non-numeric values in `data` surface as [`ForestError`].
pub fn train(data: &LabeledFeatures, params: &ForestParams) -> Result<TrainedModel, ForestError> {
    let forest = RandomForest::fit(data.vectors(), data.targets(), params)?;
    Ok(TrainedModel::new(Schema::canonical(), forest))
}
