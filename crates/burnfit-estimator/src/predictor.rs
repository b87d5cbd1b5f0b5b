//! Scoring queries against a trained model.

use std::fmt;

use burnfit_data::{FeatureVector, Schema};
use burnfit_forest::RandomForest;
use burnfit_stats::rounding::round_to;
use serde::{Serialize, Serializer, ser::SerializeMap as _};

use crate::{QueryError, QueryRow};

/// Decimal places of the reported estimate.
pub const DISPLAY_DECIMALS: i32 = 2;

/// A fitted forest together with the column order it was trained on.
///
/// The model owns no reference to the dataset it was fitted on.
#[derive(Debug, Clone)]
pub struct TrainedModel {
    schema: Schema,
    forest: RandomForest,
}

impl TrainedModel {
    pub(crate) fn new(schema: Schema, forest: RandomForest) -> Self {
        debug_assert_eq!(schema.len(), forest.n_features());
        Self { schema, forest }
    }

    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    #[must_use]
    pub fn forest(&self) -> &RandomForest {
        &self.forest
    }
}

/// A calorie estimate.
///
/// The unrounded value is kept for downstream use; only the serialized and
/// displayed form is rounded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    raw: f64,
}

impl Prediction {
    #[must_use]
    pub fn new(raw: f64) -> Self {
        Self { raw }
    }

    #[must_use]
    pub fn raw(&self) -> f64 {
        self.raw
    }

    /// The estimate rounded for display.
    #[must_use]
    pub fn calories_estimate(&self) -> f64 {
        round_to(self.raw, DISPLAY_DECIMALS)
    }
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} kcal", self.calories_estimate())
    }
}

impl Serialize for Prediction {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry("calories_estimate", &self.calories_estimate())?;
        map.end()
    }
}

/// Aligns `row` to `schema`.
///
/// Schema columns absent from the row become `0.0`; row cells the schema
/// does not name are dropped.
pub fn reindex(schema: &Schema, row: &QueryRow) -> Result<Vec<f64>, QueryError> {
    schema
        .columns()
        .iter()
        .map(|&column| match row.column(column) {
            None => Ok(0.0),
            Some(value) if value.is_finite() => Ok(value),
            Some(_) => Err(QueryError::NonFinite {
                column: column.name().to_owned(),
            }),
        })
        .collect()
}

/// Reindexes `row` to the model's schema and scores it.
pub fn predict(model: &TrainedModel, row: &QueryRow) -> Result<Prediction, QueryError> {
    let values = reindex(&model.schema, row)?;
    Ok(Prediction::new(model.forest.predict(&values)))
}

/// Scores engineered vectors directly, in order.
#[must_use]
pub fn predict_vectors(model: &TrainedModel, vectors: &[FeatureVector]) -> Vec<f64> {
    model.forest.predict_rows(vectors)
}
