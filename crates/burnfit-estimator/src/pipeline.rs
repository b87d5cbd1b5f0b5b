//! Request entry points.
//!
//! Each call is self-contained: the dataset is loaded, a model is trained on
//! the training split, the query is scored and explained, and everything is
//! dropped on return. Concurrent calls share nothing.

use burnfit_data::{
    DatasetPaths, FeatureVector, HoldoutSplit, JoinedRecord, LabeledFeatures, features,
    split::{self, DEFAULT_HOLDOUT_RATIO, DEFAULT_SPLIT_SEED},
};
use burnfit_forest::ForestParams;
use burnfit_stats::regression::RegressionMetrics;
use serde::Serialize;

use crate::{
    EstimateError, Explanation, ExplanationPolicy, Prediction, QueryInput, QueryRow,
    TrainedModel, explain, predictor, query, trainer,
};

/// Constants governing one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Fraction of engineered rows withheld from training.
    pub holdout_ratio: f64,
    pub split_seed: u64,
    pub forest: ForestParams,
    pub explanation: ExplanationPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            holdout_ratio: DEFAULT_HOLDOUT_RATIO,
            split_seed: DEFAULT_SPLIT_SEED,
            forest: trainer::CALORIE_FOREST,
            explanation: ExplanationPolicy::default(),
        }
    }
}

/// Everything a request needs besides the query itself.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestContext {
    pub dataset: DatasetPaths,
    pub config: PipelineConfig,
}

/// Result of one estimate request.
#[derive(Debug, Clone, Serialize)]
pub struct Estimate {
    /// The engineered query as scored.
    pub query: FeatureVector,
    pub prediction: Prediction,
    pub explanation: Explanation,
}

/// A model trained on the training split, with the rows it never saw.
#[derive(Debug, Clone)]
pub struct FittedModel {
    pub model: TrainedModel,
    pub train_rows: usize,
    pub holdout: LabeledFeatures,
}

/// Holdout performance of the model a request would train.
#[derive(Debug, Clone, Serialize)]
pub struct HoldoutReport {
    pub train_rows: usize,
    pub test_rows: usize,
    pub metrics: RegressionMetrics,
}

/// Validates `input`, loads the dataset, and runs one estimate.
///
/// The query is checked before any file is touched.
pub fn estimate(ctx: &RequestContext, input: &QueryInput) -> Result<Estimate, EstimateError> {
    input.validate()?;
    let records = ctx.dataset.load()?;
    estimate_with_records(&records, input, &ctx.config)
}

/// Runs one estimate against already loaded records.
pub fn estimate_with_records(
    records: &[JoinedRecord],
    input: &QueryInput,
    config: &PipelineConfig,
) -> Result<Estimate, EstimateError> {
    input.validate()?;
    let fitted = fit_model(records, config)?;
    let query = query::engineer_query(input);
    let prediction = predictor::predict(&fitted.model, &QueryRow::from(&query))?;
    let explanation = explain::explain(records, &query, prediction, &config.explanation)?;
    Ok(Estimate {
        query,
        prediction,
        explanation,
    })
}

/// Engineers, splits, and trains on `records`.
pub fn fit_model(
    records: &[JoinedRecord],
    config: &PipelineConfig,
) -> Result<FittedModel, EstimateError> {
    let data = features::engineer(records)?;
    let HoldoutSplit { train, test } = split::split(&data, config.holdout_ratio, config.split_seed)?;
    let model = trainer::train(&train, &config.forest)?;
    Ok(FittedModel {
        model,
        train_rows: train.len(),
        holdout: test,
    })
}

/// Loads the dataset and scores a freshly trained model on its holdout rows.
pub fn evaluate(ctx: &RequestContext) -> Result<HoldoutReport, EstimateError> {
    let records = ctx.dataset.load()?;
    evaluate_records(&records, &ctx.config)
}

pub fn evaluate_records(
    records: &[JoinedRecord],
    config: &PipelineConfig,
) -> Result<HoldoutReport, EstimateError> {
    let fitted = fit_model(records, config)?;
    let predicted = predictor::predict_vectors(&fitted.model, fitted.holdout.vectors());
    let metrics = RegressionMetrics::new(fitted.holdout.targets(), &predicted).ok_or(
        EstimateError::EmptyDataset {
            purpose: "holdout evaluation",
        },
    )?;
    Ok(HoldoutReport {
        train_rows: fitted.train_rows,
        test_rows: fitted.holdout.len(),
        metrics,
    })
}

#[cfg(test)]
mod tests {
    use burnfit_data::Gender;

    use super::*;
    use crate::{ErrorKind, test_support::synthetic_records};

    fn config() -> PipelineConfig {
        PipelineConfig {
            forest: ForestParams {
                n_trees: 60,
                ..trainer::CALORIE_FOREST
            },
            ..PipelineConfig::default()
        }
    }

    fn input(age: u32) -> QueryInput {
        QueryInput {
            age,
            bmi: 22,
            duration: 15,
            heart_rate: 100,
            body_temp: 39,
            gender: Gender::Male,
        }
    }

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.holdout_ratio, 0.2);
        assert_eq!(config.split_seed, 1);
        assert_eq!(config.forest, trainer::CALORIE_FOREST);
        assert_eq!(config.explanation, ExplanationPolicy::default());
    }

    #[test]
    fn test_end_to_end_estimate() {
        let records = synthetic_records();
        let estimate = estimate_with_records(&records, &input(40), &config()).unwrap();

        assert_eq!(estimate.explanation.percentile_age, 0.5);
        assert!((50.0..=240.0).contains(&estimate.prediction.raw()));
        assert!(estimate.explanation.similar_records.len() <= 5);
        let p = estimate.prediction.raw();
        assert!(
            estimate
                .explanation
                .similar_records
                .iter()
                .all(|r| (p - 10.0..=p + 10.0).contains(&r.calories))
        );

        let json = serde_json::to_value(&estimate).unwrap();
        assert!(json["prediction"]["calories_estimate"].is_number());
        assert_eq!(json["query"]["Gender_male"], 1.0);
    }

    #[test]
    fn test_estimate_is_reproducible() {
        let records = synthetic_records();
        let a = estimate_with_records(&records, &input(33), &config()).unwrap();
        let b = estimate_with_records(&records, &input(33), &config()).unwrap();
        assert_eq!(a.prediction, b.prediction);
        assert_eq!(a.explanation, b.explanation);
    }

    #[test]
    fn test_query_is_validated_before_loading() {
        let ctx = RequestContext {
            dataset: DatasetPaths {
                exercise: "/nonexistent/exercise.csv".into(),
                calories: "/nonexistent/calories.csv".into(),
            },
            config: config(),
        };
        let err = estimate(&ctx, &input(5)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::QueryValidationFailure);
        let err = estimate(&ctx, &input(40)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DataUnavailable);
    }

    #[test]
    fn test_too_few_records() {
        let records = synthetic_records();
        let err = estimate_with_records(&records[..1], &input(40), &config()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InsufficientSamples);
    }

    #[test]
    fn test_missing_values_fail_training() {
        let mut records = synthetic_records();
        for record in &mut records {
            record.body_temp_c = f64::NAN;
        }
        let err = estimate_with_records(&records, &input(40), &config()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TrainingFailure);
    }

    #[test]
    fn test_evaluate_records() {
        let report = evaluate_records(&synthetic_records(), &config()).unwrap();
        assert_eq!(report.train_rows, 16);
        assert_eq!(report.test_rows, 4);
        assert_eq!(report.metrics.count, 4);
        assert!(report.metrics.mae >= 0.0);
        assert!(report.metrics.rmse >= report.metrics.mae);
    }
}
