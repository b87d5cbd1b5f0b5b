//! Per-column summaries of the joined dataset.

use burnfit_stats::{descriptive::DescriptiveStats, percentiles::Percentiles};
use serde::Serialize;

use crate::{Gender, JoinedRecord, loader};

const QUARTILES: [f64; 3] = [25.0, 50.0, 75.0];

/// Numeric columns of a joined record, keyed by their table header.
const NUMERIC_COLUMNS: [(&str, fn(&JoinedRecord) -> f64); 8] = [
    (loader::AGE, |r| r.age),
    (loader::HEIGHT, |r| r.height_cm),
    (loader::WEIGHT, |r| r.weight_kg),
    (loader::DURATION, |r| r.duration_min),
    (loader::HEART_RATE, |r| r.heart_rate),
    (loader::BODY_TEMP, |r| r.body_temp_c),
    (loader::CALORIES, |r| r.calories),
    ("BMI", |r| r.bmi),
];

#[derive(Debug, Clone, Serialize)]
pub struct DatasetSummary {
    pub rows: usize,
    pub male: usize,
    pub female: usize,
    pub columns: Vec<ColumnSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ColumnSummary {
    pub column: &'static str,
    /// Cells that were empty or not numeric.
    pub missing: usize,
    /// `None` when every cell is missing.
    pub stats: Option<DescriptiveStats>,
    pub quartiles: Percentiles,
}

impl ColumnSummary {
    fn new(column: &'static str, values: impl Iterator<Item = f64>) -> Self {
        let (present, missing): (Vec<f64>, Vec<f64>) = values.partition(|v| v.is_finite());
        let mut sorted = present;
        sorted.sort_by(f64::total_cmp);
        Self {
            column,
            missing: missing.len(),
            stats: DescriptiveStats::from_sorted(&sorted),
            quartiles: Percentiles::from_sorted(&sorted, &QUARTILES),
        }
    }
}

/// Summarizes every numeric column and the gender balance of `records`.
///
/// # Examples
///
/// ```
/// use burnfit_data::{loader, summary};
///
/// let exercise = "\
/// User_ID,Gender,Age,Height,Weight,Duration,Heart_Rate,Body_Temp
/// 1,male,68,190,94,29,105,40.8
/// 2,female,20,166,60,14,94,40.3
/// ";
/// let calories = "User_ID,Calories\n1,231\n2,66\n";
/// let records = loader::load_from_readers(exercise.as_bytes(), calories.as_bytes()).unwrap();
///
/// let summary = summary::summarize(&records);
/// assert_eq!(summary.rows, 2);
/// assert_eq!(summary.columns[0].column, "Age");
/// assert_eq!(summary.columns[0].stats.as_ref().unwrap().mean, 44.0);
/// ```
#[must_use]
pub fn summarize(records: &[JoinedRecord]) -> DatasetSummary {
    let male = records.iter().filter(|r| r.gender == Gender::Male).count();
    let columns = NUMERIC_COLUMNS
        .iter()
        .map(|&(name, value)| ColumnSummary::new(name, records.iter().map(value)))
        .collect();
    DatasetSummary {
        rows: records.len(),
        male,
        female: records.len() - male,
        columns,
    }
}
