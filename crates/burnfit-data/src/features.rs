//! Feature engineering: BMI derivation, column selection, and gender encoding.
//!
//! Every model input is a [`FeatureVector`] laid out in the fixed
//! [`FeatureColumn::ALL`] order. Gender is one-hot encoded with the first
//! category dropped: only `Gender_male` is emitted, and a female row carries
//! `0.0` there. The schema is an explicit enumeration and never depends on
//! which categories happen to occur in a batch.

use std::{fmt, ops::Index};

use burnfit_stats::rounding::round_to;
use serde::{Serialize, Serializer, ser::SerializeMap as _};

use crate::{DataError, Gender, JoinedRecord};

/// Minimum number of rows needed to train and hold out at least one row each.
pub const MIN_SAMPLES: usize = 2;

/// Body-mass index rounded to two decimals.
///
/// # Examples
///
/// ```
/// assert_eq!(burnfit_data::features::bmi(70.0, 175.0), 22.86);
/// ```
#[must_use]
pub fn bmi(weight_kg: f64, height_cm: f64) -> f64 {
    let height_m = height_cm / 100.0;
    round_to(weight_kg / (height_m * height_m), 2)
}

/// A column of the model input schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FeatureColumn {
    Age,
    Bmi,
    Duration,
    HeartRate,
    BodyTemp,
    GenderMale,
}

impl FeatureColumn {
    pub const LEN: usize = 6;

    /// All columns in canonical schema order.
    pub const ALL: [Self; Self::LEN] = [
        Self::Age,
        Self::Bmi,
        Self::Duration,
        Self::HeartRate,
        Self::BodyTemp,
        Self::GenderMale,
    ];

    /// External column name, as used by query rows.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Age => "Age",
            Self::Bmi => "BMI",
            Self::Duration => "Duration",
            Self::HeartRate => "Heart_Rate",
            Self::BodyTemp => "Body_Temp",
            Self::GenderMale => "Gender_male",
        }
    }

    /// Looks up a column by its external name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }

    /// Position of this column in the canonical order.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for FeatureColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ordered set of columns a model was trained on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    columns: Vec<FeatureColumn>,
}

impl Default for Schema {
    fn default() -> Self {
        Self::canonical()
    }
}

impl Schema {
    /// The schema produced by [`engineer`].
    #[must_use]
    pub fn canonical() -> Self {
        Self {
            columns: FeatureColumn::ALL.to_vec(),
        }
    }

    #[must_use]
    pub fn columns(&self) -> &[FeatureColumn] {
        &self.columns
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.iter().map(|c| c.name())
    }
}

/// Encodes gender as the `Gender_male` indicator.
#[must_use]
pub const fn encode_gender(gender: Gender) -> f64 {
    match gender {
        Gender::Male => 1.0,
        Gender::Female => 0.0,
    }
}

/// Decodes the `Gender_male` indicator; any non-zero value is male.
#[must_use]
pub fn decode_gender(gender_male: f64) -> Gender {
    if gender_male == 0.0 {
        Gender::Female
    } else {
        Gender::Male
    }
}

/// One model input row in canonical column order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    values: [f64; FeatureColumn::LEN],
}

impl FeatureVector {
    #[must_use]
    pub const fn new(
        age: f64,
        bmi: f64,
        duration: f64,
        heart_rate: f64,
        body_temp: f64,
        gender: Gender,
    ) -> Self {
        Self {
            values: [
                age,
                bmi,
                duration,
                heart_rate,
                body_temp,
                encode_gender(gender),
            ],
        }
    }

    /// Selects and encodes the model columns of a joined record.
    #[must_use]
    pub fn from_record(record: &JoinedRecord) -> Self {
        Self::new(
            record.age,
            record.bmi,
            record.duration_min,
            record.heart_rate,
            record.body_temp_c,
            record.gender,
        )
    }

    #[must_use]
    pub const fn get(&self, column: FeatureColumn) -> f64 {
        self.values[column.index()]
    }

    #[must_use]
    pub fn gender(&self) -> Gender {
        decode_gender(self.get(FeatureColumn::GenderMale))
    }

    #[must_use]
    pub const fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Iterates `(column, value)` pairs in canonical order.
    pub fn cells(&self) -> impl Iterator<Item = (FeatureColumn, f64)> + '_ {
        FeatureColumn::ALL.into_iter().zip(self.values)
    }
}

impl Index<FeatureColumn> for FeatureVector {
    type Output = f64;

    fn index(&self, column: FeatureColumn) -> &f64 {
        &self.values[column.index()]
    }
}

impl AsRef<[f64]> for FeatureVector {
    fn as_ref(&self) -> &[f64] {
        &self.values
    }
}

impl Serialize for FeatureVector {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(FeatureColumn::LEN))?;
        for (column, value) in self.cells() {
            map.serialize_entry(column.name(), &value)?;
        }
        map.end()
    }
}

/// Engineered feature vectors with their calorie targets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabeledFeatures {
    vectors: Vec<FeatureVector>,
    targets: Vec<f64>,
}

impl LabeledFeatures {
    /// Pairs vectors with targets.
    ///
    /// # Panics
    ///
    /// Panics if the lengths differ.
    #[must_use]
    pub fn new(vectors: Vec<FeatureVector>, targets: Vec<f64>) -> Self {
        assert_eq!(
            vectors.len(),
            targets.len(),
            "every feature vector needs exactly one target"
        );
        Self { vectors, targets }
    }

    #[must_use]
    pub fn vectors(&self) -> &[FeatureVector] {
        &self.vectors
    }

    #[must_use]
    pub fn targets(&self) -> &[f64] {
        &self.targets
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Copies the rows at `indices`, in that order.
    #[must_use]
    pub fn select(&self, indices: &[usize]) -> Self {
        Self {
            vectors: indices.iter().map(|&i| self.vectors[i]).collect(),
            targets: indices.iter().map(|&i| self.targets[i]).collect(),
        }
    }
}

/// Engineers training rows from joined records.
///
/// Calories become the targets; every other selected column goes into the
/// feature vector in canonical order.
pub fn engineer(records: &[JoinedRecord]) -> Result<LabeledFeatures, DataError> {
    if records.len() < MIN_SAMPLES {
        return Err(DataError::InsufficientSamples {
            required: MIN_SAMPLES,
            found: records.len(),
        });
    }
    let vectors = records.iter().map(FeatureVector::from_record).collect();
    let targets = records.iter().map(|r| r.calories).collect();
    Ok(LabeledFeatures::new(vectors, targets))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(gender: Gender, age: f64, calories: f64) -> JoinedRecord {
        JoinedRecord {
            gender,
            age,
            height_cm: 180.0,
            weight_kg: 81.0,
            duration_min: 20.0,
            heart_rate: 100.0,
            body_temp_c: 40.0,
            calories,
            bmi: bmi(81.0, 180.0),
        }
    }

    #[test]
    fn test_bmi_rounding() {
        assert_eq!(bmi(70.0, 175.0), 22.86);
        assert_eq!(bmi(81.0, 180.0), 25.0);
        assert_eq!(bmi(60.0, 166.0), 21.77);
    }

    #[test]
    fn test_gender_round_trip() {
        for gender in [Gender::Male, Gender::Female] {
            let vector = FeatureVector::new(30.0, 22.0, 10.0, 90.0, 39.0, gender);
            assert_eq!(vector.gender(), gender);
        }
        assert_eq!(encode_gender(Gender::Male), 1.0);
        assert_eq!(encode_gender(Gender::Female), 0.0);
    }

    #[test]
    fn test_column_names_round_trip() {
        for column in FeatureColumn::ALL {
            assert_eq!(FeatureColumn::from_name(column.name()), Some(column));
        }
        assert_eq!(FeatureColumn::from_name("Calories"), None);
        assert_eq!(FeatureColumn::from_name("Gender_female"), None);
    }

    #[test]
    fn test_canonical_order() {
        let names = Schema::canonical().names().collect::<Vec<_>>();
        assert_eq!(
            names,
            ["Age", "BMI", "Duration", "Heart_Rate", "Body_Temp", "Gender_male"]
        );
        for (i, column) in FeatureColumn::ALL.into_iter().enumerate() {
            assert_eq!(column.index(), i);
        }
    }

    #[test]
    fn test_engineer_selects_columns_and_targets() {
        let records = [
            record(Gender::Male, 30.0, 120.0),
            record(Gender::Female, 40.0, 80.0),
        ];
        let data = engineer(&records).unwrap();
        assert_eq!(data.targets(), &[120.0, 80.0]);
        let first = data.vectors()[0];
        assert_eq!(first[FeatureColumn::Age], 30.0);
        assert_eq!(first[FeatureColumn::Bmi], 25.0);
        assert_eq!(first[FeatureColumn::Duration], 20.0);
        assert_eq!(first[FeatureColumn::HeartRate], 100.0);
        assert_eq!(first[FeatureColumn::BodyTemp], 40.0);
        assert_eq!(first[FeatureColumn::GenderMale], 1.0);
        assert_eq!(data.vectors()[1][FeatureColumn::GenderMale], 0.0);
    }

    #[test]
    fn test_engineer_rejects_single_row() {
        let err = engineer(&[record(Gender::Male, 30.0, 120.0)]).unwrap_err();
        assert!(err.is_insufficient_samples());
    }

    #[test]
    fn test_vector_serializes_with_column_names() {
        let vector = FeatureVector::new(30.0, 22.5, 10.0, 90.0, 39.0, Gender::Female);
        let json = serde_json::to_value(vector).unwrap();
        assert_eq!(json["Age"], 30.0);
        assert_eq!(json["BMI"], 22.5);
        assert_eq!(json["Gender_male"], 0.0);
    }
}
