//! Query input at the collaborator boundary.
//!
//! [`QueryInput`] is the typed record a front end collects from the user. It
//! is validated against the documented slider ranges and then engineered into
//! a [`FeatureVector`]. [`QueryRow`] is the untyped, name-keyed form handed to
//! the predictor; it may carry columns the model does not know or lack columns
//! the model expects.

use std::ops::RangeInclusive;

use burnfit_data::{FeatureColumn, FeatureVector, Gender};
use serde::{Deserialize, Serialize};

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::IsVariant)]
pub enum QueryError {
    #[display("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },
    #[display("query column {column} is not a finite number")]
    NonFinite { column: String },
}

/// Physiological inputs for one estimate.
///
/// Every numeric field is a whole number, as collected by the input sliders.
/// BMI is supplied directly rather than derived from height and weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryInput {
    pub age: u32,
    pub bmi: u32,
    /// Workout duration in minutes.
    pub duration: u32,
    /// Heart rate in beats per minute.
    pub heart_rate: u32,
    /// Body temperature in degrees Celsius.
    pub body_temp: u32,
    pub gender: Gender,
}

impl QueryInput {
    pub const AGE_RANGE: RangeInclusive<u32> = 10..=100;
    pub const BMI_RANGE: RangeInclusive<u32> = 15..=40;
    pub const DURATION_RANGE: RangeInclusive<u32> = 0..=35;
    pub const HEART_RATE_RANGE: RangeInclusive<u32> = 60..=130;
    pub const BODY_TEMP_RANGE: RangeInclusive<u32> = 36..=42;

    /// Checks every numeric field against its documented range.
    pub fn validate(&self) -> Result<(), QueryError> {
        check_range("age", self.age, &Self::AGE_RANGE)?;
        check_range("bmi", self.bmi, &Self::BMI_RANGE)?;
        check_range("duration", self.duration, &Self::DURATION_RANGE)?;
        check_range("heart_rate", self.heart_rate, &Self::HEART_RATE_RANGE)?;
        check_range("body_temp", self.body_temp, &Self::BODY_TEMP_RANGE)?;
        Ok(())
    }
}

fn check_range(
    field: &'static str,
    value: u32,
    range: &RangeInclusive<u32>,
) -> Result<(), QueryError> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(QueryError::OutOfRange {
            field,
            value,
            min: *range.start(),
            max: *range.end(),
        })
    }
}

/// Engineers a query into the canonical feature layout.
///
/// # Examples
///
/// ```
/// use burnfit_data::{FeatureColumn, Gender};
/// use burnfit_estimator::query::{QueryInput, engineer_query};
///
/// let input = QueryInput {
///     age: 30,
///     bmi: 20,
///     duration: 15,
///     heart_rate: 80,
///     body_temp: 38,
///     gender: Gender::Male,
/// };
/// let vector = engineer_query(&input);
/// assert_eq!(vector[FeatureColumn::Bmi], 20.0);
/// assert_eq!(vector[FeatureColumn::GenderMale], 1.0);
/// ```
#[must_use]
pub fn engineer_query(input: &QueryInput) -> FeatureVector {
    FeatureVector::new(
        f64::from(input.age),
        f64::from(input.bmi),
        f64::from(input.duration),
        f64::from(input.heart_rate),
        f64::from(input.body_temp),
        input.gender,
    )
}

/// Name-keyed query cells in caller order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryRow {
    cells: Vec<(String, f64)>,
}

impl QueryRow {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `name` to `value`, replacing an existing cell of the same name.
    pub fn insert<S>(&mut self, name: S, value: f64)
    where
        S: Into<String>,
    {
        let name = name.into();
        match self.cells.iter_mut().find(|(n, _)| *n == name) {
            Some(cell) => cell.1 = value,
            None => self.cells.push((name, value)),
        }
    }

    /// Builder form of [`Self::insert`].
    #[must_use]
    pub fn with<S>(mut self, name: S, value: f64) -> Self
    where
        S: Into<String>,
    {
        self.insert(name, value);
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<f64> {
        self.cells
            .iter()
            .find_map(|(n, v)| (n == name).then_some(*v))
    }

    /// Value of a schema column, if present.
    #[must_use]
    pub fn column(&self, column: FeatureColumn) -> Option<f64> {
        self.get(column.name())
    }

    pub fn cells(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.cells.iter().map(|(n, v)| (n.as_str(), *v))
    }
}

impl From<&FeatureVector> for QueryRow {
    fn from(vector: &FeatureVector) -> Self {
        vector
            .cells()
            .map(|(column, value)| (column.name().to_owned(), value))
            .collect()
    }
}

impl FromIterator<(String, f64)> for QueryRow {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (String, f64)>,
    {
        let mut row = Self::new();
        for (name, value) in iter {
            row.insert(name, value);
        }
        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> QueryInput {
        QueryInput {
            age: 30,
            bmi: 20,
            duration: 15,
            heart_rate: 80,
            body_temp: 38,
            gender: Gender::Female,
        }
    }

    #[test]
    fn test_valid_query_and_boundaries() {
        assert!(valid().validate().is_ok());
        let lowest = QueryInput {
            age: 10,
            bmi: 15,
            duration: 0,
            heart_rate: 60,
            body_temp: 36,
            ..valid()
        };
        let highest = QueryInput {
            age: 100,
            bmi: 40,
            duration: 35,
            heart_rate: 130,
            body_temp: 42,
            ..valid()
        };
        assert!(lowest.validate().is_ok());
        assert!(highest.validate().is_ok());
    }

    #[test]
    fn test_out_of_range_fields() {
        let cases = [
            ("age", QueryInput { age: 9, ..valid() }),
            ("age", QueryInput { age: 101, ..valid() }),
            ("bmi", QueryInput { bmi: 14, ..valid() }),
            ("bmi", QueryInput { bmi: 41, ..valid() }),
            ("duration", QueryInput { duration: 36, ..valid() }),
            ("heart_rate", QueryInput { heart_rate: 59, ..valid() }),
            ("heart_rate", QueryInput { heart_rate: 131, ..valid() }),
            ("body_temp", QueryInput { body_temp: 35, ..valid() }),
            ("body_temp", QueryInput { body_temp: 43, ..valid() }),
        ];
        for (expected, query) in cases {
            match query.validate() {
                Err(QueryError::OutOfRange { field, .. }) => assert_eq!(field, expected),
                other => panic!("expected {expected} to be out of range, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_fractional_fields_are_rejected() {
        let whole = r#"{"age":30,"bmi":22,"duration":15,"heart_rate":80,"body_temp":38,"gender":"male"}"#;
        let query = serde_json::from_str::<QueryInput>(whole).unwrap();
        assert!(query.validate().is_ok());

        for fractional in [
            r#"{"age":30,"bmi":22.5,"duration":15,"heart_rate":80,"body_temp":38,"gender":"male"}"#,
            r#"{"age":30,"bmi":22,"duration":15.25,"heart_rate":80,"body_temp":38,"gender":"male"}"#,
            r#"{"age":30,"bmi":22,"duration":15,"heart_rate":80.5,"body_temp":38,"gender":"male"}"#,
            r#"{"age":30,"bmi":22,"duration":15,"heart_rate":80,"body_temp":38.7,"gender":"male"}"#,
        ] {
            assert!(serde_json::from_str::<QueryInput>(fractional).is_err(), "{fractional}");
        }
    }

    #[test]
    fn test_engineer_query_keeps_bmi_as_given() {
        let vector = engineer_query(&QueryInput { bmi: 27, ..valid() });
        assert_eq!(vector[FeatureColumn::Bmi], 27.0);
        assert_eq!(vector[FeatureColumn::Age], 30.0);
        assert_eq!(vector.gender(), Gender::Female);
    }

    #[test]
    fn test_query_row_from_vector_uses_column_names() {
        let row = QueryRow::from(&engineer_query(&valid()));
        let names = row.cells().map(|(n, _)| n).collect::<Vec<_>>();
        assert_eq!(
            names,
            ["Age", "BMI", "Duration", "Heart_Rate", "Body_Temp", "Gender_male"]
        );
        assert_eq!(row.column(FeatureColumn::HeartRate), Some(80.0));
    }

    #[test]
    fn test_query_row_insert_replaces() {
        let row = QueryRow::new().with("Age", 20.0).with("Age", 25.0);
        assert_eq!(row.cells().count(), 1);
        assert_eq!(row.get("Age"), Some(25.0));
        assert_eq!(row.get("BMI"), None);
    }
}
