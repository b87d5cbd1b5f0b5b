use serde::{Deserialize, Serialize};

use crate::features;

/// Biological sex as recorded in the exercise table.
///
/// Parsing is case-insensitive, so both `male` and `Male` are accepted.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::FromStr,
)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

/// One row of the exercise table.
#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseRecord {
    pub user_id: String,
    pub gender: Gender,
    pub age: f64,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub duration_min: f64,
    pub heart_rate: f64,
    pub body_temp_c: f64,
}

/// One row of the calorie table.
#[derive(Debug, Clone, PartialEq)]
pub struct CalorieRecord {
    pub user_id: String,
    pub calories: f64,
}

/// An exercise row joined with its calorie measurement.
///
/// The join key is dropped; `bmi` is derived from weight and height when the
/// record is built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JoinedRecord {
    pub gender: Gender,
    pub age: f64,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub duration_min: f64,
    pub heart_rate: f64,
    pub body_temp_c: f64,
    pub calories: f64,
    pub bmi: f64,
}

impl JoinedRecord {
    #[must_use]
    pub fn new(exercise: &ExerciseRecord, calories: f64) -> Self {
        Self {
            gender: exercise.gender,
            age: exercise.age,
            height_cm: exercise.height_cm,
            weight_kg: exercise.weight_kg,
            duration_min: exercise.duration_min,
            heart_rate: exercise.heart_rate,
            body_temp_c: exercise.body_temp_c,
            calories,
            bmi: features::bmi(exercise.weight_kg, exercise.height_cm),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gender_parse_is_case_insensitive() {
        assert_eq!("male".parse::<Gender>().unwrap(), Gender::Male);
        assert_eq!("Female".parse::<Gender>().unwrap(), Gender::Female);
        assert!("other".parse::<Gender>().is_err());
    }

    #[test]
    fn test_gender_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Gender::Male).unwrap(), "\"male\"");
        assert_eq!(serde_json::to_string(&Gender::Female).unwrap(), "\"female\"");
    }

    #[test]
    fn test_joined_record_derives_bmi() {
        let exercise = ExerciseRecord {
            user_id: "14733363".to_owned(),
            gender: Gender::Male,
            age: 68.0,
            height_cm: 175.0,
            weight_kg: 70.0,
            duration_min: 29.0,
            heart_rate: 105.0,
            body_temp_c: 40.8,
        };
        let joined = JoinedRecord::new(&exercise, 231.0);
        assert_eq!(joined.bmi, 22.86);
        assert_eq!(joined.calories, 231.0);
    }
}
