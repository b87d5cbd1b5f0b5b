//! Reading and joining the persisted source tables.
//!
//! Both tables are comma-separated with a header row. Columns are located by
//! header name, so extra columns and column order do not matter. Numeric cells
//! that are empty or unparsable load as `NaN`; they are rejected when they
//! reach the regressor rather than here.

use std::{
    collections::HashMap,
    fs::File,
    io::{BufReader, Read},
    path::{Path, PathBuf},
};

use csv::StringRecord;

use crate::{
    DataError, Table,
    record::{CalorieRecord, ExerciseRecord, Gender, JoinedRecord},
};

const USER_ID: &str = "User_ID";
const GENDER: &str = "Gender";
pub(crate) const AGE: &str = "Age";
pub(crate) const HEIGHT: &str = "Height";
pub(crate) const WEIGHT: &str = "Weight";
pub(crate) const DURATION: &str = "Duration";
pub(crate) const HEART_RATE: &str = "Heart_Rate";
pub(crate) const BODY_TEMP: &str = "Body_Temp";
pub(crate) const CALORIES: &str = "Calories";

/// Default file name of the exercise table.
pub const DEFAULT_EXERCISE_FILE: &str = "exercise.csv";
/// Default file name of the calorie table.
pub const DEFAULT_CALORIES_FILE: &str = "calories.csv";

/// Locations of the two source tables on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetPaths {
    pub exercise: PathBuf,
    pub calories: PathBuf,
}

impl Default for DatasetPaths {
    fn default() -> Self {
        Self {
            exercise: PathBuf::from(DEFAULT_EXERCISE_FILE),
            calories: PathBuf::from(DEFAULT_CALORIES_FILE),
        }
    }
}

impl DatasetPaths {
    /// Reads both tables and returns the joined dataset.
    ///
    /// # Returns
    ///
    /// The joined rows in exercise-table order. A file that cannot be opened
    /// fails with [`DataError::Open`] naming the table and path.
    ///
    /// # Examples
    ///
    /// ```
    /// use burnfit_data::{DataError, DatasetPaths};
    ///
    /// let paths = DatasetPaths {
    ///     exercise: "/nonexistent/exercise.csv".into(),
    ///     calories: "/nonexistent/calories.csv".into(),
    /// };
    /// assert!(matches!(paths.load(), Err(DataError::Open { .. })));
    /// ```
    pub fn load(&self) -> Result<Vec<JoinedRecord>, DataError> {
        let exercise = open(Table::Exercise, &self.exercise)?;
        let calories = open(Table::Calories, &self.calories)?;
        load_from_readers(exercise, calories)
    }
}

fn open(table: Table, path: &Path) -> Result<BufReader<File>, DataError> {
    let file = File::open(path).map_err(|source| DataError::Open {
        table,
        path: path.to_owned(),
        source,
    })?;
    Ok(BufReader::new(file))
}

/// Reads both tables from arbitrary readers and returns the joined dataset.
///
/// # Arguments
///
/// * `exercise` - CSV source of the exercise table
/// * `calories` - CSV source of the calorie table
///
/// # Returns
///
/// The rows of [`join`] over both tables.
///
/// # Examples
///
/// ```
/// use burnfit_data::loader;
///
/// let exercise = "\
/// User_ID,Gender,Age,Height,Weight,Duration,Heart_Rate,Body_Temp
/// 14733363,male,68,190,94,29,105,40.8
/// 14861698,female,20,166,60,14,94,40.3
/// ";
/// let calories = "User_ID,Calories\n14861698,66\n";
/// let records = loader::load_from_readers(exercise.as_bytes(), calories.as_bytes()).unwrap();
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].calories, 66.0);
/// assert_eq!(records[0].bmi, 21.77);
/// ```
pub fn load_from_readers<E, C>(exercise: E, calories: C) -> Result<Vec<JoinedRecord>, DataError>
where
    E: Read,
    C: Read,
{
    let exercise = read_exercise(exercise)?;
    let calories = read_calories(calories)?;
    Ok(join(&exercise, &calories))
}

/// Inner-joins exercise rows with calorie rows on `user_id`.
///
/// Output order follows `exercise`. Rows whose `user_id` appears in only one
/// table are dropped; a `user_id` repeated in `calories` yields one joined row
/// per match.
///
/// # Arguments
///
/// * `exercise` - rows of the exercise table
/// * `calories` - rows of the calorie table
///
/// # Returns
///
/// One [`JoinedRecord`] per matching pair, with `bmi` derived.
///
/// # Examples
///
/// ```
/// use burnfit_data::{CalorieRecord, ExerciseRecord, Gender, loader};
///
/// let exercise = [ExerciseRecord {
///     user_id: "7".to_owned(),
///     gender: Gender::Female,
///     age: 31.0,
///     height_cm: 160.0,
///     weight_kg: 64.0,
///     duration_min: 12.0,
///     heart_rate: 92.0,
///     body_temp_c: 40.0,
/// }];
/// let calories = [
///     CalorieRecord { user_id: "7".to_owned(), calories: 48.0 },
///     CalorieRecord { user_id: "8".to_owned(), calories: 80.0 },
/// ];
/// let joined = loader::join(&exercise, &calories);
/// assert_eq!(joined.len(), 1);
/// assert_eq!(joined[0].bmi, 25.0);
/// ```
#[must_use]
pub fn join(exercise: &[ExerciseRecord], calories: &[CalorieRecord]) -> Vec<JoinedRecord> {
    let mut by_user: HashMap<&str, Vec<f64>> = HashMap::new();
    for record in calories {
        by_user
            .entry(record.user_id.as_str())
            .or_default()
            .push(record.calories);
    }

    exercise
        .iter()
        .flat_map(|record| {
            by_user
                .get(record.user_id.as_str())
                .into_iter()
                .flatten()
                .map(move |&calories| JoinedRecord::new(record, calories))
        })
        .collect()
}

/// Reads the exercise table.
///
/// # Arguments
///
/// * `reader` - CSV source with a header row
///
/// # Returns
///
/// One [`ExerciseRecord`] per data row. A missing required column fails with
/// [`DataError::MissingColumn`]; a gender other than male or female fails
/// with [`DataError::UnknownCategory`].
///
/// # Examples
///
/// ```
/// use burnfit_data::{DataError, loader};
///
/// let table = "User_ID,Gender,Age\n1,male,30\n";
/// let err = loader::read_exercise(table.as_bytes()).unwrap_err();
/// assert!(matches!(err, DataError::MissingColumn { column: "Height", .. }));
/// ```
pub fn read_exercise<R>(reader: R) -> Result<Vec<ExerciseRecord>, DataError>
where
    R: Read,
{
    const TABLE: Table = Table::Exercise;

    let mut reader = csv_reader(reader);
    let headers = read_headers(TABLE, &mut reader)?;
    let user_id = column_index(TABLE, &headers, USER_ID)?;
    let gender = column_index(TABLE, &headers, GENDER)?;
    let age = column_index(TABLE, &headers, AGE)?;
    let height = column_index(TABLE, &headers, HEIGHT)?;
    let weight = column_index(TABLE, &headers, WEIGHT)?;
    let duration = column_index(TABLE, &headers, DURATION)?;
    let heart_rate = column_index(TABLE, &headers, HEART_RATE)?;
    let body_temp = column_index(TABLE, &headers, BODY_TEMP)?;

    reader
        .records()
        .enumerate()
        .map(|(row, record)| {
            let record = record.map_err(|source| DataError::Read {
                table: TABLE,
                source,
            })?;
            let gender_cell = cell(&record, gender);
            let gender = gender_cell
                .parse::<Gender>()
                .map_err(|_| DataError::UnknownCategory {
                    table: TABLE,
                    column: GENDER,
                    row,
                    value: gender_cell.to_owned(),
                })?;
            Ok(ExerciseRecord {
                user_id: cell(&record, user_id).to_owned(),
                gender,
                age: number(&record, age),
                height_cm: number(&record, height),
                weight_kg: number(&record, weight),
                duration_min: number(&record, duration),
                heart_rate: number(&record, heart_rate),
                body_temp_c: number(&record, body_temp),
            })
        })
        .collect()
}

/// Reads the calorie table.
///
/// # Arguments
///
/// * `reader` - CSV source with a header row
///
/// # Returns
///
/// One [`CalorieRecord`] per data row; empty or unparsable calorie cells
/// load as `NaN`.
///
/// # Examples
///
/// ```
/// use burnfit_data::loader;
///
/// let table = "User_ID,Calories\n1,231\n2,\n";
/// let records = loader::read_calories(table.as_bytes()).unwrap();
/// assert_eq!(records[0].calories, 231.0);
/// assert!(records[1].calories.is_nan());
/// ```
pub fn read_calories<R>(reader: R) -> Result<Vec<CalorieRecord>, DataError>
where
    R: Read,
{
    const TABLE: Table = Table::Calories;

    let mut reader = csv_reader(reader);
    let headers = read_headers(TABLE, &mut reader)?;
    let user_id = column_index(TABLE, &headers, USER_ID)?;
    let calories = column_index(TABLE, &headers, CALORIES)?;

    reader
        .records()
        .map(|record| {
            let record = record.map_err(|source| DataError::Read {
                table: TABLE,
                source,
            })?;
            Ok(CalorieRecord {
                user_id: cell(&record, user_id).to_owned(),
                calories: number(&record, calories),
            })
        })
        .collect()
}

fn csv_reader<R>(reader: R) -> csv::Reader<R>
where
    R: Read,
{
    csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader)
}

fn read_headers<R>(table: Table, reader: &mut csv::Reader<R>) -> Result<StringRecord, DataError>
where
    R: Read,
{
    reader
        .headers()
        .cloned()
        .map_err(|source| DataError::Read { table, source })
}

fn column_index(
    table: Table,
    headers: &StringRecord,
    column: &'static str,
) -> Result<usize, DataError> {
    headers
        .iter()
        .position(|h| h == column)
        .ok_or(DataError::MissingColumn { table, column })
}

fn cell(record: &StringRecord, index: usize) -> &str {
    record.get(index).unwrap_or_default()
}

fn number(record: &StringRecord, index: usize) -> f64 {
    cell(record, index).parse().unwrap_or(f64::NAN)
}
