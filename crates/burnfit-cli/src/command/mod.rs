use std::path::PathBuf;

use burnfit_data::{
    DatasetPaths, JoinedRecord,
    loader::{DEFAULT_CALORIES_FILE, DEFAULT_EXERCISE_FILE},
};
use burnfit_estimator::EstimateError;
use clap::{Parser, Subcommand};

use self::{describe::DescribeArg, estimate::EstimateArg, evaluate::EvaluateArg};
use crate::util::KindContext as _;

mod describe;
mod estimate;
mod evaluate;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Estimate calories burned for one workout and explain the estimate
    Estimate(#[clap(flatten)] EstimateArg),
    /// Train once and report holdout error metrics
    Evaluate(#[clap(flatten)] EvaluateArg),
    /// Summarize the joined dataset column by column
    Describe(#[clap(flatten)] DescribeArg),
}

/// Locations of the source tables.
#[derive(Debug, Clone, clap::Args)]
pub(crate) struct DataArg {
    /// Exercise table (CSV)
    #[arg(long, default_value = DEFAULT_EXERCISE_FILE)]
    exercise: PathBuf,
    /// Calorie table (CSV)
    #[arg(long, default_value = DEFAULT_CALORIES_FILE)]
    calories: PathBuf,
}

impl DataArg {
    pub(crate) fn paths(&self) -> DatasetPaths {
        DatasetPaths {
            exercise: self.exercise.clone(),
            calories: self.calories.clone(),
        }
    }

    pub(crate) fn load(&self) -> anyhow::Result<Vec<JoinedRecord>> {
        eprintln!(
            "Loading {} and {}...",
            self.exercise.display(),
            self.calories.display()
        );
        let records = self
            .paths()
            .load()
            .map_err(EstimateError::from)
            .kind_context()?;
        eprintln!("Joined {} records", records.len());
        Ok(records)
    }
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Estimate(arg) => estimate::run(&arg)?,
        Mode::Evaluate(arg) => evaluate::run(&arg)?,
        Mode::Describe(arg) => describe::run(&arg)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;

    use super::*;

    #[test]
    fn test_command_definition() {
        CommandArgs::command().debug_assert();
    }

    #[test]
    fn test_estimate_accepts_bmi_or_body_measurements() {
        let base = [
            "burnfit",
            "estimate",
            "--age",
            "30",
            "--duration",
            "15",
            "--heart-rate",
            "95",
            "--body-temp",
            "39",
            "--gender",
            "female",
        ];
        let with = |extra: &[&'static str]| {
            CommandArgs::try_parse_from(base.iter().chain(extra).copied())
        };

        assert!(with(&["--bmi", "22"]).is_ok());
        assert!(with(&["--weight-kg", "70", "--height-cm", "175"]).is_ok());
        assert!(with(&[]).is_err());
        assert!(with(&["--weight-kg", "70"]).is_err());
        assert!(with(&["--bmi", "22", "--weight-kg", "70", "--height-cm", "175"]).is_err());
    }

    #[test]
    fn test_data_paths_default_to_working_directory() {
        #[derive(Debug, Parser)]
        struct Wrapper {
            #[command(flatten)]
            data: DataArg,
        }

        let wrapper = Wrapper::try_parse_from(["describe"]).unwrap();
        assert_eq!(wrapper.data.paths(), DatasetPaths::default());
        let wrapper = Wrapper::try_parse_from(["describe", "--calories", "data/c.csv"]).unwrap();
        assert_eq!(wrapper.data.paths().calories, PathBuf::from("data/c.csv"));
    }
}
