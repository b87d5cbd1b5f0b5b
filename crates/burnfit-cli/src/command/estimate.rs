use std::path::PathBuf;

use burnfit_data::{Gender, features};
use burnfit_estimator::{
    EstimateError, PipelineConfig, QueryInput,
    pipeline::{self, Estimate},
};

use crate::{
    command::DataArg,
    util::{self, KindContext as _},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct EstimateArg {
    #[command(flatten)]
    data: DataArg,
    /// Age in years (10-100)
    #[arg(long)]
    age: u32,
    /// Body mass index (15-40)
    #[arg(
        long,
        required_unless_present_all = ["weight_kg", "height_cm"],
        conflicts_with_all = ["weight_kg", "height_cm"],
    )]
    bmi: Option<u32>,
    /// Body weight in kilograms, used with --height-cm instead of --bmi;
    /// the derived BMI is rounded to a whole number
    #[arg(long, requires = "height_cm")]
    weight_kg: Option<f64>,
    /// Height in centimeters, used with --weight-kg instead of --bmi
    #[arg(long, requires = "weight_kg")]
    height_cm: Option<f64>,
    /// Workout duration in minutes (0-35)
    #[arg(long)]
    duration: u32,
    /// Heart rate in beats per minute (60-130)
    #[arg(long)]
    heart_rate: u32,
    /// Body temperature in degrees Celsius (36-42)
    #[arg(long)]
    body_temp: u32,
    /// male or female
    #[arg(long)]
    gender: Gender,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

impl EstimateArg {
    fn query(&self) -> anyhow::Result<QueryInput> {
        let bmi = match (self.bmi, self.weight_kg, self.height_cm) {
            (Some(bmi), _, _) => bmi,
            (None, Some(weight_kg), Some(height_cm)) => whole_bmi(weight_kg, height_cm),
            _ => anyhow::bail!("either --bmi or both --weight-kg and --height-cm are required"),
        };
        Ok(QueryInput {
            age: self.age,
            bmi,
            duration: self.duration,
            heart_rate: self.heart_rate,
            body_temp: self.body_temp,
            gender: self.gender,
        })
    }
}

/// BMI from body measurements, rounded half to even to the slider's whole units.
///
/// Non-finite or negative results saturate to 0 and fail range validation.
#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn whole_bmi(weight_kg: f64, height_cm: f64) -> u32 {
    features::bmi(weight_kg, height_cm).round_ties_even() as u32
}

pub(crate) fn run(arg: &EstimateArg) -> anyhow::Result<()> {
    let query = arg.query()?;
    query
        .validate()
        .map_err(EstimateError::from)
        .kind_context()?;

    let records = arg.data.load()?;
    let config = PipelineConfig::default();
    eprintln!(
        "Training {} trees (max depth {}, {} features per split)...",
        config.forest.n_trees, config.forest.max_depth, config.forest.max_features
    );
    let estimate = pipeline::estimate_with_records(&records, &query, &config).kind_context()?;
    report(&estimate);

    util::save_json(&estimate, arg.output.as_deref())?;
    Ok(())
}

fn report(estimate: &Estimate) {
    let explanation = &estimate.explanation;
    eprintln!("Estimated {}", estimate.prediction);
    eprintln!(
        "{} similar records within the window, showing {}",
        explanation.similar_count,
        explanation.similar_records.len()
    );
    eprintln!(
        "Standing: age {:.2}, duration {:.2}, heart rate {:.2}, body temperature {:.2}",
        explanation.percentile_age,
        explanation.percentile_duration,
        explanation.percentile_heart_rate,
        explanation.percentile_body_temp
    );
}

#[cfg(test)]
mod tests {
    use clap::Parser as _;

    use super::*;

    #[derive(Debug, clap::Parser)]
    struct Wrapper {
        #[command(flatten)]
        arg: EstimateArg,
    }

    fn parse(extra: &[&str]) -> EstimateArg {
        try_parse(extra).unwrap()
    }

    fn try_parse(extra: &[&str]) -> Result<EstimateArg, clap::Error> {
        let base = [
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
            "Male",
        ];
        Wrapper::try_parse_from(base.iter().chain(extra).copied()).map(|w| w.arg)
    }

    #[test]
    fn test_bmi_is_derived_from_body_measurements() {
        let query = parse(&["--weight-kg", "70", "--height-cm", "175"])
            .query()
            .unwrap();
        // 22.86 rounds to the nearest whole slider value.
        assert_eq!(query.bmi, 23);
        assert_eq!(query.gender, Gender::Male);
        assert!(query.validate().is_ok());
    }

    #[test]
    fn test_whole_bmi_rounding() {
        assert_eq!(whole_bmi(81.0, 180.0), 25);
        assert_eq!(whole_bmi(60.0, 166.0), 22);
        assert_eq!(whole_bmi(f64::NAN, 170.0), 0);
    }

    #[test]
    fn test_fractional_slider_values_are_rejected() {
        assert!(try_parse(&["--bmi", "22.5"]).is_err());
        assert!(try_parse(&["--bmi", "22", "--duration", "15.25"]).is_err());
        assert!(try_parse(&["--bmi", "22", "--heart-rate", "80.5"]).is_err());
        assert!(try_parse(&["--bmi", "22", "--body-temp", "38.7"]).is_err());
        assert!(try_parse(&["--bmi", "22"]).is_ok());
    }

    #[test]
    fn test_bmi_is_taken_as_given() {
        let query = parse(&["--bmi", "31"]).query().unwrap();
        assert_eq!(query.bmi, 31);
        assert_eq!(query.age, 30);
    }
}
