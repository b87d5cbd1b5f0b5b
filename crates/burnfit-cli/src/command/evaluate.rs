use std::path::PathBuf;

use burnfit_estimator::{PipelineConfig, pipeline};

use crate::{
    command::DataArg,
    util::{self, KindContext as _},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct EvaluateArg {
    #[command(flatten)]
    data: DataArg,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &EvaluateArg) -> anyhow::Result<()> {
    let records = arg.data.load()?;
    let config = PipelineConfig::default();
    eprintln!(
        "Training on {:.0}% of the records, holding out the rest...",
        (1.0 - config.holdout_ratio) * 100.0
    );
    let report = pipeline::evaluate_records(&records, &config).kind_context()?;
    eprintln!(
        "Holdout ({} rows): MAE {:.2}, RMSE {:.2}, R2 {:.4}",
        report.test_rows, report.metrics.mae, report.metrics.rmse, report.metrics.r2
    );

    util::save_json(&report, arg.output.as_deref())?;
    Ok(())
}
