use std::{fmt::Write as _, path::PathBuf};

use burnfit_data::summary::{self, ColumnSummary};

use crate::{command::DataArg, util};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct DescribeArg {
    #[command(flatten)]
    data: DataArg,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &DescribeArg) -> anyhow::Result<()> {
    let records = arg.data.load()?;
    let summary = summary::summarize(&records);
    eprintln!(
        "{} rows ({} male, {} female)",
        summary.rows, summary.male, summary.female
    );
    for column in &summary.columns {
        eprintln!("{}", column_line(column));
    }

    util::save_json(&summary, arg.output.as_deref())?;
    Ok(())
}

fn column_line(column: &ColumnSummary) -> String {
    let mut line = format!("{:<10}", column.column);
    match &column.stats {
        Some(stats) => {
            let _ = write!(line, " mean {:.2} sd {:.2}", stats.mean, stats.std_dev);
            for point in column.quartiles.iter() {
                let _ = write!(line, " p{} {:.2}", point.percentile, point.value);
            }
        }
        None => line.push_str(" no values"),
    }
    if column.missing > 0 {
        let _ = write!(line, " ({} missing)", column.missing);
    }
    line
}
