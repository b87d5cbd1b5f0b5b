use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use anyhow::Context as _;
use burnfit_estimator::EstimateError;

/// Writes `value` as pretty JSON to `output_path`, or to stdout when `None`.
pub fn save_json<T>(value: &T, output_path: Option<&Path>) -> anyhow::Result<()>
where
    T: serde::Serialize,
{
    match output_path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            write_json(BufWriter::new(file), value)
                .with_context(|| format!("Failed to write JSON to {}", path.display()))?;
            eprintln!("Wrote {}", path.display());
        }
        None => write_json(io::stdout().lock(), value).context("Failed to write JSON to stdout")?,
    }
    Ok(())
}

fn write_json<W, T>(mut writer: W, value: &T) -> anyhow::Result<()>
where
    W: Write,
    T: serde::Serialize,
{
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Tags a pipeline error with its [`ErrorKind`](burnfit_estimator::ErrorKind).
pub trait KindContext<T> {
    fn kind_context(self) -> anyhow::Result<T>;
}

impl<T> KindContext<T> for Result<T, EstimateError> {
    fn kind_context(self) -> anyhow::Result<T> {
        self.map_err(|err| {
            let kind = err.kind();
            anyhow::Error::new(err).context(kind)
        })
    }
}
