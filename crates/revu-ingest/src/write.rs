//! File-writing stage.

use std::fs::File;
use std::path::{Path, PathBuf};

use polars::prelude::{CsvWriter, DataFrame, SerWriter};

use revu_model::Result;
use revu_pipeline::{PipelineValue, Stage};
use tracing::{error, info};

/// Writes the incoming table to a CSV destination and passes the
/// destination path downstream.
#[derive(Debug, Clone)]
pub struct WriteCsv {
    dest: PathBuf,
}

impl WriteCsv {
    pub fn new(dest: impl Into<PathBuf>) -> Self {
        Self { dest: dest.into() }
    }

    pub fn dest(&self) -> &Path {
        &self.dest
    }
}

impl Stage for WriteCsv {
    fn name(&self) -> &str {
        "write_csv"
    }

    fn step(&self, input: PipelineValue) -> Result<PipelineValue> {
        let mut df = input.into_table(self.name())?;
        if let Err(err) = write_frame(&mut df, &self.dest) {
            error!(dest = %self.dest.display(), operation = "csv write", %err, "write failed");
            return Err(err);
        }
        info!(dest = %self.dest.display(), rows = df.height(), "wrote csv");
        Ok(PipelineValue::Path(self.dest.clone()))
    }
}

fn write_frame(df: &mut DataFrame, dest: &Path) -> Result<()> {
    let mut file = File::create(dest)?;
    CsvWriter::new(&mut file).include_header(true).finish(df)?;
    Ok(())
}
