use anyhow::Result;
use arrow::csv::WriterBuilder;
use arrow::record_batch::RecordBatch;
use log::info;
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::rawlog::{tokenize, LogLine, RecordKind};

pub struct CsvFormatter {
    output_path: PathBuf,
}

impl CsvFormatter {
    pub fn new<P: AsRef<Path>>(output_path: P) -> Self {
        Self {
            output_path: output_path.as_ref().to_path_buf(),
        }
    }

    /// Write `batch` with a header row. Null cells are written empty.
    pub fn convert(&self, batch: &RecordBatch) -> Result<()> {
        if let Some(parent) = self.output_path.parent() {
            if !parent.as_os_str().is_empty() {
                create_dir_all(parent)?;
            }
        }

        let file = File::create(&self.output_path)?;
        let mut writer = WriterBuilder::new().with_header(true).build(file);
        writer.write(batch)?;

        info!(
            "Wrote {} rows to {}",
            batch.num_rows(),
            self.output_path.display()
        );
        Ok(())
    }
}

/// Copy the header fields and data values of one record kind from a raw log into
/// `<output_directory>/<Kind>.csv`, without the kind token.
pub fn extract_kind_csv(
    log_text: &str,
    output_directory: &Path,
    kind: RecordKind,
    marker: char,
) -> Result<PathBuf> {
    create_dir_all(output_directory)?;
    let output_path = output_directory.join(format!("{}.csv", kind));
    let mut out = BufWriter::new(File::create(&output_path)?);

    for line in log_text.lines() {
        let tokens = match tokenize(line, marker) {
            LogLine::Header { kind: k, fields } if k == kind => fields,
            LogLine::Data { kind: k, values } if k == kind => values,
            _ => continue,
        };
        writeln!(out, "{}", tokens.join(","))?;
    }
    out.flush()?;

    Ok(output_path)
}
