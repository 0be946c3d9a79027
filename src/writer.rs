//! High-level API for writing navigation data stores to Parquet and CSV.
//!
//! Both writers go through [`NavData::to_record_batch`], so categorical fields are written as
//! their decoded strings and, with a [`ColumnMap`], under their external names.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::formats::csv::CsvFormatter;
use crate::formats::parquet::ParquetFormatter;
use crate::navdata::NavData;
use crate::tabular::ColumnMap;

/// Writer for outputting a store to Apache Parquet format.
///
/// # Examples
///
/// ```no_run
/// use gnss_navdata::{AndroidRawLog, ParquetWriter};
///
/// let log = AndroidRawLog::from_file("gnss_log.txt")?;
/// let raw = log.raw_gnss()?;
///
/// ParquetWriter::new("output_dir")
///     .write(&raw)?;
/// # Ok::<(), gnss_navdata::Error>(())
/// ```
pub struct ParquetWriter {
    output_directory: String,
    chunk_size: usize,
    column_map: Option<ColumnMap>,
}

impl ParquetWriter {
    /// Create a new Parquet writer that will write to the specified directory.
    ///
    /// # Arguments
    ///
    /// * `output_directory` - Directory where `file_partNNN.parquet` files will be written
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use gnss_navdata::ParquetWriter;
    ///
    /// let writer = ParquetWriter::new("./output");
    /// ```
    pub fn new<P: AsRef<Path>>(output_directory: P) -> Self {
        Self {
            output_directory: output_directory.as_ref().to_string_lossy().to_string(),
            chunk_size: 50_000,
            column_map: None,
        }
    }

    /// Set the number of samples per Parquet file.
    ///
    /// Long logs are split across several files, each holding at most `size` samples.
    /// Default is 50,000 samples per file.
    ///
    /// # Arguments
    ///
    /// * `size` - Number of samples per Parquet file
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use gnss_navdata::ParquetWriter;
    ///
    /// let writer = ParquetWriter::new("./output")
    ///     .chunk_size(100_000);
    /// ```
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size;
        self
    }

    /// Write fields under the external names of `map`.
    pub fn column_map(mut self, map: ColumnMap) -> Self {
        self.column_map = Some(map);
        self
    }

    /// Write the store, creating `file_part000.parquet`, `file_part001.parquet`, etc.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The store is empty or has no fields
    /// - A categorical cell holds a code its codec never assigned
    /// - The output directory or the Parquet files cannot be written
    pub fn write(self, nav: &NavData) -> Result<Vec<PathBuf>> {
        let batch = nav.to_record_batch(self.column_map.as_ref())?;
        let formatter = ParquetFormatter::new(self.output_directory, self.chunk_size);

        formatter
            .convert(&batch)
            .map_err(|e| Error::OutputError(e.to_string()))
    }

    /// Write the store and return statistics about the write operation.
    pub fn write_with_stats(self, nav: &NavData) -> Result<WriteStats> {
        let chunk_size = self.chunk_size;
        let num_fields = nav.num_fields();
        let files = self.write(nav)?;

        Ok(WriteStats {
            num_samples: nav.len(),
            num_fields,
            num_chunks: files.len(),
            chunk_size,
        })
    }
}

/// Statistics about a Parquet write operation.
#[derive(Debug, Clone)]
pub struct WriteStats {
    /// Total number of samples written
    pub num_samples: usize,
    /// Number of fields (columns in the output)
    pub num_fields: usize,
    /// Number of Parquet files created
    pub num_chunks: usize,
    /// Samples per file (chunk size)
    pub chunk_size: usize,
}

impl WriteStats {
    /// Get a human-readable summary of the write operation.
    pub fn summary(&self) -> String {
        format!(
            "Wrote {} samples x {} fields across {} file(s) ({} rows per file)",
            self.num_samples, self.num_fields, self.num_chunks, self.chunk_size
        )
    }
}

/// Builder for configuring Parquet write options.
pub struct ParquetWriterBuilder {
    output_directory: Option<String>,
    chunk_size: usize,
    column_map: Option<ColumnMap>,
}

impl ParquetWriterBuilder {
    /// Create a new Parquet writer builder with default options.
    pub fn new() -> Self {
        Self {
            output_directory: None,
            chunk_size: 50_000,
            column_map: None,
        }
    }

    /// Set the output directory.
    pub fn output_directory<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.output_directory = Some(path.as_ref().to_string_lossy().to_string());
        self
    }

    /// Set the chunk size.
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size;
        self
    }

    /// Set the rename table applied on output.
    pub fn column_map(mut self, map: ColumnMap) -> Self {
        self.column_map = Some(map);
        self
    }

    /// Build the Parquet writer.
    ///
    /// # Errors
    ///
    /// Returns an error if output_directory was not set.
    pub fn build(self) -> Result<ParquetWriter> {
        let output_directory = self
            .output_directory
            .ok_or_else(|| Error::Other("Output directory not set".to_string()))?;

        Ok(ParquetWriter {
            output_directory,
            chunk_size: self.chunk_size,
            column_map: self.column_map,
        })
    }
}

impl Default for ParquetWriterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Writer for outputting a store to a single CSV file.
pub struct CsvWriter {
    output_path: PathBuf,
    column_map: Option<ColumnMap>,
}

impl CsvWriter {
    pub fn new<P: AsRef<Path>>(output_path: P) -> Self {
        Self {
            output_path: output_path.as_ref().to_path_buf(),
            column_map: None,
        }
    }

    /// Write fields under the external names of `map`.
    pub fn column_map(mut self, map: ColumnMap) -> Self {
        self.column_map = Some(map);
        self
    }

    pub fn write(self, nav: &NavData) -> Result<PathBuf> {
        let batch = nav.to_record_batch(self.column_map.as_ref())?;
        CsvFormatter::new(&self.output_path)
            .convert(&batch)
            .map_err(|e| Error::OutputError(e.to_string()))?;
        Ok(self.output_path)
    }
}
