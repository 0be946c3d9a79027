use anyhow::Result;
use arrow::record_batch::RecordBatch;
use log::info;
use parquet::arrow::ArrowWriter;
use parquet::file::properties::WriterProperties;
use std::fs::{create_dir_all, File};
use std::path::{Path, PathBuf};

pub struct ParquetFormatter {
    output_directory: String,
    chunk_size: usize,
}

impl ParquetFormatter {
    pub fn new(output_directory: String, chunk_size: usize) -> Self {
        Self {
            output_directory,
            chunk_size,
        }
    }

    /// Write `batch` as `file_part000.parquet`, `file_part001.parquet`, ... with at most
    /// `chunk_size` samples each. Returns the written paths.
    pub fn convert(&self, batch: &RecordBatch) -> Result<Vec<PathBuf>> {
        if batch.num_rows() == 0 {
            anyhow::bail!("No samples to write to Parquet");
        }
        if batch.num_columns() == 0 {
            anyhow::bail!("No fields to write to Parquet");
        }
        if self.chunk_size == 0 {
            anyhow::bail!("Chunk size must be at least 1");
        }

        create_dir_all(&self.output_directory)?;

        let total_chunks = batch.num_rows().div_ceil(self.chunk_size);
        info!(
            "Generated a total of {} chunks, will now create that total amount of files.",
            total_chunks
        );

        let mut paths = Vec::with_capacity(total_chunks);
        for i in 0..total_chunks {
            let offset = i * self.chunk_size;
            let chunk = batch.slice(offset, self.chunk_size.min(batch.num_rows() - offset));
            info!(
                "Writing chunk {}/{}, {} rows",
                i + 1,
                total_chunks,
                chunk.num_rows()
            );

            let output_path =
                Path::new(&self.output_directory).join(format!("file_part{:03}.parquet", i));
            self.write_chunk_to_parquet(&chunk, &output_path)?;
            paths.push(output_path);
        }

        info!("All chunks have been written");
        Ok(paths)
    }

    fn write_chunk_to_parquet(&self, chunk: &RecordBatch, output_path: &Path) -> Result<()> {
        let file = File::create(output_path)?;
        let props = WriterProperties::builder().build();
        let mut writer = ArrowWriter::try_new(file, chunk.schema(), Some(props))?;

        writer.write(chunk)?;
        writer.close()?;

        Ok(())
    }
}
