pub mod android;
pub mod csv;
pub mod parquet;
