//! # GNSS NavData
//!
//! A Rust library for loading Android GNSS measurement logs into a uniform, array-backed
//! table (`NavData`) for positioning research.
//!
//! ## Features
//!
//! - **Raw log parsing**: single-pass parser for GnssLogger text logs (`Raw`, `Accel`,
//!   `Gyro`, `Mag`, `Fix` records), tolerant of out-of-order and malformed lines
//! - **Columnar store**: every field is a row of one dense `f64` array, with name-based row
//!   selection and index/range/mask column selection
//! - **Categorical data**: string fields are stored as codes with a per-field codec
//! - **Derived CSV loading**: vendor exports renamed to a standard vocabulary
//! - **Interop**: conversion to Arrow record batches, CSV and Parquet output
//!
//! ## Quick Start
//!
//! ```no_run
//! use gnss_navdata::{AndroidRawLog, ParquetWriter};
//!
//! // Parse a raw GnssLogger file once
//! let log = AndroidRawLog::from_file("gnss_log.txt")?;
//!
//! let raw = log.raw_gnss()?;
//! let imu = log.imu()?;
//! println!("{} raw measurements, {} IMU samples", raw.len(), imu.len());
//!
//! // Write to Parquet format
//! ParquetWriter::new("output_directory")
//!     .chunk_size(100_000)
//!     .write(&raw)?;
//! # Ok::<(), gnss_navdata::Error>(())
//! ```
//!
//! ## Indexing
//!
//! Reads return raw numbers; categorical rows are decoded explicitly:
//!
//! ```no_run
//! use gnss_navdata::{read_derived, Cols, Rows, Selector};
//!
//! let mut derived = read_derived("derived.csv")?;
//!
//! let first_signal = derived.decode("signal_type", Cols::Index(0))?;
//! let velocities = derived.get(vec!["vx_sat_mps", "vy_sat_mps", "vz_sat_mps"], ..)?;
//! println!("{:?} {:?}", first_signal, velocities.shape());
//!
//! // Keep only GPS measurements
//! let gps: Vec<bool> = derived.row("gnss_id")?.iter().map(|&id| id == 1.0).collect();
//! let kept = derived.get(Rows::All, gps)?;
//! derived.set(Selector::WholeStore, kept)?;
//! # Ok::<(), gnss_navdata::Error>(())
//! ```
//!
//! ## Error Handling
//!
//! All operations return `Result<T, Error>`:
//!
//! ```no_run
//! use gnss_navdata::{AndroidRawLog, Error};
//!
//! match AndroidRawLog::from_file("gnss_log.txt") {
//!     Ok(log) => {
//!         println!("dropped {} lines", log.stats().dropped());
//!     }
//!     Err(Error::FileNotFound(path)) => {
//!         eprintln!("No such log: {}", path.display());
//!     }
//!     Err(err) => {
//!         eprintln!("Error: {}", err);
//!     }
//! }
//! ```

// Public API modules
pub mod error;
pub mod navdata;
pub mod reader;
pub mod writer;

// Re-export commonly used types
pub use codec::Codec;
pub use error::{Error, Result};
pub use formats::android::{read_derived, CORRECTED_PSEUDORANGE};
pub use matrix::Matrix;
pub use navdata::NavData;
pub use rawlog::{ParseStats, RecordKind};
pub use reader::{read_fixes, read_imu, read_raw_gnss, AndroidRawLog, RawLogReaderBuilder};
pub use selector::{Cols, Rows, Selector, Values};
pub use tabular::ColumnMap;
pub use writer::{CsvWriter, ParquetWriter, ParquetWriterBuilder, WriteStats};

// Internal modules (public but not part of the high-level API)
pub mod builder;
pub mod codec;
pub mod formats;
pub mod matrix;
pub mod models;
pub mod rawlog;
pub mod selector;
pub mod tabular;
