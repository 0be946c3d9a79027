//! High-level API for reading Android GnssLogger text logs.

use memmap2::Mmap;
use std::fs::File;
use std::path::Path;

use crate::builder::{build_imu, build_renamed};
use crate::error::{Error, Result};
use crate::formats::android::{imu_column_map, raw_gnss_column_map};
use crate::navdata::NavData;
use crate::rawlog::{ParseStats, ParsedLog, RawLogParser, RecordKind, DEFAULT_COMMENT_MARKER};

/// Check that `path` names an existing regular file before anything is parsed.
///
/// # Errors
///
/// * [`Error::UnsupportedInputType`] for an empty path or a path that is not a regular file
/// * [`Error::FileNotFound`] when nothing exists at `path`
pub fn validate_input_path(path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(Error::UnsupportedInputType(
            "expected a file path, got an empty path".to_string(),
        ));
    }
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }
    if !path.is_file() {
        return Err(Error::UnsupportedInputType(format!(
            "'{}' is not a regular file",
            path.display()
        )));
    }
    Ok(())
}

/// A parsed Android raw log from which IMU, fix and raw GNSS stores can be built.
///
/// # Examples
///
/// ```no_run
/// use gnss_navdata::AndroidRawLog;
///
/// let log = AndroidRawLog::from_file("gnss_log.txt")?;
/// let raw = log.raw_gnss()?;
/// let fixes = log.fixes()?;
///
/// println!("{} raw measurements, {} fixes", raw.len(), fixes.len());
/// # Ok::<(), gnss_navdata::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct AndroidRawLog {
    parsed: ParsedLog,
}

impl AndroidRawLog {
    /// Parse every supported record kind of the log at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is invalid or the file cannot be read. Malformed lines
    /// are skipped, not reported as errors; see [`AndroidRawLog::stats`].
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        RawLogReaderBuilder::new().from_file(path)
    }

    /// Parse a log already held in memory.
    pub fn from_text(text: &str) -> Self {
        RawLogReaderBuilder::new().from_text(text)
    }

    pub fn parsed(&self) -> &ParsedLog {
        &self.parsed
    }

    pub fn stats(&self) -> &ParseStats {
        self.parsed.stats()
    }

    /// Accelerometer, gyroscope and magnetometer samples merged on the Accel clock.
    pub fn imu(&self) -> Result<NavData> {
        build_imu(
            self.parsed.records(RecordKind::Accel),
            self.parsed.records(RecordKind::Gyro),
            self.parsed.records(RecordKind::Mag),
            &imu_column_map(),
        )
    }

    /// Location fixes with the log's own field names.
    pub fn fixes(&self) -> Result<NavData> {
        NavData::from_records(self.parsed.records(RecordKind::Fix))
    }

    /// Raw GNSS measurements with normalized field names.
    pub fn raw_gnss(&self) -> Result<NavData> {
        build_renamed(self.parsed.records(RecordKind::Raw), &raw_gnss_column_map())
    }

    /// Build the store for one kind. `Accel`, `Gyro` and `Mag` all yield the IMU store.
    pub fn store(&self, kind: RecordKind) -> Result<NavData> {
        match kind {
            RecordKind::Raw => self.raw_gnss(),
            RecordKind::Fix => self.fixes(),
            RecordKind::Accel | RecordKind::Gyro | RecordKind::Mag => self.imu(),
        }
    }
}

/// Builder for configuring raw log parsing.
///
/// # Examples
///
/// ```no_run
/// use gnss_navdata::{RawLogReaderBuilder, RecordKind};
///
/// let log = RawLogReaderBuilder::new()
///     .kinds([RecordKind::Fix])
///     .from_file("gnss_log.txt")?;
/// let fixes = log.fixes()?;
/// # Ok::<(), gnss_navdata::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct RawLogReaderBuilder {
    comment_marker: char,
    kinds: Option<Vec<RecordKind>>,
}

impl RawLogReaderBuilder {
    /// Create a new reader builder with default options.
    pub fn new() -> Self {
        Self {
            comment_marker: DEFAULT_COMMENT_MARKER,
            kinds: None,
        }
    }

    /// Set the character that starts header and comment lines. Default is `#`.
    pub fn comment_marker(mut self, marker: char) -> Self {
        self.comment_marker = marker;
        self
    }

    /// Only keep records of these kinds. Default is every kind.
    ///
    /// Header and data lines of other kinds are counted as ignored and never buffered.
    ///
    /// # Arguments
    ///
    /// * `kinds` - Record kinds to keep
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use gnss_navdata::{RawLogReaderBuilder, RecordKind};
    ///
    /// let log = RawLogReaderBuilder::new()
    ///     .kinds([RecordKind::Accel, RecordKind::Gyro, RecordKind::Mag])
    ///     .from_file("gnss_log.txt")?;
    /// let imu = log.imu()?;
    /// # Ok::<(), gnss_navdata::Error>(())
    /// ```
    pub fn kinds<I: IntoIterator<Item = RecordKind>>(mut self, kinds: I) -> Self {
        self.kinds = Some(kinds.into_iter().collect());
        self
    }

    fn parser(&self) -> RawLogParser {
        let parser = RawLogParser::new().with_marker(self.comment_marker);
        match &self.kinds {
            Some(kinds) => parser.with_kinds(kinds.iter().copied()),
            None => parser,
        }
    }

    /// Validate `path`, then parse the file in one sequential pass.
    pub fn from_file<P: AsRef<Path>>(self, path: P) -> Result<AndroidRawLog> {
        let path = path.as_ref();
        validate_input_path(path)?;

        let file = File::open(path)?;
        let mut parser = self.parser();
        if file.metadata()?.len() > 0 {
            let mmap = unsafe { Mmap::map(&file)? };
            parser.feed_str(&String::from_utf8_lossy(&mmap));
        }

        Ok(AndroidRawLog {
            parsed: parser.finish(),
        })
    }

    /// Parse a log held in memory.
    pub fn from_text(self, text: &str) -> AndroidRawLog {
        let mut parser = self.parser();
        parser.feed_str(text);
        AndroidRawLog {
            parsed: parser.finish(),
        }
    }
}

impl Default for RawLogReaderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Read the IMU store of a raw log.
pub fn read_imu<P: AsRef<Path>>(path: P) -> Result<NavData> {
    RawLogReaderBuilder::new()
        .kinds([RecordKind::Accel, RecordKind::Gyro, RecordKind::Mag])
        .from_file(path)?
        .imu()
}

/// Read the location fix store of a raw log.
pub fn read_fixes<P: AsRef<Path>>(path: P) -> Result<NavData> {
    RawLogReaderBuilder::new()
        .kinds([RecordKind::Fix])
        .from_file(path)?
        .fixes()
}

/// Read the raw GNSS measurement store of a raw log.
pub fn read_raw_gnss<P: AsRef<Path>>(path: P) -> Result<NavData> {
    RawLogReaderBuilder::new()
        .kinds([RecordKind::Raw])
        .from_file(path)?
        .raw_gnss()
}
