//! Test utilities for building GnssLogger text logs
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

/// Builder for creating GnssLogger test files
pub struct GnssLogBuilder {
    lines: Vec<String>,
}

impl GnssLogBuilder {
    /// Create a new builder with the usual version preamble
    pub fn new() -> Self {
        Self {
            lines: vec![
                "# ".to_string(),
                "# Header Description:".to_string(),
                "# ".to_string(),
                "# Version: v2.0.0.1 Platform: 10 Manufacturer: Google Model: Pixel 4".to_string(),
                "# ".to_string(),
            ],
        }
    }

    /// Create a builder with no preamble
    pub fn empty() -> Self {
        Self { lines: Vec::new() }
    }

    /// Add a schema line: `# Kind,field1,field2,...`
    pub fn header(mut self, kind: &str, fields: &[&str]) -> Self {
        self.lines.push(format!("# {},{}", kind, fields.join(",")));
        self
    }

    /// Add a data line: `Kind,value1,value2,...`
    pub fn data(mut self, kind: &str, values: &[&str]) -> Self {
        self.lines.push(format!("{},{}", kind, values.join(",")));
        self
    }

    /// Add a free-text comment line
    pub fn comment(mut self, text: &str) -> Self {
        self.lines.push(format!("# {}", text));
        self
    }

    /// Add a line verbatim
    pub fn line(mut self, line: &str) -> Self {
        self.lines.push(line.to_string());
        self
    }

    /// Build the log text
    pub fn build(self) -> String {
        let mut text = self.lines.join("\n");
        text.push('\n');
        text
    }

    /// Write the log to `dir/name` and return its path
    pub fn write_to(self, dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, self.build()).unwrap();
        path
    }
}

impl Default for GnssLogBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Raw measurement fields used by the builder-based tests
pub const RAW_FIELDS: [&str; 6] = [
    "utcTimeMillis",
    "Svid",
    "ConstellationType",
    "Cn0DbHz",
    "CodeType",
    "ReceivedSvTimeNanos",
];

/// Fix fields as written by GnssLogger
pub const FIX_FIELDS: [&str; 8] = [
    "Provider",
    "LatitudeDegrees",
    "LongitudeDegrees",
    "AltitudeMeters",
    "SpeedMps",
    "AccuracyMeters",
    "BearingDegrees",
    "UnixTimeMillis",
];

/// Write a CSV file from a header and rows
pub fn write_csv(dir: &Path, name: &str, header: &[&str], rows: &[&[&str]]) -> PathBuf {
    let mut text = header.join(",");
    text.push('\n');
    for row in rows {
        text.push_str(&row.join(","));
        text.push('\n');
    }
    let path = dir.join(name);
    fs::write(&path, text).unwrap();
    path
}

/// Path of a file under `tests/data`
pub fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}
