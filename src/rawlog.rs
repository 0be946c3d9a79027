//! Tokenizer and schema state machine for Android GnssLogger text logs.
//!
//! A log interleaves header lines (`# Kind,field1,field2,...`) with data lines
//! (`Kind,value1,value2,...`) for several record kinds. Every kind starts in
//! [`SchemaState::Unknown`]; its header moves it to [`SchemaState::Known`], and only then are
//! its data lines turned into [`Record`]s. Data lines that arrive before their header, or whose
//! value count does not match the schema, are dropped and counted in [`ParseStats`].

use log::{debug, warn};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use crate::models::{RawValue, Record};

pub const DEFAULT_COMMENT_MARKER: char = '#';

/// Record kinds understood by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum RecordKind {
    Raw,
    Accel,
    Gyro,
    Mag,
    Fix,
}

impl RecordKind {
    pub const ALL: [RecordKind; 5] = [
        RecordKind::Raw,
        RecordKind::Accel,
        RecordKind::Gyro,
        RecordKind::Mag,
        RecordKind::Fix,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Raw => "Raw",
            RecordKind::Accel => "Accel",
            RecordKind::Gyro => "Gyro",
            RecordKind::Mag => "Mag",
            RecordKind::Fix => "Fix",
        }
    }

    /// Exact, case-sensitive match of a line's leading token.
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == token)
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of one line of the log.
#[derive(Debug, Clone, PartialEq)]
pub enum LogLine<'a> {
    Blank,
    /// Marker line whose first token is not a known kind.
    Comment(&'a str),
    Header {
        kind: RecordKind,
        fields: Vec<&'a str>,
    },
    Data {
        kind: RecordKind,
        values: Vec<&'a str>,
    },
    /// Data line of a kind the parser does not handle (`Status`, `UncalAccel`, ...).
    UnknownKind(&'a str),
}

fn split_tokens(payload: &str) -> Vec<&str> {
    payload.split(',').map(str::trim).collect()
}

/// Classify a single line. The trailing newline, if any, is ignored.
pub fn tokenize(line: &str, marker: char) -> LogLine<'_> {
    let line = line.trim();
    if line.is_empty() {
        return LogLine::Blank;
    }

    if let Some(payload) = line.strip_prefix(marker) {
        let payload = payload.trim();
        let mut tokens = split_tokens(payload);
        return match RecordKind::from_token(tokens[0]) {
            Some(kind) => {
                tokens.remove(0);
                LogLine::Header {
                    kind,
                    fields: tokens,
                }
            }
            None => LogLine::Comment(payload),
        };
    }

    let mut tokens = split_tokens(line);
    match RecordKind::from_token(tokens[0]) {
        Some(kind) => {
            tokens.remove(0);
            LogLine::Data {
                kind,
                values: tokens,
            }
        }
        None => LogLine::UnknownKind(tokens[0]),
    }
}

/// Per-kind schema state.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SchemaState {
    #[default]
    Unknown,
    Known(Arc<[String]>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DropReason {
    /// Data line seen before any header of its kind
    SchemaUnknown,
    /// Value count differs from the active schema
    FieldCountMismatch { expected: usize, actual: usize },
}

/// A data line that was skipped. Never fatal.
#[derive(Debug, Clone, PartialEq)]
pub struct MalformedLine {
    pub line_no: usize,
    pub kind: RecordKind,
    pub reason: DropReason,
}

impl fmt::Display for MalformedLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason {
            DropReason::SchemaUnknown => write!(
                f,
                "line {}: {} data before its header",
                self.line_no, self.kind
            ),
            DropReason::FieldCountMismatch { expected, actual } => write!(
                f,
                "line {}: {} has {} values, schema has {}",
                self.line_no, self.kind, actual, expected
            ),
        }
    }
}

/// Effect of feeding one line to the parser.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    SchemaDeclared(RecordKind),
    SchemaReplaced(RecordKind),
    RecordAppended(RecordKind),
    Dropped(MalformedLine),
    /// Blank, comment, unknown or filtered-out line.
    Ignored,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParseStats {
    pub lines: usize,
    pub headers: usize,
    pub records: BTreeMap<RecordKind, usize>,
    pub dropped_schema_unknown: usize,
    pub dropped_field_count: usize,
    pub ignored: usize,
}

impl ParseStats {
    pub fn dropped(&self) -> usize {
        self.dropped_schema_unknown + self.dropped_field_count
    }
}

/// Single-pass, line-at-a-time log parser.
#[derive(Debug, Clone)]
pub struct RawLogParser {
    marker: char,
    kinds: Option<HashSet<RecordKind>>,
    schemas: HashMap<RecordKind, SchemaState>,
    buffers: HashMap<RecordKind, Vec<Record>>,
    stats: ParseStats,
}

impl Default for RawLogParser {
    fn default() -> Self {
        Self::new()
    }
}

impl RawLogParser {
    pub fn new() -> Self {
        Self {
            marker: DEFAULT_COMMENT_MARKER,
            kinds: None,
            schemas: HashMap::new(),
            buffers: HashMap::new(),
            stats: ParseStats::default(),
        }
    }

    pub fn with_marker(mut self, marker: char) -> Self {
        self.marker = marker;
        self
    }

    /// Only buffer the given kinds; lines of other kinds are ignored.
    pub fn with_kinds<I: IntoIterator<Item = RecordKind>>(mut self, kinds: I) -> Self {
        self.kinds = Some(kinds.into_iter().collect());
        self
    }

    pub fn schema_state(&self, kind: RecordKind) -> SchemaState {
        self.schemas.get(&kind).cloned().unwrap_or_default()
    }

    pub fn stats(&self) -> &ParseStats {
        &self.stats
    }

    fn wants(&self, kind: RecordKind) -> bool {
        self.kinds.as_ref().map_or(true, |k| k.contains(&kind))
    }

    /// Feed the next line of the log.
    pub fn feed_line(&mut self, line: &str) -> Transition {
        self.stats.lines += 1;
        let line_no = self.stats.lines;

        let transition = match tokenize(line, self.marker) {
            LogLine::Header { kind, fields } if self.wants(kind) => {
                self.stats.headers += 1;
                let schema: Arc<[String]> = fields.iter().map(|f| f.to_string()).collect();
                match self.schemas.insert(kind, SchemaState::Known(schema)) {
                    Some(SchemaState::Known(_)) => Transition::SchemaReplaced(kind),
                    _ => Transition::SchemaDeclared(kind),
                }
            }
            LogLine::Data { kind, values } if self.wants(kind) => {
                self.data_line(line_no, kind, &values)
            }
            _ => Transition::Ignored,
        };

        match &transition {
            Transition::Dropped(malformed) => {
                debug!("Dropping {}", malformed);
                match malformed.reason {
                    DropReason::SchemaUnknown => self.stats.dropped_schema_unknown += 1,
                    DropReason::FieldCountMismatch { .. } => self.stats.dropped_field_count += 1,
                }
            }
            Transition::RecordAppended(kind) => {
                *self.stats.records.entry(*kind).or_insert(0) += 1;
            }
            Transition::Ignored => self.stats.ignored += 1,
            _ => {}
        }

        transition
    }

    fn data_line(&mut self, line_no: usize, kind: RecordKind, values: &[&str]) -> Transition {
        let schema = match self.schemas.get(&kind) {
            Some(SchemaState::Known(schema)) => Arc::clone(schema),
            _ => {
                return Transition::Dropped(MalformedLine {
                    line_no,
                    kind,
                    reason: DropReason::SchemaUnknown,
                })
            }
        };

        let expected = schema.len();
        let parsed = values.iter().map(|v| RawValue::parse(v)).collect();
        match Record::new(schema, parsed) {
            Some(record) => {
                self.buffers.entry(kind).or_default().push(record);
                Transition::RecordAppended(kind)
            }
            None => Transition::Dropped(MalformedLine {
                line_no,
                kind,
                reason: DropReason::FieldCountMismatch {
                    expected,
                    actual: values.len(),
                },
            }),
        }
    }

    /// Feed every line of `text`.
    pub fn feed_str(&mut self, text: &str) {
        for line in text.lines() {
            self.feed_line(line);
        }
    }

    pub fn finish(self) -> ParsedLog {
        if self.stats.dropped() > 0 {
            warn!(
                "Dropped {} data line(s): {} before their header, {} with a wrong value count",
                self.stats.dropped(),
                self.stats.dropped_schema_unknown,
                self.stats.dropped_field_count
            );
        }

        let schemas = self
            .schemas
            .into_iter()
            .filter_map(|(kind, state)| match state {
                SchemaState::Known(schema) => Some((kind, schema)),
                SchemaState::Unknown => None,
            })
            .collect();

        ParsedLog {
            buffers: self.buffers,
            schemas,
            stats: self.stats,
        }
    }
}

/// Per-kind record buffers produced by one pass over a log.
#[derive(Debug, Clone, Default)]
pub struct ParsedLog {
    buffers: HashMap<RecordKind, Vec<Record>>,
    schemas: HashMap<RecordKind, Arc<[String]>>,
    stats: ParseStats,
}

impl ParsedLog {
    /// Parse a whole log held in memory.
    pub fn parse(text: &str) -> Self {
        let mut parser = RawLogParser::new();
        parser.feed_str(text);
        parser.finish()
    }

    /// Records of one kind in file order; empty when none were read.
    pub fn records(&self, kind: RecordKind) -> &[Record] {
        self.buffers.get(&kind).map_or(&[], Vec::as_slice)
    }

    /// The last schema declared for `kind`.
    pub fn schema(&self, kind: RecordKind) -> Option<&[String]> {
        self.schemas.get(&kind).map(|s| &s[..])
    }

    pub fn stats(&self) -> &ParseStats {
        &self.stats
    }
}
