//! Tagged selectors used to address rows and columns of a [`NavData`](crate::NavData) store.
//!
//! Reads take a [`Rows`] and a [`Cols`] selector; writes take a [`Selector`] key and a
//! [`Values`] payload. Conversions from the usual Rust shapes keep call sites short:
//!
//! ```
//! use gnss_navdata::{Cols, NavData, Rows, Selector};
//!
//! let mut nav = NavData::new();
//! nav.set("cn0_dbhz", vec![31.0, 28.5, 40.2])?;
//! nav.set(("cn0_dbhz", 1..3), vec![0.0, 0.0])?;
//!
//! let first = nav.get("cn0_dbhz", Cols::Index(0))?;
//! let all = nav.get(Rows::All, ..)?;
//! assert_eq!(first.as_slice(), &[31.0]);
//! assert_eq!(all.shape(), (1, 3));
//!
//! let keep = nav.get(Rows::All, vec![true, false, true])?;
//! nav.set(Selector::WholeStore, keep)?;
//! assert_eq!(nav.len(), 2);
//! # Ok::<(), gnss_navdata::Error>(())
//! ```

use std::ops::{Range, RangeFull};

use crate::error::{Error, Result};
use crate::matrix::Matrix;

/// Row selection by field name.
#[derive(Debug, Clone, PartialEq)]
pub enum Rows {
    One(String),
    Many(Vec<String>),
    All,
}

/// Column (sample) selection.
#[derive(Debug, Clone, PartialEq)]
pub enum Cols {
    Index(usize),
    Range(Range<usize>),
    /// Boolean mask, one entry per sample.
    Mask(Vec<bool>),
    All,
}

/// Assignment key for [`NavData::set`](crate::NavData::set).
#[derive(Debug, Clone, PartialEq)]
pub enum Selector {
    /// A whole row, created when absent.
    Field(String),
    /// A subset of the columns of one row.
    FieldColumns(String, Cols),
    /// The entire store; only an array assignment is accepted.
    WholeStore,
}

/// Payload for [`NavData::set`](crate::NavData::set).
#[derive(Debug, Clone, PartialEq)]
pub enum Values {
    Numeric(Vec<f64>),
    Text(Vec<String>),
    Array(Matrix),
}

impl Cols {
    /// Resolve to explicit column indices for a store of `len` samples.
    pub fn resolve(&self, len: usize) -> Result<Vec<usize>> {
        match self {
            Cols::Index(i) => {
                if *i >= len {
                    return Err(Error::InvalidKeySpec(format!(
                        "column index {} out of range for length {}",
                        i, len
                    )));
                }
                Ok(vec![*i])
            }
            Cols::Range(range) => {
                if range.start > range.end || range.end > len {
                    return Err(Error::InvalidKeySpec(format!(
                        "column range {:?} out of range for length {}",
                        range, len
                    )));
                }
                Ok(range.clone().collect())
            }
            Cols::Mask(mask) => {
                if mask.len() != len {
                    return Err(Error::ShapeMismatch {
                        expected: len,
                        actual: mask.len(),
                    });
                }
                Ok(mask
                    .iter()
                    .enumerate()
                    .filter_map(|(i, &keep)| keep.then_some(i))
                    .collect())
            }
            Cols::All => Ok((0..len).collect()),
        }
    }
}

impl Values {
    pub fn len(&self) -> usize {
        match self {
            Values::Numeric(v) => v.len(),
            Values::Text(v) => v.len(),
            Values::Array(m) => m.as_slice().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Values::Text(_))
    }
}

impl From<&str> for Rows {
    fn from(name: &str) -> Self {
        Rows::One(name.to_string())
    }
}

impl From<String> for Rows {
    fn from(name: String) -> Self {
        Rows::One(name)
    }
}

impl From<Vec<&str>> for Rows {
    fn from(names: Vec<&str>) -> Self {
        Rows::Many(names.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<String>> for Rows {
    fn from(names: Vec<String>) -> Self {
        Rows::Many(names)
    }
}

impl From<&[&str]> for Rows {
    fn from(names: &[&str]) -> Self {
        Rows::Many(names.iter().map(|s| s.to_string()).collect())
    }
}

impl From<usize> for Cols {
    fn from(index: usize) -> Self {
        Cols::Index(index)
    }
}

impl From<Range<usize>> for Cols {
    fn from(range: Range<usize>) -> Self {
        Cols::Range(range)
    }
}

impl From<RangeFull> for Cols {
    fn from(_: RangeFull) -> Self {
        Cols::All
    }
}

impl From<Vec<bool>> for Cols {
    fn from(mask: Vec<bool>) -> Self {
        Cols::Mask(mask)
    }
}

impl From<&[bool]> for Cols {
    fn from(mask: &[bool]) -> Self {
        Cols::Mask(mask.to_vec())
    }
}

impl From<&str> for Selector {
    fn from(name: &str) -> Self {
        Selector::Field(name.to_string())
    }
}

impl From<String> for Selector {
    fn from(name: String) -> Self {
        Selector::Field(name)
    }
}

impl<C: Into<Cols>> From<(&str, C)> for Selector {
    fn from((name, cols): (&str, C)) -> Self {
        Selector::FieldColumns(name.to_string(), cols.into())
    }
}

impl<C: Into<Cols>> From<(String, C)> for Selector {
    fn from((name, cols): (String, C)) -> Self {
        Selector::FieldColumns(name, cols.into())
    }
}

impl From<Vec<f64>> for Values {
    fn from(values: Vec<f64>) -> Self {
        Values::Numeric(values)
    }
}

impl From<&[f64]> for Values {
    fn from(values: &[f64]) -> Self {
        Values::Numeric(values.to_vec())
    }
}

impl From<Vec<String>> for Values {
    fn from(values: Vec<String>) -> Self {
        Values::Text(values)
    }
}

impl From<Vec<&str>> for Values {
    fn from(values: Vec<&str>) -> Self {
        Values::Text(values.into_iter().map(str::to_string).collect())
    }
}

impl From<Matrix> for Values {
    fn from(matrix: Matrix) -> Self {
        Values::Array(matrix)
    }
}
