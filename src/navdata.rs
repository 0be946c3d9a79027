//! The columnar navigation data store.

use std::collections::HashMap;

use crate::codec::Codec;
use crate::error::{Error, Result};
use crate::matrix::Matrix;
use crate::models::{FieldSummary, StoreSummary};
use crate::selector::{Cols, Rows, Selector, Values};

/// Dense, array-backed table of measurements.
///
/// Every field is one row of a `[num_fields × len]` `f64` matrix. Categorical fields keep
/// their strings in a per-field [`Codec`] and store the codes in the matrix; reads always
/// return the raw numbers and decoding is an explicit step through [`NavData::decode`] or
/// [`NavData::codec`].
///
/// # Examples
///
/// ```
/// use gnss_navdata::{Cols, NavData};
///
/// let mut nav = NavData::new();
/// nav.set("sv_id", vec![3.0, 7.0, 12.0])?;
/// nav.set("signal_type", vec!["GPS_L1", "GLO_G1", "GPS_L1"])?;
///
/// assert_eq!(nav.len(), 3);
/// assert_eq!(nav.row("signal_type")?, &[0.0, 1.0, 0.0]);
/// assert_eq!(nav.decode("signal_type", Cols::Index(1))?, vec!["GLO_G1"]);
/// # Ok::<(), gnss_navdata::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NavData {
    array: Matrix,
    fields: Vec<String>,
    row_map: HashMap<String, usize>,
    codecs: HashMap<String, Codec>,
}

impl NavData {
    /// An empty store. Its first row fixes the number of samples.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of samples (columns of the array).
    pub fn len(&self) -> usize {
        self.array.cols()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn num_fields(&self) -> usize {
        self.fields.len()
    }

    /// Field names in discovery order.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn contains(&self, field: &str) -> bool {
        self.row_map.contains_key(field)
    }

    pub fn is_categorical(&self, field: &str) -> bool {
        self.codecs.contains_key(field)
    }

    /// Codec of a categorical field, `None` for numeric or absent fields.
    pub fn codec(&self, field: &str) -> Option<&Codec> {
        self.codecs.get(field)
    }

    /// The backing `[num_fields × len]` array.
    pub fn array(&self) -> &Matrix {
        &self.array
    }

    /// Mutable access to every cell for whole-store numeric operations. The shape cannot change.
    pub fn values_mut(&mut self) -> &mut [f64] {
        self.array.as_mut_slice()
    }

    /// Borrow one full row.
    pub fn row(&self, field: &str) -> Result<&[f64]> {
        Ok(self.array.row(self.index_of(field)?))
    }

    /// A single cell.
    pub fn value(&self, field: &str, col: usize) -> Result<f64> {
        let idx = Cols::Index(col).resolve(self.len())?;
        Ok(self.row(field)?[idx[0]])
    }

    /// Read the raw numeric content of the selected rows and columns.
    ///
    /// The result always has shape `[rows × selected columns]`, even for a single cell.
    pub fn get(&self, rows: impl Into<Rows>, cols: impl Into<Cols>) -> Result<Matrix> {
        let row_idx = self.resolve_rows(&rows.into())?;
        let col_idx = cols.into().resolve(self.len())?;
        Ok(self.array.select(&row_idx, &col_idx))
    }

    /// Assign values to a row, a column subset of a row, or the whole store.
    ///
    /// * [`Selector::Field`] creates the row when it is absent and overwrites it otherwise.
    /// * [`Selector::FieldColumns`] overwrites the selected columns, creating the row
    ///   first when needed. Unselected cells of the new row are `NaN`, or `""` for text.
    /// * [`Selector::WholeStore`] replaces the array with an `[num_fields × k]` matrix,
    ///   typically `store.get(Rows::All, mask)`. This is how a store is filtered.
    ///
    /// A new row is categorical when it is created from [`Values::Text`] and numeric
    /// otherwise; later writes must keep that representation.
    pub fn set(&mut self, key: impl Into<Selector>, values: impl Into<Values>) -> Result<()> {
        match key.into() {
            Selector::Field(name) => self.assign(&name, &Cols::All, values.into()),
            Selector::FieldColumns(name, cols) => self.assign(&name, &cols, values.into()),
            Selector::WholeStore => self.replace_array(values.into()),
        }
    }

    /// Keep only the columns where `mask` is `true`.
    pub fn filter(&mut self, mask: &[bool]) -> Result<()> {
        let kept = self.get(Rows::All, mask)?;
        self.set(Selector::WholeStore, kept)
    }

    /// Decode the selected cells of a categorical field.
    pub fn decode(&self, field: &str, cols: impl Into<Cols>) -> Result<Vec<String>> {
        let codec = self.codecs.get(field).ok_or_else(|| self.not_categorical(field))?;
        let values = self.get(field, cols)?;
        values
            .as_slice()
            .iter()
            .map(|&v| codec.decode_value(field, v).map(str::to_string))
            .collect()
    }

    /// Rename fields. Names absent from the store are ignored.
    pub fn rename<'a, I>(&mut self, renames: I) -> Result<()>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        for (from, to) in renames {
            if from == to {
                continue;
            }
            let Some(idx) = self.row_map.get(from).copied() else {
                continue;
            };
            if self.row_map.contains_key(to) {
                return Err(Error::InvalidKeySpec(format!(
                    "cannot rename '{}' to existing field '{}'",
                    from, to
                )));
            }
            self.row_map.remove(from);
            self.row_map.insert(to.to_string(), idx);
            self.fields[idx] = to.to_string();
            if let Some(codec) = self.codecs.remove(from) {
                self.codecs.insert(to.to_string(), codec);
            }
        }
        Ok(())
    }

    pub fn summary(&self) -> StoreSummary {
        StoreSummary {
            length: self.len(),
            num_fields: self.num_fields(),
            fields: self
                .fields
                .iter()
                .map(|name| FieldSummary {
                    name: name.clone(),
                    categorical: self.is_categorical(name),
                    categories: self.codecs.get(name).map(|c| c.values().to_vec()),
                })
                .collect(),
        }
    }

    /// Append a fully built row. Used by the builders, which already hold encoded values.
    pub(crate) fn insert_row(
        &mut self,
        name: &str,
        values: Vec<f64>,
        codec: Option<Codec>,
    ) -> Result<()> {
        if self.row_map.contains_key(name) {
            return Err(Error::InvalidKeySpec(format!("field '{}' already exists", name)));
        }
        if !self.fields.is_empty() && values.len() != self.len() {
            return Err(Error::ShapeMismatch {
                expected: self.len(),
                actual: values.len(),
            });
        }
        self.array.push_row(&values)?;
        self.row_map.insert(name.to_string(), self.fields.len());
        self.fields.push(name.to_string());
        if let Some(codec) = codec {
            self.codecs.insert(name.to_string(), codec);
        }
        Ok(())
    }

    fn assign(&mut self, name: &str, cols: &Cols, values: Values) -> Result<()> {
        let values = match values {
            Values::Array(matrix) if matrix.rows() == 1 => Values::Numeric(matrix.into_vec()),
            Values::Array(matrix) => {
                return Err(Error::InvalidKeySpec(format!(
                    "cannot assign a {}x{} array to field '{}'",
                    matrix.rows(),
                    matrix.cols(),
                    name
                )));
            }
            other => other,
        };

        let exists = self.contains(name);
        let len = if !exists && self.fields.is_empty() && *cols == Cols::All {
            values.len()
        } else {
            self.len()
        };
        let targets = cols.resolve(len)?;
        if targets.len() != values.len() {
            return Err(Error::ShapeMismatch {
                expected: targets.len(),
                actual: values.len(),
            });
        }

        if exists {
            if self.is_categorical(name) != values.is_text() {
                let reason = if values.is_text() {
                    "text values assigned to a numeric field"
                } else {
                    "numeric values assigned to a categorical field"
                };
                return Err(Error::RepresentationMismatch {
                    field: name.to_string(),
                    reason: reason.to_string(),
                });
            }
        } else {
            // Unselected cells of a new categorical row hold the code of "".
            let (fill, codec) = if values.is_text() {
                let mut codec = Codec::new();
                let fill = if targets.len() < len {
                    codec.encode("") as f64
                } else {
                    f64::NAN
                };
                (fill, Some(codec))
            } else {
                (f64::NAN, None)
            };
            self.insert_row(name, vec![fill; len], codec)?;
        }

        let encoded: Vec<f64> = match values {
            Values::Text(text) => {
                let codec = self
                    .codecs
                    .get_mut(name)
                    .ok_or_else(|| Error::UnknownField(name.to_string()))?;
                text.iter().map(|s| codec.encode(s) as f64).collect()
            }
            Values::Numeric(numbers) => numbers,
            Values::Array(matrix) => matrix.into_vec(),
        };

        let row = self.index_of(name)?;
        let dest = self.array.row_mut(row);
        for (&col, value) in targets.iter().zip(encoded) {
            dest[col] = value;
        }
        Ok(())
    }

    fn replace_array(&mut self, values: Values) -> Result<()> {
        let Values::Array(matrix) = values else {
            return Err(Error::InvalidKeySpec(
                "the whole store can only be assigned a [fields x samples] array".to_string(),
            ));
        };
        if matrix.rows() != self.fields.len() {
            return Err(Error::ShapeMismatch {
                expected: self.fields.len(),
                actual: matrix.rows(),
            });
        }
        self.array = matrix;
        Ok(())
    }

    fn index_of(&self, field: &str) -> Result<usize> {
        self.row_map
            .get(field)
            .copied()
            .ok_or_else(|| Error::UnknownField(field.to_string()))
    }

    fn resolve_rows(&self, rows: &Rows) -> Result<Vec<usize>> {
        match rows {
            Rows::One(name) => Ok(vec![self.index_of(name)?]),
            Rows::Many(names) => names.iter().map(|n| self.index_of(n)).collect(),
            Rows::All => Ok((0..self.fields.len()).collect()),
        }
    }

    fn not_categorical(&self, field: &str) -> Error {
        if self.contains(field) {
            Error::RepresentationMismatch {
                field: field.to_string(),
                reason: "field is numeric and has no codec".to_string(),
            }
        } else {
            Error::UnknownField(field.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NavData {
        let mut nav = NavData::new();
        nav.set("raw_pr_m", vec![2.1e7, 2.2e7, 2.3e7, 2.4e7]).unwrap();
        nav.set("signal_type", vec!["GPS_L1", "GAL_E1", "GPS_L1", "GLO_G1"])
            .unwrap();
        nav
    }

    #[test]
    fn test_first_row_sets_length() {
        let nav = sample();
        assert_eq!(nav.len(), 4);
        assert_eq!(nav.num_fields(), 2);
        assert_eq!(nav.array().shape(), (2, 4));
    }

    #[test]
    fn test_new_text_row_gets_codec() {
        let nav = sample();
        assert!(nav.is_categorical("signal_type"));
        assert!(!nav.is_categorical("raw_pr_m"));
        assert_eq!(nav.row("signal_type").unwrap(), &[0.0, 1.0, 0.0, 2.0]);
    }

    #[test]
    fn test_new_row_with_wrong_length_is_rejected() {
        let mut nav = sample();
        let err = nav.set("cn0_dbhz", vec![1.0, 2.0]).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { expected: 4, actual: 2 }));
        assert!(!nav.contains("cn0_dbhz"));
    }

    #[test]
    fn test_overwrite_column_subset() {
        let mut nav = sample();
        nav.set(("raw_pr_m", 1..3), vec![0.0, 1.0]).unwrap();
        assert_eq!(nav.row("raw_pr_m").unwrap(), &[2.1e7, 0.0, 1.0, 2.4e7]);

        nav.set(("signal_type", vec![false, false, false, true]), vec!["BDS_B1I"])
            .unwrap();
        assert_eq!(nav.decode("signal_type", ..).unwrap()[3], "BDS_B1I");
    }

    #[test]
    fn test_subset_assignment_creates_missing_row() {
        let mut nav = sample();
        nav.set(("flag", Cols::Index(2)), vec![1.0]).unwrap();
        let row = nav.row("flag").unwrap();
        assert!(row[0].is_nan());
        assert_eq!(row[2], 1.0);
    }

    #[test]
    fn test_subset_text_assignment_fills_with_empty_string() {
        let mut nav = sample();
        nav.set(("label", Cols::Index(1)), vec!["GPS_L1"]).unwrap();

        assert_eq!(nav.row("label").unwrap(), &[0.0, 1.0, 0.0, 0.0]);
        assert_eq!(nav.decode("label", ..).unwrap(), vec!["", "GPS_L1", "", ""]);
    }

    #[test]
    fn test_representation_is_fixed() {
        let mut nav = sample();
        assert!(matches!(
            nav.set("raw_pr_m", vec!["a", "b", "c", "d"]),
            Err(Error::RepresentationMismatch { .. })
        ));
        assert!(matches!(
            nav.set("signal_type", vec![0.0; 4]),
            Err(Error::RepresentationMismatch { .. })
        ));
    }

    #[test]
    fn test_unknown_field() {
        let nav = sample();
        assert!(matches!(nav.get("nope", ..), Err(Error::UnknownField(_))));
        assert!(matches!(
            nav.get(vec!["raw_pr_m", "nope"], ..),
            Err(Error::UnknownField(_))
        ));
    }

    #[test]
    fn test_whole_store_requires_array() {
        let mut nav = sample();
        assert!(matches!(
            nav.set(Selector::WholeStore, vec![1.0; 4]),
            Err(Error::InvalidKeySpec(_))
        ));
        assert!(matches!(
            nav.set(Selector::WholeStore, Matrix::zeros(3, 2)),
            Err(Error::ShapeMismatch { expected: 2, actual: 3 })
        ));
    }

    #[test]
    fn test_multi_row_array_for_field_is_rejected() {
        let mut nav = sample();
        assert!(matches!(
            nav.set("raw_pr_m", Matrix::zeros(2, 4)),
            Err(Error::InvalidKeySpec(_))
        ));
    }

    #[test]
    fn test_rename_moves_codec() {
        let mut nav = sample();
        nav.rename([("signal_type", "signalType"), ("absent", "whatever")])
            .unwrap();
        assert!(nav.is_categorical("signalType"));
        assert!(!nav.contains("signal_type"));
        assert_eq!(nav.fields(), &["raw_pr_m", "signalType"]);
        assert!(nav.rename([("raw_pr_m", "signalType")]).is_err());
    }
}
