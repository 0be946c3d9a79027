//! Conversion between [`NavData`] and conventional row/column tables.
//!
//! Tabular inputs (vendor CSV exports) are read with the Arrow CSV reader and renamed to the
//! internal vocabulary through a [`ColumnMap`]. The reverse direction,
//! [`NavData::to_record_batch`], decodes categorical rows and restores the external names; it
//! is the only way data leaves the store's numeric representation, and every exporter goes
//! through it.

use arrow::array::{ArrayRef, AsArray, Float64Array, StringArray};
use arrow::compute::cast;
use arrow::csv::reader::Format;
use arrow::csv::ReaderBuilder;
use arrow::datatypes::{DataType, Field, Float64Type, Schema};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use arrow::util::pretty::pretty_format_batches;
use std::collections::HashSet;
use std::fs::File;
use std::io::{Seek, SeekFrom};
use std::path::Path;
use std::sync::Arc;

use crate::codec::Codec;
use crate::error::Result;
use crate::navdata::NavData;
use crate::reader::validate_input_path;

/// Rename table between an external format's column names and internal field names,
/// plus the external columns that must be treated as categorical.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnMap {
    renames: Vec<(String, String)>,
    categorical: HashSet<String>,
}

impl ColumnMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `external` to `internal`.
    pub fn rename(mut self, external: &str, internal: &str) -> Self {
        self.renames.push((external.to_string(), internal.to_string()));
        self
    }

    /// Read `external` as text and route it through a codec, even when it looks numeric.
    pub fn categorical(mut self, external: &str) -> Self {
        self.categorical.insert(external.to_string());
        self
    }

    pub fn is_categorical(&self, external: &str) -> bool {
        self.categorical.contains(external)
    }

    /// Internal name for an external column; unmapped columns keep their name.
    pub fn internal_name<'a>(&'a self, external: &'a str) -> &'a str {
        self.renames
            .iter()
            .find(|(ext, _)| ext == external)
            .map_or(external, |(_, int)| int.as_str())
    }

    /// External name for an internal field; unmapped fields keep their name.
    pub fn external_name<'a>(&'a self, internal: &'a str) -> &'a str {
        self.renames
            .iter()
            .find(|(_, int)| int == internal)
            .map_or(internal, |(ext, _)| ext.as_str())
    }

    /// `(external, internal)` pairs in declaration order.
    pub fn renames(&self) -> impl Iterator<Item = (&str, &str)> {
        self.renames.iter().map(|(e, i)| (e.as_str(), i.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.renames.is_empty() && self.categorical.is_empty()
    }
}

/// Column types that survive a cast to `f64`; everything else is read as text.
fn is_numeric_type(data_type: &DataType) -> bool {
    data_type.is_numeric() || matches!(data_type, DataType::Boolean | DataType::Null)
}

fn reading_schema(inferred: &Schema, map: &ColumnMap) -> Schema {
    let fields: Vec<Field> = inferred
        .fields()
        .iter()
        .map(|field| {
            if map.is_categorical(field.name()) || !is_numeric_type(field.data_type()) {
                Field::new(field.name(), DataType::Utf8, true)
            } else {
                field.as_ref().clone()
            }
        })
        .collect();
    Schema::new(fields)
}

impl NavData {
    /// Load a CSV file with a header row.
    ///
    /// Text columns (and the columns `map` marks as categorical) get a codec; numeric and
    /// boolean columns are stored as `f64` with missing cells as `NaN`. Columns are renamed
    /// through `map`.
    ///
    /// # Arguments
    ///
    /// * `path` - CSV file to read
    /// * `map` - Renames and forced-categorical columns; pass `ColumnMap::new()` for none
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use gnss_navdata::{ColumnMap, NavData};
    ///
    /// let map = ColumnMap::new()
    ///     .rename("Svid", "sv_id")
    ///     .categorical("Svid");
    /// let nav = NavData::from_csv("derived.csv", &map)?;
    /// println!("{}", nav.len());
    /// # Ok::<(), gnss_navdata::Error>(())
    /// ```
    pub fn from_csv<P: AsRef<Path>>(path: P, map: &ColumnMap) -> Result<Self> {
        let path = path.as_ref();
        validate_input_path(path)?;

        let mut file = File::open(path)?;
        let format = Format::default().with_header(true);
        let (inferred, _) = format.infer_schema(&mut file, None)?;
        file.seek(SeekFrom::Start(0))?;

        let schema = Arc::new(reading_schema(&inferred, map));
        let reader = ReaderBuilder::new(Arc::clone(&schema))
            .with_header(true)
            .build(file)?;

        let mut columns: Vec<(Vec<f64>, Option<Codec>)> = schema
            .fields()
            .iter()
            .map(|f| {
                let codec = (f.data_type() == &DataType::Utf8).then(Codec::new);
                (Vec::new(), codec)
            })
            .collect();

        for batch in reader {
            let batch = batch?;
            for (column, (values, codec)) in batch.columns().iter().zip(columns.iter_mut()) {
                match codec {
                    Some(codec) => {
                        let strings = column.as_string::<i32>();
                        values.extend(
                            strings
                                .iter()
                                .map(|s| codec.encode(s.unwrap_or_default()) as f64),
                        );
                    }
                    None => {
                        let numbers = cast(column, &DataType::Float64)?;
                        values.extend(
                            numbers
                                .as_primitive::<Float64Type>()
                                .iter()
                                .map(|v| v.unwrap_or(f64::NAN)),
                        );
                    }
                }
            }
        }

        let mut nav = NavData::new();
        for (field, (values, codec)) in schema.fields().iter().zip(columns) {
            nav.insert_row(map.internal_name(field.name()), values, codec)?;
        }
        Ok(nav)
    }

    /// Convert to an Arrow record batch for use outside the store.
    ///
    /// Categorical rows are decoded into `Utf8` columns, numeric rows become nullable
    /// `Float64` columns (`NaN` → null), and field names are mapped back to their external
    /// names when a `map` is given.
    pub fn to_record_batch(&self, map: Option<&ColumnMap>) -> Result<RecordBatch> {
        let mut fields = Vec::with_capacity(self.num_fields());
        let mut arrays: Vec<ArrayRef> = Vec::with_capacity(self.num_fields());

        for name in self.fields() {
            let external = map.map_or(name.as_str(), |m| m.external_name(name));
            let row = self.row(name)?;
            match self.codec(name) {
                Some(codec) => {
                    let decoded = row
                        .iter()
                        .map(|&v| codec.decode_value(name, v))
                        .collect::<Result<Vec<&str>>>()?;
                    fields.push(Field::new(external, DataType::Utf8, false));
                    arrays.push(Arc::new(StringArray::from(decoded)));
                }
                None => {
                    let values: Vec<Option<f64>> =
                        row.iter().map(|&v| (!v.is_nan()).then_some(v)).collect();
                    fields.push(Field::new(external, DataType::Float64, true));
                    arrays.push(Arc::new(Float64Array::from(values)));
                }
            }
        }

        let options = RecordBatchOptions::new().with_row_count(Some(self.len()));
        Ok(RecordBatch::try_new_with_options(
            Arc::new(Schema::new(fields)),
            arrays,
            &options,
        )?)
    }

    /// Render the first `max_rows` samples as a text table.
    pub fn pretty(&self, max_rows: usize) -> Result<String> {
        let batch = self.to_record_batch(None)?;
        let head = batch.slice(0, max_rows.min(batch.num_rows()));
        Ok(pretty_format_batches(&[head])?.to_string())
    }
}
