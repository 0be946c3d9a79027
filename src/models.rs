use serde::Serialize;
use std::sync::Arc;

/// A single cell of a parsed log line, before it is placed in a store.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
    Empty,
}

impl RawValue {
    /// Classify a trimmed token: empty, numeric (anything `f64` parses, `NaN` included) or text.
    pub fn parse(token: &str) -> Self {
        let token = token.trim();
        if token.is_empty() {
            RawValue::Empty
        } else if let Ok(n) = token.parse::<f64>() {
            RawValue::Number(n)
        } else {
            RawValue::Text(token.to_string())
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, RawValue::Text(_))
    }

    /// Numeric view; text and empty cells become `NaN`.
    pub fn as_f64(&self) -> f64 {
        match self {
            RawValue::Number(n) => *n,
            _ => f64::NAN,
        }
    }

    /// Text view used when the cell lands in a categorical field.
    pub fn to_text(&self) -> String {
        match self {
            RawValue::Number(n) => n.to_string(),
            RawValue::Text(s) => s.clone(),
            RawValue::Empty => String::new(),
        }
    }
}

/// One data line zipped with the schema that was active when it was read.
///
/// All records parsed under the same header line share one `fields` allocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    fields: Arc<[String]>,
    values: Vec<RawValue>,
}

impl Record {
    /// Pair `values` with `fields`. Returns `None` when the lengths disagree.
    pub fn new(fields: Arc<[String]>, values: Vec<RawValue>) -> Option<Self> {
        (fields.len() == values.len()).then_some(Self { fields, values })
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn values(&self) -> &[RawValue] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawValue)> {
        self.fields.iter().map(String::as_str).zip(self.values.iter())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldSummary {
    pub name: String,
    pub categorical: bool,
    /// Distinct values for categorical fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
}

/// Shape and field overview of a store, printed by the CLI.
#[derive(Debug, Clone, Serialize)]
pub struct StoreSummary {
    pub length: usize,
    pub num_fields: usize,
    pub fields: Vec<FieldSummary>,
}
