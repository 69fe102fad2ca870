//! Record codec: an ordered list of fields encoded side by side.

use crate::error::{GiroError, Result};
use crate::field::{FieldSpec, Value};
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::HashMap;

/// Every record kind in a batch file is exactly this many characters wide.
pub const RECORD_WIDTH: usize = 1000;

/// Field values of one record instance, keyed by field name.
///
/// Fields without an entry are unset and encode with their default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldValues(HashMap<&'static str, Value>);

impl FieldValues {
    pub fn new() -> Self {
        FieldValues(HashMap::new())
    }

    pub fn set(&mut self, name: &'static str, value: impl Into<Value>) {
        self.0.insert(name, value.into());
    }

    /// Sets `name` only when `value` is present.
    pub fn set_opt<V: Into<Value>>(&mut self, name: &'static str, value: Option<V>) {
        if let Some(v) = value {
            self.set(name, v);
        }
    }

    /// Sets `name` only when `text` is non-empty.
    pub fn set_text(&mut self, name: &'static str, text: &str) {
        if !text.is_empty() {
            self.set(name, text);
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Text value of `name`, or an empty string when unset.
    pub fn text(&self, name: &'static str) -> Result<String> {
        match self.get(name) {
            None => Ok(String::new()),
            Some(Value::Text(s)) => Ok(s.clone()),
            Some(_) => Err(mismatch(name, "text")),
        }
    }

    /// Integer value of `name`, or zero when unset.
    pub fn integer(&self, name: &'static str) -> Result<u64> {
        match self.get(name) {
            None => Ok(0),
            Some(Value::Integer(n)) => Ok(*n),
            Some(_) => Err(mismatch(name, "integer")),
        }
    }

    pub fn date(&self, name: &'static str) -> Result<Option<NaiveDate>> {
        match self.get(name) {
            None => Ok(None),
            Some(Value::Date(d)) => Ok(Some(*d)),
            Some(_) => Err(mismatch(name, "date")),
        }
    }

    pub fn datetime(&self, name: &'static str) -> Result<Option<NaiveDateTime>> {
        match self.get(name) {
            None => Ok(None),
            Some(Value::DateTime(dt)) => Ok(Some(*dt)),
            Some(_) => Err(mismatch(name, "date-time")),
        }
    }
}

fn mismatch(field: &'static str, expected: &'static str) -> GiroError {
    GiroError::TypeMismatch { field, expected }
}

/// Ordered field layout of one record kind.
#[derive(Debug, Clone)]
pub struct RecordSchema {
    name: &'static str,
    fields: Vec<FieldSpec>,
}

impl RecordSchema {
    pub fn builder(name: &'static str) -> RecordSchemaBuilder {
        RecordSchemaBuilder {
            name,
            fields: Vec::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Sum of all field widths.
    pub fn width(&self) -> usize {
        self.fields.iter().map(|f| f.width).sum()
    }

    /// Concatenates every field's encoded form in declaration order.
    pub fn encode(&self, values: &FieldValues) -> Result<String> {
        let mut line = String::with_capacity(self.width());
        for field in &self.fields {
            line.push_str(&field.encode(values.get(field.name))?);
        }
        Ok(line)
    }

    /// Slices `line` at the field offsets and decodes each segment.
    ///
    /// `line` must be exactly [`RecordSchema::width`] characters long.
    pub fn decode(&self, line: &str) -> Result<FieldValues> {
        let actual = line.chars().count();
        let expected = self.width();
        if actual != expected {
            return Err(GiroError::Width {
                field: self.name,
                expected,
                actual,
            });
        }

        let mut values = FieldValues::new();
        let mut rest = line;
        for field in &self.fields {
            let split = rest
                .char_indices()
                .nth(field.width)
                .map(|(i, _)| i)
                .unwrap_or(rest.len());
            let (segment, tail) = rest.split_at(split);
            values.set_opt(field.name, field.decode(segment)?);
            rest = tail;
        }
        Ok(values)
    }
}

pub struct RecordSchemaBuilder {
    name: &'static str,
    fields: Vec<FieldSpec>,
}

impl RecordSchemaBuilder {
    /// Appends a field after the ones already declared.
    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    pub fn build(self) -> RecordSchema {
        RecordSchema {
            name: self.name,
            fields: self.fields,
        }
    }
}

/// A typed record with a fixed-width line representation.
pub trait FixedWidthRecord: Sized {
    fn schema() -> &'static RecordSchema;

    fn to_values(&self) -> FieldValues;

    fn from_values(values: &FieldValues) -> Result<Self>;

    /// Encodes the record as one line of [`RecordSchema::width`] characters.
    fn to_record(&self) -> Result<String> {
        Self::schema().encode(&self.to_values())
    }

    fn from_record(line: &str) -> Result<Self> {
        Self::from_values(&Self::schema().decode(line)?)
    }
}
