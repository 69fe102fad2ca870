//! Fixed-width field codec.
//!
//! A [`FieldSpec`] describes one column of a record: its name, its width in
//! characters, how values are rendered and parsed, and an optional default.
//! Every encoded field occupies exactly `width` characters.

use crate::error::{GiroError, Result};
use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;
use std::fmt;

/// `DDMMYYYY`
pub const DATE_FORMAT: &str = "%d%m%Y";

/// `DDMMYYYYhhmmss`
pub const DATETIME_FORMAT: &str = "%d%m%Y%H%M%S";

/// A typed field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Text(String),
    Integer(u64),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl Value {
    fn kind_name(&self) -> &'static str {
        match self {
            Value::Text(_) => "text",
            Value::Integer(_) => "integer",
            Value::Date(_) => "date",
            Value::DateTime(_) => "date-time",
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::Integer(n)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(dt: NaiveDateTime) -> Self {
        Value::DateTime(dt)
    }
}

/// A validation pattern that must match a whole text value.
///
/// The source expression is anchored at both ends when compiled, so
/// `[A-Z]{3}` accepts `"SGD"` but not `"SGDX"`.
#[derive(Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    /// Compiles `source` as a full-match pattern.
    pub fn new(source: &str) -> std::result::Result<Self, regex::Error> {
        let regex = Regex::new(&format!("^(?:{})$", source))?;
        Ok(Pattern {
            source: source.to_string(),
            regex,
        })
    }

    /// The expression as written, without the added anchors.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_full_match(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pattern(/{}/)", self.source)
    }
}

/// How a field's value is rendered and parsed.
#[derive(Debug, Clone)]
pub enum FieldKind {
    /// Left-aligned, right-padded with spaces.
    Text { validator: Option<Pattern> },
    /// Unsigned, left-padded with zeros.
    Integer,
    /// Calendar date rendered with a fixed template.
    Date { format: &'static str },
    /// Date and time rendered with a fixed template.
    DateTime { format: &'static str },
}

/// Descriptor for one fixed-width field.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: &'static str,
    pub width: usize,
    pub kind: FieldKind,
    pub default: Option<Value>,
}

impl FieldSpec {
    pub fn text(name: &'static str, width: usize) -> Self {
        FieldSpec {
            name,
            width,
            kind: FieldKind::Text { validator: None },
            default: None,
        }
    }

    pub fn validated_text(name: &'static str, width: usize, pattern: Pattern) -> Self {
        FieldSpec {
            name,
            width,
            kind: FieldKind::Text {
                validator: Some(pattern),
            },
            default: None,
        }
    }

    pub fn integer(name: &'static str, width: usize) -> Self {
        FieldSpec {
            name,
            width,
            kind: FieldKind::Integer,
            default: None,
        }
    }

    pub fn date(name: &'static str, width: usize, format: &'static str) -> Self {
        FieldSpec {
            name,
            width,
            kind: FieldKind::Date { format },
            default: None,
        }
    }

    pub fn datetime(name: &'static str, width: usize, format: &'static str) -> Self {
        FieldSpec {
            name,
            width,
            kind: FieldKind::DateTime { format },
            default: None,
        }
    }

    /// Sets the value used when none is supplied at encode time.
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Encodes `value` into exactly `width` characters.
    ///
    /// An explicit value is checked against the field's pattern, if any. When
    /// `value` is `None` the default is rendered without pattern checks; a
    /// pattern-validated field with neither fails with
    /// [`GiroError::MissingValue`].
    pub fn encode(&self, value: Option<&Value>) -> Result<String> {
        match value {
            Some(v) => {
                self.validate(v)?;
                self.render(v)
            }
            None => match &self.default {
                Some(default) => self.render(default),
                None => self.render_unset(),
            },
        }
    }

    /// Decodes a segment of exactly `width` characters.
    ///
    /// Segments are never rejected for failing a validation pattern; a
    /// pattern only decides how much right padding a text value keeps. Blank
    /// date and date-time segments decode to `None`.
    pub fn decode(&self, segment: &str) -> Result<Option<Value>> {
        let actual = segment.chars().count();
        if actual != self.width {
            return Err(GiroError::Width {
                field: self.name,
                expected: self.width,
                actual,
            });
        }

        match &self.kind {
            FieldKind::Text { validator } => Ok(Some(Value::Text(
                unpad_text(segment, validator.as_ref()).to_string(),
            ))),
            FieldKind::Integer => {
                if !segment.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(self.invalid(segment, "expected only digits"));
                }
                segment
                    .parse::<u64>()
                    .map(|n| Some(Value::Integer(n)))
                    .map_err(|e| self.invalid(segment, &e.to_string()))
            }
            FieldKind::Date { format } => {
                if segment.trim().is_empty() {
                    return Ok(None);
                }
                NaiveDate::parse_from_str(segment, format)
                    .map(|d| Some(Value::Date(d)))
                    .map_err(|e| self.invalid(segment, &e.to_string()))
            }
            FieldKind::DateTime { format } => {
                if segment.trim().is_empty() {
                    return Ok(None);
                }
                NaiveDateTime::parse_from_str(segment, format)
                    .map(|dt| Some(Value::DateTime(dt)))
                    .map_err(|e| self.invalid(segment, &e.to_string()))
            }
        }
    }

    fn validate(&self, value: &Value) -> Result<()> {
        if let (FieldKind::Text { validator: Some(pattern) }, Value::Text(text)) =
            (&self.kind, value)
        {
            if !pattern.is_full_match(text) {
                return Err(GiroError::Validation {
                    field: self.name,
                    pattern: pattern.as_str().to_string(),
                    value: text.clone(),
                });
            }
        }
        Ok(())
    }

    fn render(&self, value: &Value) -> Result<String> {
        let width = self.width;
        let rendered = match (&self.kind, value) {
            (FieldKind::Text { .. }, Value::Text(text)) => {
                self.check_fits(text)?;
                format!("{:<width$}", text)
            }
            (FieldKind::Integer, Value::Integer(n)) => format!("{:0>width$}", n),
            (FieldKind::Date { format }, Value::Date(d)) => d.format(format).to_string(),
            (FieldKind::DateTime { format }, Value::DateTime(dt)) => {
                dt.format(format).to_string()
            }
            (kind, other) => {
                log::debug!(
                    "Field {}: got a {} value for {:?}",
                    self.name,
                    other.kind_name(),
                    kind
                );
                return Err(GiroError::TypeMismatch {
                    field: self.name,
                    expected: self.kind_name(),
                });
            }
        };
        self.check_fits(&rendered)?;
        Ok(rendered)
    }

    fn render_unset(&self) -> Result<String> {
        match &self.kind {
            FieldKind::Text {
                validator: Some(_),
            } => Err(GiroError::MissingValue { field: self.name }),
            FieldKind::Integer => Ok("0".repeat(self.width)),
            _ => Ok(" ".repeat(self.width)),
        }
    }

    fn check_fits(&self, rendered: &str) -> Result<()> {
        let actual = rendered.chars().count();
        let fits = match self.kind {
            FieldKind::Text { .. } => actual <= self.width,
            _ => actual == self.width,
        };
        if fits {
            Ok(())
        } else {
            Err(GiroError::Width {
                field: self.name,
                expected: self.width,
                actual,
            })
        }
    }

    fn kind_name(&self) -> &'static str {
        match self.kind {
            FieldKind::Text { .. } => "text",
            FieldKind::Integer => "integer",
            FieldKind::Date { .. } => "date",
            FieldKind::DateTime { .. } => "date-time",
        }
    }

    fn invalid(&self, segment: &str, reason: &str) -> GiroError {
        GiroError::InvalidField {
            field: self.name,
            value: segment.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Strips the right padding from a text segment.
///
/// When the trimmed value no longer matches `validator` but a value with some
/// of the trailing spaces restored does, the shortest such value is kept, so
/// `"SAL "` under `[A-Z ]{4}` survives decoding.
fn unpad_text<'a>(segment: &'a str, validator: Option<&Pattern>) -> &'a str {
    let trimmed = segment.trim_end_matches(' ');
    let Some(pattern) = validator else {
        return trimmed;
    };
    if pattern.is_full_match(trimmed) {
        return trimmed;
    }
    // Everything past `trimmed` is ASCII spaces, so each length is a char boundary.
    (trimmed.len() + 1..=segment.len())
        .map(|len| &segment[..len])
        .find(|candidate| pattern.is_full_match(candidate))
        .unwrap_or(trimmed)
}
