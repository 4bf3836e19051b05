//! Field normalization for loosely typed upstream records.
//!
//! The catalog and stock systems do not agree on field casing (`name` vs
//! `Name`) and occasionally encode numbers as strings. [`FieldNormalizer`]
//! reads named fields from any record that implements [`JsonRecord`],
//! matching names case-insensitively and coercing scalar types.
//!
//! The normalizer only sees the [`Scalar`] view of a record, so it does not
//! depend on a particular JSON library. An implementation for
//! `serde_json::Value` is provided.

use serde_json::{Map, Value};

// ============================================================================
// RECORD VIEW
// ============================================================================

/// Borrowed view of a single field value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar<'a> {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(&'a str),
    /// An object or array. Never coerced to a scalar.
    Nested,
}

/// A tree-shaped record whose top-level fields can be enumerated.
pub trait JsonRecord {
    /// Iterate the record's top-level fields in document order.
    ///
    /// Non-object values yield no fields.
    fn fields<'a>(&'a self) -> Box<dyn Iterator<Item = (&'a str, Scalar<'a>)> + 'a>;
}

fn scalar_of(value: &Value) -> Scalar<'_> {
    match value {
        Value::Null => Scalar::Null,
        Value::Bool(b) => Scalar::Bool(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Scalar::Integer(i),
            None => n.as_f64().map(Scalar::Float).unwrap_or(Scalar::Null),
        },
        Value::String(s) => Scalar::Text(s),
        Value::Array(_) | Value::Object(_) => Scalar::Nested,
    }
}

impl JsonRecord for Map<String, Value> {
    fn fields<'a>(&'a self) -> Box<dyn Iterator<Item = (&'a str, Scalar<'a>)> + 'a> {
        Box::new(self.iter().map(|(k, v)| (k.as_str(), scalar_of(v))))
    }
}

impl JsonRecord for Value {
    fn fields<'a>(&'a self) -> Box<dyn Iterator<Item = (&'a str, Scalar<'a>)> + 'a> {
        match self {
            Value::Object(map) => map.fields(),
            _ => Box::new(std::iter::empty()),
        }
    }
}

// ============================================================================
// NORMALIZER
// ============================================================================

/// Case-insensitive, type-coercing field extraction.
pub struct FieldNormalizer;

impl FieldNormalizer {
    /// Find a field by name.
    ///
    /// An exact match wins; otherwise the first field whose name matches
    /// ignoring ASCII case is returned.
    pub fn lookup<'a, R>(record: &'a R, name: &str) -> Option<Scalar<'a>>
    where
        R: JsonRecord + ?Sized,
    {
        let mut folded = None;
        for (key, value) in record.fields() {
            if key == name {
                return Some(value);
            }
            if folded.is_none() && key.eq_ignore_ascii_case(name) {
                folded = Some(value);
            }
        }
        folded
    }

    /// Read a field as a string.
    ///
    /// Numbers and booleans are rendered as text. Null, nested values and
    /// absent fields yield `None`.
    pub fn string<R>(record: &R, name: &str) -> Option<String>
    where
        R: JsonRecord + ?Sized,
    {
        match Self::lookup(record, name)? {
            Scalar::Text(s) => Some(s.to_string()),
            Scalar::Integer(i) => Some(i.to_string()),
            Scalar::Float(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => {
                Some(format!("{}", f as i64))
            }
            Scalar::Float(f) => Some(f.to_string()),
            Scalar::Bool(b) => Some(b.to_string()),
            Scalar::Null | Scalar::Nested => None,
        }
    }

    /// Read a field as a string, treating blank values as absent.
    pub fn non_blank_string<R>(record: &R, name: &str) -> Option<String>
    where
        R: JsonRecord + ?Sized,
    {
        Self::string(record, name).filter(|s| !s.trim().is_empty())
    }

    /// Read a field as an integer.
    ///
    /// Accepts integral numbers and strings holding an integer (surrounding
    /// whitespace is ignored). Fractional numbers, booleans and null yield
    /// `None`.
    pub fn integer<R>(record: &R, name: &str) -> Option<i64>
    where
        R: JsonRecord + ?Sized,
    {
        match Self::lookup(record, name)? {
            Scalar::Integer(i) => Some(i),
            Scalar::Float(f)
                if f.is_finite()
                    && f.fract() == 0.0
                    && f >= i64::MIN as f64
                    && f <= i64::MAX as f64 =>
            {
                Some(f as i64)
            }
            Scalar::Text(s) => s.trim().parse::<i64>().ok(),
            Scalar::Float(_) | Scalar::Bool(_) | Scalar::Null | Scalar::Nested => None,
        }
    }
}
