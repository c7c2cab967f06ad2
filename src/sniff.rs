//! Best-effort classification of a field into the most specific scalar it looks like.
//!
//! Patterns are tried in order: integer, decimal float, exponential float. Anything else is kept
//! as text. Only ASCII digits count as digits.

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::{Result, TableError};

static INTEGER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?[0-9]+$").expect("valid integer pattern"));
static FLOAT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?[0-9]*\.[0-9]+$").expect("valid float pattern"));
static EXP_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-?[0-9]*\.?[0-9]+[eE][-+]?[0-9]+$").expect("valid exponent pattern")
});

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Text(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Integer,
    Float,
    Text,
}

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Value::Integer(_) => Kind::Integer,
            Value::Float(_) => Kind::Float,
            Value::Text(_) => Kind::Text,
        }
    }
}

/// Sniff `text` into an integer, a float or plain text.
///
/// A value that matches a numeric pattern but does not fit the target type is reported as
/// [`TableError::InvalidNumber`] instead of being truncated.
pub fn classify(text: &str) -> Result<Value> {
    if INTEGER_PATTERN.is_match(text) {
        return text
            .parse::<i64>()
            .map(Value::Integer)
            .map_err(|_| TableError::InvalidNumber(text.to_string()));
    }
    if FLOAT_PATTERN.is_match(text) || EXP_PATTERN.is_match(text) {
        return match text.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(Value::Float(v)),
            _ => Err(TableError::InvalidNumber(text.to_string())),
        };
    }
    Ok(Value::Text(text.to_string()))
}

/// Conversion from a sniffed [`Value`] into a concrete Rust type.
///
/// The conversion is strict: an integer is not silently widened into a float. On mismatch the
/// value is handed back so the caller can report what was found.
pub trait FromValue: Sized {
    const EXPECTED: &'static str;

    fn from_value(value: Value) -> std::result::Result<Self, Value>;
}

impl FromValue for i64 {
    const EXPECTED: &'static str = "integer";

    fn from_value(value: Value) -> std::result::Result<Self, Value> {
        match value {
            Value::Integer(v) => Ok(v),
            other => Err(other),
        }
    }
}

impl FromValue for i32 {
    const EXPECTED: &'static str = "32-bit integer";

    fn from_value(value: Value) -> std::result::Result<Self, Value> {
        match value {
            Value::Integer(v) => i32::try_from(v).map_err(|_| Value::Integer(v)),
            other => Err(other),
        }
    }
}

impl FromValue for f64 {
    const EXPECTED: &'static str = "float";

    fn from_value(value: Value) -> std::result::Result<Self, Value> {
        match value {
            Value::Float(v) => Ok(v),
            other => Err(other),
        }
    }
}

impl FromValue for String {
    const EXPECTED: &'static str = "text";

    fn from_value(value: Value) -> std::result::Result<Self, Value> {
        match value {
            Value::Text(v) => Ok(v),
            other => Err(other),
        }
    }
}

impl FromValue for Value {
    const EXPECTED: &'static str = "any value";

    fn from_value(value: Value) -> std::result::Result<Self, Value> {
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers() {
        assert_eq!(classify("007").unwrap(), Value::Integer(7));
        assert_eq!(classify("-42").unwrap(), Value::Integer(-42));
    }

    #[test]
    fn floats() {
        assert_eq!(classify("2.75").unwrap(), Value::Float(2.75));
        assert_eq!(classify("-.5").unwrap(), Value::Float(-0.5));
        assert_eq!(classify("3.14e-2").unwrap(), Value::Float(0.0314));
        assert_eq!(classify("2E10").unwrap(), Value::Float(2e10));
    }

    #[test]
    fn text_is_kept_verbatim() {
        assert_eq!(classify("abc").unwrap(), Value::Text("abc".into()));
        assert_eq!(classify(" 12").unwrap(), Value::Text(" 12".into()));
        assert_eq!(classify("1.").unwrap(), Value::Text("1.".into()));
        assert_eq!(classify("").unwrap(), Value::Text(String::new()));
        assert_eq!(classify("+5").unwrap(), Value::Text("+5".into()));
    }

    #[test]
    fn overflow_is_an_error() {
        assert!(matches!(
            classify("99999999999999999999"),
            Err(TableError::InvalidNumber(_))
        ));
        assert!(matches!(classify("1e999"), Err(TableError::InvalidNumber(_))));
    }

    #[test]
    fn strict_extraction() {
        assert_eq!(i64::from_value(Value::Integer(3)), Ok(3));
        assert_eq!(f64::from_value(Value::Integer(3)), Err(Value::Integer(3)));
        assert_eq!(
            i32::from_value(Value::Integer(i64::MAX)),
            Err(Value::Integer(i64::MAX))
        );
        assert_eq!(String::from_value(Value::Text("x".into())), Ok("x".into()));
    }
}
