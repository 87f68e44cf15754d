//! Comparison operands

use crate::FieldKind;
use carbontrace_domain::Address;
use std::fmt;

/// The value a criterion compares record attributes against
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Integer operand (ids, carbon footprint, lot)
    Integer(u64),
    /// Address operand
    Address(Address),
    /// Free-text operand, compared case-sensitively
    Text(String),
    /// Boolean operand
    Boolean(bool),
}

impl Value {
    /// Type category this value belongs to
    pub fn kind(&self) -> FieldKind {
        match self {
            Value::Integer(_) => FieldKind::Numeric,
            Value::Address(_) => FieldKind::Identity,
            Value::Text(_) => FieldKind::Text,
            Value::Boolean(_) => FieldKind::Boolean,
        }
    }

    /// Parse raw input as a value of the given kind
    ///
    /// Text is taken verbatim; the other kinds ignore surrounding whitespace.
    pub fn parse(kind: FieldKind, raw: &str) -> Result<Self, String> {
        match kind {
            FieldKind::Numeric => raw
                .trim()
                .parse::<u64>()
                .map(Value::Integer)
                .map_err(|_| "expected a non-negative integer".to_string()),
            FieldKind::Identity => Address::parse(raw).map(Value::Address),
            FieldKind::Text => Ok(Value::Text(raw.to_string())),
            FieldKind::Boolean => match raw.trim().to_lowercase().as_str() {
                "true" | "yes" | "y" => Ok(Value::Boolean(true)),
                "false" | "no" | "n" => Ok(Value::Boolean(false)),
                _ => Err("expected true/false or yes/no".to_string()),
            },
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{}", n),
            Value::Address(a) => write!(f, "{}", a),
            Value::Text(s) => write!(f, "\"{}\"", s),
            Value::Boolean(b) => write!(f, "{}", b),
        }
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::Integer(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<Address> for Value {
    fn from(a: Address) -> Self {
        Value::Address(a)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}
