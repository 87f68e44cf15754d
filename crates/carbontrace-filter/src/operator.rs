//! Comparison operators

use crate::ConfigurationError;
use std::cmp::Ordering;
use std::fmt;

/// Comparison operator of a criterion
///
/// Applied as `record_value <op> criterion_value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// Equal
    Equal,
    /// Greater than
    Greater,
    /// Greater than or equal
    GreaterOrEqual,
    /// Less than
    Less,
    /// Less than or equal
    LessOrEqual,
}

impl Operator {
    /// All operators, in prompt order
    pub const ALL: [Operator; 5] = [
        Operator::Equal,
        Operator::Greater,
        Operator::GreaterOrEqual,
        Operator::Less,
        Operator::LessOrEqual,
    ];

    /// Get the operator name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Equal => "equal",
            Operator::Greater => "greater",
            Operator::GreaterOrEqual => "greater-or-equal",
            Operator::Less => "less",
            Operator::LessOrEqual => "less-or-equal",
        }
    }

    /// Get the operator symbol
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Equal => "=",
            Operator::Greater => ">",
            Operator::GreaterOrEqual => ">=",
            Operator::Less => "<",
            Operator::LessOrEqual => "<=",
        }
    }

    /// Parse an operator from a symbol or a name
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "=" | "==" | "eq" | "equal" => Some(Operator::Equal),
            ">" | "gt" | "greater" => Some(Operator::Greater),
            ">=" | "ge" | "greater-or-equal" | "greater-equal" => Some(Operator::GreaterOrEqual),
            "<" | "lt" | "less" | "lower" => Some(Operator::Less),
            "<=" | "le" | "less-or-equal" | "lower-equal" => Some(Operator::LessOrEqual),
            _ => None,
        }
    }

    /// Whether `lhs.cmp(rhs) == ordering` satisfies `lhs <op> rhs`
    pub fn holds(&self, ordering: Ordering) -> bool {
        match self {
            Operator::Equal => ordering == Ordering::Equal,
            Operator::Greater => ordering == Ordering::Greater,
            Operator::GreaterOrEqual => ordering != Ordering::Less,
            Operator::Less => ordering == Ordering::Less,
            Operator::LessOrEqual => ordering != Ordering::Greater,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Operator {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ConfigurationError::UnknownOperator(s.to_string()))
    }
}
