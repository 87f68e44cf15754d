//! Criterion - one validated filter request

use crate::field::Accessor;
use crate::{ConfigurationError, Field, FieldValue, Operator, Result, Source, Value};
use carbontrace_domain::{EventRecord, Product};
use std::fmt;

/// A single filter request: which source, which field, which operator, which value
///
/// A criterion can only be built through [`Criterion::new`] or
/// [`Criterion::parse`], both of which check the operator and value against
/// the field table. Evaluation therefore never has to reject anything about
/// the criterion itself.
#[derive(Clone)]
pub struct Criterion {
    field: Field,
    operator: Operator,
    value: Value,
    accessor: Accessor,
}

impl Criterion {
    /// Build a criterion from typed parts
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::IncompatibleOperator`] when the field
    /// does not accept `operator`, and [`ConfigurationError::InvalidValue`]
    /// when `value` is not of the field's type.
    pub fn new(field: Field, operator: Operator, value: Value) -> Result<Self> {
        let kind = field.kind();

        if !kind.allows(operator) {
            let allowed = kind
                .operators()
                .iter()
                .map(Operator::as_str)
                .collect::<Vec<_>>()
                .join(", ");
            return Err(ConfigurationError::IncompatibleOperator {
                field,
                operator,
                allowed,
            });
        }

        if value.kind() != kind {
            return Err(ConfigurationError::InvalidValue {
                field,
                value: value.to_string(),
                reason: format!("expected a {:?} value, got {:?}", kind, value.kind()),
            });
        }

        Ok(Self {
            field,
            operator,
            value,
            accessor: field.accessor(),
        })
    }

    /// Build a criterion from user-facing text
    ///
    /// # Examples
    ///
    /// ```
    /// use carbontrace_filter::{ConfigurationError, Criterion};
    ///
    /// assert!(Criterion::parse("cf", ">=", "80").is_ok());
    ///
    /// let err = Criterion::parse("ownerAddress", ">", "0x1111111111111111111111111111111111111111");
    /// assert!(matches!(err, Err(ConfigurationError::IncompatibleOperator { .. })));
    /// ```
    pub fn parse(field: &str, operator: &str, value: &str) -> Result<Self> {
        let field: Field = field.parse()?;
        let operator: Operator = operator.parse()?;
        let value = Value::parse(field.kind(), value).map_err(|reason| {
            ConfigurationError::InvalidValue {
                field,
                value: value.to_string(),
                reason,
            }
        })?;

        Self::new(field, operator, value)
    }

    /// Field being compared
    pub fn field(&self) -> Field {
        self.field
    }

    /// Comparison operator
    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// Comparison operand
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Source supplying candidate records
    pub fn source(&self) -> Source {
        self.field.source()
    }

    /// Whether a product satisfies this criterion
    ///
    /// Always false for event-history criteria.
    pub fn matches_product(&self, product: &Product) -> bool {
        match self.accessor {
            Accessor::Entity(read) => self.test(read(product)),
            Accessor::Event(_) => false,
        }
    }

    /// Whether an event satisfies this criterion
    ///
    /// Always false for entity criteria and for events of a kind that does
    /// not carry the field.
    pub fn matches_event(&self, event: &EventRecord) -> bool {
        match self.accessor {
            Accessor::Event(read) => read(event).is_some_and(|actual| self.test(actual)),
            Accessor::Entity(_) => false,
        }
    }

    fn test(&self, actual: FieldValue<'_>) -> bool {
        let ordering = match (actual, &self.value) {
            (FieldValue::Integer(a), Value::Integer(b)) => a.cmp(b),
            (FieldValue::Address(a), Value::Address(b)) => a.cmp(b),
            (FieldValue::Text(a), Value::Text(b)) => a.cmp(b.as_str()),
            (FieldValue::Boolean(a), Value::Boolean(b)) => a.cmp(b),
            _ => return false,
        };
        self.operator.holds(ordering)
    }
}

impl PartialEq for Criterion {
    fn eq(&self, other: &Self) -> bool {
        self.field == other.field && self.operator == other.operator && self.value == other.value
    }
}

impl fmt::Debug for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Criterion")
            .field("source", &self.source())
            .field("field", &self.field)
            .field("operator", &self.operator)
            .field("value", &self.value)
            .finish()
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.field, self.operator.symbol(), self.value)
    }
}
