//! # Comparison Values
//!
//! The closed set of operand types a pricing condition can compare against.
//!
//! ## Comparison Matrix
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │              fact \ operand    Text      Integer    Decimal             │
//! │              ──────────────    ──────    ───────    ───────             │
//! │              Text              EQ NEQ    mismatch   mismatch            │
//! │              Integer           mismatch  all ops    mismatch            │
//! │              Decimal           mismatch  mismatch   all ops             │
//! │                                                                         │
//! │  "all ops" = EQ NEQ GT LT GTE LTE                                       │
//! │  mismatch / ordering on text = EvaluationError, never `false`           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Integers and decimals are deliberately NOT cross-compared: a condition
//! written as `3.0` against an item count is a configuration mistake worth
//! surfacing.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::condition::Operator;
use crate::error::EvaluationError;

/// A typed comparison value.
///
/// Deserializes untagged, so configuration can write plain literals:
/// `"VOUCHER"` is `Text`, `3` is `Integer`, `19.5` is `Decimal`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(untagged)]
#[ts(export)]
pub enum Value {
    /// String value (product codes)
    Text(String),
    /// Integer value (quantities)
    Integer(i64),
    /// Decimal value (amounts, percentages)
    Decimal(f64),
}

impl Value {
    /// Lower-case variant name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Text(_) => "text",
            Value::Integer(_) => "integer",
            Value::Decimal(_) => "decimal",
        }
    }

    /// Numeric view of the value, `None` for text.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Text(_) => None,
            Value::Integer(i) => Some(*i as f64),
            Value::Decimal(d) => Some(*d),
        }
    }

    /// Evaluates `self <operator> operand`, where `self` is the fact derived
    /// from the cart.
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::condition::Operator;
    /// use tally_core::value::Value;
    ///
    /// let count = Value::Integer(4);
    /// assert!(count.compare(Operator::Gte, &Value::Integer(3)).unwrap());
    ///
    /// let code = Value::Text("TSHIRT".into());
    /// assert!(code.compare(Operator::Gt, &Value::Text("A".into())).is_err());
    /// assert!(code.compare(Operator::Eq, &Value::Integer(1)).is_err());
    /// ```
    pub fn compare(&self, operator: Operator, operand: &Value) -> Result<bool, EvaluationError> {
        match (self, operand) {
            (Value::Text(fact), Value::Text(expected)) => match operator {
                Operator::Eq => Ok(fact == expected),
                Operator::Neq => Ok(fact != expected),
                Operator::Gt | Operator::Lt | Operator::Gte | Operator::Lte => {
                    Err(EvaluationError::UnsupportedOperator {
                        operator,
                        type_name: self.type_name(),
                    })
                }
            },
            (Value::Integer(fact), Value::Integer(expected)) => {
                Ok(operator.holds(fact.cmp(expected)))
            }
            (Value::Decimal(fact), Value::Decimal(expected)) => fact
                .partial_cmp(expected)
                .map(|ordering| operator.holds(ordering))
                .ok_or(EvaluationError::Unordered {
                    left: *fact,
                    right: *expected,
                }),
            _ => Err(EvaluationError::TypeMismatch {
                fact: self.clone(),
                operand: operand.clone(),
            }),
        }
    }
}

impl Operator {
    /// Whether `ordering` (fact compared to operand) satisfies this operator.
    fn holds(self, ordering: Ordering) -> bool {
        match self {
            Operator::Eq => ordering == Ordering::Equal,
            Operator::Neq => ordering != Ordering::Equal,
            Operator::Gt => ordering == Ordering::Greater,
            Operator::Lt => ordering == Ordering::Less,
            Operator::Gte => ordering != Ordering::Less,
            Operator::Lte => ordering != Ordering::Greater,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => write!(f, "{s:?}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Decimal(d) => write!(f, "{d}"),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Decimal(value)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
