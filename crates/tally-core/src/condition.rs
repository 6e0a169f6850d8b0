//! # Pricing Conditions
//!
//! A condition is a typed predicate over a fact derived from the cart.
//!
//! ## Condition Kinds
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Kind            Fact                         Effect on working set     │
//! │  ──────────────  ───────────────────────────  ───────────────────────── │
//! │  ITEM_CODE       item code (Text), per item   FILTER items              │
//! │  QUANTITY_TOTAL  working-set size (Integer)   GATE: keep all or nothing │
//! │  X_QUANTITY      ⌊size / value⌋ groups        TRUNCATE to one per group │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tally_core::condition::{Condition, ConditionKind, Operator};
//! use tally_core::value::Value;
//!
//! let tshirts = Condition::new(ConditionKind::ItemCode, Operator::Eq, "TSHIRT".into()).unwrap();
//! let three_or_more = Condition::new(ConditionKind::QuantityTotal, Operator::Gte, Value::Integer(3)).unwrap();
//!
//! assert!(tshirts.matches_code("TSHIRT").unwrap());
//! assert!(three_or_more.admits_quantity(4).unwrap());
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{ConfigurationError, EvaluationError};
use crate::value::Value;

// =============================================================================
// Condition Kind & Operator
// =============================================================================

/// What a condition derives its fact from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ConditionKind {
    /// Each item's code.
    ItemCode,
    /// Number of items in the working set.
    QuantityTotal,
    /// Complete groups of `value` items in the working set.
    XQuantity,
}

impl fmt::Display for ConditionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionKind::ItemCode => write!(f, "item_code"),
            ConditionKind::QuantityTotal => write!(f, "quantity_total"),
            ConditionKind::XQuantity => write!(f, "x_quantity"),
        }
    }
}

/// Comparison operator. The fact is always the left-hand side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Operator {
    #[default]
    #[serde(alias = "==")]
    Eq,
    #[serde(alias = "!=")]
    Neq,
    #[serde(alias = ">")]
    Gt,
    #[serde(alias = "<")]
    Lt,
    #[serde(alias = ">=")]
    Gte,
    #[serde(alias = "<=")]
    Lte,
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operator::Eq => write!(f, "eq"),
            Operator::Neq => write!(f, "neq"),
            Operator::Gt => write!(f, "gt"),
            Operator::Lt => write!(f, "lt"),
            Operator::Gte => write!(f, "gte"),
            Operator::Lte => write!(f, "lte"),
        }
    }
}

// =============================================================================
// Condition
// =============================================================================

/// A validated pricing condition. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct Condition {
    kind: ConditionKind,
    operator: Operator,
    value: Value,
}

impl Condition {
    /// Builds a condition.
    ///
    /// ## Errors
    /// [`ConfigurationError::InvalidGroupSize`] when an `XQuantity` condition
    /// does not carry a positive `Integer`. The other kinds accept any value;
    /// a type mismatch against the derived fact surfaces at evaluation time.
    pub fn new(
        kind: ConditionKind,
        operator: Operator,
        value: Value,
    ) -> Result<Self, ConfigurationError> {
        if kind == ConditionKind::XQuantity && !matches!(value, Value::Integer(n) if n > 0) {
            return Err(ConfigurationError::InvalidGroupSize { value });
        }
        Ok(Condition {
            kind,
            operator,
            value,
        })
    }

    #[inline]
    pub fn kind(&self) -> ConditionKind {
        self.kind
    }

    #[inline]
    pub fn operator(&self) -> Operator {
        self.operator
    }

    #[inline]
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Evaluates the condition against an item code.
    pub fn matches_code(&self, code: &str) -> Result<bool, EvaluationError> {
        Value::Text(code.to_string()).compare(self.operator, &self.value)
    }

    /// Evaluates the condition against a working-set size.
    pub fn admits_quantity(&self, count: usize) -> Result<bool, EvaluationError> {
        Value::Integer(count as i64).compare(self.operator, &self.value)
    }

    /// Group size of an `XQuantity` condition.
    pub fn group_size(&self) -> Option<usize> {
        match (self.kind, &self.value) {
            (ConditionKind::XQuantity, Value::Integer(n)) => usize::try_from(*n).ok(),
            _ => None,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.kind, self.operator, self.value)
    }
}

// =============================================================================
// Condition Spec
// =============================================================================

/// Condition kind as written in configuration.
///
/// Kinds this engine does not know deserialize as `Unrecognized` instead of
/// failing the whole configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KindSpec {
    Known(ConditionKind),
    Unrecognized(String),
}

impl From<ConditionKind> for KindSpec {
    fn from(kind: ConditionKind) -> Self {
        KindSpec::Known(kind)
    }
}

/// Declarative, possibly incomplete condition as written in configuration.
///
/// ```toml
/// { kind = "quantity_total", operator = "gte", value = 3 }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConditionSpec {
    #[serde(default)]
    pub kind: Option<KindSpec>,
    #[serde(default)]
    pub operator: Option<Operator>,
    #[serde(default)]
    pub value: Option<Value>,
}

impl ConditionSpec {
    /// Builds the condition. `Ok(None)` for a kind this engine does not know.
    ///
    /// ## Errors
    /// Missing kind or value is rejected; a missing operator means `Eq`.
    pub fn build(self) -> Result<Option<Condition>, ConfigurationError> {
        let kind = match self.kind {
            Some(KindSpec::Known(kind)) => kind,
            Some(KindSpec::Unrecognized(_)) => return Ok(None),
            None => {
                return Err(ConfigurationError::Missing {
                    subject: "condition",
                    field: "kind",
                })
            }
        };
        let value = self.value.ok_or(ConfigurationError::Missing {
            subject: "condition",
            field: "value",
        })?;
        Condition::new(kind, self.operator.unwrap_or_default(), value).map(Some)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_code_condition() {
        let cond = Condition::new(ConditionKind::ItemCode, Operator::Eq, "VOUCHER".into()).unwrap();
        assert!(cond.matches_code("VOUCHER").unwrap());
        assert!(!cond.matches_code("PANTS").unwrap());

        let not_voucher = Condition::new(ConditionKind::ItemCode, Operator::Neq, "VOUCHER".into()).unwrap();
        assert!(not_voucher.matches_code("PANTS").unwrap());
    }

    #[test]
    fn test_item_code_ordering_fails_at_evaluation() {
        let cond = Condition::new(ConditionKind::ItemCode, Operator::Gt, "A".into()).unwrap();
        assert!(cond.matches_code("VOUCHER").is_err());
    }

    #[test]
    fn test_quantity_condition() {
        let cond = Condition::new(ConditionKind::QuantityTotal, Operator::Gte, Value::Integer(3)).unwrap();
        assert!(!cond.admits_quantity(2).unwrap());
        assert!(cond.admits_quantity(3).unwrap());
        assert!(cond.admits_quantity(4).unwrap());
    }

    #[test]
    fn test_quantity_condition_with_text_operand_fails() {
        let cond = Condition::new(ConditionKind::QuantityTotal, Operator::Eq, "3".into()).unwrap();
        assert!(matches!(
            cond.admits_quantity(3),
            Err(EvaluationError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_group_size_must_be_positive_integer() {
        assert!(Condition::new(ConditionKind::XQuantity, Operator::Eq, Value::Integer(2)).is_ok());
        for bad in [Value::Integer(0), Value::Integer(-2), Value::Decimal(2.0), "2".into()] {
            assert!(matches!(
                Condition::new(ConditionKind::XQuantity, Operator::Eq, bad),
                Err(ConfigurationError::InvalidGroupSize { .. })
            ));
        }
    }

    #[test]
    fn test_group_size_accessor() {
        let cond = Condition::new(ConditionKind::XQuantity, Operator::Eq, Value::Integer(3)).unwrap();
        assert_eq!(cond.group_size(), Some(3));

        let code = Condition::new(ConditionKind::ItemCode, Operator::Eq, "X".into()).unwrap();
        assert_eq!(code.group_size(), None);
    }

    #[test]
    fn test_spec_defaults_operator_to_eq() {
        let spec = ConditionSpec {
            kind: Some(ConditionKind::ItemCode.into()),
            operator: None,
            value: Some("PANTS".into()),
        };
        let cond = spec.build().unwrap().unwrap();
        assert_eq!(cond.operator(), Operator::Eq);
    }

    #[test]
    fn test_spec_missing_kind_or_value() {
        let no_kind = ConditionSpec {
            value: Some(Value::Integer(1)),
            ..Default::default()
        };
        assert_eq!(
            no_kind.build().unwrap_err(),
            ConfigurationError::Missing {
                subject: "condition",
                field: "kind"
            }
        );

        let no_value = ConditionSpec {
            kind: Some(ConditionKind::QuantityTotal.into()),
            ..Default::default()
        };
        assert_eq!(
            no_value.build().unwrap_err(),
            ConfigurationError::Missing {
                subject: "condition",
                field: "value"
            }
        );
    }

    #[test]
    fn test_spec_deserializes_operator_aliases() {
        let spec: ConditionSpec =
            serde_json::from_str(r#"{"kind": "quantity_total", "operator": ">=", "value": 3}"#).unwrap();
        assert_eq!(spec.kind, Some(KindSpec::Known(ConditionKind::QuantityTotal)));
        assert_eq!(spec.operator, Some(Operator::Gte));
        assert_eq!(spec.value, Some(Value::Integer(3)));
    }

    #[test]
    fn test_unrecognized_kind_builds_nothing() {
        let spec: ConditionSpec = serde_json::from_str(r#"{"kind": "weekday", "value": "MON"}"#).unwrap();
        assert_eq!(spec.kind, Some(KindSpec::Unrecognized("weekday".to_string())));
        assert_eq!(spec.build().unwrap(), None);

        let no_value: ConditionSpec = serde_json::from_str(r#"{"kind": "weekday"}"#).unwrap();
        assert_eq!(no_value.build().unwrap(), None);
    }

    #[test]
    fn test_display() {
        let cond = Condition::new(ConditionKind::QuantityTotal, Operator::Gte, Value::Integer(3)).unwrap();
        assert_eq!(cond.to_string(), "quantity_total gte 3");
    }
}
