//! # Pricing Actions
//!
//! An action turns a rule match into per-item discounts.
//!
//! ## Action Kinds
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  FIXED_PRICE(19.00) on a 20.00 T-shirt                                  │
//! │      discount = price - fixed           = 1.00   (overwrites)           │
//! │                                                                         │
//! │  DISCOUNT_PERCENT(100) on a 5.00 voucher                                │
//! │      discount = discount + price × 100% = 5.00   (accumulates)          │
//! │                                                                         │
//! │  Both: discount is clamped to [0, price] at the point of mutation       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Operands are validated when the action is built; applying an action
//! cannot fail.

use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ConfigurationError;
use crate::money::Money;
use crate::types::{CartItem, DiscountRate};
use crate::value::Value;

/// What an action does to the items it applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ActionKind {
    /// Sell each item at a fixed price.
    FixedPrice,
    /// Take a percentage off each item.
    DiscountPercent,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionKind::FixedPrice => write!(f, "fixed_price"),
            ActionKind::DiscountPercent => write!(f, "discount_percent"),
        }
    }
}

/// A validated discount action. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
#[ts(export)]
pub enum Action {
    /// Items cost exactly this much.
    FixedPrice(Money),
    /// This share of each item's price is taken off.
    DiscountPercent(DiscountRate),
}

impl Action {
    /// Builds an action from a kind and a numeric operand.
    ///
    /// ## Errors
    /// - [`ConfigurationError::IncompatibleOperand`] for `Text` operands
    /// - [`ConfigurationError::OperandOutOfRange`] for negative prices,
    ///   percentages outside `0..=100`, NaN and infinities
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::action::{Action, ActionKind};
    /// use tally_core::value::Value;
    ///
    /// let fixed = Action::new(ActionKind::FixedPrice, Value::Decimal(19.0)).unwrap();
    /// let free = Action::new(ActionKind::DiscountPercent, Value::Integer(100)).unwrap();
    /// assert_eq!(fixed.kind(), ActionKind::FixedPrice);
    /// assert_eq!(free.kind(), ActionKind::DiscountPercent);
    ///
    /// assert!(Action::new(ActionKind::FixedPrice, "cheap".into()).is_err());
    /// ```
    pub fn new(kind: ActionKind, value: Value) -> Result<Self, ConfigurationError> {
        let Some(amount) = value.as_f64() else {
            return Err(ConfigurationError::IncompatibleOperand { kind, value });
        };

        match kind {
            ActionKind::FixedPrice => match Money::from_decimal(amount) {
                Some(price) if !price.is_negative() => Ok(Action::FixedPrice(price)),
                Some(_) => Err(ConfigurationError::OperandOutOfRange {
                    kind,
                    value,
                    reason: "fixed price cannot be negative",
                }),
                None => Err(ConfigurationError::OperandOutOfRange {
                    kind,
                    value,
                    reason: "not a finite amount",
                }),
            },
            ActionKind::DiscountPercent => DiscountRate::from_percentage(amount)
                .map(Action::DiscountPercent)
                .ok_or(ConfigurationError::OperandOutOfRange {
                    kind,
                    value,
                    reason: "percentage must be between 0 and 100",
                }),
        }
    }

    /// The kind this action was built from.
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::FixedPrice(_) => ActionKind::FixedPrice,
            Action::DiscountPercent(_) => ActionKind::DiscountPercent,
        }
    }

    /// Applies the action to one item, clamping the resulting discount.
    pub(crate) fn apply_to(&self, item: &mut CartItem) {
        let discount = match self {
            Action::FixedPrice(fixed) => item.price() - *fixed,
            Action::DiscountPercent(rate) => item.discount() + item.price().percentage_of(*rate),
        };
        item.set_discount(discount);
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::FixedPrice(price) => write!(f, "fixed_price {price}"),
            Action::DiscountPercent(rate) => write!(f, "discount_percent {}%", rate.percentage()),
        }
    }
}

// =============================================================================
// Action Spec
// =============================================================================

/// Declarative, possibly incomplete action as written in configuration.
///
/// ```toml
/// { kind = "fixed_price", value = 19.00 }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionSpec {
    #[serde(default)]
    pub kind: Option<ActionKind>,
    #[serde(default)]
    pub value: Option<Value>,
}

impl TryFrom<ActionSpec> for Action {
    type Error = ConfigurationError;

    fn try_from(spec: ActionSpec) -> Result<Self, Self::Error> {
        let kind = spec.kind.ok_or(ConfigurationError::Missing {
            subject: "action",
            field: "kind",
        })?;
        let value = spec.value.ok_or(ConfigurationError::Missing {
            subject: "action",
            field: "value",
        })?;
        Action::new(kind, value)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn item(cents: i64) -> CartItem {
        CartItem::new("TSHIRT", "Summer T-Shirt", Money::from_cents(cents), "EUR").unwrap()
    }

    #[test]
    fn test_fixed_price_sets_discount() {
        let action = Action::new(ActionKind::FixedPrice, Value::Decimal(19.0)).unwrap();
        let mut tshirt = item(2000);
        action.apply_to(&mut tshirt);
        assert_eq!(tshirt.discount(), Money::from_cents(100));
        assert_eq!(tshirt.net_price(), Money::from_cents(1900));
    }

    #[test]
    fn test_fixed_price_overwrites_prior_discount() {
        let percent = Action::new(ActionKind::DiscountPercent, Value::Integer(50)).unwrap();
        let fixed = Action::new(ActionKind::FixedPrice, Value::Integer(19)).unwrap();
        let mut tshirt = item(2000);
        percent.apply_to(&mut tshirt);
        fixed.apply_to(&mut tshirt);
        assert_eq!(tshirt.discount(), Money::from_cents(100));
    }

    #[test]
    fn test_fixed_price_above_price_means_no_discount() {
        let action = Action::new(ActionKind::FixedPrice, Value::Decimal(25.0)).unwrap();
        let mut tshirt = item(2000);
        action.apply_to(&mut tshirt);
        assert!(tshirt.discount().is_zero());
    }

    #[test]
    fn test_percent_accumulates_and_clamps() {
        let action = Action::new(ActionKind::DiscountPercent, Value::Decimal(60.0)).unwrap();
        let mut tshirt = item(2000);
        action.apply_to(&mut tshirt);
        assert_eq!(tshirt.discount(), Money::from_cents(1200));
        action.apply_to(&mut tshirt);
        assert_eq!(tshirt.discount(), tshirt.price());
    }

    #[test]
    fn test_text_operand_is_rejected() {
        assert!(matches!(
            Action::new(ActionKind::DiscountPercent, "ten".into()),
            Err(ConfigurationError::IncompatibleOperand { .. })
        ));
    }

    #[test]
    fn test_out_of_range_operands_are_rejected() {
        for (kind, value) in [
            (ActionKind::FixedPrice, Value::Decimal(-1.0)),
            (ActionKind::FixedPrice, Value::Decimal(f64::INFINITY)),
            (ActionKind::DiscountPercent, Value::Integer(101)),
            (ActionKind::DiscountPercent, Value::Decimal(-5.0)),
        ] {
            assert!(matches!(
                Action::new(kind, value),
                Err(ConfigurationError::OperandOutOfRange { .. })
            ));
        }
    }

    #[test]
    fn test_spec_requires_kind_and_value() {
        let err = Action::try_from(ActionSpec {
            kind: Some(ActionKind::FixedPrice),
            value: None,
        })
        .unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::Missing {
                subject: "action",
                field: "value"
            }
        );

        let err = Action::try_from(ActionSpec {
            kind: None,
            value: Some(Value::Integer(10)),
        })
        .unwrap_err();
        assert!(matches!(err, ConfigurationError::Missing { field: "kind", .. }));
    }

    #[test]
    fn test_spec_from_json() {
        let spec: ActionSpec = serde_json::from_str(r#"{"kind": "discount_percent", "value": 100}"#).unwrap();
        let action = Action::try_from(spec).unwrap();
        assert_eq!(action, Action::DiscountPercent(DiscountRate::FULL));
        assert_eq!(action.to_string(), "discount_percent 100%");
    }
}
