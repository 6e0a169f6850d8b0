//! # Pricing Rules
//!
//! A pricing rule pairs an AND of conditions with a list of actions. A rule
//! set is the ordered list the engine walks on every pricing pass.
//!
//! ## Example: the 2-for-1 voucher
//! ```rust
//! use tally_core::action::{Action, ActionKind};
//! use tally_core::condition::{Condition, ConditionKind, Operator};
//! use tally_core::rule::PricingRule;
//! use tally_core::value::Value;
//!
//! let rule = PricingRule::new(
//!     "voucher-2-for-1",
//!     vec![
//!         Condition::new(ConditionKind::ItemCode, Operator::Eq, "VOUCHER".into()).unwrap(),
//!         Condition::new(ConditionKind::XQuantity, Operator::Eq, Value::Integer(2)).unwrap(),
//!     ],
//!     vec![Action::new(ActionKind::DiscountPercent, Value::Integer(100)).unwrap()],
//! )
//! .unwrap();
//!
//! assert!(!rule.is_noop());
//! ```

use std::ops::Deref;

use serde::{Deserialize, Serialize};
use tracing::warn;
use ts_rs::TS;

use crate::action::{Action, ActionSpec};
use crate::condition::{Condition, ConditionKind, ConditionSpec, KindSpec};
use crate::error::{ConfigurationError, ValidationError};

// =============================================================================
// Pricing Rule
// =============================================================================

/// A validated pricing rule. Read-only after construction.
///
/// ## Invariants
/// - `name` is not blank
/// - at most one `XQuantity` condition
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct PricingRule {
    name: String,
    conditions: Vec<Condition>,
    actions: Vec<Action>,
}

impl PricingRule {
    /// Builds a rule.
    ///
    /// An empty `conditions` or `actions` list is accepted and produces a
    /// no-op rule (see [`PricingRule::is_noop`]).
    pub fn new(
        name: impl Into<String>,
        conditions: Vec<Condition>,
        actions: Vec<Action>,
    ) -> Result<Self, ConfigurationError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(ValidationError::Required {
                field: "rule name".to_string(),
            }
            .into());
        }

        let group_conditions = conditions
            .iter()
            .filter(|c| c.kind() == ConditionKind::XQuantity)
            .count();
        if group_conditions > 1 {
            return Err(ConfigurationError::DuplicateGroupCondition { rule: name });
        }

        Ok(PricingRule {
            name,
            conditions,
            actions,
        })
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    #[inline]
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Conditions of one kind, in declaration order.
    pub fn conditions_of(&self, kind: ConditionKind) -> impl Iterator<Item = &Condition> {
        self.conditions.iter().filter(move |c| c.kind() == kind)
    }

    /// A rule without conditions or without actions never changes the cart.
    ///
    /// An empty condition list does NOT mean "match everything".
    pub fn is_noop(&self) -> bool {
        self.conditions.is_empty() || self.actions.is_empty()
    }
}

// =============================================================================
// Rule Spec
// =============================================================================

/// Declarative rule as written in configuration.
///
/// ```toml
/// [[rules]]
/// name = "tshirt-bulk"
/// conditions = [
///   { kind = "item_code", value = "TSHIRT" },
///   { kind = "quantity_total", operator = "gte", value = 3 },
/// ]
/// actions = [{ kind = "fixed_price", value = 19.00 }]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleSpec {
    pub name: String,
    #[serde(default)]
    pub conditions: Vec<ConditionSpec>,
    #[serde(default)]
    pub actions: Vec<ActionSpec>,
}

impl TryFrom<RuleSpec> for PricingRule {
    type Error = ConfigurationError;

    /// Conditions of an unrecognized kind are dropped. A rule left without
    /// conditions is a no-op.
    fn try_from(spec: RuleSpec) -> Result<Self, Self::Error> {
        let mut conditions = Vec::with_capacity(spec.conditions.len());
        for condition in spec.conditions {
            if let Some(KindSpec::Unrecognized(kind)) = &condition.kind {
                warn!(rule = %spec.name.trim(), %kind, "Skipping condition of unrecognized kind");
            }
            conditions.extend(condition.build()?);
        }
        let actions = spec
            .actions
            .into_iter()
            .map(Action::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        PricingRule::new(spec.name, conditions, actions)
    }
}

// =============================================================================
// Rule Set
// =============================================================================

/// Ordered, immutable list of pricing rules.
///
/// Dereferences to `[PricingRule]`, so it can be handed straight to
/// [`engine::apply`](crate::engine::apply).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RuleSet(Vec<PricingRule>);

impl RuleSet {
    pub fn new(rules: Vec<PricingRule>) -> Self {
        RuleSet(rules)
    }

    /// Builds every rule, failing on the first invalid one.
    pub fn from_specs(specs: Vec<RuleSpec>) -> Result<Self, ConfigurationError> {
        specs
            .into_iter()
            .map(PricingRule::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map(RuleSet)
    }
}

impl Deref for RuleSet {
    type Target = [PricingRule];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<PricingRule>> for RuleSet {
    fn from(rules: Vec<PricingRule>) -> Self {
        RuleSet(rules)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionKind;
    use crate::condition::Operator;
    use crate::value::Value;

    fn group_of(n: i64) -> Condition {
        Condition::new(ConditionKind::XQuantity, Operator::Eq, Value::Integer(n)).unwrap()
    }

    fn free() -> Action {
        Action::new(ActionKind::DiscountPercent, Value::Integer(100)).unwrap()
    }

    #[test]
    fn test_rule_without_conditions_or_actions_is_noop() {
        assert!(PricingRule::new("empty", vec![], vec![free()]).unwrap().is_noop());
        assert!(PricingRule::new("no-actions", vec![group_of(2)], vec![]).unwrap().is_noop());
        assert!(!PricingRule::new("full", vec![group_of(2)], vec![free()]).unwrap().is_noop());
    }

    #[test]
    fn test_rule_name_is_required() {
        let err = PricingRule::new("  ", vec![], vec![]).unwrap_err();
        assert!(matches!(err, ConfigurationError::Validation(ValidationError::Required { .. })));
    }

    #[test]
    fn test_rule_rejects_two_group_conditions() {
        let err = PricingRule::new("twice", vec![group_of(2), group_of(3)], vec![free()]).unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::DuplicateGroupCondition {
                rule: "twice".to_string()
            }
        );
    }

    #[test]
    fn test_conditions_of_keeps_declaration_order() {
        let a = Condition::new(ConditionKind::ItemCode, Operator::Neq, "A".into()).unwrap();
        let b = Condition::new(ConditionKind::ItemCode, Operator::Neq, "B".into()).unwrap();
        let rule = PricingRule::new("r", vec![a.clone(), group_of(2), b.clone()], vec![free()]).unwrap();
        let codes: Vec<_> = rule.conditions_of(ConditionKind::ItemCode).collect();
        assert_eq!(codes, vec![&a, &b]);
    }

    #[test]
    fn test_rule_spec_from_json() {
        let spec: RuleSpec = serde_json::from_str(
            r#"{
                "name": "tshirt-bulk",
                "conditions": [
                    {"kind": "item_code", "value": "TSHIRT"},
                    {"kind": "quantity_total", "operator": "gte", "value": 3}
                ],
                "actions": [{"kind": "fixed_price", "value": 19.0}]
            }"#,
        )
        .unwrap();
        let rule = PricingRule::try_from(spec).unwrap();
        assert_eq!(rule.name(), "tshirt-bulk");
        assert_eq!(rule.conditions().len(), 2);
        assert_eq!(rule.actions()[0].kind(), ActionKind::FixedPrice);
    }

    #[test]
    fn test_unrecognized_condition_kinds_are_skipped() {
        let spec: RuleSpec = serde_json::from_str(
            r#"{
                "name": "monday-pants",
                "conditions": [
                    {"kind": "weekday", "value": "MON"},
                    {"kind": "item_code", "value": "PANTS"}
                ],
                "actions": [{"kind": "discount_percent", "value": 10}]
            }"#,
        )
        .unwrap();
        let rule = PricingRule::try_from(spec).unwrap();
        assert_eq!(rule.conditions().len(), 1);
        assert_eq!(rule.conditions()[0].kind(), ConditionKind::ItemCode);
        assert!(!rule.is_noop());
    }

    #[test]
    fn test_rule_with_only_unrecognized_conditions_is_noop() {
        let spec: RuleSpec = serde_json::from_str(
            r#"{
                "name": "weekday-only",
                "conditions": [{"kind": "weekday", "value": "MON"}],
                "actions": [{"kind": "discount_percent", "value": 100}]
            }"#,
        )
        .unwrap();
        assert!(PricingRule::try_from(spec).unwrap().is_noop());
    }

    #[test]
    fn test_rule_set_stops_at_first_invalid_spec() {
        let specs = vec![
            RuleSpec {
                name: "ok".to_string(),
                ..Default::default()
            },
            RuleSpec {
                name: "broken".to_string(),
                conditions: vec![ConditionSpec::default()],
                actions: vec![],
            },
        ];
        assert!(matches!(
            RuleSet::from_specs(specs),
            Err(ConfigurationError::Missing { subject: "condition", .. })
        ));
    }

    #[test]
    fn test_rule_set_derefs_to_slice() {
        let set = RuleSet::new(vec![PricingRule::new("a", vec![], vec![]).unwrap()]);
        assert_eq!(set.len(), 1);
        assert_eq!(set[0].name(), "a");
    }
}
