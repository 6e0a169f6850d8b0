//! # Rule Engine
//!
//! Runs a pricing pass: narrows the cart to the lines each rule applies to,
//! then dispatches the rule's actions over those lines.
//!
//! ## Pipeline (per rule, independently)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Pricing Pass                                       │
//! │                                                                         │
//! │  reset every discount to 0                                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  for each rule (declaration order):                                     │
//! │                                                                         │
//! │    working set = ALL cart lines            ◄── never a previous rule's  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │    1. ITEM_CODE       filter lines by code (every such condition)       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │    2. QUANTITY_TOTAL  size fails any condition? → empty                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │    3. X_QUANTITY      groups = ⌊size / n⌋                               │
//! │       │               groups == 0 → empty                               │
//! │       │               else keep the first `groups` lines                │
//! │       ▼                                                                 │
//! │    4. non-empty? apply every action to every line, in order            │
//! │                                                                         │
//! │  Stages 1-3 only READ the cart, so a rule that fails evaluation         │
//! │  leaves no partial discounts behind.                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Per-Pass Reset
//! Discounts are recomputed from scratch on every pass. Calling [`apply`]
//! twice over the same cart and rules yields identical discounts, and a
//! `DISCOUNT_PERCENT` action accumulates only with other actions of the same
//! pass.

use tracing::{debug, info, warn};

use crate::condition::ConditionKind;
use crate::error::{CoreError, CoreResult, EvaluationError, RuleFailure};
use crate::rule::PricingRule;
use crate::types::CartItem;

/// A rule that changed the cart during a pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FiredRule {
    /// Position of the rule in the rule set.
    pub index: usize,
    /// Rule name.
    pub rule: String,
    /// Cart positions the actions were applied to, in scan order.
    pub lines: Vec<usize>,
}

/// Outcome of a successful pricing pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PricingPass {
    pub fired: Vec<FiredRule>,
}

impl PricingPass {
    /// Whether the named rule fired.
    pub fn has_fired(&self, rule: &str) -> bool {
        self.fired.iter().any(|f| f.rule == rule)
    }
}

/// Runs one pricing pass over `cart`.
///
/// Items are never reordered or dropped; only their discounts change.
///
/// ## Errors
/// [`CoreError::RuleEvaluation`] listing every rule whose conditions could
/// not be evaluated. Those rules contribute nothing; every other rule has
/// still been applied when the error is returned.
///
/// ## Example
/// ```rust
/// use tally_core::{engine, CartItem, Money, RuleSet};
///
/// let mut cart = vec![
///     CartItem::new("PANTS", "Summer Pants", Money::from_cents(750), "EUR").unwrap(),
/// ];
/// let pass = engine::apply(&mut cart, &RuleSet::default()).unwrap();
/// assert!(pass.fired.is_empty());
/// assert!(cart[0].discount().is_zero());
/// ```
pub fn apply(cart: &mut [CartItem], rules: &[PricingRule]) -> CoreResult<PricingPass> {
    cart.iter_mut().for_each(CartItem::reset_discount);

    let mut pass = PricingPass::default();
    let mut failures = Vec::new();

    for (index, rule) in rules.iter().enumerate() {
        if rule.is_noop() {
            debug!(rule = %rule.name(), "Skipping rule without conditions or actions");
            continue;
        }

        let lines = match working_set(cart, rule) {
            Ok(lines) => lines,
            Err(source) => {
                warn!(rule = %rule.name(), error = %source, "Pricing rule failed evaluation");
                failures.push(RuleFailure {
                    index,
                    rule: rule.name().to_string(),
                    source,
                });
                continue;
            }
        };

        if lines.is_empty() {
            debug!(rule = %rule.name(), "Pricing rule did not match");
            continue;
        }

        for action in rule.actions() {
            for &line in &lines {
                action.apply_to(&mut cart[line]);
            }
        }

        info!(
            rule = %rule.name(),
            lines = lines.len(),
            actions = rule.actions().len(),
            "Pricing rule applied"
        );
        pass.fired.push(FiredRule {
            index,
            rule: rule.name().to_string(),
            lines,
        });
    }

    if failures.is_empty() {
        Ok(pass)
    } else {
        Err(CoreError::RuleEvaluation { failures })
    }
}

/// Computes the cart positions `rule` applies to, without touching the cart.
///
/// Conditions are staged `ITEM_CODE → QUANTITY_TOTAL → X_QUANTITY` whatever
/// their declaration order. An empty result means the rule does not fire.
pub fn working_set(cart: &[CartItem], rule: &PricingRule) -> Result<Vec<usize>, EvaluationError> {
    let mut lines: Vec<usize> = (0..cart.len()).collect();

    for condition in rule.conditions_of(ConditionKind::ItemCode) {
        let mut kept = Vec::with_capacity(lines.len());
        for line in lines {
            if condition.matches_code(cart[line].code())? {
                kept.push(line);
            }
        }
        debug!(rule = %rule.name(), %condition, remaining = kept.len(), "Filtered by item code");
        lines = kept;
    }

    if !lines.is_empty() {
        for condition in rule.conditions_of(ConditionKind::QuantityTotal) {
            if !condition.admits_quantity(lines.len())? {
                debug!(rule = %rule.name(), %condition, count = lines.len(), "Quantity gate closed");
                lines.clear();
                break;
            }
        }
    }

    if !lines.is_empty() {
        let group_size = rule
            .conditions_of(ConditionKind::XQuantity)
            .find_map(|condition| condition.group_size());
        if let Some(size) = group_size {
            let groups = lines.len() / size;
            debug!(rule = %rule.name(), size, groups, "Counted complete groups");
            if groups == 0 {
                lines.clear();
            } else {
                lines.truncate(groups);
            }
        }
    }

    Ok(lines)
}

// =============================================================================
// Unit Tests
// =============================================================================
