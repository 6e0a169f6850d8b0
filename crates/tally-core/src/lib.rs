//! # tally-core: Pricing Rules for Tally Checkout
//!
//! This crate holds the pricing model and the rule engine as pure functions
//! with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tally Architecture                               │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐    │
//! │  │                    tally-register (CLI)                         │    │
//! │  │          parse args ──► scan codes ──► print receipt            │    │
//! │  └─────────────────────────────┬───────────────────────────────────┘    │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐    │
//! │  │                    tally-checkout                               │    │
//! │  │       Checkout (locked cart), Catalog, pricing.toml loader      │    │
//! │  └─────────────────────────────┬───────────────────────────────────┘    │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐    │
//! │  │               ★ tally-core (THIS CRATE) ★                       │    │
//! │  │                                                                 │    │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐    │    │
//! │  │   │   value   │  │ condition │  │  action   │  │  engine   │    │    │
//! │  │   │   Value   │  │ Condition │  │  Action   │  │  apply    │    │    │
//! │  │   │  compare  │  │ Operator  │  │ clamping  │  │ pipeline  │    │    │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘    │    │
//! │  │                                                                 │    │
//! │  │   NO I/O • NO FILES • NO CLOCK READS IN THE ENGINE              │    │
//! │  └─────────────────────────────────────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Cart items and discount rates
//! - [`money`] - Money type with integer arithmetic
//! - [`value`] - Typed comparison operands
//! - [`condition`] - Pricing conditions and operators
//! - [`action`] - Pricing actions
//! - [`rule`] - Pricing rules and rule sets
//! - [`engine`] - The pricing pass
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Design Principles
//!
//! 1. **Integer Money**: All monetary values are in cents (i64)
//! 2. **Validated Once**: Rules are checked when built, not when applied
//! 3. **Explicit Errors**: A failed comparison is an error, never a silent `false`
//!
//! ## Example Usage
//!
//! ```rust
//! use tally_core::action::{Action, ActionKind};
//! use tally_core::condition::{Condition, ConditionKind, Operator};
//! use tally_core::{engine, CartItem, Money, PricingRule, Value};
//!
//! let bulk = PricingRule::new(
//!     "tshirt-bulk",
//!     vec![
//!         Condition::new(ConditionKind::ItemCode, Operator::Eq, "TSHIRT".into()).unwrap(),
//!         Condition::new(ConditionKind::QuantityTotal, Operator::Gte, Value::Integer(3)).unwrap(),
//!     ],
//!     vec![Action::new(ActionKind::FixedPrice, Value::Decimal(19.0)).unwrap()],
//! )
//! .unwrap();
//!
//! let mut cart: Vec<CartItem> = (0..3)
//!     .map(|_| CartItem::new("TSHIRT", "Summer T-Shirt", Money::from_cents(2000), "EUR").unwrap())
//!     .collect();
//!
//! engine::apply(&mut cart, &[bulk]).unwrap();
//! let total: Money = cart.iter().map(CartItem::net_price).sum();
//! assert_eq!(total, Money::from_cents(5700));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod action;
pub mod condition;
pub mod engine;
pub mod error;
pub mod money;
pub mod rule;
pub mod types;
pub mod validation;
pub mod value;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use tally_core::Money` instead of
// `use tally_core::money::Money`

pub use engine::{FiredRule, PricingPass};
pub use error::{
    ConfigurationError, CoreError, CoreResult, EvaluationError, RuleFailure, ValidationError,
};
pub use money::Money;
pub use rule::{PricingRule, RuleSet, RuleSpec};
pub use types::*;
pub use value::Value;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum lines allowed in a single cart
///
/// ## Business Reason
/// Every scan re-runs the whole rule set over the cart, so the cart is kept
/// to a reasonable transaction size.
pub const MAX_CART_ITEMS: usize = 100;

/// Largest accepted unit price, in cents (1,000,000,000.00)
///
/// Keeps every discount and cart total far inside `i64`: a discount never
/// exceeds twice a price before clamping, and a full cart sums at most
/// `MAX_CART_ITEMS` prices.
pub const MAX_PRICE_CENTS: i64 = 100_000_000_000;
