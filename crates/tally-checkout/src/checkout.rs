//! # Checkout
//!
//! Owns the cart of one sale and re-prices it on every scan.
//!
//! ## Thread Safety
//! The cart lives behind a `Mutex`. A scan holds the lock for the whole
//! append → price sequence, so concurrent scans never interleave and a reader
//! never sees a cart whose discounts belong to a previous pass.
//!
//! ## Scan Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Checkout::scan                                  │
//! │                                                                         │
//! │  lock cart ─────────────────────────────────────────────┐               │
//! │     │                                                   │               │
//! │     ├── currency differs?  → CurrencyMismatch           │ one critical  │
//! │     ├── cart full?         → CartFull                   │ section       │
//! │     ├── push item                                       │               │
//! │     └── engine::apply(cart, rules)                      │               │
//! │            └── rule failed? → RuleEvaluation            │               │
//! │                 (item stays, other rules applied)       │               │
//! │  unlock ────────────────────────────────────────────────┘               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Mutex, MutexGuard, PoisonError};

use tally_core::validation::{self, validate_cart_size};
use tally_core::{engine, CartItem, Money, PricingPass, RuleSet, MAX_CART_ITEMS};
use tracing::{debug, info};

use crate::error::{CheckoutError, CheckoutResult};

/// A running checkout: one currency, one rule set, one cart.
///
/// `Checkout` is `Send + Sync`; share it behind an `Arc`.
#[derive(Debug)]
pub struct Checkout {
    currency: String,
    rules: RuleSet,
    cart: Mutex<Vec<CartItem>>,
}

impl Checkout {
    /// Opens a checkout with an empty cart.
    ///
    /// ## Example
    /// ```rust
    /// use tally_checkout::Checkout;
    /// use tally_core::{CartItem, Money, RuleSet};
    ///
    /// let checkout = Checkout::new("EUR", RuleSet::default()).unwrap();
    /// checkout
    ///     .scan(CartItem::new("PANTS", "Summer Pants", Money::from_cents(750), "EUR").unwrap())
    ///     .unwrap();
    /// assert_eq!(checkout.total(), Money::from_cents(750));
    /// ```
    pub fn new(currency: impl Into<String>, rules: RuleSet) -> CheckoutResult<Self> {
        let currency = currency.into().trim().to_uppercase();
        validation::validate_currency(&currency)?;
        Ok(Checkout {
            currency,
            rules,
            cart: Mutex::new(Vec::new()),
        })
    }

    /// Adds an item and re-prices the whole cart.
    ///
    /// ## Errors
    /// - [`CheckoutError::CurrencyMismatch`] and [`CheckoutError::CartFull`]
    ///   reject the item; the cart is unchanged.
    /// - [`CheckoutError::Core`] with a rule evaluation failure: the item IS in
    ///   the cart and every rule that could be evaluated has been applied.
    pub fn scan(&self, item: CartItem) -> CheckoutResult<PricingPass> {
        self.with_cart_mut(|cart| {
            if item.currency() != self.currency {
                return Err(CheckoutError::CurrencyMismatch {
                    code: item.code().to_string(),
                    expected: self.currency.clone(),
                    found: item.currency().to_string(),
                });
            }
            validate_cart_size(cart.len())
                .map_err(|_| CheckoutError::CartFull { max: MAX_CART_ITEMS })?;

            info!(
                code = %item.code(),
                line_id = %item.line_id(),
                price = %item.price(),
                "Item scanned"
            );
            cart.push(item);

            let pass = engine::apply(cart, &self.rules)?;
            debug!(
                lines = cart.len(),
                fired = pass.fired.len(),
                "Cart re-priced"
            );
            Ok(pass)
        })
    }

    /// Snapshot of the cart in scan order.
    pub fn cart_items(&self) -> Vec<CartItem> {
        self.with_cart(|cart| cart.to_vec())
    }

    /// Sum of `price - discount` over the cart, recomputed on every call.
    pub fn total(&self) -> Money {
        self.with_cart(|cart| cart.iter().map(CartItem::net_price).sum())
    }

    /// Sum of all discounts currently applied.
    pub fn savings(&self) -> Money {
        self.with_cart(|cart| cart.iter().map(CartItem::discount).sum())
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.with_cart(|cart| cart.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Empties the cart to start a new sale.
    pub fn clear(&self) {
        self.with_cart_mut(|cart| {
            debug!(lines = cart.len(), "Clearing cart");
            cart.clear();
        });
    }

    fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&[CartItem]) -> R,
    {
        let cart = self.lock();
        f(&cart)
    }

    fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Vec<CartItem>) -> R,
    {
        let mut cart = self.lock();
        f(&mut cart)
    }

    // Prices are bounded by MAX_PRICE_CENTS, so pricing never panics halfway
    // through a mutation and a poisoned cart is still consistent.
    fn lock(&self) -> MutexGuard<'_, Vec<CartItem>> {
        self.cart.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tally_core::action::{Action, ActionKind};
    use tally_core::condition::{Condition, ConditionKind, Operator};
    use tally_core::{CoreError, EvaluationError, PricingRule, ValidationError, Value, MAX_PRICE_CENTS};

    use super::*;
    use crate::config::PricingConfig;

    const DEMO: &str = include_str!("../../../demos/pricing.toml");

    fn demo_checkout() -> (Checkout, crate::Catalog) {
        let config = PricingConfig::from_toml_str(DEMO).unwrap();
        (config.checkout().unwrap(), config.catalog().unwrap())
    }

    fn scan_all(codes: &[&str]) -> Checkout {
        let (checkout, catalog) = demo_checkout();
        for code in codes {
            checkout.scan(catalog.item(code).unwrap()).unwrap();
        }
        checkout
    }

    fn assert_discounts_within_price(checkout: &Checkout) {
        for item in checkout.cart_items() {
            assert!(!item.discount().is_negative());
            assert!(item.discount() <= item.price());
        }
    }

    #[test]
    fn test_single_items_pay_full_price() {
        let checkout = scan_all(&["VOUCHER", "TSHIRT", "PANTS"]);
        assert_eq!(checkout.total(), Money::from_cents(3250));
        assert!(checkout.savings().is_zero());
    }

    #[test]
    fn test_two_vouchers_one_free() {
        let checkout = scan_all(&["VOUCHER", "TSHIRT", "VOUCHER"]);
        assert_eq!(checkout.total(), Money::from_cents(2500));
        assert_eq!(checkout.savings(), Money::from_cents(500));
    }

    #[test]
    fn test_bulk_tshirts() {
        let checkout = scan_all(&["TSHIRT", "TSHIRT", "TSHIRT", "VOUCHER", "TSHIRT"]);
        assert_eq!(checkout.total(), Money::from_cents(8100));
    }

    #[test]
    fn test_mixed_cart() {
        let checkout = scan_all(&[
            "VOUCHER", "TSHIRT", "VOUCHER", "VOUCHER", "PANTS", "TSHIRT", "TSHIRT",
        ]);
        assert_eq!(checkout.total(), Money::from_cents(7450));
        assert_discounts_within_price(&checkout);
    }

    #[test]
    fn test_total_follows_every_scan() {
        let (checkout, catalog) = demo_checkout();
        let mut totals = Vec::new();
        for code in ["TSHIRT", "TSHIRT", "TSHIRT"] {
            checkout.scan(catalog.item(code).unwrap()).unwrap();
            totals.push(checkout.total().cents());
        }
        assert_eq!(totals, vec![2000, 4000, 5700]);
    }

    #[test]
    fn test_cart_items_keep_scan_order() {
        let checkout = scan_all(&["PANTS", "VOUCHER", "TSHIRT"]);
        let codes: Vec<String> = checkout
            .cart_items()
            .iter()
            .map(|i| i.code().to_string())
            .collect();
        assert_eq!(codes, vec!["PANTS", "VOUCHER", "TSHIRT"]);
    }

    #[test]
    fn test_currency_mismatch_is_rejected() {
        let checkout = Checkout::new("eur", RuleSet::default()).unwrap();
        assert_eq!(checkout.currency(), "EUR");

        let dollars = CartItem::new("PANTS", "Summer Pants", Money::from_cents(750), "USD").unwrap();
        let err = checkout.scan(dollars).unwrap_err();
        assert!(matches!(err, CheckoutError::CurrencyMismatch { .. }));
        assert!(checkout.is_empty());
    }

    #[test]
    fn test_invalid_checkout_currency() {
        assert!(Checkout::new("EURO", RuleSet::default()).is_err());
    }

    #[test]
    fn test_cart_capacity() {
        let checkout = Checkout::new("EUR", RuleSet::default()).unwrap();
        let pants = CartItem::new("PANTS", "Summer Pants", Money::from_cents(750), "EUR").unwrap();
        for _ in 0..MAX_CART_ITEMS {
            checkout.scan(pants.clone()).unwrap();
        }
        let err = checkout.scan(pants).unwrap_err();
        assert!(matches!(err, CheckoutError::CartFull { max } if max == MAX_CART_ITEMS));
        assert_eq!(checkout.len(), MAX_CART_ITEMS);
    }

    #[test]
    fn test_failed_rule_keeps_item_and_other_rules() {
        let (demo, catalog) = demo_checkout();
        let mut rules = demo.rules().to_vec();
        rules.insert(
            0,
            PricingRule::new(
                "broken",
                vec![Condition::new(ConditionKind::ItemCode, Operator::Gte, "A".into()).unwrap()],
                vec![Action::new(ActionKind::DiscountPercent, Value::Integer(100)).unwrap()],
            )
            .unwrap(),
        );
        let checkout = Checkout::new("EUR", RuleSet::new(rules)).unwrap();

        for scanned in 1..=2 {
            let err = checkout.scan(catalog.item("VOUCHER").unwrap()).unwrap_err();
            assert!(matches!(err, CheckoutError::Core(CoreError::RuleEvaluation { .. })));
            assert_eq!(err.rule_failures().len(), 1);
            assert_eq!(err.rule_failures()[0].rule, "broken");
            assert!(matches!(
                err.rule_failures()[0].source,
                EvaluationError::UnsupportedOperator { .. }
            ));
            assert_eq!(checkout.len(), scanned);
        }
        assert_eq!(checkout.total(), Money::from_cents(500));
    }

    #[test]
    fn test_price_above_limit_never_reaches_the_cart() {
        let config = PricingConfig::from_toml_str(
            r#"
            [[products]]
            code = "GOLD"
            name = "Gold Bar"
            price = 5.0e14
            "#,
        );
        assert!(matches!(
            config,
            Err(CheckoutError::Core(CoreError::Validation(ValidationError::OutOfRange { .. })))
        ));

        assert!(CartItem::new("GOLD", "Gold Bar", Money::from_cents(MAX_PRICE_CENTS + 1), "EUR").is_err());
    }

    #[test]
    fn test_clear_starts_a_new_sale() {
        let checkout = scan_all(&["VOUCHER", "VOUCHER"]);
        checkout.clear();
        assert!(checkout.is_empty());
        assert!(checkout.total().is_zero());
    }

    #[test]
    fn test_checkout_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Checkout>();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_scans_never_interleave() {
        let (checkout, catalog) = demo_checkout();
        let checkout = Arc::new(checkout);
        let catalog = Arc::new(catalog);

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let checkout = Arc::clone(&checkout);
                let catalog = Arc::clone(&catalog);
                tokio::spawn(async move {
                    let item = catalog.item("VOUCHER").unwrap();
                    checkout.scan(item).unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(checkout.len(), 16);
        let free = checkout
            .cart_items()
            .iter()
            .filter(|i| i.discount() == i.price())
            .count();
        assert_eq!(free, 8);
        assert_eq!(checkout.total(), Money::from_cents(4000));
    }
}
