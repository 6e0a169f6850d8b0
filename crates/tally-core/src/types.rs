//! # Domain Types
//!
//! Core domain types shared by the rule engine and the checkout.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────────┐              ┌─────────────────┐               │
//! │  │      CartItem       │              │  DiscountRate   │               │
//! │  │  ─────────────────  │              │  ─────────────  │               │
//! │  │  line_id (UUID)     │              │  bps (u32)      │               │
//! │  │  code (business)    │              │  1500 = 15%     │               │
//! │  │  name               │              └─────────────────┘               │
//! │  │  price    (Money)   │                                                │
//! │  │  currency           │                                                │
//! │  │  discount (Money)   │  ◄── only the rule engine writes this          │
//! │  │  scanned_at         │                                                │
//! │  └─────────────────────┘                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity
//! Every cart line has:
//! - `line_id`: UUID v4, unique per scan (two scanned vouchers are two lines)
//! - `code`: the product code the pricing rules match against

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::money::Money;
use crate::validation::{self, ValidationResult};

// =============================================================================
// Discount Rate
// =============================================================================

/// Discount rate represented in basis points (bps).
///
/// 1 basis point = 0.01%, so 10000 bps = 100% (item is free).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DiscountRate(u32);

impl DiscountRate {
    /// The whole price.
    pub const FULL: DiscountRate = DiscountRate(10000);

    /// Creates a discount rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        DiscountRate(bps)
    }

    /// Creates a rate from a percentage, rounding to the nearest basis point.
    ///
    /// Returns `None` unless `0 <= pct <= 100`.
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::types::DiscountRate;
    ///
    /// assert_eq!(DiscountRate::from_percentage(12.5).unwrap().bps(), 1250);
    /// assert!(DiscountRate::from_percentage(120.0).is_none());
    /// ```
    pub fn from_percentage(pct: f64) -> Option<Self> {
        if !pct.is_finite() || !(0.0..=100.0).contains(&pct) {
            return None;
        }
        Some(DiscountRate((pct * 100.0).round() as u32))
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero rate.
    #[inline]
    pub const fn zero() -> Self {
        DiscountRate(0)
    }
}

impl Default for DiscountRate {
    fn default() -> Self {
        DiscountRate::zero()
    }
}

// =============================================================================
// Cart Item
// =============================================================================

/// One scanned line in the cart.
///
/// ## Invariants
/// - `price >= 0`
/// - `0 <= discount <= price`, enforced by [`CartItem::set_discount`] which
///   clamps at the point of mutation
///
/// Fields are private so the invariant cannot be broken from outside; the
/// rule engine is the only writer of `discount`.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    #[ts(as = "String")]
    line_id: Uuid,
    code: String,
    name: String,
    price: Money,
    currency: String,
    discount: Money,
    #[ts(as = "String")]
    scanned_at: DateTime<Utc>,
}

impl CartItem {
    /// Creates a new, undiscounted cart line.
    ///
    /// ## Validation
    /// - `code`: see [`validation::validate_code`]
    /// - `name`: see [`validation::validate_item_name`]
    /// - `price`: must not be negative
    /// - `currency`: see [`validation::validate_currency`]
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::{CartItem, Money};
    ///
    /// let item = CartItem::new("VOUCHER", "Gift Card", Money::from_cents(500), "EUR").unwrap();
    /// assert_eq!(item.code(), "VOUCHER");
    /// assert!(item.discount().is_zero());
    ///
    /// assert!(CartItem::new("", "Gift Card", Money::from_cents(500), "EUR").is_err());
    /// ```
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        price: Money,
        currency: impl Into<String>,
    ) -> ValidationResult<Self> {
        let code = code.into().trim().to_string();
        let name = name.into().trim().to_string();
        let currency = currency.into().trim().to_uppercase();

        validation::validate_code(&code)?;
        validation::validate_item_name(&name)?;
        validation::validate_price(price)?;
        validation::validate_currency(&currency)?;

        Ok(CartItem {
            line_id: Uuid::new_v4(),
            code,
            name,
            price,
            currency,
            discount: Money::zero(),
            scanned_at: Utc::now(),
        })
    }

    /// Unique id of this line.
    #[inline]
    pub fn line_id(&self) -> Uuid {
        self.line_id
    }

    /// Product code the pricing rules match against.
    #[inline]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Display name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Undiscounted price.
    #[inline]
    pub fn price(&self) -> Money {
        self.price
    }

    /// ISO 4217 currency code, upper case.
    #[inline]
    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Discount currently applied to this line.
    #[inline]
    pub fn discount(&self) -> Money {
        self.discount
    }

    /// When the line was scanned.
    #[inline]
    pub fn scanned_at(&self) -> DateTime<Utc> {
        self.scanned_at
    }

    /// Price after discount. Never negative.
    #[inline]
    pub fn net_price(&self) -> Money {
        self.price - self.discount
    }

    /// Sets the discount, clamped to `[0, price]`.
    pub(crate) fn set_discount(&mut self, discount: Money) {
        self.discount = discount.clamp(Money::zero(), self.price);
    }

    /// Drops any discount; the start of every pricing pass.
    pub(crate) fn reset_discount(&mut self) {
        self.discount = Money::zero();
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn voucher() -> CartItem {
        CartItem::new("VOUCHER", "Gift Card", Money::from_cents(500), "eur").unwrap()
    }

    #[test]
    fn test_discount_rate_from_percentage() {
        assert_eq!(DiscountRate::from_percentage(100.0), Some(DiscountRate::FULL));
        assert_eq!(DiscountRate::from_percentage(8.25).unwrap().bps(), 825);
        assert!(DiscountRate::from_percentage(-1.0).is_none());
        assert!(DiscountRate::from_percentage(f64::NAN).is_none());
    }

    #[test]
    fn test_discount_rate_percentage() {
        let rate = DiscountRate::from_bps(1250);
        assert!((rate.percentage() - 12.5).abs() < 0.001);
        assert_eq!(DiscountRate::default(), DiscountRate::zero());
    }

    #[test]
    fn test_cart_item_normalizes_input() {
        let item = CartItem::new(" TSHIRT ", "Summer T-Shirt", Money::from_cents(2000), "eur").unwrap();
        assert_eq!(item.code(), "TSHIRT");
        assert_eq!(item.currency(), "EUR");
        assert_eq!(item.net_price(), Money::from_cents(2000));
    }

    #[test]
    fn test_cart_item_rejects_negative_price() {
        assert!(CartItem::new("PANTS", "Summer Pants", Money::from_cents(-1), "EUR").is_err());
    }

    #[test]
    fn test_duplicate_codes_are_distinct_lines() {
        assert_ne!(voucher().line_id(), voucher().line_id());
    }

    #[test]
    fn test_set_discount_clamps_to_price() {
        let mut item = voucher();
        item.set_discount(Money::from_cents(900));
        assert_eq!(item.discount(), item.price());
        assert!(item.net_price().is_zero());
    }

    #[test]
    fn test_set_discount_clamps_negative_to_zero() {
        let mut item = voucher();
        item.set_discount(Money::from_cents(-100));
        assert!(item.discount().is_zero());
    }

    #[test]
    fn test_reset_discount() {
        let mut item = voucher();
        item.set_discount(Money::from_cents(200));
        item.reset_discount();
        assert!(item.discount().is_zero());
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(voucher()).unwrap();
        assert_eq!(json["code"], "VOUCHER");
        assert_eq!(json["price"], 500);
        assert!(json.get("lineId").is_some());
        assert!(json.get("scannedAt").is_some());
    }
}
