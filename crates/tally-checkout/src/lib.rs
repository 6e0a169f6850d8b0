//! # tally-checkout: Checkout and Pricing Configuration
//!
//! The stateful side of Tally: a checkout that owns the cart of one sale and
//! re-prices it on every scan, plus the TOML configuration that describes the
//! store, its products and its pricing rules.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        tally-checkout                                   │
//! │                                                                         │
//! │   pricing.toml ──► PricingConfig ──┬──► Catalog ──► CartItem            │
//! │   TALLY_* env  ──►                 │                   │                │
//! │                                    └──► RuleSet        │ scan           │
//! │                                            │           ▼                │
//! │                                            └──────► Checkout            │
//! │                                                        │                │
//! │                                          tally_core::engine::apply      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example Usage
//!
//! ```rust
//! use tally_checkout::PricingConfig;
//!
//! let config = PricingConfig::from_toml_str(
//!     r#"
//!     [[products]]
//!     code = "TSHIRT"
//!     name = "Summer T-Shirt"
//!     price = 20.00
//!
//!     [[rules]]
//!     name = "tshirt-bulk"
//!     conditions = [
//!       { kind = "item_code", value = "TSHIRT" },
//!       { kind = "quantity_total", operator = "gte", value = 3 },
//!     ]
//!     actions = [{ kind = "fixed_price", value = 19.00 }]
//!     "#,
//! )
//! .unwrap();
//!
//! let catalog = config.catalog().unwrap();
//! let checkout = config.checkout().unwrap();
//! for _ in 0..3 {
//!     checkout.scan(catalog.item("TSHIRT").unwrap()).unwrap();
//! }
//! assert_eq!(checkout.total().to_string(), "57.00");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod checkout;
pub mod config;
pub mod error;

// =============================================================================
// Re-exports
// =============================================================================

pub use checkout::Checkout;
pub use config::{Catalog, PricingConfig, Product, ProductSpec, StoreConfig};
pub use error::{CheckoutError, CheckoutResult};
