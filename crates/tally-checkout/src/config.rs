//! # Pricing Configuration
//!
//! Store settings, product catalog and pricing rules, loaded from TOML.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                            │
//! │     TALLY_CURRENCY=EUR                                                  │
//! │     TALLY_STORE_NAME="Demo Store"                                       │
//! │                                                                         │
//! │  2. TOML Config File                                                    │
//! │     --config PATH, or                                                   │
//! │     ~/.config/tally/pricing.toml (Linux)                                │
//! │     ~/Library/Application Support/com.tally.tally/pricing.toml          │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                    │
//! │     "Tally Store", EUR, no products, no rules                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [store]
//! name = "Demo Store"
//! currency = "EUR"
//!
//! [[products]]
//! code = "VOUCHER"
//! name = "Gift Card"
//! price = 5.00
//!
//! [[rules]]
//! name = "voucher-2-for-1"
//! conditions = [
//!   { kind = "item_code", operator = "eq", value = "VOUCHER" },
//!   { kind = "x_quantity", value = 2 },
//! ]
//! actions = [{ kind = "discount_percent", value = 100 }]
//! ```

use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tally_core::validation::{validate_code, validate_currency, validate_item_name, validate_price};
use tally_core::{CartItem, Money, RuleSet, RuleSpec, ValidationError};
use tracing::{debug, info};

use crate::checkout::Checkout;
use crate::error::{CheckoutError, CheckoutResult};

// =============================================================================
// Store Configuration
// =============================================================================

/// The store this register prices for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Human-readable store name, printed on receipts.
    #[serde(default = "default_store_name")]
    pub name: String,

    /// Currency every product is priced in.
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_store_name() -> String {
    "Tally Store".to_string()
}

fn default_currency() -> String {
    "EUR".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            name: default_store_name(),
            currency: default_currency(),
        }
    }
}

// =============================================================================
// Products
// =============================================================================

/// A product as written in configuration. `price` is in major units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSpec {
    pub code: String,
    pub name: String,
    pub price: f64,
}

/// A validated catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub code: String,
    pub name: String,
    pub price: Money,
}

impl TryFrom<&ProductSpec> for Product {
    type Error = ValidationError;

    fn try_from(spec: &ProductSpec) -> Result<Self, Self::Error> {
        let code = spec.code.trim().to_string();
        let name = spec.name.trim().to_string();
        validate_code(&code)?;
        validate_item_name(&name)?;

        let price = Money::from_decimal(spec.price).ok_or(ValidationError::InvalidFormat {
            field: "price".to_string(),
            reason: "must be a finite amount".to_string(),
        })?;
        validate_price(price)?;

        Ok(Product { code, name, price })
    }
}

/// Products by code, all priced in one currency.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    currency: String,
    products: BTreeMap<String, Product>,
}

impl Catalog {
    /// Builds a catalog, rejecting invalid entries and duplicate codes.
    pub fn new(currency: impl Into<String>, specs: &[ProductSpec]) -> CheckoutResult<Self> {
        let currency = currency.into().trim().to_uppercase();
        validate_currency(&currency)?;

        let mut products = BTreeMap::new();
        for spec in specs {
            let product = Product::try_from(spec)?;
            if products.contains_key(&product.code) {
                return Err(ValidationError::Duplicate {
                    field: "product code".to_string(),
                    value: product.code,
                }
                .into());
            }
            products.insert(product.code.clone(), product);
        }

        Ok(Catalog {
            currency,
            products,
        })
    }

    pub fn get(&self, code: &str) -> Option<&Product> {
        self.products.get(code.trim())
    }

    /// Mints a fresh cart line for `code`.
    ///
    /// ## Errors
    /// [`CheckoutError::UnknownProduct`] if the code is not in the catalog.
    pub fn item(&self, code: &str) -> CheckoutResult<CartItem> {
        let product = self
            .get(code)
            .ok_or_else(|| CheckoutError::UnknownProduct(code.trim().to_string()))?;
        Ok(CartItem::new(
            product.code.as_str(),
            product.name.as_str(),
            product.price,
            self.currency.as_str(),
        )?)
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Products in code order.
    pub fn products(&self) -> impl Iterator<Item = &Product> {
        self.products.values()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

// =============================================================================
// Main Pricing Configuration
// =============================================================================

/// Complete pricing configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub products: Vec<ProductSpec>,

    /// Rules in evaluation order.
    #[serde(default)]
    pub rules: Vec<RuleSpec>,
}

impl PricingConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file: `config_path`, else the platform default path
    /// 3. Environment variables
    ///
    /// An explicit `config_path` must exist; a missing default file means
    /// defaults.
    pub fn load(config_path: Option<PathBuf>) -> CheckoutResult<Self> {
        let mut config: PricingConfig = match config_path {
            Some(path) => {
                info!(?path, "Loading pricing config from file");
                toml::from_str(&std::fs::read_to_string(&path)?)?
            }
            None => match Self::default_config_path() {
                Some(path) if path.exists() => {
                    info!(?path, "Loading pricing config from file");
                    toml::from_str(&std::fs::read_to_string(&path)?)?
                }
                path => {
                    debug!(?path, "Config file not found, using defaults");
                    Self::default()
                }
            },
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        info!(
            store = %config.store.name,
            currency = %config.store.currency,
            products = config.products.len(),
            rules = config.rules.len(),
            "Pricing config loaded"
        );
        Ok(config)
    }

    /// Parses and validates configuration text, without environment overrides.
    pub fn from_toml_str(contents: &str) -> CheckoutResult<Self> {
        let config: PricingConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration: catalog entries, currency and every rule.
    pub fn validate(&self) -> CheckoutResult<()> {
        if self.store.name.trim().is_empty() {
            return Err(CheckoutError::InvalidConfig(
                "store name must not be empty".into(),
            ));
        }

        self.catalog()?;
        self.rule_set()?;

        let mut names = HashSet::new();
        if let Some(rule) = self.rules.iter().find(|r| !names.insert(r.name.trim())) {
            return Err(CheckoutError::InvalidConfig(format!(
                "rule name '{}' is used more than once",
                rule.name.trim()
            )));
        }

        Ok(())
    }

    /// Builds the product catalog.
    pub fn catalog(&self) -> CheckoutResult<Catalog> {
        Catalog::new(self.store.currency.as_str(), &self.products)
    }

    /// Builds the rule set, failing on the first invalid rule.
    pub fn rule_set(&self) -> CheckoutResult<RuleSet> {
        Ok(RuleSet::from_specs(self.rules.clone())?)
    }

    /// Opens an empty checkout for this store.
    pub fn checkout(&self) -> CheckoutResult<Checkout> {
        Checkout::new(self.store.currency.as_str(), self.rule_set()?)
    }

    /// Applies overrides looked up by variable name.
    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(currency) = var("TALLY_CURRENCY") {
            debug!(currency = %currency, "Overriding currency from environment");
            self.store.currency = currency.trim().to_uppercase();
        }

        if let Some(name) = var("TALLY_STORE_NAME") {
            self.store.name = name;
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "tally", "tally")
            .map(|dirs| dirs.config_dir().join("pricing.toml"))
    }
}
