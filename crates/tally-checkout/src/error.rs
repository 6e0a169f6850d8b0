//! # Checkout Error Types
//!
//! Error types for scanning and configuration loading.
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Checkout Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐  │
//! │  │  Configuration  │  │     Scanning    │  │     Pricing (core)      │  │
//! │  │                 │  │                 │  │                         │  │
//! │  │  ConfigLoad     │  │  Currency       │  │  Validation             │  │
//! │  │  InvalidConfig  │  │  CartFull       │  │  Configuration          │  │
//! │  │                 │  │  UnknownProduct │  │  RuleEvaluation         │  │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tally_core::{ConfigurationError, CoreError, RuleFailure, ValidationError};
use thiserror::Error;

/// Result type alias for checkout operations.
pub type CheckoutResult<T> = Result<T, CheckoutError>;

/// Everything that can go wrong between a config file and a priced cart.
#[derive(Debug, Error)]
pub enum CheckoutError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Failed to read or parse the config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Config parsed but describes an unusable store.
    #[error("Invalid pricing configuration: {0}")]
    InvalidConfig(String),

    // =========================================================================
    // Scanning Errors
    // =========================================================================
    /// Item priced in another currency than the checkout.
    #[error("Item {code} is priced in {found}, this checkout accepts {expected}")]
    CurrencyMismatch {
        code: String,
        expected: String,
        found: String,
    },

    /// The cart already holds the maximum number of lines.
    #[error("Cart is full ({max} lines)")]
    CartFull { max: usize },

    /// No product with this code in the catalog.
    #[error("Unknown product code: {0}")]
    UnknownProduct(String),

    // =========================================================================
    // Pricing Errors
    // =========================================================================
    /// Error raised by the pricing core.
    #[error(transparent)]
    Core(#[from] CoreError),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<ValidationError> for CheckoutError {
    fn from(err: ValidationError) -> Self {
        CheckoutError::Core(CoreError::Validation(err))
    }
}

impl From<ConfigurationError> for CheckoutError {
    fn from(err: ConfigurationError) -> Self {
        CheckoutError::Core(CoreError::Configuration(err))
    }
}

impl From<std::io::Error> for CheckoutError {
    fn from(err: std::io::Error) -> Self {
        CheckoutError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for CheckoutError {
    fn from(err: toml::de::Error) -> Self {
        CheckoutError::ConfigLoadFailed(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl CheckoutError {
    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            CheckoutError::ConfigLoadFailed(_)
                | CheckoutError::InvalidConfig(_)
                | CheckoutError::Core(CoreError::Configuration(_))
        )
    }

    /// Rules that failed during the pricing pass behind this error.
    pub fn rule_failures(&self) -> &[RuleFailure] {
        match self {
            CheckoutError::Core(core) => core.rule_failures(),
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_errors() {
        assert!(CheckoutError::ConfigLoadFailed("missing".into()).is_config_error());
        assert!(CheckoutError::from(ConfigurationError::InvalidGroupSize {
            value: tally_core::Value::Integer(0)
        })
        .is_config_error());

        assert!(!CheckoutError::CartFull { max: 100 }.is_config_error());
        assert!(!CheckoutError::UnknownProduct("HAT".into()).is_config_error());
    }

    #[test]
    fn test_error_display() {
        let err = CheckoutError::CurrencyMismatch {
            code: "VOUCHER".into(),
            expected: "EUR".into(),
            found: "USD".into(),
        };
        assert_eq!(
            err.to_string(),
            "Item VOUCHER is priced in USD, this checkout accepts EUR"
        );
    }

    #[test]
    fn test_validation_errors_pass_through_core() {
        let err = CheckoutError::from(ValidationError::Required {
            field: "code".into(),
        });
        assert!(matches!(err, CheckoutError::Core(CoreError::Validation(_))));
        assert!(err.rule_failures().is_empty());
    }
}
