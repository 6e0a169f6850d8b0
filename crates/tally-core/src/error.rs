//! # Error Types
//!
//! Domain-specific error types for tally-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tally-core errors (this file)                                          │
//! │  ├── ValidationError     - Bad input fields (code, price, currency)     │
//! │  ├── ConfigurationError  - Malformed rule, raised at BUILD time         │
//! │  ├── EvaluationError     - Unsupported comparison, raised at APPLY time │
//! │  ├── RuleFailure         - EvaluationError + the rule it aborted        │
//! │  └── CoreError           - Wraps all of the above                       │
//! │                                                                         │
//! │  tally-checkout errors (separate crate)                                 │
//! │  └── CheckoutError       - Currency, capacity, config files             │
//! │                                                                         │
//! │  Flow: ConfigurationError never reaches the engine.                     │
//! │        EvaluationError aborts ONE rule; the other rules still run.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (rule name, operand, operator)
//! 3. Errors are enum variants, never String
//! 4. Nothing is swallowed into a silent `false`

use thiserror::Error;

use crate::action::ActionKind;
use crate::condition::Operator;
use crate::value::Value;

// =============================================================================
// Configuration Error
// =============================================================================

/// A pricing rule could not be built.
///
/// Raised by the validating constructors in [`condition`](crate::condition),
/// [`action`](crate::action) and [`rule`](crate::rule). A value of this type
/// means no half-built rule exists.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    /// A required part of a condition or action was not given.
    ///
    /// ## When This Occurs
    /// - Condition spec without `kind` or `value`
    /// - Action spec without `kind` or `value`
    #[error("missing {field} while building the pricing rule {subject}")]
    Missing {
        subject: &'static str,
        field: &'static str,
    },

    /// The action operand cannot be interpreted for its kind.
    #[error("{kind} action needs a numeric operand, got {value}")]
    IncompatibleOperand { kind: ActionKind, value: Value },

    /// The action operand is numeric but unusable.
    ///
    /// ## When This Occurs
    /// - Negative fixed price
    /// - Percentage outside `0..=100`
    /// - NaN or infinite decimals
    #[error("{kind} operand {value} is out of range: {reason}")]
    OperandOutOfRange {
        kind: ActionKind,
        value: Value,
        reason: &'static str,
    },

    /// The group size of an x-quantity condition is not a positive integer.
    #[error("x_quantity group size must be a positive integer, got {value}")]
    InvalidGroupSize { value: Value },

    /// A rule declared more than one x-quantity condition.
    #[error("rule '{rule}' declares more than one x_quantity condition")]
    DuplicateGroupCondition { rule: String },

    /// Rule name or other field failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Evaluation Error
// =============================================================================

/// A condition could not be evaluated against a cart fact.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvaluationError {
    /// Fact and operand are different [`Value`] variants.
    ///
    /// ## Example
    /// ```text
    /// QUANTITY_TOTAL fact: Integer(3)
    /// Condition operand:   Text("3")
    ///      │
    ///      ▼
    /// TypeMismatch: cannot compare integer 3 with text 3
    /// ```
    #[error("cannot compare {} {fact} with {} {operand}", .fact.type_name(), .operand.type_name())]
    TypeMismatch { fact: Value, operand: Value },

    /// Ordering operator applied to text.
    #[error("operator {operator} is not supported for {type_name} values")]
    UnsupportedOperator {
        operator: Operator,
        type_name: &'static str,
    },

    /// Decimal comparison involving NaN.
    #[error("decimal values {left} and {right} have no ordering")]
    Unordered { left: f64, right: f64 },
}

/// An [`EvaluationError`] together with the rule it aborted.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("pricing rule #{index} '{rule}' failed: {source}")]
pub struct RuleFailure {
    /// Position of the rule in the rule set.
    pub index: usize,
    /// Rule name.
    pub rule: String,
    #[source]
    pub source: EvaluationError,
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when an item or catalog entry doesn't meet requirements.
/// Used for early validation before the engine runs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g., currency that is not three letters).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g., duplicate product code).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Core Error
// =============================================================================

/// Core pricing errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// A rule definition was rejected.
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// One or more rules failed during a pricing pass.
    ///
    /// The pass still completed: every rule not listed here was applied.
    #[error("{} pricing rule(s) failed evaluation: {}", .failures.len(), summarize(.failures))]
    RuleEvaluation { failures: Vec<RuleFailure> },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Rule failures of a pricing pass, empty for other variants.
    pub fn rule_failures(&self) -> &[RuleFailure] {
        match self {
            CoreError::RuleEvaluation { failures } => failures,
            _ => &[],
        }
    }
}

fn summarize(failures: &[RuleFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
