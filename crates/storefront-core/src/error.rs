//! # Error Types
//!
//! Domain-specific error types for storefront-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  CoreError        - Fatal: bad pricing input, malformed order JSON,    │
//! │                     illegal status transition, overflow                │
//! │  ValidationError  - One field failed a format/range check              │
//! │                                                                         │
//! │  Violation        - NOT an error type. Business-rule failures found by │
//! │                     the order validator are returned as plain data.    │
//! │                     See `order_validation::Violation`.                 │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → caller (CLI / API layer)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (SKU, field path, order ID)
//! 3. Errors are enum variants, never String

use thiserror::Error;

use crate::order_validation::Violation;
use crate::types::{OrderStatus, TaxRate};

// =============================================================================
// Core Error
// =============================================================================

/// Core errors.
///
/// Every variant is fatal for the call that produced it: a pricing
/// breakdown is not produced, a transition is not applied.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An order line cannot be priced.
    ///
    /// ## When This Occurs
    /// - `unitCost` is negative
    /// - `quantity` is zero or negative
    /// - The line discount value is negative
    #[error("Item {index} ({sku}) cannot be priced: {source}")]
    InvalidItem {
        index: usize,
        sku: String,
        #[source]
        source: ValidationError,
    },

    /// An intermediate amount no longer fits in an `i64` of minor units.
    #[error("Arithmetic overflow while computing {stage}")]
    Overflow { stage: &'static str },

    /// The order document does not have the expected shape.
    ///
    /// Only raised for structurally broken input (missing `items`, wrong
    /// JSON types). Failed business rules are reported as violations.
    #[error("Malformed order: {reason}")]
    MalformedOrder { reason: String },

    /// The order cannot move between these two statuses.
    #[error("Order {order_id} cannot move from {from} to {to}")]
    InvalidStatusTransition {
        order_id: String,
        from: OrderStatus,
        to: OrderStatus,
    },

    /// The order failed the full rule set required for the transition.
    #[error("Order {order_id} has {} validation violation(s)", .violations.len())]
    ValidationFailed {
        order_id: String,
        violations: Vec<Violation>,
    },

    /// A configuration value could not be used.
    #[error("Invalid configuration for {key}: {reason}")]
    InvalidConfig { key: String, reason: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::MalformedOrder {
            reason: err.to_string(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Used by the field-level validators in [`crate::validation`]. The order
/// validator turns these into [`Violation`]s instead of failing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must be zero or greater.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// A percentage exceeds its ceiling.
    #[error("{field} must not exceed {max}")]
    PercentageTooHigh { field: String, max: TaxRate },

    /// Invalid format (e.g., bad pincode, unparsable amount).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Quantity requested is more than the catalog has on hand.
    #[error("{field} {requested} exceeds available stock {available}")]
    InsufficientStock {
        field: String,
        available: i64,
        requested: i64,
    },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
