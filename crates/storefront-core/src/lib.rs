//! # storefront-core: Order Pricing and Validation
//!
//! This crate prices storefront orders and checks them against business
//! rules. Every function is pure: no I/O, no clock, no hidden state.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Storefront Order Flow                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Dashboard Order Form                            │   │
//! │  │    Items ──► Discounts ──► Tax & Charges ──► Payment ──► Save   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ OrderDraft / Order JSON                │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ storefront-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌────────────┐  ┌───────────┐  │   │
//! │  │   │  pricing  │  │   order   │  │   order_   │  │  record   │  │   │
//! │  │   │ breakdown │  │ lifecycle │  │ validation │  │ form or   │  │   │
//! │  │   │  stages   │  │ status    │  │ rule table │  │ legacy    │  │   │
//! │  │   └───────────┘  └───────────┘  └────────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌────────────┐  ┌───────────┐  │   │
//! │  │   │   money   │  │   types   │  │ validation │  │  config   │  │   │
//! │  │   └───────────┘  └───────────┘  └────────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │        price-order (CLI): file in, breakdown + violations out   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`pricing`] - Line, discount, tax, charge and tender stages
//! - [`order_validation`] - Declarative rule table, full and minimal modes
//! - [`order`] - Draft pricing and status transitions
//! - [`record`] - Current and legacy order shapes
//! - [`types`] - Domain types (OrderItem, Order, PricingBreakdown, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`validation`] - Field-level checks
//! - [`config`] - Engine settings from TOML and the environment
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Same input = same breakdown, every time
//! 2. **Integer Money**: Amounts are minor units (i64), rates are basis points
//! 3. **Violations Are Data**: Rule failures come back as a list, never a panic
//! 4. **Explicit Errors**: Impossible inputs are typed errors
//!
//! ## Example Usage
//!
//! ```rust
//! use storefront_core::{compute_pricing, Money, OrderItem, PricingInput, TaxConfig, TaxRate};
//!
//! let input = PricingInput {
//!     items: vec![OrderItem {
//!         id: "line-1".to_string(),
//!         product_id: "prod-1".to_string(),
//!         product_name: "Linen Shirt".to_string(),
//!         product_sku: "LIN-SHIRT-M".to_string(),
//!         quantity: 1,
//!         unit_cost: Money::from_cents(10_000),
//!         discount: Default::default(),
//!         available_stock: 3,
//!     }],
//!     tax: TaxConfig::cgst_sgst(TaxRate::from_bps(900), TaxRate::from_bps(900)),
//!     ..PricingInput::default()
//! };
//!
//! let breakdown = compute_pricing(&input).unwrap();
//!
//! // 100.00 + 9% CGST + 9% SGST = 118.00
//! assert_eq!(breakdown.grand_total.cents(), 11_800);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod money;
pub mod order;
pub mod order_validation;
pub mod pricing;
pub mod record;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use storefront_core::Money` instead of
// `use storefront_core::money::Money`

pub use config::EngineConfig;
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::{Currency, Money};
pub use order::{transition, transition_with, OrderDraft};
pub use order_validation::{
    validate_order, validate_order_json, validate_order_json_with, validate_order_with,
    ValidationMode, ValidationRules, Violation,
};
pub use pricing::{compute_pricing, compute_pricing_with, PricingInput, RoundingPolicy};
pub use record::{is_order_form, LegacyOrder, OrderFormData, OrderRecord};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Highest tax rate any single component may carry (50%).
///
/// ## Business Reason
/// No GST slab comes close; anything above this is a typo like 180 for 18.
pub const MAX_TAX_RATE: TaxRate = TaxRate::from_bps(5000);

/// Highest percentage discount, in basis points (100%).
pub const MAX_DISCOUNT_BPS: i64 = 10_000;

/// Digits in an Indian postal code.
pub const DEFAULT_PINCODE_DIGITS: usize = 6;
