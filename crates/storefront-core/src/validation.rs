//! # Validation Module
//!
//! Field-level validators. Each checks one value and returns a
//! [`ValidationError`] naming the field.
//!
//! ## Where These Are Used
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Dashboard form (TypeScript)                                  │
//! │  ├── Required inputs, input masks                                      │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Pricing engine                                               │
//! │  ├── THIS MODULE: amount / quantity / rate checks → fatal CoreError    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Order validator                                              │
//! │  └── THIS MODULE: stock / discount / pincode checks → Violation list   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use storefront_core::validation::{validate_pincode, validate_quantity};
//!
//! validate_quantity(5).unwrap();
//! validate_pincode("560001", 6).unwrap();
//! assert!(validate_pincode("5600", 6).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{Discount, TaxRate};
use crate::MAX_TAX_RATE;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Format Validators
// =============================================================================

/// Validates an Indian postal code.
///
/// ## Rules
/// - Exactly `digits` ASCII digits (6 for India)
/// - Format check only; no postal lookup
pub fn validate_pincode(pincode: &str, digits: usize) -> ValidationResult<()> {
    let pincode = pincode.trim();

    if pincode.len() != digits || !pincode.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "pincode".to_string(),
            reason: format!("must be exactly {digits} digits"),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line quantity: must be positive.
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates that a requested quantity is covered by stock on hand.
///
/// ## User Workflow
/// ```text
/// Order form: quantity 5 on "TEE-BLK-M"
///      │
///      ▼
/// catalog lookup: availableStock = 3
///      │
///      ▼
/// validate_stock(5, 3) ← THIS FUNCTION
///      │
///      ▼
/// "quantity 5 exceeds available stock 3"
/// ```
pub fn validate_stock(requested: i64, available: i64) -> ValidationResult<()> {
    if requested > available {
        return Err(ValidationError::InsufficientStock {
            field: "quantity".to_string(),
            available,
            requested,
        });
    }

    Ok(())
}

/// Validates that an amount is zero or more.
///
/// ## Example
/// ```rust
/// use storefront_core::money::Money;
/// use storefront_core::validation::validate_amount;
///
/// assert!(validate_amount("unitCost", Money::from_cents(0)).is_ok());
/// assert!(validate_amount("unitCost", Money::from_cents(-100)).is_err());
/// ```
pub fn validate_amount(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a tax rate: 0% to 50% inclusive.
pub fn validate_tax_rate(field: &str, rate: TaxRate) -> ValidationResult<()> {
    if rate > MAX_TAX_RATE {
        return Err(ValidationError::PercentageTooHigh {
            field: field.to_string(),
            max: MAX_TAX_RATE,
        });
    }

    Ok(())
}

/// Validates a discount entry.
///
/// ## Rules
/// - Value must not be negative
/// - A percentage must not exceed `max_bps`
pub fn validate_discount(field: &str, discount: &Discount, max_bps: i64) -> ValidationResult<()> {
    if discount.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }

    if let Some(bps) = discount.percentage_bps() {
        if bps > max_bps {
            return Err(ValidationError::PercentageTooHigh {
                field: field.to_string(),
                max: TaxRate::from_bps(u32::try_from(max_bps).unwrap_or(u32::MAX)),
            });
        }
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_pincode() {
        assert!(validate_pincode("560001", 6).is_ok());
        assert!(validate_pincode(" 110011 ", 6).is_ok());

        assert!(validate_pincode("56001", 6).is_err());
        assert!(validate_pincode("5600011", 6).is_err());
        assert!(validate_pincode("56A001", 6).is_err());
        assert!(validate_pincode("", 6).is_err());
        assert!(validate_pincode("٥٦٠٠٠١", 6).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(1000).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
    }

    #[test]
    fn test_validate_stock() {
        assert!(validate_stock(3, 3).is_ok());
        assert!(validate_stock(0, 0).is_ok());
        assert_eq!(
            validate_stock(5, 3),
            Err(ValidationError::InsufficientStock {
                field: "quantity".to_string(),
                available: 3,
                requested: 5,
            })
        );
    }

    #[test]
    fn test_validate_tax_rate() {
        assert!(validate_tax_rate("igstRate", TaxRate::zero()).is_ok());
        assert!(validate_tax_rate("igstRate", TaxRate::from_bps(1800)).is_ok());
        assert!(validate_tax_rate("igstRate", TaxRate::from_bps(5000)).is_ok());
        assert!(validate_tax_rate("igstRate", TaxRate::from_bps(5001)).is_err());
    }

    #[test]
    fn test_validate_discount() {
        assert!(validate_discount("discount", &Discount::None, 10_000).is_ok());
        assert!(validate_discount("discount", &Discount::Percentage { bps: 10_000 }, 10_000).is_ok());
        assert!(
            validate_discount("discount", &Discount::Percentage { bps: 10_001 }, 10_000).is_err()
        );
        assert!(validate_discount("discount", &Discount::Percentage { bps: -5 }, 10_000).is_err());
        assert!(validate_discount(
            "discount",
            &Discount::Fixed {
                amount: Money::from_cents(1_000_000)
            },
            10_000
        )
        .is_ok());
    }
}
