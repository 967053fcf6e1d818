//! # Pricing Engine
//!
//! Derives a [`PricingBreakdown`] from an order's lines and charges.
//!
//! ## Derivation Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. per line: gross = unit_cost × qty, discount, net                   │
//! │  2. subtotal = Σ gross          product_discounts_total = Σ discount   │
//! │  3. order discount on (subtotal - product discounts), clamped          │
//! │  4. taxable_base = subtotal - product discounts - order discount (≥0) │
//! │  5. tax: cgst_sgst → CGST + SGST │ igst → IGST │ none → 0              │
//! │  6. + shipping + COD (untaxed)                                         │
//! │  7. - gift card, clamped so the total never goes below zero           │
//! │  8. grand_total (≥ 0)                                                  │
//! │  9. balance_due = grand_total - advance_paid (may go negative)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every call is pure: same input, same breakdown, bit for bit.
//!
//! ## Rounding
//! [`RoundingPolicy::PerStage`] rounds each percentage product half-up to
//! the minor unit as soon as it is produced, which is what the dashboard's
//! previews show. [`RoundingPolicy::Deferred`] keeps 1/10000 of a minor
//! unit through the chain and rounds each field only when it is reported,
//! so the reported fields may not add up to `grand_total` to the last paisa.
//!
//! ## Example
//! ```rust
//! use storefront_core::money::Money;
//! use storefront_core::pricing::{compute_pricing, PricingInput};
//! use storefront_core::types::{Discount, OrderItem, TaxConfig, TaxRate};
//!
//! let input = PricingInput {
//!     items: vec![OrderItem {
//!         id: "line-1".into(),
//!         product_id: "prod-1".into(),
//!         product_name: "Linen Shirt".into(),
//!         product_sku: "LIN-SHIRT-M".into(),
//!         quantity: 1,
//!         unit_cost: Money::from_cents(10_000),
//!         discount: Discount::None,
//!         available_stock: 10,
//!     }],
//!     order_discount: Discount::Percentage { bps: 1000 },
//!     tax: TaxConfig::cgst_sgst(TaxRate::from_bps(900), TaxRate::from_bps(900)),
//!     ..PricingInput::default()
//! };
//!
//! let pricing = compute_pricing(&input).unwrap();
//! assert_eq!(pricing.taxable_base.cents(), 9_000);
//! assert_eq!(pricing.cgst.cents(), 810);
//! assert_eq!(pricing.grand_total.cents(), 10_620);
//! ```

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::debug;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::{div_round_half_up, Currency, Money, BPS_PER_WHOLE};
use crate::types::{Discount, LinePricing, OrderItem, PricingBreakdown, TaxConfig, TaxType};
use crate::validation::{validate_amount, validate_quantity, validate_tax_rate};

// =============================================================================
// Rounding Policy
// =============================================================================

/// When fractional minor units are rounded away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum RoundingPolicy {
    /// Round every derived amount to 2 decimals as it is produced.
    #[default]
    PerStage,
    /// Carry sub-minor precision and round only the reported fields.
    Deferred,
}

impl RoundingPolicy {
    /// Internal units per minor unit.
    const fn scale(self) -> i128 {
        match self {
            RoundingPolicy::PerStage => 1,
            RoundingPolicy::Deferred => 10_000,
        }
    }
}

impl FromStr for RoundingPolicy {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "per_stage" => Ok(RoundingPolicy::PerStage),
            "deferred" => Ok(RoundingPolicy::Deferred),
            _ => Err(ValidationError::InvalidFormat {
                field: "rounding".to_string(),
                reason: "expected per_stage or deferred".to_string(),
            }),
        }
    }
}

// =============================================================================
// Pricing Input
// =============================================================================

/// Everything the engine needs to price an order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PricingInput {
    /// Base currency. When absent the breakdown uses the caller's default
    /// (see [`crate::config::EngineConfig::price_draft`]) or INR.
    #[serde(default)]
    pub currency: Option<Currency>,
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub order_discount: Discount,
    pub tax: TaxConfig,
    #[serde(default)]
    pub shipping_charge: Money,
    #[serde(default)]
    pub cod_charge: Money,
    #[serde(default)]
    pub gift_card_code: Option<String>,
    #[serde(default)]
    pub gift_card_amount: Money,
    #[serde(default)]
    pub advance_paid: Money,
}

// =============================================================================
// Ledger
// =============================================================================

/// Fixed-point arithmetic at the policy's scale, with overflow checks.
#[derive(Debug, Clone, Copy)]
struct Ledger {
    scale: i128,
}

impl Ledger {
    fn new(policy: RoundingPolicy) -> Self {
        Ledger {
            scale: policy.scale(),
        }
    }

    fn units(&self, amount: Money, stage: &'static str) -> CoreResult<i128> {
        (amount.cents() as i128)
            .checked_mul(self.scale)
            .ok_or(CoreError::Overflow { stage })
    }

    fn percent(&self, base: i128, bps: i64, stage: &'static str) -> CoreResult<i128> {
        let product = base
            .checked_mul(bps as i128)
            .ok_or(CoreError::Overflow { stage })?;
        Ok(div_round_half_up(product, BPS_PER_WHOLE as i128))
    }

    /// Discount amount on `base`, clamped to `[0, base]`.
    fn discount(&self, discount: &Discount, base: i128, stage: &'static str) -> CoreResult<i128> {
        let amount = match discount {
            Discount::None => 0,
            Discount::Percentage { bps } => self.percent(base, *bps, stage)?,
            Discount::Fixed { amount } => self.units(*amount, stage)?,
        };
        Ok(amount.clamp(0, base.max(0)))
    }

    fn emit(&self, value: i128, stage: &'static str) -> CoreResult<Money> {
        let cents = div_round_half_up(value, self.scale);
        i64::try_from(cents)
            .map(Money::from_cents)
            .map_err(|_| CoreError::Overflow { stage })
    }
}

fn add(a: i128, b: i128, stage: &'static str) -> CoreResult<i128> {
    a.checked_add(b).ok_or(CoreError::Overflow { stage })
}

// =============================================================================
// Input Checks
// =============================================================================

fn check_input(input: &PricingInput) -> CoreResult<()> {
    for (index, item) in input.items.iter().enumerate() {
        let checked = validate_amount("unitCost", item.unit_cost)
            .and_then(|_| validate_quantity(item.quantity))
            .and_then(|_| {
                if item.discount.is_negative() {
                    Err(ValidationError::MustNotBeNegative {
                        field: "discount".to_string(),
                    })
                } else {
                    Ok(())
                }
            });

        if let Err(source) = checked {
            return Err(CoreError::InvalidItem {
                index,
                sku: item.product_sku.clone(),
                source,
            });
        }
    }

    if input.order_discount.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: "orderDiscount".to_string(),
        }
        .into());
    }

    validate_tax_rate("cgstRate", input.tax.cgst_rate)?;
    validate_tax_rate("sgstRate", input.tax.sgst_rate)?;
    validate_tax_rate("igstRate", input.tax.igst_rate)?;

    validate_amount("shippingCharge", input.shipping_charge)?;
    validate_amount("codCharge", input.cod_charge)?;
    validate_amount("giftCardAmount", input.gift_card_amount)?;
    validate_amount("advancePaid", input.advance_paid)?;

    Ok(())
}

// =============================================================================
// Engine
// =============================================================================

/// Prices an order with per-stage rounding.
pub fn compute_pricing(input: &PricingInput) -> CoreResult<PricingBreakdown> {
    compute_pricing_with(input, RoundingPolicy::default())
}

/// Prices an order with the given rounding policy.
///
/// ## Errors
/// - [`CoreError::InvalidItem`] for a negative unit cost, non-positive
///   quantity or negative line discount
/// - [`CoreError::Validation`] for a negative order discount or charge, or
///   a tax rate above 50%
/// - [`CoreError::Overflow`] if an amount leaves the `i64` range
///
/// Stock is not checked here; see [`crate::order_validation`].
pub fn compute_pricing_with(
    input: &PricingInput,
    rounding: RoundingPolicy,
) -> CoreResult<PricingBreakdown> {
    check_input(input)?;
    let ledger = Ledger::new(rounding);

    // 1-2. lines, subtotal, product discounts
    let mut subtotal = 0i128;
    let mut product_discounts = 0i128;
    let mut lines = Vec::with_capacity(input.items.len());

    for item in &input.items {
        let gross_money = item
            .unit_cost
            .checked_mul_quantity(item.quantity)
            .ok_or(CoreError::Overflow { stage: "line gross" })?;
        let gross = ledger.units(gross_money, "line gross")?;
        let discount = ledger.discount(&item.discount, gross, "line discount")?;
        let net = gross - discount;

        subtotal = add(subtotal, gross, "subtotal")?;
        product_discounts = add(product_discounts, discount, "product discounts")?;

        lines.push(LinePricing {
            item_id: item.id.clone(),
            line_gross: ledger.emit(gross, "line gross")?,
            line_discount: ledger.emit(discount, "line discount")?,
            line_net: ledger.emit(net, "line net")?,
        });
    }

    // 3. order discount on the post-line-discount subtotal
    let discounted_subtotal = subtotal - product_discounts;
    let order_discount =
        ledger.discount(&input.order_discount, discounted_subtotal, "order discount")?;

    // 4. taxable base
    let taxable_base = (discounted_subtotal - order_discount).max(0);

    // 5. tax
    let (cgst, sgst, igst) = match input.tax.tax_type {
        TaxType::CgstSgst => (
            ledger.percent(taxable_base, i64::from(input.tax.cgst_rate.bps()), "cgst")?,
            ledger.percent(taxable_base, i64::from(input.tax.sgst_rate.bps()), "sgst")?,
            0,
        ),
        TaxType::Igst => (
            0,
            0,
            ledger.percent(taxable_base, i64::from(input.tax.igst_rate.bps()), "igst")?,
        ),
        TaxType::None => (0, 0, 0),
    };

    // 6. flat charges
    let shipping = ledger.units(input.shipping_charge, "shipping")?;
    let cod = ledger.units(input.cod_charge, "cod")?;
    let mut before_gift_card = add(taxable_base, cgst, "grand total")?;
    for part in [sgst, igst, shipping, cod] {
        before_gift_card = add(before_gift_card, part, "grand total")?;
    }

    // 7. gift card
    let gift_card_requested = ledger.units(input.gift_card_amount, "gift card")?;
    let gift_card_applied = gift_card_requested.min(before_gift_card);

    // 8-9. totals
    let grand_total = (before_gift_card - gift_card_applied).max(0);
    let advance = ledger.units(input.advance_paid, "advance paid")?;
    let balance_due = grand_total - advance;

    let breakdown = PricingBreakdown {
        currency: input
            .currency
            .as_ref()
            .map_or_else(|| Currency::default().code, |c| c.code.clone()),
        lines,
        subtotal: ledger.emit(subtotal, "subtotal")?,
        product_discounts_total: ledger.emit(product_discounts, "product discounts")?,
        order_discount: ledger.emit(order_discount, "order discount")?,
        taxable_base: ledger.emit(taxable_base, "taxable base")?,
        tax_type: input.tax.tax_type,
        cgst: ledger.emit(cgst, "cgst")?,
        sgst: ledger.emit(sgst, "sgst")?,
        igst: ledger.emit(igst, "igst")?,
        shipping_charge: input.shipping_charge,
        cod_charge: input.cod_charge,
        gift_card_code: input.gift_card_code.clone(),
        gift_card_amount: input.gift_card_amount,
        gift_card_applied: ledger.emit(gift_card_applied, "gift card")?,
        grand_total: ledger.emit(grand_total, "grand total")?,
        advance_paid: input.advance_paid,
        balance_due: ledger.emit(balance_due, "balance due")?,
    };

    debug!(
        items = input.items.len(),
        rounding = ?rounding,
        subtotal = %breakdown.subtotal,
        taxable_base = %breakdown.taxable_base,
        grand_total = %breakdown.grand_total,
        balance_due = %breakdown.balance_due,
        "Computed pricing"
    );

    Ok(breakdown)
}

// =============================================================================
// Unit Tests
// =============================================================================
