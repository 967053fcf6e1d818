//! # Domain Types
//!
//! Core domain types shared by the pricing engine and the order validator.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌──────────────────┐   ┌─────────────────┐      │
//! │  │   OrderItem     │   │ PricingBreakdown │   │     Order       │      │
//! │  │  ─────────────  │   │  ──────────────  │   │  ─────────────  │      │
//! │  │  unit_cost      │──►│  subtotal        │──►│  customer       │      │
//! │  │  quantity       │   │  taxable_base    │   │  addresses      │      │
//! │  │  discount       │   │  cgst/sgst/igst  │   │  items          │      │
//! │  │  available_stock│   │  grand_total     │   │  pricing        │      │
//! │  └─────────────────┘   │  balance_due     │   │  status         │      │
//! │                        └──────────────────┘   └─────────────────┘      │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Discount     │   │   TaxConfig     │   │ PaymentMethod   │       │
//! │  │  none           │   │  cgst_sgst      │   │  cod, prepaid   │       │
//! │  │  percentage bps │   │  igst           │   │  partial,credit │       │
//! │  │  fixed amount   │   │  none           │   └─────────────────┘       │
//! │  └─────────────────┘   └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All wire types serialize with camelCase field names, matching the
//! dashboard's TypeScript types generated by `ts-rs`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::{Currency, Money};

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 900 bps = 9% (CGST on most garments), 1800 bps = 18% IGST
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }
}

impl fmt::Display for TaxRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}%", self.0 / 100, self.0 % 100)
    }
}

// =============================================================================
// Discount
// =============================================================================

/// A discount applied to one line or to the whole order.
///
/// Values are signed so that a negative entry from the form is reported as
/// an error instead of being unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Discount {
    /// No discount.
    #[default]
    None,
    /// Percentage off, in basis points (1000 = 10%).
    Percentage { bps: i64 },
    /// Flat amount off.
    Fixed { amount: Money },
}

impl Discount {
    /// Returns the basis points when this is a percentage discount.
    pub fn percentage_bps(&self) -> Option<i64> {
        match self {
            Discount::Percentage { bps } => Some(*bps),
            _ => None,
        }
    }

    /// True if the entered value is below zero.
    pub fn is_negative(&self) -> bool {
        match self {
            Discount::None => false,
            Discount::Percentage { bps } => *bps < 0,
            Discount::Fixed { amount } => amount.is_negative(),
        }
    }
}

// =============================================================================
// Tax Configuration
// =============================================================================

/// Which GST regime applies to the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TaxType {
    /// Intra-state: central + state components.
    #[default]
    CgstSgst,
    /// Inter-state: single integrated component.
    Igst,
    /// No tax (international orders).
    None,
}

impl fmt::Display for TaxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TaxType::CgstSgst => "cgst_sgst",
            TaxType::Igst => "igst",
            TaxType::None => "none",
        };
        f.write_str(name)
    }
}

/// Tax settings for an order. Only the rates matching `tax_type` are used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TaxConfig {
    pub tax_type: TaxType,
    #[serde(default)]
    pub cgst_rate: TaxRate,
    #[serde(default)]
    pub sgst_rate: TaxRate,
    #[serde(default)]
    pub igst_rate: TaxRate,
}

impl TaxConfig {
    /// Untaxed configuration.
    pub const fn none() -> Self {
        TaxConfig {
            tax_type: TaxType::None,
            cgst_rate: TaxRate::zero(),
            sgst_rate: TaxRate::zero(),
            igst_rate: TaxRate::zero(),
        }
    }

    /// Intra-state configuration with the given split rates.
    pub const fn cgst_sgst(cgst: TaxRate, sgst: TaxRate) -> Self {
        TaxConfig {
            tax_type: TaxType::CgstSgst,
            cgst_rate: cgst,
            sgst_rate: sgst,
            igst_rate: TaxRate::zero(),
        }
    }

    /// Inter-state configuration.
    pub const fn igst(rate: TaxRate) -> Self {
        TaxConfig {
            tax_type: TaxType::Igst,
            cgst_rate: TaxRate::zero(),
            sgst_rate: TaxRate::zero(),
            igst_rate: rate,
        }
    }
}

// =============================================================================
// Order Item
// =============================================================================

/// One line of an order.
///
/// `unit_cost` and `available_stock` are snapshots from the catalog lookup
/// at the time the line was added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: String,
    pub product_id: String,
    pub product_name: String,
    pub product_sku: String,
    pub quantity: i64,
    pub unit_cost: Money,
    #[serde(default)]
    pub discount: Discount,
    pub available_stock: i64,
}

// =============================================================================
// Pricing Breakdown
// =============================================================================

/// Per-line figures computed by the pricing engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LinePricing {
    pub item_id: String,
    /// unit_cost × quantity
    pub line_gross: Money,
    /// Never more than `line_gross`.
    pub line_discount: Money,
    pub line_net: Money,
}

/// The derived price of an order.
///
/// Always produced by [`crate::pricing::compute_pricing`]; the dashboard
/// never edits these fields directly.
///
/// Stored documents may omit `currency`, `lines`, `taxType`, `taxableBase`
/// and `giftCardApplied`. The two derived amounts are then recomputed from
/// the figures that are present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PricingBreakdown {
    /// ISO 4217 code of the base currency.
    pub currency: String,
    pub lines: Vec<LinePricing>,
    pub subtotal: Money,
    pub product_discounts_total: Money,
    pub order_discount: Money,
    pub taxable_base: Money,
    pub tax_type: TaxType,
    pub cgst: Money,
    pub sgst: Money,
    pub igst: Money,
    pub shipping_charge: Money,
    pub cod_charge: Money,
    #[serde(default)]
    pub gift_card_code: Option<String>,
    /// Amount requested against the gift card.
    pub gift_card_amount: Money,
    /// Amount actually deducted (clamped so the total stays >= 0).
    pub gift_card_applied: Money,
    pub grand_total: Money,
    pub advance_paid: Money,
    /// `grand_total - advance_paid`; negative while an overpayment is entered.
    pub balance_due: Money,
}

/// Wire shape accepted when reading a breakdown back.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredBreakdown {
    #[serde(default = "default_currency_code")]
    currency: String,
    #[serde(default)]
    lines: Vec<LinePricing>,
    subtotal: Money,
    product_discounts_total: Money,
    order_discount: Money,
    #[serde(default)]
    taxable_base: Option<Money>,
    #[serde(default)]
    tax_type: TaxType,
    cgst: Money,
    sgst: Money,
    igst: Money,
    shipping_charge: Money,
    cod_charge: Money,
    #[serde(default)]
    gift_card_code: Option<String>,
    gift_card_amount: Money,
    #[serde(default)]
    gift_card_applied: Option<Money>,
    grand_total: Money,
    advance_paid: Money,
    balance_due: Money,
}

fn default_currency_code() -> String {
    Currency::default().code
}

impl From<StoredBreakdown> for PricingBreakdown {
    fn from(stored: StoredBreakdown) -> Self {
        let taxable_base = stored.taxable_base.unwrap_or_else(|| {
            (stored.subtotal - stored.product_discounts_total - stored.order_discount)
                .max(Money::zero())
        });
        let gift_card_applied = stored.gift_card_applied.unwrap_or_else(|| {
            let before_gift_card = taxable_base
                + stored.cgst
                + stored.sgst
                + stored.igst
                + stored.shipping_charge
                + stored.cod_charge;
            clamp_gift_card(stored.gift_card_amount, before_gift_card)
        });

        PricingBreakdown {
            currency: stored.currency,
            lines: stored.lines,
            subtotal: stored.subtotal,
            product_discounts_total: stored.product_discounts_total,
            order_discount: stored.order_discount,
            taxable_base,
            tax_type: stored.tax_type,
            cgst: stored.cgst,
            sgst: stored.sgst,
            igst: stored.igst,
            shipping_charge: stored.shipping_charge,
            cod_charge: stored.cod_charge,
            gift_card_code: stored.gift_card_code,
            gift_card_amount: stored.gift_card_amount,
            gift_card_applied,
            grand_total: stored.grand_total,
            advance_paid: stored.advance_paid,
            balance_due: stored.balance_due,
        }
    }
}

impl<'de> Deserialize<'de> for PricingBreakdown {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        StoredBreakdown::deserialize(deserializer).map(PricingBreakdown::from)
    }
}

/// The part of a requested gift card amount that can be used against
/// `before_gift_card`, never below zero.
pub(crate) fn clamp_gift_card(requested: Money, before_gift_card: Money) -> Money {
    requested.min(before_gift_card).max(Money::zero())
}

impl PricingBreakdown {
    /// Sum of all tax components.
    pub fn tax_total(&self) -> Money {
        self.cgst + self.sgst + self.igst
    }

    /// Whether a gift card code was entered.
    pub fn has_gift_card_code(&self) -> bool {
        self.gift_card_code
            .as_deref()
            .is_some_and(|code| !code.trim().is_empty())
    }
}

// =============================================================================
// Customer & Address
// =============================================================================

/// Reference to a customer resolved by the customer lookup service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// A shipping or billing address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub line1: String,
    #[serde(default)]
    pub line2: Option<String>,
    pub city: String,
    pub state: String,
    #[serde(default)]
    pub pincode: Option<String>,
    pub country: String,
}

// =============================================================================
// Statuses
// =============================================================================

/// How the customer is paying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash on delivery. Requires a COD charge.
    Cod,
    /// Paid in full up front.
    #[default]
    Prepaid,
    /// Advance now, balance on delivery.
    Partial,
    /// Invoiced on store credit terms.
    Credit,
}

/// Shipping progress of the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum FulfillmentStatus {
    #[default]
    Unfulfilled,
    Processing,
    Shipped,
    Delivered,
    Returned,
}

/// Collection progress of the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Pending,
    PartiallyPaid,
    Paid,
    Refunded,
}

/// Lifecycle status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Being edited; loose validation.
    #[default]
    Draft,
    /// Accepted by the store; full validation passed.
    Confirmed,
    /// Payment collected.
    Paid,
    /// Abandoned or cancelled out of band.
    Cancelled,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OrderStatus::Draft => "draft",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Paid => "paid",
            OrderStatus::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

// =============================================================================
// Order
// =============================================================================

/// An order as assembled by the dashboard's order form.
///
/// Owned by the editing session. Nothing in this crate keeps a copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    #[serde(default)]
    pub order_number: Option<String>,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub customer: Option<CustomerRef>,
    #[serde(default)]
    pub shipping_address: Option<Address>,
    #[serde(default)]
    pub billing_address: Option<Address>,
    pub items: Vec<OrderItem>,
    /// Order-level discount as entered; the computed amount is in `pricing`.
    #[serde(default)]
    pub order_discount: Discount,
    pub pricing: PricingBreakdown,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub fulfillment_status: FulfillmentStatus,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub is_international: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub updated_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tax_rate_from_bps() {
        let rate = TaxRate::from_bps(900);
        assert_eq!(rate.bps(), 900);
        assert_eq!(rate.to_string(), "9.00%");
    }

    #[test]
    fn test_discount_serde_shape() {
        let discount: Discount =
            serde_json::from_str(r#"{"type":"percentage","bps":1000}"#).unwrap();
        assert_eq!(discount, Discount::Percentage { bps: 1000 });

        let fixed: Discount = serde_json::from_str(r#"{"type":"fixed","amount":2500}"#).unwrap();
        assert_eq!(
            fixed,
            Discount::Fixed {
                amount: Money::from_cents(2500)
            }
        );

        let none: Discount = serde_json::from_str(r#"{"type":"none"}"#).unwrap();
        assert_eq!(none, Discount::None);
    }

    #[test]
    fn test_discount_negative() {
        assert!(Discount::Percentage { bps: -1 }.is_negative());
        assert!(Discount::Fixed {
            amount: Money::from_cents(-1)
        }
        .is_negative());
        assert!(!Discount::None.is_negative());
    }

    #[test]
    fn test_tax_type_wire_names() {
        assert_eq!(
            serde_json::to_string(&TaxType::CgstSgst).unwrap(),
            r#""cgst_sgst""#
        );
        let parsed: TaxType = serde_json::from_str(r#""igst""#).unwrap();
        assert_eq!(parsed, TaxType::Igst);
    }

    fn stored_breakdown() -> serde_json::Value {
        serde_json::json!({
            "subtotal": 70_000,
            "productDiscountsTotal": 5_000,
            "orderDiscount": 5_000,
            "taxType": "igst",
            "cgst": 0,
            "sgst": 0,
            "igst": 10_800,
            "shippingCharge": 2_000,
            "codCharge": 0,
            "giftCardCode": "GC-100",
            "giftCardAmount": 100_000,
            "grandTotal": 0,
            "advancePaid": 0,
            "balanceDue": 0
        })
    }

    #[test]
    fn test_breakdown_without_derived_fields() {
        let pricing: PricingBreakdown = serde_json::from_value(stored_breakdown()).unwrap();

        assert_eq!(pricing.currency, "INR");
        assert!(pricing.lines.is_empty());
        assert_eq!(pricing.taxable_base.cents(), 60_000);
        // 600.00 + 108.00 IGST + 20.00 shipping is all the card can cover
        assert_eq!(pricing.gift_card_applied.cents(), 72_800);
        assert_eq!(pricing.gift_card_amount.cents(), 100_000);
    }

    #[test]
    fn test_breakdown_keeps_stored_derived_fields() {
        let mut value = stored_breakdown();
        value["currency"] = serde_json::json!("USD");
        value["taxableBase"] = serde_json::json!(59_000);
        value["giftCardApplied"] = serde_json::json!(50_000);

        let pricing: PricingBreakdown = serde_json::from_value(value).unwrap();
        assert_eq!(pricing.currency, "USD");
        assert_eq!(pricing.taxable_base.cents(), 59_000);
        assert_eq!(pricing.gift_card_applied.cents(), 50_000);
    }

    #[test]
    fn test_breakdown_still_requires_reported_totals() {
        let mut value = stored_breakdown();
        value.as_object_mut().unwrap().remove("grandTotal");
        assert!(serde_json::from_value::<PricingBreakdown>(value).is_err());
    }

    #[test]
    fn test_clamp_gift_card() {
        let c = Money::from_cents;
        assert_eq!(clamp_gift_card(c(500), c(2_000)), c(500));
        assert_eq!(clamp_gift_card(c(5_000), c(2_000)), c(2_000));
        assert_eq!(clamp_gift_card(c(5_000), c(-10)), c(0));
    }

    #[test]
    fn test_status_defaults() {
        assert_eq!(OrderStatus::default(), OrderStatus::Draft);
        assert_eq!(PaymentMethod::default(), PaymentMethod::Prepaid);
        assert_eq!(OrderStatus::Confirmed.to_string(), "confirmed");
    }
}
