//! # Order Records
//!
//! Orders reach the core in one of two JSON shapes:
//!
//! ```text
//! ┌──────────────────────────────┐     ┌──────────────────────────────┐
//! │ OrderFormData (current)      │     │ LegacyOrder (older backend)  │
//! │ { id, items, pricing: {...}, │     │ { id, items, subtotal,       │
//! │   paymentMethod, ... }       │     │   discountAmount, taxType,   │
//! │                              │     │   cgst, ..., total, ... }    │
//! └──────────────┬───────────────┘     └──────────────┬───────────────┘
//!                │     is_order_form(): has `pricing` │
//!                └──────────────┬─────────────────────┘
//!                               ▼
//!                      OrderRecord::into_order()
//!                               ▼
//!                             Order
//! ```
//!
//! The discriminant is the presence of a `pricing` object, checked once by
//! [`is_order_form`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CoreError, CoreResult};
use crate::money::{Currency, Money};
use crate::types::{
    clamp_gift_card, Address, CustomerRef, Discount, FulfillmentStatus, Order, OrderItem,
    OrderStatus, PaymentMethod, PaymentStatus, PricingBreakdown, TaxType,
};

/// The current order shape, as posted by the order form.
pub type OrderFormData = Order;

/// An order saved before pricing moved into its own block.
///
/// Totals are flat fields on the order and no per-line breakdown exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyOrder {
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
    pub currency: Option<String>,
    pub subtotal: Money,
    #[serde(default)]
    pub discount_amount: Money,
    #[serde(default)]
    pub tax_type: TaxType,
    #[serde(default)]
    pub cgst: Money,
    #[serde(default)]
    pub sgst: Money,
    #[serde(default)]
    pub igst: Money,
    #[serde(default)]
    pub shipping_charge: Money,
    #[serde(default)]
    pub cod_charge: Money,
    #[serde(default)]
    pub gift_card_code: Option<String>,
    #[serde(default)]
    pub gift_card_amount: Money,
    pub total: Money,
    #[serde(default)]
    pub advance_paid: Money,
}

impl LegacyOrder {
    /// Lifts the flat totals into a [`PricingBreakdown`].
    ///
    /// The stored totals are kept as-is, not recomputed: a legacy order is
    /// validated against what the customer was actually quoted.
    pub fn into_order(self) -> Order {
        let taxable_base = (self.subtotal - self.discount_amount).max(Money::zero());
        let before_gift_card = taxable_base
            + self.cgst
            + self.sgst
            + self.igst
            + self.shipping_charge
            + self.cod_charge;
        let gift_card_applied = clamp_gift_card(self.gift_card_amount, before_gift_card);
        let order_discount = if self.discount_amount.is_positive() {
            Discount::Fixed {
                amount: self.discount_amount,
            }
        } else {
            Discount::None
        };

        let pricing = PricingBreakdown {
            currency: self.currency.unwrap_or_else(|| Currency::default().code),
            lines: Vec::new(),
            subtotal: self.subtotal,
            product_discounts_total: Money::zero(),
            order_discount: self.discount_amount,
            taxable_base,
            tax_type: self.tax_type,
            cgst: self.cgst,
            sgst: self.sgst,
            igst: self.igst,
            shipping_charge: self.shipping_charge,
            cod_charge: self.cod_charge,
            gift_card_code: self.gift_card_code,
            gift_card_amount: self.gift_card_amount,
            gift_card_applied,
            grand_total: self.total,
            advance_paid: self.advance_paid,
            balance_due: self.total - self.advance_paid,
        };

        Order {
            id: self.id,
            order_number: self.order_number,
            status: self.status,
            customer: self.customer,
            shipping_address: self.shipping_address,
            billing_address: self.billing_address,
            items: self.items,
            order_discount,
            pricing,
            payment_method: self.payment_method,
            fulfillment_status: self.fulfillment_status,
            payment_status: self.payment_status,
            is_international: self.is_international,
            tags: self.tags,
            notes: self.notes,
            created_at: None,
            updated_at: None,
        }
    }
}

/// Either order shape, resolved by [`is_order_form`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderRecord {
    Form(OrderFormData),
    Legacy(LegacyOrder),
}

/// Type guard: true when the document carries a `pricing` object.
pub fn is_order_form(value: &Value) -> bool {
    value.get("pricing").is_some_and(Value::is_object)
}

impl OrderRecord {
    /// Reads a record from a parsed JSON document.
    ///
    /// ## Errors
    /// [`CoreError::MalformedOrder`] if the document is not an object or is
    /// missing fields its shape requires.
    pub fn from_json(value: &Value) -> CoreResult<Self> {
        if !value.is_object() {
            return Err(CoreError::MalformedOrder {
                reason: "order must be a JSON object".to_string(),
            });
        }

        if is_order_form(value) {
            Ok(OrderRecord::Form(serde_json::from_value(value.clone())?))
        } else {
            Ok(OrderRecord::Legacy(serde_json::from_value(value.clone())?))
        }
    }

    /// Parses and resolves a JSON string.
    pub fn from_json_str(input: &str) -> CoreResult<Self> {
        let value: Value = serde_json::from_str(input)?;
        OrderRecord::from_json(&value)
    }

    /// The order in its current shape.
    pub fn into_order(self) -> Order {
        match self {
            OrderRecord::Form(order) => order,
            OrderRecord::Legacy(legacy) => legacy.into_order(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order_validation::{validate_order, ValidationMode};
    use serde_json::json;

    fn legacy_json() -> Value {
        json!({
            "id": "ORD-0042",
            "customer": { "id": "cust-9", "name": "Ravi Menon" },
            "shippingAddress": {
                "name": "Ravi Menon", "line1": "2 Park St", "city": "Kolkata",
                "state": "West Bengal", "pincode": "700016", "country": "IN"
            },
            "billingAddress": {
                "name": "Ravi Menon", "line1": "2 Park St", "city": "Kolkata",
                "state": "West Bengal", "pincode": "700016", "country": "IN"
            },
            "items": [{
                "id": "line-1", "productId": "prod-7", "productName": "Kurta",
                "productSku": "KURTA-L", "quantity": 1, "unitCost": 150000,
                "availableStock": 4
            }],
            "paymentMethod": "cod",
            "subtotal": 150000,
            "discountAmount": 15000,
            "taxType": "igst",
            "igst": 24300,
            "codCharge": 5000,
            "total": 164300
        })
    }

    #[test]
    fn test_type_guard() {
        assert!(is_order_form(&json!({ "pricing": {} })));
        assert!(!is_order_form(&json!({ "pricing": null })));
        assert!(!is_order_form(&json!({ "total": 100 })));
        assert!(!is_order_form(&json!("pricing")));
    }

    #[test]
    fn test_legacy_order_is_lifted() {
        let record = OrderRecord::from_json(&legacy_json()).unwrap();
        assert!(matches!(record, OrderRecord::Legacy(_)));

        let order = record.into_order();
        assert_eq!(order.pricing.taxable_base.cents(), 135_000);
        assert_eq!(order.pricing.grand_total.cents(), 164_300);
        assert_eq!(order.pricing.balance_due.cents(), 164_300);
        assert_eq!(order.pricing.tax_type, TaxType::Igst);
        assert_eq!(
            order.order_discount,
            Discount::Fixed {
                amount: Money::from_cents(15_000)
            }
        );
        assert!(validate_order(&order, ValidationMode::Full).is_empty());
    }

    #[test]
    fn test_legacy_gift_card_is_clamped() {
        let mut value = legacy_json();
        value["giftCardCode"] = json!("GC-OLD");
        value["giftCardAmount"] = json!(500_000);
        value["total"] = json!(0);

        let order = OrderRecord::from_json(&value).unwrap().into_order();
        // 1350.00 base + 243.00 IGST + 50.00 COD
        assert_eq!(order.pricing.gift_card_applied.cents(), 164_300);
        assert_eq!(order.pricing.gift_card_amount.cents(), 500_000);
    }

    #[test]
    fn test_current_order_round_trips() {
        let legacy = OrderRecord::from_json(&legacy_json()).unwrap().into_order();
        let value = serde_json::to_value(&legacy).unwrap();

        let record = OrderRecord::from_json(&value).unwrap();
        assert!(matches!(record, OrderRecord::Form(_)));
        assert_eq!(record.into_order(), legacy);
    }

    #[test]
    fn test_malformed_documents() {
        assert!(matches!(
            OrderRecord::from_json(&json!(null)),
            Err(CoreError::MalformedOrder { .. })
        ));
        // legacy shape without its required totals
        assert!(OrderRecord::from_json(&json!({ "id": "x", "items": [] })).is_err());
        assert!(OrderRecord::from_json_str("{ not json").is_err());
    }
}
