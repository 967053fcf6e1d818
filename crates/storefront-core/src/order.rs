//! # Order Lifecycle
//!
//! Turning a draft into a priced [`Order`], and moving orders between
//! statuses.
//!
//! ## Status Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   Draft ──confirm──► Confirmed ──pay──► Paid                            │
//! │     │                    │                                              │
//! │     └──────cancel────────┴──────► Cancelled                             │
//! │                                                                         │
//! │   Entering Confirmed or Paid runs the FULL rule set; any violation     │
//! │   blocks the move. Drafts only need items within stock.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::order_validation::{validate_order_with, ValidationMode, ValidationRules};
use crate::pricing::{compute_pricing_with, PricingInput, RoundingPolicy};
use crate::types::{
    Address, CustomerRef, FulfillmentStatus, Order, OrderStatus, PaymentMethod, PaymentStatus,
};

// =============================================================================
// Order Draft
// =============================================================================

/// An order as the form holds it before pricing: charges and discounts as
/// entered, no derived totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
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
    pub pricing: PricingInput,
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
}

impl OrderDraft {
    /// Prices the draft with per-stage rounding.
    pub fn price(self) -> CoreResult<Order> {
        self.price_with(RoundingPolicy::default())
    }

    /// Prices the draft, producing an order whose `pricing` is derived from
    /// `self.pricing`.
    pub fn price_with(self, rounding: RoundingPolicy) -> CoreResult<Order> {
        let breakdown = compute_pricing_with(&self.pricing, rounding)?;

        Ok(Order {
            id: self.id,
            order_number: self.order_number,
            status: self.status,
            customer: self.customer,
            shipping_address: self.shipping_address,
            billing_address: self.billing_address,
            items: self.pricing.items,
            order_discount: self.pricing.order_discount,
            pricing: breakdown,
            payment_method: self.payment_method,
            fulfillment_status: self.fulfillment_status,
            payment_status: self.payment_status,
            is_international: self.is_international,
            tags: self.tags,
            notes: self.notes,
            created_at: None,
            updated_at: None,
        })
    }
}

// =============================================================================
// Status Transitions
// =============================================================================

impl OrderStatus {
    /// Whether the status machine has an edge from `self` to `next`.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (OrderStatus::Draft, OrderStatus::Confirmed)
                | (OrderStatus::Confirmed, OrderStatus::Paid)
                | (OrderStatus::Draft, OrderStatus::Cancelled)
                | (OrderStatus::Confirmed, OrderStatus::Cancelled)
        )
    }

    /// How strictly an order in this status is validated.
    pub fn validation_mode(self) -> ValidationMode {
        match self {
            OrderStatus::Draft | OrderStatus::Cancelled => ValidationMode::Minimal,
            OrderStatus::Confirmed | OrderStatus::Paid => ValidationMode::Full,
        }
    }
}

/// Moves an order to `next` using the default rule parameters.
pub fn transition(order: &mut Order, next: OrderStatus) -> CoreResult<()> {
    transition_with(order, next, &ValidationRules::default())
}

/// Moves an order to `next`.
///
/// ## Errors
/// - [`CoreError::InvalidStatusTransition`] if there is no such edge
/// - [`CoreError::ValidationFailed`] if `next` needs full validation and
///   the order breaks any rule; the order is left unchanged
pub fn transition_with(
    order: &mut Order,
    next: OrderStatus,
    rules: &ValidationRules,
) -> CoreResult<()> {
    let current = order.status;

    if !current.can_transition_to(next) {
        return Err(CoreError::InvalidStatusTransition {
            order_id: order.id.clone(),
            from: current,
            to: next,
        });
    }

    if next.validation_mode() == ValidationMode::Full {
        let violations = validate_order_with(order, ValidationMode::Full, rules);
        if !violations.is_empty() {
            debug!(order_id = %order.id, to = %next, violations = violations.len(), "Transition blocked");
            return Err(CoreError::ValidationFailed {
                order_id: order.id.clone(),
                violations,
            });
        }
    }

    order.status = next;
    if next == OrderStatus::Paid {
        order.payment_status = PaymentStatus::Paid;
    }

    info!(order_id = %order.id, from = %current, to = %next, "Order status changed");
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::types::{Discount, OrderItem, TaxConfig, TaxRate};

    fn draft() -> OrderDraft {
        let address = Address {
            id: None,
            name: "Asha Rao".to_string(),
            line1: "14 MG Road".to_string(),
            line2: None,
            city: "Bengaluru".to_string(),
            state: "Karnataka".to_string(),
            pincode: Some("560001".to_string()),
            country: "IN".to_string(),
        };

        OrderDraft {
            id: "ORD-1001".to_string(),
            order_number: None,
            status: OrderStatus::Draft,
            customer: Some(CustomerRef {
                id: "cust-1".to_string(),
                name: "Asha Rao".to_string(),
                email: Some("asha@example.com".to_string()),
                phone: None,
            }),
            shipping_address: Some(address.clone()),
            billing_address: Some(address),
            pricing: PricingInput {
                items: vec![OrderItem {
                    id: "line-1".to_string(),
                    product_id: "prod-1".to_string(),
                    product_name: "Linen Shirt".to_string(),
                    product_sku: "LIN-SHIRT-M".to_string(),
                    quantity: 1,
                    unit_cost: Money::from_cents(10_000),
                    discount: Discount::None,
                    available_stock: 5,
                }],
                order_discount: Discount::Percentage { bps: 1000 },
                tax: TaxConfig::cgst_sgst(TaxRate::from_bps(900), TaxRate::from_bps(900)),
                ..PricingInput::default()
            },
            payment_method: PaymentMethod::Prepaid,
            fulfillment_status: FulfillmentStatus::Unfulfilled,
            payment_status: PaymentStatus::Pending,
            is_international: false,
            tags: vec!["wholesale".to_string()],
            notes: None,
        }
    }

    #[test]
    fn test_draft_prices_into_order() {
        let order = draft().price().unwrap();
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.order_discount, Discount::Percentage { bps: 1000 });
        assert_eq!(order.pricing.grand_total.cents(), 10_620);
        assert_eq!(order.tags, vec!["wholesale".to_string()]);
    }

    #[test]
    fn test_draft_pricing_errors_propagate() {
        let mut bad = draft();
        bad.pricing.items[0].quantity = 0;
        assert!(matches!(bad.price(), Err(CoreError::InvalidItem { .. })));
    }

    #[test]
    fn test_happy_path_to_paid() {
        let mut order = draft().price().unwrap();

        transition(&mut order, OrderStatus::Confirmed).unwrap();
        assert_eq!(order.status, OrderStatus::Confirmed);

        transition(&mut order, OrderStatus::Paid).unwrap();
        assert_eq!(order.status, OrderStatus::Paid);
        assert_eq!(order.payment_status, PaymentStatus::Paid);
    }

    #[test]
    fn test_confirm_blocked_by_violations() {
        let mut order = draft().price().unwrap();
        order.payment_method = PaymentMethod::Cod;

        let err = transition(&mut order, OrderStatus::Confirmed).unwrap_err();
        match err {
            CoreError::ValidationFailed { violations, .. } => {
                assert_eq!(violations.len(), 1);
                assert_eq!(violations[0].field, "pricing.codCharge");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(order.status, OrderStatus::Draft);
    }

    #[test]
    fn test_cancel_skips_full_validation() {
        let mut order = draft().price().unwrap();
        order.customer = None;
        order.payment_method = PaymentMethod::Cod;

        transition(&mut order, OrderStatus::Cancelled).unwrap();
        assert_eq!(order.status, OrderStatus::Cancelled);
    }

    #[test]
    fn test_illegal_edges() {
        let mut order = draft().price().unwrap();
        assert!(matches!(
            transition(&mut order, OrderStatus::Paid),
            Err(CoreError::InvalidStatusTransition { .. })
        ));

        order.status = OrderStatus::Cancelled;
        assert!(!order.status.can_transition_to(OrderStatus::Draft));
        assert!(!OrderStatus::Paid.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Draft.can_transition_to(OrderStatus::Draft));
    }

    #[test]
    fn test_validation_mode_per_status() {
        assert_eq!(OrderStatus::Draft.validation_mode(), ValidationMode::Minimal);
        assert_eq!(OrderStatus::Confirmed.validation_mode(), ValidationMode::Full);
        assert_eq!(OrderStatus::Paid.validation_mode(), ValidationMode::Full);
    }

    #[test]
    fn test_draft_json_shape() {
        let value = serde_json::json!({
            "id": "ORD-7",
            "pricing": {
                "items": [{
                    "id": "l1", "productId": "p1", "productName": "Tote Bag",
                    "productSku": "TOTE-1", "quantity": 2, "unitCost": 10000,
                    "availableStock": 2
                }],
                "tax": { "taxType": "none" }
            },
            "isInternational": true
        });

        let order: Order = serde_json::from_value::<OrderDraft>(value)
            .unwrap()
            .price()
            .unwrap();
        assert_eq!(order.pricing.subtotal.cents(), 20_000);
        assert_eq!(order.pricing.grand_total.cents(), 20_000);
    }
}
