//! # Order Validator
//!
//! Checks an assembled [`Order`] (including its [`PricingBreakdown`]) and
//! returns every rule it breaks.
//!
//! ## Rule Table
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Rule                         Tier       Field                          │
//! │  ───────────────────────────  ─────────  ────────────────────────────   │
//! │  items present                always     items                          │
//! │  quantity within stock        always     items[i].quantity              │
//! │  customer present             full       customer                       │
//! │  shipping address present     full       shippingAddress                │
//! │  billing address present      full       billingAddress                 │
//! │  line discount ≤ 100%         full       items[i].discount              │
//! │  order discount ≤ 100%        full       pricing.orderDiscount          │
//! │  pincodes are 6 digits        full       *Address.pincode               │
//! │  COD has a COD charge         full       pricing.codCharge              │
//! │  gift card code has amount    full       pricing.giftCardAmount         │
//! │  tax type matches region      full       pricing.taxType                │
//! │  advance ≤ grand total        full       pricing.advancePaid            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rules never short-circuit each other. A draft only runs the `always`
//! tier so it can be saved half-finished. Confirming or paying runs the
//! whole table.
//!
//! [`PricingBreakdown`]: crate::types::PricingBreakdown

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;
use ts_rs::TS;

use crate::error::{CoreResult, ValidationError};
use crate::record::OrderRecord;
use crate::types::{Address, Order, PaymentMethod, TaxType};
use crate::validation::{validate_discount, validate_pincode, validate_stock};
use crate::{DEFAULT_PINCODE_DIGITS, MAX_DISCOUNT_BPS};

// =============================================================================
// Violation
// =============================================================================

/// One broken rule, addressed by the JSON path of the offending field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Violation {
    pub field: String,
    pub message: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Violation {
            field: field.into(),
            message: message.into(),
        }
    }

    fn from_error(field: impl Into<String>, err: &ValidationError) -> Self {
        Violation::new(field, err.to_string())
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

// =============================================================================
// Mode & Rules
// =============================================================================

/// Which rule subset runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    /// Every rule. Required to confirm or pay.
    #[default]
    Full,
    /// Item presence and stock only. Used while drafting.
    Minimal,
}

impl fmt::Display for ValidationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ValidationMode::Full => "full",
            ValidationMode::Minimal => "minimal",
        })
    }
}

impl FromStr for ValidationMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(ValidationMode::Full),
            "minimal" => Ok(ValidationMode::Minimal),
            _ => Err(ValidationError::InvalidFormat {
                field: "mode".to_string(),
                reason: "expected full or minimal".to_string(),
            }),
        }
    }
}

/// Tunable parameters for the rule table.
///
/// Passed in by the caller (usually from [`crate::config::EngineConfig`])
/// rather than read from globals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationRules {
    /// Exact digit count of a valid pincode.
    pub pincode_digits: usize,
    /// Ceiling for percentage discounts, in basis points.
    pub max_discount_bps: i64,
}

impl Default for ValidationRules {
    fn default() -> Self {
        ValidationRules {
            pincode_digits: DEFAULT_PINCODE_DIGITS,
            max_discount_bps: MAX_DISCOUNT_BPS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tier {
    Always,
    FullOnly,
}

type Check = fn(&Order, &ValidationRules, &mut Vec<Violation>);

struct Rule {
    tier: Tier,
    check: Check,
}

const RULES: &[Rule] = &[
    Rule { tier: Tier::Always, check: items_present },
    Rule { tier: Tier::Always, check: items_within_stock },
    Rule { tier: Tier::FullOnly, check: customer_present },
    Rule { tier: Tier::FullOnly, check: addresses_present },
    Rule { tier: Tier::FullOnly, check: item_discounts_bounded },
    Rule { tier: Tier::FullOnly, check: order_discount_bounded },
    Rule { tier: Tier::FullOnly, check: pincodes_well_formed },
    Rule { tier: Tier::FullOnly, check: cod_has_charge },
    Rule { tier: Tier::FullOnly, check: gift_card_has_amount },
    Rule { tier: Tier::FullOnly, check: tax_type_matches_region },
    Rule { tier: Tier::FullOnly, check: advance_within_total },
];

// =============================================================================
// Entry Points
// =============================================================================

/// Validates with the default rule parameters.
///
/// ## Example
/// ```rust,no_run
/// use storefront_core::order_validation::{validate_order, ValidationMode};
/// # fn load() -> storefront_core::Order { unimplemented!() }
///
/// let order = load();
/// for violation in validate_order(&order, ValidationMode::Full) {
///     eprintln!("{violation}");
/// }
/// ```
pub fn validate_order(order: &Order, mode: ValidationMode) -> Vec<Violation> {
    validate_order_with(order, mode, &ValidationRules::default())
}

/// Validates with caller-supplied rule parameters. An empty list means valid.
pub fn validate_order_with(
    order: &Order,
    mode: ValidationMode,
    rules: &ValidationRules,
) -> Vec<Violation> {
    let mut violations = Vec::new();

    for rule in RULES {
        if mode == ValidationMode::Full || rule.tier == Tier::Always {
            (rule.check)(order, rules, &mut violations);
        }
    }

    debug!(
        order_id = %order.id,
        mode = %mode,
        violations = violations.len(),
        "Validated order"
    );

    violations
}

/// Validates an order document straight from JSON.
///
/// Accepts both the current form shape and legacy flat records (see
/// [`OrderRecord`]).
///
/// ## Errors
/// [`crate::CoreError::MalformedOrder`] when the document cannot be read as
/// an order at all. Broken business rules are returned in the `Ok` list.
pub fn validate_order_json(
    value: &serde_json::Value,
    mode: ValidationMode,
) -> CoreResult<Vec<Violation>> {
    validate_order_json_with(value, mode, &ValidationRules::default())
}

/// [`validate_order_json`] with caller-supplied rule parameters.
pub fn validate_order_json_with(
    value: &serde_json::Value,
    mode: ValidationMode,
    rules: &ValidationRules,
) -> CoreResult<Vec<Violation>> {
    let order = OrderRecord::from_json(value)?.into_order();
    Ok(validate_order_with(&order, mode, rules))
}

// =============================================================================
// Structural Rules
// =============================================================================

fn items_present(order: &Order, _: &ValidationRules, out: &mut Vec<Violation>) {
    if order.items.is_empty() {
        out.push(Violation::new("items", "order must have at least one item"));
    }
}

fn items_within_stock(order: &Order, _: &ValidationRules, out: &mut Vec<Violation>) {
    for (i, item) in order.items.iter().enumerate() {
        if let Err(err) = validate_stock(item.quantity, item.available_stock) {
            out.push(Violation::from_error(format!("items[{i}].quantity"), &err));
        }
    }
}

fn customer_present(order: &Order, _: &ValidationRules, out: &mut Vec<Violation>) {
    if order.customer.is_none() {
        out.push(Violation::new("customer", "customer is required"));
    }
}

fn addresses_present(order: &Order, _: &ValidationRules, out: &mut Vec<Violation>) {
    if order.shipping_address.is_none() {
        out.push(Violation::new("shippingAddress", "shipping address is required"));
    }
    if order.billing_address.is_none() {
        out.push(Violation::new("billingAddress", "billing address is required"));
    }
}

fn item_discounts_bounded(order: &Order, rules: &ValidationRules, out: &mut Vec<Violation>) {
    for (i, item) in order.items.iter().enumerate() {
        if let Err(err) = validate_discount("discount", &item.discount, rules.max_discount_bps) {
            out.push(Violation::from_error(format!("items[{i}].discount"), &err));
        }
    }
}

fn order_discount_bounded(order: &Order, rules: &ValidationRules, out: &mut Vec<Violation>) {
    if let Err(err) = validate_discount("orderDiscount", &order.order_discount, rules.max_discount_bps)
    {
        out.push(Violation::from_error("pricing.orderDiscount", &err));
    }
}

fn pincodes_well_formed(order: &Order, rules: &ValidationRules, out: &mut Vec<Violation>) {
    let addresses: [(&str, Option<&Address>); 2] = [
        ("shippingAddress.pincode", order.shipping_address.as_ref()),
        ("billingAddress.pincode", order.billing_address.as_ref()),
    ];

    for (field, address) in addresses {
        let Some(pincode) = address.and_then(|a| a.pincode.as_deref()) else {
            continue;
        };
        if let Err(err) = validate_pincode(pincode, rules.pincode_digits) {
            out.push(Violation::from_error(field, &err));
        }
    }
}

// =============================================================================
// Business Rules
// =============================================================================

fn cod_has_charge(order: &Order, _: &ValidationRules, out: &mut Vec<Violation>) {
    if order.payment_method == PaymentMethod::Cod && !order.pricing.cod_charge.is_positive() {
        out.push(Violation::new(
            "pricing.codCharge",
            "codCharge must be positive for cash on delivery orders",
        ));
    }
}

fn gift_card_has_amount(order: &Order, _: &ValidationRules, out: &mut Vec<Violation>) {
    if order.pricing.has_gift_card_code() && !order.pricing.gift_card_amount.is_positive() {
        out.push(Violation::new(
            "pricing.giftCardAmount",
            "giftCardAmount must be positive when a gift card code is entered",
        ));
    }
}

fn tax_type_matches_region(order: &Order, _: &ValidationRules, out: &mut Vec<Violation>) {
    let tax_type = order.pricing.tax_type;
    if order.is_international && tax_type != TaxType::None {
        out.push(Violation::new(
            "pricing.taxType",
            format!("international orders must use taxType none, found {tax_type}"),
        ));
    } else if !order.is_international && tax_type == TaxType::None {
        out.push(Violation::new(
            "pricing.taxType",
            "domestic orders must use taxType cgst_sgst or igst",
        ));
    }
}

fn advance_within_total(order: &Order, _: &ValidationRules, out: &mut Vec<Violation>) {
    let pricing = &order.pricing;
    if pricing.advance_paid > pricing.grand_total {
        out.push(Violation::new(
            "pricing.advancePaid",
            format!(
                "advancePaid {} exceeds grandTotal {}",
                pricing.advance_paid, pricing.grand_total
            ),
        ));
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
