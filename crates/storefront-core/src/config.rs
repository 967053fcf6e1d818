//! # Engine Configuration
//!
//! Settings the caller injects into pricing and validation.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`STOREFRONT_*`)
//! 2. Config file (`engine.toml`, read by the caller)
//! 3. Defaults (this file)
//!
//! ## Configuration File Format
//! ```toml
//! rounding = "per_stage"   # per_stage | deferred
//!
//! [currency]
//! code = "INR"
//! symbol = "₹"
//!
//! [rules]
//! pincode_digits = 6
//! max_discount_bps = 10000
//! ```
//!
//! Parsing the file and reading the environment are the only places where
//! this crate looks outside its arguments; the engine itself never does.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{CoreError, CoreResult};
use crate::money::Currency;
use crate::order::OrderDraft;
use crate::order_validation::ValidationRules;
use crate::pricing::RoundingPolicy;
use crate::types::Order;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "STOREFRONT_";

/// Pricing and validation settings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Display currency.
    pub currency: Currency,
    /// Rounding policy for `compute_pricing_with`.
    pub rounding: RoundingPolicy,
    /// Rule parameters for `validate_order_with`.
    pub rules: ValidationRules,
}

impl EngineConfig {
    /// Defaults overridden by the process environment.
    ///
    /// ## Environment Variables
    /// - `STOREFRONT_CURRENCY_CODE`: ISO 4217 code (e.g., "USD")
    /// - `STOREFRONT_CURRENCY_SYMBOL`: Display symbol (e.g., "$")
    /// - `STOREFRONT_ROUNDING`: `per_stage` or `deferred`
    /// - `STOREFRONT_PINCODE_DIGITS`: Digit count of a valid pincode
    pub fn from_env() -> Self {
        EngineConfig::default().with_env(|key| std::env::var(key).ok())
    }

    /// Parses an `engine.toml` document. Missing keys keep their defaults.
    pub fn from_toml_str(input: &str) -> CoreResult<Self> {
        let config: EngineConfig = toml::from_str(input).map_err(|e| CoreError::InvalidConfig {
            key: "engine.toml".to_string(),
            reason: e.to_string(),
        })?;

        if config.rules.pincode_digits == 0 {
            return Err(CoreError::InvalidConfig {
                key: "rules.pincode_digits".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        debug!(rounding = ?config.rounding, currency = %config.currency.code, "Loaded engine config");
        Ok(config)
    }

    /// Applies `STOREFRONT_*` overrides read through `lookup`.
    ///
    /// Unusable values are logged and skipped.
    pub fn with_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));

        if let Some(code) = var("CURRENCY_CODE") {
            self.currency.code = code;
        }

        if let Some(symbol) = var("CURRENCY_SYMBOL") {
            self.currency.symbol = symbol;
        }

        if let Some(rounding) = var("ROUNDING") {
            match rounding.parse::<RoundingPolicy>() {
                Ok(policy) => self.rounding = policy,
                Err(e) => warn!(value = %rounding, error = %e, "Ignoring STOREFRONT_ROUNDING"),
            }
        }

        if let Some(digits) = var("PINCODE_DIGITS") {
            match digits.parse::<usize>() {
                Ok(n) if n > 0 => self.rules.pincode_digits = n,
                _ => warn!(value = %digits, "Ignoring STOREFRONT_PINCODE_DIGITS"),
            }
        }

        self
    }

    /// Prices a draft with these settings.
    ///
    /// The configured rounding policy is used, and the configured currency
    /// fills in for a draft that names none.
    pub fn price_draft(&self, mut draft: OrderDraft) -> CoreResult<Order> {
        if draft.pricing.currency.is_none() {
            draft.pricing.currency = Some(self.currency.clone());
        }
        draft.price_with(self.rounding)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.currency.code, "INR");
        assert_eq!(config.rounding, RoundingPolicy::PerStage);
        assert_eq!(config.rules.pincode_digits, 6);
        assert_eq!(config.rules.max_discount_bps, 10_000);
    }

    #[test]
    fn test_from_toml() {
        let config = EngineConfig::from_toml_str(
            r#"
            rounding = "deferred"

            [currency]
            code = "USD"
            symbol = "$"

            [rules]
            pincode_digits = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.rounding, RoundingPolicy::Deferred);
        assert_eq!(config.currency.symbol, "$");
        assert_eq!(config.rules.pincode_digits, 5);
        assert_eq!(config.rules.max_discount_bps, 10_000);
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(EngineConfig::from_toml_str("").unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_bad_toml() {
        assert!(matches!(
            EngineConfig::from_toml_str(r#"rounding = "sometimes""#),
            Err(CoreError::InvalidConfig { .. })
        ));
        assert!(EngineConfig::from_toml_str("[rules]\npincode_digits = 0").is_err());
    }

    #[test]
    fn test_env_overrides() {
        let config = EngineConfig::default().with_env(lookup(&[
            ("STOREFRONT_CURRENCY_CODE", "USD"),
            ("STOREFRONT_CURRENCY_SYMBOL", "$"),
            ("STOREFRONT_ROUNDING", "deferred"),
            ("STOREFRONT_PINCODE_DIGITS", "5"),
        ]));

        assert_eq!(config.currency.code, "USD");
        assert_eq!(config.currency.symbol, "$");
        assert_eq!(config.rounding, RoundingPolicy::Deferred);
        assert_eq!(config.rules.pincode_digits, 5);
    }

    fn usd_config() -> EngineConfig {
        EngineConfig::from_toml_str(
            r#"
            [currency]
            code = "USD"
            symbol = "$"
            "#,
        )
        .unwrap()
    }

    fn draft(currency: Option<Currency>) -> OrderDraft {
        serde_json::from_value(serde_json::json!({
            "id": "ORD-9",
            "pricing": {
                "currency": currency,
                "items": [{
                    "id": "l1", "productId": "p1", "productName": "Tote Bag",
                    "productSku": "TOTE-1", "quantity": 1, "unitCost": 5,
                    "availableStock": 1
                }],
                "tax": { "taxType": "cgst_sgst", "cgstRate": 900, "sgstRate": 900 }
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_price_draft_uses_configured_currency() {
        let order = usd_config().price_draft(draft(None)).unwrap();
        assert_eq!(order.pricing.currency, "USD");
    }

    #[test]
    fn test_price_draft_keeps_draft_currency() {
        let eur = Currency {
            code: "EUR".to_string(),
            symbol: "€".to_string(),
        };
        let order = usd_config().price_draft(draft(Some(eur))).unwrap();
        assert_eq!(order.pricing.currency, "EUR");
    }

    #[test]
    fn test_price_draft_uses_configured_rounding() {
        let deferred = EngineConfig {
            rounding: RoundingPolicy::Deferred,
            ..EngineConfig::default()
        };
        // 0.05 at 9% + 9%: 0.059 rounds to 0.06 only when deferred
        assert_eq!(deferred.price_draft(draft(None)).unwrap().pricing.grand_total.cents(), 6);
        assert_eq!(
            EngineConfig::default().price_draft(draft(None)).unwrap().pricing.grand_total.cents(),
            5
        );
    }

    #[test]
    fn test_bad_env_values_are_ignored() {
        let config = EngineConfig::default().with_env(lookup(&[
            ("STOREFRONT_ROUNDING", "sometimes"),
            ("STOREFRONT_PINCODE_DIGITS", "0"),
        ]));
        assert_eq!(config, EngineConfig::default());
    }
}
