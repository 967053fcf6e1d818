//! # Order Price Checker
//!
//! Prices an order draft and runs the validator over the result.
//!
//! ## Usage
//! ```bash
//! # Price and fully validate
//! cargo run -p storefront-core --bin price-order -- --file order.json
//!
//! # Draft check with deferred rounding
//! cargo run -p storefront-core --bin price-order -- \
//!     --file order.json --mode minimal --rounding deferred
//!
//! # Settings from a file (STOREFRONT_* variables still win)
//! cargo run -p storefront-core --bin price-order -- --file order.json --config engine.toml
//! ```
//!
//! Prints `{ "order": ..., "violations": [...] }` to stdout. Logs go to
//! stderr, filtered by `RUST_LOG`. Exits with status 1 when any rule is
//! violated.

use std::env;
use std::fs;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use storefront_core::{validate_order_with, EngineConfig, OrderDraft, RoundingPolicy, ValidationMode};

fn print_help() {
    println!("Storefront Order Price Checker");
    println!();
    println!("Usage: price-order --file <PATH> [OPTIONS]");
    println!();
    println!("Options:");
    println!("  -f, --file <PATH>        Order draft JSON to price (required)");
    println!("  -m, --mode <MODE>        full | minimal (default: full)");
    println!("  -r, --rounding <POLICY>  per-stage | deferred (default: from config)");
    println!("  -c, --config <PATH>      engine.toml with currency and rule settings");
    println!("  -h, --help               Show this help message");
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut file: Option<String> = None;
    let mut config_path: Option<String> = None;
    let mut mode = ValidationMode::Full;
    let mut rounding: Option<RoundingPolicy> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--file" | "-f" => {
                if i + 1 < args.len() {
                    file = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--mode" | "-m" => {
                if i + 1 < args.len() {
                    mode = args[i + 1].parse()?;
                    i += 1;
                }
            }
            "--rounding" | "-r" => {
                if i + 1 < args.len() {
                    rounding = Some(args[i + 1].parse()?);
                    i += 1;
                }
            }
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config_path = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            other => warn!(argument = %other, "Ignoring unknown argument"),
        }
        i += 1;
    }

    let Some(file) = file else {
        print_help();
        return Err("missing --file <PATH>".into());
    };

    let mut config = match config_path {
        Some(path) => EngineConfig::from_toml_str(&fs::read_to_string(&path)?)?,
        None => EngineConfig::default(),
    }
    .with_env(|key| env::var(key).ok());
    if let Some(rounding) = rounding {
        config.rounding = rounding;
    }

    let draft: OrderDraft = serde_json::from_str(&fs::read_to_string(&file)?)?;
    let order = config.price_draft(draft)?;
    let violations = validate_order_with(&order, mode, &config.rules);

    info!(
        order_id = %order.id,
        grand_total = %order.pricing.grand_total.format(&config.currency),
        balance_due = %order.pricing.balance_due.format(&config.currency),
        violations = violations.len(),
        %mode,
        "Order priced"
    );

    let report = serde_json::json!({
        "order": order,
        "violations": violations,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    if !violations.is_empty() {
        std::process::exit(1);
    }

    Ok(())
}
