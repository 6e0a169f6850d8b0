//! # Tally Register
//!
//! Command-line checkout: scans product codes in order and prints a receipt.
//!
//! ## Usage
//! ```text
//! tally-register --config demos/pricing.toml VOUCHER TSHIRT VOUCHER
//!
//! Demo Store
//! ──────────────────────────────────────────────
//! VOUCHER    Gift Card                   5.00    -5.00
//! TSHIRT     Summer T-Shirt             20.00
//! VOUCHER    Gift Card                   5.00
//! ──────────────────────────────────────────────
//! Savings                                5.00 EUR
//! Total                                 25.00 EUR
//! ```
//!
//! Unknown codes are reported and skipped. Rules that fail evaluation are
//! reported once; every other rule still prices the cart.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tally_checkout::{Catalog, Checkout, CheckoutError, PricingConfig};
use tally_core::{CartItem, Money};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Tally command-line register
#[derive(Parser, Debug)]
#[command(name = "tally-register")]
#[command(about = "Scan product codes and price them with the store's pricing rules")]
#[command(version)]
struct Cli {
    /// Pricing configuration file (defaults to the platform config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// List the catalog and the pricing rules, then exit
    #[arg(long)]
    list: bool,

    /// Product codes, in scan order
    codes: Vec<String>,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Register failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Initializes the tracing subscriber.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=tally_core=trace` - Show trace for the rule engine only
/// - Default: INFO, DEBUG for tally crates
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("info,tally_core=debug,tally_checkout=debug,tally_register=debug")
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<(), CheckoutError> {
    let config = PricingConfig::load(cli.config.clone())?;
    let catalog = config.catalog()?;
    let checkout = config.checkout()?;

    if cli.list {
        print!("{}", render_listing(&config, &catalog));
        return Ok(());
    }

    let failed_rules = scan_codes(&checkout, &catalog, &cli.codes)?;
    for rule in &failed_rules {
        eprintln!("warning: pricing rule '{rule}' could not be evaluated and was skipped");
    }

    info!(
        lines = checkout.len(),
        total = %checkout.total(),
        "Sale complete"
    );
    print!(
        "{}",
        render_receipt(
            &config.store.name,
            &checkout.cart_items(),
            checkout.currency()
        )
    );
    Ok(())
}

/// Scans every known code. Returns the names of rules that failed evaluation.
fn scan_codes(
    checkout: &Checkout,
    catalog: &Catalog,
    codes: &[String],
) -> Result<BTreeSet<String>, CheckoutError> {
    let mut failed_rules = BTreeSet::new();

    for code in codes {
        let item = match catalog.item(code) {
            Ok(item) => item,
            Err(CheckoutError::UnknownProduct(code)) => {
                warn!(%code, "Unknown product code, skipping");
                eprintln!("unknown product code: {code} (skipped)");
                continue;
            }
            Err(e) => return Err(e),
        };

        match checkout.scan(item) {
            Ok(_) => {}
            Err(e) if !e.rule_failures().is_empty() => {
                failed_rules.extend(e.rule_failures().iter().map(|f| f.rule.clone()));
            }
            Err(e) => return Err(e),
        }
    }

    Ok(failed_rules)
}

const RULE: &str = "──────────────────────────────────────────────";

fn render_receipt(store: &str, items: &[CartItem], currency: &str) -> String {
    let mut out = format!("{store}\n{RULE}\n");

    for item in items {
        let price = format!("{:>9}", item.price().to_string());
        if item.discount().is_zero() {
            out.push_str(&format!("{:<10} {:<22} {price}\n", item.code(), item.name()));
        } else {
            out.push_str(&format!(
                "{:<10} {:<22} {price} {:>8}\n",
                item.code(),
                item.name(),
                format!("-{}", item.discount())
            ));
        }
    }

    let savings: Money = items.iter().map(CartItem::discount).sum();
    let total: Money = items.iter().map(CartItem::net_price).sum();
    out.push_str(&format!("{RULE}\n"));
    if !savings.is_zero() {
        out.push_str(&format!("{:<33} {:>9} {currency}\n", "Savings", savings.to_string()));
    }
    out.push_str(&format!("{:<33} {:>9} {currency}\n", "Total", total.to_string()));
    out
}

fn render_listing(config: &PricingConfig, catalog: &Catalog) -> String {
    let mut out = format!("{} ({})\n{RULE}\n", config.store.name, catalog.currency());
    for product in catalog.products() {
        out.push_str(&format!(
            "{:<10} {:<22} {:>9}\n",
            product.code,
            product.name,
            product.price.to_string()
        ));
    }
    out.push_str(&format!("{RULE}\n"));
    for rule in &config.rules {
        out.push_str(&format!("rule {}\n", rule.name));
    }
    out
}
