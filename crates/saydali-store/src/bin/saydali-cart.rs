//! # Saydali Cart Inspector
//!
//! Reads and resets the persisted cart and browsing history of a local
//! storefront profile.
//!
//! ## Usage
//! ```bash
//! # Show cart lines and totals
//! cargo run -p saydali-store --bin saydali-cart -- show
//!
//! # Show recently viewed products
//! cargo run -p saydali-store --bin saydali-cart -- history
//!
//! # Reset state
//! cargo run -p saydali-store --bin saydali-cart -- clear-cart
//! cargo run -p saydali-store --bin saydali-cart -- clear-history
//!
//! # Use a specific config file
//! cargo run -p saydali-store --bin saydali-cart -- --config ./saydali.toml show
//! ```

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use chrono::DateTime;
use saydali_store::{init_tracing, Session, StoreConfig, StoreResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Show,
    History,
    ClearCart,
    ClearHistory,
}

fn print_help() {
    println!("Saydali Cart Inspector");
    println!();
    println!("Usage: saydali-cart [OPTIONS] <COMMAND>");
    println!();
    println!("Commands:");
    println!("  show             Print cart lines and totals (default)");
    println!("  history          Print recently viewed products");
    println!("  clear-cart       Empty the persisted cart");
    println!("  clear-history    Empty the persisted browsing history");
    println!();
    println!("Options:");
    println!("  -c, --config <PATH>  Config file (default: platform config dir)");
    println!("  -h, --help           Show this help message");
}

fn main() -> ExitCode {
    init_tracing();

    let args: Vec<String> = env::args().collect();

    let mut config_path: Option<PathBuf> = None;
    let mut command = Command::Show;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                } else {
                    eprintln!("--config needs a path");
                    return ExitCode::from(2);
                }
            }
            "--help" | "-h" => {
                print_help();
                return ExitCode::SUCCESS;
            }
            "show" => command = Command::Show,
            "history" => command = Command::History,
            "clear-cart" => command = Command::ClearCart,
            "clear-history" => command = Command::ClearHistory,
            other => {
                eprintln!("Unknown argument: {}", other);
                print_help();
                return ExitCode::from(2);
            }
        }
        i += 1;
    }

    match run(config_path, command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("✗ {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(config_path: Option<PathBuf>, command: Command) -> StoreResult<()> {
    let config = StoreConfig::load(config_path)?;
    let mut session = Session::open(&config)?;

    match command {
        Command::Show => show_cart(&config, &session),
        Command::History => show_history(&session),
        Command::ClearCart => {
            session.cart.clear()?;
            println!("✓ Cart cleared");
        }
        Command::ClearHistory => {
            session.history.clear()?;
            println!("✓ History cleared");
        }
    }

    Ok(())
}

fn show_cart(config: &StoreConfig, session: &Session) {
    let items = session.cart.items();
    if items.is_empty() {
        println!("Cart is empty");
        return;
    }

    for item in items {
        let variant = [item.color.as_str(), item.size.as_str()]
            .iter()
            .filter(|v| !v.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" / ");
        println!(
            "{:>3} × {:<40} {:<16} {:>14}",
            item.quantity,
            item.name,
            variant,
            config.format_money(item.line_total())
        );
    }

    let totals = session.cart.totals();
    println!("{}", "─".repeat(78));
    println!("{:<62}{:>16}", "Subtotal", config.format_money(totals.subtotal));
    println!("{:<62}{:>16}", "Tax", config.format_money(totals.tax));
    println!("{:<62}{:>16}", "Shipping", config.format_money(totals.shipping));
    println!("{:<62}{:>16}", "Total", config.format_money(totals.total));
}

fn show_history(session: &Session) {
    let items = session.history.items();
    if items.is_empty() {
        println!("No recently viewed products");
        return;
    }

    for (n, item) in items.iter().enumerate() {
        let viewed = DateTime::from_timestamp_millis(item.timestamp)
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!("{:>2}. {:<40} {:<20} {}", n + 1, item.name, item.category, viewed);
    }
}
