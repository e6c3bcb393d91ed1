//! CLI command implementations.

pub mod cart;
pub mod checkout;
pub mod order;
pub mod quote;

use std::path::Path;

use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};

use storefront_commerce::checkout::CheckoutForm;

/// Arguments for the cart command.
#[derive(Args)]
pub struct CartArgs {
    #[command(subcommand)]
    pub command: Option<CartCommand>,
}

#[derive(Subcommand)]
pub enum CartCommand {
    /// List cart lines and the running total.
    Show,
    /// Add a catalog product to the cart.
    Add {
        /// Product ID.
        product: String,

        /// Quantity to add.
        #[arg(short, long, default_value = "1")]
        quantity: i64,

        /// Instructions for this line (e.g. "no onions").
        #[arg(short, long)]
        notes: Option<String>,
    },
    /// Set the quantity of a line; 0 removes it.
    Update {
        /// Product ID.
        product: String,

        /// New quantity.
        quantity: i64,

        /// Replace the line's notes.
        #[arg(short, long)]
        notes: Option<String>,
    },
    /// Remove a line.
    Remove {
        /// Product ID.
        product: String,
    },
    /// Empty the cart.
    Clear,
}

/// Arguments for the quote command.
#[derive(Args)]
pub struct QuoteArgs {
    /// Checkout form (JSON or TOML) to price against.
    #[arg(short, long)]
    pub form: Option<String>,

    /// Delivery zone to price against, overriding the form.
    #[arg(short, long)]
    pub zone: Option<String>,

    /// Discount percentage, e.g. "10" or "12.5%".
    #[arg(short, long)]
    pub discount: Option<String>,
}

/// Arguments for the checkout command.
#[derive(Args)]
pub struct CheckoutArgs {
    /// Checkout form (JSON or TOML) with customer, delivery and payment details.
    #[arg(short, long)]
    pub form: String,

    /// Discount percentage, overriding the form.
    #[arg(short, long)]
    pub discount: Option<String>,

    /// Validate and print the order payload without sending it.
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the order command.
#[derive(Args)]
pub struct OrderArgs {
    #[command(subcommand)]
    pub command: OrderCommand,
}

#[derive(Subcommand)]
pub enum OrderCommand {
    /// Show a placed order.
    Show {
        /// Order ID.
        id: String,
    },
}

/// Read a checkout form from a JSON or TOML file.
pub fn load_form(path: &Path) -> Result<CheckoutForm> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read checkout form: {}", path.display()))?;
    parse_form(&content, path.extension().and_then(|e| e.to_str()))
        .with_context(|| format!("Failed to parse checkout form: {}", path.display()))
}

fn parse_form(content: &str, extension: Option<&str>) -> Result<CheckoutForm> {
    match extension {
        Some("toml") => Ok(toml::from_str(content)?),
        _ => Ok(serde_json::from_str(content)?),
    }
}
