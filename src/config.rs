//! Configuration for the `heikeji-cart` command line tool

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use rusty_money::iso::Currency;
use thiserror::Error;

use crate::{
    money::{MoneyParseError, currency_from_code, money_from_decimal},
    pricing::DeliveryPolicy,
};

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Currency code is not supported
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Configured currency differs from the currency the cart is priced in
    #[error("Configured currency {configured} does not match cart currency {cart}")]
    CurrencyMismatch {
        /// Currency from `--currency` / `CART_CURRENCY`
        configured: String,

        /// Currency of the loaded cart
        cart: String,
    },

    /// Fee or minimum order cannot be represented
    #[error(transparent)]
    Amount(#[from] MoneyParseError),
}

/// Cart tool configuration
#[derive(Debug, Parser)]
#[command(name = "heikeji-cart", about = "Heikeji cart aggregator", long_about = None)]
pub struct CartConfig {
    /// Directory holding the `merchants/`, `products/` and `carts/` fixture sets
    #[arg(long, env = "CART_FIXTURES_DIR", default_value = "./fixtures")]
    pub fixtures_dir: PathBuf,

    /// ISO code of the cart currency
    #[arg(long, env = "CART_CURRENCY", default_value = "CNY")]
    pub currency: String,

    /// Flat delivery fee charged once per merchant
    #[arg(long, env = "CART_DELIVERY_FEE", default_value = "2.00")]
    pub delivery_fee: Decimal,

    /// Minimum order total, delivery included
    #[arg(long, env = "CART_MINIMUM_ORDER", default_value = "15.00")]
    pub minimum_order: Decimal,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Commands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the checkout receipt for a fixture set
    Receipt {
        /// Fixture set name
        #[arg(short, long, default_value = "canteen")]
        fixture: String,
    },

    /// List cart lines that exceed the available stock
    Stock {
        /// Fixture set name
        #[arg(short, long, default_value = "canteen")]
        fixture: String,
    },
}

impl CartConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Resolve the configured currency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownCurrency`] for unsupported codes.
    pub fn currency(&self) -> Result<&'static Currency, ConfigError> {
        currency_from_code(&self.currency)
            .ok_or_else(|| ConfigError::UnknownCurrency(self.currency.clone()))
    }

    /// Check that a cart priced in `cart_currency` can be totalled with the
    /// configured policy.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownCurrency`] for unsupported codes and
    /// [`ConfigError::CurrencyMismatch`] when the currencies differ.
    pub fn check_currency(&self, cart_currency: &Currency) -> Result<(), ConfigError> {
        let configured = self.currency()?;

        if configured == cart_currency {
            Ok(())
        } else {
            Err(ConfigError::CurrencyMismatch {
                configured: configured.iso_alpha_code.to_string(),
                cart: cart_currency.iso_alpha_code.to_string(),
            })
        }
    }

    /// Build the delivery policy from the configured amounts.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the currency is unknown or an amount is
    /// negative.
    pub fn delivery_policy(&self) -> Result<DeliveryPolicy<'static>, ConfigError> {
        let currency = self.currency()?;

        Ok(DeliveryPolicy::new(
            money_from_decimal(self.delivery_fee, currency)?,
            money_from_decimal(self.minimum_order, currency)?,
        ))
    }
}
