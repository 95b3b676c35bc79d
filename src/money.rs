//! Money parsing helpers

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{
    Money,
    iso::{self, Currency},
};
use thiserror::Error;

/// Errors raised while turning text into money.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyParseError {
    /// Text is not in the "AMOUNT CURRENCY" format or the amount is not a number.
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Negative or too large to be represented in minor units.
    #[error("Invalid amount: {0}")]
    InvalidAmount(Decimal),

    /// Currency code this crate does not price in.
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),
}

/// Look up a supported currency by ISO code.
pub fn currency_from_code(code: &str) -> Option<&'static Currency> {
    match code {
        "CNY" => Some(iso::CNY),
        "HKD" => Some(iso::HKD),
        "USD" => Some(iso::USD),
        "EUR" => Some(iso::EUR),
        "GBP" => Some(iso::GBP),
        _ => None,
    }
}

/// Convert a non-negative decimal amount into money, rounding half a minor
/// unit away from zero.
///
/// # Errors
///
/// Returns [`MoneyParseError::InvalidAmount`] for negative amounts or amounts
/// that do not fit in minor units.
pub fn money_from_decimal(
    amount: Decimal,
    currency: &Currency,
) -> Result<Money<'_, Currency>, MoneyParseError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(MoneyParseError::InvalidAmount(amount));
    }

    let minor_units = 10_i64
        .checked_pow(currency.exponent)
        .and_then(|scale| amount.checked_mul(Decimal::from(scale)))
        .and_then(|value| {
            value
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                .to_i64()
        })
        .ok_or(MoneyParseError::InvalidAmount(amount))?;

    Ok(Money::from_minor(minor_units, currency))
}

/// Parse a price string (e.g., "28.00 CNY") into money.
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount cannot be parsed or is negative, or if the currency code is
/// not recognized.
pub fn parse_price(s: &str) -> Result<Money<'static, Currency>, MoneyParseError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    let [amount, code] = parts.as_slice() else {
        return Err(MoneyParseError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| MoneyParseError::InvalidPrice(s.to_string()))?;

    let currency =
        currency_from_code(code).ok_or_else(|| MoneyParseError::UnknownCurrency((*code).to_string()))?;

    money_from_decimal(amount, currency)
}
