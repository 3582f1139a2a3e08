//! Prices

use std::{fmt, ops::Deref};

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{
    Money,
    iso::{Currency, EUR, GBP, USD},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while parsing a price string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PriceError {
    /// The string was not in `AMOUNT CURRENCY` form, or the amount was not a
    /// non-negative number.
    #[error("invalid price: {0}")]
    Invalid(String),

    /// The currency code is not one the storefront knows about.
    #[error("unknown currency code: {0}")]
    UnknownCurrency(String),
}

/// Represents a price in cents/pence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price {
    minor: u64,
}

impl Price {
    /// Creates a new price from minor units.
    pub const fn from_minor(minor: u64) -> Self {
        Price { minor }
    }

    /// Creates a price from whole major units (dollars, pounds).
    pub const fn from_major(major: u64) -> Self {
        Price {
            minor: major.saturating_mul(100),
        }
    }

    /// Price in minor units.
    pub const fn minor(self) -> u64 {
        self.minor
    }

    /// Multiply by a quantity, saturating at `u64::MAX`.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Price {
            minor: self.minor.saturating_mul(u64::from(quantity)),
        }
    }

    /// Convert to a money value in the given currency.
    pub fn to_money(self, currency: &'static Currency) -> Money<'static, Currency> {
        Money::from_minor(i64::try_from(self.minor).unwrap_or(i64::MAX), currency)
    }
}

impl Deref for Price {
    type Target = u64;

    fn deref(&self) -> &Self::Target {
        &self.minor
    }
}

impl std::iter::Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Price::default(), |acc, price| Price {
            minor: acc.minor.saturating_add(price.minor),
        })
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.minor / 100, self.minor % 100)
    }
}

/// Parse price string (e.g., "79.99 USD") into a price and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount is negative or cannot be parsed as a decimal, or if the
/// currency code is not recognized.
pub fn parse_price(s: &str) -> Result<(Price, &'static Currency), PriceError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    let [amount, currency_code] = parts.as_slice() else {
        return Err(PriceError::Invalid(format!(
            "expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| PriceError::Invalid(s.to_string()))?;

    let minor_units = amount
        .checked_mul(Decimal::new(100, 0))
        .and_then(|value| value.round_dp(0).to_u64())
        .ok_or_else(|| PriceError::Invalid(s.to_string()))?;

    let currency = currency_from_code(currency_code)?;

    Ok((Price::from_minor(minor_units), currency))
}

/// Look up one of the supported ISO currencies by alpha code.
///
/// # Errors
///
/// Returns [`PriceError::UnknownCurrency`] for any code other than GBP, USD or EUR.
pub fn currency_from_code(code: &str) -> Result<&'static Currency, PriceError> {
    match code {
        "GBP" => Ok(GBP),
        "USD" => Ok(USD),
        "EUR" => Ok(EUR),
        other => Err(PriceError::UnknownCurrency(other.to_string())),
    }
}

/// Format a minor-unit amount into a currency string.
pub fn format_price(minor_units: i64, currency_code: &str) -> String {
    let abs_minor = minor_units.unsigned_abs();
    let major_units = abs_minor / 100;
    let fractional = abs_minor % 100;
    let sign = if minor_units < 0 { "-" } else { "" };
    let symbol = match currency_code {
        "GBP" => "£",
        "USD" => "$",
        "EUR" => "€",
        _ => "",
    };

    if symbol.is_empty() {
        format!("{sign}{major_units}.{fractional:02} {currency_code}")
    } else {
        format!("{sign}{symbol}{major_units}.{fractional:02}")
    }
}

/// Format a money value the way the storefront displays totals.
pub fn format_money(money: &Money<'_, Currency>) -> String {
    format_price(money.to_minor_units(), money.currency().iso_alpha_code)
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn from_major_converts_to_cents() {
        assert_eq!(Price::from_major(50).minor(), 5000);
    }

    #[test]
    fn price_derefs_to_u64() {
        let price = Price::from_minor(100);

        assert_eq!(*price, 100);
    }

    #[test]
    fn times_multiplies_by_quantity() {
        assert_eq!(Price::from_major(60).times(3), Price::from_major(180));
    }

    #[test]
    fn sum_adds_prices() {
        let total: Price = [Price::from_minor(150), Price::from_minor(250)]
            .into_iter()
            .sum();

        assert_eq!(total.minor(), 400);
    }

    #[test]
    fn display_shows_two_decimal_places() {
        assert_eq!(Price::from_minor(15_005).to_string(), "150.05");
    }

    #[test]
    fn parse_price_reads_amount_and_currency() -> TestResult {
        let (price, currency) = parse_price("79.99 USD")?;

        assert_eq!(price.minor(), 7999);
        assert_eq!(currency, USD);

        Ok(())
    }

    #[test]
    fn parse_price_accepts_gbp_and_eur() -> TestResult {
        let (gbp_price, gbp) = parse_price("1.00 GBP")?;
        let (eur_price, eur) = parse_price("2.50 EUR")?;

        assert_eq!(gbp_price.minor(), 100);
        assert_eq!(gbp, GBP);
        assert_eq!(eur_price.minor(), 250);
        assert_eq!(eur, EUR);

        Ok(())
    }

    #[test]
    fn parse_price_rejects_invalid_format() {
        let result = parse_price("2.99USD");

        assert!(matches!(result, Err(PriceError::Invalid(_))));
    }

    #[test]
    fn parse_price_rejects_negative_amounts() {
        let result = parse_price("-2.99 USD");

        assert!(matches!(result, Err(PriceError::Invalid(_))));
    }

    #[test]
    fn parse_price_rejects_unknown_currency() {
        let result = parse_price("2.99 ABC");

        assert!(matches!(result, Err(PriceError::UnknownCurrency(code)) if code == "ABC"));
    }

    #[test]
    fn format_price_uses_currency_symbol() {
        assert_eq!(format_price(21_000, "USD"), "$210.00");
        assert_eq!(format_price(-150, "GBP"), "-£1.50");
        assert_eq!(format_price(1_234, "JPY"), "12.34 JPY");
    }

    #[test]
    fn to_money_keeps_minor_units() {
        let money = Price::from_major(150).to_money(USD);

        assert_eq!(money.to_minor_units(), 15_000);
        assert_eq!(format_money(&money), "$150.00");
    }
}
