//! Type-safe price representation using decimal arithmetic.
//!
//! The backend stores prices as floats and sends them as JSON numbers. They are
//! read into a [`Decimal`] here so that filtering bounds, overrides and display
//! rounding never go through binary floating point on the client side.

use core::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Price`] from user input.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input is not a decimal number.
    #[error("invalid price: {0}")]
    Invalid(String),
    /// The input is below zero.
    #[error("price cannot be negative")]
    Negative,
}

/// A non-negative amount in the store currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(#[serde(serialize_with = "rust_decimal::serde::float::serialize")] Decimal);

impl Price {
    /// A zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from a whole number of currency units.
    #[must_use]
    pub fn from_units(units: i64) -> Self {
        Self(Decimal::from(units))
    }

    /// The underlying amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Format with a currency symbol and two decimal places (e.g. `$19.90`).
    #[must_use]
    pub fn format_with(&self, symbol: &str) -> String {
        format!("{symbol}{:.2}", self.0.round_dp(2))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_with("$"))
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount =
            Decimal::from_str(s.trim()).map_err(|_| PriceError::Invalid(s.to_owned()))?;
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }
        Ok(Self(amount))
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserializes_json_numbers_and_strings() {
        let from_number: Price = serde_json::from_str("1999.5").unwrap();
        let from_string: Price = serde_json::from_str("\"1999.5\"").unwrap();
        assert_eq!(from_number, from_string);
        assert_eq!(from_number.to_string(), "$1999.50");
    }

    #[test]
    fn test_serializes_as_json_number() {
        let price: Price = "49.99".parse().unwrap();
        assert_eq!(serde_json::to_string(&price).unwrap(), "49.99");
    }

    #[test]
    fn test_parse_rejects_garbage_and_negatives() {
        assert!(matches!("abc".parse::<Price>(), Err(PriceError::Invalid(_))));
        assert_eq!("-1".parse::<Price>(), Err(PriceError::Negative));
        assert_eq!("0".parse::<Price>().unwrap(), Price::ZERO);
    }

    #[test]
    fn test_format_with_symbol_rounds() {
        let price: Price = "1250.456".parse().unwrap();
        assert_eq!(price.format_with("₹"), "₹1250.46");
    }
}
