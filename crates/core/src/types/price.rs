//! Type-safe price representation using decimal arithmetic.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., ringgit, not sen).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create a price from an amount in minor units (sen, cents).
    #[must_use]
    pub fn from_minor(minor: i64, currency_code: CurrencyCode) -> Self {
        Self::new(Decimal::new(minor, 2), currency_code)
    }

    /// A zero amount in the given currency.
    #[must_use]
    pub const fn zero(currency_code: CurrencyCode) -> Self {
        Self::new(Decimal::ZERO, currency_code)
    }

    /// Parse a decimal string as returned by the commerce API (e.g. `"20.0"`).
    ///
    /// # Errors
    ///
    /// Returns `PriceError::InvalidAmount` if the amount is not a decimal.
    pub fn parse(amount: &str, currency_code: CurrencyCode) -> Result<Self, PriceError> {
        let amount = Decimal::from_str(amount.trim())
            .map_err(|_| PriceError::InvalidAmount(amount.to_string()))?;
        Ok(Self::new(amount, currency_code))
    }

    /// Multiply the price by a quantity.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self::new(self.amount * Decimal::from(quantity), self.currency_code)
    }

    /// Add two prices, keeping the currency of `self`.
    #[must_use]
    pub fn plus(self, other: Self) -> Self {
        Self::new(self.amount + other.amount, self.currency_code)
    }

    /// Whether the amount is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Format for display (e.g., "RM 19.90").
    #[must_use]
    pub fn display(&self) -> String {
        format!(
            "{}{:.2}",
            self.currency_code.symbol(),
            self.amount.round_dp(2)
        )
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// Price parsing errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriceError {
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    #[error("unsupported currency: {0}")]
    UnsupportedCurrency(String),
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    MYR,
    SGD,
    USD,
}

impl CurrencyCode {
    /// Display symbol including any separating space.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::MYR => "RM ",
            Self::SGD => "S$",
            Self::USD => "$",
        }
    }

    /// ISO code string.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::MYR => "MYR",
            Self::SGD => "SGD",
            Self::USD => "USD",
        }
    }
}

impl FromStr for CurrencyCode {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MYR" => Ok(Self::MYR),
            "SGD" => Ok(Self::SGD),
            "USD" => Ok(Self::USD),
            other => Err(PriceError::UnsupportedCurrency(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_myr() {
        let price = Price::from_minor(2000, CurrencyCode::MYR);
        assert_eq!(price.display(), "RM 20.00");
    }

    #[test]
    fn test_parse_api_amount() {
        let price = Price::parse("20.0", CurrencyCode::MYR).unwrap();
        assert_eq!(price, Price::from_minor(2000, CurrencyCode::MYR));
        assert!(Price::parse("twenty", CurrencyCode::MYR).is_err());
    }

    #[test]
    fn test_times_and_plus() {
        let unit = Price::from_minor(2000, CurrencyCode::MYR);
        let line = unit.times(2);
        assert_eq!(line.display(), "RM 40.00");
        assert_eq!(line.plus(Price::zero(CurrencyCode::MYR)), line);
    }

    #[test]
    fn test_currency_from_str() {
        assert_eq!("MYR".parse::<CurrencyCode>().unwrap(), CurrencyCode::MYR);
        assert!(matches!(
            "EUR".parse::<CurrencyCode>(),
            Err(PriceError::UnsupportedCurrency(_))
        ));
    }
}
