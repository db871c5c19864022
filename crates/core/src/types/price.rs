//! Price parsing and formatting using decimal arithmetic.
//!
//! Catalog prices are stored as the text found in the source data. They are
//! parsed on demand, so a malformed value only affects the computation that
//! touches it.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Parse a price field into a decimal amount.
///
/// Returns `None` for empty or non-numeric text.
#[must_use]
pub fn parse_amount(text: &str) -> Option<Decimal> {
    text.trim().parse::<Decimal>().ok()
}

/// Fraction of the list price saved: `(price - discount_price) / price`.
///
/// A zero or unparsable price yields zero so that the value can always be
/// used as a sort key. Arithmetic overflow also yields zero.
#[must_use]
pub fn discount_fraction(price: &str, discount_price: &str) -> Decimal {
    let (Some(price), Some(discount)) = (parse_amount(price), parse_amount(discount_price)) else {
        return Decimal::ZERO;
    };
    if price.is_zero() {
        return Decimal::ZERO;
    }
    price
        .checked_sub(discount)
        .and_then(|saved| saved.checked_div(price))
        .unwrap_or(Decimal::ZERO)
}

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., rupees, not paise).
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

    /// Create a price in the catalog's default currency.
    #[must_use]
    pub fn catalog(amount: Decimal) -> Self {
        Self::new(amount, CurrencyCode::default())
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:.2}", self.currency_code.symbol(), self.amount)
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    INR,
    USD,
    EUR,
    GBP,
}

impl CurrencyCode {
    /// Display symbol for the currency.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::INR => "₹",
            Self::USD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("50"), Some(Decimal::new(50, 0)));
        assert_eq!(parse_amount(" 12.50 "), Some(Decimal::new(1250, 2)));
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("free"), None);
    }

    #[test]
    fn test_discount_fraction() {
        assert_eq!(discount_fraction("100", "80"), Decimal::new(2, 1));
        assert_eq!(discount_fraction("100", "95"), Decimal::new(5, 2));
        assert!(discount_fraction("100", "80") > discount_fraction("100", "95"));
    }

    #[test]
    fn test_discount_fraction_zero_price_is_zero() {
        assert_eq!(discount_fraction("0", "0"), Decimal::ZERO);
        assert_eq!(discount_fraction("0", "10"), Decimal::ZERO);
        assert_eq!(discount_fraction("n/a", "10"), Decimal::ZERO);
    }

    #[test]
    fn test_discount_fraction_overflow_is_zero() {
        let max = "79228162514264337593543950335";
        let min = "-79228162514264337593543950335";
        assert_eq!(discount_fraction(max, min), Decimal::ZERO);
        assert_eq!(discount_fraction(min, max), Decimal::ZERO);
    }

    #[test]
    fn test_price_display() {
        let price = Price::catalog(Decimal::new(100, 0));
        assert_eq!(price.to_string(), "₹100.00");

        let price = Price::new(Decimal::new(1999, 2), CurrencyCode::USD);
        assert_eq!(price.to_string(), "$19.99");
    }
}
