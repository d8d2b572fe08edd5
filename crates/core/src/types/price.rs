//! Price value object with ingestion-boundary normalization.
//!
//! The remote product API is inconsistent about money: the same field arrives
//! as a JSON number (`249.9`), a plain numeric string (`"249.90"`), or a
//! currency-formatted string with a symbol and locale separators
//! (`"₺1.234,56"`). All of those are normalized into a [`Price`] exactly once
//! when the payload is deserialized; everything downstream does decimal
//! arithmetic on the canonical value and never re-parses strings.

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::de::{Deserializer, Error as DeError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when normalizing a price.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PriceError {
    /// The input had no recognizable numeric content.
    #[error("unparsable price: {0:?}")]
    Unparsable(String),

    /// Unit prices are non-negative by contract.
    #[error("negative price: {0}")]
    Negative(Decimal),
}

/// A non-negative unit price in the store's currency.
///
/// Serializes as a decimal string (via `rust_decimal`'s string serde), so
/// persisted cart snapshots stay exact. Deserializes from a number or any
/// currency-formatted string the API is known to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if the amount is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self(amount))
    }

    /// Normalize a currency-formatted string into a price.
    ///
    /// Accepts plain decimals (`"249.99"`), symbol-prefixed values
    /// (`"$1,234.56"`), and comma-decimal locales (`"₺1.234,56"`). When both
    /// separators are present, the rightmost one is the decimal separator.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Unparsable`] if no amount can be extracted, or
    /// [`PriceError::Negative`] for negative amounts.
    pub fn parse(input: &str) -> Result<Self, PriceError> {
        let digits: String = input
            .chars()
            .filter(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '-'))
            .collect();
        if digits.is_empty() {
            return Err(PriceError::Unparsable(input.to_string()));
        }

        let cleaned = match (digits.rfind('.'), digits.rfind(',')) {
            (Some(dot), Some(comma)) => {
                let (decimal_sep, thousands_sep) = if dot > comma { ('.', ',') } else { (',', '.') };
                digits
                    .chars()
                    .filter(|&c| c != thousands_sep)
                    .map(|c| if c == decimal_sep { '.' } else { c })
                    .collect()
            }
            // A single comma is a decimal separator; repeated commas group thousands.
            (None, Some(_)) => {
                if digits.matches(',').count() == 1 {
                    digits.replace(',', ".")
                } else {
                    digits.replace(',', "")
                }
            }
            // Repeated dots can only be thousands grouping.
            (Some(_), None) if digits.matches('.').count() > 1 => digits.replace('.', ""),
            _ => digits,
        };

        let amount: Decimal = cleaned
            .parse()
            .map_err(|_| PriceError::Unparsable(input.to_string()))?;
        Self::new(amount)
    }

    /// The decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Extended price for a quantity of units.
    #[must_use]
    pub fn line_total(&self, quantity: u32) -> Decimal {
        self.0 * Decimal::from(quantity)
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PriceRepr {
    Number(f64),
    Text(String),
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match PriceRepr::deserialize(deserializer)? {
            PriceRepr::Number(value) => {
                let amount = Decimal::from_f64(value)
                    .ok_or_else(|| D::Error::custom(format!("price out of range: {value}")))?;
                Self::new(amount.normalize()).map_err(D::Error::custom)
            }
            PriceRepr::Text(text) => Self::parse(&text).map_err(D::Error::custom),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_plain_decimal() {
        assert_eq!(Price::parse("249.99").unwrap().amount(), dec("249.99"));
    }

    #[test]
    fn test_parse_comma_decimal_locale() {
        assert_eq!(Price::parse("₺1.234,56").unwrap().amount(), dec("1234.56"));
        assert_eq!(Price::parse("249,90 TL").unwrap().amount(), dec("249.90"));
    }

    #[test]
    fn test_parse_dot_decimal_locale() {
        assert_eq!(Price::parse("$1,234.56").unwrap().amount(), dec("1234.56"));
        assert_eq!(Price::parse("1,234,567.89").unwrap().amount(), dec("1234567.89"));
    }

    #[test]
    fn test_parse_thousands_only() {
        assert_eq!(Price::parse("1.234.567").unwrap().amount(), dec("1234567"));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(
            Price::parse("free!"),
            Err(PriceError::Unparsable("free!".to_string()))
        );
    }

    #[test]
    fn test_parse_rejects_negative() {
        assert!(matches!(Price::parse("-5.00"), Err(PriceError::Negative(_))));
    }

    #[test]
    fn test_display_two_decimals() {
        assert_eq!(Price::parse("100").unwrap().to_string(), "100.00");
        assert_eq!(Price::parse("19.9").unwrap().to_string(), "19.90");
    }

    #[test]
    fn test_deserialize_number_and_string() {
        let from_number: Price = serde_json::from_str("199.9").unwrap();
        assert_eq!(from_number.amount(), dec("199.9"));

        let from_int: Price = serde_json::from_str("100").unwrap();
        assert_eq!(from_int.amount(), dec("100"));

        let from_text: Price = serde_json::from_str("\"₺1.234,56\"").unwrap();
        assert_eq!(from_text.amount(), dec("1234.56"));
    }

    #[test]
    fn test_serialize_as_decimal_string() {
        let price = Price::parse("19.90").unwrap();
        assert_eq!(serde_json::to_string(&price).unwrap(), "\"19.90\"");
    }

    #[test]
    fn test_line_total() {
        let price = Price::parse("19.99").unwrap();
        assert_eq!(price.line_total(3), dec("59.97"));
    }
}
