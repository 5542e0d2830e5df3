//! Amount type for handling yen values with optional yen signs.
//!
//! This module provides the `Amount` type which wraps `Decimal` and handles
//! parsing values that may or may not include a yen sign and commas.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// Yen signs accepted when parsing. Input methods produce either the half-width or the full-width
/// sign depending on the keyboard.
const YEN_SIGNS: [char; 2] = ['¥', '￥'];

/// Represents how yen amounts were (or should be) formatted.
///
/// # Examples
///  - `AmountFormat{ yen: true, commas: true }` -> `¥60,000`
///  - `AmountFormat{ yen: false, commas: true }` -> `60,000`
///  - `AmountFormat{ yen: false, commas: false }` -> `60000`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AmountFormat {
    /// Whether a yen sign is present in the formatting.
    yen: bool,
    /// Whether commas are present as thousands separators in the formatting.
    commas: bool,
}

impl Default for AmountFormat {
    fn default() -> Self {
        DEFAULT_FORMAT
    }
}

/// The default format has a yen sign and commas: e.g. `¥60,000`.
const DEFAULT_FORMAT: AmountFormat = AmountFormat {
    yen: true,
    commas: true,
};

/// Represents a yen amount.
///
/// Formatting is remembered so that a value is shown back the way it was typed, but equality and
/// ordering only look at the numeric value. Two receipt lines for `¥1,200` and `1200` are the same
/// purchase.
///
/// # Examples
///
/// ```
/// # use household_book::model::Amount;
/// # use std::str::FromStr;
/// let a = Amount::from_str("1200").unwrap();
/// let b = Amount::from_str("¥1,200").unwrap();
/// assert_eq!(a, b);
/// assert_ne!(a.to_string(), b.to_string());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Amount {
    /// The parsed numerical value.
    value: Decimal,
    /// The way the numerical value was parsed from, or should be written to, a `String`.
    format: AmountFormat,
}

impl Amount {
    /// Creates a new Amount from a Decimal value with default `String` formatting.
    pub const fn new(value: Decimal) -> Self {
        Self {
            value,
            format: DEFAULT_FORMAT,
        }
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.value
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.value().is_zero()
    }

    /// Returns true if the amount is negative.
    pub fn is_negative(&self) -> bool {
        self.value().is_sign_negative() && !self.is_zero()
    }
}

impl PartialEq for Amount {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for Amount {}

impl PartialOrd for Amount {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Amount {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.value.cmp(&other.value)
    }
}

impl std::hash::Hash for Amount {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        // normalize so that 100 and 100.0 hash alike, matching Eq
        self.value.normalize().hash(state)
    }
}

/// An error that can occur when parsing strings into `Amount` values.
pub struct AmountError(rust_decimal::Error);

impl Debug for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl std::error::Error for AmountError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.0)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        // Handle empty string
        if trimmed.is_empty() {
            return Ok(Amount::default());
        }

        let (negative, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest.trim_start()),
            None => (false, trimmed),
        };

        let without_yen = unsigned.trim_start_matches(YEN_SIGNS);
        let yen = without_yen.len() < unsigned.len();

        // at most one sign, and only in front of the yen sign
        if (negative || yen) && without_yen.starts_with(['-', '+']) {
            return Err(AmountError(rust_decimal::Error::from(format!(
                "Misplaced sign in '{trimmed}'"
            ))));
        }

        // Remove commas (thousand separators)
        let without_commas = without_yen.replace(',', "");
        let commas = without_commas.len() < without_yen.len();

        let mut value = Decimal::from_str(&without_commas).map_err(AmountError)?;
        if negative {
            value.set_sign_negative(true);
        }
        Ok(Amount {
            value,
            format: AmountFormat { yen, commas },
        })
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (sign, num) = if self.is_negative() {
            ("-", self.value().abs())
        } else {
            ("", self.value())
        };

        let yen = if self.format.yen { "¥" } else { "" };

        if self.format.commas {
            // yen has no minor unit in everyday use; keep decimals only when they were entered
            let spec = if num.fract().is_zero() { ",.0f" } else { ",.2f" };
            write!(
                f,
                "{sign}{yen}{}",
                format_num::format_num!(spec, num.to_f64().unwrap_or_default())
            )
        } else {
            write!(f, "{sign}{yen}{num}")
        }
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Amount::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_with_yen_sign() {
        let amount = Amount::from_str("¥500").unwrap();
        assert_eq!(amount.value(), dec("500"));
    }

    #[test]
    fn test_parse_full_width_yen_sign() {
        let amount = Amount::from_str("￥1,980").unwrap();
        assert_eq!(amount.value(), dec("1980"));
        assert_eq!(amount.to_string(), "¥1,980");
    }

    #[test]
    fn test_parse_without_yen_sign() {
        let amount = Amount::from_str("500").unwrap();
        assert_eq!(amount.value(), dec("500"));
        assert_eq!(amount.to_string(), "500");
    }

    #[test]
    fn test_parse_negative_with_yen_sign() {
        let amount = Amount::from_str("-¥500").unwrap();
        assert_eq!(amount.value(), dec("-500"));
        assert!(amount.is_negative());
        assert_eq!(amount.to_string(), "-¥500");
    }

    #[test]
    fn test_parse_empty_string() {
        let amount = Amount::from_str("").unwrap();
        assert_eq!(amount.value(), Decimal::ZERO);
    }

    #[test]
    fn test_parse_whitespace() {
        let amount = Amount::from_str("  ¥50  ").unwrap();
        assert_eq!(amount.value(), dec("50"));
    }

    #[test]
    fn test_parse_garbage() {
        assert!(Amount::from_str("twelve").is_err());
        assert!(Amount::from_str("¥").is_err());
        assert!(Amount::from_str("1.2.3").is_err());
    }

    #[test]
    fn test_parse_rejects_second_sign() {
        for s in ["--5", "- -5", "-+5", "-¥-5", "¥-5", "￥+5", "-¥+1,000"] {
            assert!(Amount::from_str(s).is_err(), "{s} should not parse");
        }
        assert_eq!(Amount::from_str("-¥5").unwrap().value(), dec("-5"));
        assert_eq!(Amount::from_str("+5").unwrap().value(), dec("5"));
    }

    #[test]
    fn test_display_default_format() {
        let amount = Amount::new(dec("1234567"));
        assert_eq!(amount.to_string(), "¥1,234,567");
    }

    #[test]
    fn test_display_keeps_entered_decimals() {
        let amount = Amount::new(dec("1200.5"));
        assert_eq!(amount.to_string(), "¥1,200.50");
    }

    #[test]
    fn test_display_zero() {
        assert_eq!(Amount::new(Decimal::ZERO).to_string(), "¥0");
    }

    #[test]
    fn test_equality_ignores_format() {
        let a1 = Amount::from_str("¥1,000").unwrap();
        let a2 = Amount::from_str("1000.00").unwrap();
        assert_eq!(a1, a2);
    }

    #[test]
    fn test_ordering() {
        let a1 = Amount::from_str("¥300").unwrap();
        let a2 = Amount::from_str("¥500").unwrap();
        assert!(a1 < a2);
    }

    #[test]
    fn test_is_zero() {
        assert!(Amount::from_str("¥0").unwrap().is_zero());
        assert!(!Amount::from_str("¥50").unwrap().is_zero());
        assert!(!Amount::from_str("-0").unwrap().is_negative());
    }

    #[test]
    fn test_serde() {
        let amount = Amount::new(dec("50"));
        let json = serde_json::to_string(&amount).unwrap();
        assert_eq!(json, "\"¥50\"");
        let back: Amount = serde_json::from_str("\"1,050\"").unwrap();
        assert_eq!(back.value(), dec("1050"));
    }
}
