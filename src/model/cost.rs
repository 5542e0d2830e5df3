use crate::model::Amount;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// The cost of a receipt line as the user left it.
///
/// A row that was added but never given a cost is `Unfilled`, which is not the same thing as a
/// confirmed `Entered(0)`. Text that does not parse as a number is kept as `Invalid` so that it can
/// be shown back and flagged instead of silently becoming zero.
#[derive(Debug, Clone, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "value")]
pub enum Cost {
    #[default]
    Unfilled,
    Entered(Amount),
    Invalid(String),
}

impl Cost {
    /// Interprets user input. Blank input is `Unfilled`.
    pub fn parse(input: &str) -> Self {
        if input.trim().is_empty() {
            return Cost::Unfilled;
        }
        match Amount::from_str(input) {
            Ok(amount) => Cost::Entered(amount),
            Err(_) => Cost::Invalid(input.to_string()),
        }
    }

    /// The entered amount, if there is one.
    pub fn amount(&self) -> Option<Amount> {
        match self {
            Cost::Entered(amount) => Some(*amount),
            Cost::Unfilled | Cost::Invalid(_) => None,
        }
    }

    /// The contribution of this cost to a total. Only entered costs count.
    pub fn value_or_zero(&self) -> Decimal {
        self.amount().map(|a| a.value()).unwrap_or(Decimal::ZERO)
    }

    pub fn is_unfilled(&self) -> bool {
        matches!(self, Cost::Unfilled)
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, Cost::Invalid(_))
    }

    pub fn is_zero(&self) -> bool {
        matches!(self, Cost::Entered(amount) if amount.is_zero())
    }
}

impl From<Amount> for Cost {
    fn from(value: Amount) -> Self {
        Cost::Entered(value)
    }
}

impl From<Decimal> for Cost {
    fn from(value: Decimal) -> Self {
        Cost::Entered(Amount::new(value))
    }
}

impl From<i32> for Cost {
    fn from(value: i32) -> Self {
        Cost::from(Decimal::from(value))
    }
}

impl Display for Cost {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Cost::Unfilled => write!(f, "-"),
            Cost::Entered(amount) => write!(f, "{amount}"),
            Cost::Invalid(raw) => write!(f, "{raw}?"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_blank_is_unfilled() {
        assert_eq!(Cost::parse(""), Cost::Unfilled);
        assert_eq!(Cost::parse("   "), Cost::Unfilled);
    }

    #[test]
    fn test_parse_zero_is_entered() {
        let cost = Cost::parse("0");
        assert!(cost.is_zero());
        assert!(!cost.is_unfilled());
    }

    #[test]
    fn test_parse_garbage_is_invalid() {
        let cost = Cost::parse("12a");
        assert_eq!(cost, Cost::Invalid("12a".to_string()));
        assert_eq!(cost.value_or_zero(), Decimal::ZERO);
        assert_eq!(cost.to_string(), "12a?");
    }

    #[test]
    fn test_parse_double_sign_is_invalid() {
        assert_eq!(Cost::parse("--5"), Cost::Invalid("--5".to_string()));
        assert!(Cost::parse("-¥-5").is_invalid());
    }

    #[test]
    fn test_value_or_zero() {
        assert_eq!(Cost::parse("¥1,200").value_or_zero(), Decimal::from(1200));
        assert_eq!(Cost::Unfilled.value_or_zero(), Decimal::ZERO);
    }
}
