//! The rules a day's receipt must pass before it is sent to the backend.

use crate::model::DailyReceipt;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Why a day's receipt cannot be registered. Serialized as the snake_case code.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    #[error("exists_empty_store_name")]
    ExistsEmptyStoreName,
    #[error("exists_zero_receipt")]
    ExistsZeroReceipt,
    #[error("exists_invalid_receipt")]
    ExistsInvalidReceipt,
    #[error("exists_unfilled_receipt")]
    ExistsUnfilledReceipt,
    #[error("exists_duplicate_receipt")]
    ExistsDuplicateReceipt,
    #[error("exists_same_store_receipt")]
    ExistsSameStoreReceipt,
}

impl Rejection {
    /// The message shown to the user.
    pub fn message(&self) -> &'static str {
        match self {
            Rejection::ExistsEmptyStoreName => "Enter a store name for every receipt.",
            Rejection::ExistsZeroReceipt => "A receipt has a cost of zero. Enter the amount paid.",
            Rejection::ExistsInvalidReceipt => "A receipt has a cost that is not a number.",
            Rejection::ExistsUnfilledReceipt => {
                "A receipt has no cost yet. Enter the amount paid or remove the row."
            }
            Rejection::ExistsDuplicateReceipt => {
                "The same receipt was entered twice. Remove one of them."
            }
            Rejection::ExistsSameStoreReceipt => {
                "A store appears more than once with different costs. Combine them into one receipt."
            }
        }
    }
}

/// What to do with a line whose cost was never entered.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnfilledPolicy {
    /// Block the submission with `Rejection::ExistsUnfilledReceipt`.
    #[default]
    Reject,
    /// Send the line with a cost of zero.
    SubmitAsZero,
}

serde_plain::derive_display_from_serialize!(UnfilledPolicy);
serde_plain::derive_fromstr_from_deserialize!(UnfilledPolicy);

type Rule = fn(&DailyReceipt, UnfilledPolicy) -> bool;

/// Checks `daily` against each rule in turn and reports the first one it breaks.
///
/// The order is: empty store name, zero cost, invalid cost, unfilled cost (only under
/// `UnfilledPolicy::Reject`), duplicate line, same store with different costs.
pub fn validate(daily: &DailyReceipt, policy: UnfilledPolicy) -> Result<(), Rejection> {
    let rules: [(Rejection, Rule); 6] = [
        (Rejection::ExistsEmptyStoreName, |d, _| d.is_exist_empty_store()),
        (Rejection::ExistsZeroReceipt, |d, _| d.is_exist_zero_cost()),
        (Rejection::ExistsInvalidReceipt, |d, _| d.is_exist_invalid_cost()),
        (Rejection::ExistsUnfilledReceipt, |d, policy| {
            policy == UnfilledPolicy::Reject && d.is_exist_unfilled_cost()
        }),
        (Rejection::ExistsDuplicateReceipt, |d, _| d.is_duplicate()),
        (Rejection::ExistsSameStoreReceipt, |d, _| d.is_exist_same_store()),
    ];
    match rules
        .into_iter()
        .find(|(_, broken)| broken(daily, policy))
    {
        Some((rejection, _)) => {
            debug!("Receipt for {} rejected: {rejection}", daily.date());
            Err(rejection)
        }
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Cost, ReceiptLine};
    use chrono::NaiveDate;

    fn day(lines: Vec<ReceiptLine>) -> DailyReceipt {
        DailyReceipt::new(NaiveDate::from_ymd_opt(2024, 2, 14).unwrap(), lines)
    }

    #[test]
    fn test_valid_day_passes() {
        let d = day(vec![ReceiptLine::new("A", 100), ReceiptLine::new("B", 200)]);
        assert_eq!(validate(&d, UnfilledPolicy::Reject), Ok(()));
    }

    #[test]
    fn test_empty_day_passes() {
        assert_eq!(validate(&day(vec![]), UnfilledPolicy::Reject), Ok(()));
    }

    #[test]
    fn test_empty_store_wins_over_zero_cost() {
        let d = day(vec![ReceiptLine::new("", 100), ReceiptLine::new("B", 0)]);
        assert_eq!(
            validate(&d, UnfilledPolicy::Reject),
            Err(Rejection::ExistsEmptyStoreName)
        );
    }

    #[test]
    fn test_zero_cost_wins_over_invalid() {
        let d = day(vec![
            ReceiptLine::new("A", Cost::parse("x")),
            ReceiptLine::new("B", 0),
        ]);
        assert_eq!(
            validate(&d, UnfilledPolicy::Reject),
            Err(Rejection::ExistsZeroReceipt)
        );
    }

    #[test]
    fn test_invalid_cost() {
        let d = day(vec![ReceiptLine::new("A", Cost::parse("x"))]);
        assert_eq!(
            validate(&d, UnfilledPolicy::SubmitAsZero),
            Err(Rejection::ExistsInvalidReceipt)
        );
    }

    #[test]
    fn test_unfilled_depends_on_policy() {
        let d = day(vec![ReceiptLine::new("A", Cost::Unfilled)]);
        assert_eq!(
            validate(&d, UnfilledPolicy::Reject),
            Err(Rejection::ExistsUnfilledReceipt)
        );
        assert_eq!(validate(&d, UnfilledPolicy::SubmitAsZero), Ok(()));
    }

    #[test]
    fn test_duplicate_wins_over_same_store() {
        let d = day(vec![
            ReceiptLine::new("A", 100),
            ReceiptLine::new("A", 100),
            ReceiptLine::new("A", 200),
        ]);
        assert_eq!(
            validate(&d, UnfilledPolicy::Reject),
            Err(Rejection::ExistsDuplicateReceipt)
        );
    }

    #[test]
    fn test_same_store() {
        let d = day(vec![ReceiptLine::new("A", 100), ReceiptLine::new("A", 200)]);
        assert_eq!(
            validate(&d, UnfilledPolicy::Reject),
            Err(Rejection::ExistsSameStoreReceipt)
        );
    }

    #[test]
    fn test_rules_checked_in_order() {
        let mut lines = vec![
            ReceiptLine::new("", 100),
            ReceiptLine::new("B", 0),
            ReceiptLine::new("C", Cost::parse("x")),
            ReceiptLine::new("D", Cost::Unfilled),
            ReceiptLine::new("E", 100),
            ReceiptLine::new("E", 100),
            ReceiptLine::new("E", 200),
        ];
        let expected = [
            Err(Rejection::ExistsEmptyStoreName),
            Err(Rejection::ExistsZeroReceipt),
            Err(Rejection::ExistsInvalidReceipt),
            Err(Rejection::ExistsUnfilledReceipt),
            Err(Rejection::ExistsDuplicateReceipt),
            Err(Rejection::ExistsSameStoreReceipt),
            Ok(()),
        ];
        for want in expected {
            assert_eq!(validate(&day(lines.clone()), UnfilledPolicy::Reject), want);
            lines.remove(0);
        }
    }

    #[test]
    fn test_rejection_codes() {
        assert_eq!(
            serde_json::to_string(&Rejection::ExistsSameStoreReceipt).unwrap(),
            "\"exists_same_store_receipt\""
        );
        assert_eq!(
            Rejection::ExistsEmptyStoreName.to_string(),
            "exists_empty_store_name"
        );
        assert!(!Rejection::ExistsZeroReceipt.message().is_empty());
    }

    #[test]
    fn test_policy_from_str() {
        use std::str::FromStr;
        assert_eq!(
            UnfilledPolicy::from_str("submit_as_zero").unwrap(),
            UnfilledPolicy::SubmitAsZero
        );
        assert_eq!(UnfilledPolicy::default().to_string(), "reject");
    }
}
