use crate::model::ReceiptLine;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Errors from index-addressed edits of a `DailyReceipt`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Error)]
pub enum ReceiptError {
    #[error("There is no receipt line at index {index}, the day has {len} line(s)")]
    IndexOutOfRange { index: usize, len: usize },
}

/// The purchases of one calendar date, in the order they were entered.
///
/// Lines have no identity other than their position. Every edit returns a new `DailyReceipt` and
/// leaves the receiver as it was.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DailyReceipt {
    date: NaiveDate,
    lines: Vec<ReceiptLine>,
}

impl DailyReceipt {
    pub fn new(date: NaiveDate, lines: Vec<ReceiptLine>) -> Self {
        Self { date, lines }
    }

    pub fn empty(date: NaiveDate) -> Self {
        Self::new(date, Vec::new())
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn lines(&self) -> &[ReceiptLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Returns a copy with `line` appended.
    pub fn add(&self, line: ReceiptLine) -> Self {
        let mut lines = self.lines.clone();
        lines.push(line);
        Self::new(self.date, lines)
    }

    /// Returns a copy without the line at `index`.
    pub fn delete(&self, index: usize) -> Result<Self, ReceiptError> {
        self.check_index(index)?;
        let mut lines = self.lines.clone();
        lines.remove(index);
        Ok(Self::new(self.date, lines))
    }

    /// Returns a copy with the line at `index` replaced by `line`.
    pub fn replace(&self, index: usize, line: ReceiptLine) -> Result<Self, ReceiptError> {
        self.check_index(index)?;
        let mut lines = self.lines.clone();
        lines[index] = line;
        Ok(Self::new(self.date, lines))
    }

    fn check_index(&self, index: usize) -> Result<(), ReceiptError> {
        if index >= self.lines.len() {
            return Err(ReceiptError::IndexOutOfRange {
                index,
                len: self.lines.len(),
            });
        }
        Ok(())
    }

    /// Sum of the entered costs. Unfilled and invalid costs add nothing.
    pub fn daily_total_cost(&self) -> Decimal {
        self.lines.iter().map(|l| l.cost().value_or_zero()).sum()
    }

    /// Any line with an empty or whitespace-only store name.
    pub fn is_exist_empty_store(&self) -> bool {
        self.lines.iter().any(|l| l.store_key().is_empty())
    }

    /// Any line whose cost was entered as zero.
    pub fn is_exist_zero_cost(&self) -> bool {
        self.lines.iter().any(|l| l.cost().is_zero())
    }

    /// Any line whose cost text is not a number. Unfilled lines are not counted here.
    pub fn is_exist_invalid_cost(&self) -> bool {
        self.lines.iter().any(|l| l.cost().is_invalid())
    }

    /// Any line that was never given a cost.
    pub fn is_exist_unfilled_cost(&self) -> bool {
        self.lines.iter().any(|l| l.cost().is_unfilled())
    }

    /// Two or more lines with the same store and the same cost.
    pub fn is_duplicate(&self) -> bool {
        let mut seen = HashSet::new();
        self.lines
            .iter()
            .any(|l| !seen.insert((l.store_key(), l.cost())))
    }

    /// Two or more lines with the same store but different costs.
    pub fn is_exist_same_store(&self) -> bool {
        let mut by_store: HashMap<&str, Vec<_>> = HashMap::new();
        for line in &self.lines {
            by_store.entry(line.store_key()).or_default().push(line.cost());
        }
        by_store
            .values()
            .any(|costs| costs.iter().any(|c| c != &costs[0]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Cost;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, 14).unwrap()
    }

    fn day(lines: Vec<ReceiptLine>) -> DailyReceipt {
        DailyReceipt::new(date(), lines)
    }

    #[test]
    fn test_total_ignores_unfilled_and_invalid() {
        let d = day(vec![
            ReceiptLine::new("A", 100),
            ReceiptLine::new("B", Cost::Unfilled),
            ReceiptLine::new("C", Cost::parse("NaN?")),
        ]);
        assert_eq!(d.daily_total_cost(), Decimal::from(100));
        assert!(d.is_exist_unfilled_cost());
        assert!(d.is_exist_invalid_cost());
    }

    #[test]
    fn test_add_then_delete_first() {
        let original = DailyReceipt::empty(date());
        let two = original
            .add(ReceiptLine::new("A", 100))
            .add(ReceiptLine::new("B", 200));
        let one = two.delete(0).unwrap();
        assert_eq!(one.lines(), &[ReceiptLine::new("B", 200)]);
        // value semantics: nothing upstream changed
        assert!(original.is_empty());
        assert_eq!(two.len(), 2);
    }

    #[test]
    fn test_delete_out_of_range() {
        let d = day(vec![ReceiptLine::new("A", 100)]);
        assert_eq!(
            d.delete(1),
            Err(ReceiptError::IndexOutOfRange { index: 1, len: 1 })
        );
        assert_eq!(d.len(), 1);
        assert!(DailyReceipt::empty(date()).delete(0).is_err());
    }

    #[test]
    fn test_replace() {
        let d = day(vec![ReceiptLine::new("A", 100), ReceiptLine::blank()]);
        let edited = d
            .replace(1, d.lines()[1].with_store_name("B").with_cost_input("250"))
            .unwrap();
        assert_eq!(edited.lines()[1], ReceiptLine::new("B", 250));
        assert_eq!(d.lines()[1], ReceiptLine::blank());
        assert!(d.replace(2, ReceiptLine::blank()).is_err());
    }

    #[test]
    fn test_empty_store() {
        assert!(day(vec![ReceiptLine::new("  ", 100)]).is_exist_empty_store());
        assert!(!day(vec![ReceiptLine::new("A", 100)]).is_exist_empty_store());
    }

    #[test]
    fn test_zero_cost() {
        let d = day(vec![ReceiptLine::new("A", 100), ReceiptLine::new("B", 0)]);
        assert!(d.is_exist_zero_cost());
        assert!(!day(vec![ReceiptLine::new("B", Cost::Unfilled)]).is_exist_zero_cost());
    }

    #[test]
    fn test_duplicate() {
        let dup = day(vec![ReceiptLine::new("A", 100), ReceiptLine::new("A", 100)]);
        assert!(dup.is_duplicate());
        let differ = day(vec![ReceiptLine::new("A", 100), ReceiptLine::new("A", 200)]);
        assert!(!differ.is_duplicate());
    }

    #[test]
    fn test_duplicate_ignores_formatting() {
        let d = day(vec![
            ReceiptLine::new("A ", Cost::parse("¥1,000")),
            ReceiptLine::new("A", Cost::parse("1000")),
        ]);
        assert!(d.is_duplicate());
    }

    #[test]
    fn test_same_store() {
        let same = day(vec![ReceiptLine::new("A", 100), ReceiptLine::new("A", 200)]);
        assert!(same.is_exist_same_store());
        let other = day(vec![ReceiptLine::new("A", 100), ReceiptLine::new("B", 100)]);
        assert!(!other.is_exist_same_store());
        let dup = day(vec![ReceiptLine::new("A", 100), ReceiptLine::new("A", 100)]);
        assert!(!dup.is_exist_same_store());
    }
}
