use crate::model::{
    DailyCost, DailyReceipt, MonthError, ReceiptLine, YearMonth, DAYS_PER_WEEK, WEEK_COUNT,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

type Week = [Option<DailyReceipt>; DAYS_PER_WEEK];

/// One day as the backend reports it in a month snapshot.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptRecord {
    pub purchase_date: NaiveDate,
    pub daily_cost: Vec<DailyCost>,
}

impl ReceiptRecord {
    pub fn new(purchase_date: NaiveDate, daily_cost: Vec<DailyCost>) -> Self {
        Self {
            purchase_date,
            daily_cost,
        }
    }

    pub fn to_daily_receipt(&self) -> DailyReceipt {
        DailyReceipt::new(
            self.purchase_date,
            self.daily_cost.iter().map(ReceiptLine::from).collect(),
        )
    }
}

/// The daily receipts of one month laid out as a calendar: `weeks[week_of_month][day_of_week]`.
///
/// A cell is `Some` once the backend reported the date, even when the day has no lines (a day
/// registered as having no spending). Cells outside the month are always `None`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct MonthlyReceipt {
    month: YearMonth,
    weeks: [Week; WEEK_COUNT],
}

impl MonthlyReceipt {
    /// A month with nothing registered.
    pub fn new(month: YearMonth) -> Self {
        Self {
            month,
            weeks: Default::default(),
        }
    }

    /// Builds the grid from a month snapshot. Records for dates outside `month` are an error.
    pub fn from_records<'a>(
        month: YearMonth,
        records: impl IntoIterator<Item = &'a ReceiptRecord>,
    ) -> Result<Self, MonthError> {
        let mut monthly = Self::new(month);
        for record in records {
            monthly.place(record.to_daily_receipt())?;
        }
        Ok(monthly)
    }

    pub fn month(&self) -> YearMonth {
        self.month
    }

    /// Returns a copy with `daily` placed in its cell, replacing whatever was there.
    pub fn with_day(&self, daily: DailyReceipt) -> Result<Self, MonthError> {
        let mut monthly = self.clone();
        monthly.place(daily)?;
        Ok(monthly)
    }

    fn place(&mut self, daily: DailyReceipt) -> Result<(), MonthError> {
        let (week, day) = self.month.cell_of(daily.date())?;
        self.weeks[week][day] = Some(daily);
        Ok(())
    }

    /// The receipt for `date`, or an empty one when the date was never registered.
    pub fn get(&self, date: NaiveDate) -> DailyReceipt {
        self.registered(date)
            .cloned()
            .unwrap_or_else(|| DailyReceipt::empty(date))
    }

    /// Whether the backend already holds a receipt for `date`.
    pub fn is_registered(&self, date: NaiveDate) -> bool {
        self.registered(date).is_some()
    }

    fn registered(&self, date: NaiveDate) -> Option<&DailyReceipt> {
        let (week, day) = self.month.cell_of(date).ok()?;
        self.weeks[week][day].as_ref()
    }

    /// The receipt at a calendar cell, if that cell holds a registered date.
    pub fn cell(&self, week: usize, day: usize) -> Option<&DailyReceipt> {
        self.weeks.get(week)?.get(day)?.as_ref()
    }

    /// The week rows this month actually spans.
    pub fn weeks(&self) -> &[Week] {
        &self.weeks[..self.month.week_rows()]
    }

    pub fn monthly_total_cost(&self) -> Decimal {
        self.weeks
            .iter()
            .flatten()
            .flatten()
            .map(DailyReceipt::daily_total_cost)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn feb_2023() -> YearMonth {
        YearMonth::new(2023, 2).unwrap()
    }

    #[test]
    fn test_get_unregistered_is_empty() {
        let monthly = MonthlyReceipt::new(feb_2023());
        let daily = monthly.get(ymd(2023, 2, 10));
        assert!(daily.is_empty());
        assert_eq!(daily.date(), ymd(2023, 2, 10));
        assert_eq!(daily.daily_total_cost(), Decimal::ZERO);
        assert!(!monthly.is_registered(ymd(2023, 2, 10)));
    }

    #[test]
    fn test_whole_february_placement() {
        let month = feb_2023();
        let records: Vec<ReceiptRecord> = (1..=28)
            .map(|d| ReceiptRecord::new(ymd(2023, 2, d), vec![DailyCost::new("Shop", d as i32)]))
            .collect();
        let monthly = MonthlyReceipt::from_records(month, &records).unwrap();

        assert_eq!(monthly.cell(0, 3).unwrap().date(), ymd(2023, 2, 1));
        assert!(monthly.cell(0, 2).is_none());
        assert_eq!(monthly.cell(4, 2).unwrap().date(), ymd(2023, 2, 28));
        assert!(monthly.cell(4, 3).is_none());
        assert!(monthly.cell(5, 0).is_none());
        assert!(monthly.cell(6, 0).is_none());
        assert_eq!(monthly.weeks().len(), 5);
        for d in 1..=28 {
            assert_eq!(monthly.get(ymd(2023, 2, d)).daily_total_cost(), Decimal::from(d));
        }
        assert_eq!(monthly.monthly_total_cost(), Decimal::from(406));
    }

    #[test]
    fn test_sixth_week_is_reachable() {
        let march = YearMonth::new(2024, 3).unwrap();
        let record = ReceiptRecord::new(ymd(2024, 3, 31), vec![DailyCost::new("Shop", 500)]);
        let monthly = MonthlyReceipt::from_records(march, [&record]).unwrap();
        assert_eq!(monthly.weeks().len(), 6);
        assert_eq!(monthly.cell(5, 0).unwrap().daily_total_cost(), Decimal::from(500));
    }

    #[test]
    fn test_record_outside_month_is_rejected() {
        let record = ReceiptRecord::new(ymd(2023, 3, 1), vec![]);
        assert!(matches!(
            MonthlyReceipt::from_records(feb_2023(), [&record]),
            Err(MonthError::OutsideMonth { .. })
        ));
    }

    #[test]
    fn test_no_spend_day_is_registered() {
        let record = ReceiptRecord::new(ymd(2023, 2, 3), vec![]);
        let monthly = MonthlyReceipt::from_records(feb_2023(), [&record]).unwrap();
        assert!(monthly.is_registered(ymd(2023, 2, 3)));
        assert!(monthly.get(ymd(2023, 2, 3)).is_empty());
    }

    #[test]
    fn test_with_day_leaves_original() {
        let monthly = MonthlyReceipt::new(feb_2023());
        let daily = DailyReceipt::empty(ymd(2023, 2, 14)).add(ReceiptLine::new("A", 100));
        let updated = monthly.with_day(daily.clone()).unwrap();
        assert_eq!(updated.get(ymd(2023, 2, 14)), daily);
        assert!(!monthly.is_registered(ymd(2023, 2, 14)));
    }

    #[test]
    fn test_record_with_null_cost() {
        let json = r#"{"purchaseDate":"2023-02-06","dailyCost":[
            {"storeName":"Bakery","cost":450},
            {"storeName":"Tea","cost":null}
        ]}"#;
        let record: ReceiptRecord = serde_json::from_str(json).unwrap();
        let monthly = MonthlyReceipt::from_records(feb_2023(), [&record]).unwrap();
        let daily = monthly.get(ymd(2023, 2, 6));
        assert_eq!(daily.len(), 2);
        assert!(daily.lines()[1].cost().is_unfilled());
        assert_eq!(daily.daily_total_cost(), Decimal::from(450));
    }

    #[test]
    fn test_zero_total_day_keeps_its_lines() {
        let zero = ReceiptRecord::new(ymd(2023, 2, 1), vec![DailyCost::new("A", 0)]);
        let monthly = MonthlyReceipt::from_records(feb_2023(), [&zero]).unwrap();
        let daily = monthly.get(ymd(2023, 2, 1));
        assert_eq!(daily.len(), 1);
        assert_eq!(daily.daily_total_cost(), Decimal::ZERO);
    }
}
