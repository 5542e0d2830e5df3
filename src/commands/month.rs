use crate::api::Mode;
use crate::commands::{open_month, Out};
use crate::error::{ErrorType, IntoResult};
use crate::model::{Amount, DailyReceipt, MonthlyReceipt, YearMonth, DAYS_PER_WEEK};
use crate::{Config, Result};
use chrono::{Datelike, NaiveDate, Weekday};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt::Write;

const CELL_WIDTH: usize = 10;

/// A registered day as shown on the calendar.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub lines: usize,
    pub daily_total_cost: Decimal,
}

impl From<&DailyReceipt> for DaySummary {
    fn from(daily: &DailyReceipt) -> Self {
        Self {
            date: daily.date(),
            lines: daily.len(),
            daily_total_cost: daily.daily_total_cost(),
        }
    }
}

/// The calendar of one month. `weeks[w][d]` is `None` for dates outside the month and for dates
/// nothing was registered for.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct MonthView {
    pub month: YearMonth,
    pub label: String,
    pub weeks: Vec<Vec<Option<DaySummary>>>,
    pub monthly_total_cost: Decimal,
}

/// Loads `month` (the current month when `None`) and renders it as a calendar.
pub async fn month(
    config: Config,
    mode: Mode,
    month: Option<YearMonth>,
) -> Result<Out<MonthView>> {
    let month = month.unwrap_or_else(|| YearMonth::of(chrono::Local::now().date_naive()));
    let (_, monthly) = open_month(&config, mode, month)
        .await
        .pub_result(ErrorType::Backend)?;

    let label = month.label(config.locale());
    let message = render(&label, &monthly);
    let view = MonthView {
        month,
        label,
        weeks: monthly
            .weeks()
            .iter()
            .map(|week| {
                week.iter()
                    .map(|cell| cell.as_ref().map(DaySummary::from))
                    .collect()
            })
            .collect(),
        monthly_total_cost: monthly.monthly_total_cost(),
    };
    Ok(Out::new(message, view))
}

/// Renders the calendar as text: a heading, one row per week with each in-month date and, for
/// registered dates, the day's total, then the month total.
fn render(label: &str, monthly: &MonthlyReceipt) -> String {
    let month = monthly.month();
    let mut s = format!("{label}\n");
    let weekdays = std::iter::successors(Some(Weekday::Sun), |weekday| Some(weekday.succ()));
    push_row(
        &mut s,
        weekdays.take(DAYS_PER_WEEK).map(|weekday| weekday.to_string()),
    );
    for (week, days) in monthly.weeks().iter().enumerate() {
        push_row(
            &mut s,
            days.iter()
                .enumerate()
                .map(|(day, cell)| match (month.date_at(week, day), cell) {
                    (None, _) => String::new(),
                    (Some(date), None) => format!("{:>2}", date.day()),
                    (Some(date), Some(daily)) => format!(
                        "{:>2} {}",
                        date.day(),
                        Amount::new(daily.daily_total_cost())
                    ),
                }),
        );
    }
    let _ = write!(s, "Total {}", Amount::new(monthly.monthly_total_cost()));
    s
}

fn push_row(s: &mut String, cells: impl Iterator<Item = String>) {
    let mut row = String::new();
    for cell in cells {
        let _ = write!(row, "{cell:<CELL_WIDTH$}");
    }
    s.push_str(row.trim_end());
    s.push('\n');
}
