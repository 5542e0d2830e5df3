use crate::api::Mode;
use crate::commands::{open_month, Out};
use crate::error::{ErrorType, IntoResult};
use crate::model::{Amount, DailyReceipt, ReceiptLine, YearMonth};
use crate::{Config, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt::Write;

/// One day with its lines in the order `hbook edit --remove` addresses them.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct DayView {
    pub date: NaiveDate,
    pub registered: bool,
    pub lines: Vec<ReceiptLine>,
    pub daily_total_cost: Decimal,
}

/// Shows the registered lines of `date`.
pub async fn day(config: Config, mode: Mode, date: NaiveDate) -> Result<Out<DayView>> {
    let (_, monthly) = open_month(&config, mode, YearMonth::of(date))
        .await
        .pub_result(ErrorType::Backend)?;
    let daily = monthly.get(date);
    let registered = monthly.is_registered(date);
    let message = render(&daily, registered);
    Ok(Out::new(
        message,
        DayView {
            date,
            registered,
            daily_total_cost: daily.daily_total_cost(),
            lines: daily.lines().to_vec(),
        },
    ))
}

pub(super) fn render(daily: &DailyReceipt, registered: bool) -> String {
    let mut s = daily.date().to_string();
    match (registered, daily.is_empty()) {
        (false, _) => s.push_str(" has not been registered"),
        (true, true) => s.push_str(" was registered without spending"),
        (true, false) => {
            for (index, line) in daily.lines().iter().enumerate() {
                let _ = write!(s, "\n{index:>3}: {} {}", line.store_name(), line.cost());
            }
            let _ = write!(s, "\nTotal {}", Amount::new(daily.daily_total_cost()));
        }
    }
    s
}
