//! Types that represent the core data model: receipt lines, daily receipts and the monthly
//! calendar they are placed on.
mod amount;
mod cost;
mod daily_receipt;
mod monthly_receipt;
mod receipt_line;
mod year_month;

pub use amount::{Amount, AmountError, AmountFormat};
pub use cost::Cost;
pub use daily_receipt::{DailyReceipt, ReceiptError};
pub use monthly_receipt::{MonthlyReceipt, ReceiptRecord};
pub use receipt_line::{DailyCost, ReceiptLine, UNFILLED_COST};
pub use year_month::{
    day_of_week, week_of_month, Locale, MonthError, YearMonth, DAYS_PER_WEEK, WEEK_COUNT,
};
