//! Calendar arithmetic for a single month.
//!
//! Weeks start on Sunday and week 0 is the week holding the 1st of the month, so a calendar row
//! is a `(week_of_month, day_of_week)` pair. This does not follow ISO or any locale's week
//! numbering.

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

/// Days in a week, and so columns in the calendar.
pub const DAYS_PER_WEEK: usize = 7;

/// The most week rows a month can touch: a 31-day month starting on a Friday or Saturday.
pub const WEEK_COUNT: usize = 6;

#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum MonthError {
    #[error("{year}-{month:02} is not a valid month")]
    InvalidMonth { year: i32, month: u32 },
    #[error("Expected a month like 2024-02 but got '{0}'")]
    Unparseable(String),
    #[error("{date} is not in {month}")]
    OutsideMonth { date: NaiveDate, month: YearMonth },
}

/// How a month is written for display.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Locale {
    /// `2024年 2月`
    #[default]
    Ja,
    /// `February 2024`
    En,
}

serde_plain::derive_display_from_serialize!(Locale);
serde_plain::derive_fromstr_from_deserialize!(Locale);

/// A calendar month.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct YearMonth {
    /// Always the 1st of the month.
    first: NaiveDate,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self, MonthError> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(|first| Self { first })
            .ok_or(MonthError::InvalidMonth { year, month })
    }

    /// The month `date` falls in.
    pub fn of(date: NaiveDate) -> Self {
        Self {
            first: date.with_day(1).unwrap_or(date),
        }
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    /// 1-based month number.
    pub fn month(&self) -> u32 {
        self.first.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    /// Number of days in the month.
    pub fn days(&self) -> u32 {
        let next = self.next().first_day();
        (next - self.first).num_days() as u32
    }

    pub fn last_day(&self) -> NaiveDate {
        self.first
            .with_day(self.days())
            .unwrap_or(self.first)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        Self::of(date) == *self
    }

    pub fn previous(&self) -> Self {
        Self {
            first: self
                .first
                .checked_sub_months(Months::new(1))
                .unwrap_or(self.first),
        }
    }

    pub fn next(&self) -> Self {
        Self {
            first: self
                .first
                .checked_add_months(Months::new(1))
                .unwrap_or(self.first),
        }
    }

    /// Column of the 1st of the month, 0 for Sunday.
    fn offset(&self) -> usize {
        day_of_week(self.first)
    }

    /// The number of calendar rows this month spans: 4, 5 or 6.
    pub fn week_rows(&self) -> usize {
        (self.offset() + self.days() as usize).div_ceil(DAYS_PER_WEEK)
    }

    /// The `(week, day)` cell of `date` within this month.
    pub fn cell_of(&self, date: NaiveDate) -> Result<(usize, usize), MonthError> {
        if !self.contains(date) {
            return Err(MonthError::OutsideMonth { date, month: *self });
        }
        Ok((week_of_month(date), day_of_week(date)))
    }

    /// The date shown at `(week, day)`, or `None` for cells before the 1st or after the last day.
    pub fn date_at(&self, week: usize, day: usize) -> Option<NaiveDate> {
        if day >= DAYS_PER_WEEK {
            return None;
        }
        let index = week * DAYS_PER_WEEK + day;
        let day_of_month = index.checked_sub(self.offset())? + 1;
        if day_of_month > self.days() as usize {
            return None;
        }
        self.first.with_day(day_of_month as u32)
    }

    /// The heading shown above the calendar.
    pub fn label(&self, locale: Locale) -> String {
        match locale {
            Locale::Ja => format!("{}年 {}月", self.year(), self.month()),
            Locale::En => self.first.format("%B %Y").to_string(),
        }
    }
}

/// Zero-based week of the month, where week 0 holds the 1st and weeks begin on Sunday.
pub fn week_of_month(date: NaiveDate) -> usize {
    let offset = YearMonth::of(date).offset();
    (date.day0() as usize + offset) / DAYS_PER_WEEK
}

/// 0 for Sunday through 6 for Saturday.
pub fn day_of_week(date: NaiveDate) -> usize {
    date.weekday().num_days_from_sunday() as usize
}

impl Display for YearMonth {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for YearMonth {
    type Err = MonthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unparseable = || MonthError::Unparseable(s.to_string());
        let (year, month) = s.trim().split_once('-').ok_or_else(unparseable)?;
        let year = year.parse::<i32>().map_err(|_| unparseable())?;
        let month = month.parse::<u32>().map_err(|_| unparseable())?;
        Self::new(year, month)
    }
}

impl Serialize for YearMonth {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for YearMonth {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        YearMonth::from_str(&s).map_err(serde::de::Error::custom)
    }
}
