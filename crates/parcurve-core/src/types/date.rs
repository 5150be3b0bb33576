//! Calendar dates.

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::Period;
use crate::error::{CoreError, CoreResult};

/// A date without time or zone, serialized as `YYYY-MM-DD`.
///
/// Wraps `chrono::NaiveDate`. Month arithmetic clamps to the end of the
/// target month, which is what schedule generation expects.
///
/// # Example
///
/// ```rust
/// use parcurve_core::types::Date;
///
/// let date = Date::from_ymd(2024, 1, 31).unwrap();
/// let next = date.add_months(1).unwrap();
/// assert_eq!(next, Date::from_ymd(2024, 2, 29).unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Date(NaiveDate);

impl Date {
    /// Builds a date, failing on impossible combinations such as 2023-02-29.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> CoreResult<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Date)
            .ok_or_else(|| CoreError::invalid_date(format!("{year}-{month:02}-{day:02}")))
    }

    /// Parses `YYYY-MM-DD`.
    pub fn parse(s: &str) -> CoreResult<Self> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Date)
            .map_err(|_| CoreError::invalid_date(format!("Cannot parse: {s}")))
    }

    /// Calendar year.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Month, 1 to 12.
    #[must_use]
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Day of month.
    #[must_use]
    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// 366 in leap years, otherwise 365.
    #[must_use]
    pub fn days_in_year(&self) -> u32 {
        if self.0.leap_year() {
            366
        } else {
            365
        }
    }

    /// Shifts by a signed number of calendar days.
    #[must_use]
    pub fn add_days(&self, days: i64) -> Self {
        Date(self.0 + chrono::Duration::days(days))
    }

    /// Shifts by a signed number of months, clamping the day to the end of
    /// the target month (Jan 31 + 1M is Feb 28/29).
    pub fn add_months(&self, months: i32) -> CoreResult<Self> {
        let step = Months::new(months.unsigned_abs());
        let shifted = if months >= 0 {
            self.0.checked_add_months(step)
        } else {
            self.0.checked_sub_months(step)
        };
        shifted
            .map(Date)
            .ok_or_else(|| CoreError::invalid_date(format!("{self} shifted by {months} months")))
    }

    /// Adds a tenor: years and months together first, then days.
    pub fn add_period(&self, period: Period) -> CoreResult<Self> {
        let months = period.total_months();
        let shifted = if months == 0 {
            *self
        } else {
            self.add_months(months)?
        };
        let days = period.day_part();
        shifted
            .0
            .checked_add_signed(chrono::Duration::days(i64::from(days)))
            .map(Date)
            .ok_or_else(|| CoreError::invalid_date(format!("{shifted} shifted by {days} days")))
    }

    /// Signed calendar days from `self` to `other`.
    #[must_use]
    pub fn days_between(&self, other: &Date) -> i64 {
        (other.0 - self.0).num_days()
    }

    /// The wrapped `NaiveDate`.
    #[must_use]
    pub fn as_naive_date(&self) -> NaiveDate {
        self.0
    }

    /// Last calendar day of the month.
    #[must_use]
    pub fn end_of_month(&self) -> Self {
        let first = self.0.with_day(1).unwrap_or(self.0);
        first
            .checked_add_months(Months::new(1))
            .and_then(|next| next.checked_sub_days(Days::new(1)))
            .map_or(*self, Date)
    }

    /// Day of week.
    #[must_use]
    pub fn weekday(&self) -> Weekday {
        self.0.weekday()
    }

    /// Saturday or Sunday.
    #[must_use]
    pub fn is_weekend(&self) -> bool {
        matches!(self.weekday(), Weekday::Sat | Weekday::Sun)
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for Date {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<NaiveDate> for Date {
    fn from(date: NaiveDate) -> Self {
        Date(date)
    }
}

impl From<Date> for NaiveDate {
    fn from(date: Date) -> Self {
        date.0
    }
}
