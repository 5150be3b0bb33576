//! Business day adjustment and period addition conventions.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::Calendar;
use crate::error::{CoreError, CoreResult};
use crate::types::{Date, Period};

/// Rule for rolling a date off a non-business day.
///
/// Parsed from the usual market abbreviations (`F`, `MF`, `P`, `MP`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum BusinessDayConvention {
    /// Keep the date even if it is a holiday.
    #[serde(alias = "NONE")]
    Unadjusted,

    /// Next business day.
    #[default]
    #[serde(alias = "F")]
    Following,

    /// Next business day, or the previous one if that would leave the month.
    #[serde(alias = "MF")]
    ModifiedFollowing,

    /// Previous business day.
    #[serde(alias = "P")]
    Preceding,

    /// Previous business day, or the next one if that would leave the month.
    #[serde(alias = "MP")]
    ModifiedPreceding,
}

impl std::fmt::Display for BusinessDayConvention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            BusinessDayConvention::Unadjusted => "Unadjusted",
            BusinessDayConvention::Following => "Following",
            BusinessDayConvention::ModifiedFollowing => "Modified Following",
            BusinessDayConvention::Preceding => "Preceding",
            BusinessDayConvention::ModifiedPreceding => "Modified Preceding",
        };
        write!(f, "{name}")
    }
}

impl FromStr for BusinessDayConvention {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace([' ', '_', '-'], "");
        match normalized.as_str() {
            "UNADJUSTED" | "NONE" | "NA" => Ok(BusinessDayConvention::Unadjusted),
            "F" | "FOLLOWING" => Ok(BusinessDayConvention::Following),
            "MF" | "MODFOLLOWING" | "MODIFIEDFOLLOWING" => {
                Ok(BusinessDayConvention::ModifiedFollowing)
            }
            "P" | "PRECEDING" => Ok(BusinessDayConvention::Preceding),
            "MP" | "MODPRECEDING" | "MODIFIEDPRECEDING" => {
                Ok(BusinessDayConvention::ModifiedPreceding)
            }
            _ => Err(CoreError::unknown_convention("business day convention", s)),
        }
    }
}

/// Rolls `date` onto a business day of `calendar`.
pub fn adjust<C: Calendar + ?Sized>(
    date: Date,
    convention: BusinessDayConvention,
    calendar: &C,
) -> CoreResult<Date> {
    if calendar.is_business_day(date) {
        return Ok(date);
    }

    match convention {
        BusinessDayConvention::Unadjusted => Ok(date),

        BusinessDayConvention::Following => following(date, calendar),

        BusinessDayConvention::ModifiedFollowing => {
            let adjusted = following(date, calendar)?;
            if adjusted.month() != date.month() {
                preceding(date, calendar)
            } else {
                Ok(adjusted)
            }
        }

        BusinessDayConvention::Preceding => preceding(date, calendar),

        BusinessDayConvention::ModifiedPreceding => {
            let adjusted = preceding(date, calendar)?;
            if adjusted.month() != date.month() {
                following(date, calendar)
            } else {
                Ok(adjusted)
            }
        }
    }
}

/// How a period is added to a date before business day adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PeriodAddition {
    /// Plain calendar addition.
    #[default]
    None,

    /// If the start date is the last business day of its month, the result is
    /// the last business day of the target month.
    LastBusinessDay,
}

impl PeriodAddition {
    /// The addition rule used for tenors: month-based tenors keep month-end
    /// alignment, day and week tenors add plainly.
    #[must_use]
    pub fn for_tenor(tenor: Period) -> Self {
        if tenor.total_months() > 0 {
            PeriodAddition::LastBusinessDay
        } else {
            PeriodAddition::None
        }
    }
}

/// Adds a period to a date under the given addition convention.
///
/// The result is not business day adjusted.
pub fn add_period<C: Calendar + ?Sized>(
    date: Date,
    period: Period,
    addition: PeriodAddition,
    calendar: &C,
) -> CoreResult<Date> {
    let end = date.add_period(period)?;
    match addition {
        PeriodAddition::None => Ok(end),
        PeriodAddition::LastBusinessDay => {
            if calendar.is_last_business_day_of_month(date)? {
                last_business_day_of_month(end, calendar)
            } else {
                Ok(end)
            }
        }
    }
}

/// Returns the last business day of the date's month.
pub fn last_business_day_of_month<C: Calendar + ?Sized>(
    date: Date,
    calendar: &C,
) -> CoreResult<Date> {
    preceding(date.end_of_month(), calendar)
}

/// Longest run of non-business days tolerated before giving up.
const MAX_ROLL_DAYS: i64 = 366;

/// Returns the next business day on or after the given date.
fn following<C: Calendar + ?Sized>(date: Date, calendar: &C) -> CoreResult<Date> {
    roll(date, 1, calendar)
}

/// Returns the previous business day on or before the given date.
fn preceding<C: Calendar + ?Sized>(date: Date, calendar: &C) -> CoreResult<Date> {
    roll(date, -1, calendar)
}

fn roll<C: Calendar + ?Sized>(date: Date, step: i64, calendar: &C) -> CoreResult<Date> {
    let mut current = date;
    for _ in 0..MAX_ROLL_DAYS {
        if calendar.is_business_day(current) {
            return Ok(current);
        }
        current = current.add_days(step);
    }
    Err(CoreError::calendar(format!(
        "{} has no business day within {MAX_ROLL_DAYS} days of {date}",
        calendar.name()
    )))
}
