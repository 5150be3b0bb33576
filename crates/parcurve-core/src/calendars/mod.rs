//! Business day calendars and conventions.
//!
//! This module provides:
//! - The [`Calendar`] trait and business day adjustment
//! - Period addition conventions used by schedule generation
//! - Weekend-only, holiday-list and China interbank calendars
//! - [`CalendarId`], resolving a calendar name to a shared instance

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

mod china;
mod conventions;
mod holiday;

pub use china::ChinaInterbankCalendar;
pub use conventions::{BusinessDayConvention, PeriodAddition};
pub use holiday::{CalendarData, HolidayCalendar, WeekendType};

use crate::error::{CoreError, CoreResult};
use crate::types::{Date, Period};

/// Trait for business day calendars.
///
/// Calendars are shared read-only between parallel curve builds, hence the
/// `Send + Sync` bound.
pub trait Calendar: Send + Sync {
    /// Returns the name of the calendar.
    fn name(&self) -> &str;

    /// Returns true if the date is a business day.
    fn is_business_day(&self, date: Date) -> bool;

    /// Returns true if the date is a holiday.
    fn is_holiday(&self, date: Date) -> bool {
        !self.is_business_day(date)
    }

    /// Adjusts a date according to the given business day convention.
    fn adjust(&self, date: Date, convention: BusinessDayConvention) -> CoreResult<Date> {
        conventions::adjust(date, convention, self)
    }

    /// Adds a period to a date under an addition convention, without adjusting
    /// the result.
    fn add_period(&self, date: Date, period: Period, addition: PeriodAddition) -> CoreResult<Date> {
        conventions::add_period(date, period, addition, self)
    }

    /// Returns the last business day of the date's month.
    fn last_business_day_of_month(&self, date: Date) -> CoreResult<Date> {
        conventions::last_business_day_of_month(date, self)
    }

    /// Returns true if the date is the last business day of its month.
    fn is_last_business_day_of_month(&self, date: Date) -> CoreResult<bool> {
        Ok(self.is_business_day(date) && self.last_business_day_of_month(date)? == date)
    }
}

/// A simple weekend-only calendar (no holidays).
///
/// Useful for testing or when holiday data is not available.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeekendCalendar;

impl Calendar for WeekendCalendar {
    fn name(&self) -> &str {
        "Weekend Only"
    }

    fn is_business_day(&self, date: Date) -> bool {
        !date.is_weekend()
    }
}

/// Identifier of a built-in calendar.
///
/// Resolves to a process-wide instance built on first use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CalendarId {
    /// Saturdays and Sundays are the only non-business days.
    #[default]
    #[serde(alias = "WEEKENDS")]
    WeekendsOnly,
    /// Every day is a business day.
    #[serde(alias = "NONE")]
    NoHolidays,
    /// China interbank market (CFETS / CNBE).
    #[serde(rename = "CNBE", alias = "Cnbe")]
    Cnbe,
}

static WEEKENDS_ONLY: WeekendCalendar = WeekendCalendar;
static NO_HOLIDAYS: OnceLock<HolidayCalendar> = OnceLock::new();

impl CalendarId {
    /// Returns the shared calendar instance.
    #[must_use]
    pub fn calendar(&self) -> &'static dyn Calendar {
        match self {
            CalendarId::WeekendsOnly => &WEEKENDS_ONLY,
            CalendarId::NoHolidays => {
                NO_HOLIDAYS.get_or_init(|| HolidayCalendar::new("No Holidays", WeekendType::None))
            }
            CalendarId::Cnbe => ChinaInterbankCalendar::global(),
        }
    }
}

impl fmt::Display for CalendarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CalendarId::WeekendsOnly => "WeekendsOnly",
            CalendarId::NoHolidays => "NoHolidays",
            CalendarId::Cnbe => "CNBE",
        };
        write!(f, "{name}")
    }
}

impl FromStr for CalendarId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "WEEKENDSONLY" | "WEEKENDS" | "SAT/SUN" => Ok(CalendarId::WeekendsOnly),
            "NOHOLIDAYS" | "NONE" => Ok(CalendarId::NoHolidays),
            "CNBE" | "CFETS" | "CHINA" => Ok(CalendarId::Cnbe),
            _ => Err(CoreError::unknown_convention("calendar", s)),
        }
    }
}
