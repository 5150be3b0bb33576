//! Holiday-list calendar for runtime-configurable calendars.
//!
//! Besides holidays, some markets declare weekend days as working days to
//! compensate for long holidays. Both lists can be loaded from JSON.
//!
//! # Example
//!
//! ```
//! use parcurve_core::calendars::{Calendar, HolidayCalendar, WeekendType};
//! use parcurve_core::types::Date;
//!
//! let json = r#"{
//!     "name": "Custom",
//!     "holidays": ["2024-02-12"],
//!     "working_weekends": ["2024-02-18"]
//! }"#;
//! let cal = HolidayCalendar::from_json(json).unwrap();
//!
//! assert!(!cal.is_business_day(Date::from_ymd(2024, 2, 12).unwrap()));
//! assert!(cal.is_business_day(Date::from_ymd(2024, 2, 18).unwrap()));
//! ```

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

use super::Calendar;
use crate::error::{CoreError, CoreResult};
use crate::types::Date;

/// Which days of the week are non-business days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum WeekendType {
    /// Saturday and Sunday.
    #[default]
    SaturdaySunday,
    /// Friday and Saturday.
    FridaySaturday,
    /// No weekend days.
    None,
}

impl WeekendType {
    /// Returns true if the weekday is a weekend day.
    #[must_use]
    pub fn is_weekend(&self, weekday: Weekday) -> bool {
        match self {
            WeekendType::SaturdaySunday => matches!(weekday, Weekday::Sat | Weekday::Sun),
            WeekendType::FridaySaturday => matches!(weekday, Weekday::Fri | Weekday::Sat),
            WeekendType::None => false,
        }
    }
}

/// Serializable calendar data for JSON loading.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CalendarData {
    /// Name of the calendar.
    pub name: String,
    /// Weekend type (defaults to Saturday/Sunday).
    #[serde(default)]
    pub weekend: Option<WeekendType>,
    /// Holiday dates in YYYY-MM-DD format.
    #[serde(default)]
    pub holidays: Vec<String>,
    /// Weekend dates that are business days, in YYYY-MM-DD format.
    #[serde(default)]
    pub working_weekends: Vec<String>,
}

/// A calendar defined by a weekend rule, a holiday list and a list of
/// weekend days that are worked.
#[derive(Debug, Clone)]
pub struct HolidayCalendar {
    name: String,
    weekend: WeekendType,
    holidays: BTreeSet<Date>,
    working_weekends: BTreeSet<Date>,
}

impl HolidayCalendar {
    /// Creates a calendar with no holidays.
    pub fn new(name: impl Into<String>, weekend: WeekendType) -> Self {
        Self {
            name: name.into(),
            weekend,
            holidays: BTreeSet::new(),
            working_weekends: BTreeSet::new(),
        }
    }

    /// Creates a calendar from holiday and working-weekend dates.
    pub fn from_dates(
        name: impl Into<String>,
        weekend: WeekendType,
        holidays: impl IntoIterator<Item = Date>,
        working_weekends: impl IntoIterator<Item = Date>,
    ) -> Self {
        let mut cal = Self::new(name, weekend);
        cal.holidays.extend(holidays);
        cal.working_weekends.extend(working_weekends);
        cal
    }

    /// Load a calendar from JSON data.
    ///
    /// # JSON Format
    ///
    /// ```json
    /// {
    ///   "name": "CNBE",
    ///   "weekend": "SaturdaySunday",
    ///   "holidays": ["2024-02-12", "2024-02-13"],
    ///   "working_weekends": ["2024-02-04"]
    /// }
    /// ```
    pub fn from_json(json: &str) -> CoreResult<Self> {
        let data: CalendarData = serde_json::from_str(json)
            .map_err(|e| CoreError::calendar(format!("Failed to parse JSON: {e}")))?;
        Self::from_calendar_data(data)
    }

    /// Load a calendar from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| CoreError::calendar(format!("Failed to read file: {e}")))?;
        Self::from_json(&content)
    }

    /// Builds a calendar from already parsed data.
    pub fn from_calendar_data(data: CalendarData) -> CoreResult<Self> {
        let parse_all = |dates: &[String]| -> CoreResult<Vec<Date>> {
            dates
                .iter()
                .map(|s| {
                    Date::parse(s).map_err(|e| {
                        CoreError::calendar(format!("Invalid date '{s}' in {}: {e}", data.name))
                    })
                })
                .collect()
        };
        let holidays = parse_all(&data.holidays)?;
        let working = parse_all(&data.working_weekends)?;

        Ok(Self::from_dates(
            data.name.clone(),
            data.weekend.unwrap_or_default(),
            holidays,
            working,
        ))
    }

    /// Exports the calendar as serializable data.
    #[must_use]
    pub fn to_calendar_data(&self) -> CalendarData {
        CalendarData {
            name: self.name.clone(),
            weekend: Some(self.weekend),
            holidays: self.holidays.iter().map(ToString::to_string).collect(),
            working_weekends: self.working_weekends.iter().map(ToString::to_string).collect(),
        }
    }

    /// Adds a holiday.
    pub fn add_holiday(&mut self, date: Date) {
        self.working_weekends.remove(&date);
        self.holidays.insert(date);
    }

    /// Marks a weekend day as a business day.
    pub fn add_working_weekend(&mut self, date: Date) {
        self.holidays.remove(&date);
        self.working_weekends.insert(date);
    }

    /// Returns the weekend rule.
    #[must_use]
    pub fn weekend(&self) -> WeekendType {
        self.weekend
    }

    /// Number of listed holidays.
    #[must_use]
    pub fn holiday_count(&self) -> usize {
        self.holidays.len()
    }
}

impl Calendar for HolidayCalendar {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_business_day(&self, date: Date) -> bool {
        if self.holidays.contains(&date) {
            return false;
        }
        !self.weekend.is_weekend(date.weekday()) || self.working_weekends.contains(&date)
    }
}
