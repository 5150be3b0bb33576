//! China interbank market calendar (CNBE).
//!
//! The State Council publishes the holiday schedule a year at a time, moving
//! some weekend days to working days around the long breaks. Both lists are
//! carried here as inclusive date ranges; outside the covered years only
//! weekends are non-business days.

use std::sync::OnceLock;

use super::{Calendar, HolidayCalendar, WeekendType};
use crate::types::Date;

/// Static CNBE calendar instance.
static CNBE_CALENDAR: OnceLock<ChinaInterbankCalendar> = OnceLock::new();

/// (year, month, first day, last day) of each holiday break.
const HOLIDAYS: &[(i32, u32, u32, u32)] = &[
    // 2024
    (2024, 1, 1, 1),
    (2024, 2, 10, 17),
    (2024, 4, 4, 6),
    (2024, 5, 1, 5),
    (2024, 6, 10, 10),
    (2024, 9, 15, 17),
    (2024, 10, 1, 7),
    // 2025
    (2025, 1, 1, 1),
    (2025, 1, 28, 31),
    (2025, 2, 1, 4),
    (2025, 4, 4, 6),
    (2025, 5, 1, 5),
    (2025, 5, 31, 31),
    (2025, 6, 1, 2),
    (2025, 10, 1, 8),
    // 2026
    (2026, 1, 1, 3),
    (2026, 2, 15, 23),
    (2026, 4, 4, 6),
    (2026, 5, 1, 5),
    (2026, 6, 19, 21),
    (2026, 9, 25, 27),
    (2026, 10, 1, 7),
];

/// Weekend days declared as working days.
const WORKING_WEEKENDS: &[(i32, u32, u32)] = &[
    (2024, 2, 4),
    (2024, 2, 18),
    (2024, 4, 7),
    (2024, 4, 28),
    (2024, 5, 11),
    (2024, 9, 14),
    (2024, 9, 29),
    (2024, 10, 12),
    (2025, 1, 26),
    (2025, 2, 8),
    (2025, 4, 27),
    (2025, 9, 28),
    (2025, 10, 11),
    (2026, 1, 4),
    (2026, 2, 14),
    (2026, 2, 28),
    (2026, 5, 9),
    (2026, 9, 20),
    (2026, 10, 10),
];

/// China interbank (CFETS) holiday calendar.
///
/// ## Holidays
///
/// - New Year's Day
/// - Spring Festival
/// - Qingming Festival
/// - Labour Day
/// - Dragon Boat Festival
/// - Mid-Autumn Festival
/// - National Day
///
/// Data covers 2024 through 2026.
#[derive(Debug, Clone)]
pub struct ChinaInterbankCalendar {
    inner: HolidayCalendar,
}

impl ChinaInterbankCalendar {
    /// Create a new CNBE calendar.
    pub fn new() -> Self {
        let holidays = HOLIDAYS.iter().flat_map(|&(year, month, first, last)| {
            (first..=last).filter_map(move |day| Date::from_ymd(year, month, day).ok())
        });
        let working = WORKING_WEEKENDS
            .iter()
            .filter_map(|&(year, month, day)| Date::from_ymd(year, month, day).ok());

        Self {
            inner: HolidayCalendar::from_dates("CNBE", WeekendType::SaturdaySunday, holidays, working),
        }
    }

    /// Get the global CNBE calendar instance.
    pub fn global() -> &'static ChinaInterbankCalendar {
        CNBE_CALENDAR.get_or_init(ChinaInterbankCalendar::new)
    }
}

impl Default for ChinaInterbankCalendar {
    fn default() -> Self {
        Self::new()
    }
}

impl Calendar for ChinaInterbankCalendar {
    fn name(&self) -> &str {
        "CNBE"
    }

    fn is_business_day(&self, date: Date) -> bool {
        self.inner.is_business_day(date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendars::BusinessDayConvention;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    #[test]
    fn test_spring_festival_2024() {
        let cal = ChinaInterbankCalendar::global();
        for day in 10..=17 {
            assert!(!cal.is_business_day(d(2024, 2, day)), "2024-02-{day}");
        }
        // make-up working Sundays either side of the break
        assert!(cal.is_business_day(d(2024, 2, 4)));
        assert!(cal.is_business_day(d(2024, 2, 18)));
        assert!(cal.is_business_day(d(2024, 2, 9)));
        assert!(cal.is_business_day(d(2024, 2, 19)));
    }

    #[test]
    fn test_national_day() {
        let cal = ChinaInterbankCalendar::global();
        assert!(!cal.is_business_day(d(2024, 10, 1)));
        assert!(!cal.is_business_day(d(2024, 10, 7)));
        assert!(cal.is_business_day(d(2024, 10, 8)));
        assert!(cal.is_business_day(d(2024, 10, 12)));
        assert!(!cal.is_business_day(d(2025, 10, 8)));
    }

    #[test]
    fn test_adjust_over_holiday() {
        let cal = ChinaInterbankCalendar::global();
        assert_eq!(
            cal.adjust(d(2024, 2, 10), BusinessDayConvention::Following).unwrap(),
            d(2024, 2, 18)
        );
        assert_eq!(
            cal.adjust(d(2024, 9, 15), BusinessDayConvention::Preceding).unwrap(),
            d(2024, 9, 14)
        );
    }

    #[test]
    fn test_outside_covered_years() {
        let cal = ChinaInterbankCalendar::global();
        assert!(cal.is_business_day(d(2030, 1, 2)));
        assert!(!cal.is_business_day(d(2030, 1, 5)));
    }
}
