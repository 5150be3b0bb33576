//! Actual/Actual ISDA day count convention.

use super::DayCount;
use crate::types::Date;

/// Actual/Actual ISDA day count convention.
///
/// The year fraction is calculated by splitting the period into
/// portions that fall in leap years vs non-leap years.
///
/// # Formula
///
/// $$\text{Year Fraction} = \frac{\text{Days in non-leap year}}{365} + \frac{\text{Days in leap year}}{366}$$
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActActIsda;

impl DayCount for ActActIsda {
    fn name(&self) -> &'static str {
        "ACT/ACT ISDA"
    }

    fn year_fraction(&self, start: Date, end: Date) -> f64 {
        if start > end {
            return -self.year_fraction(end, start);
        }

        let mut total = 0.0;
        let mut current = start;

        while current.year() < end.year() {
            // days from current up to January 1 of the next year
            let days = i64::from(current.days_in_year()) - i64::from(day_of_year(current)) + 1;
            total += days as f64 / f64::from(current.days_in_year());
            current = current.add_days(days);
        }

        total + current.days_between(&end) as f64 / f64::from(current.days_in_year())
    }
}

fn day_of_year(date: Date) -> u32 {
    chrono::Datelike::ordinal(&date.as_naive_date())
}
