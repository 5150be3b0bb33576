//! Calendar periods (tenors, spot offsets, payment frequencies).

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};

/// Longest parseable period, in months.
pub const MAX_PERIOD_MONTHS: i32 = 12 * 1000;

/// Longest parseable period, in days.
pub const MAX_PERIOD_DAYS: i32 = 366 * 1000;

/// A calendar period of years, months and days.
///
/// Periods are the market's way of expressing tenors ("3M", "10Y") and
/// offsets ("1D" spot lag). Arithmetic is component-wise; [`Period::normalized`]
/// folds whole years out of the month component while leaving days alone,
/// so `1Y6M` and `18M` are the same period but `1M` and `30D` are not.
///
/// Equality, hashing and ordering all work on the normalized form. Ordering
/// is by total months, then days, which is the lexicographic
/// (years, months, days) order of normalized periods.
///
/// # Example
///
/// ```rust
/// use parcurve_core::types::Period;
///
/// let tenor: Period = "18M".parse().unwrap();
/// assert_eq!(tenor, Period::new(1, 6, 0));
/// assert!(Period::years(1) < tenor);
/// assert!(Period::months(1) > Period::days(31));
/// ```
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Period {
    years: i32,
    months: i32,
    days: i32,
}

impl Period {
    /// The zero period.
    pub const ZERO: Period = Period {
        years: 0,
        months: 0,
        days: 0,
    };

    /// Creates a period from its components.
    #[must_use]
    pub const fn new(years: i32, months: i32, days: i32) -> Self {
        Self {
            years,
            months,
            days,
        }
    }

    /// A period of `n` days.
    #[must_use]
    pub const fn days(n: i32) -> Self {
        Self::new(0, 0, n)
    }

    /// A period of `n` weeks (stored as days).
    #[must_use]
    pub const fn weeks(n: i32) -> Self {
        Self::new(0, 0, n * 7)
    }

    /// A period of `n` months.
    #[must_use]
    pub const fn months(n: i32) -> Self {
        Self::new(0, n, 0)
    }

    /// A period of `n` years.
    #[must_use]
    pub const fn years(n: i32) -> Self {
        Self::new(n, 0, 0)
    }

    /// Returns the years component.
    #[must_use]
    pub fn year_part(&self) -> i32 {
        self.years
    }

    /// Returns the months component.
    #[must_use]
    pub fn month_part(&self) -> i32 {
        self.months
    }

    /// Returns the days component.
    #[must_use]
    pub fn day_part(&self) -> i32 {
        self.days
    }

    /// Total number of months in the year and month components, saturating
    /// at the `i32` range.
    #[must_use]
    pub fn total_months(&self) -> i32 {
        self.years.saturating_mul(12).saturating_add(self.months)
    }

    /// Folds the month component into years; days are left untouched.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let total = self.total_months();
        Self::new(total / 12, total % 12, self.days)
    }

    /// Component-wise sum, saturating.
    #[must_use]
    pub fn plus(&self, other: Period) -> Self {
        Self::new(
            self.years.saturating_add(other.years),
            self.months.saturating_add(other.months),
            self.days.saturating_add(other.days),
        )
    }

    /// Component-wise difference, saturating.
    #[must_use]
    pub fn minus(&self, other: Period) -> Self {
        Self::new(
            self.years.saturating_sub(other.years),
            self.months.saturating_sub(other.months),
            self.days.saturating_sub(other.days),
        )
    }

    /// True if every component is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.years == 0 && self.months == 0 && self.days == 0
    }

    /// True if any component is negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.years < 0 || self.months < 0 || self.days < 0
    }

    /// True if the period is neither zero nor has a negative component.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        !self.is_zero() && !self.is_negative()
    }

    /// True if this period is a whole, positive multiple of `unit`.
    ///
    /// Month-based periods divide by total months and day-based periods by
    /// days. A period mixing months and days is only a multiple of itself.
    #[must_use]
    pub fn is_multiple_of(&self, unit: Period) -> bool {
        if !self.is_positive() || !unit.is_positive() {
            return false;
        }
        if *self == unit {
            return true;
        }
        match (self.days, unit.days, self.total_months(), unit.total_months()) {
            (0, 0, months, step) if step > 0 => months % step == 0,
            (days, step, 0, 0) if step > 0 => days % step == 0,
            _ => false,
        }
    }

    /// Parses market tenor notation such as `"1D"`, `"2W"`, `"3M"`, `"10Y"`,
    /// `"1Y6M"` or ISO style `"P3M"`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidPeriod` for empty input, unknown units,
    /// missing numbers, or periods longer than [`MAX_PERIOD_MONTHS`] months or
    /// [`MAX_PERIOD_DAYS`] days.
    pub fn parse(s: &str) -> CoreResult<Self> {
        let text = s.trim().to_ascii_uppercase();
        let body = text.strip_prefix('P').unwrap_or(&text);
        if body.is_empty() {
            return Err(CoreError::invalid_period(s, "empty period"));
        }

        let mut period = Period::ZERO;
        let mut number = String::new();
        for ch in body.chars() {
            if ch.is_ascii_digit() || (ch == '-' && number.is_empty()) {
                number.push(ch);
                continue;
            }
            let n: i32 = number.parse().map_err(|_| {
                CoreError::invalid_period(s, format!("invalid count '{number}' before '{ch}'"))
            })?;
            if !(-MAX_PERIOD_DAYS..=MAX_PERIOD_DAYS).contains(&n) {
                return Err(CoreError::invalid_period(s, format!("count {n} is out of range")));
            }
            number.clear();
            let part = match ch {
                'D' => Period::days(n),
                'W' => Period::weeks(n),
                'M' => Period::months(n),
                'Y' => Period::years(n),
                other => {
                    return Err(CoreError::invalid_period(
                        s,
                        format!("unknown unit '{other}'"),
                    ))
                }
            };
            period = period.plus(part);
            if period.total_months().abs() > MAX_PERIOD_MONTHS
                || period.days.abs() > MAX_PERIOD_DAYS
            {
                return Err(CoreError::invalid_period(s, "longer than 1000 years"));
            }
        }
        if !number.is_empty() {
            return Err(CoreError::invalid_period(s, "missing unit"));
        }
        Ok(period)
    }

    fn key(&self) -> (i32, i32) {
        (self.total_months(), self.days)
    }
}

impl PartialEq for Period {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Period {}

impl Hash for Period {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl PartialOrd for Period {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Period {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return write!(f, "0D");
        }
        let p = self.normalized();
        if p.years != 0 {
            write!(f, "{}Y", p.years)?;
        }
        if p.months != 0 {
            write!(f, "{}M", p.months)?;
        }
        if p.days != 0 {
            if p.total_months() == 0 && p.days % 7 == 0 {
                write!(f, "{}W", p.days / 7)?;
            } else {
                write!(f, "{}D", p.days)?;
            }
        }
        Ok(())
    }
}

impl FromStr for Period {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Period {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Period> for String {
    fn from(period: Period) -> Self {
        period.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse() {
        assert_eq!(Period::parse("1D").unwrap(), Period::days(1));
        assert_eq!(Period::parse("1w").unwrap(), Period::days(7));
        assert_eq!(Period::parse("P3M").unwrap(), Period::months(3));
        assert_eq!(Period::parse("10Y").unwrap(), Period::years(10));
        assert_eq!(Period::parse("1Y6M").unwrap(), Period::months(18));
        assert_eq!(Period::parse("0D").unwrap(), Period::ZERO);
        assert!(Period::parse("").is_err());
        assert!(Period::parse("3").is_err());
        assert!(Period::parse("3Q").is_err());
        assert!(Period::parse("M").is_err());
    }

    #[test]
    fn test_parse_rejects_oversized_counts() {
        assert_eq!(Period::parse("1000Y").unwrap(), Period::years(1000));
        assert_eq!(Period::parse("-366000D").unwrap(), Period::days(-366_000));
        assert!(Period::parse("1000Y1M").is_err());
        assert!(Period::parse("200000000Y").is_err());
        assert!(Period::parse("99999999999D").is_err());
        assert!(Period::parse("400000M").is_err());
        assert!(Period::parse("-2147483648D").is_err());
        assert!(Period::parse("60000W").is_err());
        assert!(Period::parse("366000D1D").is_err());

        let err = Period::parse("200000000Y").unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn test_arithmetic_saturates() {
        let huge = Period::years(i32::MAX);
        assert_eq!(huge.total_months(), i32::MAX);
        assert!(huge > Period::years(1000));
        assert_eq!(Period::days(i32::MAX).plus(Period::days(1)).day_part(), i32::MAX);
        assert_eq!(Period::days(i32::MIN).minus(Period::days(1)).day_part(), i32::MIN);
    }

    #[test]
    fn test_display() {
        assert_eq!(Period::days(1).to_string(), "1D");
        assert_eq!(Period::weeks(1).to_string(), "1W");
        assert_eq!(Period::months(18).to_string(), "1Y6M");
        assert_eq!(Period::years(10).to_string(), "10Y");
        assert_eq!(Period::ZERO.to_string(), "0D");
    }

    #[test]
    fn test_normalized() {
        assert_eq!(Period::new(0, 27, 3).normalized(), Period::new(2, 3, 3));
        let p = Period::new(1, -3, 0).normalized();
        assert_eq!((p.year_part(), p.month_part(), p.day_part()), (0, 9, 0));
    }

    #[test]
    fn test_ordering() {
        let mut tenors: Vec<Period> = ["10Y", "1D", "3M", "1W", "1Y", "9M", "1M"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        tenors.sort();
        let labels: Vec<String> = tenors.iter().map(ToString::to_string).collect();
        assert_eq!(labels, ["1D", "1W", "1M", "3M", "9M", "1Y", "10Y"]);

        // calendar periods, not elapsed time
        assert!(Period::months(1) > Period::days(45));
        assert!(Period::new(0, 1, 1) > Period::months(1));
    }

    #[test]
    fn test_remaining_tenor_walk() {
        let mut left = Period::years(1).minus(Period::months(3)).normalized();
        let mut steps = 0;
        while !(left.is_negative() || left.is_zero()) {
            steps += 1;
            left = left.minus(Period::months(3)).normalized();
        }
        assert_eq!(steps, 3);
    }

    #[test]
    fn test_is_multiple_of() {
        assert!(Period::years(10).is_multiple_of(Period::months(3)));
        assert!(Period::months(3).is_multiple_of(Period::months(3)));
        assert!(Period::weeks(2).is_multiple_of(Period::days(1)));
        assert!(!Period::months(10).is_multiple_of(Period::months(3)));
        assert!(!Period::months(1).is_multiple_of(Period::weeks(1)));
        assert!(!Period::days(10).is_multiple_of(Period::months(1)));
        assert!(!Period::ZERO.is_multiple_of(Period::months(1)));
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&Period::months(6)).unwrap();
        assert_eq!(json, "\"6M\"");
        let p: Period = serde_json::from_str("\"1Y\"").unwrap();
        assert_eq!(p, Period::months(12));
        assert!(serde_json::from_str::<Period>("\"1X\"").is_err());
    }

    proptest! {
        #[test]
        fn prop_display_parses_back(y in 0i32..30, m in 0i32..24, d in 0i32..60) {
            let p = Period::new(y, m, d);
            let back: Period = p.to_string().parse().unwrap();
            prop_assert_eq!(back, p);
        }

        #[test]
        fn prop_normalized_is_equal(y in -5i32..30, m in -30i32..30, d in -10i32..60) {
            let p = Period::new(y, m, d);
            prop_assert_eq!(p.normalized(), p);
        }
    }
}
