//! Day count conventions for year fraction calculations.
//!
//! Day count conventions turn a pair of dates into a year fraction. Curve
//! construction uses one for node times and for accrual fractions.
//!
//! # Supported Conventions
//!
//! - [`Act360`]: Actual/360 - Money market convention
//! - [`Act365Fixed`]: Actual/365 Fixed - CNY swaps and deposits
//! - [`ActActIsda`]: Actual/Actual ISDA - Year-based split
//!
//! # Usage
//!
//! ```rust
//! use parcurve_core::daycounts::{DayCount, DayCountConvention};
//! use parcurve_core::types::Date;
//!
//! let dc: DayCountConvention = "ACT/365F".parse().unwrap();
//! let start = Date::from_ymd(2024, 6, 5).unwrap();
//! let end = Date::from_ymd(2024, 6, 6).unwrap();
//!
//! assert_eq!(dc.day_count(start, end), 1);
//! assert!((dc.year_fraction(start, end) - 1.0 / 365.0).abs() < 1e-15);
//! ```

mod act360;
mod act365;
mod actact;

pub use act360::Act360;
pub use act365::Act365Fixed;
pub use actact::ActActIsda;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;
use crate::types::Date;

/// Trait for day count conventions.
///
/// Implementations must be thread-safe (`Send + Sync`); a single instance is
/// read concurrently by parallel curve builds.
pub trait DayCount: Send + Sync {
    /// Returns the name of the day count convention.
    fn name(&self) -> &'static str;

    /// Calculates the year fraction between two dates.
    ///
    /// Negative if `end` is before `start`.
    fn year_fraction(&self, start: Date, end: Date) -> f64;

    /// Calculates the day count between two dates.
    fn day_count(&self, start: Date, end: Date) -> i64 {
        start.days_between(&end)
    }
}

/// Enumeration of the supported day count conventions.
///
/// Serialized as the convention name (for example `"ACT/365F"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DayCountConvention {
    /// Actual/360 - Money market instruments
    Act360,

    /// Actual/365 Fixed
    #[default]
    Act365Fixed,

    /// Actual/Actual ISDA - Splits periods across calendar years
    ActActIsda,
}

static ACT_360: Act360 = Act360;
static ACT_365_FIXED: Act365Fixed = Act365Fixed;
static ACT_ACT_ISDA: ActActIsda = ActActIsda;

impl DayCountConvention {
    /// Returns the shared implementation of this convention.
    #[must_use]
    pub fn day_counter(&self) -> &'static dyn DayCount {
        match self {
            DayCountConvention::Act360 => &ACT_360,
            DayCountConvention::Act365Fixed => &ACT_365_FIXED,
            DayCountConvention::ActActIsda => &ACT_ACT_ISDA,
        }
    }

    /// Returns all supported conventions.
    #[must_use]
    pub fn all() -> &'static [DayCountConvention] {
        &[
            DayCountConvention::Act360,
            DayCountConvention::Act365Fixed,
            DayCountConvention::ActActIsda,
        ]
    }
}

impl DayCount for DayCountConvention {
    fn name(&self) -> &'static str {
        self.day_counter().name()
    }

    fn year_fraction(&self, start: Date, end: Date) -> f64 {
        self.day_counter().year_fraction(start, end)
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        self.day_counter().day_count(start, end)
    }
}

impl fmt::Display for DayCountConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for DayCountConvention {
    type Err = CoreError;

    /// Parses a day count convention from a string.
    ///
    /// Supports market style ("ACT/365F"), enum style ("Act365Fixed") and
    /// common aliases ("ACTUAL/360").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase();

        match normalized.as_str() {
            "ACT/360" | "ACTUAL/360" | "ACT360" => Ok(DayCountConvention::Act360),

            "ACT/365" | "ACT/365F" | "ACT/365 FIXED" | "ACTUAL/365" | "ACTUAL/365 FIXED"
            | "ACT365FIXED" | "ACT365" | "ACT_365F" => Ok(DayCountConvention::Act365Fixed),

            "ACT/ACT" | "ACT/ACT ISDA" | "ACTUAL/ACTUAL" | "ACTUAL/ACTUAL ISDA" | "ACTACTISDA"
            | "ACTACT" => Ok(DayCountConvention::ActActIsda),

            _ => Err(CoreError::unknown_convention("day count", s)),
        }
    }
}

impl TryFrom<String> for DayCountConvention {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DayCountConvention> for String {
    fn from(dc: DayCountConvention) -> Self {
        dc.name().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_convention_enum() {
        for convention in DayCountConvention::all() {
            let start = Date::from_ymd(2025, 1, 1).unwrap();
            let end = Date::from_ymd(2025, 7, 1).unwrap();
            let yf = convention.year_fraction(start, end);

            // All conventions should give roughly half a year
            assert!(yf > 0.4 && yf < 0.6, "{convention}: {yf}");
            assert_eq!(convention.day_count(start, end), 181);
        }
    }

    #[test]
    fn test_convention_names_parse_back() {
        for convention in DayCountConvention::all() {
            let parsed: DayCountConvention = convention.name().parse().unwrap();
            assert_eq!(parsed, *convention);
        }
        assert!("30/365".parse::<DayCountConvention>().is_err());
    }

    #[test]
    fn test_aliases() {
        assert_eq!(
            "actual/360".parse::<DayCountConvention>().unwrap(),
            DayCountConvention::Act360
        );
        assert_eq!(
            "ACT_365F".parse::<DayCountConvention>().unwrap(),
            DayCountConvention::Act365Fixed
        );
    }

    #[test]
    fn test_serde() {
        let json = serde_json::to_string(&DayCountConvention::Act365Fixed).unwrap();
        assert_eq!(json, "\"ACT/365F\"");
        let back: DayCountConvention = serde_json::from_str("\"ACT/360\"").unwrap();
        assert_eq!(back, DayCountConvention::Act360);
    }

    #[test]
    fn test_negative_year_fraction() {
        let start = Date::from_ymd(2024, 6, 6).unwrap();
        let end = Date::from_ymd(2024, 6, 5).unwrap();
        assert_relative_eq!(
            DayCountConvention::Act365Fixed.year_fraction(start, end),
            -1.0 / 365.0
        );
    }
}
