//! Payment frequencies.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::Period;
use crate::error::CoreError;

/// Payment frequency of a fixed leg.
///
/// Besides the usual coupon frequencies this covers the short money-market
/// frequencies used by overnight and weekly repo swaps, and `Term` for a
/// single payment at maturity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Frequency {
    /// Daily payments (P1D)
    #[serde(alias = "1D", alias = "P1D")]
    Daily,
    /// Weekly payments (P1W)
    #[serde(alias = "1W", alias = "P1W")]
    Weekly,
    /// Monthly payments (P1M)
    #[serde(alias = "1M", alias = "P1M")]
    Monthly,
    /// Quarterly payments (P3M) - standard for CNY repo swaps
    #[default]
    #[serde(alias = "3M", alias = "P3M")]
    Quarterly,
    /// Semi-annual payments (P6M)
    #[serde(alias = "6M", alias = "P6M")]
    SemiAnnual,
    /// Annual payments (P12M)
    #[serde(alias = "1Y", alias = "12M", alias = "P12M")]
    Annual,
    /// One payment at maturity
    #[serde(alias = "T", alias = "TERM")]
    Term,
}

impl Frequency {
    /// Returns the payment period, or `None` for [`Frequency::Term`].
    #[must_use]
    pub fn period(&self) -> Option<Period> {
        match self {
            Frequency::Daily => Some(Period::days(1)),
            Frequency::Weekly => Some(Period::weeks(1)),
            Frequency::Monthly => Some(Period::months(1)),
            Frequency::Quarterly => Some(Period::months(3)),
            Frequency::SemiAnnual => Some(Period::months(6)),
            Frequency::Annual => Some(Period::months(12)),
            Frequency::Term => None,
        }
    }

    /// Returns true if there are no intermediate payments.
    #[must_use]
    pub fn is_term(&self) -> bool {
        matches!(self, Frequency::Term)
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Frequency::Daily => "Daily",
            Frequency::Weekly => "Weekly",
            Frequency::Monthly => "Monthly",
            Frequency::Quarterly => "Quarterly",
            Frequency::SemiAnnual => "Semi-Annual",
            Frequency::Annual => "Annual",
            Frequency::Term => "Term",
        };
        write!(f, "{name}")
    }
}

impl FromStr for Frequency {
    type Err = CoreError;

    /// Accepts names ("Quarterly"), and period notation ("3M", "P1W").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace(['-', '_', ' '], "");
        match normalized.as_str() {
            "DAILY" => return Ok(Frequency::Daily),
            "WEEKLY" => return Ok(Frequency::Weekly),
            "MONTHLY" => return Ok(Frequency::Monthly),
            "QUARTERLY" => return Ok(Frequency::Quarterly),
            "SEMIANNUAL" => return Ok(Frequency::SemiAnnual),
            "ANNUAL" => return Ok(Frequency::Annual),
            "TERM" | "T" => return Ok(Frequency::Term),
            _ => {}
        }

        let period = Period::parse(&normalized)
            .map_err(|_| CoreError::unknown_convention("frequency", s))?;
        [
            Frequency::Daily,
            Frequency::Weekly,
            Frequency::Monthly,
            Frequency::Quarterly,
            Frequency::SemiAnnual,
            Frequency::Annual,
        ]
        .into_iter()
        .find(|f| f.period() == Some(period))
        .ok_or_else(|| CoreError::unknown_convention("frequency", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_periods() {
        assert_eq!(Frequency::Quarterly.period(), Some(Period::months(3)));
        assert_eq!(Frequency::Annual.period(), Some(Period::years(1)));
        assert_eq!(Frequency::Weekly.period(), Some(Period::days(7)));
        assert!(Frequency::Term.period().is_none());
    }

    #[test]
    fn test_from_str() {
        assert_eq!("quarterly".parse::<Frequency>().unwrap(), Frequency::Quarterly);
        assert_eq!("Semi-Annual".parse::<Frequency>().unwrap(), Frequency::SemiAnnual);
        assert_eq!("P1D".parse::<Frequency>().unwrap(), Frequency::Daily);
        assert_eq!("1Y".parse::<Frequency>().unwrap(), Frequency::Annual);
        assert_eq!("Term".parse::<Frequency>().unwrap(), Frequency::Term);
        assert!("5M".parse::<Frequency>().is_err());
        assert!("sometimes".parse::<Frequency>().is_err());
    }

    #[test]
    fn test_serde_aliases() {
        let f: Frequency = serde_json::from_str("\"P3M\"").unwrap();
        assert_eq!(f, Frequency::Quarterly);
        let f: Frequency = serde_json::from_str("\"Weekly\"").unwrap();
        assert_eq!(f, Frequency::Weekly);
    }
}
