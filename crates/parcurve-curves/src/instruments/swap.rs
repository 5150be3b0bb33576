//! Fixed-vs-floating swap instrument.

use serde::{Deserialize, Serialize};

use parcurve_core::calendars::BusinessDayConvention;
use parcurve_core::{Frequency, Period};

use super::{InstrumentType, ToCashflowSet};
use crate::error::CurveResult;
use crate::schedule::{generate, CashflowSet, ScheduleContext, ScheduleTerms};

fn spot_offset() -> Period {
    Period::days(1)
}

fn modified_following() -> BusinessDayConvention {
    BusinessDayConvention::ModifiedFollowing
}

/// A fixed-vs-floating interest rate swap, calibrated through its fixed leg.
///
/// At par the floating leg plus a notional exchange at maturity is worth one
/// at settlement, so the fixed leg with the notional added to its final
/// coupon must be worth one as well:
///
/// ```text
/// Σ c × τᵢ × DF(tᵢ) / DF(settle) + DF(T) / DF(settle) = 1
/// ```
///
/// Coupons are paid every `frequency` period from settlement. When the
/// frequency equals the tenor, or is [`Frequency::Term`], there is a single
/// payment at maturity.
///
/// # Example
///
/// ```rust
/// use parcurve_core::calendars::BusinessDayConvention;
/// use parcurve_core::{Frequency, Period};
/// use parcurve_curves::instruments::FixedLegSwap;
///
/// // 5Y FR007 swap, quarterly fixed leg, spot T+1
/// let swap = FixedLegSwap::new(
///     "FR007-5Y",
///     Period::days(1),
///     Period::years(5),
///     Frequency::Quarterly,
///     BusinessDayConvention::ModifiedFollowing,
///     0.0202,
/// );
/// assert_eq!(swap.fixed_rate(), 0.0202);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedLegSwap {
    id: String,
    #[serde(default = "spot_offset")]
    start_offset: Period,
    tenor: Period,
    #[serde(default)]
    frequency: Frequency,
    #[serde(default = "modified_following")]
    convention: BusinessDayConvention,
    fixed_rate: f64,
}

impl FixedLegSwap {
    /// Creates a new swap.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        start_offset: Period,
        tenor: Period,
        frequency: Frequency,
        convention: BusinessDayConvention,
        fixed_rate: f64,
    ) -> Self {
        Self {
            id: id.into(),
            start_offset,
            tenor,
            frequency,
            convention,
            fixed_rate,
        }
    }

    /// Returns the start offset.
    #[must_use]
    pub fn start_offset(&self) -> Period {
        self.start_offset
    }

    /// Returns the tenor.
    #[must_use]
    pub fn tenor(&self) -> Period {
        self.tenor
    }

    /// Returns the fixed leg payment frequency.
    #[must_use]
    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// Returns the adjustment convention for payment and maturity dates.
    #[must_use]
    pub fn convention(&self) -> BusinessDayConvention {
        self.convention
    }

    /// Returns the fixed rate.
    #[must_use]
    pub fn fixed_rate(&self) -> f64 {
        self.fixed_rate
    }
}

impl ToCashflowSet for FixedLegSwap {
    fn id(&self) -> &str {
        &self.id
    }

    fn instrument_type(&self) -> InstrumentType {
        InstrumentType::Swap
    }

    fn quoted_rate(&self) -> f64 {
        self.fixed_rate
    }

    fn maturity_period(&self) -> Period {
        self.start_offset.plus(self.tenor).normalized()
    }

    fn to_cashflow_set(&self, ctx: &ScheduleContext<'_>) -> CurveResult<CashflowSet> {
        generate(
            ctx,
            &ScheduleTerms {
                id: &self.id,
                start_offset: self.start_offset,
                tenor: self.tenor,
                payment_period: self.frequency.period(),
                convention: self.convention,
                rate: self.fixed_rate,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use parcurve_core::calendars::WeekendCalendar;
    use parcurve_core::daycounts::{DayCount, DayCountConvention};
    use parcurve_core::Date;

    fn ctx(cal: &WeekendCalendar) -> ScheduleContext<'_> {
        ScheduleContext::new(Date::from_ymd(2024, 6, 5).unwrap(), DayCountConvention::Act365Fixed, cal)
    }

    #[test]
    fn test_quarterly_swap_cashflows() {
        let cal = WeekendCalendar;
        let swap = FixedLegSwap::new(
            "FR007-2Y",
            Period::days(1),
            Period::years(2),
            Frequency::Quarterly,
            BusinessDayConvention::ModifiedFollowing,
            0.018325,
        );
        let set = swap.to_cashflow_set(&ctx(&cal)).unwrap();

        assert_eq!(set.len(), 8);
        let coupons: f64 = set.cashflows[..7].iter().map(|cf| cf.amount).sum();
        assert!(coupons > 0.0 && coupons < 0.04);
        assert!(set.cashflows[7].amount > 1.0);
        assert!(set.cashflows.windows(2).all(|w| w[0].time < w[1].time));
        assert_relative_eq!(set.cashflows[7].time, set.maturity_time);
    }

    #[test]
    fn test_term_frequency_pays_once() {
        let cal = WeekendCalendar;
        let swap = FixedLegSwap::new(
            "T-1Y",
            Period::days(1),
            Period::years(1),
            Frequency::Term,
            BusinessDayConvention::ModifiedFollowing,
            0.02,
        );
        let set = swap.to_cashflow_set(&ctx(&cal)).unwrap();
        assert_eq!(set.len(), 1);
        let tau = DayCountConvention::Act365Fixed.year_fraction(set.settlement_date, set.maturity_date);
        assert_relative_eq!(set.cashflows[0].amount, 1.0 + 0.02 * tau, epsilon = 1e-15);
    }

    #[test]
    fn test_frequency_equal_to_tenor_pays_once() {
        let cal = WeekendCalendar;
        let swap = FixedLegSwap::new(
            "FR007-1W",
            Period::days(1),
            Period::weeks(1),
            Frequency::Weekly,
            BusinessDayConvention::Following,
            0.0184,
        );
        let set = swap.to_cashflow_set(&ctx(&cal)).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.maturity_date, Date::from_ymd(2024, 6, 13).unwrap());
    }

    #[test]
    fn test_ten_month_quarterly_swap_is_a_schedule_error() {
        let cal = WeekendCalendar;
        let swap = FixedLegSwap::new(
            "FR007-10M",
            Period::days(1),
            Period::months(10),
            Frequency::Quarterly,
            BusinessDayConvention::ModifiedFollowing,
            0.019,
        );
        let err = swap.to_cashflow_set(&ctx(&cal)).unwrap_err();
        assert!(err.is_schedule_error());
        assert_eq!(err.instrument(), Some("FR007-10M"));
    }

    #[test]
    fn test_defaults_from_json() {
        let swap: FixedLegSwap =
            serde_json::from_str(r#"{"id": "FR007-5Y", "tenor": "5Y", "fixed_rate": 0.0202}"#).unwrap();
        assert_eq!(swap.start_offset(), Period::days(1));
        assert_eq!(swap.frequency(), Frequency::Quarterly);
        assert_eq!(swap.convention(), BusinessDayConvention::ModifiedFollowing);
    }
}
