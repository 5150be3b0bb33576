//! Cashflow schedules for curve instruments.
//!
//! Every instrument reduces to the same shape for calibration: a settlement
//! time and a list of `(time, amount)` cashflows per unit notional, with the
//! notional repaid in the final cashflow. The instrument reprices to par when
//! the cashflows discounted back to settlement sum to one.

use serde::{Deserialize, Serialize};

use parcurve_core::calendars::{BusinessDayConvention, Calendar, PeriodAddition};
use parcurve_core::daycounts::{DayCount, DayCountConvention};
use parcurve_core::{Date, Period};

use crate::curves::DiscountCurve;
use crate::error::{CurveError, CurveResult};

/// A single payment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cashflow {
    /// Payment date.
    pub payment_date: Date,
    /// Payment time in years from the anchor date.
    pub time: f64,
    /// Amount per unit notional.
    pub amount: f64,
}

/// The resolved cashflows of one instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashflowSet {
    /// Instrument identifier.
    pub instrument_id: String,
    /// Settlement (spot) date.
    pub settlement_date: Date,
    /// Maturity date.
    pub maturity_date: Date,
    /// Settlement time in years from the anchor date.
    pub settlement_time: f64,
    /// Maturity time in years from the anchor date; the instrument's node time.
    pub maturity_time: f64,
    /// Cashflows in payment order; the last one repays the notional.
    pub cashflows: Vec<Cashflow>,
}

impl CashflowSet {
    /// Value at settlement per unit notional:
    /// `Σ amount · DF(time) / DF(settlement_time)`.
    pub fn settlement_value(&self, curve: &DiscountCurve) -> CurveResult<f64> {
        let settlement_df = curve.discount_factor(self.settlement_time)?;
        let mut pv = 0.0;
        for cf in &self.cashflows {
            pv += cf.amount * curve.discount_factor(cf.time)?;
        }
        Ok(pv / settlement_df)
    }

    /// Number of cashflows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cashflows.len()
    }

    /// True if there are no cashflows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cashflows.is_empty()
    }
}

/// Market context a schedule is generated in.
///
/// Settlement is the anchor plus the start offset rolled Following; accrual
/// end dates and maturity are rolled with the instrument's own convention.
#[derive(Clone, Copy)]
pub struct ScheduleContext<'a> {
    anchor: Date,
    day_count: DayCountConvention,
    calendar: &'a dyn Calendar,
    allow_irregular_final_period: bool,
}

impl std::fmt::Debug for ScheduleContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScheduleContext")
            .field("anchor", &self.anchor)
            .field("day_count", &self.day_count)
            .field("calendar", &self.calendar.name())
            .field("allow_irregular_final_period", &self.allow_irregular_final_period)
            .finish()
    }
}

impl<'a> ScheduleContext<'a> {
    /// Creates a context.
    #[must_use]
    pub fn new(anchor: Date, day_count: DayCountConvention, calendar: &'a dyn Calendar) -> Self {
        Self {
            anchor,
            day_count,
            calendar,
            allow_irregular_final_period: false,
        }
    }

    /// Accepts tenors that are not a whole number of payment periods; the
    /// remainder becomes a short final period.
    #[must_use]
    pub fn with_irregular_final_period(mut self, allow: bool) -> Self {
        self.allow_irregular_final_period = allow;
        self
    }

    /// Returns the anchor date.
    #[must_use]
    pub fn anchor(&self) -> Date {
        self.anchor
    }

    /// Returns the day count.
    #[must_use]
    pub fn day_count(&self) -> DayCountConvention {
        self.day_count
    }

    /// Returns the calendar.
    #[must_use]
    pub fn calendar(&self) -> &'a dyn Calendar {
        self.calendar
    }

    /// Whether irregular final periods are accepted.
    #[must_use]
    pub fn allows_irregular_final_period(&self) -> bool {
        self.allow_irregular_final_period
    }

    /// Year fraction from the anchor date.
    #[must_use]
    pub fn time(&self, date: Date) -> f64 {
        self.day_count.year_fraction(self.anchor, date)
    }

    /// Settlement date for a start offset.
    pub fn settlement_date(&self, start_offset: Period) -> CurveResult<Date> {
        let unadjusted = self.anchor.add_period(start_offset)?;
        Ok(self.calendar.adjust(unadjusted, BusinessDayConvention::Following)?)
    }

    fn roll(
        &self,
        from: Date,
        period: Period,
        addition: PeriodAddition,
        convention: BusinessDayConvention,
    ) -> CurveResult<Date> {
        let unadjusted = self.calendar.add_period(from, period, addition)?;
        Ok(self.calendar.adjust(unadjusted, convention)?)
    }
}

/// Terms shared by every instrument schedule.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ScheduleTerms<'i> {
    pub id: &'i str,
    pub start_offset: Period,
    pub tenor: Period,
    /// Payment period; `None` pays once at maturity.
    pub payment_period: Option<Period>,
    pub convention: BusinessDayConvention,
    pub rate: f64,
}

/// Generates the fixed cashflows of an instrument.
///
/// Coupon end dates are chained: each one adds the payment period to the
/// previous adjusted end date and adjusts again. Month-based tenors add
/// periods with [`PeriodAddition::LastBusinessDay`], so a schedule starting
/// on the last business day of a month stays on month ends.
pub(crate) fn generate(ctx: &ScheduleContext<'_>, terms: &ScheduleTerms<'_>) -> CurveResult<CashflowSet> {
    let id = terms.id;
    let tenor = terms.tenor;
    if !tenor.is_positive() {
        return Err(CurveError::schedule(id, format!("tenor must be positive, got {tenor}")));
    }
    if terms.start_offset.is_negative() {
        return Err(CurveError::schedule(
            id,
            format!("start offset must not be negative, got {}", terms.start_offset),
        ));
    }
    if !terms.rate.is_finite() {
        return Err(CurveError::schedule(id, format!("rate must be finite, got {}", terms.rate)));
    }

    let payment_period = match terms.payment_period {
        Some(period) if period != tenor => {
            if !period.is_positive() {
                return Err(CurveError::schedule(
                    id,
                    format!("payment period must be positive, got {period}"),
                ));
            }
            if !ctx.allow_irregular_final_period && !tenor.is_multiple_of(period) {
                return Err(CurveError::schedule(
                    id,
                    format!("tenor {tenor} is not a whole number of {period} payment periods"),
                ));
            }
            Some(period)
        }
        _ => None,
    };

    // date arithmetic failures (dates past the calendar range) belong to the instrument
    let date_error = |err: CurveError| CurveError::schedule(id, err.to_string());

    let addition = PeriodAddition::for_tenor(tenor);
    let settlement_date = ctx.settlement_date(terms.start_offset).map_err(date_error)?;
    let maturity_date = ctx
        .roll(settlement_date, tenor, addition, terms.convention)
        .map_err(date_error)?;
    if maturity_date <= settlement_date {
        return Err(CurveError::schedule(
            id,
            format!("maturity {maturity_date} is not after settlement {settlement_date}"),
        ));
    }

    let mut cashflows = Vec::new();
    let mut accrual_start = settlement_date;

    if let Some(period) = payment_period {
        let mut remaining = tenor.minus(period).normalized();
        while !(remaining.is_negative() || remaining.is_zero()) {
            let accrual_end = ctx
                .roll(accrual_start, period, addition, terms.convention)
                .map_err(date_error)?;
            if accrual_end <= accrual_start {
                return Err(CurveError::schedule(
                    id,
                    format!("accrual period {accrual_start} to {accrual_end} is empty"),
                ));
            }
            let accrual = ctx.day_count.year_fraction(accrual_start, accrual_end);
            cashflows.push(Cashflow {
                payment_date: accrual_end,
                time: ctx.time(accrual_end),
                amount: accrual * terms.rate,
            });
            accrual_start = accrual_end;
            remaining = remaining.minus(period).normalized();
        }
    }

    if maturity_date <= accrual_start {
        return Err(CurveError::schedule(
            id,
            format!("final accrual period {accrual_start} to {maturity_date} is empty"),
        ));
    }
    let accrual = ctx.day_count.year_fraction(accrual_start, maturity_date);
    cashflows.push(Cashflow {
        payment_date: maturity_date,
        time: ctx.time(maturity_date),
        amount: 1.0 + accrual * terms.rate,
    });

    Ok(CashflowSet {
        instrument_id: id.to_string(),
        settlement_date,
        maturity_date,
        settlement_time: ctx.time(settlement_date),
        maturity_time: ctx.time(maturity_date),
        cashflows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use parcurve_core::calendars::{CalendarId, WeekendCalendar};

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    fn terms(tenor: Period, payment_period: Option<Period>) -> ScheduleTerms<'static> {
        ScheduleTerms {
            id: "TEST",
            start_offset: Period::days(1),
            tenor,
            payment_period,
            convention: BusinessDayConvention::ModifiedFollowing,
            rate: 0.02,
        }
    }

    #[test]
    fn test_single_payment() {
        let cal = WeekendCalendar;
        let ctx = ScheduleContext::new(d(2024, 6, 5), DayCountConvention::Act365Fixed, &cal);
        let set = generate(&ctx, &terms(Period::months(3), Some(Period::months(3)))).unwrap();

        assert_eq!(set.settlement_date, d(2024, 6, 6));
        assert_eq!(set.maturity_date, d(2024, 9, 6));
        assert_eq!(set.len(), 1);
        let accrual = 92.0 / 365.0;
        assert_relative_eq!(set.cashflows[0].amount, 1.0 + 0.02 * accrual, epsilon = 1e-15);
        assert_relative_eq!(set.settlement_time, 1.0 / 365.0);
        assert_relative_eq!(set.maturity_time, 93.0 / 365.0);
    }

    #[test]
    fn test_quarterly_coupons_chain_from_adjusted_dates() {
        let cal = WeekendCalendar;
        let ctx = ScheduleContext::new(d(2024, 6, 5), DayCountConvention::Act365Fixed, &cal);
        let set = generate(&ctx, &terms(Period::years(1), Some(Period::months(3)))).unwrap();

        let dates: Vec<Date> = set.cashflows.iter().map(|cf| cf.payment_date).collect();
        // 2024-12-06 and 2025-03-06 are business days, 2025-06-06 is a Friday
        assert_eq!(dates, vec![d(2024, 9, 6), d(2024, 12, 6), d(2025, 3, 6), d(2025, 6, 6)]);
        assert!(set.cashflows[..3].iter().all(|cf| cf.amount < 0.01));
        assert!(set.cashflows[3].amount > 1.0);
        assert_eq!(set.maturity_date, d(2025, 6, 6));
    }

    #[test]
    fn test_month_end_schedule_stays_on_month_end() {
        let cal = WeekendCalendar;
        // 2024-05-30 + 1D = 2024-05-31 (Friday), last business day of May
        let ctx = ScheduleContext::new(d(2024, 5, 30), DayCountConvention::Act365Fixed, &cal);
        let set = generate(&ctx, &terms(Period::months(6), Some(Period::months(3)))).unwrap();
        assert_eq!(set.settlement_date, d(2024, 5, 31));
        assert_eq!(set.cashflows[0].payment_date, d(2024, 8, 30));
        assert_eq!(set.maturity_date, d(2024, 11, 29));
    }

    #[test]
    fn test_irregular_tenor_rejected_by_default() {
        let cal = WeekendCalendar;
        let ctx = ScheduleContext::new(d(2024, 6, 5), DayCountConvention::Act365Fixed, &cal);
        let err = generate(&ctx, &terms(Period::months(10), Some(Period::months(3)))).unwrap_err();
        assert!(err.is_schedule_error());
        assert_eq!(err.instrument(), Some("TEST"));
    }

    #[test]
    fn test_irregular_final_period_when_allowed() {
        let cal = WeekendCalendar;
        let ctx = ScheduleContext::new(d(2024, 6, 5), DayCountConvention::Act365Fixed, &cal)
            .with_irregular_final_period(true);
        let set = generate(&ctx, &terms(Period::months(10), Some(Period::months(3)))).unwrap();
        assert_eq!(set.len(), 4);
        let last = set.cashflows[3];
        let previous = set.cashflows[2];
        assert_eq!(last.payment_date, set.maturity_date);
        // one-month stub
        let stub = DayCountConvention::Act365Fixed.year_fraction(previous.payment_date, last.payment_date);
        assert!(stub < 0.1);
        assert_relative_eq!(last.amount, 1.0 + 0.02 * stub, epsilon = 1e-15);
    }

    #[test]
    fn test_tenor_beyond_date_range() {
        let cal = WeekendCalendar;
        let ctx = ScheduleContext::new(d(2024, 6, 5), DayCountConvention::Act365Fixed, &cal);
        let err = generate(&ctx, &terms(Period::years(i32::MAX / 12), None)).unwrap_err();
        assert!(err.is_schedule_error());
        assert_eq!(err.instrument(), Some("TEST"));
    }

    #[test]
    fn test_zero_tenor_rejected() {
        let cal = WeekendCalendar;
        let ctx = ScheduleContext::new(d(2024, 6, 5), DayCountConvention::Act365Fixed, &cal);
        let err = generate(&ctx, &terms(Period::ZERO, None)).unwrap_err();
        assert!(err.is_schedule_error());
    }

    #[test]
    fn test_overnight_on_holiday_calendar() {
        let cal = CalendarId::Cnbe.calendar();
        // 2024-09-30 spot 0D, 1D tenor rolls over the National Day holiday
        let ctx = ScheduleContext::new(d(2024, 9, 30), DayCountConvention::Act365Fixed, cal);
        let overnight = ScheduleTerms {
            id: "ON",
            start_offset: Period::ZERO,
            tenor: Period::days(1),
            payment_period: None,
            convention: BusinessDayConvention::Following,
            rate: 0.018,
        };
        let set = generate(&ctx, &overnight).unwrap();
        assert_eq!(set.settlement_date, d(2024, 9, 30));
        assert_eq!(set.maturity_date, d(2024, 10, 8));
        assert_relative_eq!(set.settlement_time, 0.0);
    }

    #[test]
    fn test_settlement_value_on_flat_curve() {
        let cal = WeekendCalendar;
        let ctx = ScheduleContext::new(d(2024, 6, 5), DayCountConvention::Act365Fixed, &cal);
        let set = generate(&ctx, &terms(Period::months(3), None)).unwrap();
        let curve = DiscountCurve::new(
            "FLAT",
            d(2024, 6, 5),
            DayCountConvention::Act365Fixed,
            vec![1.0, 2.0],
            vec![0.0, 0.0],
        )
        .unwrap();
        let value = set.settlement_value(&curve).unwrap();
        assert_relative_eq!(value, set.cashflows[0].amount, epsilon = 1e-15);
    }
}
