//! Par repricing of the input instruments on a finished curve.
//!
//! Every node is solved so that its own instrument is worth exactly one unit
//! of notional at settlement. Later nodes only move the curve beyond that
//! maturity, so the condition must still hold on the final curve; this module
//! measures how well it does.
//!
//! ```rust,ignore
//! let result = bootstrapper.bootstrap_validated(DayCountConvention::Act365Fixed, calendar)?;
//! for miss in result.repricing_report.failures() {
//!     eprintln!("{miss}");
//! }
//! let curve = result.into_valid_curve()?;
//! ```

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::bootstrap::NodeDiagnostics;
use crate::curves::DiscountCurve;
use crate::error::{CurveError, CurveResult};
use crate::schedule::CashflowSet;

/// Settlement value of a par instrument per unit notional.
pub const PAR_VALUE: f64 = 1.0;

/// One instrument priced on the final curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepricingCheck {
    /// Instrument identifier.
    pub instrument_id: String,
    /// Node time of the instrument.
    pub maturity_time: f64,
    /// Settlement value implied by the curve.
    pub model_pv: f64,
    /// Distance from par.
    pub error: f64,
    /// Largest accepted distance from par.
    pub tolerance: f64,
}

impl RepricingCheck {
    /// Records a settlement value against par.
    #[must_use]
    pub fn new(instrument_id: impl Into<String>, maturity_time: f64, model_pv: f64, tolerance: f64) -> Self {
        Self {
            instrument_id: instrument_id.into(),
            maturity_time,
            model_pv,
            error: (model_pv - PAR_VALUE).abs(),
            tolerance,
        }
    }

    /// Prices a cashflow set on `curve`.
    pub fn price(cashflows: &CashflowSet, curve: &DiscountCurve, tolerance: f64) -> CurveResult<Self> {
        let model_pv = cashflows.settlement_value(curve)?;
        Ok(Self::new(
            cashflows.instrument_id.as_str(),
            cashflows.maturity_time,
            model_pv,
            tolerance,
        ))
    }

    /// True if the instrument prices to par within tolerance.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.error <= self.tolerance
    }
}

impl fmt::Display for RepricingCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<4} {:<12} t={:>9.6} pv={:.10} err={:.2e}",
            if self.passed() { "ok" } else { "MISS" },
            self.instrument_id,
            self.maturity_time,
            self.model_pv,
            self.error
        )
    }
}

/// Repricing of every instrument of a curve, in node order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepricingReport {
    checks: Vec<RepricingCheck>,
}

impl RepricingReport {
    /// Wraps a list of checks.
    #[must_use]
    pub fn new(checks: Vec<RepricingCheck>) -> Self {
        Self { checks }
    }

    /// Prices every cashflow set on `curve`.
    pub fn reprice(curve: &DiscountCurve, cashflows: &[CashflowSet], tolerance: f64) -> CurveResult<Self> {
        cashflows
            .iter()
            .map(|set| RepricingCheck::price(set, curve, tolerance))
            .collect::<CurveResult<Vec<_>>>()
            .map(Self::new)
    }

    /// True if every instrument reprices.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.checks.iter().all(RepricingCheck::passed)
    }

    /// All checks.
    #[must_use]
    pub fn checks(&self) -> &[RepricingCheck] {
        &self.checks
    }

    /// Largest distance from par; zero for an empty report.
    #[must_use]
    pub fn max_error(&self) -> f64 {
        self.checks.iter().fold(0.0, |acc, c| acc.max(c.error))
    }

    /// Root-mean-square distance from par.
    #[must_use]
    pub fn rms_error(&self) -> f64 {
        if self.checks.is_empty() {
            return 0.0;
        }
        let sum_sq: f64 = self.checks.iter().map(|c| c.error.powi(2)).sum();
        (sum_sq / self.checks.len() as f64).sqrt()
    }

    /// Checks outside tolerance.
    pub fn failures(&self) -> impl Iterator<Item = &RepricingCheck> {
        self.checks.iter().filter(|c| !c.passed())
    }

    /// Identifiers of the instruments outside tolerance.
    #[must_use]
    pub fn failed_instruments(&self) -> Vec<&str> {
        self.failures().map(|c| c.instrument_id.as_str()).collect()
    }
}

impl fmt::Display for RepricingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let missed = self.failures().count();
        writeln!(
            f,
            "repriced {} instruments, {} outside tolerance (max {:.2e}, rms {:.2e})",
            self.checks.len(),
            missed,
            self.max_error(),
            self.rms_error()
        )?;
        for check in &self.checks {
            writeln!(f, "  {check}")?;
        }
        Ok(())
    }
}

/// A bootstrapped curve with per-node diagnostics and its repricing report.
#[derive(Debug, Clone)]
pub struct BootstrapResult {
    /// The bootstrapped curve.
    pub curve: DiscountCurve,
    /// Solve diagnostics in node order.
    pub nodes: Vec<NodeDiagnostics>,
    /// Repricing of every input instrument on the final curve.
    pub repricing_report: RepricingReport,
    /// Wall time of the build, schedules and repricing included.
    pub build_duration: Duration,
}

impl BootstrapResult {
    /// True if every instrument reprices within tolerance.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.repricing_report.is_valid()
    }

    /// Largest repricing error.
    #[must_use]
    pub fn max_error(&self) -> f64 {
        self.repricing_report.max_error()
    }

    /// Instruments that do not reprice.
    #[must_use]
    pub fn failed_instruments(&self) -> Vec<&str> {
        self.repricing_report.failed_instruments()
    }

    /// The curve, or a configuration error naming the instruments that do
    /// not reprice.
    pub fn into_valid_curve(self) -> CurveResult<DiscountCurve> {
        if self.is_valid() {
            return Ok(self.curve);
        }
        Err(CurveError::configuration(format!(
            "curve {} does not reprice {} (max error {:.2e})",
            self.curve.name(),
            self.failed_instruments().join(", "),
            self.max_error()
        )))
    }

    /// The curve, valid or not.
    #[must_use]
    pub fn into_curve(self) -> DiscountCurve {
        self.curve
    }
}

impl fmt::Display for BootstrapResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}: {} nodes built in {:?}",
            self.curve.name(),
            self.nodes.len(),
            self.build_duration
        )?;
        write!(f, "{}", self.repricing_report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::Cashflow;
    use parcurve_core::daycounts::DayCountConvention;
    use parcurve_core::Date;

    #[test]
    fn test_check_tolerance() {
        let check = RepricingCheck::new("FR007-1Y", 1.0, 1.0 + 1e-12, 1e-8);
        assert!(check.passed());
        assert!(check.error < 1e-11);

        let check = RepricingCheck::new("FR007-1Y", 1.0, 1.001, 1e-8);
        assert!(!check.passed());
        assert!(check.to_string().starts_with("MISS"));
    }

    #[test]
    fn test_report_statistics() {
        let report = RepricingReport::new(vec![
            RepricingCheck::new("A", 0.5, 1.0, 1e-8),
            RepricingCheck::new("B", 1.0, 1.0 + 3e-8, 1e-8),
            RepricingCheck::new("C", 2.0, 1.0 - 4e-8, 1e-8),
        ]);
        assert!(!report.is_valid());
        assert_eq!(report.failures().count(), 2);
        assert_eq!(report.failed_instruments(), vec!["B", "C"]);
        assert!((report.max_error() - 4e-8).abs() < 1e-15);
        assert!((report.rms_error() - (25e-16_f64 / 3.0).sqrt()).abs() < 1e-15);
        assert!(report.to_string().contains("3 instruments, 2 outside tolerance"));

        let empty = RepricingReport::default();
        assert!(empty.is_valid());
        assert_eq!(empty.max_error(), 0.0);
        assert_eq!(empty.rms_error(), 0.0);
    }

    #[test]
    fn test_reprice_on_curve() {
        let anchor = Date::from_ymd(2024, 6, 5).unwrap();
        let curve = DiscountCurve::new(
            "FLAT",
            anchor,
            DayCountConvention::Act365Fixed,
            vec![1.0, 2.0],
            vec![0.02, 0.02],
        )
        .unwrap();
        // zero coupon paying exp(0.02) at t = 1 is worth exactly par
        let set = CashflowSet {
            instrument_id: "ZC".to_string(),
            settlement_date: anchor,
            maturity_date: anchor,
            settlement_time: 0.0,
            maturity_time: 1.0,
            cashflows: vec![Cashflow {
                payment_date: anchor,
                time: 1.0,
                amount: 0.02_f64.exp(),
            }],
        };
        let report = RepricingReport::reprice(&curve, &[set], 1e-12).unwrap();
        assert!(report.is_valid());
        assert_eq!(report.checks()[0].instrument_id, "ZC");
    }
}
