//! Calibration objective for a single bootstrap node.
//!
//! Given the curve solved so far and one instrument's cashflows, the
//! objective maps a trial zero rate for the instrument's node to its pricing
//! error. Every evaluation builds its own trial curve, so the objective is a
//! pure function of the trial rate and can be called any number of times by
//! the root finder.

use crate::curves::DiscountCurve;
use crate::error::CurveResult;
use crate::schedule::CashflowSet;

/// How the trial rate is written into the curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeUpdate {
    /// Node insertion: the node is placed at the instrument's maturity
    /// following [`DiscountCurve::with_node`].
    Insert,
    /// The curve already holds the node at the right time; only its rate is
    /// replaced ([`DiscountCurve::with_value_at`]).
    Replace,
}

/// Pricing error of one instrument as a function of its node's zero rate.
#[derive(Debug, Clone, Copy)]
pub struct CalibrationObjective<'a> {
    curve: &'a DiscountCurve,
    cashflows: &'a CashflowSet,
    node: usize,
    update: NodeUpdate,
}

impl<'a> CalibrationObjective<'a> {
    /// Creates the objective for node `node` of `curve`.
    #[must_use]
    pub fn new(
        curve: &'a DiscountCurve,
        cashflows: &'a CashflowSet,
        node: usize,
        update: NodeUpdate,
    ) -> Self {
        Self {
            curve,
            cashflows,
            node,
            update,
        }
    }

    /// Node index being solved.
    #[must_use]
    pub fn node(&self) -> usize {
        self.node
    }

    /// The curve with the node set to `rate`.
    pub fn trial_curve(&self, rate: f64) -> CurveResult<DiscountCurve> {
        match self.update {
            NodeUpdate::Insert => self
                .curve
                .with_node(self.node, self.cashflows.maturity_time, rate),
            NodeUpdate::Replace => self.curve.with_value_at(self.node, rate),
        }
    }

    /// Settlement value minus par:
    /// `Σ amount · DF(t) / DF(settlement) − 1` on the trial curve.
    pub fn residual(&self, rate: f64) -> CurveResult<f64> {
        let trial = self.trial_curve(rate)?;
        Ok(self.cashflows.settlement_value(&trial)? - 1.0)
    }

    /// The residual as a total function for the root finder; failures map to
    /// NaN, which the solver reports as a non-finite residual.
    #[must_use]
    pub fn evaluate(&self, rate: f64) -> f64 {
        self.residual(rate).unwrap_or(f64::NAN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use parcurve_core::daycounts::DayCountConvention;
    use parcurve_core::Date;

    use crate::schedule::Cashflow;

    fn anchor() -> Date {
        Date::from_ymd(2024, 6, 5).unwrap()
    }

    fn single_payment(settlement_time: f64, maturity_time: f64, amount: f64) -> CashflowSet {
        CashflowSet {
            instrument_id: "TEST".to_string(),
            settlement_date: anchor(),
            maturity_date: anchor(),
            settlement_time,
            maturity_time,
            cashflows: vec![Cashflow {
                payment_date: anchor(),
                time: maturity_time,
                amount,
            }],
        }
    }

    #[test]
    fn test_first_node_has_closed_form_root() {
        let curve =
            DiscountCurve::placeholder("X", anchor(), DayCountConvention::Act365Fixed, 0.05).unwrap();
        // pays 1 + r·τ at t = 0.5 from settlement at 0: root z = ln(1 + r·τ) / t
        let cashflows = single_payment(0.0, 0.5, 1.0 + 0.02 * 0.5);
        let objective = CalibrationObjective::new(&curve, &cashflows, 0, NodeUpdate::Insert);

        let root = (1.0_f64 + 0.01).ln() / 0.5;
        assert_relative_eq!(objective.residual(root).unwrap(), 0.0, epsilon = 1e-15);
        assert!(objective.residual(root + 0.001).unwrap() < 0.0);
        assert!(objective.residual(root - 0.001).unwrap() > 0.0);
    }

    #[test]
    fn test_objective_does_not_mutate_base_curve() {
        let curve =
            DiscountCurve::placeholder("X", anchor(), DayCountConvention::Act365Fixed, 0.05).unwrap();
        let cashflows = single_payment(0.0, 0.25, 1.005);
        let objective = CalibrationObjective::new(&curve, &cashflows, 0, NodeUpdate::Insert);

        let first = objective.residual(0.02).unwrap();
        let _ = objective.residual(0.07).unwrap();
        assert_eq!(objective.residual(0.02).unwrap(), first);
        assert_eq!(curve.zero_rates(), &[0.05, 0.05]);
    }

    #[test]
    fn test_replace_update_keeps_node_times() {
        let curve = DiscountCurve::new(
            "X",
            anchor(),
            DayCountConvention::Act365Fixed,
            vec![0.25, 1.0],
            vec![0.02, 0.02],
        )
        .unwrap();
        let cashflows = single_payment(0.0, 1.0, 1.02);
        let objective = CalibrationObjective::new(&curve, &cashflows, 1, NodeUpdate::Replace);
        let trial = objective.trial_curve(0.03).unwrap();
        assert_eq!(trial.times(), &[0.25, 1.0]);
        assert_eq!(trial.zero_rates(), &[0.02, 0.03]);
    }

    #[test]
    fn test_invalid_trial_curve_evaluates_to_nan() {
        let curve = DiscountCurve::new(
            "X",
            anchor(),
            DayCountConvention::Act365Fixed,
            vec![0.25, 1.0],
            vec![0.02, 0.02],
        )
        .unwrap();
        // node 2 placed before node 1 breaks monotonicity
        let cashflows = single_payment(0.0, 0.5, 1.01);
        let objective = CalibrationObjective::new(&curve, &cashflows, 2, NodeUpdate::Insert);
        assert!(objective.residual(0.02).is_err());
        assert!(objective.evaluate(0.02).is_nan());
    }
}
