//! Sequential bootstrap algorithm.
//!
//! Solves one zero-rate node per instrument, shortest maturity first. Each
//! solve holds every earlier node fixed, so an instrument's cashflows only
//! ever see nodes that are already final.

use std::fmt;
use std::time::Instant;

use nalgebra::DVector;
use serde::{Deserialize, Serialize};
use tracing::{debug, field, info, info_span, warn};

use parcurve_core::calendars::{Calendar, CalendarId};
use parcurve_core::daycounts::DayCountConvention;
use parcurve_core::Date;
use parcurve_math::solvers::NewtonVectorRootFinder;

use super::config::{BootstrapConfig, NodeSeeding};
use crate::curves::DiscountCurve;
use crate::error::{CurveError, CurveResult};
use crate::instruments::{CurveInstrument, InstrumentQuote, InstrumentType, ToCashflowSet};
use crate::objective::{CalibrationObjective, NodeUpdate};
use crate::repricing::{BootstrapResult, RepricingReport};
use crate::schedule::{CashflowSet, ScheduleContext};

/// Default curve name.
pub const DEFAULT_CURVE_NAME: &str = "DISCOUNT";

/// Progress of a bootstrap run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BootstrapState {
    /// Schedules are being generated; no node solved yet.
    #[default]
    Unstarted,
    /// Solving the node with this index.
    Solving(usize),
    /// Every node solved.
    Done,
}

impl fmt::Display for BootstrapState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unstarted => write!(f, "unstarted"),
            Self::Solving(node) => write!(f, "solving node {node}"),
            Self::Done => write!(f, "done"),
        }
    }
}

/// Solve record of one node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDiagnostics {
    /// Node index in maturity order.
    pub index: usize,
    /// Instrument identifier.
    pub instrument_id: String,
    /// Instrument type.
    pub instrument_type: InstrumentType,
    /// Maturity date of the instrument.
    pub maturity_date: Date,
    /// Node time.
    pub time: f64,
    /// Quoted rate (the initial guess).
    pub quoted_rate: f64,
    /// Solved zero rate.
    pub zero_rate: f64,
    /// Newton iterations used.
    pub iterations: u32,
    /// Residual at the solution.
    pub residual: f64,
}

/// Sequential bootstrapper for building zero-rate discount curves.
///
/// The sequential bootstrap algorithm:
/// 1. Order instruments by maturity period (start offset plus tenor)
/// 2. Generate and validate every cashflow schedule
/// 3. For each instrument, solve for the zero rate at its maturity that
///    prices it to par, holding earlier nodes fixed
/// 4. Return the curve with one node per instrument
///
/// The bootstrapper is a reusable description of the build: running it twice
/// with the same inputs gives the same curve.
///
/// # Example
///
/// ```rust
/// use parcurve_core::calendars::{BusinessDayConvention, CalendarId};
/// use parcurve_core::daycounts::DayCountConvention;
/// use parcurve_core::{Date, Frequency, Period};
/// use parcurve_curves::bootstrap::SequentialBootstrapper;
/// use parcurve_curves::instruments::{Deposit, FixedLegSwap};
///
/// let anchor = Date::from_ymd(2024, 6, 5).unwrap();
/// let mf = BusinessDayConvention::ModifiedFollowing;
///
/// let curve = SequentialBootstrapper::new(anchor)
///     .with_name("CNY-FR007")
///     .add_instrument(Deposit::new("ON", Period::ZERO, Period::days(1), BusinessDayConvention::Following, 0.0184))
///     .add_instrument(FixedLegSwap::new("3M", Period::days(1), Period::months(3), Frequency::Quarterly, mf, 0.018625))
///     .add_instrument(FixedLegSwap::new("1Y", Period::days(1), Period::years(1), Frequency::Quarterly, mf, 0.018288))
///     .bootstrap(DayCountConvention::Act365Fixed, CalendarId::Cnbe.calendar())
///     .unwrap();
///
/// assert_eq!(curve.len(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct SequentialBootstrapper {
    /// Anchor (valuation) date.
    reference_date: Date,
    /// Name given to the curve.
    name: String,
    /// Instruments in insertion order.
    instruments: Vec<CurveInstrument>,
    /// Bootstrap configuration.
    config: BootstrapConfig,
}

impl SequentialBootstrapper {
    /// Creates a new sequential bootstrapper.
    #[must_use]
    pub fn new(reference_date: Date) -> Self {
        Self {
            reference_date,
            name: DEFAULT_CURVE_NAME.to_string(),
            instruments: Vec::new(),
            config: BootstrapConfig::default(),
        }
    }

    /// Sets the bootstrap configuration.
    #[must_use]
    pub fn with_config(mut self, config: BootstrapConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the curve name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Adds an instrument to the bootstrap set.
    #[must_use]
    pub fn add_instrument(mut self, instrument: impl Into<CurveInstrument>) -> Self {
        self.instruments.push(instrument.into());
        self
    }

    /// Adds multiple instruments to the bootstrap set.
    #[must_use]
    pub fn add_instruments<I: Into<CurveInstrument>>(
        mut self,
        instruments: impl IntoIterator<Item = I>,
    ) -> Self {
        self.instruments.extend(instruments.into_iter().map(Into::into));
        self
    }

    /// Adds market quotes, resolved with the configured unsupported
    /// instrument policy. Set the configuration first.
    pub fn add_quotes(mut self, quotes: &[InstrumentQuote]) -> CurveResult<Self> {
        let resolved = InstrumentQuote::resolve_all(quotes, self.config.unsupported_instruments)?;
        self.instruments.extend(resolved);
        Ok(self)
    }

    /// Returns the anchor date.
    #[must_use]
    pub fn reference_date(&self) -> Date {
        self.reference_date
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &BootstrapConfig {
        &self.config
    }

    /// Returns the instruments in insertion order.
    #[must_use]
    pub fn instruments(&self) -> &[CurveInstrument] {
        &self.instruments
    }

    /// Bootstraps the curve.
    ///
    /// # Errors
    ///
    /// - `CurveError::Schedule` if an instrument has an invalid schedule
    /// - `CurveError::Configuration` for an empty instrument set, two
    ///   instruments maturing at the same time, or a bad configuration
    /// - `CurveError::Convergence` if a node solve runs out of iterations
    pub fn bootstrap(
        &self,
        day_count: DayCountConvention,
        calendar: &dyn Calendar,
    ) -> CurveResult<DiscountCurve> {
        self.solve(day_count, calendar).map(|build| build.curve)
    }

    /// Bootstraps the curve and reprices every instrument on it.
    ///
    /// Repricing failures do not make this method fail; check
    /// [`BootstrapResult::is_valid`] or use
    /// [`BootstrapResult::into_valid_curve`].
    pub fn bootstrap_validated(
        &self,
        day_count: DayCountConvention,
        calendar: &dyn Calendar,
    ) -> CurveResult<BootstrapResult> {
        let started = Instant::now();
        let build = self.solve(day_count, calendar)?;
        let repricing_report =
            RepricingReport::reprice(&build.curve, &build.cashflows, self.config.repricing_tolerance)?;

        if !repricing_report.is_valid() {
            warn!(
                curve = %self.name,
                failed = ?repricing_report.failed_instruments(),
                max_error = repricing_report.max_error(),
                "bootstrapped curve does not reprice all instruments"
            );
        }

        Ok(BootstrapResult {
            curve: build.curve,
            nodes: build.nodes,
            repricing_report,
            build_duration: started.elapsed(),
        })
    }

    /// Orders the instruments and generates their schedules.
    fn schedules(&self, ctx: &ScheduleContext<'_>) -> CurveResult<Vec<(&CurveInstrument, CashflowSet)>> {
        let mut ordered: Vec<&CurveInstrument> = self.instruments.iter().collect();
        ordered.sort_by_key(|inst| inst.maturity_period());

        let mut schedules = Vec::with_capacity(ordered.len());
        for instrument in ordered {
            let cashflows = instrument.to_cashflow_set(ctx)?;
            schedules.push((instrument, cashflows));
        }

        for pair in schedules.windows(2) {
            let (prev, prev_set) = &pair[0];
            let (next, next_set) = &pair[1];
            if next_set.maturity_time <= prev_set.maturity_time {
                let reason = if next_set.maturity_time == prev_set.maturity_time {
                    format!(
                        "instruments {} and {} both mature on {}",
                        prev.id(),
                        next.id(),
                        next_set.maturity_date
                    )
                } else {
                    format!(
                        "instrument {} ({}) matures before {} ({})",
                        next.id(),
                        next.maturity_period(),
                        prev.id(),
                        prev.maturity_period()
                    )
                };
                return Err(CurveError::configuration(reason));
            }
        }
        Ok(schedules)
    }

    fn initial_curve(
        &self,
        day_count: DayCountConvention,
        schedules: &[(&CurveInstrument, CashflowSet)],
    ) -> CurveResult<(DiscountCurve, NodeUpdate)> {
        match self.config.seeding {
            NodeSeeding::QuotedRates if schedules.len() > 1 => {
                let times = schedules.iter().map(|(_, set)| set.maturity_time).collect();
                let rates = schedules.iter().map(|(inst, _)| inst.quoted_rate()).collect();
                let curve =
                    DiscountCurve::new(self.name.clone(), self.reference_date, day_count, times, rates)?;
                Ok((curve, NodeUpdate::Replace))
            }
            _ => {
                let curve = DiscountCurve::placeholder(
                    self.name.clone(),
                    self.reference_date,
                    day_count,
                    self.config.placeholder_rate,
                )?;
                Ok((curve, NodeUpdate::Insert))
            }
        }
    }

    fn solve(&self, day_count: DayCountConvention, calendar: &dyn Calendar) -> CurveResult<Build> {
        self.config.validate()?;
        if self.instruments.is_empty() {
            return Err(CurveError::configuration("no instruments to bootstrap"));
        }

        let span = info_span!(
            "bootstrap",
            curve = %self.name,
            anchor = %self.reference_date,
            instruments = self.instruments.len(),
            state = field::Empty,
        );
        let _guard = span.enter();
        let mut state = BootstrapState::Unstarted;
        span.record("state", &field::display(state));

        let ctx = ScheduleContext::new(self.reference_date, day_count, calendar)
            .with_irregular_final_period(self.config.allow_irregular_final_period);
        let schedules = self.schedules(&ctx)?;

        let (mut curve, update) = self.initial_curve(day_count, &schedules)?;
        let solver = NewtonVectorRootFinder::new(self.config.solver_config());
        let mut nodes = Vec::with_capacity(schedules.len());

        for (index, (instrument, cashflows)) in schedules.iter().enumerate() {
            state = BootstrapState::Solving(index);
            span.record("state", &field::display(state));

            let quote = instrument.quoted_rate();
            let objective = CalibrationObjective::new(&curve, cashflows, index, update);
            // structural problems surface here rather than as a NaN residual
            objective.residual(quote)?;

            let solution = solver
                .find_root(
                    |x: &DVector<f64>| DVector::from_element(1, objective.evaluate(x[0])),
                    &DVector::from_element(1, quote),
                )
                .map_err(|err| {
                    let err = CurveError::from_node_solve(index, instrument.id(), err);
                    warn!(node = index, instrument = instrument.id(), error = %err, "node solve failed");
                    err
                })?;

            let zero_rate = solution.root[0];
            let next = objective.trial_curve(zero_rate)?;
            debug!(
                node = index,
                instrument = instrument.id(),
                time = cashflows.maturity_time,
                quote,
                zero_rate,
                iterations = solution.iterations,
                residual = solution.residual,
                "node solved"
            );

            nodes.push(NodeDiagnostics {
                index,
                instrument_id: instrument.id().to_string(),
                instrument_type: instrument.instrument_type(),
                maturity_date: cashflows.maturity_date,
                time: cashflows.maturity_time,
                quoted_rate: quote,
                zero_rate,
                iterations: solution.iterations,
                residual: solution.residual,
            });
            curve = next;
        }

        state = BootstrapState::Done;
        span.record("state", &field::display(state));
        info!(nodes = nodes.len(), "curve bootstrapped");

        Ok(Build {
            curve,
            nodes,
            cashflows: schedules.into_iter().map(|(_, set)| set).collect(),
        })
    }
}

/// Output of a solve before repricing.
struct Build {
    curve: DiscountCurve,
    nodes: Vec<NodeDiagnostics>,
    cashflows: Vec<CashflowSet>,
}

/// Bootstraps a discount curve with the default configuration.
///
/// # Arguments
///
/// * `anchor` - Valuation date; node times are measured from it
/// * `instruments` - Deposits and swaps, in any order
/// * `day_count` - Day count for node times and accrual fractions
/// * `calendar` - Built-in holiday calendar for date adjustment
///
/// Use [`SequentialBootstrapper`] directly for a custom [`Calendar`].
pub fn bootstrap(
    anchor: Date,
    instruments: &[CurveInstrument],
    day_count: DayCountConvention,
    calendar: CalendarId,
) -> CurveResult<DiscountCurve> {
    SequentialBootstrapper::new(anchor)
        .add_instruments(instruments.iter().cloned())
        .bootstrap(day_count, calendar.calendar())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruments::{Deposit, FixedLegSwap};
    use approx::assert_relative_eq;
    use parcurve_core::calendars::{BusinessDayConvention, WeekendCalendar};
    use parcurve_core::{Frequency, Period};

    fn anchor() -> Date {
        Date::from_ymd(2024, 6, 5).unwrap()
    }

    fn swap(id: &str, tenor: Period, rate: f64) -> FixedLegSwap {
        FixedLegSwap::new(
            id,
            Period::days(1),
            tenor,
            Frequency::Quarterly,
            BusinessDayConvention::ModifiedFollowing,
            rate,
        )
    }

    #[test]
    fn test_bootstrap_single_deposit() {
        let deposit = Deposit::new("ON", Period::ZERO, Period::days(1), BusinessDayConvention::Following, 0.0184);
        let curve = SequentialBootstrapper::new(anchor())
            .add_instrument(deposit)
            .bootstrap(DayCountConvention::Act365Fixed, &WeekendCalendar)
            .unwrap();

        let t: f64 = 1.0 / 365.0;
        let expected = (1.0 + 0.0184 * t).ln() / t;
        assert_eq!(curve.times(), &[t, t + 1.0]);
        assert_relative_eq!(curve.zero_rates()[0], expected, epsilon = 1e-9);
        assert_eq!(curve.zero_rates()[0], curve.zero_rates()[1]);
    }

    #[test]
    fn test_bootstrap_two_nodes() {
        let curve = SequentialBootstrapper::new(anchor())
            .add_instrument(swap("6M", Period::months(6), 0.0185))
            .add_instrument(swap("3M", Period::months(3), 0.0186))
            .bootstrap(DayCountConvention::Act365Fixed, &WeekendCalendar)
            .unwrap();

        assert_eq!(curve.len(), 2);
        assert!(curve.times()[0] < curve.times()[1]);
    }

    #[test]
    fn test_bootstrap_validated_reprices() {
        let result = SequentialBootstrapper::new(anchor())
            .with_name("TEST")
            .add_instrument(swap("3M", Period::months(3), 0.0186))
            .add_instrument(swap("1Y", Period::years(1), 0.0183))
            .add_instrument(swap("2Y", Period::years(2), 0.0185))
            .bootstrap_validated(DayCountConvention::Act365Fixed, &WeekendCalendar)
            .unwrap();

        assert!(result.is_valid(), "{}", result.repricing_report);
        assert!(result.max_error() < 1e-8);
        assert_eq!(result.nodes.len(), 3);
        assert_eq!(result.nodes[1].instrument_id, "1Y");
        assert_eq!(result.curve.name(), "TEST");
        for (node, (t, z)) in result.nodes.iter().zip(result.curve.nodes()) {
            assert_eq!(node.time, t);
            assert_eq!(node.zero_rate, z);
        }
    }

    #[test]
    fn test_empty_instruments() {
        let err = SequentialBootstrapper::new(anchor())
            .bootstrap(DayCountConvention::Act365Fixed, &WeekendCalendar)
            .unwrap_err();
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_duplicate_maturity() {
        let err = SequentialBootstrapper::new(anchor())
            .add_instrument(swap("1Y", Period::years(1), 0.0183))
            .add_instrument(swap("12M", Period::months(12), 0.0184))
            .bootstrap(DayCountConvention::Act365Fixed, &WeekendCalendar)
            .unwrap_err();
        assert!(err.is_configuration_error());
        assert!(err.to_string().contains("both mature"));
    }

    #[test]
    fn test_zero_iterations_is_a_convergence_error() {
        let config = BootstrapConfig::default().with_max_iterations(0);
        let err = SequentialBootstrapper::new(anchor())
            .with_config(config)
            .add_instrument(swap("3M", Period::months(3), 0.0186))
            .bootstrap(DayCountConvention::Act365Fixed, &WeekendCalendar)
            .unwrap_err();
        match err {
            CurveError::Convergence {
                node,
                instrument,
                iterations,
                residual,
            } => {
                assert_eq!(node, 0);
                assert_eq!(instrument, "3M");
                assert_eq!(iterations, 0);
                assert!(residual > 1e-10);
            }
            other => panic!("expected a convergence error, got {other}"),
        }
    }

    #[test]
    fn test_seedings_agree() {
        let build = |seeding| {
            SequentialBootstrapper::new(anchor())
                .with_config(BootstrapConfig::default().with_seeding(seeding))
                .add_instrument(swap("3M", Period::months(3), 0.0186))
                .add_instrument(swap("6M", Period::months(6), 0.0184))
                .add_instrument(swap("1Y", Period::years(1), 0.0183))
                .bootstrap(DayCountConvention::Act365Fixed, &WeekendCalendar)
                .unwrap()
        };
        let placeholder = build(NodeSeeding::Placeholder);
        let quoted = build(NodeSeeding::QuotedRates);
        assert_eq!(placeholder.times(), quoted.times());
        for (a, b) in placeholder.zero_rates().iter().zip(quoted.zero_rates()) {
            assert_relative_eq!(a, b, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_free_function_matches_builder() {
        let instruments: Vec<CurveInstrument> = vec![
            swap("1Y", Period::years(1), 0.0183).into(),
            swap("3M", Period::months(3), 0.0186).into(),
        ];
        let dc = DayCountConvention::Act365Fixed;
        let curve = bootstrap(anchor(), &instruments, dc, CalendarId::WeekendsOnly).unwrap();
        let again = SequentialBootstrapper::new(anchor())
            .add_instruments(instruments)
            .bootstrap(dc, &WeekendCalendar)
            .unwrap();
        assert_eq!(curve, again);
    }

    #[test]
    fn test_state_display() {
        assert_eq!(BootstrapState::default().to_string(), "unstarted");
        assert_eq!(BootstrapState::Solving(3).to_string(), "solving node 3");
        assert_eq!(BootstrapState::Done.to_string(), "done");
    }
}
