//! Bootstrap configuration.

use serde::{Deserialize, Serialize};

use parcurve_math::solvers::SolverConfig;

use crate::error::{CurveError, CurveResult};
use crate::instruments::UnsupportedInstrumentPolicy;

/// How the working curve is initialised before the first solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum NodeSeeding {
    /// Start from a two-node placeholder curve and grow it one node per
    /// instrument with the node-insertion rule.
    #[default]
    Placeholder,

    /// Start from a curve holding every instrument's maturity and quoted
    /// rate; each solve overwrites its own node in place.
    QuotedRates,
}

/// Configuration for the sequential bootstrap.
///
/// Every field has a default, so `{}` is a valid JSON configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    /// Residual tolerance of each node solve.
    pub tolerance_abs: f64,

    /// Step tolerance of each node solve, relative to the rate.
    pub tolerance_rel: f64,

    /// Iteration budget of each node solve.
    pub max_iterations: u32,

    /// Zero rate of the placeholder curve.
    pub placeholder_rate: f64,

    /// Curve initialisation strategy.
    pub seeding: NodeSeeding,

    /// Handling of quotes for unsupported instrument types.
    pub unsupported_instruments: UnsupportedInstrumentPolicy,

    /// Accept tenors that are not a whole number of payment periods.
    pub allow_irregular_final_period: bool,

    /// Largest acceptable repricing error per unit notional.
    pub repricing_tolerance: f64,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            tolerance_abs: 1e-10,
            tolerance_rel: 1e-10,
            max_iterations: 100,
            placeholder_rate: 0.05,
            seeding: NodeSeeding::Placeholder,
            unsupported_instruments: UnsupportedInstrumentPolicy::Reject,
            allow_irregular_final_period: false,
            repricing_tolerance: 1e-8,
        }
    }
}

impl BootstrapConfig {
    /// Sets the solver tolerances.
    #[must_use]
    pub fn with_tolerances(mut self, tolerance_abs: f64, tolerance_rel: f64) -> Self {
        self.tolerance_abs = tolerance_abs;
        self.tolerance_rel = tolerance_rel;
        self
    }

    /// Sets the iteration budget per node.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the seeding strategy.
    #[must_use]
    pub fn with_seeding(mut self, seeding: NodeSeeding) -> Self {
        self.seeding = seeding;
        self
    }

    /// Sets the unsupported instrument policy.
    #[must_use]
    pub fn with_unsupported_instruments(mut self, policy: UnsupportedInstrumentPolicy) -> Self {
        self.unsupported_instruments = policy;
        self
    }

    /// Allows or rejects irregular final periods.
    #[must_use]
    pub fn with_irregular_final_period(mut self, allow: bool) -> Self {
        self.allow_irregular_final_period = allow;
        self
    }

    /// Sets the repricing tolerance.
    #[must_use]
    pub fn with_repricing_tolerance(mut self, tolerance: f64) -> Self {
        self.repricing_tolerance = tolerance;
        self
    }

    /// Solver settings for a node solve.
    #[must_use]
    pub fn solver_config(&self) -> SolverConfig {
        SolverConfig::new(self.tolerance_abs, self.tolerance_rel, self.max_iterations)
    }

    /// Checks the numeric settings.
    pub fn validate(&self) -> CurveResult<()> {
        let positive = [
            ("tolerance_abs", self.tolerance_abs),
            ("tolerance_rel", self.tolerance_rel),
            ("repricing_tolerance", self.repricing_tolerance),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(CurveError::configuration(format!(
                    "{field} must be positive and finite, got {value}"
                )));
            }
        }
        if !self.placeholder_rate.is_finite() {
            return Err(CurveError::configuration(format!(
                "placeholder_rate must be finite, got {}",
                self.placeholder_rate
            )));
        }
        Ok(())
    }

    /// Parses a configuration from JSON.
    pub fn from_json(json: &str) -> CurveResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}
