//! Error types for curve construction.
//!
//! A failed build reports one of three kinds: the instrument cannot be turned
//! into a sensible cashflow schedule, a node solve does not converge, or the
//! configuration itself is unusable. Lower-level date and numeric errors are
//! wrapped as they surface.

use parcurve_core::CoreError;
use parcurve_math::MathError;
use thiserror::Error;

/// A specialized Result type for curve operations.
pub type CurveResult<T> = Result<T, CurveError>;

/// Error types for curve operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CurveError {
    /// An instrument could not be turned into a cashflow schedule.
    #[error("Schedule error for {instrument}: {reason}")]
    Schedule {
        /// Identifier of the offending instrument.
        instrument: String,
        /// What was wrong with the schedule.
        reason: String,
    },

    /// The root finder did not converge for a node.
    #[error(
        "Node {node} ({instrument}) failed to converge after {iterations} iterations (residual: {residual:.2e})"
    )]
    Convergence {
        /// Zero-based node index in maturity order.
        node: usize,
        /// Identifier of the instrument being solved.
        instrument: String,
        /// Iterations attempted.
        iterations: u32,
        /// Residual at the last iterate.
        residual: f64,
    },

    /// A node solve stopped for a numerical reason other than running out of
    /// iterations (vanishing Jacobian, non-finite pricing).
    #[error("Node {node} ({instrument}) could not be solved: {reason}")]
    NodeSolve {
        /// Zero-based node index in maturity order.
        node: usize,
        /// Identifier of the instrument being solved.
        instrument: String,
        /// Description of the failure.
        reason: String,
    },

    /// The curve configuration or instrument set is unusable.
    #[error("Configuration error: {reason}")]
    Configuration {
        /// Description of the problem.
        reason: String,
    },

    /// Insufficient points for the curve.
    #[error("Insufficient points: need at least {required}, got {got}")]
    InsufficientPoints {
        /// Minimum required points.
        required: usize,
        /// Actual points provided.
        got: usize,
    },

    /// Node times are not strictly increasing.
    #[error("Non-monotonic node times at index {index}: {prev:.8} >= {current:.8}")]
    NonMonotonicNodes {
        /// Index where the violation occurs.
        index: usize,
        /// Previous node time.
        prev: f64,
        /// Current node time.
        current: f64,
    },

    /// A node index past the end of the curve.
    #[error("Node index {index} out of range for a curve with {len} nodes")]
    NodeIndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of nodes on the curve.
        len: usize,
    },

    /// A value that must be finite was not.
    #[error("Invalid value: {reason}")]
    InvalidValue {
        /// Description of the invalid value.
        reason: String,
    },

    /// Date, period or calendar error.
    #[error("Core error: {0}")]
    Core(#[from] CoreError),

    /// Numerical error.
    #[error("Math error: {0}")]
    Math(#[from] MathError),

    /// Configuration file could not be read.
    #[error("IO error: {0}")]
    Io(String),
}

impl CurveError {
    /// Creates a schedule error for an instrument.
    #[must_use]
    pub fn schedule(instrument: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Schedule {
            instrument: instrument.into(),
            reason: reason.into(),
        }
    }

    /// Creates a convergence error.
    #[must_use]
    pub fn convergence(
        node: usize,
        instrument: impl Into<String>,
        iterations: u32,
        residual: f64,
    ) -> Self {
        Self::Convergence {
            node,
            instrument: instrument.into(),
            iterations,
            residual,
        }
    }

    /// Creates a node solve error.
    #[must_use]
    pub fn node_solve(node: usize, instrument: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::NodeSolve {
            node,
            instrument: instrument.into(),
            reason: reason.into(),
        }
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }

    /// Creates an insufficient points error.
    #[must_use]
    pub fn insufficient_points(required: usize, got: usize) -> Self {
        Self::InsufficientPoints { required, got }
    }

    /// Creates a non-monotonic nodes error.
    #[must_use]
    pub fn non_monotonic_nodes(index: usize, prev: f64, current: f64) -> Self {
        Self::NonMonotonicNodes {
            index,
            prev,
            current,
        }
    }

    /// Creates an invalid value error.
    #[must_use]
    pub fn invalid_value(reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            reason: reason.into(),
        }
    }

    /// Wraps a math error raised while solving a node.
    ///
    /// Budget exhaustion becomes [`CurveError::Convergence`], anything else
    /// [`CurveError::NodeSolve`].
    #[must_use]
    pub fn from_node_solve(node: usize, instrument: &str, error: MathError) -> Self {
        match error {
            MathError::ConvergenceFailed {
                iterations,
                residual,
            } => Self::convergence(node, instrument, iterations, residual),
            other => Self::node_solve(node, instrument, other.to_string()),
        }
    }

    /// True for schedule errors.
    #[must_use]
    pub fn is_schedule_error(&self) -> bool {
        matches!(self, Self::Schedule { .. })
    }

    /// True for a node that failed to converge.
    #[must_use]
    pub fn is_convergence_error(&self) -> bool {
        matches!(self, Self::Convergence { .. })
    }

    /// True for configuration errors.
    #[must_use]
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }

    /// The instrument the error refers to, if any.
    #[must_use]
    pub fn instrument(&self) -> Option<&str> {
        match self {
            Self::Schedule { instrument, .. }
            | Self::Convergence { instrument, .. }
            | Self::NodeSolve { instrument, .. } => Some(instrument),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CurveError {
    fn from(err: std::io::Error) -> Self {
        CurveError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for CurveError {
    fn from(err: serde_json::Error) -> Self {
        CurveError::configuration(err.to_string())
    }
}
