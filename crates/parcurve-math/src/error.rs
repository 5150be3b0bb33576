//! Numerical error type.
//!
//! Solver and interpolation failures carry enough context for the curve layer
//! to tell a node that ran out of iterations apart from one whose pricing
//! broke down.

use thiserror::Error;

/// Result alias for numerical routines.
pub type MathResult<T> = Result<T, MathError>;

/// Failure of a numerical routine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    /// The iteration budget ran out before the residual met tolerance.
    #[error("no convergence in {iterations} iterations, residual {residual:.2e}")]
    ConvergenceFailed {
        /// Iterations performed.
        iterations: u32,
        /// Max-norm of the residual at the last iterate.
        residual: f64,
    },

    /// Every singular value is zero, so no step can be taken.
    #[error("matrix has no non-zero singular value")]
    SingularMatrix,

    /// The objective produced NaN or an infinity.
    #[error("non-finite residual: {context}")]
    NonFinite {
        /// Where the value appeared.
        context: String,
    },

    /// Query outside the node range with extrapolation disabled.
    #[error("{x} lies outside the node range [{min}, {max}]")]
    ExtrapolationNotAllowed {
        /// The query point.
        x: f64,
        /// First node.
        min: f64,
        /// Last node.
        max: f64,
    },

    /// Too few nodes to interpolate.
    #[error("need at least {required} nodes, got {actual}")]
    InsufficientData {
        /// Minimum node count.
        required: usize,
        /// Nodes supplied.
        actual: usize,
    },

    /// Malformed argument.
    #[error("invalid input: {reason}")]
    InvalidInput {
        /// What was wrong.
        reason: String,
    },
}

impl MathError {
    /// Budget exhausted at the given residual.
    #[must_use]
    pub fn convergence_failed(iterations: u32, residual: f64) -> Self {
        Self::ConvergenceFailed {
            iterations,
            residual,
        }
    }

    /// Non-finite objective value.
    #[must_use]
    pub fn non_finite(context: impl Into<String>) -> Self {
        Self::NonFinite {
            context: context.into(),
        }
    }

    /// Malformed argument.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Too few nodes.
    #[must_use]
    pub fn insufficient_data(required: usize, actual: usize) -> Self {
        Self::InsufficientData { required, actual }
    }
}
