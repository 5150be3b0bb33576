//! Root-finding algorithms.
//!
//! Curve calibration solves one node at a time, but the residual function is
//! vector valued (`R^n -> R^n`) so that the same machinery handles any number
//! of simultaneous unknowns:
//!
//! - [`NewtonVectorRootFinder`]: Newton iteration with a central-difference
//!   Jacobian inverted through the SVD pseudo-inverse, with backtracking
//! - [`find_root_scalar`]: the one-dimensional convenience wrapper
//!
//! # Example
//!
//! ```rust
//! use parcurve_math::solvers::{find_root_scalar, SolverConfig};
//!
//! // Continuously compounded rate that discounts 1.05 back to 1 over 2 years
//! let f = |r: f64| 1.05 * (-2.0 * r).exp() - 1.0;
//! let result = find_root_scalar(f, 0.02, &SolverConfig::default()).unwrap();
//! assert!((result.root - 1.05_f64.ln() / 2.0).abs() < 1e-10);
//! ```

mod newton;

pub use newton::{find_root_scalar, NewtonVectorRootFinder, VectorSolverResult};

/// Default absolute tolerance on the residual.
pub const DEFAULT_TOLERANCE_ABS: f64 = 1e-10;

/// Default relative tolerance on the step size.
pub const DEFAULT_TOLERANCE_REL: f64 = 1e-10;

/// Default maximum iterations for root-finding algorithms.
pub const DEFAULT_MAX_ITERATIONS: u32 = 100;

/// Configuration for root-finding algorithms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    /// Converged once the largest residual component is below this.
    pub tolerance_abs: f64,
    /// Converged once the step is below this, relative to the solution size.
    pub tolerance_rel: f64,
    /// Maximum number of iterations.
    pub max_iterations: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance_abs: DEFAULT_TOLERANCE_ABS,
            tolerance_rel: DEFAULT_TOLERANCE_REL,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl SolverConfig {
    /// Creates a new solver configuration.
    #[must_use]
    pub fn new(tolerance_abs: f64, tolerance_rel: f64, max_iterations: u32) -> Self {
        Self {
            tolerance_abs,
            tolerance_rel,
            max_iterations,
        }
    }

    /// Sets the absolute tolerance.
    #[must_use]
    pub fn with_tolerance_abs(mut self, tolerance: f64) -> Self {
        self.tolerance_abs = tolerance;
        self
    }

    /// Sets the relative tolerance.
    #[must_use]
    pub fn with_tolerance_rel(mut self, tolerance: f64) -> Self {
        self.tolerance_rel = tolerance;
        self
    }

    /// Sets the maximum iterations.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

/// Result of a scalar root-finding operation.
#[derive(Debug, Clone, Copy)]
pub struct SolverResult {
    /// The root found.
    pub root: f64,
    /// Number of iterations used.
    pub iterations: u32,
    /// Absolute residual at the root.
    pub residual: f64,
}
