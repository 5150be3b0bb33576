//! Newton iteration for vector-valued functions.

use nalgebra::{DMatrix, DVector};

use crate::error::{MathError, MathResult};
use crate::linear_algebra::{condition_number, pseudo_inverse};
use crate::solvers::{SolverConfig, SolverResult};

/// Default relative bump for the finite-difference Jacobian.
pub const DEFAULT_JACOBIAN_STEP: f64 = 1e-6;

/// Default number of step halvings tried before accepting a step.
pub const DEFAULT_MAX_BACKTRACKS: u32 = 10;

/// Result of a vector root-finding operation.
#[derive(Debug, Clone)]
pub struct VectorSolverResult {
    /// The root found.
    pub root: DVector<f64>,
    /// Number of iterations used.
    pub iterations: u32,
    /// Largest absolute residual component at the root.
    pub residual: f64,
}

/// Newton root finder for `f: R^n -> R^n`.
///
/// Each iteration:
/// 1. stops if `max |f(x)| < tolerance_abs`;
/// 2. estimates the Jacobian with central differences;
/// 3. takes the step `-J⁺ f(x)` where `J⁺` is the SVD pseudo-inverse;
/// 4. halves the step while the residual norm grows, up to a limit;
/// 5. stops if the accepted step is below `tolerance_rel * max(1, |x|)`.
///
/// # Example
///
/// ```rust
/// use nalgebra::DVector;
/// use parcurve_math::solvers::{NewtonVectorRootFinder, SolverConfig};
///
/// // x^2 + y^2 = 4, x = y
/// let f = |v: &DVector<f64>| DVector::from_vec(vec![v[0] * v[0] + v[1] * v[1] - 4.0, v[0] - v[1]]);
/// let solver = NewtonVectorRootFinder::new(SolverConfig::default());
/// let result = solver.find_root(f, &DVector::from_vec(vec![1.0, 2.0])).unwrap();
/// assert!((result.root[0] - 2.0_f64.sqrt()).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct NewtonVectorRootFinder {
    config: SolverConfig,
    jacobian_step: f64,
    max_backtracks: u32,
}

impl Default for NewtonVectorRootFinder {
    fn default() -> Self {
        Self::new(SolverConfig::default())
    }
}

impl NewtonVectorRootFinder {
    /// Creates a root finder with the given configuration.
    #[must_use]
    pub fn new(config: SolverConfig) -> Self {
        Self {
            config,
            jacobian_step: DEFAULT_JACOBIAN_STEP,
            max_backtracks: DEFAULT_MAX_BACKTRACKS,
        }
    }

    /// Sets the relative bump used for the finite-difference Jacobian.
    #[must_use]
    pub fn with_jacobian_step(mut self, step: f64) -> Self {
        self.jacobian_step = step;
        self
    }

    /// Sets how many step halvings are tried per iteration (0 disables backtracking).
    #[must_use]
    pub fn with_max_backtracks(mut self, max_backtracks: u32) -> Self {
        self.max_backtracks = max_backtracks;
        self
    }

    /// Returns the solver configuration.
    #[must_use]
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Finds `x` with `f(x) ≈ 0` starting from `initial_guess`.
    ///
    /// # Errors
    ///
    /// - `MathError::ConvergenceFailed` if the iteration budget runs out
    /// - `MathError::SingularMatrix` if the Jacobian vanishes
    /// - `MathError::NonFinite` if the objective returns NaN or an infinity
    /// - `MathError::InvalidInput` for an empty residual or a bad `jacobian_step`
    pub fn find_root<F>(&self, f: F, initial_guess: &DVector<f64>) -> MathResult<VectorSolverResult>
    where
        F: Fn(&DVector<f64>) -> DVector<f64>,
    {
        if !(self.jacobian_step > 0.0 && self.jacobian_step.is_finite()) {
            return Err(MathError::invalid_input(format!(
                "jacobian step must be positive, got {}",
                self.jacobian_step
            )));
        }

        let mut x = initial_guess.clone();
        let mut fx = evaluate(&f, &x)?;
        let mut norm = max_abs(&fx);

        for iteration in 0..self.config.max_iterations {
            if norm < self.config.tolerance_abs {
                return Ok(VectorSolverResult {
                    root: x,
                    iterations: iteration,
                    residual: norm,
                });
            }

            let jacobian = self.jacobian(&f, &x, fx.len())?;
            if log::log_enabled!(log::Level::Trace) {
                if let Ok(cond) = condition_number(&jacobian) {
                    log::trace!("newton iteration {iteration}: |f| = {norm:.3e}, cond(J) = {cond:.3e}");
                }
            }
            let step = -(pseudo_inverse(&jacobian)? * &fx);

            let (next_x, next_fx, next_norm, scale) = self.backtrack(&f, &x, &step, norm)?;
            let step_size = max_abs(&step) * scale;
            x = next_x;
            fx = next_fx;
            norm = next_norm;

            if step_size <= self.config.tolerance_rel * max_abs(&x).max(1.0) {
                log::trace!("newton converged on step size after {} iterations", iteration + 1);
                return Ok(VectorSolverResult {
                    root: x,
                    iterations: iteration + 1,
                    residual: norm,
                });
            }
        }

        if norm < self.config.tolerance_abs {
            return Ok(VectorSolverResult {
                root: x,
                iterations: self.config.max_iterations,
                residual: norm,
            });
        }

        Err(MathError::convergence_failed(self.config.max_iterations, norm))
    }

    /// Central-difference Jacobian; column `j` bumps `x[j]` by `h * max(1, |x[j]|)`.
    fn jacobian<F>(&self, f: &F, x: &DVector<f64>, rows: usize) -> MathResult<DMatrix<f64>>
    where
        F: Fn(&DVector<f64>) -> DVector<f64>,
    {
        let mut jacobian = DMatrix::zeros(rows, x.len());
        for j in 0..x.len() {
            let h = self.jacobian_step * x[j].abs().max(1.0);
            let mut up = x.clone();
            up[j] += h;
            let mut down = x.clone();
            down[j] -= h;
            let column = (evaluate(f, &up)? - evaluate(f, &down)?) / (2.0 * h);
            jacobian.set_column(j, &column);
        }
        Ok(jacobian)
    }

    /// Halves the step while the residual grows. The last candidate is kept
    /// if no halving improves on the current point.
    fn backtrack<F>(
        &self,
        f: &F,
        x: &DVector<f64>,
        step: &DVector<f64>,
        norm: f64,
    ) -> MathResult<(DVector<f64>, DVector<f64>, f64, f64)>
    where
        F: Fn(&DVector<f64>) -> DVector<f64>,
    {
        let mut scale = 1.0;
        let mut backtracks = 0;
        loop {
            let candidate = x + step * scale;
            let f_candidate = f(&candidate);
            let candidate_norm = max_abs(&f_candidate);
            let improved = candidate_norm.is_finite() && candidate_norm < norm;
            if improved || backtracks >= self.max_backtracks {
                if !candidate_norm.is_finite() {
                    return Err(MathError::non_finite("along the Newton step"));
                }
                return Ok((candidate, f_candidate, candidate_norm, scale));
            }
            scale *= 0.5;
            backtracks += 1;
        }
    }
}

/// Finds a root of a scalar function with the vector Newton solver.
///
/// # Errors
///
/// See [`NewtonVectorRootFinder::find_root`].
pub fn find_root_scalar<F>(f: F, initial_guess: f64, config: &SolverConfig) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
{
    let solver = NewtonVectorRootFinder::new(*config);
    let result = solver.find_root(
        |v: &DVector<f64>| DVector::from_element(1, f(v[0])),
        &DVector::from_element(1, initial_guess),
    )?;
    Ok(SolverResult {
        root: result.root[0],
        iterations: result.iterations,
        residual: result.residual,
    })
}

fn evaluate<F>(f: &F, x: &DVector<f64>) -> MathResult<DVector<f64>>
where
    F: Fn(&DVector<f64>) -> DVector<f64>,
{
    let fx = f(x);
    if fx.is_empty() {
        return Err(MathError::invalid_input("objective returned no residuals"));
    }
    if fx.iter().any(|v| !v.is_finite()) {
        return Err(MathError::non_finite(format!("at {:?}", x.as_slice())));
    }
    Ok(fx)
}

fn max_abs(v: &DVector<f64>) -> f64 {
    v.iter().fold(0.0_f64, |acc, x| acc.max(x.abs()))
}
