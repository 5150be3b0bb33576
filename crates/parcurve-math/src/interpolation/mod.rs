//! Interpolation methods for curve construction.
//!
//! Zero-rate bootstrapping only needs piecewise-linear interpolation; the
//! behaviour outside the node range is chosen with [`ExtrapolationMethod`].

mod linear;

pub use linear::LinearInterpolator;

use crate::error::MathResult;

/// Trait for interpolation methods.
pub trait Interpolator: Send + Sync {
    /// Returns the interpolated value at x.
    fn interpolate(&self, x: f64) -> MathResult<f64>;

    /// Returns the first derivative at x.
    fn derivative(&self, x: f64) -> MathResult<f64>;

    /// Returns the minimum x value in the data.
    fn min_x(&self) -> f64;

    /// Returns the maximum x value in the data.
    fn max_x(&self) -> f64;

    /// Checks if x is within the interpolation range.
    fn in_range(&self, x: f64) -> bool {
        x >= self.min_x() && x <= self.max_x()
    }
}

/// How an interpolator answers queries outside its node range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtrapolationMethod {
    /// No extrapolation - return error outside range
    #[default]
    None,
    /// Constant value from the nearest boundary node
    Flat,
    /// Linear continuation with the boundary segment's slope
    Linear,
}
