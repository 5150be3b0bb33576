//! Linear interpolation.

use super::{ExtrapolationMethod, Interpolator};
use crate::error::{MathError, MathResult};

/// Linear interpolation between data points.
///
/// # Example
///
/// ```rust
/// use parcurve_math::interpolation::{ExtrapolationMethod, Interpolator, LinearInterpolator};
///
/// let interp = LinearInterpolator::new(vec![1.0, 2.0], vec![0.02, 0.03])
///     .unwrap()
///     .with_extrapolation(ExtrapolationMethod::Flat);
///
/// assert!((interp.interpolate(1.5).unwrap() - 0.025).abs() < 1e-15);
/// assert_eq!(interp.interpolate(0.5).unwrap(), 0.02);
/// assert_eq!(interp.interpolate(9.0).unwrap(), 0.03);
/// ```
#[derive(Debug, Clone)]
pub struct LinearInterpolator {
    xs: Vec<f64>,
    ys: Vec<f64>,
    extrapolation: ExtrapolationMethod,
}

impl LinearInterpolator {
    /// Creates a new linear interpolator.
    ///
    /// # Arguments
    ///
    /// * `xs` - X coordinates (strictly increasing)
    /// * `ys` - Y coordinates
    ///
    /// # Errors
    ///
    /// Returns an error if there are fewer than 2 points, if lengths differ,
    /// or if the x values are not strictly increasing and finite.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> MathResult<Self> {
        if xs.len() < 2 {
            return Err(MathError::insufficient_data(2, xs.len()));
        }
        if xs.len() != ys.len() {
            return Err(MathError::invalid_input(format!(
                "xs and ys must have same length: {} vs {}",
                xs.len(),
                ys.len()
            )));
        }
        if xs.iter().chain(ys.iter()).any(|v| !v.is_finite()) {
            return Err(MathError::invalid_input("values must be finite"));
        }
        if xs.windows(2).any(|w| w[1] <= w[0]) {
            return Err(MathError::invalid_input(
                "x values must be strictly increasing",
            ));
        }

        Ok(Self {
            xs,
            ys,
            extrapolation: ExtrapolationMethod::None,
        })
    }

    /// Sets the extrapolation applied on both ends.
    #[must_use]
    pub fn with_extrapolation(mut self, extrapolation: ExtrapolationMethod) -> Self {
        self.extrapolation = extrapolation;
        self
    }

    /// Returns the extrapolation method.
    pub fn extrapolation(&self) -> ExtrapolationMethod {
        self.extrapolation
    }

    /// Returns the x coordinates.
    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    /// Returns the y coordinates.
    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    /// Finds the index i such that xs[i] <= x < xs[i+1], clamped to a valid segment.
    fn find_segment(&self, x: f64) -> usize {
        let upper = self.xs.partition_point(|probe| *probe <= x);
        upper.saturating_sub(1).min(self.xs.len() - 2)
    }

    fn out_of_range(&self, x: f64) -> MathError {
        MathError::ExtrapolationNotAllowed {
            x,
            min: self.min_x(),
            max: self.max_x(),
        }
    }

    fn slope(&self, i: usize) -> f64 {
        (self.ys[i + 1] - self.ys[i]) / (self.xs[i + 1] - self.xs[i])
    }
}

impl Interpolator for LinearInterpolator {
    fn interpolate(&self, x: f64) -> MathResult<f64> {
        let last = self.xs.len() - 1;
        if !self.in_range(x) {
            match self.extrapolation {
                ExtrapolationMethod::None => return Err(self.out_of_range(x)),
                ExtrapolationMethod::Flat => {
                    return Ok(if x < self.xs[0] { self.ys[0] } else { self.ys[last] })
                }
                ExtrapolationMethod::Linear => {}
            }
        }

        let i = self.find_segment(x);
        if x == self.xs[i + 1] {
            return Ok(self.ys[i + 1]);
        }
        Ok(self.ys[i] + (x - self.xs[i]) * self.slope(i))
    }

    fn derivative(&self, x: f64) -> MathResult<f64> {
        if !self.in_range(x) {
            match self.extrapolation {
                ExtrapolationMethod::None => return Err(self.out_of_range(x)),
                ExtrapolationMethod::Flat => return Ok(0.0),
                ExtrapolationMethod::Linear => {}
            }
        }
        Ok(self.slope(self.find_segment(x)))
    }

    fn min_x(&self) -> f64 {
        self.xs[0]
    }

    fn max_x(&self) -> f64 {
        self.xs[self.xs.len() - 1]
    }
}
