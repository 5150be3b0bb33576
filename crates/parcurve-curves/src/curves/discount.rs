//! Zero-rate discount curve.

use serde::{Deserialize, Serialize};

use parcurve_core::daycounts::{DayCount, DayCountConvention};
use parcurve_core::Date;
use parcurve_math::interpolation::{ExtrapolationMethod, Interpolator, LinearInterpolator};

use crate::error::{CurveError, CurveResult};

/// A discount curve defined by zero rates at year-fraction nodes.
///
/// Node times are year fractions from the reference date on the curve's day
/// count. Between nodes the zero rate is linear in time; before the first and
/// after the last node it is held flat. Discount factors are
/// `DF(t) = exp(-z(t) * t)`.
///
/// The curve is immutable. Node updates used during the bootstrap
/// ([`with_node`](Self::with_node), [`with_value_at`](Self::with_value_at))
/// return a new curve and leave the original untouched.
///
/// # Example
///
/// ```rust
/// use parcurve_core::daycounts::DayCountConvention;
/// use parcurve_core::Date;
/// use parcurve_curves::curves::DiscountCurve;
///
/// let curve = DiscountCurve::new(
///     "CNY-FR007",
///     Date::from_ymd(2024, 6, 5).unwrap(),
///     DayCountConvention::Act365Fixed,
///     vec![0.5, 1.0, 2.0],
///     vec![0.018, 0.019, 0.020],
/// )
/// .unwrap();
///
/// assert!((curve.zero_rate(1.5).unwrap() - 0.0195).abs() < 1e-12);
/// assert!((curve.zero_rate(10.0).unwrap() - 0.020).abs() < 1e-12);
/// assert!((curve.discount_factor(1.0).unwrap() - (-0.019_f64).exp()).abs() < 1e-15);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(into = "CurveData", try_from = "CurveData")]
pub struct DiscountCurve {
    name: String,
    reference_date: Date,
    day_count: DayCountConvention,
    interpolator: LinearInterpolator,
}

/// Serialized form of a curve.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CurveData {
    name: String,
    reference_date: Date,
    day_count: DayCountConvention,
    times: Vec<f64>,
    zero_rates: Vec<f64>,
}

impl DiscountCurve {
    /// Creates a curve from node times and zero rates.
    ///
    /// # Errors
    ///
    /// Fails with fewer than two nodes, mismatched lengths, non-finite values
    /// or node times that are not strictly increasing.
    pub fn new(
        name: impl Into<String>,
        reference_date: Date,
        day_count: DayCountConvention,
        times: Vec<f64>,
        zero_rates: Vec<f64>,
    ) -> CurveResult<Self> {
        if times.len() < 2 {
            return Err(CurveError::insufficient_points(2, times.len()));
        }
        if times.len() != zero_rates.len() {
            return Err(CurveError::invalid_value(format!(
                "{} node times but {} zero rates",
                times.len(),
                zero_rates.len()
            )));
        }
        if let Some(bad) = times.iter().chain(&zero_rates).find(|v| !v.is_finite()) {
            return Err(CurveError::invalid_value(format!(
                "curve nodes must be finite, got {bad}"
            )));
        }
        for (i, w) in times.windows(2).enumerate() {
            if w[1] <= w[0] {
                return Err(CurveError::non_monotonic_nodes(i + 1, w[0], w[1]));
            }
        }

        let interpolator =
            LinearInterpolator::new(times, zero_rates)?.with_extrapolation(ExtrapolationMethod::Flat);

        Ok(Self {
            name: name.into(),
            reference_date,
            day_count,
            interpolator,
        })
    }

    /// The starting curve of a bootstrap: two nodes at 1 and 2 years, both at
    /// `level`. Only its shape matters; every node is replaced as the
    /// bootstrap proceeds.
    pub fn placeholder(
        name: impl Into<String>,
        reference_date: Date,
        day_count: DayCountConvention,
        level: f64,
    ) -> CurveResult<Self> {
        Self::new(name, reference_date, day_count, vec![1.0, 2.0], vec![level, level])
    }

    /// Returns the curve name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns a copy of the curve under a different name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Returns the reference (anchor) date.
    #[must_use]
    pub fn reference_date(&self) -> Date {
        self.reference_date
    }

    /// Returns the day count that maps dates to node times.
    #[must_use]
    pub fn day_count(&self) -> DayCountConvention {
        self.day_count
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.interpolator.xs().len()
    }

    /// Always false: a curve has at least two nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Node times in years.
    #[must_use]
    pub fn times(&self) -> &[f64] {
        self.interpolator.xs()
    }

    /// Zero rates at the nodes.
    #[must_use]
    pub fn zero_rates(&self) -> &[f64] {
        self.interpolator.ys()
    }

    /// Iterates over `(time, zero_rate)` pairs.
    pub fn nodes(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.times().iter().copied().zip(self.zero_rates().iter().copied())
    }

    /// Returns a curve with node `index` set to `(time, rate)`.
    ///
    /// This is the node-insertion rule of the sequential bootstrap:
    ///
    /// - index 0 replaces the whole curve with `[time, time + 1]`, both at
    ///   `rate`, so the first instrument prices on a flat curve;
    /// - index 1 keeps the first node and puts `(time, rate)` second, leaving
    ///   exactly two nodes;
    /// - index `len` appends;
    /// - any other index below `len` replaces that node.
    ///
    /// # Errors
    ///
    /// Fails if the index is past `len` or the result is not strictly
    /// increasing in time.
    pub fn with_node(&self, index: usize, time: f64, rate: f64) -> CurveResult<Self> {
        let xs = self.times();
        let ys = self.zero_rates();
        let (times, rates) = match index {
            0 => (vec![time, time + 1.0], vec![rate, rate]),
            1 => (vec![xs[0], time], vec![ys[0], rate]),
            i if i == xs.len() => {
                let mut times = xs.to_vec();
                let mut rates = ys.to_vec();
                times.push(time);
                rates.push(rate);
                (times, rates)
            }
            i if i < xs.len() => {
                let mut times = xs.to_vec();
                let mut rates = ys.to_vec();
                times[i] = time;
                rates[i] = rate;
                (times, rates)
            }
            i => {
                return Err(CurveError::NodeIndexOutOfRange {
                    index: i,
                    len: xs.len(),
                })
            }
        };
        self.rebuild(times, rates)
    }

    /// Returns a curve with the zero rate at node `index` replaced, all node
    /// times unchanged.
    ///
    /// # Errors
    ///
    /// Fails if the index is out of range or the rate is not finite.
    pub fn with_value_at(&self, index: usize, rate: f64) -> CurveResult<Self> {
        let len = self.len();
        if index >= len {
            return Err(CurveError::NodeIndexOutOfRange { index, len });
        }
        let mut rates = self.zero_rates().to_vec();
        rates[index] = rate;
        self.rebuild(self.times().to_vec(), rates)
    }

    fn rebuild(&self, times: Vec<f64>, rates: Vec<f64>) -> CurveResult<Self> {
        Self::new(self.name.clone(), self.reference_date, self.day_count, times, rates)
    }

    /// Zero rate at time `t` (continuously compounded).
    pub fn zero_rate(&self, t: f64) -> CurveResult<f64> {
        Ok(self.interpolator.interpolate(t)?)
    }

    /// Discount factor at time `t`.
    pub fn discount_factor(&self, t: f64) -> CurveResult<f64> {
        if !t.is_finite() {
            return Err(CurveError::invalid_value(format!("time must be finite, got {t}")));
        }
        Ok((-self.zero_rate(t)? * t).exp())
    }

    /// Forward discount factor `DF(t2) / DF(t1)`.
    pub fn discount_factor_between(&self, t1: f64, t2: f64) -> CurveResult<f64> {
        Ok(self.discount_factor(t2)? / self.discount_factor(t1)?)
    }

    /// Continuously compounded forward rate between `t1` and `t2`.
    ///
    /// # Errors
    ///
    /// Fails unless `t2 > t1`.
    pub fn forward_rate(&self, t1: f64, t2: f64) -> CurveResult<f64> {
        if t2 <= t1 {
            return Err(CurveError::invalid_value(format!(
                "forward period must be positive: [{t1}, {t2}]"
            )));
        }
        let ratio = self.discount_factor(t1)? / self.discount_factor(t2)?;
        Ok(ratio.ln() / (t2 - t1))
    }

    /// Year fraction from the reference date to `date`.
    #[must_use]
    pub fn year_fraction(&self, date: Date) -> f64 {
        self.day_count.year_fraction(self.reference_date, date)
    }

    /// Zero rate at a date.
    pub fn zero_rate_at(&self, date: Date) -> CurveResult<f64> {
        self.zero_rate(self.year_fraction(date))
    }

    /// Discount factor at a date.
    pub fn discount_factor_at(&self, date: Date) -> CurveResult<f64> {
        self.discount_factor(self.year_fraction(date))
    }
}

impl PartialEq for DiscountCurve {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.reference_date == other.reference_date
            && self.day_count == other.day_count
            && self.times() == other.times()
            && self.zero_rates() == other.zero_rates()
    }
}

impl From<DiscountCurve> for CurveData {
    fn from(curve: DiscountCurve) -> Self {
        Self {
            times: curve.times().to_vec(),
            zero_rates: curve.zero_rates().to_vec(),
            name: curve.name,
            reference_date: curve.reference_date,
            day_count: curve.day_count,
        }
    }
}

impl TryFrom<CurveData> for DiscountCurve {
    type Error = CurveError;

    fn try_from(data: CurveData) -> Result<Self, Self::Error> {
        Self::new(
            data.name,
            data.reference_date,
            data.day_count,
            data.times,
            data.zero_rates,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn anchor() -> Date {
        Date::from_ymd(2024, 6, 5).unwrap()
    }

    fn sample() -> DiscountCurve {
        DiscountCurve::new(
            "TEST",
            anchor(),
            DayCountConvention::Act365Fixed,
            vec![0.25, 1.0, 5.0],
            vec![0.02, 0.025, 0.03],
        )
        .unwrap()
    }

    #[test]
    fn test_interpolation_and_flat_extrapolation() {
        let curve = sample();
        assert_relative_eq!(curve.zero_rate(0.0).unwrap(), 0.02);
        assert_relative_eq!(curve.zero_rate(0.1).unwrap(), 0.02);
        assert_relative_eq!(curve.zero_rate(3.0).unwrap(), 0.0275, epsilon = 1e-15);
        assert_relative_eq!(curve.zero_rate(30.0).unwrap(), 0.03);
    }

    #[test]
    fn test_discount_factors() {
        let curve = sample();
        assert_relative_eq!(curve.discount_factor(0.0).unwrap(), 1.0);
        assert_relative_eq!(curve.discount_factor(5.0).unwrap(), (-0.15_f64).exp(), epsilon = 1e-15);

        let between = curve.discount_factor_between(1.0, 5.0).unwrap();
        assert_relative_eq!(between, (-0.15_f64 + 0.025).exp(), epsilon = 1e-14);

        let fwd = curve.forward_rate(1.0, 5.0).unwrap();
        assert_relative_eq!(fwd, (0.15 - 0.025) / 4.0, epsilon = 1e-14);
        assert!(curve.forward_rate(5.0, 1.0).is_err());
    }

    #[test]
    fn test_dates_map_through_day_count() {
        let curve = sample();
        let date = Date::from_ymd(2025, 6, 5).unwrap();
        assert_relative_eq!(curve.year_fraction(date), 1.0);
        assert_relative_eq!(curve.zero_rate_at(date).unwrap(), 0.025);
        assert_relative_eq!(curve.discount_factor_at(anchor()).unwrap(), 1.0);
    }

    #[test]
    fn test_validation() {
        let dc = DayCountConvention::Act365Fixed;
        assert!(matches!(
            DiscountCurve::new("X", anchor(), dc, vec![1.0], vec![0.01]),
            Err(CurveError::InsufficientPoints { required: 2, got: 1 })
        ));
        assert!(matches!(
            DiscountCurve::new("X", anchor(), dc, vec![1.0, 1.0], vec![0.01, 0.02]),
            Err(CurveError::NonMonotonicNodes { index: 1, .. })
        ));
        assert!(DiscountCurve::new("X", anchor(), dc, vec![1.0, 2.0], vec![0.01]).is_err());
        assert!(DiscountCurve::new("X", anchor(), dc, vec![1.0, 2.0], vec![0.01, f64::NAN]).is_err());
    }

    #[test]
    fn test_node_insertion_lifecycle() {
        let dc = DayCountConvention::Act365Fixed;
        let curve = DiscountCurve::placeholder("X", anchor(), dc, 0.05).unwrap();
        assert_eq!(curve.times(), &[1.0, 2.0]);
        assert_eq!(curve.zero_rates(), &[0.05, 0.05]);

        let first = curve.with_node(0, 0.1, 0.018).unwrap();
        assert_eq!(first.times(), &[0.1, 1.1]);
        assert_eq!(first.zero_rates(), &[0.018, 0.018]);

        let second = first.with_node(1, 0.5, 0.019).unwrap();
        assert_eq!(second.times(), &[0.1, 0.5]);
        assert_eq!(second.zero_rates(), &[0.018, 0.019]);

        let third = second.with_node(2, 1.0, 0.02).unwrap();
        assert_eq!(third.times(), &[0.1, 0.5, 1.0]);

        let replaced = third.with_node(2, 1.5, 0.021).unwrap();
        assert_eq!(replaced.times(), &[0.1, 0.5, 1.5]);
        assert_eq!(replaced.zero_rates(), &[0.018, 0.019, 0.021]);

        // original untouched
        assert_eq!(third.zero_rates(), &[0.018, 0.019, 0.02]);

        assert!(matches!(
            third.with_node(5, 3.0, 0.02),
            Err(CurveError::NodeIndexOutOfRange { index: 5, len: 3 })
        ));
        assert!(second.with_node(2, 0.3, 0.02).is_err());
    }

    #[test]
    fn test_with_value_at() {
        let curve = sample();
        let updated = curve.with_value_at(1, 0.04).unwrap();
        assert_eq!(updated.times(), curve.times());
        assert_eq!(updated.zero_rates(), &[0.02, 0.04, 0.03]);
        assert!(curve.with_value_at(3, 0.04).is_err());
    }

    #[test]
    fn test_serde_roundtrip_validates() {
        let curve = sample();
        let json = serde_json::to_string(&curve).unwrap();
        assert!(json.contains("\"zero_rates\""));
        assert!(json.contains("\"ACT/365F\""));
        let back: DiscountCurve = serde_json::from_str(&json).unwrap();
        assert_eq!(back, curve);

        let broken = json.replace("0.25", "7.0");
        assert!(serde_json::from_str::<DiscountCurve>(&broken).is_err());
    }
}
