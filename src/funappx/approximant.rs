//! Piecewise-linear interpolant

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// One linear piece: `value(x) = intercept + slope * (x - left)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearSegment {
    /// Slope over the segment
    pub slope: f64,
    /// Value at the segment's left breakpoint
    pub intercept: f64,
}

/// Continuous piecewise-linear function through `(breakpoints[i], values[i])`.
///
/// Breakpoints are strictly increasing. Outside `[a, b]` the end segments
/// are extended linearly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PiecewiseLinear {
    breakpoints: Vec<f64>,
    values: Vec<f64>,
    segments: Vec<LinearSegment>,
}

impl PiecewiseLinear {
    /// Interpolant through the given points.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] with fewer than two points, mismatched lengths
    /// or breakpoints that are not strictly increasing.
    pub fn new(breakpoints: Vec<f64>, values: Vec<f64>) -> Result<Self> {
        if breakpoints.len() != values.len() || breakpoints.len() < 2 {
            return Err(Error::InvalidInput(format!(
                "need at least two (x, y) pairs, got {} breakpoints and {} values",
                breakpoints.len(),
                values.len()
            )));
        }
        if breakpoints.windows(2).any(|w| !(w[0] < w[1])) {
            return Err(Error::InvalidInput(
                "breakpoints must be strictly increasing".to_string(),
            ));
        }

        let segments = breakpoints
            .windows(2)
            .zip(values.windows(2))
            .map(|(x, y)| LinearSegment {
                slope: (y[1] - y[0]) / (x[1] - x[0]),
                intercept: y[0],
            })
            .collect();

        Ok(Self {
            breakpoints,
            values,
            segments,
        })
    }

    /// Breakpoints, strictly increasing.
    #[must_use]
    pub fn breakpoints(&self) -> &[f64] {
        &self.breakpoints
    }

    /// Function values at the breakpoints.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Linear pieces, one per pair of neighbouring breakpoints.
    #[must_use]
    pub fn segments(&self) -> &[LinearSegment] {
        &self.segments
    }

    /// `(a, b)`
    #[must_use]
    pub fn interval(&self) -> (f64, f64) {
        // new() guarantees at least two breakpoints
        (
            self.breakpoints[0],
            self.breakpoints[self.breakpoints.len() - 1],
        )
    }

    /// Evaluate at `x`.
    #[must_use]
    pub fn evaluate(&self, x: f64) -> f64 {
        let upper = self.breakpoints.partition_point(|&p| p <= x);
        let index = upper.clamp(1, self.segments.len()) - 1;
        let segment = self.segments[index];
        segment.slope.mul_add(x - self.breakpoints[index], segment.intercept)
    }

    /// Evaluate at every point of `xs`.
    #[must_use]
    pub fn evaluate_many(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.evaluate(x)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tent() -> PiecewiseLinear {
        PiecewiseLinear::new(vec![0.0, 1.0, 2.0], vec![0.0, 2.0, 0.0]).unwrap()
    }

    #[test]
    fn test_interpolates_breakpoints() {
        let f = tent();
        assert_eq!(f.evaluate(0.0), 0.0);
        assert_eq!(f.evaluate(1.0), 2.0);
        assert_eq!(f.evaluate(2.0), 0.0);
        assert_eq!(f.evaluate(0.5), 1.0);
        assert_eq!(f.evaluate(1.5), 1.0);
    }

    #[test]
    fn test_extrapolates_end_segments() {
        let f = tent();
        assert_eq!(f.evaluate(-1.0), -2.0);
        assert_eq!(f.evaluate(3.0), -2.0);
    }

    #[test]
    fn test_segments() {
        let f = tent();
        assert_eq!(f.segments().len(), 2);
        assert_eq!(f.segments()[0], LinearSegment { slope: 2.0, intercept: 0.0 });
        assert_eq!(f.segments()[1], LinearSegment { slope: -2.0, intercept: 2.0 });
        assert_eq!(f.interval(), (0.0, 2.0));
        assert_eq!(f.evaluate_many(&[0.25, 1.75]), vec![0.5, 0.5]);
    }

    #[test]
    fn test_rejects_bad_breakpoints() {
        assert!(PiecewiseLinear::new(vec![0.0], vec![1.0]).is_err());
        assert!(PiecewiseLinear::new(vec![0.0, 1.0], vec![1.0]).is_err());
        assert!(PiecewiseLinear::new(vec![0.0, 0.0, 1.0], vec![1.0, 1.0, 1.0]).is_err());
        assert!(PiecewiseLinear::new(vec![0.0, f64::NAN], vec![1.0, 1.0]).is_err());
    }
}
