//! Guaranteed piecewise-linear function approximation
//!
//! [`approximate`] samples a vectorized function on nested uniform grids
//! until a data-driven error bound meets the absolute tolerance. The bound is
//! valid for functions in a cone: those whose second derivative is
//! controlled by the variation of their first derivative. That assumption
//! cannot be checked from samples, so the report states the guarantee as
//! [`Guarantee::ConditionalOnCone`] rather than asserting it outright.
//!
//! ## Example
//!
//! ```rust
//! use guaranteed_numerics::funappx::{approximate, pointwise, FunappxParams};
//!
//! let mut square = pointwise(|x: f64| x * x);
//! let params = FunappxParams::default().interval(-2.0, 2.0).abs_tol(1e-6);
//! let report = approximate(&mut square, &params)?;
//!
//! assert!(!report.exceed_budget);
//! assert!((report.approximant.evaluate(1.234) - 1.234 * 1.234).abs() <= 1e-6);
//! # Ok::<(), guaranteed_numerics::Error>(())
//! ```

mod approximant;
mod engine;
mod params;

pub use approximant::{LinearSegment, PiecewiseLinear};
pub use engine::approximate;
pub use params::{
    FunappxParams, DEFAULT_A, DEFAULT_ABS_TOL, DEFAULT_B, DEFAULT_MAX_ITERATIONS, DEFAULT_NHI,
    DEFAULT_NLO, DEFAULT_NMAX, MIN_POINTS,
};

use crate::diagnostics::Diagnostics;
use crate::Result;
use serde::{Deserialize, Serialize};

/// Function evaluated at many points per call: one output per input.
pub trait VectorFunction {
    /// Values at `xs`. Must return a vector of the same length.
    fn eval(&mut self, xs: &[f64]) -> Vec<f64>;
}

impl<F> VectorFunction for F
where
    F: FnMut(&[f64]) -> Vec<f64>,
{
    fn eval(&mut self, xs: &[f64]) -> Vec<f64> {
        self(xs)
    }
}

/// Vectorize a scalar function.
pub fn pointwise<F>(f: F) -> impl FnMut(&[f64]) -> Vec<f64>
where
    F: Fn(f64) -> f64,
{
    move |xs: &[f64]| xs.iter().map(|&x| f(x)).collect()
}

/// Vectorize a scalar function, evaluating points in parallel.
///
/// Only the evaluation of one batch is parallel; the refinement loop that
/// consumes it stays sequential.
#[cfg(feature = "rayon")]
pub fn par_pointwise<F>(f: F) -> impl FnMut(&[f64]) -> Vec<f64>
where
    F: Fn(f64) -> f64 + Sync + Send,
{
    use rayon::prelude::*;
    move |xs: &[f64]| xs.par_iter().map(|&x| f(x)).collect()
}

/// What the returned error bound rests on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Guarantee {
    /// `|f - approximant| <= abs_tol` on `[a, b]` if `f` lies in the cone
    ConditionalOnCone,
    /// Budget or iteration cap reached first; no bound is claimed
    NotGuaranteed,
}

/// Result of [`approximate`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunappxReport {
    /// Interpolant on the final grid
    pub approximant: PiecewiseLinear,
    /// Whether the tolerance is guaranteed (conditionally)
    pub guarantee: Guarantee,
    /// Refinement would have exceeded `nmax` points
    pub exceed_budget: bool,
    /// Iteration cap reached
    pub exceed_iterations: bool,
    /// Error bound on the final grid; `None` when the last cone check failed
    pub errest: Option<f64>,
    /// Final cone parameter
    pub nstar: f64,
    /// Function evaluations over the whole call
    pub n_evaluations: u64,
    /// Refinements performed
    pub iterations: u32,
    /// Parameters after validation
    pub params: FunappxParams,
    /// Corrections applied to the input
    pub diagnostics: Diagnostics,
}

impl FunappxReport {
    /// Serialize for diagnostics or plotting consumers.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`](crate::Error::Config) if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointwise_preserves_order() {
        let mut f = pointwise(|x: f64| 3.0 * x);
        assert_eq!(f.eval(&[1.0, -2.0, 0.5]), vec![3.0, -6.0, 1.5]);
    }

    #[cfg(feature = "rayon")]
    #[test]
    fn test_par_pointwise_matches_sequential() {
        let xs: Vec<f64> = (0..10_000).map(|i| f64::from(i) * 1e-3).collect();
        let mut seq = pointwise(f64::cos);
        let mut par = par_pointwise(f64::cos);
        assert_eq!(seq.eval(&xs), par.eval(&xs));
    }

    #[test]
    fn test_report_json() {
        let mut f = pointwise(|x: f64| x);
        let report = approximate(&mut f, &FunappxParams::default()).unwrap();
        let json = report.to_json().unwrap();
        assert!(json.contains("\"guarantee\": \"conditional_on_cone\""));
    }
}
