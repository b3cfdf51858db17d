//! Generalized error tolerance
//!
//! Callers ask for an absolute tolerance, a relative tolerance, or a mix of
//! both. [`combined_tolerance`] turns that request into a concrete bound for a
//! particular estimate. Only `|estimate|` is ever consulted.

use serde::{Deserialize, Serialize};

/// How absolute and relative tolerances combine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum ToleranceMode {
    /// `max(abs_tol, rel_tol * |x|)`: either criterion suffices
    #[default]
    Max,
    /// `abs_tol + rel_tol * |x|`
    Sum,
    /// `theta * abs_tol + (1 - theta) * rel_tol * |x|` with `theta` in [0, 1]
    Comb {
        /// Weight on the absolute part
        theta: f64,
    },
}

/// Concrete error bound for `estimate` under the given tolerance request.
///
/// # Examples
///
/// ```rust
/// use guaranteed_numerics::tolerance::{combined_tolerance, ToleranceMode};
///
/// assert_eq!(combined_tolerance(1e-3, 0.0, 42.0, ToleranceMode::Max), 1e-3);
/// assert_eq!(combined_tolerance(0.0, 0.1, -20.0, ToleranceMode::Max), 2.0);
/// ```
#[must_use]
pub fn combined_tolerance(abs_tol: f64, rel_tol: f64, estimate: f64, mode: ToleranceMode) -> f64 {
    let relative = rel_tol * estimate.abs();
    match mode {
        ToleranceMode::Max => abs_tol.max(relative),
        ToleranceMode::Sum => abs_tol + relative,
        ToleranceMode::Comb { theta } => theta.mul_add(abs_tol, (1.0 - theta) * relative),
    }
}
