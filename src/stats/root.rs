//! Bracketing root finder for monotone decreasing functions

use crate::{Error, Result};

/// Cap on bracket-widening steps before giving up
const MAX_EXPANSIONS: usize = 200;

/// Cap on bisection steps once a bracket is found
const MAX_BISECTIONS: usize = 200;

/// Relative width at which a bracket counts as converged
const X_TOL: f64 = 1e-12;

/// Find the root of a decreasing function `f`, starting near `seed`.
///
/// Widens a bracket `[lo, hi]` with `f(lo) > 0 >= f(hi)` outward from the
/// seed, then bisects it. Returns the `hi` end, so `f(result) <= 0` always
/// holds on success.
///
/// # Errors
///
/// [`Error::NumericConvergence`] if the seed or any evaluation is NaN, if no
/// sign change is found within the expansion cap, or if bisection fails to
/// shrink the bracket within its iteration cap.
pub fn decreasing_root<F>(f: F, seed: f64, solver: &'static str) -> Result<f64>
where
    F: Fn(f64) -> f64,
{
    let fail = |reason: String| Error::NumericConvergence { solver, reason };

    if !seed.is_finite() {
        return Err(fail(format!("seed {seed} is not finite")));
    }

    let eval = |x: f64| -> Result<f64> {
        let y = f(x);
        if y.is_nan() {
            Err(fail(format!("function is NaN at {x}")))
        } else {
            Ok(y)
        }
    };

    let (mut lo, mut hi) = if eval(seed)? > 0.0 {
        let mut step = 1.0;
        let mut hi = seed + step;
        let mut expansions = 0;
        while eval(hi)? > 0.0 {
            expansions += 1;
            if expansions > MAX_EXPANSIONS || !hi.is_finite() {
                return Err(fail(format!("no sign change above {seed}")));
            }
            step *= 1.5;
            hi += step;
        }
        (hi - step, hi)
    } else {
        let mut step = 1.0;
        let mut lo = seed - step;
        let mut expansions = 0;
        while eval(lo)? <= 0.0 {
            expansions += 1;
            if expansions > MAX_EXPANSIONS || !lo.is_finite() {
                return Err(fail(format!("no sign change below {seed}")));
            }
            step *= 1.5;
            lo -= step;
        }
        (lo, lo + step)
    };

    for _ in 0..MAX_BISECTIONS {
        if hi - lo <= X_TOL * (1.0 + hi.abs()) {
            return Ok(hi);
        }
        let mid = 0.5 * (lo + hi);
        if eval(mid)? > 0.0 {
            lo = mid;
        } else {
            hi = mid;
        }
    }

    Err(fail(format!(
        "bracket [{lo}, {hi}] still wider than tolerance after {MAX_BISECTIONS} bisections"
    )))
}
