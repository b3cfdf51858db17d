//! Adaptive refinement loop
//!
//! Each pass samples `f` on a uniform grid of `n` points and computes two
//! data-driven norms:
//!
//! - `gn`: the largest deviation of the secant slopes from the overall slope
//! - `fn`: the largest second divided difference
//!
//! With `h = (b - a) / (n - 1)` the cone condition reads
//! `nstar * (2 gn + fn h) >= fn (b - a)`. When it holds, the linear-spline
//! error is at most `(b - a) nstar gn / (4 (n - 1) (n - 1 - nstar))`. When it
//! fails, `f` is rougher than `nstar` admits, so `nstar` is raised to the
//! smallest value consistent with the data and the grid is refined.
//!
//! Grids are nested: refining multiplies the interval count, so every old
//! point is kept and only new points are evaluated.

use super::approximant::PiecewiseLinear;
use super::params::FunappxParams;
use super::{FunappxReport, Guarantee, VectorFunction};
use crate::{Error, Result};
use tracing::{debug, info, warn};

/// `j`-th point of the uniform grid with `intervals` intervals on `[a, b]`.
///
/// `j / intervals` is correctly rounded, so nested grids share their common
/// points bit for bit.
#[allow(clippy::cast_precision_loss)]
fn grid_point(a: f64, b: f64, intervals: usize, j: usize) -> f64 {
    if j == intervals {
        b
    } else {
        (b - a).mul_add(j as f64 / intervals as f64, a)
    }
}

/// Evaluate `f` and enforce the vectorized-function contract.
fn evaluate_checked<F>(f: &mut F, xs: &[f64]) -> Result<Vec<f64>>
where
    F: VectorFunction + ?Sized,
{
    let ys = f.eval(xs);
    if ys.len() != xs.len() {
        return Err(Error::MalformedFunctionOutput {
            expected: xs.len(),
            returned: ys.len(),
        });
    }
    if let Some((&x, &y)) = xs.iter().zip(&ys).find(|(_, y)| !y.is_finite()) {
        return Err(Error::NonFiniteValue { x, y });
    }
    Ok(ys)
}

/// Data-driven norms of one grid
#[derive(Debug, Clone, Copy, PartialEq)]
struct GridNorms {
    /// Variation of the first derivative
    gn: f64,
    /// Bound on the second derivative
    fn_: f64,
}

#[allow(clippy::cast_precision_loss)]
fn grid_norms(ys: &[f64], width: f64) -> GridNorms {
    let intervals = (ys.len() - 1) as f64;
    let overall = (ys[ys.len() - 1] - ys[0]) / intervals;
    let diffs: Vec<f64> = ys.windows(2).map(|w| w[1] - w[0]).collect();

    let max_dev = diffs
        .iter()
        .fold(0.0_f64, |m, &d| m.max((d - overall).abs()));
    let max_second = diffs
        .windows(2)
        .fold(0.0_f64, |m, w| m.max((w[1] - w[0]).abs()));

    GridNorms {
        gn: intervals / width * max_dev,
        fn_: intervals * intervals / (width * width) * max_second,
    }
}

/// Outcome of the cone check on one grid
#[derive(Debug, Clone, Copy, PartialEq)]
enum ConeCheck {
    /// Condition holds; error bounded by `errest`
    Satisfied { errest: f64 },
    /// Data contradict the current `nstar`; raise it to this value
    Violated { nstar: f64 },
}

#[allow(clippy::cast_precision_loss)]
fn cone_check(norms: GridNorms, nstar: f64, width: f64, intervals: usize) -> ConeCheck {
    let m1 = intervals as f64;
    let GridNorms { gn, fn_ } = norms;
    let capacity = 2.0f64.mul_add(gn, fn_ * width / m1);
    if nstar * capacity >= fn_ * width {
        let errest = if m1 > nstar {
            width * nstar * gn / (4.0 * m1 * (m1 - nstar))
        } else {
            f64::INFINITY
        };
        ConeCheck::Satisfied { errest }
    } else {
        ConeCheck::Violated {
            nstar: fn_ * width / capacity,
        }
    }
}

/// Smallest interval count whose error bound meets `abs_tol`, for fixed
/// `nstar` and `gn`.
fn intervals_for_tolerance(nstar: f64, gn: f64, width: f64, abs_tol: f64) -> f64 {
    let k = gn * nstar * width / (4.0 * abs_tol);
    (nstar + nstar.mul_add(nstar, 4.0 * k).sqrt()) / 2.0
}

/// Next nested interval count: at least double, at least `required`.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn next_intervals(intervals: usize, required: f64) -> usize {
    // saturating float-to-int cast
    let factor = ((required / intervals as f64).ceil() as usize).max(2);
    intervals.saturating_mul(factor)
}

/// Refine `xs`/`ys` from `old` to `new` intervals (`new` a multiple of
/// `old`), evaluating only the new points.
fn refine<F>(
    f: &mut F,
    xs: &mut Vec<f64>,
    ys: &mut Vec<f64>,
    (a, b): (f64, f64),
    old: usize,
    new: usize,
) -> Result<()>
where
    F: VectorFunction + ?Sized,
{
    let factor = new / old;
    let inner = factor - 1;
    let fresh_x: Vec<f64> = (0..=new)
        .filter(|j| j % factor != 0)
        .map(|j| grid_point(a, b, new, j))
        .collect();
    let fresh_y = evaluate_checked(f, &fresh_x)?;

    let mut merged_x = Vec::with_capacity(new + 1);
    let mut merged_y = Vec::with_capacity(new + 1);
    for (i, (cx, cy)) in fresh_x.chunks(inner).zip(fresh_y.chunks(inner)).enumerate() {
        merged_x.push(xs[i]);
        merged_y.push(ys[i]);
        merged_x.extend_from_slice(cx);
        merged_y.extend_from_slice(cy);
    }
    merged_x.push(xs[old]);
    merged_y.push(ys[old]);

    *xs = merged_x;
    *ys = merged_y;
    Ok(())
}

/// Guaranteed piecewise-linear approximation of `f` on `[a, b]`.
///
/// Parameters are corrected first and the corrections listed in the report.
/// The report's [`Guarantee`] is [`Guarantee::ConditionalOnCone`] only when
/// the error bound met `abs_tol` within both the point budget and the
/// iteration cap; the bound itself rests on `f` satisfying the cone
/// condition, which cannot be verified from samples.
///
/// # Errors
///
/// - [`Error::MalformedFunctionOutput`] when `f` returns the wrong number of values
/// - [`Error::NonFiniteValue`] when `f` returns NaN or infinity
///
/// # Example
///
/// ```rust
/// use guaranteed_numerics::funappx::{approximate, pointwise, FunappxParams, Guarantee};
///
/// let mut f = pointwise(|x: f64| x.sin());
/// let params = FunappxParams::default().abs_tol(1e-5);
/// let report = approximate(&mut f, &params)?;
///
/// assert_eq!(report.guarantee, Guarantee::ConditionalOnCone);
/// assert!((report.approximant.evaluate(0.3) - 0.3_f64.sin()).abs() <= 1e-5);
/// # Ok::<(), guaranteed_numerics::Error>(())
/// ```
#[tracing::instrument(skip_all, fields(a = params.a, b = params.b, abs_tol = params.abs_tol))]
pub fn approximate<F>(f: &mut F, params: &FunappxParams) -> Result<FunappxReport>
where
    F: VectorFunction + ?Sized,
{
    let (params, diagnostics) = params.clone().validate();
    let (a, b) = (params.a, params.b);
    let width = b - a;
    let ninit = params.ninit();

    let mut intervals = ninit - 1;
    let mut xs: Vec<f64> = (0..=intervals).map(|j| grid_point(a, b, intervals, j)).collect();
    let mut ys = evaluate_checked(f, &xs)?;
    let mut n_evaluations = xs.len() as u64;
    #[allow(clippy::cast_precision_loss)]
    let mut nstar = (ninit - 2) as f64;

    let mut iterations = 0_u32;
    let mut errest = None;
    let mut accepted = false;
    let mut exceed_budget = false;
    let mut exceed_iterations = false;

    loop {
        let norms = grid_norms(&ys, width);
        let check = cone_check(norms, nstar, width, intervals);
        debug!(
            iteration = iterations,
            points = intervals + 1,
            gn = norms.gn,
            fn_ = norms.fn_,
            nstar,
            ?check,
            "cone check"
        );

        let required = match check {
            ConeCheck::Satisfied { errest: bound } => {
                errest = Some(bound);
                if bound <= params.abs_tol {
                    accepted = true;
                    break;
                }
                intervals_for_tolerance(nstar, norms.gn, width, params.abs_tol)
            }
            ConeCheck::Violated { nstar: raised } => {
                errest = None;
                nstar = raised;
                raised + 1.0
            }
        };

        if exceed_budget {
            break;
        }
        if iterations >= params.max_iterations {
            exceed_iterations = true;
            break;
        }

        let mut next = next_intervals(intervals, required);
        if next >= params.nmax {
            exceed_budget = true;
            next = intervals * ((params.nmax - 1) / intervals);
            if next <= intervals {
                break;
            }
        }

        refine(f, &mut xs, &mut ys, (a, b), intervals, next)?;
        n_evaluations += (next - intervals) as u64;
        intervals = next;
        iterations += 1;
    }

    let guarantee = if accepted && !exceed_budget && !exceed_iterations {
        Guarantee::ConditionalOnCone
    } else {
        Guarantee::NotGuaranteed
    };

    if guarantee == Guarantee::ConditionalOnCone {
        info!(points = intervals + 1, n_evaluations, ?errest, "approximation accepted");
    } else {
        warn!(
            points = intervals + 1,
            exceed_budget,
            exceed_iterations,
            ?errest,
            "approximation not guaranteed"
        );
    }

    Ok(FunappxReport {
        approximant: PiecewiseLinear::new(xs, ys)?,
        guarantee,
        exceed_budget,
        exceed_iterations,
        errest,
        nstar,
        n_evaluations,
        iterations,
        params,
        diagnostics,
    })
}
