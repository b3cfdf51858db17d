//! Guaranteed Monte Carlo mean estimation
//!
//! The run moves through three stages:
//!
//! 1. **Bootstrapping**: a warm-up draw absorbs one-time setup cost, then
//!    timed trial batches measure the per-sample cost for budget
//!    extrapolation.
//! 2. **Variance estimation**: `n_sigma` samples bound the standard deviation
//!    (inflated by `fudge`) and the kurtosis, spending half of `alpha`.
//! 3. **Iterative refinement**: fresh batches, each sized by the Chebyshev and
//!    Berry-Esseen bounds, until the generalized tolerance is provably met
//!    or the budget runs out. Iteration `i` spends a `2^-i` share of the
//!    remaining confidence.
//!
//! The stopping test evaluates the tolerance at `mean ± tol`. When the
//! half-sum of those two values reaches `tol`, every point in the interval
//! satisfies the requested tolerance and the estimate is shifted by the
//! half-difference.

use super::params::MeanParams;
use super::report::{BootstrapSummary, ExitStatus, MeanReport, RefinementStep, VarianceStage};
use crate::budget::{BudgetTracker, TrialObservation};
use crate::chunked::ChunkedEvaluator;
use crate::sampler::{draw_checked, Sampler};
use crate::stats::{
    kurtosis_bound, sample_size_for_tolerance, tolerance_for_sample_size, OnlineMoments,
};
use crate::tolerance::combined_tolerance;
use crate::{Error, Result};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Samples drawn before timing starts
const WARM_UP_SAMPLES: usize = 2;
/// Sizes of the two fixed timed trials
const TRIAL_SIZES: [usize; 2] = [10, 20];

// Bounded tolerance shrink between iterations
const SHRINK_MARGIN: f64 = 0.7;
const SHRINK_MAX: f64 = 0.5;
const SHRINK_MIN: f64 = 0.3;

/// Multiplier for the last bootstrap trial given the measured cost per sample.
///
/// Cheap samplers get a bigger trial so fixed call overhead does not dominate
/// the timing; expensive ones get a smaller one so the trial stays short.
#[must_use]
pub fn booster(seconds_per_sample: f64) -> usize {
    if seconds_per_sample < 1e-6 {
        8
    } else if seconds_per_sample >= 1e-3 {
        2
    } else {
        5
    }
}

/// Confidence share of refinement iteration `i` (1-based).
///
/// The shares sum to `(alpha - alpha_sigma) / (1 - alpha_sigma)` over all
/// iterations. The refinement bounds hold conditionally on the variance
/// stage, so the two combine as `1 - (1 - alpha_sigma) * (1 - sum)`, which
/// is at most `alpha`.
#[must_use]
pub fn iteration_alpha(alpha: f64, alpha_sigma: f64, i: u32) -> f64 {
    (alpha - alpha_sigma) / (1.0 - alpha_sigma) * (-f64::from(i)).exp2()
}

/// Tolerance for the next iteration after observing margin `deltaplus`.
///
/// Always within `[0.3, 0.5] * tol`.
#[must_use]
pub fn next_tolerance(tol: f64, deltaplus: f64) -> f64 {
    (SHRINK_MARGIN * deltaplus)
        .min(SHRINK_MAX * tol)
        .max(SHRINK_MIN * tol)
}

/// State of one estimation call
struct Run<'a, S: ?Sized> {
    sampler: &'a mut S,
    params: MeanParams,
    tracker: BudgetTracker,
    evaluator: ChunkedEvaluator,
    /// Every bootstrap sample, for the early-exit estimate
    drawn: OnlineMoments,
}

impl<S: Sampler + ?Sized> Run<'_, S> {
    fn timed_trial(&mut self, n: usize) -> Result<TrialObservation> {
        let started = Instant::now();
        let samples = draw_checked(&mut *self.sampler, n)?;
        let trial = TrialObservation::new(n as u64, started.elapsed().as_secs_f64());
        self.drawn.extend(&samples);
        self.tracker.record_trial(trial);
        Ok(trial)
    }

    fn bootstrap(&mut self) -> Result<BootstrapSummary> {
        let warm_up = draw_checked(&mut *self.sampler, WARM_UP_SAMPLES)?;
        self.drawn.extend(&warm_up);
        self.tracker.consume(WARM_UP_SAMPLES as u64);

        let mut trials = Vec::with_capacity(TRIAL_SIZES.len() + 1);
        for n in TRIAL_SIZES {
            trials.push(self.timed_trial(n)?);
        }
        let tpern = trials
            .last()
            .map_or(0.0, TrialObservation::seconds_per_sample);
        let booster = booster(tpern);
        let last = self.timed_trial(TRIAL_SIZES[1] * booster)?;
        trials.push(last);

        debug!(tpern, booster, "bootstrap trials timed");
        Ok(BootstrapSummary {
            trials,
            booster,
            seconds_per_sample: last.seconds_per_sample(),
        })
    }

    fn variance_stage(&mut self, alpha_sigma: f64) -> Result<VarianceStage> {
        let n_sigma = self.params.n_sigma;
        let started = Instant::now();
        let moments = self.evaluator.moments(&mut *self.sampler, n_sigma)?;
        self.tracker
            .record_trial(TrialObservation::new(n_sigma, started.elapsed().as_secs_f64()));

        let variance = moments.variance();
        if !variance.is_finite() {
            return Err(Error::InvalidSample {
                value: variance,
                reason: "variance-stage samples have no finite variance",
            });
        }
        let stage = VarianceStage {
            samples: n_sigma,
            variance,
            sigma_bound: self.params.fudge * variance.sqrt(),
            kurtmax: kurtosis_bound(n_sigma, alpha_sigma, self.params.fudge),
            mean: moments.mean(),
        };
        debug!(
            variance,
            sigma_bound = stage.sigma_bound,
            kurtmax = stage.kurtmax,
            "variance stage done"
        );
        Ok(stage)
    }

    fn timed_mean(&mut self, n: u64) -> Result<f64> {
        let started = Instant::now();
        let mean = self.evaluator.mean(&mut *self.sampler, n)?;
        self.tracker
            .record_trial(TrialObservation::new(n, started.elapsed().as_secs_f64()));
        Ok(mean)
    }

    fn refine(
        &mut self,
        stage: &VarianceStage,
        alpha_sigma: f64,
        steps: &mut Vec<RefinementStep>,
    ) -> Result<(f64, ExitStatus)> {
        let MeanParams {
            abs_tol,
            rel_tol,
            tol_mode,
            alpha,
            n1,
            ..
        } = self.params;
        let tolfun = |x: f64| combined_tolerance(abs_tol, rel_tol, x, tol_mode);

        let mut i = 1_u32;
        let mut alpha_i = iteration_alpha(alpha, alpha_sigma, i);
        let mut n = n1;
        let mut tol = stage.sigma_bound * tolerance_for_sample_size(n, alpha_i, stage.kurtmax)?;
        let mut previous_mean = stage.mean;

        loop {
            let budget_left = self.tracker.remaining();
            let clamped = n > budget_left;
            let size = n.min(budget_left);
            let mean = if size == 0 {
                previous_mean
            } else {
                self.timed_mean(size)?
            };
            steps.push(RefinementStep {
                tolerance: tol,
                alpha: alpha_i,
                requested: n,
                sample_size: size,
                budget_left,
                mean,
            });
            debug!(iteration = i, tolerance = tol, requested = n, sample_size = size, mean, "refinement step");

            if clamped {
                return Ok((mean, ExitStatus::SampleBudgetExceeded));
            }

            let lower = tolfun(mean - tol);
            let upper = tolfun(mean + tol);
            let deltaplus = (lower + upper) / 2.0;
            if deltaplus >= tol {
                let deltaminus = (lower - upper) / 2.0;
                return Ok((mean + deltaminus, ExitStatus::Success));
            }

            previous_mean = mean;
            tol = next_tolerance(tol, deltaplus);
            i += 1;
            alpha_i = iteration_alpha(alpha, alpha_sigma, i);
            n = sample_size_for_tolerance(tol / stage.sigma_bound, alpha_i, stage.kurtmax)?;
        }
    }
}

/// Estimate `E[Y]` to the generalized tolerance with probability at least
/// `1 - alpha`.
///
/// Out-of-range parameters are corrected first and listed in the report's
/// diagnostics. Running out of time or samples is not an error: the report
/// carries the best estimate obtained and a non-success [`ExitStatus`].
///
/// # Errors
///
/// - [`Error::MalformedSamples`] when the sampler breaks its length contract
/// - [`Error::InvalidSample`] when the variance-stage samples are not finite
/// - [`Error::NumericConvergence`] when a concentration bound cannot be solved
///
/// # Example
///
/// ```rust
/// use guaranteed_numerics::mean::{guaranteed, MeanParams};
///
/// let mut constant = |n: usize| vec![3.0; n];
/// let report = guaranteed::estimate(&mut constant, &MeanParams::default()).unwrap();
/// assert!(report.exit.is_success());
/// assert_eq!(report.estimate, 3.0);
/// ```
#[tracing::instrument(
    skip_all,
    fields(abs_tol = params.abs_tol, rel_tol = params.rel_tol, alpha = params.alpha)
)]
pub fn estimate<S>(sampler: &mut S, params: &MeanParams) -> Result<MeanReport>
where
    S: Sampler + ?Sized,
{
    let (params, diagnostics) = params.clone().validate();
    let alpha_sigma = params.alpha / 2.0;
    let mut run = Run {
        sampler,
        tracker: BudgetTracker::start(params.time_budget, params.sample_budget),
        evaluator: ChunkedEvaluator::new(params.chunk_ceiling),
        drawn: OnlineMoments::new(),
        params,
    };

    let bootstrap = run.bootstrap()?;
    let mut variance_stage = None;
    let mut iterations = Vec::new();

    let (estimate, exit) = if run.tracker.time_exhausted() {
        (run.drawn.mean(), ExitStatus::TimeBudgetExceededAtSetup)
    } else if run.params.n_sigma > run.tracker.remaining() {
        (run.drawn.mean(), ExitStatus::TimeBudgetExceededAtVarianceStage)
    } else {
        let stage = run.variance_stage(alpha_sigma)?;
        variance_stage = Some(stage);
        run.refine(&stage, alpha_sigma, &mut iterations)?
    };

    let report = MeanReport {
        estimate,
        exit,
        samples_used: run.tracker.samples_used(),
        elapsed_secs: run.tracker.elapsed(),
        alpha_sigma,
        bootstrap,
        variance_stage,
        iterations,
        params: run.params,
        diagnostics,
    };

    if exit.is_success() {
        info!(
            estimate,
            samples = report.samples_used,
            iterations = report.iterations.len(),
            "mean estimated"
        );
    } else {
        warn!(
            estimate,
            samples = report.samples_used,
            exit = %exit,
            "budget exhausted before tolerance was met"
        );
    }
    Ok(report)
}
