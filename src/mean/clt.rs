//! One-shot CLT mean estimator
//!
//! Estimates the variance from `n_sigma` samples, sizes a single second draw
//! with the normal quantile and returns its mean. The confidence statement is
//! asymptotic only. A required size above the absolute ceiling is an error,
//! never a silent truncation.

use super::params::CltParams;
use super::report::CltReport;
use crate::chunked::ChunkedEvaluator;
use crate::sampler::Sampler;
use crate::stats::{ceil_count, normal_inv};
use crate::tolerance::combined_tolerance;
use crate::{Error, Result};
use std::time::Instant;
use tracing::{debug, info};

/// Second-stage sample size for standard deviation bound `sigma_bound`,
/// target `tolerance` and uncertainty `alpha`. At least 1.
#[must_use]
pub fn clt_sample_size(sigma_bound: f64, tolerance: f64, alpha: f64) -> u64 {
    let z = normal_inv(1.0 - alpha / 2.0);
    let width = z * sigma_bound / tolerance.max(f64::EPSILON);
    ceil_count(width * width).max(1)
}

/// Estimate `E[Y]` with an asymptotic `1 - alpha` confidence statement.
///
/// # Errors
///
/// - [`Error::SampleCeilingExceeded`] when `n_sigma + n_mu` exceeds the ceiling
/// - [`Error::MalformedSamples`] when the sampler breaks its length contract
/// - [`Error::InvalidSample`] when the first-stage samples are not finite
#[tracing::instrument(
    skip_all,
    fields(abs_tol = params.abs_tol, rel_tol = params.rel_tol, alpha = params.alpha)
)]
pub fn estimate<S>(sampler: &mut S, params: &CltParams) -> Result<CltReport>
where
    S: Sampler + ?Sized,
{
    let started = Instant::now();
    let (params, diagnostics) = params.clone().validate();
    let evaluator = ChunkedEvaluator::new(params.chunk_ceiling);

    let moments = evaluator.moments(sampler, params.n_sigma)?;
    let variance = moments.variance();
    if !variance.is_finite() {
        return Err(Error::InvalidSample {
            value: variance,
            reason: "first-stage samples have no finite variance",
        });
    }
    let sigma_bound = params.fudge * variance.sqrt();
    let tolerance = combined_tolerance(params.abs_tol, params.rel_tol, moments.mean(), params.tol_mode);
    let n_mu = clt_sample_size(sigma_bound, tolerance, params.alpha);
    debug!(variance, sigma_bound, tolerance, n_mu, "second stage sized");

    let required = params.n_sigma.saturating_add(n_mu);
    if required > params.sample_ceiling {
        return Err(Error::SampleCeilingExceeded {
            required,
            ceiling: params.sample_ceiling,
        });
    }

    let estimate = evaluator.mean(sampler, n_mu)?;
    info!(estimate, samples = required, "mean estimated (CLT)");

    Ok(CltReport {
        estimate,
        n_sigma: params.n_sigma,
        n_mu,
        variance,
        sigma_bound,
        tolerance,
        elapsed_secs: started.elapsed().as_secs_f64(),
        params,
        diagnostics,
    })
}
