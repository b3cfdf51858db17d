//! Bernoulli mean estimation with a fixed Hoeffding sample size
//!
//! For samples in {0, 1} Hoeffding's inequality gives the sample size in
//! closed form, so there is no variance stage and no refinement. The cost is
//! known before the first draw.

use super::params::BernoulliParams;
use super::report::{BernoulliReport, ExitStatus};
use crate::chunked::ChunkedEvaluator;
use crate::sampler::Sampler;
use crate::stats::ceil_count;
use crate::{Error, Result};
use std::time::Instant;
use tracing::{info, warn};

/// `ceil(ln(2 / alpha) / (2 * abs_tol^2))`
#[must_use]
pub fn hoeffding_sample_size(abs_tol: f64, alpha: f64) -> u64 {
    ceil_count((2.0 / alpha).ln() / (2.0 * abs_tol * abs_tol))
}

/// Estimate `P(Y = 1)` to within `abs_tol` with probability at least
/// `1 - alpha`.
///
/// When the Hoeffding size exceeds the sample budget the whole budget is
/// spent and the report says [`ExitStatus::SampleBudgetExceeded`].
///
/// # Errors
///
/// - [`Error::InvalidSample`] for any sample other than 0 or 1
/// - [`Error::MalformedSamples`] when the sampler breaks its length contract
///
/// # Example
///
/// ```rust
/// use guaranteed_numerics::mean::{bernoulli, BernoulliParams};
///
/// let mut always = |n: usize| vec![1.0; n];
/// let params = BernoulliParams::default().abs_tol(0.05).alpha(0.05);
/// let report = bernoulli::estimate(&mut always, &params).unwrap();
/// assert_eq!(report.estimate, 1.0);
/// assert_eq!(report.samples_used, 738);
/// ```
#[tracing::instrument(skip_all, fields(abs_tol = params.abs_tol, alpha = params.alpha))]
#[allow(clippy::cast_precision_loss, clippy::float_cmp)]
pub fn estimate<S>(sampler: &mut S, params: &BernoulliParams) -> Result<BernoulliReport>
where
    S: Sampler + ?Sized,
{
    let started = Instant::now();
    let (params, diagnostics) = params.clone().validate();
    let required = hoeffding_sample_size(params.abs_tol, params.alpha);
    let (n, exit) = if required > params.sample_budget {
        (params.sample_budget, ExitStatus::SampleBudgetExceeded)
    } else {
        (required, ExitStatus::Success)
    };

    let ones = ChunkedEvaluator::new(params.chunk_ceiling).fold(sampler, n, 0_u64, |ones, chunk| {
        chunk.iter().try_fold(ones, |ones, &y| {
            if y == 1.0 {
                Ok(ones + 1)
            } else if y == 0.0 {
                Ok(ones)
            } else {
                Err(Error::InvalidSample {
                    value: y,
                    reason: "Bernoulli samples must be 0 or 1",
                })
            }
        })
    })?;
    let estimate = ones as f64 / n as f64;

    if exit.is_success() {
        info!(estimate, samples = n, "Bernoulli mean estimated");
    } else {
        warn!(estimate, required, budget = n, "Hoeffding sample size exceeds the budget");
    }

    Ok(BernoulliReport {
        estimate,
        exit,
        required_samples: required,
        samples_used: n,
        elapsed_secs: started.elapsed().as_secs_f64(),
        params,
        diagnostics,
    })
}
