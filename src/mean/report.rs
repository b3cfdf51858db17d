//! Output reports of the mean estimators
//!
//! A report is produced exactly once per call and is read-only afterwards.

use super::params::{BernoulliParams, CltParams, MeanParams};
use crate::budget::TrialObservation;
use crate::diagnostics::Diagnostics;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How an estimation call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitStatus {
    /// Tolerance met with the requested confidence.
    Success,
    /// The sample or time budget ran out during refinement (or, for the
    /// Bernoulli estimator, the required size exceeds the sample budget).
    SampleBudgetExceeded,
    /// The time budget was already spent after the bootstrap trials.
    TimeBudgetExceededAtSetup,
    /// The variance-stage draw would not fit in the remaining budget.
    ///
    /// Raised whichever budget is short: the time budget extrapolated from
    /// the bootstrap cost, or the sample budget.
    TimeBudgetExceededAtVarianceStage,
}

impl ExitStatus {
    /// Legacy integer exit code (0 = success).
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::SampleBudgetExceeded => 1,
            Self::TimeBudgetExceededAtSetup => 2,
            Self::TimeBudgetExceededAtVarianceStage => 3,
        }
    }

    /// True only for [`ExitStatus::Success`].
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

impl fmt::Display for ExitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Success => "success",
            Self::SampleBudgetExceeded => "sample budget exceeded",
            Self::TimeBudgetExceededAtSetup => "time budget exceeded during setup",
            Self::TimeBudgetExceededAtVarianceStage => {
                "time budget exceeded before variance estimation"
            }
        };
        f.write_str(text)
    }
}

/// Bootstrap timing used to extrapolate the time budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BootstrapSummary {
    /// Timed trial batches, in order
    pub trials: Vec<TrialObservation>,
    /// Multiplier chosen for the last trial
    pub booster: usize,
    /// Seconds per sample from the last trial
    pub seconds_per_sample: f64,
}

/// Variance-stage outcome
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VarianceStage {
    /// Samples drawn
    pub samples: u64,
    /// Sample variance
    pub variance: f64,
    /// Inflated standard deviation bound, `fudge * sqrt(variance)`
    pub sigma_bound: f64,
    /// Kurtosis bound used by the Berry-Esseen solver
    pub kurtmax: f64,
    /// Mean of the variance-stage samples
    pub mean: f64,
}

/// One refinement iteration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RefinementStep {
    /// Claimed error bound for this iteration
    pub tolerance: f64,
    /// Confidence share spent on this iteration
    pub alpha: f64,
    /// Samples the bound asked for
    pub requested: u64,
    /// Samples actually drawn (smaller than `requested` only when clamped)
    pub sample_size: u64,
    /// Samples still affordable before the draw
    pub budget_left: u64,
    /// Sample mean
    pub mean: f64,
}

/// Report of the guaranteed mean estimator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeanReport {
    /// Final estimate
    pub estimate: f64,
    /// How the call ended
    pub exit: ExitStatus,
    /// Every sample drawn, bootstrap included
    pub samples_used: u64,
    /// Wall-clock seconds for the whole call
    pub elapsed_secs: f64,
    /// Confidence share spent on variance estimation
    pub alpha_sigma: f64,
    /// Bootstrap trials
    pub bootstrap: BootstrapSummary,
    /// Present once the variance stage ran
    pub variance_stage: Option<VarianceStage>,
    /// Refinement iterations, in order
    pub iterations: Vec<RefinementStep>,
    /// Parameters after validation
    pub params: MeanParams,
    /// Corrections applied to the input
    pub diagnostics: Diagnostics,
}

impl MeanReport {
    /// Sample variance from the variance stage, if it ran.
    #[must_use]
    pub fn variance(&self) -> Option<f64> {
        self.variance_stage.map(|stage| stage.variance)
    }

    /// Tolerance sequence across iterations.
    #[must_use]
    pub fn tolerances(&self) -> Vec<f64> {
        self.iterations.iter().map(|step| step.tolerance).collect()
    }

    /// Mean sequence across iterations.
    #[must_use]
    pub fn means(&self) -> Vec<f64> {
        self.iterations.iter().map(|step| step.mean).collect()
    }

    /// Sample-size sequence across iterations.
    #[must_use]
    pub fn sample_sizes(&self) -> Vec<u64> {
        self.iterations.iter().map(|step| step.sample_size).collect()
    }

    /// Serialize for diagnostics or plotting consumers.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`](crate::Error::Config) if serialization fails
    /// (non-finite floats are written as `null`).
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Report of the one-shot CLT estimator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CltReport {
    /// Final estimate (mean of the second-stage samples)
    pub estimate: f64,
    /// Samples used to estimate the variance
    pub n_sigma: u64,
    /// Samples used for the mean
    pub n_mu: u64,
    /// Sample variance of the first stage
    pub variance: f64,
    /// Inflated standard deviation bound
    pub sigma_bound: f64,
    /// Tolerance targeted when sizing the second stage
    pub tolerance: f64,
    /// Wall-clock seconds for the whole call
    pub elapsed_secs: f64,
    /// Parameters after validation
    pub params: CltParams,
    /// Corrections applied to the input
    pub diagnostics: Diagnostics,
}

impl CltReport {
    /// Total samples drawn.
    #[must_use]
    pub const fn samples_used(&self) -> u64 {
        self.n_sigma + self.n_mu
    }

    /// Serialize for diagnostics or plotting consumers.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`](crate::Error::Config) if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Report of the Hoeffding-based Bernoulli estimator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BernoulliReport {
    /// Final estimate (fraction of ones)
    pub estimate: f64,
    /// How the call ended
    pub exit: ExitStatus,
    /// Hoeffding sample size for the requested tolerance and confidence
    pub required_samples: u64,
    /// Samples actually drawn
    pub samples_used: u64,
    /// Wall-clock seconds for the whole call
    pub elapsed_secs: f64,
    /// Parameters after validation
    pub params: BernoulliParams,
    /// Corrections applied to the input
    pub diagnostics: Diagnostics,
}

impl BernoulliReport {
    /// Serialize for diagnostics or plotting consumers.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`](crate::Error::Config) if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
