//! Parameter records for the mean estimators
//!
//! Each estimator takes one explicit record. Records deserialize from partial
//! JSON (missing fields take their defaults) and are corrected by
//! `validate()` before any sampling happens.

use crate::chunked::DEFAULT_CHUNK_CEILING;
use crate::diagnostics::Diagnostics;
use crate::tolerance::ToleranceMode;
use crate::Result;
use serde::{Deserialize, Serialize};

/// Default absolute tolerance
pub const DEFAULT_ABS_TOL: f64 = 1e-2;
/// Default relative tolerance
pub const DEFAULT_REL_TOL: f64 = 1e-1;
/// Default uncertainty (1 - confidence)
pub const DEFAULT_ALPHA: f64 = 1e-2;
/// Default variance-stage sample size
pub const DEFAULT_N_SIGMA: u64 = 10_000;
/// Default first-iteration sample size
pub const DEFAULT_N1: u64 = 10_000;
/// Smallest usable variance-stage or first-iteration sample size
pub const MIN_STAGE_SAMPLES: u64 = 30;
/// Default standard-deviation inflation factor
pub const DEFAULT_FUDGE: f64 = 1.2;
/// Default time budget in seconds
pub const DEFAULT_TIME_BUDGET: f64 = 100.0;
/// Default sample budget
pub const DEFAULT_SAMPLE_BUDGET: u64 = 1_000_000_000;
/// Default absolute sample ceiling of the CLT estimator
pub const DEFAULT_CLT_CEILING: u64 = 100_000_000;

fn check_tolerances(
    abs_tol: &mut f64,
    rel_tol: &mut f64,
    mode: &mut ToleranceMode,
    diags: &mut Diagnostics,
) {
    if abs_tol.is_nan() || abs_tol.is_infinite() {
        diags.push("abs_tol", format!("{abs_tol} is not finite; using {DEFAULT_ABS_TOL}"));
        *abs_tol = DEFAULT_ABS_TOL;
    } else if *abs_tol < 0.0 {
        diags.push("abs_tol", format!("{abs_tol} is negative; using its absolute value"));
        *abs_tol = abs_tol.abs();
    }

    if !(0.0..=1.0).contains(&*rel_tol) {
        diags.push("rel_tol", format!("{rel_tol} is outside [0, 1]; using {DEFAULT_REL_TOL}"));
        *rel_tol = DEFAULT_REL_TOL;
    }

    if let ToleranceMode::Comb { theta } = mode {
        if !(0.0..=1.0).contains(&*theta) {
            let clamped = if theta.is_nan() { 1.0 } else { (*theta).clamp(0.0, 1.0) };
            diags.push("theta", format!("{theta} is outside [0, 1]; using {clamped}"));
            *theta = clamped;
        }
    }
}

fn check_alpha(alpha: &mut f64, diags: &mut Diagnostics) {
    if !(*alpha > 0.0 && *alpha < 1.0) {
        diags.push("alpha", format!("{alpha} is outside (0, 1); using {DEFAULT_ALPHA}"));
        *alpha = DEFAULT_ALPHA;
    }
}

fn check_stage_samples(name: &str, n: &mut u64, diags: &mut Diagnostics) {
    if *n < MIN_STAGE_SAMPLES {
        diags.push(name, format!("{n} is below {MIN_STAGE_SAMPLES}; using {MIN_STAGE_SAMPLES}"));
        *n = MIN_STAGE_SAMPLES;
    }
}

fn check_fudge(fudge: &mut f64, diags: &mut Diagnostics) {
    if !(*fudge > 1.0 && fudge.is_finite()) {
        diags.push("fudge", format!("{fudge} must be a finite value above 1; using {DEFAULT_FUDGE}"));
        *fudge = DEFAULT_FUDGE;
    }
}

fn check_chunk_ceiling(chunk_ceiling: &mut usize, diags: &mut Diagnostics) {
    if *chunk_ceiling == 0 {
        diags.push("chunk_ceiling", format!("0 is not a chunk size; using {DEFAULT_CHUNK_CEILING}"));
        *chunk_ceiling = DEFAULT_CHUNK_CEILING;
    }
}

fn check_sample_budget(name: &str, budget: &mut u64, default: u64, diags: &mut Diagnostics) {
    if *budget == 0 {
        diags.push(name, format!("0 samples allowed; using {default}"));
        *budget = default;
    }
}

/// Parameters of the guaranteed (two-stage, adaptive) mean estimator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeanParams {
    /// Absolute error tolerance (>= 0)
    pub abs_tol: f64,
    /// Relative error tolerance, in [0, 1]
    pub rel_tol: f64,
    /// How the two tolerances combine
    pub tol_mode: ToleranceMode,
    /// Uncertainty: the guarantee holds with probability `1 - alpha`
    pub alpha: f64,
    /// Samples used to estimate the variance (>= 30)
    pub n_sigma: u64,
    /// Samples in the first refinement iteration (>= 30)
    pub n1: u64,
    /// Inflation applied to the sample standard deviation (> 1)
    pub fudge: f64,
    /// Wall-clock budget in seconds (> 0)
    pub time_budget: f64,
    /// Total samples allowed (> 0)
    pub sample_budget: u64,
    /// Most samples held in memory at once (> 0)
    pub chunk_ceiling: usize,
}

impl Default for MeanParams {
    fn default() -> Self {
        Self {
            abs_tol: DEFAULT_ABS_TOL,
            rel_tol: DEFAULT_REL_TOL,
            tol_mode: ToleranceMode::Max,
            alpha: DEFAULT_ALPHA,
            n_sigma: DEFAULT_N_SIGMA,
            n1: DEFAULT_N1,
            fudge: DEFAULT_FUDGE,
            time_budget: DEFAULT_TIME_BUDGET,
            sample_budget: DEFAULT_SAMPLE_BUDGET,
            chunk_ceiling: DEFAULT_CHUNK_CEILING,
        }
    }
}

impl MeanParams {
    /// Parse a (possibly partial) JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`](crate::Error::Config) on malformed JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set the absolute tolerance.
    #[must_use]
    pub const fn abs_tol(mut self, abs_tol: f64) -> Self {
        self.abs_tol = abs_tol;
        self
    }

    /// Set the relative tolerance.
    #[must_use]
    pub const fn rel_tol(mut self, rel_tol: f64) -> Self {
        self.rel_tol = rel_tol;
        self
    }

    /// Set the tolerance combination mode.
    #[must_use]
    pub const fn tol_mode(mut self, mode: ToleranceMode) -> Self {
        self.tol_mode = mode;
        self
    }

    /// Set the uncertainty.
    #[must_use]
    pub const fn alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Set the variance-stage sample size.
    #[must_use]
    pub const fn n_sigma(mut self, n_sigma: u64) -> Self {
        self.n_sigma = n_sigma;
        self
    }

    /// Set the first-iteration sample size.
    #[must_use]
    pub const fn n1(mut self, n1: u64) -> Self {
        self.n1 = n1;
        self
    }

    /// Set the standard-deviation inflation factor.
    #[must_use]
    pub const fn fudge(mut self, fudge: f64) -> Self {
        self.fudge = fudge;
        self
    }

    /// Set the time budget in seconds.
    #[must_use]
    pub const fn time_budget(mut self, seconds: f64) -> Self {
        self.time_budget = seconds;
        self
    }

    /// Set the sample budget.
    #[must_use]
    pub const fn sample_budget(mut self, samples: u64) -> Self {
        self.sample_budget = samples;
        self
    }

    /// Set the chunk ceiling.
    #[must_use]
    pub const fn chunk_ceiling(mut self, samples: usize) -> Self {
        self.chunk_ceiling = samples;
        self
    }

    /// Correct every out-of-range field, recording what changed.
    #[must_use]
    pub fn validate(mut self) -> (Self, Diagnostics) {
        let mut diags = Diagnostics::new();
        check_tolerances(&mut self.abs_tol, &mut self.rel_tol, &mut self.tol_mode, &mut diags);
        check_alpha(&mut self.alpha, &mut diags);
        check_stage_samples("n_sigma", &mut self.n_sigma, &mut diags);
        check_stage_samples("n1", &mut self.n1, &mut diags);
        check_fudge(&mut self.fudge, &mut diags);
        if !(self.time_budget > 0.0) {
            diags.push(
                "time_budget",
                format!("{} must be positive; using {DEFAULT_TIME_BUDGET}", self.time_budget),
            );
            self.time_budget = DEFAULT_TIME_BUDGET;
        }
        check_sample_budget("sample_budget", &mut self.sample_budget, DEFAULT_SAMPLE_BUDGET, &mut diags);
        check_chunk_ceiling(&mut self.chunk_ceiling, &mut diags);
        (self, diags)
    }
}

/// Parameters of the one-shot CLT mean estimator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CltParams {
    /// Absolute error tolerance (>= 0)
    pub abs_tol: f64,
    /// Relative error tolerance, in [0, 1]
    pub rel_tol: f64,
    /// How the two tolerances combine
    pub tol_mode: ToleranceMode,
    /// Uncertainty of the (asymptotic) confidence statement
    pub alpha: f64,
    /// Samples used to estimate the variance (>= 30)
    pub n_sigma: u64,
    /// Inflation applied to the sample standard deviation (> 1)
    pub fudge: f64,
    /// Absolute ceiling on total samples (> 0)
    pub sample_ceiling: u64,
    /// Most samples held in memory at once (> 0)
    pub chunk_ceiling: usize,
}

impl Default for CltParams {
    fn default() -> Self {
        Self {
            abs_tol: DEFAULT_ABS_TOL,
            rel_tol: DEFAULT_REL_TOL,
            tol_mode: ToleranceMode::Max,
            alpha: DEFAULT_ALPHA,
            n_sigma: DEFAULT_N_SIGMA,
            fudge: DEFAULT_FUDGE,
            sample_ceiling: DEFAULT_CLT_CEILING,
            chunk_ceiling: DEFAULT_CHUNK_CEILING,
        }
    }
}

impl CltParams {
    /// Parse a (possibly partial) JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`](crate::Error::Config) on malformed JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set the absolute tolerance.
    #[must_use]
    pub const fn abs_tol(mut self, abs_tol: f64) -> Self {
        self.abs_tol = abs_tol;
        self
    }

    /// Set the relative tolerance.
    #[must_use]
    pub const fn rel_tol(mut self, rel_tol: f64) -> Self {
        self.rel_tol = rel_tol;
        self
    }

    /// Set the tolerance combination mode.
    #[must_use]
    pub const fn tol_mode(mut self, mode: ToleranceMode) -> Self {
        self.tol_mode = mode;
        self
    }

    /// Set the uncertainty.
    #[must_use]
    pub const fn alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Set the variance-stage sample size.
    #[must_use]
    pub const fn n_sigma(mut self, n_sigma: u64) -> Self {
        self.n_sigma = n_sigma;
        self
    }

    /// Set the standard-deviation inflation factor.
    #[must_use]
    pub const fn fudge(mut self, fudge: f64) -> Self {
        self.fudge = fudge;
        self
    }

    /// Set the absolute sample ceiling.
    #[must_use]
    pub const fn sample_ceiling(mut self, samples: u64) -> Self {
        self.sample_ceiling = samples;
        self
    }

    /// Set the chunk ceiling.
    #[must_use]
    pub const fn chunk_ceiling(mut self, samples: usize) -> Self {
        self.chunk_ceiling = samples;
        self
    }

    /// Correct every out-of-range field, recording what changed.
    #[must_use]
    pub fn validate(mut self) -> (Self, Diagnostics) {
        let mut diags = Diagnostics::new();
        check_tolerances(&mut self.abs_tol, &mut self.rel_tol, &mut self.tol_mode, &mut diags);
        check_alpha(&mut self.alpha, &mut diags);
        check_stage_samples("n_sigma", &mut self.n_sigma, &mut diags);
        check_fudge(&mut self.fudge, &mut diags);
        check_sample_budget("sample_ceiling", &mut self.sample_ceiling, DEFAULT_CLT_CEILING, &mut diags);
        check_chunk_ceiling(&mut self.chunk_ceiling, &mut diags);
        (self, diags)
    }
}

/// Parameters of the Hoeffding-based Bernoulli mean estimator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BernoulliParams {
    /// Absolute error tolerance (> 0)
    pub abs_tol: f64,
    /// Uncertainty: the guarantee holds with probability `1 - alpha`
    pub alpha: f64,
    /// Total samples allowed (> 0)
    pub sample_budget: u64,
    /// Most samples held in memory at once (> 0)
    pub chunk_ceiling: usize,
}

impl Default for BernoulliParams {
    fn default() -> Self {
        Self {
            abs_tol: DEFAULT_ABS_TOL,
            alpha: DEFAULT_ALPHA,
            sample_budget: DEFAULT_SAMPLE_BUDGET,
            chunk_ceiling: DEFAULT_CHUNK_CEILING,
        }
    }
}

impl BernoulliParams {
    /// Parse a (possibly partial) JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`](crate::Error::Config) on malformed JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set the absolute tolerance.
    #[must_use]
    pub const fn abs_tol(mut self, abs_tol: f64) -> Self {
        self.abs_tol = abs_tol;
        self
    }

    /// Set the uncertainty.
    #[must_use]
    pub const fn alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Set the sample budget.
    #[must_use]
    pub const fn sample_budget(mut self, samples: u64) -> Self {
        self.sample_budget = samples;
        self
    }

    /// Set the chunk ceiling.
    #[must_use]
    pub const fn chunk_ceiling(mut self, samples: usize) -> Self {
        self.chunk_ceiling = samples;
        self
    }

    /// Correct every out-of-range field, recording what changed.
    ///
    /// The Hoeffding sample size is infinite at zero tolerance, so a
    /// non-positive `abs_tol` falls back to the default.
    #[must_use]
    pub fn validate(mut self) -> (Self, Diagnostics) {
        let mut diags = Diagnostics::new();
        if !(self.abs_tol > 0.0 && self.abs_tol.is_finite()) {
            diags.push(
                "abs_tol",
                format!("{} must be positive and finite; using {DEFAULT_ABS_TOL}", self.abs_tol),
            );
            self.abs_tol = DEFAULT_ABS_TOL;
        }
        check_alpha(&mut self.alpha, &mut diags);
        check_sample_budget("sample_budget", &mut self.sample_budget, DEFAULT_SAMPLE_BUDGET, &mut diags);
        check_chunk_ceiling(&mut self.chunk_ceiling, &mut diags);
        (self, diags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let (params, diags) = MeanParams::default().validate();
        assert!(diags.is_empty());
        assert_eq!(params, MeanParams::default());

        assert!(CltParams::default().validate().1.is_empty());
        assert!(BernoulliParams::default().validate().1.is_empty());
    }

    #[test]
    fn test_negative_abs_tol_uses_absolute_value() {
        let (params, diags) = MeanParams::default().abs_tol(-0.5).validate();
        assert_eq!(params.abs_tol, 0.5);
        assert!(diags.mentions("abs_tol"));
    }

    #[test]
    fn test_out_of_range_values_corrected() {
        let (params, diags) = MeanParams::default()
            .rel_tol(1.5)
            .alpha(1.0)
            .n_sigma(5)
            .n1(0)
            .fudge(0.9)
            .time_budget(-1.0)
            .sample_budget(0)
            .chunk_ceiling(0)
            .validate();

        assert_eq!(params.rel_tol, DEFAULT_REL_TOL);
        assert_eq!(params.alpha, DEFAULT_ALPHA);
        assert_eq!(params.n_sigma, MIN_STAGE_SAMPLES);
        assert_eq!(params.n1, MIN_STAGE_SAMPLES);
        assert_eq!(params.fudge, DEFAULT_FUDGE);
        assert_eq!(params.time_budget, DEFAULT_TIME_BUDGET);
        assert_eq!(params.sample_budget, DEFAULT_SAMPLE_BUDGET);
        assert_eq!(params.chunk_ceiling, DEFAULT_CHUNK_CEILING);
        assert_eq!(diags.len(), 8);
    }

    #[test]
    fn test_nan_alpha_corrected() {
        let (params, diags) = MeanParams::default().alpha(f64::NAN).validate();
        assert_eq!(params.alpha, DEFAULT_ALPHA);
        assert!(diags.mentions("alpha"));
    }

    #[test]
    fn test_comb_theta_clamped() {
        let (params, diags) = MeanParams::default()
            .tol_mode(ToleranceMode::Comb { theta: 1.7 })
            .validate();
        assert_eq!(params.tol_mode, ToleranceMode::Comb { theta: 1.0 });
        assert!(diags.mentions("theta"));
    }

    #[test]
    fn test_partial_json() {
        let params = MeanParams::from_json(r#"{"abs_tol": 0.001, "rel_tol": 0}"#).unwrap();
        assert_eq!(params.abs_tol, 0.001);
        assert_eq!(params.rel_tol, 0.0);
        assert_eq!(params.n_sigma, DEFAULT_N_SIGMA);
    }

    #[test]
    fn test_clt_builder_covers_every_field() {
        let (params, diags) = CltParams::default()
            .tol_mode(ToleranceMode::Sum)
            .fudge(1.5)
            .chunk_ceiling(4_096)
            .validate();
        assert!(diags.is_empty());
        assert_eq!(params.tol_mode, ToleranceMode::Sum);
        assert_eq!(params.fudge, 1.5);
        assert_eq!(params.chunk_ceiling, 4_096);

        let (params, diags) = CltParams::default().fudge(0.5).chunk_ceiling(0).validate();
        assert_eq!(params.fudge, DEFAULT_FUDGE);
        assert_eq!(params.chunk_ceiling, DEFAULT_CHUNK_CEILING);
        assert_eq!(diags.len(), 2);
    }

    #[test]
    fn test_bernoulli_zero_tolerance_falls_back() {
        let (params, diags) = BernoulliParams::default().abs_tol(0.0).validate();
        assert_eq!(params.abs_tol, DEFAULT_ABS_TOL);
        assert!(diags.mentions("abs_tol"));
    }
}
