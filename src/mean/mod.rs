//! Monte Carlo mean estimators
//!
//! Three estimators share the parameter and report conventions:
//!
//! - [`guaranteed`]: two-stage adaptive estimator with a non-asymptotic
//!   guarantee (Chebyshev and Berry-Esseen bounds).
//! - [`clt`]: one-shot estimator sized by the normal quantile.
//! - [`bernoulli`]: fixed Hoeffding sample size for {0, 1} samples.
//!
//! ## Example
//!
//! ```rust
//! use guaranteed_numerics::mean::{guaranteed, MeanParams};
//!
//! let mut state = 0_u64;
//! let mut lcg = move |n: usize| {
//!     (0..n)
//!         .map(|_| {
//!             state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
//!             (state >> 11) as f64 / (1_u64 << 53) as f64
//!         })
//!         .collect::<Vec<f64>>()
//! };
//!
//! let params = MeanParams::default().abs_tol(1e-2).rel_tol(0.0);
//! let report = guaranteed::estimate(&mut lcg, &params)?;
//! assert!(report.exit.is_success());
//! assert!((report.estimate - 0.5).abs() < 1e-2);
//! # Ok::<(), guaranteed_numerics::Error>(())
//! ```

pub mod bernoulli;
pub mod clt;
pub mod guaranteed;
mod params;
mod report;

pub use params::{
    BernoulliParams, CltParams, MeanParams, DEFAULT_ABS_TOL, DEFAULT_ALPHA, DEFAULT_CLT_CEILING,
    DEFAULT_FUDGE, DEFAULT_N1, DEFAULT_N_SIGMA, DEFAULT_REL_TOL, DEFAULT_SAMPLE_BUDGET,
    DEFAULT_TIME_BUDGET, MIN_STAGE_SAMPLES,
};
pub use report::{
    BernoulliReport, BootstrapSummary, CltReport, ExitStatus, MeanReport, RefinementStep,
    VarianceStage,
};
