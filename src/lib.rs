//! # guaranteed-numerics: Guaranteed-Accuracy Adaptive Algorithms
//!
//! **Version**: 0.1.0
//!
//! Adaptive algorithms that decide for themselves how many samples or
//! function evaluations to spend, stop by a mathematically derived rule and
//! report what their answer is worth:
//!
//! - [`mean`]: Monte Carlo estimation of `E[Y]` to an absolute/relative
//!   tolerance with confidence `1 - alpha` (Chebyshev and Berry-Esseen
//!   bounds, a CLT variant and a Hoeffding variant for Bernoulli samples).
//! - [`funappx`]: piecewise-linear approximation of a black-box function to
//!   an absolute tolerance, guaranteed for functions in a cone.
//!
//! ## Design Principles
//!
//! - **No silent guarantees**: budget exhaustion is reported as an
//!   [`ExitStatus`](mean::ExitStatus) or [`Guarantee`](funappx::Guarantee),
//!   never hidden behind a plain number
//! - **Correct, then continue**: out-of-range parameters are clamped and
//!   listed as [`Diagnostics`](diagnostics::Diagnostics) on the report
//! - **Bounded memory**: large sample requests stream through the
//!   [`ChunkedEvaluator`](chunked::ChunkedEvaluator)
//!
//! ## Example Usage
//!
//! ```rust
//! use guaranteed_numerics::mean::{bernoulli, BernoulliParams, ExitStatus};
//!
//! let mut heads = 0_u32;
//! let mut coin = move |n: usize| {
//!     (0..n)
//!         .map(|_| {
//!             heads = (heads + 1) % 4;
//!             if heads == 0 { 1.0 } else { 0.0 }
//!         })
//!         .collect::<Vec<f64>>()
//! };
//!
//! let params = BernoulliParams::default().abs_tol(0.02).alpha(0.01);
//! let report = bernoulli::estimate(&mut coin, &params)?;
//! assert_eq!(report.exit, ExitStatus::Success);
//! assert!((report.estimate - 0.25).abs() <= 0.02);
//! # Ok::<(), guaranteed_numerics::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod budget;
pub mod chunked;
pub mod diagnostics;
pub mod error;
pub mod funappx;
pub mod logging;
pub mod mean;
pub mod sampler;
pub mod stats;
pub mod tolerance;

pub use error::{Error, Result};
