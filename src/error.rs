//! Error types for guaranteed-numerics
//!
//! Only true failures live here. Out-of-range parameters are corrected and
//! reported through [`Diagnostic`](crate::diagnostics::Diagnostic)s, and
//! budget exhaustion is an [`ExitStatus`](crate::mean::ExitStatus), not an error.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// guaranteed-numerics error types
#[derive(Error, Debug)]
pub enum Error {
    /// Root-finding for a concentration bound failed to bracket or converge
    #[error("Numeric solver '{solver}' did not converge: {reason}")]
    NumericConvergence {
        /// Name of the equation being solved
        solver: &'static str,
        /// What went wrong
        reason: String,
    },

    /// Sampling function returned the wrong number of samples
    #[error("Sampling function returned {returned} samples, {requested} were requested\nThe sampler must return exactly n values for a request of n.")]
    MalformedSamples {
        /// Samples requested
        requested: usize,
        /// Samples actually returned
        returned: usize,
    },

    /// A Bernoulli sampler produced something other than 0 or 1
    #[error("Invalid sample {value}: {reason}")]
    InvalidSample {
        /// Offending value
        value: f64,
        /// Why it was rejected
        reason: &'static str,
    },

    /// Function under approximation returned the wrong number of values
    #[error("Function returned {returned} values for {expected} points\nThe function must be vectorized: one output per input point.")]
    MalformedFunctionOutput {
        /// Number of points passed in
        expected: usize,
        /// Number of values returned
        returned: usize,
    },

    /// Function under approximation produced NaN or infinity
    #[error("Function value at x = {x} is not finite ({y})")]
    NonFiniteValue {
        /// Abscissa
        x: f64,
        /// Offending ordinate
        y: f64,
    },

    /// CLT estimator needs more samples than its absolute ceiling allows
    #[error("Required sample size {required} exceeds the ceiling of {ceiling}\nLoosen the tolerance or raise the ceiling.")]
    SampleCeilingExceeded {
        /// Sample size the CLT rule asks for
        required: u64,
        /// Configured ceiling
        ceiling: u64,
    },

    /// Argument to a numeric primitive that cannot be corrected
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration document could not be parsed
    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
