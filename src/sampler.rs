//! Sampling-function contract
//!
//! A sampler takes a count `n` and returns exactly `n` i.i.d. real samples.
//! Any closure `FnMut(usize) -> Vec<f64>` qualifies. A wrong-length answer
//! is a hard error: no fallback generator is substituted.

use crate::{Error, Result};

/// Source of i.i.d. real-valued samples
pub trait Sampler {
    /// Draw `n` samples. Must return a vector of length `n`.
    fn sample(&mut self, n: usize) -> Vec<f64>;
}

impl<F> Sampler for F
where
    F: FnMut(usize) -> Vec<f64>,
{
    fn sample(&mut self, n: usize) -> Vec<f64> {
        self(n)
    }
}

/// Draw `n` samples and enforce the length contract.
///
/// # Errors
///
/// [`Error::MalformedSamples`] if the sampler returns any other length.
pub fn draw_checked<S>(sampler: &mut S, n: usize) -> Result<Vec<f64>>
where
    S: Sampler + ?Sized,
{
    let samples = sampler.sample(n);
    if samples.len() == n {
        Ok(samples)
    } else {
        Err(Error::MalformedSamples {
            requested: n,
            returned: samples.len(),
        })
    }
}
