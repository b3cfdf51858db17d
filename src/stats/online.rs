//! Streaming mean and variance (Welford's algorithm)
//!
//! Lets the variance stage reduce a large draw chunk by chunk without
//! holding every sample in memory.

use serde::{Deserialize, Serialize};

/// Online accumulator for count, mean and sum of squared deviations.
///
/// # Example
///
/// ```
/// use guaranteed_numerics::stats::OnlineMoments;
///
/// let mut moments = OnlineMoments::new();
/// moments.extend(&[1.0, 2.0, 3.0, 4.0, 5.0]);
/// assert!((moments.mean() - 3.0).abs() < 1e-12);
/// assert!((moments.variance() - 2.5).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OnlineMoments {
    count: u64,
    mean: f64,
    /// Sum of squared deviations from the running mean
    m2: f64,
}

impl OnlineMoments {
    /// Empty accumulator.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            count: 0,
            mean: 0.0,
            m2: 0.0,
        }
    }

    /// Add one observation.
    #[allow(clippy::cast_precision_loss)]
    pub fn update(&mut self, x: f64) {
        self.count += 1;
        let delta = x - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (x - self.mean);
    }

    /// Add every observation in `xs`, in order.
    pub fn extend(&mut self, xs: &[f64]) {
        for &x in xs {
            self.update(x);
        }
    }

    /// Number of observations.
    #[must_use]
    pub const fn count(&self) -> u64 {
        self.count
    }

    /// Running mean (0 when empty).
    #[must_use]
    pub const fn mean(&self) -> f64 {
        self.mean
    }

    /// Unbiased sample variance; 0 with fewer than two observations.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    /// Square root of [`variance`](Self::variance).
    #[must_use]
    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }
}
