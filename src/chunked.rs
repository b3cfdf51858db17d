//! Chunked evaluation of very large sample requests
//!
//! A request for `N` samples is split into chunks of at most `chunk_ceiling`
//! samples. Each chunk is drawn, reduced and dropped before the next one, so
//! peak memory is bounded by one chunk regardless of `N`.
//!
//! The mean is a single running sum in sample order divided by `N`, so the
//! result is bit-for-bit the mean of one unchunked draw of the same sequence.

use crate::sampler::{draw_checked, Sampler};
use crate::stats::OnlineMoments;
use crate::{Error, Result};

/// Default chunk ceiling (samples held in memory at once)
pub const DEFAULT_CHUNK_CEILING: usize = 1_000_000;

/// Iterator over chunk sizes for a total request
#[derive(Debug, Clone)]
pub struct ChunkPlan {
    remaining: u64,
    ceiling: u64,
}

impl Iterator for ChunkPlan {
    type Item = usize;

    #[allow(clippy::cast_possible_truncation)]
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let chunk = self.remaining.min(self.ceiling);
        self.remaining -= chunk;
        // chunk <= ceiling, which came from a usize
        Some(chunk as usize)
    }
}

/// Draws and reduces samples in bounded-size chunks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkedEvaluator {
    chunk_ceiling: usize,
}

impl Default for ChunkedEvaluator {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_CEILING)
    }
}

impl ChunkedEvaluator {
    /// Evaluator holding at most `chunk_ceiling` samples at once (minimum 1).
    #[must_use]
    pub fn new(chunk_ceiling: usize) -> Self {
        Self {
            chunk_ceiling: chunk_ceiling.max(1),
        }
    }

    /// Configured ceiling.
    #[must_use]
    pub const fn chunk_ceiling(&self) -> usize {
        self.chunk_ceiling
    }

    /// Chunk sizes used for a request of `total` samples.
    #[must_use]
    pub fn plan(&self, total: u64) -> ChunkPlan {
        ChunkPlan {
            remaining: total,
            ceiling: self.chunk_ceiling as u64,
        }
    }

    /// Draw `total` samples chunk by chunk, folding each chunk into `acc`.
    ///
    /// # Errors
    ///
    /// Propagates [`Error::MalformedSamples`] from the sampler and any error
    /// returned by `step`.
    pub fn fold<S, T, F>(&self, sampler: &mut S, total: u64, init: T, mut step: F) -> Result<T>
    where
        S: Sampler + ?Sized,
        F: FnMut(T, &[f64]) -> Result<T>,
    {
        let mut acc = init;
        for chunk in self.plan(total) {
            let samples = draw_checked(sampler, chunk)?;
            acc = step(acc, &samples)?;
        }
        Ok(acc)
    }

    /// Mean of `total` fresh samples.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] when `total` is zero, and
    /// [`Error::MalformedSamples`] from the sampler.
    #[allow(clippy::cast_precision_loss)]
    pub fn mean<S>(&self, sampler: &mut S, total: u64) -> Result<f64>
    where
        S: Sampler + ?Sized,
    {
        if total == 0 {
            return Err(Error::InvalidInput(
                "cannot take the mean of zero samples".to_string(),
            ));
        }
        let sum = self.fold(sampler, total, 0.0_f64, |sum, chunk| {
            Ok(chunk.iter().fold(sum, |acc, &y| acc + y))
        })?;
        Ok(sum / total as f64)
    }

    /// Streaming mean and variance of `total` fresh samples.
    ///
    /// # Errors
    ///
    /// [`Error::MalformedSamples`] from the sampler.
    pub fn moments<S>(&self, sampler: &mut S, total: u64) -> Result<OnlineMoments>
    where
        S: Sampler + ?Sized,
    {
        self.fold(sampler, total, OnlineMoments::new(), |mut moments, chunk| {
            moments.extend(chunk);
            Ok(moments)
        })
    }
}
