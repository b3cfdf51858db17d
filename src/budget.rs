//! Sample-budget accounting
//!
//! Before each batch the estimator asks how many more samples it can afford.
//! Two limits apply: the sample budget (a hard count) and the time budget,
//! converted to a count by extrapolating the per-sample cost seen in timed
//! trial batches. Trials of different sizes are pooled, so fixed per-call
//! overhead is spread across everything observed so far.

use serde::{Deserialize, Serialize};
use std::time::Instant;

/// One timed batch: `samples` drawn in `seconds` of wall-clock time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrialObservation {
    /// Batch size
    pub samples: u64,
    /// Elapsed seconds for the batch
    pub seconds: f64,
}

impl TrialObservation {
    /// Record a trial.
    #[must_use]
    pub const fn new(samples: u64, seconds: f64) -> Self {
        Self { samples, seconds }
    }

    /// Seconds per sample for this trial alone (0 for an empty trial).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn seconds_per_sample(&self) -> f64 {
        if self.samples == 0 {
            0.0
        } else {
            self.seconds / self.samples as f64
        }
    }
}

/// Pooled cost per sample across `trials`, or `None` when nothing usable was
/// observed.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn cost_per_sample(trials: &[TrialObservation]) -> Option<f64> {
    let samples: u64 = trials.iter().map(|t| t.samples).sum();
    let seconds: f64 = trials.iter().map(|t| t.seconds.max(0.0)).sum();
    if samples == 0 || seconds <= 0.0 || !seconds.is_finite() {
        None
    } else {
        Some(seconds / samples as f64)
    }
}

/// Maximum number of further samples affordable under both budgets.
///
/// * `time_budget` - total seconds allowed for the call
/// * `sample_budget` - total samples allowed for the call
/// * `trials` - timed batches observed so far
/// * `samples_used` - samples already drawn
/// * `elapsed` - seconds already spent
///
/// Never negative. When no trial carries timing information the time budget
/// cannot be extrapolated and only the sample budget applies.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn estimate_sample_budget(
    time_budget: f64,
    sample_budget: u64,
    trials: &[TrialObservation],
    samples_used: u64,
    elapsed: f64,
) -> u64 {
    let samples_left = sample_budget.saturating_sub(samples_used);
    let time_left = time_budget - elapsed;
    if samples_left == 0 || time_left.is_nan() || time_left <= 0.0 {
        return 0;
    }

    match cost_per_sample(trials) {
        // Saturating float-to-int cast
        Some(cost) => samples_left.min((time_left / cost).floor() as u64),
        None => samples_left,
    }
}

/// Wall-clock bookkeeping for one estimation call
#[derive(Debug, Clone)]
pub struct BudgetTracker {
    started: Instant,
    time_budget: f64,
    sample_budget: u64,
    samples_used: u64,
    trials: Vec<TrialObservation>,
}

impl BudgetTracker {
    /// Start the clock.
    #[must_use]
    pub fn start(time_budget: f64, sample_budget: u64) -> Self {
        Self {
            started: Instant::now(),
            time_budget,
            sample_budget,
            samples_used: 0,
            trials: Vec::new(),
        }
    }

    /// Seconds since [`start`](Self::start).
    #[must_use]
    pub fn elapsed(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }

    /// Samples consumed so far.
    #[must_use]
    pub const fn samples_used(&self) -> u64 {
        self.samples_used
    }

    /// Timed trials recorded so far.
    #[must_use]
    pub fn trials(&self) -> &[TrialObservation] {
        &self.trials
    }

    /// Count samples without timing them.
    pub fn consume(&mut self, samples: u64) {
        self.samples_used = self.samples_used.saturating_add(samples);
    }

    /// Count a timed batch and use it for cost extrapolation.
    pub fn record_trial(&mut self, trial: TrialObservation) {
        self.consume(trial.samples);
        self.trials.push(trial);
    }

    /// True once the time budget is spent.
    #[must_use]
    pub fn time_exhausted(&self) -> bool {
        self.elapsed() >= self.time_budget
    }

    /// Seconds left before the time budget runs out (0 when spent).
    #[must_use]
    pub fn time_left(&self) -> f64 {
        (self.time_budget - self.elapsed()).max(0.0)
    }

    /// Further samples affordable right now.
    #[must_use]
    pub fn remaining(&self) -> u64 {
        estimate_sample_budget(
            self.time_budget,
            self.sample_budget,
            &self.trials,
            self.samples_used,
            self.elapsed(),
        )
    }
}
