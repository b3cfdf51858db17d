//! Property-based tests for guaranteed-numerics
//!
//! - Test budget accounting invariants
//! - Test chunking transparency (chunked mean == unchunked mean, bit for bit)
//! - Test interpolation invariants of the approximant
//! - Run with ProptestConfig::with_cases(100)

use guaranteed_numerics::budget::{estimate_sample_budget, TrialObservation};
use guaranteed_numerics::chunked::ChunkedEvaluator;
use guaranteed_numerics::funappx::PiecewiseLinear;
use guaranteed_numerics::mean::{bernoulli, BernoulliParams};
use guaranteed_numerics::stats::{normal_cdf, normal_inv, sample_size_for_tolerance, tolerance_for_sample_size};
use guaranteed_numerics::tolerance::{combined_tolerance, ToleranceMode};
use proptest::prelude::*;

// ============================================================================
// Property Test Generators (Strategies)
// ============================================================================

/// Generate a set of timed trials
fn arb_trials() -> impl Strategy<Value = Vec<TrialObservation>> {
    proptest::collection::vec(
        (0u64..10_000, 0.0f64..1.0).prop_map(|(samples, seconds)| TrialObservation::new(samples, seconds)),
        0..5,
    )
}

/// Deterministic sampler replaying a fixed sequence
fn replay(values: Vec<f64>) -> impl FnMut(usize) -> Vec<f64> {
    let mut position = 0;
    move |n| {
        let chunk = values[position..position + n].to_vec();
        position += n;
        chunk
    }
}

/// Strictly increasing breakpoints with values
fn arb_breakpoints() -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
    proptest::collection::vec((0.01f64..10.0, -100.0f64..100.0), 2..40).prop_map(|steps| {
        let mut x = -5.0;
        let mut xs = Vec::with_capacity(steps.len());
        let mut ys = Vec::with_capacity(steps.len());
        for (dx, y) in steps {
            xs.push(x);
            ys.push(y);
            x += dx;
        }
        (xs, ys)
    })
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // ========================================================================
    // Sample-Budget Accountant Properties
    // ========================================================================

    /// Property: more samples already used never buys more samples
    #[test]
    fn prop_budget_non_increasing_in_samples_used(
        trials in arb_trials(),
        time_budget in 0.0f64..1_000.0,
        sample_budget in 0u64..10_000_000,
        used in 0u64..10_000_000,
        extra in 0u64..1_000_000,
        elapsed in 0.0f64..1_000.0,
    ) {
        let before = estimate_sample_budget(time_budget, sample_budget, &trials, used, elapsed);
        let after = estimate_sample_budget(time_budget, sample_budget, &trials, used + extra, elapsed);
        prop_assert!(after <= before, "{} > {}", after, before);
    }

    /// Property: never more than the remaining sample budget, zero once exhausted
    #[test]
    fn prop_budget_bounded_by_sample_budget(
        trials in arb_trials(),
        sample_budget in 0u64..10_000_000,
        used in 0u64..10_000_000,
        elapsed in 0.0f64..10.0,
    ) {
        let n = estimate_sample_budget(100.0, sample_budget, &trials, used, elapsed);
        prop_assert!(n <= sample_budget.saturating_sub(used));
        let spent = estimate_sample_budget(1.0, sample_budget, &trials, used, 1.0 + elapsed);
        prop_assert_eq!(spent, 0);
    }

    // ========================================================================
    // Chunked Evaluator Properties
    // ========================================================================

    /// Property: the chunk ceiling never changes the mean
    #[test]
    fn prop_chunked_mean_equals_unchunked(
        values in proptest::collection::vec(-1e6f64..1e6, 1..500),
        ceiling in 1usize..600,
    ) {
        let total = values.len() as u64;
        let expected = values.iter().fold(0.0, |acc, &y| acc + y) / total as f64;

        let mut sampler = replay(values);
        let mean = ChunkedEvaluator::new(ceiling).mean(&mut sampler, total).unwrap();
        prop_assert_eq!(mean.to_bits(), expected.to_bits());
    }

    /// Property: chunks partition the request
    #[test]
    fn prop_chunk_plan_partitions_total(total in 0u64..100_000, ceiling in 1usize..5_000) {
        let sizes: Vec<usize> = ChunkedEvaluator::new(ceiling).plan(total).collect();
        prop_assert_eq!(sizes.iter().map(|&s| s as u64).sum::<u64>(), total);
        prop_assert!(sizes.iter().all(|&s| s >= 1 && s <= ceiling));
    }

    // ========================================================================
    // Tolerance and Bound Properties
    // ========================================================================

    /// Property: Max mode with zero relative tolerance is the absolute tolerance
    #[test]
    fn prop_max_mode_absolute(abs_tol in 0.0f64..10.0, x in -1e12f64..1e12) {
        prop_assert_eq!(combined_tolerance(abs_tol, 0.0, x, ToleranceMode::Max), abs_tol);
    }

    /// Property: Max mode with zero absolute tolerance is rel_tol * |x|
    #[test]
    fn prop_max_mode_relative(rel_tol in 0.0f64..1.0, x in -1e12f64..1e12) {
        prop_assert_eq!(combined_tolerance(0.0, rel_tol, x, ToleranceMode::Max), rel_tol * x.abs());
    }

    /// Property: the sample-size solver delivers the tolerance it was asked for
    #[test]
    fn prop_sample_size_meets_tolerance(ratio in 0.005f64..2.0, alpha in 0.0005f64..0.2) {
        let kurtmax = 5.0;
        let n = sample_size_for_tolerance(ratio, alpha, kurtmax).unwrap();
        let achieved = tolerance_for_sample_size(n, alpha, kurtmax).unwrap();
        prop_assert!(achieved <= ratio * (1.0 + 1e-6), "n = {}: {} > {}", n, achieved, ratio);
    }

    /// Property: normal_inv inverts normal_cdf
    #[test]
    fn prop_normal_inverse(p in 1e-10f64..(1.0 - 1e-10)) {
        let z = normal_inv(p);
        prop_assert!((normal_cdf(z) - p).abs() <= 1e-12 + 1e-9 * p);
    }

    // ========================================================================
    // Approximant Properties
    // ========================================================================

    /// Property: the interpolant passes through every breakpoint
    #[test]
    fn prop_interpolates_breakpoints((xs, ys) in arb_breakpoints()) {
        let f = PiecewiseLinear::new(xs.clone(), ys.clone()).unwrap();
        for (x, y) in xs.iter().zip(&ys) {
            prop_assert!((f.evaluate(*x) - y).abs() <= 1e-9 * (1.0 + y.abs()));
        }
    }

    /// Property: between breakpoints the value stays between the end values
    #[test]
    fn prop_interpolant_bounded_on_segments((xs, ys) in arb_breakpoints(), t in 0.0f64..1.0) {
        let f = PiecewiseLinear::new(xs.clone(), ys.clone()).unwrap();
        for i in 0..xs.len() - 1 {
            let x = xs[i] + t * (xs[i + 1] - xs[i]);
            let (lo, hi) = if ys[i] <= ys[i + 1] { (ys[i], ys[i + 1]) } else { (ys[i + 1], ys[i]) };
            let v = f.evaluate(x);
            prop_assert!(v >= lo - 1e-9 && v <= hi + 1e-9);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Property: the Bernoulli estimator draws exactly the Hoeffding count
    #[test]
    fn prop_bernoulli_sample_count_exact(abs_tol in 0.01f64..0.2, alpha in 0.001f64..0.5) {
        let mut drawn = 0u64;
        let mut zeros = |n: usize| {
            drawn += n as u64;
            vec![0.0; n]
        };
        let params = BernoulliParams::default().abs_tol(abs_tol).alpha(alpha);
        let report = bernoulli::estimate(&mut zeros, &params).unwrap();

        let expected = ((2.0 / alpha).ln() / (2.0 * abs_tol * abs_tol)).ceil() as u64;
        prop_assert_eq!(report.samples_used, expected);
        prop_assert_eq!(drawn, expected);
        prop_assert_eq!(report.estimate, 0.0);
    }
}
