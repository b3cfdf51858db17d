//! Bernoulli Mean: a fixed Hoeffding sample size
//!
//! The number of samples is known before the first draw. Shows both a
//! successful run and one whose budget is too small.
//!
//! Run with: cargo run --example bernoulli_mean

use guaranteed_numerics::logging::init_tracing;
use guaranteed_numerics::mean::{bernoulli, BernoulliParams};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn main() -> anyhow::Result<()> {
    init_tracing();
    println!("=== Bernoulli Mean (Hoeffding) ===\n");

    let mut rng = StdRng::seed_from_u64(7);
    let mut coin = move |n: usize| {
        (0..n)
            .map(|_| if rng.gen_bool(0.3) { 1.0 } else { 0.0 })
            .collect::<Vec<f64>>()
    };

    for params in [
        BernoulliParams::default().abs_tol(0.01).alpha(0.05),
        BernoulliParams::default().abs_tol(0.001).alpha(0.05).sample_budget(100_000),
    ] {
        let report = bernoulli::estimate(&mut coin, &params)?;
        println!("abs_tol = {}, alpha = {}", params.abs_tol, params.alpha);
        println!("  Required samples: {}", report.required_samples);
        println!("  Samples used:     {}", report.samples_used);
        println!("  Estimate:         {:.4}", report.estimate);
        println!("  Exit status:      {}\n", report.exit);
    }
    Ok(())
}
