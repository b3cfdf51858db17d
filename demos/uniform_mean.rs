//! Guaranteed Mean: E[U] for U ~ Uniform(0, 1)
//!
//! Estimates the mean to an absolute tolerance of 1e-3 with 99% confidence
//! and prints the refinement trace.
//!
//! Run with: cargo run --example uniform_mean
//! More detail: RUST_LOG=debug cargo run --example uniform_mean

use guaranteed_numerics::logging::init_tracing;
use guaranteed_numerics::mean::{guaranteed, MeanParams};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn main() -> anyhow::Result<()> {
    init_tracing();
    println!("=== Guaranteed Monte Carlo Mean ===\n");

    let mut rng = StdRng::seed_from_u64(2024);
    let mut sampler = move |n: usize| (0..n).map(|_| rng.gen::<f64>()).collect::<Vec<f64>>();

    let params = MeanParams::default().abs_tol(1e-3).rel_tol(0.0).alpha(0.01);
    let report = guaranteed::estimate(&mut sampler, &params)?;

    println!("Estimate:      {:.6}", report.estimate);
    println!("Exit status:   {} (code {})", report.exit, report.exit.code());
    println!("Samples used:  {}", report.samples_used);
    println!("Elapsed:       {:.3} s", report.elapsed_secs);
    if let Some(stage) = report.variance_stage {
        println!(
            "Variance:      {:.6} (sigma bound {:.4}, kurtmax {:.3})",
            stage.variance, stage.sigma_bound, stage.kurtmax
        );
    }

    println!("\nIteration trace:");
    println!("  {:>3}  {:>12}  {:>12}  {:>10}", "i", "tolerance", "samples", "mean");
    for (i, step) in report.iterations.iter().enumerate() {
        println!(
            "  {:>3}  {:>12.3e}  {:>12}  {:>10.6}",
            i + 1,
            step.tolerance,
            step.sample_size,
            step.mean
        );
    }
    Ok(())
}
