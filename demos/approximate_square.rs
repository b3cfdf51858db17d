//! Guaranteed Approximation: f(x) = x^2 on [-2, 2]
//!
//! Builds a piecewise-linear approximant within 1e-6 and checks it on a
//! dense grid.
//!
//! Run with: cargo run --example approximate_square

use guaranteed_numerics::funappx::{approximate, pointwise, FunappxParams};
use guaranteed_numerics::logging::init_tracing;

fn main() -> anyhow::Result<()> {
    init_tracing();
    println!("=== Guaranteed Function Approximation ===\n");

    let f = |x: f64| x * x;
    let params = FunappxParams::default().interval(-2.0, 2.0).abs_tol(1e-6);
    let report = approximate(&mut pointwise(f), &params)?;

    println!("Guarantee:        {:?}", report.guarantee);
    println!("Budget exceeded:  {}", report.exceed_budget);
    println!("Breakpoints:      {}", report.approximant.breakpoints().len());
    println!("Evaluations:      {}", report.n_evaluations);
    println!("Iterations:       {}", report.iterations);
    println!("Error estimate:   {:?}", report.errest);
    println!("Cone parameter:   {:.1}", report.nstar);

    let worst = (0..=200_000)
        .map(|i| -2.0 + 4.0 * f64::from(i) / 200_000.0)
        .map(|x| (report.approximant.evaluate(x) - f(x)).abs())
        .fold(0.0, f64::max);
    println!("\nMax error on 200,001 points: {worst:.3e}");

    Ok(())
}
