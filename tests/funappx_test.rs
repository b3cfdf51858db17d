//! Integration tests for the guaranteed function approximator

use guaranteed_numerics::funappx::{approximate, pointwise, FunappxParams, Guarantee};
use guaranteed_numerics::Error;

/// Largest deviation from `f` on a uniform grid of `points` points
fn max_error(report_eval: impl Fn(f64) -> f64, f: impl Fn(f64) -> f64, a: f64, b: f64, points: u32) -> f64 {
    (0..points)
        .map(|i| a + (b - a) * f64::from(i) / f64::from(points - 1))
        .map(|x| (report_eval(x) - f(x)).abs())
        .fold(0.0, f64::max)
}

#[test]
fn test_square_on_symmetric_interval() {
    let mut square = pointwise(|x: f64| x * x);
    let params = FunappxParams::default().interval(-2.0, 2.0).abs_tol(1e-6);
    let report = approximate(&mut square, &params).unwrap();

    assert!(!report.exceed_budget);
    assert!(!report.exceed_iterations);
    assert_eq!(report.guarantee, Guarantee::ConditionalOnCone);
    assert!(report.errest.unwrap() <= 1e-6);

    let err = max_error(|x| report.approximant.evaluate(x), |x| x * x, -2.0, 2.0, 100_001);
    assert!(err <= 1e-6, "max error {err}");
}

#[test]
fn test_breakpoint_count_matches_evaluations() {
    let mut square = pointwise(|x: f64| x * x);
    let params = FunappxParams::default().interval(-2.0, 2.0).abs_tol(1e-6);
    let report = approximate(&mut square, &params).unwrap();

    let points = report.approximant.breakpoints().len();
    assert_eq!(report.n_evaluations, points as u64);
    assert_eq!(report.approximant.segments().len(), points - 1);
    assert_eq!(report.approximant.interval(), (-2.0, 2.0));
    // Nested refinement keeps (points - 1) a multiple of the initial interval count
    assert_eq!((points - 1) % (params.ninit() - 1), 0);
}

#[test]
fn test_budget_exceeded_returns_best_so_far() {
    let mut square = pointwise(|x: f64| x * x);
    let params = FunappxParams::default()
        .interval(-2.0, 2.0)
        .abs_tol(1e-6)
        .nmax(1_000);
    let report = approximate(&mut square, &params).unwrap();

    assert!(report.exceed_budget);
    assert_eq!(report.guarantee, Guarantee::NotGuaranteed);
    let points = report.approximant.breakpoints().len();
    assert!(points <= 1_000);
    assert_eq!(points, 797);

    // Still a sensible approximation: h^2 / 4 for x^2 with h = 4 / 796
    let err = max_error(|x| report.approximant.evaluate(x), |x| x * x, -2.0, 2.0, 10_001);
    assert!(err < 1e-4);
}

#[test]
fn test_oscillating_function() {
    let f = |x: f64| (30.0 * x).sin();
    let mut vectorized = pointwise(f);
    let report = approximate(&mut vectorized, &FunappxParams::default()).unwrap();

    assert_eq!(report.guarantee, Guarantee::ConditionalOnCone);
    let err = max_error(|x| report.approximant.evaluate(x), f, 0.0, 1.0, 50_001);
    assert!(err <= 1e-6, "max error {err}");
}

#[cfg(feature = "rayon")]
#[test]
fn test_parallel_evaluation_gives_same_result() {
    use guaranteed_numerics::funappx::par_pointwise;

    let params = FunappxParams::default().abs_tol(1e-8);
    let sequential = approximate(&mut pointwise(f64::exp), &params).unwrap();
    let parallel = approximate(&mut par_pointwise(f64::exp), &params).unwrap();
    assert_eq!(sequential.approximant, parallel.approximant);
    assert_eq!(sequential.iterations, parallel.iterations);
}

#[test]
fn test_reversed_interval_corrected() {
    let mut f = pointwise(|x: f64| x.cos());
    let params = FunappxParams::default().interval(1.0, -1.0).abs_tol(1e-5);
    let report = approximate(&mut f, &params).unwrap();
    assert_eq!(report.approximant.interval(), (-1.0, 1.0));
    assert!(report.diagnostics.mentions("a"));
}

#[test]
fn test_empty_interval_far_from_origin_is_widened() {
    let mut f = pointwise(|_x: f64| 3.0);
    let params = FunappxParams::default().interval(1e17, 1e17);
    let report = approximate(&mut f, &params).unwrap();

    let (a, b) = report.approximant.interval();
    assert_eq!(a, 1e17);
    assert!(b > a);
    assert!(report.approximant.breakpoints().windows(2).all(|w| w[0] < w[1]));
    assert!(report.diagnostics.mentions("b"));
}

#[test]
fn test_overflowing_width_falls_back_to_unit_interval() {
    let mut f = pointwise(|x: f64| x * x);
    let params = FunappxParams::default().interval(-1e308, 1e308).abs_tol(1e-4);
    let report = approximate(&mut f, &params).unwrap();

    assert_eq!(report.approximant.interval(), (0.0, 1.0));
    assert_eq!(report.guarantee, Guarantee::ConditionalOnCone);
    assert!(report.diagnostics.mentions("a"));
    assert!(report.diagnostics.mentions("b"));
}

#[test]
fn test_scalar_function_rejected_by_length_check() {
    // A "function" that ignores the vector and returns one value
    let mut scalar = |xs: &[f64]| vec![xs[0]];
    let err = approximate(&mut scalar, &FunappxParams::default()).unwrap_err();
    assert!(matches!(err, Error::MalformedFunctionOutput { returned: 1, .. }));
}

#[test]
fn test_nan_rejected() {
    let mut f = pointwise(|x: f64| if x > 0.5 { f64::NAN } else { x });
    let err = approximate(&mut f, &FunappxParams::default()).unwrap_err();
    assert!(matches!(err, Error::NonFiniteValue { x, .. } if x > 0.5));
}
