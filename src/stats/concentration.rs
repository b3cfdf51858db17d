//! Non-asymptotic concentration bounds for the sample mean
//!
//! Two bounds guarantee `P(|mean_n - mu| > tol) <= alpha` for i.i.d. samples
//! with standard deviation `sigma`:
//!
//! - Chebyshev: distribution-free, `n >= 1 / (alpha * (tol/sigma)^2)`.
//! - Berry-Esseen: a non-uniform CLT bound that also needs an upper bound on
//!   the standardized fourth moment (`kurtmax`). Its tail equation is
//!   transcendental and is solved with [`decreasing_root`] in log space.
//!
//! Each solver returns the tighter of the two.

use super::normal::{normal_cdf, normal_inv};
use super::root::decreasing_root;
use crate::{Error, Result};

/// Berry-Esseen constants (non-uniform bound)
const BE_A: f64 = 18.1139;
const BE_A1: f64 = 0.3328;
const BE_A2: f64 = 0.429;

fn check_alpha(alpha: f64) -> Result<()> {
    if alpha > 0.0 && alpha < 1.0 {
        Ok(())
    } else {
        Err(Error::InvalidInput(format!(
            "confidence parameter must lie in (0, 1), got {alpha}"
        )))
    }
}

fn check_kurtmax(kurtmax: f64) -> Result<()> {
    if kurtmax.is_finite() && kurtmax > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidInput(format!(
            "kurtosis bound must be positive and finite, got {kurtmax}"
        )))
    }
}

/// Upper bound on the kurtosis that holds with confidence `1 - alpha_sigma`
/// when the variance was estimated from `n_sigma` samples and inflated by
/// `fudge`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn kurtosis_bound(n_sigma: u64, alpha_sigma: f64, fudge: f64) -> f64 {
    let n = n_sigma as f64;
    let shrink = 1.0 - 1.0 / (fudge * fudge);
    (n - 3.0) / (n - 1.0) + (alpha_sigma * n / (1.0 - alpha_sigma)) * shrink * shrink
}

/// Berry-Esseen one-sided tail bound minus its target `alpha / 2`.
///
/// Decreasing in both `sqrt_n` and `ratio`.
fn berry_esseen_excess(sqrt_n: f64, ratio: f64, m3: f64, alpha: f64) -> f64 {
    let z = sqrt_n * ratio;
    let correction = (BE_A1 * (m3 + BE_A2)).min(BE_A * m3 / (1.0 + z * z * z));
    normal_cdf(-z) + correction / sqrt_n - alpha / 2.0
}

/// Clamp a non-negative real count to `u64`, rounding up.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn ceil_count(x: f64) -> u64 {
    if x.is_nan() || x <= 0.0 {
        0
    } else {
        // float-to-int casts saturate
        x.ceil() as u64
    }
}

/// Smallest sample size for which either bound guarantees
/// `P(|mean_n - mu| > tol) <= alpha`, given `ratio = tol / sigma`.
///
/// A non-positive ratio has no finite answer and yields `u64::MAX`; an
/// infinite ratio (zero variance) needs a single sample.
///
/// # Errors
///
/// [`Error::InvalidInput`] for NaN ratio, `alpha` outside (0, 1) or an invalid
/// kurtosis bound; [`Error::NumericConvergence`] if the Berry-Esseen equation
/// cannot be solved.
pub fn sample_size_for_tolerance(ratio: f64, alpha: f64, kurtmax: f64) -> Result<u64> {
    check_alpha(alpha)?;
    check_kurtmax(kurtmax)?;
    if ratio.is_nan() {
        return Err(Error::InvalidInput("tolerance/sigma ratio is NaN".to_string()));
    }
    if ratio <= 0.0 {
        return Ok(u64::MAX);
    }
    if ratio.is_infinite() {
        return Ok(1);
    }

    let n_chebyshev = ceil_count(1.0 / (alpha * ratio * ratio));

    let m3 = kurtmax.powf(0.75);
    let seed = (normal_inv(1.0 - alpha / 2.0) / ratio).ln();
    let log_sqrt_n = decreasing_root(
        |s| berry_esseen_excess(s.exp(), ratio, m3, alpha),
        seed,
        "berry-esseen sample size",
    )?;
    let n_berry_esseen = ceil_count((2.0 * log_sqrt_n).exp());

    Ok(n_chebyshev.min(n_berry_esseen).max(1))
}

/// Smallest `tol / sigma` ratio that either bound guarantees with `n`
/// samples at confidence `1 - alpha`. Multiply by a standard deviation bound
/// to get a tolerance.
///
/// # Errors
///
/// [`Error::InvalidInput`] for `n == 0`, `alpha` outside (0, 1) or an invalid
/// kurtosis bound; [`Error::NumericConvergence`] if the Berry-Esseen equation
/// cannot be solved.
#[allow(clippy::cast_precision_loss)]
pub fn tolerance_for_sample_size(n: u64, alpha: f64, kurtmax: f64) -> Result<f64> {
    check_alpha(alpha)?;
    check_kurtmax(kurtmax)?;
    if n == 0 {
        return Err(Error::InvalidInput("sample size must be positive".to_string()));
    }

    let n = n as f64;
    let sqrt_n = n.sqrt();
    let chebyshev = 1.0 / (n * alpha).sqrt();

    let m3 = kurtmax.powf(0.75);
    let seed = (normal_inv(1.0 - alpha / 2.0) / sqrt_n).ln();
    let log_ratio = decreasing_root(
        |s| berry_esseen_excess(sqrt_n, s.exp(), m3, alpha),
        seed,
        "berry-esseen tolerance",
    )?;

    Ok(chebyshev.min(log_ratio.exp()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const KURTMAX: f64 = 5.65;

    #[test]
    fn test_kurtosis_bound_reference_value() {
        let k = kurtosis_bound(10_000, 0.005, 1.2);
        assert!((k - 5.6915).abs() < 1e-3, "kurtmax = {k}");
    }

    #[test]
    fn test_kurtosis_bound_without_inflation() {
        // fudge = 1 leaves only the (n-3)/(n-1) term
        let k = kurtosis_bound(101, 0.05, 1.0);
        assert!((k - 98.0 / 100.0).abs() < 1e-12);
    }

    #[test]
    fn test_sample_size_never_exceeds_chebyshev() {
        for &(ratio, alpha) in &[(0.1, 0.01), (0.01, 0.05), (1e-3, 1e-4), (0.5, 0.2)] {
            let n = sample_size_for_tolerance(ratio, alpha, KURTMAX).unwrap();
            let cheb = ceil_count(1.0 / (alpha * ratio * ratio));
            assert!(n >= 1 && n <= cheb, "ratio {ratio}, alpha {alpha}: {n} > {cheb}");
        }
    }

    #[test]
    fn test_sample_size_at_least_clt() {
        // No valid bound can beat the asymptotic normal sample size
        let (ratio, alpha) = (0.01, 0.01);
        let n = sample_size_for_tolerance(ratio, alpha, KURTMAX).unwrap();
        let clt = (normal_inv(1.0 - alpha / 2.0) / ratio).powi(2);
        assert!(n as f64 >= clt.floor());
    }

    #[test]
    fn test_sample_size_monotone_in_ratio() {
        let loose = sample_size_for_tolerance(0.05, 0.01, KURTMAX).unwrap();
        let tight = sample_size_for_tolerance(0.005, 0.01, KURTMAX).unwrap();
        assert!(tight > loose);
    }

    #[test]
    fn test_sample_size_degenerate_ratios() {
        assert_eq!(sample_size_for_tolerance(0.0, 0.01, KURTMAX).unwrap(), u64::MAX);
        assert_eq!(
            sample_size_for_tolerance(f64::INFINITY, 0.01, KURTMAX).unwrap(),
            1
        );
        assert!(sample_size_for_tolerance(f64::NAN, 0.01, KURTMAX).is_err());
    }

    #[test]
    fn test_rejects_bad_alpha_and_kurtosis() {
        assert!(sample_size_for_tolerance(0.1, 0.0, KURTMAX).is_err());
        assert!(sample_size_for_tolerance(0.1, 1.0, KURTMAX).is_err());
        assert!(tolerance_for_sample_size(100, 0.01, -1.0).is_err());
        assert!(tolerance_for_sample_size(0, 0.01, KURTMAX).is_err());
    }

    #[test]
    fn test_tolerance_and_sample_size_are_consistent() {
        let alpha = 0.0025;
        let n = 10_000;
        let ratio = tolerance_for_sample_size(n, alpha, KURTMAX).unwrap();
        assert!(ratio > 0.0 && ratio <= 1.0 / ((n as f64) * alpha).sqrt() + 1e-15);

        // n samples suffice for that ratio
        let needed = sample_size_for_tolerance(ratio * (1.0 + 1e-9), alpha, KURTMAX).unwrap();
        assert!(needed <= n, "needed {needed} > {n}");
    }

    #[test]
    fn test_tolerance_shrinks_with_n() {
        let small = tolerance_for_sample_size(1_000, 0.01, KURTMAX).unwrap();
        let large = tolerance_for_sample_size(100_000, 0.01, KURTMAX).unwrap();
        assert!(large < small);
    }
}
