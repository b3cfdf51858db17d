//! Standard normal distribution helpers

use std::f64::consts::{PI, SQRT_2};

/// Standard normal CDF, `P(Z <= x)`.
///
/// Computed through `erfc` so the lower tail keeps full relative accuracy.
#[must_use]
pub fn normal_cdf(x: f64) -> f64 {
    0.5 * libm::erfc(-x / SQRT_2)
}

// Acklam's rational approximation, relative error below 1.15e-9 before refinement.
const A: [f64; 6] = [
    -3.969_683_028_665_376e1,
    2.209_460_984_245_205e2,
    -2.759_285_104_469_687e2,
    1.383_577_518_672_690e2,
    -3.066_479_806_614_716e1,
    2.506_628_277_459_239,
];
const B: [f64; 5] = [
    -5.447_609_879_822_406e1,
    1.615_858_368_580_409e2,
    -1.556_989_798_598_866e2,
    6.680_131_188_771_972e1,
    -1.328_068_155_288_572e1,
];
const C: [f64; 6] = [
    -7.784_894_002_430_293e-3,
    -3.223_964_580_411_365e-1,
    -2.400_758_277_161_838,
    -2.549_732_539_343_734,
    4.374_664_141_464_968,
    2.938_163_982_698_783,
];
const D: [f64; 4] = [
    7.784_695_709_041_462e-3,
    3.224_671_290_700_398e-1,
    2.445_134_137_142_996,
    3.754_408_661_907_416,
];
const P_LOW: f64 = 0.024_25;

fn tail_rational(q: f64) -> f64 {
    let num = C[0]
        .mul_add(q, C[1])
        .mul_add(q, C[2])
        .mul_add(q, C[3])
        .mul_add(q, C[4])
        .mul_add(q, C[5]);
    let den = D[0]
        .mul_add(q, D[1])
        .mul_add(q, D[2])
        .mul_add(q, D[3])
        .mul_add(q, 1.0);
    num / den
}

/// Inverse of the standard normal CDF (quantile function).
///
/// Returns `-inf` at `p == 0`, `+inf` at `p == 1` and NaN outside `[0, 1]`.
/// The rational approximation is polished with one Halley step against
/// [`normal_cdf`], giving close to double precision.
#[must_use]
pub fn normal_inv(p: f64) -> f64 {
    if !(0.0..=1.0).contains(&p) {
        return f64::NAN;
    }
    if p == 0.0 {
        return f64::NEG_INFINITY;
    }
    if p == 1.0 {
        return f64::INFINITY;
    }

    let x = if p < P_LOW {
        tail_rational((-2.0 * p.ln()).sqrt())
    } else if p <= 1.0 - P_LOW {
        let q = p - 0.5;
        let r = q * q;
        let num = A[0]
            .mul_add(r, A[1])
            .mul_add(r, A[2])
            .mul_add(r, A[3])
            .mul_add(r, A[4])
            .mul_add(r, A[5]);
        let den = B[0]
            .mul_add(r, B[1])
            .mul_add(r, B[2])
            .mul_add(r, B[3])
            .mul_add(r, B[4])
            .mul_add(r, 1.0);
        num * q / den
    } else {
        -tail_rational((-2.0 * (1.0 - p).ln()).sqrt())
    };

    // Halley refinement
    let e = normal_cdf(x) - p;
    let u = e * (2.0 * PI).sqrt() * (x * x / 2.0).exp();
    x - u / (1.0 + x * u / 2.0)
}
