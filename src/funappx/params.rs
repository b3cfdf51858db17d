//! Parameter record for the function approximator

use crate::diagnostics::Diagnostics;
use crate::Result;
use serde::{Deserialize, Serialize};

/// Default left endpoint
pub const DEFAULT_A: f64 = 0.0;
/// Default right endpoint
pub const DEFAULT_B: f64 = 1.0;
/// Default absolute tolerance
pub const DEFAULT_ABS_TOL: f64 = 1e-6;
/// Default lower bound on the initial point count
pub const DEFAULT_NLO: usize = 10;
/// Default upper bound on the initial point count
pub const DEFAULT_NHI: usize = 1_000;
/// Default cost budget (function evaluations on the final grid)
pub const DEFAULT_NMAX: usize = 10_000_000;
/// Default iteration cap
pub const DEFAULT_MAX_ITERATIONS: u32 = 1_000;
/// Fewest points that define a second difference
pub const MIN_POINTS: usize = 3;

/// Parameters of [`approximate`](super::approximate)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FunappxParams {
    /// Left endpoint
    pub a: f64,
    /// Right endpoint (> a)
    pub b: f64,
    /// Absolute error tolerance (> 0)
    pub abs_tol: f64,
    /// Lower bound on the initial point count (>= 3)
    pub nlo: usize,
    /// Upper bound on the initial point count (>= nlo)
    pub nhi: usize,
    /// Most points the final grid may hold
    pub nmax: usize,
    /// Most refinement iterations
    pub max_iterations: u32,
}

impl Default for FunappxParams {
    fn default() -> Self {
        Self {
            a: DEFAULT_A,
            b: DEFAULT_B,
            abs_tol: DEFAULT_ABS_TOL,
            nlo: DEFAULT_NLO,
            nhi: DEFAULT_NHI,
            nmax: DEFAULT_NMAX,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl FunappxParams {
    /// Parse a (possibly partial) JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`](crate::Error::Config) on malformed JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set the interval.
    #[must_use]
    pub const fn interval(mut self, a: f64, b: f64) -> Self {
        self.a = a;
        self.b = b;
        self
    }

    /// Set the absolute tolerance.
    #[must_use]
    pub const fn abs_tol(mut self, abs_tol: f64) -> Self {
        self.abs_tol = abs_tol;
        self
    }

    /// Set the bounds on the initial point count.
    #[must_use]
    pub const fn initial_points(mut self, nlo: usize, nhi: usize) -> Self {
        self.nlo = nlo;
        self.nhi = nhi;
        self
    }

    /// Set the cost budget.
    #[must_use]
    pub const fn nmax(mut self, nmax: usize) -> Self {
        self.nmax = nmax;
        self
    }

    /// Set the iteration cap.
    #[must_use]
    pub const fn max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Initial point count: between `nlo` and `nhi`, closer to `nhi` on
    /// wider intervals, never below 3.
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn ninit(&self) -> usize {
        let nlo = self.nlo.max(MIN_POINTS) as f64;
        let nhi = (self.nhi as f64).max(nlo);
        let width = self.b - self.a;
        let n = (nhi * (nlo / nhi).powf(1.0 / (1.0 + width))).ceil();
        // n <= nhi, which came from a usize
        (n as usize).max(MIN_POINTS)
    }

    /// Smallest width whose `nmax`-point grid keeps neighbouring points
    /// distinct at the magnitude of the endpoints.
    #[allow(clippy::cast_precision_loss)]
    fn resolvable_width(&self) -> f64 {
        let points = self.nmax.max(self.nhi).max(MIN_POINTS) as f64;
        self.a.abs().max(self.b.abs()) * f64::EPSILON * 4.0 * points
    }

    /// Correct every out-of-range field, recording what changed.
    #[must_use]
    pub fn validate(mut self) -> (Self, Diagnostics) {
        let mut diags = Diagnostics::new();

        if !self.a.is_finite() {
            diags.push("a", format!("{} is not finite; using {DEFAULT_A}", self.a));
            self.a = DEFAULT_A;
        }
        if !self.b.is_finite() {
            diags.push("b", format!("{} is not finite; using {DEFAULT_B}", self.b));
            self.b = DEFAULT_B;
        }
        if self.a > self.b {
            diags.push("a", format!("{} > {}; endpoints swapped", self.a, self.b));
            std::mem::swap(&mut self.a, &mut self.b);
        }

        // The finest grid must still have distinct points after rounding
        let resolvable = self.resolvable_width();
        if self.b - self.a <= 0.0 {
            let width = resolvable.max(1.0);
            diags.push("b", format!("empty interval at {}; using b = a + {width}", self.a));
            self.b = self.a + width;
        } else if self.b - self.a < resolvable {
            diags.push(
                "b",
                format!("[{}, {}] is too narrow to resolve; using b = a + {resolvable}", self.a, self.b),
            );
            self.b = self.a + resolvable;
        }

        if !(self.b - self.a).is_finite() {
            diags.push("a", format!("width of [{}, {}] overflows; using {DEFAULT_A}", self.a, self.b));
            diags.push("b", format!("width of [{}, {}] overflows; using {DEFAULT_B}", self.a, self.b));
            self.a = DEFAULT_A;
            self.b = DEFAULT_B;
        }

        if !(self.abs_tol > 0.0 && self.abs_tol.is_finite()) {
            diags.push(
                "abs_tol",
                format!("{} must be positive and finite; using {DEFAULT_ABS_TOL}", self.abs_tol),
            );
            self.abs_tol = DEFAULT_ABS_TOL;
        }

        if self.nlo < MIN_POINTS {
            diags.push("nlo", format!("{} is below {MIN_POINTS}; using {MIN_POINTS}", self.nlo));
            self.nlo = MIN_POINTS;
        }
        if self.nhi < self.nlo {
            diags.push("nhi", format!("{} is below nlo; using {}", self.nhi, self.nlo));
            self.nhi = self.nlo;
        }
        if self.max_iterations == 0 {
            diags.push("max_iterations", format!("0 iterations allowed; using {DEFAULT_MAX_ITERATIONS}"));
            self.max_iterations = DEFAULT_MAX_ITERATIONS;
        }

        let ninit = self.ninit();
        if self.nmax < ninit {
            diags.push("nmax", format!("{} is below the initial point count; using {ninit}", self.nmax));
            self.nmax = ninit;
        }

        (self, diags)
    }
}
