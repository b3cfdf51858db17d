//! Statistical primitives shared by the estimators
//!
//! Pure functions only; nothing here holds state between calls except the
//! explicit [`OnlineMoments`] accumulator.

mod concentration;
mod normal;
mod online;
mod root;

pub use concentration::{kurtosis_bound, sample_size_for_tolerance, tolerance_for_sample_size};
pub(crate) use concentration::ceil_count;
pub use normal::{normal_cdf, normal_inv};
pub use online::OnlineMoments;
pub use root::decreasing_root;
