//! Patch distance kernels.

use crate::patch::Patch;

/// Kernel trait for comparing two equally shaped patches.
///
/// Implementations return a non-negative distance; smaller means more
/// similar. Passing patches of different shapes is a programming error and
/// panics.
pub trait DistanceKernel {
    /// Distance between `a` and `b`.
    fn distance(a: &Patch, b: &Patch) -> f32;
}

pub mod scalar;

#[cfg(feature = "simd")]
pub mod simd;

#[cfg(feature = "rayon")]
pub mod rayon;

pub use scalar::L2Scalar;
#[cfg(feature = "simd")]
pub use simd::L2Simd;
