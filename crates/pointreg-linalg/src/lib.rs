#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! Fixed-size (3×3) decompositions and accumulators used by the
//! registration algorithms: singular value decomposition, symmetric
//! eigendecomposition, and a compensated running sum for centroid and
//! moment computations.

/// Symmetric 3x3 eigendecomposition.
pub mod eigen;

/// Plain-array 3x3 matrix helpers and faer bridges.
pub mod mat;

/// Compensated summation.
pub mod sum;

/// 3x3 singular value decomposition.
pub mod svd;

pub use eigen::{symmetric_eigen3, Eigen3};
pub use mat::{mat3_det, mat3_identity, mat3_mul, mat3_mul_vec3, mat3_transpose};
pub use sum::RunningSum;
pub use svd::{svd3, Svd3};
