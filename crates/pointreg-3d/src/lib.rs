#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! Provides the [`pointcloud::PointCloud`] container consumed by the
//! registration algorithms, rigid `(R, t)` application to point slices,
//! axis-angle rotation construction, and the centroid / covariance /
//! moment building blocks shared by the aligners.

/// Rigid transform application to point slices.
pub mod linalg;

/// Centroid, centring, covariance, and moment operations.
pub mod ops;

/// Point cloud container.
pub mod pointcloud;

/// Rotation construction helpers.
pub mod transforms;

pub use pointcloud::PointCloud;
