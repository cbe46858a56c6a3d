#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! Given a stationary reference cloud X and a moving cloud Y, each
//! aligner computes a 4×4 [`AffineTransform`] that maps Y onto X:
//!
//! - [`align_com`] — rotation-less centre-of-mass shift
//! - [`align_pca`] — principal-axis alignment with third-moment
//!   orientation fixing
//! - [`align_cpd_rigid`] — rigid Coherent Point Drift
//!   (Expectation–Maximisation over a Gaussian mixture)
//!
//! Applying the transform is a separate step, either per point or in
//! place over a whole cloud. Inputs are borrowed and never modified by
//! the aligners; no state is kept between calls.
//!
//! # Example
//!
//! ```
//! use pointreg::{align_com, PointCloud};
//!
//! let stationary = PointCloud::from_points(vec![
//!     [0.0, 0.0, 0.0],
//!     [2.0, 0.0, 0.0],
//! ]);
//! let mut moving = PointCloud::from_points(vec![
//!     [5.0, 0.0, 0.0],
//!     [7.0, 0.0, 0.0],
//! ]);
//!
//! let transform = align_com(&stationary, &moving)?;
//! transform.apply_in_place(&mut moving)?;
//! assert_eq!(moving.points()[0], [0.0, 0.0, 0.0]);
//! # Ok::<(), pointreg::RegistrationError>(())
//! ```

/// The 4x4 affine transform returned by every aligner.
pub mod affine;

/// Centre-of-mass alignment.
pub mod com;

/// Rigid Coherent Point Drift alignment.
pub mod cpd;

/// Registration error type.
pub mod error;

/// Method selection and dispatch.
pub mod method;

/// Registration operator over a labelled cloud container.
pub mod operator;

/// Principal-component alignment.
pub mod pca;

pub use affine::AffineTransform;
pub use com::align_com;
pub use cpd::{align_cpd_rigid, align_cpd_rigid_observed, CpdFlow, CpdIteration, CpdParams};
pub use error::RegistrationError;
pub use method::{align, Method};
pub use operator::{align_points, CloudBank, Selection};
pub use pca::align_pca;
pub use pointreg_3d::PointCloud;
