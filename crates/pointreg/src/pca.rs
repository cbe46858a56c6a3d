use log::debug;

use crate::affine::AffineTransform;
use crate::error::RegistrationError;
use pointreg_3d::{ops, PointCloud};
use pointreg_linalg::{mat3_mul, mat3_mul_vec3, mat3_transpose, symmetric_eigen3};

// Relative eigenvalue spread below which the covariance is treated as
// rank deficient and the principal axes as undefined.
const RANK_TOLERANCE: f64 = 1e-12;

/// Principal-component alignment.
///
/// Computes the principal axes of both clouds from the eigendecomposition
/// of their (unnormalised) covariance, fixes each axis direction with the
/// third central moment of the point distribution along it, and returns
/// the transform rotating the moving basis onto the stationary basis with
/// the centre-of-mass shift folded into the translation column.
///
/// The linear block is orthonormal but not necessarily a proper rotation:
/// an odd number of sign flips leaves det = −1, which is accepted
/// behaviour for this method. Callers that need a guaranteed proper
/// rotation use rigid CPD instead.
pub fn align_pca(
    stationary: &PointCloud,
    moving: &PointCloud,
) -> Result<AffineTransform, RegistrationError> {
    if stationary.is_empty() || moving.is_empty() {
        return Err(RegistrationError::EmptyPointSet);
    }

    let com_s = ops::centroid(stationary.points());
    let com_m = ops::centroid(moving.points());

    let axes_s = principal_axes(stationary.points(), &com_s)?;
    let axes_m = principal_axes(moving.points(), &com_m)?;

    let axes_s = reorient_axes(stationary.points(), &com_s, axes_s);
    let axes_m = reorient_axes(moving.points(), &com_m, axes_m);

    debug!("stationary cloud: com {com_s:?}, principal axes {axes_s:?}");
    debug!("moving cloud: com {com_m:?}, principal axes {axes_m:?}");

    // Assemble the orthonormal axes into column matrices S and M; the
    // rotation taking the moving basis to the stationary basis is then
    // A = S * M^T, and with axes stored as rows this is S^T_rows * M_rows.
    let a = mat3_mul(&mat3_transpose(&axes_s), &axes_m);

    // The COM subtraction is folded into the translation column:
    // A * (p - com_m) + com_s = A * p + (com_s - A * com_m).
    let a_com_m = mat3_mul_vec3(&a, &com_m);
    let b = [
        com_s[0] - a_com_m[0],
        com_s[1] - a_com_m[1],
        com_s[2] - a_com_m[2],
    ];

    debug!("final linear transform {a:?}, translation {b:?}");

    Ok(AffineTransform::from_rotation_translation(&a, &b))
}

/// Unit principal axes of a cloud, one per row, ordered by ascending
/// eigenvalue.
fn principal_axes(
    points: &[[f64; 3]],
    com: &[f64; 3],
) -> Result<[[f64; 3]; 3], RegistrationError> {
    let mut centered = vec![[0.0; 3]; points.len()];
    ops::center_points(points, com, &mut centered);
    let cov = ops::covariance(&centered);

    let eig = symmetric_eigen3(&cov);
    let eigenvalues = eig.eigenvalues();
    let lambda_max = eigenvalues[2];
    if !(lambda_max > 0.0) || eigenvalues[0] <= lambda_max * RANK_TOLERANCE {
        return Err(RegistrationError::DegeneratePca);
    }

    let mut axes = [
        *eig.eigenvector(0),
        *eig.eigenvector(1),
        *eig.eigenvector(2),
    ];
    // The eigensolver's sign is arbitrary. Fix each axis so its
    // largest-magnitude component is positive; an axis whose skew is
    // exactly zero then still comes out the same for both clouds.
    for axis in axes.iter_mut() {
        let mut dominant = 0;
        for k in 1..3 {
            if axis[k].abs() > axis[dominant].abs() {
                dominant = k;
            }
        }
        if axis[dominant] < 0.0 {
            for v in axis.iter_mut() {
                *v = -*v;
            }
        }
    }
    Ok(axes)
}

/// Flip each axis so the third central moment along it is non-negative.
///
/// A zero moment (perfectly symmetric distribution) keeps the axis as
/// produced by the eigensolver; the registration is then only defined up
/// to reflection.
fn reorient_axes(points: &[[f64; 3]], com: &[f64; 3], mut axes: [[f64; 3]; 3]) -> [[f64; 3]; 3] {
    for axis in axes.iter_mut() {
        let m3 = ops::third_central_moment(points, com, axis);
        if m3 < 0.0 {
            for v in axis.iter_mut() {
                *v = -*v;
            }
        }
    }
    axes
}
