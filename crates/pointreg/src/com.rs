use crate::affine::AffineTransform;
use crate::error::RegistrationError;
use pointreg_3d::{ops::centroid, PointCloud};

/// Centre-of-mass alignment.
///
/// The resulting transform is a rotation-less shift that makes the
/// centres of mass of the two clouds coincide: τ = mean(stationary) −
/// mean(moving). The clouds themselves are not modified.
pub fn align_com(
    stationary: &PointCloud,
    moving: &PointCloud,
) -> Result<AffineTransform, RegistrationError> {
    if stationary.is_empty() || moving.is_empty() {
        return Err(RegistrationError::EmptyPointSet);
    }

    let com_s = centroid(stationary.points());
    let com_m = centroid(moving.points());

    let mut t = AffineTransform::identity();
    t.set_coeff(3, 0, com_s[0] - com_m[0])?;
    t.set_coeff(3, 1, com_s[1] - com_m[1])?;
    t.set_coeff(3, 2, com_s[2] - com_m[2])?;

    Ok(t)
}
