use crate::error::RegistrationError;
use pointreg_3d::PointCloud;

// Tolerance on the homogeneous weight of a transformed point.
const WEIGHT_TOLERANCE: f64 = 1e-12;

/// A 4x4 affine transform acting on homogeneous points, T * [p; 1] = [p'; 1].
///
/// Coefficients are addressed column-first as `(i, j)`:
///
/// ```text
///     (0,0)    (1,0)    (2,0)  |  (3,0)
///     (0,1)    (1,1)    (2,1)  |  (3,1)         linear part  |  translation
///     (0,2)    (1,2)    (2,2)  |  (3,2)    =   ----------------------------
///     ---------------------------------               (zeros)    |    1
///     (0,3)    (1,3)    (2,3)  |  (3,3)
/// ```
///
/// The bottom row `j = 3` must remain (0, 0, 0, 1) for the transform to
/// stay affine; [`AffineTransform::set_coeff`] refuses to write it.
#[derive(Debug, Clone, PartialEq)]
pub struct AffineTransform {
    t: [[f64; 4]; 4],
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl AffineTransform {
    /// The identity transform.
    pub fn identity() -> Self {
        Self {
            t: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Build a transform from a rotation (or general linear) block and a
    /// translation vector.
    pub fn from_rotation_translation(rotation: &[[f64; 3]; 3], translation: &[f64; 3]) -> Self {
        let mut out = Self::identity();
        for (i, column) in out.t.iter_mut().take(3).enumerate() {
            for (j, coeff) in column.iter_mut().take(3).enumerate() {
                *coeff = rotation[j][i];
            }
        }
        out.t[3][0] = translation[0];
        out.t[3][1] = translation[1];
        out.t[3][2] = translation[2];
        out
    }

    /// Read the coefficient at column `i`, row `j`.
    ///
    /// PRECONDITION: `i` and `j` are both in [0, 3].
    #[inline]
    pub fn coeff(&self, i: usize, j: usize) -> f64 {
        self.t[i][j]
    }

    /// Write the coefficient at column `i`, row `j`.
    ///
    /// Only the 3x4 block `j <= 2` is writable; the bottom row is fixed
    /// and an attempt to touch it fails with
    /// [`RegistrationError::InvalidCoefficient`].
    pub fn set_coeff(&mut self, i: usize, j: usize, value: f64) -> Result<(), RegistrationError> {
        if i > 3 || j > 2 {
            return Err(RegistrationError::InvalidCoefficient { i, j });
        }
        self.t[i][j] = value;
        Ok(())
    }

    /// The linear (rotation) block in row-major maths convention.
    pub fn rotation(&self) -> [[f64; 3]; 3] {
        let mut out = [[0.0; 3]; 3];
        for (j, row) in out.iter_mut().enumerate() {
            for (i, val) in row.iter_mut().enumerate() {
                *val = self.t[i][j];
            }
        }
        out
    }

    /// The translation column.
    pub fn translation(&self) -> [f64; 3] {
        [self.t[3][0], self.t[3][1], self.t[3][2]]
    }

    /// Apply the full transform to a point.
    ///
    /// Fails with [`RegistrationError::NotAffine`] if the homogeneous
    /// weight of the result is not 1.
    pub fn apply(&self, p: &[f64; 3]) -> Result<[f64; 3], RegistrationError> {
        let t = &self.t;
        let x = p[0] * t[0][0] + p[1] * t[1][0] + p[2] * t[2][0] + t[3][0];
        let y = p[0] * t[0][1] + p[1] * t[1][1] + p[2] * t[2][1] + t[3][1];
        let z = p[0] * t[0][2] + p[1] * t[1][2] + p[2] * t[2][2] + t[3][2];
        let w = p[0] * t[0][3] + p[1] * t[1][3] + p[2] * t[2][3] + t[3][3];

        if (w - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(RegistrationError::NotAffine { w });
        }

        Ok([x, y, z])
    }

    /// Apply the transform to every point of a cloud in place.
    ///
    /// Point order and scalar attributes are preserved.
    pub fn apply_in_place(&self, cloud: &mut PointCloud) -> Result<(), RegistrationError> {
        for p in cloud.points_mut() {
            *p = self.apply(p)?;
        }
        Ok(())
    }
}
