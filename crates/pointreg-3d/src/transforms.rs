/// Error type for rotation construction.
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    /// The rotation axis has (near-)zero length.
    #[error("cannot compute a rotation matrix from a zero-length axis")]
    ZeroAxis,
}

/// Compute the rotation matrix from an axis and angle.
///
/// The axis need not be pre-normalised.
///
/// Example:
///
/// ```
/// use pointreg_3d::transforms::axis_angle_to_rotation_matrix;
///
/// let rotation = axis_angle_to_rotation_matrix(&[1.0, 0.0, 0.0], std::f64::consts::PI / 2.0).unwrap();
/// assert!((rotation[1][2] - (-1.0)).abs() < 1e-12);
/// ```
pub fn axis_angle_to_rotation_matrix(
    axis: &[f64; 3],
    angle: f64,
) -> Result<[[f64; 3]; 3], TransformError> {
    let magnitude = (axis[0].powi(2) + axis[1].powi(2) + axis[2].powi(2)).sqrt();
    if magnitude < 1e-10 {
        return Err(TransformError::ZeroAxis);
    }
    let x = axis[0] / magnitude;
    let y = axis[1] / magnitude;
    let z = axis[2] / magnitude;

    let c = angle.cos();
    let s = angle.sin();
    let t = 1.0 - c;

    Ok([
        [c + x * x * t, x * y * t - z * s, x * z * t + y * s],
        [x * y * t + z * s, c + y * y * t, y * z * t - x * s],
        [x * z * t - y * s, y * z * t + x * s, c + z * z * t],
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pointreg_linalg::{mat3_det, mat3_mul, mat3_transpose};

    #[test]
    fn test_quarter_turn_about_x() -> Result<(), TransformError> {
        let rotation = axis_angle_to_rotation_matrix(&[1.0, 0.0, 0.0], std::f64::consts::PI / 2.0)?;
        let expected = [[1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]];
        for i in 0..3 {
            for j in 0..3 {
                assert_relative_eq!(rotation[i][j], expected[i][j], epsilon = 1e-12);
            }
        }
        Ok(())
    }

    #[test]
    fn test_rotation_is_orthonormal() -> Result<(), TransformError> {
        let rotation = axis_angle_to_rotation_matrix(&[1.0, -2.0, 0.5], 1.234)?;
        let rtr = mat3_mul(&mat3_transpose(&rotation), &rotation);
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_relative_eq!(rtr[i][j], expected, epsilon = 1e-12);
            }
        }
        assert_relative_eq!(mat3_det(&rotation), 1.0, epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn test_zero_axis_is_rejected() {
        assert!(axis_angle_to_rotation_matrix(&[0.0, 0.0, 0.0], 1.0).is_err());
    }
}
