use pointreg_linalg::mat3_mul_vec3;

/// Transform a set of points with a rotation and translation.
///
/// Writes `dst_r_src * p + dst_t_src` for each source point into the
/// pre-allocated destination, preserving order.
///
/// PRECONDITION: `dst_points` has the same length as `src_points`.
///
/// Example:
///
/// ```
/// use pointreg_3d::linalg::transform_points3d;
///
/// let src_points = vec![[2.0, 2.0, 2.0], [3.0, 4.0, 5.0]];
/// let rotation = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
/// let translation = [1.0, 0.0, 0.0];
/// let mut dst_points = vec![[0.0; 3]; src_points.len()];
/// transform_points3d(&src_points, &rotation, &translation, &mut dst_points);
/// assert_eq!(dst_points[0], [3.0, 2.0, 2.0]);
/// ```
pub fn transform_points3d(
    src_points: &[[f64; 3]],
    dst_r_src: &[[f64; 3]; 3],
    dst_t_src: &[f64; 3],
    dst_points: &mut [[f64; 3]],
) {
    assert_eq!(src_points.len(), dst_points.len());

    for (src, dst) in src_points.iter().zip(dst_points.iter_mut()) {
        let rotated = mat3_mul_vec3(dst_r_src, src);
        dst[0] = rotated[0] + dst_t_src[0];
        dst[1] = rotated[1] + dst_t_src[1];
        dst[2] = rotated[2] + dst_t_src[2];
    }
}
