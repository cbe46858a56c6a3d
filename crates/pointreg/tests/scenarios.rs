use approx::assert_relative_eq;
use pointreg::{
    align_cpd_rigid, align_com, align_pca, AffineTransform, CpdParams, PointCloud,
    RegistrationError,
};
use pointreg_3d::linalg::transform_points3d;
use pointreg_3d::transforms::axis_angle_to_rotation_matrix;
use pointreg_linalg::{mat3_det, mat3_mul_vec3, mat3_transpose};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn unit_cube_cloud(rng: &mut StdRng, num_points: usize) -> PointCloud {
    PointCloud::from_points(
        (0..num_points)
            .map(|_| [rng.gen::<f64>(), rng.gen::<f64>(), rng.gen::<f64>()])
            .collect(),
    )
}

fn rigidly_moved(cloud: &PointCloud, rotation: &[[f64; 3]; 3], translation: &[f64; 3]) -> PointCloud {
    let mut points = vec![[0.0; 3]; cloud.len()];
    transform_points3d(cloud.points(), rotation, translation, &mut points);
    PointCloud::from_points(points)
}

fn assert_clouds_close(applied: &PointCloud, expected: &PointCloud, epsilon: f64) {
    for (p, q) in applied.points().iter().zip(expected.points()) {
        for k in 0..3 {
            assert_relative_eq!(p[k], q[k], epsilon = epsilon);
        }
    }
}

// Scenario 1: COM on a shifted tetrahedron recovers the exact shift.
#[test]
fn com_recovers_tetrahedron_shift() {
    let x = PointCloud::from_points(vec![
        [0.0, 0.0, 0.0],
        [2.0, 0.0, 0.0],
        [0.0, 2.0, 0.0],
        [0.0, 0.0, 2.0],
    ]);
    let mut y = rigidly_moved(&x, &pointreg_linalg::mat3_identity(), &[5.0, -3.0, 7.0]);

    let t = align_com(&x, &y).unwrap();
    assert_eq!(t.rotation(), pointreg_linalg::mat3_identity());
    assert_relative_eq!(t.translation()[0], -5.0, epsilon = 1e-12);
    assert_relative_eq!(t.translation()[1], 3.0, epsilon = 1e-12);
    assert_relative_eq!(t.translation()[2], -7.0, epsilon = 1e-12);

    t.apply_in_place(&mut y).unwrap();
    assert_clouds_close(&y, &x, 1e-12);
}

// Scenario 2: PCA on an axis-spread cloud with symmetry-breaking extras,
// rotated a quarter turn about z.
#[test]
fn pca_recovers_quarter_turn_about_z() {
    let x = PointCloud::from_points(vec![
        [1.0, 0.0, 0.0],
        [-1.0, 0.0, 0.0],
        [0.0, 2.0, 0.0],
        [0.0, -2.0, 0.0],
        [0.0, 0.0, 3.0],
        [0.0, 0.0, -3.0],
        [4.0, 0.0, 0.0],
        [0.0, 5.0, 0.0],
    ]);
    let rotation =
        axis_angle_to_rotation_matrix(&[0.0, 0.0, 1.0], std::f64::consts::PI / 2.0).unwrap();
    let mut y = rigidly_moved(&x, &rotation, &[0.0; 3]);

    let t = align_pca(&x, &y).unwrap();
    t.apply_in_place(&mut y).unwrap();
    assert_clouds_close(&y, &x, 1e-6);
}

// Scenario 3: rigid CPD recovers a 30-degree rotation about (1,1,1)/sqrt(3)
// with a translation, on 200 noise-free points.
#[test]
fn cpd_recovers_thirty_degree_rigid_motion() {
    let mut rng = StdRng::seed_from_u64(3);
    let x = unit_cube_cloud(&mut rng, 200);

    let axis = [1.0, 1.0, 1.0];
    let angle = 30.0_f64.to_radians();
    let rotation = axis_angle_to_rotation_matrix(&axis, angle).unwrap();
    let translation = [0.5, -0.2, 1.0];
    let mut y = rigidly_moved(&x, &rotation, &translation);

    let params = CpdParams {
        max_iterations: 100,
        tolerance: 1e-10,
        w: 0.0,
        sigma_squared_init: None,
    };
    let t = align_cpd_rigid(&x, &y, &params).unwrap();

    // expected inverse motion: R^T and -R^T t
    let expected_rotation = mat3_transpose(&rotation);
    let rt = mat3_mul_vec3(&expected_rotation, &translation);
    let recovered = t.rotation();
    for i in 0..3 {
        for j in 0..3 {
            assert_relative_eq!(recovered[i][j], expected_rotation[i][j], epsilon = 1e-4);
        }
        assert_relative_eq!(t.translation()[i], -rt[i], epsilon = 1e-4);
    }

    t.apply_in_place(&mut y).unwrap();
    assert_clouds_close(&y, &x, 1e-4);
}

// Scenario 4: rigid CPD with outliers in the moving cloud and a nonzero
// uniform-noise weight still recovers the motion.
#[test]
fn cpd_recovers_motion_despite_outliers() {
    let mut rng = StdRng::seed_from_u64(4);
    let x = unit_cube_cloud(&mut rng, 200);

    let axis = [1.0, 1.0, 1.0];
    let angle = 30.0_f64.to_radians();
    let rotation = axis_angle_to_rotation_matrix(&axis, angle).unwrap();
    let translation = [0.5, -0.2, 1.0];
    let y_clean = rigidly_moved(&x, &rotation, &translation);

    let mut y_points = y_clean.points().to_vec();
    for _ in 0..20 {
        y_points.push([
            rng.gen::<f64>() * 3.0 - 1.0,
            rng.gen::<f64>() * 3.0 - 1.0,
            rng.gen::<f64>() * 3.0 - 1.0,
        ]);
    }
    let y = PointCloud::from_points(y_points);

    let params = CpdParams {
        max_iterations: 100,
        tolerance: 1e-10,
        w: 0.3,
        sigma_squared_init: None,
    };
    let t = align_cpd_rigid(&x, &y, &params).unwrap();

    let expected_rotation = mat3_transpose(&rotation);
    let rt = mat3_mul_vec3(&expected_rotation, &translation);
    let recovered = t.rotation();
    for i in 0..3 {
        for j in 0..3 {
            assert_relative_eq!(recovered[i][j], expected_rotation[i][j], epsilon = 1e-2);
        }
        assert_relative_eq!(t.translation()[i], -rt[i], epsilon = 1e-2);
    }
    assert_relative_eq!(mat3_det(&recovered), 1.0, epsilon = 1e-6);
}

// Scenario 5: every aligner rejects an empty input.
#[test]
fn empty_input_is_rejected_by_every_aligner() {
    let x = PointCloud::from_points(vec![[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]]);
    let empty = PointCloud::from_points(vec![]);

    assert!(matches!(
        align_com(&x, &empty),
        Err(RegistrationError::EmptyPointSet)
    ));
    assert!(matches!(
        align_pca(&x, &empty),
        Err(RegistrationError::EmptyPointSet)
    ));
    assert!(matches!(
        align_cpd_rigid(&x, &empty, &CpdParams::default()),
        Err(RegistrationError::EmptyPointSet)
    ));
}

// Scenario 6: the fixed affine row cannot be written.
#[test]
fn fixed_affine_row_cannot_be_written() {
    let mut t = AffineTransform::identity();
    for i in 0..4 {
        assert!(matches!(
            t.set_coeff(i, 3, 0.5),
            Err(RegistrationError::InvalidCoefficient { .. })
        ));
    }
}

// Universal law: aligning a cloud with itself is the identity up to
// numerical tolerance, for all three methods.
#[test]
fn identity_law_for_every_aligner() {
    let mut rng = StdRng::seed_from_u64(6);
    let mut points: Vec<[f64; 3]> = (0..60)
        .map(|_| [rng.gen::<f64>() * 2.0, rng.gen::<f64>(), rng.gen::<f64>() * 3.0])
        .collect();
    // break the symmetry so the PCA axes are well defined and oriented
    points.push([6.0, 0.2, 0.1]);
    points.push([0.3, 4.0, 0.2]);
    points.push([0.1, 0.3, 8.0]);
    let x = PointCloud::from_points(points);

    for t in [
        align_com(&x, &x).unwrap(),
        align_pca(&x, &x).unwrap(),
        align_cpd_rigid(&x, &x, &CpdParams::default()).unwrap(),
    ] {
        for p in x.points() {
            let q = t.apply(p).unwrap();
            for k in 0..3 {
                assert_relative_eq!(q[k], p[k], epsilon = 1e-6);
            }
        }
    }
}

// Universal law: identity transform application is exact.
#[test]
fn identity_transform_is_exact() {
    let t = AffineTransform::identity();
    for p in [
        [0.0, 0.0, 0.0],
        [1.5, -2.25, 3.125],
        [1e12, -1e-12, 42.0],
    ] {
        assert_eq!(t.apply(&p).unwrap(), p);
    }
}
