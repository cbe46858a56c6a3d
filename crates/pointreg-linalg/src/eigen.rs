use nalgebra::Matrix3;

/// Result of the symmetric 3x3 eigendecomposition.
///
/// Eigenvalues are sorted ascending; `eigenvector(k)` is the unit
/// eigenvector paired with `eigenvalues()[k]`.
#[derive(Debug, Clone)]
pub struct Eigen3 {
    eigenvalues: [f64; 3],
    eigenvectors: [[f64; 3]; 3],
}

impl Eigen3 {
    /// Get the eigenvalues, ascending.
    #[inline]
    pub fn eigenvalues(&self) -> &[f64; 3] {
        &self.eigenvalues
    }

    /// Get the unit eigenvector paired with the k-th eigenvalue.
    #[inline]
    pub fn eigenvector(&self, k: usize) -> &[f64; 3] {
        &self.eigenvectors[k]
    }
}

/// Eigendecomposition of a symmetric 3x3 matrix.
///
/// Only the lower triangle is assumed meaningful; the caller provides a
/// symmetric matrix (covariance). Eigenpairs are index-sorted so the
/// ordering is deterministic regardless of the solver's internal order.
pub fn symmetric_eigen3(a: &[[f64; 3]; 3]) -> Eigen3 {
    let m = Matrix3::new(
        a[0][0], a[0][1], a[0][2], a[1][0], a[1][1], a[1][2], a[2][0], a[2][1], a[2][2],
    );
    let eig = m.symmetric_eigen();

    let mut order: Vec<(f64, usize)> = eig
        .eigenvalues
        .iter()
        .cloned()
        .enumerate()
        .map(|(index, value)| (value, index))
        .collect();
    order.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut eigenvalues = [0.0; 3];
    let mut eigenvectors = [[0.0; 3]; 3];
    for (k, (value, index)) in order.iter().enumerate() {
        eigenvalues[k] = *value;
        let col = eig.eigenvectors.column(*index);
        eigenvectors[k] = [col[0], col[1], col[2]];
    }

    Eigen3 {
        eigenvalues,
        eigenvectors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_eigen3_diagonal() {
        let a = [[3.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 2.0]];
        let eig = symmetric_eigen3(&a);
        assert_relative_eq!(eig.eigenvalues()[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(eig.eigenvalues()[1], 2.0, epsilon = 1e-12);
        assert_relative_eq!(eig.eigenvalues()[2], 3.0, epsilon = 1e-12);
        // smallest eigenvalue pairs with the y axis
        assert_relative_eq!(eig.eigenvector(0)[1].abs(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_eigen3_satisfies_definition() {
        let a = [[4.0, 1.0, 0.5], [1.0, 3.0, -1.0], [0.5, -1.0, 2.0]];
        let eig = symmetric_eigen3(&a);
        for k in 0..3 {
            let v = eig.eigenvector(k);
            let av = crate::mat::mat3_mul_vec3(&a, v);
            let lambda = eig.eigenvalues()[k];
            for i in 0..3 {
                assert_relative_eq!(av[i], lambda * v[i], epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn test_eigen3_orthonormal_vectors() {
        let a = [[2.0, 1.0, 0.0], [1.0, 2.0, 1.0], [0.0, 1.0, 2.0]];
        let eig = symmetric_eigen3(&a);
        for i in 0..3 {
            for j in 0..3 {
                let dot: f64 = (0..3)
                    .map(|k| eig.eigenvector(i)[k] * eig.eigenvector(j)[k])
                    .sum();
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_relative_eq!(dot, expected, epsilon = 1e-10);
            }
        }
    }
}
