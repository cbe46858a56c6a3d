use crate::mat::{faer_to_mat3, mat3_identity, mat3_to_faer};

/// Result of the 3x3 singular value decomposition A = U * diag(S) * V^T.
///
/// Singular values are non-negative and sorted in descending order.
#[derive(Debug, Clone)]
pub struct Svd3 {
    /// Left singular vectors as matrix columns.
    u: [[f64; 3]; 3],

    /// Singular values, descending.
    s: [f64; 3],

    /// Right singular vectors as matrix columns.
    v: [[f64; 3]; 3],
}

impl Svd3 {
    /// Get the left singular vectors matrix.
    #[inline]
    pub fn u(&self) -> &[[f64; 3]; 3] {
        &self.u
    }

    /// Get the singular values.
    #[inline]
    pub fn s(&self) -> &[f64; 3] {
        &self.s
    }

    /// Get the right singular vectors matrix.
    #[inline]
    pub fn v(&self) -> &[[f64; 3]; 3] {
        &self.v
    }
}

/// Singular value decomposition of a 3x3 matrix.
///
/// The zero matrix yields identity factors with zero singular values so
/// downstream rotation extraction never sees NaN.
pub fn svd3(a: &[[f64; 3]; 3]) -> Svd3 {
    let norm_sq: f64 = a.iter().flatten().map(|v| v * v).sum();
    if norm_sq == 0.0 {
        return Svd3 {
            u: mat3_identity(),
            s: [0.0; 3],
            v: mat3_identity(),
        };
    }

    let m = mat3_to_faer(a);
    let svd = m.svd();

    let sd = svd.s_diagonal();
    Svd3 {
        u: faer_to_mat3(svd.u()),
        s: [sd.read(0), sd.read(1), sd.read(2)],
        v: faer_to_mat3(svd.v()),
    }
}
