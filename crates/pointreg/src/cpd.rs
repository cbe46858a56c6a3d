use std::time::Instant;

use log::debug;

use crate::affine::AffineTransform;
use crate::error::RegistrationError;
use pointreg_3d::{linalg::transform_points3d, ops, PointCloud};
use pointreg_linalg::{
    mat3_identity, mat3_mul, mat3_mul_vec3, mat3_transpose, svd3, RunningSum,
};

// Lower bound keeping sigma-squared strictly positive between iterations.
const SIGMA_SQUARED_FLOOR: f64 = 1e-10;

// Dimensionality of the point space.
const DIM: f64 = 3.0;

/// Configuration for the rigid CPD aligner.
#[derive(Debug, Clone)]
pub struct CpdParams {
    /// Ceiling on EM iterations.
    pub max_iterations: usize,

    /// Convergence threshold on the change of σ² between iterations.
    pub tolerance: f64,

    /// Probability mass in [0, 1) assigned to the uniform noise component
    /// that absorbs outliers.
    pub w: f64,

    /// Override for the initial σ²; estimated from the data when `None`.
    pub sigma_squared_init: Option<f64>,
}

impl Default for CpdParams {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            tolerance: 1e-10,
            w: 0.0,
            sigma_squared_init: None,
        }
    }
}

/// Telemetry handed to the per-iteration observer after each M-step.
#[derive(Debug)]
pub struct CpdIteration<'a> {
    /// Zero-based EM iteration index.
    pub iteration: usize,
    /// Current rotation estimate.
    pub rotation: &'a [[f64; 3]; 3],
    /// Current translation estimate.
    pub translation: &'a [f64; 3],
    /// σ² after this iteration's M-step.
    pub sigma_squared: f64,
}

/// Observer verdict controlling the EM loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpdFlow {
    /// Keep iterating.
    Continue,
    /// Terminate cleanly with the last computed transform.
    Stop,
}

/// Rigid Coherent Point Drift alignment (Myronenko & Song).
///
/// Treats the moving cloud as Gaussian mixture centroids drawn by the
/// stationary cloud and alternates posterior estimation with a
/// closed-form rigid update until σ² stops changing or the iteration
/// budget is exhausted; exhaustion returns the last transform as a
/// success. Scale is fixed at 1.
pub fn align_cpd_rigid(
    stationary: &PointCloud,
    moving: &PointCloud,
    params: &CpdParams,
) -> Result<AffineTransform, RegistrationError> {
    run_cpd_rigid(stationary, moving, params, None)
}

/// Rigid CPD with a per-iteration observer.
///
/// The observer is invoked after each M-step with the iteration telemetry
/// and may return [`CpdFlow::Stop`] to terminate cleanly with the last
/// computed transform; it cannot mutate the EM state.
pub fn align_cpd_rigid_observed(
    stationary: &PointCloud,
    moving: &PointCloud,
    params: &CpdParams,
    observer: &mut dyn FnMut(CpdIteration<'_>) -> CpdFlow,
) -> Result<AffineTransform, RegistrationError> {
    run_cpd_rigid(stationary, moving, params, Some(observer))
}

fn run_cpd_rigid(
    stationary: &PointCloud,
    moving: &PointCloud,
    params: &CpdParams,
    mut observer: Option<&mut dyn FnMut(CpdIteration<'_>) -> CpdFlow>,
) -> Result<AffineTransform, RegistrationError> {
    if stationary.is_empty() || moving.is_empty() {
        return Err(RegistrationError::EmptyPointSet);
    }
    if !(0.0..1.0).contains(&params.w) {
        return Err(RegistrationError::InvalidOutlierWeight { w: params.w });
    }
    if !stationary.is_finite() || !moving.is_finite() {
        return Err(RegistrationError::NonFinite);
    }
    if let Some(value) = params.sigma_squared_init {
        if !value.is_finite() || value <= 0.0 {
            return Err(RegistrationError::InvalidSigmaSquared { value });
        }
    }

    let x = stationary.points();
    let y = moving.points();
    let (n, m) = (x.len(), y.len());

    let mut sigma_squared = params
        .sigma_squared_init
        .unwrap_or_else(|| initial_sigma_squared(x, y))
        .max(SIGMA_SQUARED_FLOOR);

    let mut rotation = mat3_identity();
    let mut translation = [0.0; 3];

    let mut aligned_y = vec![[0.0; 3]; m];
    let mut posterior = faer::Mat::<f64>::zeros(m, n);

    for iteration in 0..params.max_iterations {
        let now = Instant::now();

        transform_points3d(y, &rotation, &translation, &mut aligned_y);
        e_step(x, &aligned_y, sigma_squared, params.w, &mut posterior);

        let update = m_step(x, y, posterior.as_ref())?;
        rotation = update.rotation;
        translation = update.translation;

        let sigma_delta = (update.sigma_squared - sigma_squared).abs();
        sigma_squared = update.sigma_squared;

        debug!(
            "iteration {iteration}: sigma_squared = {sigma_squared:.6e}, elapsed: {:?}",
            now.elapsed()
        );

        if let Some(obs) = observer.as_mut() {
            let flow = obs(CpdIteration {
                iteration,
                rotation: &rotation,
                translation: &translation,
                sigma_squared,
            });
            if flow == CpdFlow::Stop {
                debug!("observer requested stop at iteration {iteration}");
                break;
            }
        }

        if sigma_delta <= params.tolerance || sigma_squared <= SIGMA_SQUARED_FLOOR {
            debug!("converged after {} iterations", iteration + 1);
            break;
        }
    }

    Ok(AffineTransform::from_rotation_translation(
        &rotation,
        &translation,
    ))
}

/// Mean pairwise squared distance divided by the dimensionality.
fn initial_sigma_squared(x: &[[f64; 3]], y: &[[f64; 3]]) -> f64 {
    let mut rs = RunningSum::new();
    for xn in x {
        for ym in y {
            rs.digest(ops::squared_distance(xn, ym));
        }
    }
    rs.current_sum() / (x.len() as f64 * y.len() as f64 * DIM)
}

/// Posterior estimation.
///
/// Fills the M×N matrix P(m, n) = exp(−‖xₙ − ŷₘ‖²/(2σ²)) normalised per
/// column over the mixture plus the uniform noise constant
/// c = (2πσ²)^(D/2) · w/(1−w) · M/N. The per-column maximum exponent is
/// subtracted before exponentiation and the constant is folded in through
/// log-space, so small σ² cannot underflow a whole column to zero.
fn e_step(
    x: &[[f64; 3]],
    aligned_y: &[[f64; 3]],
    sigma_squared: f64,
    w: f64,
    posterior: &mut faer::Mat<f64>,
) {
    let (n, m) = (x.len(), aligned_y.len());
    let inv_two_sigma = 1.0 / (2.0 * sigma_squared);

    let ln_noise = if w > 0.0 {
        let c = (2.0 * std::f64::consts::PI * sigma_squared).powf(DIM / 2.0)
            * (w / (1.0 - w))
            * (m as f64 / n as f64);
        Some(c.ln())
    } else {
        None
    };

    let mut exponents = vec![0.0; m];
    for (col, xn) in x.iter().enumerate() {
        let mut max_exponent = f64::NEG_INFINITY;
        for (row, ym) in aligned_y.iter().enumerate() {
            let e = -ops::squared_distance(xn, ym) * inv_two_sigma;
            exponents[row] = e;
            if e > max_exponent {
                max_exponent = e;
            }
        }

        let shifted_sum: f64 = exponents.iter().map(|e| (e - max_exponent).exp()).sum();
        let mut ln_denominator = max_exponent + shifted_sum.ln();
        if let Some(ln_noise) = ln_noise {
            ln_denominator = log_add_exp(ln_denominator, ln_noise);
        }

        for (row, e) in exponents.iter().enumerate() {
            posterior.write(row, col, (e - ln_denominator).exp());
        }
    }
}

fn log_add_exp(a: f64, b: f64) -> f64 {
    let hi = a.max(b);
    let lo = a.min(b);
    hi + (lo - hi).exp().ln_1p()
}

struct RigidUpdate {
    rotation: [[f64; 3]; 3],
    translation: [f64; 3],
    sigma_squared: f64,
}

/// Closed-form rigid update from the current posterior.
///
/// Weighted centroids, 3×3 cross-covariance of the centred clouds, SVD
/// rotation with the determinant corrected to +1, and the σ² trace
/// identity clamped to the positive floor.
fn m_step(
    x: &[[f64; 3]],
    y: &[[f64; 3]],
    posterior: faer::MatRef<'_, f64>,
) -> Result<RigidUpdate, RegistrationError> {
    let (n, m) = (x.len(), y.len());

    // posterior mass per moving point (P·1) and per stationary point (Pᵀ·1)
    let mut row_sums = vec![0.0; m];
    let mut col_sums = vec![0.0; n];
    let mut np = 0.0;
    for row in 0..m {
        for col in 0..n {
            let p = posterior.read(row, col);
            row_sums[row] += p;
            col_sums[col] += p;
            np += p;
        }
    }
    if !np.is_finite() || np <= f64::MIN_POSITIVE {
        return Err(RegistrationError::NonFinite);
    }

    let mut mu_x = [0.0; 3];
    for (xn, weight) in x.iter().zip(col_sums.iter()) {
        for k in 0..3 {
            mu_x[k] += xn[k] * weight;
        }
    }
    let mut mu_y = [0.0; 3];
    for (ym, weight) in y.iter().zip(row_sums.iter()) {
        for k in 0..3 {
            mu_y[k] += ym[k] * weight;
        }
    }
    for k in 0..3 {
        mu_x[k] /= np;
        mu_y[k] /= np;
    }

    let mut x_hat = vec![[0.0; 3]; n];
    ops::center_points(x, &mu_x, &mut x_hat);
    let mut y_hat = vec![[0.0; 3]; m];
    ops::center_points(y, &mu_y, &mut y_hat);

    // cross-covariance A = X̂ᵀ Pᵀ Ŷ
    let mut a = [[0.0; 3]; 3];
    for (row, yh) in y_hat.iter().enumerate() {
        for (col, xh) in x_hat.iter().enumerate() {
            let p = posterior.read(row, col);
            if p == 0.0 {
                continue;
            }
            for i in 0..3 {
                for j in 0..3 {
                    a[i][j] += p * xh[i] * yh[j];
                }
            }
        }
    }

    // R = U · diag(1, 1, det(U·Vᵀ)) · Vᵀ, so det(R) = +1
    let svd = svd3(&a);
    let uvt = mat3_mul(svd.u(), &mat3_transpose(svd.v()));
    let sign = if pointreg_linalg::mat3_det(&uvt) < 0.0 {
        -1.0
    } else {
        1.0
    };
    let mut vt = mat3_transpose(svd.v());
    for val in vt[2].iter_mut() {
        *val *= sign;
    }
    let rotation = mat3_mul(svd.u(), &vt);
    if rotation.iter().flatten().any(|v| !v.is_finite()) {
        return Err(RegistrationError::DegenerateSvd);
    }

    let r_mu_y = mat3_mul_vec3(&rotation, &mu_y);
    let translation = [mu_x[0] - r_mu_y[0], mu_x[1] - r_mu_y[1], mu_x[2] - r_mu_y[2]];

    // σ² = (tr(X̂ᵀ diag(Pᵀ1) X̂) − tr(Aᵀ R)) / (Np · D)
    let mut weighted_norm = 0.0;
    for (xh, weight) in x_hat.iter().zip(col_sums.iter()) {
        weighted_norm += weight * (xh[0] * xh[0] + xh[1] * xh[1] + xh[2] * xh[2]);
    }
    let mut trace_ar = 0.0;
    for i in 0..3 {
        for j in 0..3 {
            trace_ar += a[i][j] * rotation[i][j];
        }
    }
    let sigma_squared = ((weighted_norm - trace_ar) / (np * DIM)).max(SIGMA_SQUARED_FLOOR);
    if !sigma_squared.is_finite() {
        return Err(RegistrationError::NonFinite);
    }

    Ok(RigidUpdate {
        rotation,
        translation,
        sigma_squared,
    })
}
