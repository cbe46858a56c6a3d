use crate::affine::AffineTransform;
use crate::cpd::{align_cpd_rigid, CpdParams};
use crate::error::RegistrationError;
use pointreg_3d::PointCloud;

/// Registration algorithm selector.
///
/// The three aligners are variants of one tagged union so the dispatch is
/// a pattern match; only CPD carries parameters.
#[derive(Debug, Clone)]
pub enum Method {
    /// Centre-of-mass translation.
    Com,
    /// Principal-component alignment.
    Pca,
    /// Rigid Coherent Point Drift with its parameters.
    CpdRigid(CpdParams),
}

impl Method {
    /// Parse a method name, case-insensitively and with prefix tolerance:
    /// `co`/`com`, `p`/`pc`/`pca`, and `cp`/`cpd` (also accepted under its
    /// driver alias `rigid`). A bare `c` is ambiguous between `com` and
    /// `cpd` and is rejected. CPD parses with default parameters; callers
    /// adjust the embedded [`CpdParams`] afterwards.
    pub fn parse(name: &str) -> Result<Self, RegistrationError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "co" | "com" => Ok(Method::Com),
            "p" | "pc" | "pca" => Ok(Method::Pca),
            "cp" | "cpd" | "rigid" => Ok(Method::CpdRigid(CpdParams::default())),
            _ => Err(RegistrationError::UnknownMethod {
                given: name.trim().to_string(),
            }),
        }
    }
}

/// Compute the transform aligning `moving` onto `stationary` with the
/// selected method. Neither cloud is modified; applying the transform is
/// the caller's step.
pub fn align(
    stationary: &PointCloud,
    moving: &PointCloud,
    method: &Method,
) -> Result<AffineTransform, RegistrationError> {
    match method {
        Method::Com => crate::com::align_com(stationary, moving),
        Method::Pca => crate::pca::align_pca(stationary, moving),
        Method::CpdRigid(params) => align_cpd_rigid(stationary, moving, params),
    }
}
