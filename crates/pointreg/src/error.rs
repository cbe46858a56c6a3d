/// Error type for the registration boundary.
///
/// Failures propagate to the caller; the aligners never recover
/// internally (a failed PCA is not downgraded to COM).
#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    /// An input point cloud contains no points.
    #[error("point cloud contains no points")]
    EmptyPointSet,

    /// A selector resolved to the wrong number of clouds.
    #[error("selection '{selector}' resolved to {count} point clouds")]
    InvalidSelection {
        /// The selector as given.
        selector: String,
        /// How many clouds it resolved to.
        count: usize,
    },

    /// Attempt to write the fixed bottom row of an affine transform.
    #[error("coefficient ({i}, {j}) is fixed and cannot be written")]
    InvalidCoefficient {
        /// Column index of the attempted write.
        i: usize,
        /// Row index of the attempted write.
        j: usize,
    },

    /// Applying a transform produced a non-unit homogeneous weight.
    #[error("transform is not affine: homogeneous weight {w} differs from 1")]
    NotAffine {
        /// The weight that was produced.
        w: f64,
    },

    /// The point covariance is rank deficient, so the principal axes are
    /// not uniquely defined.
    #[error("point covariance is rank deficient; principal axes are undefined")]
    DegeneratePca,

    /// The singular value decomposition failed to produce usable factors.
    #[error("singular value decomposition failed")]
    DegenerateSvd,

    /// The CPD outlier weight lies outside [0, 1).
    #[error("outlier weight {w} is outside [0, 1)")]
    InvalidOutlierWeight {
        /// The weight that was given.
        w: f64,
    },

    /// The sigma-squared override is not a positive finite number.
    #[error("sigma-squared override {value} must be finite and positive")]
    InvalidSigmaSquared {
        /// The override that was given.
        value: f64,
    },

    /// An input coordinate or a derived quantity is NaN or infinite.
    #[error("input contains non-finite coordinates")]
    NonFinite,

    /// The method name does not match any aligner.
    #[error("unknown registration method '{given}'")]
    UnknownMethod {
        /// The method name as given.
        given: String,
    },
}
