//! Error types for FOTE kernel operations.
//!
//! Every variant is recoverable per timestep; the pipeline turns each one
//! into a sentinel output row and keeps going.

/// Errors arising while estimating or classifying one four-point sample.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FoteError {
    /// The tetrahedron is (nearly) coplanar at the given vertex.
    #[error(
        "degenerate geometry at vertex {vertex}: normalized volume {normalized_volume:e} below tolerance"
    )]
    DegenerateGeometry {
        vertex: usize,
        normalized_volume: f64,
    },

    /// The eigenvalue signs contradict a divergence-free Jacobian.
    #[error("inconsistent eigen spectrum: {description}")]
    InconsistentEigenSpectrum { description: String },

    /// The eigenvalue pattern is outside the ten-way taxonomy.
    #[error("unclassifiable spectrum: {description}")]
    UnclassifiableSpectrum { description: String },

    /// The Jacobian cannot be inverted to locate the null.
    #[error("singular tensor: |det| = {determinant:e}")]
    SingularTensor { determinant: f64 },

    /// Input contained NaN or infinite components.
    #[error("non-finite input: {0}")]
    NonFinite(String),

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl FoteError {
    /// Stable snake_case identifier used in log records and JSON output.
    pub fn failure_class(&self) -> &'static str {
        match self {
            Self::DegenerateGeometry { .. } => failure_class::DEGENERATE_GEOMETRY,
            Self::InconsistentEigenSpectrum { .. } => failure_class::INCONSISTENT_EIGEN_SPECTRUM,
            Self::UnclassifiableSpectrum { .. } => failure_class::UNCLASSIFIABLE_SPECTRUM,
            Self::SingularTensor { .. } => failure_class::SINGULAR_TENSOR,
            Self::NonFinite(_) => failure_class::NON_FINITE_INPUT,
            Self::InvalidConfig(_) => failure_class::INVALID_CONFIG,
        }
    }
}

pub mod failure_class {
    pub const DEGENERATE_GEOMETRY: &str = "degenerate_geometry";
    pub const INCONSISTENT_EIGEN_SPECTRUM: &str = "inconsistent_eigen_spectrum";
    pub const UNCLASSIFIABLE_SPECTRUM: &str = "unclassifiable_spectrum";
    pub const SINGULAR_TENSOR: &str = "singular_tensor";
    pub const NON_FINITE_INPUT: &str = "non_finite_input";
    pub const INVALID_CONFIG: &str = "invalid_config";
}
