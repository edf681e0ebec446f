//! The per-timestep pipeline: one [`Sample`] in, one [`NullRow`] out.
//!
//! ```text
//! Sample ─▶ geometry ─▶ gradient ─┬─▶ eigenvalues ─▶ classifier
//!                                 ├─▶ position solver ─▶ locality
//!                                 └─▶ reconstruction check
//! ```
//!
//! Pure: the same sample always produces a bit-identical row.

use crate::classify::{ClassificationResult, NullClassifier, NullType};
use crate::config::FoteConfig;
use crate::eigen::{EigenSpectrum, eigenvalues};
use crate::error::FoteError;
use crate::geometry::{ReciprocalBasis, Tetrahedron, compute_reciprocal_vectors};
use crate::gradient::{GradientTensor, estimate_gradient};
use crate::linalg::Vec3;
use crate::position::{NullLocality, NullPosition, NullPositionSolver};
use crate::reconstruction::max_reconstruction_error;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

/// Four simultaneous field and position measurements.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    #[serde(default)]
    pub time: f64,
    pub fields: [Vec3; 4],
    pub positions: [Vec3; 4],
}

impl Sample {
    pub fn new(time: f64, fields: [Vec3; 4], positions: [Vec3; 4]) -> Self {
        Self {
            time,
            fields,
            positions,
        }
    }

    pub fn tetrahedron(&self) -> Tetrahedron {
        Tetrahedron::new(self.positions)
    }
}

/// Everything derived from a sample with valid geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct NullEstimate {
    pub basis: ReciprocalBasis,
    pub tensor: GradientTensor,
    pub spectrum: EigenSpectrum,
    pub classification: Result<ClassificationResult, FoteError>,
    pub position: NullPosition,
    pub locality: Option<NullLocality>,
    pub max_reconstruction_error: f64,
}

/// One output row. NaN marks values that could not be computed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NullRow {
    pub time: f64,
    pub null_type: NullType,
    pub degeneracy_ratio: f64,
    pub eigenvalues: [Complex64; 3],
    pub null_position: Vec3,
    pub null_distance: f64,
    pub null_inside: bool,
    pub max_reconstruction_error: f64,
    pub div_over_curl: f64,
    /// Failure class for geometry or classification, if any.
    pub failure: Option<&'static str>,
    /// Failure class for the position solve, if any.
    pub position_failure: Option<&'static str>,
}

impl NullRow {
    /// Sentinel row for a timestep whose geometry could not be used.
    pub fn sentinel(time: f64, failure: &FoteError) -> Self {
        let nan = Complex64::new(f64::NAN, f64::NAN);
        Self {
            time,
            null_type: NullType::Undetermined,
            degeneracy_ratio: f64::NAN,
            eigenvalues: [nan; 3],
            null_position: [f64::NAN; 3],
            null_distance: f64::NAN,
            null_inside: false,
            max_reconstruction_error: f64::NAN,
            div_over_curl: f64::NAN,
            failure: Some(failure.failure_class()),
            position_failure: Some(failure.failure_class()),
        }
    }

    /// Bit patterns of every numeric field, in a fixed order.
    ///
    /// Feeds content digests; two rows are bit-identical exactly when these
    /// words are.
    pub fn canonical_words(&self) -> Vec<u64> {
        let mut words = vec![self.time.to_bits(), u64::from(self.null_type.code())];
        words.push(self.degeneracy_ratio.to_bits());
        for z in &self.eigenvalues {
            words.push(z.re.to_bits());
            words.push(z.im.to_bits());
        }
        words.extend(self.null_position.iter().map(|x| x.to_bits()));
        words.push(self.null_distance.to_bits());
        words.push(u64::from(self.null_inside));
        words.push(self.max_reconstruction_error.to_bits());
        words.push(self.div_over_curl.to_bits());
        words
    }
}

/// Kernel entry point holding the immutable configuration.
#[derive(Debug, Clone, Copy)]
pub struct FoteEngine {
    config: FoteConfig,
    classifier: NullClassifier,
    solver: NullPositionSolver,
}

impl FoteEngine {
    pub fn new(config: FoteConfig) -> Result<Self, FoteError> {
        config.validate()?;
        Ok(Self {
            config,
            classifier: NullClassifier::new(config),
            solver: NullPositionSolver::new(config.singular_tensor_tolerance),
        })
    }

    pub fn config(&self) -> &FoteConfig {
        &self.config
    }

    pub fn classifier(&self) -> &NullClassifier {
        &self.classifier
    }

    /// Run every stage, failing only when no gradient can be estimated.
    pub fn analyze(&self, sample: &Sample) -> Result<NullEstimate, FoteError> {
        if sample.fields.iter().flatten().any(|x| !x.is_finite()) {
            return Err(FoteError::NonFinite("probe field".to_string()));
        }

        let tetra = sample.tetrahedron().local_frame();
        let basis = compute_reciprocal_vectors(&tetra, self.config.degenerate_geometry_tolerance)?;
        let tensor = estimate_gradient(&sample.fields, &basis);
        let spectrum = eigenvalues(&tensor.g);
        let classification = self.classifier.classify(&spectrum);
        // A 2-D null lies on an invariant line; it has no unique position.
        let planar = matches!(
            classification,
            Ok(ClassificationResult {
                null_type: NullType::X | NullType::O,
                ..
            })
        );
        let position = if planar {
            NullPosition::Undetermined
        } else {
            self.solver.solve(&tensor)
        };
        let locality = position
            .offset()
            .map(|offset| NullLocality::new(&offset, &basis, tetra.mean_separation()));
        let max_reconstruction_error = max_reconstruction_error(
            &sample.fields,
            &tetra.vertices,
            &tensor.raw,
            &tensor.b_bary,
            &tetra.barycenter(),
        );

        Ok(NullEstimate {
            basis,
            tensor,
            spectrum,
            classification,
            position,
            locality,
            max_reconstruction_error,
        })
    }

    /// Run the pipeline and flatten the outcome into an output row.
    pub fn row(&self, sample: &Sample) -> NullRow {
        let estimate = match self.analyze(sample) {
            Ok(estimate) => estimate,
            Err(err) => return NullRow::sentinel(sample.time, &err),
        };

        let (null_type, degeneracy_ratio, failure) = match &estimate.classification {
            Ok(result) => (result.null_type, result.ratio, None),
            Err(err) => (NullType::Undetermined, f64::NAN, Some(err.failure_class())),
        };
        let position_failure = match estimate.position {
            NullPosition::Located { .. } => None,
            NullPosition::Undetermined => Some(crate::error::failure_class::SINGULAR_TENSOR),
        };

        NullRow {
            time: sample.time,
            null_type,
            degeneracy_ratio,
            eigenvalues: estimate.spectrum.values,
            null_position: estimate.position.offset_or_nan(),
            null_distance: estimate.locality.map_or(f64::NAN, |l| l.distance),
            null_inside: estimate.locality.is_some_and(|l| l.inside_tetrahedron),
            max_reconstruction_error: estimate.max_reconstruction_error,
            div_over_curl: estimate.tensor.div_over_curl(),
            failure,
            position_failure,
        }
    }
}

impl Default for FoteEngine {
    fn default() -> Self {
        let config = FoteConfig::default();
        Self {
            config,
            classifier: NullClassifier::new(config),
            solver: NullPositionSolver::new(config.singular_tensor_tolerance),
        }
    }
}
