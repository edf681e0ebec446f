//! Numeric thresholds for the kernel.
//!
//! One immutable value, built once and passed by reference into every stage.
//! All tolerances are relative so results do not depend on the unit system
//! (nT/km vs T/m).

use crate::error::FoteError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_DEGENERACY_THRESHOLD: f64 = 0.25;
pub const DEFAULT_NEAR_ZERO_EIGENVALUE_TOLERANCE: f64 = 1e-6;
pub const DEFAULT_SINGULAR_TENSOR_TOLERANCE: f64 = 1e-10;
pub const DEFAULT_DEGENERATE_GEOMETRY_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FoteConfig {
    /// `min|λ| / max|λ|` below this relabels A/B as degenerating to X.
    pub degeneracy_threshold_radial: f64,

    /// `max|Re λ| / |Im λ|` below this relabels A_s/B_s as degenerating to O.
    pub degeneracy_threshold_spiral: f64,

    /// An eigenvalue (or an imaginary part) is zero when its magnitude is at
    /// most this fraction of the largest eigenvalue magnitude.
    pub near_zero_eigenvalue_tolerance: f64,

    /// `G` is singular when `|det G| <= tol * ‖G‖_F³`.
    pub singular_tensor_tolerance: f64,

    /// Minimum normalized scalar triple product of a vertex's edge vectors.
    pub degenerate_geometry_tolerance: f64,
}

impl Default for FoteConfig {
    fn default() -> Self {
        Self {
            degeneracy_threshold_radial: DEFAULT_DEGENERACY_THRESHOLD,
            degeneracy_threshold_spiral: DEFAULT_DEGENERACY_THRESHOLD,
            near_zero_eigenvalue_tolerance: DEFAULT_NEAR_ZERO_EIGENVALUE_TOLERANCE,
            singular_tensor_tolerance: DEFAULT_SINGULAR_TENSOR_TOLERANCE,
            degenerate_geometry_tolerance: DEFAULT_DEGENERATE_GEOMETRY_TOLERANCE,
        }
    }
}

impl FoteConfig {
    /// Check every field is finite and in range.
    pub fn validate(&self) -> Result<(), FoteError> {
        let thresholds = [
            ("degeneracy_threshold_radial", self.degeneracy_threshold_radial),
            ("degeneracy_threshold_spiral", self.degeneracy_threshold_spiral),
        ];
        for (name, value) in thresholds {
            if !value.is_finite() || value <= 0.0 || value > 1.0 {
                return Err(FoteError::InvalidConfig(format!(
                    "{name} must be in (0, 1], got {value}"
                )));
            }
        }

        let tolerances = [
            (
                "near_zero_eigenvalue_tolerance",
                self.near_zero_eigenvalue_tolerance,
            ),
            ("singular_tensor_tolerance", self.singular_tensor_tolerance),
            (
                "degenerate_geometry_tolerance",
                self.degenerate_geometry_tolerance,
            ),
        ];
        for (name, value) in tolerances {
            if !value.is_finite() || value < 0.0 {
                return Err(FoteError::InvalidConfig(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }
        Ok(())
    }
}
