//! Null position from the linearized field.
//!
//! Setting `B(r) ≈ B_bary + G · Δr` to zero gives `G · Δr = −B_bary`.
//! A 2-D null has `det G ≈ 0` and extends along a line, so no unique
//! position exists; those cases come back as [`NullPosition::Undetermined`].

use crate::error::FoteError;
use crate::geometry::ReciprocalBasis;
use crate::gradient::GradientTensor;
use crate::linalg::{Vec3, determinant, frobenius_norm, lu_solve, norm, scale};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NullPosition {
    /// Offset of the null from the barycenter.
    Located { offset: Vec3 },
    Undetermined,
}

impl NullPosition {
    pub fn offset(&self) -> Option<Vec3> {
        match self {
            Self::Located { offset } => Some(*offset),
            Self::Undetermined => None,
        }
    }

    /// Offset, or NaN in every component when undetermined.
    pub fn offset_or_nan(&self) -> Vec3 {
        self.offset().unwrap_or([f64::NAN; 3])
    }
}

/// Where a located null sits relative to the tetrahedron.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NullLocality {
    /// `|Δr|`.
    pub distance: f64,
    /// `|Δr|` over the mean inter-probe separation.
    pub relative_distance: f64,
    /// All four barycentric coordinates lie in `[0, 1]`.
    pub inside_tetrahedron: bool,
}

impl NullLocality {
    pub fn new(offset: &Vec3, basis: &ReciprocalBasis, mean_separation: f64) -> Self {
        let distance = norm(offset);
        let inside_tetrahedron = basis
            .barycentric(offset)
            .iter()
            .all(|l| (0.0..=1.0).contains(l));
        Self {
            distance,
            relative_distance: distance / mean_separation,
            inside_tetrahedron,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct NullPositionSolver {
    singular_tolerance: f64,
}

impl NullPositionSolver {
    pub fn new(singular_tolerance: f64) -> Self {
        Self { singular_tolerance }
    }

    /// Solve for `Δr`, failing with [`FoteError::SingularTensor`] when `G`
    /// is numerically singular.
    pub fn try_solve(&self, tensor: &GradientTensor) -> Result<Vec3, FoteError> {
        let g = &tensor.g;
        let det = determinant(g);
        let magnitude = frobenius_norm(g);
        if det.abs() <= self.singular_tolerance * magnitude.powi(3) || magnitude == 0.0 {
            return Err(FoteError::SingularTensor { determinant: det });
        }

        let rhs = scale(&tensor.b_bary, -1.0);
        let offset = lu_solve(g, &rhs).ok_or(FoteError::SingularTensor { determinant: det })?;
        if offset.iter().any(|x| !x.is_finite()) {
            return Err(FoteError::SingularTensor { determinant: det });
        }
        Ok(offset)
    }

    /// Solve for `Δr`, mapping a singular `G` to `Undetermined`.
    pub fn solve(&self, tensor: &GradientTensor) -> NullPosition {
        match self.try_solve(tensor) {
            Ok(offset) => NullPosition::Located { offset },
            Err(_) => NullPosition::Undetermined,
        }
    }
}
