//! Linear gradient (Jacobian) estimate from four field samples.
//!
//! `G = Σ_i B_i ⊗ k_i`, so `G[a][b] = ∂B_a/∂x_b` and `G · δr` is the
//! first-order field change over `δr`. The divergence-cleaned tensor has
//! `trace(G)/3` removed from its diagonal.

use crate::geometry::ReciprocalBasis;
use crate::linalg::{Mat3, Vec3, mat_add, mean4, norm, outer, trace};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientTensor {
    /// Divergence-cleaned Jacobian; traceless up to round-off.
    pub g: Mat3,

    /// Jacobian as estimated, before cleaning.
    pub raw: Mat3,

    /// Field at the barycenter (mean of the four samples).
    pub b_bary: Vec3,
}

impl GradientTensor {
    /// `∇·B` of the raw estimate.
    pub fn divergence(&self) -> f64 {
        trace(&self.raw)
    }

    /// `∇×B` of the raw estimate.
    pub fn curl(&self) -> Vec3 {
        let m = &self.raw;
        [m[2][1] - m[1][2], m[0][2] - m[2][0], m[1][0] - m[0][1]]
    }

    /// Curlometer quality `|∇·B| / |∇×B|`; NaN when the curl vanishes.
    pub fn div_over_curl(&self) -> f64 {
        let curl = norm(&self.curl());
        if curl > 0.0 {
            self.divergence().abs() / curl
        } else {
            f64::NAN
        }
    }
}

/// Estimate the Jacobian at the barycenter.
pub fn estimate_gradient(fields: &[Vec3; 4], basis: &ReciprocalBasis) -> GradientTensor {
    let mut raw = [[0.0; 3]; 3];
    for (b, k) in fields.iter().zip(basis.k.iter()) {
        raw = mat_add(&raw, &outer(b, k));
    }

    let correction = trace(&raw) / 3.0;
    let mut g = raw;
    for (d, row) in g.iter_mut().enumerate() {
        row[d] -= correction;
    }

    GradientTensor {
        g,
        raw,
        b_bary: mean4(fields),
    }
}
