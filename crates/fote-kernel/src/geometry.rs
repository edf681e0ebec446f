//! Tetrahedron reciprocal vectors.
//!
//! For vertex `i` with the other three vertices `j, l, m` taken in cyclic
//! order `(i+1, i+2, i+3) mod 4`:
//!
//! ```text
//! k_i = (R_l − R_j) × (R_m − R_j) / [ (R_i − R_j) · ((R_l − R_j) × (R_m − R_j)) ]
//! ```
//!
//! The reciprocal vectors satisfy `Σ_i k_i = 0` and
//! `Σ_i k_i ⊗ (R_i − R_bary) = I`, which is what makes the four-point
//! linear gradient estimate exact at the vertices.

use crate::error::FoteError;
use crate::linalg::{Vec3, add, cross, dot, mean4, norm, scale, sub};
use serde::{Deserialize, Serialize};

/// The four probe positions of one sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tetrahedron {
    pub vertices: [Vec3; 4],
}

impl Tetrahedron {
    pub fn new(vertices: [Vec3; 4]) -> Self {
        Self { vertices }
    }

    /// The same tetrahedron with `origin` moved to zero.
    pub fn translated(&self, origin: &Vec3) -> Self {
        Self::new(self.vertices.map(|v| sub(&v, origin)))
    }

    /// Translate so vertex 0 sits at the origin.
    ///
    /// Spacecraft positions are large (10⁴–10⁵ km) next to their
    /// separations; working in this frame keeps the barycenter offsets
    /// free of cancellation.
    pub fn local_frame(&self) -> Self {
        self.translated(&self.vertices[0])
    }

    pub fn barycenter(&self) -> Vec3 {
        mean4(&self.vertices)
    }

    /// Mean of the six inter-vertex distances.
    pub fn mean_separation(&self) -> f64 {
        let mut total = 0.0;
        for i in 0..4 {
            for j in (i + 1)..4 {
                total += norm(&sub(&self.vertices[i], &self.vertices[j]));
            }
        }
        total / 6.0
    }
}

/// The four reciprocal vectors `k_0..k_3` of a tetrahedron.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReciprocalBasis {
    pub k: [Vec3; 4],
}

impl ReciprocalBasis {
    /// Barycentric coordinates of `barycenter + offset`.
    ///
    /// `λ_i = 1/4 + k_i · offset`; the point is inside the tetrahedron when
    /// every coordinate lies in `[0, 1]`.
    pub fn barycentric(&self, offset: &Vec3) -> [f64; 4] {
        let mut lambda = [0.0; 4];
        for (l, k) in lambda.iter_mut().zip(self.k.iter()) {
            *l = 0.25 + dot(k, offset);
        }
        lambda
    }

    /// Sum of the four vectors; zero up to round-off for a valid basis.
    pub fn closure(&self) -> Vec3 {
        self.k.iter().fold([0.0; 3], |acc, k| add(&acc, k))
    }
}

/// Compute the reciprocal vectors of `tetra`.
///
/// `tolerance` bounds the normalized scalar triple product
/// `|a · (b × c)| / (|a| |b| |c|)` at each vertex, a dimensionless volume
/// measure in `[0, 1]` (1 for orthogonal edges, 0 for coplanar vertices).
pub fn compute_reciprocal_vectors(
    tetra: &Tetrahedron,
    tolerance: f64,
) -> Result<ReciprocalBasis, FoteError> {
    let r = &tetra.vertices;
    if r.iter().flatten().any(|x| !x.is_finite()) {
        return Err(FoteError::NonFinite("probe position".to_string()));
    }

    let mut k = [[0.0; 3]; 4];
    for (i, k_i) in k.iter_mut().enumerate() {
        let j = (i + 1) % 4;
        let l = (i + 2) % 4;
        let m = (i + 3) % 4;

        let a = sub(&r[i], &r[j]);
        let b = sub(&r[l], &r[j]);
        let c = sub(&r[m], &r[j]);
        let n = cross(&b, &c);
        let denom = dot(&a, &n);

        let edge_product = norm(&a) * norm(&b) * norm(&c);
        let normalized_volume = if edge_product > 0.0 {
            denom.abs() / edge_product
        } else {
            0.0
        };
        if normalized_volume <= tolerance {
            return Err(FoteError::DegenerateGeometry {
                vertex: i,
                normalized_volume,
            });
        }

        *k_i = scale(&n, 1.0 / denom);
    }

    Ok(ReciprocalBasis { k })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linalg::outer;
    use approx::assert_abs_diff_eq;

    fn regular_tetrahedron() -> Tetrahedron {
        Tetrahedron::new([
            [1.0, 1.0, 1.0],
            [1.0, -1.0, -1.0],
            [-1.0, 1.0, -1.0],
            [-1.0, -1.0, 1.0],
        ])
    }

    #[test]
    fn reciprocal_vectors_are_dual_to_edges() {
        let tetra = Tetrahedron::new([
            [10.0, 3.0, -2.0],
            [25.0, 1.0, 4.0],
            [12.0, 18.0, 0.5],
            [14.0, 6.0, 20.0],
        ]);
        let basis = compute_reciprocal_vectors(&tetra, 1e-6).unwrap();
        let bary = tetra.barycenter();

        let closure = basis.closure();
        for c in closure {
            assert_abs_diff_eq!(c, 0.0, epsilon = 1e-12);
        }

        // Σ k_i ⊗ (R_i − R_bary) = I
        let mut m = [[0.0; 3]; 3];
        for (k, v) in basis.k.iter().zip(tetra.vertices.iter()) {
            let o = outer(k, &sub(v, &bary));
            for r in 0..3 {
                for c in 0..3 {
                    m[r][c] += o[r][c];
                }
            }
        }
        for r in 0..3 {
            for c in 0..3 {
                let want = if r == c { 1.0 } else { 0.0 };
                assert_abs_diff_eq!(m[c][r], want, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn k_i_is_orthogonal_to_opposite_face() {
        let tetra = regular_tetrahedron();
        let basis = compute_reciprocal_vectors(&tetra, 1e-6).unwrap();
        let v = &tetra.vertices;
        // k_0 is normal to the face (1, 2, 3).
        assert_abs_diff_eq!(dot(&basis.k[0], &sub(&v[2], &v[1])), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(dot(&basis.k[0], &sub(&v[3], &v[1])), 0.0, epsilon = 1e-12);
        // and k_0 · (R_0 − R_1) = 1.
        assert_abs_diff_eq!(dot(&basis.k[0], &sub(&v[0], &v[1])), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn coplanar_vertices_are_degenerate() {
        let tetra = Tetrahedron::new([
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [1.0, 1.0, 1e-9],
        ]);
        let err = compute_reciprocal_vectors(&tetra, 1e-6).unwrap_err();
        assert!(matches!(err, FoteError::DegenerateGeometry { .. }));
        assert_eq!(err.failure_class(), "degenerate_geometry");
    }

    #[test]
    fn coincident_vertices_are_degenerate() {
        let tetra = Tetrahedron::new([
            [0.0, 0.0, 0.0],
            [0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
        ]);
        assert!(compute_reciprocal_vectors(&tetra, 1e-6).is_err());
    }

    #[test]
    fn non_finite_position_is_rejected() {
        let mut tetra = regular_tetrahedron();
        tetra.vertices[2][1] = f64::NAN;
        let err = compute_reciprocal_vectors(&tetra, 1e-6).unwrap_err();
        assert_eq!(err.failure_class(), "non_finite_input");
    }

    #[test]
    fn barycenter_has_uniform_barycentric_coordinates() {
        let tetra = regular_tetrahedron();
        let basis = compute_reciprocal_vectors(&tetra, 1e-6).unwrap();
        for l in basis.barycentric(&[0.0; 3]) {
            assert_abs_diff_eq!(l, 0.25, epsilon = 1e-12);
        }
        let outside = basis.barycentric(&[10.0, 0.0, 0.0]);
        assert!(outside.iter().any(|l| *l < 0.0));
    }

    #[test]
    fn local_frame_preserves_reciprocal_vectors() {
        let far = regular_tetrahedron().translated(&[-4.0e4, 2.5e4, 1.0e4]);
        let local = far.local_frame();
        assert_eq!(local.vertices[0], [0.0; 3]);
        let a = compute_reciprocal_vectors(&far, 1e-6).unwrap();
        let b = compute_reciprocal_vectors(&local, 1e-6).unwrap();
        for (ka, kb) in a.k.iter().zip(b.k.iter()) {
            for (x, y) in ka.iter().zip(kb.iter()) {
                assert_abs_diff_eq!(x, y, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn mean_separation_of_regular_tetrahedron() {
        let tetra = regular_tetrahedron();
        assert_abs_diff_eq!(tetra.mean_separation(), 8.0_f64.sqrt(), epsilon = 1e-12);
    }
}
