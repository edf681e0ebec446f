//! Self-consistency of the linear field model.
//!
//! Re-evaluates `B_bary + G · (R_i − R_bary)` at each probe and reports the
//! largest discrepancy against the measured field. With the estimator's raw
//! Jacobian the four-point model is exact at the vertices, so anything above
//! round-off means the estimate is wrong.

use crate::linalg::{Mat3, Vec3, add, mat_vec, norm, sub};

/// Largest `|B_i − (B_bary + G · (R_i − R_bary))|` over the four probes.
pub fn max_reconstruction_error(
    fields: &[Vec3; 4],
    positions: &[Vec3; 4],
    g: &Mat3,
    b_bary: &Vec3,
    r_bary: &Vec3,
) -> f64 {
    fields
        .iter()
        .zip(positions.iter())
        .map(|(b, r)| {
            let predicted = add(b_bary, &mat_vec(g, &sub(r, r_bary)));
            norm(&sub(b, &predicted))
        })
        .fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Tetrahedron, compute_reciprocal_vectors};
    use crate::gradient::estimate_gradient;

    #[test]
    fn arbitrary_fields_reconstruct_exactly_with_raw_jacobian() {
        let tetra = Tetrahedron::new([
            [-12.0, 4.0, 7.5],
            [3.0, -9.0, 2.0],
            [8.0, 11.0, -6.0],
            [1.0, 2.0, 14.0],
        ]);
        let fields = [
            [12.3, -4.1, 30.2],
            [-7.7, 15.0, 2.4],
            [0.5, 0.25, -19.8],
            [44.0, -3.3, 8.8],
        ];
        let basis = compute_reciprocal_vectors(&tetra, 1e-6).unwrap();
        let tensor = estimate_gradient(&fields, &basis);
        let err = max_reconstruction_error(
            &fields,
            &tetra.vertices,
            &tensor.raw,
            &tensor.b_bary,
            &tetra.barycenter(),
        );
        assert!(err <= 1e-10, "reconstruction error {err}");
    }

    #[test]
    fn cleaned_jacobian_misses_divergent_part() {
        let tetra = Tetrahedron::new([
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
        ]);
        // B = r has ∇·B = 3, entirely removed by cleaning.
        let fields = tetra.vertices;
        let basis = compute_reciprocal_vectors(&tetra, 1e-6).unwrap();
        let tensor = estimate_gradient(&fields, &basis);
        let err = max_reconstruction_error(
            &fields,
            &tetra.vertices,
            &tensor.g,
            &tensor.b_bary,
            &tetra.barycenter(),
        );
        assert!(err > 0.1);
    }

    #[test]
    fn wrong_tensor_is_detected() {
        let positions = [
            [1.0, 0.0, 0.0],
            [-1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
        ];
        let fields = [[1.0, 0.0, 0.0]; 4];
        let g = [[1.0, 0.0, 0.0], [0.0, 0.0, 0.0], [0.0, 0.0, 0.0]];
        let err = max_reconstruction_error(&fields, &positions, &g, &[1.0, 0.0, 0.0], &[0.0; 3]);
        assert_eq!(err, 1.0);
    }
}
