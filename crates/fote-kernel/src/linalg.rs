//! Fixed-size 3-D vector and 3×3 matrix helpers.
//!
//! Everything the kernel needs is O(1) on stack arrays, so there is no
//! matrix library underneath: `Vec3` is `[f64; 3]` and `Mat3` is row-major
//! `[[f64; 3]; 3]`.

/// A 3-vector.
pub type Vec3 = [f64; 3];

/// A row-major 3×3 matrix. `m[row][col]`.
pub type Mat3 = [[f64; 3]; 3];

pub const ZERO: Vec3 = [0.0; 3];

pub fn add(a: &Vec3, b: &Vec3) -> Vec3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

pub fn sub(a: &Vec3, b: &Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

pub fn scale(a: &Vec3, s: f64) -> Vec3 {
    [a[0] * s, a[1] * s, a[2] * s]
}

pub fn dot(a: &Vec3, b: &Vec3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

pub fn cross(a: &Vec3, b: &Vec3) -> Vec3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

pub fn norm(a: &Vec3) -> f64 {
    dot(a, a).sqrt()
}

/// Arithmetic mean of four vectors.
pub fn mean4(v: &[Vec3; 4]) -> Vec3 {
    let mut acc = ZERO;
    for x in v {
        acc = add(&acc, x);
    }
    scale(&acc, 0.25)
}

/// Outer product `a ⊗ b`, i.e. `m[r][c] = a[r] * b[c]`.
pub fn outer(a: &Vec3, b: &Vec3) -> Mat3 {
    let mut m = [[0.0; 3]; 3];
    for (r, row) in m.iter_mut().enumerate() {
        for (c, cell) in row.iter_mut().enumerate() {
            *cell = a[r] * b[c];
        }
    }
    m
}

pub fn mat_add(a: &Mat3, b: &Mat3) -> Mat3 {
    let mut m = *a;
    for (row, brow) in m.iter_mut().zip(b.iter()) {
        for (cell, bcell) in row.iter_mut().zip(brow.iter()) {
            *cell += bcell;
        }
    }
    m
}

pub fn mat_vec(m: &Mat3, v: &Vec3) -> Vec3 {
    [dot(&m[0], v), dot(&m[1], v), dot(&m[2], v)]
}

pub fn trace(m: &Mat3) -> f64 {
    m[0][0] + m[1][1] + m[2][2]
}

pub fn determinant(m: &Mat3) -> f64 {
    m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
        - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
        + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
}

/// Sum of the three principal 2×2 minors (second invariant).
pub fn principal_minor_sum(m: &Mat3) -> f64 {
    (m[0][0] * m[1][1] - m[0][1] * m[1][0])
        + (m[0][0] * m[2][2] - m[0][2] * m[2][0])
        + (m[1][1] * m[2][2] - m[1][2] * m[2][1])
}

pub fn frobenius_norm(m: &Mat3) -> f64 {
    m.iter().flatten().map(|x| x * x).sum::<f64>().sqrt()
}

/// Solve `m · x = rhs` by Gaussian elimination with partial pivoting.
///
/// Returns `None` when a pivot is exactly zero. Near-singularity is the
/// caller's call; see [`crate::position`].
pub fn lu_solve(m: &Mat3, rhs: &Vec3) -> Option<Vec3> {
    let mut a = *m;
    let mut b = *rhs;

    for col in 0..3 {
        let pivot_row = (col..3)
            .max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))
            .unwrap_or(col);
        if a[pivot_row][col] == 0.0 {
            return None;
        }
        a.swap(col, pivot_row);
        b.swap(col, pivot_row);

        for row in (col + 1)..3 {
            let factor = a[row][col] / a[col][col];
            for k in col..3 {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = ZERO;
    for row in (0..3).rev() {
        let tail: f64 = ((row + 1)..3).map(|k| a[row][k] * x[k]).sum();
        x[row] = (b[row] - tail) / a[row][row];
    }
    Some(x)
}
