//! Closed-form eigenvalues of a real 3×3 matrix.
//!
//! Solves the characteristic cubic `λ³ − tr λ² + c₂ λ − det = 0` after
//! depressing it to `t³ + p t + q = 0`. Three real roots use the
//! trigonometric form; one real root plus a conjugate pair use Cardano with
//! the cancellation-free choice of cube-root branch.

use crate::linalg::{Mat3, determinant, principal_minor_sum, trace};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Eigenvalues of one Jacobian.
///
/// Ordering: all-real spectra are ascending; otherwise the real root comes
/// first, followed by the member of the pair with positive imaginary part.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EigenSpectrum {
    pub values: [Complex64; 3],
}

impl EigenSpectrum {
    pub fn new(values: [Complex64; 3]) -> Self {
        Self { values }
    }

    /// Build from real parts only.
    pub fn from_real(values: [f64; 3]) -> Self {
        Self::new(values.map(|re| Complex64::new(re, 0.0)))
    }

    /// `Σ λ`, which should match `trace(G)`.
    pub fn sum(&self) -> Complex64 {
        self.values.iter().sum()
    }

    pub fn real_parts(&self) -> [f64; 3] {
        self.values.map(|z| z.re)
    }

    pub fn imag_parts(&self) -> [f64; 3] {
        self.values.map(|z| z.im)
    }

    /// Largest eigenvalue modulus.
    pub fn scale(&self) -> f64 {
        self.values.iter().map(|z| z.norm()).fold(0.0, f64::max)
    }
}

/// Compute the eigenvalues of `m`.
pub fn eigenvalues(m: &Mat3) -> EigenSpectrum {
    // λ³ + a λ² + b λ + c
    let a = -trace(m);
    let b = principal_minor_sum(m);
    let c = -determinant(m);

    let shift = -a / 3.0;
    let p = b - a * a / 3.0;
    let q = 2.0 * a * a * a / 27.0 - a * b / 3.0 + c;
    let disc = (q / 2.0).powi(2) + (p / 3.0).powi(3);

    if disc > 0.0 {
        let s = disc.sqrt();
        let half_q = -q / 2.0;
        let w = if half_q >= 0.0 { half_q + s } else { half_q - s };
        let u = w.cbrt();
        let v = if u != 0.0 { -p / (3.0 * u) } else { 0.0 };

        let real = u + v + shift;
        let re = -(u + v) / 2.0 + shift;
        let im = (3.0_f64.sqrt() / 2.0) * (u - v).abs();
        return EigenSpectrum::new([
            Complex64::new(real, 0.0),
            Complex64::new(re, im),
            Complex64::new(re, -im),
        ]);
    }

    if p == 0.0 {
        return EigenSpectrum::from_real([shift; 3]);
    }

    // disc <= 0 implies p < 0.
    let r = 2.0 * (-p / 3.0).sqrt();
    let arg = ((3.0 * q) / (2.0 * p) * (-3.0 / p).sqrt()).clamp(-1.0, 1.0);
    let theta = arg.acos() / 3.0;
    let mut roots = [0.0; 3];
    for (k, root) in roots.iter_mut().enumerate() {
        *root = r * (theta - 2.0 * PI * k as f64 / 3.0).cos() + shift;
    }
    roots.sort_by(f64::total_cmp);
    EigenSpectrum::from_real(roots)
}
