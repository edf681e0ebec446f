//! Topological null classification from the Jacobian's eigenvalues.
//!
//! Ten classes, keyed by the integer codes used in published FOTE results:
//!
//! | code | class  | spectrum                                            |
//! |------|--------|-----------------------------------------------------|
//! | 1    | X      | real, one ≈ 0, others of opposite sign              |
//! | 2    | O      | one ≈ 0, purely imaginary pair                      |
//! | 3    | A      | real, two negative                                  |
//! | 4    | B      | real, two positive                                  |
//! | 5    | As     | real > 0, pair with Re < 0                          |
//! | 6    | Bs     | real < 0, pair with Re > 0                          |
//! | 7    | A → X  | A with `min|λ|/max|λ|` below the radial threshold    |
//! | 8    | B → X  | B with `min|λ|/max|λ|` below the radial threshold    |
//! | 9    | As → O | As with `max|Re λ|/|Im λ|` below the spiral threshold |
//! | 10   | Bs → O | Bs with `max|Re λ|/|Im λ|` below the spiral threshold |
//!
//! Code 0 is reserved for rows where no classification was possible.

use crate::config::FoteConfig;
use crate::eigen::EigenSpectrum;
use crate::error::FoteError;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum NullType {
    /// No classification for this timestep.
    #[default]
    Undetermined,
    /// 2-D hyperbolic null.
    X,
    /// 2-D rotational null.
    O,
    /// Radial null, two negative eigenvalues.
    A,
    /// Radial null, two positive eigenvalues.
    B,
    /// Spiral null with an outgoing axis.
    As,
    /// Spiral null with an incoming axis.
    Bs,
    /// A degenerating toward X.
    AToX,
    /// B degenerating toward X.
    BToX,
    /// As degenerating toward O.
    AsToO,
    /// Bs degenerating toward O.
    BsToO,
}

impl NullType {
    pub const ALL: [NullType; 11] = [
        Self::Undetermined,
        Self::X,
        Self::O,
        Self::A,
        Self::B,
        Self::As,
        Self::Bs,
        Self::AToX,
        Self::BToX,
        Self::AsToO,
        Self::BsToO,
    ];

    pub fn code(self) -> u8 {
        match self {
            Self::Undetermined => 0,
            Self::X => 1,
            Self::O => 2,
            Self::A => 3,
            Self::B => 4,
            Self::As => 5,
            Self::Bs => 6,
            Self::AToX => 7,
            Self::BToX => 8,
            Self::AsToO => 9,
            Self::BsToO => 10,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(usize::from(code)).copied()
    }

    /// True for the four classes relabeled by a degeneracy threshold.
    pub fn is_degenerate(self) -> bool {
        matches!(self, Self::AToX | Self::BToX | Self::AsToO | Self::BsToO)
    }

    /// The non-degenerate class this one was relabeled from, if any.
    pub fn parent(self) -> Option<Self> {
        match self {
            Self::AToX => Some(Self::A),
            Self::BToX => Some(Self::B),
            Self::AsToO => Some(Self::As),
            Self::BsToO => Some(Self::Bs),
            _ => None,
        }
    }
}

impl std::fmt::Display for NullType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Undetermined => write!(f, "undetermined"),
            Self::X => write!(f, "X"),
            Self::O => write!(f, "O"),
            Self::A => write!(f, "A"),
            Self::B => write!(f, "B"),
            Self::As => write!(f, "As"),
            Self::Bs => write!(f, "Bs"),
            Self::AToX => write!(f, "A→X"),
            Self::BToX => write!(f, "B→X"),
            Self::AsToO => write!(f, "As→O"),
            Self::BsToO => write!(f, "Bs→O"),
        }
    }
}

/// A classification plus the ratio that decided degeneracy.
///
/// `ratio` is `min|λ| / max|λ|` for real spectra and
/// `max|Re λ| / min|Im λ|` for spectra with a conjugate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub null_type: NullType,
    pub ratio: f64,
}

/// Eigenvalue decision tree, parameterized by [`FoteConfig`] thresholds.
#[derive(Debug, Clone, Copy)]
pub struct NullClassifier {
    config: FoteConfig,
}

impl NullClassifier {
    pub fn new(config: FoteConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FoteConfig {
        &self.config
    }

    /// Classify three eigenvalues given in any order.
    pub fn classify(&self, spectrum: &EigenSpectrum) -> Result<ClassificationResult, FoteError> {
        let values = spectrum.values;
        if values.iter().any(|z| !z.re.is_finite() || !z.im.is_finite()) {
            return Err(FoteError::NonFinite("eigenvalue".to_string()));
        }

        let scale = spectrum.scale();
        if scale == 0.0 {
            return Err(FoteError::UnclassifiableSpectrum {
                description: "all eigenvalues vanish".to_string(),
            });
        }
        let tol = self.config.near_zero_eigenvalue_tolerance * scale;

        let complex: Vec<usize> = (0..3).filter(|&i| values[i].im.abs() > tol).collect();
        match complex.as_slice() {
            [] => self.classify_real(values.map(|z| z.re), tol),
            &[i, j] => {
                if (values[i].im + values[j].im).abs() > tol {
                    return Err(FoteError::UnclassifiableSpectrum {
                        description: format!(
                            "imaginary parts {} and {} are not a conjugate pair",
                            values[i].im, values[j].im
                        ),
                    });
                }
                let real = values[3 - i - j].re;
                self.classify_spiral(real, [values[i], values[j]], tol)
            }
            other => Err(FoteError::UnclassifiableSpectrum {
                description: format!("{} eigenvalues with nonzero imaginary part", other.len()),
            }),
        }
    }

    fn classify_real(&self, mut re: [f64; 3], tol: f64) -> Result<ClassificationResult, FoteError> {
        re.sort_by(|a, b| a.abs().total_cmp(&b.abs()));
        let ratio = re[0].abs() / re[2].abs();
        let near_zero = re.iter().filter(|x| x.abs() <= tol).count();

        match near_zero {
            0 => {}
            1 => {
                if re[1] * re[2] < 0.0 {
                    return Ok(ClassificationResult {
                        null_type: NullType::X,
                        ratio,
                    });
                }
                return Err(FoteError::UnclassifiableSpectrum {
                    description: format!(
                        "one vanishing eigenvalue with same-sign remainder ({}, {})",
                        re[1], re[2]
                    ),
                });
            }
            n => {
                return Err(FoteError::UnclassifiableSpectrum {
                    description: format!("{n} vanishing real eigenvalues"),
                });
            }
        }

        let negatives = re.iter().filter(|x| **x < 0.0).count();
        let (candidate, degenerate) = match negatives {
            2 => (NullType::A, NullType::AToX),
            1 => (NullType::B, NullType::BToX),
            _ => {
                return Err(FoteError::InconsistentEigenSpectrum {
                    description: format!(
                        "all real eigenvalues share one sign ({}, {}, {})",
                        re[0], re[1], re[2]
                    ),
                });
            }
        };

        let null_type = if ratio < self.config.degeneracy_threshold_radial {
            degenerate
        } else {
            candidate
        };
        Ok(ClassificationResult { null_type, ratio })
    }

    fn classify_spiral(
        &self,
        real: f64,
        pair: [Complex64; 2],
        tol: f64,
    ) -> Result<ClassificationResult, FoteError> {
        let pair_re = (pair[0].re + pair[1].re) / 2.0;
        let max_re = pair[0].re.abs().max(pair[1].re.abs()).max(real.abs());
        let min_im = pair[0].im.abs().min(pair[1].im.abs());
        let ratio = max_re / min_im;

        if real.abs() <= tol {
            if pair.iter().all(|z| z.re.abs() <= tol) {
                return Ok(ClassificationResult {
                    null_type: NullType::O,
                    ratio,
                });
            }
            return Err(FoteError::InconsistentEigenSpectrum {
                description: format!(
                    "vanishing real eigenvalue with pair real part {pair_re}"
                ),
            });
        }

        let (candidate, degenerate) = if real > 0.0 {
            if pair_re > tol {
                return Err(FoteError::InconsistentEigenSpectrum {
                    description: format!(
                        "real eigenvalue {real} and pair real part {pair_re} are both positive"
                    ),
                });
            }
            (NullType::As, NullType::AsToO)
        } else {
            if pair_re < -tol {
                return Err(FoteError::InconsistentEigenSpectrum {
                    description: format!(
                        "real eigenvalue {real} and pair real part {pair_re} are both negative"
                    ),
                });
            }
            (NullType::Bs, NullType::BsToO)
        };

        let null_type = if ratio < self.config.degeneracy_threshold_spiral {
            degenerate
        } else {
            candidate
        };
        Ok(ClassificationResult { null_type, ratio })
    }
}

impl Default for NullClassifier {
    fn default() -> Self {
        Self::new(FoteConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    fn classify(values: [Complex64; 3]) -> Result<ClassificationResult, FoteError> {
        NullClassifier::default().classify(&EigenSpectrum::new(values))
    }

    #[test]
    fn codes_round_trip_through_from_code() {
        for t in NullType::ALL {
            assert_eq!(NullType::from_code(t.code()), Some(t));
        }
        assert_eq!(NullType::from_code(11), None);
    }

    #[test]
    fn snake_case_labels_are_stable() {
        insta::assert_json_snapshot!(NullType::ALL, @r#"
        [
          "undetermined",
          "x",
          "o",
          "a",
          "b",
          "as",
          "bs",
          "a_to_x",
          "b_to_x",
          "as_to_o",
          "bs_to_o"
        ]
        "#);
    }

    #[test]
    fn degenerate_classes_know_their_parent() {
        assert_eq!(NullType::BsToO.parent(), Some(NullType::Bs));
        assert!(NullType::AToX.is_degenerate());
        assert!(!NullType::X.is_degenerate());
        assert_eq!(NullType::O.parent(), None);
    }

    #[test]
    fn order_of_input_does_not_matter() {
        let a = classify([c(0.5, 0.0), c(-0.25, 0.0), c(-0.25, 0.0)]).unwrap();
        let b = classify([c(-0.25, 0.0), c(0.5, 0.0), c(-0.25, 0.0)]).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.null_type, NullType::A);
        assert_abs_diff_eq!(a.ratio, 0.5, epsilon = 1e-15);
    }

    #[test]
    fn ratio_equal_to_threshold_is_not_degenerate() {
        let r = classify([c(-0.2, 0.0), c(-0.6, 0.0), c(0.8, 0.0)]).unwrap();
        assert_eq!(r.null_type, NullType::A);
        let r = classify([c(0.25, 0.0), c(0.75, 0.0), c(-1.0, 0.0)]).unwrap();
        assert_eq!(r.null_type, NullType::B);
    }

    #[test]
    fn custom_radial_threshold_changes_label() {
        let classifier = NullClassifier::new(FoteConfig {
            degeneracy_threshold_radial: 0.6,
            ..FoteConfig::default()
        });
        let spectrum = EigenSpectrum::from_real([-0.25, -0.25, 0.5]);
        assert_eq!(
            classifier.classify(&spectrum).unwrap().null_type,
            NullType::AToX
        );
    }

    #[test]
    fn all_same_sign_real_spectrum_is_inconsistent() {
        let err = classify([c(0.1, 0.0), c(0.2, 0.0), c(0.3, 0.0)]).unwrap_err();
        assert_eq!(err.failure_class(), "inconsistent_eigen_spectrum");
    }

    #[test]
    fn vanishing_eigenvalue_with_same_sign_pair_is_unclassifiable() {
        let err = classify([c(0.0, 0.0), c(0.2, 0.0), c(0.3, 0.0)]).unwrap_err();
        assert_eq!(err.failure_class(), "unclassifiable_spectrum");
    }

    #[test]
    fn two_vanishing_eigenvalues_are_unclassifiable() {
        let err = classify([c(0.0, 0.0), c(0.0, 0.0), c(0.3, 0.0)]).unwrap_err();
        assert_eq!(err.failure_class(), "unclassifiable_spectrum");
    }

    #[test]
    fn zero_spectrum_is_unclassifiable() {
        let err = classify([c(0.0, 0.0); 3]).unwrap_err();
        assert_eq!(err.failure_class(), "unclassifiable_spectrum");
    }

    #[test]
    fn spiral_with_same_sign_pair_is_inconsistent() {
        let err = classify([c(0.5, 0.0), c(0.25, 0.25), c(0.25, -0.25)]).unwrap_err();
        assert_eq!(err.failure_class(), "inconsistent_eigen_spectrum");
        let err = classify([c(-0.5, 0.0), c(-0.25, 0.25), c(-0.25, -0.25)]).unwrap_err();
        assert_eq!(err.failure_class(), "inconsistent_eigen_spectrum");
    }

    #[test]
    fn vanishing_real_root_with_nonzero_pair_real_part_is_inconsistent() {
        let err = classify([c(0.0, 0.0), c(0.2, 1.0), c(0.2, -1.0)]).unwrap_err();
        assert_eq!(err.failure_class(), "inconsistent_eigen_spectrum");
    }

    #[test]
    fn non_conjugate_imaginary_parts_are_unclassifiable() {
        let err = classify([c(0.1, 0.0), c(-0.05, 0.5), c(-0.05, -0.2)]).unwrap_err();
        assert_eq!(err.failure_class(), "unclassifiable_spectrum");
        let err = classify([c(0.1, 0.3), c(-0.05, 0.5), c(-0.05, -0.8)]).unwrap_err();
        assert_eq!(err.failure_class(), "unclassifiable_spectrum");
    }

    #[test]
    fn tiny_imaginary_parts_count_as_real() {
        let r = classify([c(-0.25, 1e-9), c(-0.25, -1e-9), c(0.5, 0.0)]).unwrap();
        assert_eq!(r.null_type, NullType::A);
    }

    #[test]
    fn near_zero_tolerance_moves_the_x_boundary() {
        let spectrum = EigenSpectrum::from_real([1e-4, -0.5, 0.4999]);
        let strict = NullClassifier::default().classify(&spectrum).unwrap();
        assert_eq!(strict.null_type, NullType::BToX);

        let loose = NullClassifier::new(FoteConfig {
            near_zero_eigenvalue_tolerance: 1e-3,
            ..FoteConfig::default()
        })
        .classify(&spectrum)
        .unwrap();
        assert_eq!(loose.null_type, NullType::X);
    }

    #[test]
    fn non_finite_eigenvalue_is_rejected() {
        let err = classify([c(f64::NAN, 0.0), c(0.1, 0.0), c(-0.1, 0.0)]).unwrap_err();
        assert_eq!(err.failure_class(), "non_finite_input");
    }
}
