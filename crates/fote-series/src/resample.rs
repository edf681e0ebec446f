//! Resampling onto a target time base.
//!
//! - `nearest`: value of the closest source sample; targets outside the
//!   source span take the end values.
//! - `linear`: straight-line interpolation between bracketing samples;
//!   targets outside the source span are missing (NaN).

use crate::series::{Interpolate, Series, SeriesError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResampleMethod {
    Nearest,
    #[default]
    Linear,
}

impl std::fmt::Display for ResampleMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Nearest => write!(f, "nearest"),
            Self::Linear => write!(f, "linear"),
        }
    }
}

impl std::str::FromStr for ResampleMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "nearest" => Ok(Self::Nearest),
            "linear" => Ok(Self::Linear),
            _ => Err(format!("unknown resample method: {s}")),
        }
    }
}

/// Resample `source` at every timestamp in `targets`.
///
/// `targets` must itself be a valid (strictly increasing) time base.
pub fn resample<T: Interpolate>(
    source: &Series<T>,
    targets: &[f64],
    method: ResampleMethod,
) -> Result<Series<T>, SeriesError> {
    if source.is_empty() {
        return Err(SeriesError::Empty);
    }
    let times = source.times();
    let values = source.values();

    let out: Vec<T> = targets
        .iter()
        .map(|&t| {
            // First index with times[idx] >= t.
            let idx = times.partition_point(|x| *x < t);
            match method {
                ResampleMethod::Nearest => {
                    if idx == 0 {
                        values[0]
                    } else if idx == times.len() {
                        values[times.len() - 1]
                    } else if t - times[idx - 1] <= times[idx] - t {
                        values[idx - 1]
                    } else {
                        values[idx]
                    }
                }
                ResampleMethod::Linear => {
                    if idx < times.len() && times[idx] == t {
                        values[idx]
                    } else if idx == 0 || idx == times.len() {
                        T::missing()
                    } else {
                        let (t0, t1) = (times[idx - 1], times[idx]);
                        T::lerp(values[idx - 1], values[idx], (t - t0) / (t1 - t0))
                    }
                }
            }
        })
        .collect();

    tracing::debug!(
        method = %method,
        source_len = source.len(),
        target_len = targets.len(),
        "resampled series"
    );
    Series::new(targets.to_vec(), out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn ramp() -> Series<f64> {
        Series::new(vec![0.0, 10.0, 20.0], vec![0.0, 100.0, 400.0]).unwrap()
    }

    #[test]
    fn linear_interpolates_between_samples() {
        let out = resample(&ramp(), &[5.0, 10.0, 15.0], ResampleMethod::Linear).unwrap();
        assert_abs_diff_eq!(out.values()[0], 50.0);
        assert_eq!(out.values()[1], 100.0);
        assert_abs_diff_eq!(out.values()[2], 250.0);
    }

    #[test]
    fn linear_outside_span_is_missing() {
        let out = resample(&ramp(), &[-1.0, 0.0, 20.0, 21.0], ResampleMethod::Linear).unwrap();
        assert!(out.values()[0].is_nan());
        assert_eq!(out.values()[1], 0.0);
        assert_eq!(out.values()[2], 400.0);
        assert!(out.values()[3].is_nan());
    }

    #[test]
    fn nearest_clamps_and_breaks_ties_low() {
        let out = resample(
            &ramp(),
            &[-5.0, 4.0, 5.0, 6.0, 99.0],
            ResampleMethod::Nearest,
        )
        .unwrap();
        assert_eq!(out.values(), &[0.0, 0.0, 0.0, 100.0, 400.0]);
    }

    #[test]
    fn vectors_interpolate_componentwise() {
        let s = Series::new(vec![0.0, 2.0], vec![[0.0, 2.0, -4.0], [2.0, 0.0, 4.0]]).unwrap();
        let out = resample(&s, &[1.0], ResampleMethod::Linear).unwrap();
        assert_eq!(out.values()[0], [1.0, 1.0, 0.0]);
    }

    #[test]
    fn empty_source_is_an_error() {
        let s: Series<f64> = Series::new(vec![], vec![]).unwrap();
        assert_eq!(
            resample(&s, &[0.0], ResampleMethod::Nearest).unwrap_err(),
            SeriesError::Empty
        );
    }

    #[test]
    fn method_parses_case_insensitively() {
        assert_eq!(
            "Nearest".parse::<ResampleMethod>().unwrap(),
            ResampleMethod::Nearest
        );
        assert!("cubic".parse::<ResampleMethod>().is_err());
    }
}
