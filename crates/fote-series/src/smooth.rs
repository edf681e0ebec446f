//! Centered moving-window smoothing.
//!
//! The window is a sample count, odd, and truncated at the series ends.
//! NaN samples are skipped; a window with no finite samples yields NaN.

use crate::series::{Series, SeriesError};
use fote_kernel::Vec3;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmoothingMethod {
    #[default]
    None,
    MovingAverage,
    MovingMedian,
}

impl std::fmt::Display for SmoothingMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::MovingAverage => write!(f, "moving_average"),
            Self::MovingMedian => write!(f, "moving_median"),
        }
    }
}

/// Smooth one scalar channel.
pub fn smooth_scalars(
    values: &[f64],
    method: SmoothingMethod,
    window: usize,
) -> Result<Vec<f64>, SeriesError> {
    if window == 0 || window % 2 == 0 {
        return Err(SeriesError::InvalidWindow(window));
    }
    if method == SmoothingMethod::None || window == 1 {
        return Ok(values.to_vec());
    }

    let half = window / 2;
    let mut scratch = Vec::with_capacity(window);
    let out = (0..values.len())
        .map(|i| {
            let lo = i.saturating_sub(half);
            let hi = (i + half + 1).min(values.len());
            scratch.clear();
            scratch.extend(values[lo..hi].iter().copied().filter(|x| !x.is_nan()));
            match method {
                SmoothingMethod::MovingAverage => mean(&scratch),
                SmoothingMethod::MovingMedian => median(&mut scratch),
                SmoothingMethod::None => values[i],
            }
        })
        .collect();
    Ok(out)
}

/// Smooth each component of a vector series independently.
pub fn smooth_vectors(
    series: &Series<Vec3>,
    method: SmoothingMethod,
    window: usize,
) -> Result<Series<Vec3>, SeriesError> {
    let mut channels = [Vec::new(), Vec::new(), Vec::new()];
    for (c, channel) in channels.iter_mut().enumerate() {
        let component: Vec<f64> = series.values().iter().map(|v| v[c]).collect();
        *channel = smooth_scalars(&component, method, window)?;
    }
    let values = (0..series.len())
        .map(|i| [channels[0][i], channels[1][i], channels[2][i]])
        .collect();

    tracing::debug!(method = %method, window, len = series.len(), "smoothed vector series");
    Series::new(series.times().to_vec(), values)
}

fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return f64::NAN;
    }
    xs.iter().sum::<f64>() / xs.len() as f64
}

fn median(xs: &mut [f64]) -> f64 {
    if xs.is_empty() {
        return f64::NAN;
    }
    xs.sort_by(f64::total_cmp);
    let mid = xs.len() / 2;
    if xs.len() % 2 == 1 {
        xs[mid]
    } else {
        (xs[mid - 1] + xs[mid]) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moving_average_truncates_at_edges() {
        let out = smooth_scalars(&[1.0, 2.0, 3.0, 4.0], SmoothingMethod::MovingAverage, 3).unwrap();
        assert_eq!(out, vec![1.5, 2.0, 3.0, 3.5]);
    }

    #[test]
    fn moving_median_rejects_spikes() {
        let out = smooth_scalars(
            &[1.0, 1.0, 50.0, 1.0, 1.0],
            SmoothingMethod::MovingMedian,
            3,
        )
        .unwrap();
        assert_eq!(out, vec![1.0, 1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn nan_samples_are_skipped() {
        let out = smooth_scalars(&[2.0, f64::NAN, 4.0], SmoothingMethod::MovingAverage, 3).unwrap();
        assert_eq!(out, vec![2.0, 3.0, 4.0]);
        let all_nan = smooth_scalars(&[f64::NAN; 2], SmoothingMethod::MovingMedian, 3).unwrap();
        assert!(all_nan.iter().all(|x| x.is_nan()));
    }

    #[test]
    fn even_window_is_rejected() {
        assert_eq!(
            smooth_scalars(&[1.0], SmoothingMethod::MovingAverage, 4).unwrap_err(),
            SeriesError::InvalidWindow(4)
        );
    }

    #[test]
    fn none_is_identity() {
        let s = Series::new(vec![0.0, 1.0], vec![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]).unwrap();
        assert_eq!(smooth_vectors(&s, SmoothingMethod::None, 5).unwrap(), s);
    }

    #[test]
    fn vectors_smooth_per_component() {
        let s = Series::new(
            vec![0.0, 1.0, 2.0],
            vec![[0.0, 9.0, 1.0], [3.0, 0.0, 1.0], [6.0, 0.0, 1.0]],
        )
        .unwrap();
        let out = smooth_vectors(&s, SmoothingMethod::MovingMedian, 3).unwrap();
        assert_eq!(out.values()[1], [3.0, 0.0, 1.0]);
        assert_eq!(out.values()[0], [1.5, 4.5, 1.0]);
    }
}
