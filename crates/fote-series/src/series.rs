//! A named quantity sampled on strictly increasing timestamps.

use fote_kernel::Vec3;
use serde::{Deserialize, Serialize};

/// Errors raised while building or transforming a series.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SeriesError {
    #[error("length mismatch: {times} timestamps for {values} values")]
    LengthMismatch { times: usize, values: usize },

    #[error("timestamp {index} is not finite")]
    NonFiniteTime { index: usize },

    #[error("timestamps not strictly increasing at index {index}: {previous} then {current}")]
    NotMonotonic {
        index: usize,
        previous: f64,
        current: f64,
    },

    #[error("series is empty")]
    Empty,

    #[error("smoothing window must be odd and at least 1, got {0}")]
    InvalidWindow(usize),
}

/// Timestamps (seconds) and one value per timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSeries<T>", bound(deserialize = "T: Deserialize<'de>"))]
pub struct Series<T> {
    times: Vec<f64>,
    values: Vec<T>,
}

#[derive(Deserialize)]
struct RawSeries<T> {
    times: Vec<f64>,
    values: Vec<T>,
}

impl<T> TryFrom<RawSeries<T>> for Series<T> {
    type Error = SeriesError;

    fn try_from(raw: RawSeries<T>) -> Result<Self, Self::Error> {
        Series::new(raw.times, raw.values)
    }
}

impl<T> Series<T> {
    /// Validate and build. Timestamps must be finite and strictly increasing.
    pub fn new(times: Vec<f64>, values: Vec<T>) -> Result<Self, SeriesError> {
        if times.len() != values.len() {
            return Err(SeriesError::LengthMismatch {
                times: times.len(),
                values: values.len(),
            });
        }
        for (index, t) in times.iter().enumerate() {
            if !t.is_finite() {
                return Err(SeriesError::NonFiniteTime { index });
            }
        }
        for (index, pair) in times.windows(2).enumerate() {
            if pair[1] <= pair[0] {
                return Err(SeriesError::NotMonotonic {
                    index: index + 1,
                    previous: pair[0],
                    current: pair[1],
                });
            }
        }
        Ok(Self { times, values })
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = (f64, &T)> {
        self.times.iter().copied().zip(self.values.iter())
    }

    /// First and last timestamp.
    pub fn span(&self) -> Option<(f64, f64)> {
        Some((*self.times.first()?, *self.times.last()?))
    }

    pub fn into_parts(self) -> (Vec<f64>, Vec<T>) {
        (self.times, self.values)
    }
}

impl<T: Clone> Series<T> {
    /// Samples with `start <= t <= end`.
    pub fn clip(&self, start: f64, end: f64) -> Self {
        let lo = self.times.partition_point(|t| *t < start);
        let hi = self.times.partition_point(|t| *t <= end).max(lo);
        Self {
            times: self.times[lo..hi].to_vec(),
            values: self.values[lo..hi].to_vec(),
        }
    }

    /// Same timestamps, values transformed.
    pub fn map<U>(&self, f: impl Fn(&T) -> U) -> Series<U> {
        Series {
            times: self.times.clone(),
            values: self.values.iter().map(f).collect(),
        }
    }
}

/// Values that can be linearly interpolated and carry a missing marker.
pub trait Interpolate: Copy {
    fn lerp(a: Self, b: Self, t: f64) -> Self;
    fn missing() -> Self;
}

impl Interpolate for f64 {
    fn lerp(a: Self, b: Self, t: f64) -> Self {
        a + (b - a) * t
    }

    fn missing() -> Self {
        f64::NAN
    }
}

impl Interpolate for Vec3 {
    fn lerp(a: Self, b: Self, t: f64) -> Self {
        [
            f64::lerp(a[0], b[0], t),
            f64::lerp(a[1], b[1], t),
            f64::lerp(a[2], b[2], t),
        ]
    }

    fn missing() -> Self {
        [f64::NAN; 3]
    }
}
