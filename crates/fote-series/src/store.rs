//! The store boundary: named series in, named series out.
//!
//! [`TimeSeriesStore`] is what the pipeline talks to. [`MemoryStore`] is the
//! canonical in-memory implementation, persisted as JSONL.

use crate::jsonl::{JsonlError, read_series_from_path, write_series_to_path};
use crate::resample::{ResampleMethod, resample};
use crate::series::{Series, SeriesError};
use fote_kernel::Vec3;
use std::collections::BTreeMap;
use std::path::Path;

/// One stored series, tagged by value kind.
#[derive(Debug, Clone, PartialEq)]
pub enum SeriesData {
    Vector(Series<Vec3>),
    Scalar(Series<f64>),
    Code(Series<i64>),
}

impl SeriesData {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Vector(_) => "vector",
            Self::Scalar(_) => "scalar",
            Self::Code(_) => "code",
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Vector(s) => s.len(),
            Self::Scalar(s) => s.len(),
            Self::Code(s) => s.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn times(&self) -> &[f64] {
        match self {
            Self::Vector(s) => s.times(),
            Self::Scalar(s) => s.times(),
            Self::Code(s) => s.times(),
        }
    }
}

/// Errors raised while querying a store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Jsonl(#[from] JsonlError),

    #[error("series `{name}`: {source}")]
    Series {
        name: String,
        #[source]
        source: SeriesError,
    },

    #[error("series not found: {0}")]
    NotFound(String),

    #[error("series `{name}` holds {actual} values, expected {expected}")]
    KindMismatch {
        name: String,
        expected: &'static str,
        actual: &'static str,
    },
}

/// Named-series storage keyed by name.
pub trait TimeSeriesStore {
    /// All series names, sorted.
    fn names(&self) -> Vec<String>;

    fn get(&self, name: &str) -> Option<&SeriesData>;

    /// Insert or replace; returns the previous series if present.
    fn put(&mut self, name: &str, data: SeriesData) -> Option<SeriesData>;

    fn get_vectors(&self, name: &str) -> Result<&Series<Vec3>, StoreError> {
        match self.get(name) {
            Some(SeriesData::Vector(s)) => Ok(s),
            Some(other) => Err(StoreError::KindMismatch {
                name: name.to_string(),
                expected: "vector",
                actual: other.kind(),
            }),
            None => Err(StoreError::NotFound(name.to_string())),
        }
    }

    fn get_scalars(&self, name: &str) -> Result<&Series<f64>, StoreError> {
        match self.get(name) {
            Some(SeriesData::Scalar(s)) => Ok(s),
            Some(other) => Err(StoreError::KindMismatch {
                name: name.to_string(),
                expected: "scalar",
                actual: other.kind(),
            }),
            None => Err(StoreError::NotFound(name.to_string())),
        }
    }

    fn get_codes(&self, name: &str) -> Result<&Series<i64>, StoreError> {
        match self.get(name) {
            Some(SeriesData::Code(s)) => Ok(s),
            Some(other) => Err(StoreError::KindMismatch {
                name: name.to_string(),
                expected: "code",
                actual: other.kind(),
            }),
            None => Err(StoreError::NotFound(name.to_string())),
        }
    }

    fn put_vectors(&mut self, name: &str, series: Series<Vec3>) {
        self.put(name, SeriesData::Vector(series));
    }

    fn put_scalars(&mut self, name: &str, series: Series<f64>) {
        self.put(name, SeriesData::Scalar(series));
    }

    fn put_codes(&mut self, name: &str, series: Series<i64>) {
        self.put(name, SeriesData::Code(series));
    }

    /// A vector series resampled onto `base`.
    fn resample_vectors(
        &self,
        name: &str,
        base: &[f64],
        method: ResampleMethod,
    ) -> Result<Series<Vec3>, StoreError> {
        let source = self.get_vectors(name)?;
        resample(source, base, method).map_err(|source| StoreError::Series {
            name: name.to_string(),
            source,
        })
    }
}

/// BTreeMap-backed store with deterministic name ordering.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    series: BTreeMap<String, SeriesData>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from named series. Duplicate names resolve last-write-wins.
    pub fn from_series(entries: impl IntoIterator<Item = (String, SeriesData)>) -> Self {
        Self {
            series: entries.into_iter().collect(),
        }
    }

    pub fn load_jsonl(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Ok(Self::from_series(read_series_from_path(path)?))
    }

    pub fn save_jsonl(&self, path: impl AsRef<Path>) -> Result<(), StoreError> {
        write_series_to_path(path, self.series.iter())?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn remove(&mut self, name: &str) -> Option<SeriesData> {
        self.series.remove(name)
    }
}

impl TimeSeriesStore for MemoryStore {
    fn names(&self) -> Vec<String> {
        self.series.keys().cloned().collect()
    }

    fn get(&self, name: &str) -> Option<&SeriesData> {
        self.series.get(name)
    }

    fn put(&mut self, name: &str, data: SeriesData) -> Option<SeriesData> {
        self.series.insert(name.to_string(), data)
    }
}
