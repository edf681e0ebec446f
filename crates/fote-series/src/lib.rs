//! # fote-series
//!
//! Time-series layer for multi-probe measurements.
//!
//! This crate provides:
//! - `Series<T>`: validated, strictly increasing timestamps with values
//! - `TimeSeriesStore` and its in-memory implementation `MemoryStore`
//! - nearest/linear resampling onto a common time base
//! - moving-average/moving-median smoothing
//! - JSONL read/write (portable persistence)
//!
//! It knows nothing about nulls; the pipeline crate reads probe series from
//! a store and writes derived series back.
//!
//! ## Data model
//!
//! ```text
//! JSONL (on disk, one line per series)
//!     ↕  load / save
//! MemoryStore (name → SeriesData)
//! ```

pub mod jsonl;
pub mod resample;
pub mod series;
pub mod smooth;
pub mod store;

pub use jsonl::{JsonlError, read_series, write_series};
pub use resample::{ResampleMethod, resample};
pub use series::{Interpolate, Series, SeriesError};
pub use smooth::{SmoothingMethod, smooth_scalars, smooth_vectors};
pub use store::{MemoryStore, SeriesData, StoreError, TimeSeriesStore};
