//! # fote-pipeline
//!
//! Runs the FOTE kernel over a time range of four-probe measurements.
//!
//! ```text
//! RunConfig (TOML)
//!     │
//!     ▼
//! Orchestrator ── reads ──▶ TimeSeriesStore ◀── writes ── derived series
//!     │
//!     ├─ samples():  smooth, resample onto the time base
//!     ├─ evaluate(): FoteEngine::row per timestep (rayon or sequential)
//!     └─ assemble:   prefix + suffix::* series
//!     │
//!     ▼
//! RunReport { rows, summary (histogram + sha256 digest), output_series }
//! ```

pub mod config;
pub mod error;
pub mod orchestrator;
pub mod summary;

pub use config::{
    ConfigError, OutputConfig, ProbeConfig, ResampleConfig, RunConfig, RunSection,
    SmoothingConfig,
};
pub use error::PipelineError;
pub use orchestrator::{CancellationToken, Orchestrator, RunReport, suffix};
pub use summary::{RunSummary, digest_rows};
