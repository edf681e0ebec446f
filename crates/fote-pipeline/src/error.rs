use crate::config::ConfigError;
use fote_kernel::FoteError;
use fote_series::{SeriesError, StoreError};

/// Run-level failures. Per-timestep failures never surface here; they
/// become sentinel rows.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Kernel(#[from] FoteError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("series `{name}`: {source}")]
    Series {
        name: String,
        #[source]
        source: SeriesError,
    },

    #[error("time base `{0}` has no samples in the requested range")]
    EmptyTimeBase(String),

    #[error("run cancelled")]
    Cancelled,
}

impl PipelineError {
    pub fn series(name: impl Into<String>, source: SeriesError) -> Self {
        Self::Series {
            name: name.into(),
            source,
        }
    }
}
