//! Resample → per-timestep dispatch → assemble.
//!
//! ```text
//! store ─▶ 4 field + 4 position series ─▶ smooth ─▶ resample onto time base
//!       ─▶ [Sample; n] ─▶ FoteEngine::row (rayon or sequential) ─▶ [NullRow; n]
//!       ─▶ derived series ─▶ store
//! ```
//!
//! A failed timestep becomes a sentinel row; only store, series, and
//! cancellation errors abort the run.

use crate::config::RunConfig;
use crate::error::PipelineError;
use crate::summary::RunSummary;
use fote_kernel::{FoteEngine, NullRow, Sample, Vec3};
use fote_series::{Series, SmoothingMethod, TimeSeriesStore, smooth_vectors};
use rayon::prelude::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Output series suffixes, appended to the configured prefix.
pub mod suffix {
    pub const NULL_TYPE: &str = "null_type";
    pub const NULL_POSITION: &str = "null_position";
    pub const EIGENVALUES_RE: &str = "eigenvalues_re";
    pub const EIGENVALUES_IM: &str = "eigenvalues_im";
    pub const DEGENERACY_RATIO: &str = "degeneracy_ratio";
    pub const MAX_RECONSTRUCTION_ERROR: &str = "max_reconstruction_error";
    pub const DIV_OVER_CURL: &str = "div_over_curl";
    pub const NULL_DISTANCE: &str = "null_distance";
    pub const NULL_INSIDE: &str = "null_inside";

    pub const ALL: [&str; 9] = [
        NULL_TYPE,
        NULL_POSITION,
        EIGENVALUES_RE,
        EIGENVALUES_IM,
        DEGENERACY_RATIO,
        MAX_RECONSTRUCTION_ERROR,
        DIV_OVER_CURL,
        NULL_DISTANCE,
        NULL_INSIDE,
    ];
}

/// Shared flag checked between timesteps.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Rows, their summary, and the names of the series written.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub rows: Vec<NullRow>,
    pub summary: RunSummary,
    pub output_series: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Orchestrator {
    config: RunConfig,
    engine: FoteEngine,
}

impl Orchestrator {
    pub fn new(config: RunConfig) -> Result<Self, PipelineError> {
        config.validate()?;
        let engine = FoteEngine::new(config.fote)?;
        Ok(Self { config, engine })
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Full run: read inputs, evaluate, write derived series back.
    ///
    /// Nothing is written if the run is cancelled.
    pub fn run(
        &self,
        store: &mut impl TimeSeriesStore,
        cancel: &CancellationToken,
    ) -> Result<RunReport, PipelineError> {
        let samples = self.samples(&*store)?;
        tracing::info!(
            timesteps = samples.len(),
            parallel = self.config.run.parallel,
            "starting null analysis"
        );

        let rows = self.evaluate(&samples, cancel)?;
        log_failures(&rows);

        let output_series = self.assemble(store, &samples, &rows)?;
        let summary = RunSummary::from_rows(&rows);
        tracing::info!(
            timesteps = summary.timesteps,
            located = summary.located,
            failures = summary.failure_counts.values().sum::<usize>(),
            digest = %summary.digest,
            "finished null analysis"
        );

        Ok(RunReport {
            rows,
            summary,
            output_series,
        })
    }

    /// Build one sample per time-base timestamp.
    pub fn samples(&self, store: &impl TimeSeriesStore) -> Result<Vec<Sample>, PipelineError> {
        let probes = &self.config.probes;
        let base_name = probes.time_base_series();
        let base = self.time_base(store, &base_name)?;
        if base.is_empty() {
            return Err(PipelineError::EmptyTimeBase(base_name));
        }

        let method = self.config.resample.method;
        let mut fields = Vec::with_capacity(4);
        for name in probes.field_names() {
            let smoothed = self.smoothed_fields(store, &name)?;
            let resampled = fote_series::resample(&smoothed, &base, method)
                .map_err(|e| PipelineError::series(&name, e))?;
            fields.push(resampled);
        }
        let mut positions = Vec::with_capacity(4);
        for name in probes.position_names() {
            positions.push(store.resample_vectors(&name, &base, method)?);
        }

        let samples = base
            .iter()
            .enumerate()
            .map(|(i, &time)| {
                let b: [Vec3; 4] = std::array::from_fn(|p| fields[p].values()[i]);
                let r: [Vec3; 4] = std::array::from_fn(|p| positions[p].values()[i]);
                Sample::new(time, b, r)
            })
            .collect();
        Ok(samples)
    }

    /// Run the kernel on every sample, in order.
    ///
    /// Parallel and sequential dispatch produce bit-identical rows.
    pub fn evaluate(
        &self,
        samples: &[Sample],
        cancel: &CancellationToken,
    ) -> Result<Vec<NullRow>, PipelineError> {
        let engine = &self.engine;
        let rows: Vec<Option<NullRow>> = if self.config.run.parallel {
            let mut rows = Vec::with_capacity(samples.len());
            samples
                .par_iter()
                .map(|sample| (!cancel.is_cancelled()).then(|| engine.row(sample)))
                .collect_into_vec(&mut rows);
            rows
        } else {
            let mut rows = Vec::with_capacity(samples.len());
            for sample in samples {
                if cancel.is_cancelled() {
                    return Err(PipelineError::Cancelled);
                }
                rows.push(Some(engine.row(sample)));
            }
            rows
        };

        if cancel.is_cancelled() {
            return Err(PipelineError::Cancelled);
        }
        rows.into_iter()
            .collect::<Option<Vec<_>>>()
            .ok_or(PipelineError::Cancelled)
    }

    fn time_base(
        &self,
        store: &impl TimeSeriesStore,
        name: &str,
    ) -> Result<Vec<f64>, PipelineError> {
        let series = store.get_vectors(name)?;
        let times = match (self.config.run.start, self.config.run.end) {
            (None, None) => series.times().to_vec(),
            (start, end) => series
                .clip(
                    start.unwrap_or(f64::NEG_INFINITY),
                    end.unwrap_or(f64::INFINITY),
                )
                .times()
                .to_vec(),
        };
        Ok(times)
    }

    fn smoothed_fields(
        &self,
        store: &impl TimeSeriesStore,
        name: &str,
    ) -> Result<Series<Vec3>, PipelineError> {
        let raw = store.get_vectors(name)?;
        let smoothing = self.config.smoothing;
        if smoothing.method == SmoothingMethod::None {
            return Ok(raw.clone());
        }
        smooth_vectors(raw, smoothing.method, smoothing.window)
            .map_err(|e| PipelineError::series(name, e))
    }

    fn assemble(
        &self,
        store: &mut impl TimeSeriesStore,
        samples: &[Sample],
        rows: &[NullRow],
    ) -> Result<Vec<String>, PipelineError> {
        let times: Vec<f64> = samples.iter().map(|s| s.time).collect();
        let output = &self.config.output;
        let mut written = Vec::with_capacity(suffix::ALL.len());

        let vectors: [(&str, fn(&NullRow) -> Vec3); 3] = [
            (suffix::NULL_POSITION, |r: &NullRow| r.null_position),
            (suffix::EIGENVALUES_RE, |r: &NullRow| r.eigenvalues.map(|z| z.re)),
            (suffix::EIGENVALUES_IM, |r: &NullRow| r.eigenvalues.map(|z| z.im)),
        ];
        for (key, f) in vectors {
            let name = output.series_name(key);
            let series = Series::new(times.clone(), rows.iter().map(f).collect())
                .map_err(|e| PipelineError::series(&name, e))?;
            store.put_vectors(&name, series);
            written.push(name);
        }

        let scalars: [(&str, fn(&NullRow) -> f64); 4] = [
            (suffix::DEGENERACY_RATIO, |r: &NullRow| r.degeneracy_ratio),
            (suffix::MAX_RECONSTRUCTION_ERROR, |r: &NullRow| r.max_reconstruction_error),
            (suffix::DIV_OVER_CURL, |r: &NullRow| r.div_over_curl),
            (suffix::NULL_DISTANCE, |r: &NullRow| r.null_distance),
        ];
        for (key, f) in scalars {
            let name = output.series_name(key);
            let series = Series::new(times.clone(), rows.iter().map(f).collect())
                .map_err(|e| PipelineError::series(&name, e))?;
            store.put_scalars(&name, series);
            written.push(name);
        }

        let codes: [(&str, fn(&NullRow) -> i64); 2] = [
            (suffix::NULL_TYPE, |r: &NullRow| i64::from(r.null_type.code())),
            (suffix::NULL_INSIDE, |r: &NullRow| i64::from(r.null_inside)),
        ];
        for (key, f) in codes {
            let name = output.series_name(key);
            let series = Series::new(times.clone(), rows.iter().map(f).collect())
                .map_err(|e| PipelineError::series(&name, e))?;
            store.put_codes(&name, series);
            written.push(name);
        }

        written.sort();
        tracing::debug!(series = written.len(), "wrote derived series");
        Ok(written)
    }
}

fn log_failures(rows: &[NullRow]) {
    for (index, row) in rows.iter().enumerate() {
        if let Some(failure_class) = row.failure {
            tracing::warn!(index, time = row.time, failure_class, "timestep not classified");
        } else if let Some(failure_class) = row.position_failure {
            tracing::warn!(index, time = row.time, failure_class, "null position undetermined");
        }
    }
}
