//! Run configuration, loaded from TOML.
//!
//! ```toml
//! [fote]
//! degeneracy_threshold_radial = 0.25
//!
//! [probes]
//! field_template = "mms{probe}_fgm_b_gse"
//! position_template = "mms{probe}_mec_r_gse"
//! labels = ["1", "2", "3", "4"]
//! time_base = "1"
//!
//! [resample]
//! method = "linear"
//!
//! [smoothing]
//! method = "moving_median"
//! window = 5
//!
//! [output]
//! prefix = "fote_"
//!
//! [run]
//! start = 0.0
//! end = 600.0
//! parallel = true
//! ```
//!
//! Every key has a default; an empty file is a valid configuration.

use fote_kernel::{FoteConfig, FoteError};
use fote_series::{ResampleMethod, SmoothingMethod};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

pub const PROBE_PLACEHOLDER: &str = "{probe}";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to render config: {0}")]
    Render(#[from] toml::ser::Error),

    #[error("[{section}] {message}")]
    Invalid {
        section: &'static str,
        message: String,
    },
}

impl ConfigError {
    fn invalid(section: &'static str, message: impl Into<String>) -> Self {
        Self::Invalid {
            section,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    pub fote: FoteConfig,
    pub probes: ProbeConfig,
    pub resample: ResampleConfig,
    pub smoothing: SmoothingConfig,
    pub output: OutputConfig,
    pub run: RunSection,
}

/// How the eight input series are named in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProbeConfig {
    pub field_template: String,
    pub position_template: String,
    pub labels: [String; 4],
    /// Label of the probe whose field timestamps define the output time base.
    pub time_base: String,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            field_template: "mms{probe}_fgm_b_gse".to_string(),
            position_template: "mms{probe}_mec_r_gse".to_string(),
            labels: ["1", "2", "3", "4"].map(String::from),
            time_base: "1".to_string(),
        }
    }
}

impl ProbeConfig {
    pub fn field_series(&self, label: &str) -> String {
        self.field_template.replace(PROBE_PLACEHOLDER, label)
    }

    pub fn position_series(&self, label: &str) -> String {
        self.position_template.replace(PROBE_PLACEHOLDER, label)
    }

    pub fn field_names(&self) -> [String; 4] {
        self.labels.each_ref().map(|l| self.field_series(l))
    }

    pub fn position_names(&self) -> [String; 4] {
        self.labels.each_ref().map(|l| self.position_series(l))
    }

    pub fn time_base_series(&self) -> String {
        self.field_series(&self.time_base)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResampleConfig {
    pub method: ResampleMethod,
}

/// Applied to the field series before resampling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SmoothingConfig {
    pub method: SmoothingMethod,
    /// Window length in samples; odd.
    pub window: usize,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            method: SmoothingMethod::None,
            window: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub prefix: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            prefix: "fote_".to_string(),
        }
    }
}

impl OutputConfig {
    pub fn series_name(&self, suffix: &str) -> String {
        format!("{}{suffix}", self.prefix)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunSection {
    pub start: Option<f64>,
    pub end: Option<f64>,
    pub parallel: bool,
}

impl Default for RunSection {
    fn default() -> Self {
        Self {
            start: None,
            end: None,
            parallel: true,
        }
    }
}

impl RunConfig {
    /// Read, parse and validate a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Returns the first problem found, tagged with its section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.fote.validate().map_err(|e| match e {
            FoteError::InvalidConfig(message) => ConfigError::invalid("fote", message),
            other => ConfigError::invalid("fote", other.to_string()),
        })?;

        let probes = &self.probes;
        for (key, template) in [
            ("field_template", &probes.field_template),
            ("position_template", &probes.position_template),
        ] {
            if !template.contains(PROBE_PLACEHOLDER) {
                return Err(ConfigError::invalid(
                    "probes",
                    format!("{key} must contain {PROBE_PLACEHOLDER}, got {template:?}"),
                ));
            }
        }
        if probes.field_template == probes.position_template {
            return Err(ConfigError::invalid(
                "probes",
                "field_template and position_template must differ",
            ));
        }
        let distinct: BTreeSet<&str> = probes.labels.iter().map(String::as_str).collect();
        if distinct.len() != 4 || distinct.contains("") {
            return Err(ConfigError::invalid(
                "probes",
                format!("labels must be four distinct non-empty strings, got {:?}", probes.labels),
            ));
        }
        if !distinct.contains(probes.time_base.as_str()) {
            return Err(ConfigError::invalid(
                "probes",
                format!("time_base {:?} is not one of the labels", probes.time_base),
            ));
        }

        let window = self.smoothing.window;
        if window == 0 || window % 2 == 0 {
            return Err(ConfigError::invalid(
                "smoothing",
                format!("window must be odd and at least 1, got {window}"),
            ));
        }

        if self.output.prefix.is_empty() {
            return Err(ConfigError::invalid("output", "prefix must not be empty"));
        }

        for (key, bound) in [("start", self.run.start), ("end", self.run.end)] {
            if bound.is_some_and(|t| !t.is_finite()) {
                return Err(ConfigError::invalid("run", format!("{key} must be finite")));
            }
        }
        if let (Some(start), Some(end)) = (self.run.start, self.run.end)
            && start > end
        {
            return Err(ConfigError::invalid(
                "run",
                format!("start {start} is after end {end}"),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_default() {
        let config = RunConfig::from_toml_str("").unwrap();
        assert_eq!(config, RunConfig::default());
        assert!(config.run.parallel);
        assert_eq!(config.output.prefix, "fote_");
    }

    #[test]
    fn default_round_trips_through_toml() {
        let text = RunConfig::default().to_toml_string().unwrap();
        assert!(text.contains("[probes]"));
        assert!(text.contains("mms{probe}_fgm_b_gse"));
        let back = RunConfig::from_toml_str(&text).unwrap();
        assert_eq!(back, RunConfig::default());
    }

    #[test]
    fn probe_names_expand_templates() {
        let probes = ProbeConfig::default();
        assert_eq!(probes.field_names()[2], "mms3_fgm_b_gse");
        assert_eq!(probes.position_names()[0], "mms1_mec_r_gse");
        assert_eq!(probes.time_base_series(), "mms1_fgm_b_gse");
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = RunConfig::from_toml_str(
            r#"
            [fote]
            degeneracy_threshold_spiral = 0.1

            [smoothing]
            method = "moving_average"
            window = 3

            [run]
            parallel = false
            "#,
        )
        .unwrap();
        assert_eq!(config.fote.degeneracy_threshold_spiral, 0.1);
        assert_eq!(config.fote.degeneracy_threshold_radial, 0.25);
        assert_eq!(config.smoothing.method, SmoothingMethod::MovingAverage);
        assert!(!config.run.parallel);
        assert_eq!(config.resample.method, ResampleMethod::Linear);
    }

    #[test]
    fn rejects_invalid_sections() {
        let cases = [
            ("[fote]\ndegeneracy_threshold_radial = 1.5\n", "fote"),
            ("[probes]\nfield_template = \"b_gse\"\n", "probes"),
            ("[probes]\nlabels = [\"1\", \"1\", \"2\", \"3\"]\n", "probes"),
            ("[probes]\ntime_base = \"9\"\n", "probes"),
            ("[smoothing]\nwindow = 4\n", "smoothing"),
            ("[output]\nprefix = \"\"\n", "output"),
            ("[run]\nstart = 10.0\nend = 5.0\n", "run"),
        ];
        for (text, expected) in cases {
            match RunConfig::from_toml_str(text) {
                Err(ConfigError::Invalid { section, .. }) => assert_eq!(section, expected, "{text}"),
                other => panic!("expected invalid [{expected}] for {text:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(matches!(
            RunConfig::from_toml_str("[output]\nsuffix = \"x\"\n"),
            Err(ConfigError::Parse(_))
        ));
    }
}
