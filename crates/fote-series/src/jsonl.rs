//! JSONL storage: one line per named series.
//!
//! ```text
//! {"name":"mms1_fgm_b_gse","kind":"vector","times":[...],"values":[[bx,by,bz],...]}
//! {"name":"fote_max_reconstruction_error","kind":"scalar","times":[...],"values":[...]}
//! {"name":"fote_null_type","kind":"code","times":[...],"values":[...]}
//! ```
//!
//! JSON has no NaN, so missing float values are written as `null` and read
//! back as NaN.

use crate::series::Series;
use crate::store::SeriesData;
use fote_kernel::Vec3;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum Record {
    Vector {
        name: String,
        times: Vec<f64>,
        values: Vec<[Option<f64>; 3]>,
    },
    Scalar {
        name: String,
        times: Vec<f64>,
        values: Vec<Option<f64>>,
    },
    Code {
        name: String,
        times: Vec<f64>,
        values: Vec<i64>,
    },
}

fn to_nullable(x: f64) -> Option<f64> {
    if x.is_nan() { None } else { Some(x) }
}

fn from_nullable(x: Option<f64>) -> f64 {
    x.unwrap_or(f64::NAN)
}

impl Record {
    fn from_data(name: &str, data: &SeriesData) -> Self {
        let name = name.to_string();
        match data {
            SeriesData::Vector(s) => Self::Vector {
                name,
                times: s.times().to_vec(),
                values: s.values().iter().map(|v| v.map(to_nullable)).collect(),
            },
            SeriesData::Scalar(s) => Self::Scalar {
                name,
                times: s.times().to_vec(),
                values: s.values().iter().copied().map(to_nullable).collect(),
            },
            SeriesData::Code(s) => Self::Code {
                name,
                times: s.times().to_vec(),
                values: s.values().to_vec(),
            },
        }
    }

    fn into_data(self) -> Result<(String, SeriesData), String> {
        match self {
            Self::Vector {
                name,
                times,
                values,
            } => {
                let values: Vec<Vec3> = values.into_iter().map(|v| v.map(from_nullable)).collect();
                let series = Series::new(times, values).map_err(|e| format!("{name}: {e}"))?;
                Ok((name, SeriesData::Vector(series)))
            }
            Self::Scalar {
                name,
                times,
                values,
            } => {
                let values = values.into_iter().map(from_nullable).collect();
                let series = Series::new(times, values).map_err(|e| format!("{name}: {e}"))?;
                Ok((name, SeriesData::Scalar(series)))
            }
            Self::Code {
                name,
                times,
                values,
            } => {
                let series = Series::new(times, values).map_err(|e| format!("{name}: {e}"))?;
                Ok((name, SeriesData::Code(series)))
            }
        }
    }
}

/// Read named series from a JSONL reader.
pub fn read_series(reader: impl BufRead) -> Result<Vec<(String, SeriesData)>, JsonlError> {
    let mut out = Vec::new();
    for (line_no, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| JsonlError::Io(line_no + 1, e.to_string()))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let record: Record = serde_json::from_str(trimmed)
            .map_err(|e| JsonlError::Parse(line_no + 1, e.to_string()))?;
        let entry = record
            .into_data()
            .map_err(|e| JsonlError::Invalid(line_no + 1, e))?;
        out.push(entry);
    }
    Ok(out)
}

/// Write named series to a JSONL writer.
pub fn write_series<'a>(
    writer: &mut impl Write,
    entries: impl IntoIterator<Item = (&'a String, &'a SeriesData)>,
) -> Result<(), JsonlError> {
    for (name, data) in entries {
        let line = serde_json::to_string(&Record::from_data(name, data))
            .map_err(|e| JsonlError::Serialize(e.to_string()))?;
        writeln!(writer, "{line}").map_err(|e| JsonlError::Io(0, e.to_string()))?;
    }
    Ok(())
}

/// Read named series from a JSONL file path.
pub fn read_series_from_path(
    path: impl AsRef<Path>,
) -> Result<Vec<(String, SeriesData)>, JsonlError> {
    let path = path.as_ref();
    let file =
        File::open(path).map_err(|e| JsonlError::Io(0, format!("{}: {e}", path.display())))?;
    read_series(BufReader::new(file))
}

/// Write named series to a JSONL file path via a synced temp file and rename.
pub fn write_series_to_path<'a>(
    path: impl AsRef<Path>,
    entries: impl IntoIterator<Item = (&'a String, &'a SeriesData)>,
) -> Result<(), JsonlError> {
    let path = path.as_ref();
    let parent = path.parent().filter(|p| !p.as_os_str().is_empty());
    if let Some(parent) = parent {
        fs::create_dir_all(parent).map_err(|e| JsonlError::Io(0, format!("{parent:?}: {e}")))?;
    }

    let tmp_path = tmp_write_path(path);
    let write_result = (|| -> Result<(), JsonlError> {
        let file = File::create(&tmp_path)
            .map_err(|e| JsonlError::Io(0, format!("{}: {e}", tmp_path.display())))?;
        let mut writer = BufWriter::new(file);
        write_series(&mut writer, entries)?;
        let file = writer
            .into_inner()
            .map_err(|e| JsonlError::Io(0, format!("{}: {}", tmp_path.display(), e.error())))?;
        file.sync_all()
            .map_err(|e| JsonlError::Io(0, format!("{}: {e}", tmp_path.display())))?;
        Ok(())
    })();

    if let Err(error) = write_result {
        let _ = fs::remove_file(&tmp_path);
        return Err(error);
    }

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        JsonlError::Io(
            0,
            format!("{} -> {}: {e}", tmp_path.display(), path.display()),
        )
    })?;

    // The rename is durable only once the directory entry is synced.
    let dir = parent.unwrap_or(Path::new("."));
    File::open(dir)
        .and_then(|d| d.sync_all())
        .map_err(|e| JsonlError::Io(0, format!("{}: {e}", dir.display())))
}

fn tmp_write_path(path: &Path) -> PathBuf {
    let unique = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let mut tmp: OsString = path.as_os_str().to_os_string();
    tmp.push(format!(".tmp.{}.{}", std::process::id(), unique));
    PathBuf::from(tmp)
}

/// Errors from JSONL operations.
#[derive(Debug, thiserror::Error)]
pub enum JsonlError {
    #[error("line {0}: I/O error: {1}")]
    Io(usize, String),

    #[error("line {0}: parse error: {1}")]
    Parse(usize, String),

    #[error("line {0}: invalid series: {1}")]
    Invalid(usize, String),

    #[error("serialization error: {0}")]
    Serialize(String),
}
