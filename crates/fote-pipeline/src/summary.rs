//! Run summary and content digest.

use fote_kernel::{NullRow, NullType};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub timesteps: usize,
    /// Rows with a finite null position.
    pub located: usize,
    pub class_counts: BTreeMap<NullType, usize>,
    pub failure_counts: BTreeMap<&'static str, usize>,
    /// Largest reconstruction error over rows that have one.
    pub max_reconstruction_error: Option<f64>,
    /// `sha256:` hex digest of every row's canonical words.
    pub digest: String,
}

impl RunSummary {
    pub fn from_rows(rows: &[NullRow]) -> Self {
        let mut class_counts = BTreeMap::new();
        let mut failure_counts = BTreeMap::new();
        let mut located = 0;
        let mut max_reconstruction_error: Option<f64> = None;

        for row in rows {
            *class_counts.entry(row.null_type).or_insert(0) += 1;
            if let Some(class) = row.failure {
                *failure_counts.entry(class).or_insert(0) += 1;
            }
            // Sentinel rows carry the same class in both slots.
            if let Some(class) = row.position_failure
                && row.failure != Some(class)
            {
                *failure_counts.entry(class).or_insert(0) += 1;
            }
            if row.position_failure.is_none() {
                located += 1;
            }
            if !row.max_reconstruction_error.is_nan() {
                let e = row.max_reconstruction_error;
                max_reconstruction_error = Some(max_reconstruction_error.map_or(e, |m| m.max(e)));
            }
        }

        Self {
            timesteps: rows.len(),
            located,
            class_counts,
            failure_counts,
            max_reconstruction_error,
            digest: digest_rows(rows),
        }
    }

    pub fn count(&self, null_type: NullType) -> usize {
        self.class_counts.get(&null_type).copied().unwrap_or(0)
    }
}

pub fn digest_rows(rows: &[NullRow]) -> String {
    let mut hasher = Sha256::new();
    hasher.update((rows.len() as u64).to_le_bytes());
    for row in rows {
        for word in row.canonical_words() {
            hasher.update(word.to_le_bytes());
        }
    }
    format!("sha256:{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fote_kernel::FoteError;

    #[test]
    fn counts_classes_and_failures() {
        let sentinel = NullRow::sentinel(
            1.0,
            &FoteError::DegenerateGeometry {
                vertex: 0,
                normalized_volume: 0.0,
            },
        );
        let rows = [sentinel, sentinel];
        let summary = RunSummary::from_rows(&rows);
        assert_eq!(summary.timesteps, 2);
        assert_eq!(summary.located, 0);
        assert_eq!(summary.count(NullType::Undetermined), 2);
        assert_eq!(summary.failure_counts.get("degenerate_geometry"), Some(&2));
        assert_eq!(summary.failure_counts.len(), 1);
        assert_eq!(summary.max_reconstruction_error, None);
    }

    #[test]
    fn digest_depends_on_every_row() {
        let a = NullRow::sentinel(1.0, &FoteError::NonFinite("b".into()));
        let b = NullRow::sentinel(2.0, &FoteError::NonFinite("b".into()));
        assert_eq!(digest_rows(&[a, b]), digest_rows(&[a, b]));
        assert_ne!(digest_rows(&[a, b]), digest_rows(&[b, a]));
        assert_ne!(digest_rows(&[a]), digest_rows(&[a, a]));
        assert!(digest_rows(&[]).starts_with("sha256:"));
    }
}
