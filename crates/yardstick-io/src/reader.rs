//! CSV reader for `(score, label)` classifier output.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};
use yardstick_metrics::ClassifierDataset;

use crate::IoError;

/// Reads classifier scores and ground-truth labels from a CSV file.
///
/// Expected CSV format:
/// - Header row required; the score and label columns are found by name
///   (`score` and `label` unless overridden), other columns are ignored
/// - Scores are floats; `inf` and `-inf` are accepted, NaN is not
/// - Labels are `true`/`false` or numbers, positive when greater than zero
///
/// The dataset title defaults to the file stem.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`IoError::CsvParse`] | Malformed CSV record |
/// | [`IoError::MissingColumn`] | Score or label column absent from header |
/// | [`IoError::InvalidValue`] | Cell is unparseable or NaN |
pub struct ObservationReader {
    path: PathBuf,
    score_column: String,
    label_column: String,
}

/// Parse a label cell: `true`/`false` (any case) or a non-NaN number.
fn parse_label(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("true") {
        return Some(1.0);
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return Some(0.0);
    }
    trimmed.parse::<f64>().ok().filter(|v| !v.is_nan())
}

impl ObservationReader {
    /// Create a new reader for the given CSV file path.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            score_column: "score".to_string(),
            label_column: "label".to_string(),
        }
    }

    /// Read scores from the named column instead of `score`.
    #[must_use]
    pub fn with_score_column(mut self, name: impl Into<String>) -> Self {
        self.score_column = name.into();
        self
    }

    /// Read labels from the named column instead of `label`.
    #[must_use]
    pub fn with_label_column(mut self, name: impl Into<String>) -> Self {
        self.label_column = name.into();
        self
    }

    fn csv_error(&self, e: csv::Error) -> IoError {
        IoError::CsvParse {
            path: self.path.clone(),
            offset: e.position().map_or(0, |p| p.byte()),
            source: e,
        }
    }

    fn column_index(&self, header: &csv::StringRecord, column: &str) -> Result<usize, IoError> {
        header
            .iter()
            .position(|h| h.trim() == column)
            .ok_or_else(|| IoError::MissingColumn {
                path: self.path.clone(),
                column: column.to_string(),
            })
    }

    /// Read and validate the CSV file, returning a [`ClassifierDataset`].
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn read(&self) -> Result<ClassifierDataset, IoError> {
        let file = std::fs::File::open(&self.path).map_err(|e| IoError::FileNotFound {
            path: self.path.clone(),
            source: e,
        })?;

        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(file);

        let header = rdr.headers().map_err(|e| self.csv_error(e))?.clone();
        let score_idx = self.column_index(&header, &self.score_column)?;
        let label_idx = self.column_index(&header, &self.label_column)?;
        debug!(score_idx, label_idx, "resolved columns");

        let mut observations = Vec::new();
        for (row_index, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| self.csv_error(e))?;

            let raw_score = record.get(score_idx).unwrap_or("");
            let score = raw_score
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|v| !v.is_nan())
                .ok_or_else(|| IoError::InvalidValue {
                    path: self.path.clone(),
                    row_index,
                    column: self.score_column.clone(),
                    raw: raw_score.to_string(),
                })?;

            let raw_label = record.get(label_idx).unwrap_or("");
            let label = parse_label(raw_label).ok_or_else(|| IoError::InvalidValue {
                path: self.path.clone(),
                row_index,
                column: self.label_column.clone(),
                raw: raw_label.to_string(),
            })?;

            observations.push((score, label));
        }

        if observations.is_empty() {
            warn!("no data rows; sweeps over this dataset will be empty");
        }

        let mut dataset =
            ClassifierDataset::new(observations).map_err(|e| IoError::Dataset {
                path: self.path.clone(),
                source: e,
            })?;
        if let Some(stem) = self.path.file_stem() {
            dataset.set_title(Some(stem.to_string_lossy().into_owned()));
        }

        info!(
            n = dataset.len(),
            total_positives = dataset.total_positives(),
            total_negatives = dataset.total_negatives(),
            "dataset loaded"
        );

        Ok(dataset)
    }
}
