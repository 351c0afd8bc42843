//! Threshold selection for confusion-matrix sweeps.

use crate::dataset::ClassifierDataset;
use crate::error::DatasetError;

/// Which thresholds a sweep evaluates.
///
/// | Variant | Resolved thresholds |
/// |---|---|
/// | `Scores` (default) | every score in the dataset, ascending, duplicates kept |
/// | `Count(n)` | `i / n` for `i` in `0..n`, covering `[0, 1)` |
/// | `Explicit(list)` | `list`, deduplicated and sorted ascending |
///
/// A sweep always appends a final `+∞` threshold after these.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Thresholds {
    /// Every score present in the dataset.
    #[default]
    Scores,
    /// `n` equidistant thresholds in `[0, 1)`.
    Count(usize),
    /// A caller-provided collection of thresholds.
    Explicit(Vec<f64>),
}

impl Thresholds {
    /// Resolve to an ascending list of thresholds for `dataset`.
    ///
    /// `Scores` keeps one threshold per observation, so tied scores repeat.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::NanThreshold`] if an explicit threshold is NaN.
    pub fn resolve(&self, dataset: &ClassifierDataset) -> Result<Vec<f64>, DatasetError> {
        match self {
            Thresholds::Scores => Ok(dataset.iter().map(|(score, _)| score).collect()),
            Thresholds::Count(n) => {
                let n = *n;
                Ok((0..n).map(|i| i as f64 / n as f64).collect())
            }
            Thresholds::Explicit(values) => {
                if let Some(index) = values.iter().position(|t| t.is_nan()) {
                    return Err(DatasetError::NanThreshold { index });
                }
                let mut resolved = values.clone();
                resolved.sort_by(f64::total_cmp);
                // total_cmp separates -0.0 from 0.0; dedup treats them as equal.
                resolved.dedup();
                Ok(resolved)
            }
        }
    }
}

impl From<usize> for Thresholds {
    fn from(n: usize) -> Self {
        Thresholds::Count(n)
    }
}

impl From<Vec<f64>> for Thresholds {
    fn from(values: Vec<f64>) -> Self {
        Thresholds::Explicit(values)
    }
}

impl From<&[f64]> for Thresholds {
    fn from(values: &[f64]) -> Self {
        Thresholds::Explicit(values.to_vec())
    }
}
