//! Sorted binary classifier output with precomputed class totals.

use std::cmp::Ordering;
use std::ops::Index;

use tracing::{debug, instrument};

use crate::confusion::ConfusionMatrix;
use crate::error::DatasetError;
use crate::label::Label;
use crate::sweep::{self, ThresholdSweep};
use crate::thresholds::Thresholds;

/// The output of a binary classifier paired with ground truth.
///
/// Holds `(score, is_positive)` observations sorted ascending by score, with
/// negatives ordered before positives at equal scores. Immutable once built,
/// so a dataset can be shared freely across threads for lookups.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierDataset {
    points: Vec<(f64, bool)>,
    total_positives: usize,
    title: Option<String>,
}

impl ClassifierDataset {
    /// Normalize, sort, and count `(score, label)` observations.
    ///
    /// Labels go through [`Label::is_positive`]: greater than zero (or
    /// `true`) is positive. An empty input yields an empty dataset whose
    /// sweeps produce nothing.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DatasetError::NanScore`] | A score is NaN |
    /// | [`DatasetError::NanLabel`] | A label is NaN |
    #[instrument(skip_all)]
    pub fn new<I, L>(observations: I) -> Result<Self, DatasetError>
    where
        I: IntoIterator<Item = (f64, L)>,
        L: Label,
    {
        let mut points = Vec::new();
        for (index, (score, label)) in observations.into_iter().enumerate() {
            if score.is_nan() {
                return Err(DatasetError::NanScore { index });
            }
            let is_positive = label
                .is_positive()
                .ok_or(DatasetError::NanLabel { index })?;
            points.push((score, is_positive));
        }

        // NaN scores were rejected above, so partial_cmp is total here.
        points.sort_by(|a, b| {
            a.0.partial_cmp(&b.0)
                .unwrap_or(Ordering::Equal)
                .then(a.1.cmp(&b.1))
        });
        let total_positives = points.iter().filter(|&&(_, is_positive)| is_positive).count();

        debug!(
            n = points.len(),
            total_positives,
            total_negatives = points.len() - total_positives,
            "dataset built"
        );

        Ok(Self {
            points,
            total_positives,
            title: None,
        })
    }

    /// Attach a display title. Any displayable value is stored in its
    /// string form.
    #[must_use]
    pub fn with_title(mut self, title: impl ToString) -> Self {
        self.title = Some(title.to_string());
        self
    }

    /// Replace or clear the display title, storing it in string form.
    pub fn set_title<T: ToString>(&mut self, title: Option<T>) {
        self.title = title.map(|t| t.to_string());
    }

    /// Return the display title, if any.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Number of positive observations.
    #[must_use]
    pub fn total_positives(&self) -> usize {
        self.total_positives
    }

    /// Number of negative observations.
    #[must_use]
    pub fn total_negatives(&self) -> usize {
        self.points.len() - self.total_positives
    }

    /// Number of observations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Return true if the dataset holds no observations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Return the observation at `index` in sorted order.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<(f64, bool)> {
        self.points.get(index).copied()
    }

    /// Iterate observations in sorted order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (f64, bool)> + '_ {
        self.points.iter().copied()
    }

    /// Sorted observations as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[(f64, bool)] {
        &self.points
    }

    /// Confusion matrix at a single threshold. See [`sweep::matrix_at`].
    #[must_use]
    pub fn matrix_at(&self, threshold: f64) -> ConfusionMatrix {
        sweep::matrix_at(self, threshold)
    }

    /// Confusion matrices across a threshold sweep. See [`ThresholdSweep`].
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::NanThreshold`] if an explicit threshold is NaN.
    pub fn sweep(&self, thresholds: &Thresholds) -> Result<ThresholdSweep<'_>, DatasetError> {
        ThresholdSweep::new(self, thresholds)
    }
}

impl Index<usize> for ClassifierDataset {
    type Output = (f64, bool);

    fn index(&self, index: usize) -> &(f64, bool) {
        &self.points[index]
    }
}
