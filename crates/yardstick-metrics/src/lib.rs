//! Confusion matrices and threshold sweeps for binary classifiers.
//!
//! Pure computation, zero I/O. A [`ClassifierDataset`] holds sorted
//! `(score, label)` observations; [`matrix_at`] gives the
//! [`ConfusionMatrix`] at one threshold and [`ThresholdSweep`] yields the
//! matrix at every threshold of an ascending sequence in a single pass,
//! ready for ROC and precision-recall curves via [`Metric`].

mod confusion;
mod dataset;
mod error;
mod label;
mod metric;
mod sweep;
mod thresholds;

pub use confusion::ConfusionMatrix;
pub use dataset::ClassifierDataset;
pub use error::{DatasetError, MetricError};
pub use label::Label;
pub use metric::Metric;
pub use sweep::{matrices_at, matrix_at, ThresholdSweep};
pub use thresholds::Thresholds;
