//! Error types for confusion matrices, metrics, and classifier datasets.

/// Errors from confusion-matrix construction and metric evaluation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MetricError {
    /// Returned when a grid passed as a confusion matrix is not 2 x 2.
    #[error("confusion matrix must be 2 x 2, got {rows} rows with column counts {cols:?}")]
    InvalidShape {
        /// Number of rows in the offending grid.
        rows: usize,
        /// Column count of each row in the offending grid.
        cols: Vec<usize>,
    },

    /// Returned when a metric's denominator is zero and the metric has no
    /// defined fallback value.
    #[error("division by zero while computing {metric}")]
    DivisionByZero {
        /// Short name of the metric being evaluated.
        metric: &'static str,
    },

    /// Returned when a metric name cannot be parsed.
    #[error("unknown metric \"{name}\"")]
    UnknownMetric {
        /// The name that failed to parse.
        name: String,
    },
}

/// Errors from building a classifier dataset or resolving sweep thresholds.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DatasetError {
    /// Returned when an observation's score is NaN and cannot be ordered.
    #[error("observation {index} has a NaN score")]
    NanScore {
        /// Zero-based position of the observation in the input.
        index: usize,
    },

    /// Returned when an observation's label is NaN and cannot be classified.
    #[error("observation {index} has a NaN label")]
    NanLabel {
        /// Zero-based position of the observation in the input.
        index: usize,
    },

    /// Returned when an explicit threshold is NaN.
    #[error("threshold {index} is NaN")]
    NanThreshold {
        /// Zero-based position of the threshold in the requested list.
        index: usize,
    },
}
