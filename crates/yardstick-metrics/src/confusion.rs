//! Binary confusion matrix and the metrics derived from it.

use std::fmt;
use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::error::MetricError;

/// A 2 x 2 confusion matrix for binary classification.
///
/// The grid form is `[[tn, fn], [fp, tp]]`: the row is the predicted class
/// and the column is the actual class, with `0` meaning negative and `1`
/// meaning positive. The named fields are the preferred way to read and
/// write counts; `matrix[(row, col)]` addresses the same cells by position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    /// True positives.
    pub tp: usize,
    /// False positives.
    pub fp: usize,
    /// True negatives.
    pub tn: usize,
    /// False negatives.
    #[serde(rename = "fn")]
    pub fn_: usize,
}

/// `num / den`, or [`MetricError::DivisionByZero`] when `den` is zero.
/// Sum counts in `f64` so extreme values cannot overflow.
fn sum(counts: &[usize]) -> f64 {
    counts.iter().map(|&c| c as f64).sum()
}

fn ratio(metric: &'static str, num: f64, den: f64) -> Result<f64, MetricError> {
    if den == 0.0 {
        return Err(MetricError::DivisionByZero { metric });
    }
    Ok(num / den)
}

impl ConfusionMatrix {
    /// Build a matrix from explicit counts.
    #[must_use]
    pub fn new(tp: usize, fp: usize, fn_: usize, tn: usize) -> Self {
        Self { tp, fp, tn, fn_ }
    }

    /// Build a matrix from a `[[tn, fn], [fp, tp]]` grid.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`MetricError::InvalidShape`] | `grid` is not exactly 2 rows of 2 columns |
    pub fn from_grid<R: AsRef<[usize]>>(grid: &[R]) -> Result<Self, MetricError> {
        let mut matrix = Self::default();
        matrix.set_grid(grid)?;
        Ok(matrix)
    }

    /// Return the `[[tn, fn], [fp, tp]]` grid.
    #[must_use]
    pub fn grid(&self) -> [[usize; 2]; 2] {
        [[self.tn, self.fn_], [self.fp, self.tp]]
    }

    /// Replace all four counts from a `[[tn, fn], [fp, tp]]` grid.
    ///
    /// The matrix is left untouched when the grid is rejected.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`MetricError::InvalidShape`] | `grid` is not exactly 2 rows of 2 columns |
    pub fn set_grid<R: AsRef<[usize]>>(&mut self, grid: &[R]) -> Result<(), MetricError> {
        if grid.len() != 2 || grid.iter().any(|row| row.as_ref().len() != 2) {
            return Err(MetricError::InvalidShape {
                rows: grid.len(),
                cols: grid.iter().map(|row| row.as_ref().len()).collect(),
            });
        }
        let (negatives, positives) = (grid[0].as_ref(), grid[1].as_ref());
        self.tn = negatives[0];
        self.fn_ = negatives[1];
        self.fp = positives[0];
        self.tp = positives[1];
        Ok(())
    }

    /// Total number of observations, `tp + fp + tn + fn`, or `None` if it
    /// does not fit in `usize`.
    #[must_use]
    pub fn checked_total(&self) -> Option<usize> {
        self.tp
            .checked_add(self.fp)?
            .checked_add(self.tn)?
            .checked_add(self.fn_)
    }

    /// Total number of observations, `tp + fp + tn + fn`.
    ///
    /// Saturates at `usize::MAX`; matrices built from a dataset never do.
    #[must_use]
    pub fn total(&self) -> usize {
        self.checked_total().unwrap_or(usize::MAX)
    }

    fn total_f64(&self) -> f64 {
        sum(&[self.tp, self.fp, self.tn, self.fn_])
    }

    /// Proportion of correct predictions, `(tp + tn) / N`.
    ///
    /// # Errors
    ///
    /// Returns [`MetricError::DivisionByZero`] if the matrix is empty.
    pub fn accuracy(&self) -> Result<f64, MetricError> {
        ratio(
            "accuracy",
            sum(&[self.tp, self.tn]),
            self.total_f64(),
        )
    }

    /// Fraction of data classified negative, `(fn + tn) / N`.
    ///
    /// # Errors
    ///
    /// Returns [`MetricError::DivisionByZero`] if the matrix is empty.
    pub fn fdn(&self) -> Result<f64, MetricError> {
        ratio("fdn", sum(&[self.fn_, self.tn]), self.total_f64())
    }

    /// Fraction of data classified positive, `(fp + tp) / N`.
    ///
    /// # Errors
    ///
    /// Returns [`MetricError::DivisionByZero`] if the matrix is empty.
    pub fn fdp(&self) -> Result<f64, MetricError> {
        ratio("fdp", sum(&[self.fp, self.tp]), self.total_f64())
    }

    /// False discovery rate, `fp / (fp + tp)`.
    ///
    /// Unlike [`precision`](Self::precision) there is no fallback for an
    /// empty positive prediction set.
    ///
    /// # Errors
    ///
    /// Returns [`MetricError::DivisionByZero`] if `fp + tp == 0`.
    pub fn fdr(&self) -> Result<f64, MetricError> {
        ratio("fdr", self.fp as f64, sum(&[self.fp, self.tp]))
    }

    /// False positive rate, `fp / (fp + tn)`.
    ///
    /// # Errors
    ///
    /// Returns [`MetricError::DivisionByZero`] if `fp + tn == 0`.
    pub fn fpr(&self) -> Result<f64, MetricError> {
        ratio("fpr", self.fp as f64, sum(&[self.fp, self.tn]))
    }

    /// F-score with weight `beta`:
    /// `(1 + β²)·tp / ((1 + β²)·tp + β²·fn + fp)`.
    ///
    /// `beta = 1.0` gives the usual F1 score.
    ///
    /// # Errors
    ///
    /// Returns [`MetricError::DivisionByZero`] if the denominator is zero.
    pub fn f_score(&self, beta: f64) -> Result<f64, MetricError> {
        let sq = beta * beta;
        let num = (1.0 + sq) * self.tp as f64;
        ratio("f_score", num, num + sq * self.fn_ as f64 + self.fp as f64)
    }

    /// Matthews correlation coefficient.
    ///
    /// # Errors
    ///
    /// Returns [`MetricError::DivisionByZero`] if any of `tp + fp`, `tp + fn`,
    /// `tn + fp`, `tn + fn` is zero.
    pub fn mcc(&self) -> Result<f64, MetricError> {
        let (tp, fp, tn, fn_) = (
            self.tp as f64,
            self.fp as f64,
            self.tn as f64,
            self.fn_ as f64,
        );
        let den = (tp + fp) * (tp + fn_) * (tn + fp) * (tn + fn_);
        ratio("mcc", tp * tn - fp * fn_, den.sqrt())
    }

    /// Negative predictive value, `tn / (tn + fn)`.
    ///
    /// # Errors
    ///
    /// Returns [`MetricError::DivisionByZero`] if `tn + fn == 0`.
    pub fn npv(&self) -> Result<f64, MetricError> {
        ratio("npv", self.tn as f64, sum(&[self.tn, self.fn_]))
    }

    /// Odds ratio, `(tp·tn) / (fp·fn)`.
    ///
    /// When `fp·fn == 0` the result is NaN if `tp·tn` is also zero and
    /// positive infinity otherwise.
    #[must_use]
    pub fn odds_ratio(&self) -> f64 {
        let num = self.tp as f64 * self.tn as f64;
        let den = self.fp as f64 * self.fn_ as f64;
        if den == 0.0 {
            return if num == 0.0 { f64::NAN } else { f64::INFINITY };
        }
        num / den
    }

    /// Precision, `tp / (tp + fp)`. Returns exactly `1.0` when nothing was
    /// predicted positive.
    #[must_use]
    pub fn precision(&self) -> f64 {
        ratio("precision", self.tp as f64, sum(&[self.tp, self.fp])).unwrap_or(1.0)
    }

    /// Alias of [`precision`](Self::precision).
    #[must_use]
    pub fn ppv(&self) -> f64 {
        self.precision()
    }

    /// Recall, `tp / (tp + fn)`.
    ///
    /// # Errors
    ///
    /// Returns [`MetricError::DivisionByZero`] if `tp + fn == 0`.
    pub fn recall(&self) -> Result<f64, MetricError> {
        ratio("recall", self.tp as f64, sum(&[self.tp, self.fn_]))
    }

    /// Alias of [`recall`](Self::recall).
    ///
    /// # Errors
    ///
    /// Same as [`recall`](Self::recall).
    pub fn sensitivity(&self) -> Result<f64, MetricError> {
        self.recall()
    }

    /// Alias of [`recall`](Self::recall).
    ///
    /// # Errors
    ///
    /// Same as [`recall`](Self::recall).
    pub fn tpr(&self) -> Result<f64, MetricError> {
        self.recall()
    }

    /// True negative rate, `tn / (fp + tn)`.
    ///
    /// # Errors
    ///
    /// Returns [`MetricError::DivisionByZero`] if `fp + tn == 0`.
    pub fn tnr(&self) -> Result<f64, MetricError> {
        ratio("tnr", self.tn as f64, sum(&[self.fp, self.tn]))
    }

    /// Alias of [`tnr`](Self::tnr).
    ///
    /// # Errors
    ///
    /// Same as [`tnr`](Self::tnr).
    pub fn specificity(&self) -> Result<f64, MetricError> {
        self.tnr()
    }
}

impl From<[[usize; 2]; 2]> for ConfusionMatrix {
    fn from(grid: [[usize; 2]; 2]) -> Self {
        let [[tn, fn_], [fp, tp]] = grid;
        Self { tp, fp, tn, fn_ }
    }
}

impl TryFrom<&[Vec<usize>]> for ConfusionMatrix {
    type Error = MetricError;

    fn try_from(grid: &[Vec<usize>]) -> Result<Self, Self::Error> {
        Self::from_grid(grid)
    }
}

impl Index<(usize, usize)> for ConfusionMatrix {
    type Output = usize;

    /// Panics if either coordinate is outside `0..2`.
    fn index(&self, (row, col): (usize, usize)) -> &usize {
        match (row, col) {
            (0, 0) => &self.tn,
            (0, 1) => &self.fn_,
            (1, 0) => &self.fp,
            (1, 1) => &self.tp,
            _ => panic!("confusion matrix index ({row}, {col}) out of range"),
        }
    }
}

impl IndexMut<(usize, usize)> for ConfusionMatrix {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut usize {
        match (row, col) {
            (0, 0) => &mut self.tn,
            (0, 1) => &mut self.fn_,
            (1, 0) => &mut self.fp,
            (1, 1) => &mut self.tp,
            _ => panic!("confusion matrix index ({row}, {col}) out of range"),
        }
    }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ConfusionMatrix(tp={}, fp={}, fn={}, tn={})",
            self.tp, self.fp, self.fn_, self.tn
        )
    }
}
