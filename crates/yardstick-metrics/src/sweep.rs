//! Confusion matrices at one threshold or across an incremental sweep.
//!
//! A point is classified positive when its score is at least the threshold.
//! [`matrix_at`] answers a single query by scanning whichever side of the
//! threshold is shorter. [`ThresholdSweep`] pays that cost once for the
//! lowest threshold and then moves points from the predicted-positive side
//! to the predicted-negative side as the threshold rises, so each point is
//! visited once across the whole sweep.

use std::iter::FusedIterator;

use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::confusion::ConfusionMatrix;
use crate::dataset::ClassifierDataset;
use crate::error::DatasetError;
use crate::thresholds::Thresholds;

/// Position of the first observation classified positive at `threshold`.
///
/// Sorted order puts negatives first among tied scores, so this is also the
/// first position at or after `(threshold, false)`.
fn split_index(points: &[(f64, bool)], threshold: f64) -> usize {
    points.partition_point(|&(score, _)| score < threshold)
}

/// Confusion matrix of `dataset` at `threshold`.
///
/// Binary-searches for the split, then tallies only the shorter of the
/// predicted-negative prefix and predicted-positive suffix and derives the
/// other half from the dataset totals.
#[must_use]
pub fn matrix_at(dataset: &ClassifierDataset, threshold: f64) -> ConfusionMatrix {
    let points = dataset.as_slice();
    let idx = split_index(points, threshold);
    let mut matrix = ConfusionMatrix::default();

    if 2 * idx <= points.len() {
        for &(_, is_positive) in &points[..idx] {
            if is_positive {
                matrix.fn_ += 1;
            } else {
                matrix.tn += 1;
            }
        }
        matrix.fp = dataset.total_negatives() - matrix.tn;
        matrix.tp = dataset.total_positives() - matrix.fn_;
    } else {
        for &(_, is_positive) in &points[idx..] {
            if is_positive {
                matrix.tp += 1;
            } else {
                matrix.fp += 1;
            }
        }
        matrix.tn = dataset.total_negatives() - matrix.fp;
        matrix.fn_ = dataset.total_positives() - matrix.tp;
    }

    matrix
}

/// Confusion matrices of `dataset` at each of `thresholds`, in input order.
///
/// Each lookup is independent, so they are spread across the rayon pool.
/// Prefer [`ThresholdSweep`] when the thresholds are many and sorted.
#[must_use]
pub fn matrices_at(dataset: &ClassifierDataset, thresholds: &[f64]) -> Vec<ConfusionMatrix> {
    thresholds
        .par_iter()
        .map(|&threshold| matrix_at(dataset, threshold))
        .collect()
}

/// Iterator over `(threshold, matrix)` pairs for ascending thresholds.
///
/// Built by [`ThresholdSweep::new`] or [`ClassifierDataset::sweep`]. The
/// sweep owns its running matrix and a cursor into the dataset; each item is
/// a copy of the running matrix, unaffected by later steps. It is
/// single-pass: to sweep again, build a new one from the dataset.
///
/// The last item is always at `+∞`, where every point is predicted negative
/// (points scored `+∞` excepted). An empty dataset, or an empty resolved
/// threshold list, yields nothing.
#[derive(Debug)]
pub struct ThresholdSweep<'a> {
    dataset: &'a ClassifierDataset,
    pending: std::vec::IntoIter<f64>,
    cursor: usize,
    running: Option<ConfusionMatrix>,
}

impl<'a> ThresholdSweep<'a> {
    /// Resolve `thresholds` against `dataset` and prepare the sweep.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::NanThreshold`] if an explicit threshold is NaN.
    #[instrument(skip_all, fields(n = dataset.len()))]
    pub fn new(dataset: &'a ClassifierDataset, thresholds: &Thresholds) -> Result<Self, DatasetError> {
        let mut resolved = thresholds.resolve(dataset)?;
        if dataset.is_empty() {
            resolved.clear();
        } else if !resolved.is_empty() {
            resolved.push(f64::INFINITY);
        }
        debug!(n_thresholds = resolved.len(), "sweep prepared");

        Ok(Self {
            dataset,
            pending: resolved.into_iter(),
            cursor: 0,
            running: None,
        })
    }
}

impl Iterator for ThresholdSweep<'_> {
    type Item = (f64, ConfusionMatrix);

    fn next(&mut self) -> Option<Self::Item> {
        let threshold = self.pending.next()?;
        let dataset = self.dataset;
        let points = dataset.as_slice();

        let Some(running) = self.running.as_mut() else {
            let matrix = matrix_at(dataset, threshold);
            self.cursor = split_index(points, threshold);
            self.running = Some(matrix);
            return Some((threshold, matrix));
        };

        while let Some(&(score, is_positive)) = points.get(self.cursor) {
            if score >= threshold {
                break;
            }
            if is_positive {
                running.tp -= 1;
                running.fn_ += 1;
            } else {
                running.fp -= 1;
                running.tn += 1;
            }
            self.cursor += 1;
        }

        Some((threshold, *running))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.pending.size_hint()
    }
}

impl ExactSizeIterator for ThresholdSweep<'_> {}

impl FusedIterator for ThresholdSweep<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> ClassifierDataset {
        let scores = [0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9];
        let labels = [0, 0, 0, 1, 0, 1, 1, 1, 1];
        ClassifierDataset::new(scores.into_iter().zip(labels)).unwrap()
    }

    #[test]
    fn matrix_at_prefix_scan() {
        assert_eq!(
            matrix_at(&reference(), 0.2),
            ConfusionMatrix::new(5, 3, 0, 1)
        );
    }

    #[test]
    fn matrix_at_suffix_scan() {
        assert_eq!(
            matrix_at(&reference(), 0.75),
            ConfusionMatrix::new(2, 0, 3, 4)
        );
    }

    #[test]
    fn matrix_at_ties_are_positive() {
        let ds = ClassifierDataset::new(vec![(0.5, 0), (0.5, 1), (0.5, 0)]).unwrap();
        assert_eq!(matrix_at(&ds, 0.5), ConfusionMatrix::new(1, 2, 0, 0));
    }

    #[test]
    fn matrix_at_extremes() {
        let ds = reference();
        assert_eq!(matrix_at(&ds, 0.0), ConfusionMatrix::new(5, 4, 0, 0));
        assert_eq!(matrix_at(&ds, 1.0), ConfusionMatrix::new(0, 0, 5, 4));
        assert_eq!(
            matrix_at(&ds, f64::INFINITY),
            ConfusionMatrix::new(0, 0, 5, 4)
        );
    }

    #[test]
    fn matrices_at_preserves_order() {
        let ds = reference();
        let matrices = matrices_at(&ds, &[0.75, 0.2]);
        assert_eq!(
            matrices,
            vec![
                ConfusionMatrix::new(2, 0, 3, 4),
                ConfusionMatrix::new(5, 3, 0, 1)
            ]
        );
    }

    #[test]
    fn sweep_over_scores_ends_at_infinity() {
        let ds = reference();
        let steps: Vec<_> = ds.sweep(&Thresholds::Scores).unwrap().collect();
        assert_eq!(steps.len(), ds.len() + 1);
        assert_eq!(steps[0], (0.1, ConfusionMatrix::new(5, 4, 0, 0)));
        assert_eq!(steps[1], (0.2, ConfusionMatrix::new(5, 3, 0, 1)));
        let (last_t, last) = steps[steps.len() - 1];
        assert_eq!(last_t, f64::INFINITY);
        assert_eq!(last, ConfusionMatrix::new(0, 0, 5, 4));
    }

    #[test]
    fn sweep_explicit_thresholds() {
        let ds = reference();
        let steps: Vec<_> = ds
            .sweep(&Thresholds::from(vec![0.75, 0.2, 0.2]))
            .unwrap()
            .collect();
        assert_eq!(
            steps,
            vec![
                (0.2, ConfusionMatrix::new(5, 3, 0, 1)),
                (0.75, ConfusionMatrix::new(2, 0, 3, 4)),
                (f64::INFINITY, ConfusionMatrix::new(0, 0, 5, 4)),
            ]
        );
    }

    #[test]
    fn sweep_first_threshold_above_some_scores() {
        let ds = ClassifierDataset::new(vec![(-1.0, 1), (-0.5, 0), (0.3, 1), (0.6, 0)]).unwrap();
        let steps: Vec<_> = ds.sweep(&Thresholds::Count(2)).unwrap().collect();
        assert_eq!(
            steps,
            vec![
                (0.0, ConfusionMatrix::new(1, 1, 1, 1)),
                (0.5, ConfusionMatrix::new(0, 1, 2, 1)),
                (f64::INFINITY, ConfusionMatrix::new(0, 0, 2, 2)),
            ]
        );
    }

    #[test]
    fn sweep_duplicate_score_thresholds_repeat_matrix() {
        let ds = ClassifierDataset::new(vec![(0.4, 1), (0.4, 0), (0.8, 1)]).unwrap();
        let steps: Vec<_> = ds.sweep(&Thresholds::Scores).unwrap().collect();
        assert_eq!(steps.len(), 4);
        assert_eq!(steps[0], steps[1]);
    }

    #[test]
    fn empty_dataset_sweeps_nothing() {
        let ds = ClassifierDataset::new(Vec::<(f64, bool)>::new()).unwrap();
        assert_eq!(ds.sweep(&Thresholds::Count(10)).unwrap().count(), 0);
        assert_eq!(ds.sweep(&Thresholds::Scores).unwrap().count(), 0);
    }

    #[test]
    fn nan_threshold_rejected_regardless_of_dataset_size() {
        let empty = ClassifierDataset::new(Vec::<(f64, bool)>::new()).unwrap();
        let bad = Thresholds::Explicit(vec![0.5, f64::NAN]);
        assert!(matches!(
            empty.sweep(&bad),
            Err(DatasetError::NanThreshold { index: 1 })
        ));
        assert!(matches!(
            reference().sweep(&bad),
            Err(DatasetError::NanThreshold { index: 1 })
        ));
    }

    #[test]
    fn empty_threshold_list_sweeps_nothing() {
        let ds = reference();
        assert_eq!(ds.sweep(&Thresholds::Count(0)).unwrap().count(), 0);
        assert_eq!(ds.sweep(&Thresholds::Explicit(vec![])).unwrap().count(), 0);
    }

    #[test]
    fn yielded_matrices_are_snapshots() {
        let ds = reference();
        let mut sweep = ds.sweep(&Thresholds::Count(4)).unwrap();
        let (_, first) = sweep.next().unwrap();
        let rest: Vec<_> = sweep.collect();
        assert_eq!(first, ConfusionMatrix::new(5, 4, 0, 0));
        assert_ne!(rest.last().unwrap().1, first);
    }

    #[test]
    fn exact_size_and_fused() {
        let ds = reference();
        let mut sweep = ds.sweep(&Thresholds::Count(3)).unwrap();
        assert_eq!(sweep.len(), 4);
        sweep.by_ref().for_each(drop);
        assert_eq!(sweep.next(), None);
        assert_eq!(sweep.next(), None);
    }

    #[test]
    fn infinite_scores_stay_positive_at_terminal_threshold() {
        let ds = ClassifierDataset::new(vec![(0.1, 0), (f64::INFINITY, 1)]).unwrap();
        let last = ds.sweep(&Thresholds::Scores).unwrap().last().unwrap();
        assert_eq!(last, (f64::INFINITY, ConfusionMatrix::new(1, 0, 0, 1)));
    }
}
