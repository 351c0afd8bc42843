//! CSV and JSON writers for threshold sweep results.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, instrument};
use yardstick_metrics::{ClassifierDataset, ConfusionMatrix, Metric};

use crate::domain::ExperimentName;
use crate::IoError;

/// Writes sweep results to `{experiment}_sweep.csv` or `{experiment}_sweep.json`.
///
/// Creates the output directory on construction if it does not exist.
/// Metric values that hit a zero denominator are written as an empty CSV
/// cell or a JSON `null`. JSON has no infinities or NaN either, so the
/// terminal `+∞` threshold and non-finite odds ratios also become `null`.
pub struct SweepWriter {
    output_dir: PathBuf,
    experiment: ExperimentName,
}

/// Evaluate each metric, mapping division errors to `None`.
fn metric_values(matrix: &ConfusionMatrix, metrics: &[Metric]) -> Vec<Option<f64>> {
    metrics.iter().map(|m| m.evaluate(matrix).ok()).collect()
}

fn metric_map(matrix: &ConfusionMatrix, metrics: &[Metric]) -> BTreeMap<String, Option<f64>> {
    metrics
        .iter()
        .map(ToString::to_string)
        .zip(metric_values(matrix, metrics))
        .collect()
}

impl SweepWriter {
    /// Create a new writer targeting the given directory and experiment name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::OutputDirCreate`] if the directory cannot be created.
    #[instrument(skip_all, fields(dir = %output_dir.display(), experiment = %experiment))]
    pub fn new(output_dir: &Path, experiment: ExperimentName) -> Result<Self, IoError> {
        fs::create_dir_all(output_dir).map_err(|e| IoError::OutputDirCreate {
            path: output_dir.to_path_buf(),
            source: e,
        })?;
        debug!("output directory ready");
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            experiment,
        })
    }

    fn artifact_path(&self, extension: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}_sweep.{extension}", self.experiment.as_str()))
    }

    /// Write one row per sweep step to `{experiment}_sweep.csv`.
    ///
    /// Columns are `threshold,tp,fp,tn,fn` followed by one column per metric.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::CsvWrite`] if the file cannot be created or written.
    #[instrument(skip_all, fields(n_steps = steps.len()))]
    pub fn write_csv(
        &self,
        steps: &[(f64, ConfusionMatrix)],
        metrics: &[Metric],
    ) -> Result<PathBuf, IoError> {
        let path = self.artifact_path("csv");
        let csv_err = |e: csv::Error| IoError::CsvWrite {
            path: path.clone(),
            source: e,
        };

        let mut wtr = csv::Writer::from_path(&path).map_err(csv_err)?;

        let mut header = vec![
            "threshold".to_string(),
            "tp".to_string(),
            "fp".to_string(),
            "tn".to_string(),
            "fn".to_string(),
        ];
        header.extend(metrics.iter().map(ToString::to_string));
        wtr.write_record(&header).map_err(csv_err)?;

        for (threshold, matrix) in steps {
            let mut row = vec![
                threshold.to_string(),
                matrix.tp.to_string(),
                matrix.fp.to_string(),
                matrix.tn.to_string(),
                matrix.fn_.to_string(),
            ];
            row.extend(
                metric_values(matrix, metrics)
                    .into_iter()
                    .map(|v| v.map(|v| v.to_string()).unwrap_or_default()),
            );
            wtr.write_record(&row).map_err(csv_err)?;
        }

        wtr.flush().map_err(|e| IoError::WriteFile {
            path: path.clone(),
            source: e,
        })?;

        info!(path = %path.display(), "sweep CSV written");
        Ok(path)
    }

    /// Write the dataset summary and every sweep step to
    /// `{experiment}_sweep.json`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`IoError::Serialize`] | JSON encoding failed |
    /// | [`IoError::WriteFile`] | file write failed |
    #[instrument(skip_all, fields(n_steps = steps.len()))]
    pub fn write_json(
        &self,
        dataset: &ClassifierDataset,
        steps: &[(f64, ConfusionMatrix)],
        metrics: &[Metric],
    ) -> Result<PathBuf, IoError> {
        let path = self.artifact_path("json");

        let artifact = SweepArtifact {
            experiment: self.experiment.as_str(),
            title: dataset.title(),
            n: dataset.len(),
            total_positives: dataset.total_positives(),
            total_negatives: dataset.total_negatives(),
            metrics: metrics
                .iter()
                .map(|m| MetricEntry {
                    name: m.to_string(),
                    label: m.label(),
                })
                .collect(),
            steps: steps
                .iter()
                .map(|(threshold, matrix)| StepEntry {
                    threshold: *threshold,
                    matrix: *matrix,
                    metrics: metric_map(matrix, metrics),
                })
                .collect(),
        };

        let json = serde_json::to_string_pretty(&artifact)
            .map_err(|e| IoError::Serialize { source: e })?;
        fs::write(&path, &json).map_err(|e| IoError::WriteFile {
            path: path.clone(),
            source: e,
        })?;

        info!(path = %path.display(), "sweep JSON written");
        Ok(path)
    }
}

/// Render single-threshold lookups as a pretty-printed JSON array.
///
/// `thresholds[i]` pairs with `matrices[i]`.
///
/// # Errors
///
/// Returns [`IoError::Serialize`] if JSON encoding fails.
pub fn lookups_to_json(
    thresholds: &[f64],
    matrices: &[ConfusionMatrix],
    metrics: &[Metric],
) -> Result<String, IoError> {
    let entries: Vec<StepEntry> = thresholds
        .iter()
        .zip(matrices)
        .map(|(&threshold, matrix)| StepEntry {
            threshold,
            matrix: *matrix,
            metrics: metric_map(matrix, metrics),
        })
        .collect();
    serde_json::to_string_pretty(&entries).map_err(|e| IoError::Serialize { source: e })
}

// --- Shadow structs for JSON serialization ---

#[derive(Serialize)]
struct SweepArtifact<'a> {
    experiment: &'a str,
    title: Option<&'a str>,
    n: usize,
    total_positives: usize,
    total_negatives: usize,
    metrics: Vec<MetricEntry>,
    steps: Vec<StepEntry>,
}

#[derive(Serialize)]
struct MetricEntry {
    name: String,
    label: &'static str,
}

#[derive(Serialize)]
struct StepEntry {
    threshold: f64,
    #[serde(flatten)]
    matrix: ConfusionMatrix,
    metrics: BTreeMap<String, Option<f64>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use yardstick_metrics::Thresholds;

    fn reference() -> ClassifierDataset {
        let scores = [0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9];
        let labels = [0, 0, 0, 1, 0, 1, 1, 1, 1];
        ClassifierDataset::new(scores.into_iter().zip(labels))
            .unwrap()
            .with_title("reference")
    }

    fn steps(ds: &ClassifierDataset) -> Vec<(f64, ConfusionMatrix)> {
        ds.sweep(&Thresholds::Explicit(vec![0.2, 0.75])).unwrap().collect()
    }

    #[test]
    fn write_csv_rows_and_header() {
        let dir = TempDir::new().unwrap();
        let experiment = ExperimentName::new("csv_test".into()).unwrap();
        let writer = SweepWriter::new(dir.path(), experiment).unwrap();

        let ds = reference();
        let path = writer
            .write_csv(&steps(&ds), &[Metric::Precision, Metric::Fdr])
            .unwrap();
        assert_eq!(path, dir.path().join("csv_test_sweep.csv"));

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "threshold,tp,fp,tn,fn,precision,fdr");
        assert_eq!(lines[1], "0.2,5,3,1,0,0.625,0.375");
        assert!(lines[2].starts_with("0.75,2,0,4,3,1,0"));
        // All-negative step: precision falls back to 1, fdr is undefined.
        assert_eq!(lines[3], "inf,0,0,4,5,1,");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn write_json_structure() {
        let dir = TempDir::new().unwrap();
        let experiment = ExperimentName::new("json_test".into()).unwrap();
        let writer = SweepWriter::new(dir.path(), experiment).unwrap();

        let ds = reference();
        let path = writer
            .write_json(&ds, &steps(&ds), &[Metric::Recall, Metric::Fpr])
            .unwrap();

        let content: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();

        assert_eq!(content["experiment"], "json_test");
        assert_eq!(content["title"], "reference");
        assert_eq!(content["n"], 9);
        assert_eq!(content["total_positives"], 5);
        assert_eq!(content["total_negatives"], 4);
        assert_eq!(content["metrics"][1]["label"], "False positive rate");

        let steps = content["steps"].as_array().unwrap();
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[0]["tp"], 5);
        assert_eq!(steps[0]["fn"], 0);
        assert_eq!(steps[0]["metrics"]["recall"], 1.0);
        assert!(steps[2]["threshold"].is_null());
        assert_eq!(steps[2]["metrics"]["recall"], 0.0);
    }

    #[test]
    fn write_creates_output_dir() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("nested").join("deep");
        let experiment = ExperimentName::new("nested_test".into()).unwrap();
        let writer = SweepWriter::new(&nested, experiment).unwrap();

        let ds = reference();
        writer.write_csv(&steps(&ds), &[]).unwrap();
        assert!(nested.join("nested_test_sweep.csv").exists());
    }

    #[test]
    fn lookups_render_division_errors_as_null() {
        let matrices = [ConfusionMatrix::new(0, 0, 5, 4)];
        let json = lookups_to_json(&[1.0], &matrices, &[Metric::Fdr, Metric::Precision]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value[0]["metrics"]["fdr"].is_null());
        assert_eq!(value[0]["metrics"]["precision"], 1.0);
        assert_eq!(value[0]["tn"], 4);
    }
}
