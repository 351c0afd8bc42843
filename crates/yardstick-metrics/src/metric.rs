//! Named metrics with human-readable labels for downstream display.

use std::fmt;
use std::str::FromStr;

use crate::confusion::ConfusionMatrix;
use crate::error::MetricError;

/// A metric derived from a [`ConfusionMatrix`].
///
/// Every variant carries a [`label`](Metric::label) suitable as a plot axis
/// title and a short [`name`](Metric::name) used on the command line and
/// in output columns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Metric {
    /// `(tp + tn) / N`.
    Accuracy,
    /// Fraction of data classified negative.
    Fdn,
    /// Fraction of data classified positive.
    Fdp,
    /// False discovery rate.
    Fdr,
    /// False positive rate.
    Fpr,
    /// F-score with the given beta.
    FScore(f64),
    /// Matthews correlation coefficient.
    Mcc,
    /// Negative predictive value.
    Npv,
    /// Odds ratio.
    OddsRatio,
    /// Precision, a.k.a. positive predictive value.
    Precision,
    /// Recall, a.k.a. sensitivity or true positive rate.
    Recall,
    /// True negative rate, a.k.a. specificity.
    Tnr,
}

impl Metric {
    /// Every metric, with the F-score at `beta = 1.0`.
    pub const ALL: [Metric; 12] = [
        Metric::Accuracy,
        Metric::Fdn,
        Metric::Fdp,
        Metric::Fdr,
        Metric::Fpr,
        Metric::FScore(1.0),
        Metric::Mcc,
        Metric::Npv,
        Metric::OddsRatio,
        Metric::Precision,
        Metric::Recall,
        Metric::Tnr,
    ];

    /// Human-readable label, e.g. `"False positive rate"`.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Metric::Accuracy => "Accuracy",
            Metric::Fdn => "Fraction of data classified negative",
            Metric::Fdp => "Fraction of data classified positive",
            Metric::Fdr => "False discovery rate",
            Metric::Fpr => "False positive rate",
            Metric::FScore(_) => "F-score",
            Metric::Mcc => "Matthews correlation coefficient",
            Metric::Npv => "Negative predictive value",
            Metric::OddsRatio => "Odds ratio",
            Metric::Precision => "Precision",
            Metric::Recall => "Recall",
            Metric::Tnr => "True negative rate",
        }
    }

    /// Short identifier, e.g. `"fpr"`.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Metric::Accuracy => "accuracy",
            Metric::Fdn => "fdn",
            Metric::Fdp => "fdp",
            Metric::Fdr => "fdr",
            Metric::Fpr => "fpr",
            Metric::FScore(_) => "f_score",
            Metric::Mcc => "mcc",
            Metric::Npv => "npv",
            Metric::OddsRatio => "odds_ratio",
            Metric::Precision => "precision",
            Metric::Recall => "recall",
            Metric::Tnr => "tnr",
        }
    }

    /// Evaluate this metric on `matrix`.
    ///
    /// # Errors
    ///
    /// Returns [`MetricError::DivisionByZero`] when the underlying
    /// [`ConfusionMatrix`] method does. Precision and odds ratio never fail.
    pub fn evaluate(&self, matrix: &ConfusionMatrix) -> Result<f64, MetricError> {
        match *self {
            Metric::Accuracy => matrix.accuracy(),
            Metric::Fdn => matrix.fdn(),
            Metric::Fdp => matrix.fdp(),
            Metric::Fdr => matrix.fdr(),
            Metric::Fpr => matrix.fpr(),
            Metric::FScore(beta) => matrix.f_score(beta),
            Metric::Mcc => matrix.mcc(),
            Metric::Npv => matrix.npv(),
            Metric::OddsRatio => Ok(matrix.odds_ratio()),
            Metric::Precision => Ok(matrix.precision()),
            Metric::Recall => matrix.recall(),
            Metric::Tnr => matrix.tnr(),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::FScore(beta) if *beta != 1.0 => write!(f, "f_score({beta})"),
            other => f.write_str(other.name()),
        }
    }
}

impl FromStr for Metric {
    type Err = MetricError;

    /// Parses a metric name or one of its aliases (`ppv`, `sensitivity`,
    /// `tpr`, `specificity`, `f1`). `f_score` parses at `beta = 1.0`;
    /// `f_score(2)` or `f2` select another beta.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        let metric = match key.as_str() {
            "accuracy" => Metric::Accuracy,
            "fdn" => Metric::Fdn,
            "fdp" => Metric::Fdp,
            "fdr" => Metric::Fdr,
            "fpr" => Metric::Fpr,
            "f_score" | "f1" => Metric::FScore(1.0),
            "mcc" => Metric::Mcc,
            "npv" => Metric::Npv,
            "odds_ratio" => Metric::OddsRatio,
            "precision" | "ppv" => Metric::Precision,
            "recall" | "sensitivity" | "tpr" => Metric::Recall,
            "tnr" | "specificity" => Metric::Tnr,
            other => {
                let beta = other
                    .strip_prefix("f_score(")
                    .and_then(|rest| rest.strip_suffix(')'))
                    .or_else(|| other.strip_prefix('f'))
                    .and_then(|b| b.parse::<f64>().ok())
                    .filter(|b| b.is_finite() && *b >= 0.0);
                match beta {
                    Some(beta) => Metric::FScore(beta),
                    None => {
                        return Err(MetricError::UnknownMetric {
                            name: s.to_string(),
                        });
                    }
                }
            }
        };
        Ok(metric)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_distinct() {
        let mut labels: Vec<&str> = Metric::ALL.iter().map(Metric::label).collect();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), Metric::ALL.len());
    }

    #[test]
    fn names_parse_back() {
        for metric in Metric::ALL {
            assert_eq!(metric.name().parse::<Metric>().unwrap(), metric);
        }
    }

    #[test]
    fn aliases_parse() {
        assert_eq!("ppv".parse::<Metric>().unwrap(), Metric::Precision);
        assert_eq!("Sensitivity".parse::<Metric>().unwrap(), Metric::Recall);
        assert_eq!("tpr".parse::<Metric>().unwrap(), Metric::Recall);
        assert_eq!("specificity".parse::<Metric>().unwrap(), Metric::Tnr);
        assert_eq!("f1".parse::<Metric>().unwrap(), Metric::FScore(1.0));
    }

    #[test]
    fn f_score_beta_parses() {
        assert_eq!("f2".parse::<Metric>().unwrap(), Metric::FScore(2.0));
        assert_eq!(
            "f_score(0.5)".parse::<Metric>().unwrap(),
            Metric::FScore(0.5)
        );
        assert_eq!(Metric::FScore(0.5).to_string(), "f_score(0.5)");
        assert_eq!(Metric::FScore(1.0).to_string(), "f_score");
    }

    #[test]
    fn unknown_name_rejected() {
        assert!(matches!(
            "auc".parse::<Metric>(),
            Err(MetricError::UnknownMetric { .. })
        ));
        assert!("fnord".parse::<Metric>().is_err());
    }

    #[test]
    fn evaluate_matches_matrix_methods() {
        let cm = ConfusionMatrix::new(63, 28, 37, 72);
        assert_eq!(Metric::Fdr.evaluate(&cm), cm.fdr());
        assert_eq!(Metric::OddsRatio.evaluate(&cm), Ok(cm.odds_ratio()));
        assert_eq!(Metric::FScore(2.0).evaluate(&cm), cm.f_score(2.0));
    }

    #[test]
    fn evaluate_propagates_division_error() {
        let cm = ConfusionMatrix::new(0, 0, 4, 6);
        assert_eq!(Metric::Precision.evaluate(&cm), Ok(1.0));
        assert!(Metric::Fdr.evaluate(&cm).is_err());
        assert!(Metric::Fpr.evaluate(&cm).is_ok());
    }
}
