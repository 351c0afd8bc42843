use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::info;

use yardstick_io::{lookups_to_json, ExperimentName, ObservationReader, SweepWriter};
use yardstick_metrics::{matrices_at, ClassifierDataset, ConfusionMatrix, Metric, Thresholds};

#[derive(Parser)]
#[command(name = "yardstick")]
#[command(about = "Confusion matrices and threshold sweeps for binary classifier output")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose (debug-level) logging
    #[arg(long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Number of threads for parallel lookups (defaults to all cores)
    #[arg(long, global = true)]
    threads: Option<usize>,
}

/// Shared input options.
#[derive(Args, Debug, Clone)]
struct InputArgs {
    /// Path to the input CSV file
    #[arg(long)]
    data: PathBuf,

    /// Name of the CSV column holding classifier scores
    #[arg(long, default_value = "score")]
    score_column: String,

    /// Name of the CSV column holding ground-truth labels
    #[arg(long, default_value = "label")]
    label_column: String,

    /// Comma-separated metrics to report (e.g. "precision,recall,fpr,f2")
    #[arg(long, value_delimiter = ',')]
    metrics: Vec<Metric>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Csv,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Sweep thresholds and write one confusion matrix per threshold
    Sweep {
        #[command(flatten)]
        input: InputArgs,

        /// Use N equidistant thresholds in [0, 1) instead of every score
        #[arg(long = "thresholds", value_name = "N", conflicts_with = "at")]
        count: Option<usize>,

        /// Use these comma-separated thresholds instead of every score
        #[arg(long, value_delimiter = ',')]
        at: Vec<f64>,

        /// Experiment name for output files (must match [a-zA-Z0-9_-]+)
        #[arg(long)]
        experiment: String,

        /// Output directory for result files
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,

        /// Artifact format
        #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
        format: OutputFormat,

        /// Dataset title recorded in the artifact (defaults to the file stem)
        #[arg(long)]
        title: Option<String>,
    },

    /// Print the confusion matrix and metrics at one or more thresholds
    At {
        #[command(flatten)]
        input: InputArgs,

        /// Comma-separated thresholds to evaluate
        #[arg(long, value_delimiter = ',', required = true)]
        threshold: Vec<f64>,
    },
}

// --- Stdout output structs ---

#[derive(Serialize)]
struct SweepOutput<'a> {
    experiment: &'a str,
    title: Option<&'a str>,
    n: usize,
    total_positives: usize,
    total_negatives: usize,
    n_steps: usize,
    artifact: PathBuf,
}

/// Metrics reported when `--metrics` is not given.
fn default_metrics() -> Vec<Metric> {
    vec![Metric::Precision, Metric::Recall, Metric::Fpr]
}

fn resolve_metrics(requested: Vec<Metric>) -> Vec<Metric> {
    if requested.is_empty() {
        default_metrics()
    } else {
        requested
    }
}

fn build_thresholds(count: Option<usize>, at: Vec<f64>) -> Thresholds {
    match (count, at.is_empty()) {
        (Some(n), _) => Thresholds::Count(n),
        (None, false) => Thresholds::Explicit(at),
        (None, true) => Thresholds::Scores,
    }
}

fn read_input(input: &InputArgs) -> Result<ClassifierDataset> {
    ObservationReader::new(&input.data)
        .with_score_column(input.score_column.as_str())
        .with_label_column(input.label_column.as_str())
        .read()
        .context("failed to read input CSV")
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match (cli.verbose, cli.quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "info",
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Configure Rayon thread pool
    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure thread pool")?;
        info!(threads, "thread pool configured");
    }

    match cli.command {
        Command::Sweep {
            input,
            count,
            at,
            experiment,
            output_dir,
            format,
            title,
        } => {
            let experiment_name = ExperimentName::new(experiment.clone())?;
            let mut dataset = read_input(&input)?;
            if title.is_some() {
                dataset.set_title(title);
            }
            let metrics = resolve_metrics(input.metrics);

            let thresholds = build_thresholds(count, at);
            let steps: Vec<(f64, ConfusionMatrix)> = dataset
                .sweep(&thresholds)
                .context("invalid thresholds")?
                .collect();
            info!(n_steps = steps.len(), "sweep complete");

            // Write artifact
            let writer = SweepWriter::new(&output_dir, experiment_name)?;
            let artifact = match format {
                OutputFormat::Csv => writer.write_csv(&steps, &metrics)?,
                OutputFormat::Json => writer.write_json(&dataset, &steps, &metrics)?,
            };

            // Build and print stdout summary
            let output = SweepOutput {
                experiment: &experiment,
                title: dataset.title(),
                n: dataset.len(),
                total_positives: dataset.total_positives(),
                total_negatives: dataset.total_negatives(),
                n_steps: steps.len(),
                artifact,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Command::At { input, threshold } => {
            let dataset = read_input(&input)?;
            let metrics = resolve_metrics(input.metrics);

            if let Some(index) = threshold.iter().position(|t| t.is_nan()) {
                anyhow::bail!("threshold {index} is NaN");
            }
            let matrices = matrices_at(&dataset, &threshold);
            println!("{}", lookups_to_json(&threshold, &matrices, &metrics)?);
        }
    }

    Ok(())
}
