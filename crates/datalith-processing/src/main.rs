//! Command-line entry point for the analytics pipeline.

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use datalith_processing::{
    anomaly::anomalous_rows, AnomalyDetector, AppConfig, DataCleaner, DatasetLoader,
    DetectionMethod, StatisticalAnalyzer,
};
use polars::prelude::*;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "datalith", about = "Tabular data cleaning and analysis", version)]
struct Cli {
    /// Input dataset (csv, ndjson, jsonl, or parquet)
    #[arg(short, long, global = true)]
    input: Option<PathBuf>,

    /// Optional configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compute descriptive statistics, correlations, and normality checks
    Analyze {
        /// Target column to rank other columns against
        #[arg(short, long)]
        target: Option<String>,
        /// Write the statistics bundle as JSON to this path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Run the cleaning pipeline and write the cleaned dataset
    Clean {
        /// Target column exempt from capping and encoding
        #[arg(short, long)]
        target: Option<String>,
        /// Output CSV path
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Flag anomalous rows
    Detect {
        /// Detection method
        #[arg(short, long, value_enum, default_value_t = MethodArg::Zscore)]
        method: MethodArg,
        /// Z-score threshold (zscore method only)
        #[arg(short = 't', long, default_value_t = 2.5)]
        threshold: f64,
        /// Write flagged rows as CSV to this path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum MethodArg {
    IsolationForest,
    Zscore,
    Iqr,
}

impl From<MethodArg> for DetectionMethod {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::IsolationForest => DetectionMethod::IsolationForest,
            MethodArg::Zscore => DetectionMethod::ZScore,
            MethodArg::Iqr => DetectionMethod::IqrBounds,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = cli
        .config
        .as_ref()
        .map(AppConfig::load)
        .unwrap_or_default();

    // RUST_LOG wins, then --verbose, then the configured level.
    let default_level = log_level(cli.verbose, &config);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let input = cli
        .input
        .clone()
        .context("an input file is required (--input)")?;
    let df = DatasetLoader::new().load(&input)?;

    match cli.command {
        Command::Analyze { target, output } => {
            let bundle = StatisticalAnalyzer::new().analyze(&df, target.as_deref())?;
            let json = serde_json::to_string_pretty(&bundle)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, json)?;
                    info!(path = %path.display(), "statistics written");
                }
                None => println!("{json}"),
            }
        }
        Command::Clean { target, output } => {
            let mut cleaner = DataCleaner::new();
            let mut cleaned = cleaner.process(&df, target.as_deref())?;
            write_csv(&mut cleaned, &output)?;
            info!(path = %output.display(), rows = cleaned.height(), "cleaned dataset written");
        }
        Command::Detect {
            method,
            threshold,
            output,
        } => {
            let mut detector = AnomalyDetector::new(method.into()).with_threshold(threshold);
            let report = detector.detect(&df, None)?;
            info!(flagged = report.count(), "detection finished");
            match output {
                Some(path) => {
                    let mut rows = anomalous_rows(&df, &report)?;
                    write_csv(&mut rows, &path)?;
                    info!(path = %path.display(), "flagged rows written");
                }
                None => println!("{}", serde_json::to_string_pretty(&report)?),
            }
        }
    }
    Ok(())
}

fn write_csv(df: &mut DataFrame, path: &std::path::Path) -> anyhow::Result<()> {
    let mut file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    CsvWriter::new(&mut file).finish(df)?;
    Ok(())
}

fn log_level(verbose: bool, config: &AppConfig) -> &str {
    if verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_overrides_configured_level() {
        let mut config = AppConfig::default();
        config.logging.level = "warn".to_string();
        assert_eq!(log_level(false, &config), "warn");
        assert_eq!(log_level(true, &config), "debug");
    }
}
