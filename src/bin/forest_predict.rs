//! Scores every row of an svm file against a forest model and prints one
//! value per row, in input order.

use anyhow::{Context, Result};
use clap::Parser;
use dtree_rust::config::DEFAULT_CONFIG_FILE;
use dtree_rust::{ConfigManager, ForestConfig, Predictor};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Forest prediction utility
#[derive(Parser, Debug)]
#[command(name = "forest-predict")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Model file
    #[arg(value_name = "MODEL_FILE")]
    model_file: PathBuf,

    /// Sparse svm input file
    #[arg(value_name = "SVM_FILE")]
    svm_file: PathBuf,

    /// Configuration file (.toml or .json); defaults to ./dtree.toml when present
    #[arg(short, long, env = "DTREE_CONFIG")]
    config: Option<PathBuf>,

    /// Print raw scores instead of probabilities
    #[arg(long)]
    raw_score: bool,

    /// Reject rows whose feature ids are not strictly ascending
    #[arg(long)]
    strict: bool,

    /// Reject models containing cycles
    #[arg(long)]
    reject_cycles: bool,

    /// Offset added to zero-based svm indices
    #[arg(long)]
    feature_offset: Option<u32>,

    /// Scoring threads (0 = all cores)
    #[arg(short = 'j', long)]
    threads: Option<usize>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn setup_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let env = env_logger::Env::default().default_filter_or(default);
    let _ = env_logger::Builder::from_env(env).try_init();
}

fn build_config(cli: &Cli) -> Result<ForestConfig> {
    let default_path = Path::new(DEFAULT_CONFIG_FILE);
    let path = match &cli.config {
        Some(path) => Some(path.as_path()),
        None if default_path.is_file() => Some(default_path),
        None => None,
    };

    let mut manager = match path {
        Some(path) => ConfigManager::from_file(path)
            .with_context(|| format!("cannot read config {}", path.display()))?,
        None => ConfigManager::new(),
    };
    manager.apply_environment_overrides()?;

    let config = manager.config_mut();
    config.raw_score |= cli.raw_score;
    config.strict_features |= cli.strict;
    config.reject_cycles |= cli.reject_cycles;
    if let Some(offset) = cli.feature_offset {
        config.feature_offset = offset;
    }
    if let Some(threads) = cli.threads {
        config.num_threads = threads;
    }
    config.validate()?;

    log::debug!("{}", manager.summary());
    Ok(manager.into_config())
}

fn run(cli: &Cli) -> Result<()> {
    let config = build_config(cli)?;

    let predictor = Predictor::from_model_file(&cli.model_file, config)
        .with_context(|| format!("cannot load model {}", cli.model_file.display()))?;

    let values = predictor
        .predict_svm_file(&cli.svm_file)
        .with_context(|| format!("cannot score {}", cli.svm_file.display()))?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for value in values {
        writeln!(out, "{}", value)?;
    }
    out.flush()?;

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
