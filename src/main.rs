use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log::info;
use shelter_features::{FeatureConfig, FeaturePipeline, OutputFormat};

#[derive(Parser, Debug)]
#[command(name = "shelter-features")]
#[command(about = "Derive age-in-months and breed purity features from shelter outcome data")]
#[command(version)]
struct Cli {
    /// JSON configuration file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Project root, replacing the per-platform default
    #[arg(long)]
    root: Option<PathBuf>,

    /// Input CSV (absolute, or relative to the project directory)
    #[arg(long, short)]
    input: Option<PathBuf>,

    /// Output file (absolute, or relative to the project directory)
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Output format: csv or parquet (default: from the output extension)
    #[arg(long)]
    format: Option<OutputFormat>,

    /// Keep rows without an age description instead of dropping them
    #[arg(long)]
    keep_missing_age: bool,

    /// Rows per record batch
    #[arg(long)]
    batch_size: Option<usize>,

    /// Log at debug level
    #[arg(long, short)]
    verbose: bool,
}

impl Cli {
    fn into_config(self) -> anyhow::Result<FeatureConfig> {
        let mut config = match &self.config {
            Some(path) => FeatureConfig::from_json_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => FeatureConfig::default(),
        };

        if let Some(root) = self.root {
            config.root = Some(root);
        }
        if let Some(input) = self.input {
            config.input = input;
        }
        if let Some(output) = self.output {
            config.output = output;
        }
        if self.format.is_some() {
            config.format = self.format;
        }
        if self.keep_missing_age {
            config.keep_missing_age = true;
        }
        if let Some(batch_size) = self.batch_size {
            config.batch_size = batch_size;
        }
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let config = cli.into_config()?;
    let pipeline = FeaturePipeline::new(config).with_progress(std::io::stderr().is_terminal());

    let summary = pipeline.run().context("Feature pipeline failed")?;

    info!(
        "Read {} rows, wrote {} rows to {} in {:?} ({} dropped, {} unparsed ages, {} mixed breeds)",
        summary.rows_read,
        summary.rows_written,
        summary.output_path.display(),
        summary.elapsed,
        summary.rows_dropped,
        summary.invalid_ages,
        summary.mixed_breeds
    );
    Ok(())
}
