use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::embed::{EmbedderHandle, ModelChoice};
use crate::pipeline::{self, RunOptions};

#[derive(Parser, Debug, Default)]
#[command(
    name = "movie-vectors",
    version,
    about = "Embed the keywords, cast, genres and director of each movie into a feature vector"
)]
pub struct Cli {
    /// TOML file with defaults for the options below
    #[arg(long, env = "MOVIE_VECTORS_CONFIG")]
    config: Option<PathBuf>,

    /// Comma-delimited movie table [default: movie_dataset.csv]
    #[arg(long, env = "MOVIE_VECTORS_INPUT")]
    input: Option<PathBuf>,

    /// Semicolon-delimited output [default: movie_vectors.csv]
    #[arg(long, env = "MOVIE_VECTORS_OUTPUT")]
    output: Option<PathBuf>,

    /// all-minilm-l6-v2, bge-small-en-v1.5, bge-base-en-v1.5 or potion-base-8m
    #[arg(long, env = "MOVIE_VECTORS_MODEL")]
    model: Option<String>,

    /// Texts per model call [default: 1]
    #[arg(long, env = "MOVIE_VECTORS_BATCH_SIZE")]
    batch_size: Option<usize>,

    /// Directory for downloaded model weights
    #[arg(long, env = "MOVIE_VECTORS_CACHE_DIR")]
    cache_dir: Option<PathBuf>,

    /// Hide the progress bar
    #[arg(long)]
    no_progress: bool,
}

impl Cli {
    /// Config file values, with flags taking precedence.
    pub fn resolve(&self) -> Result<Config> {
        let mut config = Config::load(self.config.as_deref())?;
        if let Some(input) = &self.input {
            config.input = input.clone();
        }
        if let Some(output) = &self.output {
            config.output = output.clone();
        }
        if let Some(model) = &self.model {
            config.model = model.clone();
        }
        if let Some(batch_size) = self.batch_size {
            config.batch_size = batch_size;
        }
        if let Some(cache_dir) = &self.cache_dir {
            config.cache_dir = Some(cache_dir.clone());
        }
        if self.no_progress {
            config.progress = false;
        }
        Ok(config)
    }
}

pub fn run() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = cli.resolve()?;

    let choice: ModelChoice = config.model.parse()?;
    let mut embedder = EmbedderHandle::with_model(choice, config.model_cache_dir())?;

    let summary = pipeline::run(
        &config.input,
        &config.output,
        &mut embedder,
        RunOptions {
            batch_size: config.batch_size,
            progress: config.progress,
        },
    )?;
    info!(
        rows = summary.rows,
        dims = summary.dimensions,
        model = %summary.model,
        output = %config.output.display(),
        "done"
    );
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init();
}
