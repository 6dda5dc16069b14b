//! versus-engine - command line front end
//!
//! Runs the engine operations on verses read from files, `--text`, or
//! stdin (`-`), and prints results as pretty JSON on stdout. Logs go to
//! stderr.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use versus_common::config::{self, TomlConfig};
use versus_engine::services::CacheOptions;
use versus_engine::{AnalysisMode, BeatContext, HistoricalVerse, VerseEngine};

/// Command-line arguments for versus-engine
#[derive(Parser, Debug)]
#[command(name = "versus-engine")]
#[command(about = "Verse analysis and flow modeling for rap battles")]
#[command(version)]
struct Cli {
    /// Config file (defaults to $VERSUS_CONFIG, then the per-user config)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score one verse
    Evaluate {
        #[command(flatten)]
        input: VerseInput,

        #[arg(short, long, default_value = "live")]
        mode: AnalysisMode,

        /// Wait for LLM commentary (requires augmentation to be configured)
        #[arg(long, conflicts_with = "against")]
        augment: bool,

        /// Earlier verse files; reused phrasing lowers originality
        #[arg(long, num_args = 1..)]
        against: Vec<PathBuf>,
    },
    /// Decide a head-to-head between two verse files
    Compare {
        verse_a: PathBuf,
        verse_b: PathBuf,

        #[arg(short, long, default_value = "final")]
        mode: AnalysisMode,
    },
    /// Map a verse onto a beat grid
    Align {
        #[command(flatten)]
        input: VerseInput,

        #[arg(long, default_value_t = 90.0)]
        bpm: f64,

        #[arg(long, default_value = "4/4")]
        time_signature: String,

        /// Comma-separated bar start offsets in milliseconds
        #[arg(long, value_delimiter = ',')]
        downbeats: Option<Vec<f64>>,
    },
    /// Summarize a style from scored history and/or raw verse files
    Profile {
        #[arg(short, long)]
        name: String,

        /// JSON array of {"verse", "score"} records
        #[arg(long)]
        history: Option<PathBuf>,

        /// Additional verse files, scored in final mode
        verses: Vec<PathBuf>,
    },
    /// Write a default config file
    InitConfig {
        /// Target path (defaults to the per-user config location)
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args, Debug)]
struct VerseInput {
    /// Verse file, or `-` for stdin
    file: Option<PathBuf>,

    /// Verse text given inline
    #[arg(short, long, conflicts_with = "file")]
    text: Option<String>,
}

impl VerseInput {
    fn read(&self) -> Result<String> {
        match (&self.text, &self.file) {
            (Some(text), _) => Ok(text.clone()),
            (None, Some(path)) => read_verse(path),
            (None, None) => bail!("provide a verse file, `-`, or --text"),
        }
    }
}

fn read_verse(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        return std::io::read_to_string(std::io::stdin()).context("Failed to read verse from stdin");
    }
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read verse file {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn init_tracing(config: &TomlConfig) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Command::InitConfig { path, force } = &cli.command {
        return init_config(path.as_deref(), *force);
    }

    let config = config::load_config(cli.config.as_deref()).context("Failed to load configuration")?;
    init_tracing(&config);
    info!("versus-engine {}", env!("CARGO_PKG_VERSION"));

    let engine = VerseEngine::from_config(&config).context("Failed to initialize engine")?;

    match cli.command {
        Command::Evaluate {
            input,
            mode,
            augment,
            against,
        } => {
            let text = input.read()?;
            let score = if !against.is_empty() {
                let priors = against
                    .iter()
                    .map(|path| read_verse(path))
                    .collect::<Result<Vec<_>>>()?;
                let priors: Vec<&str> = priors.iter().map(String::as_str).collect();
                engine.evaluate_against(&text, mode, &priors)?
            } else if augment {
                let options = CacheOptions::new(mode).with_augmentation();
                engine.evaluate_cached(&text, options).await?;
                // Commentary lands in the cache slot; give it its full budget
                tokio::time::sleep(config.augmentation.timeout()).await;
                engine.evaluate_cached(&text, CacheOptions::new(mode)).await?
            } else {
                engine.evaluate(&text, mode)?
            };
            print_json(&score)?;
        }
        Command::Compare {
            verse_a,
            verse_b,
            mode,
        } => {
            let a = read_verse(&verse_a)?;
            let b = read_verse(&verse_b)?;
            let result = engine.compare(&a, &b, mode).await?;
            print_json(&result)?;
        }
        Command::Align {
            input,
            bpm,
            time_signature,
            downbeats,
        } => {
            let text = input.read()?;
            let mut context = BeatContext::from_time_signature(bpm, &time_signature)?;
            if let Some(downbeats) = downbeats {
                context = context.with_downbeats(downbeats);
            }
            let model = engine.align_to_beat(&text, &context)?;
            print_json(&model)?;
        }
        Command::Profile {
            name,
            history,
            verses,
        } => {
            let mut records: Vec<HistoricalVerse> = match history {
                Some(path) => {
                    let content = std::fs::read_to_string(&path)
                        .with_context(|| format!("Failed to read history {}", path.display()))?;
                    serde_json::from_str(&content)
                        .with_context(|| format!("Invalid history JSON in {}", path.display()))?
                }
                None => Vec::new(),
            };
            for path in &verses {
                let verse = read_verse(path)?;
                let score = engine.evaluate(&verse, AnalysisMode::Final)?;
                records.push(HistoricalVerse { verse, score });
            }
            let profile = engine.extract_profile(&name, &records);
            print_json(&profile)?;
        }
        Command::InitConfig { path, force } => init_config(path.as_deref(), force)?,
    }

    engine.shutdown();
    Ok(())
}

fn init_config(path: Option<&Path>, force: bool) -> Result<()> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => config::default_config_path().context("No user config directory on this platform")?,
    };
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    config::write_toml_config(&TomlConfig::default(), &path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    eprintln!("Wrote default configuration to {}", path.display());
    Ok(())
}
