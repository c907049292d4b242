//! HLS WebVTT re-segmenter
//!
//! Command line front end: builds a trigger event from a manifest URI or an
//! event file and runs the segmenter against a file system object store.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hls_vtt_segmenter::config_file::{generate_default_config, load_config};
use hls_vtt_segmenter::{
    run, FsStorage, MemoryStorage, Result, SegmenterConfig, SegmenterError, TriggerEvent,
};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
const APP_NAME: &str = "hls-vtt-segmenter";

/// Config file looked up when `--config` is not given
const DEFAULT_CONFIG_FILE: &str = "hls-vtt-segmenter.toml";

/// Re-segment the WebVTT track of an HLS asset onto its video segments.
#[derive(Parser, Debug, Clone)]
#[command(name = "hls-vtt-segmenter")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Master manifest URI (scheme://bucket/key.m3u8).
    #[arg(conflicts_with = "event", required_unless_present_any = ["event", "generate_config"])]
    uri: Option<String>,

    /// Read the trigger event JSON from a file ("-" for stdin).
    #[arg(short, long, value_name = "FILE")]
    event: Option<PathBuf>,

    /// Configuration file.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Object store root directory (overrides the config file).
    #[arg(short = 'r', long, value_name = "DIR")]
    storage_root: Option<String>,

    /// Logging level (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,

    /// Compute everything but keep the output in memory.
    #[arg(long)]
    dry_run: bool,

    /// Write a default configuration file and exit.
    #[arg(long, value_name = "FILE")]
    generate_config: Option<PathBuf>,
}

impl Cli {
    fn trigger_event(&self) -> Result<TriggerEvent> {
        match (&self.uri, &self.event) {
            (Some(uri), _) => Ok(TriggerEvent::new(uri.as_str())),
            (None, Some(path)) => {
                let text = if path.as_os_str() == "-" {
                    std::io::read_to_string(std::io::stdin())
                } else {
                    std::fs::read_to_string(path)
                }
                .map_err(|e| {
                    SegmenterError::InputValidation(format!(
                        "cannot read event {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                TriggerEvent::from_json(&text)
            }
            (None, None) => Err(SegmenterError::InputValidation(
                "no manifest URI or event given".to_string(),
            )),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(path) = &cli.generate_config {
        return match generate_default_config(path) {
            Ok(()) => {
                println!("Wrote default configuration to {}", path.display());
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("{}", e);
                ExitCode::FAILURE
            }
        };
    }

    let config = match load_cli_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    init_logging(&config);
    tracing::info!("{} v{} starting", APP_NAME, VERSION);
    tracing::debug!("Configuration loaded: {:?}", config);

    match execute(&cli, &config) {
        Ok(status) => {
            println!("{}", status);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Run failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Load the config file and apply command line overrides.
fn load_cli_config(cli: &Cli) -> Result<SegmenterConfig> {
    let (path, explicit) = match &cli.config {
        Some(path) => (path.clone(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };

    // The configured subscriber depends on the config, so report load
    // problems through a temporary one.
    let mut config = tracing::subscriber::with_default(
        tracing_subscriber::fmt().with_writer(std::io::stderr).finish(),
        || load_config(&path, explicit),
    )?;

    if let Some(root) = &cli.storage_root {
        config.storage_root = root.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    Ok(config)
}

fn execute(cli: &Cli, config: &SegmenterConfig) -> Result<String> {
    let event = cli.trigger_event()?;
    let fs = FsStorage::new(&config.storage_root);
    tracing::info!("Object store root: {}", fs.root().display());

    if cli.dry_run {
        let overlay = MemoryStorage::with_backing(Box::new(fs));
        let outcome = run(&event, &overlay, config)?;
        for key in overlay.keys() {
            tracing::info!("Dry run, not written: {}", key);
        }
        Ok(outcome.status())
    } else {
        Ok(run(&event, &fs, config)?.status())
    }
}

/// Initialize logging with tracing
fn init_logging(config: &SegmenterConfig) {
    let json = config.json_logs();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter().into()),
        )
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(|| tracing_subscriber::fmt::layer()))
        .init();
}
