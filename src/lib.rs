//! bloxdump - Roblox HTTP cache extractor
//!
//! Decodes the framed records in the Roblox client's on-disk HTTP cache,
//! sniffs each cached body's media type from its leading bytes, and writes
//! the selected types (OGG audio by default) to an output directory.
//!
//! The two core pieces are independent of each other and of the
//! filesystem:
//!
//! * [`cache`]: the `RBXH` record parser and its per-run dedup set.
//! * [`sniff`]: the signature-based content classifier.
//!
//! [`extract`] wires them to the directory [`scanner`] and the output
//! writer.

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod logging;
pub mod progress;
pub mod scanner;
pub mod sniff;

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::cli::{Cli, SummaryFormat};
use crate::config::Config;
use crate::error::ExitCode;
use crate::extract::Extractor;
use crate::progress::Progress;
use crate::scanner::Walker;

/// Application name shown in the startup banner.
pub const APP_NAME: &str = "BloxDump";

/// Run the application for parsed command-line arguments.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the cache directory
/// cannot be walked. Per-file problems are logged and counted instead.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet, cli.no_color);
    log::info!(
        "{} v{} - cache extractor",
        APP_NAME,
        env!("CARGO_PKG_VERSION")
    );

    let mut config = match &cli.config {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    };
    config.apply_cli_overrides(&cli);

    let targets = config
        .target_formats()
        .context("Invalid extraction settings")?;
    log::debug!(
        "Extracting: {}",
        targets
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    );

    let walker = Walker::new(&cli.cache_dir, config.walker_config());
    let progress = Arc::new(Progress::new(cli.quiet));
    let mut extractor = Extractor::new(&cli.output_dir)
        .with_targets(targets)
        .with_progress(progress);

    let summary = extractor.run(&walker)?;

    match cli.summary {
        SummaryFormat::Text if !cli.quiet => println!("{}", summary.render_text()),
        SummaryFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("Failed to serialize summary")?
        ),
        SummaryFormat::Text | SummaryFormat::None => {}
    }

    Ok(ExitCode::Success)
}
