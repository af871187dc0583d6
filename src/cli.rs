//! Command-line interface definitions for bloxdump.
//!
//! # Example
//!
//! ```bash
//! # Extract cached sounds
//! bloxdump "%LOCALAPPDATA%\Roblox\http" ./output
//!
//! # Also pull out MP3s and PNGs, print the summary as JSON
//! bloxdump ~/roblox-cache ./output -t ogg -t mp3 -t png --summary json
//!
//! # Verbose mode for debugging
//! bloxdump -v ~/roblox-cache ./output
//! ```

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Extract cached media from the Roblox client's HTTP cache.
///
/// Every file under CACHE_DIR is decoded as a cache record; payloads of the
/// selected types (OGG audio by default) are written below OUTPUT_DIR in a
/// per-category folder such as `Sounds/`.
#[derive(Debug, Parser)]
#[command(name = "bloxdump")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Cache directory to scan
    #[arg(value_name = "CACHE_DIR")]
    pub cache_dir: PathBuf,

    /// Directory extracted files are written to
    #[arg(value_name = "OUTPUT_DIR")]
    pub output_dir: PathBuf,

    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR")]
    pub no_color: bool,

    /// Report fatal errors as JSON on stderr
    #[arg(long)]
    pub json_errors: bool,

    /// Config file to load instead of the platform default
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Media type to extract, by extension (can be specified multiple times)
    ///
    /// Known types: ogg, rbxm, png, gif, jfif, mp3, webp. Default: ogg.
    #[arg(short = 't', long = "type", value_name = "EXT")]
    pub types: Vec<String>,

    /// Follow symbolic links inside the cache directory
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Skip hidden files and directories (starting with .)
    #[arg(long)]
    pub skip_hidden: bool,

    /// Skip cache files larger than this (e.g., 50MB, 1GiB)
    #[arg(long, value_name = "SIZE", value_parser = parse_size)]
    pub max_file_size: Option<u64>,

    /// Format of the end-of-run summary
    #[arg(long, value_enum, default_value = "text")]
    pub summary: SummaryFormat,
}

/// Format of the end-of-run summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SummaryFormat {
    /// Human-readable lines on stdout
    Text,
    /// A JSON object on stdout
    Json,
    /// No summary
    None,
}

/// Parse a human-readable size string into bytes.
///
/// Supports suffixes: B, K/KB, KiB, M/MB, MiB, G/GB, GiB, T/TB, TiB.
/// Case-insensitive. Numbers without suffix are treated as bytes.
///
/// # Examples
///
/// ```
/// use bloxdump::cli::parse_size;
///
/// assert_eq!(parse_size("1024").unwrap(), 1024);
/// assert_eq!(parse_size("1KB").unwrap(), 1000);
/// assert_eq!(parse_size("1MiB").unwrap(), 1_048_576);
/// ```
///
/// # Errors
///
/// Returns an error if the string is empty, not a number, negative, or has
/// an unknown suffix.
pub fn parse_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("Size cannot be empty".to_string());
    }
    if s.starts_with('-') {
        return Err("Size cannot be negative".to_string());
    }

    let split = s
        .find(|c: char| !c.is_ascii_digit() && c != '.')
        .unwrap_or(s.len());
    let (num_str, suffix) = s.split_at(split);
    let suffix = suffix.trim().to_ascii_uppercase();

    let num: f64 = num_str
        .parse()
        .map_err(|_| format!("Invalid number: '{num_str}'"))?;

    let multiplier: u64 = match suffix.as_str() {
        "" | "B" => 1,
        "K" | "KB" => 1_000,
        "KIB" => 1 << 10,
        "M" | "MB" => 1_000_000,
        "MIB" => 1 << 20,
        "G" | "GB" => 1_000_000_000,
        "GIB" => 1 << 30,
        "T" | "TB" => 1_000_000_000_000,
        "TIB" => 1 << 40,
        _ => return Err(format!("Unknown size suffix: '{suffix}'")),
    };

    Ok((num * multiplier as f64) as u64)
}
