//! Application configuration management.
//!
//! Settings are merged in this order, later layers winning:
//!
//! 1. Built-in defaults
//! 2. TOML config file (`--config <PATH>` or the platform config directory)
//! 3. `BLOXDUMP_*` environment variables
//! 4. CLI flags (applied by [`Config::apply_cli_overrides`])
//!
//! # Example config file
//!
//! ```toml
//! extract = ["ogg", "mp3"]
//! skip_hidden = true
//! max_file_size = 104857600
//! ```

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::cli::Cli;
use crate::scanner::WalkerConfig;
use crate::sniff::MediaFormat;

/// Prefix of environment variables read into the configuration.
pub const ENV_PREFIX: &str = "BLOXDUMP_";

/// Errors in an otherwise loadable configuration.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// An `extract` entry names no known format.
    #[error("Unknown media type '{0}' (known: ogg, rbxm, png, gif, jfif, mp3, webp)")]
    UnknownMediaType(String),

    /// `extract` is empty, so nothing would ever be written.
    #[error("No media types selected for extraction")]
    NoMediaTypes,
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Extensions of the formats to extract.
    pub extract: Vec<String>,
    /// Follow symbolic links inside the cache directory.
    pub follow_symlinks: bool,
    /// Skip hidden files and directories.
    pub skip_hidden: bool,
    /// Cache files larger than this many bytes are skipped.
    pub max_file_size: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            extract: vec![MediaFormat::OGG.extension.to_string()],
            follow_symlinks: false,
            skip_hidden: false,
            max_file_size: None,
        }
    }
}

impl Config {
    /// Load the configuration from the default platform-specific path.
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from_path(path),
            None => Self::with_env(Self::default()),
        }
    }

    /// Load the configuration from a specific TOML file.
    ///
    /// A missing file is not an error. A file that fails to parse is logged
    /// and the defaults are used in its place. Invalid `BLOXDUMP_*` values
    /// are logged and leave the file settings untouched.
    pub fn load_from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let from_file = Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(path))
            .extract()
            .unwrap_or_else(|e| {
                log::warn!(
                    "Failed to load config from {}, using defaults: {}",
                    path.display(),
                    e
                );
                Self::default()
            });
        log::debug!("Loaded configuration (file: {})", path.display());

        Self::with_env(from_file)
    }

    /// Layer `BLOXDUMP_*` environment variables over `base`.
    fn with_env(base: Self) -> Self {
        Figment::from(Serialized::defaults(base.clone()))
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()
            .unwrap_or_else(|e| {
                log::warn!("Ignoring invalid {}* environment: {}", ENV_PREFIX, e);
                base
            })
    }

    /// Get the default platform-specific configuration path.
    #[must_use]
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "bloxdump", "bloxdump")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Apply flags given on the command line on top of this configuration.
    pub fn apply_cli_overrides(&mut self, cli: &Cli) {
        if !cli.types.is_empty() {
            self.extract = cli.types.clone();
        }
        if cli.follow_symlinks {
            self.follow_symlinks = true;
        }
        if cli.skip_hidden {
            self.skip_hidden = true;
        }
        if cli.max_file_size.is_some() {
            self.max_file_size = cli.max_file_size;
        }
    }

    /// Resolve `extract` into formats, dropping duplicates.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for an unknown extension or an empty list.
    pub fn target_formats(&self) -> Result<Vec<MediaFormat>, ConfigError> {
        let mut formats = Vec::new();
        for ext in &self.extract {
            let format = MediaFormat::from_extension(ext)
                .ok_or_else(|| ConfigError::UnknownMediaType(ext.clone()))?;
            if !formats.contains(&format) {
                formats.push(format);
            }
        }
        if formats.is_empty() {
            return Err(ConfigError::NoMediaTypes);
        }
        Ok(formats)
    }

    /// Walker settings derived from this configuration.
    #[must_use]
    pub fn walker_config(&self) -> WalkerConfig {
        WalkerConfig::new(self.follow_symlinks, self.skip_hidden, self.max_file_size)
    }
}
