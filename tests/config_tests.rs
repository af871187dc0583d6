//! Integration tests for the layered configuration.
//!
//! These cover defaults, TOML file parsing, `BLOXDUMP_*` environment
//! overrides and CLI flag overrides.

use bloxdump::cli::Cli;
use bloxdump::config::{Config, ConfigError};
use bloxdump::sniff::MediaFormat;
use clap::Parser;
use std::fs;
use std::sync::Mutex;
use tempfile::tempdir;

// =============================================================================
// Helper Functions
// =============================================================================

static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Clear all BLOXDUMP_* environment variables to avoid interference.
fn clear_env() {
    for (key, _) in std::env::vars() {
        if key.starts_with("BLOXDUMP_") {
            std::env::remove_var(key);
        }
    }
}

// =============================================================================
// File and Environment Layers
// =============================================================================

#[test]
fn test_missing_file_gives_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let temp_dir = tempdir().unwrap();

    let config = Config::load_from_path(temp_dir.path().join("absent.toml"));
    assert_eq!(config, Config::default());
}

#[test]
fn test_load_from_toml() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");

    let toml_content = r#"
extract = ["ogg", "mp3", "png"]
skip_hidden = true
max_file_size = 1048576
"#;
    fs::write(&config_path, toml_content).unwrap();

    let config = Config::load_from_path(&config_path);
    assert!(config.skip_hidden);
    assert!(!config.follow_symlinks);
    assert_eq!(config.max_file_size, Some(1_048_576));
    assert_eq!(
        config.target_formats().unwrap(),
        vec![MediaFormat::OGG, MediaFormat::MP3, MediaFormat::PNG]
    );
}

#[test]
fn test_invalid_toml_falls_back_to_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "extract = [unterminated").unwrap();

    let config = Config::load_from_path(&config_path);
    assert_eq!(config, Config::default());
}

#[test]
fn test_env_overrides_file() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "skip_hidden = false\nextract = [\"png\"]\n").unwrap();

    std::env::set_var("BLOXDUMP_SKIP_HIDDEN", "true");
    std::env::set_var("BLOXDUMP_EXTRACT", "[\"ogg\", \"rbxm\"]");
    let config = Config::load_from_path(&config_path);
    clear_env();

    assert!(config.skip_hidden);
    assert_eq!(config.extract, vec!["ogg".to_string(), "rbxm".to_string()]);
}

#[test]
fn test_invalid_env_keeps_file_settings() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "extract = [\"png\"]\nskip_hidden = true\n").unwrap();

    std::env::set_var("BLOXDUMP_MAX_FILE_SIZE", "lots");
    let config = Config::load_from_path(&config_path);
    clear_env();

    assert_eq!(config.extract, vec!["png".to_string()]);
    assert!(config.skip_hidden);
    assert_eq!(config.max_file_size, None);
}

// =============================================================================
// CLI Overrides
// =============================================================================

#[test]
fn test_cli_overrides_config() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(
        &config_path,
        "extract = [\"png\"]\nmax_file_size = 10\nfollow_symlinks = false\n",
    )
    .unwrap();

    let cli = Cli::try_parse_from([
        "bloxdump",
        "/cache",
        "/out",
        "-t",
        "webp",
        "--follow-symlinks",
        "--max-file-size",
        "1KiB",
    ])
    .unwrap();

    let mut config = Config::load_from_path(&config_path);
    config.apply_cli_overrides(&cli);

    assert_eq!(config.target_formats().unwrap(), vec![MediaFormat::WEBP]);
    assert!(config.follow_symlinks);
    assert_eq!(config.max_file_size, Some(1024));
}

#[test]
fn test_cli_without_flags_keeps_config() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "extract = [\"gif\"]\nskip_hidden = true\n").unwrap();

    let cli = Cli::try_parse_from(["bloxdump", "/cache", "/out"]).unwrap();
    let mut config = Config::load_from_path(&config_path);
    config.apply_cli_overrides(&cli);

    assert_eq!(config.extract, vec!["gif".to_string()]);
    assert!(config.skip_hidden);
}

#[test]
fn test_unknown_extension_in_file_is_rejected_on_resolve() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "extract = [\"ogg\", \"flac\"]\n").unwrap();

    let config = Config::load_from_path(&config_path);
    assert_eq!(
        config.target_formats(),
        Err(ConfigError::UnknownMediaType("flac".to_string()))
    );
}

#[test]
fn test_config_path_is_config_toml() {
    if let Some(path) = Config::config_path() {
        assert_eq!(path.file_name().unwrap(), "config.toml");
    }
}
