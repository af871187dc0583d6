//! Tests driving the application through parsed command lines.

mod common;

use bloxdump::cli::Cli;
use bloxdump::error::{ExitCode, StructuredError};
use bloxdump::run_app;
use clap::Parser;
use common::{ogg_payload, png_payload, RecordBuilder};
use std::path::Path;
use tempfile::TempDir;

/// Command line with an isolated (missing) config file. The summary is
/// off unless `extra` asks for one.
fn cli(cache: &Path, out: &Path, config_dir: &TempDir, extra: &[&str]) -> Cli {
    let config = config_dir.path().join("config.toml");
    let mut args = vec![
        "bloxdump".to_string(),
        cache.display().to_string(),
        out.display().to_string(),
        "--config".to_string(),
        config.display().to_string(),
    ];
    if !extra.contains(&"--summary") {
        args.extend(["--summary".to_string(), "none".to_string()]);
    }
    args.extend(extra.iter().map(ToString::to_string));
    Cli::try_parse_from(args).unwrap()
}

#[test]
fn test_run_app_extracts_sounds() {
    let cache = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let config = TempDir::new().unwrap();
    RecordBuilder::new("https://example.com/a/sound123")
        .payload(&ogg_payload(b"abc"))
        .write_to(cache.path(), "f00d");

    let code = run_app(cli(cache.path(), out.path(), &config, &["-q"])).unwrap();

    assert_eq!(code, ExitCode::Success);
    assert_eq!(
        std::fs::read(out.path().join("Sounds").join("sound123.ogg")).unwrap(),
        ogg_payload(b"abc")
    );
}

#[test]
fn test_run_app_type_flag_selects_formats() {
    let cache = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let config = TempDir::new().unwrap();
    RecordBuilder::new("https://x/sky")
        .payload(&png_payload())
        .write_to(cache.path(), "0");
    RecordBuilder::new("https://x/song")
        .payload(&ogg_payload(b""))
        .write_to(cache.path(), "1");

    run_app(cli(cache.path(), out.path(), &config, &["-q", "-t", "png"])).unwrap();

    assert!(out.path().join("Textures").join("sky.png").exists());
    assert!(!out.path().join("Sounds").exists());
}

#[test]
fn test_run_app_empty_cache_dir_succeeds() {
    let cache = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let config = TempDir::new().unwrap();

    let code = run_app(cli(cache.path(), out.path(), &config, &["-q"])).unwrap();

    assert_eq!(code, ExitCode::Success);
    assert_eq!(std::fs::read_dir(out.path()).unwrap().count(), 0);
}

#[test]
fn test_run_app_missing_cache_dir_fails() {
    let root = TempDir::new().unwrap();
    let config = TempDir::new().unwrap();
    let missing = root.path().join("no-such-cache");

    let err = run_app(cli(&missing, &root.path().join("out"), &config, &["-q"])).unwrap_err();

    assert!(err.to_string().starts_with("Failed to walk cache directory"));
    let structured = StructuredError::new(&err, ExitCode::GeneralError);
    assert_eq!(structured.code, "BD001");
    assert_eq!(structured.exit_code, 1);
}

#[test]
fn test_run_app_unknown_type_fails() {
    let cache = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let config = TempDir::new().unwrap();

    let err = run_app(cli(cache.path(), out.path(), &config, &["-q", "-t", "wav"])).unwrap_err();

    assert_eq!(err.to_string(), "Invalid extraction settings");
    let causes: Vec<String> = err.chain().skip(1).map(ToString::to_string).collect();
    assert!(causes[0].contains("'wav'"));
}

#[test]
fn test_run_app_json_summary() {
    let cache = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let config = TempDir::new().unwrap();
    RecordBuilder::new("https://x/a")
        .payload(&ogg_payload(b""))
        .write_to(cache.path(), "0");

    let code = run_app(cli(
        cache.path(),
        out.path(),
        &config,
        &["-q", "--summary", "json"],
    ))
    .unwrap();

    assert_eq!(code, ExitCode::Success);
}

#[test]
fn test_missing_positionals_rejected() {
    assert!(Cli::try_parse_from(["bloxdump"]).is_err());
    assert!(Cli::try_parse_from(["bloxdump", "/cache"]).is_err());
}

#[test]
fn test_binary_usage_error_exits_with_one() {
    let output = std::process::Command::new(env!("CARGO_BIN_EXE_bloxdump"))
        .arg("/only/one/positional")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(!output.stderr.is_empty());
}

#[test]
fn test_binary_missing_cache_dir_exits_with_one() {
    let root = TempDir::new().unwrap();
    let output = std::process::Command::new(env!("CARGO_BIN_EXE_bloxdump"))
        .arg(root.path().join("absent"))
        .arg(root.path().join("out"))
        .arg("--config")
        .arg(root.path().join("config.toml"))
        .arg("-q")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("[BD001] Error:"));
}
