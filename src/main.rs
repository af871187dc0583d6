//! bloxdump - Roblox HTTP cache extractor
//!
//! Entry point for the bloxdump CLI application.

use bloxdump::{
    cli::Cli,
    error::{ExitCode, StructuredError},
};
use clap::error::ErrorKind;
use clap::Parser;

fn main() {
    // Usage errors exit with 1 rather than clap's default of 2
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => err.exit(),
            _ => {
                let _ = err.print();
                std::process::exit(ExitCode::GeneralError.as_i32());
            }
        },
    };
    let json_errors = cli.json_errors;

    match bloxdump::run_app(cli) {
        Ok(code) => std::process::exit(code.as_i32()),
        Err(err) => {
            let exit_code = ExitCode::GeneralError;

            if json_errors {
                let structured = StructuredError::new(&err, exit_code);
                if let Ok(json) = serde_json::to_string_pretty(&structured) {
                    eprintln!("{}", json);
                } else {
                    eprintln!("[{}] Error: {:#}", exit_code.code_prefix(), err);
                }
            } else {
                eprintln!("[{}] Error: {:#}", exit_code.code_prefix(), err);
            }

            std::process::exit(exit_code.as_i32());
        }
    }
}
