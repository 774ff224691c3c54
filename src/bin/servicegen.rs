use std::process::ExitCode;

use servicegen::cli::run_cli;
use servicegen::logging::{init_logging, LogConfig};

fn main() -> ExitCode {
    if let Err(err) = init_logging(&LogConfig::from_env()) {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }
    match run_cli() {
        Ok(code) => code,
        Err(err) => {
            tracing::error!(error = %format!("{err:#}"), "servicegen failed");
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
