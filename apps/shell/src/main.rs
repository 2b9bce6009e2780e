//! # Otorite Shell Entry Point
//!
//! ```text
//! otorite-shell [CONFIG_PATH]
//! ```
//!
//! Prints the settled state of every store as JSON on stdout. Logs go to
//! stderr.

use std::path::PathBuf;
use std::process::ExitCode;

use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    otorite_shell::init_tracing();

    let config_path = std::env::args_os().nth(1).map(PathBuf::from);

    let report = match otorite_shell::run(config_path).await {
        Ok(report) => report,
        Err(e) => {
            error!(error = %e, "Startup failed");
            return ExitCode::FAILURE;
        }
    };

    match serde_json::to_string_pretty(&report) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Could not render startup report");
            ExitCode::FAILURE
        }
    }
}
