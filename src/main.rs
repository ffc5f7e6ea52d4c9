use anyhow::Context;
use clap::Parser;
use configuration::{ConfigArgs, build_log_dispatch, load_config};
use database::{DiagnosticLog, StorageGateway};

mod command;
mod forms;
mod input;
mod session;
mod view;

use input::Prompter;
use session::Session;

/// Console manager for students, supervisors and their projects.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,
}

/// The main entry point for the academic records console.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings =
        load_config(cli.config.config.as_deref()).context("Failed to load configuration")?;

    // The console still works when the log file cannot be opened; failures
    // just go unrecorded.
    let log = match build_log_dispatch(&settings.logging) {
        Ok(dispatch) => DiagnosticLog::new(dispatch, settings.logging.path()),
        Err(e) => {
            eprintln!("Warning: {e}. Diagnostic logging is disabled.");
            DiagnosticLog::disabled()
        }
    };

    let gateway = StorageGateway::connect(&settings.database, log).await;

    let stdin = std::io::stdin();
    let prompter = Prompter::new(stdin.lock(), std::io::stdout());
    Session::new(gateway, prompter).run().await
}
