use chrono::Utc;
use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;

mod cli;

use cli::Cli;
use envsweep::api::GitpodClient;
use envsweep::cleanup;
use envsweep::config::{EnvInputs, Settings};
use envsweep::domain::RunOutcome;
use envsweep::logging::init_logging;
use envsweep::sink::ActionsSink;

fn print_status(outcome: &RunOutcome) {
    if outcome.success {
        println!(
            "{} deleted {} environments ({} failed)",
            "Done:".green(),
            outcome.deleted_count(),
            outcome.report.failed.len()
        );
    } else {
        println!(
            "{} {}",
            "Cleanup failed:".red(),
            outcome.error.as_deref().unwrap_or("unknown error")
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging first
    init_logging(cli.is_verbose());

    // Load configuration
    let settings = Settings::load(cli.config.as_ref()).context("Failed to load configuration")?;
    info!("Starting with config from: {:?}", cli.config);

    let mut sink = ActionsSink::from_env();
    let client_config = settings.client_config();

    let outcome = cleanup::run(
        &EnvInputs,
        &settings,
        &mut sink,
        |config| GitpodClient::new(config.token.clone(), client_config),
        Utc::now(),
    )
    .await
    .context("Failed to publish run outputs")?;

    print_status(&outcome);

    if !outcome.success {
        std::process::exit(1);
    }
    Ok(())
}
