use meiki::cli::Cli;
use meiki::commands;
use meiki::error::MeikiError;
use meiki::logger::initialize as LoggerInitialize;

use client_core::config::{ClientConfig, app_data_dir};
use client_core::session::FileStore;
use client_core::{AuthFlow, RequestClient, SessionContext};

use common::ErrorLocation;

use std::fs::create_dir_all;
use std::panic::Location;
use std::process::ExitCode;

use clap::Parser;
use log::{info, warn};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            warn!("Command failed: {e}");
            eprintln!("{}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<String, MeikiError> {
    let data_dir = app_data_dir()?;

    // Ensure data directory exists (log + session file)
    create_dir_all(&data_dir).map_err(|e| MeikiError::Meiki {
        message: format!("Failed to create data directory: {e}"),
        location: ErrorLocation::from(Location::caller()),
    })?;

    // Initialize logger FIRST
    LoggerInitialize(&data_dir, cli.verbose)?;

    info!("Meiki CLI starting");
    info!("Data directory: {}", data_dir.display());

    let config = ClientConfig::load()?.with_server_url(cli.server_url.as_deref())?;
    info!("Server URL: {}", config.server_url);

    let client = RequestClient::from_config(&config)?;
    let store = FileStore::new(config.session_file.clone());
    let mut flow = AuthFlow::new(client, SessionContext::new(store))?;

    commands::execute(&mut flow, cli.command).await
}
