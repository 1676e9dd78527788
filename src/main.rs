use std::fs::File;
use std::process::ExitCode;
use std::sync::Mutex;

use clap::Parser;
use tracing::{error, info};
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod controller;
mod credentials;
mod domain;
mod inputter;
mod model;
mod navigation;
mod screens;
mod store;
mod table;
mod ui;

use controller::Controller;
use domain::{HelipeConfig, HelipeError, expand_path};
use model::{Model, Status};
use ui::DashboardUI;

fn main() -> ExitCode {
    let config = HelipeConfig::parse();
    if let Err(e) = init_logging(&config) {
        eprintln!("Error: {:?}", e);
        return ExitCode::FAILURE;
    }

    let result = run(config);
    ratatui::restore();
    match result {
        Err(e) => {
            error!("Terminated with {e:?}");
            eprintln!("Error: {:?}", e);
            ExitCode::FAILURE
        }
        Ok(_) => ExitCode::SUCCESS,
    }
}

/// Logs go to a file, the terminal belongs to the dashboard.
fn init_logging(config: &HelipeConfig) -> Result<(), HelipeError> {
    let file = File::create(expand_path(&config.log_file))?;
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
        .with(ErrorLayer::default())
        .try_init()
        .map_err(|e| HelipeError::Logging(e.to_string()))
}

fn run(config: HelipeConfig) -> Result<(), HelipeError> {
    info!("Starting helipe with {config:?}");

    let connection = store::connect(&config);
    let mut model = Model::init(connection);
    let ui = DashboardUI::new(&config);
    let controller = Controller::new(&config);

    let mut terminal = ratatui::init();

    while model.status != Status::QUITTING {
        // Render the current view
        terminal.draw(|f| ui.draw(&model, f))?;

        // Handle events and map to a Message
        let message = controller.handle_event(&model)?;
        model.update(message)?;
    }

    info!("Quitting helipe");
    Ok(())
}
