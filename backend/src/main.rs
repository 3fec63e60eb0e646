//! Backend entry-point: loads settings, prepares persistence and serves the
//! recipe API with its OpenAPI docs.

mod server;

use std::process::ExitCode;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{error, warn};
use tracing_subscriber::{EnvFilter, fmt};

use recipe_backend::inbound::http::health::HealthState;
use server::{ServerSettings, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> ExitCode {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = match ServerSettings::load() {
        Ok(settings) => settings,
        Err(e) => {
            error!(error = %e, "failed to load settings");
            return ExitCode::FAILURE;
        }
    };

    let health_state = web::Data::new(HealthState::new());
    let server = match create_server(health_state, settings).await {
        Ok(server) => server,
        Err(e) => {
            error!(error = %e, "server startup failed");
            return ExitCode::FAILURE;
        }
    };

    match server.await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "server terminated with an error");
            ExitCode::FAILURE
        }
    }
}
