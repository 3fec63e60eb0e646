//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::{ServerSettings, SettingsError};

use state_builders::build_http_state;

use actix_web::cookie::Key;
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::info;

use recipe_backend::Trace;
#[cfg(debug_assertions)]
use recipe_backend::doc::ApiDoc;
use recipe_backend::inbound::http::health::{HealthState, live, ready};
use recipe_backend::inbound::http::session_config::{
    BuildMode, SessionConfigError, key_fingerprint, load_session_key, session_middleware,
};
use recipe_backend::inbound::http::state::HttpState;
use recipe_backend::inbound::http::{configure_api, json_config};
use recipe_backend::outbound::persistence::{MigrationError, PoolError};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

/// Failures that stop the server from starting.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Session(#[from] SessionConfigError),
    #[error(transparent)]
    Migration(#[from] MigrationError),
    #[error(transparent)]
    Pool(#[from] PoolError),
    #[error("failed to start the HTTP listener: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    key: Key,
    cookie_secure: bool,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        key,
        cookie_secure,
    } = deps;

    let api = web::scope("/api/v1")
        .wrap(session_middleware(key, cookie_secure))
        .app_data(json_config())
        .configure(configure_api);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct the Actix HTTP server described by `settings`.
///
/// Readiness is flagged once the listener is bound.
///
/// # Errors
///
/// Returns [`StartupError`] when settings are invalid, the session key cannot
/// be loaded, persistence cannot be prepared or the socket cannot be bound.
pub async fn create_server(
    health_state: web::Data<HealthState>,
    settings: ServerSettings,
) -> Result<Server, StartupError> {
    let bind_addr = settings.bind_addr()?;
    let key = load_session_key(
        &settings.session_key_file(),
        BuildMode::from_debug_assertions(),
        settings.allow_ephemeral_session,
    )?;
    info!(fingerprint = %key_fingerprint(&key), "session key loaded");
    let http_state = web::Data::new(build_http_state(&settings).await?);
    let cookie_secure = settings.cookie_secure();

    let server_health_state = health_state.clone();
    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            key: key.clone(),
            cookie_secure,
        })
    })
    .bind(bind_addr)?
    .run();

    info!(%bind_addr, "listening");
    health_state.mark_ready();
    Ok(server)
}
