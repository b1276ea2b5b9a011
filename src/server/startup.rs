use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, instrument, warn};

use crate::{
    config::{constants::*, settings::Config},
    error::{CarelineError, Result},
    handlers,
    server::app_state::AppState,
    storage::Storage,
};

use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};

/// Route table shared by the server and the HTTP tests
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(handlers::json_config())
        // Records
        .route("/", web::get().to(handlers::records::list_records))
        // Registration endpoints
        .route(
            "/patients/new",
            web::post().to(handlers::account_handler::register_patient),
        )
        .route(
            "/hospitals/new",
            web::post().to(handlers::account_handler::register_hospital),
        )
        .route(
            "/doctors/new",
            web::post().to(handlers::account_handler::register_doctor),
        )
        // Login endpoints
        .route("/login", web::post().to(handlers::auth_handler::login))
        .route(
            "/doctors/login",
            web::post().to(handlers::auth_handler::doctor_login),
        )
        // Health endpoints
        .route("/health", web::get().to(handlers::health::health_check))
        .route(
            "/health/ready",
            web::get().to(handlers::health::readiness_check),
        )
        // API info
        .route("/api/info", web::get().to(handlers::api::api_info));
}

fn build_cors(config: &Config) -> Cors {
    let origins = config.server.cors_origins();
    let cors = if origins.is_empty() {
        Cors::default().allow_any_origin()
    } else {
        origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
    };

    cors.allow_any_method()
        .allow_any_header()
        .max_age(DEFAULT_CORS_MAX_AGE_SECS)
}

/// Serve HTTP until a shutdown signal arrives, then close storage
#[instrument(skip(config, storage))]
pub async fn start_server(config: Config, storage: Arc<dyn Storage>) -> Result<()> {
    let app_state = web::Data::new(AppState::new_with_storage(storage.clone(), &config)?);
    let addr = config.server.address()?;

    info!("🌐 Starting HTTP server on {}", addr);
    print_startup_banner(&config);

    let server_config = config.clone();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(middleware::Logger::default())
            .wrap(
                middleware::DefaultHeaders::new()
                    .add(("X-Version", env!("CARGO_PKG_VERSION")))
                    .add(("X-Server", "CareLine")),
            )
            .wrap(build_cors(&server_config))
            .configure(configure_routes)
    })
    .workers(config.server.worker_threads)
    .keep_alive(Duration::from_secs(HTTP_KEEPALIVE_SECS))
    .client_request_timeout(Duration::from_secs(HTTP_CLIENT_REQUEST_TIMEOUT_SECS))
    .shutdown_timeout(HTTP_SHUTDOWN_TIMEOUT_SECS)
    .bind(addr)
    .map_err(|e| CarelineError::Internal(format!("Failed to bind {}: {}", addr, e)))?;

    let result = server.run().await;
    if let Err(e) = &result {
        error!("❌ HTTP server error: {}", e);
    }

    info!("🛑 HTTP server stopped, closing storage");
    if let Err(e) = storage.close().await {
        warn!("Failed to close storage cleanly: {}", e);
    }

    result.map_err(|e| CarelineError::Internal(format!("HTTP server error: {}", e)))
}

fn print_startup_banner(config: &Config) {
    info!("🚀 CareLine Server v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "📊 host={} port={} workers={} storage={}",
        config.server.host, config.server.port, config.server.worker_threads, config.storage
    );
}

