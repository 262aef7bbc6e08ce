mod api;
mod config;
mod database;
mod middleware;
mod models;
mod services;
mod utils;

use actix_cors::Cors;
use actix_web::{http::header, middleware::from_fn, middleware::Logger, web, App, HttpServer};
use config::AppConfig;
use database::{DocumentStore, InMemoryStore, MongoDB};
use dotenv::dotenv;
use services::SessionGate;
use std::{io, sync::Arc};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = AppConfig::from_env().map_err(|e| {
        log::error!("❌ Invalid configuration: {} ({:?})", e, e);
        io::Error::new(io::ErrorKind::InvalidInput, e.to_string())
    })?;

    log::info!("🚀 Starting HealthTrack Service...");

    let store: Arc<dyn DocumentStore> = match &config.database_url {
        Some(url) => {
            let db = MongoDB::new(url, &config.database_name).await.map_err(|e| {
                log::error!("❌ Failed to connect to MongoDB: {:?}", e);
                io::Error::new(io::ErrorKind::ConnectionRefused, e.to_string())
            })?;
            log::info!("✅ MongoDB connected: database '{}'", config.database_name);
            Arc::new(db)
        }
        None => {
            log::warn!("⚠️  DATABASE_URL not set, using the in-memory store (data is lost on restart)");
            Arc::new(InMemoryStore::new())
        }
    };

    if !config.admin_emails.is_empty() {
        services::user_service::ensure_admins(store.as_ref(), &config.admin_emails)
            .await
            .map_err(|e| {
                log::error!("❌ Failed to set up admin users: {}", e);
                io::Error::new(io::ErrorKind::Other, e.to_string())
            })?;
    }

    let store_data = web::Data::from(store);
    let gate_data = web::Data::new(SessionGate::new(&config.token_secret));
    let config_data = web::Data::new(config.clone());

    log::info!("🌐 Server starting on {}:{}", config.host, config.port);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", config.host, config.port);
    log::info!("📄 OpenAPI spec at: http://{}:{}/api-docs/openapi.json", config.host, config.port);

    let origins = config.cors_origins.clone();

    // Start HTTP server
    HttpServer::new(move || {
        let cors = origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allowed_methods(vec!["GET", "POST", "PATCH", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                header::AUTHORIZATION,
                header::CONTENT_TYPE,
                header::ACCEPT,
            ])
            .expose_headers(vec![header::CONTENT_TYPE, header::CONTENT_DISPOSITION])
            .supports_credentials()
            .max_age(3600);

        // Generate OpenAPI specification
        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(store_data.clone())
            .app_data(gate_data.clone())
            .app_data(config_data.clone())
            .wrap(cors)
            .wrap(middleware::SecurityHeaders)
            .wrap(from_fn(middleware::count_requests))
            .wrap(Logger::default())
            .service(SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi))
            .configure(api::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
