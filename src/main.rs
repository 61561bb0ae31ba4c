// src/main.rs
use actix_web::{
    middleware::{Compress, DefaultHeaders, Logger},
    web, App, HttpServer,
};
use actix_web::http::header;
use actix_cors::Cors;
use anyhow::Context;
use sqlx::{
    migrate::MigrateDatabase,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Sqlite, SqlitePool,
};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod chuira_handlers;
mod config;
mod dashboard;
mod db;
mod dhaan_handlers;
mod error;
mod expense_handlers;
mod handlers;
mod models;
mod monitoring;
pub mod repositories;
mod salary_handlers;
mod sales_handlers;
pub mod validator;

use config::{load_config, Config};
use monitoring::{Metrics, RequestLogger};

pub struct AppState {
    pub db_pool: SqlitePool,
    pub config: Config,
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration (this calls load_env_file internally)
    let config = load_config()?;

    setup_logging(&config)?;

    if config.is_production() {
        validate_production_config(&config)?;
    }
    config.print_startup_info();

    setup_database(&config.database.url).await?;
    let pool = create_database_pool(&config.database).await?;
    db::run_migrations(&pool).await?;

    let app_state = Arc::new(AppState {
        db_pool: pool.clone(),
        config: config.clone(),
    });

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    log::info!("🚀 Starting server at http://{}", bind_address);

    let metrics_arc = Arc::new(Metrics::new());
    let metrics = web::Data::new(metrics_arc.clone());

    let server_config = config.clone();
    let mut server = HttpServer::new(move || {
        let cors = setup_cors(&server_config.security.allowed_origins, server_config.is_production());
        let security_headers = setup_security_headers(&server_config.security);

        App::new()
            .wrap(cors)
            .wrap(security_headers)
            .wrap(Logger::default())
            .wrap(Compress::default())
            .wrap(RequestLogger::new(metrics_arc.clone()))
            .app_data(web::Data::new(app_state.clone()))
            .app_data(metrics.clone())
            // Liveness and metrics
            .service(
                web::scope("/health")
                    .route("", web::get().to(monitoring::liveness_check))
                    .route("/metrics", web::get().to(monitoring::metrics_endpoint))
            )
            .configure(handlers::configure_api(server_config.security.max_request_size))
    })
    .keep_alive(Duration::from_secs(config.server.keep_alive))
    .client_request_timeout(Duration::from_secs(config.server.client_timeout));

    if let Some(workers) = config.server.workers {
        server = server.workers(workers);
    }

    server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run()
        .await?;

    log::info!("👋 Server stopped");
    pool.close().await;
    Ok(())
}

fn setup_logging(config: &Config) -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(config.logging.level.as_str()));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(())
}

fn validate_production_config(config: &Config) -> anyhow::Result<()> {
    if config.security.allowed_origins.iter().any(|o| o == "*") {
        anyhow::bail!("Wildcard CORS origins not allowed in production!");
    }
    Ok(())
}

fn setup_cors(allowed_origins: &[String], is_production: bool) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers(vec![header::CONTENT_LENGTH])
        .max_age(3600);

    if allowed_origins.iter().any(|o| o == "*") && !is_production {
        log::warn!("⚠️  Using wildcard CORS (*) in development mode");
        return cors.allow_any_origin().allow_any_header().allow_any_method();
    }

    for origin in allowed_origins.iter().filter(|o| !o.is_empty() && o.as_str() != "*") {
        cors = cors.allowed_origin(origin);
    }
    cors
}

async fn setup_database(database_url: &str) -> anyhow::Result<()> {
    if !Sqlite::database_exists(database_url).await.unwrap_or(false) {
        log::info!("💾 Creating database: {}", database_url);
        Sqlite::create_database(database_url).await?;
    }
    Ok(())
}

async fn create_database_pool(db_config: &config::DatabaseConfig) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&db_config.url)
        .with_context(|| format!("Invalid database URL: {}", db_config.url))?
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(db_config.max_connections)
        .min_connections(db_config.min_connections)
        .acquire_timeout(Duration::from_secs(db_config.connect_timeout))
        .idle_timeout(Duration::from_secs(db_config.idle_timeout))
        .connect_with(options)
        .await
        .context("Failed to connect to database")?;

    Ok(pool)
}

fn setup_security_headers(config: &config::SecurityConfig) -> DefaultHeaders {
    let mut headers = DefaultHeaders::new()
        .add(("X-Content-Type-Options", "nosniff"))
        .add(("X-Frame-Options", "DENY"))
        .add(("Referrer-Policy", "strict-origin-when-cross-origin"));

    if config.require_https {
        headers = headers.add((
            "Strict-Transport-Security",
            "max-age=31536000; includeSubDomains"
        ));
    }

    headers
}
