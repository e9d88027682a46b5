// src/main.rs
// DOCUMENTATION: Application entry point
// PURPOSE: Initialize config, database, shared state and start HTTP server

mod config;
mod db;
mod errors;
mod handlers;
mod middleware;
mod models;
mod services;
mod validation;

use actix_web::{error, middleware::Logger, web, App, HttpServer};
use config::Config;
use db::TokenRepository;
use dotenv::dotenv;
use errors::CampingError;
use services::{start_cleanup_task, GooglePlacesClient, LoginRateLimiter, ResponseCache};
use std::io;
use std::sync::Arc;
use std::time::Duration;

/// Background housekeeping: expired refresh tokens and idle rate-limit keys
fn start_housekeeping_task(pool: sqlx::PgPool, limiter: web::Data<LoginRateLimiter>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(3600));

        loop {
            interval.tick().await;
            limiter.cleanup();
            match TokenRepository::purge_expired(&pool).await {
                Ok(0) => {}
                Ok(n) => log::info!("Purged {} expired refresh tokens", n),
                Err(e) => log::warn!("Refresh token purge failed: {}", e),
            }
        }
    });
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    // 1. Load environment variables
    dotenv().ok();

    // 2. Load configuration
    let config = Config::from_env();

    // 3. Initialize logging
    if std::env::var("RUST_LOG").is_err() {
        let log_level = if !config.log_level.is_empty() {
            config.log_level.clone()
        } else {
            "info,actix_web=info,sqlx=warn".to_string()
        };
        std::env::set_var("RUST_LOG", log_level);
    }
    env_logger::init();

    if let Err(e) = config.validate() {
        log::error!("Configuration error: {}", e);
        if config.is_production() {
            std::process::exit(1);
        }
    }

    log::info!("Starting camping-thailand-api...");
    log::info!("Environment: {}", config.environment);
    log::info!(
        "Server Address: {}:{}",
        config.server_address,
        config.server_port
    );

    // 4. Initialize database connection pool
    let pool = match config::init_db_pool(&config).await {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };

    // 5. Response cache for catalogs and attraction lookups
    let cache = Arc::new(ResponseCache::new(config.cache_ttl_seconds));
    start_cleanup_task(cache.clone(), 300);
    log::info!(
        "Initialized response cache (TTL: {}s)",
        config.cache_ttl_seconds
    );

    let google = web::Data::new(GooglePlacesClient::new_with_cache(
        config.google_places_api_key.clone(),
        cache.clone(),
    ));
    if !google.is_configured() {
        log::info!("GOOGLE_PLACES_API_KEY not set; attractions come from the database only");
    }

    // 6. Login throttling
    let limiter = web::Data::new(LoginRateLimiter::per_minute(config.login_attempts_per_minute));
    start_housekeeping_task(pool.clone(), limiter.clone());

    // 7. Start HTTP server
    let server_addr = format!("{}:{}", config.server_address, config.server_port);
    let config = web::Data::new(config);

    HttpServer::new(move || {
        App::new()
            // Application state
            .app_data(web::Data::new(pool.clone()))
            .app_data(config.clone())
            .app_data(web::Data::new(cache.clone()))
            .app_data(google.clone())
            .app_data(limiter.clone())
            // Malformed bodies and query strings use the common error envelope
            .app_data(web::JsonConfig::default().error_handler(|err, _req| {
                error::Error::from(CampingError::InvalidInput(err.to_string()))
            }))
            .app_data(web::QueryConfig::default().error_handler(|err, _req| {
                error::Error::from(CampingError::InvalidInput(err.to_string()))
            }))
            .app_data(web::PathConfig::default().error_handler(|err, _req| {
                error::Error::from(CampingError::InvalidInput(err.to_string()))
            }))
            // Middleware
            .wrap(Logger::default())
            .wrap(actix_web::middleware::Compress::default())
            // Routes
            .configure(handlers::health_config)
            .configure(handlers::search_config)
            .configure(handlers::campsites_config)
            .configure(handlers::auth_config)
            .configure(handlers::wishlist_config)
            .configure(handlers::reviews_config)
            .configure(handlers::owner_requests_config)
            .configure(handlers::dashboard_config)
            .configure(handlers::admin_config)
    })
    .bind(&server_addr)?
    .run()
    .await
}
