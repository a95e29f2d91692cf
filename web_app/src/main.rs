//! # Pet Adopt Web Application
//!
//! Main entry point for the pet adoption web application.
//! Configures logging, storage, the notification hub, middleware, and routes.

#![recursion_limit = "256"]

pub mod api;
pub mod config;
pub mod consts;
pub mod front;
pub mod logger;
pub mod metric;
pub mod models;
pub mod repo;
pub mod services;
pub mod utils;

use anyhow::Context;
use csrf::AesGcmCsrfProtection;
use logfire::config::MetricsOptions;
use ntex::web;
use ntex_cors::Cors;
use ntex_identity::{CookieIdentityPolicy, IdentityService};
use ntex_session::CookieSession;
use openssl::ssl::{SslAcceptor, SslFiletype, SslMethod};

/// Services shared by every worker
#[derive(Clone)]
struct AppServices {
    sqlite_repo: repo::sqlite::SqlxSqliteRepo,
    storage_service: services::storage::StorageHandler,
    nearby_search_service: services::places::GooglePlacesHandler,
    notification_hub: services::notification::NotificationHub,
    workflow: api::adoption::WorkflowOptions,
}

#[ntex::main]
async fn main() -> anyhow::Result<()> {
    // Initialize configuration
    config::init_config()?;

    let app_config = config::APP_CONFIG
        .get()
        .context("failed to get app config")?;

    // Initialize logging and metrics
    let shutdown_handler = if app_config.is_prod() {
        Some(
            logfire::configure()
                .install_panic_handler()
                .with_metrics(Some(MetricsOptions::default()))
                .send_to_logfire(logfire::config::SendToLogfire::Yes)
                .with_token(&app_config.logfire_token)
                .finish()?,
        )
    } else {
        logger::setup_simple_logger()?;
        None
    };

    // Initialize database connection pool
    let sqlite_repo = repo::sqlite::SqlxSqliteRepo {
        db_pool: utils::setup_sqlite_db_pool(app_config.is_prod()).await?,
    };

    // Initialize AWS services
    let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(app_config.storage_region.clone()))
        .load()
        .await;

    let app_services = AppServices {
        sqlite_repo,
        storage_service: services::storage::StorageHandler {
            client: aws_sdk_s3::Client::new(&aws_config),
            bucket: app_config.storage_bucket.clone(),
            region: app_config.storage_region.clone(),
        },
        nearby_search_service: services::places::GooglePlacesHandler {
            api_key: app_config.places_api_key(),
            radius_meters: app_config.nearby_search_radius_meters,
        },
        notification_hub: services::notification::NotificationHub::new(
            consts::NOTIFICATION_FEED_CAPACITY,
        ),
        workflow: api::adoption::WorkflowOptions {
            notify_on_rejection: app_config.notify_on_rejection,
        },
    };

    // Generate cryptographically secure keys for application security
    let csrf_key = utils::build_csrf_key(&app_config.csrf_pass, &app_config.csrf_salt)?;
    let session_key = utils::build_random_csrf_key()?;
    let identity_key = utils::build_random_csrf_key()?;

    // Configure and start the web server
    configure_and_run_server(csrf_key, session_key, identity_key, app_services).await?;

    if let Some(shutdown_handler) = shutdown_handler {
        shutdown_handler.shutdown()?;
    }

    Ok(())
}

/// Configures SSL acceptor for production environments
fn setup_ssl_acceptor() -> anyhow::Result<openssl::ssl::SslAcceptorBuilder> {
    let mut ssl_acceptor = SslAcceptor::mozilla_intermediate(SslMethod::tls_server())
        .map_err(|e| anyhow::anyhow!("Failed to create SSL acceptor: {}", e))?;

    let app_config = config::APP_CONFIG
        .get()
        .context("failed to get app config")?;
    ssl_acceptor
        .set_private_key_file(&app_config.private_key_path, SslFiletype::PEM)
        .map_err(|e| {
            anyhow::anyhow!(
                "Failed to load private key from {}: {}",
                app_config.private_key_path,
                e
            )
        })?;

    ssl_acceptor
        .set_certificate_file(&app_config.certificate_path, SslFiletype::PEM)
        .map_err(|e| {
            anyhow::anyhow!(
                "Failed to load certificate from {}: {}",
                app_config.certificate_path,
                e
            )
        })?;

    Ok(ssl_acceptor)
}

/// Creates application state from the provided services
fn create_app_state(csrf_key: [u8; 32], app_services: AppServices) -> front::AppState {
    front::AppState {
        csrf_protec: AesGcmCsrfProtection::from_key(csrf_key),
        repo: Box::new(app_services.sqlite_repo),
        storage_service: Box::new(app_services.storage_service),
        nearby_search_service: Box::new(app_services.nearby_search_service),
        notification_hub: app_services.notification_hub,
        workflow: app_services.workflow,
    }
}

/// Configures and starts the web server with appropriate SSL settings
async fn configure_and_run_server(
    csrf_key: [u8; 32],
    session_key: [u8; 32],
    identity_key: [u8; 32],
    app_services: AppServices,
) -> anyhow::Result<()> {
    let app_config = config::APP_CONFIG
        .get()
        .context("failed to get app config")?;
    let server_addr = ("0.0.0.0", app_config.web_server_port);
    let base_url = app_config.base_url();

    let server = web::server(move || {
        web::App::new()
            .wrap(
                Cors::new()
                    .allowed_methods(vec![
                        "GET", "HEAD", "POST", "OPTIONS", "PUT", "PATCH", "DELETE",
                    ])
                    .allowed_origin(&base_url)
                    .allowed_origin("https://openidconnect.googleapis.com")
                    .allowed_origin("https://oauth2.googleapis.com")
                    .allowed_origin("https://www.googleapis.com")
                    .allowed_origin("https://accounts.google.com")
                    .finish(),
            )
            .wrap(
                CookieSession::private(&session_key)
                    .secure(app_config.is_prod())
                    .domain(app_config.web_server_host.to_string())
                    .max_age(consts::MAX_AGE_COOKIES)
                    .name("pet-adopt-session"),
            )
            .wrap(IdentityService::new(
                CookieIdentityPolicy::new(&identity_key)
                    .name("user_id")
                    .domain(app_config.web_server_host.to_string())
                    .max_age(consts::MAX_AGE_COOKIES)
                    .secure(app_config.is_prod()),
            ))
            .wrap(web::middleware::Logger::default())
            .wrap(web::middleware::Compress::default())
            .state(create_app_state(csrf_key, app_services.clone()))
            .configure(front::routes::account)
            .configure(front::routes::pet_catalogue)
            .configure(front::routes::adoption)
            .configure(front::routes::favorite_pets)
            .configure(front::routes::notification_inbox)
            .configure(front::routes::vet_directory)
            .default_service(web::route().to(front::server::serve_not_found))
    });

    let bound_server = if app_config.is_prod() {
        let ssl_acceptor = setup_ssl_acceptor()?;
        server.bind_openssl(server_addr, ssl_acceptor)?
    } else {
        server.bind(server_addr)?
    };

    bound_server
        .run()
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))
}
