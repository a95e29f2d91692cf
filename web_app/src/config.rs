//! Application configuration loaded once from environment variables.
//!
//! Sensitive fields are marked and must never be logged.

use anyhow::{Context, anyhow};
use envconfig::Envconfig;
use std::sync::OnceLock;

#[derive(Envconfig, Clone)]
pub struct AppConfig {
    /// Environment name to deploy the app
    /// Values: "local", "dev", "staging", "prod"
    #[envconfig(from = "ENV", default = "local")]
    pub env: String,

    /// Database host value
    /// Example: "sqlite:data/app.db"
    #[envconfig(from = "DB_HOST")]
    pub db_host: String,

    /// 🔒 SENSITIVE: Database password to encrypt SQLite data
    #[envconfig(from = "DB_PASS_ENCRYPT", default = "")]
    pub db_pass_encrypt: String,

    /// Host address for web server binding
    /// Example: "0.0.0.0", "localhost", "pets.example.org"
    #[envconfig(from = "WEB_SERVER_HOST", default = "localhost")]
    pub web_server_host: String,

    #[envconfig(from = "WEB_SERVER_PORT", default = "8080")]
    pub web_server_port: u16,

    /// Path to SSL private key file, file should have 600 permissions
    #[envconfig(from = "PRIVATE_KEY_PATH", default = "server.key")]
    pub private_key_path: String,

    #[envconfig(from = "CERTIFICATE_PATH", default = "server.crt")]
    pub certificate_path: String,

    /// 🔒 SENSITIVE: CSRF protection password (UUID format)
    #[envconfig(from = "CSRF_PASS")]
    pub csrf_pass: String,

    /// 🔒 SENSITIVE: CSRF protection salt (UUID format)
    #[envconfig(from = "CSRF_SALT")]
    pub csrf_salt: String,

    #[envconfig(from = "GOOGLE_OAUTH_CLIENT_ID")]
    pub google_oauth_client_id: String,

    /// 🔒 SENSITIVE: Google OAuth client secret
    #[envconfig(from = "GOOGLE_OAUTH_CLIENT_SECRET")]
    pub google_oauth_client_secret: String,

    /// Standard value: "https://accounts.google.com/o/oauth2/auth"
    #[envconfig(
        from = "GOOGLE_OAUTH_AUTH_URI",
        default = "https://accounts.google.com/o/oauth2/auth"
    )]
    pub google_oauth_auth_uri: String,

    /// Standard value: "https://oauth2.googleapis.com/token"
    #[envconfig(
        from = "GOOGLE_OAUTH_TOKEN_URI",
        default = "https://oauth2.googleapis.com/token"
    )]
    pub google_oauth_token_uri: String,

    /// 🔒 SENSITIVE: logfire write token, only needed in prod
    #[envconfig(from = "LOGFIRE_TOKEN", default = "")]
    pub logfire_token: String,

    /// 🔒 SENSITIVE: Google Places key for the nearby vets search
    #[envconfig(from = "GOOGLE_PLACES_API_KEY")]
    pub google_places_api_key: Option<String>,

    #[envconfig(from = "NEARBY_SEARCH_RADIUS_METERS", default = "4000")]
    pub nearby_search_radius_meters: u32,

    /// Bucket holding the pet pictures
    #[envconfig(from = "STORAGE_BUCKET", default = "pet-images")]
    pub storage_bucket: String,

    #[envconfig(from = "STORAGE_REGION", default = "ap-south-1")]
    pub storage_region: String,

    /// Notify applicants when their application is rejected
    #[envconfig(from = "NOTIFY_ON_REJECTION", default = "false")]
    pub notify_on_rejection: bool,
}

impl AppConfig {
    /// Checks if running in production environment
    pub fn is_prod(&self) -> bool {
        self.env.to_lowercase() == "prod"
    }

    /// Gets the server URL host with port for non-production environments
    pub fn url_host(&self) -> String {
        if self.is_prod() {
            return self.web_server_host.to_string();
        }

        format!(
            "{host}:{port}",
            host = self.web_server_host,
            port = self.web_server_port
        )
    }

    /// Gets the appropriate protocol (HTTP/HTTPS) based on environment
    pub fn web_server_protocol(&self) -> String {
        if self.is_prod() {
            return "https".into();
        }
        "http".into()
    }

    /// Constructs the complete base URL for the application
    pub fn base_url(&self) -> String {
        format!("{}://{}", self.web_server_protocol(), self.url_host())
    }

    /// Google places key, ignoring an empty value
    pub fn places_api_key(&self) -> Option<String> {
        self.google_places_api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
    }
}

pub static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// Loads [`AppConfig`] from the environment into [`APP_CONFIG`].
pub fn init_config() -> anyhow::Result<()> {
    let app_config =
        AppConfig::init_from_env().context("failed to load app config from environment")?;

    APP_CONFIG
        .set(app_config)
        .map_err(|_| anyhow!("app config already initialized"))
}
