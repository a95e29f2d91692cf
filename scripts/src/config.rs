use envconfig::Envconfig;
use std::sync::LazyLock;

/// Database settings shared with the web app
#[derive(Envconfig, Clone)]
pub struct AppConfig {
    #[envconfig(from = "ENV", default = "local")]
    pub env: String,
    #[envconfig(from = "DB_HOST")]
    pub db_host: String,
    /// 🔒 SENSITIVE: key of the encrypted database
    #[envconfig(from = "DB_PASS_ENCRYPT", default = "")]
    pub db_pass_encrypt: String,
}

impl AppConfig {
    pub fn is_prod(&self) -> bool {
        self.env.to_lowercase() == "prod"
    }
}

pub static APP_CONFIG: LazyLock<AppConfig> = LazyLock::new(|| AppConfig::init_from_env().unwrap());
