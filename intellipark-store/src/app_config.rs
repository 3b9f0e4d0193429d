use intellipark_core::validate::Tariffs;
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub firebase: FirebaseConfig,
    pub xendit: XenditConfig,
    pub frontend: FrontendConfig,
    pub cors: CorsConfig,
    #[serde(default)]
    pub tariffs: Tariffs,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FirebaseConfig {
    /// Realtime Database root, e.g. `https://<project>.firebaseio.com`.
    pub database_url: String,
    #[serde(default)]
    pub auth_token: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct XenditConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    pub secret_key: String,
    #[serde(default = "default_invoice_duration")]
    pub invoice_duration_seconds: u32,
}

fn default_api_base() -> String {
    "https://api.xendit.co".to_string()
}

fn default_invoice_duration() -> u32 {
    1800
}

/// Frontend bases the gateway redirects back to after payment.
#[derive(Debug, Deserialize, Clone)]
pub struct FrontendConfig {
    pub kiosk_base_url: String,
    pub portal_base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(config::File::with_name("config/local").required(false))
            // Eg. `INTELLIPARK__XENDIT__SECRET_KEY` overrides xendit.secret_key
            .add_source(config::Environment::with_prefix("INTELLIPARK").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
