use rust_decimal::Decimal;
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    pub business_rules: BusinessRules,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BusinessRules {
    pub tax_rate: Decimal,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_search_limit")]
    pub search_result_limit: usize,
    #[serde(default = "default_max_upload")]
    pub max_upload_bytes: usize,
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_search_limit() -> usize {
    5
}

fn default_max_upload() -> usize {
    5 * 1024 * 1024
}

impl Default for BusinessRules {
    fn default() -> Self {
        Self {
            tax_rate: Decimal::new(1, 1),
            currency: default_currency(),
            search_result_limit: default_search_limit(),
            max_upload_bytes: default_max_upload(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    5
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Postgres,
    Memory,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Per-environment overrides, optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Developer overrides, never checked in
            .add_source(config::File::with_name("config/local").required(false))
            // e.g. `SAFARI_SERVER__PORT=8080`
            .add_source(config::Environment::with_prefix("SAFARI").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
