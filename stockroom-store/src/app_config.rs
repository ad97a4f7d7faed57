use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use stockroom_shared::models::log_entry::DEFAULT_USER_ID;
use stockroom_shared::models::transaction::DEFAULT_USER;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Memory,
    Json,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
    #[serde(default = "default_true")]
    pub provision_on_startup: bool,
    #[serde(default = "default_true")]
    pub seed_sample_products: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            path: default_store_path(),
            provision_on_startup: true,
            seed_sample_products: true,
        }
    }
}

fn default_store_path() -> PathBuf { PathBuf::from("data/workbook.json") }
fn default_true() -> bool { true }

/// Fallback values written into rows when a request leaves a field out.
#[derive(Debug, Deserialize, Clone)]
pub struct DefaultsConfig {
    #[serde(default = "default_user")]
    pub user: String,
    #[serde(default = "default_log_user_id")]
    pub log_user_id: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            user: default_user(),
            log_user_id: default_log_user_id(),
        }
    }
}

fn default_user() -> String { DEFAULT_USER.to_string() }
fn default_log_user_id() -> String { DEFAULT_USER_ID.to_string() }

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Layers `<dir>/default`, `<dir>/<RUN_MODE>`, `<dir>/local` and then
    /// `STOCKROOM_*` environment variables. Every file is optional.
    pub fn load_from(dir: &str) -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name(&format!("{}/default", dir)).required(false))
            .add_source(config::File::with_name(&format!("{}/{}", dir, run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name(&format!("{}/local", dir)).required(false))
            // Eg.. `STOCKROOM_SERVER__PORT=9000` sets `server.port`
            .add_source(
                config::Environment::with_prefix("STOCKROOM")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        s.try_deserialize()
    }
}
