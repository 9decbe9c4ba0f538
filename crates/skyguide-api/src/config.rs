use std::path::Path;
use std::time::Duration;

use config::{Config as ConfigLoader, ConfigError, Environment, File};
use serde::Deserialize;
use skyguide_relay::RelayConfig;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub mongodb: MongoDbConfig,
    pub assistant: AssistantConfig,
    pub relay: RelaySettings,
    pub logging: LoggingConfig,

    // Secrets (from ENV only)
    #[serde(default)]
    pub mongodb_uri: String,
    #[serde(default)]
    pub openai_api_key: String,
    #[serde(default)]
    pub assistant_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub workers: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub enabled: bool,
    pub origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MongoDbConfig {
    pub database: String,
    pub pool_size: u32,
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssistantConfig {
    /// Override for the provider API base, mainly for tests and proxies
    #[serde(default)]
    pub base_url: Option<String>,
    pub poll_interval_ms: u64,
    pub poll_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RelaySettings {
    pub initial_retry_delay_ms: u64,
    pub free_query_allowance: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Config {
    /// Load configuration from TOML files and environment variables
    ///
    /// Hierarchy (weakest to strongest):
    /// 1. config/default.toml
    /// 2. config/{ENV}.toml (if ENV is set)
    /// 3. Environment variables (with SERVER_, MONGODB_, etc. prefixes)
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("ENV").unwrap_or_else(|_| "dev".to_string());

        let builder = ConfigLoader::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::default()
                    .prefix("SERVER")
                    .separator("_")
                    .try_parsing(true),
            )
            .add_source(
                Environment::default()
                    .prefix("MONGODB")
                    .separator("_")
                    .try_parsing(true),
            )
            .add_source(
                Environment::default()
                    .prefix("ASSISTANT")
                    .separator("_")
                    .try_parsing(true),
            )
            .add_source(
                Environment::default()
                    .prefix("RELAY")
                    .separator("_")
                    .try_parsing(true),
            )
            .add_source(
                Environment::default()
                    .prefix("LOG")
                    .separator("_")
                    .try_parsing(true),
            );

        let config = builder.build()?;

        let mut cfg: Config = config.try_deserialize()?;

        // Secrets come from ENV, never from TOML
        cfg.mongodb_uri = std::env::var("MONGODB_URI").map_err(|_| {
            ConfigError::Message("MONGODB_URI environment variable is required".to_string())
        })?;
        cfg.openai_api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            ConfigError::Message("OPENAI_API_KEY environment variable is required".to_string())
        })?;
        cfg.assistant_id = std::env::var("OPENAI_ASSISTANT_ID").map_err(|_| {
            ConfigError::Message("OPENAI_ASSISTANT_ID environment variable is required".to_string())
        })?;

        Ok(cfg)
    }

    /// Load config from a specific path (useful for testing)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let builder = ConfigLoader::builder().add_source(File::from(path.as_ref()));

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Relay tunables assembled from the loaded settings
    pub fn relay_config(&self) -> RelayConfig {
        RelayConfig {
            assistant_id: self.assistant_id.clone(),
            initial_retry_delay: Duration::from_millis(self.relay.initial_retry_delay_ms),
            poll_interval: Duration::from_millis(self.assistant.poll_interval_ms),
            poll_timeout: Duration::from_secs(self.assistant.poll_timeout_secs),
            free_query_allowance: self.relay.free_query_allowance,
            ..RelayConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_structure() {
        let toml = r#"
            [server]
            host = "127.0.0.1"
            port = 3000
            workers = 4

            [cors]
            enabled = true
            origins = ["http://localhost:5173"]

            [mongodb]
            database = "skyguide"
            pool_size = 5
            timeout_ms = 3000

            [assistant]
            poll_interval_ms = 1000
            poll_timeout_secs = 120

            [relay]
            initial_retry_delay_ms = 300
            free_query_allowance = 2

            [logging]
            level = "debug"
            format = "json"
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.mongodb.database, "skyguide");
        assert_eq!(config.assistant.base_url, None);
        assert_eq!(config.relay.initial_retry_delay_ms, 300);
    }

    #[test]
    fn test_relay_config_assembly() {
        let toml = r#"
            [server]
            host = "0.0.0.0"
            port = 8080

            [cors]
            enabled = false
            origins = []

            [mongodb]
            database = "skyguide"
            pool_size = 5
            timeout_ms = 3000

            [assistant]
            poll_interval_ms = 500
            poll_timeout_secs = 90

            [relay]
            initial_retry_delay_ms = 250
            free_query_allowance = 3

            [logging]
            level = "info"
            format = "pretty"
        "#;

        let mut config: Config = toml::from_str(toml).unwrap();
        config.assistant_id = "asst_contract".to_string();

        let relay = config.relay_config();
        assert_eq!(relay.assistant_id, "asst_contract");
        assert_eq!(relay.initial_retry_delay, Duration::from_millis(250));
        assert_eq!(relay.poll_interval, Duration::from_millis(500));
        assert_eq!(relay.poll_timeout, Duration::from_secs(90));
        assert_eq!(relay.free_query_allowance, 3);
    }
}
