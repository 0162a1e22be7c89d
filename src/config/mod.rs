//! # Configuration Management Module
//!
//! Typed configuration for the clicker backend, loaded from a TOML file and
//! then overridden from the environment.
//!
//! ## Configuration Structure
//!
//! - [`ServerConfig`] - HTTP listener
//! - [`StorageConfig`] - sled data directory, database (tree) name, per-operation timeout
//! - [`TelegramConfig`] - bot token and long-polling parameters
//! - [`LoggingConfig`] - log level and optional log file
//!
//! ## Configuration File Format
//!
//! ```toml
//! [server]
//! bind = "0.0.0.0:8080"
//!
//! [storage]
//! data_dir = "./data"
//! db_name = "clicker"
//! op_timeout_ms = 3000
//!
//! [telegram]
//! enabled = true
//! token = ""
//!
//! [logging]
//! level = "info"
//! ```
//!
//! Every section and key has a default, so a partial file is fine and a missing
//! file falls back to defaults entirely (see [`Config::load_or_default`]).
//!
//! ## Environment Integration
//!
//! Precedence: environment > config file > defaults.
//!
//! | Variable           | Overrides              |
//! |--------------------|------------------------|
//! | `CLICKER_DATA_DIR` | `storage.data_dir`     |
//! | `CLICKER_DB_NAME`  | `storage.db_name`      |
//! | `CLICKER_BIND`     | `server.bind`          |
//! | `TELEGRAM_TOKEN`   | `telegram.token`       |

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use anyhow::{anyhow, bail, Result};
use log::info;
use serde::{Deserialize, Serialize};
use tokio::fs;

pub const ENV_DATA_DIR: &str = "CLICKER_DATA_DIR";
pub const ENV_DB_NAME: &str = "CLICKER_DB_NAME";
pub const ENV_BIND: &str = "CLICKER_BIND";
pub const ENV_TELEGRAM_TOKEN: &str = "TELEGRAM_TOKEN";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    /// Name of the sled tree holding the player records.
    #[serde(default = "default_db_name")]
    pub db_name: String,
    /// Upper bound for one store operation before it is reported as failed.
    #[serde(default = "default_op_timeout_ms")]
    pub op_timeout_ms: u64,
}

fn default_data_dir() -> String {
    "./data".to_string()
}

fn default_db_name() -> String {
    "clicker".to_string()
}

fn default_op_timeout_ms() -> u64 {
    3000
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            db_name: default_db_name(),
            op_timeout_ms: default_op_timeout_ms(),
        }
    }
}

impl StorageConfig {
    pub fn op_timeout(&self) -> Duration {
        Duration::from_millis(self.op_timeout_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Run the chat bot alongside the HTTP API.
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub token: String,
    /// Long-poll wait passed to `getUpdates`, in seconds.
    #[serde(default = "default_poll_timeout_secs")]
    pub poll_timeout_secs: u64,
    /// Client-side bound on a single Bot API request. Must exceed the poll timeout.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

fn default_true() -> bool {
    true
}

fn default_poll_timeout_secs() -> u64 {
    30
}

fn default_request_timeout_secs() -> u64 {
    40
}

fn default_api_base() -> String {
    "https://api.telegram.org".to_string()
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            token: String::new(),
            poll_timeout_secs: default_poll_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            api_base: default_api_base(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub async fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path, e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path, e))?;

        Ok(config)
    }

    /// Load `path` if it exists, otherwise start from defaults. The environment is
    /// applied and the result validated either way.
    pub async fn load_or_default(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            info!(
                "No config file at {}, relying on defaults and environment variables",
                path
            );
        }
        let config = Self::load_unvalidated(path).await?;
        config.validate()?;
        Ok(config)
    }

    /// Like [`Config::load_or_default`] but leaves validation to the caller, so
    /// command-line switches can adjust the result first. Logs nothing, so it can
    /// run before the logger is set up.
    pub async fn load_unvalidated(path: &str) -> Result<Self> {
        Self::load_with_overrides(path, |key| std::env::var(key).ok()).await
    }

    /// File (or defaults when `path` does not exist) with overrides from `lookup`.
    pub async fn load_with_overrides<F>(path: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = if Path::new(path).exists() {
            Self::load(path).await?
        } else {
            Config::default()
        };
        config.apply_overrides(lookup);
        Ok(config)
    }

    /// Create a default configuration file
    pub async fn create_default(path: &str) -> Result<()> {
        let content = toml::to_string_pretty(&Config::default())
            .map_err(|e| anyhow!("Failed to serialize default config: {}", e))?;

        fs::write(path, content)
            .await
            .map_err(|e| anyhow!("Failed to write config file {}: {}", path, e))?;

        Ok(())
    }

    /// Apply overrides from `lookup` (normally the process environment). Empty
    /// values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(v) = get(ENV_DATA_DIR) {
            self.storage.data_dir = v;
        }
        if let Some(v) = get(ENV_DB_NAME) {
            self.storage.db_name = v;
        }
        if let Some(v) = get(ENV_BIND) {
            self.server.bind = v;
        }
        if let Some(v) = get(ENV_TELEGRAM_TOKEN) {
            self.telegram.token = v;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.storage.db_name.trim().is_empty() {
            bail!("storage.db_name must not be empty");
        }
        if self.storage.op_timeout_ms == 0 {
            bail!("storage.op_timeout_ms must be greater than zero");
        }
        self.bind_addr()?;
        if self.telegram.enabled {
            if self.telegram.token.trim().is_empty() {
                bail!(
                    "telegram.enabled is true but no bot token is configured (set {} or telegram.token)",
                    ENV_TELEGRAM_TOKEN
                );
            }
            if self.telegram.request_timeout_secs <= self.telegram.poll_timeout_secs {
                bail!("telegram.request_timeout_secs must exceed telegram.poll_timeout_secs");
            }
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.server
            .bind
            .parse()
            .map_err(|e| anyhow!("Invalid server.bind '{}': {}", self.server.bind, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_documented_values() {
        let config = Config::default();
        assert_eq!(config.server.bind, "0.0.0.0:8080");
        assert_eq!(config.storage.data_dir, "./data");
        assert_eq!(config.storage.db_name, "clicker");
        assert_eq!(config.storage.op_timeout(), Duration::from_secs(3));
        assert!(config.telegram.enabled);
        assert_eq!(config.telegram.poll_timeout_secs, 30);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let config: Config = toml::from_str("[storage]\ndb_name = \"game\"\n").unwrap();
        assert_eq!(config.storage.db_name, "game");
        assert_eq!(config.storage.data_dir, "./data");
        assert_eq!(config.server.bind, "0.0.0.0:8080");
    }

    #[test]
    fn environment_overrides_file_values() {
        let mut config = Config::default();
        config.apply_overrides(lookup(&[
            (ENV_DATA_DIR, "/var/lib/clicker"),
            (ENV_DB_NAME, "prod"),
            (ENV_TELEGRAM_TOKEN, "123:abc"),
            (ENV_BIND, "   "),
        ]));
        assert_eq!(config.storage.data_dir, "/var/lib/clicker");
        assert_eq!(config.storage.db_name, "prod");
        assert_eq!(config.telegram.token, "123:abc");
        assert_eq!(config.server.bind, "0.0.0.0:8080", "blank values are ignored");
    }

    #[test]
    fn validation_requires_token_when_bot_enabled() {
        let mut config = Config::default();
        assert!(config.validate().is_err());
        config.telegram.token = "123:abc".into();
        assert!(config.validate().is_ok());
        config.telegram.enabled = false;
        config.telegram.token.clear();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validation_rejects_bad_storage_and_bind() {
        let mut config = Config::default();
        config.telegram.enabled = false;
        config.storage.op_timeout_ms = 0;
        assert!(config.validate().is_err());

        config.storage.op_timeout_ms = 100;
        config.server.bind = "not-an-address".into();
        assert!(config.validate().is_err());

        config.server.bind = "127.0.0.1:0".into();
        config.storage.db_name = " ".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_reads_toml_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server]\nbind = \"127.0.0.1:9000\"\n").unwrap();
        let config = tokio_test::block_on(Config::load(path.to_str().unwrap())).unwrap();
        assert_eq!(config.server.bind, "127.0.0.1:9000");
    }

    #[test]
    fn default_file_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let path = path.to_str().unwrap();
        tokio_test::block_on(Config::create_default(path)).unwrap();
        let config = tokio_test::block_on(Config::load(path)).unwrap();
        assert_eq!(config.storage.db_name, "clicker");
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let config = tokio_test::block_on(Config::load_with_overrides(
            path.to_str().unwrap(),
            |_| None,
        ))
        .unwrap();
        assert_eq!(config.server.bind, "0.0.0.0:8080");
        assert_eq!(config.storage.db_name, "clicker");
    }

    #[test]
    fn overrides_apply_on_top_of_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[storage]\ndb_name = \"file\"\n").unwrap();
        let config = tokio_test::block_on(Config::load_with_overrides(
            path.to_str().unwrap(),
            lookup(&[(ENV_DB_NAME, "env")]),
        ))
        .unwrap();
        assert_eq!(config.storage.db_name, "env");
    }
}
