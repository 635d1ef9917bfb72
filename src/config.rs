use std::env;
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use serde::Deserialize;

use crate::storage::StorageConfig;

const DEFAULT_DATABASE_URL: &str = "sqlite://qna.db";
const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Top-level application configuration loaded from file + environment.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseSection,
    pub logging: LoggingSection,
}

impl AppConfig {
    /// Load configuration from disk and environment.
    pub fn load() -> Result<Self> {
        let config_path = env::var("QNA_CONFIG").unwrap_or_else(|_| "config.toml".to_string());

        let mut builder = config::Config::builder();

        if Path::new(&config_path).exists() {
            builder = builder.add_source(config::File::from(PathBuf::from(&config_path)));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("QNA")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder.build()?;
        let mut config: Self = settings.try_deserialize()?;

        // DATABASE_URL is what container deployments already export
        if config.database.url.trim().is_empty() {
            config.database.url = env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
        }

        if config.logging.level.trim().is_empty() {
            config.logging.level = "info".to_string();
        }

        Ok(config)
    }

    /// Resolve the storage backend from the database URL.
    pub fn storage_config(&self) -> Result<StorageConfig> {
        self.database.to_runtime()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    pub url: String,
    pub max_connections: u32,
}

impl DatabaseSection {
    pub fn to_runtime(&self) -> Result<StorageConfig> {
        let url = self.url.trim();
        if url.is_empty() {
            bail!("database.url must be specified");
        }
        if self.max_connections == 0 {
            bail!("database.max_connections must be greater than zero");
        }

        let max_connections = self.max_connections;
        if url.starts_with("sqlite:") {
            Ok(StorageConfig::Sqlite {
                url: url.to_string(),
                max_connections,
            })
        } else if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            Ok(StorageConfig::Postgres {
                url: url.to_string(),
                max_connections,
            })
        } else {
            bail!("unsupported database url scheme: {}", url)
        }
    }
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct LoggingSection {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Text,
}
