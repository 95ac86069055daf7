use crate::error::{AppError, AppResult};
use crate::models::Plan;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    /// Overrides the built-in plan catalog when present
    #[serde(default)]
    pub plans: Option<Vec<Plan>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    #[default]
    Postgres,
    Memory,
}

impl std::str::FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(format!("unknown storage backend: {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Seconds between two bump passes
    #[serde(default = "default_bump_interval_secs")]
    pub bump_interval_secs: u64,
    /// Lifetime of a trial listing
    #[serde(default = "default_trial_hours")]
    pub trial_hours: u32,
}

fn default_bump_interval_secs() -> u64 {
    300
}

fn default_trial_hours() -> u32 {
    72
}

/// Upper bound for `trial_hours`: one year.
pub const MAX_TRIAL_HOURS: u32 = 24 * 365;

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            bump_interval_secs: default_bump_interval_secs(),
            trial_hours: default_trial_hours(),
        }
    }
}

impl Config {
    pub fn from_toml() -> AppResult<Self> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        // 配置文件不存在时完全依赖环境变量
        let mut config = match std::fs::read_to_string(&config_path) {
            Ok(config_str) => Self::parse(&config_str)?,
            Err(e) if e.kind() == ErrorKind::NotFound => Config {
                server: ServerConfig {
                    host: "0.0.0.0".to_string(),
                    port: 8080,
                },
                database: DatabaseConfig::default(),
                storage: StorageConfig::default(),
                scheduler: SchedulerConfig::default(),
                plans: None,
            },
            Err(e) => {
                return Err(AppError::ConfigError(format!(
                    "failed to read config file {config_path}: {e}"
                )));
            }
        };

        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    pub fn parse(config_str: &str) -> AppResult<Self> {
        toml::from_str(config_str)
            .map_err(|e| AppError::ConfigError(format!("failed to parse config file: {e}")))
    }

    /// Environment variables win over file values.
    fn apply_env_overrides(&mut self) -> AppResult<()> {
        if let Ok(v) = env::var("SERVER_HOST") {
            self.server.host = v;
        }
        if let Ok(v) = env::var("SERVER_PORT")
            && let Ok(p) = v.parse()
        {
            self.server.port = p;
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = v;
        }
        if let Ok(v) = env::var("DB_MAX_CONNECTIONS")
            && let Ok(mc) = v.parse()
        {
            self.database.max_connections = mc;
        }
        if let Ok(v) = env::var("STORAGE_BACKEND") {
            self.storage.backend = v.parse().map_err(AppError::ConfigError)?;
        }
        if let Ok(v) = env::var("BUMP_INTERVAL_SECS")
            && let Ok(n) = v.parse()
        {
            self.scheduler.bump_interval_secs = n;
        }
        if let Ok(v) = env::var("TRIAL_HOURS")
            && let Ok(n) = v.parse()
        {
            self.scheduler.trial_hours = n;
        }
        Ok(())
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.storage.backend == StorageBackend::Postgres && self.database.url.is_empty() {
            return Err(AppError::ConfigError(
                "DATABASE_URL is required for the postgres storage backend".into(),
            ));
        }
        if self.scheduler.bump_interval_secs == 0 {
            return Err(AppError::ConfigError(
                "scheduler.bump_interval_secs must be positive".into(),
            ));
        }
        if self.scheduler.trial_hours == 0 || self.scheduler.trial_hours > MAX_TRIAL_HOURS {
            return Err(AppError::ConfigError(format!(
                "scheduler.trial_hours must be between 1 and {MAX_TRIAL_HOURS}"
            )));
        }
        Ok(())
    }
}
