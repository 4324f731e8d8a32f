//! Runtime configuration: built-in defaults, then an optional TOML file, then
//! environment variables.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;
pub const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("{name} must be a positive integer, got '{value}'")]
    InvalidNumber { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            acquire_timeout_secs: DEFAULT_ACQUIRE_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database: DatabaseConfig,
}

impl AppConfig {
    /// Load from `path` (if given) and the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.with_env(|name| std::env::var(name).ok())
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Apply environment overrides read through `lookup`.
    ///
    /// `DATABASE_URL` wins over `AGROBASE_DATABASE_URL`.
    pub fn with_env<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("DATABASE_URL").or_else(|| lookup("AGROBASE_DATABASE_URL")) {
            self.database.url = Some(url);
        }
        if let Some(raw) = lookup("AGROBASE_DB_MAX_CONNECTIONS") {
            self.database.max_connections = match raw.trim().parse::<u32>() {
                Ok(value) if value > 0 => value,
                _ => {
                    return Err(ConfigError::InvalidNumber {
                        name: "AGROBASE_DB_MAX_CONNECTIONS",
                        value: raw,
                    })
                }
            };
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn toml_fills_missing_fields_with_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [database]
            url = "postgres://localhost/agrobase"
            "#,
        )
        .unwrap();
        assert_eq!(config.database.url.as_deref(), Some("postgres://localhost/agrobase"));
        assert_eq!(config.database.max_connections, DEFAULT_MAX_CONNECTIONS);
        assert_eq!(config.database.acquire_timeout_secs, DEFAULT_ACQUIRE_TIMEOUT_SECS);
    }

    #[test]
    fn database_url_beats_prefixed_variable() {
        let config = AppConfig::default()
            .with_env(env(&[
                ("DATABASE_URL", "postgres://primary"),
                ("AGROBASE_DATABASE_URL", "postgres://fallback"),
            ]))
            .unwrap();
        assert_eq!(config.database.url.as_deref(), Some("postgres://primary"));

        let config = AppConfig::default()
            .with_env(env(&[("AGROBASE_DATABASE_URL", "postgres://fallback")]))
            .unwrap();
        assert_eq!(config.database.url.as_deref(), Some("postgres://fallback"));
    }

    #[test]
    fn environment_overrides_file() {
        let file: AppConfig = toml::from_str("[database]\nmax_connections = 4\n").unwrap();
        let config = file
            .with_env(env(&[("AGROBASE_DB_MAX_CONNECTIONS", "16")]))
            .unwrap();
        assert_eq!(config.database.max_connections, 16);
    }

    #[test]
    fn zero_connections_is_rejected() {
        let err = AppConfig::default()
            .with_env(env(&[("AGROBASE_DB_MAX_CONNECTIONS", "0")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidNumber { .. }));
    }
}
