use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::connection::ConnectionTarget;
use crate::error::ConfigError;

/// Settings file picked up from the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "backline.toml";

/// Runtime settings for backline
///
/// Precedence, lowest to highest: defaults, TOML file, environment
/// (including `.env`), CLI flags applied by the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub server: ServerSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub url: Option<String>,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 5,
            acquire_timeout_secs: 10,
        }
    }
}

impl DatabaseSettings {
    /// Resolve the connection target. Fails before any connect attempt.
    pub fn target(&self) -> Result<ConnectionTarget, ConfigError> {
        match self.url.as_deref() {
            Some(url) => ConnectionTarget::parse(url),
            None => Err(ConfigError::MissingDatabaseUrl),
        }
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub bind: SocketAddr,
    /// Allow any CORS origin instead of localhost only
    pub cors_permissive: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 3030)),
            cors_permissive: false,
        }
    }
}

impl Settings {
    /// Load settings from an optional file plus the process environment.
    ///
    /// With `path = None`, `backline.toml` in the working directory is used
    /// if present. A `.env` file is loaded first so its values count as
    /// environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let mut settings = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::from_file(&default_path)?
                } else {
                    Self::default()
                }
            }
        };

        settings.apply_env_with(|key| env::var(key).ok())?;
        Ok(settings)
    }

    /// Parse a TOML settings file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::File {
            path: path.to_owned(),
            reason: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::File {
            path: path.to_owned(),
            reason: e.to_string(),
        })
    }

    /// Apply environment overrides through `lookup`.
    ///
    /// Empty values are treated as unset.
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get("DATABASE_URL") {
            self.database.url = Some(url);
        }
        if let Some(raw) = get("BACKLINE_MAX_CONNECTIONS") {
            self.database.max_connections = parse_value("BACKLINE_MAX_CONNECTIONS", &raw)?;
            if self.database.max_connections == 0 {
                return Err(ConfigError::InvalidValue {
                    key: "BACKLINE_MAX_CONNECTIONS",
                    value: raw,
                    reason: "must be at least 1".into(),
                });
            }
        }
        if let Some(raw) = get("BACKLINE_ACQUIRE_TIMEOUT_SECS") {
            self.database.acquire_timeout_secs =
                parse_value("BACKLINE_ACQUIRE_TIMEOUT_SECS", &raw)?;
        }
        if let Some(raw) = get("BACKLINE_BIND") {
            self.server.bind = parse_value("BACKLINE_BIND", &raw)?;
        }
        if let Some(raw) = get("BACKLINE_CORS_PERMISSIVE") {
            self.server.cors_permissive = parse_bool("BACKLINE_CORS_PERMISSIVE", &raw)?;
        }

        Ok(())
    }
}

fn parse_value<T>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        key,
        value: raw.to_owned(),
        reason: e.to_string(),
    })
}

fn parse_bool(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: raw.to_owned(),
            reason: "expected true/false".into(),
        }),
    }
}
