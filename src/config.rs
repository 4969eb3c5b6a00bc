//! Environment-sourced configuration, read once at startup.
//!
//! The listen port goes through figment's `Env` provider. Everything else is
//! taken verbatim so that values like a numeric password are never
//! reinterpreted, and database knobs are parsed leniently on use: a malformed
//! database setting degrades to a default, never to a failed startup.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Serialized};
use serde::Deserialize;
use tracing::warn;

use crate::error::IntakeError;

pub const DEFAULT_LISTEN_PORT: u16 = 3000;
pub const DEFAULT_POOL_SIZE: u32 = 10;
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 5;

/// Variables parsed into typed values.
const TYPED_KEYS: &[&str] = &["PORT"];

/// Variables kept as raw strings.
const VERBATIM_KEYS: &[&str] = &[
    "LOGLEVEL",
    "CORS_ALLOWED_ORIGINS",
    "DATABASE_URL",
    "MYSQL_URL",
    "DB_HOST",
    "DB_USER",
    "DB_PASSWORD",
    "DB_NAME",
    "DB_PORT",
    "MYSQLHOST",
    "MYSQLUSER",
    "MYSQLPASSWORD",
    "MYSQLDATABASE",
    "MYSQLPORT",
    "DB_SSL",
    "DB_POOL_SIZE",
    "DB_PROBE_TIMEOUT_SECS",
    "DB_BOOTSTRAP_SCHEMA",
    "APP_ENV",
    "RAILWAY_ENVIRONMENT_NAME",
];

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub port: u16,
    pub loglevel: String,
    pub cors_allowed_origins: Option<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: DEFAULT_LISTEN_PORT,
            loglevel: "info".to_string(),
            cors_allowed_origins: None,
        }
    }
}

impl ServerSettings {
    /// Parsed CORS allow-list. `None` means unrestricted.
    pub fn allowed_origins(&self) -> Option<Vec<String>> {
        let raw = self.cors_allowed_origins.as_deref()?;
        let origins: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.trim_end_matches('/').to_string())
            .collect();
        (!origins.is_empty()).then_some(origins)
    }
}

/// Raw database inputs. Resolution into a connection lives in
/// [`crate::db::resolver`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub database_url: Option<String>,
    pub mysql_url: Option<String>,

    pub db_host: Option<String>,
    pub db_user: Option<String>,
    pub db_password: Option<String>,
    pub db_name: Option<String>,
    pub db_port: Option<String>,

    pub mysqlhost: Option<String>,
    pub mysqluser: Option<String>,
    pub mysqlpassword: Option<String>,
    pub mysqldatabase: Option<String>,
    pub mysqlport: Option<String>,

    pub db_ssl: Option<String>,
    pub app_env: Option<String>,
    pub railway_environment_name: Option<String>,

    pub db_pool_size: Option<String>,
    pub db_probe_timeout_secs: Option<String>,
    pub db_bootstrap_schema: Option<String>,
}

impl DatabaseSettings {
    /// A bad value only costs the default; database knobs never stop startup.
    pub fn probe_timeout(&self) -> Duration {
        let secs = parse_knob(
            "DB_PROBE_TIMEOUT_SECS",
            self.db_probe_timeout_secs.as_deref(),
            DEFAULT_PROBE_TIMEOUT_SECS,
        );
        Duration::from_secs(secs.max(1))
    }

    pub fn pool_size(&self) -> u32 {
        parse_knob("DB_POOL_SIZE", self.db_pool_size.as_deref(), DEFAULT_POOL_SIZE).max(1)
    }

    /// Schema bootstrap runs unless explicitly switched off.
    pub fn bootstrap_schema(&self) -> bool {
        match self.db_bootstrap_schema.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(v) => crate::db::resolver::parse_truthy(v),
        }
    }
}

impl Config {
    pub fn figment() -> Figment {
        Figment::new()
            .merge(Env::raw().only(TYPED_KEYS))
            .merge(verbatim_env(VERBATIM_KEYS))
    }

    pub fn from_figment(figment: &Figment) -> Result<Self, IntakeError> {
        Ok(Self {
            server: figment.extract()?,
            database: figment.extract()?,
        })
    }

    /// Read the process environment.
    pub fn load() -> Result<Self, IntakeError> {
        Self::from_figment(&Self::figment())
    }
}

fn parse_knob<T>(var: &str, raw: Option<&str>, default: T) -> T
where
    T: FromStr + Display,
{
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        None => default,
        Some(v) => v.parse().unwrap_or_else(|_| {
            warn!(var, value = %v, default = %default, "invalid setting; using default");
            default
        }),
    }
}

fn verbatim_env(keys: &[&str]) -> Serialized<BTreeMap<String, String>> {
    let values = keys
        .iter()
        .filter_map(|key| {
            std::env::var(key)
                .ok()
                .map(|value| (key.to_ascii_lowercase(), value))
        })
        .collect();
    Serialized::defaults(values)
}
