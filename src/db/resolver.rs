//! Turns raw [`DatabaseSettings`] into a [`ConnectionPlan`].
//!
//! Precedence, highest first:
//! 1. connection URI (`DATABASE_URL`, then `MYSQL_URL`)
//! 2. discrete fields, each one taken from its primary variable (`DB_*`) or,
//!    when that is blank, from the platform fallback (`MYSQL*`)
//!
//! Everything here is pure; logging and I/O happen in [`crate::db::connect`].

use std::str::FromStr;

use sqlx::mysql::{MySqlConnectOptions, MySqlSslMode};
use thiserror::Error as ThisError;
use url::Url;

use crate::config::DatabaseSettings;

pub const DEFAULT_MYSQL_PORT: u16 = 3306;

const TRUTHY_TOKENS: &[&str] = &["true", "1", "yes", "y", "on", "sim", "verdadeiro"];

#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum ResolveError {
    #[error("database not configured; missing {}", missing.join(", "))]
    Incomplete { missing: Vec<&'static str> },

    #[error("invalid port in {var}: {value:?}")]
    InvalidPort { var: &'static str, value: String },

    #[error("invalid connection URI in {var}")]
    InvalidUri { var: &'static str },
}

/// Returns the first candidate holding a non-blank value.
pub fn first_defined<'a>(candidates: &[Option<&'a str>]) -> Option<&'a str> {
    candidates
        .iter()
        .flatten()
        .copied()
        .find(|v| !v.trim().is_empty())
}

/// Case-insensitive match against the accepted truthy tokens.
pub fn parse_truthy(value: &str) -> bool {
    let v = value.trim().to_ascii_lowercase();
    TRUTHY_TOKENS.contains(&v.as_str())
}

/// An explicit flag wins; otherwise SSL follows production or URI usage.
pub fn decide_ssl(explicit: Option<&str>, production: bool, via_uri: bool) -> bool {
    match first_defined(&[explicit]) {
        Some(flag) => parse_truthy(flag),
        None => production || via_uri,
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct DiscreteFields {
    pub host: String,
    pub user: String,
    pub password: String,
    pub database: String,
    pub port: u16,
}

impl std::fmt::Debug for DiscreteFields {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscreteFields")
            .field("host", &self.host)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .field("port", &self.port)
            .finish()
    }
}

#[derive(Clone, PartialEq, Eq)]
pub enum ConnectionSource {
    Uri { var: &'static str, uri: String },
    Fields(DiscreteFields),
}

impl std::fmt::Debug for ConnectionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionSource::Uri { var, uri } => f
                .debug_struct("Uri")
                .field("var", var)
                .field("uri", &redact_uri(uri))
                .finish(),
            ConnectionSource::Fields(fields) => f.debug_tuple("Fields").field(fields).finish(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionPlan {
    pub source: ConnectionSource,
    pub ssl: bool,
}

impl ConnectionPlan {
    pub fn via_uri(&self) -> bool {
        matches!(self.source, ConnectionSource::Uri { .. })
    }

    /// Connection target with the password removed, safe for logs.
    pub fn describe(&self) -> String {
        match &self.source {
            ConnectionSource::Uri { uri, .. } => redact_uri(uri),
            ConnectionSource::Fields(f) => {
                format!("mysql://{}@{}:{}/{}", f.user, f.host, f.port, f.database)
            }
        }
    }

    /// Driver options. SSL when enabled encrypts without verifying the
    /// server certificate, which managed MySQL proxies require.
    pub fn connect_options(&self) -> Result<MySqlConnectOptions, ResolveError> {
        let options = match &self.source {
            ConnectionSource::Uri { var, uri } => MySqlConnectOptions::from_str(uri)
                .map_err(|_| ResolveError::InvalidUri { var: *var })?,
            ConnectionSource::Fields(f) => MySqlConnectOptions::new()
                .host(&f.host)
                .port(f.port)
                .username(&f.user)
                .password(&f.password)
                .database(&f.database),
        };
        let mode = if self.ssl {
            MySqlSslMode::Required
        } else {
            MySqlSslMode::Disabled
        };
        Ok(options.ssl_mode(mode))
    }
}

/// Whether the environment tag marks a production deployment.
pub fn is_production(settings: &DatabaseSettings) -> bool {
    first_defined(&[
        settings.app_env.as_deref(),
        settings.railway_environment_name.as_deref(),
    ])
    .is_some_and(|tag| tag.trim().eq_ignore_ascii_case("production"))
}

pub fn resolve(settings: &DatabaseSettings) -> Result<ConnectionPlan, ResolveError> {
    let production = is_production(settings);
    let explicit_ssl = settings.db_ssl.as_deref();

    let uri = lookup(&[
        ("DATABASE_URL", settings.database_url.as_deref()),
        ("MYSQL_URL", settings.mysql_url.as_deref()),
    ]);

    if let Some((var, uri)) = uri {
        let uri = uri.trim();
        if Url::parse(uri).is_err() {
            return Err(ResolveError::InvalidUri { var });
        }
        return Ok(ConnectionPlan {
            source: ConnectionSource::Uri {
                var,
                uri: uri.to_string(),
            },
            ssl: decide_ssl(explicit_ssl, production, true),
        });
    }

    Ok(ConnectionPlan {
        source: ConnectionSource::Fields(discrete_fields(settings)?),
        ssl: decide_ssl(explicit_ssl, production, false),
    })
}

type Candidates<'a> = [(&'static str, Option<&'a str>); 2];

/// First candidate variable holding a value, with the variable's name.
fn lookup<'a>(candidates: &Candidates<'a>) -> Option<(&'static str, &'a str)> {
    candidates
        .iter()
        .find_map(|(var, value)| first_defined(&[*value]).map(|v| (*var, v)))
}

fn discrete_fields(settings: &DatabaseSettings) -> Result<DiscreteFields, ResolveError> {
    let host = [
        ("DB_HOST", settings.db_host.as_deref()),
        ("MYSQLHOST", settings.mysqlhost.as_deref()),
    ];
    let user = [
        ("DB_USER", settings.db_user.as_deref()),
        ("MYSQLUSER", settings.mysqluser.as_deref()),
    ];
    let password = [
        ("DB_PASSWORD", settings.db_password.as_deref()),
        ("MYSQLPASSWORD", settings.mysqlpassword.as_deref()),
    ];
    let database = [
        ("DB_NAME", settings.db_name.as_deref()),
        ("MYSQLDATABASE", settings.mysqldatabase.as_deref()),
    ];
    let port = [
        ("DB_PORT", settings.db_port.as_deref()),
        ("MYSQLPORT", settings.mysqlport.as_deref()),
    ];

    let required = [
        ("DB_HOST/MYSQLHOST", lookup(&host)),
        ("DB_USER/MYSQLUSER", lookup(&user)),
        ("DB_PASSWORD/MYSQLPASSWORD", lookup(&password)),
        ("DB_NAME/MYSQLDATABASE", lookup(&database)),
    ];
    let missing: Vec<&'static str> = required
        .iter()
        .filter(|(_, found)| found.is_none())
        .map(|(names, _)| *names)
        .collect();
    let [
        (_, Some((_, host))),
        (_, Some((_, user))),
        (_, Some((_, password))),
        (_, Some((_, database))),
    ] = required
    else {
        return Err(ResolveError::Incomplete { missing });
    };

    let port = match lookup(&port) {
        None => DEFAULT_MYSQL_PORT,
        Some((var, raw)) => raw
            .trim()
            .parse::<u16>()
            .map_err(|_| ResolveError::InvalidPort {
                var,
                value: raw.to_string(),
            })?,
    };

    Ok(DiscreteFields {
        host: host.trim().to_string(),
        user: user.trim().to_string(),
        // Passwords may legitimately carry surrounding whitespace.
        password: password.to_string(),
        database: database.trim().to_string(),
        port,
    })
}

fn redact_uri(uri: &str) -> String {
    match Url::parse(uri) {
        Ok(mut url) => {
            if url.password().is_some() {
                let _ = url.set_password(Some("***"));
            }
            url.to_string()
        }
        Err(_) => "<unparsable uri>".to_string(),
    }
}
