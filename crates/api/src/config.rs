use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;

use axum::http::HeaderValue;
use product_storage::{ImageStoreConfig, StorageError};

/// Errors raised while reading configuration at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A variable is set but cannot be parsed.
    #[error("{var} is invalid: {message}")]
    Invalid { var: &'static str, message: String },

    /// The image backend configuration is invalid.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Log output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("expected 'pretty' or 'json', got '{other}'")),
        }
    }
}

/// Origins allowed to make cross-origin requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsOrigins {
    /// Any origin (`*`).
    Any,
    /// An explicit allow-list.
    List(Vec<HeaderValue>),
}

impl CorsOrigins {
    /// Parse a comma-separated origin list. A `*` entry allows any origin.
    pub fn parse(raw: &str) -> Result<Self, String> {
        let entries: Vec<&str> = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        if entries.is_empty() || entries.contains(&"*") {
            return Ok(Self::Any);
        }
        entries
            .into_iter()
            .map(|o| HeaderValue::from_str(o).map_err(|e| format!("origin '{o}': {e}")))
            .collect::<Result<Vec<_>, _>>()
            .map(Self::List)
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: IpAddr,
    /// Bind port (default: `3002`).
    pub port: u16,
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Version reported by `/health`.
    pub app_version: String,
    /// Allowed CORS origins.
    pub cors_origins: CorsOrigins,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Insert the seed catalogue into an empty table at startup.
    pub seed_on_startup: bool,
    pub log_format: LogFormat,
    /// Product image backend.
    pub images: ImageStoreConfig,
}

impl ServerConfig {
    /// Default listening port.
    pub const DEFAULT_PORT: u16 = 3002;

    /// Default request timeout in seconds.
    pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                               |
    /// |------------------------|---------------------------------------|
    /// | `HOST`                 | `0.0.0.0`                             |
    /// | `PORT`                 | `3002`                                |
    /// | `DATABASE_URL`         | `postgres://localhost:5432/productdb` |
    /// | `APP_VERSION`          | `0.1.0`                               |
    /// | `CORS_ORIGINS`         | `*`                                   |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                                  |
    /// | `SEED_ON_STARTUP`      | `true`                                |
    /// | `LOG_FORMAT`           | `pretty`                              |
    ///
    /// Image backend variables are documented on [`ImageStoreConfig::from_env`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host = parse_var(&get, "HOST", IpAddr::V4(Ipv4Addr::UNSPECIFIED))?;
        let port = parse_var(&get, "PORT", Self::DEFAULT_PORT)?;
        let request_timeout_secs = parse_var(
            &get,
            "REQUEST_TIMEOUT_SECS",
            Self::DEFAULT_REQUEST_TIMEOUT_SECS,
        )?;
        let log_format = parse_var(&get, "LOG_FORMAT", LogFormat::Pretty)?;

        let seed_on_startup = match get("SEED_ON_STARTUP") {
            None => true,
            Some(raw) => parse_bool(&raw).ok_or_else(|| ConfigError::Invalid {
                var: "SEED_ON_STARTUP",
                message: format!("expected a boolean, got '{raw}'"),
            })?,
        };

        let cors_origins = CorsOrigins::parse(&get("CORS_ORIGINS").unwrap_or_else(|| "*".into()))
            .map_err(|message| ConfigError::Invalid {
                var: "CORS_ORIGINS",
                message,
            })?;

        Ok(Self {
            host,
            port,
            database_url: get("DATABASE_URL")
                .unwrap_or_else(|| "postgres://localhost:5432/productdb".into()),
            app_version: get("APP_VERSION").unwrap_or_else(|| "0.1.0".into()),
            cors_origins,
            request_timeout_secs,
            seed_on_startup,
            log_format,
            images: ImageStoreConfig::from_lookup(&lookup)?,
        })
    }
}

/// Parse `var` when set, otherwise fall back to `default`.
fn parse_var<T>(
    get: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let Some(raw) = get(var) else {
        return Ok(default);
    };
    raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        var,
        message: format!("'{raw}': {e}"),
    })
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
