//! Configuration layer: typed settings with layered precedence (file → env → CLI).
//!
//! The flat variables of earlier deployments (`PORT`, `REDIS_HOST`,
//! `REDIS_PORT`, `SECRET_KEY`, `FLASK_ENV`) fill any value the layered
//! sources left unset.

mod cli;

pub use cli::{CliArgs, Command, ServeArgs, ServeOverrides};

use std::{net::SocketAddr, num::NonZeroUsize, str::FromStr, time::Duration};

use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

use crate::cache::{CacheBackendKind, defaults as cache_defaults};

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "content-service";
const ENV_PREFIX: &str = "CONTENT_SERVICE";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_SECRET_KEY: &str = "dev-secret-key";

/// Fully-resolved deployment settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub logging: LoggingSettings,
    pub cache: CacheSettings,
}

#[derive(Clone)]
pub struct ServerSettings {
    pub addr: SocketAddr,
    pub debug: bool,
    /// Carried for deployment parity; no request path reads it.
    pub secret_key: String,
}

impl std::fmt::Debug for ServerSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerSettings")
            .field("addr", &self.addr)
            .field("debug", &self.debug)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Clone)]
pub struct CacheSettings {
    pub enabled: bool,
    pub backend: CacheBackendKind,
    pub host: String,
    pub port: u16,
    pub timeout: Duration,
    pub memory_capacity: NonZeroUsize,
    pub list_ttl: Duration,
    pub detail_ttl: Duration,
    pub genres_ttl: Duration,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence (file → environment → CLI).
pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;
    raw.apply_legacy_env(|key| std::env::var(key).ok())?;

    match cli.command.as_ref() {
        Some(Command::Serve(args)) => raw.apply_serve_overrides(&args.overrides),
        None => raw.apply_serve_overrides(&ServeOverrides::default()),
    }

    Settings::from_raw(raw)
}

/// Resolve configuration using the supplied CLI arguments, returning both for downstream use.
pub fn load_with_cli() -> Result<(CliArgs, Settings), LoadError> {
    let args = CliArgs::parse();
    let settings = load(&args)?;
    Ok((args, settings))
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    server: RawServerSettings,
    logging: RawLoggingSettings,
    cache: RawCacheSettings,
}

impl RawSettings {
    /// Fill gaps from the flat legacy variables; structured sources win.
    fn apply_legacy_env<F>(&mut self, lookup: F) -> Result<(), LoadError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if self.server.port.is_none()
            && let Some(port) = lookup("PORT")
        {
            self.server.port = Some(parse_legacy_port("PORT", &port)?);
        }
        if self.server.secret_key.is_none() {
            self.server.secret_key = lookup("SECRET_KEY");
        }
        if self.server.debug.is_none()
            && let Some(env) = lookup("FLASK_ENV")
        {
            self.server.debug = Some(env.trim() == "development");
        }
        if self.cache.host.is_none() {
            self.cache.host = lookup("REDIS_HOST");
        }
        if self.cache.port.is_none()
            && let Some(port) = lookup("REDIS_PORT")
        {
            self.cache.port = Some(parse_legacy_port("REDIS_PORT", &port)?);
        }
        Ok(())
    }

    fn apply_serve_overrides(&mut self, overrides: &ServeOverrides) {
        if let Some(host) = overrides.host.as_ref() {
            self.server.host = Some(host.clone());
        }
        if let Some(port) = overrides.port {
            self.server.port = Some(port);
        }
        if overrides.debug {
            self.server.debug = Some(true);
        }
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
        if let Some(host) = overrides.cache_host.as_ref() {
            self.cache.host = Some(host.clone());
        }
        if let Some(port) = overrides.cache_port {
            self.cache.port = Some(port);
        }
        if let Some(backend) = overrides.cache_backend.as_ref() {
            self.cache.backend = Some(backend.clone());
        }
        if overrides.no_cache {
            self.cache.enabled = Some(false);
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            server,
            logging,
            cache,
        } = raw;

        let server = build_server_settings(server)?;
        let logging = build_logging_settings(logging)?;
        let cache = build_cache_settings(cache)?;

        Ok(Self {
            server,
            logging,
            cache,
        })
    }
}

fn build_server_settings(server: RawServerSettings) -> Result<ServerSettings, LoadError> {
    let host = server.host.unwrap_or_else(|| DEFAULT_HOST.to_string());

    let port = server.port.unwrap_or(DEFAULT_PORT);
    if port == 0 {
        return Err(LoadError::invalid(
            "server.port",
            "port must be greater than zero",
        ));
    }

    let addr = parse_socket_addr(&host, port)
        .map_err(|reason| LoadError::invalid("server.addr", reason))?;

    let secret_key = server
        .secret_key
        .filter(|key| !key.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_SECRET_KEY.to_string());

    Ok(ServerSettings {
        addr,
        debug: server.debug.unwrap_or(false),
        secret_key,
    })
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn build_cache_settings(cache: RawCacheSettings) -> Result<CacheSettings, LoadError> {
    let backend = match cache.backend {
        Some(value) => CacheBackendKind::from_str(&value)
            .map_err(|reason| LoadError::invalid("cache.backend", reason))?,
        None => CacheBackendKind::default(),
    };

    let host = cache
        .host
        .map(|host| host.trim().to_string())
        .unwrap_or_else(|| cache_defaults::HOST.to_string());
    if host.is_empty() {
        return Err(LoadError::invalid("cache.host", "host must not be empty"));
    }

    let port = cache.port.unwrap_or(cache_defaults::PORT);
    if port == 0 {
        return Err(LoadError::invalid(
            "cache.port",
            "port must be greater than zero",
        ));
    }

    let timeout_ms = cache.timeout_ms.unwrap_or(cache_defaults::TIMEOUT_MS);
    let timeout = positive_duration(Duration::from_millis(timeout_ms), "cache.timeout_ms")?;

    let memory_capacity = NonZeroUsize::new(
        cache
            .memory_capacity
            .unwrap_or(cache_defaults::MEMORY_CAPACITY),
    )
    .ok_or_else(|| LoadError::invalid("cache.memory_capacity", "must be greater than zero"))?;

    let list_ttl = seconds(
        cache.list_ttl_seconds.unwrap_or(cache_defaults::LIST_TTL_SECS),
        "cache.list_ttl_seconds",
    )?;
    let detail_ttl = seconds(
        cache.detail_ttl_seconds.unwrap_or(cache_defaults::DETAIL_TTL_SECS),
        "cache.detail_ttl_seconds",
    )?;
    let genres_ttl = seconds(
        cache.genres_ttl_seconds.unwrap_or(cache_defaults::GENRES_TTL_SECS),
        "cache.genres_ttl_seconds",
    )?;

    Ok(CacheSettings {
        enabled: cache.enabled.unwrap_or(true),
        backend,
        host,
        port,
        timeout,
        memory_capacity,
        list_ttl,
        detail_ttl,
        genres_ttl,
    })
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawServerSettings {
    host: Option<String>,
    port: Option<u16>,
    debug: Option<bool>,
    secret_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawCacheSettings {
    enabled: Option<bool>,
    backend: Option<String>,
    host: Option<String>,
    port: Option<u16>,
    timeout_ms: Option<u64>,
    memory_capacity: Option<usize>,
    list_ttl_seconds: Option<u64>,
    detail_ttl_seconds: Option<u64>,
    genres_ttl_seconds: Option<u64>,
}

fn parse_socket_addr(host: &str, port: u16) -> Result<SocketAddr, String> {
    let candidate = format!("{host}:{port}");
    candidate
        .parse()
        .map_err(|err| format!("invalid address `{candidate}`: {err}"))
}

fn parse_legacy_port(key: &'static str, value: &str) -> Result<u16, LoadError> {
    value
        .trim()
        .parse()
        .map_err(|err| LoadError::invalid(key, format!("`{value}` is not a port: {err}")))
}

fn positive_duration(value: Duration, key: &'static str) -> Result<Duration, LoadError> {
    if value.is_zero() {
        return Err(LoadError::invalid(key, "must be greater than zero"));
    }
    Ok(value)
}

fn seconds(value: u64, key: &'static str) -> Result<Duration, LoadError> {
    positive_duration(Duration::from_secs(value), key)
}
