//! Client configuration loaded from a TOML file.

use std::{
    fs,
    path::{Path, PathBuf},
};

use reqwest::Url;
use serde::Deserialize;

use crate::ClientOptions;

/// Default configuration file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "photoapp-client-config.toml";

/// Environment variable that overrides `client.webservice`.
pub const WEBSERVICE_ENV: &str = "PHOTOAPP_WEBSERVICE";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file '{}' does not exist", .0.display())]
    Missing(PathBuf),
    #[error("could not read config file '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not parse config file '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("baseurl '{url}' is invalid: {reason}")]
    BaseUrl { url: String, reason: String },
}

/// Service endpoint section (`[client]`).
#[derive(Debug, Clone, Deserialize)]
pub struct ClientSection {
    /// Base URL of the web service, e.g. `http://photoapp.example:8080`.
    pub webservice: String,
    /// Where downloaded assets are written. Defaults to the working directory.
    #[serde(default)]
    pub download_dir: Option<PathBuf>,
    /// Per-request timeout in milliseconds; unset means no client timeout.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

/// Retry section (`[retry]`); every field is optional.
#[derive(Debug, Clone, Deserialize)]
pub struct RetrySection {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,
}

fn default_max_attempts() -> u32 {
    ClientOptions::default().max_attempts
}

fn default_backoff_ms() -> u64 {
    ClientOptions::default().retry_backoff_ms
}

impl Default for RetrySection {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_ms: default_backoff_ms(),
        }
    }
}

/// Logging section (`[logging]`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingSection {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default)]
    pub filter: Option<String>,
    /// Append logs to this file instead of stderr.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    pub client: ClientSection,
    #[serde(default)]
    pub retry: RetrySection,
    #[serde(default)]
    pub logging: LoggingSection,
}

impl ClientConfig {
    /// Parses TOML text and validates the base URL.
    pub fn from_toml(path: &Path, text: &str) -> Result<Self, ConfigError> {
        let mut cfg: ClientConfig = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })?;
        cfg.client.webservice = normalize_base_url(&cfg.client.webservice)?;
        Ok(cfg)
    }

    /// Replaces the base URL, validating it the same way as the file value.
    pub fn override_webservice(&mut self, url: &str) -> Result<(), ConfigError> {
        self.client.webservice = normalize_base_url(url)?;
        Ok(())
    }

    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            timeout_ms: self.client.timeout_ms,
            max_attempts: self.retry.max_attempts,
            retry_backoff_ms: self.retry.backoff_ms,
        }
    }

    pub fn download_dir(&self) -> PathBuf {
        self.client
            .download_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Loads configuration from `path`, applying the `PHOTOAPP_WEBSERVICE`
/// override when set.
pub fn load(path: &Path) -> Result<ClientConfig, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::Missing(path.to_owned()));
    }
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_owned(),
        source,
    })?;
    let mut cfg = ClientConfig::from_toml(path, &text)?;

    if let Ok(url) = std::env::var(WEBSERVICE_ENV) {
        if !url.trim().is_empty() {
            tracing::debug!("{WEBSERVICE_ENV} overrides configured webservice");
            cfg.override_webservice(&url)?;
        }
    }
    Ok(cfg)
}

/// Checks that `raw` is a plain-http URL with a host and strips any
/// trailing slash.
pub fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    let invalid = |reason: &str| ConfigError::BaseUrl {
        url: trimmed.to_owned(),
        reason: reason.to_owned(),
    };

    if trimmed.is_empty() {
        return Err(invalid("it is empty"));
    }
    let url = Url::parse(trimmed).map_err(|err| invalid(&err.to_string()))?;
    match url.scheme() {
        "http" => {}
        "https" => return Err(invalid("https is not supported (use http)")),
        other => return Err(invalid(&format!("unsupported scheme '{other}'"))),
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(invalid("it has no host"));
    }

    Ok(trimmed.trim_end_matches('/').to_owned())
}
