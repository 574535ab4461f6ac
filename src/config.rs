//! Layered configuration for Vitrine.
//!
//! Values are resolved in order, later layers winning:
//! defaults → `vitrine.toml` → environment → CLI flags.
//!
//! # Configuration File Format
//!
//! ```toml
//! [server]
//! host = "127.0.0.1"
//! port = 3000
//!
//! [api]
//! base_url = "http://localhost:3333"
//! timeout_secs = 10
//!
//! [session]
//! cookie_name = "VITRINE_USER"
//! signin_path = "/signin"
//!
//! [logging]
//! format = "pretty"   # or "json"
//! filter = "info"
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::catalog::server::ServerConfig;
use crate::catalog::session::SessionConfig;

/// File looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "vitrine.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines (default)
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Pretty => write!(f, "pretty"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => anyhow::bail!("Invalid log format '{}'. Valid values: pretty, json", s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSection {
    /// Base URL of the products API; `/products` is appended.
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ApiSection {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3333".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    pub format: LogFormat,
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            format: LogFormat::Pretty,
            filter: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerSection,
    pub api: ApiSection,
    pub session: SessionConfig,
    pub logging: LoggingSection,
}

impl AppConfig {
    /// Load file and environment layers.
    ///
    /// An explicit `path` must exist. Without one, `vitrine.toml` in the
    /// working directory is used when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match Self::resolve_path(path)? {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    fn resolve_path(path: Option<&Path>) -> Result<Option<PathBuf>> {
        match path {
            Some(path) => {
                if !path.exists() {
                    anyhow::bail!("Config file not found: {}", path.display());
                }
                Ok(Some(path.to_path_buf()))
            }
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                Ok(default.exists().then_some(default))
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Apply `VITRINE_*` overrides from `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("VITRINE_PORT") {
            self.server.port = port
                .parse()
                .with_context(|| format!("Invalid VITRINE_PORT '{}'", port))?;
        }
        if let Some(host) = lookup("VITRINE_HOST") {
            self.server.host = host;
        }
        if let Some(url) = lookup("VITRINE_API_URL") {
            self.api.base_url = url;
        }
        if let Some(secs) = lookup("VITRINE_API_TIMEOUT") {
            self.api.timeout_secs = secs
                .parse()
                .with_context(|| format!("Invalid VITRINE_API_TIMEOUT '{}'", secs))?;
        }
        if let Some(name) = lookup("VITRINE_COOKIE_NAME") {
            self.session.cookie_name = name;
        }
        if let Some(format) = lookup("VITRINE_LOG_FORMAT") {
            self.logging.format = format.parse()?;
        }
        Ok(())
    }

    /// Check values that parse but cannot work.
    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            anyhow::bail!("api.base_url must not be empty");
        }
        if self.api.timeout_secs == 0 {
            anyhow::bail!("api.timeout_secs must be greater than zero");
        }
        if self.session.cookie_name.trim().is_empty() {
            anyhow::bail!("session.cookie_name must not be empty");
        }
        if !self.session.signin_path.starts_with('/') {
            anyhow::bail!(
                "session.signin_path must be an absolute path, got '{}'",
                self.session.signin_path
            );
        }
        Ok(())
    }

    pub fn server_config(&self, dev_mode: bool) -> ServerConfig {
        ServerConfig {
            host: self.server.host.clone(),
            port: self.server.port,
            api_url: self.api.base_url.clone(),
            api_timeout: Duration::from_secs(self.api.timeout_secs),
            session: self.session.clone(),
            dev_mode,
        }
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }
}
