//! Server Configuration
//!
//! Read from an optional TOML file, then overridden by `CONVERTER_*`
//! environment variables.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::{env, fs};

/// Config file used when `CONVERTER_CONFIG` is unset
pub const DEFAULT_CONFIG_FILE: &str = "converter.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to listen on
    pub bind: String,

    /// TCP port to listen on
    pub port: u16,

    /// JSON file holding `{ "dates": [...] }`
    pub data_file: PathBuf,

    /// Allowed CORS origins; empty allows any origin
    pub cors_origins: Vec<String>,

    /// Upper bound on request body size
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 5000,
            data_file: PathBuf::from("data/currency_rates.json"),
            cors_origins: Vec::new(),
            max_body_bytes: 64 * 1024,
        }
    }
}

impl ServerConfig {
    /// Load `CONVERTER_CONFIG` (or `converter.toml`) and apply env overrides
    pub fn load() -> Result<Self> {
        let path = env::var("CONVERTER_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Ok(Self::load_from(path)?.with_overrides(|key| env::var(key).ok()))
    }

    /// Parse a TOML config file; a missing file yields the defaults
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let s = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let cfg: ServerConfig =
            toml::from_str(&s).with_context(|| format!("parsing {}", path.display()))?;
        Ok(cfg)
    }

    /// Apply `CONVERTER_*` overrides from `lookup`. Blank or unparsable values are ignored.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        if let Some(v) = get("CONVERTER_BIND") {
            self.bind = v;
        }
        if let Some(port) = get("CONVERTER_PORT").and_then(|v| v.parse().ok()) {
            self.port = port;
        }
        if let Some(v) = get("CONVERTER_DATA_FILE") {
            self.data_file = PathBuf::from(v);
        }
        if let Some(v) = get("CONVERTER_CORS_ORIGINS") {
            self.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Some(limit) = get("CONVERTER_MAX_BODY_BYTES").and_then(|v| v.parse().ok()) {
            self.max_body_bytes = limit;
        }

        self
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self
            .bind
            .parse()
            .with_context(|| format!("invalid bind address {:?}", self.bind))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}
