use serde::Deserialize;
use std::{fs, path::Path, time::Duration};

use apcupsd_client::{DecodeMode, NisClient};

pub const CONFIG_ENV: &str = "APCUPSD_EXPORTER_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "apcupsd-exporter.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NisConfig {
    pub connect_timeout_ms: u64,
    /// Bound on each frame read; `0` waits forever.
    pub read_timeout_ms: u64,
    /// Read every `KEY : value` line of a frame instead of the first one.
    pub decode_all_lines: bool,
}

impl Default for NisConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: 10_000,
            read_timeout_ms: 10_000,
            decode_all_lines: false,
        }
    }
}

impl NisConfig {
    pub fn client(&self) -> NisClient {
        let read_timeout = (self.read_timeout_ms > 0).then(|| Duration::from_millis(self.read_timeout_ms));
        let decode_mode = if self.decode_all_lines {
            DecodeMode::AllLines
        } else {
            DecodeMode::FirstLine
        };
        NisClient::new(Duration::from_millis(self.connect_timeout_ms), read_timeout, decode_mode)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub nis: NisConfig,
}

impl AppConfig {
    /// Load from `$APCUPSD_EXPORTER_CONFIG`, or from `apcupsd-exporter.toml`
    /// when that exists, or fall back to built-in defaults.
    pub fn load() -> anyhow::Result<Self> {
        use std::env;

        match env::var(CONFIG_ENV) {
            Ok(path) => Self::from_file(&path),
            Err(_) if Path::new(DEFAULT_CONFIG_PATH).exists() => Self::from_file(DEFAULT_CONFIG_PATH),
            Err(_) => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {path}: {e}"))?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> anyhow::Result<Self> {
        let cfg: AppConfig = toml::from_str(contents)?;
        Ok(cfg)
    }
}
