use anyhow::Context;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

const CONFIG_ENV: &str = "ENERGY_CONFIG";
const BIND_ADDR_ENV: &str = "ENERGY_BIND_ADDR";
const DEFAULT_CONFIG_PATH: &str = "energy-config.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0:8080".into()
}

fn default_max_body_bytes() -> usize {
    64 * 1024
}

/// NDJSON file loaded into the store before the listener opens.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedConfig {
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    pub bind_addr: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub seed: Option<SeedConfig>,
    pub metrics: Option<MetricsConfig>,
}

impl AppConfig {
    /// Load from `$ENERGY_CONFIG`, else `energy-config.toml` when present,
    /// else built-in defaults. `$ENERGY_BIND_ADDR` overrides the bind address.
    pub fn load() -> anyhow::Result<Self> {
        use std::env;

        let mut cfg = match env::var(CONFIG_ENV) {
            Ok(path) => Self::from_path(&path)?,
            Err(_) if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::from_path(DEFAULT_CONFIG_PATH)?
            }
            Err(_) => {
                tracing::info!("no config file found, using defaults");
                Self::default()
            }
        };

        if let Ok(addr) = env::var(BIND_ADDR_ENV) {
            cfg.server.bind_addr = addr;
        }

        Ok(cfg)
    }

    pub fn from_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml_str(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    pub fn from_toml_str(contents: &str) -> anyhow::Result<Self> {
        let cfg: AppConfig = toml::from_str(contents)?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let cfg = AppConfig::from_toml_str("").unwrap();
        assert_eq!(cfg.server.bind_addr, "0.0.0.0:8080");
        assert_eq!(cfg.server.max_body_bytes, 65536);
        assert!(cfg.seed.is_none());
        assert!(cfg.metrics.is_none());
    }

    #[test]
    fn parses_all_sections() {
        let cfg = AppConfig::from_toml_str(
            r#"
            [server]
            bind_addr = "127.0.0.1:9000"
            max_body_bytes = 1024

            [seed]
            path = "readings.ndjson"

            [metrics]
            bind_addr = "127.0.0.1:9100"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.server.bind_addr, "127.0.0.1:9000");
        assert_eq!(cfg.server.max_body_bytes, 1024);
        assert_eq!(cfg.seed.unwrap().path, PathBuf::from("readings.ndjson"));
        assert_eq!(cfg.metrics.unwrap().bind_addr, "127.0.0.1:9100");
    }

    #[test]
    fn partial_server_section_keeps_other_defaults() {
        let cfg = AppConfig::from_toml_str("[server]\nmax_body_bytes = 10\n").unwrap();
        assert_eq!(cfg.server.bind_addr, "0.0.0.0:8080");
        assert_eq!(cfg.server.max_body_bytes, 10);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(AppConfig::from_path("/definitely/not/here.toml").is_err());
    }
}
