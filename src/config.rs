use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use crate::files::reader::ReadStrategy;

/// Resolved server configuration. Deserialized once at startup and shared
/// with every connection worker behind an `Arc`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    /// OS-level queue depth for pending, not-yet-accepted connections.
    pub backlog: u32,
    /// Echoed in the `Server` response header.
    pub name: String,
    pub web_root: PathBuf,
    pub max_workers: usize,
    pub read_strategy: ReadStrategy,
    /// Largest file the static handler will load, in bytes.
    pub max_file_size: u64,
    /// Largest request (head plus body) a worker will buffer, in bytes.
    /// Anything larger is answered with a 400.
    pub max_request_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "127.0.0.1".to_string(),
            backlog: 50,
            name: "hearth".to_string(),
            web_root: PathBuf::from("www"),
            max_workers: 500,
            read_strategy: ReadStrategy::Buffered,
            max_file_size: 20 * 1024 * 1024,
            max_request_size: 20 * 1024 * 1024,
        }
    }
}

impl ServerConfig {
    /// Loads configuration from a YAML file; missing keys take defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: ServerConfig = serde_yaml::from_str(&raw)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        Ok(config)
    }

    /// Loads from the file named by `HEARTH_CONFIG`, or defaults.
    pub fn from_env() -> anyhow::Result<Self> {
        match std::env::var("HEARTH_CONFIG") {
            Ok(path) => Self::load(Path::new(&path)),
            Err(_) => Ok(Self::default()),
        }
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
