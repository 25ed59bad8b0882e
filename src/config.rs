//! Server configuration — TOML file with defaults.
//!
//! ```toml
//! address = "127.0.0.1:9000"
//! log_filter = "debug"
//! ```

use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::error::{IndexError, Result};

/// Default listen address.
pub const DEFAULT_ADDRESS: &str = "0.0.0.0:8080";

/// Default tracing filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Address the listener binds to, `host:port`.
    pub address: String,
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS.to_string(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| IndexError::Config(format!("{}: {}", path.display(), e)))?;
        let config = Self::from_toml(&text)?;
        debug!(path = %path.display(), address = %config.address, "config loaded");
        Ok(config)
    }

    /// Parse configuration from a TOML string. Missing keys use defaults.
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| IndexError::Config(e.to_string()))
    }

    /// Override the listen address, e.g. from a command-line flag.
    pub fn with_address(mut self, address: Option<String>) -> Self {
        if let Some(address) = address {
            self.address = address;
        }
        self
    }
}
