//! TOML configuration of the terminal client.

use std::{fs, path::Path};

use adaptive_defence_gateway::GatewayConfig;
use adaptive_defence_session::SessionConfig;
use anyhow::{Context, Result};
use serde::Deserialize;

const DEFAULT_LOG_FILTER: &str = "adaptive_defence=info";

/// Complete client configuration; every field has a default.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub(crate) struct AppConfig {
    /// Connection to the AI service.
    pub(crate) gateway: GatewayConfig,
    /// Tick pacing and report delivery.
    pub(crate) session: SessionConfig,
    /// Diagnostics output.
    pub(crate) logging: LoggingConfig,
}

/// Diagnostics settings.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub(crate) struct LoggingConfig {
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub(crate) filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LOG_FILTER.to_owned(),
        }
    }
}

impl AppConfig {
    /// Loads the configuration file, or the defaults when no path is given.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("invalid configuration toml")
    }
}
