//! TOML-based viewer configuration.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

/// Top-level viewer configuration parsed from TOML.
///
/// All fields have defaults; an absent config file is equivalent to
/// [`ViewerConfig::default`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerConfig {
    /// API server settings.
    pub server: ServerConfig,
    /// Initial viewer state.
    pub viewer: ViewerSection,
}

/// API server settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// TCP port the API binds to.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 3000 }
    }
}

/// Initial viewer state.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerSection {
    /// Timestep index shown on first render.
    pub start_timestep: usize,
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"server.port"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

impl ViewerConfig {
    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self, String> {
        let raw = fs::read_to_string(path)
            .map_err(|e| format!("failed to read config `{}`: {e}", path.display()))?;
        toml::from_str(&raw).map_err(|e| format!("invalid config `{}`: {e}", path.display()))
    }

    /// Checks field constraints, returning every violation.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.server.port == 0 {
            errors.push(ConfigError {
                field: "server.port".to_string(),
                message: "must be a non-zero port number".to_string(),
            });
        }
        errors
    }
}
