//! Shared configuration for the hearth dashboard.
//!
//! One TOML file, three sections (`[bus]`, `[home]`, `[log]`), merged
//! with `HEARTH_`-prefixed environment variables. The TUI layers its CLI
//! flags on top of this crate's output.

use std::path::PathBuf;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use hearth_bus::{BusConfig, ReconnectConfig};

// ── Error ────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ──────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub bus: BusSection,

    #[serde(default)]
    pub home: HomeSection,

    #[serde(default)]
    pub log: LogSection,
}

/// `[bus]` — how to reach the message bus.
#[derive(Debug, Deserialize, Serialize)]
pub struct BusSection {
    /// WebSocket endpoint (e.g., "ws://127.0.0.1:9001").
    #[serde(default = "default_bus_url")]
    pub url: String,
}

impl Default for BusSection {
    fn default() -> Self {
        Self { url: default_bus_url() }
    }
}

/// `[home]` — the installation this dashboard renders.
#[derive(Debug, Deserialize, Serialize)]
pub struct HomeSection {
    /// Namespace prefix: segment 0 of every topic that becomes a widget.
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

impl Default for HomeSection {
    fn default() -> Self {
        Self { prefix: default_prefix() }
    }
}

/// `[log]` — the file log the TUI writes while it owns the terminal.
#[derive(Debug, Deserialize, Serialize)]
pub struct LogSection {
    /// Tracing filter directive, e.g. "info" or "hearth_core=trace".
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogSection {
    fn default() -> Self {
        Self { level: default_log_level() }
    }
}

fn default_bus_url() -> String {
    "ws://127.0.0.1:9001".into()
}
fn default_prefix() -> String {
    "home".into()
}
fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Build the bus client configuration this config describes.
    ///
    /// The subscription filter is the whole installation subtree:
    /// `<prefix>/#`.
    pub fn bus_config(&self) -> Result<BusConfig, ConfigError> {
        let url: url::Url = self.bus.url.parse().map_err(|_| ConfigError::Validation {
            field: "bus.url".into(),
            reason: format!("invalid URL: {}", self.bus.url),
        })?;

        Ok(BusConfig {
            url,
            filter: format!("{}/#", self.home.prefix),
            reconnect: ReconnectConfig::default(),
        })
    }
}

// ── Config file path ─────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "hearth", "hearth").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("hearth");
    p
}

// ── Config loading ───────────────────────────────────────────────────

/// Load the full Config from file + environment.
///
/// Precedence, lowest to highest: built-in defaults, the TOML file,
/// `HEARTH_`-prefixed environment variables (`HEARTH_BUS_URL`,
/// `HEARTH_HOME_PREFIX`, `HEARTH_LOG_LEVEL`).
pub fn load_config() -> Result<Config, ConfigError> {
    let path = config_path();

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed("HEARTH_").split("_"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning the defaults if loading fails.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ────────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(&path, toml_str)?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn defaults_cover_every_section() {
        let config = Config::default();
        assert_eq!(config.bus.url, "ws://127.0.0.1:9001");
        assert_eq!(config.home.prefix, "home");
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn toml_overrides_defaults_per_field() {
        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::string("[bus]\nurl = \"ws://bus.local:9001\"\n"));

        let config: Config = figment.extract().unwrap();
        assert_eq!(config.bus.url, "ws://bus.local:9001");
        // Untouched sections keep their defaults.
        assert_eq!(config.home.prefix, "home");
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn bus_config_scopes_the_filter_to_the_prefix() {
        let config = Config {
            home: HomeSection { prefix: "cabin".into() },
            ..Config::default()
        };

        let bus = config.bus_config().unwrap();
        assert_eq!(bus.url.as_str(), "ws://127.0.0.1:9001/");
        assert_eq!(bus.filter, "cabin/#");
    }

    #[test]
    fn invalid_bus_url_is_a_validation_error() {
        let config = Config {
            bus: BusSection { url: "not a url".into() },
            ..Config::default()
        };

        let err = config.bus_config().unwrap_err();
        assert!(matches!(err, ConfigError::Validation { .. }));
        assert_eq!(err.to_string(), "invalid bus.url: invalid URL: not a url");
    }

    #[test]
    fn config_serializes_to_loadable_toml() {
        let toml_str = toml::to_string_pretty(&Config::default()).unwrap();
        let reparsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(reparsed.home.prefix, "home");
    }
}
