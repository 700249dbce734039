//! Configuration management for snipmark.
//!
//! Configuration is loaded from multiple sources with precedence:
//! 1. Environment variables (SNIPMARK_*)
//! 2. Config file (`$SNIPMARK_CONFIG` or `<config dir>/config.toml`)
//! 3. Default values

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::error::{Error, Result};
use crate::relocator::HighlightStyle;
use crate::types::HighlightScope;

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Open-then-wait-then-inject settings
    pub orchestrator: OrchestratorConfig,

    /// Highlight settings
    pub relocator: RelocatorConfig,

    /// Search/index backend
    pub backend: BackendConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Delay between "load complete" and injection, for content rendered
    /// client-side after the load event
    pub settle_delay_ms: u64,

    /// Bring newly opened surfaces to the foreground
    pub activate: bool,

    /// Highlight scope for relocations started from a search result
    pub scope: HighlightScope,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelocatorConfig {
    /// Highlight scope when highlighting on the already active surface
    pub active_scope: HighlightScope,

    /// Style of the `<mark>` around an exact match
    pub mark_style: HighlightStyle,

    /// Style of a highlighted containing block
    pub block_style: HighlightStyle,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the search/index backend
    pub url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

// Default value functions
fn default_settle_delay_ms() -> u64 {
    2000
}

fn default_backend_url() -> String {
    "http://localhost:8001".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_config_dir() -> PathBuf {
    if let Some(proj_dirs) = ProjectDirs::from("dev", "snipmark", "snipmark") {
        proj_dirs.config_dir().to_path_buf()
    } else {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".snipmark")
    }
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: default_settle_delay_ms(),
            activate: true,
            scope: HighlightScope::ExactSpan,
        }
    }
}

impl Default for RelocatorConfig {
    fn default() -> Self {
        Self {
            active_scope: HighlightScope::ContainingBlock,
            mark_style: HighlightStyle::mark(),
            block_style: HighlightStyle::block(),
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: default_backend_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl BackendConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Load configuration from file and environment.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path())?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load configuration from a file, falling back to defaults if it is missing.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No config file at {}, using defaults", path.display());
            return Ok(Config::default());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Save configuration to a file.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the config file path.
    pub fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var("SNIPMARK_CONFIG") {
            PathBuf::from(path)
        } else {
            default_config_dir().join("config.toml")
        }
    }

    /// Apply `SNIPMARK_*` overrides using `lookup` to read variables.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("SNIPMARK_BACKEND_URL") {
            self.backend.url = url;
        }
        if let Some(delay) = lookup("SNIPMARK_SETTLE_DELAY_MS") {
            self.orchestrator.settle_delay_ms = delay.trim().parse().map_err(|_| {
                Error::Config(format!("SNIPMARK_SETTLE_DELAY_MS is not a number: {delay}"))
            })?;
        }
        Ok(())
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.orchestrator.settle_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.orchestrator.settle_delay_ms, 2000);
        assert_eq!(config.settle_delay(), Duration::from_secs(2));
        assert!(config.orchestrator.activate);
        assert_eq!(config.orchestrator.scope, HighlightScope::ExactSpan);
        assert_eq!(config.relocator.active_scope, HighlightScope::ContainingBlock);
        assert_eq!(config.relocator.mark_style.padding, "2px 4px");
        assert_eq!(config.relocator.block_style.padding, "4px");
        assert_eq!(config.backend.url, "http://localhost:8001");
        assert_eq!(config.backend.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let temp = tempdir().expect("Failed to create temp dir");
        let path = temp.path().join("config.toml");
        std::fs::write(
            &path,
            "[orchestrator]\nsettle_delay_ms = 500\n\n[backend]\nurl = \"http://search.local:9000\"\n",
        )
        .unwrap();

        let config = Config::load_from(&path).expect("Failed to load config");
        assert_eq!(config.orchestrator.settle_delay_ms, 500);
        assert!(config.orchestrator.activate);
        assert_eq!(config.backend.url, "http://search.local:9000");
        assert_eq!(config.backend.timeout_secs, 30);
        assert_eq!(config.relocator, RelocatorConfig::default());
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let temp = tempdir().expect("Failed to create temp dir");
        let config = Config::load_from(&temp.path().join("nope.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_load() {
        let temp = tempdir().expect("Failed to create temp dir");
        let path = temp.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.orchestrator.scope = HighlightScope::ContainingBlock;
        config.relocator.mark_style.background_color = "#ffcc00".to_string();
        config.save_to(&path).expect("Failed to save config");

        let loaded = Config::load_from(&path).expect("Failed to load config");
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let temp = tempdir().expect("Failed to create temp dir");
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[orchestrator]\nsettle_delay_ms = \"soon\"\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("SNIPMARK_BACKEND_URL", "http://10.0.0.2:8001"),
            ("SNIPMARK_SETTLE_DELAY_MS", " 750 "),
        ]);
        let mut config = Config::default();
        config
            .apply_overrides(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.backend.url, "http://10.0.0.2:8001");
        assert_eq!(config.settle_delay(), Duration::from_millis(750));
    }

    #[test]
    fn test_bad_delay_override_rejected() {
        let mut config = Config::default();
        let result = config.apply_overrides(|key| {
            (key == "SNIPMARK_SETTLE_DELAY_MS").then(|| "later".to_string())
        });
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
