//! Splitter configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use splitter_store_lmdb::environment::DEFAULT_MAP_SIZE;
use splitter_utils::LogFormat;

use crate::SplitterError;

/// Configuration for a hosted splitter.
///
/// Can be loaded from a TOML file via [`SplitterConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SplitterConfig {
    /// Directory of the LMDB store (used when `persist` is set).
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Whether the registry is persisted to LMDB.
    #[serde(default)]
    pub persist: bool,

    /// LMDB map size in bytes.
    #[serde(default = "default_map_size")]
    pub lmdb_map_size: usize,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Whether to collect Prometheus metrics.
    #[serde(default)]
    pub enable_metrics: bool,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_data_dir() -> PathBuf {
    PathBuf::from("./splitter_data")
}

fn default_map_size() -> usize {
    DEFAULT_MAP_SIZE
}

fn default_log_format() -> LogFormat {
    LogFormat::Human
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl SplitterConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, SplitterError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| SplitterError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, SplitterError> {
        let config: Self = toml::from_str(s).map_err(|e| SplitterError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, SplitterError> {
        toml::to_string_pretty(self).map_err(|e| SplitterError::Config(e.to_string()))
    }

    fn validate(&self) -> Result<(), SplitterError> {
        if self.lmdb_map_size == 0 {
            return Err(SplitterError::Config("lmdb_map_size must be non-zero".into()));
        }
        Ok(())
    }

    /// Install the global tracing subscriber described by this config.
    ///
    /// Returns `false` if a subscriber was already installed.
    pub fn init_logging(&self) -> bool {
        splitter_utils::try_init_logging(self.log_format, &self.log_level).is_ok()
    }
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            persist: false,
            lmdb_map_size: default_map_size(),
            log_format: default_log_format(),
            log_level: default_log_level(),
            enable_metrics: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = SplitterConfig::default();
        let toml_str = config.to_toml_string().unwrap();
        let parsed = SplitterConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed.data_dir, config.data_dir);
        assert_eq!(parsed.lmdb_map_size, config.lmdb_map_size);
        assert_eq!(parsed.log_format, LogFormat::Human);
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = SplitterConfig::from_toml_str("").expect("empty toml should use defaults");
        assert!(!config.persist);
        assert!(!config.enable_metrics);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.lmdb_map_size, DEFAULT_MAP_SIZE);
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            persist = true
            data_dir = "/var/lib/splitter"
            log_format = "json"
        "#;
        let config = SplitterConfig::from_toml_str(toml).expect("should parse");
        assert!(config.persist);
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/splitter"));
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.log_level, "info"); // default
    }

    #[test]
    fn zero_map_size_is_rejected() {
        let result = SplitterConfig::from_toml_str("lmdb_map_size = 0");
        assert!(matches!(result, Err(SplitterError::Config(_))));
    }

    #[test]
    fn init_logging_installs_only_once() {
        let config = SplitterConfig {
            log_level: "warn".to_string(),
            ..SplitterConfig::default()
        };
        // The first call may lose to another test's subscriber; the second
        // always finds one installed.
        let _ = config.init_logging();
        assert!(!config.init_logging());
    }

    #[test]
    fn missing_file_returns_config_error() {
        let result = SplitterConfig::from_toml_file("/nonexistent/splitter.toml");
        assert!(matches!(result, Err(SplitterError::Config(_))));
    }
}
