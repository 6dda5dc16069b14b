//! Bootstrap configuration loading and config file resolution
//!
//! Configuration is a single TOML file. Every field carries a serde default,
//! so a missing file, a missing section or a missing key never stops the
//! engine: the caller logs a warning and continues with compiled defaults.
//!
//! # Config file resolution order
//! 1. Explicit path (command-line `--config`)
//! 2. `VERSUS_CONFIG` environment variable
//! 3. `<user config dir>/versus/config.toml`
//! 4. Compiled defaults (no file)

use crate::time::{millis_to_duration, secs_to_duration};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "VERSUS_CONFIG";

/// Upper bound for the augmentation timeout
pub const MAX_AUGMENTATION_TIMEOUT_MS: u64 = 30_000;

/// Bootstrap configuration loaded from TOML file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Real-time analysis cache sizing
    #[serde(default)]
    pub cache: CacheConfig,

    /// Optional LLM commentary augmentation
    #[serde(default)]
    pub augmentation: AugmentationConfig,

    /// Scoring thresholds
    #[serde(default)]
    pub scoring: ScoringConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Analysis cache configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Entry time-to-live in seconds
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,

    /// Maximum number of cached scores
    #[serde(default = "default_capacity")]
    pub capacity: usize,

    /// Interval between background eviction sweeps in seconds
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            capacity: default_capacity(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        secs_to_duration(self.ttl_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        secs_to_duration(self.sweep_interval_secs)
    }
}

/// Commentary augmentation configuration
///
/// The endpoint speaks the OpenAI-compatible chat completions protocol
/// (Groq by default).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AugmentationConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Hard budget for one commentary request
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// API key (lowest priority, after environment variables)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Default for AugmentationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: default_base_url(),
            model: default_model(),
            timeout_ms: default_timeout_ms(),
            max_tokens: default_max_tokens(),
            api_key: None,
        }
    }
}

impl AugmentationConfig {
    pub fn timeout(&self) -> Duration {
        millis_to_duration(self.timeout_ms)
    }
}

/// Scoring thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Below this word count a `final` mode score is flagged low-confidence
    #[serde(default = "default_min_final_words")]
    pub min_final_words: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            min_final_words: default_min_final_words(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_ttl_secs() -> u64 {
    60
}

fn default_capacity() -> usize {
    512
}

fn default_sweep_interval_secs() -> u64 {
    30
}

fn default_base_url() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_model() -> String {
    "llama-3.3-70b-versatile".to_string()
}

fn default_timeout_ms() -> u64 {
    3000
}

fn default_max_tokens() -> u32 {
    150
}

fn default_min_final_words() -> usize {
    8
}

impl TomlConfig {
    /// Check value ranges that serde cannot express
    pub fn validate(&self) -> Result<()> {
        if self.cache.capacity == 0 {
            return Err(Error::Config("cache.capacity must be at least 1".to_string()));
        }
        if self.cache.ttl_secs == 0 {
            return Err(Error::Config("cache.ttl_secs must be at least 1".to_string()));
        }
        if self.cache.sweep_interval_secs == 0 {
            return Err(Error::Config(
                "cache.sweep_interval_secs must be at least 1".to_string(),
            ));
        }
        if self.augmentation.timeout_ms == 0
            || self.augmentation.timeout_ms > MAX_AUGMENTATION_TIMEOUT_MS
        {
            return Err(Error::Config(format!(
                "augmentation.timeout_ms must be in 1..={}, got {}",
                MAX_AUGMENTATION_TIMEOUT_MS, self.augmentation.timeout_ms
            )));
        }
        Ok(())
    }
}

/// Parse and validate a TOML config string
pub fn parse_toml_config(content: &str) -> Result<TomlConfig> {
    let config: TomlConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))?;
    config.validate()?;
    Ok(config)
}

/// Read and validate a TOML config file
pub fn read_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    parse_toml_config(&content)
}

/// Write a config file, creating parent directories as needed
pub fn write_toml_config(config: &TomlConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Serialize TOML failed: {}", e)))?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Default per-user config file location
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("versus").join("config.toml"))
}

/// Locate the config file to use, if any
///
/// An explicit path is returned even when it does not exist so that the
/// caller reports the mistake instead of silently using defaults.
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Option<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    // Priority 3: Per-user config file
    default_config_path().filter(|p| p.exists())
}

/// Load configuration following the resolution order
///
/// Missing implicit files fall back to defaults with a warning. An explicit
/// path that cannot be read, or any file that fails to parse, is an error.
pub fn load_config(cli_arg: Option<&Path>) -> Result<TomlConfig> {
    match resolve_config_path(cli_arg) {
        Some(path) => {
            if !path.exists() && cli_arg.is_none() {
                warn!("Config file {} not found, using defaults", path.display());
                return Ok(TomlConfig::default());
            }
            let config = read_toml_config(&path)?;
            info!("Configuration loaded from {}", path.display());
            Ok(config)
        }
        None => {
            warn!("No config file found, using compiled defaults");
            Ok(TomlConfig::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TomlConfig::default();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.cache.ttl_secs, 60);
        assert_eq!(config.cache.capacity, 512);
        assert!(!config.augmentation.enabled);
        assert_eq!(config.augmentation.timeout_ms, 3000);
        assert_eq!(config.scoring.min_final_words, 8);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = parse_toml_config("").unwrap();
        assert_eq!(config, TomlConfig::default());
    }

    #[test]
    fn test_partial_section() {
        let config = parse_toml_config("[cache]\nttl_secs = 5\n").unwrap();
        assert_eq!(config.cache.ttl_secs, 5);
        assert_eq!(config.cache.capacity, 512);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let err = parse_toml_config("[cache]\ncapacity = 0\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_timeout_out_of_range_rejected() {
        let err = parse_toml_config("[augmentation]\ntimeout_ms = 60000\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_malformed_toml_rejected() {
        let err = parse_toml_config("[cache\nttl_secs = ").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_duration_helpers() {
        let cache = CacheConfig::default();
        assert_eq!(cache.ttl(), Duration::from_secs(60));
        assert_eq!(cache.sweep_interval(), Duration::from_secs(30));
        assert_eq!(AugmentationConfig::default().timeout(), Duration::from_secs(3));
    }
}
