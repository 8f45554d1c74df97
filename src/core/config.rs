//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.fleetpick/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::core::coordinator::{CoordinatorConfig, DEFAULT_DEBOUNCE, DEFAULT_PAGE_SIZE};

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct FleetpickConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub rest: RestConfig,
    #[serde(default)]
    pub memory: MemoryConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub source: Option<String>,
    pub page_size: Option<usize>,
    pub debounce_ms: Option<u64>,
    pub fetch_timeout_secs: Option<u64>,
    pub visibility_threshold: Option<f32>,
    pub placeholder: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct RestConfig {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub table: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct MemoryConfig {
    pub fleet_size: Option<usize>,
    pub latency_ms: Option<u64>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_SOURCE: &str = "memory";
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_VISIBILITY_THRESHOLD: f32 = 1.0;
pub const DEFAULT_PLACEHOLDER: &str = "Select a car...";
pub const DEFAULT_TABLE: &str = "cars";
pub const DEFAULT_FLEET_SIZE: usize = 23;
pub const DEFAULT_LATENCY_MS: u64 = 250;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub source: String,
    pub page_size: usize,
    pub debounce: Duration,
    pub fetch_timeout: Duration,
    pub visibility_threshold: f32,
    pub placeholder: String,
    pub rest_base_url: Option<String>,
    pub rest_api_key: Option<String>,
    pub rest_table: String,
    pub fleet_size: usize,
    pub memory_latency: Duration,
}

impl ResolvedConfig {
    pub fn coordinator_config(&self) -> CoordinatorConfig {
        CoordinatorConfig {
            page_size: self.page_size,
            debounce: self.debounce,
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.fleetpick/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".fleetpick").join("config.toml"))
}

/// Load config from `~/.fleetpick/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `FleetpickConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<FleetpickConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(FleetpickConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(FleetpickConfig::default());
    }

    let contents = fs::read_to_string(&path).map_err(ConfigError::Io)?;
    let config: FleetpickConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &PathBuf) {
    let default_content = r#"# Fleetpick Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# source = "memory"                 # "memory" or "rest"
# page_size = 5                     # vehicles per fetch
# debounce_ms = 300                 # quiet period before a search runs
# fetch_timeout_secs = 10           # a slower page counts as a failure
# visibility_threshold = 1.0        # share of the sentinel row that must be on screen
# placeholder = "Select a car..."

# [rest]
# base_url = "https://your-project.supabase.co"   # Or set FLEETPICK_BASE_URL
# api_key = "eyJ..."                              # Or set FLEETPICK_API_KEY
# table = "cars"

# [memory]
# fleet_size = 23
# latency_ms = 250
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
///
/// `cli_source` and `cli_page_size` are from CLI flags (None = not specified).
pub fn resolve(
    config: &FleetpickConfig,
    cli_source: Option<&str>,
    cli_page_size: Option<usize>,
) -> ResolvedConfig {
    // Source: CLI → env → config → default
    let source = cli_source
        .map(|s| s.to_string())
        .or_else(|| std::env::var("FLEETPICK_SOURCE").ok())
        .or_else(|| config.general.source.clone())
        .unwrap_or_else(|| DEFAULT_SOURCE.to_string());

    // Page size: CLI → config → default; zero falls back to default
    let page_size = cli_page_size
        .or(config.general.page_size)
        .filter(|&n| n > 0)
        .unwrap_or(DEFAULT_PAGE_SIZE);

    let visibility_threshold = config
        .general
        .visibility_threshold
        .filter(|t| *t > 0.0)
        .map(|t| t.min(1.0))
        .unwrap_or(DEFAULT_VISIBILITY_THRESHOLD);

    // REST credentials: env → config
    let rest_base_url = std::env::var("FLEETPICK_BASE_URL")
        .ok()
        .or_else(|| config.rest.base_url.clone());
    let rest_api_key = std::env::var("FLEETPICK_API_KEY")
        .ok()
        .or_else(|| config.rest.api_key.clone());
    let rest_table = std::env::var("FLEETPICK_TABLE")
        .ok()
        .or_else(|| config.rest.table.clone())
        .unwrap_or_else(|| DEFAULT_TABLE.to_string());

    ResolvedConfig {
        source,
        page_size,
        debounce: config
            .general
            .debounce_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_DEBOUNCE),
        fetch_timeout: Duration::from_secs(
            config
                .general
                .fetch_timeout_secs
                .filter(|&s| s > 0)
                .unwrap_or(DEFAULT_FETCH_TIMEOUT_SECS),
        ),
        visibility_threshold,
        placeholder: config
            .general
            .placeholder
            .clone()
            .unwrap_or_else(|| DEFAULT_PLACEHOLDER.to_string()),
        rest_base_url,
        rest_api_key,
        rest_table,
        fleet_size: config.memory.fleet_size.unwrap_or(DEFAULT_FLEET_SIZE),
        memory_latency: Duration::from_millis(
            config.memory.latency_ms.unwrap_or(DEFAULT_LATENCY_MS),
        ),
    }
}
