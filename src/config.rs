use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

// =============================================================================
// Registry-related constants
// =============================================================================

/// Timeout for a single registry request in milliseconds (30 seconds)
pub const FETCH_TIMEOUT_MS: u64 = 30_000;

/// Number of images whose tags are fetched at the same time
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Page size requested from Docker Hub style tag listings
pub const DOCKER_HUB_PAGE_SIZE: u32 = 100;

/// Page size requested from OCI distribution tag listings
pub const OCI_PAGE_SIZE: usize = 1000;

/// Repository listing endpoint of Docker Hub
pub const DEFAULT_DOCKER_HUB_URL: &str = "https://hub.docker.com/v2/repositories";

/// File names treated as compose manifests during directory discovery
pub const DEFAULT_FILE_PATTERNS: [&str; 2] = ["docker-compose.y*ml", "compose.y*ml"];

const APP_NAME: &str = "compose-update-checker";

/// Checker configuration structure
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CheckerConfig {
    pub registry: RegistryConfig,
    /// Maximum number of concurrent tag fetches
    pub concurrency: usize,
    /// Glob patterns matched against file names when walking a directory
    pub file_patterns: Vec<String>,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            registry: RegistryConfig::default(),
            concurrency: DEFAULT_CONCURRENCY,
            file_patterns: DEFAULT_FILE_PATTERNS.iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// Registry-related configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct RegistryConfig {
    /// Base URL of a Docker Hub compatible tag listing API.
    /// When unset, tags are listed through the OCI distribution API of each image's registry.
    pub url: Option<String>,
    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout_ms: FETCH_TIMEOUT_MS,
        }
    }
}

impl CheckerConfig {
    /// Reads a JSON configuration file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Reads the config file at the default location, or returns defaults when absent
    pub fn load_default() -> anyhow::Result<Self> {
        let path = config_path();
        if path.is_file() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }
}

/// Returns the path to the config directory for compose-update-checker.
/// Uses $XDG_CONFIG_HOME/compose-update-checker if XDG_CONFIG_HOME is set,
/// otherwise falls back to ~/.config/compose-update-checker,
/// or ./compose-update-checker if neither is available.
pub fn config_dir() -> PathBuf {
    config_dir_with_env(std::env::var("XDG_CONFIG_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the default config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}

fn config_dir_with_env(xdg_config_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let config_dir = xdg_config_home
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".config")))
        .unwrap_or_else(|| PathBuf::from("."));

    config_dir.join(APP_NAME)
}
