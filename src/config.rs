use anyhow::{Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure for superfork
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    /// GitHub authentication settings
    #[serde(default)]
    pub github: GitHubConfig,

    /// Remote call pacing and retry settings
    #[serde(default)]
    pub calls: CallsConfig,
}

/// GitHub configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GitHubConfig {
    /// Authentication method
    #[serde(default = "default_auth_method")]
    pub auth_method: String, // "auto", "gh_cli", "token"

    /// GitHub username (auto-detected if null)
    pub username: Option<String>,
}

/// Pacing and retry configuration for remote calls
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CallsConfig {
    /// Maximum attempts per remote call
    #[serde(default = "default_max_tries")]
    pub max_tries: u32,

    /// Pause after a successful mutating call, in seconds
    #[serde(default = "default_mutation_pause")]
    pub mutation_pause_secs: u64,

    /// Remaining-quota threshold below which calls wait for the reset
    #[serde(default = "default_low_water_mark")]
    pub low_water_mark: u64,
}

// Default value functions
fn default_auth_method() -> String {
    "auto".to_string()
}
fn default_max_tries() -> u32 {
    3
}
fn default_mutation_pause() -> u64 {
    30
}
fn default_low_water_mark() -> u64 {
    10
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            auth_method: default_auth_method(),
            username: None,
        }
    }
}

impl Default for CallsConfig {
    fn default() -> Self {
        Self {
            max_tries: default_max_tries(),
            mutation_pause_secs: default_mutation_pause(),
            low_water_mark: default_low_water_mark(),
        }
    }
}

impl Config {
    /// Load configuration from the default location, or fall back to defaults
    /// when no file exists
    pub fn load_or_default() -> Result<Self> {
        let config_path = Self::default_config_path()?;

        if config_path.exists() {
            Self::load(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self).context("Failed to serialize configuration")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;

        Ok(())
    }

    /// Get the default configuration file path (XDG compliant)
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = config_dir().context("Failed to get user config directory")?;

        Ok(config_dir.join("superfork").join("config.yml"))
    }
}
