use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{RevStampError, Result};
use crate::version_file::FileKind;

/// Represents the complete configuration for revstamp.
///
/// Contains the version files to stamp, commit settings, and behavior options.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub targets: Vec<TargetConfig>,

    #[serde(default)]
    pub commit: CommitConfig,

    #[serde(default)]
    pub behavior: BehaviorConfig,
}

/// One set of version files of a single kind.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TargetConfig {
    pub kind: FileKind,

    /// `;` separated paths and glob patterns, `!` prefixed entries exclude
    pub files: String,
}

fn default_message() -> String {
    "Update version to {version} ***NO_CI***".to_string()
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_author_name() -> String {
    "revstamp".to_string()
}

fn default_author_email() -> String {
    "revstamp@localhost".to_string()
}

/// Settings for committing stamped files back to the repository.
///
/// The author is only used when the repository has no `user.name` and
/// `user.email` of its own.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CommitConfig {
    #[serde(default)]
    pub enabled: bool,

    /// Commit message, `{version}` is replaced with the stamped version
    #[serde(default = "default_message")]
    pub message: String,

    #[serde(default = "default_remote")]
    pub remote: String,

    #[serde(default)]
    pub push: bool,

    #[serde(default = "default_author_name")]
    pub author_name: String,

    #[serde(default = "default_author_email")]
    pub author_email: String,
}

impl Default for CommitConfig {
    fn default() -> Self {
        CommitConfig {
            enabled: false,
            message: default_message(),
            remote: default_remote(),
            push: false,
            author_name: default_author_name(),
            author_email: default_author_email(),
        }
    }
}

impl CommitConfig {
    /// The commit message with `{version}` filled in.
    pub fn render_message(&self, version: &str) -> String {
        self.message.replace("{version}", version)
    }
}

/// Configuration for behavior customization.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct BehaviorConfig {
    /// Commit the files that were written even if others failed
    #[serde(default)]
    pub commit_on_partial_failure: bool,
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `revstamp.toml` in current directory
/// 3. `.revstamp.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        read_config(Path::new(path))?
    } else if Path::new("./revstamp.toml").exists() {
        read_config(Path::new("./revstamp.toml"))?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(".revstamp.toml");
        if config_path.exists() {
            read_config(&config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    parse_config(&config_str)
}

/// Parses configuration from TOML text.
pub fn parse_config(config_str: &str) -> Result<Config> {
    toml::from_str(config_str).map_err(|e| RevStampError::config(e.to_string()))
}

fn read_config(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .map_err(|e| RevStampError::config(format!("Cannot read {}: {}", path.display(), e)))
}
