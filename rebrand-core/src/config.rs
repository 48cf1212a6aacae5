use crate::error::RebrandError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory under the tree root holding the tool's own configuration.
pub const CONFIG_DIR: &str = ".rebrand";

/// Default name of the persisted rename transaction log.
pub const DEFAULT_TRANSACTION_LOG: &str = ".rebrand-transaction.json";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Names added to the fixed exclusion sets
    #[serde(default)]
    pub exclude: ExcludeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Print per-file and per-rename detail by default
    #[serde(default)]
    pub verbose: bool,

    /// Whether to use color output by default (None = auto-detect)
    #[serde(default)]
    pub use_color: Option<bool>,

    /// Try `git mv` before a plain filesystem rename
    #[serde(default = "default_true")]
    pub use_git: bool,

    /// Transaction log file name, relative to the tree root
    #[serde(default = "default_transaction_log")]
    pub transaction_log: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            use_color: None,
            use_git: true,
            transaction_log: default_transaction_log(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ExcludeConfig {
    #[serde(default)]
    pub files: Vec<String>,

    #[serde(default)]
    pub dirs: Vec<String>,
}

fn default_true() -> bool {
    true
}

fn default_transaction_log() -> String {
    DEFAULT_TRANSACTION_LOG.to_string()
}

impl Config {
    /// Load config from `<root>/.rebrand/config.toml` if it exists
    pub fn load(root: &Path) -> Result<Self> {
        let config_path = Self::path_for(root);
        if config_path.exists() {
            return Self::load_from_path(&config_path);
        }

        Ok(Self::default())
    }

    pub fn path_for(root: &Path) -> PathBuf {
        root.join(CONFIG_DIR).join("config.toml")
    }

    /// Load config from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        Ok(config)
    }

    /// The transaction log must be a plain relative file path inside the tree
    pub fn validate(&self) -> Result<(), RebrandError> {
        let log = Path::new(&self.defaults.transaction_log);
        if self.defaults.transaction_log.is_empty() {
            return Err(RebrandError::Config(
                "transaction_log must not be empty".to_string(),
            ));
        }
        if log.is_absolute() || log.components().any(|c| c == std::path::Component::ParentDir) {
            return Err(RebrandError::Config(format!(
                "transaction_log must be relative to the tree root: {}",
                self.defaults.transaction_log
            )));
        }
        Ok(())
    }

    /// Save config to a specific path
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}
