//! User configuration management

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::task::DEFAULT_PRIORITY;

pub const APP_DIR_NAME: &str = "todolist";
pub const DEFAULT_STORAGE_FILE: &str = "tasks.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Where the task file lives. Relative paths resolve against the
    /// working directory; a leading `~/` expands to the home directory.
    #[serde(default)]
    pub storage_path: Option<String>,

    #[serde(default = "default_priority")]
    pub default_priority: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_path: None,
            default_priority: default_priority(),
        }
    }
}

fn default_priority() -> String {
    DEFAULT_PRIORITY.to_string()
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join("config.toml"))
}

impl Config {
    pub fn load() -> Result<Self> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Config::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        Ok(config)
    }

    /// Picks the task file: an explicit override wins, then the configured
    /// `storage_path`, then `tasks.json` in the working directory.
    pub fn storage_file(&self, override_path: Option<&Path>) -> PathBuf {
        if let Some(path) = override_path {
            return path.to_path_buf();
        }
        match &self.storage_path {
            Some(s) => expand_home(s),
            None => PathBuf::from(DEFAULT_STORAGE_FILE),
        }
    }
}

fn expand_home(s: &str) -> PathBuf {
    if let Some(stripped) = s.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(s)
}
