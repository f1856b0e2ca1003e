/// Configuration for pattern mining and search
///
/// Everything has a sane default so a missing config file is fine.
/// Bad values are rejected up front by `validate()`; nothing gets clamped.

use crate::error::{MineError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

// How much history the loader keeps (tail of the file)
pub const DEFAULT_HISTORY_WINDOW: usize = 5_000;

/// Knobs for the pattern miner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MiningOptions {
    pub min_frequency: usize,
    pub top: usize,
    pub similarity_threshold: usize,
    pub min_sequence_length: usize,
    pub max_sequence_length: usize,
}

impl Default for MiningOptions {
    fn default() -> Self {
        Self {
            min_frequency: 5,
            top: 20,
            similarity_threshold: 3,
            min_sequence_length: 2,
            max_sequence_length: 5,
        }
    }
}

impl MiningOptions {
    /// Reject option combinations the miner can't do anything sensible with
    pub fn validate(&self) -> Result<()> {
        if self.min_frequency == 0 {
            return Err(MineError::Config("min_frequency must be at least 1".to_string()));
        }
        if self.top == 0 {
            return Err(MineError::Config("top must be at least 1".to_string()));
        }
        // A one-command "sequence" is just the command again
        if self.min_sequence_length < 2 {
            return Err(MineError::Config(
                "min_sequence_length must be at least 2".to_string(),
            ));
        }
        if self.max_sequence_length < self.min_sequence_length {
            return Err(MineError::Config(format!(
                "max_sequence_length ({}) is smaller than min_sequence_length ({})",
                self.max_sequence_length, self.min_sequence_length
            )));
        }
        Ok(())
    }
}

/// Knobs for search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    pub max_results: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self { max_results: 10 }
    }
}

impl SearchOptions {
    pub fn validate(&self) -> Result<()> {
        if self.max_results == 0 {
            return Err(MineError::Config("max_results must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Top-level config file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub history_window: usize,
    pub mining: MiningOptions,
    pub search: SearchOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            history_window: DEFAULT_HISTORY_WINDOW,
            mining: MiningOptions::default(),
            search: SearchOptions::default(),
        }
    }
}

impl Config {
    /// Load config from an explicit path, or the usual spots, or defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(p) => Some(p.to_path_buf()),
            None => Self::find_config_path(),
        };

        let config = match path {
            Some(path) => {
                tracing::debug!("loading config from {}", path.display());
                Self::from_toml(&fs::read_to_string(&path)?)?
            }
            None => Self::default(),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.history_window == 0 {
            return Err(MineError::Config("history_window must be at least 1".to_string()));
        }
        self.mining.validate()?;
        self.search.validate()
    }

    // XDG first, then a dotfile in home
    fn find_config_path() -> Option<PathBuf> {
        if let Some(config_dir) = dirs::config_dir() {
            let path = config_dir.join("berri-mine").join("config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        if let Some(home) = dirs::home_dir() {
            let path = home.join(".berri-mine.toml");
            if path.exists() {
                return Some(path);
            }
        }

        None
    }
}
