use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::file_utils::FileManager;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Model name used for translation requests
    #[serde(default = "default_model")]
    pub model: String,

    /// Service endpoint URL (optional, for Azure OpenAI or self-hosted)
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// API key; when empty, the OPENAI_API_KEY environment variable is used
    #[serde(default = "String::new")]
    pub api_key: String,

    /// Number of input lines per remote call
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Maximum attempts per batch, including the first
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Log level configuration
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Error level
    Error,
    /// Warning level
    Warn,
    /// Info level (default)
    #[default]
    Info,
    /// Debug level
    Debug,
    /// Trace level
    Trace,
}

impl LogLevel {
    /// Convert to the log crate's level filter
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: default_model(),
            endpoint: default_endpoint(),
            api_key: String::new(),
            batch_size: default_batch_size(),
            max_attempts: default_max_attempts(),
            timeout_secs: default_timeout_secs(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = FileManager::read_to_string(&path)?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|e| anyhow!("Invalid configuration file {:?}: {}", path.as_ref(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file, or create a default one when it doesn't exist
    pub fn from_file_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if FileManager::file_exists(&path) {
            Self::from_file(path)
        } else {
            let config = Config::default();
            config.save_to_file(path)?;
            Ok(config)
        }
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        FileManager::write_to_file(path, &content)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.model.is_empty() {
            return Err(anyhow!("Model name cannot be empty"));
        }
        if self.batch_size == 0 {
            return Err(anyhow!("Batch size must be at least 1"));
        }
        if self.max_attempts == 0 {
            return Err(anyhow!("Max attempts must be at least 1"));
        }
        Ok(())
    }

    /// Resolve the API key from the configuration or the process environment
    pub fn resolve_api_key(&self) -> Option<String> {
        if !self.api_key.is_empty() {
            return Some(self.api_key.clone());
        }
        std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|key| !key.is_empty())
    }
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_endpoint() -> String {
    "https://api.openai.com".to_string()
}

fn default_batch_size() -> usize {
    120
}

fn default_max_attempts() -> u32 {
    crate::retry::DEFAULT_MAX_ATTEMPTS
}

fn default_timeout_secs() -> u64 {
    120
}
