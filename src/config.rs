//! Configuration management for Parlor
//!
//! This module handles loading, parsing, and validating configuration
//! from YAML files with sensible defaults for every field.

use crate::error::{ParlorError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main configuration structure for Parlor
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Chat behavior (greeting text)
    #[serde(default)]
    pub chat: ChatConfig,

    /// Composer behavior (debounce interval)
    #[serde(default)]
    pub composer: ComposerConfig,

    /// Mock provider latencies
    #[serde(default)]
    pub providers: ProvidersConfig,

    /// Export settings
    #[serde(default)]
    pub export: ExportConfig,
}

/// Chat configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Assistant greeting seeded into every new session
    #[serde(default = "default_greeting")]
    pub greeting: String,
}

fn default_greeting() -> String {
    crate::providers::mock::GREETING.to_string()
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            greeting: default_greeting(),
        }
    }
}

/// Composer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComposerConfig {
    /// Debounce interval for search and suggestions, in milliseconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_debounce_ms() -> u64 {
    500
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

/// Simulated latencies for the mock providers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvidersConfig {
    /// Assistant reply latency, in milliseconds
    #[serde(default = "default_reply_latency_ms")]
    pub reply_latency_ms: u64,

    /// Search and completion call latency, in milliseconds
    #[serde(default = "default_call_latency_ms")]
    pub call_latency_ms: u64,

    /// History fetch latency, in milliseconds
    #[serde(default = "default_fetch_latency_ms")]
    pub fetch_latency_ms: u64,
}

fn default_reply_latency_ms() -> u64 {
    1000
}

fn default_call_latency_ms() -> u64 {
    500
}

fn default_fetch_latency_ms() -> u64 {
    300
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            reply_latency_ms: default_reply_latency_ms(),
            call_latency_ms: default_call_latency_ms(),
            fetch_latency_ms: default_fetch_latency_ms(),
        }
    }
}

/// Export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory transcripts are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

fn default_output_dir() -> String {
    ".".to_string()
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

impl Config {
    /// Loads configuration from a YAML file
    ///
    /// A missing file yields the defaults; a present but malformed file
    /// is an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&contents)?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Validates the configuration values
    ///
    /// # Errors
    ///
    /// Returns [`ParlorError::Config`] for out-of-range values.
    pub fn validate(&self) -> Result<()> {
        if self.composer.debounce_ms == 0 {
            return Err(
                ParlorError::Config("composer.debounce_ms must be positive".to_string()).into(),
            );
        }
        if self.chat.greeting.trim().is_empty() {
            return Err(ParlorError::Config("chat.greeting must not be empty".to_string()).into());
        }
        if self.export.output_dir.trim().is_empty() {
            return Err(
                ParlorError::Config("export.output_dir must not be empty".to_string()).into(),
            );
        }
        Ok(())
    }

    /// Debounce interval as a [`Duration`]
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.composer.debounce_ms)
    }

    /// Reply latency as a [`Duration`]
    pub fn reply_latency(&self) -> Duration {
        Duration::from_millis(self.providers.reply_latency_ms)
    }

    /// Search/completion latency as a [`Duration`]
    pub fn call_latency(&self) -> Duration {
        Duration::from_millis(self.providers.call_latency_ms)
    }

    /// History fetch latency as a [`Duration`]
    pub fn fetch_latency(&self) -> Duration {
        Duration::from_millis(self.providers.fetch_latency_ms)
    }
}
