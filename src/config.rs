//! Assistant configuration
//!
//! Loaded once at startup from `assistant_config.json`. A missing or invalid
//! file is never fatal: the built-in defaults are used instead.

use crate::error::{HearkenError, HearkenResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Configuration file name
pub const CONFIG_FILE: &str = "assistant_config.json";

/// Main application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // Speech
    pub language: String,
    pub speech_backend: String,
    pub tts_engine: String,
    pub input_device: Option<usize>,

    // Wyoming
    pub wyoming_host: String,
    pub wyoming_port: u16,

    // Lookup
    pub max_wikipedia_sentences: usize,

    // Logging
    pub log_commands: bool,
    pub command_log_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: "en-US".to_string(),
            speech_backend: "microphone".to_string(),
            tts_engine: "system".to_string(),
            input_device: None,
            wyoming_host: "localhost".to_string(),
            wyoming_port: 10300,
            max_wikipedia_sentences: 2,
            log_commands: true,
            command_log_path: PathBuf::from("command_log.txt"),
        }
    }
}

impl Config {
    /// Load config from the first `assistant_config.json` found, or use defaults
    pub fn load() -> Self {
        match locate(CONFIG_FILE) {
            Some(path) => Self::load_from(&path),
            None => {
                debug!("No {} found, using defaults", CONFIG_FILE);
                Self::default()
            }
        }
    }

    /// Load config from a specific file, falling back to defaults on any failure
    pub fn load_from(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                debug!("Could not read {}: {}", path.display(), e);
                return Self::default();
            }
        };

        match Self::from_json(&content) {
            Ok(config) => {
                info!("⚙️ Loaded configuration from {}", path.display());
                config
            }
            Err(e) => {
                warn!("⚠️ Config file invalid, using defaults: {}", e);
                Self::default()
            }
        }
    }

    /// Parse and validate a configuration document
    pub fn from_json(content: &str) -> HearkenResult<Self> {
        let config: Self = serde_json::from_str(content)?;
        if config.max_wikipedia_sentences == 0 {
            return Err(HearkenError::Config(
                "max_wikipedia_sentences must be positive".to_string(),
            ));
        }
        Ok(config)
    }

    /// Primary language subtag of the locale tag (`en-US` -> `en`), used for
    /// the Wikipedia subdomain and the transcription language hint
    pub fn language_subtag(&self) -> String {
        let primary = self
            .language
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .trim()
            .to_lowercase();
        if primary.is_empty() {
            "en".to_string()
        } else {
            primary
        }
    }
}

/// Find a data file in the working directory, then in the user config directory
pub fn locate(file_name: &str) -> Option<PathBuf> {
    let candidates = [
        Some(PathBuf::from(file_name)),
        dirs::config_dir().map(|dir| dir.join("hearken").join(file_name)),
    ];

    candidates.into_iter().flatten().find(|path| path.exists())
}
