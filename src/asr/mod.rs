//! ASR (Automatic Speech Recognition) Module
//!
//! Speech input adapters:
//! - Microphone: local capture, transcribed by a Wyoming ASR server
//! - Console: typed lines on stdin, for headless use

pub mod console;
pub mod microphone;
pub mod wyoming;

use crate::config::Config;
use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

// Re-export main types
pub use console::ConsoleInput;
pub use microphone::MicrophoneInput;
pub use wyoming::WyomingClient;

/// Why a listen attempt produced no utterance
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ListenError {
    /// Nothing was said before the listen window closed
    #[error("no speech detected")]
    NoSpeech,

    /// Audio was captured but could not be mapped to text
    #[error("speech could not be understood")]
    Unintelligible,

    /// The transcription backend is unreachable
    #[error("speech recognition service unavailable: {0}")]
    ServiceUnavailable(String),
}

/// Bounds for a single listen attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenWindow {
    /// How long to wait for speech to start
    pub timeout: Duration,
    /// Longest phrase recorded once speech started
    pub phrase_limit: Duration,
    /// Re-measure ambient noise before listening
    pub calibrate: bool,
}

impl ListenWindow {
    /// Short polling window used while idle
    pub const WAKE_WORD: ListenWindow = ListenWindow {
        timeout: Duration::from_secs(1),
        phrase_limit: Duration::from_secs(3),
        calibrate: true,
    };

    /// Window used for commands and follow-up prompts
    pub const COMMAND: ListenWindow = ListenWindow {
        timeout: Duration::from_secs(5),
        phrase_limit: Duration::from_secs(15),
        calibrate: false,
    };
}

/// Trait for speech input adapters
#[async_trait]
pub trait SpeechInput: Send {
    /// Capture one utterance and return its lowercase transcript
    async fn listen(&mut self, window: ListenWindow) -> Result<String, ListenError>;

    /// Adapter name for logging
    fn name(&self) -> &str;
}

/// Normalize a raw transcript; blank text counts as unintelligible
pub fn normalize_transcript(text: &str) -> Result<String, ListenError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        Err(ListenError::Unintelligible)
    } else {
        Ok(trimmed.to_lowercase())
    }
}

/// Factory to create the configured speech input
pub fn create_input(config: &Config) -> Result<Box<dyn SpeechInput>> {
    info!("🛠️ Creating speech input: {}", config.speech_backend);
    let input: Box<dyn SpeechInput> = match config.speech_backend.as_str() {
        "microphone" => Box::new(MicrophoneInput::new(config)?),
        "console" => Box::new(ConsoleInput::new()?),
        other => {
            warn!("  - Unknown speech backend '{}', using microphone", other);
            Box::new(MicrophoneInput::new(config)?)
        }
    };
    info!("✅ Speech input '{}' initialized", input.name());
    Ok(input)
}
