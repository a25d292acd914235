//! Hearken Error Types
//!
//! Centralized error handling for the assistant and its adapters.

use thiserror::Error;

/// Central error type for Hearken
#[derive(Error, Debug)]
pub enum HearkenError {
    #[error("ASR engine error: {0}")]
    Asr(String),

    #[error("TTS engine error: {0}")]
    Tts(String),

    #[error("Audio capture error: {0}")]
    Audio(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type alias for Hearken operations
pub type HearkenResult<T> = Result<T, HearkenError>;
