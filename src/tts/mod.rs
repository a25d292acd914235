//! TTS (Text-to-Speech) Module
//!
//! Provides a unified interface for the speech output backends.

use crate::config::Config;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

pub mod console;
pub mod system;

/// Trait for TTS engines
#[async_trait]
pub trait TtsEngine: Send + Sync + std::fmt::Debug {
    /// Speak the given text; returns once it has been spoken
    async fn speak(&self, text: &str) -> Result<()>;

    /// Get the engine name
    fn name(&self) -> &str;
}

/// Voice settings fixed at construction time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceOptions {
    /// Voice name passed to the synthesizer (`None` for its default)
    pub voice: Option<String>,
    /// Speaking rate in words per minute
    pub rate: u32,
}

impl Default for VoiceOptions {
    fn default() -> Self {
        Self {
            voice: None,
            rate: 150,
        }
    }
}

/// Factory to create the configured TTS engine
pub fn create_engine(config: &Config, voice: VoiceOptions) -> Arc<dyn TtsEngine> {
    info!("🛠️ Creating TTS engine: {}", config.tts_engine);
    let engine: Arc<dyn TtsEngine> = match config.tts_engine.as_str() {
        "system" => {
            info!("  - Using System TTS (voice: {:?})", voice.voice);
            Arc::new(system::SystemEngine::new(voice))
        }
        "console" => {
            info!("  - Using Console TTS");
            Arc::new(console::ConsoleEngine::new())
        }
        _ => {
            warn!(
                "  - Unknown engine '{}', falling back to System",
                config.tts_engine
            );
            Arc::new(system::SystemEngine::new(voice))
        }
    };
    info!("✅ TTS engine '{}' initialized", engine.name());
    engine
}
