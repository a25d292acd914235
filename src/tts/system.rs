//! System TTS engine
//!
//! Shells out to `espeak-ng`, or `spd-say` when it is missing, and waits for
//! the utterance to finish.

use super::{TtsEngine, VoiceOptions};
use crate::error::HearkenError;
use anyhow::Result;
use async_trait::async_trait;
use std::io::ErrorKind;
use tokio::process::Command;
use tracing::debug;

#[derive(Debug)]
pub struct SystemEngine {
    options: VoiceOptions,
}

impl Default for SystemEngine {
    fn default() -> Self {
        Self::new(VoiceOptions::default())
    }
}

impl SystemEngine {
    pub fn new(options: VoiceOptions) -> Self {
        Self { options }
    }

    /// `espeak-ng` invocation for `text`
    pub fn espeak_args(&self, text: &str) -> Vec<String> {
        let mut args = vec!["-s".to_string(), self.options.rate.to_string()];
        if let Some(voice) = &self.options.voice {
            args.push("-v".to_string());
            args.push(voice.clone());
        }
        args.push(text.to_string());
        args
    }

    /// `spd-say` invocation for `text`; `--wait` blocks until spoken
    pub fn spd_say_args(&self, text: &str) -> Vec<String> {
        // spd-say rate is -100..100 around a ~180 wpm default
        let rate = ((self.options.rate as i64 - 180) / 2).clamp(-100, 100);
        let mut args = vec![
            "--wait".to_string(),
            "-r".to_string(),
            rate.to_string(),
        ];
        if let Some(voice) = &self.options.voice {
            args.push("-y".to_string());
            args.push(voice.clone());
        }
        args.push(text.to_string());
        args
    }
}

/// Run a synthesizer to completion. `Ok(false)` when the binary is not installed.
async fn run(program: &str, args: &[String]) -> Result<bool> {
    match Command::new(program).args(args).status().await {
        Ok(status) if status.success() => Ok(true),
        Ok(status) => Err(HearkenError::Tts(format!("{} exited with {}", program, status)).into()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(HearkenError::Tts(format!("failed to run {}: {}", program, e)).into()),
    }
}

#[async_trait]
impl TtsEngine for SystemEngine {
    async fn speak(&self, text: &str) -> Result<()> {
        debug!("System speaking: {}", text);

        if run("espeak-ng", &self.espeak_args(text)).await? {
            return Ok(());
        }

        if run("spd-say", &self.spd_say_args(text)).await? {
            return Ok(());
        }

        Err(HearkenError::Tts(
            "No system TTS command found (tried espeak-ng, spd-say)".to_string(),
        )
        .into())
    }

    fn name(&self) -> &str {
        "system"
    }
}
