//! Console TTS engine

use super::TtsEngine;
use anyhow::Result;
use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

/// Prints spoken text to stdout instead of synthesizing it
#[derive(Debug, Default)]
pub struct ConsoleEngine;

impl ConsoleEngine {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TtsEngine for ConsoleEngine {
    async fn speak(&self, text: &str) -> Result<()> {
        let mut stdout = tokio::io::stdout();
        stdout.write_all(format!("🔊 {}\n", text).as_bytes()).await?;
        stdout.flush().await?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}
