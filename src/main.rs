//! Hearken - Wake-word Voice Assistant
//!
//! Listens for the wake word, then answers spoken commands until told to
//! sleep or left alone for too long.

use anyhow::Result;
use hearken::assistant::Assistant;
use hearken::command_log::FileCommandLog;
use hearken::config::Config;
use hearken::knowledge::WikipediaClient;
use hearken::processor::{Collaborators, Processor};
use hearken::responses::ResponseCatalog;
use hearken::session::{Session, DEFAULT_TIMEOUT_SECS, DEFAULT_WAKE_WORD};
use hearken::tts::VoiceOptions;
use hearken::{asr, browser, tts};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Setup logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("👂 Hearken v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = Config::load();
    let responses = ResponseCatalog::load();

    let io = Collaborators {
        input: asr::create_input(&config)?,
        output: tts::create_engine(&config, VoiceOptions::default()),
        lookup: Box::new(WikipediaClient::new(&config.language_subtag())),
        browser: Box::new(browser::SystemBrowser),
        log: Box::new(FileCommandLog::new(config.command_log_path.clone())),
    };

    let session = Session::new(DEFAULT_WAKE_WORD, DEFAULT_TIMEOUT_SECS);
    let mut assistant = Assistant::new(session, Processor::new(config, responses, io));

    let interrupted = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&interrupted);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("🛑 Interrupt received, finishing current step...");
                flag.store(true, Ordering::SeqCst);
            }
            Err(e) => warn!("Could not listen for interrupt: {}", e),
        }
    });

    assistant.run(&interrupted).await
}
