//! Assistant run loop
//!
//! One cooperative loop: check the inactivity timeout, poll for the wake word
//! while idle, take and dispatch a command while active, pause briefly,
//! repeat. Every adapter call is awaited in sequence; nothing runs
//! concurrently with the loop.

use crate::asr::{ListenError, ListenWindow};
use crate::processor::{Processor, FAREWELL};
use crate::session::{self, Session};
use anyhow::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Pause between loop iterations
const TICK_PAUSE: Duration = Duration::from_millis(100);

pub const COMMAND_PROMPT: &str = "How can I help you?";
pub const TIMEOUT_NOTICE: &str = "Timing out due to inactivity.";
pub const SHUTDOWN_NOTICE: &str = "I encountered an error and need to shut down.";

pub struct Assistant {
    session: Session,
    processor: Processor,
    service_warned: bool,
}

impl Assistant {
    pub fn new(session: Session, processor: Processor) -> Self {
        Self {
            session,
            processor,
            service_warned: false,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Run until `interrupted` is set or an unexpected error occurs.
    ///
    /// The flag is checked between iterations only: an in-flight listen,
    /// lookup or speech call always runs to completion first.
    pub async fn run(&mut self, interrupted: &AtomicBool) -> Result<()> {
        match self.run_loop(interrupted).await {
            Ok(()) => {
                info!("👋 Program terminated by user");
                if let Err(e) = self.processor.speak(FAREWELL).await {
                    warn!("Could not speak farewell: {}", e);
                }
                Ok(())
            }
            Err(e) => {
                error!("❌ An error occurred: {:#}", e);
                if let Err(speak_err) = self.processor.speak(SHUTDOWN_NOTICE).await {
                    debug!("Could not speak shutdown notice: {}", speak_err);
                }
                Err(e)
            }
        }
    }

    async fn run_loop(&mut self, interrupted: &AtomicBool) -> Result<()> {
        let greeting = format!(
            "Voice assistant initialized. Say '{}' to activate me.",
            self.session.wake_word()
        );
        self.processor.speak(&greeting).await?;

        while !interrupted.load(Ordering::SeqCst) {
            self.tick().await?;
            tokio::time::sleep(TICK_PAUSE).await;
        }
        Ok(())
    }

    /// One loop iteration, without the trailing pause
    pub async fn tick(&mut self) -> Result<()> {
        // Evaluated every iteration in either state, so an active session
        // that keeps hearing nothing still expires.
        if self.session.check_timeout(session::now()) {
            self.processor.speak(TIMEOUT_NOTICE).await?;
        }

        if !self.session.is_active() && self.poll_wake_word().await {
            self.session.activate(session::now());
        }

        if self.session.is_active() {
            self.processor.speak(COMMAND_PROMPT).await?;
            if let Some(command) = self.processor.hear_command().await? {
                self.processor.process(&mut self.session, &command).await?;
            }
        }

        Ok(())
    }

    async fn poll_wake_word(&mut self) -> bool {
        debug!("Listening for wake word...");

        let text = match self.processor.listen(ListenWindow::WAKE_WORD).await {
            Ok(text) => text,
            Err(ListenError::ServiceUnavailable(reason)) => {
                if !self.service_warned {
                    warn!("⚠️ Speech recognition service unavailable: {}", reason);
                    self.service_warned = true;
                }
                return false;
            }
            Err(e) => {
                self.service_warned = false;
                debug!("No wake word: {}", e);
                return false;
            }
        };

        self.service_warned = false;
        debug!("Heard: {}", text);

        if self.session.detects_wake_word(&text) {
            info!("👂 Wake word detected!");
            true
        } else {
            false
        }
    }
}
