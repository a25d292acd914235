//! Session State Machine
//!
//! Tracks whether the assistant is idle (waiting for the wake word) or
//! active (accepting commands), and when it was last used.
//!
//! ```text
//! IDLE --wake word--> ACTIVE --command--> ACTIVE
//!   ^                   |
//!   +--sleep / exit-----+
//!   +--timeout----------+
//! ```

use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Default wake phrase
pub const DEFAULT_WAKE_WORD: &str = "hey assistant";

/// Default inactivity timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Current time on the runtime clock (pausable under tokio's test clock)
pub fn now() -> Instant {
    tokio::time::Instant::now().into_std()
}

/// Activation state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Active,
}

/// Wake word, activation state and inactivity bookkeeping
#[derive(Debug, Clone)]
pub struct Session {
    wake_word: String,
    state: SessionState,
    last_activation: Option<Instant>,
    timeout: Duration,
}

impl Session {
    pub fn new(wake_word: &str, timeout_secs: u64) -> Self {
        Self {
            wake_word: wake_word.to_lowercase(),
            state: SessionState::Idle,
            last_activation: None,
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    pub fn wake_word(&self) -> &str {
        &self.wake_word
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == SessionState::Active
    }

    pub fn last_activation(&self) -> Option<Instant> {
        self.last_activation
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Case-insensitive exact substring test for the wake word
    pub fn detects_wake_word(&self, utterance: &str) -> bool {
        !self.wake_word.is_empty() && utterance.to_lowercase().contains(&self.wake_word)
    }

    /// Replace the wake word. Blank input is ignored and returns `false`.
    pub fn set_wake_word(&mut self, wake_word: &str) -> bool {
        let wake_word = wake_word.trim().to_lowercase();
        if wake_word.is_empty() {
            return false;
        }
        info!("🔑 Wake word changed: '{}' -> '{}'", self.wake_word, wake_word);
        self.wake_word = wake_word;
        true
    }

    /// IDLE -> ACTIVE on wake word detection
    pub fn activate(&mut self, now: Instant) {
        if self.state == SessionState::Idle {
            info!("🟢 Session active");
        }
        self.state = SessionState::Active;
        self.last_activation = Some(now);
    }

    /// Any received command restarts the inactivity window
    pub fn touch(&mut self, now: Instant) {
        self.last_activation = Some(now);
    }

    /// ACTIVE -> IDLE on an explicit sleep or exit command
    pub fn deactivate(&mut self) {
        if self.state == SessionState::Active {
            info!("💤 Session idle");
        }
        self.state = SessionState::Idle;
    }

    /// ACTIVE -> IDLE when more than `timeout` has passed since the last activity.
    ///
    /// Returns `true` only on the tick that performs the transition.
    pub fn check_timeout(&mut self, now: Instant) -> bool {
        if self.state != SessionState::Active {
            return false;
        }

        let elapsed = self
            .last_activation
            .map(|at| now.saturating_duration_since(at))
            .unwrap_or_default();

        if elapsed > self.timeout {
            info!("⏱️ Session timed out after {:?}", elapsed);
            self.state = SessionState::Idle;
            true
        } else {
            debug!("Session idle for {:?} of {:?}", elapsed, self.timeout);
            false
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(DEFAULT_WAKE_WORD, DEFAULT_TIMEOUT_SECS)
    }
}
