//! Command Processor
//!
//! Routes a transcribed command to its handler. Owns the collaborators the
//! handlers talk to (speech in and out, lookup, browser, command log) but
//! never the session, which is passed in by the caller.

use crate::asr::{ListenError, ListenWindow, SpeechInput};
use crate::browser::{self, Browser};
use crate::command_log::CommandLog;
use crate::commands::Intent;
use crate::config::Config;
use crate::knowledge::{LookupError, SummaryLookup};
use crate::responses::{Category, ResponseCatalog};
use crate::session::{self, Session};
use crate::tts::TtsEngine;
use anyhow::Result;
use chrono::{NaiveDate, NaiveTime};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const IDENTITY: &str = "I am your voice assistant, activated by saying the wake word.";
pub const FAREWELL: &str = "Goodbye!";
pub const SLEEP_ACK: &str = "Going to sleep. Say the wake word to activate me again.";
pub const NO_COMMAND: &str = "I didn't hear a command.";
pub const NOT_UNDERSTOOD: &str = "Sorry, I could not understand that.";
pub const SERVICE_ERROR: &str = "Sorry, there was an error with the speech recognition service.";

/// External services used by command handlers
pub struct Collaborators {
    pub input: Box<dyn SpeechInput>,
    pub output: Arc<dyn TtsEngine>,
    pub lookup: Box<dyn SummaryLookup>,
    pub browser: Box<dyn Browser>,
    pub log: Box<dyn CommandLog>,
}

pub struct Processor {
    config: Config,
    responses: ResponseCatalog,
    io: Collaborators,
    rng: StdRng,
}

impl Processor {
    pub fn new(config: Config, responses: ResponseCatalog, io: Collaborators) -> Self {
        Self {
            config,
            responses,
            io,
            rng: StdRng::from_entropy(),
        }
    }

    /// Use a fixed random source for response selection
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Speak and wait until done
    pub async fn speak(&self, text: &str) -> Result<()> {
        info!("🗣️ {}", text);
        self.io.output.speak(text).await
    }

    /// One raw listen attempt
    pub async fn listen(&mut self, window: ListenWindow) -> Result<String, ListenError> {
        self.io.input.listen(window).await
    }

    /// Listen for a command, explaining any failure out loud.
    ///
    /// `Ok(None)` means no usable input.
    pub async fn hear_command(&mut self) -> Result<Option<String>> {
        match self.listen(ListenWindow::COMMAND).await {
            Ok(text) => {
                info!("📝 Command: '{}'", text);
                Ok(Some(text))
            }
            Err(ListenError::NoSpeech) => {
                self.speak(NO_COMMAND).await?;
                Ok(None)
            }
            Err(ListenError::Unintelligible) => {
                self.speak(NOT_UNDERSTOOD).await?;
                Ok(None)
            }
            Err(ListenError::ServiceUnavailable(reason)) => {
                warn!("⚠️ Speech recognition service unavailable: {}", reason);
                self.speak(SERVICE_ERROR).await?;
                Ok(None)
            }
        }
    }

    /// Ask a follow-up question and listen for the answer
    async fn prompt(&mut self, question: &str) -> Result<Option<String>> {
        self.speak(question).await?;
        self.hear_command().await
    }

    /// Dispatch one command. Always restarts the inactivity window and logs
    /// the utterance (if enabled) before handling it.
    pub async fn process(&mut self, session: &mut Session, utterance: &str) -> Result<Intent> {
        session.touch(session::now());

        if self.config.log_commands {
            if let Err(e) = self.io.log.record(utterance) {
                debug!("Command log write failed: {}", e);
            }
        }

        let intent = Intent::classify(utterance);
        info!("🎯 Intent: {:?}", intent);

        match intent {
            Intent::Exit => {
                self.speak(FAREWELL).await?;
                session.deactivate();
            }
            Intent::Sleep => {
                self.speak(SLEEP_ACK).await?;
                session.deactivate();
            }
            Intent::Wikipedia => self.handle_wikipedia().await?,
            Intent::Time => {
                let reply = time_reply(chrono::Local::now().time());
                self.speak(&reply).await?;
            }
            Intent::Date => {
                let reply = date_reply(chrono::Local::now().date_naive());
                self.speak(&reply).await?;
            }
            Intent::HowAreYou => self.speak_random(Category::Greeting).await?,
            Intent::Identity => self.speak(IDENTITY).await?,
            Intent::Search => self.handle_search().await?,
            Intent::Joke => self.speak_random(Category::Joke).await?,
            Intent::Quote => self.speak_random(Category::Quote).await?,
            Intent::Hobbies => self.speak_random(Category::Preference).await?,
            Intent::ChangeWakeWord => self.handle_change_wake_word(session).await?,
            Intent::Unknown => self.speak_random(Category::Unknown).await?,
        }

        Ok(intent)
    }

    async fn speak_random(&mut self, category: Category) -> Result<()> {
        let reply = self.responses.pick(category, &mut self.rng).to_string();
        self.speak(&reply).await
    }

    async fn handle_wikipedia(&mut self) -> Result<()> {
        let Some(topic) = self
            .prompt("What would you like to search on Wikipedia?")
            .await?
        else {
            return Ok(());
        };

        let sentences = self.config.max_wikipedia_sentences;
        let reply = match self.io.lookup.summarize(&topic, sentences).await {
            Ok(summary) => summary,
            Err(LookupError::Ambiguous) => {
                "The topic is ambiguous, please be more specific.".to_string()
            }
            Err(LookupError::NotFound) => {
                "Unfortunately, there is no page with that title.".to_string()
            }
            Err(LookupError::Failed(e)) => {
                warn!("⚠️ Wikipedia lookup failed: {}", e);
                "Sorry, something went wrong with the Wikipedia search.".to_string()
            }
        };
        self.speak(&reply).await
    }

    async fn handle_search(&mut self) -> Result<()> {
        let Some(query) = self
            .prompt("What do you want to search for on Google?")
            .await?
        else {
            return Ok(());
        };

        self.speak(&format!("Searching for {} on Google.", query))
            .await?;
        if let Err(e) = self.io.browser.open(&browser::search_url(&query)) {
            warn!("⚠️ Could not open browser: {}", e);
        }
        self.speak("Here are the search results.").await
    }

    async fn handle_change_wake_word(&mut self, session: &mut Session) -> Result<()> {
        let Some(wake_word) = self
            .prompt("What would you like to set as the new wake word?")
            .await?
        else {
            return Ok(());
        };

        if session.set_wake_word(&wake_word) {
            self.speak(&format!("Wake word changed to {}", wake_word))
                .await?;
        }
        Ok(())
    }
}

/// Spoken reply for the time intent (24-hour, zero padded)
pub fn time_reply(time: NaiveTime) -> String {
    format!("The current time is {}.", time.format("%H:%M"))
}

/// Spoken reply for the date intent
pub fn date_reply(date: NaiveDate) -> String {
    format!("Today's date is {}.", date.format("%Y-%m-%d"))
}
