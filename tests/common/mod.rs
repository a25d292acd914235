#![allow(dead_code)]

pub mod mock_asr;
pub mod mock_tts;

use anyhow::Result;
use async_trait::async_trait;
use hearken::asr::{ListenError, ListenWindow};
use hearken::browser::Browser;
use hearken::command_log::CommandLog;
use hearken::config::Config;
use hearken::knowledge::{LookupError, SummaryLookup};
use hearken::processor::{Collaborators, Processor};
use hearken::responses::ResponseCatalog;
use mock_asr::MockAsr;
use mock_tts::MockTts;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::{Arc, Mutex};

/// Records logged commands; can be told to fail
#[derive(Clone, Default)]
pub struct MockLog {
    pub entries: Arc<Mutex<Vec<String>>>,
    pub fail: bool,
}

impl CommandLog for MockLog {
    fn record(&mut self, utterance: &str) -> Result<()> {
        if self.fail {
            return Err(anyhow::anyhow!("disk full"));
        }
        self.entries.lock().unwrap().push(utterance.to_string());
        Ok(())
    }
}

/// Returns a fixed lookup outcome and records queried topics
#[derive(Clone)]
pub struct MockLookup {
    pub result: Result<String, LookupError>,
    pub queries: Arc<Mutex<Vec<(String, usize)>>>,
}

impl MockLookup {
    pub fn new(result: Result<String, LookupError>) -> Self {
        Self {
            result,
            queries: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl SummaryLookup for MockLookup {
    async fn summarize(&self, topic: &str, sentences: usize) -> Result<String, LookupError> {
        self.queries
            .lock()
            .unwrap()
            .push((topic.to_string(), sentences));
        self.result.clone()
    }
}

/// Records opened URLs
#[derive(Clone, Default)]
pub struct MockBrowser {
    pub opened: Arc<Mutex<Vec<String>>>,
}

impl Browser for MockBrowser {
    fn open(&self, url: &str) -> Result<()> {
        self.opened.lock().unwrap().push(url.to_string());
        Ok(())
    }
}

/// A processor wired to mocks, with handles to inspect them
pub struct Harness {
    pub tts: MockTts,
    pub log: MockLog,
    pub lookup: MockLookup,
    pub browser: MockBrowser,
    pub heard: Arc<Mutex<std::collections::VecDeque<Result<String, ListenError>>>>,
    pub windows: Arc<Mutex<Vec<ListenWindow>>>,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            tts: MockTts::new(),
            log: MockLog::default(),
            lookup: MockLookup::new(Ok("Rust is a programming language.".to_string())),
            browser: MockBrowser::default(),
            heard: Arc::new(Mutex::new(Default::default())),
            windows: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue phrases the input will hear next
    pub fn hear(&self, phrases: &[&str]) {
        let mut queue = self.heard.lock().unwrap();
        for phrase in phrases {
            queue.push_back(Ok(phrase.to_string()));
        }
    }

    /// Queue a failed listen
    pub fn hear_error(&self, error: ListenError) {
        self.heard.lock().unwrap().push_back(Err(error));
    }

    /// Listen windows requested so far, in order
    pub fn windows(&self) -> Vec<ListenWindow> {
        self.windows.lock().unwrap().clone()
    }

    pub fn processor(&self, config: Config) -> Processor {
        let mut input = MockAsr::new(Vec::new());
        input.responses = Arc::clone(&self.heard);
        input.windows = Arc::clone(&self.windows);

        let io = Collaborators {
            input: Box::new(input),
            output: Arc::new(self.tts.clone()),
            lookup: Box::new(self.lookup.clone()),
            browser: Box::new(self.browser.clone()),
            log: Box::new(self.log.clone()),
        };
        Processor::new(config, ResponseCatalog::default(), io).with_rng(StdRng::seed_from_u64(42))
    }
}
