//! Scripted speech input for testing
//!
//! Replays a queue of listen outcomes; an empty queue behaves like silence.

use async_trait::async_trait;
use hearken::asr::{ListenError, ListenWindow, SpeechInput};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

pub struct MockAsr {
    /// Queue of results to return
    pub responses: Arc<Mutex<VecDeque<Result<String, ListenError>>>>,
    /// Windows requested, in order
    pub windows: Arc<Mutex<Vec<ListenWindow>>>,
}

impl MockAsr {
    pub fn new(responses: Vec<Result<String, ListenError>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses.into())),
            windows: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Mock that hears the given phrases, in order
    pub fn with_phrases(phrases: &[&str]) -> Self {
        Self::new(phrases.iter().map(|p| Ok(p.to_string())).collect())
    }

    /// Handle for queueing more results after the mock was moved
    pub fn queue(&self) -> Arc<Mutex<VecDeque<Result<String, ListenError>>>> {
        Arc::clone(&self.responses)
    }
}

#[async_trait]
impl SpeechInput for MockAsr {
    async fn listen(&mut self, window: ListenWindow) -> Result<String, ListenError> {
        self.windows.lock().unwrap().push(window);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(ListenError::NoSpeech))
    }

    fn name(&self) -> &str {
        "mock"
    }
}
