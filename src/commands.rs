//! Intent matching
//!
//! Maps a transcribed utterance to exactly one intent. Triggers are checked
//! top to bottom and the first contained phrase wins, so the table order
//! decides between overlapping phrases ("tell me a joke then exit" is an exit).

use tracing::debug;

/// Recognized command categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Exit,
    Sleep,
    Wikipedia,
    Time,
    Date,
    HowAreYou,
    Identity,
    Search,
    Joke,
    Quote,
    Hobbies,
    ChangeWakeWord,
    Unknown,
}

/// Priority-ordered (intent, trigger phrases) table
const INTENT_TABLE: &[(Intent, &[&str])] = &[
    (Intent::Exit, &["exit", "goodbye", "bye"]),
    (Intent::Sleep, &["sleep", "deactivate"]),
    (Intent::Wikipedia, &["wikipedia"]),
    (Intent::Time, &["time"]),
    (Intent::Date, &["date"]),
    (Intent::HowAreYou, &["how are you"]),
    (Intent::Identity, &["what is your name", "who are you"]),
    (Intent::Search, &["search"]),
    (Intent::Joke, &["tell me a joke", "joke"]),
    (Intent::Quote, &["give me a quote", "quote"]),
    (Intent::Hobbies, &["what do you like to do", "your hobbies"]),
    (Intent::ChangeWakeWord, &["change wake word"]),
];

impl Intent {
    /// Classify an utterance. Falls back to [`Intent::Unknown`].
    pub fn classify(utterance: &str) -> Self {
        let text = utterance.to_lowercase();

        INTENT_TABLE
            .iter()
            .find_map(|(intent, triggers)| {
                triggers.iter().find(|t| text.contains(*t)).map(|trigger| {
                    debug!("🎯 Matched {:?} (trigger: '{}')", intent, trigger);
                    *intent
                })
            })
            .unwrap_or_else(|| {
                debug!("No intent matched for: '{}'", text);
                Intent::Unknown
            })
    }

    /// Trigger phrases for an intent (empty for `Unknown`)
    pub fn triggers(self) -> &'static [&'static str] {
        INTENT_TABLE
            .iter()
            .find(|(intent, _)| *intent == self)
            .map(|(_, triggers)| *triggers)
            .unwrap_or_default()
    }
}
