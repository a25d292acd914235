//! Response Catalog
//!
//! Canned replies grouped by category, loaded from `assistant_responses.json`
//! with built-in defaults. Every category always holds at least one entry.

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, warn};

/// Responses file name
pub const RESPONSES_FILE: &str = "assistant_responses.json";

/// Category of canned response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Greeting,
    Joke,
    Quote,
    Preference,
    Unknown,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Greeting,
        Category::Joke,
        Category::Quote,
        Category::Preference,
        Category::Unknown,
    ];

    /// Key used in the responses file
    pub fn key(self) -> &'static str {
        match self {
            Category::Greeting => "greetings",
            Category::Joke => "jokes",
            Category::Quote => "quotes",
            Category::Preference => "preferences",
            Category::Unknown => "unknown_command",
        }
    }

    fn defaults(self) -> &'static [&'static str] {
        match self {
            Category::Greeting => &[
                "I'm doing well, thank you!",
                "I'm just a program, but thanks for asking!",
                "Doing great! How about you?",
            ],
            Category::Joke => &[
                "Why do programmers prefer dark mode? Because light attracts bugs!",
                "I told my computer I needed a break, and now it won't stop sending me vacation ads.",
                "What's a computer's favorite snack? Microchips!",
                "How many programmers does it take to change a light bulb? None, that's a hardware problem.",
                "Why was the JavaScript developer sad? Because he didn't know how to Object.create(happiness);",
            ],
            Category::Quote => &[
                "The greatest glory in living lies not in never falling, but in rising every time we fall.",
                "The way to get started is to quit talking and begin doing.",
                "Your time is limited, so don't waste it living someone else's life.",
                "If life were predictable it would cease to be life, and be without flavor.",
                "Spread love everywhere you go. Let no one ever come to you without leaving happier.",
                "When you reach the end of your rope, tie a knot in it and hang on.",
            ],
            Category::Preference => &[
                "I enjoy helping you with your questions.",
                "I love learning new things from you.",
                "I like to keep you entertained!",
            ],
            Category::Unknown => &[
                "I'm sorry, I can't perform that command.",
                "I don't understand that instruction.",
                "That's beyond my capabilities right now.",
            ],
        }
    }
}

/// Immutable mapping from category to candidate replies
#[derive(Debug, Clone)]
pub struct ResponseCatalog {
    entries: HashMap<Category, Vec<String>>,
}

impl Default for ResponseCatalog {
    fn default() -> Self {
        let entries = Category::ALL
            .iter()
            .map(|&c| (c, c.defaults().iter().map(|s| s.to_string()).collect()))
            .collect();
        Self { entries }
    }
}

impl ResponseCatalog {
    /// Load the catalog from the first responses file found, or use defaults
    pub fn load() -> Self {
        match crate::config::locate(RESPONSES_FILE) {
            Some(path) => Self::load_from(&path),
            None => {
                debug!("No {} found, using built-in responses", RESPONSES_FILE);
                Self::default()
            }
        }
    }

    /// Load the catalog from a file, falling back to defaults on any failure
    pub fn load_from(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                debug!("Could not read {}: {}", path.display(), e);
                return Self::default();
            }
        };

        match Self::from_json(&content) {
            Ok(catalog) => {
                info!("💬 Loaded responses from {}", path.display());
                catalog
            }
            Err(e) => {
                warn!("⚠️ Responses file invalid, using defaults: {}", e);
                Self::default()
            }
        }
    }

    /// Parse a responses document. Missing or empty categories keep their defaults.
    pub fn from_json(content: &str) -> serde_json::Result<Self> {
        let mut raw: HashMap<String, Vec<String>> = serde_json::from_str(content)?;
        let mut catalog = Self::default();

        for category in Category::ALL {
            match raw.remove(category.key()) {
                Some(list) if !list.is_empty() => {
                    catalog.entries.insert(category, list);
                }
                Some(_) => debug!("Empty '{}' list, keeping defaults", category.key()),
                None => {}
            }
        }

        Ok(catalog)
    }

    /// All candidates for a category
    pub fn entries(&self, category: Category) -> &[String] {
        self.entries
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Uniformly random pick from a category
    pub fn pick<R: Rng + ?Sized>(&self, category: Category, rng: &mut R) -> &str {
        self.entries(category)
            .choose(rng)
            .map(String::as_str)
            .unwrap_or_else(|| category.defaults()[0])
    }
}
