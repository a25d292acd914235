//! Encyclopedia summary lookup
//!
//! Resolves a spoken topic to a Wikipedia article and returns the first few
//! sentences of its summary.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

const LOOKUP_TIMEOUT_SECS: u64 = 10;

/// Outcome of a failed lookup; each maps to its own spoken message
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("topic is ambiguous")]
    Ambiguous,

    #[error("no page with that title")]
    NotFound,

    #[error("lookup failed: {0}")]
    Failed(String),
}

impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        LookupError::Failed(err.to_string())
    }
}

/// Trait for summary lookup services
#[async_trait]
pub trait SummaryLookup: Send + Sync {
    /// Summary of `topic`, at most `sentences` sentences long
    async fn summarize(&self, topic: &str, sentences: usize) -> Result<String, LookupError>;
}

/// REST page summary
#[derive(Debug, Deserialize)]
struct PageSummary {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    extract: String,
}

/// Wikipedia client using the MediaWiki search and REST summary APIs
#[derive(Clone)]
pub struct WikipediaClient {
    client: reqwest::Client,
    base_url: String,
}

impl WikipediaClient {
    /// Client for `https://<language>.wikipedia.org`
    pub fn new(language: &str) -> Self {
        Self::with_base_url(&format!("https://{}.wikipedia.org", language))
    }

    /// Client against an arbitrary MediaWiki host
    pub fn with_base_url(base_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(concat!("hearken/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(LOOKUP_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|e| {
                warn!(
                    "⚠️ Could not configure HTTP client ({}), using defaults without timeout",
                    e
                );
                reqwest::Client::new()
            });

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Best matching article title for a free-form topic
    async fn resolve_title(&self, topic: &str) -> Result<String, LookupError> {
        let response = self
            .client
            .get(format!("{}/w/api.php", self.base_url))
            .query(&[
                ("action", "opensearch"),
                ("search", topic),
                ("limit", "1"),
                ("namespace", "0"),
                ("format", "json"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(LookupError::Failed(format!(
                "search returned {}",
                response.status()
            )));
        }

        let body: serde_json::Value = response.json().await?;
        first_search_title(&body).ok_or(LookupError::NotFound)
    }

    async fn fetch_summary(&self, title: &str) -> Result<PageSummary, LookupError> {
        let url = format!(
            "{}/api/rest_v1/page/summary/{}",
            self.base_url,
            urlencoding::encode(&title.replace(' ', "_"))
        );
        let response = self.client.get(url).send().await?;

        match response.status() {
            status if status == reqwest::StatusCode::NOT_FOUND => Err(LookupError::NotFound),
            status if status.is_success() => Ok(response.json().await?),
            status => Err(LookupError::Failed(format!("summary returned {}", status))),
        }
    }
}

#[async_trait]
impl SummaryLookup for WikipediaClient {
    async fn summarize(&self, topic: &str, sentences: usize) -> Result<String, LookupError> {
        let title = self.resolve_title(topic).await?;
        debug!("Resolved '{}' to article '{}'", topic, title);

        let summary = self.fetch_summary(&title).await?;
        if summary.kind == "disambiguation" {
            info!("📚 '{}' is a disambiguation page", title);
            return Err(LookupError::Ambiguous);
        }

        let text = first_sentences(&summary.extract, sentences);
        if text.is_empty() {
            warn!("Empty summary for '{}'", title);
            return Err(LookupError::NotFound);
        }
        Ok(text)
    }
}

/// Title of the first hit in an opensearch response: `[query, [titles], ...]`
fn first_search_title(body: &serde_json::Value) -> Option<String> {
    body.get(1)?
        .as_array()?
        .first()?
        .as_str()
        .map(str::to_string)
}

/// First `count` sentences of `text`
pub fn first_sentences(text: &str, count: usize) -> String {
    let text = text.trim();
    let mut ends = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        if matches!(c, '.' | '!' | '?') {
            let at_boundary = chars.peek().map_or(true, |(_, next)| next.is_whitespace());
            if at_boundary {
                ends += 1;
                if ends == count {
                    return text[..idx + c.len_utf8()].to_string();
                }
            }
        }
    }

    text.to_string()
}
