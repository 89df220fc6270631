use serde::Deserialize;
use std::sync::Arc;

use crate::error::{Error, Result};

/// Suggestions are trusted only with more entries than this.
const MIN_SUGGESTED_TRENDS: usize = 2;
const MAX_TREND_CHARS: usize = 20;

/// Body of `GET /venue/{id}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VenueResponse {
    pub urls: Vec<String>,
    pub title: String,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub appropriate_trends: Vec<String>,
    #[serde(default)]
    pub backup_trends: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Venue {
    pub id: String,
    pub title: String,
    pub image_urls: Vec<String>,
    pub tags: Vec<String>,
    pub trends: Vec<String>,
}

impl Venue {
    pub fn from_response(id: &str, resp: VenueResponse, fallback_trends: &[String]) -> Self {
        let backup = if resp.backup_trends.is_empty() {
            fallback_trends.to_vec()
        } else {
            resp.backup_trends
        };
        Self {
            id: id.to_string(),
            title: resp.title,
            image_urls: resp.urls,
            tags: resp.tags.unwrap_or_default(),
            trends: select_trends(resp.appropriate_trends, backup),
        }
    }
}

/// Strip the venue page prefix. Input without the prefix is taken verbatim as
/// the id.
pub fn extract_venue_id<'a>(url: &'a str, prefix: &str) -> &'a str {
    url.strip_prefix(prefix).unwrap_or(url)
}

pub fn parse_venue_id(url: &str, prefix: &str) -> Result<String> {
    let id = extract_venue_id(url, prefix);
    if id.is_empty() {
        return Err(Error::validation("venue URL is empty"));
    }
    Ok(id.to_string())
}

pub fn select_trends(appropriate: Vec<String>, backup: Vec<String>) -> Vec<String> {
    let usable = appropriate.len() > MIN_SUGGESTED_TRENDS
        && appropriate
            .iter()
            .all(|t| t.chars().count() <= MAX_TREND_CHARS);
    if usable {
        appropriate
    } else {
        backup
    }
}

/// Holds the venue for the current session. Readers get a shared immutable
/// snapshot; the only writes are a wholesale replace or a clear.
#[derive(Debug, Default)]
pub struct VenueContext {
    current: Option<Arc<Venue>>,
}

impl VenueContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&mut self, venue: Venue) -> Arc<Venue> {
        let venue = Arc::new(venue);
        self.current = Some(Arc::clone(&venue));
        venue
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn snapshot(&self) -> Option<Arc<Venue>> {
        self.current.clone()
    }

    pub fn get(&self) -> Option<&Venue> {
        self.current.as_deref()
    }
}
