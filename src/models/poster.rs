use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

/// Shown when no artwork could be resolved for a title
pub const PLACEHOLDER_POSTER_URL: &str = "https://via.placeholder.com/300x450?text=No+Image";

/// Inert detail link paired with the placeholder poster
pub const PLACEHOLDER_DETAIL_LINK: &str = "#";

/// Poster artwork and detail page for one title
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PosterInfo {
    pub poster_url: String,
    pub detail_link: String,
}

impl PosterInfo {
    pub fn new(poster_url: impl Into<String>, detail_link: impl Into<String>) -> Self {
        Self {
            poster_url: poster_url.into(),
            detail_link: detail_link.into(),
        }
    }

    pub fn placeholder() -> Self {
        Self::new(PLACEHOLDER_POSTER_URL, PLACEHOLDER_DETAIL_LINK)
    }

    pub fn is_placeholder(&self) -> bool {
        self.poster_url == PLACEHOLDER_POSTER_URL && self.detail_link == PLACEHOLDER_DETAIL_LINK
    }
}

impl Default for PosterInfo {
    fn default() -> Self {
        Self::placeholder()
    }
}

/// Poster lookups keyed by exact, case-sensitive title
///
/// Entries are written once and never refreshed, so a title present here is
/// never looked up again.
#[derive(Debug, Clone, Default)]
pub struct PosterCache {
    entries: HashMap<String, PosterInfo>,
}

impl PosterCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, title: &str) -> Option<&PosterInfo> {
        self.entries.get(title)
    }

    pub fn contains(&self, title: &str) -> bool {
        self.entries.contains_key(title)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cached entry for `title`, or the placeholder if none exists yet
    pub fn poster_or_default(&self, title: &str) -> PosterInfo {
        self.get(title).cloned().unwrap_or_default()
    }

    /// Titles not yet cached, deduplicated, in first-seen order
    pub fn uncached<'a, I>(&self, titles: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a String>,
    {
        let mut seen = HashSet::new();
        titles
            .into_iter()
            .filter(|title| !self.contains(title))
            .filter(|title| seen.insert(*title))
            .cloned()
            .collect()
    }

    /// Inserts entries for titles not already present; returns how many were added
    pub fn merge(&mut self, delta: &HashMap<String, PosterInfo>) -> usize {
        let mut inserted = 0;
        for (title, info) in delta {
            if !self.entries.contains_key(title) {
                self.entries.insert(title.clone(), info.clone());
                inserted += 1;
            }
        }
        inserted
    }
}
