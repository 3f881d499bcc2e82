use serde::{Deserialize, Serialize};

/// One page of catalog titles as received from the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogPage {
    pub titles: Vec<String>,
    pub has_more: bool,
    /// Offset the following page request will use
    pub next_offset: u32,
}

/// Titles loaded so far in this session, plus the pagination cursor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogState {
    all_titles: Vec<String>,
    cursor: u32,
    exhausted: bool,
}

impl CatalogState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every loaded title in arrival order, duplicates included
    pub fn titles(&self) -> &[String] {
        &self.all_titles
    }

    pub fn cursor(&self) -> u32 {
        self.cursor
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn len(&self) -> usize {
        self.all_titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all_titles.is_empty()
    }

    /// The first `limit` titles, or all of them if fewer are loaded
    pub fn prefix(&self, limit: usize) -> &[String] {
        &self.all_titles[..limit.min(self.all_titles.len())]
    }

    /// Appends a successfully fetched page and moves the cursor to its next offset
    pub fn apply_page(&mut self, page: &CatalogPage) {
        self.all_titles.extend(page.titles.iter().cloned());
        self.exhausted = !page.has_more;
        self.cursor = page.next_offset;
    }
}
