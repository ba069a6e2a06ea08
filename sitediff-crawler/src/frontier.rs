use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fs;
use std::path::Path;

/// BFS work queue over discovered URLs.
///
/// Every URL lives in at most one of the two sequences: `upcoming_urls`
/// (discovered, not yet visited, FIFO) or `finished_urls` (visited, in
/// visitation order). The serialized form doubles as the on-disk recovery
/// snapshot, so field names are fixed on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlFrontier {
    finished_urls: Vec<String>,
    upcoming_urls: VecDeque<String>,
}

impl UrlFrontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh frontier holding only the crawl entry point.
    pub fn seeded(base_url: &str) -> Self {
        let mut frontier = Self::new();
        frontier.add_url(base_url);
        frontier
    }

    /// Queue a URL unless it is already known, visited or not.
    pub fn add_url(&mut self, url: &str) {
        if self.contains(url) {
            return;
        }
        self.upcoming_urls.push_back(url.to_owned());
    }

    /// Peek the oldest pending URL. `None` means the crawl is done.
    pub fn next_url(&self) -> Option<&str> {
        self.upcoming_urls.front().map(String::as_str)
    }

    /// Move a URL from pending to visited.
    ///
    /// Unknown URLs are tolerated: the entry is dropped from pending if
    /// present, and appended to visited only if not already there, keeping
    /// the no-duplicates invariant either way.
    pub fn mark_visited(&mut self, url: &str) {
        if let Some(position) = self.upcoming_urls.iter().position(|known| known == url) {
            self.upcoming_urls.remove(position);
        }
        if !self.finished_urls.iter().any(|known| known == url) {
            self.finished_urls.push(url.to_owned());
        }
    }

    pub fn contains(&self, url: &str) -> bool {
        self.finished_urls.iter().any(|known| known == url)
            || self.upcoming_urls.iter().any(|known| known == url)
    }

    pub fn pending(&self) -> impl Iterator<Item = &str> {
        self.upcoming_urls.iter().map(String::as_str)
    }

    pub fn visited(&self) -> &[String] {
        &self.finished_urls
    }

    /// Reconstruct a frontier from a recovery snapshot written by [`save`].
    ///
    /// [`save`]: UrlFrontier::save
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Persist the frontier as a JSON recovery snapshot.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            crate::paths::create_dir(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}
