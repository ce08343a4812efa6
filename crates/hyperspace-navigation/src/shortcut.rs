//! Site alias table for the address bar
//!
//! Exact, case-insensitive matches only. An alias hit always wins over the
//! search heuristic, so `github` never turns into a search for "github".

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use url::Url;

use crate::error::NavigationError;
use crate::internal::{InternalPage, META_SEARCH_ADDRESS};
use crate::Result;

const DEFAULT_SHORTCUTS: &[(&str, &str)] = &[
    ("youtube", "https://youtube.com"),
    ("google", "https://google.com"),
    ("facebook", "https://facebook.com"),
    ("twitter", "https://twitter.com"),
    ("instagram", "https://instagram.com"),
    ("reddit", "https://reddit.com"),
    ("github", "https://github.com"),
    ("stackoverflow", "https://stackoverflow.com"),
    ("wikipedia", "https://wikipedia.org"),
    ("amazon", "https://amazon.com"),
    ("netflix", "https://netflix.com"),
    ("twitch", "https://twitch.tv"),
    ("discord", "https://discord.com"),
    ("linkedin", "https://linkedin.com"),
    ("tiktok", "https://tiktok.com"),
    ("spotify", "https://spotify.com"),
    ("apple", "https://apple.com"),
    ("microsoft", "https://microsoft.com"),
    ("gmail", "https://gmail.com"),
    ("yahoo", "https://yahoo.com"),
    ("bing", "https://bing.com"),
    ("duckduckgo", META_SEARCH_ADDRESS),
    ("ddg", META_SEARCH_ADDRESS),
    ("search", META_SEARCH_ADDRESS),
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShortcutTable {
    /// Lowercased alias → canonical target
    entries: HashMap<String, String>,
}

impl ShortcutTable {
    /// An empty table; every input goes through the heuristics.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Look up an alias, ignoring case and surrounding whitespace
    pub fn resolve(&self, alias: &str) -> Option<&str> {
        self.entries
            .get(&alias.trim().to_lowercase())
            .map(String::as_str)
    }

    /// Add or replace an alias. The target must be an absolute URL or an
    /// internal page address.
    pub fn insert(&mut self, alias: &str, target: &str) -> Result<()> {
        let alias = alias.trim().to_lowercase();
        if alias.is_empty() {
            return Err(NavigationError::EmptyTarget);
        }

        if InternalPage::parse(target).is_none() && Url::parse(target).is_err() {
            return Err(NavigationError::InvalidUrl(target.to_string()));
        }

        self.entries.insert(alias, target.to_string());
        Ok(())
    }

    pub fn remove(&mut self, alias: &str) -> Option<String> {
        self.entries.remove(&alias.trim().to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ShortcutTable {
    fn default() -> Self {
        let entries = DEFAULT_SHORTCUTS
            .iter()
            .map(|(alias, target)| (alias.to_string(), target.to_string()))
            .collect();
        Self { entries }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_lookup_is_case_insensitive() {
        let table = ShortcutTable::default();
        assert_eq!(table.resolve("GitHub"), Some("https://github.com"));
        assert_eq!(table.resolve("  twitch "), Some("https://twitch.tv"));
        assert_eq!(table.resolve("ddg"), Some(META_SEARCH_ADDRESS));
        assert!(table.resolve("gitlab").is_none());
    }

    #[test]
    fn test_insert_validates_target() {
        let mut table = ShortcutTable::empty();
        assert!(table.insert("docs", "https://docs.rs").is_ok());
        assert_eq!(table.resolve("DOCS"), Some("https://docs.rs"));

        assert_eq!(
            table.insert("broken", "not a url"),
            Err(NavigationError::InvalidUrl("not a url".to_string()))
        );
        assert_eq!(table.insert("  ", "https://docs.rs"), Err(NavigationError::EmptyTarget));
        assert_eq!(table.len(), 1);
    }
}
