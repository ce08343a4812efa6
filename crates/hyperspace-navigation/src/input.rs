//! Input classification for the address bar
//!
//! 1. Alias table hit → shortcut
//! 2. Spaces, or no recognized TLD, without an explicit scheme → search
//! 3. Otherwise prefix `https://` when missing and parse; failure → search

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::NavigationError;
use crate::internal::InternalPage;
use crate::shortcut::ShortcutTable;
use crate::Result;

/// TLD fragments that mark input as a hostname rather than free text
const KNOWN_TLDS: &[&str] = &[".com", ".org", ".net", ".io", ".co", ".gov", ".edu"];

/// Result of classifying address bar input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum InputKind {
    /// A URL typed (or completed) by the user
    DirectUrl(String),
    /// A known site alias resolved to its canonical URL
    Shortcut(String),
    /// Free text to search for
    SearchQuery(String),
}

impl InputKind {
    /// The address recorded in history and handed to the loader
    pub fn address(&self) -> String {
        match self {
            InputKind::DirectUrl(url) | InputKind::Shortcut(url) => url.clone(),
            InputKind::SearchQuery(text) => InternalPage::Search(text.clone()).address(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct UrlClassifier {
    shortcuts: ShortcutTable,
}

impl UrlClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_shortcuts(shortcuts: ShortcutTable) -> Self {
        Self { shortcuts }
    }

    pub fn shortcuts(&self) -> &ShortcutTable {
        &self.shortcuts
    }

    pub fn shortcuts_mut(&mut self) -> &mut ShortcutTable {
        &mut self.shortcuts
    }

    /// Classify raw address bar input
    pub fn classify(&self, input: &str) -> Result<InputKind> {
        let input = input.trim();

        if input.is_empty() {
            return Err(NavigationError::EmptyTarget);
        }

        if let Some(target) = self.shortcuts.resolve(input) {
            return Ok(InputKind::Shortcut(target.to_string()));
        }

        if Self::looks_like_search(input) {
            return Ok(InputKind::SearchQuery(input.to_string()));
        }

        let candidate = if Self::has_scheme(input) {
            input.to_string()
        } else if input.contains('.') && !input.contains(' ') {
            format!("https://{}", input)
        } else {
            return Ok(InputKind::SearchQuery(input.to_string()));
        };

        match Url::parse(&candidate) {
            Ok(_) => Ok(InputKind::DirectUrl(candidate)),
            Err(e) => {
                tracing::debug!(input = %input, error = %e, "Input failed URL parse, searching instead");
                Ok(InputKind::SearchQuery(input.to_string()))
            }
        }
    }

    fn looks_like_search(input: &str) -> bool {
        let has_spaces = input.contains(' ');
        let lower = input.to_lowercase();
        let has_tld = KNOWN_TLDS.iter().any(|tld| lower.contains(tld));

        (has_spaces || !has_tld) && !Self::has_scheme(input)
    }

    fn has_scheme(input: &str) -> bool {
        let lower = input.to_lowercase();
        lower.starts_with("http://") || lower.starts_with("https://")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::internal::META_SEARCH_ADDRESS;

    #[test]
    fn test_classify_shortcut() {
        let classifier = UrlClassifier::new();

        assert_eq!(
            classifier.classify("github").unwrap(),
            InputKind::Shortcut("https://github.com".to_string())
        );
        assert_eq!(
            classifier.classify("  YouTube ").unwrap(),
            InputKind::Shortcut("https://youtube.com".to_string())
        );
        assert_eq!(
            classifier.classify("ddg").unwrap(),
            InputKind::Shortcut(META_SEARCH_ADDRESS.to_string())
        );
    }

    #[test]
    fn test_classify_search() {
        let classifier = UrlClassifier::new();

        assert_eq!(
            classifier.classify("two words").unwrap(),
            InputKind::SearchQuery("two words".to_string())
        );
        // No recognized TLD
        assert_eq!(
            classifier.classify("notes.txt").unwrap(),
            InputKind::SearchQuery("notes.txt".to_string())
        );
        assert_eq!(
            classifier.classify("rustlang").unwrap(),
            InputKind::SearchQuery("rustlang".to_string())
        );
        // Has a TLD but also spaces
        assert_eq!(
            classifier.classify("what is example.com").unwrap(),
            InputKind::SearchQuery("what is example.com".to_string())
        );
    }

    #[test]
    fn test_classify_direct_url() {
        let classifier = UrlClassifier::new();

        assert_eq!(
            classifier.classify("example.com").unwrap(),
            InputKind::DirectUrl("https://example.com".to_string())
        );
        assert_eq!(
            classifier.classify("https://example.com/path?q=1").unwrap(),
            InputKind::DirectUrl("https://example.com/path?q=1".to_string())
        );
        // Explicit scheme skips the TLD heuristic
        assert_eq!(
            classifier.classify("http://localhost:8080").unwrap(),
            InputKind::DirectUrl("http://localhost:8080".to_string())
        );
    }

    #[test]
    fn test_unparseable_url_degrades_to_search() {
        let classifier = UrlClassifier::new();

        assert_eq!(
            classifier.classify("exa[mple.com").unwrap(),
            InputKind::SearchQuery("exa[mple.com".to_string())
        );
    }

    #[test]
    fn test_classify_empty() {
        let classifier = UrlClassifier::new();

        assert_eq!(classifier.classify(""), Err(NavigationError::EmptyTarget));
        assert_eq!(classifier.classify("   "), Err(NavigationError::EmptyTarget));
    }

    #[test]
    fn test_search_address() {
        let kind = InputKind::SearchQuery("two words".to_string());
        assert_eq!(kind.address(), "hyperspace:search?q=two%20words");

        let kind = InputKind::DirectUrl("https://example.com".to_string());
        assert_eq!(kind.address(), "https://example.com");
    }
}
