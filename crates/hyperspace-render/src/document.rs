//! Displayable document

use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// Fetched through a proxy and rewritten for standalone viewing
    Proxied,
    /// Raw-content preview for suspiciously short responses
    Preview,
    /// Manual access options after every proxy failed
    Alternatives,
    /// Local search portal for a free-text query
    Search,
    /// Embedded meta-search interface
    MetaSearch,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Proxied => "proxied",
            DocumentKind::Preview => "preview",
            DocumentKind::Alternatives => "alternatives",
            DocumentKind::Search => "search",
            DocumentKind::MetaSearch => "meta_search",
        }
    }

    /// True for pages generated locally rather than fetched
    pub fn is_synthesized(&self) -> bool {
        !matches!(self, DocumentKind::Proxied)
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An inline HTML payload ready for the display surface
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayableDocument {
    pub html: String,
    /// Address the content belongs to (target URL or internal address)
    pub source_url: String,
    pub title: Option<String>,
    pub kind: DocumentKind,
}

impl DisplayableDocument {
    pub fn new(html: String, source_url: impl Into<String>, kind: DocumentKind) -> Self {
        let title = extract_title(&html);
        Self {
            html,
            source_url: source_url.into(),
            title,
            kind,
        }
    }
}

fn extract_title(html: &str) -> Option<String> {
    let doc = Html::parse_document(html);

    if let Ok(sel) = Selector::parse("title") {
        for el in doc.select(&sel) {
            let text = el.text().collect::<Vec<_>>().join(" ");
            let cleaned = normalize_whitespace(&text);
            if !cleaned.is_empty() {
                return Some(cleaned);
            }
        }
    }

    if let Ok(sel) = Selector::parse("meta[property='og:title']") {
        for el in doc.select(&sel) {
            if let Some(content) = el.value().attr("content") {
                let cleaned = normalize_whitespace(content);
                if !cleaned.is_empty() {
                    return Some(cleaned);
                }
            }
        }
    }

    None
}

fn normalize_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}
