//! Internal page addresses
//!
//! Pages the browser synthesizes itself live under the `hyperspace:` scheme so
//! they can sit in the history stack next to real URLs.

/// Embedded meta-search interface; never routed through a proxy
pub const META_SEARCH_ADDRESS: &str = "hyperspace:meta-search";

const SEARCH_PREFIX: &str = "hyperspace:search?q=";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalPage {
    MetaSearch,
    Search(String),
}

impl InternalPage {
    pub fn parse(address: &str) -> Option<Self> {
        if address == META_SEARCH_ADDRESS {
            return Some(Self::MetaSearch);
        }

        let encoded = address.strip_prefix(SEARCH_PREFIX)?;
        let query = urlencoding::decode(encoded).ok()?;
        Some(Self::Search(query.into_owned()))
    }

    pub fn address(&self) -> String {
        match self {
            Self::MetaSearch => META_SEARCH_ADDRESS.to_string(),
            Self::Search(query) => format!("{}{}", SEARCH_PREFIX, urlencoding::encode(query)),
        }
    }
}
