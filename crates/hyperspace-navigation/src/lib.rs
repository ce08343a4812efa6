//! HYP3RSP4C3 Navigation
//!
//! Address bar input resolution, in priority order:
//! 1. Known site alias → shortcut URL
//! 2. Spaces or no recognized TLD → search query
//! 3. Domain-like text → `https://` prefixed URL (search if it fails to parse)
//!
//! The history stack is plain browser back/forward bookkeeping: a new
//! navigation destroys forward history.

mod error;
mod history;
mod input;
mod internal;
mod shortcut;

pub use error::NavigationError;
pub use history::History;
pub use input::{InputKind, UrlClassifier};
pub use internal::{InternalPage, META_SEARCH_ADDRESS};
pub use shortcut::ShortcutTable;

pub type Result<T> = std::result::Result<T, NavigationError>;
