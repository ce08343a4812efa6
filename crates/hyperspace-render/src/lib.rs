//! HYP3RSP4C3 Content Rendering
//!
//! Turns fetched HTML into a document that can be shown detached from its
//! origin, and synthesizes the local pages shown when nothing can be fetched.

mod document;
mod pages;
mod renderer;
mod rewrite;

pub use document::{DisplayableDocument, DocumentKind};
pub use pages::{alternatives_page, content_preview_page, meta_search_page, search_page};
pub use renderer::{RenderOptions, Renderer};
