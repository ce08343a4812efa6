//! Display surface the browser renders into

use hyperspace_render::DisplayableDocument;
use parking_lot::RwLock;

/// Host-side content viewport. Only the active load writes to it.
///
/// Calls are made without any browser state lock held, so implementations
/// may query the `Browser` (or call `home`) from inside them.
pub trait DisplaySurface: Send + Sync {
    /// Point the viewport at a navigable address
    fn show_address(&self, url: &str);

    /// Show an inline document payload
    fn show_document(&self, doc: &DisplayableDocument);

    /// Show the idle home screen
    fn show_home(&self);
}

#[derive(Debug, Clone)]
pub enum Frame {
    Home,
    Address(String),
    Document(DisplayableDocument),
}

impl Frame {
    /// The URL this frame shows, if any
    pub fn source(&self) -> Option<&str> {
        match self {
            Frame::Home => None,
            Frame::Address(url) => Some(url),
            Frame::Document(doc) => Some(&doc.source_url),
        }
    }
}

/// Headless surface recording every frame it was asked to show
#[derive(Debug, Default)]
pub struct MemorySurface {
    frames: RwLock<Vec<Frame>>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Frame {
        self.frames.read().last().cloned().unwrap_or(Frame::Home)
    }

    pub fn frames(&self) -> Vec<Frame> {
        self.frames.read().clone()
    }
}

impl DisplaySurface for MemorySurface {
    fn show_address(&self, url: &str) {
        self.frames.write().push(Frame::Address(url.to_string()));
    }

    fn show_document(&self, doc: &DisplayableDocument) {
        self.frames.write().push(Frame::Document(doc.clone()));
    }

    fn show_home(&self) {
        self.frames.write().push(Frame::Home);
    }
}
