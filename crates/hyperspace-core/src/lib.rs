//! HYP3RSP4C3 Core
//!
//! Controller layer tying input classification, history, the proxy fallback
//! engine and the display surface together. Rust owns all state; the host
//! surface is told what to show.

mod browser;
mod config;
mod display;
mod error;
mod log;

pub use browser::Browser;
pub use config::BrowserConfig;
pub use display::{DisplaySurface, Frame, MemorySurface};
pub use error::CoreError;
pub use log::{LogEntry, TerminalLog};

// Re-export core components
pub use hyperspace_navigation::{
    History, InputKind, InternalPage, NavigationError, ShortcutTable, UrlClassifier,
    META_SEARCH_ADDRESS,
};
pub use hyperspace_proxy::{
    default_chain, AttemptError, DeliveryMode, HttpTransport, LoadEvent, LoadEventKind,
    PriorityTier, ProxyDescriptor, ProxyError, Transport,
};
pub use hyperspace_render::{DisplayableDocument, DocumentKind, RenderOptions};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
