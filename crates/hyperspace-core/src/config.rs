//! Browser configuration
//!
//! Held in memory only. Hosts that want a file can deserialize it themselves.

use hyperspace_navigation::ShortcutTable;
use hyperspace_proxy::{default_chain, EngineOptions, ProxyDescriptor};
use hyperspace_render::RenderOptions;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Ordered fallback chain
    pub chain: Vec<ProxyDescriptor>,
    /// Address bar aliases
    pub shortcuts: ShortcutTable,
    /// Entries kept in the terminal log
    pub log_capacity: usize,
    pub render: RenderOptions,
    pub user_agent: String,
    /// Ceiling for any single HTTP request
    pub request_timeout_ms: u64,
    /// Full passes over the chain before showing alternatives
    pub passes: usize,
    pub attempt_delay_ms: u64,
}

impl BrowserConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            passes: self.passes,
            attempt_delay: Duration::from_millis(self.attempt_delay_ms),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            chain: default_chain(),
            shortcuts: ShortcutTable::default(),
            log_capacity: 50,
            render: RenderOptions::default(),
            user_agent: concat!("Mozilla/5.0 (compatible; HYP3RSP4C3/", env!("CARGO_PKG_VERSION"), ")")
                .to_string(),
            request_timeout_ms: 15_000,
            passes: 1,
            attempt_delay_ms: 0,
        }
    }
}
