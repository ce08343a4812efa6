//! Browser controller
//!
//! Owns the history stack, the terminal log and the display surface, and
//! drives one proxy load at a time. Starting a load cancels the previous one,
//! and a result is only committed while its load is still the newest.

use chrono::Utc;
use hyperspace_navigation::{History, InputKind, UrlClassifier};
use hyperspace_proxy::{
    cancel_pair, CancelHandle, Delivery, HttpTransport, LoadEvent, LoadOutcome, ProxyEngine,
    Transport,
};
use hyperspace_render::Renderer;
use parking_lot::{Mutex, ReentrantMutex, RwLock};
use std::sync::Arc;
use tokio::sync::broadcast::{
    self,
    error::{RecvError, TryRecvError},
};
use url::Url;
use uuid::Uuid;

use crate::config::BrowserConfig;
use crate::display::DisplaySurface;
use crate::log::{LogEntry, TerminalLog};
use crate::Result;

/// Bookkeeping for the load that currently owns the display surface
#[derive(Debug, Default)]
struct ActiveLoad {
    generation: u64,
    /// Address being shown or loaded; `None` on the home screen
    target: Option<String>,
    cancel: Option<CancelHandle>,
}

/// Main browser instance
///
/// All navigation state lives here; the host surface only renders what it
/// is told to.
pub struct Browser {
    classifier: Arc<RwLock<UrlClassifier>>,
    history: Arc<RwLock<History>>,
    log: Arc<RwLock<TerminalLog>>,
    engine: ProxyEngine,
    surface: Arc<dyn DisplaySurface>,
    /// Serializes surface writes. Taken before `active`, never after.
    display: ReentrantMutex<()>,
    active: Mutex<ActiveLoad>,
}

impl Browser {
    /// Create a browser that loads over the network
    pub fn new(config: BrowserConfig, surface: Arc<dyn DisplaySurface>) -> Result<Self> {
        let transport = HttpTransport::new(&config.user_agent, config.request_timeout())?;
        Self::with_transport(config, Arc::new(transport), surface)
    }

    pub fn with_transport(
        config: BrowserConfig,
        transport: Arc<dyn Transport>,
        surface: Arc<dyn DisplaySurface>,
    ) -> Result<Self> {
        let engine = ProxyEngine::new(
            config.chain.clone(),
            transport,
            Renderer::new(config.render.clone()),
            config.engine_options(),
        )?;

        let mut log = TerminalLog::new(config.log_capacity);
        log.push(format!(
            "[SYS] Proxy chain armed with {} services",
            engine.chain().len()
        ));

        tracing::info!(
            descriptors = engine.chain().len(),
            passes = config.passes,
            "Browser initialized"
        );

        Ok(Self {
            classifier: Arc::new(RwLock::new(UrlClassifier::with_shortcuts(
                config.shortcuts.clone(),
            ))),
            history: Arc::new(RwLock::new(History::new())),
            log: Arc::new(RwLock::new(log)),
            engine,
            surface,
            display: ReentrantMutex::new(()),
            active: Mutex::new(ActiveLoad::default()),
        })
    }

    // === Navigation ===

    /// Resolve address bar input and load it, recording a history entry.
    ///
    /// Blank input is logged and rejected; everything else resolves to some
    /// displayed content, even if only the alternatives page.
    pub async fn navigate(&self, input: &str) -> Result<()> {
        let classified = self.classifier.read().classify(input);
        let kind = match classified {
            Ok(kind) => kind,
            Err(e) => {
                tracing::warn!(error = %e, "Navigation rejected");
                self.log_line(format!("[ERROR] {}", e));
                return Err(e.into());
            }
        };

        let address = kind.address();
        match &kind {
            InputKind::Shortcut(url) => {
                self.log_line(format!("[SHORTCUT] {} → {}", input.trim(), url))
            }
            InputKind::SearchQuery(text) => self.log_line(format!("[SEARCH] Query: {}", text)),
            InputKind::DirectUrl(url) => self.log_line(format!("[NAV] Target acquired: {}", url)),
        }
        tracing::info!(input = %input.trim(), address = %address, "Navigating");

        self.history.write().navigate(address.clone());
        self.load(address.clone(), address).await;

        Ok(())
    }

    /// Step back one entry. Returns `false` (and changes nothing) at the
    /// oldest entry.
    pub async fn back(&self) -> bool {
        let entry = self.history.write().back().map(str::to_string);
        let Some(address) = entry else {
            tracing::debug!("Back requested at oldest entry");
            return false;
        };

        self.log_line(format!("[NAV] Back to {}", address));
        self.load(address.clone(), address).await;
        true
    }

    pub async fn forward(&self) -> bool {
        let entry = self.history.write().forward().map(str::to_string);
        let Some(address) = entry else {
            tracing::debug!("Forward requested at newest entry");
            return false;
        };

        self.log_line(format!("[NAV] Forward to {}", address));
        self.load(address.clone(), address).await;
        true
    }

    /// Reload the current target without touching history.
    ///
    /// http(s) targets get a `t=<unix millis>` query parameter so caches
    /// along the chain are bypassed.
    pub async fn refresh(&self) -> bool {
        let current = self.active.lock().target.clone();
        let Some(address) = current else {
            self.log_line("[NAV] Nothing to refresh");
            return false;
        };

        let request = cache_busted(&address);
        self.log_line(format!("[NAV] Refreshing {}", address));
        tracing::info!(address = %address, request = %request, "Refreshing");

        self.load(address, request).await;
        true
    }

    /// Abandon any in-flight load and show the home screen. History is kept.
    pub fn home(&self) {
        {
            let _display = self.display.lock();
            {
                let mut active = self.active.lock();
                active.generation += 1;
                if let Some(handle) = active.cancel.take() {
                    handle.cancel();
                }
                active.target = None;
            }
            self.surface.show_home();
        }

        tracing::info!("Returned home");
        self.log_line("[SYS] Returned to home screen");
    }

    // === State ===

    pub fn can_go_back(&self) -> bool {
        self.history.read().can_go_back()
    }

    pub fn can_go_forward(&self) -> bool {
        self.history.read().can_go_forward()
    }

    /// Address being shown or loaded
    pub fn current(&self) -> Option<String> {
        self.active.lock().target.clone()
    }

    pub fn history(&self) -> Vec<String> {
        self.history.read().entries().to_vec()
    }

    pub fn history_cursor(&self) -> Option<usize> {
        self.history.read().cursor()
    }

    pub fn log_entries(&self) -> Vec<LogEntry> {
        self.log.read().entries()
    }

    /// Raw progress events for every load, including superseded ones
    pub fn subscribe(&self) -> broadcast::Receiver<LoadEvent> {
        self.engine.subscribe()
    }

    pub fn add_shortcut(&self, alias: &str, target: &str) -> Result<()> {
        self.classifier.write().shortcuts_mut().insert(alias, target)?;
        self.log_line(format!("[SYS] Shortcut {} → {}", alias, target));
        Ok(())
    }

    /// Returns `false` if the alias was not registered
    pub fn remove_shortcut(&self, alias: &str) -> bool {
        let removed = self.classifier.write().shortcuts_mut().remove(alias);
        match removed {
            Some(target) => {
                self.log_line(format!("[SYS] Shortcut {} removed ({})", alias, target));
                true
            }
            None => false,
        }
    }

    /// Canonical target of an alias, if registered
    pub fn shortcut(&self, alias: &str) -> Option<String> {
        self.classifier
            .read()
            .shortcuts()
            .resolve(alias)
            .map(str::to_string)
    }

    // === Loading ===

    /// Load `request` on behalf of `target`, the address the user sees.
    async fn load(&self, target: String, request: String) {
        let (generation, token) = {
            let mut active = self.active.lock();
            if let Some(previous) = active.cancel.take() {
                previous.cancel();
            }

            let (handle, token) = cancel_pair();
            active.generation += 1;
            active.target = Some(target);
            active.cancel = Some(handle);
            (active.generation, token)
        };

        let load_id = Uuid::new_v4();
        let mut events = self.engine.subscribe();

        let load = self.engine.load_with_id(load_id, &request, &token);
        tokio::pin!(load);

        // Log each transition as it happens, not when the chain finishes
        let outcome = loop {
            tokio::select! {
                outcome = &mut load => break outcome,
                received = events.recv() => match received {
                    Ok(event) => self.record_event(&event, load_id),
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Terminal log missed load events");
                    }
                    Err(RecvError::Closed) => break (&mut load).await,
                },
            }
        };

        self.drain_events(&mut events, load_id);
        self.commit(generation, outcome);
    }

    fn commit(&self, generation: u64, outcome: LoadOutcome) {
        // Surface calls happen outside `active` so a host may read browser
        // state from inside them.
        let _display = self.display.lock();
        {
            let mut active = self.active.lock();
            if active.generation != generation {
                tracing::debug!(
                    generation,
                    newest = active.generation,
                    "Discarding stale load result"
                );
                return;
            }
            active.cancel = None;
        }

        match outcome {
            LoadOutcome::Rendered {
                descriptor,
                delivery,
            } => match delivery {
                Delivery::Address(url) => {
                    tracing::debug!(descriptor = %descriptor, url = %url, "Showing address");
                    self.surface.show_address(&url);
                }
                Delivery::Document(doc) => {
                    if doc.kind.is_synthesized() {
                        self.log_line(format!(
                            "[WARN] Minimal content from {}, showing preview",
                            descriptor
                        ));
                    } else if let Some(title) = &doc.title {
                        self.log_line(format!("[RENDER] {} via {}", title, descriptor));
                    }
                    self.surface.show_document(&doc);
                }
            },
            LoadOutcome::Local(doc) | LoadOutcome::Exhausted(doc) => {
                self.surface.show_document(&doc);
            }
            LoadOutcome::Cancelled => {}
        }
    }

    fn record_event(&self, event: &LoadEvent, load_id: Uuid) {
        if event.load_id == load_id {
            self.log
                .write()
                .push_at(event.at, event.kind.message());
        }
    }

    /// Copy events still buffered after the load returned
    fn drain_events(&self, events: &mut broadcast::Receiver<LoadEvent>, load_id: Uuid) {
        loop {
            match events.try_recv() {
                Ok(event) => self.record_event(&event, load_id),
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Terminal log missed load events");
                }
                Err(_) => break,
            }
        }
    }

    fn log_line(&self, message: impl Into<String>) {
        self.log.write().push(message);
    }
}

fn cache_busted(address: &str) -> String {
    match Url::parse(address) {
        Ok(mut url) if matches!(url.scheme(), "http" | "https") => {
            url.query_pairs_mut()
                .append_pair("t", &Utc::now().timestamp_millis().to_string());
            url.to_string()
        }
        _ => address.to_string(),
    }
}
