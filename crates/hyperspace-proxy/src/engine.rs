//! Sequential proxy fallback engine
//!
//! ```text
//! Idle
//!   ↓ load(url)
//! TryingDescriptor(0)
//!   ↓ timeout / error            ↓ delivered
//! TryingDescriptor(i + 1)  …     Rendered
//!   ↓ end of list
//! Exhausted (alternatives page)
//! ```
//!
//! Descriptors are tried strictly in list order, never in parallel.

use hyperspace_navigation::InternalPage;
use hyperspace_render::{alternatives_page, meta_search_page, search_page};
use hyperspace_render::{DisplayableDocument, Renderer};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::cancel::CancelToken;
use crate::descriptor::{DeliveryMode, ProxyDescriptor};
use crate::error::AttemptError;
use crate::event::{LoadEvent, LoadEventKind};
use crate::transport::Transport;
use crate::Result;

const EVENT_BUFFER: usize = 256;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineOptions {
    /// Full passes over the chain before giving up
    pub passes: usize,
    /// Pause between consecutive attempts
    pub attempt_delay: Duration,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            passes: 1,
            attempt_delay: Duration::ZERO,
        }
    }
}

/// What a successful descriptor hands to the display surface
#[derive(Debug, Clone)]
pub enum Delivery {
    /// Navigable address for the content frame
    Address(String),
    /// Inline document payload
    Document(DisplayableDocument),
}

#[derive(Debug, Clone)]
pub enum LoadOutcome {
    Rendered {
        descriptor: String,
        delivery: Delivery,
    },
    /// Internal page, no descriptor involved
    Local(DisplayableDocument),
    /// Every descriptor failed; carries the synthesized alternatives page
    Exhausted(DisplayableDocument),
    /// Superseded by a newer load; nothing should be displayed
    Cancelled,
}

#[derive(Debug, Deserialize)]
struct ContentsEnvelope {
    contents: Option<String>,
}

pub struct ProxyEngine {
    chain: Vec<ProxyDescriptor>,
    transport: Arc<dyn Transport>,
    renderer: Renderer,
    options: EngineOptions,
    events: broadcast::Sender<LoadEvent>,
}

impl ProxyEngine {
    pub fn new(
        chain: Vec<ProxyDescriptor>,
        transport: Arc<dyn Transport>,
        renderer: Renderer,
        options: EngineOptions,
    ) -> Result<Self> {
        for descriptor in &chain {
            descriptor.validate()?;
        }

        let (events, _) = broadcast::channel(EVENT_BUFFER);

        Ok(Self {
            chain,
            transport,
            renderer,
            options,
            events,
        })
    }

    pub fn chain(&self) -> &[ProxyDescriptor] {
        &self.chain
    }

    /// Stream of progress events for every load run by this engine
    pub fn subscribe(&self) -> broadcast::Receiver<LoadEvent> {
        self.events.subscribe()
    }

    /// Load `target`, walking the descriptor chain until one delivers.
    ///
    /// Never fails: exhaustion resolves to an alternatives page and
    /// cancellation to [`LoadOutcome::Cancelled`].
    pub async fn load(&self, target: &str, cancel: &CancelToken) -> LoadOutcome {
        self.load_with_id(Uuid::new_v4(), target, cancel).await
    }

    /// Same as [`ProxyEngine::load`], tagging every emitted event with
    /// `load_id` so a subscriber can pick out its own load.
    pub async fn load_with_id(
        &self,
        load_id: Uuid,
        target: &str,
        cancel: &CancelToken,
    ) -> LoadOutcome {
        if let Some(page) = InternalPage::parse(target) {
            tracing::info!(load_id = %load_id, target = %target, "Serving internal page");
            self.emit(
                load_id,
                LoadEventKind::LocalPage {
                    target: target.to_string(),
                },
            );
            let doc = match page {
                InternalPage::MetaSearch => meta_search_page(),
                InternalPage::Search(query) => search_page(&query),
            };
            return LoadOutcome::Local(doc);
        }

        tracing::info!(
            load_id = %load_id,
            target = %target,
            descriptors = self.chain.len(),
            "Starting proxy load"
        );
        self.emit(
            load_id,
            LoadEventKind::Started {
                target: target.to_string(),
                descriptors: self.chain.len(),
            },
        );

        let passes = self.options.passes.max(1);
        let mut attempts = 0usize;

        for _ in 0..passes {
            for descriptor in &self.chain {
                if attempts > 0 && !self.options.attempt_delay.is_zero() {
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => return self.cancelled(load_id, target),
                        _ = tokio::time::sleep(self.options.attempt_delay) => {}
                    }
                }

                attempts += 1;
                let request_url = descriptor.request_url(target);

                tracing::debug!(
                    load_id = %load_id,
                    attempt = attempts,
                    descriptor = %descriptor.name,
                    request_url = %request_url,
                    "Trying descriptor"
                );
                self.emit(
                    load_id,
                    LoadEventKind::AttemptStarted {
                        attempt: attempts,
                        descriptor: descriptor.name.clone(),
                        request_url: request_url.clone(),
                    },
                );

                let result = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return self.cancelled(load_id, target),
                    result = tokio::time::timeout(
                        descriptor.timeout(),
                        self.attempt(descriptor, &request_url, target),
                    ) => result.unwrap_or(Err(AttemptError::Timeout(descriptor.timeout_ms))),
                };

                match result {
                    Ok(delivery) => {
                        // A late success must not clobber a newer load
                        if cancel.is_cancelled() {
                            return self.cancelled(load_id, target);
                        }

                        tracing::info!(
                            load_id = %load_id,
                            attempt = attempts,
                            descriptor = %descriptor.name,
                            "Descriptor delivered content"
                        );
                        self.emit(
                            load_id,
                            LoadEventKind::AttemptSucceeded {
                                attempt: attempts,
                                descriptor: descriptor.name.clone(),
                            },
                        );

                        return LoadOutcome::Rendered {
                            descriptor: descriptor.name.clone(),
                            delivery,
                        };
                    }
                    Err(e) => {
                        tracing::warn!(
                            load_id = %load_id,
                            attempt = attempts,
                            descriptor = %descriptor.name,
                            error = %e,
                            "Descriptor failed"
                        );
                        self.emit(
                            load_id,
                            LoadEventKind::AttemptFailed {
                                attempt: attempts,
                                descriptor: descriptor.name.clone(),
                                reason: e.to_string(),
                            },
                        );
                    }
                }
            }
        }

        tracing::info!(
            load_id = %load_id,
            target = %target,
            attempts,
            "Proxy chain exhausted"
        );
        self.emit(
            load_id,
            LoadEventKind::Exhausted {
                target: target.to_string(),
                attempts,
            },
        );

        LoadOutcome::Exhausted(alternatives_page(target))
    }

    async fn attempt(
        &self,
        descriptor: &ProxyDescriptor,
        request_url: &str,
        target: &str,
    ) -> std::result::Result<Delivery, AttemptError> {
        match descriptor.mode {
            DeliveryMode::Iframe => {
                self.transport.open_frame(request_url).await?;
                Ok(Delivery::Address(request_url.to_string()))
            }
            DeliveryMode::JsonFetch => {
                let body = self.transport.fetch_text(request_url).await?;
                let contents = parse_contents(&body)?;
                Ok(Delivery::Document(self.renderer.render(&contents, target)))
            }
        }
    }

    fn cancelled(&self, load_id: Uuid, target: &str) -> LoadOutcome {
        tracing::info!(load_id = %load_id, target = %target, "Load superseded");
        self.emit(
            load_id,
            LoadEventKind::Cancelled {
                target: target.to_string(),
            },
        );
        LoadOutcome::Cancelled
    }

    fn emit(&self, load_id: Uuid, kind: LoadEventKind) {
        // No subscribers is fine
        let _ = self.events.send(LoadEvent::new(load_id, kind));
    }
}

fn parse_contents(body: &str) -> std::result::Result<String, AttemptError> {
    let envelope: ContentsEnvelope = serde_json::from_str(body)
        .map_err(|e| AttemptError::MalformedPayload(e.to_string()))?;

    match envelope.contents {
        Some(contents) if !contents.trim().is_empty() => Ok(contents),
        _ => Err(AttemptError::MalformedPayload(
            "missing or empty contents".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cancel::cancel_pair;
    use crate::descriptor::PriorityTier;
    use futures_util::future::BoxFuture;
    use hyperspace_render::DocumentKind;
    use parking_lot::Mutex;
    use std::collections::HashMap;

    #[derive(Clone)]
    enum Script {
        Fail,
        Hang,
        Frame { delay_ms: u64 },
        Body(String),
    }

    /// Transport answering from a table keyed by request URL
    #[derive(Default)]
    struct ScriptedTransport {
        scripts: HashMap<String, Script>,
        requests: Mutex<Vec<String>>,
    }

    impl ScriptedTransport {
        fn with(mut self, url: &str, script: Script) -> Self {
            self.scripts.insert(url.to_string(), script);
            self
        }

        async fn run(&self, url: &str) -> std::result::Result<Option<String>, AttemptError> {
            self.requests.lock().push(url.to_string());
            match self.scripts.get(url).cloned().unwrap_or(Script::Fail) {
                Script::Fail => Err(AttemptError::Network("connection refused".to_string())),
                Script::Hang => std::future::pending().await,
                Script::Frame { delay_ms } => {
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                    Ok(None)
                }
                Script::Body(body) => Ok(Some(body)),
            }
        }
    }

    impl Transport for ScriptedTransport {
        fn open_frame<'a>(
            &'a self,
            url: &'a str,
        ) -> BoxFuture<'a, std::result::Result<(), AttemptError>> {
            Box::pin(async move { self.run(url).await.map(|_| ()) })
        }

        fn fetch_text<'a>(
            &'a self,
            url: &'a str,
        ) -> BoxFuture<'a, std::result::Result<String, AttemptError>> {
            Box::pin(async move { Ok(self.run(url).await?.unwrap_or_default()) })
        }
    }

    fn frame(name: &str, timeout_ms: u64) -> ProxyDescriptor {
        ProxyDescriptor::new(
            name,
            format!("https://{}.test/{{url}}", name),
            DeliveryMode::Iframe,
            timeout_ms,
            PriorityTier::WebProxy,
        )
    }

    fn json(name: &str) -> ProxyDescriptor {
        ProxyDescriptor::new(
            name,
            format!("https://{}.test/get?url={{url_encoded}}", name),
            DeliveryMode::JsonFetch,
            200,
            PriorityTier::WebProxy,
        )
    }

    fn engine(chain: Vec<ProxyDescriptor>, transport: ScriptedTransport) -> ProxyEngine {
        ProxyEngine::new(
            chain,
            Arc::new(transport),
            Renderer::default(),
            EngineOptions::default(),
        )
        .unwrap()
    }

    fn drain(rx: &mut broadcast::Receiver<LoadEvent>) -> Vec<LoadEventKind> {
        let mut out = Vec::new();
        while let Ok(event) = rx.try_recv() {
            out.push(event.kind);
        }
        out
    }

    fn attempted(events: &[LoadEventKind]) -> Vec<String> {
        events
            .iter()
            .filter_map(|e| match e {
                LoadEventKind::AttemptStarted { descriptor, .. } => Some(descriptor.clone()),
                _ => None,
            })
            .collect()
    }

    const TARGET: &str = "https://example.com";

    #[tokio::test]
    async fn test_falls_through_to_first_success() {
        let transport = ScriptedTransport::default()
            .with("https://a.test/https://example.com", Script::Fail)
            .with("https://b.test/https://example.com", Script::Fail)
            .with("https://c.test/https://example.com", Script::Frame { delay_ms: 0 });
        let engine = engine(vec![frame("a", 200), frame("b", 200), frame("c", 200)], transport);
        let mut rx = engine.subscribe();

        let outcome = engine.load(TARGET, &CancelToken::never()).await;

        match outcome {
            LoadOutcome::Rendered {
                descriptor,
                delivery: Delivery::Address(address),
            } => {
                assert_eq!(descriptor, "c");
                assert_eq!(address, "https://c.test/https://example.com");
            }
            other => panic!("Expected Rendered, got {:?}", other),
        }

        let events = drain(&mut rx);
        assert_eq!(attempted(&events), vec!["a", "b", "c"]);
        assert!(matches!(events.first(), Some(LoadEventKind::Started { descriptors: 3, .. })));
        assert!(matches!(
            events.last(),
            Some(LoadEventKind::AttemptSucceeded { attempt: 3, .. })
        ));
    }

    #[tokio::test]
    async fn test_exhaustion_yields_alternatives_page() {
        let engine = engine(
            vec![frame("a", 100), frame("b", 100)],
            ScriptedTransport::default(),
        );
        let mut rx = engine.subscribe();

        let outcome = engine.load(TARGET, &CancelToken::never()).await;

        match outcome {
            LoadOutcome::Exhausted(doc) => {
                assert_eq!(doc.kind, DocumentKind::Alternatives);
                assert_eq!(doc.source_url, TARGET);
            }
            other => panic!("Expected Exhausted, got {:?}", other),
        }

        let events = drain(&mut rx);
        assert_eq!(attempted(&events), vec!["a", "b"]);
        assert!(matches!(
            events.last(),
            Some(LoadEventKind::Exhausted { attempts: 2, .. })
        ));
    }

    #[tokio::test]
    async fn test_timeout_advances_to_next_descriptor() {
        let transport = ScriptedTransport::default()
            .with("https://slow.test/https://example.com", Script::Hang)
            .with("https://fast.test/https://example.com", Script::Frame { delay_ms: 0 });
        let engine = engine(vec![frame("slow", 30), frame("fast", 200)], transport);
        let mut rx = engine.subscribe();

        let outcome = engine.load(TARGET, &CancelToken::never()).await;
        assert!(matches!(outcome, LoadOutcome::Rendered { ref descriptor, .. } if descriptor == "fast"));

        let events = drain(&mut rx);
        assert!(events.contains(&LoadEventKind::AttemptFailed {
            attempt: 1,
            descriptor: "slow".to_string(),
            reason: "timed out after 30 ms".to_string(),
        }));
    }

    #[tokio::test]
    async fn test_json_fetch_renders_contents() {
        let body = serde_json::json!({
            "contents": "<html><head><title>Proxied</title></head><body><a href=\"/foo\">a link to foo on the origin</a></body></html>",
            "status": { "http_code": 200 }
        })
        .to_string();
        let transport = ScriptedTransport::default().with(
            "https://relay.test/get?url=https%3A%2F%2Fexample.com",
            Script::Body(body),
        );
        let engine = engine(vec![json("relay")], transport);

        match engine.load(TARGET, &CancelToken::never()).await {
            LoadOutcome::Rendered {
                delivery: Delivery::Document(doc),
                ..
            } => {
                assert_eq!(doc.kind, DocumentKind::Proxied);
                assert_eq!(doc.title.as_deref(), Some("Proxied"));
                assert!(doc.html.contains(r#"href="https://example.com/foo""#));
            }
            other => panic!("Expected Document, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_json_is_attempt_failure() {
        let transport = ScriptedTransport::default()
            .with(
                "https://empty.test/get?url=https%3A%2F%2Fexample.com",
                Script::Body(r#"{"contents": ""}"#.to_string()),
            )
            .with(
                "https://garbage.test/get?url=https%3A%2F%2Fexample.com",
                Script::Body("<html>not json</html>".to_string()),
            );
        let engine = engine(vec![json("empty"), json("garbage")], transport);
        let mut rx = engine.subscribe();

        let outcome = engine.load(TARGET, &CancelToken::never()).await;
        assert!(matches!(outcome, LoadOutcome::Exhausted(_)));

        let failures: Vec<String> = drain(&mut rx)
            .into_iter()
            .filter_map(|e| match e {
                LoadEventKind::AttemptFailed { reason, .. } => Some(reason),
                _ => None,
            })
            .collect();
        assert_eq!(failures.len(), 2);
        assert!(failures.iter().all(|r| r.starts_with("malformed payload")));
    }

    #[tokio::test]
    async fn test_internal_pages_bypass_chain() {
        let transport = ScriptedTransport::default();
        let engine = engine(vec![frame("a", 100)], transport);
        let mut rx = engine.subscribe();

        match engine
            .load(hyperspace_navigation::META_SEARCH_ADDRESS, &CancelToken::never())
            .await
        {
            LoadOutcome::Local(doc) => assert_eq!(doc.kind, DocumentKind::MetaSearch),
            other => panic!("Expected Local, got {:?}", other),
        }

        match engine
            .load("hyperspace:search?q=two%20words", &CancelToken::never())
            .await
        {
            LoadOutcome::Local(doc) => {
                assert_eq!(doc.kind, DocumentKind::Search);
                assert!(doc.html.contains("two words"));
            }
            other => panic!("Expected Local, got {:?}", other),
        }

        assert!(attempted(&drain(&mut rx)).is_empty());
    }

    #[tokio::test]
    async fn test_cancel_during_attempt() {
        let transport = ScriptedTransport::default()
            .with("https://slow.test/https://example.com", Script::Frame { delay_ms: 500 });
        let engine = Arc::new(engine(vec![frame("slow", 2000)], transport));
        let (handle, token) = cancel_pair();

        let task = tokio::spawn({
            let engine = Arc::clone(&engine);
            async move { engine.load(TARGET, &token).await }
        });

        tokio::time::sleep(Duration::from_millis(20)).await;
        handle.cancel();

        let outcome = tokio::time::timeout(Duration::from_millis(300), task)
            .await
            .expect("cancel should interrupt the attempt")
            .unwrap();
        assert!(matches!(outcome, LoadOutcome::Cancelled));
    }

    #[tokio::test]
    async fn test_multiple_passes() {
        let engine = ProxyEngine::new(
            vec![frame("a", 100), frame("b", 100)],
            Arc::new(ScriptedTransport::default()),
            Renderer::default(),
            EngineOptions {
                passes: 2,
                attempt_delay: Duration::from_millis(1),
            },
        )
        .unwrap();
        let mut rx = engine.subscribe();

        let outcome = engine.load(TARGET, &CancelToken::never()).await;
        assert!(matches!(outcome, LoadOutcome::Exhausted(_)));
        assert_eq!(attempted(&drain(&mut rx)), vec!["a", "b", "a", "b"]);
    }

    #[test]
    fn test_rejects_invalid_chain() {
        let bad = ProxyDescriptor::new(
            "bad",
            "https://relay.test/",
            DeliveryMode::Iframe,
            100,
            PriorityTier::WebProxy,
        );
        let result = ProxyEngine::new(
            vec![bad],
            Arc::new(ScriptedTransport::default()),
            Renderer::default(),
            EngineOptions::default(),
        );
        assert!(result.is_err());
    }
}
