//! Delivery transports
//!
//! The engine only sees this trait. `HttpTransport` is the network-backed
//! implementation; hosts embedding a real frame can supply their own.

use futures_util::future::BoxFuture;
use reqwest::header::{HeaderMap, ACCEPT, CACHE_CONTROL, CONTENT_SECURITY_POLICY, PRAGMA};
use reqwest::redirect::Policy;
use std::time::Duration;

use crate::error::AttemptError;
use crate::Result;

type AttemptResult<T> = std::result::Result<T, AttemptError>;

pub trait Transport: Send + Sync {
    /// Resolve once `url` would have loaded in a content frame.
    fn open_frame<'a>(&'a self, url: &'a str) -> BoxFuture<'a, AttemptResult<()>>;

    /// Fetch `url` and return the response body.
    fn fetch_text<'a>(&'a self, url: &'a str) -> BoxFuture<'a, AttemptResult<String>>;
}

pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// `request_timeout` is a ceiling; each descriptor's own timeout is
    /// enforced by the engine.
    pub fn new(user_agent: &str, request_timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .redirect(Policy::limited(5))
            .timeout(request_timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self { client })
    }

    async fn get(&self, url: &str) -> AttemptResult<reqwest::Response> {
        let resp = self
            .client
            .get(url)
            .header(ACCEPT, "*/*")
            .header(CACHE_CONTROL, "no-cache")
            .header(PRAGMA, "no-cache")
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(AttemptError::Http(resp.status().as_u16()));
        }

        Ok(resp)
    }
}

impl Transport for HttpTransport {
    fn open_frame<'a>(&'a self, url: &'a str) -> BoxFuture<'a, AttemptResult<()>> {
        Box::pin(async move {
            let resp = self.get(url).await?;
            match frame_refusal(resp.headers()) {
                Some(reason) => Err(AttemptError::FrameRefused(reason)),
                None => Ok(()),
            }
        })
    }

    fn fetch_text<'a>(&'a self, url: &'a str) -> BoxFuture<'a, AttemptResult<String>> {
        Box::pin(async move {
            let resp = self.get(url).await?;
            Ok(resp.text().await?)
        })
    }
}

/// Reason a response cannot be shown inside a cross-origin frame, if any.
pub(crate) fn frame_refusal(headers: &HeaderMap) -> Option<String> {
    if let Some(value) = headers
        .get("x-frame-options")
        .and_then(|v| v.to_str().ok())
    {
        let value = value.trim().to_ascii_lowercase();
        if value == "deny" || value == "sameorigin" {
            return Some(format!("X-Frame-Options: {}", value));
        }
    }

    for policy in headers
        .get_all(CONTENT_SECURITY_POLICY)
        .iter()
        .filter_map(|v| v.to_str().ok())
    {
        for directive in policy.split(';') {
            let directive = directive.trim().to_ascii_lowercase();
            let Some(sources) = directive.strip_prefix("frame-ancestors") else {
                continue;
            };
            let sources: Vec<&str> = sources.split_whitespace().collect();
            if sources.is_empty() || sources.iter().all(|s| *s == "'none'" || *s == "'self'") {
                return Some(format!("CSP {}", directive));
            }
        }
    }

    None
}
