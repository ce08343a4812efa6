//! Content renderer for proxied HTML

use serde::{Deserialize, Serialize};
use url::Url;

use crate::document::{DisplayableDocument, DocumentKind};
use crate::pages;
use crate::rewrite::{absolutize_attr, insert_after_open_tag};

const PROXY_BANNER: &str = r#"<style>.hyper-proxy-notice{position:fixed;top:0;left:0;right:0;background:linear-gradient(135deg,#8b5dff,#00ffff);color:#000;padding:8px;text-align:center;font-family:monospace;font-weight:bold;z-index:999999;font-size:12px}body{margin-top:35px !important}</style><div class="hyper-proxy-notice">HYP3RSP4C3 PROXY ACTIVE</div>"#;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderOptions {
    /// Content shorter than this (in characters, trimmed) is shown as a preview
    pub min_content_len: usize,
    /// Characters of raw content kept in a preview page
    pub preview_len: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            min_content_len: 50,
            preview_len: 2000,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Renderer {
    options: RenderOptions,
}

impl Renderer {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Prepare fetched HTML for display away from its origin.
    ///
    /// Root-relative `href`/`src` values are made absolute against the
    /// origin of `source_url`, a `<base>` tag covers everything else and a
    /// proxy banner is added. Implausibly short content becomes a preview
    /// page instead.
    pub fn render(&self, html: &str, source_url: &str) -> DisplayableDocument {
        if html.trim().chars().count() < self.options.min_content_len {
            tracing::warn!(
                source = %source_url,
                len = html.trim().len(),
                "Received minimal content, showing preview"
            );
            return pages::content_preview_page(html, source_url, self.options.preview_len);
        }

        let origin = match Url::parse(source_url) {
            Ok(url) if url.has_host() => url.origin().ascii_serialization(),
            _ => {
                tracing::warn!(source = %source_url, "Source has no usable origin, rendering raw content");
                return DisplayableDocument::new(html.to_string(), source_url, DocumentKind::Proxied);
            }
        };

        let mut processed = absolutize_attr(html, "href", &origin);
        processed = absolutize_attr(&processed, "src", &origin);

        let base = format!(r#"<base href="{}/">"#, origin);
        processed = insert_after_open_tag(&processed, "head", &base);
        processed = insert_after_open_tag(&processed, "body", PROXY_BANNER);

        tracing::debug!(source = %source_url, origin = %origin, "Rendered proxied content");

        DisplayableDocument::new(processed, source_url, DocumentKind::Proxied)
    }
}
